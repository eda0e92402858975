//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements.  Evacuees and shelters are stored in plain `Vec`s
//! owned by the simulation session, so an ID is simply the position in that
//! `Vec`; use `.index()` rather than `id.0 as usize`.

use std::fmt;

/// Generate a `u32` ID wrapper with a short display label.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident => $label:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub u32);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(u32::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Build an ID from a `Vec` position.  Populations and graphs
            /// stay far below `u32::MAX` entries.
            #[inline]
            pub fn from_index(i: usize) -> Self {
                $name(i as u32)
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Uninitialised IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

typed_id! {
    /// Index of an evacuee in the session's population.
    pub struct AgentId => "agent";
}

typed_id! {
    /// Index of an evacuation shelter.
    pub struct ShelterId => "shelter";
}

typed_id! {
    /// Index of a road-network node.
    pub struct NodeId => "node";
}

typed_id! {
    /// Index of a directed road-network edge.
    pub struct EdgeId => "edge";
}
