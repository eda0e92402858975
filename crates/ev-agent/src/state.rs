//! Evacuee state machine and route cursor.
//!
//! ```text
//!   idle ──► evacuating ──► safe
//!    │          │  ▲ │
//!    │          │  └─┘ (per-tick move / reroute)
//!    ▼          ├──────► overtaken
//!  stuck ◄──────┘
//! ```
//!
//! `safe`, `stuck` and `overtaken` are absorbing.

use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EvacueeState {
    #[default]
    Idle,
    Evacuating,
    Safe,
    Stuck,
    Overtaken,
}

impl EvacueeState {
    pub const ALL: [EvacueeState; 5] = [
        EvacueeState::Idle,
        EvacueeState::Evacuating,
        EvacueeState::Safe,
        EvacueeState::Stuck,
        EvacueeState::Overtaken,
    ];

    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, EvacueeState::Safe | EvacueeState::Stuck | EvacueeState::Overtaken)
    }

    /// Whether `self → next` is an edge of the state machine.
    pub fn can_transition_to(self, next: EvacueeState) -> bool {
        use EvacueeState::*;
        matches!(
            (self, next),
            (Idle, Evacuating)
                | (Idle, Stuck)
                | (Evacuating, Evacuating)
                | (Evacuating, Safe)
                | (Evacuating, Stuck)
                | (Evacuating, Overtaken)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EvacueeState::Idle       => "idle",
            EvacueeState::Evacuating => "evacuating",
            EvacueeState::Safe       => "safe",
            EvacueeState::Stuck      => "stuck",
            EvacueeState::Overtaken  => "overtaken",
        }
    }
}

impl fmt::Display for EvacueeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── RouteCursor ───────────────────────────────────────────────────────────────

/// Position along a route: segment `segment` runs from `route[segment]` to
/// `route[segment + 1]`, and `progress` is the fraction of it covered.
///
/// `segment == route.len() - 1` means the evacuee stands on the final node.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteCursor {
    pub segment:  usize,
    pub progress: f64,
}

impl RouteCursor {
    pub const START: RouteCursor = RouteCursor { segment: 0, progress: 0.0 };

    pub fn reset(&mut self) {
        *self = Self::START;
    }

    /// In bounds for a walkable route of `route_len` nodes.
    pub fn is_within(self, route_len: usize) -> bool {
        route_len >= 2 && self.segment < route_len
    }
}
