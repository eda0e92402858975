//! Evacuation centres.

use ev_core::{Coordinate, ShelterId};

/// A capacity-bounded evacuation centre.
///
/// `occupants <= capacity` always holds: [`Shelter::add_occupant`] refuses
/// once the shelter is full.  Evacuees who reach a full shelter are still
/// safe; they are simply not counted.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shelter {
    pub id:        ShelterId,
    pub name:      String,
    pub location:  Coordinate,
    pub capacity:  u32,
    occupants:     u32,
}

impl Shelter {
    /// `name` defaults to `evac_<id>`.
    pub fn new(id: ShelterId, location: Coordinate, capacity: u32, name: Option<String>) -> Self {
        Self {
            id,
            name: name.unwrap_or_else(|| format!("evac_{}", id.0)),
            location,
            capacity,
            occupants: 0,
        }
    }

    #[inline]
    pub fn occupants(&self) -> u32 {
        self.occupants
    }

    #[inline]
    pub fn can_accept(&self) -> bool {
        self.occupants < self.capacity
    }

    /// Count one more occupant if there is room.  Returns whether it was
    /// counted.
    pub fn add_occupant(&mut self) -> bool {
        if self.can_accept() {
            self.occupants += 1;
            true
        } else {
            false
        }
    }
}
