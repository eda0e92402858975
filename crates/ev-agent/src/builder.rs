//! Fluent builder for the initial evacuee and shelter populations.
//!
//! # Usage
//!
//! ```rust
//! use ev_agent::{BuildingSite, PopulationBuilder, ShelterSite};
//! use ev_core::Coordinate;
//!
//! let pop = PopulationBuilder::new(1.4)
//!     .limit(Some(3))
//!     .buildings(vec![BuildingSite::new(Coordinate::new(122.69, 14.29), Some(10))])
//!     .shelters(vec![ShelterSite::new(Coordinate::new(122.70, 14.30), Some(50), None)])
//!     .build();
//!
//! assert_eq!(pop.evacuees.len(), 3);
//! assert_eq!(pop.shelters[0].name, "evac_0");
//! ```

use ev_core::{AgentId, Coordinate, ShelterId};
use tracing::debug;

use crate::{Evacuee, Shelter};

/// A building reduced to one point, with its optional population attribute.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildingSite {
    pub location:   Coordinate,
    pub population: Option<u32>,
}

impl BuildingSite {
    pub fn new(location: Coordinate, population: Option<u32>) -> Self {
        Self { location, population }
    }
}

/// A shelter reduced to one point, with optional attributes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShelterSite {
    pub location: Coordinate,
    pub capacity: Option<u32>,
    pub name:     Option<String>,
}

impl ShelterSite {
    pub fn new(location: Coordinate, capacity: Option<u32>, name: Option<String>) -> Self {
        Self { location, capacity, name }
    }
}

/// The spawned entities.  IDs equal `Vec` positions.
#[derive(Clone, Debug, Default)]
pub struct Population {
    pub evacuees: Vec<Evacuee>,
    pub shelters: Vec<Shelter>,
}

/// Fluent builder for [`Population`].
pub struct PopulationBuilder {
    walking_speed_mps:   f64,
    default_population:  u32,
    default_capacity:    u32,
    limit:               Option<usize>,
    buildings:           Vec<BuildingSite>,
    shelters:            Vec<ShelterSite>,
}

impl PopulationBuilder {
    pub fn new(walking_speed_mps: f64) -> Self {
        Self {
            walking_speed_mps,
            default_population: 1,
            default_capacity:   9_999,
            limit:              None,
            buildings:          Vec::new(),
            shelters:           Vec::new(),
        }
    }

    /// Evacuees per building without a population attribute.
    pub fn default_population(mut self, n: u32) -> Self {
        self.default_population = n;
        self
    }

    /// Capacity of shelters without a capacity attribute.
    pub fn default_capacity(mut self, n: u32) -> Self {
        self.default_capacity = n;
        self
    }

    /// Global cap on the number of evacuees.  `None` and `Some(0)` both
    /// mean unlimited.
    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn buildings(mut self, sites: impl IntoIterator<Item = BuildingSite>) -> Self {
        self.buildings.extend(sites);
        self
    }

    pub fn shelters(mut self, sites: impl IntoIterator<Item = ShelterSite>) -> Self {
        self.shelters.extend(sites);
        self
    }

    /// Spawn buildings in input order until the limit is reached.
    pub fn build(self) -> Population {
        let shelters: Vec<Shelter> = self
            .shelters
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                Shelter::new(
                    ShelterId::from_index(i),
                    s.location,
                    s.capacity.unwrap_or(self.default_capacity),
                    s.name,
                )
            })
            .collect();

        let limit = self.limit.filter(|&n| n > 0).unwrap_or(usize::MAX);
        let mut evacuees = Vec::new();
        'buildings: for site in &self.buildings {
            let count = site.population.unwrap_or(self.default_population);
            for _ in 0..count {
                if evacuees.len() >= limit {
                    break 'buildings;
                }
                let id = AgentId::from_index(evacuees.len());
                evacuees.push(Evacuee::new(id, site.location, self.walking_speed_mps));
            }
        }

        debug!(
            evacuees = evacuees.len(),
            shelters = shelters.len(),
            buildings = self.buildings.len(),
            "population spawned"
        );
        Population { evacuees, shelters }
    }
}
