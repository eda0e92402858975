//! Fluent builder for starting a [`Sim`] session.

use ev_agent::{BuildingSite, PopulationBuilder, ShelterSite};
use ev_core::{Coordinate, SimClock, SimConfig, SimRng};
use ev_hazard::HazardModel;
use ev_mobility::{CongestionModel, MobilityEngine};
use ev_spatial::{RoadNetwork, RoadNetworkBuilder, Router};
use tracing::info;

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<R>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: tick length, walking speed, congestion, hazard, seed
/// - `R: Router`: the routing algorithm (e.g. [`ev_spatial::DijkstraRouter`])
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                                  |
/// |--------------------------|------------------------------------------|
/// | `.roads(v)`              | No roads                                 |
/// | `.network(n)`            | Built from `.roads`                      |
/// | `.buildings(v)`          | No buildings, so no evacuees             |
/// | `.shelters(v)`           | No shelters                              |
/// | `.hazard(h)`             | `HazardModel::from_config(&cfg.hazard)`  |
/// | `.population_limit(n)`   | Unlimited (`Some(0)` is also unlimited)  |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, DijkstraRouter)
///     .roads(scenario.roads)
///     .buildings(scenario.buildings)
///     .shelters(scenario.shelters)
///     .population_limit(Some(500))
///     .build()?;
/// sim.run_until_settled(3_600, &mut NoopObserver);
/// ```
pub struct SimBuilder<R: Router> {
    config:           SimConfig,
    router:           R,
    roads:            Vec<Vec<Coordinate>>,
    network:          Option<RoadNetwork>,
    buildings:        Vec<BuildingSite>,
    shelters:         Vec<ShelterSite>,
    hazard:           Option<HazardModel>,
    population_limit: Option<usize>,
}

impl<R: Router> SimBuilder<R> {
    pub fn new(config: SimConfig, router: R) -> Self {
        Self {
            config,
            router,
            roads:            Vec::new(),
            network:          None,
            buildings:        Vec::new(),
            shelters:         Vec::new(),
            hazard:           None,
            population_limit: None,
        }
    }

    /// Road polylines.  Consecutive vertices become walkable segments.
    pub fn roads(mut self, lines: impl IntoIterator<Item = Vec<Coordinate>>) -> Self {
        self.roads.extend(lines);
        self
    }

    /// A prebuilt network.  Takes precedence over `.roads`.
    pub fn network(mut self, network: RoadNetwork) -> Self {
        self.network = Some(network);
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

    /// Use an explicit hazard model, e.g. polygons loaded from disk.
    pub fn hazard(mut self, hazard: HazardModel) -> Self {
        self.hazard = Some(hazard);
        self
    }

    /// Cap on spawned evacuees.  `Some(0)` means no cap.
    pub fn population_limit(mut self, limit: Option<usize>) -> Self {
        self.population_limit = limit;
        self
    }

    /// Validate the configuration, build every model, spawn the population
    /// and give each evacuee its first route.
    pub fn build(self) -> SimResult<Sim<R>> {
        self.config.validate()?;

        let network = match self.network {
            Some(n) => n,
            None => {
                let mut b = RoadNetworkBuilder::new();
                for line in &self.roads {
                    b.add_line(line);
                }
                b.build()
            }
        };

        let population = PopulationBuilder::new(self.config.walking_speed_mps)
            .default_population(self.config.default_building_population)
            .default_capacity(self.config.default_shelter_capacity)
            .limit(self.population_limit)
            .buildings(self.buildings)
            .shelters(self.shelters)
            .build();

        if !population.evacuees.is_empty() {
            if population.shelters.is_empty() {
                return Err(SimError::NoShelters { evacuees: population.evacuees.len() });
            }
            if network.is_empty() {
                return Err(SimError::Init("road network has no nodes".into()));
            }
        }

        let hazard = match self.hazard {
            Some(h) => h,
            None => HazardModel::from_config(&self.config.hazard)?,
        };

        let mut congestion = CongestionModel::from_config(&self.config);
        let segments = congestion.register_network(&network);

        let mut sim = Sim {
            clock:    SimClock::new(self.config.tick_seconds),
            rng:      SimRng::new(self.config.seed),
            mobility: MobilityEngine::from_config(self.router, &self.config),
            config:   self.config,
            evacuees: population.evacuees,
            shelters: population.shelters,
            history:  Vec::new(),
            network,
            congestion,
            hazard,
        };
        sim.assign_initial_routes();

        let start = sim.start_info();
        info!(
            population = start.population,
            shelters = start.shelter_count,
            nodes = sim.network.node_count(),
            segments,
            hazard = %sim.hazard.mode(),
            stuck = sim.stats().counts.stuck,
            "simulation session started"
        );
        Ok(sim)
    }
}
