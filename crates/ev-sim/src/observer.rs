//! Simulation observer trait for progress reporting and data collection.

use ev_agent::{Evacuee, Shelter};
use ev_core::Tick;

use crate::SimStats;

/// Callbacks invoked by [`Sim::run_ticks`][crate::Sim::run_ticks] and
/// [`Sim::run_until_settled`][crate::Sim::run_until_settled] around each
/// step.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_step_end(&mut self, tick: Tick, stats: &SimStats) {
///         if tick.0 % self.interval == 0 {
///             println!("{tick}: {} safe", stats.counts.safe);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before the clock advances.  `tick` is the tick being entered.
    fn on_step_start(&mut self, _tick: Tick) {}

    /// Called after the post-move pass with that step's statistics.
    fn on_step_end(&mut self, _tick: Tick, _stats: &SimStats) {}

    /// Called after every step with read-only entity state, so output
    /// writers can record positions without the sim knowing any format.
    fn on_snapshot(&mut self, _tick: Tick, _evacuees: &[Evacuee], _shelters: &[Shelter]) {}

    /// Called once when a run finishes.
    fn on_sim_end(&mut self, _final_tick: Tick, _stats: &SimStats) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
