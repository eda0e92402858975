//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter.  `SimClock` maps it to
//! simulated seconds since the hazard event:
//!
//!   sim_time_secs = tick * tick_seconds
//!
//! Keeping the integer tick canonical means the clock never drifts, even
//! with fractional tick lengths; the seconds value is always recomputed from
//! the tick rather than accumulated.
//!
//! Stepping is externally driven: one `advance()` per `Sim::step` call, with
//! no wall-clock pacing.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and simulated seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated seconds per tick.
    pub tick_seconds: f64,
    /// The current tick, advanced by `SimClock::advance()` once per step.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_seconds: f64) -> Self {
        Self { tick_seconds, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick + 1;
    }

    /// Simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 * self.tick_seconds
    }

    /// Break elapsed time into (minutes, seconds) for log lines.
    pub fn elapsed_ms(&self) -> (u64, f64) {
        let secs = self.elapsed_secs().max(0.0);
        let minutes = (secs / 60.0).floor();
        (minutes as u64, secs - minutes * 60.0)
    }

    /// How many ticks span `secs` seconds (rounded up).
    #[inline]
    pub fn ticks_for_secs(&self, secs: f64) -> u64 {
        (secs / self.tick_seconds).ceil().max(0.0) as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (m, s) = self.elapsed_ms();
        write!(f, "{} (+{}m{:04.1}s)", self.current_tick, m, s)
    }
}
