//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use ev_agent::{Evacuee, Shelter};
use ev_core::Tick;
use ev_sim::{SimObserver, SimStats};
use tracing::warn;

use crate::row::{AgentSnapshotRow, StepSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes a summary row every step and evacuee
/// snapshots every `snapshot_interval` ticks.
///
/// Writer errors are stored because observer callbacks return nothing.
/// Check [`take_error`][Self::take_error] after the run.
pub struct SimOutputObserver<W: OutputWriter> {
    writer:            W,
    snapshot_interval: u64,
    last_error:        Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// `snapshot_interval == 0` disables snapshots.
    pub fn new(writer: W, snapshot_interval: u64) -> Self {
        Self { writer, snapshot_interval, last_error: None }
    }

    /// The first write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                warn!(error = %e, "output write failed; further errors suppressed");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_step_end(&mut self, _tick: Tick, stats: &SimStats) {
        let result = self.writer.write_step_summary(&StepSummaryRow::from(stats));
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, evacuees: &[Evacuee], _shelters: &[Shelter]) {
        if self.snapshot_interval == 0 || !tick.0.is_multiple_of(self.snapshot_interval) {
            return;
        }
        let rows: Vec<AgentSnapshotRow> =
            evacuees.iter().map(|e| AgentSnapshotRow::new(tick, e)).collect();
        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick, _stats: &SimStats) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
