//! The `OutputWriter` trait implemented by output backends.

use crate::{AgentSnapshotRow, OutputResult, StepSummaryRow};

/// A sink for per-step summaries and evacuee snapshots.
///
/// Errors surface through [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error]
/// when driven by the observer.
pub trait OutputWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()>;

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
