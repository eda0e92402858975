//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `agent_snapshots.csv`
//! - `step_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, OutputResult, StepSummaryRow};

pub const SNAPSHOTS_FILE: &str = "agent_snapshots.csv";
pub const SUMMARIES_FILE: &str = "step_summaries.csv";

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create both files in `dir` (which must exist) and write their headers.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join(SNAPSHOTS_FILE))?;
        snapshots.write_record(["agent_id", "tick", "lat", "lon", "state", "shelter_id"])?;

        let mut summaries = Writer::from_path(dir.join(SUMMARIES_FILE))?;
        summaries.write_record([
            "tick", "time_secs", "population", "idle", "evacuating", "safe", "stuck",
            "overtaken", "reached", "sheltered",
        ])?;

        Ok(Self { snapshots, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.agent_id.to_string(),
                row.tick.to_string(),
                row.lat.to_string(),
                row.lon.to_string(),
                row.state.as_str().to_string(),
                row.shelter.map(|s| s.to_string()).unwrap_or_default(),
            ])?;
        }
        Ok(())
    }

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.time_secs.to_string(),
            row.population.to_string(),
            row.idle.to_string(),
            row.evacuating.to_string(),
            row.safe.to_string(),
            row.stuck.to_string(),
            row.overtaken.to_string(),
            row.reached.to_string(),
            row.sheltered.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
