//! `ev-output`: simulation output writers.
//!
//! | Backend | Files created                                  |
//! |---------|------------------------------------------------|
//! | CSV     | `step_summaries.csv`, `agent_snapshots.csv`    |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `ev_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ev_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer, 60);
//! sim.run_until_settled(3_600, &mut obs);
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::{CsvWriter, SNAPSHOTS_FILE, SUMMARIES_FILE};
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{AgentSnapshotRow, StepSummaryRow};
pub use writer::OutputWriter;
