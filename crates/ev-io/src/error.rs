use std::path::PathBuf;

use ev_core::CoreError;
use ev_hazard::HazardError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A feature whose geometry cannot be used even after skipping
    /// unsupported types, e.g. a position with fewer than two numbers.
    #[error("{layer} feature #{index}: {reason}")]
    InvalidFeature {
        layer:  &'static str,
        index:  usize,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] CoreError),

    #[error("hazard: {0}")]
    Hazard(#[from] HazardError),

    /// Any of the above, tagged with the file it came from.
    #[error("{}: {source}", path.display())]
    File {
        path:   PathBuf,
        #[source]
        source: Box<IoError>,
    },
}

impl IoError {
    pub(crate) fn in_file(self, path: impl Into<PathBuf>) -> Self {
        IoError::File { path: path.into(), source: Box::new(self) }
    }
}

pub type IoResult<T> = Result<T, IoError>;
