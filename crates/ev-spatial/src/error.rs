//! Spatial-subsystem error type.

use thiserror::Error;

use ev_core::NodeId;

/// Errors produced by `ev-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("road network has no nodes")]
    EmptyNetwork,
}

pub type SpatialResult<T> = Result<T, SpatialError>;
