use ev_core::AgentId;
use ev_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("route for {agent} has {len} node(s); at least 2 are needed")]
    RouteTooShort { agent: AgentId, len: usize },

    #[error("{0} is not evacuating")]
    NotEvacuating(AgentId),

    #[error("{agent} cursor at segment {segment} is outside its {len}-node route")]
    CursorOutOfBounds { agent: AgentId, segment: usize, len: usize },

    #[error("routing failed: {0}")]
    Routing(#[from] SpatialError),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
