use crate::registry::{EntityHandle, Family};
use thiserror::Error;

/// Failures that stop the pipeline from starting. Reported once to the host.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("analysis FFT size {0} is not a power of two in 32..=32768")]
    InvalidResolution(u32),
    #[error("audio unavailable: {0}")]
    AudioUnavailable(String),
    #[error("renderer unavailable: {0}")]
    RenderUnavailable(String),
}

/// Per-frame animator failure. Caught by the orchestrator; never fatal.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnimError {
    #[error("entity {0:?} is not in the registry")]
    MissingEntity(EntityHandle),
    #[error("{family:?} population {count} exceeds limit {limit}")]
    PopulationExceeded {
        family: Family,
        count: usize,
        limit: usize,
    },
    #[error("non-finite value produced for {0}")]
    NonFinite(&'static str),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AudioError {
    #[error("playback rejected: {0}")]
    PlaybackRejected(String),
    #[error("audio context resume failed: {0}")]
    ResumeFailed(String),
    #[error("no audio source attached")]
    NoSource,
}
