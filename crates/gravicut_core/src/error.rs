use thiserror::Error;
use uuid::Uuid;

use crate::types::Frame;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Track not found: {0}")]
    TrackNotFound(usize),

    #[error("Clip not found: {0}")]
    ClipNotFound(Uuid),

    #[error("Track {track} has no clip at index {index}")]
    ClipIndexNotFound { track: Uuid, index: usize },

    #[error("No placement for clip {clip} near frame {desired}")]
    NoPlacement { clip: Uuid, desired: Frame },

    #[error("Clip {clip} cannot be placed on track {track}")]
    IncompatibleTrack { clip: Uuid, track: usize },

    #[error("Overlap detected")]
    OverlapDetected,

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,
}

pub type Result<T> = std::result::Result<T, CoreError>;
