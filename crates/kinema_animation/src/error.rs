//! Keyframe editing errors

use thiserror::Error;

use crate::keyframe::KeyframeId;

/// Rejected keyframe edits. Evaluation itself never fails.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KeyframeError {
    /// Another keyframe already sits at this time
    #[error("a keyframe already exists at time {0}")]
    DuplicateTime(f64),

    /// Keyframe times must be finite
    #[error("keyframe time must be finite, got {0}")]
    InvalidTime(f64),

    /// No keyframe with this id in the property
    #[error("unknown keyframe {0:?}")]
    UnknownKeyframe(KeyframeId),
}

/// Result type for keyframe edits
pub type Result<T> = std::result::Result<T, KeyframeError>;
