//! Parameter validation errors

use thiserror::Error;

/// A simulation parameter outside its valid range
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamsError {
    /// Spring stiffness must be strictly positive
    #[error("stiffness must be positive, got {0}")]
    Stiffness(f64),

    /// Damping must be zero or positive
    #[error("damping must be non-negative, got {0}")]
    Damping(f64),

    /// Gravity must be zero or positive
    #[error("gravity must be non-negative, got {0}")]
    Gravity(f64),

    /// Mass must be strictly positive
    #[error("mass must be positive, got {0}")]
    Mass(f64),

    /// Restitution must lie in [0, 1]
    #[error("restitution must be within [0, 1], got {0}")]
    Restitution(f64),

    /// Friction keep factor must lie in [0, 1]
    #[error("friction must be within [0, 1], got {0}")]
    Friction(f64),

    /// Guard limits must be finite and non-negative
    #[error("stability guard {name} must be finite and non-negative, got {value}")]
    Guard { name: &'static str, value: f64 },

    /// Energy history needs room for at least one sample
    #[error("energy history capacity must be at least 1")]
    HistoryCapacity,
}

/// Result type for parameter validation
pub type Result<T> = std::result::Result<T, ParamsError>;
