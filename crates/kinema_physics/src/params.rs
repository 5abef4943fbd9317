//! Simulation parameters
//!
//! One [`SimulationParams`] is owned by each [`PhysicsWorld`](crate::PhysicsWorld).
//! Setters on the world mutate it in place and take effect on the next step.

use serde::{Deserialize, Serialize};

use crate::error::{ParamsError, Result};
use crate::vector::Vec2;

/// Engine-wide configuration
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Default stiffness for new springs (also pushed to live springs by
    /// `set_stiffness`)
    pub stiffness: f64,
    /// Spring damping coefficient; half of it is also used as linear air drag
    pub damping: f64,
    /// Gravitational acceleration along +y
    pub gravity: f64,
    /// Mass assigned to masses created without an explicit value
    pub default_mass: f64,
    /// Wall behaviour
    pub boundary: BoundaryParams,
    /// Optional runaway clamps
    pub guard: StabilityGuard,
    /// Multiplier from force units to drawn segment length
    pub force_vector_scale: f64,
    /// Number of energy samples retained for trending
    pub energy_history_capacity: usize,
}

impl SimulationParams {
    pub fn new(stiffness: f64, damping: f64, gravity: f64) -> Self {
        Self {
            stiffness,
            damping,
            gravity,
            ..Self::default()
        }
    }

    /// No gravity, no damping. Useful for conservation checks.
    pub fn frictionless() -> Self {
        Self {
            damping: 0.0,
            gravity: 0.0,
            ..Self::default()
        }
    }

    /// Heavy damping, settles quickly
    pub fn syrup() -> Self {
        Self {
            damping: 2.0,
            ..Self::default()
        }
    }

    /// Check every field against its documented range
    pub fn validate(&self) -> Result<()> {
        if !(self.stiffness > 0.0) {
            return Err(ParamsError::Stiffness(self.stiffness));
        }
        if !(self.damping >= 0.0) {
            return Err(ParamsError::Damping(self.damping));
        }
        if !(self.gravity >= 0.0) {
            return Err(ParamsError::Gravity(self.gravity));
        }
        if !(self.default_mass > 0.0) {
            return Err(ParamsError::Mass(self.default_mass));
        }
        if !(0.0..=1.0).contains(&self.boundary.restitution) {
            return Err(ParamsError::Restitution(self.boundary.restitution));
        }
        if !(0.0..=1.0).contains(&self.boundary.friction) {
            return Err(ParamsError::Friction(self.boundary.friction));
        }
        self.guard.validate()?;
        if self.energy_history_capacity == 0 {
            return Err(ParamsError::HistoryCapacity);
        }
        Ok(())
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            stiffness: 50.0,
            damping: 0.5,
            gravity: 9.8,
            default_mass: 1.0,
            boundary: BoundaryParams::default(),
            guard: StabilityGuard::default(),
            force_vector_scale: 0.1,
            energy_history_capacity: 1000,
        }
    }
}

/// Boundary collision configuration
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryParams {
    /// Inset from each edge, normally the drawn mass radius
    pub margin: f64,
    /// Fraction of perpendicular speed kept after a bounce
    pub restitution: f64,
    /// Fraction of tangential speed kept after a bounce
    pub friction: f64,
}

impl Default for BoundaryParams {
    fn default() -> Self {
        Self {
            margin: 15.0,
            restitution: 0.5,
            friction: 0.98,
        }
    }
}

/// Per-axis clamps applied to accumulated force and integrated velocity.
///
/// Both are off by default. They only matter for large `dt` or extreme
/// stiffness where explicit Euler blows up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityGuard {
    pub max_force: Option<f64>,
    pub max_velocity: Option<f64>,
}

impl StabilityGuard {
    /// Loose limits that only catch outright divergence
    pub fn generous() -> Self {
        Self {
            max_force: Some(10_000.0),
            max_velocity: Some(2_000.0),
        }
    }

    /// Each set limit must be finite and non-negative
    pub fn validate(&self) -> Result<()> {
        let limits = [
            ("max_force", self.max_force),
            ("max_velocity", self.max_velocity),
        ];
        for (name, limit) in limits {
            if let Some(value) = limit {
                if !(value.is_finite() && value >= 0.0) {
                    return Err(ParamsError::Guard { name, value });
                }
            }
        }
        Ok(())
    }
}

/// Starting topology applied by [`PhysicsWorld::reset`](crate::PhysicsWorld::reset)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    /// Position of the fixed anchor
    pub anchor: Vec2,
    /// Position of the free mass hanging from it
    pub bob: Vec2,
}

impl Default for Seed {
    fn default() -> Self {
        Self {
            anchor: Vec2::new(400.0, 100.0),
            bob: Vec2::new(400.0, 250.0),
        }
    }
}
