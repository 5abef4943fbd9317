//! Point masses and the springs connecting them

use slotmap::new_key_type;

use crate::vector::Vec2;

new_key_type! {
    /// Stable handle to a mass owned by a [`PhysicsWorld`](crate::PhysicsWorld)
    pub struct MassId;
    /// Stable handle to a spring owned by a [`PhysicsWorld`](crate::PhysicsWorld)
    pub struct SpringId;
}

/// A point mass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mass {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Force accumulator, zeroed at the start of every step
    pub force: Vec2,
    pub mass: f64,
    /// Anchors are never integrated
    pub fixed: bool,
}

impl Mass {
    pub fn new(position: Vec2, mass: f64) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            force: Vec2::ZERO,
            mass,
            fixed: false,
        }
    }

    pub fn anchor(position: Vec2, mass: f64) -> Self {
        Self {
            fixed: true,
            ..Self::new(position, mass)
        }
    }

    pub fn reset_force(&mut self) {
        self.force = Vec2::ZERO;
    }

    pub fn add_force(&mut self, force: Vec2) {
        self.force += force;
    }

    /// 0.5 * m * |v|²
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    /// m * g * y, with y growing downward
    pub fn gravitational_energy(&self, gravity: f64) -> f64 {
        self.mass * gravity * self.position.y
    }
}

/// A damped Hookean spring between two masses
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    pub(crate) a: MassId,
    pub(crate) b: MassId,
    pub(crate) rest_length: f64,
    /// Stiffness, the only mutable spring property
    pub stiffness: f64,
}

impl Spring {
    pub(crate) fn new(a: MassId, b: MassId, rest_length: f64, stiffness: f64) -> Self {
        Self {
            a,
            b,
            rest_length,
            stiffness,
        }
    }

    /// The two endpoints, in creation order
    pub fn ends(&self) -> (MassId, MassId) {
        (self.a, self.b)
    }

    /// Distance between the endpoints when the spring was created
    pub fn rest_length(&self) -> f64 {
        self.rest_length
    }

    pub fn connects(&self, id: MassId) -> bool {
        self.a == id || self.b == id
    }

    /// 0.5 * k * extension²
    pub fn elastic_energy(&self, extension: f64) -> f64 {
        0.5 * self.stiffness * extension * extension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinetic_energy() {
        let mut m = Mass::new(Vec2::ZERO, 2.0);
        m.velocity = Vec2::new(3.0, 4.0);
        assert!((m.kinetic_energy() - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_force_accumulator() {
        let mut m = Mass::new(Vec2::ZERO, 1.0);
        m.add_force(Vec2::new(1.0, 2.0));
        m.add_force(Vec2::new(0.5, -1.0));
        assert_eq!(m.force, Vec2::new(1.5, 1.0));
        m.reset_force();
        assert_eq!(m.force, Vec2::ZERO);
    }

    #[test]
    fn test_anchor_is_fixed() {
        assert!(Mass::anchor(Vec2::ZERO, 1.0).fixed);
        assert!(!Mass::new(Vec2::ZERO, 1.0).fixed);
    }
}
