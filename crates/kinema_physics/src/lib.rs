//! Kinema Physics
//!
//! A 2D mass-spring simulation driven one frame at a time by a host loop.
//!
//! # Features
//!
//! - **Damped Springs**: Hooke's law plus damping along the spring axis
//! - **Gravity and Drag**: constant +y acceleration, velocity-proportional drag
//! - **Boundary Collisions**: inset walls with restitution and friction
//! - **Energy Accounting**: kinetic, gravitational, and elastic totals with a
//!   bounded history for graphing
//!
//! # Example
//!
//! ```rust
//! use kinema_physics::{PhysicsWorld, SimulationParams, Vec2};
//!
//! let mut world = PhysicsWorld::new(SimulationParams::default());
//! let anchor = world.add_fixed_mass(Vec2::new(400.0, 100.0), 1.0);
//! let bob = world.add_mass(Vec2::new(400.0, 250.0), 1.0);
//! world.add_spring(anchor, bob, 50.0);
//!
//! // One 60fps frame in an 800x600 box
//! let energy = world.step(1.0 / 60.0, 800.0, 600.0);
//! assert!(energy.kinetic >= 0.0);
//! ```

pub mod body;
pub mod energy;
pub mod error;
pub mod forces;
pub mod params;
pub mod vector;
pub mod world;

pub use body::{Mass, MassId, Spring, SpringId};
pub use energy::{EnergyHistory, EnergySnapshot};
pub use error::ParamsError;
pub use forces::{ForceKind, ForceVector};
pub use params::{BoundaryParams, Seed, SimulationParams, StabilityGuard};
pub use vector::Vec2;
pub use world::PhysicsWorld;
