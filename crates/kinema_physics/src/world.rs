//! The mass-spring world
//!
//! Masses and springs live in slotmap arenas. Springs store the ids of their
//! endpoints; removing a mass removes every spring attached to it, so no spring
//! ever points at a mass outside the world.
//!
//! # Step phases
//!
//! 1. Zero every force accumulator
//! 2. Accumulate spring forces (Hooke + damping along the spring axis)
//! 3. Add gravity and linear air drag to free masses
//! 4. Integrate with semi-implicit Euler, skipping anchors and the
//!    externally controlled mass
//! 5. Resolve collisions against the inset bounds
//! 6. Record energy
//!
//! Phases 1-3 only read positions and velocities, so no mass's update can
//! leak into another mass's same-step force.

use slotmap::SlotMap;

use crate::body::{Mass, MassId, Spring, SpringId};
use crate::energy::{EnergyHistory, EnergySnapshot};
use crate::forces::{ForceKind, ForceVector};
use crate::params::{Seed, SimulationParams};
use crate::vector::Vec2;

/// Substituted for spring lengths that collapse to zero
const MIN_SPRING_LENGTH: f64 = 1e-8;

/// Share of the damping coefficient applied as air drag
const AIR_DRAG_FACTOR: f64 = 0.5;

/// A 2D mass-spring simulation
#[derive(Clone, Debug)]
pub struct PhysicsWorld {
    params: SimulationParams,
    masses: SlotMap<MassId, Mass>,
    springs: SlotMap<SpringId, Spring>,
    force_vectors: Vec<ForceVector>,
    history: EnergyHistory,
    energy: EnergySnapshot,
    paused: bool,
    show_forces: bool,
    controlled: Option<MassId>,
    seed: Option<Seed>,
}

impl PhysicsWorld {
    /// Create an empty world. Call [`reset`](Self::reset) to apply the seed.
    pub fn new(params: SimulationParams) -> Self {
        Self {
            history: EnergyHistory::with_capacity(params.energy_history_capacity),
            params,
            masses: SlotMap::with_key(),
            springs: SlotMap::with_key(),
            force_vectors: Vec::new(),
            energy: EnergySnapshot::default(),
            paused: false,
            show_forces: false,
            controlled: None,
            seed: Some(Seed::default()),
        }
    }

    /// Replace the topology used by `reset` (`None` resets to an empty world)
    pub fn with_seed(mut self, seed: Option<Seed>) -> Self {
        self.seed = seed;
        self
    }

    // =========================================================================
    // Topology
    // =========================================================================

    /// Add a free mass. Non-positive masses fall back to the default mass.
    pub fn add_mass(&mut self, position: Vec2, mass: f64) -> MassId {
        let mass = self.sanitize_mass(mass);
        let id = self.masses.insert(Mass::new(position, mass));
        tracing::debug!(?id, x = position.x, y = position.y, mass, "added mass");
        id
    }

    /// Add a free mass using the configured default mass
    pub fn add_mass_default(&mut self, position: Vec2) -> MassId {
        self.add_mass(position, self.params.default_mass)
    }

    /// Add an anchor that is never integrated
    pub fn add_fixed_mass(&mut self, position: Vec2, mass: f64) -> MassId {
        let mass = self.sanitize_mass(mass);
        let id = self.masses.insert(Mass::anchor(position, mass));
        tracing::debug!(?id, x = position.x, y = position.y, "added anchor");
        id
    }

    fn sanitize_mass(&self, mass: f64) -> f64 {
        if mass > 0.0 && mass.is_finite() {
            mass
        } else {
            tracing::warn!(mass, "invalid mass, using default");
            let fallback = self.params.default_mass;
            if fallback > 0.0 && fallback.is_finite() {
                fallback
            } else {
                1.0
            }
        }
    }

    /// Remove a mass together with every spring attached to it
    pub fn remove_mass(&mut self, id: MassId) -> Option<Mass> {
        let mass = self.masses.remove(id)?;
        let before = self.springs.len();
        self.springs.retain(|_, spring| !spring.connects(id));
        if self.controlled == Some(id) {
            self.controlled = None;
        }
        tracing::debug!(
            ?id,
            springs_removed = before - self.springs.len(),
            "removed mass"
        );
        Some(mass)
    }

    /// Connect two masses. The rest length is their current distance and never
    /// changes afterwards.
    ///
    /// Returns `None` if `a == b` or either id is not in this world. Duplicate
    /// springs between the same pair are allowed.
    pub fn add_spring(&mut self, a: MassId, b: MassId, stiffness: f64) -> Option<SpringId> {
        if a == b {
            return None;
        }
        let rest_length = self.masses.get(a)?.position.distance(self.masses.get(b)?.position);
        let id = self.springs.insert(Spring::new(a, b, rest_length, stiffness));
        tracing::debug!(?id, rest_length, stiffness, "added spring");
        Some(id)
    }

    /// Connect two masses with the configured default stiffness
    pub fn add_spring_default(&mut self, a: MassId, b: MassId) -> Option<SpringId> {
        self.add_spring(a, b, self.params.stiffness)
    }

    /// Remove one spring. Its masses are untouched.
    pub fn remove_spring(&mut self, id: SpringId) -> Option<Spring> {
        let spring = self.springs.remove(id)?;
        tracing::debug!(?id, "removed spring");
        Some(spring)
    }

    /// Whether any spring already joins `a` and `b`, in either direction
    pub fn are_connected(&self, a: MassId, b: MassId) -> bool {
        self.springs
            .values()
            .any(|s| (s.a == a && s.b == b) || (s.a == b && s.b == a))
    }

    /// Drop every mass, spring, force vector, and energy sample
    pub fn clear(&mut self) {
        self.masses.clear();
        self.springs.clear();
        self.force_vectors.clear();
        self.history.clear();
        self.energy = EnergySnapshot::default();
        self.controlled = None;
    }

    /// Clear the world, then rebuild the seed topology: a fixed anchor and a
    /// free bob joined by one spring.
    pub fn reset(&mut self) {
        self.clear();
        if let Some(seed) = self.seed {
            let mass = self.params.default_mass;
            let anchor = self.add_fixed_mass(seed.anchor, mass);
            let bob = self.add_mass(seed.bob, mass);
            self.add_spring_default(anchor, bob);
        }
        self.energy = self.compute_energy();
        tracing::debug!(masses = self.masses.len(), "world reset");
    }

    // =========================================================================
    // External control
    // =========================================================================

    /// Exclude one mass from integration while the host moves it (dragging).
    /// It still receives forces.
    pub fn set_externally_controlled_mass(&mut self, id: Option<MassId>) {
        self.controlled = id.filter(|id| self.masses.contains_key(*id));
    }

    /// Mass currently excluded from integration, if any
    pub fn externally_controlled_mass(&self) -> Option<MassId> {
        self.controlled
    }

    /// Overwrite a mass position. Taken as ground truth on the next step.
    pub fn set_mass_position(&mut self, id: MassId, position: Vec2) -> bool {
        match self.masses.get_mut(id) {
            Some(mass) => {
                mass.position = position;
                true
            }
            None => false,
        }
    }

    /// Overwrite a mass velocity. Returns `false` for a stale id.
    pub fn set_mass_velocity(&mut self, id: MassId, velocity: Vec2) -> bool {
        match self.masses.get_mut(id) {
            Some(mass) => {
                mass.velocity = velocity;
                true
            }
            None => false,
        }
    }

    /// Pin or release a mass. Pinning zeroes its velocity.
    pub fn set_mass_fixed(&mut self, id: MassId, fixed: bool) -> bool {
        match self.masses.get_mut(id) {
            Some(mass) => {
                mass.fixed = fixed;
                if fixed {
                    mass.velocity = Vec2::ZERO;
                }
                true
            }
            None => false,
        }
    }

    /// Nearest mass whose center lies within `radius` of `point`
    pub fn find_mass_near(&self, point: Vec2, radius: f64) -> Option<MassId> {
        let radius_sq = radius * radius;
        self.masses
            .iter()
            .map(|(id, m)| (id, (m.position - point).length_squared()))
            .filter(|(_, d)| *d <= radius_sq)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Current parameters
    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Set the default stiffness and apply it to every live spring
    pub fn set_stiffness(&mut self, stiffness: f64) {
        self.params.stiffness = stiffness;
        for spring in self.springs.values_mut() {
            spring.stiffness = stiffness;
        }
    }

    /// Change the stiffness of one spring only
    pub fn set_spring_stiffness(&mut self, id: SpringId, stiffness: f64) -> bool {
        match self.springs.get_mut(id) {
            Some(spring) => {
                spring.stiffness = stiffness;
                true
            }
            None => false,
        }
    }

    /// Spring damping coefficient, also drives air drag
    pub fn set_damping(&mut self, damping: f64) {
        self.params.damping = damping;
    }

    /// Downward acceleration applied to every free mass
    pub fn set_gravity(&mut self, gravity: f64) {
        self.params.gravity = gravity;
    }

    /// Mass used for new masses and as the fallback for invalid ones.
    /// Non-positive or non-finite values are ignored.
    pub fn set_default_mass(&mut self, mass: f64) {
        if !(mass > 0.0 && mass.is_finite()) {
            tracing::warn!(mass, "invalid default mass, keeping {}", self.params.default_mass);
            return;
        }
        self.params.default_mass = mass;
    }

    /// Freeze stepping. `step` still reports energy.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Continue stepping after `pause`
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Whether `step` is currently a no-op
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Toggle force-vector generation. Disabling drops the current list.
    pub fn set_show_forces(&mut self, show: bool) {
        self.show_forces = show;
        if !show {
            self.force_vectors.clear();
        }
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    /// Advance the world by `dt` seconds inside a `width` x `height` box.
    ///
    /// The caller is expected to clamp `dt` (around 0.035s) to keep explicit
    /// integration stable. While paused nothing moves and no sample is
    /// recorded; the current energy is still returned.
    pub fn step(&mut self, dt: f64, width: f64, height: f64) -> EnergySnapshot {
        if self.paused {
            return self.compute_energy();
        }

        for mass in self.masses.values_mut() {
            mass.reset_force();
        }
        self.force_vectors.clear();

        self.accumulate_spring_forces();
        self.accumulate_body_forces();
        self.integrate(dt, width, height);

        self.energy = self.compute_energy();
        self.history.push(self.energy);
        tracing::trace!(
            dt,
            kinetic = self.energy.kinetic,
            potential = self.energy.potential,
            "stepped"
        );
        self.energy
    }

    fn accumulate_spring_forces(&mut self) {
        let damping = self.params.damping;
        let scale = self.params.force_vector_scale;

        for spring in self.springs.values() {
            let (Some(a), Some(b)) = (self.masses.get(spring.a), self.masses.get(spring.b)) else {
                continue;
            };

            let delta = b.position - a.position;
            let distance = delta.length().max(MIN_SPRING_LENGTH);
            let direction = delta * (1.0 / distance);

            let extension = distance - spring.rest_length;
            let relative_velocity = b.velocity - a.velocity;
            let magnitude =
                spring.stiffness * extension + damping * relative_velocity.dot(direction);
            let force = direction * magnitude;

            if self.show_forces {
                self.force_vectors
                    .push(ForceVector::new(a.position, force, scale, ForceKind::Spring));
                self.force_vectors
                    .push(ForceVector::new(b.position, -force, scale, ForceKind::Spring));
            }

            if let Some(a) = self.masses.get_mut(spring.a).filter(|m| !m.fixed) {
                a.add_force(force);
            }
            if let Some(b) = self.masses.get_mut(spring.b).filter(|m| !m.fixed) {
                b.add_force(-force);
            }
        }
    }

    fn accumulate_body_forces(&mut self) {
        let gravity = self.params.gravity;
        let drag = self.params.damping * AIR_DRAG_FACTOR;
        let scale = self.params.force_vector_scale;

        for mass in self.masses.values_mut().filter(|m| !m.fixed) {
            let weight = Vec2::new(0.0, mass.mass * gravity);
            let air = -mass.velocity * drag;
            mass.add_force(weight);
            mass.add_force(air);

            if self.show_forces {
                self.force_vectors
                    .push(ForceVector::new(mass.position, weight, scale, ForceKind::Gravity));
                self.force_vectors
                    .push(ForceVector::new(mass.position, air, scale, ForceKind::Drag));
            }
        }
    }

    fn integrate(&mut self, dt: f64, width: f64, height: f64) {
        let guard = self.params.guard;
        let boundary = self.params.boundary;
        let min = Vec2::new(boundary.margin, boundary.margin);
        let max = Vec2::new(width - boundary.margin, height - boundary.margin);

        for (id, mass) in self.masses.iter_mut() {
            if mass.fixed || self.controlled == Some(id) {
                continue;
            }

            if let Some(limit) = guard.max_force {
                mass.force = mass.force.clamp_axes(limit);
            }

            mass.velocity += mass.force * (dt / mass.mass);
            if let Some(limit) = guard.max_velocity {
                mass.velocity = mass.velocity.clamp_axes(limit);
            }
            mass.position += mass.velocity * dt;

            if mass.position.x < min.x {
                mass.position.x = min.x;
                mass.velocity.x = -mass.velocity.x * boundary.restitution;
                mass.velocity.y *= boundary.friction;
            } else if mass.position.x > max.x {
                mass.position.x = max.x;
                mass.velocity.x = -mass.velocity.x * boundary.restitution;
                mass.velocity.y *= boundary.friction;
            }

            if mass.position.y < min.y {
                mass.position.y = min.y;
                mass.velocity.y = -mass.velocity.y * boundary.restitution;
                mass.velocity.x *= boundary.friction;
            } else if mass.position.y > max.y {
                mass.position.y = max.y;
                mass.velocity.y = -mass.velocity.y * boundary.restitution;
                mass.velocity.x *= boundary.friction;
            }
        }
    }

    /// Kinetic, gravitational, and elastic energy of the current state
    pub fn compute_energy(&self) -> EnergySnapshot {
        let gravity = self.params.gravity;
        let kinetic: f64 = self.masses.values().map(Mass::kinetic_energy).sum();
        let gravitational: f64 = self
            .masses
            .values()
            .map(|m| m.gravitational_energy(gravity))
            .sum();
        let elastic: f64 = self
            .springs
            .iter()
            .filter_map(|(id, s)| Some(s.elastic_energy(self.spring_extension(id)?)))
            .sum();
        EnergySnapshot::new(kinetic, gravitational + elastic)
    }

    // =========================================================================
    // Read-out
    // =========================================================================

    /// Look up a mass by id
    pub fn mass(&self, id: MassId) -> Option<&Mass> {
        self.masses.get(id)
    }

    /// Mutable access for hosts that edit a mass directly
    pub fn mass_mut(&mut self, id: MassId) -> Option<&mut Mass> {
        self.masses.get_mut(id)
    }

    /// Look up a spring by id
    pub fn spring(&self, id: SpringId) -> Option<&Spring> {
        self.springs.get(id)
    }

    /// All masses in arena order
    pub fn masses(&self) -> impl Iterator<Item = (MassId, &Mass)> {
        self.masses.iter()
    }

    /// All springs in arena order
    pub fn springs(&self) -> impl Iterator<Item = (SpringId, &Spring)> {
        self.springs.iter()
    }

    pub fn mass_count(&self) -> usize {
        self.masses.len()
    }

    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    /// Current length minus rest length
    pub fn spring_extension(&self, id: SpringId) -> Option<f64> {
        let spring = self.springs.get(id)?;
        let a = self.masses.get(spring.a)?;
        let b = self.masses.get(spring.b)?;
        Some(a.position.distance(b.position) - spring.rest_length)
    }

    /// Segments from the last step (empty unless forces are shown)
    pub fn force_vectors(&self) -> &[ForceVector] {
        &self.force_vectors
    }

    /// Energy from the last step or reset
    pub fn energy(&self) -> EnergySnapshot {
        self.energy
    }

    /// Recorded energy samples, oldest first
    pub fn energy_history(&self) -> &EnergyHistory {
        &self.history
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(SimulationParams::default())
    }
}
