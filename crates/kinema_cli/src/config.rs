//! Scene file handling

use anyhow::{Context, Result};
use indexmap::IndexMap;
use kinema_animation::{AnimatedProperty, AnimationClip, Easing, LoopMode};
use kinema_physics::{PhysicsWorld, SimulationParams, Vec2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level scene (scene.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub physics: Option<PhysicsScene>,
    /// Property name to keyframes, sampled in file order
    #[serde(default)]
    pub animation: IndexMap<String, PropertyConfig>,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

/// Mass-spring setup and stepping
#[derive(Debug, Deserialize, Serialize)]
pub struct PhysicsScene {
    #[serde(default)]
    pub params: SimulationParams,
    /// Box the masses bounce in
    #[serde(default = "default_bounds")]
    pub bounds: [f64; 2],
    /// Seconds per step
    #[serde(default = "default_dt")]
    pub dt: f64,
    #[serde(default = "default_steps")]
    pub steps: usize,
    #[serde(default)]
    pub show_forces: bool,
    /// Empty means use the default seed topology
    #[serde(default)]
    pub masses: Vec<MassConfig>,
    #[serde(default)]
    pub springs: Vec<SpringConfig>,
}

fn default_bounds() -> [f64; 2] {
    [800.0, 600.0]
}

fn default_dt() -> f64 {
    1.0 / 60.0
}

fn default_steps() -> usize {
    600
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MassConfig {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub vx: f64,
    #[serde(default)]
    pub vy: f64,
    /// Falls back to `params.default_mass`
    #[serde(default)]
    pub mass: Option<f64>,
    #[serde(default)]
    pub fixed: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SpringConfig {
    /// Index into `masses`
    pub a: usize,
    pub b: usize,
    /// Falls back to `params.stiffness`
    #[serde(default)]
    pub stiffness: Option<f64>,
}

/// One keyframed property
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PropertyConfig {
    #[serde(default)]
    pub default: f64,
    #[serde(default)]
    pub keyframes: Vec<KeyframeConfig>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct KeyframeConfig {
    pub time: f64,
    pub value: f64,
    #[serde(default)]
    pub easing: Easing,
}

/// How `sample` drives the playhead
#[derive(Debug, Deserialize, Serialize)]
pub struct PlaybackConfig {
    #[serde(default)]
    pub mode: LoopMode,
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Milliseconds per frame
    #[serde(default = "default_frame_ms")]
    pub frame_ms: f64,
    #[serde(default = "default_frames")]
    pub frames: usize,
}

fn default_speed() -> f64 {
    1.0
}

fn default_frame_ms() -> f64 {
    16.0
}

fn default_frames() -> usize {
    60
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            mode: LoopMode::Once,
            speed: default_speed(),
            frame_ms: default_frame_ms(),
            frames: default_frames(),
        }
    }
}

impl SceneConfig {
    /// Load and validate a scene file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("No scene found at {}", path.display());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to load {}", path.display()))
    }

    /// Parse and validate scene TOML
    pub fn parse(content: &str) -> Result<Self> {
        let scene: SceneConfig = toml::from_str(content).context("Invalid scene TOML")?;
        scene.validate()?;
        Ok(scene)
    }

    fn validate(&self) -> Result<()> {
        if let Some(physics) = &self.physics {
            physics
                .params
                .validate()
                .context("Invalid physics parameters")?;

            let count = physics.masses.len();
            for (i, spring) in physics.springs.iter().enumerate() {
                if spring.a >= count || spring.b >= count {
                    anyhow::bail!(
                        "Spring {} references mass {} but only {} masses are defined",
                        i,
                        spring.a.max(spring.b),
                        count
                    );
                }
                if spring.a == spring.b {
                    anyhow::bail!("Spring {} connects mass {} to itself", i, spring.a);
                }
            }
        }
        Ok(())
    }

    /// Build the keyframe clip described by `[animation.*]`
    pub fn clip(&self) -> AnimationClip {
        self.animation
            .iter()
            .fold(AnimationClip::new(), |clip, (name, property)| {
                let keyframes = property
                    .keyframes
                    .iter()
                    .map(|k| (k.time, k.value, k.easing));
                clip.with_property(
                    name.clone(),
                    AnimatedProperty::from_keyframes(property.default, keyframes),
                )
            })
    }
}

impl PhysicsScene {
    /// Build a world from the listed masses and springs, or the seed if none
    pub fn world(&self) -> Result<PhysicsWorld> {
        let mut world = PhysicsWorld::new(self.params);
        world.set_show_forces(self.show_forces);

        if self.masses.is_empty() {
            world.reset();
            return Ok(world);
        }

        let ids: Vec<_> = self
            .masses
            .iter()
            .map(|m| {
                let position = Vec2::new(m.x, m.y);
                let mass = m.mass.unwrap_or(self.params.default_mass);
                let id = if m.fixed {
                    world.add_fixed_mass(position, mass)
                } else {
                    world.add_mass(position, mass)
                };
                world.set_mass_velocity(id, Vec2::new(m.vx, m.vy));
                id
            })
            .collect();

        for (i, spring) in self.springs.iter().enumerate() {
            let stiffness = spring.stiffness.unwrap_or(self.params.stiffness);
            world
                .add_spring(ids[spring.a], ids[spring.b], stiffness)
                .with_context(|| format!("Spring {} could not be created", i))?;
        }

        Ok(world)
    }
}
