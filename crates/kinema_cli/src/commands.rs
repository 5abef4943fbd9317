//! `simulate` and `sample` subcommands

use anyhow::{Context, Result};
use kinema_animation::Playhead;
use kinema_physics::{EnergySnapshot, ForceVector, Vec2};
use serde::Serialize;
use std::io::{BufWriter, Write};

use crate::config::SceneConfig;

/// Hosts keep explicit Euler stable by capping the frame delta
pub const MAX_DT: f64 = 0.035;

#[derive(Serialize)]
struct MassRecord {
    position: Vec2,
    velocity: Vec2,
    fixed: bool,
}

#[derive(Serialize)]
struct StepRecord<'a> {
    step: usize,
    energy: EnergySnapshot,
    masses: Vec<MassRecord>,
    #[serde(skip_serializing_if = "<[ForceVector]>::is_empty")]
    forces: &'a [ForceVector],
}

#[derive(Serialize)]
struct FrameRecord<'a> {
    frame: usize,
    time: f64,
    values: Vec<(&'a str, f64)>,
}

pub struct SimulateOptions {
    pub steps: Option<usize>,
    pub every: usize,
    pub show_forces: bool,
}

/// Step the physics world and print one JSON line every `every` steps
pub fn simulate(scene: &SceneConfig, options: SimulateOptions, out: impl Write) -> Result<()> {
    let physics = scene
        .physics
        .as_ref()
        .context("Scene has no [physics] table")?;

    let mut world = physics.world()?;
    if options.show_forces {
        world.set_show_forces(true);
    }

    let dt = physics.dt.min(MAX_DT);
    if dt < physics.dt {
        tracing::warn!(requested = physics.dt, dt, "clamping time step");
    }
    let [width, height] = physics.bounds;
    let steps = options.steps.unwrap_or(physics.steps);
    let every = options.every.max(1);

    tracing::info!(
        masses = world.mass_count(),
        springs = world.spring_count(),
        steps,
        dt,
        "simulating"
    );

    let mut out = BufWriter::new(out);
    for step in 1..=steps {
        let energy = world.step(dt, width, height);
        if step % every != 0 && step != steps {
            continue;
        }

        let record = StepRecord {
            step,
            energy,
            masses: world
                .masses()
                .map(|(_, m)| MassRecord {
                    position: m.position,
                    velocity: m.velocity,
                    fixed: m.fixed,
                })
                .collect(),
            forces: world.force_vectors(),
        };
        serde_json::to_writer(&mut out, &record)?;
        writeln!(out)?;
    }
    out.flush()?;

    let history = world.energy_history();
    tracing::info!(
        samples = history.len(),
        peak = history.peak_total().unwrap_or(0.0),
        "done"
    );
    Ok(())
}

/// Drive a playhead over the scene's clip and print every frame
pub fn sample(scene: &SceneConfig, frames: Option<usize>, out: impl Write) -> Result<()> {
    let clip = scene.clip();
    if clip.is_empty() {
        anyhow::bail!("Scene has no [animation] properties");
    }

    let playback = &scene.playback;
    let mut head = Playhead::for_clip(&clip)
        .looping(playback.mode)
        .speed(playback.speed);
    head.play();

    let frames = frames.unwrap_or(playback.frames);
    tracing::info!(
        properties = clip.len(),
        duration = head.duration(),
        frames,
        "sampling"
    );

    let mut out = BufWriter::new(out);
    for frame in 0..frames {
        let time = head.time();
        let record = FrameRecord {
            frame,
            time,
            values: clip.sample(time),
        };
        serde_json::to_writer(&mut out, &record)?;
        writeln!(out)?;

        head.tick(playback.frame_ms);
    }
    out.flush()?;

    if !head.is_playing() {
        tracing::debug!(iterations = head.iterations(), "playback finished");
    }
    Ok(())
}
