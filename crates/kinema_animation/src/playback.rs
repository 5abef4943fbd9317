//! Host-driven playback clock
//!
//! A [`Playhead`] only tracks time. The host ticks it once per frame and feeds
//! [`Playhead::time`] into [`AnimatedProperty::evaluate`](crate::AnimatedProperty::evaluate)
//! or [`AnimationClip::sample`](crate::AnimationClip::sample).

use serde::{Deserialize, Serialize};

use crate::clip::AnimationClip;

/// What happens when the playhead reaches the end of its range
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoopMode {
    /// Stop at the end
    #[default]
    Once,
    /// Jump back to the start
    Loop,
    /// Alternate between forward and reverse
    PingPong,
}

/// Playback position over a `[start, end]` time range
#[derive(Clone, Debug, PartialEq)]
pub struct Playhead {
    start: f64,
    end: f64,
    time: f64,
    playing: bool,
    mode: LoopMode,
    speed: f64,
    /// Moving backward (ping-pong return leg)
    reversed: bool,
    /// Completed passes over the range
    iterations: u32,
}

impl Playhead {
    /// A stopped playhead at `start`. A reversed range is swapped.
    pub fn new(start: f64, end: f64) -> Self {
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        Self {
            start,
            end,
            time: start,
            playing: false,
            mode: LoopMode::Once,
            speed: 1.0,
            reversed: false,
            iterations: 0,
        }
    }

    /// Cover the keyframe range of a clip (0..0 for an empty clip)
    pub fn for_clip(clip: &AnimationClip) -> Self {
        Self::new(
            clip.start_time().unwrap_or(0.0),
            clip.end_time().unwrap_or(0.0),
        )
    }

    /// Set the loop mode (builder pattern)
    pub fn looping(mut self, mode: LoopMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the playback rate (builder pattern)
    pub fn speed(mut self, speed: f64) -> Self {
        self.set_speed(speed);
        self
    }

    pub fn set_mode(&mut self, mode: LoopMode) {
        self.mode = mode;
    }

    /// Negative or non-finite rates are treated as 0
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
    }

    /// Start or continue playing. Restarts if a `Once` run already finished.
    pub fn play(&mut self) {
        if self.mode == LoopMode::Once && self.time >= self.end {
            self.time = self.start;
        }
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Back to the start, stopped
    pub fn stop(&mut self) {
        self.playing = false;
        self.time = self.start;
        self.reversed = false;
        self.iterations = 0;
    }

    /// Jump to `time`, clamped to the range
    pub fn seek(&mut self, time: f64) {
        if time.is_nan() {
            return;
        }
        self.time = time.clamp(self.start, self.end);
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn mode(&self) -> LoopMode {
        self.mode
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Position within the range (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        let span = self.duration();
        if span <= 0.0 {
            return 1.0;
        }
        ((self.time - self.start) / span).clamp(0.0, 1.0)
    }

    /// Advance by `dt_ms` of wall time, scaled by the playback rate.
    /// Non-positive or non-finite deltas are ignored.
    pub fn tick(&mut self, dt_ms: f64) {
        if !self.playing || !(dt_ms > 0.0 && dt_ms.is_finite()) {
            return;
        }

        let span = self.duration();
        if span <= 0.0 {
            self.time = self.end;
            self.iterations = self.iterations.saturating_add(1);
            if self.mode == LoopMode::Once {
                self.playing = false;
            }
            return;
        }

        let advance = dt_ms * self.speed;
        if !advance.is_finite() {
            return;
        }
        match self.mode {
            LoopMode::Once => {
                self.time += advance;
                if self.time >= self.end {
                    self.time = self.end;
                    self.playing = false;
                    self.iterations = self.iterations.saturating_add(1);
                }
            }
            LoopMode::Loop => {
                let offset = self.time - self.start + advance;
                let wraps = (offset / span).floor() as u32;
                self.iterations = self.iterations.saturating_add(wraps);
                self.time = self.start + offset.rem_euclid(span);
            }
            LoopMode::PingPong => {
                // Unfold the bounce onto a line of length 2 * span
                let period = 2.0 * span;
                let phase = if self.reversed {
                    period - (self.time - self.start)
                } else {
                    self.time - self.start
                };
                let unfolded = phase + advance;
                let bounces = ((unfolded / span).floor() as u32)
                    .saturating_sub((phase / span).floor() as u32);
                self.iterations = self.iterations.saturating_add(bounces);

                let folded = unfolded.rem_euclid(period);
                if folded <= span {
                    self.reversed = false;
                    self.time = self.start + folded;
                } else {
                    self.reversed = true;
                    self.time = self.start + period - folded;
                }
            }
        }
    }
}
