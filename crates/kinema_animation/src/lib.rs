//! Kinema Animation
//!
//! Keyframe sampling and easing for scalar properties.
//!
//! # Features
//!
//! - **Keyframes**: sorted-on-write tracks with clamped, deterministic sampling
//! - **Easing**: polynomial curves and CSS-style cubic bezier
//! - **Clips**: named properties sampled together
//! - **Playhead**: host-ticked clock with loop and ping-pong modes
//!
//! # Example
//!
//! ```rust
//! use kinema_animation::{AnimatedProperty, Easing};
//!
//! let mut opacity = AnimatedProperty::new(1.0);
//! opacity.insert(0.0, 0.0, Easing::Linear).unwrap();
//! opacity.insert(1000.0, 1.0, Easing::Linear).unwrap();
//!
//! assert_eq!(opacity.evaluate(500.0), 0.5);
//! ```

pub mod clip;
pub mod easing;
pub mod error;
pub mod keyframe;
pub mod playback;

pub use clip::AnimationClip;
pub use easing::Easing;
pub use error::KeyframeError;
pub use keyframe::{evaluate, AnimatedProperty, Keyframe, KeyframeId};
pub use playback::{LoopMode, Playhead};
