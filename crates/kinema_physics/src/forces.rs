//! Force visualization segments
//!
//! Regenerated every step when enabled. Not part of the simulation state.

use serde::Serialize;

use crate::vector::Vec2;

/// What produced a drawn force
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ForceKind {
    Spring,
    Gravity,
    Drag,
}

impl ForceKind {
    /// Suggested stroke color for renderers
    pub fn color(self) -> &'static str {
        match self {
            ForceKind::Spring => "#4ecdc4",
            ForceKind::Gravity => "#ff6b6b",
            ForceKind::Drag => "#ffd93d",
        }
    }
}

/// A line segment from a mass along a force it receives
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ForceVector {
    pub from: Vec2,
    pub to: Vec2,
    pub kind: ForceKind,
}

impl ForceVector {
    pub(crate) fn new(origin: Vec2, force: Vec2, scale: f64, kind: ForceKind) -> Self {
        Self {
            from: origin,
            to: origin + force * scale,
            kind,
        }
    }

    pub fn color(&self) -> &'static str {
        self.kind.color()
    }

    pub fn length(&self) -> f64 {
        self.from.distance(self.to)
    }
}
