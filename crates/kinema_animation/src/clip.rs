//! Named groups of animated properties

use indexmap::IndexMap;

use crate::keyframe::AnimatedProperty;

/// A set of properties sampled together at one time, in insertion order
#[derive(Clone, Debug, Default)]
pub struct AnimationClip {
    properties: IndexMap<String, AnimatedProperty>,
}

impl AnimationClip {
    /// An empty clip
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property (builder pattern)
    pub fn with_property(mut self, name: impl Into<String>, property: AnimatedProperty) -> Self {
        self.insert(name, property);
        self
    }

    /// Add or replace a property, returning the previous one
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        property: AnimatedProperty,
    ) -> Option<AnimatedProperty> {
        self.properties.insert(name.into(), property)
    }

    /// Remove a property, keeping the order of the rest
    pub fn remove(&mut self, name: &str) -> Option<AnimatedProperty> {
        self.properties.shift_remove(name)
    }

    /// Look up a property by name
    pub fn get(&self, name: &str) -> Option<&AnimatedProperty> {
        self.properties.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut AnimatedProperty> {
        self.properties.get_mut(name)
    }

    /// Properties in insertion order
    pub fn properties(&self) -> impl Iterator<Item = (&str, &AnimatedProperty)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Value of one property, `None` if it does not exist
    pub fn value(&self, name: &str, time: f64) -> Option<f64> {
        self.properties.get(name).map(|p| p.evaluate(time))
    }

    /// Every property evaluated at `time`
    pub fn sample(&self, time: f64) -> Vec<(&str, f64)> {
        self.properties
            .iter()
            .map(|(name, property)| (name.as_str(), property.evaluate(time)))
            .collect()
    }

    /// Earliest keyframe time across all properties
    pub fn start_time(&self) -> Option<f64> {
        self.properties
            .values()
            .filter_map(AnimatedProperty::start_time)
            .reduce(f64::min)
    }

    /// Latest keyframe time across all properties
    pub fn end_time(&self) -> Option<f64> {
        self.properties
            .values()
            .filter_map(AnimatedProperty::end_time)
            .reduce(f64::max)
    }
}
