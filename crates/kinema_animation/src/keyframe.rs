//! Keyframed scalar properties
//!
//! An [`AnimatedProperty`] keeps its keyframes sorted ascending by time at all
//! times. Every edit goes through a method that restores the order, so
//! evaluation never sorts and never has to guess.
//!
//! Times are unique within a property. `insert` and `set_time` reject a time
//! that is already taken; `upsert` overwrites the keyframe at that time.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::{KeyframeError, Result};

/// Identifier of a keyframe, unique within its property
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyframeId(pub u32);

/// A single keyframe
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    pub id: KeyframeId,
    /// Time position in caller units (milliseconds in the demos)
    pub time: f64,
    /// Value at this keyframe
    pub value: f64,
    /// Easing for the segment leaving this keyframe toward the next one
    pub easing: Easing,
}

/// A scalar property animated by keyframes
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimatedProperty {
    /// Sorted ascending by time, unique times
    keyframes: Vec<Keyframe>,
    /// Returned when there are no keyframes
    default_value: f64,
    next_id: u32,
}

impl AnimatedProperty {
    /// An empty property that evaluates to `default_value`
    pub fn new(default_value: f64) -> Self {
        Self {
            keyframes: Vec::new(),
            default_value,
            next_id: 0,
        }
    }

    /// Build from unsorted `(time, value, easing)` triples.
    ///
    /// Sorting is stable. When several entries share a time the last one
    /// listed wins. Non-finite times are dropped.
    pub fn from_keyframes<I>(default_value: f64, keyframes: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64, Easing)>,
    {
        let mut property = Self::new(default_value);
        let mut entries: Vec<(f64, f64, Easing)> = keyframes
            .into_iter()
            .filter(|(time, _, _)| {
                let finite = time.is_finite();
                if !finite {
                    tracing::warn!(time, "dropping keyframe with non-finite time");
                }
                finite
            })
            .collect();
        entries.sort_by(|a, b| a.0.total_cmp(&b.0));

        for (time, value, easing) in entries {
            match property.keyframes.last_mut() {
                Some(last) if last.time == time => {
                    last.value = value;
                    last.easing = easing;
                }
                _ => {
                    let id = property.allocate_id();
                    property.keyframes.push(Keyframe {
                        id,
                        time,
                        value,
                        easing,
                    });
                }
            }
        }
        property
    }

    fn allocate_id(&mut self) -> KeyframeId {
        let id = KeyframeId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Index of the first keyframe with `time > t`
    fn upper_bound(&self, t: f64) -> usize {
        self.keyframes.partition_point(|k| k.time <= t)
    }

    fn index_at_time(&self, t: f64) -> Option<usize> {
        let idx = self.upper_bound(t);
        (idx > 0 && self.keyframes[idx - 1].time == t).then(|| idx - 1)
    }

    fn index_of(&self, id: KeyframeId) -> Result<usize> {
        self.keyframes
            .iter()
            .position(|k| k.id == id)
            .ok_or(KeyframeError::UnknownKeyframe(id))
    }

    fn check_time(time: f64) -> Result<()> {
        if time.is_finite() {
            Ok(())
        } else {
            Err(KeyframeError::InvalidTime(time))
        }
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Add a keyframe, rejecting a time that is already taken
    pub fn insert(&mut self, time: f64, value: f64, easing: Easing) -> Result<KeyframeId> {
        Self::check_time(time)?;
        if self.index_at_time(time).is_some() {
            return Err(KeyframeError::DuplicateTime(time));
        }
        let id = self.allocate_id();
        let idx = self.upper_bound(time);
        self.keyframes.insert(
            idx,
            Keyframe {
                id,
                time,
                value,
                easing,
            },
        );
        Ok(id)
    }

    /// Add a keyframe, or overwrite value and easing of the one at `time`
    pub fn upsert(&mut self, time: f64, value: f64, easing: Easing) -> Result<KeyframeId> {
        Self::check_time(time)?;
        match self.index_at_time(time) {
            Some(idx) => {
                let kf = &mut self.keyframes[idx];
                kf.value = value;
                kf.easing = easing;
                Ok(kf.id)
            }
            None => self.insert(time, value, easing),
        }
    }

    /// Remove a keyframe by id
    pub fn remove(&mut self, id: KeyframeId) -> Result<Keyframe> {
        let idx = self.index_of(id)?;
        Ok(self.keyframes.remove(idx))
    }

    /// Move a keyframe in time, keeping the collection sorted
    pub fn set_time(&mut self, id: KeyframeId, time: f64) -> Result<()> {
        Self::check_time(time)?;
        let idx = self.index_of(id)?;
        if self.keyframes[idx].time == time {
            return Ok(());
        }
        if self.index_at_time(time).is_some() {
            return Err(KeyframeError::DuplicateTime(time));
        }
        let mut kf = self.keyframes.remove(idx);
        kf.time = time;
        let idx = self.upper_bound(time);
        self.keyframes.insert(idx, kf);
        Ok(())
    }

    /// Change the value of a keyframe in place
    pub fn set_value(&mut self, id: KeyframeId, value: f64) -> Result<()> {
        let idx = self.index_of(id)?;
        self.keyframes[idx].value = value;
        Ok(())
    }

    /// Change the easing used on the segment leaving this keyframe
    pub fn set_easing(&mut self, id: KeyframeId, easing: Easing) -> Result<()> {
        let idx = self.index_of(id)?;
        self.keyframes[idx].easing = easing;
        Ok(())
    }

    /// Drop every keyframe. Ids keep counting up.
    pub fn clear(&mut self) {
        self.keyframes.clear();
    }

    /// Value returned while there are no keyframes
    pub fn set_default_value(&mut self, value: f64) {
        self.default_value = value;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Look up a keyframe by id
    pub fn keyframe(&self, id: KeyframeId) -> Option<&Keyframe> {
        self.keyframes.iter().find(|k| k.id == id)
    }

    /// Keyframes in ascending time order
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn default_value(&self) -> f64 {
        self.default_value
    }

    /// Time of the first keyframe
    pub fn start_time(&self) -> Option<f64> {
        self.keyframes.first().map(|k| k.time)
    }

    /// Time of the last keyframe
    pub fn end_time(&self) -> Option<f64> {
        self.keyframes.last().map(|k| k.time)
    }

    /// Time between first and last keyframe (0 with fewer than two)
    pub fn duration(&self) -> f64 {
        match (self.start_time(), self.end_time()) {
            (Some(start), Some(end)) => end - start,
            _ => 0.0,
        }
    }

    /// Interpolated value at `time`.
    ///
    /// Holds the first value before the first keyframe and the last value after
    /// the last one. Between keyframes the earlier keyframe's easing shapes
    /// the segment.
    pub fn evaluate(&self, time: f64) -> f64 {
        let (Some(first), Some(last)) = (self.keyframes.first(), self.keyframes.last()) else {
            return self.default_value;
        };

        // Written so NaN lands here too
        if !(time > first.time) {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        let idx = self.upper_bound(time);
        let prev = &self.keyframes[idx - 1];
        let next = &self.keyframes[idx];

        let span = next.time - prev.time;
        if span <= 0.0 {
            return prev.value;
        }

        let progress = (time - prev.time) / span;
        let eased = prev.easing.apply(progress);

        prev.value + (next.value - prev.value) * eased
    }
}

/// Interpolated value of `property` at `time`. See [`AnimatedProperty::evaluate`].
pub fn evaluate(property: &AnimatedProperty, time: f64) -> f64 {
    property.evaluate(time)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times(property: &AnimatedProperty) -> Vec<f64> {
        property.keyframes().iter().map(|k| k.time).collect()
    }

    #[test]
    fn test_insert_keeps_sorted() {
        let mut property = AnimatedProperty::new(0.0);
        property.insert(500.0, 5.0, Easing::Linear).unwrap();
        property.insert(100.0, 1.0, Easing::Linear).unwrap();
        property.insert(300.0, 3.0, Easing::Linear).unwrap();
        assert_eq!(times(&property), vec![100.0, 300.0, 500.0]);
    }

    #[test]
    fn test_insert_rejects_duplicate_time() {
        let mut property = AnimatedProperty::new(0.0);
        property.insert(100.0, 1.0, Easing::Linear).unwrap();
        assert_eq!(
            property.insert(100.0, 2.0, Easing::EaseIn),
            Err(KeyframeError::DuplicateTime(100.0))
        );
        assert_eq!(property.len(), 1);
        assert_eq!(property.keyframes()[0].value, 1.0);
    }

    #[test]
    fn test_insert_rejects_non_finite_time() {
        let mut property = AnimatedProperty::new(0.0);
        assert!(matches!(
            property.insert(f64::NAN, 1.0, Easing::Linear),
            Err(KeyframeError::InvalidTime(_))
        ));
        assert_eq!(
            property.insert(f64::INFINITY, 1.0, Easing::Linear),
            Err(KeyframeError::InvalidTime(f64::INFINITY))
        );
    }

    #[test]
    fn test_upsert_overwrites_at_same_time() {
        let mut property = AnimatedProperty::new(0.0);
        let id = property.insert(100.0, 1.0, Easing::Linear).unwrap();
        let same = property.upsert(100.0, 9.0, Easing::EaseOut).unwrap();
        assert_eq!(id, same);
        assert_eq!(property.len(), 1);
        assert_eq!(property.keyframe(id).unwrap().value, 9.0);
        assert_eq!(property.keyframe(id).unwrap().easing, Easing::EaseOut);
    }

    #[test]
    fn test_ids_are_unique_after_removal() {
        let mut property = AnimatedProperty::new(0.0);
        let a = property.insert(0.0, 0.0, Easing::Linear).unwrap();
        property.remove(a).unwrap();
        let b = property.insert(0.0, 0.0, Easing::Linear).unwrap();
        assert_ne!(a, b);
        assert_eq!(property.remove(a), Err(KeyframeError::UnknownKeyframe(a)));
    }

    #[test]
    fn test_id_counter_wraps() {
        let mut property = AnimatedProperty::new(0.0);
        property.next_id = u32::MAX;
        let last = property.insert(0.0, 0.0, Easing::Linear).unwrap();
        let first = property.insert(1.0, 1.0, Easing::Linear).unwrap();
        assert_eq!(last, KeyframeId(u32::MAX));
        assert_eq!(first, KeyframeId(0));
    }

    #[test]
    fn test_set_time_resorts() {
        let mut property = AnimatedProperty::new(0.0);
        let a = property.insert(100.0, 1.0, Easing::Linear).unwrap();
        property.insert(200.0, 2.0, Easing::Linear).unwrap();
        property.insert(300.0, 3.0, Easing::Linear).unwrap();

        property.set_time(a, 250.0).unwrap();
        assert_eq!(times(&property), vec![200.0, 250.0, 300.0]);
        assert_eq!(property.keyframes()[1].id, a);

        assert_eq!(
            property.set_time(a, 300.0),
            Err(KeyframeError::DuplicateTime(300.0))
        );
        assert_eq!(property.set_time(a, 250.0), Ok(()));
    }

    #[test]
    fn test_from_keyframes_sorts_and_keeps_last_duplicate() {
        let property = AnimatedProperty::from_keyframes(
            0.0,
            [
                (300.0, 3.0, Easing::Linear),
                (100.0, 1.0, Easing::Linear),
                (300.0, 30.0, Easing::EaseIn),
                (f64::NAN, 99.0, Easing::Linear),
            ],
        );
        assert_eq!(times(&property), vec![100.0, 300.0]);
        assert_eq!(property.keyframes()[1].value, 30.0);
        assert_eq!(property.keyframes()[1].easing, Easing::EaseIn);
    }

    #[test]
    fn test_outgoing_easing_shapes_segment() {
        let mut property = AnimatedProperty::new(0.0);
        property.insert(0.0, 0.0, Easing::EaseIn).unwrap();
        property.insert(100.0, 100.0, Easing::Linear).unwrap();
        property.insert(200.0, 0.0, Easing::Linear).unwrap();

        // first segment eased by the keyframe at 0
        assert!((property.evaluate(50.0) - 12.5).abs() < 1e-9);
        // second segment linear
        assert!((property.evaluate(150.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_exact_keyframe_time_returns_its_value() {
        let property = AnimatedProperty::from_keyframes(
            0.0,
            [
                (0.0, 0.0, Easing::EaseInOut),
                (100.0, 7.0, Easing::EaseOut),
                (200.0, 3.0, Easing::Linear),
            ],
        );
        assert_eq!(property.evaluate(100.0), 7.0);
    }

    #[test]
    fn test_nan_query_holds_first_value() {
        let property = AnimatedProperty::from_keyframes(
            0.0,
            [(10.0, 4.0, Easing::Linear), (20.0, 8.0, Easing::Linear)],
        );
        assert_eq!(property.evaluate(f64::NAN), 4.0);
    }

    #[test]
    fn test_single_keyframe_is_constant() {
        let property = AnimatedProperty::from_keyframes(-1.0, [(50.0, 5.0, Easing::EaseIn)]);
        assert_eq!(property.evaluate(0.0), 5.0);
        assert_eq!(property.evaluate(50.0), 5.0);
        assert_eq!(property.evaluate(1e9), 5.0);
        assert_eq!(property.duration(), 0.0);
    }
}
