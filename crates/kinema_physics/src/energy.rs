//! Energy bookkeeping

use std::collections::VecDeque;

use serde::Serialize;

/// Energy totals for one step
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct EnergySnapshot {
    pub kinetic: f64,
    /// Gravitational plus elastic
    pub potential: f64,
    pub total: f64,
}

impl EnergySnapshot {
    pub fn new(kinetic: f64, potential: f64) -> Self {
        Self {
            kinetic,
            potential,
            total: kinetic + potential,
        }
    }
}

/// Bounded ring of recent snapshots. The oldest sample is dropped when full.
#[derive(Clone, Debug)]
pub struct EnergyHistory {
    samples: VecDeque<EnergySnapshot>,
    capacity: usize,
}

impl EnergyHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: EnergySnapshot) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&EnergySnapshot> {
        self.samples.back()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &EnergySnapshot> {
        self.samples.iter()
    }

    /// Largest total in the window, for scaling a graph
    pub fn peak_total(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.total).reduce(f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_is_sum() {
        let s = EnergySnapshot::new(2.0, 3.5);
        assert_eq!(s.total, 5.5);
    }

    #[test]
    fn test_ring_drops_oldest() {
        let mut history = EnergyHistory::with_capacity(3);
        for i in 0..5 {
            history.push(EnergySnapshot::new(i as f64, 0.0));
        }
        assert_eq!(history.len(), 3);
        let kinetic: Vec<f64> = history.iter().map(|s| s.kinetic).collect();
        assert_eq!(kinetic, vec![2.0, 3.0, 4.0]);
        assert_eq!(history.latest().map(|s| s.kinetic), Some(4.0));
        assert_eq!(history.peak_total(), Some(4.0));
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut history = EnergyHistory::with_capacity(0);
        history.push(EnergySnapshot::default());
        history.push(EnergySnapshot::new(1.0, 1.0));
        assert_eq!(history.len(), 1);
    }
}
