#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::sat::literal::{Literal, Variable};
use bit_vec::BitVec;

const DEFAULT_SEED: u64 = 0x5eed;
const DEFAULT_NOISE: f64 = 0.01;

/// Remembers the last polarity of every variable and reuses it on the next
/// decision, occasionally flipped by seeded noise.
#[derive(Clone, Debug)]
pub struct SavedPhases {
    phases: BitVec,
    noise: f64,
    rng: fastrand::Rng,
}

impl Default for SavedPhases {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SavedPhases {
    /// Every variable starts out false.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            phases: BitVec::from_elem(num_vars + 1, false),
            noise: DEFAULT_NOISE,
            rng: fastrand::Rng::with_seed(DEFAULT_SEED),
        }
    }

    #[must_use]
    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    pub fn grow(&mut self, num_vars: usize) {
        if self.phases.len() < num_vars + 1 {
            self.phases.grow(num_vars + 1 - self.phases.len(), false);
        }
    }

    pub fn save(&mut self, lit: Literal) {
        self.phases.set(lit.variable() as usize, lit.polarity());
    }

    pub fn next(&mut self, var: Variable) -> bool {
        let phase = self.phases.get(var as usize).unwrap_or(false);
        phase ^ (self.rng.f64() < self.noise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_phase_is_reused() {
        let mut phases = SavedPhases::new(3).with_noise(0.0);
        assert!(!phases.next(2));
        phases.save(Literal::from(2));
        assert!(phases.next(2));
        phases.save(Literal::from(-2));
        assert!(!phases.next(2));
    }

    #[test]
    fn test_grow() {
        let mut phases = SavedPhases::new(1).with_noise(0.0);
        phases.grow(10);
        phases.save(Literal::from(10));
        assert!(phases.next(10));
    }
}
