#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Restart scheduling for the CDCL solver.
//!
//! A restart abandons the current decisions and resumes from the root level,
//! keeping learnt clauses, activities and saved phases. Restarts help the solver
//! leave regions of the search space where early decisions were poor.

/// A restart strategy based on the Luby sequence.
///
/// The sequence `1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8, ...` is scaled by
/// the unit `N`: the solver restarts after `N`, `N`, `2N`, `N`, ... conflicts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Luby<const N: usize> {
    /// Total number of restarts performed.
    restarts: usize,
    /// Conflicts remaining until the next restart.
    restarts_in: usize,
    /// Position in the Luby sequence of the current interval.
    index: usize,
}

impl<const N: usize> Default for Luby<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Luby<N> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            restarts: 0,
            restarts_in: N,
            index: 0,
        }
    }

    /// The `x`-th element (0-based) of the Luby sequence.
    ///
    /// # Arguments
    ///
    /// * `x` - index into the sequence.
    ///
    /// # Returns
    ///
    /// A power of two.
    #[must_use]
    pub fn luby(mut x: usize) -> usize {
        let mut size = 1;
        let mut seq = 0;
        while size < x + 1 {
            seq += 1;
            size = 2 * size + 1;
        }
        while size - 1 != x {
            size = (size - 1) >> 1;
            seq -= 1;
            x %= size;
        }
        1 << seq
    }

    /// Records a conflict.
    ///
    /// # Returns
    ///
    /// `true` when the current interval is used up; the next interval is then
    /// scheduled and the restart counted.
    pub fn should_restart(&mut self) -> bool {
        self.restarts_in = self.restarts_in.saturating_sub(1);
        if self.restarts_in > 0 {
            return false;
        }

        self.restarts += 1;
        self.index += 1;
        self.restarts_in = Self::luby(self.index) * N;
        true
    }

    #[must_use]
    pub const fn num_restarts(&self) -> usize {
        self.restarts
    }
}
