//! Level picker: selects a level-compatible group of waiting players for one court.
//!
//! Candidates are offered in waiting order. Each bin covers a contiguous level range and
//! collects every candidate that fits; the first bin to fill wins. Bins are tried
//! round-robin starting after the previous winner, so consecutive courts rotate across
//! the level tiers.

use crate::models::{InvariantError, DOUBLE_CAPACITY, MAX_LEVEL, MIN_LEVEL, SINGLE_CAPACITY};

/// Level ranges of the three-tier mode: low, mid and high.
const THREE_TIER_RANGES: [(u8, u8); 3] = [(1, 3), (2, 4), (3, 5)];

/// Collects candidate indices for one level range.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LevelBin {
    /// Number of players to collect.
    pub target: usize,
    pub min_level: u8,
    pub max_level: u8,
    pub indices: Vec<usize>,
}

impl LevelBin {
    pub fn new(target: usize, min_level: u8, max_level: u8) -> Self {
        Self {
            target,
            min_level,
            max_level,
            indices: Vec::with_capacity(target),
        }
    }

    pub fn covers(&self, level: u8) -> bool {
        (self.min_level..=self.max_level).contains(&level)
    }

    /// Offer candidate `start_idx` (and `start_idx + 1` when `with_buddy`).
    /// Returns true when this offer fills the bin.
    pub fn check(
        &mut self,
        start_idx: usize,
        with_buddy: bool,
        level: u8,
        required_level: Option<u8>,
    ) -> bool {
        let space = self.target - self.indices.len();
        let needed = if with_buddy { 2 } else { 1 };
        if space < needed || !self.covers(level) {
            return false;
        }
        if required_level.is_some_and(|required| !self.covers(required)) {
            return false;
        }
        self.indices.push(start_idx);
        if with_buddy {
            self.indices.push(start_idx + 1);
        }
        self.indices.len() == self.target
    }
}

/// Round-robin set of level bins.
#[derive(Clone, Debug)]
pub struct Picker {
    three_level: bool,
    bins: Vec<LevelBin>,
    last_bin: usize,
}

impl Picker {
    pub fn new(three_level: bool) -> Self {
        Self {
            three_level,
            bins: Vec::new(),
            last_bin: if three_level { THREE_TIER_RANGES.len() - 1 } else { 0 },
        }
    }

    pub fn three_level(&self) -> bool {
        self.three_level
    }

    /// Number of level tiers: 1 or 3.
    pub fn nr_levels(&self) -> usize {
        if self.three_level {
            THREE_TIER_RANGES.len()
        } else {
            1
        }
    }

    /// Empty bins for a new selection. The round-robin position is kept.
    pub fn start(&mut self, single: bool) {
        let target = if single {
            SINGLE_CAPACITY
        } else {
            DOUBLE_CAPACITY
        };
        self.bins = if self.three_level {
            THREE_TIER_RANGES
                .iter()
                .map(|&(min, max)| LevelBin::new(target, min, max))
                .collect()
        } else {
            vec![LevelBin::new(target, MIN_LEVEL, MAX_LEVEL)]
        };
    }

    /// Offer a candidate (plus buddy) to all bins, starting after the last winner.
    /// Returns true as soon as a bin is full; that bin becomes the winner.
    pub fn check(
        &mut self,
        start_idx: usize,
        with_buddy: bool,
        level: u8,
        required_level: Option<u8>,
    ) -> bool {
        let n = self.bins.len();
        for i in 0..n {
            let j = (i + self.last_bin + 1) % n;
            if self.bins[j].check(start_idx, with_buddy, level, required_level) {
                self.last_bin = j;
                return true;
            }
        }
        false
    }

    /// Indices collected by the winning bin.
    pub fn result(&self) -> Result<Vec<usize>, InvariantError> {
        let winner = self
            .bins
            .get(self.last_bin)
            .ok_or(InvariantError::PickerMismatch {
                expected: 0,
                collected: 0,
            })?;
        if winner.indices.len() != winner.target {
            return Err(InvariantError::PickerMismatch {
                expected: winner.target,
                collected: winner.indices.len(),
            });
        }
        Ok(winner.indices.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bin_rejects_buddy_without_two_free_slots() {
        let mut bin = LevelBin::new(4, 1, 5);
        assert!(!bin.check(0, false, 1, None));
        assert!(!bin.check(1, false, 1, None));
        assert!(!bin.check(2, false, 1, None));
        assert!(!bin.check(3, true, 1, None));
        assert_eq!(bin.indices, vec![0, 1, 2]);
        assert!(bin.check(5, false, 2, None));
    }

    #[test]
    fn bin_respects_level_range_and_required_level() {
        let mut bin = LevelBin::new(2, 2, 4);
        assert!(!bin.check(0, false, 1, None));
        assert!(!bin.check(1, false, 3, Some(5)));
        assert!(bin.indices.is_empty());
        assert!(!bin.check(2, false, 3, Some(2)));
        assert_eq!(bin.indices, vec![2]);
    }
}
