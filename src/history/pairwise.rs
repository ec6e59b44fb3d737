//! Pairwise win/loss records
//!
//! Each unordered pair `{x, y}` is stored once under a canonical key whose
//! `first` member is the lexicographically smaller id. Tallies are kept from
//! the canonical orientation and flipped on read to match the caller's
//! argument order.

use crate::types::TeamId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Canonical key for an unordered pair of teams
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    pub first: TeamId,
    pub second: TeamId,
}

impl PairKey {
    /// Canonicalize two ids; returns the key and whether `a` is `first`
    pub fn new(a: &str, b: &str) -> (Self, bool) {
        if a <= b {
            (
                Self {
                    first: a.to_string(),
                    second: b.to_string(),
                },
                true,
            )
        } else {
            (
                Self {
                    first: b.to_string(),
                    second: a.to_string(),
                },
                false,
            )
        }
    }
}

/// Wins of each side in canonical orientation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairRecord {
    pub first_wins: u32,
    pub second_wins: u32,
}

impl PairRecord {
    pub fn total(&self) -> u32 {
        self.first_wins + self.second_wins
    }

    fn oriented(self, a_is_first: bool) -> (u32, u32) {
        if a_is_first {
            (self.first_wins, self.second_wins)
        } else {
            (self.second_wins, self.first_wins)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PairwiseHistory {
    records: HashMap<PairKey, PairRecord>,
}

impl PairwiseHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one series between `a` and `b`
    pub fn add_result(&mut self, a_id: &str, b_id: &str, a_won: bool) {
        let (key, a_is_first) = PairKey::new(a_id, b_id);
        let record = self.records.entry(key).or_default();

        if a_won == a_is_first {
            record.first_wins += 1;
        } else {
            record.second_wins += 1;
        }
    }

    /// `(a_wins, b_wins)` in argument order; `(0, 0)` if they never met
    pub fn get_record(&self, a_id: &str, b_id: &str) -> (u32, u32) {
        let (key, a_is_first) = PairKey::new(a_id, b_id);
        self.records
            .get(&key)
            .map(|record| record.oriented(a_is_first))
            .unwrap_or((0, 0))
    }

    /// Total series played between the two teams
    pub fn games_between(&self, a_id: &str, b_id: &str) -> u32 {
        let (a_wins, b_wins) = self.get_record(a_id, b_id);
        a_wins + b_wins
    }

    pub fn records(&self) -> &HashMap<PairKey, PairRecord> {
        &self.records
    }

    /// Overwrite the record for a canonical pair, e.g. when restoring a model
    pub fn insert_record(&mut self, key: PairKey, record: PairRecord) {
        self.records.insert(key, record);
    }

    pub fn replace_all(&mut self, records: HashMap<PairKey, PairRecord>) {
        self.records = records;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_is_canonical() {
        let (key_ab, a_first) = PairKey::new("alpha", "beta");
        let (key_ba, b_first) = PairKey::new("beta", "alpha");

        assert_eq!(key_ab, key_ba);
        assert_eq!(key_ab.first, "alpha");
        assert!(a_first);
        assert!(!b_first);
    }

    #[test]
    fn test_unknown_pair_is_empty() {
        let history = PairwiseHistory::new();
        assert_eq!(history.get_record("x", "y"), (0, 0));
        assert_eq!(history.games_between("x", "y"), 0);
    }

    #[test]
    fn test_records_are_reciprocal() {
        let mut history = PairwiseHistory::new();
        history.add_result("zeta", "alpha", true);
        history.add_result("zeta", "alpha", true);
        history.add_result("alpha", "zeta", true);

        assert_eq!(history.get_record("zeta", "alpha"), (2, 1));
        assert_eq!(history.get_record("alpha", "zeta"), (1, 2));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_canonical_orientation_in_storage() {
        let mut history = PairwiseHistory::new();
        history.add_result("b", "a", true);

        let (key, _) = PairKey::new("a", "b");
        let record = history.records()[&key];
        assert_eq!(record.first_wins, 0);
        assert_eq!(record.second_wins, 1);
        assert_eq!(record.total(), 1);
    }

    #[test]
    fn test_three_straight_wins() {
        let mut history = PairwiseHistory::new();
        for _ in 0..3 {
            history.add_result("x", "y", true);
        }
        assert_eq!(history.get_record("x", "y"), (3, 0));
        assert_eq!(history.get_record("y", "x"), (0, 3));
    }
}
