//! Bounded transposition table for the minimax search.
//!
//! Direct-mapped: every key owns exactly one slot (`key % capacity`). A new
//! result only replaces the slot content if it was searched at least as deep,
//! so shallow results never overwrite deeper ones.

use log::trace;

/// How the stored score relates to the true value of the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The search completed inside the window.
    Exact,
    /// Score >= stored value (beta cutoff).
    Lower,
    /// Score <= stored value (alpha fail-low).
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub key: u64,
    pub score: i32,
    /// Remaining depth the score was searched with.
    pub depth: usize,
    pub bound: Bound,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    slots: Vec<Option<Entry>>,
    occupied: usize,
}

impl TranspositionTable {
    /// # Panics
    /// If `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "transposition table needs at least one slot");
        Self {
            slots: vec![None; capacity],
            occupied: 0,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.occupied
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    fn slot(&self, key: u64) -> usize {
        (key % self.slots.len() as u64) as usize
    }

    #[must_use]
    pub fn get(&self, key: u64) -> Option<&Entry> {
        self.slots[self.slot(key)]
            .as_ref()
            .filter(|entry| entry.key == key)
    }

    /// Returns the stored score if it was searched at least `depth` deep and
    /// its bound settles the window (`alpha`, `beta`).
    #[must_use]
    pub fn probe(&self, key: u64, depth: usize, alpha: i32, beta: i32) -> Option<i32> {
        let entry = self.get(key)?;
        if entry.depth < depth {
            return None;
        }
        match entry.bound {
            Bound::Exact => Some(entry.score),
            Bound::Lower if entry.score >= beta => Some(entry.score),
            Bound::Upper if entry.score <= alpha => Some(entry.score),
            _ => None,
        }
    }

    /// Stores a result unless the slot holds a deeper one. Returns whether
    /// the result was stored.
    pub fn store(&mut self, key: u64, score: i32, depth: usize, bound: Bound) -> bool {
        let slot = self.slot(key);
        let new = Entry {
            key,
            score,
            depth,
            bound,
        };
        let slot = &mut self.slots[slot];
        match slot {
            Some(old) if old.depth > depth => {
                trace!(
                    "tt: keeping depth {} entry, dropping depth {depth} result",
                    old.depth
                );
                false
            }
            Some(_) => {
                *slot = Some(new);
                true
            }
            None => {
                *slot = Some(new);
                self.occupied += 1;
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_respects_depth_and_bounds() {
        let mut tt = TranspositionTable::new(64);
        assert!(tt.is_empty());
        assert!(tt.store(7, 10, 3, Bound::Exact));
        assert_eq!(tt.len(), 1);

        assert_eq!(tt.probe(7, 3, -100, 100), Some(10));
        assert_eq!(tt.probe(7, 2, -100, 100), Some(10));
        // too shallow
        assert_eq!(tt.probe(7, 4, -100, 100), None);
        // unknown key
        assert_eq!(tt.probe(8, 1, -100, 100), None);

        tt.store(9, 50, 2, Bound::Lower);
        assert_eq!(tt.probe(9, 2, 0, 40), Some(50));
        assert_eq!(tt.probe(9, 2, 0, 60), None);

        tt.store(11, -5, 2, Bound::Upper);
        assert_eq!(tt.probe(11, 2, 0, 40), Some(-5));
        assert_eq!(tt.probe(11, 2, -10, 40), None);
    }

    #[test]
    fn test_depth_preferred_replacement() {
        let mut tt = TranspositionTable::new(4);
        // 1 and 5 share slot 1
        assert!(tt.store(1, 100, 5, Bound::Exact));
        assert!(!tt.store(5, 200, 4, Bound::Exact));
        assert_eq!(tt.get(1).map(|e| e.score), Some(100));
        assert_eq!(tt.get(5), None);

        // equal depth evicts
        assert!(tt.store(5, 200, 5, Bound::Exact));
        assert_eq!(tt.get(1), None);
        assert_eq!(tt.get(5).map(|e| e.score), Some(200));

        // same key, shallower result is dropped as well
        assert!(!tt.store(5, 300, 1, Bound::Exact));
        assert_eq!(tt.get(5).map(|e| e.score), Some(200));
        assert_eq!(tt.len(), 1);
        assert_eq!(tt.capacity(), 4);
    }
}
