//! Bounded, insertion-ordered buffer of accepted results.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::model::AnalysisResult;

/// Default number of results kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// FIFO buffer of [`AnalysisResult`]s. Appends go to the tail; once the
/// buffer is over capacity the oldest entries are evicted from the head.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    entries: VecDeque<AnalysisResult>,
    capacity: usize,
}

impl HistoryStore {
    /// # Panics
    /// If `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be positive");
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn append(&mut self, result: AnalysisResult) {
        self.entries.push_back(result);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn latest(&self) -> Option<&AnalysisResult> {
        self.entries.back()
    }

    /// Oldest-first copy of the buffer. Holders cannot reach the live store.
    pub fn snapshot(&self) -> Arc<[AnalysisResult]> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{at, report};
    use proptest::prelude::*;

    fn numbered(n: i64) -> AnalysisResult {
        report(n % 101, n).accept(at(n)).unwrap()
    }

    #[test]
    fn empty_store_has_no_latest() {
        let store = HistoryStore::default();
        assert!(store.latest().is_none());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn latest_is_last_appended() {
        let mut store = HistoryStore::with_capacity(3);
        store.append(numbered(1));
        store.append(numbered(2));
        assert_eq!(store.latest().unwrap().people_count(), 2);
    }

    #[test]
    fn twenty_five_appends_keep_the_last_twenty() {
        let mut store = HistoryStore::default();
        for n in 1..=25 {
            store.append(numbered(n));
        }
        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 20);
        let people: Vec<u32> = snapshot.iter().map(|r| r.people_count()).collect();
        assert_eq!(people, (6..=25).collect::<Vec<u32>>());
    }

    #[test]
    fn snapshot_is_detached_from_the_store() {
        let mut store = HistoryStore::with_capacity(2);
        store.append(numbered(1));
        let before = store.snapshot();
        store.append(numbered(2));
        store.append(numbered(3));
        assert_eq!(before.len(), 1);
        assert_eq!(before[0].people_count(), 1);
    }

    #[test]
    #[should_panic(expected = "history capacity must be positive")]
    fn zero_capacity_is_rejected() {
        HistoryStore::with_capacity(0);
    }

    proptest! {
        #[test]
        fn keeps_last_capacity_entries_in_order(capacity in 1usize..32, n in 0i64..100) {
            let mut store = HistoryStore::with_capacity(capacity);
            for i in 0..n {
                store.append(numbered(i));
            }
            let snapshot = store.snapshot();
            let expected_len = (n as usize).min(capacity);
            prop_assert_eq!(snapshot.len(), expected_len);

            let first = n - expected_len as i64;
            for (offset, entry) in snapshot.iter().enumerate() {
                prop_assert_eq!(i64::from(entry.people_count()), first + offset as i64);
            }
        }
    }
}
