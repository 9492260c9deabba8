//! Per-(station, line, transfer-count) bags of non-dominated labels
//! (spec §3, §4.5).

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::ids::{Criterion, LineId, StationId};
use crate::label::{Label, LabelArena, LabelHandle};

pub type BucketKey = (StationId, LineId, u32);

fn equal_on_all_criteria(a: &Label, b: &Label) -> bool {
    a.arrival_time == b.arrival_time
        && a.transfers == b.transfers
        && a.max_transfer_difficulty == b.max_transfer_difficulty
        && a.mean_convenience() == b.mean_convenience()
        && a.mean_congestion() == b.mean_congestion()
}

/// A bag of mutually non-dominated labels at one bucket key. Labels are
/// kept in insertion order (spec §4.4 Determinism: "frontier buckets
/// return labels in insertion order").
#[derive(Default)]
pub struct Bucket {
    handles: Vec<LabelHandle>,
}

impl Bucket {
    pub fn handles(&self) -> &[LabelHandle] {
        &self.handles
    }
}

/// Per-query frontier, one [`Bucket`] per `(station, line, transfers)`.
/// Owned entirely by the query that created it; nothing here is shared
/// across queries (spec §5).
pub struct FrontierStore {
    buckets: IndexMap<BucketKey, Bucket>,
    keys_by_station: IndexMap<StationId, Vec<BucketKey>>,
    epsilon: Option<f64>,
    bucket_cap: Option<usize>,
}

impl FrontierStore {
    pub fn new(epsilon: Option<f64>, bucket_cap: Option<usize>) -> Self {
        Self {
            buckets: IndexMap::new(),
            keys_by_station: IndexMap::new(),
            epsilon,
            bucket_cap,
        }
    }

    pub fn bucket(&self, key: &BucketKey) -> Option<&Bucket> {
        self.buckets.get(key)
    }

    pub fn buckets(&self) -> impl Iterator<Item = (&BucketKey, &Bucket)> {
        self.buckets.iter()
    }

    /// Every bucket key ever opened for `station`, in the order first
    /// opened. Used by [`crate::engine`] to gather destination labels and
    /// to find boarding candidates without scanning the whole frontier.
    pub fn keys_at(&self, station: &StationId) -> &[BucketKey] {
        self.keys_by_station.get(station).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every label handle currently live (non-evicted) at `station`,
    /// across every line and transfer count.
    pub fn labels_at<'a>(&'a self, station: &StationId) -> impl Iterator<Item = LabelHandle> + 'a {
        self.keys_at(station)
            .iter()
            .filter_map(move |key| self.buckets.get(key))
            .flat_map(|bucket| bucket.handles().iter().copied())
    }

    /// Attempts to admit `candidate` per the insertion algorithm in spec
    /// §4.5. Returns `true` iff the bucket changed (the candidate, or
    /// something it dominates, moved): specifically `true` iff the
    /// candidate itself was admitted, which is also what a caller needs
    /// to decide whether the candidate's station counts as "marked" this
    /// round (spec §4.4).
    pub fn try_insert(
        &mut self,
        candidate_handle: LabelHandle,
        arena: &LabelArena,
        weights: &HashMap<Criterion, f64>,
    ) -> bool {
        let candidate = arena.get(candidate_handle);
        let key = candidate.bucket_key();
        if !self.buckets.contains_key(&key) {
            self.keys_by_station.entry(key.0.clone()).or_default().push(key.clone());
        }
        let bucket = self.buckets.entry(key).or_default();

        // Step 1: reject if dominated, or exactly equal, to an incumbent.
        for &existing_handle in &bucket.handles {
            let existing = arena.get(existing_handle);
            if existing.dominates(candidate) || equal_on_all_criteria(existing, candidate) {
                return false;
            }
        }

        // Step 2: evict every incumbent the candidate dominates.
        bucket.handles.retain(|&h| !candidate.dominates(arena.get(h)));

        // Step 3: optional ε-similarity thinning, orthogonal to dominance.
        if let Some(epsilon) = self.epsilon {
            if let Some(pos) = bucket
                .handles
                .iter()
                .position(|&h| candidate.epsilon_similar(arena.get(h), epsilon, weights))
            {
                let incumbent = arena.get(bucket.handles[pos]);
                if candidate.lexicographic_key() < incumbent.lexicographic_key() {
                    bucket.handles[pos] = candidate_handle;
                    return true;
                }
                return false;
            }
        }

        // Step 4: admit.
        bucket.handles.push(candidate_handle);

        if let Some(cap) = self.bucket_cap {
            if bucket.handles.len() > cap {
                let worst_index = bucket
                    .handles
                    .iter()
                    .enumerate()
                    .max_by(|(_, &a), (_, &b)| {
                        arena
                            .get(a)
                            .lexicographic_key()
                            .partial_cmp(&arena.get(b).lexicographic_key())
                            .expect("cost vectors never contain NaN")
                    })
                    .map(|(i, _)| i)
                    .expect("bucket is non-empty after push");
                bucket.handles.remove(worst_index);
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::Direction;
    use rpds::HashTrieSet;

    fn label(station: &str, arrival: f64, convenience: f64, congestion: f64, difficulty: f64) -> Label {
        Label {
            arrival_time: arrival,
            transfers: 0,
            convenience_sum: convenience,
            congestion_sum: congestion,
            max_transfer_difficulty: difficulty,
            depth: 1,
            current_station: StationId::new(station),
            current_line: LineId::new("L1"),
            current_direction: Direction::Ascending,
            parent: None,
            visited_stations: HashTrieSet::new().insert(StationId::new(station)),
            transfer_info: None,
            is_first_move: false,
            created_round: 0,
        }
    }

    #[test]
    fn non_dominated_labels_coexist() {
        let mut arena = LabelArena::new();
        let fast = arena.insert(label("A", 10.0, 1.0, 0.5, 0.1));
        let convenient = arena.insert(label("A", 20.0, 5.0, 0.5, 0.1));
        let mut store = FrontierStore::new(None, None);
        let weights = HashMap::new();
        assert!(store.try_insert(fast, &arena, &weights));
        assert!(store.try_insert(convenient, &arena, &weights));
        let key = arena.get(fast).bucket_key();
        assert_eq!(store.bucket(&key).unwrap().handles().len(), 2);
    }

    #[test]
    fn dominated_candidate_is_rejected() {
        let mut arena = LabelArena::new();
        let better = arena.insert(label("A", 10.0, 3.0, 0.2, 0.1));
        let worse = arena.insert(label("A", 15.0, 3.0, 0.2, 0.1));
        let mut store = FrontierStore::new(None, None);
        let weights = HashMap::new();
        assert!(store.try_insert(better, &arena, &weights));
        assert!(!store.try_insert(worse, &arena, &weights));
    }

    #[test]
    fn admitting_evicts_dominated_incumbents() {
        let mut arena = LabelArena::new();
        let worse = arena.insert(label("A", 15.0, 3.0, 0.2, 0.1));
        let better = arena.insert(label("A", 10.0, 3.0, 0.2, 0.1));
        let mut store = FrontierStore::new(None, None);
        let weights = HashMap::new();
        assert!(store.try_insert(worse, &arena, &weights));
        assert!(store.try_insert(better, &arena, &weights));
        let key = arena.get(better).bucket_key();
        let handles = store.bucket(&key).unwrap().handles();
        assert_eq!(handles, &[better]);
    }

    #[test]
    fn no_two_survivors_dominate_each_other() {
        let mut arena = LabelArena::new();
        let mut store = FrontierStore::new(None, None);
        let weights = HashMap::new();
        for (arrival, convenience) in [(10.0, 1.0), (20.0, 5.0), (12.0, 2.0), (9.0, 0.5)] {
            let h = arena.insert(label("A", arrival, convenience, 0.4, 0.2));
            store.try_insert(h, &arena, &weights);
        }
        let key = arena.get(0).bucket_key();
        let survivors: Vec<_> = store.bucket(&key).unwrap().handles().to_vec();
        for &a in &survivors {
            for &b in &survivors {
                if a != b {
                    assert!(!arena.get(a).dominates(arena.get(b)));
                }
            }
        }
    }
}
