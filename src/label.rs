//! The label algebra (spec §3, §4.1): an immutable-after-construction
//! record of a partial or complete journey, plus the arena that owns the
//! parent-pointer tree.
//!
//! Labels never embed their own route; they hold only a handle to their
//! parent, the way the teacher's `Boarding`/`TauEntry` chain holds only
//! `boarded_stop` and lets `Journey::from_tau` walk it backwards. Per
//! spec §9 Design Notes, this keeps each extension O(1) instead of O(depth).

use std::collections::HashMap;

use rpds::HashTrieSet;

use crate::ids::{Criterion, Direction, LineId, RiderProfile, StationId};
use crate::network::NetworkIndex;
use crate::oracles::weight_or_default;

pub type LabelHandle = u32;

/// Fixed normalization denominators from spec §4.1, chosen so typical
/// values land near 1. These are load-bearing constants carried over
/// from the Python prototype (`label.py::get_normalized_vector`), not
/// re-derived here.
const NORM_ARRIVAL_MINUTES: f64 = 90.0;
const NORM_TRANSFERS: f64 = 3.0;
const NORM_CONVENIENCE_MAX: f64 = 5.0;
const NORM_CONGESTION_MAX: f64 = 1.3;

/// Denominators used only by the weighted penalty (spec §4.1), distinct
/// from the ones above because the penalty caps instead of scaling.
const PENALTY_ARRIVAL_MINUTES: f64 = 120.0;
const PENALTY_TRANSFERS: f64 = 4.0;

#[derive(Clone)]
pub struct Label {
    pub arrival_time: f64,
    pub transfers: u32,
    pub convenience_sum: f64,
    pub congestion_sum: f64,
    pub max_transfer_difficulty: f64,
    pub depth: u32,
    pub current_station: StationId,
    pub current_line: LineId,
    pub current_direction: Direction,
    pub parent: Option<LabelHandle>,
    pub visited_stations: HashTrieSet<StationId>,
    pub transfer_info: Option<(StationId, LineId, LineId)>,
    pub is_first_move: bool,
    pub created_round: u32,
}

impl Label {
    pub fn root(station: StationId, line: LineId, direction: Direction, created_round: u32) -> Self {
        let visited = HashTrieSet::new().insert(station.clone());
        Self {
            arrival_time: 0.0,
            transfers: 0,
            convenience_sum: 0.0,
            congestion_sum: 0.0,
            max_transfer_difficulty: 0.0,
            depth: 1,
            current_station: station,
            current_line: line,
            current_direction: direction,
            parent: None,
            visited_stations: visited,
            transfer_info: None,
            is_first_move: true,
            created_round,
        }
    }

    pub fn mean_convenience(&self) -> f64 {
        self.convenience_sum / self.depth as f64
    }

    pub fn mean_congestion(&self) -> f64 {
        self.congestion_sum / self.depth as f64
    }

    /// Bucket identity used by `FrontierStore` (spec §4.1, §4.5).
    pub fn bucket_key(&self) -> (StationId, LineId, u32) {
        (self.current_station.clone(), self.current_line.clone(), self.transfers)
    }

    /// `[arrival/90, transfers/3, max_difficulty, mean_convenience/5, mean_congestion/1.3]` (spec §4.1).
    pub fn normalized_vector(&self) -> [f64; 5] {
        [
            self.arrival_time / NORM_ARRIVAL_MINUTES,
            self.transfers as f64 / NORM_TRANSFERS,
            self.max_transfer_difficulty,
            self.mean_convenience() / NORM_CONVENIENCE_MAX,
            self.mean_congestion() / NORM_CONGESTION_MAX,
        ]
    }

    /// Strict-Pareto dominance, defined only within a shared bucket (spec
    /// §4.1). Callers must only compare labels with equal `bucket_key()`;
    /// this method does not itself check station/line/transfers equality
    /// because `FrontierStore` only ever calls it within one bucket.
    pub fn dominates(&self, other: &Label) -> bool {
        let mut strictly_better = false;

        macro_rules! minimize {
            ($field:expr) => {{
                let (a, b) = ($field(self), $field(other));
                if a > b {
                    return false;
                }
                if a < b {
                    strictly_better = true;
                }
            }};
        }

        minimize!(|l: &Label| l.arrival_time);
        minimize!(|l: &Label| l.max_transfer_difficulty);
        minimize!(|l: &Label| l.mean_congestion());

        let (a, b) = (self.mean_convenience(), other.mean_convenience());
        if a < b {
            return false;
        }
        if a > b {
            strictly_better = true;
        }

        strictly_better
    }

    /// Weighted Euclidean distance over the normalized cost vector (spec
    /// §4.1), used only for optional ε-similarity thinning, never for
    /// dominance pruning.
    pub fn weighted_distance(&self, other: &Label, weights: &HashMap<Criterion, f64>) -> f64 {
        let a = self.normalized_vector();
        let b = other.normalized_vector();
        let mut sum_sq = 0.0;
        for (criterion, (av, bv)) in Criterion::ALL.iter().zip(a.iter().zip(b.iter())) {
            let w = weight_or_default(weights, *criterion);
            let diff = av - bv;
            sum_sq += w * diff * diff;
        }
        sum_sq.sqrt()
    }

    pub fn epsilon_similar(&self, other: &Label, epsilon: f64, weights: &HashMap<Criterion, f64>) -> bool {
        self.weighted_distance(other, weights) <= epsilon
    }

    /// Lexicographic tie-break key used both by ε-similarity eviction
    /// (spec §4.5 step 3) and by deterministic ordering within a bucket
    /// (spec §4.4 Determinism): `(arrival_time, max_difficulty, transfers,
    /// congestion_mean, -convenience_mean)`.
    pub fn lexicographic_key(&self) -> (f64, f64, u32, f64, f64) {
        (
            self.arrival_time,
            self.max_transfer_difficulty,
            self.transfers,
            self.mean_congestion(),
            -self.mean_convenience(),
        )
    }

    /// Weighted penalty used only by the ranker, never by pruning (spec
    /// §4.1, §9: "this separation is load-bearing").
    pub fn weighted_penalty(&self, weights: &HashMap<Criterion, f64>) -> f64 {
        let norm_time = (self.arrival_time / PENALTY_ARRIVAL_MINUTES).min(1.0);
        let norm_transfers = (self.transfers as f64 / PENALTY_TRANSFERS).min(1.0);
        let norm_difficulty = self.max_transfer_difficulty;
        let norm_convenience = 1.0 - (self.mean_convenience() / NORM_CONVENIENCE_MAX);
        let norm_congestion = self.mean_congestion().min(1.0);

        weight_or_default(weights, Criterion::TravelTime) * norm_time
            + weight_or_default(weights, Criterion::Transfers) * norm_transfers
            + weight_or_default(weights, Criterion::TransferDifficulty) * norm_difficulty
            + weight_or_default(weights, Criterion::Convenience) * norm_convenience
            + weight_or_default(weights, Criterion::Congestion) * norm_congestion
    }
}

/// Append-only arena owning every label minted during one query. Parents
/// are handles into this arena rather than owned/shared pointers, so
/// dropping a frontier bucket entry never needs to walk or free anything
/// here (spec §5 Memory, §9 Design Notes).
#[derive(Default)]
pub struct LabelArena {
    labels: Vec<Label>,
}

impl LabelArena {
    pub fn new() -> Self {
        Self { labels: Vec::new() }
    }

    pub fn insert(&mut self, label: Label) -> LabelHandle {
        let handle = self.labels.len() as LabelHandle;
        self.labels.push(label);
        handle
    }

    pub fn get(&self, handle: LabelHandle) -> &Label {
        &self.labels[handle as usize]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// The three derived listings spec §4.1 defines for reconstruction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconstruction {
    pub route: Vec<StationId>,
    pub line_track: Vec<LineId>,
    pub transfer_list: Vec<(StationId, LineId, LineId)>,
}

impl LabelArena {
    /// Walks parent pointers from `handle` to the root and rebuilds the
    /// full route, its per-station line track, and the transfer list
    /// (spec §4.1). Requires `index` to enumerate intermediate stations
    /// between same-line consecutive labels; without line-sequence data
    /// the caller should treat a missing chain lookup as a truncated
    /// sweep (spec property 7 only requires completeness "when
    /// line-segment indices are provided").
    pub fn reconstruct(&self, handle: LabelHandle, index: &NetworkIndex) -> Reconstruction {
        let mut chain = Vec::new();
        let mut cur = Some(handle);
        while let Some(h) = cur {
            chain.push(h);
            cur = self.get(h).parent;
        }
        chain.reverse();

        let mut route = Vec::new();
        let mut line_track = Vec::new();
        let mut transfer_list = Vec::new();

        for (i, &h) in chain.iter().enumerate() {
            let label = self.get(h);
            if let Some(info) = &label.transfer_info {
                transfer_list.push(info.clone());
            }

            if i == 0 {
                route.push(label.current_station.clone());
                line_track.push(label.current_line.clone());
                continue;
            }

            let prev = self.get(chain[i - 1]);
            let is_transfer = label.transfer_info.is_some();

            if is_transfer {
                if label.current_station != prev.current_station {
                    route.push(label.current_station.clone());
                    line_track.push(label.current_line.clone());
                }
                continue;
            }

            match index
                .order_of(&prev.current_station, &label.current_line, label.current_direction)
                .zip(index.order_of(&label.current_station, &label.current_line, label.current_direction))
                .and_then(|(from_order, to_order)| {
                    index
                        .sequence(&label.current_line, label.current_direction)
                        .map(|seq| (from_order, to_order, seq))
                }) {
                Some((from_order, to_order, seq)) if to_order > from_order => {
                    for order in (from_order + 1)..=to_order {
                        if let Some(station) = seq.station_at(order) {
                            route.push(station.clone());
                            line_track.push(label.current_line.clone());
                        }
                    }
                }
                _ => {
                    route.push(label.current_station.clone());
                    line_track.push(label.current_line.clone());
                }
            }
        }

        Reconstruction {
            route,
            line_track,
            transfer_list,
        }
    }
}
