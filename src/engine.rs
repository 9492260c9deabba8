//! The RAPTOR-style outer loop (spec §4.4): round `k` extends round
//! `k-1`'s frontier by riding (Phase A) then transferring (Phase B).
//!
//! Structurally this mirrors the teacher's `raptor_query`: one mutable
//! frontier threaded through a `for k in 1..K` loop, with a `marked`
//! set reset and rebuilt every round rather than recomputed from
//! scratch. The difference is that every bucket here holds a *bag* of
//! mutually non-dominated labels (spec §3, §4.5) instead of a single
//! best-known arrival time per stop.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use chrono::Duration;
use indexmap::IndexSet;

use crate::cost::{CostModel, DepartureInstant};
use crate::error::{CoreError, CoreResult};
use crate::frontier::FrontierStore;
use crate::ids::{Criterion, Direction, LineId, OrderIndex, RiderProfile, StationId, BOARDING_LINE};
use crate::label::{Label, LabelArena, LabelHandle};
use crate::network::NetworkIndex;

pub const DEFAULT_MAX_ROUNDS: u32 = 5;
pub const MIN_MAX_ROUNDS: u32 = 1;
pub const MAX_MAX_ROUNDS: u32 = 8;

/// Per-query configuration (spec §6 lists the recognized bounds; this is
/// the ambient builder surface a caller accumulates before running a
/// search, the way the teacher's `Raptor` struct accumulates
/// `set_transfer_time_for_stop` calls before `query`).
#[derive(Clone)]
pub struct SearchConfig {
    max_rounds: u32,
    epsilon: Option<f64>,
    bucket_cap: Option<usize>,
    deadline: Option<Instant>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            epsilon: None,
            bucket_cap: None,
            deadline: None,
        }
    }
}

impl SearchConfig {
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds.clamp(MIN_MAX_ROUNDS, MAX_MAX_ROUNDS);
        self
    }

    /// ε-similarity is disabled by default (spec §9 Design Notes).
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    pub fn with_bucket_cap(mut self, cap: usize) -> Self {
        self.bucket_cap = Some(cap);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }
}

/// The result of one search: the label arena that owns every label
/// minted, the handles of labels whose `current_station` lies in the
/// destination set, and whether the deadline cut the search short
/// (spec §5 Cancellation, §7 `Deadline`).
pub struct SearchOutcome {
    pub arena: LabelArena,
    pub destination_labels: Vec<LabelHandle>,
    pub partial: bool,
}

/// Tracks stations whose frontier changed this round, in the order they
/// were first touched (spec §4.4 Determinism).
#[derive(Default)]
struct MarkedStations {
    order: IndexSet<StationId>,
}

impl MarkedStations {
    fn mark(&mut self, station: &StationId) {
        self.order.insert(station.clone());
    }

    fn iter(&self) -> impl Iterator<Item = &StationId> {
        self.order.iter()
    }

    fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn clear(&mut self) {
        self.order.clear();
    }
}

/// Runs a query to completion (or until the deadline/round budget is
/// exhausted). Returns the arena and destination-reaching labels for
/// [`crate::ranker::Ranker`] to collapse into a ranked list.
pub fn search(
    index: &NetworkIndex,
    cost_model: &CostModel,
    origin: &StationId,
    destinations: &[StationId],
    departure: DepartureInstant,
    profile: RiderProfile,
    weights: &HashMap<Criterion, f64>,
    config: &SearchConfig,
) -> CoreResult<SearchOutcome> {
    if !index.contains_station(origin) {
        return Err(CoreError::UnknownStation(origin.clone()));
    }
    if destinations.is_empty() {
        return Err(CoreError::EmptyDestinationSet);
    }
    for destination in destinations {
        if !index.contains_station(destination) {
            return Err(CoreError::UnknownStation(destination.clone()));
        }
    }

    let mut arena = LabelArena::new();
    let mut frontier = FrontierStore::new(config.epsilon, config.bucket_cap);
    let mut marked = MarkedStations::default();
    let mut integrity_offenders: HashSet<(LineId, Direction)> = HashSet::new();

    let root = Label::root(origin.clone(), LineId::new(BOARDING_LINE), Direction::Ascending, 0);
    let root_handle = arena.insert(root);
    frontier.try_insert(root_handle, &arena, weights);
    marked.mark(origin);

    let mut partial = false;

    for round in 1..=config.max_rounds {
        if let Some(deadline) = config.deadline {
            if Instant::now() >= deadline {
                partial = true;
                break;
            }
        }
        if marked.is_empty() {
            break;
        }

        log::debug!("round {round}: {} marked station(s)", marked.order.len());

        // Phase A (Ride).
        let mut phase_a_admissions: Vec<(StationId, LabelHandle)> = Vec::new();
        let riders: Vec<StationId> = marked.iter().cloned().collect();
        marked.clear();

        for station in &riders {
            for (line, direction) in index.lines_at(station).to_vec() {
                let boarding_labels = eligible_boarders(&frontier, &arena, station, &line);
                for boarding_handle in boarding_labels {
                    ride_line(
                        index,
                        cost_model,
                        &mut arena,
                        &mut frontier,
                        &mut marked,
                        &mut phase_a_admissions,
                        &mut integrity_offenders,
                        weights,
                        boarding_handle,
                        &line,
                        direction,
                        departure,
                        profile,
                        round,
                    );
                }
            }
        }

        // Phase B (Transfer). The origin's first boarding is already
        // covered by Phase A's `is_first_move` allowance, so the origin
        // itself does not need a seed entry here (see DESIGN.md).
        for (station, parent_handle) in phase_a_admissions {
            let parent_line_dir = {
                let parent = arena.get(parent_handle);
                (parent.current_line.clone(), parent.current_direction)
            };
            for (to_line, to_direction) in index.lines_at(&station).to_vec() {
                if (to_line.clone(), to_direction) == parent_line_dir {
                    continue;
                }
                transfer(
                    cost_model,
                    &mut arena,
                    &mut frontier,
                    &mut marked,
                    weights,
                    parent_handle,
                    &station,
                    &to_line,
                    to_direction,
                    profile,
                    round,
                );
            }
        }
    }

    let mut destination_labels = Vec::new();
    for destination in destinations {
        for key in frontier.keys_at(destination) {
            if let Some(bucket) = frontier.bucket(key) {
                destination_labels.extend_from_slice(bucket.handles());
            }
        }
    }

    Ok(SearchOutcome {
        arena,
        destination_labels,
        partial,
    })
}

/// Labels currently at `station` eligible to board `line`: current line
/// differs, or the label is a first-move (origin or post-transfer) label
/// (spec §4.4 Phase A).
fn eligible_boarders(frontier: &FrontierStore, arena: &LabelArena, station: &StationId, line: &LineId) -> Vec<LabelHandle> {
    frontier
        .labels_at(station)
        .filter(|&h| {
            let label = arena.get(h);
            label.is_first_move || &label.current_line != line
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn ride_line(
    index: &NetworkIndex,
    cost_model: &CostModel,
    arena: &mut LabelArena,
    frontier: &mut FrontierStore,
    marked: &mut MarkedStations,
    phase_a_admissions: &mut Vec<(StationId, LabelHandle)>,
    integrity_offenders: &mut HashSet<(LineId, Direction)>,
    weights: &HashMap<Criterion, f64>,
    boarding_handle: LabelHandle,
    line: &LineId,
    direction: Direction,
    base_departure: DepartureInstant,
    profile: RiderProfile,
    round: u32,
) {
    let board_station = arena.get(boarding_handle).current_station.clone();
    let Some(board_order) = index.order_of(&board_station, line, direction) else {
        log_integrity_once(integrity_offenders, line, direction, "boarding station missing order index");
        return;
    };
    let Some(seq) = index.sequence(line, direction) else {
        return;
    };
    let seq_len = seq.len() as OrderIndex;

    let mut parent_handle = boarding_handle;
    let mut parent_order = board_order;

    let mut order = board_order + 1;
    while order < seq_len {
        let Some(station) = seq.station_at(order).cloned() else {
            break;
        };
        let parent = arena.get(parent_handle);
        if parent.visited_stations.contains(&station) {
            order += 1;
            continue;
        }

        let depart_at = base_departure + Duration::seconds((parent.arrival_time * 60.0).round() as i64);
        let duration = cost_model.segment_duration(line, direction, parent_order, order, depart_at);
        let congestion = cost_model.ride_congestion(line, direction, parent_order, order, depart_at, profile);
        let convenience = cost_model.ride_convenience(line, direction, parent_order, order, profile);

        let (duration, congestion, convenience) = match (duration, congestion, convenience) {
            (Some(d), Some(c), Some(v)) => (d, c, v),
            _ => {
                log_integrity_once(integrity_offenders, line, direction, "missing segment metadata mid-ride");
                break;
            }
        };

        let parent = arena.get(parent_handle);
        let child = Label {
            arrival_time: parent.arrival_time + duration,
            transfers: parent.transfers,
            convenience_sum: parent.convenience_sum + convenience,
            congestion_sum: parent.congestion_sum + congestion,
            max_transfer_difficulty: parent.max_transfer_difficulty,
            depth: parent.depth + 1,
            current_station: station.clone(),
            current_line: line.clone(),
            current_direction: direction,
            parent: Some(parent_handle),
            visited_stations: parent.visited_stations.insert(station.clone()),
            transfer_info: None,
            is_first_move: false,
            created_round: round,
        };
        let child_handle = arena.insert(child);
        let admitted = frontier.try_insert(child_handle, arena, weights);
        if admitted {
            marked.mark(&station);
            phase_a_admissions.push((station.clone(), child_handle));
        }

        parent_handle = child_handle;
        parent_order = order;
        order += 1;
    }
}

#[allow(clippy::too_many_arguments)]
fn transfer(
    cost_model: &CostModel,
    arena: &mut LabelArena,
    frontier: &mut FrontierStore,
    marked: &mut MarkedStations,
    weights: &HashMap<Criterion, f64>,
    parent_handle: LabelHandle,
    station: &StationId,
    to_line: &LineId,
    to_direction: Direction,
    profile: RiderProfile,
    round: u32,
) {
    let parent = arena.get(parent_handle);
    let (walk_minutes, difficulty, convenience_delta, congestion_delta) = cost_model.transfer(
        station,
        &parent.current_line,
        parent.current_direction,
        to_line,
        to_direction,
        profile,
    );

    let child = Label {
        arrival_time: parent.arrival_time + walk_minutes,
        transfers: parent.transfers + 1,
        convenience_sum: parent.convenience_sum + convenience_delta,
        congestion_sum: parent.congestion_sum + congestion_delta,
        max_transfer_difficulty: parent.max_transfer_difficulty.max(difficulty),
        depth: parent.depth + 1,
        current_station: station.clone(),
        current_line: to_line.clone(),
        current_direction: to_direction,
        parent: Some(parent_handle),
        visited_stations: parent.visited_stations.clone(),
        transfer_info: Some((station.clone(), parent.current_line.clone(), to_line.clone())),
        is_first_move: true,
        created_round: round,
    };
    let child_handle = arena.insert(child);
    if frontier.try_insert(child_handle, arena, weights) {
        marked.mark(station);
    }
}

fn log_integrity_once(seen: &mut HashSet<(LineId, Direction)>, line: &LineId, direction: Direction, message: &str) {
    let key = (line.clone(), direction);
    if seen.insert(key) {
        log::warn!("data integrity: {line} ({direction}): {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracles::{Catalog, ConvenienceRecord, Distance, SectionRecord, StationRecord, TransferRecord};
    use chrono::{TimeZone, Utc};

    struct LineCatalog {
        stations: Vec<&'static str>,
        lines: Vec<(&'static str, Vec<&'static str>)>,
    }

    impl Catalog for LineCatalog {
        fn stations(&self) -> Vec<StationRecord> {
            self.stations
                .iter()
                .map(|id| StationRecord {
                    id: StationId::new(*id),
                    name: id.to_string(),
                    latitude: 0.0,
                    longitude: 0.0,
                })
                .collect()
        }
        fn station(&self, id: &StationId) -> Option<StationRecord> {
            self.stations().into_iter().find(|s| &s.id == id)
        }
        fn sections(&self, _line: Option<&LineId>) -> Vec<SectionRecord> {
            let mut out = Vec::new();
            for (line, stations) in &self.lines {
                for (order, station) in stations.iter().enumerate() {
                    out.push(SectionRecord {
                        line: LineId::new(*line),
                        direction: Direction::Ascending,
                        order: order as u32,
                        station: StationId::new(*station),
                        base_duration_minutes: 3.0,
                        congestion_multiplier: 0.2,
                    });
                }
            }
            out
        }
        fn convenience_scores(&self) -> Vec<ConvenienceRecord> {
            Vec::new()
        }
        fn transfers(&self) -> Vec<TransferRecord> {
            Vec::new()
        }
    }

    struct FlatDistance;
    impl Distance for FlatDistance {
        fn euclid_or_walk(&self, _a: &StationId, _b: &StationId) -> f64 {
            2.0
        }
    }

    fn noon() -> DepartureInstant {
        Utc.with_ymd_and_hms(2026, 7, 28, 12, 0, 0).unwrap()
    }

    #[test]
    fn same_origin_and_destination_is_free() {
        let catalog = LineCatalog {
            stations: vec!["X"],
            lines: vec![("L1", vec!["X"])],
        };
        let index = NetworkIndex::build(&catalog).unwrap();
        let distance = FlatDistance;
        let model = CostModel::new(&index, &distance);
        let weights = HashMap::new();
        let outcome = search(
            &index,
            &model,
            &StationId::new("X"),
            &[StationId::new("X")],
            noon(),
            RiderProfile::Phy,
            &weights,
            &SearchConfig::default(),
        )
        .unwrap();
        assert_eq!(outcome.destination_labels.len(), 1);
        let label = outcome.arena.get(outcome.destination_labels[0]);
        assert_eq!(label.arrival_time, 0.0);
        assert_eq!(label.transfers, 0);
    }

    #[test]
    fn empty_destination_set_is_an_error() {
        let catalog = LineCatalog {
            stations: vec!["X"],
            lines: vec![("L1", vec!["X"])],
        };
        let index = NetworkIndex::build(&catalog).unwrap();
        let distance = FlatDistance;
        let model = CostModel::new(&index, &distance);
        let weights = HashMap::new();
        let result = search(
            &index,
            &model,
            &StationId::new("X"),
            &[],
            noon(),
            RiderProfile::Phy,
            &weights,
            &SearchConfig::default(),
        );
        assert!(matches!(result, Err(CoreError::EmptyDestinationSet)));
    }

    #[test]
    fn reaches_destination_on_single_line() {
        let catalog = LineCatalog {
            stations: vec!["A", "B", "C"],
            lines: vec![("L1", vec!["A", "B", "C"])],
        };
        let index = NetworkIndex::build(&catalog).unwrap();
        let distance = FlatDistance;
        let model = CostModel::new(&index, &distance);
        let weights = HashMap::new();
        let outcome = search(
            &index,
            &model,
            &StationId::new("A"),
            &[StationId::new("C")],
            noon(),
            RiderProfile::Phy,
            &weights,
            &SearchConfig::default(),
        )
        .unwrap();
        assert!(!outcome.destination_labels.is_empty());
        let label = outcome.arena.get(outcome.destination_labels[0]);
        assert!(label.arrival_time > 0.0);
        assert_eq!(label.transfers, 0);
    }

    #[test]
    fn no_route_is_empty_not_an_error() {
        let catalog = LineCatalog {
            stations: vec!["A", "B", "Island"],
            lines: vec![("L1", vec!["A", "B"])],
        };
        let index = NetworkIndex::build(&catalog).unwrap();
        let distance = FlatDistance;
        let model = CostModel::new(&index, &distance);
        let weights = HashMap::new();
        let outcome = search(
            &index,
            &model,
            &StationId::new("A"),
            &[StationId::new("Island")],
            noon(),
            RiderProfile::Phy,
            &weights,
            &SearchConfig::default(),
        )
        .unwrap();
        assert!(outcome.destination_labels.is_empty());
    }
}
