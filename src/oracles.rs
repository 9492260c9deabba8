//! Interfaces to collaborators that live outside the core (spec §6).
//!
//! The HTTP shell, the tabular store, the ANP weight calculator, and the
//! distance utility are declared here only as trait contracts and plain
//! data records, never implemented against a real database or HTTP
//! client in this crate. `dev_utils` provides fixture implementations
//! for tests and benches.

use std::collections::HashMap;

use crate::ids::{Criterion, Direction, LineId, RiderProfile, StationId};

/// A station row as the tabular store would hand it back.
#[derive(Clone, Debug)]
pub struct StationRecord {
    pub id: StationId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One ordered (line, direction) stop on a section row.
#[derive(Clone, Debug)]
pub struct SectionRecord {
    pub line: LineId,
    pub direction: Direction,
    pub order: u32,
    pub station: StationId,
    /// Base ride duration, in minutes, from the previous order index on
    /// this (line, direction) to this one. Ignored for `order == 0`.
    pub base_duration_minutes: f64,
    /// Time-of-day congestion multiplier applied to the segment ending
    /// at this order index. Ignored for `order == 0`.
    pub congestion_multiplier: f64,
}

/// Per-station, per-profile convenience score (spec §4.2/§4.3), plus the
/// transfer metadata needed to build `TransferEdge`s between two line
/// memberships that coincide at this station.
#[derive(Clone, Debug)]
pub struct ConvenienceRecord {
    pub station: StationId,
    pub profile: RiderProfile,
    /// Per-visit convenience contribution, expected in roughly `[0, 5]`.
    pub convenience_score: f64,
    /// Ambient congestion contribution at this station for this profile,
    /// expected in roughly `[0, 1.3]`.
    pub congestion_score: f64,
}

/// A transfer edge between two (line, direction) memberships of the same
/// physical station, parametrized per rider profile.
#[derive(Clone, Debug)]
pub struct TransferRecord {
    pub station: StationId,
    pub from_line: LineId,
    pub from_direction: Direction,
    pub to_line: LineId,
    pub to_direction: Direction,
    pub profile: RiderProfile,
    pub walk_minutes: f64,
    /// Normalized to `[0, 1]`.
    pub difficulty: f64,
    pub convenience_delta: f64,
    pub congestion_delta: f64,
}

/// The persistent tabular store (out of scope per spec §1; declared here
/// as the interface the core consumes).
pub trait Catalog {
    fn stations(&self) -> Vec<StationRecord>;
    fn station(&self, id: &StationId) -> Option<StationRecord>;
    fn sections(&self, line: Option<&LineId>) -> Vec<SectionRecord>;
    fn convenience_scores(&self) -> Vec<ConvenienceRecord>;
    fn transfers(&self) -> Vec<TransferRecord>;
}

/// The ANP rider-weight calculator (out of scope per spec §1).
pub trait Weights {
    fn weights_for(&self, profile: RiderProfile) -> HashMap<Criterion, f64>;
}

/// Geographic distance utility (out of scope per spec §1), used by the
/// cost model for transfer walks lacking an explicit `TransferRecord`.
pub trait Distance {
    fn euclid_or_walk(&self, a: &StationId, b: &StationId) -> f64;
}

/// Looks up a weight, defaulting to [`crate::ids::DEFAULT_CRITERION_WEIGHT`]
/// when the profile's map omits the criterion (spec §4.1, §6).
pub fn weight_or_default(weights: &HashMap<Criterion, f64>, criterion: Criterion) -> f64 {
    weights
        .get(&criterion)
        .copied()
        .unwrap_or(crate::ids::DEFAULT_CRITERION_WEIGHT)
}
