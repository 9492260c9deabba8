//! Pure, side-effect-free segment/transfer cost functions (spec §4.3).
//!
//! Every function here is deterministic: same inputs produce the same
//! outputs, with no I/O and no hidden state, so that [`crate::engine`]
//! can treat this module as an oracle the way the teacher's `raptor_query`
//! treats `network.stop_times` as a pure lookup table.

use chrono::{DateTime, Timelike, Utc};

use crate::ids::{Direction, LineId, OrderIndex, RiderProfile, StationId};
use crate::network::NetworkIndex;
use crate::oracles::Distance;

/// Timezone-aware departure instant (spec §6).
pub type DepartureInstant = DateTime<Utc>;

/// Morning and evening peak hours apply a congestion/duration multiplier
/// on top of each segment's own `congestion_multiplier`, modeling the
/// "time-of-day congestion multiplier" spec §3 assigns to a `Segment`.
fn time_of_day_factor(instant: DepartureInstant) -> f64 {
    match instant.hour() {
        7..=9 | 17..=19 => 1.2,
        _ => 1.0,
    }
}

/// Fallback values used when a `TransferRecord` is absent from the
/// catalog for a given (station, from_line, to_line, profile) combination.
/// Walk duration falls back to the geographic distance oracle; difficulty
/// defaults to a conservative midpoint rather than zero, so missing data
/// never looks like a free, trivial transfer.
const FALLBACK_TRANSFER_DIFFICULTY: f64 = 0.5;

pub struct CostModel<'a> {
    index: &'a NetworkIndex,
    distance: &'a dyn Distance,
}

impl<'a> CostModel<'a> {
    pub fn new(index: &'a NetworkIndex, distance: &'a dyn Distance) -> Self {
        Self { index, distance }
    }

    /// Total ride duration, in minutes, from `from_order` to `to_order`
    /// (exclusive of the boarding stop, inclusive of the alighting stop)
    /// on one (line, direction). Returns `None` if any order index in the
    /// range is missing from the index (a data-integrity condition the
    /// caller logs once and treats as a terminated exploration branch,
    /// spec §4.4 Failure semantics).
    ///
    /// Monotone nondecreasing in `to_order - from_order`: each additional
    /// hop adds a nonnegative `base_duration_minutes * time_of_day_factor`
    /// term, and is independent of how `from_order` was reached.
    pub fn segment_duration(
        &self,
        line: &LineId,
        direction: Direction,
        from_order: OrderIndex,
        to_order: OrderIndex,
        depart: DepartureInstant,
    ) -> Option<f64> {
        debug_assert!(to_order > from_order);
        let factor = time_of_day_factor(depart);
        let mut total = 0.0;
        for order in (from_order + 1)..=to_order {
            let segment = self.index.segment_arriving_at(line, direction, order)?;
            total += segment.base_duration_minutes * factor;
        }
        Some(total)
    }

    /// Summed congestion contribution across every station visited from
    /// `from_order` (exclusive) to `to_order` (inclusive).
    pub fn ride_congestion(
        &self,
        line: &LineId,
        direction: Direction,
        from_order: OrderIndex,
        to_order: OrderIndex,
        depart: DepartureInstant,
        profile: RiderProfile,
    ) -> Option<f64> {
        debug_assert!(to_order > from_order);
        let seq = self.index.sequence(line, direction)?;
        let factor = time_of_day_factor(depart);
        let mut total = 0.0;
        for order in (from_order + 1)..=to_order {
            let segment = seq.segment_arriving_at(order)?;
            let station = seq.station_at(order)?;
            let ambient = self
                .index
                .convenience(station, profile)
                .map(|c| c.congestion_score)
                .unwrap_or(0.0);
            total += segment.congestion_multiplier * factor + ambient;
        }
        Some(total)
    }

    /// Summed convenience contribution across every station visited from
    /// `from_order` (exclusive) to `to_order` (inclusive).
    pub fn ride_convenience(
        &self,
        line: &LineId,
        direction: Direction,
        from_order: OrderIndex,
        to_order: OrderIndex,
        profile: RiderProfile,
    ) -> Option<f64> {
        debug_assert!(to_order > from_order);
        let seq = self.index.sequence(line, direction)?;
        let mut total = 0.0;
        for order in (from_order + 1)..=to_order {
            let station = seq.station_at(order)?;
            total += self
                .index
                .convenience(station, profile)
                .map(|c| c.convenience_score)
                .unwrap_or(0.0);
        }
        Some(total)
    }

    /// `(walk_minutes, difficulty in [0,1], convenience_delta, congestion_delta)`
    /// for a cross-line transfer at `station`. Falls back to the distance
    /// oracle and a conservative default difficulty when the catalog has
    /// no explicit `TransferRecord` for this combination.
    pub fn transfer(
        &self,
        station: &StationId,
        from_line: &LineId,
        from_direction: Direction,
        to_line: &LineId,
        to_direction: Direction,
        profile: RiderProfile,
    ) -> (f64, f64, f64, f64) {
        if let Some(record) = self.index.transfer_record(station, from_line, from_direction, to_line, to_direction, profile) {
            return (
                record.walk_minutes,
                record.difficulty,
                record.convenience_delta,
                record.congestion_delta,
            );
        }
        let walk_minutes = self.distance.euclid_or_walk(station, station).max(0.5);
        (walk_minutes, FALLBACK_TRANSFER_DIFFICULTY, 0.0, 0.0)
    }
}
