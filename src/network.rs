//! Read-only structures derived from static inputs (spec §4.2).
//!
//! Built once per network snapshot; all lookups are O(1) after
//! [`NetworkIndex::build`]. Mirrors the shape of the teacher's
//! `Network::new`, which likewise derives `stop_routes`/`route_stops`
//! index arrays once from the raw GTFS feed and never touches them
//! again during a query.

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::ids::{Direction, LineId, OrderIndex, RiderProfile, StationId};
use crate::oracles::{Catalog, ConvenienceRecord, SectionRecord, StationRecord, TransferRecord};

#[derive(Clone, Copy, Debug)]
pub struct SegmentMeta {
    pub base_duration_minutes: f64,
    pub congestion_multiplier: f64,
}

/// The ordered station sequence for one (line, direction), plus the
/// reverse `station -> order index` lookup and per-segment metadata.
pub struct LineSequence {
    pub line: LineId,
    pub direction: Direction,
    stations: Vec<StationId>,
    order_of: IndexMap<StationId, OrderIndex>,
    /// `segments[i]` describes the ride from `stations[i]` to `stations[i+1]`.
    segments: Vec<SegmentMeta>,
}

impl LineSequence {
    pub fn stations(&self) -> &[StationId] {
        &self.stations
    }

    pub fn order_of(&self, station: &StationId) -> Option<OrderIndex> {
        self.order_of.get(station).copied()
    }

    pub fn station_at(&self, order: OrderIndex) -> Option<&StationId> {
        self.stations.get(order as usize)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Segment metadata for the hop that *arrives at* `order` (i.e. from
    /// `order - 1` to `order`). `order == 0` has no incoming segment.
    pub fn segment_arriving_at(&self, order: OrderIndex) -> Option<&SegmentMeta> {
        if order == 0 {
            None
        } else {
            self.segments.get(order as usize - 1)
        }
    }
}

type TransferKey = (StationId, LineId, Direction, LineId, Direction, RiderProfile);

/// The read-only network derived from [`Catalog`] rows.
pub struct NetworkIndex {
    stations: IndexMap<StationId, StationRecord>,
    lines: IndexMap<(LineId, Direction), LineSequence>,
    lines_at: IndexMap<StationId, Vec<(LineId, Direction)>>,
    convenience: HashMap<(StationId, RiderProfile), ConvenienceRecord>,
    transfers: HashMap<TransferKey, TransferRecord>,
}

impl NetworkIndex {
    /// Builds the index from catalog rows. Fatal at build time only
    /// (spec §7): a line sequence with a gap, a duplicate order index, or
    /// a section referencing an unknown station is a `DataIntegrity`
    /// error, never raised mid-query.
    pub fn build(catalog: &dyn Catalog) -> CoreResult<Self> {
        let station_rows = catalog.stations();
        let mut stations = IndexMap::with_capacity(station_rows.len());
        for row in station_rows {
            stations.insert(row.id.clone(), row);
        }

        let mut by_line: IndexMap<(LineId, Direction), Vec<SectionRecord>> = IndexMap::new();
        for row in catalog.sections(None) {
            if !stations.contains_key(&row.station) {
                return Err(CoreError::DataIntegrity(format!(
                    "section references unknown station {} on line {} ({})",
                    row.station, row.line, row.direction
                )));
            }
            by_line
                .entry((row.line.clone(), row.direction))
                .or_default()
                .push(row);
        }

        let mut lines = IndexMap::with_capacity(by_line.len());
        let mut lines_at: IndexMap<StationId, Vec<(LineId, Direction)>> = IndexMap::new();
        for ((line, direction), mut rows) in by_line {
            rows.sort_unstable_by_key(|r| r.order);
            let mut ordered_stations = Vec::with_capacity(rows.len());
            let mut order_of = IndexMap::with_capacity(rows.len());
            let mut segments = Vec::with_capacity(rows.len().saturating_sub(1));
            for (expected_order, row) in rows.iter().enumerate() {
                if row.order as usize != expected_order {
                    return Err(CoreError::DataIntegrity(format!(
                        "line {} ({}) has a gap or duplicate at order index {}",
                        line, direction, row.order
                    )));
                }
                if order_of.insert(row.station.clone(), row.order).is_some() {
                    return Err(CoreError::DataIntegrity(format!(
                        "line {} ({}) revisits station {} (loop/branch lines unsupported)",
                        line, direction, row.station
                    )));
                }
                ordered_stations.push(row.station.clone());
                if expected_order > 0 {
                    segments.push(SegmentMeta {
                        base_duration_minutes: row.base_duration_minutes,
                        congestion_multiplier: row.congestion_multiplier,
                    });
                }
                lines_at
                    .entry(row.station.clone())
                    .or_default()
                    .push((line.clone(), direction));
            }

            lines.insert(
                (line.clone(), direction),
                LineSequence {
                    line,
                    direction,
                    stations: ordered_stations,
                    order_of,
                    segments,
                },
            );
        }

        let mut convenience = HashMap::new();
        for row in catalog.convenience_scores() {
            convenience.insert((row.station.clone(), row.profile), row);
        }

        let mut transfers = HashMap::new();
        for row in catalog.transfers() {
            let key = (
                row.station.clone(),
                row.from_line.clone(),
                row.from_direction,
                row.to_line.clone(),
                row.to_direction,
                row.profile,
            );
            transfers.insert(key, row);
        }

        log::info!(
            "network index built: {} stations, {} (line, direction) sequences, {} transfer stations",
            stations.len(),
            lines.len(),
            lines_at.values().filter(|v| v.len() > 1).count(),
        );

        Ok(Self {
            stations,
            lines,
            lines_at,
            convenience,
            transfers,
        })
    }

    pub fn station(&self, id: &StationId) -> Option<&StationRecord> {
        self.stations.get(id)
    }

    pub fn contains_station(&self, id: &StationId) -> bool {
        self.stations.contains_key(id)
    }

    /// Set of (line, direction) memberships at a station, in the
    /// deterministic order sections were supplied (spec §4.4, §9).
    pub fn lines_at(&self, station: &StationId) -> &[(LineId, Direction)] {
        self.lines_at.get(station).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_transfer(&self, station: &StationId) -> bool {
        self.lines_at(station).len() > 1
    }

    pub fn order_of(&self, station: &StationId, line: &LineId, direction: Direction) -> Option<OrderIndex> {
        self.lines.get(&(line.clone(), direction))?.order_of(station)
    }

    pub fn sequence(&self, line: &LineId, direction: Direction) -> Option<&LineSequence> {
        self.lines.get(&(line.clone(), direction))
    }

    /// Predecessor/successor station in the given direction.
    pub fn neighbors(
        &self,
        station: &StationId,
        line: &LineId,
        direction: Direction,
    ) -> Option<(Option<StationId>, Option<StationId>)> {
        let seq = self.sequence(line, direction)?;
        let order = seq.order_of(station)?;
        let pred = order.checked_sub(1).and_then(|o| seq.station_at(o)).cloned();
        let succ = seq.station_at(order + 1).cloned();
        Some((pred, succ))
    }

    pub fn segment_arriving_at(&self, line: &LineId, direction: Direction, order: OrderIndex) -> Option<&SegmentMeta> {
        self.sequence(line, direction)?.segment_arriving_at(order)
    }

    pub fn convenience(&self, station: &StationId, profile: RiderProfile) -> Option<&ConvenienceRecord> {
        self.convenience.get(&(station.clone(), profile))
    }

    pub fn transfer_record(
        &self,
        station: &StationId,
        from_line: &LineId,
        from_direction: Direction,
        to_line: &LineId,
        to_direction: Direction,
        profile: RiderProfile,
    ) -> Option<&TransferRecord> {
        self.transfers.get(&(
            station.clone(),
            from_line.clone(),
            from_direction,
            to_line.clone(),
            to_direction,
            profile,
        ))
    }

    pub fn num_stations(&self) -> usize {
        self.stations.len()
    }

    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }
}
