//! The public entry point (spec §6): validates inputs, runs
//! [`crate::engine::search`], ranks the destination-reaching labels, and
//! reconstructs each one into a [`RankedResult`].

use std::collections::HashMap;

use crate::cost::{CostModel, DepartureInstant};
use crate::engine::{self, SearchConfig};
use crate::error::{CoreError, CoreResult};
use crate::ids::{Criterion, RiderProfile, StationId};
use crate::network::NetworkIndex;
use crate::ranker;

/// Parses the rider-profile code the HTTP shell receives on the wire
/// (spec §6 Input: `PHY | VIS | AUD | ELD`) into the typed [`RiderProfile`]
/// every other entry point in this crate expects. An unrecognized code is
/// `UnknownProfile`, surfaced to the caller rather than defaulted (spec §7).
pub fn parse_profile(code: &str) -> CoreResult<RiderProfile> {
    RiderProfile::parse(code).ok_or_else(|| CoreError::UnknownProfile(code.to_string()))
}

/// One fully reconstructed, ranked journey (spec §6 Output).
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RankedResult {
    pub rank: usize,
    pub route: Vec<StationId>,
    pub line_track: Vec<crate::ids::LineId>,
    pub transfer_list: Vec<(StationId, crate::ids::LineId, crate::ids::LineId)>,
    pub arrival_minutes: f64,
    pub transfers: u32,
    pub max_transfer_difficulty: f64,
    pub mean_convenience: f64,
    pub mean_congestion: f64,
    pub route_length: usize,
    pub weighted_penalty: f64,
}

/// A completed query: the ranked results plus whether the deadline cut
/// the search short before it converged (spec §5 Cancellation).
pub struct SearchOutcome {
    pub results: Vec<RankedResult>,
    pub partial: bool,
}

/// Runs one accessibility-aware multi-criteria search from `origin` to
/// any station in `destinations`, for `profile`, weighted by `weights`.
///
/// Validates `origin`/`destinations` against `index` and rejects an empty
/// destination set (spec §7) before invoking [`crate::engine::search`].
/// An unreachable destination is not an error: it simply contributes no
/// entries to `results`.
#[allow(clippy::too_many_arguments)]
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
    let outcome = engine::search(index, cost_model, origin, destinations, departure, profile, weights, config)?;

    let ranked = ranker::rank(&outcome.destination_labels, &outcome.arena, weights);

    let results = ranked
        .into_iter()
        .enumerate()
        .map(|(position, entry)| {
            let label = outcome.arena.get(entry.handle);
            let reconstruction = outcome.arena.reconstruct(entry.handle, index);
            RankedResult {
                rank: position + 1,
                route_length: reconstruction.route.len(),
                route: reconstruction.route,
                line_track: reconstruction.line_track,
                transfer_list: reconstruction.transfer_list,
                arrival_minutes: label.arrival_time,
                transfers: label.transfers,
                max_transfer_difficulty: label.max_transfer_difficulty,
                mean_convenience: label.mean_convenience(),
                mean_congestion: label.mean_congestion(),
                weighted_penalty: entry.penalty,
            }
        })
        .collect();

    Ok(SearchOutcome { results, partial: outcome.partial })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{Direction, LineId};
    use crate::oracles::{Catalog, ConvenienceRecord, Distance, SectionRecord, StationRecord, TransferRecord};
    use chrono::{TimeZone, Utc};

    struct LineCatalog;
    impl Catalog for LineCatalog {
        fn stations(&self) -> Vec<StationRecord> {
            ["A", "B", "C"]
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
            ["A", "B", "C"]
                .iter()
                .enumerate()
                .map(|(order, station)| SectionRecord {
                    line: LineId::new("L1"),
                    direction: Direction::Ascending,
                    order: order as u32,
                    station: StationId::new(*station),
                    base_duration_minutes: 5.0,
                    congestion_multiplier: 0.1,
                })
                .collect()
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
            1.0
        }
    }

    #[test]
    fn reconstructs_a_full_route() {
        let index = NetworkIndex::build(&LineCatalog).unwrap();
        let distance = FlatDistance;
        let model = CostModel::new(&index, &distance);
        let weights = HashMap::new();
        let outcome = search(
            &index,
            &model,
            &StationId::new("A"),
            &[StationId::new("C")],
            Utc.with_ymd_and_hms(2026, 7, 28, 12, 0, 0).unwrap(),
            RiderProfile::Phy,
            &weights,
            &SearchConfig::default(),
        )
        .unwrap();
        assert!(!outcome.partial);
        assert_eq!(outcome.results.len(), 1);
        let top = &outcome.results[0];
        assert_eq!(top.rank, 1);
        assert_eq!(top.route, vec![StationId::new("A"), StationId::new("B"), StationId::new("C")]);
    }

    #[test]
    fn unknown_station_is_an_error() {
        let index = NetworkIndex::build(&LineCatalog).unwrap();
        let distance = FlatDistance;
        let model = CostModel::new(&index, &distance);
        let weights = HashMap::new();
        let result = search(
            &index,
            &model,
            &StationId::new("Nowhere"),
            &[StationId::new("C")],
            Utc.with_ymd_and_hms(2026, 7, 28, 12, 0, 0).unwrap(),
            RiderProfile::Phy,
            &weights,
            &SearchConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn parses_known_profile_codes_case_insensitively() {
        assert_eq!(parse_profile("vis").unwrap(), RiderProfile::Vis);
        assert_eq!(parse_profile("ELD").unwrap(), RiderProfile::Eld);
    }

    #[test]
    fn unknown_profile_code_is_an_error() {
        assert!(matches!(parse_profile("XYZ"), Err(CoreError::UnknownProfile(_))));
    }
}
