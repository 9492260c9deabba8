//! Synthetic fixture network and stub collaborators, for tests and
//! benches only. Mirrors the shape of the teacher's own `dev_utils`
//! (`load_example_gtfs`, `build_example_network`, `get_example_scenario`),
//! but builds an in-memory accessibility network instead of loading a
//! GTFS feed from disk: this crate declares no real `Catalog`, and a
//! unit test suite needs something concrete to query against.

use std::collections::HashMap;

use access_raptor::{Criterion, Direction, LineId, RiderProfile, StationId};
use access_raptor::cost::DepartureInstant;
use access_raptor::oracles::{Catalog, ConvenienceRecord, Distance, SectionRecord, StationRecord, TransferRecord, Weights};
use chrono::TimeZone;

/// Station codes used across the fixture network and the integration
/// tests built on top of it.
pub mod station_codes {
    pub const ORCHARD: &str = "2534";
    pub const SOMERSET: &str = "2739";
    pub const DHOBY_GHAUT: &str = "0321";
    pub const CITY_HALL: &str = "0159";
    pub const RAFFLES_PLACE: &str = "2637";
    pub const MARINA_BAY: &str = "2920";
    pub const BUGIS: &str = "0150";
    pub const PROMENADE: &str = "0426";
    pub const ESPLANADE: &str = "A01";
    pub const BAYFRONT: &str = "P313";
    pub const STADIUM: &str = "2537";
    pub const NICOLL: &str = "0427";
    /// Used only for the degenerate same-origin-and-destination scenario.
    pub const SOLO: &str = "X";
}

use station_codes::*;

fn station(id: &str, lat: f64, lon: f64) -> StationRecord {
    StationRecord {
        id: StationId::new(id),
        name: id.to_string(),
        latitude: lat,
        longitude: lon,
    }
}

fn section(line: &str, order: u32, id: &str, duration: f64, congestion: f64) -> SectionRecord {
    SectionRecord {
        line: LineId::new(line),
        direction: Direction::Ascending,
        order,
        station: StationId::new(id),
        base_duration_minutes: duration,
        congestion_multiplier: congestion,
    }
}

fn convenience_record(id: &str, profile: RiderProfile, convenience_score: f64, congestion_score: f64) -> ConvenienceRecord {
    ConvenienceRecord {
        station: StationId::new(id),
        profile,
        convenience_score,
        congestion_score,
    }
}

/// A small, hand-built network with two transfer stations (`CITY_HALL`
/// between the red and blue lines, `PROMENADE` between the green and
/// yellow lines) plus one isolated single-station line for exercising
/// the degenerate same-origin-and-destination scenario.
pub struct FixtureCatalog {
    stations: Vec<StationRecord>,
    sections: Vec<SectionRecord>,
    convenience: Vec<ConvenienceRecord>,
    transfers: Vec<TransferRecord>,
}

impl FixtureCatalog {
    pub fn build() -> Self {
        let stations = vec![
            station(ORCHARD, 1.3041, 103.8318),
            station(SOMERSET, 1.3006, 103.8387),
            station(DHOBY_GHAUT, 1.2988, 103.8456),
            station(CITY_HALL, 1.2931, 103.8520),
            station(RAFFLES_PLACE, 1.2838, 103.8514),
            station(MARINA_BAY, 1.2762, 103.8542),
            station(BUGIS, 1.2984, 103.8558),
            station(PROMENADE, 1.2930, 103.8610),
            station(ESPLANADE, 1.2927, 103.8555),
            station(BAYFRONT, 1.2818, 103.8590),
            station(STADIUM, 1.3006, 103.8753),
            station(NICOLL, 1.3008, 103.8641),
            station(SOLO, 0.0, 0.0),
        ];

        let sections = vec![
            section("RED", 0, ORCHARD, 0.0, 0.0),
            section("RED", 1, SOMERSET, 3.0, 0.2),
            section("RED", 2, DHOBY_GHAUT, 3.0, 0.3),
            section("RED", 3, CITY_HALL, 4.0, 0.4),
            section("BLUE", 0, RAFFLES_PLACE, 0.0, 0.0),
            section("BLUE", 1, MARINA_BAY, 3.0, 0.2),
            section("BLUE", 2, CITY_HALL, 5.0, 0.3),
            section("BLUE", 3, BUGIS, 4.0, 0.4),
            section("GREEN", 0, PROMENADE, 0.0, 0.0),
            section("GREEN", 1, ESPLANADE, 2.0, 0.1),
            section("GREEN", 2, BAYFRONT, 4.0, 0.2),
            section("YELLOW", 0, STADIUM, 0.0, 0.0),
            section("YELLOW", 1, NICOLL, 3.0, 0.1),
            section("YELLOW", 2, PROMENADE, 3.0, 0.2),
            section("SOLO", 0, SOLO, 0.0, 0.0),
        ];

        let mut convenience = Vec::new();
        for &id in &[ORCHARD, SOMERSET, DHOBY_GHAUT, CITY_HALL, RAFFLES_PLACE, MARINA_BAY, BUGIS, PROMENADE, ESPLANADE, BAYFRONT, STADIUM, NICOLL] {
            for profile in RiderProfile::ALL {
                // Interchange stations (CITY_HALL, PROMENADE) are modeled as
                // slightly less convenient and more congested than ordinary
                // stops, and profiles differ in how much that hurts them.
                let is_interchange = id == CITY_HALL || id == PROMENADE;
                let (base_convenience, base_congestion) = if is_interchange { (2.5, 0.8) } else { (4.0, 0.3) };
                let profile_penalty = match profile {
                    RiderProfile::Phy if is_interchange => 1.0,
                    RiderProfile::Eld if is_interchange => 0.5,
                    _ => 0.0,
                };
                convenience.push(convenience_record(id, profile, (base_convenience - profile_penalty).max(0.0), base_congestion));
            }
        }

        let transfers = vec![
            TransferRecord {
                station: StationId::new(CITY_HALL),
                from_line: LineId::new("RED"),
                from_direction: Direction::Ascending,
                to_line: LineId::new("BLUE"),
                to_direction: Direction::Ascending,
                profile: RiderProfile::Phy,
                walk_minutes: 4.0,
                difficulty: 0.6,
                convenience_delta: -0.5,
                congestion_delta: 0.2,
            },
            TransferRecord {
                station: StationId::new(CITY_HALL),
                from_line: LineId::new("BLUE"),
                from_direction: Direction::Ascending,
                to_line: LineId::new("RED"),
                to_direction: Direction::Ascending,
                profile: RiderProfile::Phy,
                walk_minutes: 4.0,
                difficulty: 0.6,
                convenience_delta: -0.5,
                congestion_delta: 0.2,
            },
            TransferRecord {
                station: StationId::new(PROMENADE),
                from_line: LineId::new("GREEN"),
                from_direction: Direction::Ascending,
                to_line: LineId::new("YELLOW"),
                to_direction: Direction::Ascending,
                profile: RiderProfile::Phy,
                walk_minutes: 2.0,
                difficulty: 0.2,
                convenience_delta: 0.0,
                congestion_delta: 0.1,
            },
            TransferRecord {
                station: StationId::new(PROMENADE),
                from_line: LineId::new("YELLOW"),
                from_direction: Direction::Ascending,
                to_line: LineId::new("GREEN"),
                to_direction: Direction::Ascending,
                profile: RiderProfile::Phy,
                walk_minutes: 2.0,
                difficulty: 0.2,
                convenience_delta: 0.0,
                congestion_delta: 0.1,
            },
        ];

        Self {
            stations,
            sections,
            convenience,
            transfers,
        }
    }
}

impl Catalog for FixtureCatalog {
    fn stations(&self) -> Vec<StationRecord> {
        self.stations.clone()
    }

    fn station(&self, id: &StationId) -> Option<StationRecord> {
        self.stations.iter().find(|s| &s.id == id).cloned()
    }

    fn sections(&self, line: Option<&LineId>) -> Vec<SectionRecord> {
        match line {
            Some(line) => self.sections.iter().filter(|s| &s.line == line).cloned().collect(),
            None => self.sections.clone(),
        }
    }

    fn convenience_scores(&self) -> Vec<ConvenienceRecord> {
        self.convenience.clone()
    }

    fn transfers(&self) -> Vec<TransferRecord> {
        self.transfers.clone()
    }
}

/// Stub ANP-style weight calculator: PHY leans on transfer difficulty,
/// VIS and AUD lean on convenience, ELD balances travel time against
/// convenience (spec §1's four rider profiles).
pub struct FixtureWeights;

impl Weights for FixtureWeights {
    fn weights_for(&self, profile: RiderProfile) -> HashMap<Criterion, f64> {
        match profile {
            RiderProfile::Phy => HashMap::from([
                (Criterion::TravelTime, 0.15),
                (Criterion::Transfers, 0.15),
                (Criterion::TransferDifficulty, 0.4),
                (Criterion::Convenience, 0.2),
                (Criterion::Congestion, 0.1),
            ]),
            RiderProfile::Vis => HashMap::from([
                (Criterion::TravelTime, 0.2),
                (Criterion::Transfers, 0.15),
                (Criterion::TransferDifficulty, 0.15),
                (Criterion::Convenience, 0.4),
                (Criterion::Congestion, 0.1),
            ]),
            RiderProfile::Aud => HashMap::from([
                (Criterion::TravelTime, 0.25),
                (Criterion::Transfers, 0.15),
                (Criterion::TransferDifficulty, 0.1),
                (Criterion::Convenience, 0.3),
                (Criterion::Congestion, 0.2),
            ]),
            RiderProfile::Eld => HashMap::from([
                (Criterion::TravelTime, 0.25),
                (Criterion::Transfers, 0.2),
                (Criterion::TransferDifficulty, 0.2),
                (Criterion::Convenience, 0.25),
                (Criterion::Congestion, 0.1),
            ]),
        }
    }
}

/// Flat-earth approximation, adequate at city scale: degrees converted to
/// a walking-minutes estimate via a fixed multiplier.
pub struct FixtureDistance<'a> {
    catalog: &'a FixtureCatalog,
}

impl<'a> FixtureDistance<'a> {
    pub fn new(catalog: &'a FixtureCatalog) -> Self {
        Self { catalog }
    }
}

impl<'a> Distance for FixtureDistance<'a> {
    fn euclid_or_walk(&self, a: &StationId, b: &StationId) -> f64 {
        let (Some(a), Some(b)) = (self.catalog.station(a), self.catalog.station(b)) else {
            return 5.0;
        };
        let dlat = a.latitude - b.latitude;
        let dlon = a.longitude - b.longitude;
        ((dlat * dlat + dlon * dlon).sqrt() * 6000.0).max(0.5)
    }
}

pub fn get_example_departure() -> DepartureInstant {
    chrono::Utc.with_ymd_and_hms(2026, 7, 28, 8, 30, 0).unwrap()
}

pub fn get_example_origin() -> StationId {
    StationId::new(ORCHARD)
}

pub fn get_example_destination() -> StationId {
    StationId::new(BUGIS)
}
