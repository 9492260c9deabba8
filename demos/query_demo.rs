//! Runs one accessibility-aware search against the in-memory fixture
//! network and prints the ranked frontier, the way the teacher's
//! `simple_raptor` example prints a single `Journey`.

use access_raptor::cost::CostModel;
use access_raptor::engine::SearchConfig;
use access_raptor::network::NetworkIndex;
use access_raptor::oracles::Weights;
use access_raptor::query;
use access_raptor::utils::format_minutes;
use access_raptor::RiderProfile;
use dev_utils::{get_example_departure, get_example_destination, get_example_origin, FixtureCatalog, FixtureDistance, FixtureWeights};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let catalog = FixtureCatalog::build();
    let index = NetworkIndex::build(&catalog)?;
    println!("network index built: {} stations, {} (line, direction) sequences", index.num_stations(), index.num_lines());

    let distance = FixtureDistance::new(&catalog);
    let model = CostModel::new(&index, &distance);
    let origin = get_example_origin();
    let destination = get_example_destination();
    let departure = get_example_departure();

    for profile in RiderProfile::ALL {
        let weights = FixtureWeights.weights_for(profile);
        let outcome = query::search(&index, &model, &origin, &[destination.clone()], departure, profile, &weights, &SearchConfig::default())?;

        println!("\n=== profile {profile} ({}) ===", profile.description());
        if outcome.results.is_empty() {
            println!("no route found");
            continue;
        }
        for result in &outcome.results {
            println!(
                "rank {}: {} ({} transfer(s), max difficulty {:.2}, penalty {:.3}), route {:?}",
                result.rank,
                format_minutes(result.arrival_minutes),
                result.transfers,
                result.max_transfer_difficulty,
                result.weighted_penalty,
                result.route
            );
        }
    }

    Ok(())
}
