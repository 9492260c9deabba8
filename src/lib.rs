//! Accessibility-aware multi-criteria transit routing.
//!
//! The outer shape mirrors the teacher's crate: a read-only network
//! index built once ([`network::NetworkIndex`]), a pure cost model
//! ([`cost::CostModel`]), and a round-based query engine
//! ([`engine::search`]) that the public [`query::search`] wraps with
//! validation and ranking. The collaborators a real deployment would
//! plug in (the tabular store, the ANP weight calculator, the distance
//! utility) are declared only as traits in [`oracles`]; this crate
//! never implements them against a real database or HTTP client.

pub mod cost;
pub mod engine;
pub mod error;
pub mod frontier;
pub mod ids;
pub mod label;
pub mod network;
pub mod oracles;
pub mod query;
pub mod ranker;
pub mod utils;

pub use cost::CostModel;
pub use engine::SearchConfig;
pub use error::{CoreError, CoreResult};
pub use ids::{Criterion, Direction, LineId, RiderProfile, StationId};
pub use network::NetworkIndex;
pub use query::{parse_profile, search, RankedResult, SearchOutcome};
