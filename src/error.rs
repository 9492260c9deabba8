use crate::ids::StationId;

/// Error kinds surfaced across index construction and querying (spec §7).
///
/// `NoRoute` is deliberately absent here: spec §7 treats an empty result
/// set as success, not failure, so it is modeled as an empty `Vec` in
/// [`crate::engine::SearchOutcome`] rather than a variant of this enum.
/// Likewise a caller-exceeded deadline is a `SearchOutcome::partial` flag,
/// not an error.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("unknown station: {0}")]
    UnknownStation(StationId),

    #[error("unknown rider profile code: {0}")]
    UnknownProfile(String),

    #[error("destination set must not be empty")]
    EmptyDestinationSet,

    #[error("data integrity error while building network index: {0}")]
    DataIntegrity(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
