use std::fmt;
use std::sync::Arc;

/// Opaque station identifier. Cheap to clone (interior `Arc<str>`), the way
/// the teacher keeps `Route::line` as an `Arc<str>` shared across every
/// trip on that route.
#[derive(Clone, Eq, PartialEq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct StationId(Arc<str>);

impl StationId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl From<&str> for StationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for StationId {
    fn from(value: String) -> Self {
        Self(Arc::from(value.as_str()))
    }
}

/// Opaque line identifier.
#[derive(Clone, Eq, PartialEq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct LineId(Arc<str>);

impl LineId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.0)
    }
}

impl From<&str> for LineId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A station's order index within one (line, direction) sequence.
pub type OrderIndex = u32;

/// A synthetic line used only for the root label minted at the origin.
/// Never appears in `NetworkIndex::lines_at`.
pub const BOARDING_LINE: &str = "__origin__";

/// Direction of travel along a line's station sequence.
///
/// Whether `current_direction` must stay fixed across a same-line
/// extension on a loop or branching (Y-junction) line is an open question
/// in the source material (spec §9); this crate assumes direction
/// continuity is required within one Phase A pass (see DESIGN.md).
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    Ascending,
    Descending,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Ascending => f.write_str("ascending"),
            Direction::Descending => f.write_str("descending"),
        }
    }
}

/// Rider-profile code, fixed per spec §6.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, serde::Serialize, serde::Deserialize)]
pub enum RiderProfile {
    /// Physical-mobility impairment.
    Phy,
    /// Visual impairment.
    Vis,
    /// Auditory impairment.
    Aud,
    /// Elderly.
    Eld,
}

impl RiderProfile {
    pub const ALL: [RiderProfile; 4] = [
        RiderProfile::Phy,
        RiderProfile::Vis,
        RiderProfile::Aud,
        RiderProfile::Eld,
    ];

    pub fn code(self) -> &'static str {
        match self {
            RiderProfile::Phy => "PHY",
            RiderProfile::Vis => "VIS",
            RiderProfile::Aud => "AUD",
            RiderProfile::Eld => "ELD",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RiderProfile::Phy => "physical-mobility impairment",
            RiderProfile::Vis => "visual impairment",
            RiderProfile::Aud => "auditory impairment",
            RiderProfile::Eld => "elderly",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "PHY" => Some(RiderProfile::Phy),
            "VIS" => Some(RiderProfile::Vis),
            "AUD" => Some(RiderProfile::Aud),
            "ELD" => Some(RiderProfile::Eld),
            _ => None,
        }
    }
}

impl fmt::Display for RiderProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The five recognized weighting criteria (spec §6).
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, serde::Serialize, serde::Deserialize)]
pub enum Criterion {
    TravelTime,
    Transfers,
    TransferDifficulty,
    Convenience,
    Congestion,
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::TravelTime,
        Criterion::Transfers,
        Criterion::TransferDifficulty,
        Criterion::Convenience,
        Criterion::Congestion,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Criterion::TravelTime => "travel_time",
            Criterion::Transfers => "transfers",
            Criterion::TransferDifficulty => "transfer_difficulty",
            Criterion::Convenience => "convenience",
            Criterion::Congestion => "congestion",
        }
    }
}

/// Default weight applied to a criterion absent from a profile's weight map.
pub const DEFAULT_CRITERION_WEIGHT: f64 = 0.2;
