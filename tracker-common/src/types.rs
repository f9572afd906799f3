use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder for text fields the feed left empty
pub const UNKNOWN: &str = "unknown";

/// Countries counted as European for the `is_european` flag
pub const EUROPEAN_COUNTRIES: [&str; 5] = ["United Kingdom", "France", "Germany", "Italy", "Spain"];

pub fn is_european_country(country: &str) -> bool {
    EUROPEAN_COUNTRIES.contains(&country)
}

/// Flight category, the only two kinds of aircraft the tracker keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightCategory {
    #[serde(rename = "military")]
    Military,
    #[serde(rename = "private")]
    Private,
}

impl FlightCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightCategory::Military => "military",
            FlightCategory::Private => "private",
        }
    }
}

impl std::fmt::Display for FlightCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FlightCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "military" => Ok(FlightCategory::Military),
            "private" => Ok(FlightCategory::Private),
            _ => Err(format!("Unknown flight category: {}", s)),
        }
    }
}

/// Where the current snapshot came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceMode {
    #[serde(rename = "live")]
    Live,
    #[serde(rename = "demo")]
    Demo,
}

impl SourceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceMode::Live => "live",
            SourceMode::Demo => "demo",
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, SourceMode::Demo)
    }
}

impl std::fmt::Display for SourceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One observed aircraft state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    /// Feed identifier (ICAO 24-bit address for live data, `demoNNN` for demo data)
    #[serde(rename = "icao24")]
    pub id: String,
    pub callsign: String,
    pub origin_country: String,
    /// The live feed never reports a destination
    pub destination_country: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
    pub velocity: f64,
    pub heading: f64,
    /// `None` when the feed had no contact timestamp
    pub last_contact: Option<DateTime<Utc>>,
    pub is_european: bool,
    #[serde(rename = "flight_type")]
    pub category: FlightCategory,
}

/// Response body of the flight list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightList {
    pub flights: Vec<FlightRecord>,
    pub count: usize,
    pub last_updated: DateTime<Utc>,
    pub demo_mode: bool,
    pub status: SourceMode,
}

/// Response body of the status endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub demo_mode: bool,
    /// Seconds until the next live call is allowed
    pub next_update_in: u64,
    pub flight_count: usize,
    /// Minimum seconds between live calls
    pub api_interval: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
