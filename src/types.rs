//! Shared types for the STORMCAST pipeline.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that the region, climate,
//! predictor, and orchestrator modules can depend on them without
//! circular references.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Location & region
// ---------------------------------------------------------------------------

/// A geographic point. Immutable value type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Build a location, rejecting out-of-range or non-finite coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ForecastError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ForecastError::Validation(format!(
                "latitude out of range [-90, 90]: {latitude}"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ForecastError::Validation(format!(
                "longitude out of range [-180, 180]: {longitude}"
            )));
        }
        Ok(Self { latitude, longitude })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.latitude, self.longitude)
    }
}

/// The seven continents used to key climate normals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Continent {
    Africa,
    Antarctica,
    Asia,
    Australia,
    Europe,
    NorthAmerica,
    SouthAmerica,
}

impl Continent {
    /// All continents (useful for iteration and completeness checks).
    pub const ALL: &'static [Continent] = &[
        Continent::Africa,
        Continent::Antarctica,
        Continent::Asia,
        Continent::Australia,
        Continent::Europe,
        Continent::NorthAmerica,
        Continent::SouthAmerica,
    ];

    /// Wire/file name, e.g. `north_america`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Continent::Africa => "africa",
            Continent::Antarctica => "antarctica",
            Continent::Asia => "asia",
            Continent::Australia => "australia",
            Continent::Europe => "europe",
            Continent::NorthAmerica => "north_america",
            Continent::SouthAmerica => "south_america",
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Continent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "africa" => Ok(Continent::Africa),
            "antarctica" => Ok(Continent::Antarctica),
            "asia" => Ok(Continent::Asia),
            "australia" | "oceania" => Ok(Continent::Australia),
            "europe" => Ok(Continent::Europe),
            "north_america" => Ok(Continent::NorthAmerica),
            "south_america" => Ok(Continent::SouthAmerica),
            _ => Err(anyhow::anyhow!("Unknown continent: {s}")),
        }
    }
}

/// Hemisphere, derived from the sign of latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hemisphere {
    Northern,
    Southern,
}

impl Hemisphere {
    pub const ALL: &'static [Hemisphere] = &[Hemisphere::Northern, Hemisphere::Southern];

    pub fn as_str(&self) -> &'static str {
        match self {
            Hemisphere::Northern => "northern",
            Hemisphere::Southern => "southern",
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Hemisphere {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "northern" => Ok(Hemisphere::Northern),
            "southern" => Ok(Hemisphere::Southern),
            _ => Err(anyhow::anyhow!("Unknown hemisphere: {s}")),
        }
    }
}

/// The (continent, hemisphere) pair keying climate normals for a location.
///
/// `resolved` is false when no continent bounding region matched and the
/// resolver fell back to the default continent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub continent: Continent,
    pub hemisphere: Hemisphere,
    pub resolved: bool,
}

impl Region {
    /// The normals-table scope for this region: continent when the
    /// resolver matched a bounding region, hemisphere otherwise.
    pub fn scope(&self) -> RegionScope {
        if self.resolved {
            RegionScope::Continent(self.continent)
        } else {
            RegionScope::Hemisphere(self.hemisphere)
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.continent, self.hemisphere)
    }
}

/// Key scope for the Climate Normals Store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionScope {
    Continent(Continent),
    Hemisphere(Hemisphere),
}

impl fmt::Display for RegionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionScope::Continent(c) => write!(f, "continent:{c}"),
            RegionScope::Hemisphere(h) => write!(f, "hemisphere:{h}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Observations & anomalies
// ---------------------------------------------------------------------------

/// A raw weather observation for one day, as consumed by the feature
/// builder and the probability converter.
///
/// All fields are concrete values: feed adapters impute documented
/// defaults for quantities their upstream does not carry, or reject the
/// observation outright. The feature builder re-validates finiteness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Mean temperature [°C].
    pub temperature: f64,
    /// Daily minimum temperature [°C].
    pub temp_min: f64,
    /// Daily maximum temperature [°C].
    pub temp_max: f64,
    /// Precipitation total [mm].
    pub precipitation: f64,
    /// Relative humidity [%].
    pub humidity: f64,
    /// Wind speed [m/s].
    pub wind_speed: f64,
    /// Specific humidity [g/kg].
    pub specific_humidity: f64,
    /// Downward shortwave radiation [W/m²].
    pub radiation: f64,
}

impl Observation {
    /// Imputed shortwave radiation when the upstream carries none [W/m²].
    pub const DEFAULT_RADIATION: f64 = 200.0;

    /// Specific-humidity approximation from relative humidity [g/kg].
    /// Matches the constant used when the predictor was trained.
    pub fn approx_specific_humidity(relative_humidity: f64) -> f64 {
        relative_humidity / 100.0 * 10.0
    }

    /// Daily temperature range (max - min).
    pub fn temp_range(&self) -> f64 {
        self.temp_max - self.temp_min
    }

    /// Whether every field is a finite number.
    pub fn is_finite(&self) -> bool {
        [
            self.temperature,
            self.temp_min,
            self.temp_max,
            self.precipitation,
            self.humidity,
            self.wind_speed,
            self.specific_humidity,
            self.radiation,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// Helper to build a mild mid-latitude observation for tests.
    #[cfg(test)]
    pub fn sample() -> Self {
        Observation {
            temperature: 20.0,
            temp_min: 15.0,
            temp_max: 25.0,
            precipitation: 2.0,
            humidity: 60.0,
            wind_speed: 5.0,
            specific_humidity: 6.0,
            radiation: 200.0,
        }
    }
}

/// The two scalars produced by the anomaly predictor for one feature
/// vector. Pure function output, never stored beyond the request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyPair {
    pub temperature_anomaly: f64,
    pub precipitation_anomaly: f64,
}

impl AnomalyPair {
    /// Zero anomalies — used when probabilities are derived from climate
    /// normals without invoking the predictor.
    pub const NEUTRAL: AnomalyPair = AnomalyPair {
        temperature_anomaly: 0.0,
        precipitation_anomaly: 0.0,
    };
}

impl fmt::Display for AnomalyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dT={:+.3}C dP={:+.3}",
            self.temperature_anomaly, self.precipitation_anomaly
        )
    }
}

// ---------------------------------------------------------------------------
// Probabilities & risk
// ---------------------------------------------------------------------------

/// Probabilities for the five extreme-weather categories.
///
/// Every field is always present and always in [0.0, 1.0] — the
/// constructor clamps unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilitySet {
    pub very_hot: f64,
    pub very_cold: f64,
    pub very_windy: f64,
    pub very_wet: f64,
    pub very_uncomfortable: f64,
}

impl ProbabilitySet {
    /// The five category names, in field order.
    pub const CATEGORIES: &'static [&'static str] = &[
        "very_hot",
        "very_cold",
        "very_windy",
        "very_wet",
        "very_uncomfortable",
    ];

    /// Build a set with every value clamped into [0.0, 1.0].
    pub fn clamped(
        very_hot: f64,
        very_cold: f64,
        very_windy: f64,
        very_wet: f64,
        very_uncomfortable: f64,
    ) -> Self {
        Self {
            very_hot: very_hot.clamp(0.0, 1.0),
            very_cold: very_cold.clamp(0.0, 1.0),
            very_windy: very_windy.clamp(0.0, 1.0),
            very_wet: very_wet.clamp(0.0, 1.0),
            very_uncomfortable: very_uncomfortable.clamp(0.0, 1.0),
        }
    }

    fn values(&self) -> [f64; 5] {
        [
            self.very_hot,
            self.very_cold,
            self.very_windy,
            self.very_wet,
            self.very_uncomfortable,
        ]
    }

    /// The largest of the five probabilities.
    pub fn max(&self) -> f64 {
        self.values().into_iter().fold(0.0, f64::max)
    }

    /// The category name carrying the largest probability (first in field
    /// order on ties).
    pub fn dominant(&self) -> &'static str {
        let values = self.values();
        let mut best = 0;
        for i in 1..values.len() {
            if values[i] > values[best] {
                best = i;
            }
        }
        Self::CATEGORIES[best]
    }
}

impl fmt::Display for ProbabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hot={:.2} cold={:.2} windy={:.2} wet={:.2} uncomf={:.2}",
            self.very_hot, self.very_cold, self.very_windy, self.very_wet, self.very_uncomfortable,
        )
    }
}

/// Ordinal extreme-weather risk level.
///
/// Total order: MINIMAL < LOW < MODERATE < HIGH < EXTREME.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Minimal,
    Low,
    Moderate,
    High,
    Extreme,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Minimal => write!(f, "MINIMAL"),
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Moderate => write!(f, "MODERATE"),
            RiskLevel::High => write!(f, "HIGH"),
            RiskLevel::Extreme => write!(f, "EXTREME"),
        }
    }
}

// ---------------------------------------------------------------------------
// Provenance
// ---------------------------------------------------------------------------

/// Provenance tag for a forecast entry.
///
/// Wire format: `weather_api` for the short-horizon branch,
/// `climate_pattern:<continent>` for the long-horizon branch, with a
/// `:default` suffix when the region resolver fell back to the default
/// continent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DataSource {
    WeatherApi,
    ClimatePattern { continent: Continent, fallback: bool },
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::WeatherApi => write!(f, "weather_api"),
            DataSource::ClimatePattern { continent, fallback: false } => {
                write!(f, "climate_pattern:{continent}")
            }
            DataSource::ClimatePattern { continent, fallback: true } => {
                write!(f, "climate_pattern:{continent}:default")
            }
        }
    }
}

impl From<DataSource> for String {
    fn from(source: DataSource) -> String {
        source.to_string()
    }
}

impl TryFrom<String> for DataSource {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s == "weather_api" {
            return Ok(DataSource::WeatherApi);
        }
        if let Some(rest) = s.strip_prefix("climate_pattern:") {
            let (name, fallback) = match rest.strip_suffix(":default") {
                Some(name) => (name, true),
                None => (rest, false),
            };
            let continent: Continent = name
                .parse()
                .map_err(|_| format!("Unknown continent in data source: {s}"))?;
            return Ok(DataSource::ClimatePattern { continent, fallback });
        }
        Err(format!("Unknown data source tag: {s}"))
    }
}

// ---------------------------------------------------------------------------
// Forecast entries & response
// ---------------------------------------------------------------------------

/// The period a forecast entry covers: a single day (short horizon) or a
/// calendar month (long horizon).
///
/// Wire format: `2025-01-03` for a day, `2025-03` for a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EntryPeriod {
    Date(NaiveDate),
    Month { year: i32, month: u32 },
}

impl EntryPeriod {
    /// First calendar day covered by this period — used for chronological
    /// ordering and summary tie-breaking.
    pub fn first_day(&self) -> NaiveDate {
        match self {
            EntryPeriod::Date(d) => *d,
            // Month values come from chrono month arithmetic, always 1-12.
            EntryPeriod::Month { year, month } => {
                NaiveDate::from_ymd_opt(*year, *month, 1).expect("valid month period")
            }
        }
    }
}

impl fmt::Display for EntryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryPeriod::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            EntryPeriod::Month { year, month } => write!(f, "{year:04}-{month:02}"),
        }
    }
}

impl From<EntryPeriod> for String {
    fn from(p: EntryPeriod) -> String {
        p.to_string()
    }
}

impl TryFrom<String> for EntryPeriod {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if let Ok(date) = NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
            return Ok(EntryPeriod::Date(date));
        }
        if let Some((y, m)) = s.split_once('-') {
            let year: i32 = y.parse().map_err(|_| format!("Bad period: {s}"))?;
            let month: u32 = m.parse().map_err(|_| format!("Bad period: {s}"))?;
            if (1..=12).contains(&month) {
                return Ok(EntryPeriod::Month { year, month });
            }
        }
        Err(format!("Bad period: {s}"))
    }
}

/// One forecast entry. Created per orchestration step, immutable once
/// returned, discarded after the response is sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    #[serde(rename = "date_or_month")]
    pub period: EntryPeriod,
    pub predictions: ProbabilitySet,
    pub risk_level: RiskLevel,
    pub data_source: DataSource,
    /// Confidence in this entry (configurable fallback for short-horizon
    /// entries; pattern-derived constants for long-horizon entries).
    pub confidence: f64,
    /// Sampled daily temperatures for the month (long-horizon entries only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_chart: Option<Vec<f64>>,
}

impl fmt::Display for ForecastEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} risk={} ({})",
            self.period, self.predictions, self.risk_level, self.data_source,
        )
    }
}

/// Summary of a forecast response: the highest-risk entry and the
/// dominant risk category at that entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub highest_risk_period: EntryPeriod,
    pub highest_risk_level: RiskLevel,
    pub dominant_category: String,
}

/// The full response for one forecast request. Built once, never mutated
/// after assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    pub region: Region,
    pub forecast: Vec<ForecastEntry>,
    pub summary: ForecastSummary,
    pub generated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Domain-specific error taxonomy for the forecasting pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    /// Malformed or missing input — rejected before any external call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Live weather feed unreachable or timed out — the short-horizon
    /// branch fails; climate-pattern data is never substituted.
    #[error("Upstream weather feed unavailable ({feed}): {message}")]
    UpstreamUnavailable { feed: String, message: String },

    /// Anomaly predictor inference failed — never replaced by a
    /// fabricated probability set.
    #[error("Predictor failure: {0}")]
    PredictorFailure(String),

    /// Climate Normals Store incomplete or unreadable at load time.
    /// Fatal at process start, not recoverable per-request.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ForecastError {
    /// Stable taxonomy kind for structured error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            ForecastError::Validation(_) => "validation",
            ForecastError::UpstreamUnavailable { .. } => "upstream_unavailable",
            ForecastError::PredictorFailure(_) => "predictor_failure",
            ForecastError::Configuration(_) => "configuration",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
