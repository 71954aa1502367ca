use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One raw 3-hour forecast record from the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Unix epoch seconds, UTC.
    pub timestamp: i64,
    pub temperature_c: f64,
    pub humidity_pct: Option<u8>,
    pub wind_speed_mps: Option<f64>,
    pub icon: String,
    pub description: String,
}

/// Aggregated representation of all samples falling on one calendar day.
///
/// Built fresh per [`crate::forecast::aggregate`] call, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    /// Calendar date, `YYYY-MM-DD`, in the grouping timezone.
    pub day_key: String,
    /// Short weekday name, e.g. "Mon".
    pub label: String,
    /// Month + day, e.g. "Jan 5".
    pub display_date: String,
    /// Mean temperature in °C, rounded half away from zero.
    pub mean_temp_c: i32,
    pub icon: String,
    pub description: String,
    pub mean_humidity_pct: Option<u8>,
    /// Mean wind speed in m/s, one decimal place.
    pub mean_wind_speed_mps: Option<f64>,
}

/// Current conditions for a city, as reported by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// The provider's canonical city name, which may differ from the
    /// user's input spelling. This is what gets displayed, recorded in
    /// search history, and re-queried on refresh.
    pub city: String,
    pub country: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub wind_speed_mps: f64,
    pub wind_deg: Option<u16>,
    pub visibility_m: Option<u32>,
    pub icon: String,
    pub description: String,
    /// Shift in seconds from UTC for the queried city.
    pub timezone_offset_s: i32,
    pub observation_time: DateTime<Utc>,
}

/// Joint result of one weather query: current conditions plus the raw
/// forecast listing. Both requests must have succeeded to obtain one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub samples: Vec<ForecastSample>,
}
