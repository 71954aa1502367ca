//! OpenWeather query client.
//!
//! One weather query issues two independent GETs — current conditions
//! and the 5-day/3-hour forecast listing — and joins them with
//! all-or-nothing semantics. Provider errors are normalized into the
//! [`QueryError`] taxonomy so callers can render a specific message.

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    error::QueryError,
    model::{CurrentConditions, ForecastSample, WeatherReport},
};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at a different provider root, e.g. a local mock
    /// server in tests.
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    /// Fetch current conditions and the forecast listing for `city`.
    ///
    /// The two requests run concurrently; either failure fails the whole
    /// query and any partial data is discarded, so callers never observe
    /// current conditions without a matching forecast or vice versa. A
    /// city name that is blank after trimming short-circuits with
    /// [`QueryError::EmptyCity`] before any network traffic.
    ///
    /// On success, `report.current.city` holds the provider's canonical
    /// name — that is what callers should display, record in search
    /// history, and use for refresh re-queries.
    pub async fn fetch_weather(&self, city: &str) -> Result<WeatherReport, QueryError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(QueryError::EmptyCity);
        }

        tracing::debug!(city, "querying weather provider");
        let (current, samples) =
            tokio::try_join!(self.fetch_current(city), self.fetch_forecast(city))?;

        Ok(WeatherReport { current, samples })
    }

    async fn fetch_current(&self, city: &str) -> Result<CurrentConditions, QueryError> {
        let body = self.get("weather", city).await?;

        let parsed: OwCurrentResponse = serde_json::from_str(&body).map_err(|err| {
            QueryError::unavailable(
                anyhow!(err).context("Failed to parse OpenWeather current JSON"),
            )
        })?;

        let (icon, description) = primary_condition(parsed.weather);

        Ok(CurrentConditions {
            city: parsed.name,
            country: parsed.sys.country,
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            temp_min_c: parsed.main.temp_min,
            temp_max_c: parsed.main.temp_max,
            humidity_pct: parsed.main.humidity,
            pressure_hpa: parsed.main.pressure,
            wind_speed_mps: parsed.wind.speed,
            wind_deg: parsed.wind.deg,
            visibility_m: parsed.visibility,
            icon,
            description,
            timezone_offset_s: parsed.timezone,
            observation_time: unix_to_utc(parsed.dt).unwrap_or_else(Utc::now),
        })
    }

    async fn fetch_forecast(&self, city: &str) -> Result<Vec<ForecastSample>, QueryError> {
        let body = self.get("forecast", city).await?;

        let parsed: OwForecastResponse = serde_json::from_str(&body).map_err(|err| {
            QueryError::unavailable(
                anyhow!(err).context("Failed to parse OpenWeather forecast JSON"),
            )
        })?;

        let samples = parsed
            .list
            .into_iter()
            .map(|entry| {
                let (icon, description) = primary_condition(entry.weather);
                ForecastSample {
                    timestamp: entry.dt,
                    temperature_c: entry.main.temp,
                    humidity_pct: entry.main.humidity,
                    wind_speed_mps: entry.wind.map(|w| w.speed),
                    icon,
                    description,
                }
            })
            .collect();

        Ok(samples)
    }

    /// GET `{base_url}/{endpoint}?q={city}&appid=...&units=metric` and
    /// return the response body. 404 is the provider's "no such city"
    /// signal; every other failure maps to [`QueryError::Unavailable`].
    async fn get(&self, endpoint: &str, city: &str) -> Result<String, QueryError> {
        let url = format!("{}/{endpoint}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|err| {
                QueryError::unavailable(
                    anyhow!(err)
                        .context(format!("Failed to send request to OpenWeather ({endpoint})")),
                )
            })?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Err(QueryError::CityNotFound);
        }

        let body = res.text().await.map_err(|err| {
            QueryError::unavailable(
                anyhow!(err).context(format!("Failed to read OpenWeather {endpoint} response body")),
            )
        })?;

        if !status.is_success() {
            return Err(QueryError::unavailable(anyhow!(
                "OpenWeather {endpoint} request failed with status {status}: {}",
                truncate_body(&body),
            )));
        }

        Ok(body)
    }
}

fn primary_condition(weather: Vec<OwWeather>) -> (String, String) {
    match weather.into_iter().next() {
        Some(w) => (w.icon, w.description),
        None => (String::new(), "Unknown".to_string()),
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        let head: String = body.chars().take(MAX).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    icon: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    timezone: i32,
    visibility: Option<u32>,
    sys: OwSys,
    main: OwCurrentMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
    humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}
