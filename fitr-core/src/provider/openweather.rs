use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::{
    config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS},
    error::FitrError,
    model::{Condition, Coord, LocationQuery, MainReadings, WeatherSnapshot, Wind},
};

use super::{MISSING_API_KEY, WeatherProvider};

pub const FETCH_FAILED: &str = "Failed to fetch weather data";
pub const UNEXPECTED: &str = "An unexpected error occurred";

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

#[derive(Debug, Clone)]
pub struct OpenWeatherProviderBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl OpenWeatherProviderBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<OpenWeatherProvider, FitrError> {
        if self.api_key.trim().is_empty() {
            return Err(FitrError::config(MISSING_API_KEY));
        }

        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| FitrError::internal("Failed to build HTTP client", e))?;

        Ok(OpenWeatherProvider {
            api_key: self.api_key,
            base_url: self.base_url,
            http,
        })
    }
}

impl OpenWeatherProvider {
    pub fn builder(api_key: impl Into<String>) -> OpenWeatherProviderBuilder {
        OpenWeatherProviderBuilder {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn new(api_key: impl Into<String>) -> Result<Self, FitrError> {
        Self::builder(api_key).build()
    }

    async fn fetch_current(&self, query: &LocationQuery) -> Result<WeatherSnapshot, FitrError> {
        let url = format!("{}{}", self.base_url, CURRENT_WEATHER_PATH);

        let mut params = vec![
            ("appid", self.api_key.clone()),
            ("units", "imperial".to_string()),
        ];
        params.extend(query.query_params());

        debug!(%query, "requesting current weather from OpenWeather");

        // reqwest errors echo the request URL, which carries `appid`.
        let res = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| FitrError::unavailable(FETCH_FAILED, e.without_url()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| FitrError::unavailable(FETCH_FAILED, e.without_url()))?;
        let received_at = Utc::now();

        if !status.is_success() {
            return Err(FitrError::unavailable(
                FETCH_FAILED,
                format!("OpenWeather responded with status {}: {}", status, truncate_body(&body)),
            ));
        }

        normalize_current(&body, received_at)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, query: &LocationQuery) -> Result<WeatherSnapshot, FitrError> {
        self.fetch_current(query).await
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lon: Option<f64>,
    lat: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u32,
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: u32,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    coord: Option<OwCoord>,
    weather: Vec<OwWeather>,
    main: OwMain,
    wind: OwWind,
    name: String,
}

/// Reshape an OpenWeather current-weather body into a [`WeatherSnapshot`]
/// stamped with `received_at`.
///
/// Only the first `weather` entry is kept and a missing wind direction
/// becomes 0. Anything else missing or mistyped is an internal error.
pub fn normalize_current(
    body: &str,
    received_at: DateTime<Utc>,
) -> Result<WeatherSnapshot, FitrError> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).map_err(|e| FitrError::internal(UNEXPECTED, e))?;

    let first = parsed.weather.into_iter().next().ok_or_else(|| {
        FitrError::internal(UNEXPECTED, "OpenWeather response contained no weather entries")
    })?;

    let coord = parsed
        .coord
        .map(|c| Coord { lon: c.lon, lat: c.lat })
        .unwrap_or_default();

    Ok(WeatherSnapshot {
        coord,
        weather: vec![Condition {
            id: first.id,
            main: first.main,
            description: first.description,
            icon: first.icon,
        }],
        main: MainReadings {
            temp: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            temp_min: parsed.main.temp_min,
            temp_max: parsed.main.temp_max,
            pressure: parsed.main.pressure,
            humidity: parsed.main.humidity,
        },
        wind: Wind {
            speed: parsed.wind.speed,
            deg: parsed.wind.deg.unwrap_or(0),
        },
        name: parsed.name,
        timestamp: received_at.to_rfc3339_opts(SecondsFormat::Micros, true),
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
