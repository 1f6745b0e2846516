use crate::{
    Config, FitrError, LocationQuery, WeatherSnapshot, provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub const MISSING_API_KEY: &str = "API key not configured";

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Issue exactly one upstream request for current conditions.
    async fn current_weather(&self, query: &LocationQuery) -> Result<WeatherSnapshot, FitrError>;
}

/// Construct the OpenWeather provider, failing before any network I/O when
/// the API key is absent.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>, FitrError> {
    let api_key = config
        .api_key()
        .ok_or_else(|| FitrError::config(MISSING_API_KEY))?;

    let provider = OpenWeatherProvider::builder(api_key)
        .base_url(config.base_url())
        .timeout(config.timeout())
        .build()?;

    Ok(Box::new(provider))
}
