//! Core library for `fitr`.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over the weather provider (OpenWeather)
//! - Shared domain models (snapshots, wardrobe items, outfits)
//! - The two callable handlers, `get_weather_data` and `get_outfit_recommendation`
//!
//! It is used by `fitr-cli`, but the handlers can be mounted by any host that
//! speaks JSON in and JSON out.

pub mod config;
pub mod error;
pub mod handler;
pub mod model;
pub mod outfit;
pub mod provider;
pub mod weather;

pub use config::{Config, OpenWeatherConfig};
pub use error::{ErrorCode, ErrorResponse, FitrError};
pub use model::{
    ClothingItem, Condition, Coord, LocationQuery, MainReadings, Outfit, WeatherRequest,
    WeatherSnapshot, Wind,
};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
