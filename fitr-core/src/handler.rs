//! Callable entry points: loosely-typed JSON in, JSON or [`ErrorResponse`] out.
//!
//! Payloads are validated into typed requests here so that the weather and
//! outfit logic only ever see well-formed structures.

use serde::Serialize;
use serde_json::Value;
use tracing::{instrument, warn};

use crate::{
    ClothingItem, Config, ErrorResponse, FitrError, LocationQuery, Outfit, WeatherRequest,
    WeatherSnapshot,
    model::MISSING_LOCATION,
    outfit::{self, MISSING_PARAMETERS},
    provider::WeatherProvider,
    weather,
};

pub const GET_WEATHER_DATA: &str = "get_weather_data";
pub const GET_OUTFIT_RECOMMENDATION: &str = "get_outfit_recommendation";

/// `get_weather_data`: `{city?, lat?, lon?}` → `WeatherSnapshot`.
#[instrument(name = "get_weather_data", skip_all)]
pub async fn get_weather_data(config: &Config, payload: Value) -> Result<Value, ErrorResponse> {
    let result = match parse_request(payload) {
        Ok(request) => weather::fetch_with_config(config, request).await,
        Err(err) => Err(err),
    };

    respond(result)
}

/// Same as [`get_weather_data`] but with a caller-supplied provider.
pub async fn get_weather_data_with(
    provider: &dyn WeatherProvider,
    payload: Value,
) -> Result<Value, ErrorResponse> {
    respond(weather_with_provider(provider, payload).await)
}

async fn weather_with_provider(
    provider: &dyn WeatherProvider,
    payload: Value,
) -> Result<WeatherSnapshot, FitrError> {
    let query = LocationQuery::try_from(parse_request(payload)?)?;
    weather::fetch(provider, &query).await
}

fn parse_request(payload: Value) -> Result<WeatherRequest, FitrError> {
    match payload {
        Value::Null => Ok(WeatherRequest::default()),
        other => serde_json::from_value(other)
            .map_err(|e| FitrError::invalid_argument_with(MISSING_LOCATION, e)),
    }
}

/// `get_outfit_recommendation`:
/// `{user_id, weather, clothing_items}` → `Outfit`.
#[instrument(name = "get_outfit_recommendation", skip_all)]
pub fn get_outfit_recommendation(payload: Value) -> Result<Value, ErrorResponse> {
    respond(recommend_from_payload(payload))
}

fn recommend_from_payload(payload: Value) -> Result<Outfit, FitrError> {
    let (Some(user_id), Some(weather), Some(items)) = (
        present(&payload, "user_id"),
        present(&payload, "weather"),
        present(&payload, "clothing_items"),
    ) else {
        return Err(FitrError::invalid_argument(MISSING_PARAMETERS));
    };

    let user_id = user_id.as_str().ok_or_else(|| {
        FitrError::invalid_argument_with(MISSING_PARAMETERS, "user_id must be a string")
    })?;
    let wardrobe = parse_wardrobe(items)?;

    outfit::recommend(user_id, weather, &wardrobe)
}

fn parse_wardrobe(items: &Value) -> Result<Vec<ClothingItem>, FitrError> {
    let entries = items.as_array().ok_or_else(|| {
        FitrError::invalid_argument_with("Invalid clothing items", "clothing_items must be a list")
    })?;

    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            serde_json::from_value(entry.clone()).map_err(|e| {
                FitrError::invalid_argument_with(
                    "Invalid clothing item",
                    format!("index {idx}: {e}"),
                )
            })
        })
        .collect()
}

fn present<'a>(payload: &'a Value, name: &str) -> Option<&'a Value> {
    payload.get(name).filter(|v| !is_blank(v))
}

/// Values the callable contract treats as "not provided".
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn respond<T: Serialize>(result: Result<T, FitrError>) -> Result<Value, ErrorResponse> {
    let value = result.map_err(|err| {
        warn!(code = %err.code(), error = %err, "request failed");
        ErrorResponse::from(err)
    })?;

    serde_json::to_value(value).map_err(|e| {
        ErrorResponse::from(FitrError::internal("Failed to serialize response", e))
    })
}
