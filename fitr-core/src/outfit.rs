//! OutfitRecommender: a fixed decision table from weather to clothing types.
//!
//! | temperature (°F)  | required types                   |
//! |-------------------|----------------------------------|
//! | `< 50`            | coat, jacket, sweater, pants     |
//! | `50 ..< 65`       | sweater, long_sleeve, pants      |
//! | `>= 65`           | t_shirt, shorts, dress           |
//!
//! A primary condition mentioning "rain" adds `rain_jacket`; one mentioning
//! "snow" adds `winter_boots`. At most [`MAX_ITEMS`] wardrobe entries are
//! picked, in wardrobe order.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{ClothingItem, FitrError, Outfit, WeatherSnapshot};

pub const MAX_ITEMS: usize = 4;

pub const MISSING_PARAMETERS: &str = "Missing required parameters";
pub const RECOMMENDATION_FAILED: &str = "Failed to generate outfit recommendation";

const COLD_BELOW_F: f64 = 50.0;
const COOL_BELOW_F: f64 = 65.0;

const COLD_TYPES: &[&str] = &["coat", "jacket", "sweater", "pants"];
const COOL_TYPES: &[&str] = &["sweater", "long_sleeve", "pants"];
const WARM_TYPES: &[&str] = &["t_shirt", "shorts", "dress"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureBand {
    Cold,
    Cool,
    Warm,
}

impl TemperatureBand {
    pub fn for_temperature(temp_f: f64) -> Self {
        if temp_f < COLD_BELOW_F {
            TemperatureBand::Cold
        } else if temp_f < COOL_BELOW_F {
            TemperatureBand::Cool
        } else {
            TemperatureBand::Warm
        }
    }

    pub fn clothing_types(&self) -> &'static [&'static str] {
        match self {
            TemperatureBand::Cold => COLD_TYPES,
            TemperatureBand::Cool => COOL_TYPES,
            TemperatureBand::Warm => WARM_TYPES,
        }
    }
}

/// Clothing types suitable for `temp_f` under `condition`, in table order.
pub fn required_types(temp_f: f64, condition: &str) -> Vec<&'static str> {
    let condition = condition.to_lowercase();
    let mut types = TemperatureBand::for_temperature(temp_f).clothing_types().to_vec();

    if condition.contains("rain") {
        types.push("rain_jacket");
    }
    if condition.contains("snow") {
        types.push("winter_boots");
    }

    types
}

/// Adjective used in the outfit description; whole-word match only.
pub fn condition_label(condition: &str) -> &'static str {
    match condition.to_lowercase().as_str() {
        "hot" => "hot",
        "warm" => "warm",
        "cool" => "cool",
        "cold" => "cold",
        "rain" => "rainy",
        "snow" => "snowy",
        _ => "current",
    }
}

/// First [`MAX_ITEMS`] wardrobe entries whose type is in `types`.
pub fn select_items(wardrobe: &[ClothingItem], types: &[&str]) -> Vec<ClothingItem> {
    wardrobe
        .iter()
        .filter(|item| types.contains(&item.kind.as_str()))
        .take(MAX_ITEMS)
        .cloned()
        .collect()
}

pub fn describe(condition: &str, temp_f: f64, item_count: usize) -> String {
    format!(
        "For {} weather ({}°F), I recommend wearing {} items from your wardrobe.",
        condition_label(condition),
        temp_f.trunc() as i64,
        item_count,
    )
}

/// Build an outfit for `user_id` from `wardrobe` given a `WeatherSnapshot`
/// in JSON form.
///
/// The snapshot is decoded only to read the temperature and condition; the
/// outfit carries `weather` back exactly as given.
pub fn recommend(
    user_id: &str,
    weather: &Value,
    wardrobe: &[ClothingItem],
) -> Result<Outfit, FitrError> {
    recommend_at(user_id, weather, wardrobe, Utc::now())
}

pub(crate) fn recommend_at(
    user_id: &str,
    weather: &Value,
    wardrobe: &[ClothingItem],
    now: DateTime<Utc>,
) -> Result<Outfit, FitrError> {
    if user_id.trim().is_empty() || wardrobe.is_empty() {
        return Err(FitrError::invalid_argument(MISSING_PARAMETERS));
    }

    let snapshot = WeatherSnapshot::deserialize(weather)
        .map_err(|e| FitrError::internal(RECOMMENDATION_FAILED, e))?;

    let condition = snapshot
        .primary_condition()
        .map(|c| c.main.as_str())
        .ok_or_else(|| FitrError::internal(RECOMMENDATION_FAILED, "weather has no conditions"))?;
    let temp_f = snapshot.temperature_f();
    if !temp_f.is_finite() {
        return Err(FitrError::internal(
            RECOMMENDATION_FAILED,
            format!("temperature is not a finite number: {temp_f}"),
        ));
    }

    let types = required_types(temp_f, condition);
    let items = select_items(wardrobe, &types);
    debug!(?types, wardrobe = wardrobe.len(), selected = items.len(), "classified wardrobe");

    let outfit = Outfit {
        outfit_id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        description: describe(condition, temp_f, items.len()),
        items,
        weather: weather.clone(),
        created_at: now,
    };

    info!(
        outfit_id = %outfit.outfit_id,
        user_id,
        items = outfit.items.len(),
        "outfit recommended"
    );

    Ok(outfit)
}
