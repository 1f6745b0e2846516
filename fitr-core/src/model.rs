use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};

use crate::error::FitrError;

pub const MISSING_LOCATION: &str = "Must provide either city name or coordinates";

/// Raw `get_weather_data` payload, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherRequest {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// Where to look up the weather. A city name takes precedence over coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

impl LocationQuery {
    pub fn city(name: impl Into<String>) -> Self {
        LocationQuery::City(name.into())
    }

    pub fn coordinates(lat: f64, lon: f64) -> Self {
        LocationQuery::Coordinates { lat, lon }
    }

    /// Query-string pairs identifying the location for the upstream API.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            LocationQuery::City(name) => vec![("q", name.clone())],
            LocationQuery::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        }
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationQuery::City(name) => write!(f, "city '{name}'"),
            LocationQuery::Coordinates { lat, lon } => write!(f, "({lat}, {lon})"),
        }
    }
}

impl TryFrom<WeatherRequest> for LocationQuery {
    type Error = FitrError;

    fn try_from(req: WeatherRequest) -> Result<Self, Self::Error> {
        if let Some(city) = req.city.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            return Ok(LocationQuery::City(city.to_string()));
        }

        match (req.lat, req.lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                Ok(LocationQuery::Coordinates { lat, lon })
            }
            _ => Err(FitrError::invalid_argument(MISSING_LOCATION)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lon: Option<f64>,
    pub lat: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// Temperatures are Fahrenheit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: u32,
    pub humidity: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: u16,
}

/// Canonical weather record handed back by `get_weather_data` and accepted
/// by `get_outfit_recommendation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    #[serde(default)]
    pub coord: Coord,
    pub weather: Vec<Condition>,
    pub main: MainReadings,
    pub wind: Wind,
    pub name: String,
    /// ISO-8601, kept exactly as produced or received.
    #[serde(deserialize_with = "iso8601")]
    pub timestamp: String,
}

impl WeatherSnapshot {
    pub fn primary_condition(&self) -> Option<&Condition> {
        self.weather.first()
    }

    pub fn temperature_f(&self) -> f64 {
        self.main.temp
    }
}

/// Accepts RFC 3339 as well as offset-free local times such as
/// `2025-03-29T12:00:00.123456`.
pub fn is_iso8601(raw: &str) -> bool {
    DateTime::parse_from_rfc3339(raw).is_ok()
        || NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}

fn iso8601<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = String::deserialize(deserializer)?;
    if is_iso8601(&raw) {
        Ok(raw)
    } else {
        Err(de::Error::custom(format!("timestamp is not ISO-8601: {raw}")))
    }
}

/// A wardrobe entry. Only `type` is interpreted; everything else rides along.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClothingItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl ClothingItem {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outfit {
    pub outfit_id: String,
    pub user_id: String,
    pub items: Vec<ClothingItem>,
    /// The caller's snapshot, untouched.
    pub weather: Value,
    pub created_at: DateTime<Utc>,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: Value) -> WeatherRequest {
        serde_json::from_value(value).expect("request should deserialize")
    }

    #[test]
    fn city_is_preferred_over_coordinates() {
        let q = LocationQuery::try_from(request(json!({"city": "Boston", "lat": 1.0, "lon": 2.0})))
            .unwrap();
        assert_eq!(q, LocationQuery::city("Boston"));
        assert_eq!(q.query_params(), vec![("q", "Boston".to_string())]);
    }

    #[test]
    fn coordinates_used_when_city_blank() {
        let q = LocationQuery::try_from(request(json!({"city": "  ", "lat": 42.36, "lon": -71.06})))
            .unwrap();
        assert_eq!(q, LocationQuery::coordinates(42.36, -71.06));
        assert_eq!(
            q.query_params(),
            vec![("lat", "42.36".to_string()), ("lon", "-71.06".to_string())]
        );
    }

    #[test]
    fn zero_coordinates_are_valid() {
        let q = LocationQuery::try_from(request(json!({"lat": 0.0, "lon": 0.0}))).unwrap();
        assert_eq!(q, LocationQuery::coordinates(0.0, 0.0));
    }

    #[test]
    fn missing_location_is_invalid_argument() {
        for payload in [json!({}), json!({"lat": 10.0}), json!({"city": ""})] {
            let err = LocationQuery::try_from(request(payload)).unwrap_err();
            assert!(matches!(err, FitrError::InvalidArgument { .. }));
            assert_eq!(err.message(), MISSING_LOCATION);
        }
    }

    #[test]
    fn clothing_item_passes_unknown_fields_through() {
        let raw = json!({"type": "coat", "color": "navy", "id": "abc", "weather_tags": ["Cold"]});
        let item: ClothingItem = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(item.kind, "coat");
        assert_eq!(item.attributes.get("color"), Some(&json!("navy")));
        assert_eq!(serde_json::to_value(&item).unwrap(), raw);
    }

    #[test]
    fn snapshot_defaults_missing_coord_and_wind_direction() {
        let snapshot: WeatherSnapshot = serde_json::from_value(json!({
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "main": {"temp": 60.5, "feels_like": 59.0, "temp_min": 58.0, "temp_max": 62.0,
                     "pressure": 1012, "humidity": 40},
            "wind": {"speed": 3.4},
            "name": "Nowhere",
            "timestamp": "2025-03-29T12:00:00Z"
        }))
        .unwrap();

        assert_eq!(snapshot.coord, Coord::default());
        assert_eq!(snapshot.wind.deg, 0);
        assert_eq!(snapshot.primary_condition().map(|c| c.main.as_str()), Some("Clear"));
    }

    #[test]
    fn timestamp_accepts_iso8601_variants() {
        for ts in [
            "2025-03-29T12:00:00Z",
            "2025-03-29T08:00:00-04:00",
            "2025-03-29T12:00:00.123456",
            "2025-03-29T12:00:00",
        ] {
            assert!(is_iso8601(ts), "{ts}");
        }
        assert!(!is_iso8601("yesterday"));
        assert!(!is_iso8601("2025-03-29"));
    }

    #[test]
    fn snapshot_rejects_non_iso_timestamp() {
        let err = serde_json::from_value::<WeatherSnapshot>(json!({
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "main": {"temp": 60, "feels_like": 59, "temp_min": 58, "temp_max": 62,
                     "pressure": 1012, "humidity": 40},
            "wind": {"speed": 3},
            "name": "Nowhere",
            "timestamp": "last tuesday"
        }))
        .unwrap_err();

        assert!(err.to_string().contains("ISO-8601"));
    }
}
