//! WeatherFetcher: validated location in, canonical snapshot out.

use tracing::{debug, info};

use crate::{
    Config, FitrError, LocationQuery, WeatherRequest, WeatherSnapshot,
    provider::{WeatherProvider, provider_from_config},
};

/// Fetch current conditions through an already-configured provider.
pub async fn fetch(
    provider: &dyn WeatherProvider,
    query: &LocationQuery,
) -> Result<WeatherSnapshot, FitrError> {
    match provider.current_weather(query).await {
        Ok(snapshot) => {
            info!(
                location = %snapshot.name,
                temp_f = snapshot.main.temp,
                "weather snapshot fetched"
            );
            Ok(snapshot)
        }
        Err(err) => {
            // Reported once, by the handler.
            debug!(%query, "weather fetch failed");
            Err(err)
        }
    }
}

/// Resolve the provider from `config`, validate `request`, then fetch.
///
/// The API key is checked first and the location second; neither failure
/// touches the network.
pub async fn fetch_with_config(
    config: &Config,
    request: WeatherRequest,
) -> Result<WeatherSnapshot, FitrError> {
    let provider = provider_from_config(config)?;
    let query = LocationQuery::try_from(request)?;
    fetch(provider.as_ref(), &query).await
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use crate::model::{Condition, Coord, MainReadings, Wind};

    pub fn snapshot(temp: f64, condition: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            coord: Coord { lon: Some(-71.06), lat: Some(42.36) },
            weather: vec![Condition {
                id: 800,
                main: condition.to_string(),
                description: condition.to_lowercase(),
                icon: "01d".to_string(),
            }],
            main: MainReadings {
                temp,
                feels_like: temp - 1.0,
                temp_min: temp - 2.0,
                temp_max: temp + 2.0,
                pressure: 1013,
                humidity: 50,
            },
            wind: Wind { speed: 5.0, deg: 180 },
            name: "Boston".to_string(),
            timestamp: "2025-03-29T12:00:00Z".to_string(),
        }
    }

    /// Records every query and answers with a canned result.
    #[derive(Debug)]
    pub struct FakeProvider {
        calls: AtomicUsize,
        queries: Mutex<Vec<LocationQuery>>,
        result: fn() -> Result<WeatherSnapshot, FitrError>,
    }

    impl FakeProvider {
        pub fn returning(result: fn() -> Result<WeatherSnapshot, FitrError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                queries: Mutex::new(Vec::new()),
                result,
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn queries(&self) -> Vec<LocationQuery> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn current_weather(
            &self,
            query: &LocationQuery,
        ) -> Result<WeatherSnapshot, FitrError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.clone());
            (self.result)()
        }
    }
}
