//! Daily climate feed.

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::BoxFuture;
use crate::error::{SourceError, SourceErrorKind};
use crate::protocol::ClimateObservation;

pub const DEFAULT_WEATHER_URL: &str = "https://api.weather.gc.ca/collections/climate-daily/items";

pub trait WeatherService: Send + Sync {
    /// Latest observation, `Ok(None)` when the collection has no usable
    /// feature.
    fn latest(&self) -> BoxFuture<'_, Result<Option<ClimateObservation>, SourceError>>;
}

pub struct HttpWeatherService {
    url: String,
    limit: u32,
    client: reqwest::Client,
}

impl HttpWeatherService {
    pub fn new(url: impl Into<String>, limit: u32) -> Self {
        Self {
            url: url.into(),
            limit: limit.max(1),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn request(&self) -> reqwest::RequestBuilder {
        self.client
            .get(&self.url)
            .query(&[("limit", self.limit.to_string()), ("f", "json".to_string())])
    }
}

impl WeatherService for HttpWeatherService {
    fn latest(&self) -> BoxFuture<'_, Result<Option<ClimateObservation>, SourceError>> {
        Box::pin(async move {
            debug!("fetching climate observations from {}", self.url);
            let resp = self.request().send().await.map_err(|e| {
                SourceError::with_source(SourceErrorKind::Transport, "weather request failed", e)
            })?;

            if !resp.status().is_success() {
                return Err(SourceError::new(
                    SourceErrorKind::Status,
                    format!("weather service HTTP {}", resp.status()),
                ));
            }

            let body: Value = resp.json().await.map_err(|e| {
                SourceError::with_source(
                    SourceErrorKind::Decode,
                    "weather response was not valid JSON",
                    e,
                )
            })?;
            Ok(first_observation(&body))
        })
    }
}

/// Properties of the first feature in a feature collection.
pub fn first_observation(body: &Value) -> Option<ClimateObservation> {
    let props = body
        .get("features")
        .and_then(|f| f.as_array())
        .and_then(|f| f.first())
        .and_then(|f| f.get("properties"))?;
    serde_json::from_value(props.clone()).ok()
}

/// Canned weather for tests and offline runs.
pub struct MemoryWeatherService {
    reply: Result<Option<ClimateObservation>, (SourceErrorKind, String)>,
    calls: Mutex<usize>,
}

impl MemoryWeatherService {
    pub fn new(observation: Option<ClimateObservation>) -> Self {
        Self {
            reply: Ok(observation),
            calls: Mutex::new(0),
        }
    }

    pub fn failing(kind: SourceErrorKind, message: impl Into<String>) -> Self {
        Self {
            reply: Err((kind, message.into())),
            calls: Mutex::new(0),
        }
    }

    pub async fn calls(&self) -> usize {
        *self.calls.lock().await
    }
}

impl WeatherService for MemoryWeatherService {
    fn latest(&self) -> BoxFuture<'_, Result<Option<ClimateObservation>, SourceError>> {
        Box::pin(async move {
            *self.calls.lock().await += 1;
            match &self.reply {
                Ok(obs) => Ok(obs.clone()),
                Err((kind, message)) => Err(SourceError::new(*kind, message.clone())),
            }
        })
    }
}

/// Weather service wrapper that reports failures as "no data".
pub struct WeatherFeed<S> {
    service: S,
}

impl<S: WeatherService> WeatherFeed<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub async fn fetch(&self) -> Option<ClimateObservation> {
        match self.service.latest().await {
            Ok(Some(obs)) => Some(obs),
            Ok(None) => {
                debug!("weather collection had no features");
                None
            }
            Err(err) => {
                warn!("weather fetch failed: {err}");
                None
            }
        }
    }
}
