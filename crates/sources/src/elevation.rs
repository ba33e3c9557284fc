//! Elevation lookup transports.
//!
//! `ElevationService` is the seam between the sampler and the network: the
//! HTTP implementation talks to the batched at-many-points endpoint, the
//! in-memory one serves canned responses for tests and offline runs.

use tokio::sync::Mutex;
use tracing::debug;

use crate::BoxFuture;
use crate::error::{SourceError, SourceErrorKind};
use crate::protocol::{ElevationRequest, ElevationResponse};

pub const DEFAULT_ELEVATION_URL: &str = "https://elevation-api.arcgis.com/arcgis/rest/services/elevation-service/v1/elevation/at-many-points";

/// Trait for batched elevation lookups.
///
/// Implementations must be `Send + Sync` so a sampler can be shared by
/// concurrently running fetches.
pub trait ElevationService: Send + Sync {
    /// Looks up elevations for every point of `request`.
    ///
    /// Returns the decoded body as-is; shape checks (missing `elevations`,
    /// count mismatches) belong to the sampler.
    fn lookup<'a>(
        &'a self,
        request: &'a ElevationRequest,
    ) -> BoxFuture<'a, Result<ElevationResponse, SourceError>>;
}

/// HTTP transport for the at-many-points endpoint.
pub struct HttpElevationService {
    url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpElevationService {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        Self::with_client(url, api_key, reqwest::Client::new())
    }

    pub fn with_client(
        url: impl Into<String>,
        api_key: Option<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            url: url.into(),
            api_key,
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn request(&self, request: &ElevationRequest) -> reqwest::RequestBuilder {
        self.client
            .post(&self.url)
            .query(&[("apiKey", self.api_key.as_deref().unwrap_or(""))])
            .json(request)
    }
}

impl ElevationService for HttpElevationService {
    fn lookup<'a>(
        &'a self,
        request: &'a ElevationRequest,
    ) -> BoxFuture<'a, Result<ElevationResponse, SourceError>> {
        Box::pin(async move {
            debug!(
                "posting {} locations to {}",
                request.points.len(),
                self.url
            );
            let resp = self.request(request).send().await.map_err(|e| {
                SourceError::with_source(SourceErrorKind::Transport, "elevation request failed", e)
            })?;

            if !resp.status().is_success() {
                return Err(SourceError::new(
                    SourceErrorKind::Status,
                    format!("elevation service HTTP {}", resp.status()),
                ));
            }

            resp.json::<ElevationResponse>().await.map_err(|e| {
                SourceError::with_source(
                    SourceErrorKind::Decode,
                    "elevation response was not valid JSON",
                    e,
                )
            })
        })
    }
}

type Responder =
    Box<dyn Fn(&ElevationRequest) -> Result<ElevationResponse, SourceError> + Send + Sync>;

/// In-memory elevation source for testing or offline runs.
///
/// Every lookup is recorded so callers can inspect what was requested.
pub struct MemoryElevationService {
    responder: Responder,
    requests: Mutex<Vec<ElevationRequest>>,
}

impl MemoryElevationService {
    pub fn new(
        responder: impl Fn(&ElevationRequest) -> Result<ElevationResponse, SourceError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Serves the same body for every lookup.
    pub fn responding(response: ElevationResponse) -> Self {
        Self::new(move |_| Ok(response.clone()))
    }

    pub fn failing(kind: SourceErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(move |_| Err(SourceError::new(kind, message.clone())))
    }

    /// Answers with `f(latitude, longitude)` for each point, in request order.
    pub fn from_fn(f: impl Fn(f64, f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::new(move |req| {
            Ok(ElevationResponse::from_elevations(
                req.points.iter().map(|p| f(p.latitude, p.longitude)),
            ))
        })
    }

    pub async fn requests(&self) -> Vec<ElevationRequest> {
        self.requests.lock().await.clone()
    }
}

impl ElevationService for MemoryElevationService {
    fn lookup<'a>(
        &'a self,
        request: &'a ElevationRequest,
    ) -> BoxFuture<'a, Result<ElevationResponse, SourceError>> {
        Box::pin(async move {
            self.requests.lock().await.push(request.clone());
            (self.responder)(request)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_ELEVATION_URL, HttpElevationService};
    use crate::lattice::LatticeLocation;
    use crate::protocol::ElevationRequest;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn points() -> ElevationRequest {
        ElevationRequest::new(vec![
            LatticeLocation {
                latitude: 47.5,
                longitude: -56.5,
            },
            LatticeLocation {
                latitude: 48.0,
                longitude: -56.0,
            },
        ])
    }

    #[test]
    fn request_posts_points_with_key_in_query() {
        let service = HttpElevationService::new(DEFAULT_ELEVATION_URL, Some("AAPK-test".into()));
        let req = service.request(&points()).build().unwrap();

        assert_eq!(req.method(), reqwest::Method::POST);
        assert_eq!(req.url().host_str(), Some("elevation-api.arcgis.com"));
        assert!(req.url().path().ends_with("/elevation/at-many-points"));
        let query: Vec<(String, String)> = req.url().query_pairs().into_owned().collect();
        assert_eq!(query, vec![("apiKey".to_string(), "AAPK-test".to_string())]);

        let body: Value = serde_json::from_slice(req.body().unwrap().as_bytes().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "points": [
                    {"latitude": 47.5, "longitude": -56.5},
                    {"latitude": 48.0, "longitude": -56.0}
                ],
                "f": "json"
            })
        );
    }

    #[test]
    fn missing_key_sends_empty_credential() {
        let service = HttpElevationService::new("http://localhost:9/elevation", None);
        let req = service.request(&points()).build().unwrap();
        assert_eq!(req.url().query(), Some("apiKey="));
    }
}
