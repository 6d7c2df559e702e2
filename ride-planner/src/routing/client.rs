//! OSRM route service HTTP client.
//!
//! Speaks the OSRM v1 route API. The public demo server is rate limited,
//! so concurrent requests are bounded with a semaphore and identical
//! pairs should be served through [`super::CachedRouteService`].

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::domain::GeoPoint;

use super::convert::{ComputedRoute, convert_response};
use super::error::RoutingError;
use super::service::RouteService;
use super::types::RouteResponse;

/// Default base URL (the public OSRM demo server).
const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 2;

/// Routing profile selecting the service's cost model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutingProfile {
    /// Bicycle routing (the client's default mode of travel).
    #[default]
    Cycling,
    /// Car routing.
    Driving,
    /// Pedestrian routing.
    Walking,
}

impl RoutingProfile {
    /// The profile segment as it appears in request URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingProfile::Cycling => "cycling",
            RoutingProfile::Driving => "driving",
            RoutingProfile::Walking => "walking",
        }
    }
}

/// Configuration for the OSRM client.
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL of the routing service.
    pub base_url: String,
    /// Routing profile for all requests.
    pub profile: RoutingProfile,
    /// Maximum concurrent requests.
    pub max_concurrent: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            profile: RoutingProfile::default(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }
}

impl OsrmConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom base URL (for testing or a self-hosted instance).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the routing profile.
    pub fn with_profile(mut self, profile: RoutingProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// OSRM route API client.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
    profile: RoutingProfile,
    semaphore: Arc<Semaphore>,
}

impl OsrmClient {
    /// Create a new client with the given configuration.
    pub fn new(config: OsrmConfig) -> Result<Self, RoutingError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            profile: config.profile,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Compute one route from `start` to `end`.
    ///
    /// The URL carries coordinates in the wire's lng,lat order; the
    /// response geometry is converted back to canonical order before it
    /// leaves this client.
    pub async fn route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> Result<ComputedRoute, RoutingError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| RoutingError::Api {
                status: 0,
                message: "semaphore closed".to_string(),
            })?;

        let url = format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.base_url,
            self.profile.as_str(),
            start.lng(),
            start.lat(),
            end.lng(),
            end.lat()
        );

        let response = self
            .http
            .get(&url)
            .query(&[("geometries", "geojson"), ("overview", "full")])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RoutingError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let parsed: RouteResponse =
            serde_json::from_str(&body).map_err(|e| RoutingError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        convert_response(parsed)
    }
}

impl RouteService for OsrmClient {
    fn fetch_route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> impl Future<Output = Result<ComputedRoute, RoutingError>> + Send {
        self.route(start, end)
    }
}
