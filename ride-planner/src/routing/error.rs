//! Routing client error types.

/// Errors from route computation.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be parsed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        /// Leading snippet of the offending body, for diagnostics.
        body: Option<String>,
    },

    /// Service returned a non-success HTTP status
    #[error("routing service error {status}: {message}")]
    Api { status: u16, message: String },

    /// Service answered but found no route between the points
    #[error("no route found between the requested points")]
    NoRoute,

    /// Response geometry contained an invalid coordinate
    #[error("invalid coordinate in response geometry: {0}")]
    Geometry(#[from] crate::domain::InvalidPoint),
}

/// Cloneable classification of a routing failure, carried on notices.
///
/// `RoutingError` owns non-cloneable sources (`reqwest::Error`), so the
/// presentation layer gets this reduced form instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteFailure {
    /// The service answered but found no route.
    NoRoute,
    /// Transport-level failure; the service was never reached or the
    /// connection broke.
    Network(String),
    /// The service misbehaved: bad status, bad body, or bad geometry.
    Service(String),
}

impl RoutingError {
    /// Reduce to the cloneable notification form.
    pub fn failure(&self) -> RouteFailure {
        match self {
            RoutingError::Http(e) => RouteFailure::Network(e.to_string()),
            RoutingError::NoRoute => RouteFailure::NoRoute,
            RoutingError::Json { message, .. } => {
                RouteFailure::Service(format!("JSON parse error: {message}"))
            }
            RoutingError::Api { status, message } => {
                RouteFailure::Service(format!("status {status}: {message}"))
            }
            RoutingError::Geometry(e) => RouteFailure::Service(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = RoutingError::NoRoute;
        assert_eq!(
            err.to_string(),
            "no route found between the requested points"
        );

        let err = RoutingError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(
            err.to_string(),
            "routing service error 500: Internal Server Error"
        );

        let err = RoutingError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
    }

    #[test]
    fn failure_classification() {
        assert_eq!(RoutingError::NoRoute.failure(), RouteFailure::NoRoute);

        let api = RoutingError::Api {
            status: 429,
            message: "too many requests".into(),
        };
        assert_eq!(
            api.failure(),
            RouteFailure::Service("status 429: too many requests".into())
        );
    }
}
