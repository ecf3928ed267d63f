//! HTTP client for the recommendation backend.
//!
//! This crate provides the [`session::RecommendationClient`] implementation
//! the kiosk runs against in production. It handles:
//! - Encoding mood / time-budget queries the way the backend expects them
//! - Decoding ranked payloads and the backend's `{error, message}` bodies
//! - Mapping transport, service and decode failures onto [`ClientError`]
//! - The subscriber-capture endpoint, which is kiosk-only and never touches
//!   the session layer

use std::time::Duration;

use async_trait::async_trait;
use catalog::{Mood, RecommendationPayload, TimeBudget};
use serde::{Deserialize, Serialize};
use session::{ClientError, RecommendationClient};
use tracing::{debug, info, warn};

/// How long a query may run before the client gives up on it. The session
/// layer never times out on its own; a terminal failure has to come from
/// here.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecommendationQuery {
    mood: Mood,
    time_available: TimeBudget,
}

/// Error body the backend attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
struct ServiceError {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// One signup for the recommendation mailing list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest {
    pub name: String,
    pub email: String,
    pub preferred_moods: Vec<Mood>,
}

/// The backend's answer to a signup attempt. `success: false` with a 2xx
/// status means a rejected signup (e.g. already subscribed), not a failure.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionAck {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub email: Option<String>,
}

// =============================================================================
// Client
// =============================================================================

/// Client for the recommendation backend's JSON API.
pub struct HttpRecommendationClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRecommendationClient {
    /// Creates a client for the backend at `base_url` (e.g.
    /// "http://localhost:8080") with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        info!("Using recommendation service at {}", base_url);
        Ok(Self { http, base_url })
    }

    /// Base URL of the backend this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Posts one signup to the subscriber endpoint.
    pub async fn subscribe(
        &self,
        request: &SubscriptionRequest,
    ) -> Result<SubscriptionAck, ClientError> {
        let url = format!("{}/api/subscribers/add", self.base_url);
        debug!("POST {} ({})", url, request.email);

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(service_error(response).await);
        }

        response
            .json::<SubscriptionAck>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl RecommendationClient for HttpRecommendationClient {
    async fn fetch(
        &self,
        mood: Mood,
        time_budget: TimeBudget,
    ) -> Result<RecommendationPayload, ClientError> {
        let url = format!("{}/api/recommendations", self.base_url);
        debug!(
            "POST {} (mood: {}, time: {} min)",
            url,
            mood,
            time_budget.minutes()
        );

        let response = self
            .http
            .post(&url)
            .json(&RecommendationQuery {
                mood,
                time_available: time_budget,
            })
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(service_error(response).await);
        }

        response
            .json::<RecommendationPayload>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

/// Turns a non-2xx response into the most informative error available:
/// the backend's own message if the body decodes, the HTTP status if not.
async fn service_error(response: reqwest::Response) -> ClientError {
    let status = response.status();
    match response.json::<ServiceError>().await {
        Ok(body) => {
            let message = body
                .message
                .or(body.error)
                .unwrap_or_else(|| format!("HTTP {status}"));
            warn!("Recommendation service answered {}: {}", status, message);
            ClientError::Service(message)
        }
        Err(_) => ClientError::Service(format!("HTTP {status}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    // ============================================================================
    // Mock backend
    // ============================================================================

    /// Start a mock backend on a random port.
    async fn start_mock_service(router: Router) -> (String, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock service");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Mock service failed");
        });

        (format!("http://{}", addr), handle)
    }

    fn ranked_fixture() -> Value {
        json!({
            "recommendations": [
                {
                    "movie": {
                        "uid": "mv-042",
                        "title": "Mad Max: Fury Road",
                        "year": 2015,
                        "runtime": 120,
                        "rating": 8.1,
                        "genre": ["Action"],
                        "moodTags": ["thrilling"],
                        "platforms": ["HBO Max"],
                        "description": "A relentless chase across the wasteland.",
                        "imageUrl": "https://img.example/fury-road.jpg"
                    },
                    "matchScore": 96.0,
                    "aiReason": "Non-stop tension that fits a short window."
                },
                {
                    "movie": { "title": "Run Lola Run", "runtime": 80 },
                    "matchScore": 88.5
                }
            ],
            "totalCandidates": 17,
            "source": "model-ranked"
        })
    }

    #[tokio::test]
    async fn test_fetch_decodes_ranked_payload() {
        let observed = Arc::new(Mutex::new(None::<Value>));
        let observed_in = Arc::clone(&observed);

        let router = Router::new().route(
            "/api/recommendations",
            post(move |Json(body): Json<Value>| {
                let observed = Arc::clone(&observed_in);
                async move {
                    *observed.lock().unwrap() = Some(body);
                    Json(ranked_fixture())
                }
            }),
        );
        let (base_url, server) = start_mock_service(router).await;

        let client = HttpRecommendationClient::new(&base_url).expect("client builds");
        let payload = client
            .fetch(Mood::Thrilling, TimeBudget::QuickWatch)
            .await
            .expect("fetch succeeds");

        assert_eq!(payload.recommendations.len(), 2);
        assert_eq!(payload.total_candidates, 17);
        assert_eq!(payload.source, "model-ranked");
        assert_eq!(payload.recommendations[0].movie.title, "Mad Max: Fury Road");
        assert_eq!(payload.recommendations[0].match_score, 96.0);
        assert!(payload.recommendations[1].rationale.is_none());

        // The backend saw exactly the wire format it documents.
        let body = observed.lock().unwrap().take().expect("request captured");
        assert_eq!(body, json!({"mood": "thrilling", "timeAvailable": 30}));

        server.abort();
    }

    #[tokio::test]
    async fn test_empty_payload_passes_through() {
        let router = Router::new().route(
            "/api/recommendations",
            post(|| async {
                Json(json!({
                    "recommendations": [],
                    "totalCandidates": 0,
                    "source": "heuristic-fallback"
                }))
            }),
        );
        let (base_url, server) = start_mock_service(router).await;

        let client = HttpRecommendationClient::new(&base_url).expect("client builds");
        let payload = client
            .fetch(Mood::Chill, TimeBudget::BingeMode)
            .await
            .expect("empty is not an error here");

        // Turning "nothing matched" into a failure is session policy.
        assert!(payload.recommendations.is_empty());
        assert_eq!(payload.source, "heuristic-fallback");

        server.abort();
    }

    #[tokio::test]
    async fn test_service_error_body_is_surfaced() {
        let router = Router::new().route(
            "/api/recommendations",
            post(|| async {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({
                        "error": "Service Unavailable",
                        "message": "Recommendation engine is warming up"
                    })),
                )
            }),
        );
        let (base_url, server) = start_mock_service(router).await;

        let client = HttpRecommendationClient::new(&base_url).expect("client builds");
        let err = client
            .fetch(Mood::Cozy, TimeBudget::MovieNight)
            .await
            .expect_err("503 is an error");

        match err {
            ClientError::Service(message) => {
                assert_eq!(message, "Recommendation engine is warming up");
            }
            other => panic!("expected a service error, got {other:?}"),
        }

        server.abort();
    }

    #[tokio::test]
    async fn test_garbled_body_is_invalid_response() {
        let router = Router::new().route(
            "/api/recommendations",
            post(|| async { Json(json!({"unexpected": true})) }),
        );
        let (base_url, server) = start_mock_service(router).await;

        let client = HttpRecommendationClient::new(&base_url).expect("client builds");
        let err = client
            .fetch(Mood::Laugh, TimeBudget::MovieNight)
            .await
            .expect_err("unparseable body is an error");
        assert!(matches!(err, ClientError::InvalidResponse(_)));

        server.abort();
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        // Bind and immediately drop a listener to get a port nobody serves.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = HttpRecommendationClient::new(format!("http://127.0.0.1:{port}"))
            .expect("client builds");
        let err = client
            .fetch(Mood::Escape, TimeBudget::QuickWatch)
            .await
            .expect_err("nothing is listening");
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[tokio::test]
    async fn test_subscribe_posts_preferences() {
        let observed = Arc::new(Mutex::new(None::<Value>));
        let observed_in = Arc::clone(&observed);

        let router = Router::new().route(
            "/api/subscribers/add",
            post(move |Json(body): Json<Value>| {
                let observed = Arc::clone(&observed_in);
                async move {
                    *observed.lock().unwrap() = Some(body);
                    Json(json!({
                        "success": true,
                        "message": "Subscribed!",
                        "email": "sam@example.com"
                    }))
                }
            }),
        );
        let (base_url, server) = start_mock_service(router).await;

        let client = HttpRecommendationClient::new(&base_url).expect("client builds");
        let ack = client
            .subscribe(&SubscriptionRequest {
                name: "Sam".to_string(),
                email: "sam@example.com".to_string(),
                preferred_moods: vec![Mood::Cozy, Mood::Laugh],
            })
            .await
            .expect("subscribe succeeds");

        assert!(ack.success);
        assert_eq!(ack.message, "Subscribed!");
        assert_eq!(ack.email.as_deref(), Some("sam@example.com"));

        let body = observed.lock().unwrap().take().expect("request captured");
        assert_eq!(
            body,
            json!({
                "name": "Sam",
                "email": "sam@example.com",
                "preferredMoods": ["cozy", "laugh"]
            })
        );

        server.abort();
    }
}
