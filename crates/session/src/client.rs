//! Contract the session layer requires from the recommendation service.
//!
//! The machine treats recommendation generation as an opaque async call: it
//! hands over a mood and a time budget and gets back a ranked payload or a
//! failure. Scoring, catalogs and transport all live behind this trait.

use async_trait::async_trait;
use catalog::{Mood, RecommendationPayload, TimeBudget};
use thiserror::Error;

/// Errors a recommendation client can fail with.
///
/// An empty (but well-formed) payload is not an error here; deciding that
/// "nothing matched" is a failed query is session policy, not transport
/// policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The service could not be reached or did not answer in time.
    #[error("Failed to reach recommendation service: {0}")]
    Transport(String),

    /// The service answered with an error of its own.
    #[error("Recommendation service reported an error: {0}")]
    Service(String),

    /// The service answered with something that does not decode.
    #[error("Invalid response from recommendation service: {0}")]
    InvalidResponse(String),
}

/// Common interface for recommendation sources.
///
/// Implementations must return the candidate list already ranked best-first;
/// the session layer never re-sorts it. Timeouts are the implementation's
/// responsibility: the session only needs every call to terminate with a
/// payload or a [`ClientError`].
#[async_trait]
pub trait RecommendationClient: Send + Sync {
    /// Fetch ranked recommendations for one mood / time-budget pair.
    async fn fetch(
        &self,
        mood: Mood,
        time_budget: TimeBudget,
    ) -> Result<RecommendationPayload, ClientError>;
}
