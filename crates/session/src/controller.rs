//! Async shell around [`SessionMachine`].
//!
//! The machine itself is pure and synchronous; this controller owns it
//! behind a mutex, executes the queries it issues against a
//! [`RecommendationClient`], and broadcasts a fresh [`Snapshot`] after
//! every accepted intent and every applied response. Rendering layers
//! dispatch intents in and subscribe to snapshots out.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use crate::client::RecommendationClient;
use crate::error::Result;
use crate::machine::SessionMachine;
use crate::types::{Intent, QueryRequest, RequestPhase, Snapshot};

/// Owns one session and the client its queries run against.
pub struct SessionController {
    machine: Arc<Mutex<SessionMachine>>,
    client: Arc<dyn RecommendationClient>,
    /// Broadcast channel — every state change sends the new snapshot.
    tx: broadcast::Sender<Snapshot>,
}

impl SessionController {
    /// Creates a controller for a fresh session.
    pub fn new(client: Arc<dyn RecommendationClient>) -> Self {
        let (tx, _) = broadcast::channel(32);
        Self {
            machine: Arc::new(Mutex::new(SessionMachine::new())),
            client,
            tx,
        }
    }

    /// Applies one intent and returns the snapshot it produced.
    ///
    /// If the intent issued a query, the fetch runs on a background task
    /// and the returned snapshot shows the loading phase; the settled state
    /// arrives via [`subscribe`] or [`wait_for_outcome`]. An invalid intent
    /// changes nothing and produces no snapshot.
    ///
    /// [`subscribe`]: SessionController::subscribe
    /// [`wait_for_outcome`]: SessionController::wait_for_outcome
    pub async fn dispatch(&self, intent: Intent) -> Result<Snapshot> {
        let (snapshot, request) = {
            let mut machine = self.machine.lock().await;
            let request = machine.handle(intent)?;
            (machine.snapshot(), request)
        };

        // Best-effort notify; a renderer may not be subscribed yet.
        let _ = self.tx.send(snapshot.clone());

        if let Some(request) = request {
            self.spawn_fetch(request);
        }
        Ok(snapshot)
    }

    /// The current session snapshot.
    pub async fn snapshot(&self) -> Snapshot {
        self.machine.lock().await.snapshot()
    }

    /// Subscribe to snapshot updates.
    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.tx.subscribe()
    }

    /// Blocks until the session is not loading and returns that snapshot.
    ///
    /// Returns immediately when no query is in flight. Termination while
    /// loading relies on the client contract: every fetch ends with a
    /// payload or an error, and either outcome settles the phase.
    pub async fn wait_for_outcome(&self) -> Snapshot {
        let mut rx = self.tx.subscribe();

        loop {
            // Check current state first; the response may already be in.
            let current = self.snapshot().await;
            if current.phase != RequestPhase::Loading {
                return current;
            }

            match rx.recv().await {
                Ok(snapshot) if snapshot.phase != RequestPhase::Loading => return snapshot,
                Ok(_) => {}
                // Lagged receivers re-check the live state on the next pass.
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => return self.snapshot().await,
            }
        }
    }

    /// Runs one issued query to completion on a background task.
    fn spawn_fetch(&self, request: QueryRequest) {
        let client = Arc::clone(&self.client);
        let machine = Arc::clone(&self.machine);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            debug!("Running query #{}", request.seq);
            let outcome = client.fetch(request.mood, request.time_budget).await;

            let mut machine = machine.lock().await;
            if machine.apply_response(request.seq, outcome) {
                let snapshot = machine.snapshot();
                drop(machine);
                let _ = tx.send(snapshot);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use catalog::{Candidate, Mood, Movie, RecommendationPayload, TimeBudget};

    use crate::client::ClientError;
    use crate::types::Step;

    /// Client that always returns the same two candidates.
    struct StubClient;

    #[async_trait]
    impl RecommendationClient for StubClient {
        async fn fetch(
            &self,
            _mood: Mood,
            _time_budget: TimeBudget,
        ) -> std::result::Result<RecommendationPayload, ClientError> {
            Ok(RecommendationPayload {
                recommendations: vec![
                    Candidate {
                        movie: Movie {
                            title: "First Pick".to_string(),
                            ..Movie::default()
                        },
                        match_score: 91.0,
                        rationale: None,
                    },
                    Candidate {
                        movie: Movie {
                            title: "Second Pick".to_string(),
                            ..Movie::default()
                        },
                        match_score: 84.0,
                        rationale: None,
                    },
                ],
                total_candidates: 2,
                source: "model-ranked".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_dispatch_rejects_invalid_intents() {
        let controller = SessionController::new(Arc::new(StubClient));

        assert!(controller.dispatch(Intent::Retry).await.is_err());
        assert!(controller
            .dispatch(Intent::SelectTime(TimeBudget::QuickWatch))
            .await
            .is_err());

        // Nothing moved.
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.step, Step::Home);
        assert_eq!(snapshot.phase, RequestPhase::Idle);
    }

    #[tokio::test]
    async fn test_dispatch_runs_the_query_to_completion() {
        let controller = SessionController::new(Arc::new(StubClient));
        controller.dispatch(Intent::Start).await.unwrap();
        controller
            .dispatch(Intent::SelectMood(Mood::Cozy))
            .await
            .unwrap();

        let loading = controller
            .dispatch(Intent::SelectTime(TimeBudget::MovieNight))
            .await
            .unwrap();
        assert_eq!(loading.step, Step::Reveal);
        assert_eq!(loading.phase, RequestPhase::Loading);
        assert!(loading.result.is_none());

        let settled = controller.wait_for_outcome().await;
        assert_eq!(settled.phase, RequestPhase::Succeeded);
        let result = settled.result.expect("result installed");
        assert_eq!(result.featured().movie.title, "First Pick");
        assert_eq!(result.alternate_count(), 1);
    }
}
