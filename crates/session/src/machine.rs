//! The four-step session state machine.
//!
//! One `SessionMachine` is the single authority over step transitions,
//! selections and the request lifecycle for one user session. It is pure
//! state: queries come out as [`QueryRequest`] values for the caller to
//! execute, and their outcomes come back in through [`apply_response`]
//! tagged with the request's seq.
//!
//! Flow:
//!
//! ```text
//! Home --start--> MoodSelect --select_mood--> TimeSelect --select_time--> Reveal
//!                                                                          |
//!              restart (from anywhere) --> Home          retry / alternates-+
//! ```
//!
//! [`apply_response`]: SessionMachine::apply_response

use catalog::{Mood, RecommendationPayload, TimeBudget};
use tracing::{debug, info, warn};

use crate::client::ClientError;
use crate::error::{Result, SessionError};
use crate::result_set::ResultSet;
use crate::types::{
    FailureReason, Intent, QueryRequest, QuerySeq, RequestPhase, Selection, Snapshot, Step,
};

/// Drives one user session through the guided flow.
///
/// All transitions are synchronous and atomic: an intent is fully processed
/// before the next one is looked at. The machine performs no IO.
#[derive(Debug)]
pub struct SessionMachine {
    step: Step,
    selection: Selection,
    phase: RequestPhase,
    result: Option<ResultSet>,
    /// Last seq handed out. Never reset, so a query issued after a restart
    /// can always be told apart from one issued before it.
    last_seq: QuerySeq,
    /// Seq whose response we are waiting for; responses to any other seq
    /// are dropped on arrival.
    awaited: Option<QuerySeq>,
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionMachine {
    /// A fresh session sitting on the home screen.
    pub fn new() -> Self {
        Self {
            step: Step::Home,
            selection: Selection::default(),
            phase: RequestPhase::Idle,
            result: None,
            last_seq: 0,
            awaited: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn phase(&self) -> &RequestPhase {
        &self.phase
    }

    pub fn result(&self) -> Option<&ResultSet> {
        self.result.as_ref()
    }

    /// Read-only copy of the whole session for rendering.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            step: self.step,
            selection: self.selection,
            phase: self.phase.clone(),
            result: self.result.clone(),
        }
    }

    /// Dispatches one intent. `Ok(Some(request))` means the caller must now
    /// execute that query and feed the outcome back via `apply_response`.
    pub fn handle(&mut self, intent: Intent) -> Result<Option<QueryRequest>> {
        match intent {
            Intent::Start => self.start().map(|()| None),
            Intent::SelectMood(mood) => self.select_mood(mood).map(|()| None),
            Intent::SelectTime(time_budget) => self.select_time(time_budget).map(Some),
            Intent::SelectAlternate(position) => self.select_alternate(position).map(|()| None),
            Intent::Retry => self.retry(),
            Intent::Restart => {
                self.restart();
                Ok(None)
            }
            Intent::Back => {
                self.back();
                Ok(None)
            }
        }
    }

    /// Leaves the home screen for the mood menu.
    pub fn start(&mut self) -> Result<()> {
        if self.step != Step::Home {
            return Err(self.rejected("start"));
        }
        self.step = Step::MoodSelect;
        Ok(())
    }

    /// Records the mood and moves on to the time menu.
    pub fn select_mood(&mut self, mood: Mood) -> Result<()> {
        if self.step != Step::MoodSelect {
            return Err(self.rejected("select a mood"));
        }
        self.selection.mood = Some(mood);
        self.step = Step::TimeSelect;
        Ok(())
    }

    /// Records the time budget and issues the query. The step becomes
    /// `Reveal` immediately; the loading view shows until the response for
    /// the returned request lands.
    pub fn select_time(&mut self, time_budget: TimeBudget) -> Result<QueryRequest> {
        if self.step != Step::TimeSelect {
            return Err(self.rejected("select a time budget"));
        }
        // Unreachable in practice: the only ways into TimeSelect record a
        // mood first. Rejecting keeps the "no query without a mood" rule
        // independent of how the machine got here.
        let Some(mood) = self.selection.mood else {
            return Err(self.rejected("select a time budget"));
        };
        self.selection.time_budget = Some(time_budget);
        Ok(self.issue_query(mood, time_budget))
    }

    /// Re-issues the query with the unchanged current selection.
    ///
    /// Valid only on the reveal screen once the previous query has settled.
    /// While one is still loading this is an idempotent no-op (`Ok(None)`):
    /// queries are never queued or raced against each other.
    pub fn retry(&mut self) -> Result<Option<QueryRequest>> {
        if self.step != Step::Reveal {
            return Err(self.rejected("retry"));
        }
        if self.phase == RequestPhase::Loading {
            debug!("Retry ignored, a query is already in flight");
            return Ok(None);
        }
        match (self.selection.mood, self.selection.time_budget) {
            (Some(mood), Some(time_budget)) => Ok(Some(self.issue_query(mood, time_budget))),
            _ => Err(self.rejected("retry")),
        }
    }

    /// Swaps the featured pick for the alternate at `display_position`.
    /// Pure presentation: no query is issued.
    pub fn select_alternate(&mut self, display_position: usize) -> Result<()> {
        let Some(result) = self.result.as_mut() else {
            return Err(self.rejected("pick an alternate"));
        };
        let original_index = result.select_alternate(display_position)?;
        debug!("Featured pick is now candidate {original_index}");
        Ok(())
    }

    /// Steps backwards one screen. A no-op on the home screen.
    ///
    /// Selections made so far are kept; leaving the reveal screen discards
    /// its result and orphans any in-flight query, whose response will be
    /// dropped on arrival.
    pub fn back(&mut self) {
        match self.step {
            Step::Home => {}
            Step::MoodSelect => self.step = Step::Home,
            Step::TimeSelect => self.step = Step::MoodSelect,
            Step::Reveal => {
                self.step = Step::TimeSelect;
                self.phase = RequestPhase::Idle;
                self.result = None;
                self.awaited = None;
            }
        }
    }

    /// Returns to the home screen, clearing the selection and any result.
    /// Valid from anywhere, whatever the request phase; an in-flight query's
    /// response will be dropped on arrival.
    pub fn restart(&mut self) {
        info!("Session restarted");
        self.step = Step::Home;
        self.selection = Selection::default();
        self.phase = RequestPhase::Idle;
        self.result = None;
        self.awaited = None;
    }

    fn issue_query(&mut self, mood: Mood, time_budget: TimeBudget) -> QueryRequest {
        self.last_seq += 1;
        let request = QueryRequest {
            seq: self.last_seq,
            mood,
            time_budget,
        };
        self.awaited = Some(request.seq);
        self.phase = RequestPhase::Loading;
        self.result = None;
        self.step = Step::Reveal;
        info!(
            "Query #{} issued (mood: {}, time: {} min)",
            request.seq,
            mood,
            time_budget.minutes()
        );
        request
    }

    /// Feeds a query outcome back into the session. Returns `true` if the
    /// outcome was applied, `false` if it was dropped as stale.
    ///
    /// Only the response to the most recently issued request is applied.
    /// Anything else arrives after a back, restart or newer query has made
    /// it irrelevant, and applying it would resurrect a view the user has
    /// already left.
    pub fn apply_response(
        &mut self,
        seq: QuerySeq,
        outcome: std::result::Result<RecommendationPayload, ClientError>,
    ) -> bool {
        if self.awaited != Some(seq) {
            debug!("Dropping stale response to query #{seq}");
            return false;
        }
        self.awaited = None;
        match outcome {
            Ok(payload) => match ResultSet::from_payload(payload) {
                Some(result) => {
                    info!(
                        "Query #{} returned {} candidates (source: {})",
                        seq,
                        result.candidate_count(),
                        result.source()
                    );
                    self.result = Some(result);
                    self.phase = RequestPhase::Succeeded;
                }
                None => {
                    info!("Query #{seq} matched nothing");
                    self.phase = RequestPhase::Failed(FailureReason::NoCandidates);
                }
            },
            Err(error) => {
                warn!("Query #{seq} failed: {error}");
                self.phase = RequestPhase::Failed(FailureReason::from(error));
            }
        }
        true
    }

    fn rejected(&self, intent: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            step: self.step,
            intent,
        }
    }
}
