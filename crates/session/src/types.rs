//! Types shared across the session crate.

use std::fmt;

use catalog::{Mood, TimeBudget};

use crate::client::ClientError;
use crate::result_set::ResultSet;

// =============================================================================
// Type Aliases
// =============================================================================

/// Monotonically increasing id for recommendation queries. Only the response
/// carrying the most recently issued seq is ever applied, which is what keeps
/// a slow response from clobbering a newer one.
pub type QuerySeq = u64;

// =============================================================================
// Flow position
// =============================================================================

/// Where the user is in the guided flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Landing screen, nothing selected yet.
    Home,
    /// Choosing a mood.
    MoodSelect,
    /// Choosing a time budget.
    TimeSelect,
    /// Showing the loading / result / failure view for one query.
    Reveal,
}

/// The user's accumulated input for one pass through the flow.
///
/// A query is issued only once both fields are set; both are cleared
/// together on restart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub mood: Option<Mood>,
    pub time_budget: Option<TimeBudget>,
}

// =============================================================================
// User intents
// =============================================================================

/// A discrete action from the rendering layer.
///
/// Intents are the only way session state changes; renderers consume
/// [`Snapshot`]s and emit these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Start,
    SelectMood(Mood),
    SelectTime(TimeBudget),
    SelectAlternate(usize),
    Retry,
    Restart,
    Back,
}

// =============================================================================
// Request lifecycle
// =============================================================================

/// Why a query produced no result to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The service answered but had nothing to recommend.
    NoCandidates,
    /// The query could not complete; the message is user-displayable.
    Transport(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NoCandidates => write!(f, "No titles matched this mood and time"),
            FailureReason::Transport(message) => f.write_str(message),
        }
    }
}

impl From<ClientError> for FailureReason {
    fn from(error: ClientError) -> Self {
        FailureReason::Transport(error.to_string())
    }
}

/// Lifecycle of the at-most-one outstanding recommendation query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestPhase {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed(FailureReason),
}

/// One query the machine wants executed against the recommendation service.
///
/// The machine never performs IO itself; it hands these out and expects the
/// eventual outcome back via `apply_response` with the same `seq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryRequest {
    pub seq: QuerySeq,
    pub mood: Mood,
    pub time_budget: TimeBudget,
}

// =============================================================================
// Snapshots
// =============================================================================

/// Read-only view of the session, recomputed after every accepted intent.
///
/// Renderers own nothing: they draw whatever the latest snapshot says and
/// feed [`Intent`]s back in.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub step: Step,
    pub selection: Selection,
    pub phase: RequestPhase,
    /// Present only while the Reveal step has a successful query to show.
    pub result: Option<ResultSet>,
}
