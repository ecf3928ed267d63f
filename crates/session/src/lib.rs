//! Session orchestration for the StreamPick kiosk.
//!
//! This crate provides:
//! - SessionMachine: the pure four-step state machine (home, mood, time,
//!   reveal) that owns selections, the request lifecycle and one ResultSet
//! - ResultSet: ranked candidates from one query plus featured/alternates
//!   bookkeeping
//! - RecommendationClient: the contract a recommendation source must meet
//! - SessionController: async shell that runs queries and broadcasts
//!   snapshots to rendering layers
//!
//! ## Architecture
//! Renderers never touch session state directly. They dispatch [`Intent`]s
//! into the controller and draw the [`Snapshot`]s that come back out. The
//! machine hands every query out as a [`QueryRequest`] tagged with a seq and
//! only applies the response matching the latest seq, so a stale response
//! can never overwrite a newer one.
//!
//! ## Example Usage
//! ```ignore
//! use session::{Intent, SessionController};
//! use catalog::{Mood, TimeBudget};
//! use std::sync::Arc;
//!
//! let controller = SessionController::new(Arc::new(client));
//! controller.dispatch(Intent::Start).await?;
//! controller.dispatch(Intent::SelectMood(Mood::Cozy)).await?;
//! controller.dispatch(Intent::SelectTime(TimeBudget::MovieNight)).await?;
//!
//! let snapshot = controller.wait_for_outcome().await;
//! if let Some(result) = &snapshot.result {
//!     println!("Tonight: {}", result.featured().movie.title);
//! }
//! ```

pub mod client;
pub mod controller;
pub mod error;
pub mod machine;
pub mod result_set;
pub mod types;

// Re-export main types
pub use client::{ClientError, RecommendationClient};
pub use controller::SessionController;
pub use error::{Result, SessionError};
pub use machine::SessionMachine;
pub use result_set::{resolve_alternate_index, ResultSet};
pub use types::{
    FailureReason, Intent, QueryRequest, QuerySeq, RequestPhase, Selection, Snapshot, Step,
};
