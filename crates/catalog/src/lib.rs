//! # Catalog Crate
//!
//! Shared vocabulary and service records for the StreamPick kiosk.
//!
//! ## Components
//!
//! - **types**: Mood tags, time budgets, and the movie/candidate records
//!   the recommendation service returns
//! - **error**: Error types for parsing user input into the vocabulary
//!
//! ## Example Usage
//!
//! ```
//! use catalog::{Mood, TimeBudget};
//!
//! let mood: Mood = "funny".parse().unwrap();
//! assert_eq!(mood, Mood::Laugh);
//! assert_eq!(mood.label(), "Need Laughs");
//!
//! let budget = TimeBudget::from_minutes(90).unwrap();
//! assert_eq!(budget.label(), "Movie Night");
//! ```

// Public modules
pub mod error;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use types::{Candidate, Mood, Movie, RecommendationPayload, TimeBudget};
