//! Core domain types for the StreamPick kiosk.
//!
//! Two kinds of types live here: the fixed vocabulary the kiosk asks the
//! user about (mood tags, time budgets) and the passthrough records the
//! recommendation service returns (movies, candidates, payloads). The
//! passthrough types mirror the service's JSON field names exactly; the
//! session logic renders them but never branches on their contents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;

// =============================================================================
// Mood tags
// =============================================================================

/// The user's requested viewing tone.
///
/// Wire ids are the lowercase variant names ("cozy", "thrilling", ...), the
/// same ids the recommendation service keys its mood profiles on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Cozy,
    Thrilling,
    Laugh,
    Deep,
    Escape,
    Chill,
}

impl Mood {
    /// All moods, in the order the kiosk presents them.
    pub const ALL: [Mood; 6] = [
        Mood::Cozy,
        Mood::Thrilling,
        Mood::Laugh,
        Mood::Deep,
        Mood::Escape,
        Mood::Chill,
    ];

    /// Wire id of this mood.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Cozy => "cozy",
            Mood::Thrilling => "thrilling",
            Mood::Laugh => "laugh",
            Mood::Deep => "deep",
            Mood::Escape => "escape",
            Mood::Chill => "chill",
        }
    }

    /// Short label shown on the mood menu.
    pub fn label(&self) -> &'static str {
        match self {
            Mood::Cozy => "Cozy & Warm",
            Mood::Thrilling => "Edge of Seat",
            Mood::Laugh => "Need Laughs",
            Mood::Deep => "Make Me Think",
            Mood::Escape => "Pure Escapism",
            Mood::Chill => "Background Vibe",
        }
    }

    /// One-line description shown under the label.
    pub fn description(&self) -> &'static str {
        match self {
            Mood::Cozy => "Feel-good comfort",
            Mood::Thrilling => "Heart-pounding action",
            Mood::Laugh => "Comedy gold",
            Mood::Deep => "Mind-bending stories",
            Mood::Escape => "Transport me away",
            Mood::Chill => "Relaxed watching",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Cozy => "☕",
            Mood::Thrilling => "🎢",
            Mood::Laugh => "😂",
            Mood::Deep => "🧠",
            Mood::Escape => "🚀",
            Mood::Chill => "🌊",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = CatalogError;

    /// Parses a mood id or one of the UI-friendly aliases the backend also
    /// accepts ("funny", "edge of seat", ...). Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let mood = match normalized.as_str() {
            "cozy" | "cozy & warm" | "cozy and warm" | "warm" => Mood::Cozy,
            "thrilling" | "edge of seat" | "edge-of-seat" | "thriller" | "suspense"
            | "intense" => Mood::Thrilling,
            "laugh" | "need laughs" | "need-laughs" | "funny" | "comedy" | "humor" => Mood::Laugh,
            "deep" | "make me think" | "make-me-think" | "thoughtful" | "intellectual"
            | "profound" => Mood::Deep,
            "escape" | "pure escapism" | "pure-escapism" | "escapism" | "adventure" => Mood::Escape,
            "chill" | "background vibe" | "background-vibe" | "background" | "relaxing"
            | "mellow" => Mood::Chill,
            _ => {
                return Err(CatalogError::UnknownMood {
                    input: s.to_string(),
                });
            }
        };
        Ok(mood)
    }
}

// =============================================================================
// Time budgets
// =============================================================================

/// How long the user has to watch, from the kiosk's fixed set of options.
///
/// Serialises to and from the raw minute count (30, 90 or 180), which is
/// also what the recommendation service expects in `timeAvailable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum TimeBudget {
    /// 30 minutes: a short episode or clip.
    QuickWatch,
    /// 90 minutes: standard movie length.
    MovieNight,
    /// 3+ hours: an epic marathon session.
    BingeMode,
}

impl TimeBudget {
    /// All time budgets, shortest first.
    pub const ALL: [TimeBudget; 3] = [
        TimeBudget::QuickWatch,
        TimeBudget::MovieNight,
        TimeBudget::BingeMode,
    ];

    pub fn minutes(&self) -> u32 {
        match self {
            TimeBudget::QuickWatch => 30,
            TimeBudget::MovieNight => 90,
            TimeBudget::BingeMode => 180,
        }
    }

    /// Short label shown on the time menu.
    pub fn label(&self) -> &'static str {
        match self {
            TimeBudget::QuickWatch => "Quick Watch",
            TimeBudget::MovieNight => "Movie Night",
            TimeBudget::BingeMode => "Binge Mode",
        }
    }

    /// One-line description shown under the label.
    pub fn subtitle(&self) -> &'static str {
        match self {
            TimeBudget::QuickWatch => "Short episode or clip",
            TimeBudget::MovieNight => "Standard movie length",
            TimeBudget::BingeMode => "Epic marathon session",
        }
    }

    /// Maps an exact minute count back to its budget. The kiosk only offers
    /// these three; anything else is not a valid selection.
    pub fn from_minutes(minutes: u32) -> Option<TimeBudget> {
        match minutes {
            30 => Some(TimeBudget::QuickWatch),
            90 => Some(TimeBudget::MovieNight),
            180 => Some(TimeBudget::BingeMode),
            _ => None,
        }
    }
}

impl From<TimeBudget> for u32 {
    fn from(budget: TimeBudget) -> u32 {
        budget.minutes()
    }
}

impl TryFrom<u32> for TimeBudget {
    type Error = CatalogError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        TimeBudget::from_minutes(minutes).ok_or(CatalogError::UnsupportedMinutes { minutes })
    }
}

impl fmt::Display for TimeBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min", self.minutes())
    }
}

impl FromStr for TimeBudget {
    type Err = CatalogError;

    /// Parses a minute count ("90") or a budget name ("movie night",
    /// "binge"). Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if let Ok(minutes) = normalized.parse::<u32>() {
            return TimeBudget::from_minutes(minutes)
                .ok_or(CatalogError::UnsupportedMinutes { minutes });
        }
        let budget = match normalized.as_str() {
            "quick" | "quick watch" | "quick-watch" | "short" => TimeBudget::QuickWatch,
            "movie night" | "movie-night" | "standard" | "movie" => TimeBudget::MovieNight,
            "binge" | "binge mode" | "binge-mode" | "marathon" => TimeBudget::BingeMode,
            _ => {
                return Err(CatalogError::UnknownTimeBudget {
                    input: s.to_string(),
                });
            }
        };
        Ok(budget)
    }
}

// =============================================================================
// Service records (passthrough)
// =============================================================================

/// A movie as described by the recommendation service.
///
/// The record's structure belongs to the service; these are the fields the
/// kiosk renders, and unknown fields in the wire form are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub uid: Option<String>,
    pub title: String,
    pub year: Option<u16>,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Critic rating out of 10.
    pub rating: Option<f64>,
    /// The wire key is the singular "genre".
    #[serde(rename = "genre", default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub mood_tags: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    pub description: Option<String>,
    /// Artwork reference. The terminal kiosk prints it; a graphical
    /// front-end would load it.
    pub image_url: Option<String>,
}

/// One ranked recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub movie: Movie,
    /// Match strength on a 0-100 scale, as scored by the service. Scores
    /// are not assumed unique or strictly decreasing down the list.
    #[serde(rename = "matchScore")]
    pub match_score: f64,
    /// Free-text explanation of why this movie fits the request.
    #[serde(rename = "aiReason")]
    pub rationale: Option<String>,
}

/// Everything the service returns for one mood/time query.
///
/// The list is ordered best-first by the service and is never re-sorted
/// here. `total_candidates` and `source` are informational passthrough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationPayload {
    pub recommendations: Vec<Candidate>,
    /// How many movies the service considered; may exceed the list length.
    #[serde(default)]
    pub total_candidates: u32,
    /// Which engine produced the ranking, e.g. "model-ranked" or
    /// "heuristic-fallback".
    #[serde(default)]
    pub source: String,
}
