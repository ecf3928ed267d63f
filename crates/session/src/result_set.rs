//! Holds the ranked candidates from one successful query and tracks which
//! one is currently featured.
//!
//! Everything here is presentation-side reshuffling of a fixed list; nothing
//! in this module triggers network activity. Swapping the featured pick is
//! an index remap, not a re-query.

use catalog::{Candidate, RecommendationPayload};

use crate::error::SessionError;

/// Resolve a display position in the alternates view back to an index into
/// the full candidate list.
///
/// The alternates view skips the featured slot, so display position `k`
/// means "the k-th candidate that is not currently featured, in original
/// order". Returns `None` when `display_position` is past the end of the
/// view. Deterministic: the same inputs always resolve to the same index.
pub fn resolve_alternate_index(
    candidates: &[Candidate],
    featured_index: usize,
    display_position: usize,
) -> Option<usize> {
    let mut seen = 0;
    for index in 0..candidates.len() {
        if index == featured_index {
            continue;
        }
        if seen == display_position {
            return Some(index);
        }
        seen += 1;
    }
    None
}

/// The outcome of one successful query: a non-empty ranked candidate list
/// plus the index of the featured pick.
///
/// The list keeps the service's order (best first) and is never re-sorted
/// or mutated; only `featured_index` moves. A new query replaces the whole
/// set rather than editing this one.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    candidates: Vec<Candidate>,
    featured_index: usize,
    total_candidates: u32,
    source: String,
}

impl ResultSet {
    /// Builds a result set from a service payload, featuring the top-ranked
    /// candidate. Returns `None` for an empty payload: with nothing to
    /// feature there is no result to show, and the caller reports that as a
    /// failed query instead.
    pub fn from_payload(payload: RecommendationPayload) -> Option<ResultSet> {
        if payload.recommendations.is_empty() {
            return None;
        }
        Some(ResultSet {
            candidates: payload.recommendations,
            featured_index: 0,
            total_candidates: payload.total_candidates,
            source: payload.source,
        })
    }

    /// The currently featured candidate.
    pub fn featured(&self) -> &Candidate {
        // Safe by construction: candidates is non-empty and featured_index
        // only ever takes values resolve_alternate_index returned.
        &self.candidates[self.featured_index]
    }

    /// Index of the featured candidate in the full list.
    pub fn featured_index(&self) -> usize {
        self.featured_index
    }

    /// All candidates in service order, featured one included.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Every candidate except the featured one, in original order, paired
    /// with its index in the full list. Recomputed fresh on each call.
    pub fn alternates(&self) -> impl Iterator<Item = (usize, &Candidate)> + '_ {
        let featured = self.featured_index;
        self.candidates
            .iter()
            .enumerate()
            .filter(move |(index, _)| *index != featured)
    }

    pub fn alternate_count(&self) -> usize {
        self.candidates.len() - 1
    }

    /// Promotes the alternate at `display_position` to featured and returns
    /// its index in the full list. The old featured candidate drops back
    /// into the alternates view at its original position.
    pub fn select_alternate(&mut self, display_position: usize) -> Result<usize, SessionError> {
        match resolve_alternate_index(&self.candidates, self.featured_index, display_position) {
            Some(original_index) => {
                self.featured_index = original_index;
                Ok(original_index)
            }
            None => Err(SessionError::IndexOutOfRange {
                position: display_position,
                available: self.alternate_count(),
            }),
        }
    }

    /// How many movies the service considered for this query.
    pub fn total_candidates(&self) -> u32 {
        self.total_candidates
    }

    /// Which engine produced the ranking.
    pub fn source(&self) -> &str {
        &self.source
    }
}
