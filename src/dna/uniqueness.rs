//! Collection-wide uniqueness of normalized DNA

use crate::dna::token::Dna;
use crate::io::error::{GenerationError, Result};
use std::collections::HashSet;

/// Outcome of offering a DNA to the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// First occurrence, now recorded
    Accepted,
    /// Already produced; the caller should draw again
    Duplicate,
}

/// Set of normalized DNA already produced in the run
///
/// Consecutive duplicates are counted. Reaching the tolerance means the
/// configuration cannot produce the requested number of distinct editions.
#[derive(Debug, Clone)]
pub struct UniquenessTracker {
    seen: HashSet<String>,
    tolerance: usize,
    consecutive_duplicates: usize,
}

impl UniquenessTracker {
    /// Create an empty tracker aborting after `tolerance` consecutive duplicates
    pub fn new(tolerance: usize) -> Self {
        Self {
            seen: HashSet::new(),
            tolerance,
            consecutive_duplicates: 0,
        }
    }

    /// Whether the normalized form of `dna` has not been produced yet
    pub fn is_unique(&self, dna: &Dna) -> bool {
        !self.seen.contains(&dna.normalized())
    }

    /// Record `dna` if it is new, otherwise count a collision
    ///
    /// # Errors
    ///
    /// Returns `CollectionExhausted` once the consecutive duplicate count
    /// reaches the tolerance
    pub fn admit(&mut self, dna: &Dna, edition: usize, target: usize) -> Result<Admission> {
        if self.seen.insert(dna.normalized()) {
            self.consecutive_duplicates = 0;
            return Ok(Admission::Accepted);
        }

        self.consecutive_duplicates += 1;
        if self.consecutive_duplicates >= self.tolerance {
            return Err(GenerationError::CollectionExhausted {
                edition,
                attempts: self.consecutive_duplicates,
                target,
            });
        }
        Ok(Admission::Duplicate)
    }

    /// Consecutive duplicates since the last accepted DNA
    pub const fn consecutive_duplicates(&self) -> usize {
        self.consecutive_duplicates
    }

    /// Number of distinct DNA recorded
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
