//! Length-bucketed word corpus index.

use std::collections::HashMap;

use derive_more::{Display, Error};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

use crate::normalize::normalize;

/// Domain errors for random word selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum ChooseError {
    /// The corpus holds no words of the requested length.
    #[display("no words with the requested length")]
    InvalidSize,
    /// Fewer distinct words of the requested length than asked for.
    #[display("not enough distinct words with the requested length")]
    NotEnoughWords,
}

/// Immutable index over a word list.
///
/// Words are stored in their normalized form, bucketed by length, with a
/// lookup back to one original spelling per normalized form. Built once at
/// startup and read-only afterwards; concurrent reads need no
/// synchronization.
#[derive(Debug, Clone, Default)]
pub struct WordMap {
    /// Length bounds over all accepted words; unset while the corpus is empty.
    min_size: Option<u32>,
    max_size: Option<u32>,

    /// Normalized words grouped by char length, one entry per normalized form.
    by_size: HashMap<u32, Vec<String>>,

    /// Normalized form back to the display spelling (last write wins).
    originals: HashMap<String, String>,
}

impl WordMap {
    /// Builds the index from a raw word list.
    ///
    /// Each raw word is trimmed and lowercased (that form is retained for
    /// display), then fully normalized for indexing. Words that normalize to
    /// the empty string are skipped. When two words normalize identically
    /// they collapse to one bucket entry and the later display spelling
    /// wins; that is an accepted property of the source list, not repaired
    /// here.
    #[instrument(skip(words))]
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = Self::default();

        for raw in words {
            let original = raw.as_ref().trim().to_lowercase();
            let normalized = normalize(&original);
            if normalized.is_empty() {
                continue;
            }

            let length = normalized.chars().count() as u32;
            if map.originals.insert(normalized.clone(), original).is_some() {
                // Already indexed under this normalized form.
                continue;
            }

            map.by_size.entry(length).or_default().push(normalized);
            map.min_size = Some(map.min_size.map_or(length, |m| m.min(length)));
            map.max_size = Some(map.max_size.map_or(length, |m| m.max(length)));
        }

        debug!(
            words = map.originals.len(),
            buckets = map.by_size.len(),
            "Word corpus indexed"
        );
        map
    }

    /// Shortest word length present, or `None` on an empty corpus.
    pub fn min_word_size(&self) -> Option<u32> {
        self.min_size
    }

    /// Longest word length present, or `None` on an empty corpus.
    pub fn max_word_size(&self) -> Option<u32> {
        self.max_size
    }

    /// Number of distinct normalized words in the corpus.
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    /// Whether the corpus holds no words at all.
    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    /// Draws `count` distinct normalized words of the given length, uniformly
    /// at random without replacement.
    ///
    /// The bucket itself is never mutated; sampling shuffles a copy. The
    /// order of the result is the order callers freeze for a session.
    ///
    /// # Errors
    ///
    /// - [`ChooseError::InvalidSize`] when the length is outside the corpus
    ///   bounds or has no bucket.
    /// - [`ChooseError::NotEnoughWords`] when the bucket holds fewer than
    ///   `count` distinct words.
    #[instrument(skip(self, rng))]
    pub fn choose_random<R: Rng + ?Sized>(
        &self,
        word_length: u32,
        count: u32,
        rng: &mut R,
    ) -> Result<Vec<String>, ChooseError> {
        let (Some(min), Some(max)) = (self.min_size, self.max_size) else {
            return Err(ChooseError::InvalidSize);
        };
        if word_length < min || word_length > max {
            return Err(ChooseError::InvalidSize);
        }

        let bucket = self
            .by_size
            .get(&word_length)
            .ok_or(ChooseError::InvalidSize)?;
        if count as usize > bucket.len() {
            return Err(ChooseError::NotEnoughWords);
        }

        let mut drawn = bucket.clone();
        drawn.shuffle(rng);
        drawn.truncate(count as usize);

        debug!(word_length, count, "Words drawn from corpus");
        Ok(drawn)
    }

    /// Looks up the display spelling for a normalized word.
    ///
    /// Absence is an expected outcome (e.g. a stored secret word predating
    /// the current corpus build), never an error.
    pub fn original_of(&self, normalized: &str) -> Option<&str> {
        self.originals.get(normalized).map(String::as_str)
    }
}
