//! Letter accumulation state machine.
//!
//! Turns the noisy per-frame stream of letter classifications into discrete
//! word emissions. A letter must be observed continuously for the hold
//! threshold before it is committed to the pending word; once no commit has
//! happened for the idle threshold, the pending word is flushed as a
//! [`WordEvent`] for speech output.

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info};

use crate::detect::Letter;

/// A completed word ready for speech output.
///
/// Immutable once created; ownership moves to the speech worker queue and the
/// producer never reads it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEvent {
    /// The spelled-out word, one committed letter per character.
    pub text: String,
    /// Target language tag for speech output (and translation, if it differs
    /// from the source language).
    pub language: String,
}

/// Configuration errors detected when constructing a [`LetterAccumulator`].
#[derive(Debug, Error)]
pub enum AccumulatorError {
    #[error("hold time threshold must be a non-negative number of seconds, got {0}")]
    InvalidHoldTime(f32),
    #[error("idle time threshold must be a non-negative number of seconds, got {0}")]
    InvalidIdleTime(f32),
}

/// Debounces per-frame classifications into committed letters and words.
///
/// State is owned exclusively by the producer; time is injected per sample so
/// the machine stays deterministic under test.
pub struct LetterAccumulator {
    current_letter: Option<Letter>,    // Letter currently being held, if any
    current_elapsed: Duration,         // How long the current letter has been held
    pending_word: String,              // Letters committed since the last flush
    last_detection: Instant,           // Time of the most recent letter commit
    hold_threshold: Duration,          // Continuous hold required to commit a letter
    idle_threshold: Duration,          // Commit silence required to flush the word
    language: String,                  // Language tag stamped onto emitted words
}

impl LetterAccumulator {
    /// Create a new accumulator.
    ///
    /// # Arguments
    /// * `hold_time` - seconds a letter must be held before committing
    /// * `idle_time` - seconds without a commit before the word is flushed
    /// * `language` - language tag for emitted word events
    /// * `start` - session start time, seeds the idle clock
    ///
    /// # Errors
    /// Returns an error if either threshold is negative or not a number.
    /// Thresholds are never clamped.
    pub fn new(hold_time: f32, idle_time: f32, language: String, start: Instant) -> Result<Self, AccumulatorError> {
        if hold_time < 0.0 || hold_time.is_nan() {
            return Err(AccumulatorError::InvalidHoldTime(hold_time));
        }
        if idle_time < 0.0 || idle_time.is_nan() {
            return Err(AccumulatorError::InvalidIdleTime(idle_time));
        }

        Ok(Self {
            current_letter: None,
            current_elapsed: Duration::ZERO,
            pending_word: String::new(),
            last_detection: start,
            hold_threshold: Duration::from_secs_f32(hold_time),
            idle_threshold: Duration::from_secs_f32(idle_time),
            language,
        })
    }

    /// Feed one classification sample into the state machine.
    ///
    /// `sample` is the classifier's output for the frame (`None` for no
    /// confident detection), `now` the frame timestamp, and `dt` the delta
    /// since the previous sample.
    ///
    /// A changed letter resets the hold clock; a repeated letter accumulates
    /// hold time and commits once the hold threshold is reached, which also
    /// restarts the idle clock. The idle check runs after the commit check on
    /// every sample, so a commit in the same tick defers the flush by one
    /// more idle window. Returns a [`WordEvent`] when the pending word is
    /// flushed.
    pub fn accept_sample(&mut self, sample: Option<Letter>, now: Instant, dt: Duration) -> Option<WordEvent> {
        if sample == self.current_letter {
            self.current_elapsed += dt;
        } else {
            self.current_letter = sample;
            self.current_elapsed = Duration::ZERO;
        }

        if self.current_elapsed >= self.hold_threshold
            && let Some(letter) = self.current_letter
        {
            self.pending_word.push(letter.as_char());
            self.current_letter = None;
            self.current_elapsed = Duration::ZERO;
            self.last_detection = now;
            info!("📝 Current word: {}", self.pending_word);
        }

        if now.duration_since(self.last_detection) >= self.idle_threshold && !self.pending_word.is_empty() {
            let text = std::mem::take(&mut self.pending_word);
            debug!("Idle threshold reached, flushing \"{}\"", text);
            return Some(WordEvent { text, language: self.language.clone() });
        }

        None
    }

    /// The letter currently being held, if any.
    pub fn current_letter(&self) -> Option<Letter> {
        self.current_letter
    }

    /// Letters committed so far, not yet flushed.
    pub fn pending_word(&self) -> &str {
        &self.pending_word
    }
}
