//! Word spelling from per-frame letter classifications.
//!
//! Debounces the classifier stream into committed letters and flushes
//! completed words after an idle gap.

mod accumulator;

pub use accumulator::{AccumulatorError, LetterAccumulator, WordEvent};
