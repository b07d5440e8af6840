//! Speech-to-text input for the signbook.
//!
//! The recognizer itself is an external collaborator; this module provides
//! the on-demand transcription seam and a keyboard fallback.

mod transcriber;

pub use transcriber::{KeyboardTranscriber, Transcriber};
