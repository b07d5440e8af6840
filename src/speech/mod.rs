//! Speech output: platform TTS engine and the background playback worker.
//!
//! Words flow from the producer into an unbounded FIFO queue; a dedicated
//! worker thread vocalizes them strictly in order.

mod engine;
mod worker;

pub use engine::{PlatformTts, SpeechEngine};
pub use worker::{EnqueueError, SpeechWorker};
