//! Hand-sign detection input: recognized alphabet and the classification
//! sample feed.
//!
//! The image classifier is an external collaborator; a real integration maps
//! its class indices through [`Alphabet`] and pushes samples into the feed
//! channel.

mod alphabet;
mod feed;

pub use alphabet::{Alphabet, Letter};
pub use feed::{ClassificationSample, KeyboardFeed};
