//! Speech-to-text collaborator seam.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

/// Delivers free-text input on demand.
///
/// Production deployments wrap a microphone plus a speech recognizer behind
/// this trait; the recognizer itself is an external collaborator.
pub trait Transcriber {
    /// Capture one utterance and return its text.
    ///
    /// # Errors
    /// Returns an error if nothing intelligible was captured.
    fn transcribe(&mut self) -> Result<String>;
}

/// Keyboard fallback used when no speech recognizer is wired in: prompts on
/// stdout and reads one line from stdin.
pub struct KeyboardTranscriber;

impl Transcriber for KeyboardTranscriber {
    fn transcribe(&mut self) -> Result<String> {
        print!("Speak now (type a word or phrase): ");
        io::stdout().flush().context("Failed to flush prompt")?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).context("Failed to read input")?;

        let text = line.trim().to_string();
        if text.is_empty() {
            anyhow::bail!("Could not understand input");
        }

        Ok(text)
    }
}
