//! Speech synthesis engine seam and platform implementation.

use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};
use tts::Tts;

/// Speech synthesis collaborator.
///
/// `speak` performs blocking playback: it returns only once the utterance has
/// finished, so the worker's strict one-at-a-time ordering holds. There is no
/// mid-utterance cancellation.
pub trait SpeechEngine {
    /// Synthesize and play `text`, blocking until playback completes.
    ///
    /// # Errors
    /// Returns an error if synthesis or playback fails; the caller treats
    /// this as a per-utterance warning, not a fatal condition.
    fn speak(&mut self, text: &str) -> Result<()>;
}

/// Interval for polling the platform engine while an utterance plays.
const PLAYBACK_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Platform text-to-speech engine (speech-dispatcher, SAPI, AVFoundation...).
pub struct PlatformTts {
    tts: Tts, // Platform engine handle
}

impl PlatformTts {
    /// Create a platform TTS engine with the given voice rate and volume.
    ///
    /// The requested rate is adapted to the platform's supported range;
    /// volume is expected to be pre-validated into 0.0..=1.0.
    ///
    /// # Errors
    /// Returns an error if the platform engine cannot be initialized or
    /// configured.
    pub fn new(rate: f32, volume: f32) -> Result<Self> {
        let mut tts = Tts::default().map_err(|e| anyhow::anyhow!("Failed to initialize platform TTS engine: {}", e))?;

        let supported_rate = rate.clamp(tts.min_rate(), tts.max_rate());
        if supported_rate != rate {
            debug!("Requested voice rate {} is outside the platform range, using {}", rate, supported_rate);
        }

        tts.set_rate(supported_rate).map_err(|e| anyhow::anyhow!("Failed to set voice rate: {}", e))?;
        tts.set_volume(volume).map_err(|e| anyhow::anyhow!("Failed to set voice volume: {}", e))?;

        info!("🔈 Platform TTS ready (rate {}, volume {})", supported_rate, volume);

        Ok(Self { tts })
    }
}

impl SpeechEngine for PlatformTts {
    fn speak(&mut self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        debug!("Synthesizing utterance: \"{}\"", text);

        let _utterance = self.tts.speak(text, false).map_err(|e| anyhow::anyhow!("TTS playback failed: {}", e))?;

        // Playback runs to completion; poll until the engine goes quiet.
        while self.tts.is_speaking().map_err(|e| anyhow::anyhow!("TTS state query failed: {}", e))? {
            std::thread::sleep(PLAYBACK_POLL_INTERVAL);
        }

        Ok(())
    }
}
