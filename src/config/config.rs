//! Application configuration and CLI argument parsing.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Application mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    /// Sign language detection: spell words by holding letters, hear them spoken
    #[default]
    Detect,
    /// Sign language lookup: turn spoken or typed text into sign images
    Signbook,
}

impl std::fmt::Display for AppMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppMode::Detect => write!(f, "detect"),
            AppMode::Signbook => write!(f, "signbook"),
        }
    }
}

/// Sign assistant application configuration.
#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "sign-assistant")]
#[command(author, version, about = "A real-time sign language assistant", long_about = None)]
pub struct AppConfig {
    /// Application mode
    #[arg(long, value_enum, default_value = "detect")]
    pub mode: AppMode,

    /// Seconds a letter must be held continuously before it is committed
    #[arg(long, default_value = "0.5")]
    pub hold_time: f32,

    /// Seconds without a new letter before the accumulated word is spoken
    #[arg(long, default_value = "5.0")]
    pub idle_time: f32,

    /// Nominal classification rate in frames per second
    #[arg(long, default_value = "30.0")]
    pub sample_rate: f32,

    /// Speech output language tag (words are translated when it differs from "en")
    #[arg(long, short = 'l', default_value = "en")]
    pub language: String,

    /// Letters the classifier is trained to recognize
    #[arg(long, default_value = "ABCDEFGHIJKLMNOPQRSTUVWXYZ")]
    pub alphabet: String,

    /// Voice rate for speech output
    #[arg(long, default_value = "150.0")]
    pub tts_rate: f32,

    /// Voice volume for speech output (0.0 - 1.0)
    #[arg(long, default_value = "1.0")]
    pub tts_volume: f32,

    /// Translation service endpoint (MyMemory-compatible)
    #[arg(long, env = "TRANSLATE_URL", default_value = "https://api.mymemory.translated.net/get")]
    pub translate_url: String,

    /// Directory containing sign images (one <letter>.jpg per letter)
    #[arg(long, short = 'd', env = "IMAGE_DIR", default_value_os_t = default_image_dir())]
    pub image_dir: PathBuf,

    /// Text to look up in signbook mode (skips the speech prompt)
    #[arg(long, short = 't')]
    pub text: Option<String>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl AppConfig {
    /// Parse configuration from command line arguments.
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Validate the configuration.
    ///
    /// Invalid values are rejected here with a descriptive error, never
    /// silently clamped.
    pub fn validate(&self) -> Result<()> {
        if self.hold_time < 0.0 || self.hold_time.is_nan() {
            anyhow::bail!("Hold time threshold must be a non-negative number of seconds, got {}", self.hold_time);
        }

        if self.idle_time < 0.0 || self.idle_time.is_nan() {
            anyhow::bail!("Idle time threshold must be a non-negative number of seconds, got {}", self.idle_time);
        }

        if self.sample_rate <= 0.0 || !self.sample_rate.is_finite() {
            anyhow::bail!("Sample rate must be a positive number of frames per second, got {}", self.sample_rate);
        }

        if !(0.0..=1.0).contains(&self.tts_volume) {
            anyhow::bail!("TTS volume must be between 0.0 and 1.0");
        }

        if self.tts_rate <= 0.0 {
            anyhow::bail!("TTS rate must be positive");
        }

        if self.alphabet.trim().is_empty() {
            anyhow::bail!("Recognized alphabet must not be empty");
        }

        if self.language.trim().is_empty() {
            anyhow::bail!("Language tag must not be empty");
        }

        // The image directory only matters for signbook lookups.
        if self.mode == AppMode::Signbook && !self.image_dir.exists() {
            anyhow::bail!("Image directory does not exist: {}", self.image_dir.display());
        }

        Ok(())
    }

    /// Log the current configuration.
    pub fn log_config(&self) {
        info!("Configuration:");
        info!("  Mode: {}", self.mode);
        info!("  Hold time threshold: {}s", self.hold_time);
        info!("  Idle time threshold: {}s", self.idle_time);
        info!("  Sample rate: {} fps", self.sample_rate);
        info!("  Language: {}", self.language);
        info!("  Alphabet: {}", self.alphabet);
        info!("  TTS rate: {}", self.tts_rate);
        info!("  TTS volume: {}", self.tts_volume);
        if self.mode == AppMode::Signbook {
            info!("  Image directory: {}", self.image_dir.display());
        }
    }
}

/// Get the default sign image directory (~/.sign-assistant/images).
fn default_image_dir() -> PathBuf {
    if let Some(home_dir) = dirs::home_dir() {
        home_dir.join(".sign-assistant").join("images")
    } else {
        PathBuf::from("images")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig::parse_from(["sign-assistant"])
    }

    #[test]
    fn default_configuration_is_valid() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn negative_thresholds_are_rejected() {
        let mut config = base_config();
        config.hold_time = -0.5;
        assert!(config.validate().is_err());

        let mut config = base_config();
        config.idle_time = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_volume_is_rejected() {
        let mut config = base_config();
        config.tts_volume = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_alphabet_and_language_are_rejected() {
        let mut config = base_config();
        config.alphabet = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = base_config();
        config.language = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_sample_rate_is_rejected() {
        let mut config = base_config();
        config.sample_rate = 0.0;
        assert!(config.validate().is_err());
    }
}
