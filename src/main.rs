//! Sign Assistant - a real-time sign language companion.
//!
//! Turns a stream of per-frame hand-sign classifications into spelled words,
//! speaks completed words through the platform text-to-speech engine with
//! optional translation, and can look up sign images for spoken or typed
//! text.

mod config;
mod detect;
mod signbook;
mod speech;
mod spell;
mod stt;
mod translate;

use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;

use config::{AppConfig, AppMode};
use detect::{Alphabet, ClassificationSample, KeyboardFeed};
use signbook::{Carousel, Gallery};
use speech::{PlatformTts, SpeechEngine, SpeechWorker};
use spell::LetterAccumulator;
use stt::{KeyboardTranscriber, Transcriber};
use translate::{HttpTranslator, SOURCE_LANGUAGE, Translator};

/// Spawn the detection session task.
///
/// Consumes classification samples, drives the letter accumulator, and hands
/// completed words to the speech worker. The worker handle is owned by the
/// task and returned when the session ends so the caller can drain it.
///
/// # Arguments
/// * `sample_rx` - Channel of per-frame classification samples
/// * `accumulator` - Letter accumulation state machine
/// * `worker` - Speech output worker
/// * `nominal_period` - Fallback inter-sample delta for the first sample
/// * `shutdown` - Shutdown flag
///
/// # Returns
/// Join handle resolving to the speech worker once the session ends.
fn spawn_detection_task(
    mut sample_rx: mpsc::Receiver<ClassificationSample>,
    mut accumulator: LetterAccumulator,
    worker: SpeechWorker,
    nominal_period: Duration,
    shutdown: Arc<AtomicBool>,
) -> JoinHandle<SpeechWorker> {
    tokio::spawn(async move {
        let mut previous: Option<Instant> = None;

        while !shutdown.load(Ordering::Relaxed) {
            // Use timeout to allow shutdown checks
            match tokio::time::timeout(Duration::from_millis(100), sample_rx.recv()).await {
                Ok(Some(sample)) => {
                    let dt = previous.map_or(nominal_period, |t| sample.timestamp.duration_since(t));
                    previous = Some(sample.timestamp);

                    if let Some(event) = accumulator.accept_sample(sample.letter, sample.timestamp, dt) {
                        info!("🗣️  Queueing word for speech: {}", event.text);
                        if let Err(e) = worker.enqueue(event) {
                            error!("❌ Failed to queue word: {}", e);
                            break;
                        }
                    }
                }
                Ok(None) => {
                    debug!("Sample channel closed");
                    break;
                }
                Err(_) => {
                    // Timeout - continue to check shutdown flag
                    continue;
                }
            }
        }

        if !accumulator.pending_word().is_empty() {
            debug!("Discarding partial word \"{}\"", accumulator.pending_word());
        }

        worker
    })
}

/// Run the sign language detection session.
async fn run_detection(config: &AppConfig) -> Result<()> {
    let alphabet = Alphabet::from_symbols(&config.alphabet)?;
    let accumulator = LetterAccumulator::new(config.hold_time, config.idle_time, config.language.clone(), Instant::now())?;

    let translator: Option<Box<dyn Translator + Send>> = if config.language != SOURCE_LANGUAGE {
        Some(Box::new(HttpTranslator::new(&config.translate_url)?))
    } else {
        None
    };

    // The engine is built inside the worker thread; playback stays on the
    // thread that owns the platform handle.
    let tts_rate = config.tts_rate;
    let tts_volume = config.tts_volume;
    let worker = SpeechWorker::spawn(move || Ok(Box::new(PlatformTts::new(tts_rate, tts_volume)?) as Box<dyn SpeechEngine>), translator);

    let shutdown = Arc::new(AtomicBool::new(false));

    // Keep empty frames flowing after input ends so a trailing word flushes.
    let eof_grace = Duration::from_secs_f32(config.idle_time + 1.0);
    let (mut feed, sample_rx) = KeyboardFeed::spawn(alphabet, config.sample_rate, eof_grace, shutdown.clone());

    let nominal_period = Duration::from_secs_f32(1.0 / config.sample_rate);
    let mut detection_handle = spawn_detection_task(sample_rx, accumulator, worker, nominal_period, shutdown.clone());

    info!("🖐️  Detection in progress. Type a letter and press Enter to hold it; an empty line lowers the hand; Ctrl+C to stop.");

    let worker = tokio::select! {
        result = &mut detection_handle => Some(result.context("Detection task panicked")?),
        _ = wait_for_shutdown(shutdown.clone()) => {
            feed.shutdown();
            match tokio::time::timeout(Duration::from_secs(2), &mut detection_handle).await {
                Ok(result) => Some(result.context("Detection task panicked")?),
                Err(_) => {
                    warn!("Detection task didn't finish in time, aborting");
                    detection_handle.abort();
                    // The worker is dropped inside the task; its Drop drains
                    // the queue.
                    None
                }
            }
        }
    };

    feed.shutdown();

    if let Some(mut worker) = worker {
        info!("Draining speech queue ({} words pending)...", worker.pending());
        worker.close()?;
    }

    info!("✅ Detection stopped");
    Ok(())
}

/// Run the signbook lookup: spoken or typed text to sign images.
fn run_signbook(config: &AppConfig) -> Result<()> {
    let text = match &config.text {
        Some(text) => text.clone(),
        None => {
            let mut transcriber = KeyboardTranscriber;
            transcriber.transcribe()?
        }
    };
    println!("You said: {}", text);

    let gallery = Gallery::new(&config.image_dir);
    let images = gallery.images_for_phrase(&text);
    if images.is_empty() {
        println!("No images found for that input.");
        return Ok(());
    }

    let mut carousel = Carousel::new(images)?;
    print_current(&carousel);
    println!("Navigation: [n]ext, [p]revious, [q]uit");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read input")?;
        match line.trim() {
            "n" | "next" | "" => {
                carousel.next();
            }
            "p" | "prev" | "previous" => {
                carousel.prev();
            }
            "q" | "quit" => break,
            other => println!("Unknown command: {}", other),
        }
        print_current(&carousel);
    }

    Ok(())
}

/// Print the carousel's current image with its position caption.
fn print_current(carousel: &Carousel) {
    let (position, total) = carousel.position();
    println!("Image {}/{}: {}", position, total, carousel.current().display());
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn wait_for_shutdown(shutdown: Arc<AtomicBool>) {
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("🛑 Received Ctrl+C, shutting down...");
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
                    .expect("Failed to register SIGTERM handler");
                sigterm.recv().await;
            }
            #[cfg(not(unix))]
            {
                std::future::pending::<()>().await;
            }
        } => {
            info!("🛑 Received SIGTERM, shutting down...");
        }
    }

    shutdown.store(true, Ordering::SeqCst);
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let config = AppConfig::from_args();

    // Initialize logging with time-only format
    // Respect RUST_LOG env var, fallback to verbose flag, default to info
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| if config.verbose { EnvFilter::try_new("debug") } else { EnvFilter::try_new("info") })
        .unwrap();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(LocalTime::new(time::macros::format_description!("[hour]:[minute]:[second]")))
        .init();

    info!("🖐️  Sign Assistant v{}", env!("CARGO_PKG_VERSION"));

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("❌ Configuration error: {}", e);
        std::process::exit(1);
    }

    config.log_config();

    match config.mode {
        AppMode::Detect => run_detection(&config).await,
        AppMode::Signbook => run_signbook(&config),
    }
}
