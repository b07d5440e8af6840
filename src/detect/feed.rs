//! Classification sample feed.
//!
//! Samples arrive over a channel at the nominal frame rate, mirroring the
//! event-driven delivery a camera/classifier integration would use. The
//! classifier itself is an external collaborator; this module ships a
//! keyboard-driven feed that stands in for it: the letter typed last is
//! treated as the sign currently held in front of the camera.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::alphabet::{Alphabet, Letter};

/// One classification result per video frame.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationSample {
    /// The classified letter, or `None` when nothing was confidently detected.
    pub letter: Option<Letter>,
    /// Frame timestamp.
    pub timestamp: Instant,
}

/// Capacity of the sample channel; absorbs short consumer stalls.
const SAMPLE_CHANNEL_CAPACITY: usize = 64;

/// Keyboard-driven classification feed.
///
/// A reader thread tracks the letter typed last (an empty line clears it, as
/// if the hand were lowered); a ticker thread samples that letter at the
/// nominal frame rate and pushes [`ClassificationSample`]s into the channel.
/// After stdin ends, empty samples keep flowing for a grace period so a
/// trailing word can still flush, then the channel closes.
pub struct KeyboardFeed {
    shutdown: Arc<AtomicBool>,
    ticker: Option<std::thread::JoinHandle<()>>,
}

impl KeyboardFeed {
    /// Spawn the feed threads.
    ///
    /// # Arguments
    /// * `alphabet` - recognized letters; anything else is rejected with a warning
    /// * `sample_rate` - nominal samples per second
    /// * `eof_grace` - how long to keep emitting empty samples after stdin ends
    /// * `shutdown` - session shutdown flag
    ///
    /// # Returns
    /// The feed handle and the sample receiver for the session loop.
    pub fn spawn(alphabet: Alphabet, sample_rate: f32, eof_grace: Duration, shutdown: Arc<AtomicBool>) -> (Self, mpsc::Receiver<ClassificationSample>) {
        let (tx, rx) = mpsc::channel(SAMPLE_CHANNEL_CAPACITY);

        let held: Arc<Mutex<Option<Letter>>> = Arc::new(Mutex::new(None));
        let eof = Arc::new(AtomicBool::new(false));

        // Reader thread: blocks on stdin, so it is detached rather than
        // joined (it exits with the process or on EOF).
        {
            let held = held.clone();
            let eof = eof.clone();
            std::thread::spawn(move || {
                let stdin = std::io::stdin();
                for line in std::io::BufRead::lines(stdin.lock()) {
                    let Ok(line) = line else { break };
                    let trimmed = line.trim();

                    if trimmed.is_empty() {
                        *held.lock() = None;
                        continue;
                    }

                    if let Some(c) = trimmed.chars().next() {
                        match alphabet.letter(c) {
                            Some(letter) => *held.lock() = Some(letter),
                            None => warn!("'{}' is not in the recognized alphabet, ignoring", c),
                        }
                    }
                }

                *held.lock() = None;
                eof.store(true, Ordering::SeqCst);
                debug!("Input ended");
            });
        }

        // Ticker thread: emits one sample per frame period.
        let ticker = {
            let shutdown = shutdown.clone();
            let period = Duration::from_secs_f32(1.0 / sample_rate);

            std::thread::spawn(move || {
                let mut eof_deadline: Option<Instant> = None;

                loop {
                    if shutdown.load(Ordering::Relaxed) {
                        debug!("Feed ticker shutting down");
                        break;
                    }

                    if eof.load(Ordering::SeqCst) {
                        let deadline = *eof_deadline.get_or_insert_with(|| Instant::now() + eof_grace);
                        if Instant::now() >= deadline {
                            info!("Input ended, closing detection feed");
                            break;
                        }
                    }

                    let sample = ClassificationSample { letter: *held.lock(), timestamp: Instant::now() };

                    match tx.try_send(sample) {
                        Ok(()) => {}
                        Err(mpsc::error::TrySendError::Full(_)) => {
                            // Session loop is lagging; drop the frame.
                            warn!("Sample channel full, dropping frame");
                        }
                        Err(mpsc::error::TrySendError::Closed(_)) => {
                            debug!("Sample channel closed, feed ticker exiting");
                            break;
                        }
                    }

                    std::thread::sleep(period);
                }
            })
        };

        (Self { shutdown, ticker: Some(ticker) }, rx)
    }

    /// Stop the ticker and wait for it to exit.
    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.ticker.take()
            && handle.join().is_err()
        {
            warn!("Feed ticker thread panicked");
        }
    }
}

impl Drop for KeyboardFeed {
    fn drop(&mut self) {
        self.shutdown();
    }
}
