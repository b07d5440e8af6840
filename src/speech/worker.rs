//! Background speech output worker.
//!
//! A dedicated thread drains an unbounded FIFO of word events, translating
//! and vocalizing each one in strict enqueue order. Playback is synchronous
//! inside the worker so utterances never overlap; the producer only blocks on
//! the worker during the explicit shutdown drain.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

use anyhow::Result;
use parking_lot::{Condvar, Mutex};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::engine::SpeechEngine;
use crate::spell::WordEvent;
use crate::translate::{SOURCE_LANGUAGE, Translator};

/// Error returned when a word is enqueued after the worker was told to stop.
/// This is a lifecycle bug in the caller, not a recoverable condition.
#[derive(Debug, Error)]
#[error("speech worker has already been terminated")]
pub struct EnqueueError;

/// Work queue item: a word to vocalize, or the termination sentinel.
enum QueueItem {
    Word(WordEvent),
    Shutdown,
}

/// Counts enqueued-but-unprocessed words so a caller can wait for full drain.
struct DrainState {
    pending: Mutex<usize>,
    drained: Condvar,
}

impl DrainState {
    fn new() -> Self {
        Self { pending: Mutex::new(0), drained: Condvar::new() }
    }

    fn add_pending(&self) {
        *self.pending.lock() += 1;
    }

    fn mark_done(&self) {
        let mut pending = self.pending.lock();
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.drained.notify_all();
        }
    }

    fn wait_drained(&self) {
        let mut pending = self.pending.lock();
        while *pending > 0 {
            self.drained.wait(&mut pending);
        }
    }

    fn pending(&self) -> usize {
        *self.pending.lock()
    }
}

/// Handle to the speech output worker thread.
///
/// Spawned once per session; stopped exactly once via [`SpeechWorker::close`],
/// which enqueues the termination sentinel and blocks until every queued word
/// has been processed.
pub struct SpeechWorker {
    tx: Sender<QueueItem>,
    handle: Option<JoinHandle<()>>,
    drain: Arc<DrainState>,
    closed: AtomicBool,
}

impl SpeechWorker {
    /// Spawn the worker thread.
    ///
    /// The speech engine is constructed by `make_engine` inside the worker
    /// thread, since engine handles stay on the thread that plays through
    /// them. If engine construction fails the worker logs the error and
    /// drains words without playback rather than stalling the session.
    ///
    /// # Arguments
    /// * `make_engine` - factory invoked once on the worker thread
    /// * `translator` - optional translation collaborator for non-source
    ///   language word events
    pub fn spawn<F>(make_engine: F, translator: Option<Box<dyn Translator + Send>>) -> Self
    where
        F: FnOnce() -> Result<Box<dyn SpeechEngine>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<QueueItem>();
        let drain = Arc::new(DrainState::new());
        let worker_drain = drain.clone();

        let handle = std::thread::spawn(move || {
            let mut engine = match make_engine() {
                Ok(engine) => Some(engine),
                Err(e) => {
                    error!("❌ Speech engine initialization failed: {:#}", e);
                    None
                }
            };

            while let Ok(item) = rx.recv() {
                match item {
                    QueueItem::Shutdown => {
                        debug!("Speech worker received shutdown sentinel");
                        break;
                    }
                    QueueItem::Word(event) => {
                        let text = translate_word(translator.as_deref(), &event);

                        info!("🔊 Speaking: {}", text);
                        match engine.as_mut() {
                            Some(engine) => {
                                // Playback failure must not stall the queue.
                                if let Err(e) = engine.speak(&text) {
                                    warn!("Speech synthesis failed for \"{}\": {:#}", text, e);
                                }
                            }
                            None => warn!("Speech engine unavailable, dropping \"{}\"", text),
                        }

                        worker_drain.mark_done();
                    }
                }
            }

            debug!("Speech worker exiting");
        });

        Self { tx, handle: Some(handle), drain, closed: AtomicBool::new(false) }
    }

    /// Append a word event to the tail of the work queue.
    ///
    /// Never blocks; the queue is unbounded.
    ///
    /// # Errors
    /// Returns [`EnqueueError`] if the worker has already been told to
    /// terminate, or if the worker thread is gone.
    pub fn enqueue(&self, event: WordEvent) -> Result<(), EnqueueError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(EnqueueError);
        }

        self.drain.add_pending();
        self.tx.send(QueueItem::Word(event)).map_err(|_| {
            self.drain.mark_done();
            EnqueueError
        })
    }

    /// Block until every word enqueued so far has been processed.
    pub fn wait_drained(&self) {
        self.drain.wait_drained();
    }

    /// Number of enqueued words not yet processed.
    pub fn pending(&self) -> usize {
        self.drain.pending()
    }

    /// Stop the worker: enqueue the termination sentinel, wait for the queue
    /// to drain fully, and join the thread. No word enqueued before the call
    /// is dropped. Calling close a second time is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            debug!("Speech worker already closed");
            return Ok(());
        }

        // The worker may already be gone if it panicked; the join below
        // surfaces that.
        let _ = self.tx.send(QueueItem::Shutdown);

        self.drain.wait_drained();

        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            anyhow::bail!("Speech worker thread panicked");
        }

        Ok(())
    }
}

impl Drop for SpeechWorker {
    fn drop(&mut self) {
        if !self.closed.load(Ordering::Acquire) {
            debug!("Speech worker dropped without close, draining");
            if let Err(e) = self.close() {
                warn!("Speech worker shutdown failed: {:#}", e);
            }
        }
    }
}

/// Translate a word event's text, falling back to the original on failure.
/// Source-language events and sessions without a translator pass through.
fn translate_word(translator: Option<&(dyn Translator + Send)>, event: &WordEvent) -> String {
    if event.language == SOURCE_LANGUAGE {
        return event.text.clone();
    }

    match translator {
        Some(translator) => match translator.translate(&event.text, &event.language) {
            Ok(translated) => {
                debug!("Translated \"{}\" -> \"{}\"", event.text, translated);
                translated
            }
            Err(e) => {
                warn!("Translation failed, speaking original text: {:#}", e);
                event.text.clone()
            }
        },
        None => event.text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Speech engine that records every utterance it is asked to play.
    #[derive(Clone)]
    struct RecordingEngine {
        spoken: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl RecordingEngine {
        fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
            let spoken = Arc::new(Mutex::new(Vec::new()));
            (Self { spoken: spoken.clone(), fail: false }, spoken)
        }

        fn failing() -> (Self, Arc<Mutex<Vec<String>>>) {
            let spoken = Arc::new(Mutex::new(Vec::new()));
            (Self { spoken: spoken.clone(), fail: true }, spoken)
        }
    }

    impl SpeechEngine for RecordingEngine {
        fn speak(&mut self, text: &str) -> Result<()> {
            self.spoken.lock().push(text.to_string());
            if self.fail {
                anyhow::bail!("synthesis backend offline");
            }
            Ok(())
        }
    }

    /// Translator that lowercases, making translated output distinguishable.
    struct LowercasingTranslator;

    impl Translator for LowercasingTranslator {
        fn translate(&self, text: &str, _target: &str) -> Result<String> {
            Ok(text.to_lowercase())
        }
    }

    /// Translator that fails on every call.
    struct FailingTranslator;

    impl Translator for FailingTranslator {
        fn translate(&self, _text: &str, _target: &str) -> Result<String> {
            anyhow::bail!("translation service unreachable")
        }
    }

    fn word(text: &str, language: &str) -> WordEvent {
        WordEvent { text: text.to_string(), language: language.to_string() }
    }

    #[test]
    fn processes_words_in_enqueue_order() {
        let (engine, spoken) = RecordingEngine::new();
        let mut worker = SpeechWorker::spawn(move || Ok(Box::new(engine) as Box<dyn SpeechEngine>), None);

        for text in ["HELLO", "WORLD", "BYE"] {
            worker.enqueue(word(text, "en")).unwrap();
        }
        worker.close().unwrap();

        assert_eq!(*spoken.lock(), vec!["HELLO", "WORLD", "BYE"]);
        assert_eq!(worker.pending(), 0);
    }

    #[test]
    fn close_drains_every_queued_word() {
        let (engine, spoken) = RecordingEngine::new();
        let mut worker = SpeechWorker::spawn(move || Ok(Box::new(engine) as Box<dyn SpeechEngine>), None);

        for i in 0..20 {
            worker.enqueue(word(&format!("W{}", i), "en")).unwrap();
        }
        worker.close().unwrap();

        assert_eq!(spoken.lock().len(), 20);
        assert_eq!(worker.pending(), 0);
    }

    #[test]
    fn translator_is_applied_to_foreign_language_events() {
        let (engine, spoken) = RecordingEngine::new();
        let mut worker = SpeechWorker::spawn(
            move || Ok(Box::new(engine) as Box<dyn SpeechEngine>),
            Some(Box::new(LowercasingTranslator)),
        );

        worker.enqueue(word("BONJOUR", "fr")).unwrap();
        worker.close().unwrap();

        assert_eq!(*spoken.lock(), vec!["bonjour"]);
    }

    #[test]
    fn source_language_events_skip_the_translator() {
        let (engine, spoken) = RecordingEngine::new();
        let mut worker = SpeechWorker::spawn(
            move || Ok(Box::new(engine) as Box<dyn SpeechEngine>),
            Some(Box::new(LowercasingTranslator)),
        );

        worker.enqueue(word("HELLO", "en")).unwrap();
        worker.close().unwrap();

        assert_eq!(*spoken.lock(), vec!["HELLO"]);
    }

    #[test]
    fn failing_translator_falls_back_to_original_text() {
        let (engine, spoken) = RecordingEngine::new();
        let mut worker = SpeechWorker::spawn(
            move || Ok(Box::new(engine) as Box<dyn SpeechEngine>),
            Some(Box::new(FailingTranslator)),
        );

        for text in ["UN", "DEUX", "TROIS"] {
            worker.enqueue(word(text, "fr")).unwrap();
        }
        worker.close().unwrap();

        assert_eq!(*spoken.lock(), vec!["UN", "DEUX", "TROIS"]);
    }

    #[test]
    fn synthesis_failure_does_not_stall_the_worker() {
        let (engine, spoken) = RecordingEngine::failing();
        let mut worker = SpeechWorker::spawn(move || Ok(Box::new(engine) as Box<dyn SpeechEngine>), None);

        for text in ["A", "B", "C"] {
            worker.enqueue(word(text, "en")).unwrap();
        }
        worker.close().unwrap();

        // Every word was attempted despite each playback failing.
        assert_eq!(*spoken.lock(), vec!["A", "B", "C"]);
    }

    #[test]
    fn enqueue_after_close_is_an_error() {
        let (engine, _spoken) = RecordingEngine::new();
        let mut worker = SpeechWorker::spawn(move || Ok(Box::new(engine) as Box<dyn SpeechEngine>), None);

        worker.close().unwrap();
        assert!(worker.enqueue(word("LATE", "en")).is_err());

        // A second close is a no-op.
        worker.close().unwrap();
    }

    #[test]
    fn engine_construction_failure_still_drains() {
        let mut worker = SpeechWorker::spawn(|| anyhow::bail!("no audio device"), None);

        worker.enqueue(word("HELLO", "en")).unwrap();
        worker.close().unwrap();
        assert_eq!(worker.pending(), 0);
    }
}
