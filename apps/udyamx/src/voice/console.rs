//! Terminal speech backend.
//!
//! Prompts are printed instead of played. While the recognizer is
//! listening, the shell hands the next typed line to it through a
//! [`Microphone`] instead of running it as a command.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, warn};
use udyamx_core::voice::RecognitionErrorKind;

use super::{SpeechBackend, SpeechError, SpeechRecognizer, SpeechSynthesizer};

/// How long [`Microphone::hear`] waits for the recognizer to take a line.
const HEAR_TIMEOUT: Duration = Duration::from_secs(2);

/// A typed line plus the signal that the recognizer took it.
type Utterance = (String, oneshot::Sender<()>);

/// The shell's side of the console backend.
#[derive(Debug, Clone)]
pub struct Microphone {
    lines_tx: mpsc::UnboundedSender<Utterance>,
    listening: Arc<AtomicBool>,
}

impl Microphone {
    /// True while a recognizer is waiting for an utterance.
    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    /// Delivers a typed line as the heard utterance.
    ///
    /// Returns once the recognizer has taken it, so the caller's next
    /// line is never mistaken for speech.
    pub async fn hear(&self, line: impl Into<String>) {
        let (taken_tx, taken_rx) = oneshot::channel();
        if self.lines_tx.send((line.into(), taken_tx)).is_err() {
            return;
        }
        if tokio::time::timeout(HEAR_TIMEOUT, taken_rx).await.is_err() {
            warn!("Recognizer did not take the typed line");
        }
    }
}

pub struct ConsoleSpeech {
    lines_rx: Mutex<mpsc::UnboundedReceiver<Utterance>>,
    listening: Arc<AtomicBool>,
}

impl ConsoleSpeech {
    /// Builds the backend and the microphone that feeds it.
    pub fn connect() -> (SpeechBackend, Microphone) {
        let (lines_tx, lines_rx) = mpsc::unbounded_channel();
        let listening = Arc::new(AtomicBool::new(false));

        let speech = Arc::new(ConsoleSpeech {
            lines_rx: Mutex::new(lines_rx),
            listening: listening.clone(),
        });
        let backend = SpeechBackend {
            synthesizer: speech.clone(),
            recognizer: speech,
        };

        (backend, Microphone { lines_tx, listening })
    }
}

/// Clears the listening flag however `listen` ends, including abort.
struct ListeningGuard<'a>(&'a AtomicBool);

impl Drop for ListeningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl SpeechSynthesizer for ConsoleSpeech {
    async fn speak(&self, text: &str, language: &str) -> Result<(), SpeechError> {
        println!("🔊 [{}] {}", language, text);
        Ok(())
    }
}

#[async_trait]
impl SpeechRecognizer for ConsoleSpeech {
    async fn listen(&self, language: &str) -> Result<String, RecognitionErrorKind> {
        let mut lines = self.lines_rx.lock().await;

        // Drop anything typed before this utterance was asked for.
        while lines.try_recv().is_ok() {}

        self.listening.store(true, Ordering::SeqCst);
        let _guard = ListeningGuard(&self.listening);
        println!("🎤 ({}) listening...", language);

        match lines.recv().await {
            Some((line, taken)) => {
                self.listening.store(false, Ordering::SeqCst);
                let _ = taken.send(());
                debug!(chars = line.len(), "Utterance captured");
                Ok(line)
            }
            None => Err(RecognitionErrorKind::Other("audio-capture".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_microphone_feeds_the_recognizer() {
        let (backend, mic) = ConsoleSpeech::connect();
        assert!(!mic.is_listening());

        let recognizer = backend.recognizer.clone();
        let listen = tokio::spawn(async move { recognizer.listen("hi-IN").await });

        for _ in 0..100 {
            if mic.is_listening() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(mic.is_listening());

        mic.hear("Sharma Stores").await;
        assert!(!mic.is_listening());
        assert_eq!(listen.await.unwrap(), Ok("Sharma Stores".to_string()));
    }

    #[tokio::test]
    async fn test_abort_clears_listening_flag() {
        let (backend, mic) = ConsoleSpeech::connect();
        let recognizer = backend.recognizer.clone();
        let listen = tokio::spawn(async move { recognizer.listen("en-IN").await });

        for _ in 0..100 {
            if mic.is_listening() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        listen.abort();
        let _ = listen.await;

        assert!(!mic.is_listening());
    }
}
