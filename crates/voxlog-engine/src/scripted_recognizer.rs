use crate::recognizer::Recognizer;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use voxlog_core::config::ScriptedConfig;
use voxlog_core::{
    RecognitionEvent, RecognitionMessage, RecognitionResult, RecognizerError, RecognizerSettings,
    SessionId,
};

/// Recognizer that "hears" a fixed list of phrases, one per interval.
///
/// Like a browser recognizer it redelivers the whole accumulated result list
/// on every result callback, and it ends the session on its own once the
/// script runs out.
pub struct ScriptedRecognizer {
    phrases: Vec<String>,
    interval: Duration,
    confidence: f32,
    settings: RecognizerSettings,
    event_sender: Option<mpsc::UnboundedSender<RecognitionMessage>>,
    session: SessionId,
    /// Open while a session runs. Every send happens under this lock, so
    /// nothing from a session can follow its `End`.
    running: Arc<Mutex<bool>>,
    task: Option<JoinHandle<()>>,
}

impl ScriptedRecognizer {
    pub fn new() -> Self {
        Self {
            phrases: Vec::new(),
            interval: Duration::from_millis(1500),
            confidence: 0.9,
            settings: RecognizerSettings::default(),
            event_sender: None,
            session: 0,
            running: Arc::new(Mutex::new(false)),
            task: None,
        }
    }
}

impl Default for ScriptedRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

fn lock(flag: &Mutex<bool>) -> MutexGuard<'_, bool> {
    flag.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sends `message` if the session is still open. Returns false once it is closed.
fn send_if_open(
    running: &Mutex<bool>,
    tx: &mpsc::UnboundedSender<RecognitionMessage>,
    message: RecognitionMessage,
) -> bool {
    let mut open = lock(running);
    if !*open {
        return false;
    }
    if tx.send(message).is_err() {
        *open = false;
        return false;
    }
    true
}

impl Recognizer for ScriptedRecognizer {
    fn name(&self) -> &str {
        "scripted"
    }

    fn initialize(&mut self, config: toml::Value) -> Result<(), RecognizerError> {
        let script: ScriptedConfig = config
            .try_into()
            .map_err(|e| RecognizerError::InitializationFailed(format!("bad script: {e}")))?;
        if !(0.0..=1.0).contains(&script.confidence) {
            return Err(RecognizerError::InitializationFailed(format!(
                "confidence {} outside [0, 1]",
                script.confidence
            )));
        }
        self.phrases = script.phrases;
        self.interval = Duration::from_millis(script.interval_ms);
        self.confidence = script.confidence;
        tracing::info!(
            phrases = self.phrases.len(),
            interval_ms = script.interval_ms,
            "ScriptedRecognizer initialized"
        );
        Ok(())
    }

    fn configure(&mut self, settings: &RecognizerSettings) -> Result<(), RecognizerError> {
        if settings.max_alternatives == 0 {
            return Err(RecognizerError::Rejected(
                "max_alternatives must be at least 1".to_string(),
            ));
        }
        if settings.interim_results {
            tracing::debug!("ScriptedRecognizer only produces final results");
        }
        self.settings = settings.clone();
        Ok(())
    }

    fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<RecognitionMessage>) {
        self.event_sender = Some(sender);
    }

    fn start(&mut self, session: SessionId) -> Result<(), RecognizerError> {
        if self.is_running() {
            return Err(RecognizerError::AlreadyStarted);
        }
        let tx = self
            .event_sender
            .clone()
            .ok_or(RecognizerError::NoEventSender)?;

        // The previous task has closed its session; make sure it is gone.
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.session = session;
        *lock(&self.running) = true;
        let running = Arc::clone(&self.running);
        let phrases = self.phrases.clone();
        let interval = self.interval;
        let confidence = self.confidence;
        let continuous = self.settings.continuous;

        tracing::debug!(session, language = %self.settings.language, "scripted session starting");

        self.task = Some(tokio::spawn(async move {
            let mut accumulated = Vec::with_capacity(phrases.len());
            for phrase in phrases {
                tokio::time::sleep(interval).await;
                accumulated.push(RecognitionResult::single(phrase, confidence));
                let message =
                    RecognitionMessage::new(session, RecognitionEvent::Result(accumulated.clone()));
                if !send_if_open(&running, &tx, message) {
                    return;
                }
                if !continuous {
                    break;
                }
            }
            // Whoever closes the session reports the end.
            let mut open = lock(&running);
            if std::mem::replace(&mut *open, false) {
                let _ = tx.send(RecognitionMessage::new(session, RecognitionEvent::End));
            }
        }));
        Ok(())
    }

    fn stop(&mut self) -> Result<(), RecognizerError> {
        let mut open = lock(&self.running);
        if !std::mem::replace(&mut *open, false) {
            return Ok(());
        }
        if let Some(tx) = self.event_sender.as_ref() {
            let _ = tx.send(RecognitionMessage::new(self.session, RecognitionEvent::End));
        }
        drop(open);
        if let Some(task) = self.task.take() {
            task.abort();
        }
        Ok(())
    }

    fn is_running(&self) -> bool {
        *lock(&self.running)
    }
}

impl Drop for ScriptedRecognizer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
