use crate::synthesizer::Synthesizer;
use serde::Deserialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use voxlog_core::{SynthesisError, SynthesisEvent, UtteranceRequest, VoiceDescriptor};

const PITCH_RANGE: (f32, f32) = (0.0, 2.0);
const RATE_RANGE: (f32, f32) = (0.1, 10.0);

#[derive(Debug, Deserialize)]
struct ConsoleConfig {
    #[serde(default)]
    voices: Vec<VoiceDescriptor>,
    #[serde(default = "default_voice_load_delay_ms")]
    voice_load_delay_ms: u64,
    #[serde(default = "default_ms_per_word")]
    ms_per_word: u64,
}

fn default_voice_load_delay_ms() -> u64 {
    250
}

fn default_ms_per_word() -> u64 {
    300
}

type SharedSender = Arc<Mutex<Option<mpsc::UnboundedSender<SynthesisEvent>>>>;

/// Synthesizer that "speaks" by tracing each utterance and holding the
/// playback queue for roughly as long as saying it would take.
///
/// The voice catalog only becomes visible after `voice_load_delay_ms`, and
/// the change is announced with [`SynthesisEvent::VoicesChanged`].
pub struct ConsoleSynthesizer {
    voices: Arc<Mutex<Vec<VoiceDescriptor>>>,
    event_sender: SharedSender,
    queue_tx: Option<mpsc::UnboundedSender<UtteranceRequest>>,
    /// Utterances whose playback has finished.
    played: Arc<AtomicUsize>,
}

impl ConsoleSynthesizer {
    pub fn new() -> Self {
        Self {
            voices: Arc::new(Mutex::new(Vec::new())),
            event_sender: Arc::new(Mutex::new(None)),
            queue_tx: None,
            played: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn spawn_voice_loader(&self, catalog: Vec<VoiceDescriptor>, delay: Duration) {
        let voices = Arc::clone(&self.voices);
        let sender = Arc::clone(&self.event_sender);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let count = catalog.len();
            if let Ok(mut v) = voices.lock() {
                *v = catalog;
            }
            tracing::debug!(count, "console voices loaded");
            if let Ok(guard) = sender.lock() {
                if let Some(tx) = guard.as_ref() {
                    let _ = tx.send(SynthesisEvent::VoicesChanged);
                }
            }
        });
    }

    fn spawn_playback(&mut self, ms_per_word: u64) {
        let (queue_tx, mut queue_rx) = mpsc::unbounded_channel::<UtteranceRequest>();
        let played = Arc::clone(&self.played);

        tokio::spawn(async move {
            while let Some(request) = queue_rx.recv().await {
                let pitch = request.pitch.clamp(PITCH_RANGE.0, PITCH_RANGE.1);
                let rate = request.rate.clamp(RATE_RANGE.0, RATE_RANGE.1);
                let voice = request
                    .voice
                    .as_ref()
                    .map(|v| v.name.as_str())
                    .unwrap_or("default");
                tracing::info!(voice, pitch, rate, "speaking \"{}\"", request.text);

                let words = request.text.split_whitespace().count().max(1) as f64;
                let millis = words * ms_per_word as f64 / rate as f64;
                tokio::time::sleep(Duration::from_millis(millis as u64)).await;

                let played = played.fetch_add(1, Ordering::SeqCst) + 1;
                tracing::debug!(played, "utterance finished");
            }
        });

        self.queue_tx = Some(queue_tx);
    }
}

impl Default for ConsoleSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Synthesizer for ConsoleSynthesizer {
    fn name(&self) -> &str {
        "console"
    }

    fn initialize(&mut self, config: toml::Value) -> Result<(), SynthesisError> {
        let config: ConsoleConfig = config
            .try_into()
            .map_err(|e| SynthesisError::InitializationFailed(format!("bad config: {e}")))?;

        tracing::info!(
            voices = config.voices.len(),
            voice_load_delay_ms = config.voice_load_delay_ms,
            "ConsoleSynthesizer initialized"
        );

        if config.voice_load_delay_ms == 0 {
            if let Ok(mut v) = self.voices.lock() {
                *v = config.voices;
            }
        } else {
            self.spawn_voice_loader(
                config.voices,
                Duration::from_millis(config.voice_load_delay_ms),
            );
        }
        self.spawn_playback(config.ms_per_word);
        Ok(())
    }

    fn voices(&self) -> Vec<VoiceDescriptor> {
        self.voices.lock().map(|v| v.clone()).unwrap_or_default()
    }

    fn speak(&mut self, request: UtteranceRequest) -> Result<(), SynthesisError> {
        let tx = self
            .queue_tx
            .as_ref()
            .ok_or_else(|| SynthesisError::Rejected("not initialized".to_string()))?;
        tx.send(request)
            .map_err(|_| SynthesisError::Rejected("playback queue closed".to_string()))
    }

    fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<SynthesisEvent>) {
        if let Ok(mut guard) = self.event_sender.lock() {
            *guard = Some(sender);
        }
    }
}
