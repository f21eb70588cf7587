//! Engine doubles for unit tests: every call is recorded and every callback
//! is fired by hand.

use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use voxlog_core::{
    RecognitionEvent, RecognitionMessage, RecognitionResult, RecognizerError, RecognizerSettings,
    SessionId, SynthesisError, SynthesisEvent, UtteranceRequest, VoiceDescriptor,
};
use voxlog_engine::{Recognizer, Synthesizer};

#[derive(Default)]
pub struct RecognizerCalls {
    pub starts: usize,
    pub stops: usize,
    pub running: bool,
    pub reject_start: bool,
    /// Session id of the last accepted `start`.
    pub session: SessionId,
    sender: Option<mpsc::UnboundedSender<RecognitionMessage>>,
}

impl RecognizerCalls {
    fn send(&self, session: SessionId, event: RecognitionEvent) {
        self.sender
            .as_ref()
            .expect("no event sender registered")
            .send(RecognitionMessage::new(session, event))
            .unwrap()
    }
}

#[derive(Clone, Default)]
pub struct RecognizerHandle(Arc<Mutex<RecognizerCalls>>);

impl RecognizerHandle {
    pub fn with<R>(&self, f: impl FnOnce(&mut RecognizerCalls) -> R) -> R {
        f(&mut self.0.lock().unwrap())
    }

    /// Fire a callback for the current session.
    pub fn emit(&self, event: RecognitionEvent) {
        self.with(|p| p.send(p.session, event));
    }

    /// Fire a callback stamped with an arbitrary session.
    pub fn emit_for(&self, session: SessionId, event: RecognitionEvent) {
        self.with(|p| p.send(session, event));
    }

    /// Deliver the first `len` entries of `results`, as a browser recognizer would.
    pub fn emit_prefix(&self, results: &[RecognitionResult], len: usize) {
        self.emit(RecognitionEvent::Result(results[..len].to_vec()));
    }
}

pub struct FakeRecognizer(RecognizerHandle);

impl FakeRecognizer {
    pub fn new() -> (Self, RecognizerHandle) {
        let handle = RecognizerHandle::default();
        (Self(handle.clone()), handle)
    }
}

impl Recognizer for FakeRecognizer {
    fn name(&self) -> &str {
        "fake"
    }

    fn initialize(&mut self, _config: toml::Value) -> Result<(), RecognizerError> {
        Ok(())
    }

    fn configure(&mut self, _settings: &RecognizerSettings) -> Result<(), RecognizerError> {
        Ok(())
    }

    fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<RecognitionMessage>) {
        self.0.with(|p| p.sender = Some(sender));
    }

    fn start(&mut self, session: SessionId) -> Result<(), RecognizerError> {
        self.0.with(|p| {
            p.starts += 1;
            if p.reject_start {
                return Err(RecognizerError::Rejected("not-allowed".to_string()));
            }
            if p.running {
                return Err(RecognizerError::AlreadyStarted);
            }
            p.running = true;
            p.session = session;
            Ok(())
        })
    }

    /// Closes a running session with `End`, like a real engine.
    fn stop(&mut self) -> Result<(), RecognizerError> {
        self.0.with(|p| {
            p.stops += 1;
            if p.running {
                p.running = false;
                if let Some(tx) = p.sender.as_ref() {
                    let _ = tx.send(RecognitionMessage::new(p.session, RecognitionEvent::End));
                }
            }
        });
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.0.with(|p| p.running)
    }
}

#[derive(Default)]
pub struct SynthesizerCalls {
    pub voices: Vec<VoiceDescriptor>,
    pub submitted: Vec<UtteranceRequest>,
    pub reject_speak: bool,
    sender: Option<mpsc::UnboundedSender<SynthesisEvent>>,
}

#[derive(Clone, Default)]
pub struct SynthesizerHandle(Arc<Mutex<SynthesizerCalls>>);

impl SynthesizerHandle {
    pub fn with<R>(&self, f: impl FnOnce(&mut SynthesizerCalls) -> R) -> R {
        f(&mut self.0.lock().unwrap())
    }

    pub fn emit(&self, event: SynthesisEvent) {
        self.with(|p| {
            p.sender
                .as_ref()
                .expect("no event sender registered")
                .send(event)
                .unwrap()
        });
    }

    pub fn submitted(&self) -> Vec<UtteranceRequest> {
        self.with(|p| p.submitted.clone())
    }
}

pub struct FakeSynthesizer(SynthesizerHandle);

impl FakeSynthesizer {
    pub fn new(voices: Vec<VoiceDescriptor>) -> (Self, SynthesizerHandle) {
        let handle = SynthesizerHandle::default();
        handle.with(|p| p.voices = voices);
        (Self(handle.clone()), handle)
    }
}

impl Synthesizer for FakeSynthesizer {
    fn name(&self) -> &str {
        "fake"
    }

    fn initialize(&mut self, _config: toml::Value) -> Result<(), SynthesisError> {
        Ok(())
    }

    fn voices(&self) -> Vec<VoiceDescriptor> {
        self.0.with(|p| p.voices.clone())
    }

    fn speak(&mut self, request: UtteranceRequest) -> Result<(), SynthesisError> {
        self.0.with(|p| {
            if p.reject_speak {
                return Err(SynthesisError::Rejected("synthesis-failed".to_string()));
            }
            p.submitted.push(request);
            Ok(())
        })
    }

    fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<SynthesisEvent>) {
        self.0.with(|p| p.sender = Some(sender));
    }
}

pub fn voice(name: &str, lang: &str, is_default: bool) -> VoiceDescriptor {
    VoiceDescriptor {
        name: name.to_string(),
        lang: lang.to_string(),
        is_default,
    }
}
