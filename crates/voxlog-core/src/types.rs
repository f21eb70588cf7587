use serde::{Deserialize, Serialize};

/// One transcription hypothesis for a recognized phrase.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionAlternative {
    pub transcript: String,
    /// In `[0, 1]`.
    pub confidence: f32,
}

/// A recognized phrase, with alternatives ordered best first.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionResult {
    pub alternatives: Vec<RecognitionAlternative>,
    pub is_final: bool,
}

impl RecognitionResult {
    /// Final result holding a single alternative.
    pub fn single(transcript: impl Into<String>, confidence: f32) -> Self {
        Self {
            alternatives: vec![RecognitionAlternative {
                transcript: transcript.into(),
                confidence,
            }],
            is_final: true,
        }
    }

    pub fn top(&self) -> Option<&RecognitionAlternative> {
        self.alternatives.first()
    }
}

/// Callbacks delivered by a recognizer.
///
/// `Result` always carries the full sequence accumulated since the session
/// started, not just the newest entry.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    Result(Vec<RecognitionResult>),
    NoMatch,
    End,
    Error(String),
}

/// Identifies one listening session. The caller of `Recognizer::start`
/// picks it, so events left over from an earlier session can be told apart.
pub type SessionId = u64;

/// A recognition event stamped with the session that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionMessage {
    pub session: SessionId,
    pub event: RecognitionEvent,
}

impl RecognitionMessage {
    pub fn new(session: SessionId, event: RecognitionEvent) -> Self {
        Self { session, event }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListenState {
    #[default]
    Stopped,
    Listening,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecognizerSettings {
    pub continuous: bool,
    pub language: String,
    pub interim_results: bool,
    pub max_alternatives: u32,
}

impl Default for RecognizerSettings {
    fn default() -> Self {
        Self {
            continuous: true,
            language: "en-US".to_string(),
            interim_results: false,
            max_alternatives: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceDescriptor {
    pub name: String,
    pub lang: String,
    #[serde(default, alias = "default")]
    pub is_default: bool,
}

/// A single request to speak `text`. Pitch and rate are forwarded as given;
/// clamping is left to the synthesizer.
#[derive(Debug, Clone, PartialEq)]
pub struct UtteranceRequest {
    pub text: String,
    pub voice_index: usize,
    /// `None` leaves the choice to the synthesizer's default voice.
    pub voice: Option<VoiceDescriptor>,
    pub pitch: f32,
    pub rate: f32,
}

/// Callbacks delivered by a synthesizer.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisEvent {
    VoicesChanged,
    Error(String),
}
