pub mod config;
pub mod error;
pub mod tui_types;
pub mod types;

pub use config::AppConfig;
pub use error::{
    Capability, ConfigError, LogError, RecognizerError, SessionError, SynthesisError,
};
pub use tui_types::{SessionState, UiCommand, VoiceOption};
pub use types::{
    ListenState, RecognitionAlternative, RecognitionEvent, RecognitionMessage, RecognitionResult,
    RecognizerSettings, SessionId, SynthesisEvent, UtteranceRequest, VoiceDescriptor,
};
