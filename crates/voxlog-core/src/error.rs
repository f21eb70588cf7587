use std::fmt;
use thiserror::Error;

/// A speech capability the host platform may or may not provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Recognition,
    Synthesis,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Recognition => f.write_str("speech recognition"),
            Capability::Synthesis => f.write_str("speech synthesis"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),
}

#[derive(Debug, Error)]
pub enum RecognizerError {
    #[error("recognizer initialization failed: {0}")]
    InitializationFailed(String),

    #[error("recognizer already started")]
    AlreadyStarted,

    #[error("recognizer has no event sender")]
    NoEventSender,

    #[error("recognizer rejected request: {0}")]
    Rejected(String),

    #[error("recognizer engine not found: {0}")]
    EngineNotFound(String),
}

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("synthesizer initialization failed: {0}")]
    InitializationFailed(String),

    #[error("synthesizer rejected utterance: {0}")]
    Rejected(String),

    #[error("synthesizer engine not found: {0}")]
    EngineNotFound(String),
}

#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to open log: {0}")]
    Open(String),

    #[error("failed to append to log: {0}")]
    Write(String),
}

/// Failures surfaced by the session adapter. Neither kind is fatal: the worst
/// outcome is a disabled capability plus a notice shown to the user.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0} is not available on this platform")]
    PlatformUnsupported(Capability),

    #[error("{0}")]
    RuntimeFailure(String),
}

impl From<RecognizerError> for SessionError {
    fn from(e: RecognizerError) -> Self {
        SessionError::RuntimeFailure(e.to_string())
    }
}

impl From<SynthesisError> for SessionError {
    fn from(e: SynthesisError) -> Self {
        SessionError::RuntimeFailure(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_unsupported_message_names_capability() {
        let err = SessionError::PlatformUnsupported(Capability::Recognition);
        assert_eq!(err.to_string(), "speech recognition is not available on this platform");
    }

    #[test]
    fn test_recognizer_error_converts_to_runtime_failure() {
        let err: SessionError = RecognizerError::AlreadyStarted.into();
        match err {
            SessionError::RuntimeFailure(msg) => assert_eq!(msg, "recognizer already started"),
            _ => panic!("expected RuntimeFailure"),
        }
    }
}
