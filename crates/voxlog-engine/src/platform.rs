use crate::recognizer::Recognizer;
use crate::registry::EngineRegistry;
use crate::synthesizer::Synthesizer;
use thiserror::Error;
use voxlog_core::{AppConfig, Capability, RecognizerError, SynthesisError};

/// Engine name meaning "this platform has no such capability".
pub const NO_ENGINE: &str = "none";

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error(transparent)]
    Recognizer(#[from] RecognizerError),

    #[error(transparent)]
    Synthesizer(#[from] SynthesisError),

    #[error("invalid engine config: {0}")]
    EngineConfig(#[from] toml::ser::Error),
}

/// The speech capabilities a host offers. Each one is optional and probed
/// independently of the other.
#[derive(Default)]
pub struct SpeechPlatform {
    pub recognizer: Option<Box<dyn Recognizer>>,
    pub synthesizer: Option<Box<dyn Synthesizer>>,
}

impl SpeechPlatform {
    pub fn new(
        recognizer: Option<Box<dyn Recognizer>>,
        synthesizer: Option<Box<dyn Synthesizer>>,
    ) -> Self {
        Self {
            recognizer,
            synthesizer,
        }
    }

    /// Build both capabilities from configuration.
    ///
    /// An unknown engine name is an error. An engine that exists but fails to
    /// come up is logged and left out, exactly as if the platform lacked it.
    pub fn probe(config: &AppConfig, registry: &EngineRegistry) -> Result<Self, ProbeError> {
        let recognizer = Self::probe_recognizer(config, registry)?;
        let synthesizer = Self::probe_synthesizer(config, registry)?;
        Ok(Self {
            recognizer,
            synthesizer,
        })
    }

    fn probe_recognizer(
        config: &AppConfig,
        registry: &EngineRegistry,
    ) -> Result<Option<Box<dyn Recognizer>>, ProbeError> {
        let cfg = &config.recognition;
        if cfg.engine == NO_ENGINE {
            return Ok(None);
        }
        let mut recognizer = registry.create_recognizer(&cfg.engine)?;
        let engine_config = cfg.engine_config()?;

        let ready = recognizer
            .initialize(engine_config)
            .and_then(|()| recognizer.configure(&cfg.settings()));
        match ready {
            Ok(()) => Ok(Some(recognizer)),
            Err(e) => {
                tracing::warn!(
                    engine = %cfg.engine,
                    capability = %Capability::Recognition,
                    "engine unavailable: {e}"
                );
                Ok(None)
            }
        }
    }

    fn probe_synthesizer(
        config: &AppConfig,
        registry: &EngineRegistry,
    ) -> Result<Option<Box<dyn Synthesizer>>, ProbeError> {
        let cfg = &config.synthesis;
        if cfg.engine == NO_ENGINE {
            return Ok(None);
        }
        let mut synthesizer = registry.create_synthesizer(&cfg.engine)?;
        match synthesizer.initialize(cfg.engine_config()?) {
            Ok(()) => Ok(Some(synthesizer)),
            Err(e) => {
                tracing::warn!(
                    engine = %cfg.engine,
                    capability = %Capability::Synthesis,
                    "engine unavailable: {e}"
                );
                Ok(None)
            }
        }
    }

    pub fn can_listen(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn can_speak(&self) -> bool {
        self.synthesizer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_probe_default_config_has_both_capabilities() {
        let platform =
            SpeechPlatform::probe(&AppConfig::default(), &EngineRegistry::new()).unwrap();
        assert!(platform.can_listen());
        assert!(platform.can_speak());
    }

    #[test]
    fn test_probe_none_disables_capabilities_independently() {
        let config = AppConfig::from_toml_str(
            r#"
[recognition]
engine = "none"

[synthesis]
engine = "none"
"#,
        )
        .unwrap();
        let platform = SpeechPlatform::probe(&config, &EngineRegistry::new()).unwrap();
        assert!(!platform.can_listen());
        assert!(!platform.can_speak());
    }

    #[tokio::test]
    async fn test_probe_unknown_engine_is_an_error() {
        let config = AppConfig::from_toml_str(
            r#"
[recognition]
engine = "whisper"
"#,
        )
        .unwrap();
        match SpeechPlatform::probe(&config, &EngineRegistry::new()) {
            Err(ProbeError::Recognizer(RecognizerError::EngineNotFound(name))) => {
                assert_eq!(name, "whisper")
            }
            _ => panic!("expected EngineNotFound"),
        }
    }

    #[tokio::test]
    async fn test_probe_failed_configure_leaves_capability_out() {
        let config = AppConfig::from_toml_str(
            r#"
[recognition]
max_alternatives = 0
"#,
        )
        .unwrap();
        let platform = SpeechPlatform::probe(&config, &EngineRegistry::new()).unwrap();
        assert!(!platform.can_listen());
        assert!(platform.can_speak());
    }
}
