use crate::console_synthesizer::ConsoleSynthesizer;
use crate::recognizer::Recognizer;
use crate::scripted_recognizer::ScriptedRecognizer;
use crate::synthesizer::Synthesizer;
use std::collections::HashMap;
use voxlog_core::{RecognizerError, SynthesisError};

type RecognizerFactory = fn() -> Box<dyn Recognizer>;
type SynthesizerFactory = fn() -> Box<dyn Synthesizer>;

/// Name → factory tables for both engine kinds.
pub struct EngineRegistry {
    recognizers: HashMap<String, RecognizerFactory>,
    synthesizers: HashMap<String, SynthesizerFactory>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            recognizers: HashMap::new(),
            synthesizers: HashMap::new(),
        };
        registry.register_recognizer("scripted", || Box::new(ScriptedRecognizer::new()));
        registry.register_synthesizer("console", || Box::new(ConsoleSynthesizer::new()));
        registry
    }

    pub fn register_recognizer(&mut self, name: &str, factory: RecognizerFactory) {
        self.recognizers.insert(name.to_string(), factory);
    }

    pub fn register_synthesizer(&mut self, name: &str, factory: SynthesizerFactory) {
        self.synthesizers.insert(name.to_string(), factory);
    }

    pub fn create_recognizer(&self, name: &str) -> Result<Box<dyn Recognizer>, RecognizerError> {
        self.recognizers
            .get(name)
            .map(|f| f())
            .ok_or_else(|| RecognizerError::EngineNotFound(name.to_string()))
    }

    pub fn create_synthesizer(&self, name: &str) -> Result<Box<dyn Synthesizer>, SynthesisError> {
        self.synthesizers
            .get(name)
            .map(|f| f())
            .ok_or_else(|| SynthesisError::EngineNotFound(name.to_string()))
    }

    pub fn list_recognizers(&self) -> Vec<&str> {
        self.recognizers.keys().map(|s| s.as_str()).collect()
    }

    pub fn list_synthesizers(&self) -> Vec<&str> {
        self.synthesizers.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::new()
    }
}
