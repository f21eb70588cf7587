use crate::error::ConfigError;
use crate::types::{RecognizerSettings, VoiceDescriptor};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub recognition: RecognitionConfig,

    #[serde(default)]
    pub synthesis: SynthesisConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Transcript log settings.
#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// Lines kept in memory for display.
    #[serde(default = "default_log_capacity")]
    pub capacity: usize,

    /// Also append every line to this file.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            capacity: default_log_capacity(),
            file: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecognitionConfig {
    /// Registered recognizer name, or `"none"` for no recognition.
    #[serde(default = "default_recognition_engine")]
    pub engine: String,

    #[serde(default = "default_true")]
    pub autostart: bool,

    #[serde(default = "default_true")]
    pub continuous: bool,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub interim_results: bool,

    #[serde(default = "default_max_alternatives")]
    pub max_alternatives: u32,

    #[serde(default)]
    pub scripted: Option<ScriptedConfig>,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            engine: default_recognition_engine(),
            autostart: default_true(),
            continuous: default_true(),
            language: default_language(),
            interim_results: false,
            max_alternatives: default_max_alternatives(),
            scripted: None,
        }
    }
}

impl RecognitionConfig {
    pub fn settings(&self) -> RecognizerSettings {
        RecognizerSettings {
            continuous: self.continuous,
            language: self.language.clone(),
            interim_results: self.interim_results,
            max_alternatives: self.max_alternatives,
        }
    }

    /// Engine-specific table handed to the recognizer's `initialize`.
    pub fn engine_config(&self) -> Result<toml::Value, toml::ser::Error> {
        match (self.engine.as_str(), &self.scripted) {
            ("scripted", Some(scripted)) => toml::Value::try_from(scripted),
            _ => Ok(toml::Value::Table(Default::default())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ScriptedConfig {
    #[serde(default)]
    pub phrases: Vec<String>,

    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SynthesisConfig {
    /// Registered synthesizer name, or `"none"` for no synthesis.
    #[serde(default = "default_synthesis_engine")]
    pub engine: String,

    #[serde(default = "default_pitch")]
    pub pitch: f32,

    #[serde(default = "default_rate")]
    pub rate: f32,

    #[serde(default = "default_voice_load_delay_ms")]
    pub voice_load_delay_ms: u64,

    #[serde(default)]
    pub voices: Vec<VoiceDescriptor>,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            engine: default_synthesis_engine(),
            pitch: default_pitch(),
            rate: default_rate(),
            voice_load_delay_ms: default_voice_load_delay_ms(),
            voices: Vec::new(),
        }
    }
}

impl SynthesisConfig {
    /// Engine-specific table handed to the synthesizer's `initialize`.
    pub fn engine_config(&self) -> Result<toml::Value, toml::ser::Error> {
        let mut table = toml::map::Map::new();
        table.insert(
            "voice_load_delay_ms".to_string(),
            toml::Value::Integer(self.voice_load_delay_ms as i64),
        );
        table.insert("voices".to_string(), toml::Value::try_from(&self.voices)?);
        Ok(toml::Value::Table(table))
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_capacity() -> usize {
    1000
}

fn default_recognition_engine() -> String {
    "scripted".to_string()
}

fn default_synthesis_engine() -> String {
    "console".to_string()
}

fn default_true() -> bool {
    true
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_max_alternatives() -> u32 {
    1
}

fn default_interval_ms() -> u64 {
    1500
}

fn default_confidence() -> f32 {
    0.9
}

fn default_pitch() -> f32 {
    1.0
}

fn default_rate() -> f32 {
    1.0
}

fn default_voice_load_delay_ms() -> u64 {
    250
}

/// Interpolate `${VAR}` patterns with environment variable values.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([^}]+)\}").expect("static regex");
    let mut result = input.to_string();

    for cap in re.captures_iter(input) {
        let var_name = &cap[1];
        let val = std::env::var(var_name)
            .map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;
        result = result.replace(&cap[0], &val);
    }

    Ok(result)
}

impl AppConfig {
    /// Load configuration from a TOML file, with environment variable interpolation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let interpolated = interpolate_env_vars(s)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        Ok(config)
    }
}
