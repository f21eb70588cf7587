pub mod console_synthesizer;
pub mod platform;
pub mod recognizer;
pub mod registry;
pub mod scripted_recognizer;
pub mod synthesizer;

pub use console_synthesizer::ConsoleSynthesizer;
pub use platform::{ProbeError, SpeechPlatform, NO_ENGINE};
pub use recognizer::Recognizer;
pub use registry::EngineRegistry;
pub use scripted_recognizer::ScriptedRecognizer;
pub use synthesizer::Synthesizer;
