use tokio::sync::mpsc;
use voxlog_core::{RecognitionMessage, RecognizerError, RecognizerSettings, SessionId};

/// A continuous speech-to-text engine owned by the host.
///
/// The engine runs on its own timeline and reports back only through the
/// sender registered with [`set_event_sender`](Self::set_event_sender).
/// None of the methods block.
///
/// Every event is stamped with the id passed to the `start` call that opened
/// its session. A session that ran always closes with exactly one `End`,
/// sent after all of its other events.
pub trait Recognizer: Send {
    /// Returns the engine's registry name (e.g. `"scripted"`).
    fn name(&self) -> &str;
    /// One-time initialisation with engine-specific TOML configuration.
    fn initialize(&mut self, config: toml::Value) -> Result<(), RecognizerError>;
    /// Apply session settings; takes effect on the next `start`.
    fn configure(&mut self, settings: &RecognizerSettings) -> Result<(), RecognizerError>;
    /// Register the observer for results, no-match, end and error callbacks.
    fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<RecognitionMessage>);
    /// Begin listening session `session`. Fails with `AlreadyStarted` while one is running.
    fn start(&mut self, session: SessionId) -> Result<(), RecognizerError>;
    /// End the current session. A no-op when idle.
    fn stop(&mut self) -> Result<(), RecognizerError>;
    fn is_running(&self) -> bool;
}
