use tokio::sync::mpsc;
use voxlog_core::{SynthesisError, SynthesisEvent, UtteranceRequest, VoiceDescriptor};

/// A text-to-speech engine owned by the host.
///
/// Utterances submitted through [`speak`](Self::speak) are queued and played
/// one after another in submission order; the queue belongs to the engine.
pub trait Synthesizer: Send {
    fn name(&self) -> &str;
    fn initialize(&mut self, config: toml::Value) -> Result<(), SynthesisError>;
    /// Currently known voices. May be empty until the engine has finished
    /// enumerating them, which it announces with `VoicesChanged`.
    fn voices(&self) -> Vec<VoiceDescriptor>;
    fn speak(&mut self, request: UtteranceRequest) -> Result<(), SynthesisError>;
    fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<SynthesisEvent>);
}
