pub mod adapter;
#[cfg(test)]
mod doubles;
pub mod file_log;
pub mod host;
pub mod log_sink;
pub mod voice_list;

pub use adapter::SpeechSessionAdapter;
pub use file_log::FileLog;
pub use host::SessionHost;
pub use log_sink::{LogSink, MemoryLog};
pub use voice_list::VoiceList;
