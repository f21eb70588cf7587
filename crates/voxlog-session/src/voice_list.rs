use std::sync::Arc;
use voxlog_core::{VoiceDescriptor, VoiceOption};

/// Cached, read-only copy of the synthesizer's voice catalog.
///
/// A refresh swaps in a whole new list, so clones taken before the swap stay
/// intact and nobody observes a half-rebuilt catalog.
#[derive(Debug, Clone, Default)]
pub struct VoiceList {
    voices: Arc<Vec<VoiceDescriptor>>,
}

impl VoiceList {
    pub fn new(voices: Vec<VoiceDescriptor>) -> Self {
        Self {
            voices: Arc::new(voices),
        }
    }

    pub fn replace(&mut self, voices: Vec<VoiceDescriptor>) {
        self.voices = Arc::new(voices);
    }

    pub fn get(&self, index: usize) -> Option<&VoiceDescriptor> {
        self.voices.get(index)
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Index of the platform-designated default voice, if any.
    pub fn default_index(&self) -> Option<usize> {
        self.voices.iter().position(|v| v.is_default)
    }

    pub fn options(&self) -> Vec<VoiceOption> {
        self.voices.iter().map(VoiceOption::from).collect()
    }
}
