use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use voxlog_core::LogError;

/// An append-only destination for transcript and diagnostic lines.
pub trait LogSink: Send {
    /// Returns the sink's short name (e.g. `"memory"`, `"file"`).
    fn name(&self) -> &str;
    /// Append one line. Lines are never edited or removed by the session.
    fn append(&mut self, entry: &str) -> Result<(), LogError>;
}

/// Shared ring of the most recent lines, read by the UI while the session writes.
pub struct MemoryLog {
    buffer: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl MemoryLog {
    pub fn new(capacity: usize) -> Self {
        Self::with_buffer(Arc::new(Mutex::new(VecDeque::new())), capacity)
    }

    pub fn with_buffer(buffer: Arc<Mutex<VecDeque<String>>>, capacity: usize) -> Self {
        Self {
            buffer,
            capacity: capacity.max(1),
        }
    }

    pub fn buffer(&self) -> Arc<Mutex<VecDeque<String>>> {
        Arc::clone(&self.buffer)
    }

    pub fn lines(&self) -> Vec<String> {
        self.buffer
            .lock()
            .map(|b| b.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl LogSink for MemoryLog {
    fn name(&self) -> &str {
        "memory"
    }

    fn append(&mut self, entry: &str) -> Result<(), LogError> {
        let mut buf = self
            .buffer
            .lock()
            .map_err(|_| LogError::Write("log buffer poisoned".to_string()))?;
        if buf.len() >= self.capacity {
            buf.pop_front();
        }
        buf.push_back(entry.to_string());
        Ok(())
    }
}
