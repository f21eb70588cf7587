use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::field::{Field, Visit};
use tracing::Subscriber;
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// Feeds the Diagnostics tab.
///
/// Each event becomes one line, `<elapsed>s <LEVEL> <source>: <message> k=v ...`.
/// The elapsed time counts from layer creation. `source` is the last segment
/// of the event target, so `voxlog_session::adapter` shows as `adapter`.
/// The buffer keeps the newest `capacity` lines.
pub struct DiagnosticLayer {
    buffer: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
    started: Instant,
}

impl DiagnosticLayer {
    pub fn new(buffer: Arc<Mutex<VecDeque<String>>>, capacity: usize) -> Self {
        Self {
            buffer,
            capacity: capacity.max(1),
            started: Instant::now(),
        }
    }

    fn push(&self, line: String) {
        let Ok(mut buf) = self.buffer.lock() else {
            return;
        };
        while buf.len() >= self.capacity {
            buf.pop_front();
        }
        buf.push_back(line);
    }
}

fn source(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

/// Collects the message and the remaining fields of one event.
#[derive(Default)]
struct DiagnosticLine {
    message: String,
    fields: String,
}

impl DiagnosticLine {
    fn field(&mut self, name: &str, value: &str) {
        if value.contains(char::is_whitespace) {
            let _ = write!(self.fields, " {name}={value:?}");
        } else {
            let _ = write!(self.fields, " {name}={value}");
        }
    }
}

impl Visit for DiagnosticLine {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            name => self.field(name, value),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            name => self.field(name, &format!("{value:?}")),
        }
    }
}

impl<S: Subscriber> Layer<S> for DiagnosticLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut line = DiagnosticLine::default();
        event.record(&mut line);

        let elapsed = self.started.elapsed().as_secs_f64();
        self.push(format!(
            "{elapsed:>8.3}s {:<5} {}: {}{}",
            metadata.level(),
            source(metadata.target()),
            line.message,
            line.fields
        ));
    }
}
