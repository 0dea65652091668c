//! In-memory diagnostics log.
//!
//! [`DiagnosticsLog`] is a `tracing` layer that keeps the most recent events in
//! a bounded ring buffer, along with their structured fields (`query`,
//! `matches`, `hint`, ...). The TUI reads it through a [`DiagnosticsReader`]
//! to show search activity without writing to the terminal it draws on.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

use crate::engine::SEARCH_STARTED;

/// A single captured event.
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Seconds since the log was created.
    pub elapsed_secs: f64,
    pub level: Level,
    /// Target module path.
    pub target: String,
    pub message: String,
    /// Structured fields other than `message`, in recording order.
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Value of the named structured field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug)]
struct RingBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    start_time: Instant,
}

impl RingBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            start_time: Instant::now(),
        }
    }

    fn push(&mut self, level: Level, target: String, fields: FieldVisitor) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            elapsed_secs: self.start_time.elapsed().as_secs_f64(),
            level,
            target,
            message: fields.message,
            fields: fields.fields,
        });
    }
}

/// A `tracing` layer that records events into a shared ring buffer.
#[derive(Debug, Clone)]
pub struct DiagnosticsLog {
    buffer: Arc<Mutex<RingBuffer>>,
}

impl DiagnosticsLog {
    /// Create a log that retains at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(RingBuffer::new(capacity))),
        }
    }

    pub fn reader(&self) -> DiagnosticsReader {
        DiagnosticsReader {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

impl<S: Subscriber> Layer<S> for DiagnosticsLog {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        if let Ok(mut buf) = self.buffer.lock() {
            buf.push(*metadata.level(), metadata.target().to_string(), visitor);
        }
    }
}

/// Read handle for a [`DiagnosticsLog`].
#[derive(Debug, Clone)]
pub struct DiagnosticsReader {
    buffer: Arc<Mutex<RingBuffer>>,
}

impl DiagnosticsReader {
    /// Snapshot of every retained entry, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.buffer
            .lock()
            .map(|buf| buf.entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Queries of the retained search-started events, oldest first.
    pub fn queries(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|e| e.message == SEARCH_STARTED)
            .filter_map(|e| e.field("query").map(str::to_string))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().map(|buf| buf.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push((field.name().to_string(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields
                .push((field.name().to_string(), format!("{value:?}")));
        }
    }
}
