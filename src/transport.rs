// Event transport - one JSON message per event over a one-way text channel
//
// Every send is best effort: no acknowledgement, no retry, no buffering.

use serde_json::Value;
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Receiver of encoded event messages
pub trait EventSink {
    fn send(&mut self, message: String);
}

impl<F: FnMut(String)> EventSink for F {
    fn send(&mut self, message: String) {
        self(message)
    }
}

/// Writes each message on its own line
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> EventSink for WriterSink<W> {
    fn send(&mut self, message: String) {
        if let Err(e) = writeln!(self.writer, "{}", message).and_then(|_| self.writer.flush()) {
            warn!("Failed to write event: {}", e);
        }
    }
}

/// Collects messages in memory; clones share one buffer
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    messages: Rc<RefCell<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    /// Messages decoded back into `[event, ...payloads]` arrays
    pub fn events(&self) -> Vec<Vec<Value>> {
        self.messages
            .borrow()
            .iter()
            .filter_map(|m| serde_json::from_str(m).ok())
            .collect()
    }
}

impl EventSink for MemorySink {
    fn send(&mut self, message: String) {
        self.messages.borrow_mut().push(message);
    }
}

/// Encodes events and hands them to the sink, if there is one
#[derive(Default)]
pub struct Transport {
    sink: Option<Box<dyn EventSink>>,
    prefix: String,
}

impl Transport {
    pub fn new(sink: Option<Box<dyn EventSink>>) -> Self {
        Self {
            sink,
            prefix: String::new(),
        }
    }

    /// Prepend `prefix` to every event name
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// Encode `[event, ...payloads]` as one message and send it
    pub fn emit(&mut self, event: &str, payloads: Vec<Value>) {
        let name = format!("{}{}", self.prefix, event);
        let mut message = Vec::with_capacity(payloads.len() + 1);
        message.push(Value::String(name.clone()));
        message.extend(payloads);
        let encoded = Value::Array(message).to_string();

        match self.sink.as_mut() {
            Some(sink) => {
                debug!(event = %name, bytes = encoded.len(), "Emitting event");
                sink.send(encoded);
            }
            None => trace!(event = %name, "No event sink, dropping message"),
        }
    }
}

/// Serialize a payload, degrading to `null` rather than failing the emit
pub fn to_payload<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        warn!("Failed to serialize event payload: {}", e);
        Value::Null
    })
}
