//! JSONL file writer for conversation events.
//!
//! Each [`ConversationEvent`] becomes one JSON line carrying `type`,
//! `timestamp` and a per-logger sequence number `seq`, appended to the file.
//! The file is opened in append mode so a long-running server and repeated
//! CLI runs share one transcript.

use panel_application::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

struct Sink {
    writer: BufWriter<File>,
    seq: u64,
}

/// JSONL conversation logger that writes one JSON object per line.
///
/// Thread-safe via a `Mutex`; every line is flushed as it is written.
pub struct JsonlConversationLogger {
    sink: Mutex<Sink>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open (or create) the log file for appending.
    ///
    /// Creates parent directories as needed. Returns `None` if the file
    /// cannot be opened; conversation logging is best-effort.
    pub fn open(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create conversation log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    "Could not open conversation log file {}: {}",
                    path.display(),
                    e
                );
                return None;
            }
        };

        Some(Self {
            sink: Mutex::new(Sink {
                writer: BufWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Merge the event payload with its envelope fields.
///
/// Object payloads are flattened into the record; anything else goes
/// under `data`.
fn record(event: ConversationEvent, seq: u64, timestamp: String) -> Value {
    let mut map = match event.payload {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    map.insert("type".to_string(), Value::String(event.event_type.to_string()));
    map.insert("seq".to_string(), Value::from(seq));
    map.insert("timestamp".to_string(), Value::String(timestamp));
    Value::Object(map)
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let Ok(mut sink) = self.sink.lock() else {
            return;
        };
        sink.seq += 1;
        let seq = sink.seq;

        let Ok(line) = serde_json::to_string(&record(event, seq, timestamp)) else {
            return;
        };
        if let Err(e) = writeln!(sink.writer, "{}", line).and_then(|_| sink.writer.flush()) {
            warn!("Could not write conversation log {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_record_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("panel.jsonl");
        let logger = JsonlConversationLogger::open(&path).unwrap();

        logger.log(ConversationEvent::new(
            "dispatch_started",
            json!({"providers": ["Gemini", "ChatGPT"], "prompt_chars": 30}),
        ));
        logger.log(ConversationEvent::new(
            "provider_settled",
            json!({"provider": "Gemini", "status": "success", "attempts": 1}),
        ));

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "dispatch_started");
        assert_eq!(lines[0]["providers"][1], "ChatGPT");
        assert_eq!(lines[0]["seq"], 1);
        assert_eq!(lines[1]["type"], "provider_settled");
        assert_eq!(lines[1]["seq"], 2);
        for line in &lines {
            let ts = line["timestamp"].as_str().unwrap();
            assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
        }
    }

    #[test]
    fn test_appends_across_loggers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.jsonl");

        let first = JsonlConversationLogger::open(&path).unwrap();
        first.log(ConversationEvent::new("summary_completed", json!({"success": true})));
        drop(first);

        let second = JsonlConversationLogger::open(&path).unwrap();
        second.log(ConversationEvent::new("summary_completed", json!({"success": false})));

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["success"], false);
    }

    #[test]
    fn test_non_object_payload_goes_under_data() {
        let value = record(
            ConversationEvent::new("note", json!("just a string")),
            7,
            "2026-01-01T00:00:00.000Z".to_string(),
        );
        assert_eq!(value["type"], "note");
        assert_eq!(value["data"], "just a string");
        assert_eq!(value["seq"], 7);
    }

    #[test]
    fn test_unopenable_path_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a log file
        assert!(JsonlConversationLogger::open(dir.path()).is_none());
    }
}
