//! JSONL file writer for epistemic events.
//!
//! Each [`EpistemicEvent`] is serialized as a single JSON line with a `type`
//! field and an RFC 3339 `timestamp`, appended to the file via a buffered
//! writer.

use doxa_application::ports::observer::BeliefObserver;
use doxa_domain::EpistemicEvent;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL event logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlEventLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlEventLogger {
    /// Create a new logger writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create event log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create event log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: &EpistemicEvent) -> Option<serde_json::Value> {
        let mut value = serde_json::to_value(event).ok()?;
        let timestamp = chrono::DateTime::from_timestamp_millis(event.timestamp as i64)
            .unwrap_or_else(chrono::Utc::now)
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        if let serde_json::Value::Object(map) = &mut value {
            map.insert("timestamp".to_string(), serde_json::Value::String(timestamp));
        }
        Some(value)
    }
}

impl BeliefObserver for JsonlEventLogger {
    fn on_event(&self, event: &EpistemicEvent) {
        let Some(record) = Self::record(event) else {
            return;
        };
        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlEventLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doxa_domain::{AgentId, Belief, EventKind, Justification, Proposition};
    use std::io::Read;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        let mut content = String::new();
        File::open(path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
            .trim()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_jsonl_logger_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let logger = JsonlEventLogger::new(&path).unwrap();

        let previous = Belief::new(Proposition::new("ApiIsFast"), 0.4, Justification::new());
        let current = previous.revise(0.7, Justification::new());
        logger.on_event(&EpistemicEvent::belief_formed(
            AgentId::new("alpha"),
            previous.clone(),
        ));
        logger.on_event(&EpistemicEvent::belief_updated(
            AgentId::new("alpha"),
            previous,
            current,
        ));
        logger.on_event(&EpistemicEvent::new(
            AgentId::new("alpha"),
            EventKind::FrameChanged {
                from: "efficiency".to_string(),
                to: "security".to_string(),
                recomputed: 1,
            },
        ));

        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 3);
        for line in &lines {
            assert!(line.get("type").is_some());
            assert!(line["timestamp"].as_str().unwrap().ends_with('Z'));
            assert_eq!(line["entity_id"], "alpha");
        }

        assert_eq!(lines[0]["type"], "belief_formed");
        assert_eq!(lines[0]["belief"]["proposition"], "ApiIsFast");
        assert_eq!(lines[1]["type"], "belief_updated");
        assert!((lines[1]["delta"].as_f64().unwrap() - 0.3).abs() < 1e-9);
        assert_eq!(lines[2]["type"], "frame_changed");
        assert_eq!(lines[2]["to"], "security");
    }

    #[test]
    fn test_jsonl_logger_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("run").join("events.jsonl");
        let logger = JsonlEventLogger::new(&path).unwrap();
        assert_eq!(logger.path(), path.as_path());
        assert!(path.exists());
    }

    #[test]
    fn test_jsonl_logger_returns_none_for_directory_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonlEventLogger::new(dir.path()).is_none());
    }
}
