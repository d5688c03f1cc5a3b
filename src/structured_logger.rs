//! Structured JSONL logger for gate and theme events.
//!
//! Machine-parseable log with monotonic sequence numbers, ISO 8601
//! timestamps, and a session id for correlation. One line per entry.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::gate::{GateCommand, GateEvent};

/// Appends structured entries to `<logs_dir>/events.jsonl`.
pub struct StructuredLogger {
    session_id: String,
    seq: AtomicU64,
    log_file: Mutex<File>,
    log_path: PathBuf,
}

/// A single log entry in JSONL format.
#[derive(Serialize, Deserialize)]
pub struct LogEntry {
    /// Monotonic sequence number, unique across the session.
    pub seq: u64,
    /// ISO 8601 timestamp with microseconds.
    pub ts: String,
    pub session_id: String,
    /// Component that emitted the entry.
    pub component: String,
    /// Structured event data.
    pub event: Value,
}

impl StructuredLogger {
    /// Creates a logger for the given session, appending to
    /// `<logs_dir>/events.jsonl`.
    pub fn new(session_id: &str, logs_dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(logs_dir)?;
        let log_path = logs_dir.join("events.jsonl");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        Ok(Self {
            session_id: session_id.to_string(),
            seq: AtomicU64::new(0),
            log_file: Mutex::new(file),
            log_path,
        })
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Logs a structured event as a single JSONL line. Logging failures are
    /// swallowed; the log is diagnostics, not state.
    pub fn log(&self, component: &str, event: impl Serialize) {
        let entry = LogEntry {
            seq: self.next_seq(),
            ts: Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            session_id: self.session_id.clone(),
            component: component.to_string(),
            event: serde_json::to_value(event).unwrap_or(Value::Null),
        };

        if let Ok(mut file) = self.log_file.lock() {
            if let Ok(line) = serde_json::to_string(&entry) {
                let _ = writeln!(file, "{}", line);
                let _ = file.flush();
            }
        }
    }

    /// Logs receipt of a gate command.
    pub fn log_gate_command(&self, machine_seq: u64, command: &GateCommand) {
        self.log(
            "GateMachine",
            serde_json::json!({
                "type": "GateCommand",
                "machine_seq": machine_seq,
                "command": command,
            }),
        );
    }

    /// Logs an event emitted by the gate machine.
    pub fn log_gate_event(&self, machine_seq: u64, event: &GateEvent) {
        self.log(
            "GateMachine",
            serde_json::json!({
                "type": "GateEvent",
                "machine_seq": machine_seq,
                "event": event,
            }),
        );
    }

    /// Logs a theme (token store) replacement.
    pub fn log_theme_loaded(&self, fingerprint: &str) {
        self.log(
            "Theme",
            serde_json::json!({
                "type": "ThemeLoaded",
                "fingerprint": fingerprint,
            }),
        );
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.log_path
    }
}
