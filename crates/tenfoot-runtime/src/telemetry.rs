#![forbid(unsafe_code)]

//! Command telemetry.
//!
//! Every processed command produces one [`CommandRecord`], whether or not it
//! changed anything. Records are kept in a bounded in-memory
//! [`TelemetryLog`] (tests drain it) and can additionally be written as JSONL
//! through a shared [`TelemetrySink`]. Sink writes are serialized behind a
//! mutex, so line order matches command order.

use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tenfoot_core::event::GestureKind;
use tenfoot_core::{NavigationContext, RemoteButton};

/// What a command ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandOutcome {
    /// Directional input moved (or recovered) focus.
    FocusMoved,
    /// Directional input had no candidate. Still a completed command.
    NoChange,
    /// The focused node's action ran.
    Selected,
    /// Nothing focused, disabled, or no action.
    NothingSelected,
    /// Back navigation dismissed a modal, closed the menu, or popped history.
    Back,
    /// Back navigation had nothing to go back to.
    BackRejected,
    /// Forwarded to the playback controller and accepted.
    Playback,
    /// The playback controller rejected the command.
    PlaybackRejected,
    /// Back/menu during playback returned to browse.
    LeftPlayback,
    /// The button has no meaning in the current context.
    Unrouted,
}

impl CommandOutcome {
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(
            self,
            Self::FocusMoved
                | Self::NoChange
                | Self::Selected
                | Self::Back
                | Self::Playback
                | Self::LeftPlayback
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FocusMoved => "focus_moved",
            Self::NoChange => "no_change",
            Self::Selected => "selected",
            Self::NothingSelected => "nothing_selected",
            Self::Back => "back",
            Self::BackRejected => "back_rejected",
            Self::Playback => "playback",
            Self::PlaybackRejected => "playback_rejected",
            Self::LeftPlayback => "left_playback",
            Self::Unrouted => "unrouted",
        }
    }
}

/// Command-completed (`success: true`) or command-failed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    /// Monotonic sequence number within the session.
    pub seq: u64,
    #[serde(rename = "type")]
    pub button: RemoteButton,
    /// Gesture the command came from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gesture: Option<GestureKind>,
    /// Context the command was routed in.
    pub context: NavigationContext,
    pub success: bool,
    pub outcome: CommandOutcome,
    /// Microseconds since the dispatcher's session epoch.
    pub timestamp_us: u64,
}

/// Bounded in-memory record log; the oldest records are dropped first.
#[derive(Debug, Clone)]
pub struct TelemetryLog {
    records: VecDeque<CommandRecord>,
    capacity: usize,
    dropped: u64,
}

impl TelemetryLog {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            dropped: 0,
        }
    }

    pub fn push(&mut self, record: CommandRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
            self.dropped += 1;
        }
        self.records.push_back(record);
    }

    /// Remove and return all records, oldest first.
    pub fn drain(&mut self) -> Vec<CommandRecord> {
        self.records.drain(..).collect()
    }

    #[must_use]
    pub fn last(&self) -> Option<&CommandRecord> {
        self.records.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandRecord> + '_ {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records evicted because the log was full.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl Default for TelemetryLog {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Shared JSONL writer for [`CommandRecord`]s.
///
/// Clones write to the same underlying writer. Each record is flushed as it
/// is written unless buffering was requested with
/// [`TelemetrySink::with_flush_on_write`].
#[derive(Clone)]
pub struct TelemetrySink {
    writer: Arc<Mutex<BufWriter<Box<dyn Write + Send>>>>,
    flush_on_write: bool,
}

impl std::fmt::Debug for TelemetrySink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetrySink")
            .field("flush_on_write", &self.flush_on_write)
            .finish_non_exhaustive()
    }
}

impl TelemetrySink {
    #[must_use]
    pub fn stdout() -> Self {
        Self::from_writer(Box::new(io::stdout()))
    }

    /// Append to `path`, creating it if needed. Existing lines are kept.
    pub fn append_to(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::from_writer(Box::new(file)))
    }

    #[must_use]
    pub fn from_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Arc::new(Mutex::new(BufWriter::new(writer))),
            flush_on_write: true,
        }
    }

    #[must_use]
    pub fn with_flush_on_write(mut self, enabled: bool) -> Self {
        self.flush_on_write = enabled;
        self
    }

    /// Serialize one record as a JSON line.
    pub fn write_record(&self, record: &CommandRecord) -> io::Result<()> {
        let line = serde_json::to_string(record).map_err(io::Error::other)?;
        let mut writer = self.lock()?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        if self.flush_on_write {
            writer.flush()?;
        }
        Ok(())
    }

    pub fn flush(&self) -> io::Result<()> {
        self.lock()?.flush()
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, BufWriter<Box<dyn Write + Send>>>> {
        self.writer
            .lock()
            .map_err(|_| io::Error::other("telemetry sink lock poisoned"))
    }
}
