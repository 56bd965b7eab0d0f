//! Append-only run history.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tt_core::{
    from_json_slice, to_canonical_json_line, ErrorInfo, RequestSummary, Schedule, SearchStatus,
    TimetableError,
};

use crate::fingerprint::Fingerprint;

fn history_error(code: &str, message: &str, path: &Path, err: impl ToString) -> TimetableError {
    TimetableError::History(
        ErrorInfo::new(code, message)
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}

/// A ranked schedule under its externally addressable identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterializedSchedule {
    /// Identifier unique within its result set, e.g. `credits-18_1`.
    pub id: String,
    /// 1-based rank.
    pub rank: usize,
    /// Policy score.
    pub score: f64,
    /// Content digest of the schedule.
    pub schedule_id: String,
    /// The schedule itself.
    pub schedule: Schedule,
}

/// History entry before the log assigns its sequence number and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHistoryRecord {
    /// Fingerprint of the request.
    pub fingerprint: Fingerprint,
    /// What was asked for.
    pub request: RequestSummary,
    /// How the producing search finished.
    pub status: SearchStatus,
    /// True when results came from the cache.
    pub cache_hit: bool,
    /// Materialized results, best first.
    pub schedules: Vec<MaterializedSchedule>,
}

/// One appended history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// 1-based, strictly increasing position in the log.
    pub sequence: u64,
    /// Append time, RFC 3339.
    pub timestamp: String,
    /// Fingerprint of the request.
    pub fingerprint: Fingerprint,
    /// What was asked for.
    pub request: RequestSummary,
    /// How the producing search finished.
    pub status: SearchStatus,
    /// True when results came from the cache.
    pub cache_hit: bool,
    /// Materialized results, best first.
    pub schedules: Vec<MaterializedSchedule>,
}

impl HistoryRecord {
    fn stamp(sequence: u64, record: NewHistoryRecord) -> Self {
        Self {
            sequence,
            timestamp: Utc::now().to_rfc3339(),
            fingerprint: record.fingerprint,
            request: record.request,
            status: record.status,
            cache_hit: record.cache_hit,
            schedules: record.schedules,
        }
    }
}

/// Append-only log of runs. Existing records are never rewritten.
pub trait HistoryLog {
    /// Appends `record`, assigning the next sequence number and a fresh timestamp.
    fn append(&mut self, record: NewHistoryRecord) -> Result<HistoryRecord, TimetableError>;

    /// Every record in append order.
    fn records(&self) -> Result<Vec<HistoryRecord>, TimetableError>;

    /// The most recent record.
    fn latest(&self) -> Result<Option<HistoryRecord>, TimetableError> {
        Ok(self.records()?.pop())
    }
}

/// History kept in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    records: Vec<HistoryRecord>,
}

impl MemoryHistory {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing was appended.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl HistoryLog for MemoryHistory {
    fn append(&mut self, record: NewHistoryRecord) -> Result<HistoryRecord, TimetableError> {
        let stamped = HistoryRecord::stamp(self.records.len() as u64 + 1, record);
        self.records.push(stamped.clone());
        Ok(stamped)
    }

    fn records(&self) -> Result<Vec<HistoryRecord>, TimetableError> {
        Ok(self.records.clone())
    }

    fn latest(&self) -> Result<Option<HistoryRecord>, TimetableError> {
        Ok(self.records.last().cloned())
    }
}

/// True when the file is non-empty and its last byte is not a newline, as
/// left behind by an interrupted write.
fn ends_mid_line(file: &mut fs::File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// History stored as one canonical JSON object per line.
#[derive(Debug, Clone)]
pub struct JsonLinesHistory {
    path: PathBuf,
    next_sequence: u64,
}

impl JsonLinesHistory {
    /// Opens the log at `path`, creating parent directories. Numbering resumes
    /// after the highest sequence already present.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, TimetableError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                history_error("history-create", "failed to create history directory", parent, err)
            })?;
        }
        let mut log = Self {
            path,
            next_sequence: 1,
        };
        let last = log
            .records()?
            .iter()
            .map(|record| record.sequence)
            .max()
            .unwrap_or(0);
        log.next_sequence = last + 1;
        Ok(log)
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryLog for JsonLinesHistory {
    fn append(&mut self, record: NewHistoryRecord) -> Result<HistoryRecord, TimetableError> {
        let stamped = HistoryRecord::stamp(self.next_sequence, record);
        let line = to_canonical_json_line(&stamped)?;
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|err| history_error("history-open", "failed to open history log", &self.path, err))?;
        let torn = ends_mid_line(&mut file)
            .map_err(|err| history_error("history-read", "failed to inspect history log tail", &self.path, err))?;
        if torn {
            warn!("history log {} ends mid-line; starting a new line", self.path.display());
        }
        let payload = if torn { [&b"\n"[..], &line[..]].concat() } else { line };
        file.write_all(&payload)
            .and_then(|()| file.flush())
            .map_err(|err| history_error("history-write", "failed to append history record", &self.path, err))?;
        self.next_sequence += 1;
        info!(
            "appended history record {} for {} to {}",
            stamped.sequence,
            stamped.fingerprint,
            self.path.display()
        );
        Ok(stamped)
    }

    fn records(&self) -> Result<Vec<HistoryRecord>, TimetableError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(history_error("history-open", "failed to open history log", &self.path, err))
            }
        };
        let mut records = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line
                .map_err(|err| history_error("history-read", "failed to read history log", &self.path, err))?;
            if line.trim().is_empty() {
                continue;
            }
            match from_json_slice::<HistoryRecord>(line.as_bytes()) {
                Ok(record) => records.push(record),
                Err(err) => warn!(
                    "skipping malformed history line {} in {}: {err}",
                    index + 1,
                    self.path.display()
                ),
            }
        }
        Ok(records)
    }
}
