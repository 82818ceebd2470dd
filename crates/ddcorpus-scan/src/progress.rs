//! Scan progress reporting.

use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Stage of a scan a progress update belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    /// Walking the directory tree and collecting candidate files.
    Walking,
    /// Folding decoded records into the index.
    Indexing,
    /// Scan finished.
    Done,
}

/// Progress information during a scan.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    pub phase: ScanPhase,
    /// Candidate files found by the walk so far.
    pub files_seen: u64,
    /// Directories entered so far.
    pub dirs_seen: u64,
    /// Files indexed as pages so far.
    pub valid_files: u64,
    /// Files rejected by the codec so far.
    pub invalid_files: u64,
    /// Current path being processed.
    pub current_path: PathBuf,
    /// Number of walk warnings encountered.
    pub warnings_count: u64,
    /// Time elapsed since scan started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            phase: ScanPhase::Walking,
            files_seen: 0,
            dirs_seen: 0,
            valid_files: 0,
            invalid_files: 0,
            current_path: PathBuf::new(),
            warnings_count: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Files decoded so far, valid or not.
    pub fn files_indexed(&self) -> u64 {
        self.valid_files + self.invalid_files
    }

    /// Calculate scan rate in files per second.
    pub fn files_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.files_seen as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Running counters behind the broadcast snapshots.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    start_time: Instant,
    phase: ScanPhase,
    files_seen: u64,
    dirs_seen: u64,
    valid_files: u64,
    invalid_files: u64,
    warnings_count: u64,
    current_path: PathBuf,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            phase: ScanPhase::Walking,
            files_seen: 0,
            dirs_seen: 0,
            valid_files: 0,
            invalid_files: 0,
            warnings_count: 0,
            current_path: PathBuf::new(),
        }
    }

    pub fn set_phase(&mut self, phase: ScanPhase) {
        self.phase = phase;
    }

    pub fn record_file(&mut self) {
        self.files_seen += 1;
    }

    pub fn record_dir(&mut self) {
        self.dirs_seen += 1;
    }

    pub fn record_outcome(&mut self, valid: bool) {
        if valid {
            self.valid_files += 1;
        } else {
            self.invalid_files += 1;
        }
    }

    pub fn record_warning(&mut self) {
        self.warnings_count += 1;
    }

    pub fn set_current_path(&mut self, path: PathBuf) {
        self.current_path = path;
    }

    pub fn snapshot(&self) -> ScanProgress {
        ScanProgress {
            phase: self.phase,
            files_seen: self.files_seen,
            dirs_seen: self.dirs_seen,
            valid_files: self.valid_files,
            invalid_files: self.invalid_files,
            current_path: self.current_path.clone(),
            warnings_count: self.warnings_count,
            elapsed: self.start_time.elapsed(),
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}
