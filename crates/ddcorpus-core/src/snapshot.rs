//! Result of one corpus scan.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::config::ScanConfig;
use crate::error::ScanWarning;
use crate::index::CorpusIndex;

/// Counters for the directory walk itself, independent of decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkStats {
    /// Directories entered.
    pub dirs_visited: u64,
    /// Regular files with a supported extension.
    pub candidate_files: u64,
    /// Regular files skipped for their extension.
    pub unsupported_files: u64,
    /// Entries skipped by an ignore pattern.
    pub ignored_entries: u64,
    /// Deepest level reached below the root.
    pub max_depth: u32,
}

impl WalkStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_dir(&mut self, depth: u32) {
        self.dirs_visited += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    pub fn record_candidate(&mut self, depth: u32) {
        self.candidate_files += 1;
        self.max_depth = self.max_depth.max(depth);
    }
}

/// Index of a scanned corpus together with how it was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusSnapshot {
    /// The page index.
    pub index: CorpusIndex,

    /// Root path that was scanned.
    pub root_path: PathBuf,

    /// When this scan was performed.
    pub scanned_at: SystemTime,

    /// Duration of the scan.
    pub scan_duration: Duration,

    /// Scan configuration used.
    pub config: ScanConfig,

    /// Walk counters.
    pub stats: WalkStats,

    /// Warnings encountered during scan.
    pub warnings: Vec<ScanWarning>,
}

impl CorpusSnapshot {
    pub fn new(
        index: CorpusIndex,
        root_path: PathBuf,
        config: ScanConfig,
        stats: WalkStats,
        scan_duration: Duration,
        warnings: Vec<ScanWarning>,
    ) -> Self {
        Self {
            index,
            root_path,
            scanned_at: SystemTime::now(),
            scan_duration,
            config,
            stats,
            warnings,
        }
    }

    /// Check if there were any warnings during scanning.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
