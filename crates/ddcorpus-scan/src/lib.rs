//! Corpus scanning engine for ddcorpus.
//!
//! This crate walks a directory of page images with jwalk, decodes every
//! candidate filename in parallel and folds the results into a fresh
//! [`CorpusIndex`] on a single thread.
//!
//! # Overview
//!
//! - **Parallel traversal** via jwalk/rayon
//! - **Parallel decoding**, serial indexing
//! - **Progress updates** via broadcast channels
//! - **Configurable** depth limits, ignore patterns, hidden files
//! - **Batch validation** with optional filename suggestions
//!
//! # Example
//!
//! ```rust,no_run
//! use ddcorpus_scan::{CorpusScanner, ScanConfig};
//!
//! let config = ScanConfig::new("/path/to/corpus");
//! let scanner = CorpusScanner::new();
//! let snapshot = scanner.scan(&config).unwrap();
//!
//! println!("Pages: {}", snapshot.index.valid_files());
//! println!("Invalid files: {}", snapshot.index.invalid_files().len());
//! ```
//!
//! # Progress Monitoring
//!
//! Subscribe to progress updates before starting the scan:
//!
//! ```rust,no_run
//! use ddcorpus_scan::CorpusScanner;
//!
//! let scanner = CorpusScanner::new();
//! let mut progress_rx = scanner.subscribe();
//!
//! std::thread::spawn(move || {
//!     while let Ok(progress) = progress_rx.blocking_recv() {
//!         println!("Found {} files", progress.files_seen);
//!     }
//! });
//! ```

mod progress;
mod scanner;
mod validate;

pub use progress::{ScanPhase, ScanProgress};
pub use scanner::{CorpusScanner, CorpusWalk};
pub use validate::{InvalidEntry, ValidationReport, validate_directory};

// Re-export core types for convenience
pub use ddcorpus_core::{
    CorpusIndex, CorpusSnapshot, ScanConfig, ScanError, ScanWarning, WalkStats, WarningKind,
};
