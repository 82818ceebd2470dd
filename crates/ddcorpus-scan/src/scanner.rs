//! JWalk-based corpus scanner.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use jwalk::{Parallelism, WalkDir};
use rayon::prelude::*;
use tokio::sync::broadcast;

use ddcorpus_core::{
    CorpusIndex, CorpusSnapshot, PageRecord, ParseFailure, ScanConfig, ScanError, ScanWarning,
    WalkStats, WarningKind, decode_path, is_supported_extension,
};

use crate::progress::{ProgressTracker, ScanPhase, ScanProgress};

/// Send a progress update every this many files.
const PROGRESS_INTERVAL: u64 = 1000;

pub(crate) type Decoded = (PathBuf, Result<PageRecord, ParseFailure>);

/// Files found under a corpus root, before decoding.
#[derive(Debug, Clone)]
pub struct CorpusWalk {
    /// Canonicalized root.
    pub root_path: PathBuf,
    /// Files with a supported extension, sorted.
    pub files: Vec<PathBuf>,
    pub stats: WalkStats,
    pub warnings: Vec<ScanWarning>,
}

/// Corpus scanner: parallel walk and decode, serial indexing.
pub struct CorpusScanner {
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl CorpusScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self { progress_tx }
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Scan the corpus under `config.root` and build a fresh index.
    pub fn scan(&self, config: &ScanConfig) -> Result<CorpusSnapshot, ScanError> {
        let start = Instant::now();
        let mut tracker = ProgressTracker::new();
        let walk = self.walk_with(config, &mut tracker)?;

        tracker.set_phase(ScanPhase::Indexing);
        let decoded = decode_all(config, walk.files)?;

        let mut index = CorpusIndex::new();
        for (n, (path, outcome)) in (0u64..).zip(decoded) {
            if n % PROGRESS_INTERVAL == 0 {
                tracker.set_current_path(path.clone());
                let _ = self.progress_tx.send(tracker.snapshot());
            }
            let valid = index.record_outcome(path, outcome);
            tracker.record_outcome(valid);
        }

        tracker.set_phase(ScanPhase::Done);
        let _ = self.progress_tx.send(tracker.snapshot());

        let scan_duration = start.elapsed();
        tracing::info!(
            valid = index.valid_files(),
            invalid = index.invalid_files().len(),
            warnings = walk.warnings.len(),
            elapsed_ms = scan_duration.as_millis() as u64,
            "scan complete"
        );

        Ok(CorpusSnapshot::new(
            index,
            walk.root_path,
            config.clone(),
            walk.stats,
            scan_duration,
            walk.warnings,
        ))
    }

    /// Walk the corpus without decoding anything.
    pub fn walk(&self, config: &ScanConfig) -> Result<CorpusWalk, ScanError> {
        self.walk_with(config, &mut ProgressTracker::new())
    }

    fn walk_with(
        &self,
        config: &ScanConfig,
        tracker: &mut ProgressTracker,
    ) -> Result<CorpusWalk, ScanError> {
        let root_path = config
            .root
            .canonicalize()
            .map_err(|e| ScanError::io(&config.root, e))?;

        if !root_path.is_dir() {
            return Err(ScanError::NotADirectory { path: root_path });
        }
        tracing::info!(root = %root_path.display(), "walking corpus");

        let mut stats = WalkStats::new();
        let mut warnings = Vec::new();
        let files =
            self.collect_candidates(config, &root_path, tracker, &mut stats, &mut warnings)?;

        Ok(CorpusWalk {
            root_path,
            files,
            stats,
            warnings,
        })
    }

    /// Walk the tree and collect files with a supported extension, sorted.
    fn collect_candidates(
        &self,
        config: &ScanConfig,
        root_path: &Path,
        tracker: &mut ProgressTracker,
        stats: &mut WalkStats,
        warnings: &mut Vec<ScanWarning>,
    ) -> Result<Vec<PathBuf>, ScanError> {
        let parallelism = match config.threads {
            0 => Parallelism::RayonDefaultPool {
                busy_timeout: std::time::Duration::from_millis(100),
            },
            n => Parallelism::RayonNewPool(n),
        };

        let matcher = config.ignore_matcher()?;
        let ignored = Arc::new(AtomicU64::new(0));
        let ignored_in_walk = Arc::clone(&ignored);

        let walker = WalkDir::new(root_path)
            .parallelism(parallelism)
            .skip_hidden(!config.include_hidden)
            .follow_links(config.follow_symlinks)
            .min_depth(1)
            .max_depth(config.max_depth.map(|d| d as usize).unwrap_or(usize::MAX))
            .process_read_dir(move |_depth, _path, _state, children| {
                // Pruning here keeps the walker out of ignored directories.
                children.retain(|child| match child {
                    Ok(entry) if matcher.is_match(entry.file_name()) => {
                        ignored_in_walk.fetch_add(1, Ordering::Relaxed);
                        false
                    }
                    _ => true,
                });
            });

        let mut candidates = Vec::new();

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    tracing::warn!(path = %path.display(), error = %err, "walk error");
                    warnings.push(ScanWarning::new(path, err.to_string(), WarningKind::ReadError));
                    tracker.record_warning();
                    continue;
                }
            };

            let path = entry.path();
            let file_type = entry.file_type();
            let depth = entry.depth() as u32;

            if file_type.is_dir() {
                stats.record_dir(depth);
                tracker.record_dir();
                continue;
            }
            if !file_type.is_file() {
                tracing::debug!(path = %path.display(), "skipping non-regular entry");
                continue;
            }
            if !is_supported_extension(&path) {
                stats.unsupported_files += 1;
                continue;
            }
            if entry.file_name().to_str().is_none() {
                tracing::warn!(path = %path.display(), "file name is not valid UTF-8");
                warnings.push(ScanWarning::non_utf8_name(&path));
                tracker.record_warning();
            }

            stats.record_candidate(depth);
            tracker.record_file();
            if stats.candidate_files % PROGRESS_INTERVAL == 1 {
                tracker.set_current_path(path.clone());
                let _ = self.progress_tx.send(tracker.snapshot());
            }
            candidates.push(path);
        }

        stats.ignored_entries = ignored.load(Ordering::Relaxed);
        candidates.sort();
        Ok(candidates)
    }
}

impl Default for CorpusScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode every candidate filename in parallel, preserving input order.
pub(crate) fn decode_all(
    config: &ScanConfig,
    candidates: Vec<PathBuf>,
) -> Result<Vec<Decoded>, ScanError> {
    let decode_batch = move || -> Vec<Decoded> {
        candidates
            .into_par_iter()
            .map(|path| {
                let outcome = decode_path(&path);
                (path, outcome)
            })
            .collect()
    };

    if config.threads == 0 {
        return Ok(decode_batch());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .map_err(|e| ScanError::InvalidConfig {
            message: format!("Cannot build decode pool: {e}"),
        })?;
    Ok(pool.install(decode_batch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_corpus() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir_all(root.join("TID/1964")).unwrap();
        fs::create_dir_all(root.join("QTN/1959")).unwrap();
        fs::create_dir_all(root.join("drafts")).unwrap();

        fs::write(root.join("TID/1964/TID_1964_01_09_001_SB.jpg"), "").unwrap();
        fs::write(root.join("TID/1964/TID_1964_01_09_002_SB.jpg"), "").unwrap();
        fs::write(root.join("QTN/1959/QTN_1959_03_02_001_CU_Box4.TIF"), "").unwrap();
        fs::write(root.join("QTN/1959/notes.txt"), "not a page").unwrap();
        fs::write(root.join("drafts/TID_1964_01_10_001_SB.jpg"), "").unwrap();

        temp
    }

    #[test]
    fn test_basic_scan() {
        let temp = create_test_corpus();
        let config = ScanConfig::new(temp.path());

        let scanner = CorpusScanner::new();
        let snapshot = scanner.scan(&config).unwrap();

        assert_eq!(snapshot.index.valid_files(), 4);
        assert_eq!(snapshot.index.newspaper_count(), 2);
        assert_eq!(snapshot.stats.unsupported_files, 1);
        assert!(snapshot.stats.dirs_visited >= 5);
        assert!(snapshot.index.is_consistent());
    }

    #[test]
    fn test_ignore_patterns_prune_directories() {
        let temp = create_test_corpus();
        let config = ScanConfig::builder()
            .root(temp.path())
            .ignore_patterns(vec!["drafts".to_string()])
            .build()
            .unwrap();

        let snapshot = CorpusScanner::new().scan(&config).unwrap();

        assert_eq!(snapshot.index.valid_files(), 3);
        assert_eq!(snapshot.stats.ignored_entries, 1);
    }

    #[test]
    fn test_max_depth_limits_walk() {
        let temp = create_test_corpus();
        fs::write(temp.path().join("GDN_1970_06_15_001_LT.pdf"), "").unwrap();
        let config = ScanConfig::builder()
            .root(temp.path())
            .max_depth(Some(1u32))
            .build()
            .unwrap();

        let snapshot = CorpusScanner::new().scan(&config).unwrap();

        assert_eq!(snapshot.index.valid_files(), 1);
    }

    #[test]
    fn test_dedicated_decode_pool() {
        let temp = create_test_corpus();
        let config = ScanConfig::builder()
            .root(temp.path())
            .threads(2usize)
            .build()
            .unwrap();

        let snapshot = CorpusScanner::new().scan(&config).unwrap();

        assert_eq!(snapshot.index.valid_files(), 4);
    }

    #[test]
    fn test_progress_ends_with_done() {
        let temp = create_test_corpus();
        let scanner = CorpusScanner::new();
        let mut rx = scanner.subscribe();

        scanner.scan(&ScanConfig::new(temp.path())).unwrap();

        let mut last = None;
        while let Ok(progress) = rx.try_recv() {
            last = Some(progress);
        }
        let last = last.unwrap();
        assert_eq!(last.phase, ScanPhase::Done);
        assert_eq!(last.valid_files, 4);
        assert_eq!(last.invalid_files, 0);
    }

    #[test]
    fn test_root_must_be_a_directory() {
        let temp = create_test_corpus();
        let file = temp.path().join("TID/1964/TID_1964_01_09_001_SB.jpg");

        let err = CorpusScanner::new().scan(&ScanConfig::new(file)).unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory { .. }));

        let err = CorpusScanner::new()
            .scan(&ScanConfig::new(temp.path().join("missing")))
            .unwrap_err();
        assert!(matches!(err, ScanError::NotFound { .. }));
    }
}
