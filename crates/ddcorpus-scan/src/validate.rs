//! Batch filename validation.

use std::path::PathBuf;

use serde::Serialize;

use ddcorpus_core::{ParseFailure, ScanConfig, ScanError, ScanWarning, suggest_fix};

use crate::scanner::{CorpusScanner, Decoded, decode_all};

/// One file whose name does not follow the page convention.
#[derive(Debug, Clone, Serialize)]
pub struct InvalidEntry {
    pub path: PathBuf,
    pub failure: ParseFailure,
    /// Human-readable form of `failure`.
    pub diagnostic: String,
    /// Corrected filename, when every field could be repaired mechanically.
    pub suggestion: Option<String>,
}

/// Outcome of validating every page file under a directory.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub root: PathBuf,
    /// Files whose names decode, sorted.
    pub valid: Vec<PathBuf>,
    /// Files whose names do not, sorted by path.
    pub invalid: Vec<InvalidEntry>,
    /// Walk problems unrelated to naming.
    pub warnings: Vec<ScanWarning>,
}

impl ValidationReport {
    fn new(root: PathBuf, decoded: Vec<Decoded>, suggest: bool, warnings: Vec<ScanWarning>) -> Self {
        let mut valid = Vec::new();
        let mut invalid = Vec::new();

        for (path, outcome) in decoded {
            let failure = match outcome {
                Ok(_) => {
                    valid.push(path);
                    continue;
                }
                Err(failure) => failure,
            };
            let suggestion = if suggest {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .and_then(suggest_fix)
            } else {
                None
            };
            invalid.push(InvalidEntry {
                diagnostic: failure.to_string(),
                path,
                failure,
                suggestion,
            });
        }

        Self {
            root,
            valid,
            invalid,
            warnings,
        }
    }

    pub fn total(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }

    /// True when every page file is correctly named.
    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty()
    }

    /// Invalid entries that have a suggested correction.
    pub fn fixable(&self) -> impl Iterator<Item = &InvalidEntry> {
        self.invalid.iter().filter(|e| e.suggestion.is_some())
    }
}

/// Walk `config.root` and check every page filename.
///
/// With `suggest` set, each invalid entry carries a corrected filename when
/// one can be derived without guessing.
pub fn validate_directory(
    config: &ScanConfig,
    suggest: bool,
) -> Result<ValidationReport, ScanError> {
    let walk = CorpusScanner::new().walk(config)?;
    let decoded = decode_all(config, walk.files)?;
    let report = ValidationReport::new(walk.root_path, decoded, suggest, walk.warnings);

    for entry in &report.invalid {
        tracing::debug!(path = %entry.path.display(), diagnostic = %entry.diagnostic, "invalid filename");
    }
    tracing::info!(
        valid = report.valid.len(),
        invalid = report.invalid.len(),
        "validation complete"
    );
    Ok(report)
}
