//! Error types for decoding, encoding and scanning.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

/// A field of the page filename convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    #[strum(to_string = "newspaper code")]
    NewspaperCode,
    #[strum(to_string = "year")]
    Year,
    #[strum(to_string = "month")]
    Month,
    #[strum(to_string = "day")]
    Day,
    #[strum(to_string = "page number")]
    Page,
    #[strum(to_string = "library code")]
    LibraryCode,
    #[strum(to_string = "shelfmark")]
    Shelfmark,
    #[strum(to_string = "extension")]
    Extension,
    /// The underscore-separated layout as a whole.
    #[strum(to_string = "layout")]
    Layout,
}

/// A filename that does not follow the page naming convention.
///
/// Each variant names the first field that broke its sub-pattern, checked
/// left to right. The `Display` output is the diagnostic shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseFailure {
    /// No `.ext` suffix at all.
    #[error("Missing file extension")]
    MissingExtension,

    /// Extension outside the image/document whitelist.
    #[error("Unsupported extension '.{ext}' (expected jpg, jpeg, png, tif, tiff or pdf)")]
    UnsupportedExtension { ext: String },

    /// Fewer than the six mandatory underscore-separated parts.
    #[error("Too few parts (expected at least 6, got {found})")]
    TooFewParts { found: usize },

    #[error("Invalid newspaper code '{value}' (must be 3 uppercase letters)")]
    NewspaperCode { value: String },

    #[error("Invalid year '{value}' (must be 4 digits)")]
    Year { value: String },

    #[error("Invalid month '{value}' (must be 2 digits, 01-12)")]
    Month { value: String },

    #[error("Invalid day '{value}' (must be 2 digits, 01-31)")]
    Day { value: String },

    #[error("Invalid page number '{value}' (must be 3 digits, 001-999)")]
    Page { value: String },

    #[error("Invalid library code '{value}' (must be 2 uppercase letters)")]
    LibraryCode { value: String },

    /// A trailing underscore after the library code with nothing behind it.
    #[error("Empty shelfmark after trailing underscore")]
    EmptyShelfmark,
}

impl ParseFailure {
    /// The field this failure is about.
    pub fn field(&self) -> Field {
        match self {
            Self::MissingExtension | Self::UnsupportedExtension { .. } => Field::Extension,
            Self::TooFewParts { .. } => Field::Layout,
            Self::NewspaperCode { .. } => Field::NewspaperCode,
            Self::Year { .. } => Field::Year,
            Self::Month { .. } => Field::Month,
            Self::Day { .. } => Field::Day,
            Self::Page { .. } => Field::Page,
            Self::LibraryCode { .. } => Field::LibraryCode,
            Self::EmptyShelfmark => Field::Shelfmark,
        }
    }
}

/// A field value that cannot be written into a filename.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {field}: {message}")]
pub struct InvalidField {
    pub field: Field,
    pub message: String,
}

impl InvalidField {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// A string that is not a `YYYY-MM-DD` issue date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid issue date '{0}' (expected YYYY-MM-DD)")]
pub struct InvalidIssueDate(pub String);

/// Errors that abort a scan or validation run.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Error reading a directory entry.
    ReadError,
    /// Error reading metadata.
    MetadataError,
    /// File name is not valid UTF-8 and cannot be decoded.
    NonUtf8Name,
}

/// Non-fatal problem met while walking the corpus.
///
/// Filenames that fail to decode are not warnings; they are recorded on the
/// index as invalid files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a warning for a file name that is not valid UTF-8.
    pub fn non_utf8_name(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("File name is not valid UTF-8: {}", path.display()),
            path,
            kind: WarningKind::NonUtf8Name,
        }
    }
}

/// Errors loading external reference tables.
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("Cannot read reference tables {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid reference tables: {0}")]
    Parse(#[from] toml::de::Error),
}
