//! Page records and the typed keys they are indexed under.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::{Field, InvalidField, InvalidIssueDate};

macro_rules! letter_code {
    ($(#[$meta:meta])* $name:ident, $len:literal, $field:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(CompactString);

        impl $name {
            /// Number of letters in a well-formed code.
            pub const LEN: usize = $len;

            /// Create a code, rejecting anything but exactly
            #[doc = concat!(stringify!($len), " ASCII uppercase letters.")]
            pub fn new(code: &str) -> Result<Self, InvalidField> {
                if code.len() == $len && code.bytes().all(|b| b.is_ascii_uppercase()) {
                    Ok(Self(CompactString::new(code)))
                } else {
                    Err(InvalidField::new(
                        $field,
                        format!("'{code}' is not {} uppercase letters", $len),
                    ))
                }
            }

            /// The code as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = InvalidField;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = InvalidField;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(&value)
            }
        }

        impl From<$name> for String {
            fn from(code: $name) -> Self {
                code.0.into()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

letter_code!(
    /// Three-letter publication code, e.g. `TID`.
    NewspaperCode,
    3,
    Field::NewspaperCode
);

letter_code!(
    /// Two-letter holding library code, e.g. `SB`.
    LibraryCode,
    2,
    Field::LibraryCode
);

/// Publication date exactly as written in a filename.
///
/// No calendar validation happens here: `1964-02-30` is a perfectly good
/// issue date key. Field order makes the derived ordering identical to the
/// ordering of the `YYYY-MM-DD` strings. Use [`IssueDate::to_naive`] for any
/// day arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IssueDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl IssueDate {
    pub fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// The real calendar date, or `None` for dates like February 30th.
    pub fn to_naive(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(i32::from(self.year), u32::from(self.month), u32::from(self.day))
    }
}

impl From<NaiveDate> for IssueDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year().clamp(0, 9999) as u16,
            month: date.month() as u8,
            day: date.day() as u8,
        }
    }
}

impl fmt::Display for IssueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for IssueDate {
    type Err = InvalidIssueDate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidIssueDate(s.to_string());
        if !s.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
            return Err(invalid());
        }
        let mut parts = s.split('-');
        let (Some(year), Some(month), Some(day), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        if year.len() != 4 || month.len() != 2 || day.len() != 2 {
            return Err(invalid());
        }
        let date = Self {
            year: year.parse().map_err(|_| invalid())?,
            month: month.parse().map_err(|_| invalid())?,
            day: day.parse().map_err(|_| invalid())?,
        };
        if (1..=12).contains(&date.month) && (1..=31).contains(&date.day) {
            Ok(date)
        } else {
            Err(invalid())
        }
    }
}

impl TryFrom<String> for IssueDate {
    type Error = InvalidIssueDate;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IssueDate> for String {
    fn from(date: IssueDate) -> Self {
        date.to_string()
    }
}

/// File extensions a page image may carry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ImageExtension {
    Jpg,
    Jpeg,
    Png,
    Tif,
    Tiff,
    Pdf,
}

/// Key of one issue: all pages of one newspaper on one date.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IssueKey {
    pub newspaper: NewspaperCode,
    pub date: IssueDate,
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.newspaper, self.date)
    }
}

/// One physical page image, as described by its filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub newspaper: NewspaperCode,
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub page: u16,
    pub library: LibraryCode,
    /// Free-text archival locator; never `Some("")`.
    pub shelfmark: Option<CompactString>,
    pub extension: ImageExtension,
}

impl PageRecord {
    /// Create a record. An empty shelfmark is stored as absent.
    pub fn new(
        newspaper: NewspaperCode,
        date: IssueDate,
        page: u16,
        library: LibraryCode,
        shelfmark: Option<&str>,
        extension: ImageExtension,
    ) -> Self {
        Self {
            newspaper,
            year: date.year,
            month: date.month,
            day: date.day,
            page,
            library,
            shelfmark: shelfmark.filter(|s| !s.is_empty()).map(CompactString::new),
            extension,
        }
    }

    /// Publication date of the issue this page belongs to.
    pub fn issue_date(&self) -> IssueDate {
        IssueDate::new(self.year, self.month, self.day)
    }

    /// Key of the issue this page belongs to.
    pub fn issue_key(&self) -> IssueKey {
        IssueKey {
            newspaper: self.newspaper.clone(),
            date: self.issue_date(),
        }
    }

    /// Canonical filename for this record.
    pub fn filename(&self) -> Result<String, InvalidField> {
        crate::codec::encode(self)
    }
}
