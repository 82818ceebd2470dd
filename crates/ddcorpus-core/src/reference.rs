//! Static reference tables: display names and metadata keyed by code.
//!
//! The built-in tables describe the Divergent Discourses corpus. Other
//! collections supply their own through a TOML file:
//!
//! ```toml
//! [newspapers.TID]
//! name = "Tibet Daily"
//! region = "PRC"
//! publisher = "State"
//! type = "General"
//! level = "Provincial"
//! province = "TAR"
//!
//! [libraries]
//! SB = "Staatsbibliothek zu Berlin"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReferenceError;
use crate::record::{LibraryCode, NewspaperCode};

/// Descriptive metadata for one newspaper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewspaperMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Administrative level of the publisher (county, prefectural, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
}

/// Reference entry for one newspaper code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewspaperInfo {
    pub name: String,
    #[serde(flatten)]
    pub metadata: NewspaperMetadata,
}

/// Code-to-name lookup tables consumed read-only by reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTables {
    #[serde(default)]
    pub newspapers: BTreeMap<String, NewspaperInfo>,
    #[serde(default)]
    pub libraries: BTreeMap<String, String>,
}

impl ReferenceTables {
    /// Tables with no entries; every code renders as unknown.
    pub fn empty() -> Self {
        Self {
            newspapers: BTreeMap::new(),
            libraries: BTreeMap::new(),
        }
    }

    /// Parse tables from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ReferenceError> {
        Ok(toml::from_str(text)?)
    }

    /// Load tables from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReferenceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ReferenceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Display name of a newspaper, `Unknown (XYZ)` if not listed.
    pub fn newspaper_name(&self, code: &NewspaperCode) -> String {
        self.newspapers
            .get(code.as_str())
            .map(|info| info.name.clone())
            .unwrap_or_else(|| format!("Unknown ({code})"))
    }

    pub fn newspaper_metadata(&self, code: &NewspaperCode) -> Option<&NewspaperMetadata> {
        self.newspapers.get(code.as_str()).map(|info| &info.metadata)
    }

    /// Display name of a library, the bare code if not listed.
    pub fn library_name<'a>(&'a self, code: &'a LibraryCode) -> &'a str {
        self.libraries
            .get(code.as_str())
            .map(String::as_str)
            .unwrap_or(code.as_str())
    }
}

impl Default for ReferenceTables {
    fn default() -> Self {
        let newspapers = BUILTIN_NEWSPAPERS
            .iter()
            .map(|&(code, name, region, publisher, kind, level, province)| {
                let info = NewspaperInfo {
                    name: name.to_string(),
                    metadata: NewspaperMetadata {
                        region: Some(region.to_string()),
                        publisher: Some(publisher.to_string()),
                        kind: Some(kind.to_string()),
                        level: level.map(str::to_string),
                        province: province.map(str::to_string),
                    },
                };
                (code.to_string(), info)
            })
            .collect();
        let libraries = BUILTIN_LIBRARIES
            .iter()
            .map(|&(code, name)| (code.to_string(), name.to_string()))
            .collect();
        Self {
            newspapers,
            libraries,
        }
    }
}

type NewspaperRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    Option<&'static str>,
    Option<&'static str>,
);

// code, name, region, publisher, type, level, province
const BUILTIN_NEWSPAPERS: &[NewspaperRow] = &[
    ("CWN", "Central Weekly News (krung dbyang gsar 'gyur)", "India", "KMT", "Political", None, None),
    ("DTF", "Defend Tibet's Freedom (rang dbang srung skyob gsar shog)", "India", "CTA", "Political", None, None),
    ("FRD", "Freedom (rang dbang gsar shog)", "India", "CTA", "General", None, None),
    ("GDN", "Ganze Daily (dkar mdzes nyin re'i gsar 'gyur)", "PRC", "State", "General", Some("Prefectural"), Some("Sichuan")),
    ("GOT", "Understanding (go rtogs)", "Nepal", "Guerrilla", "Military", None, None),
    ("GTN", "Gyantse News (rgyal rtse gsar 'gyur)", "PRC", "State", "General", Some("County"), Some("TAR")),
    ("KDN", "Kangding News (dar mdo'i gsar 'gyur)", "PRC", "State", "General", Some("Prefectural"), Some("Xikang/Sichuan")),
    ("MJN", "Minjiang News (min kyang tshags dpar)", "PRC", "State", "General", Some("Prefectural"), Some("Sichuan")),
    ("NIB", "News in Brief (gsar 'gyur mdor bsdus)", "PRC", "State", "General", Some("Provincial"), Some("TAR")),
    ("QTN", "Qinghai Tibetan News (mtsho sngon bod yig gsar 'gyur)", "PRC", "State", "General", Some("Provincial"), Some("Qinghai")),
    ("SGN", "South Gansu News (kan lho gsar 'gyur)", "PRC", "State", "General", Some("Prefectural"), Some("Gansu")),
    ("TDP", "Tibet Daily Pictorial (bod ljongs nyin re'i gsar 'gyur par ris)", "PRC", "State", "Pictorial", Some("Provincial"), Some("TAR")),
    ("TID", "Tibet Daily (bod ljongs nyin re'i gsar 'gyur)", "PRC", "State", "General", Some("Provincial"), Some("TAR")),
    ("TIF", "Tibetan Freedom (bod mi'i rang dbang)", "India", "CTA", "General", None, None),
    ("TIM", "Tibet Mirror (yul phyog so so'i gsar 'gyur me long)", "India", "Independent", "General", None, None),
    ("XNX", "South-West Institute for Nationalities (lho nub mi rigs slob grwa chen po)", "PRC", "Educational", "Institutional", Some("Institutional"), None),
    ("ZYX", "Central Institute for Nationalities (krung dbyang mi rigs slob grwa)", "PRC", "Educational", "Institutional", Some("Institutional"), None),
];

const BUILTIN_LIBRARIES: &[(&str, &str)] = &[
    ("BD", "Bodleian Library, Oxford"),
    ("BL", "British Library, London"),
    ("CF", "Collège de France, Paris"),
    ("CU", "Columbia University, New York"),
    ("IT", "University of Vienna"),
    ("LT", "Library of Tibetan Works and Archives"),
    ("MV", "Grassi Museum für Völkerkunde, Leipzig"),
    ("NC", "National Chengchi University, Taipei"),
    ("OI", "Oriental Institute, Prague"),
    ("RB", "Private Collection (Robbie Barnett)"),
    ("SB", "Staatsbibliothek zu Berlin"),
    ("TL", "LTWA, Dharamshala"),
    ("TM", "Tibet Museum"),
    ("TS", "Private Collection (Tenzin Sonam)"),
    ("UW", "University of Washington"),
];
