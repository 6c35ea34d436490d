//! Postal reference directory.
//!
//! The reference source is a loosely structured text file (SQL-like dump)
//! containing 4-tuples `('CODE','CITY','DISTRICT','PROVINCE')`. The tuples
//! are extracted by pattern match, never executed. The directory is loaded
//! once per conversion and read-only afterwards.

use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// One postal-code / city / district / province entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalEntry {
    pub code: String,
    pub city: String,
    pub district: String,
    pub province: String,
}

/// Read-only postal lookup indices: by 5-digit code and by uppercased city.
///
/// BTreeMap keeps city iteration order stable across runs, which keeps the
/// whole-word city scan (and therefore the output) deterministic.
#[derive(Debug, Clone, Default)]
pub struct PostalDirectory {
    by_code: BTreeMap<String, PostalEntry>,
    by_city: BTreeMap<String, PostalEntry>,
}

impl PostalDirectory {
    /// Load the directory from a reference source path.
    ///
    /// An absent path or unreadable file yields an empty directory: the
    /// converter must still function, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return PostalDirectory::default();
        };
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                log::warn!("postal reference {} not loaded: {}", path.display(), e);
                PostalDirectory::default()
            }
        }
    }

    /// Extract all tuples from the source text. First occurrence wins on
    /// duplicate codes or cities; later duplicates are ignored.
    pub fn parse(content: &str) -> Self {
        let tuple_re =
            Regex::new(r"\('(\d{5})'\s*,\s*'([^']*)'\s*,\s*'([^']*)'\s*,\s*'([^']*)'\)")
                .expect("postal tuple pattern is valid");

        let mut by_code = BTreeMap::new();
        let mut by_city = BTreeMap::new();

        for caps in tuple_re.captures_iter(content) {
            let entry = PostalEntry {
                code: caps[1].to_string(),
                city: caps[2].trim().to_string(),
                district: caps[3].trim().to_string(),
                province: caps[4].trim().to_string(),
            };
            if entry.city.is_empty() {
                continue;
            }
            by_code.entry(entry.code.clone()).or_insert_with(|| entry.clone());
            by_city.entry(entry.city.to_uppercase()).or_insert(entry);
        }

        PostalDirectory { by_code, by_city }
    }

    /// Entry for an exact 5-digit postal code.
    pub fn by_code(&self, code: &str) -> Option<&PostalEntry> {
        self.by_code.get(code)
    }

    /// Entry for a city name, case-insensitive.
    pub fn by_city(&self, city: &str) -> Option<&PostalEntry> {
        self.by_city.get(&city.to_uppercase())
    }

    /// All known city entries, in stable (alphabetical) key order.
    pub fn cities(&self) -> impl Iterator<Item = &PostalEntry> {
        self.by_city.values()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty() && self.by_city.is_empty()
    }
}
