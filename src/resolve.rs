//! Multi-stage postal-code and city resolution.
//!
//! Resolution runs an ordered, short-circuiting chain of stages against the
//! postal reference directory, ending at a fixed default. Each stage either
//! yields a resolved address or passes to the next; rejected and ambiguous
//! candidates are noted for the append-only audit trail.

use crate::postal::{PostalDirectory, PostalEntry};
use crate::types::Address;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Fixed fallback used when no stage resolves.
pub const DEFAULT_CITY: &str = "Colombo 01";
pub const DEFAULT_POSTAL_CODE: &str = "00100";
pub const DEFAULT_PROVINCE: &str = "Western";
pub const DEFAULT_DISTRICT: &str = "Colombo";

/// City-name substrings that disqualify a candidate from name-based
/// inference (stages 2 and 3). A direct code hit (stage 1) is considered
/// authoritative and is accepted even for these names, audit-logged only.
const DISQUALIFIERS: [&str; 8] = [
    "NEW TOWN", "NEWTOWN", "ESTATE", "GARDEN", "COLONY", "WATTA", "WATHTHA", "VILLAGE",
];

const MAX_PROVINCE_LEN: usize = 40;
pub(crate) const MAX_DISTRICT_LEN: usize = 60;

/// Outcome of resolving one record's address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub address: Address,
    /// True when the fixed default was applied.
    pub default_used: bool,
    /// Rejected/ambiguous candidates and other audit-worthy decisions.
    pub notes: Vec<String>,
}

/// Resolves addresses against a loaded postal directory.
pub struct AddressResolver<'a> {
    directory: &'a PostalDirectory,
}

struct StageHit {
    city: String,
    postal_code: String,
    province: String,
    district: String,
    cleaned_line: String,
}

impl StageHit {
    fn from_entry(entry: &PostalEntry, cleaned_line: String) -> Self {
        StageHit {
            city: entry.city.clone(),
            postal_code: entry.code.clone(),
            province: entry.province.clone(),
            district: entry.district.clone(),
            cleaned_line,
        }
    }
}

impl<'a> AddressResolver<'a> {
    pub fn new(directory: &'a PostalDirectory) -> Self {
        AddressResolver { directory }
    }

    /// Resolve an address from the raw address line, an inline postal token
    /// found while scanning all record fields, and the separate city field.
    pub fn resolve(
        &self,
        address_line: &str,
        inline_postal: Option<&str>,
        city_field: Option<&str>,
    ) -> Resolution {
        let mut notes = Vec::new();

        let hit = self
            .direct_code_match(address_line, inline_postal, &mut notes)
            .or_else(|| self.preceding_word_match(address_line, &mut notes))
            .or_else(|| self.whole_word_city_scan(address_line, &mut notes))
            .or_else(|| self.city_field_fallback(address_line, city_field));

        match hit {
            Some(hit) => Resolution {
                address: Address {
                    city: hit.city,
                    postal_code: hit.postal_code,
                    province: sanitize_region(&hit.province, MAX_PROVINCE_LEN),
                    district: sanitize_region(&hit.district, MAX_DISTRICT_LEN),
                    address_line: hit.cleaned_line,
                },
                default_used: false,
                notes,
            },
            None => {
                notes.push("no postal resolution; fixed default applied".to_string());
                Resolution {
                    address: Address {
                        city: DEFAULT_CITY.to_string(),
                        postal_code: DEFAULT_POSTAL_CODE.to_string(),
                        province: DEFAULT_PROVINCE.to_string(),
                        district: DEFAULT_DISTRICT.to_string(),
                        address_line: collapse_whitespace(address_line),
                    },
                    default_used: true,
                    notes,
                }
            }
        }
    }

    /// Stage 1: a 5-digit token in the address line (or, failing that, the
    /// inline postal token) present in the by-code index.
    fn direct_code_match(
        &self,
        address_line: &str,
        inline_postal: Option<&str>,
        notes: &mut Vec<String>,
    ) -> Option<StageHit> {
        if let Some(code) = five_digit_token(address_line) {
            if let Some(entry) = self.directory.by_code(code) {
                if is_disqualified(&entry.city) {
                    notes.push(format!(
                        "postal code {} maps to disqualified city name '{}'; direct match accepted",
                        code, entry.city
                    ));
                }
                let cleaned = strip_token(address_line, code);
                return Some(StageHit::from_entry(entry, cleaned));
            }
            // A code was found but is unknown; stage 2 owns that case.
            return None;
        }

        if let Some(code) = inline_postal {
            if let Some(entry) = self.directory.by_code(code) {
                if is_disqualified(&entry.city) {
                    notes.push(format!(
                        "postal code {} maps to disqualified city name '{}'; direct match accepted",
                        code, entry.city
                    ));
                }
                return Some(StageHit::from_entry(entry, collapse_whitespace(address_line)));
            }
        }

        None
    }

    /// Stage 2: the address line holds an unknown 5-digit code; try the
    /// single word immediately preceding it as a city name.
    fn preceding_word_match(
        &self,
        address_line: &str,
        notes: &mut Vec<String>,
    ) -> Option<StageHit> {
        let code = five_digit_token(address_line)?;
        if self.directory.by_code(code).is_some() {
            return None;
        }

        let tokens: Vec<&str> = address_line.split_whitespace().collect();
        let code_index = tokens.iter().position(|t| *t == code)?;
        if code_index == 0 {
            notes.push(format!("postal code {} not in reference; no preceding word", code));
            return None;
        }

        let word = tokens[code_index - 1].trim_matches(|c: char| !c.is_alphanumeric());
        match self.directory.by_city(word) {
            Some(entry) if is_disqualified(&entry.city) => {
                notes.push(format!(
                    "city candidate '{}' before unknown code {} rejected (disqualified name)",
                    entry.city, code
                ));
                None
            }
            Some(entry) => {
                let cleaned = strip_token(&strip_token(address_line, code), word);
                Some(StageHit::from_entry(entry, cleaned))
            }
            None => {
                notes.push(format!(
                    "postal code {} not in reference; preceding word '{}' is not a known city",
                    code, word
                ));
                None
            }
        }
    }

    /// Stage 3: whole-word scan of every known city name against the line.
    fn whole_word_city_scan(
        &self,
        address_line: &str,
        notes: &mut Vec<String>,
    ) -> Option<StageHit> {
        for entry in self.directory.cities() {
            if find_whole_word(address_line, &entry.city).is_none() {
                continue;
            }
            if is_disqualified(&entry.city) {
                notes.push(format!(
                    "city candidate '{}' in address line rejected (disqualified name)",
                    entry.city
                ));
                continue;
            }
            let cleaned = strip_token(address_line, &entry.city);
            return Some(StageHit::from_entry(entry, cleaned));
        }
        None
    }

    /// Stage 4: the separate city field, when it is itself a known city.
    fn city_field_fallback(
        &self,
        address_line: &str,
        city_field: Option<&str>,
    ) -> Option<StageHit> {
        let entry = self.directory.by_city(city_field?)?;
        Some(StageHit::from_entry(entry, collapse_whitespace(address_line)))
    }
}

fn is_disqualified(city: &str) -> bool {
    let up = city.to_ascii_uppercase();
    DISQUALIFIERS.iter().any(|d| up.contains(d))
}

/// Province/district values that look like captured address text (digits or
/// over-length) are discarded.
pub(crate) fn sanitize_region(value: &str, max_len: usize) -> String {
    if value.chars().any(|c| c.is_ascii_digit()) || value.chars().count() > max_len {
        String::new()
    } else {
        value.to_string()
    }
}

/// First all-digit 5-character whitespace-delimited token.
fn five_digit_token(line: &str) -> Option<&str> {
    line.split_whitespace()
        .find(|t| t.len() == 5 && t.chars().all(|c| c.is_ascii_digit()))
}

/// Case-insensitive whole-word search; returns the byte offset of the match.
fn find_whole_word(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    let hay = haystack.to_ascii_uppercase();
    let needle = needle.to_ascii_uppercase();

    let mut search_from = 0;
    while let Some(rel) = hay[search_from..].find(&needle) {
        let start = search_from + rel;
        let end = start + needle.len();
        let before_ok = hay[..start].chars().next_back().is_none_or(|c| !c.is_alphanumeric());
        let after_ok = hay[end..].chars().next().is_none_or(|c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return Some(start);
        }
        search_from = start + 1;
    }
    None
}

/// Remove the first whole-word occurrence of `token` and tidy spacing.
fn strip_token(line: &str, token: &str) -> String {
    match find_whole_word(line, token) {
        Some(start) => {
            let mut residual = String::with_capacity(line.len());
            residual.push_str(&line[..start]);
            residual.push(' ');
            residual.push_str(&line[start + token.len()..]);
            collapse_whitespace(&residual)
        }
        None => collapse_whitespace(line),
    }
}

fn collapse_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Append-only side-channel log of address-resolution decisions.
///
/// Opened per write and closed immediately; write failures are swallowed.
/// Logging is best-effort and never affects the conversion outcome.
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    path: Option<PathBuf>,
}

impl AuditLog {
    pub fn new(path: Option<PathBuf>) -> Self {
        AuditLog { path }
    }

    pub fn disabled() -> Self {
        AuditLog { path: None }
    }

    /// Append one line; errors only produce a warning.
    pub fn record(&self, line: &str) {
        let Some(ref path) = self.path else { return };
        let outcome = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .and_then(|mut f| writeln!(f, "{}", line));
        if let Err(e) = outcome {
            log::warn!("audit log write to {} failed: {}", path.display(), e);
        }
    }

    /// Per-record resolution summary plus any rejected/ambiguous candidates.
    pub fn record_resolution(&self, entity_code: &str, resolution: &Resolution) {
        self.record(&format!(
            "{} default_used={} city={} postal={} address={}",
            entity_code,
            resolution.default_used,
            resolution.address.city,
            resolution.address.postal_code,
            resolution.address.address_line,
        ));
        for note in &resolution.notes {
            self.record(&format!("{} note: {}", entity_code, note));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn directory() -> PostalDirectory {
        PostalDirectory::parse(
            "('00100','Colombo 01','Colombo','Western'),\
             ('20000','Kandy','Kandy','Central'),\
             ('81000','Galle','Galle','Southern'),\
             ('11320','Bandara Koswatta','Gampaha','Western'),\
             ('50404','Pita Kanda Village','Kandy','Central')",
        )
    }

    #[test]
    fn test_direct_code_match_adopts_and_strips() {
        let dir = directory();
        let resolver = AddressResolver::new(&dir);
        let r = resolver.resolve("NO 10 TEMPLE ROAD 20000", None, None);
        assert_eq!(r.address.city, "Kandy");
        assert_eq!(r.address.postal_code, "20000");
        assert_eq!(r.address.district, "Kandy");
        assert_eq!(r.address.province, "Central");
        assert_eq!(r.address.address_line, "NO 10 TEMPLE ROAD");
        assert!(!r.default_used);
    }

    #[test]
    fn test_direct_code_match_accepts_disqualified_city_with_note() {
        let dir = directory();
        let resolver = AddressResolver::new(&dir);
        let r = resolver.resolve("MAIN ST 50404", None, None);
        assert_eq!(r.address.city, "Pita Kanda Village");
        assert!(!r.default_used);
        assert!(r.notes.iter().any(|n| n.contains("disqualified")));
    }

    #[test]
    fn test_preceding_word_heuristic_on_unknown_code() {
        let dir = directory();
        let resolver = AddressResolver::new(&dir);
        let r = resolver.resolve("22 LAKE VIEW GALLE 99999", None, None);
        assert_eq!(r.address.city, "Galle");
        assert_eq!(r.address.postal_code, "81000");
        assert_eq!(r.address.address_line, "22 LAKE VIEW");
    }

    #[test]
    fn test_preceding_word_miss_is_noted_and_falls_through() {
        let dir = directory();
        let resolver = AddressResolver::new(&dir);
        let r = resolver.resolve("77 NOWHERE 99999", None, None);
        assert!(r.default_used);
        assert!(r.notes.iter().any(|n| n.contains("not a known city")));
    }

    #[test]
    fn test_whole_word_city_scan_rejects_substrings() {
        let dir = directory();
        let resolver = AddressResolver::new(&dir);
        // "GALLERY" must not match the city "Galle"
        let r = resolver.resolve("THE GALLERY BUILDING", None, None);
        assert!(r.default_used);
    }

    #[test]
    fn test_whole_word_city_scan_matches_multiword_city() {
        let dir = directory();
        let resolver = AddressResolver::new(&dir);
        let r = resolver.resolve("NO 5 BANDARA KOSWATTA ROAD", None, None);
        assert_eq!(r.address.city, "Bandara Koswatta");
        assert_eq!(r.address.address_line, "NO 5 ROAD");
    }

    #[test]
    fn test_city_scan_skips_disqualified_names() {
        let dir = directory();
        let resolver = AddressResolver::new(&dir);
        let r = resolver.resolve("NEAR PITA KANDA VILLAGE JUNCTION", None, None);
        assert!(r.default_used);
        assert!(r.notes.iter().any(|n| n.contains("rejected")));
    }

    #[test]
    fn test_city_field_fallback() {
        let dir = directory();
        let resolver = AddressResolver::new(&dir);
        let r = resolver.resolve("SOME UNMATCHED TEXT", None, Some("kandy"));
        assert_eq!(r.address.city, "Kandy");
        assert_eq!(r.address.postal_code, "20000");
        assert!(!r.default_used);
    }

    #[test]
    fn test_inline_postal_token_used_when_line_has_no_code() {
        let dir = directory();
        let resolver = AddressResolver::new(&dir);
        let r = resolver.resolve("12 FLOWER ROAD", Some("81000"), None);
        assert_eq!(r.address.city, "Galle");
        assert_eq!(r.address.address_line, "12 FLOWER ROAD");
    }

    #[test]
    fn test_empty_directory_falls_back_to_default() {
        let dir = PostalDirectory::default();
        let resolver = AddressResolver::new(&dir);
        let r = resolver.resolve("ANY ADDRESS 00100", Some("00100"), Some("Colombo 01"));
        assert_eq!(r.address.city, "Colombo 01");
        assert_eq!(r.address.postal_code, "00100");
        assert_eq!(r.address.province, "Western");
        assert_eq!(r.address.district, "Colombo");
        assert!(r.default_used);
    }

    #[test]
    fn test_region_sanitization() {
        assert_eq!(sanitize_region("Western", 40), "Western");
        assert_eq!(sanitize_region("Western 7", 40), "");
        assert_eq!(sanitize_region(&"X".repeat(41), 40), "");
    }
}
