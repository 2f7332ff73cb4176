//! Nine-character site identifier index
//!
//! Maps a lowercase 4-character site code to its canonical 9-character
//! identifier (marker + monument/receiver number + ISO country code),
//! built once per run from an M3G-style site list and immutable afterward.

use crate::constants::SITE_CODE_LEN;
use crate::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// Immutable 4-char to 9-char site identifier lookup table
#[derive(Debug, Clone, Default)]
pub struct NineCharIndex {
    entries: HashMap<String, String>,
}

impl NineCharIndex {
    /// Load the index from a site list file, one site per line.
    ///
    /// An unreadable file is fatal to the run.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("The nine-char site list is not readable: {}", path.display()),
                e,
            )
        })?;
        Ok(Self::from_lines(content.lines()))
    }

    /// Build the index from raw lines.
    ///
    /// The first four characters of each line, lower-cased, form the key;
    /// the trimmed full line is the value. The last occurrence of a
    /// duplicate key wins, with a warning.
    pub fn from_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut entries = HashMap::new();

        for line in lines {
            let trimmed = line.trim();
            if trimmed.len() < SITE_CODE_LEN {
                continue;
            }

            let Some(code) = trimmed.get(..SITE_CODE_LEN) else {
                continue;
            };
            let key = code.to_lowercase();
            if let Some(previous) = entries.insert(key.clone(), trimmed.to_string()) {
                warn!(
                    "Duplicate site code '{}' in nine-char list; keeping '{}' over '{}'",
                    key, trimmed, previous
                );
            }
        }

        Self { entries }
    }

    /// Look up the 9-character identifier for a 4-character site code
    /// (case-insensitive).
    pub fn lookup(&self, four_char: &str) -> Option<&str> {
        self.entries
            .get(&four_char.to_lowercase())
            .map(String::as_str)
    }

    /// Number of indexed sites
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no site at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_case_insensitive() {
        let index = NineCharIndex::from_lines(["ABMF00GLP", "agal00fra  "]);
        assert_eq!(index.lookup("abmf"), Some("ABMF00GLP"));
        assert_eq!(index.lookup("ABMF"), Some("ABMF00GLP"));
        assert_eq!(index.lookup("AgAl"), Some("agal00fra"));
        assert_eq!(index.lookup("zzzz"), None);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_duplicate_last_wins() {
        let index = NineCharIndex::from_lines(["ABMF00GLP", "ABMF00XXX"]);
        assert_eq!(index.lookup("abmf"), Some("ABMF00XXX"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_short_lines_skipped() {
        let index = NineCharIndex::from_lines(["AB", "", "   ", "ABMF00GLP"]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        let result = NineCharIndex::load(Path::new("/nonexistent/ninechar.list"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
