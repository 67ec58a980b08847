// C identifiers derived from capture file names

use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

lazy_static::lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"\W").unwrap();
    static ref LEADING_DIGIT: Regex = Regex::new(r"^\d").unwrap();
}

/// Symbol used when a file stem sanitizes to nothing
pub const FALLBACK_SYMBOL: &str = "capture";

/// Replace every non-word character with `_` and prefix a leading digit with `_`
pub fn sanitize_identifier(name: &str) -> String {
    let ident = NON_WORD.replace_all(name, "_");
    if LEADING_DIGIT.is_match(&ident) {
        format!("_{}", ident)
    } else {
        ident.into_owned()
    }
}

/// A sanitized identifier naming a generated array
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SymbolName(String);

impl SymbolName {
    /// Sanitize an arbitrary name into a symbol
    pub fn sanitize(name: &str) -> Self {
        Self(sanitize_identifier(name))
    }

    /// Derive a symbol from the stem of a file path (`dir/Gate 1.sub` -> `Gate_1`)
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let stem = path
            .as_ref()
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();
        let symbol = Self::sanitize(&stem);
        if symbol.0.is_empty() {
            Self(FALLBACK_SYMBOL.to_string())
        } else {
            symbol
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Include guard token (`NAME_H`)
    pub fn guard(&self) -> String {
        format!("{}_H", self.0.to_uppercase())
    }

    /// Name of the element-count constant (`nameCount`)
    pub fn count_constant(&self) -> String {
        format!("{}Count", self.0)
    }

    /// Output file name (`name.h`)
    pub fn header_file_name(&self) -> String {
        format!("{}.h", self.0)
    }

    fn with_suffix(&self, n: usize) -> Self {
        Self(format!("{}_{}", self.0, n))
    }
}

impl fmt::Display for SymbolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SymbolName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Tracks symbols already handed out during a batch
#[derive(Debug, Default)]
pub struct SymbolRegistry {
    used: HashSet<SymbolName>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `base`, or the first free `base_2`, `base_3`, ...
    pub fn claim(&mut self, base: SymbolName) -> SymbolName {
        let mut candidate = base.clone();
        let mut n = 2;
        while self.used.contains(&candidate) {
            candidate = base.with_suffix(n);
            n += 1;
        }
        self.used.insert(candidate.clone());
        candidate
    }
}
