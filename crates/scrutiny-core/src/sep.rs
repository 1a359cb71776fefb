//! Composite rule identifier parsing.
//!
//! Column and cell packs name their result columns `rule<sep>variable`. The
//! separator is a regex; the default tolerates naming conventions that pad the
//! marker with extra punctuation when composing names (`sum_rules..vs`,
//! `rules._.mpg` and plain `rules._.mpg` all split the same way).

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::ExposeError;

/// Marker string used when composing rule/variable names.
pub const RULE_MARKER: &str = "._.";

lazy_static! {
    static ref DEFAULT_PATTERN: Regex =
        Regex::new(r"[^[:alnum:]]*\._\.[^[:alnum:]]*").unwrap();
}

/// A separator pattern splitting composite column names into (rule, variable).
#[derive(Debug, Clone)]
pub struct RuleSep {
    pattern: Regex,
}

impl Default for RuleSep {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.clone(),
        }
    }
}

impl RuleSep {
    /// A separator from an arbitrary regex pattern.
    pub fn pattern(pattern: &str) -> Result<Self, ExposeError> {
        let compiled = Regex::new(pattern).map_err(|e| ExposeError::InvalidSeparator {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { pattern: compiled })
    }

    /// A separator matching a literal marker padded by any run of
    /// non-alphanumeric characters on either side.
    pub fn marker(marker: &str) -> Self {
        let pattern = format!("[^[:alnum:]]*{}[^[:alnum:]]*", regex::escape(marker));
        Self {
            // An escaped literal with fixed padding always compiles.
            pattern: Regex::new(&pattern).expect("escaped marker pattern"),
        }
    }

    /// Split a composite name at the leftmost separator match.
    ///
    /// Returns `None` when the pattern does not match, or when the match
    /// leaves an empty rule or variable part; such names are plain rule names.
    pub fn split<'a>(&self, name: &'a str) -> Option<(&'a str, &'a str)> {
        let m = self.pattern.find(name)?;
        if m.start() == 0 || m.end() == name.len() {
            return None;
        }
        Some((&name[..m.start()], &name[m.end()..]))
    }

    pub fn is_composite(&self, name: &str) -> bool {
        self.split(name).is_some()
    }
}

/// Compose a rule and a variable name with the default marker.
pub fn compose_name(rule: &str, variable: &str) -> String {
    format!("{}{}{}", rule, RULE_MARKER, variable)
}
