//! Error types for the exposure engine.

use thiserror::Error;

use crate::exposure::BreakerCount;

/// Fatal configuration errors for an `expose` call.
///
/// These abort the whole call: no per-pack isolation is possible before the
/// engine has a usable separator, a classification strategy, and a consistent
/// row-key state.
#[derive(Debug, Error)]
pub enum ExposeError {
    /// The caller-supplied separator pattern does not compile.
    #[error("invalid rule separator pattern '{pattern}': {message}")]
    InvalidSeparator { pattern: String, message: String },

    /// A pack has no declared type and guessing is disabled.
    #[error("cannot classify pack '{pack}': no declared type and guessing is disabled")]
    AmbiguousPackType { pack: String },

    /// The dataset's row-identity state disagrees with a prior exposure call.
    #[error("row keys from a prior exposure cover {expected} rows, but the dataset has {actual}")]
    KeyConflict { expected: usize, actual: usize },
}

/// A failure captured while running or normalizing a single pack.
///
/// Never propagated out of `expose`: the failure is recorded on the pack's
/// info row and the run continues with the remaining packs.
#[derive(Debug, Error)]
pub enum PackFailure {
    /// The pack body itself returned an error.
    #[error("pack execution failed: {0}")]
    Execution(String),

    /// A rule column carried values that are not booleans.
    #[error("rule '{rule}' produced a non-logical result: {detail}")]
    NonLogicalRuleResult { rule: String, detail: String },

    /// The raw result does not have the structure its pack type requires.
    #[error("result shape does not match pack type: {detail}")]
    ShapeMismatch { detail: String },
}

/// Dataset construction errors.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Two columns share a name.
    #[error("duplicate column name '{name}'")]
    DuplicateColumn { name: String },

    /// A column's length disagrees with the frame's row count.
    #[error("column '{name}' has {actual} values, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// A named column does not exist.
    #[error("no column named '{name}'")]
    UnknownColumn { name: String },
}

/// An exposure accessor was called on a dataset with no attached exposure.
#[derive(Debug, Error)]
#[error("no exposure attached to dataset")]
pub struct NoExposure;

/// Raised by `assert_any_breaker` when the report contains rule violations.
///
/// Carries the offending subset as per-(pack, rule) breaker counts so callers
/// can branch on the structure rather than parse the message.
#[derive(Debug, Error)]
pub struct RuleViolation {
    pub breakers: Vec<BreakerCount>,
}

impl RuleViolation {
    pub fn new(breakers: Vec<BreakerCount>) -> Self {
        Self { breakers }
    }

    /// Total number of breaker rows across all packs.
    pub fn total(&self) -> usize {
        self.breakers.iter().map(|b| b.count).sum()
    }
}

impl std::fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rule violations detected ({} breakers):", self.total())?;
        for b in &self.breakers {
            write!(f, " [{} / {}: {}]", b.pack, b.rule, b.count)?;
        }
        Ok(())
    }
}
