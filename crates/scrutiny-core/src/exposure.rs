//! The canonical validation report and its per-pack metadata.
//!
//! An [`Exposure`] bundles one row of metadata per executed pack with the
//! flattened report of rule verdicts. Exposures are immutable once produced;
//! successive exposure calls merge by pure concatenation.

use serde::{Deserialize, Serialize};

use crate::pack::PackType;

/// Sentinel variable name for verdicts not tied to a single column.
pub const ALL_VARIABLE: &str = "all";

/// Origin rows a report row applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowId {
    /// The verdict applies to the dataset (or a group/column) as a whole.
    All,
    /// The verdict applies to the row carrying this key.
    Key(u64),
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowId::All => write!(f, "all"),
            RowId::Key(k) => write!(f, "{}", k),
        }
    }
}

/// One canonical verdict: `(pack, rule, variable, row, breaker)`.
///
/// `breaker == true` means the rule was violated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub pack: String,
    pub rule: String,
    pub variable: String,
    pub row_id: RowId,
    pub breaker: bool,
}

/// Per-pack execution metadata, one row per pack in invocation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackInfo {
    pub name: String,
    /// Declared or inferred type; absent when the pack failed before
    /// classification.
    pub pack_type: Option<PackType>,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Breaker totals for one (pack, rule) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakerCount {
    pub pack: String,
    pub rule: String,
    pub count: usize,
}

/// The bundle of pack metadata and report rows attached to a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exposure {
    pub packs_info: Vec<PackInfo>,
    pub report: Vec<ReportRow>,
}

impl Exposure {
    /// Concatenate two exposures, prior first.
    ///
    /// No deduplication and no reconciliation of same-named packs: two packs
    /// with identical names from different calls remain distinct rows. This
    /// keeps exposure application associative.
    pub fn merge(prior: Exposure, new: Exposure) -> Exposure {
        let mut packs_info = prior.packs_info;
        packs_info.extend(new.packs_info);
        let mut report = prior.report;
        report.extend(new.report);
        Exposure { packs_info, report }
    }

    pub fn is_empty(&self) -> bool {
        self.packs_info.is_empty() && self.report.is_empty()
    }

    /// Report rows whose verdict is a violation.
    pub fn breakers(&self) -> impl Iterator<Item = &ReportRow> {
        self.report.iter().filter(|row| row.breaker)
    }

    pub fn has_breakers(&self) -> bool {
        self.breakers().next().is_some()
    }

    /// Breaker totals per (pack, rule), in first-appearance order.
    pub fn breaker_counts(&self) -> Vec<BreakerCount> {
        let mut counts: Vec<BreakerCount> = Vec::new();
        for row in self.breakers() {
            match counts
                .iter_mut()
                .find(|c| c.pack == row.pack && c.rule == row.rule)
            {
                Some(c) => c.count += 1,
                None => counts.push(BreakerCount {
                    pack: row.pack.clone(),
                    rule: row.rule.clone(),
                    count: 1,
                }),
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pack: &str, rule: &str, breaker: bool) -> ReportRow {
        ReportRow {
            pack: pack.to_string(),
            rule: rule.to_string(),
            variable: ALL_VARIABLE.to_string(),
            row_id: RowId::All,
            breaker,
        }
    }

    fn info(name: &str) -> PackInfo {
        PackInfo {
            name: name.to_string(),
            pack_type: Some(PackType::Whole),
            succeeded: true,
            warning: None,
            error: None,
        }
    }

    #[test]
    fn merge_concatenates_preserving_order() {
        let prior = Exposure {
            packs_info: vec![info("a")],
            report: vec![row("a", "r1", true)],
        };
        let new = Exposure {
            packs_info: vec![info("a"), info("b")],
            report: vec![row("b", "r2", false)],
        };
        let merged = Exposure::merge(prior, new);
        let names: Vec<_> = merged.packs_info.iter().map(|p| p.name.as_str()).collect();
        // Same-named packs from different calls stay distinct.
        assert_eq!(names, vec!["a", "a", "b"]);
        assert_eq!(merged.report.len(), 2);
        assert_eq!(merged.report[0].pack, "a");
    }

    #[test]
    fn breaker_counts_group_by_pack_and_rule() {
        let exposure = Exposure {
            packs_info: vec![],
            report: vec![
                row("p", "r1", true),
                row("p", "r1", true),
                row("p", "r2", false),
                row("q", "r1", true),
            ],
        };
        let counts = exposure.breaker_counts();
        assert_eq!(counts.len(), 2);
        assert_eq!((counts[0].pack.as_str(), counts[0].count), ("p", 2));
        assert_eq!((counts[1].pack.as_str(), counts[1].count), ("q", 1));
        assert!(exposure.has_breakers());
    }

    #[test]
    fn report_rows_serialize_with_lowercase_row_ids() {
        let all = serde_json::to_value(RowId::All).unwrap();
        assert_eq!(all, serde_json::json!("all"));
        let keyed = serde_json::to_value(RowId::Key(7)).unwrap();
        assert_eq!(keyed, serde_json::json!({ "key": 7 }));
    }
}
