//! Raw pack results to canonical report rows.
//!
//! Each pack type maps its result structure onto `(pack, rule, variable,
//! row_id, breaker)` rows. Verdicts must be booleans; anything else is a
//! normalization failure recorded against the pack.

use serde_json::Value;

use crate::errors::PackFailure;
use crate::exposure::{ReportRow, RowId, ALL_VARIABLE};
use crate::frame::Frame;
use crate::keyer::KEY_COLUMN;
use crate::pack::PackType;
use crate::sep::RuleSep;

/// Normalized contribution of one pack.
#[derive(Debug)]
pub(crate) struct Normalized {
    pub rows: Vec<ReportRow>,
    /// Oddities worth surfacing without failing the pack.
    pub warning: Option<String>,
}

pub(crate) fn normalize(
    result: &Frame,
    ty: PackType,
    pack: &str,
    group_vars: &[String],
    sep: &RuleSep,
) -> Result<Normalized, PackFailure> {
    match ty {
        PackType::Whole => normalize_whole(result, pack),
        PackType::Grouped => normalize_grouped(result, pack, group_vars),
        PackType::Column => normalize_column(result, pack, sep),
        PackType::Row => normalize_row(result, pack),
        PackType::Cell => normalize_cell(result, pack, sep),
    }
}

fn normalize_whole(result: &Frame, pack: &str) -> Result<Normalized, PackFailure> {
    expect_single_row(result, "whole")?;
    let mut rows = Vec::with_capacity(result.n_cols());
    for (rule, values) in result.iter() {
        rows.push(ReportRow {
            pack: pack.to_string(),
            rule: rule.to_string(),
            variable: ALL_VARIABLE.to_string(),
            row_id: RowId::All,
            breaker: breaker(&values[0], rule)?,
        });
    }
    Ok(Normalized {
        rows,
        warning: None,
    })
}

fn normalize_grouped(
    result: &Frame,
    pack: &str,
    group_vars: &[String],
) -> Result<Normalized, PackFailure> {
    for group in group_vars {
        if !result.has_column(group) {
            return Err(PackFailure::ShapeMismatch {
                detail: format!("grouped result is missing group column '{}'", group),
            });
        }
    }

    let rule_columns: Vec<(&str, &[Value])> = result
        .iter()
        .filter(|(name, _)| !group_vars.iter().any(|g| g == name) && *name != KEY_COLUMN)
        .collect();

    let mut rows = Vec::new();
    for r in 0..result.n_rows() {
        // Group identifier: declared group-column order, values joined with '.'.
        let variable = group_vars
            .iter()
            .map(|group| render_group_value(&result.column(group).expect("checked above")[r]))
            .collect::<Vec<_>>()
            .join(".");
        for (rule, values) in &rule_columns {
            rows.push(ReportRow {
                pack: pack.to_string(),
                rule: rule.to_string(),
                variable: variable.clone(),
                row_id: RowId::All,
                breaker: breaker(&values[r], rule)?,
            });
        }
    }
    Ok(Normalized {
        rows,
        warning: None,
    })
}

fn normalize_column(result: &Frame, pack: &str, sep: &RuleSep) -> Result<Normalized, PackFailure> {
    expect_single_row(result, "column")?;
    let mut rows = Vec::with_capacity(result.n_cols());
    let mut warnings = Vec::new();
    for (name, values) in result.iter() {
        let (rule, variable) = split_or_fallback(name, sep, &mut warnings);
        rows.push(ReportRow {
            pack: pack.to_string(),
            rule: rule.to_string(),
            variable: variable.to_string(),
            row_id: RowId::All,
            breaker: breaker(&values[0], rule)?,
        });
    }
    Ok(Normalized {
        rows,
        warning: join_warnings(warnings),
    })
}

fn normalize_row(result: &Frame, pack: &str) -> Result<Normalized, PackFailure> {
    let keys = key_column(result, "row")?;
    let mut rows = Vec::new();
    for (r, key) in keys.iter().enumerate() {
        let row_id = RowId::Key(row_key(key)?);
        for (rule, values) in result.iter().filter(|(name, _)| *name != KEY_COLUMN) {
            rows.push(ReportRow {
                pack: pack.to_string(),
                rule: rule.to_string(),
                variable: ALL_VARIABLE.to_string(),
                row_id,
                breaker: breaker(&values[r], rule)?,
            });
        }
    }
    Ok(Normalized {
        rows,
        warning: None,
    })
}

fn normalize_cell(result: &Frame, pack: &str, sep: &RuleSep) -> Result<Normalized, PackFailure> {
    let keys = key_column(result, "cell")?;
    let mut warnings = Vec::new();
    // Parse names once so each oddity warns once, not once per row.
    let columns: Vec<(&str, &str, &[Value])> = result
        .iter()
        .filter(|(name, _)| *name != KEY_COLUMN)
        .map(|(name, values)| {
            let (rule, variable) = split_or_fallback(name, sep, &mut warnings);
            (rule, variable, values)
        })
        .collect();

    let mut rows = Vec::with_capacity(keys.len() * columns.len());
    for (r, key) in keys.iter().enumerate() {
        let row_id = RowId::Key(row_key(key)?);
        for (rule, variable, values) in &columns {
            rows.push(ReportRow {
                pack: pack.to_string(),
                rule: (*rule).to_string(),
                variable: (*variable).to_string(),
                row_id,
                breaker: breaker(&values[r], rule)?,
            });
        }
    }
    Ok(Normalized {
        rows,
        warning: join_warnings(warnings),
    })
}

fn expect_single_row(result: &Frame, ty: &str) -> Result<(), PackFailure> {
    if result.n_rows() != 1 {
        return Err(PackFailure::ShapeMismatch {
            detail: format!(
                "{} pack result must have exactly one row, got {}",
                ty,
                result.n_rows()
            ),
        });
    }
    Ok(())
}

fn key_column<'a>(result: &'a Frame, ty: &str) -> Result<&'a [Value], PackFailure> {
    result
        .column(KEY_COLUMN)
        .map_err(|_| PackFailure::ShapeMismatch {
            detail: format!("{} pack result is missing the '{}' column", ty, KEY_COLUMN),
        })
}

fn split_or_fallback<'a>(
    name: &'a str,
    sep: &RuleSep,
    warnings: &mut Vec<String>,
) -> (&'a str, &'a str) {
    match sep.split(name) {
        Some((rule, variable)) => (rule, variable),
        None => {
            warnings.push(format!(
                "column '{}' does not match the rule separator; treated as rule '{}'",
                name, name
            ));
            (name, ALL_VARIABLE)
        }
    }
}

fn breaker(value: &Value, rule: &str) -> Result<bool, PackFailure> {
    match value {
        // A verdict of true means the rule HELD; the report stores breakers.
        Value::Bool(obeyed) => Ok(!obeyed),
        other => Err(PackFailure::NonLogicalRuleResult {
            rule: rule.to_string(),
            detail: format!("expected a boolean verdict, got `{}`", other),
        }),
    }
}

fn row_key(value: &Value) -> Result<u64, PackFailure> {
    value.as_u64().ok_or_else(|| PackFailure::ShapeMismatch {
        detail: format!("row key `{}` is not an unsigned integer", value),
    })
}

fn render_group_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn join_warnings(warnings: Vec<String>) -> Option<String> {
    if warnings.is_empty() {
        None
    } else {
        Some(warnings.join("; "))
    }
}
