//! Pack type classification.
//!
//! When a pack does not declare its type, the engine infers it from the raw
//! result using a fixed precedence of structural signals: declared grouping
//! columns, presence of the reserved row-key column, and composite column
//! names. No other inspection is performed, so classification is a pure
//! function of the result shape and the separator.

use tracing::debug;

use crate::frame::Frame;
use crate::keyer::KEY_COLUMN;
use crate::pack::PackType;
use crate::sep::RuleSep;

/// Infer the type of a raw pack result.
///
/// A declared type always wins. Otherwise:
/// 1. grouping columns were supplied at definition time → grouped;
/// 2. the row-key column survived → row, or cell when any non-key column
///    name is composite;
/// 3. any composite column name → column;
/// 4. otherwise → whole.
pub(crate) fn classify(
    result: &Frame,
    declared: Option<PackType>,
    group_vars: &[String],
    sep: &RuleSep,
) -> PackType {
    if let Some(ty) = declared {
        return ty;
    }

    let ty = if !group_vars.is_empty() {
        PackType::Grouped
    } else if result.has_column(KEY_COLUMN) {
        let any_composite = result
            .names()
            .filter(|name| *name != KEY_COLUMN)
            .any(|name| sep.is_composite(name));
        if any_composite {
            PackType::Cell
        } else {
            PackType::Row
        }
    } else if result.names().any(|name| sep.is_composite(name)) {
        PackType::Column
    } else {
        PackType::Whole
    };
    debug!(%ty, "guessed pack type from result shape");
    ty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use crate::sep::compose_name;
    use serde_json::json;

    fn sep() -> RuleSep {
        RuleSep::default()
    }

    #[test]
    fn declared_type_short_circuits() {
        let result = Frame::with_columns([("anything", vec![json!(true)])]).unwrap();
        assert_eq!(
            classify(&result, Some(PackType::Cell), &[], &sep()),
            PackType::Cell
        );
    }

    #[test]
    fn group_vars_force_grouped() {
        let result = Frame::with_columns([
            ("vs", vec![json!(0), json!(1)]),
            ("n_positive", vec![json!(true), json!(false)]),
        ])
        .unwrap();
        let groups = vec!["vs".to_string()];
        assert_eq!(classify(&result, None, &groups, &sep()), PackType::Grouped);
    }

    #[test]
    fn key_column_without_composites_is_row() {
        let result = Frame::with_columns([
            (KEY_COLUMN, vec![json!(1), json!(2)]),
            ("mpg_ok", vec![json!(true), json!(false)]),
        ])
        .unwrap();
        assert_eq!(classify(&result, None, &[], &sep()), PackType::Row);
    }

    #[test]
    fn key_column_with_composites_is_cell() {
        let outlier_mpg = compose_name("outlier", "mpg");
        let result = Frame::with_columns([
            (KEY_COLUMN, vec![json!(1), json!(2)]),
            (outlier_mpg.as_str(), vec![json!(true), json!(false)]),
        ])
        .unwrap();
        assert_eq!(classify(&result, None, &[], &sep()), PackType::Cell);
    }

    #[test]
    fn composites_without_key_are_column() {
        let result =
            Frame::with_columns([(compose_name("positive", "mpg"), vec![json!(true)])]).unwrap();
        assert_eq!(classify(&result, None, &[], &sep()), PackType::Column);
    }

    #[test]
    fn single_plain_row_is_whole() {
        let result = Frame::with_columns([("nrow_ok", vec![json!(true)])]).unwrap();
        assert_eq!(classify(&result, None, &[], &sep()), PackType::Whole);
    }

    #[test]
    fn classification_is_deterministic() {
        let outlier_mpg = compose_name("outlier", "mpg");
        let result = Frame::with_columns([
            (KEY_COLUMN, vec![json!(1)]),
            (outlier_mpg.as_str(), vec![json!(true)]),
        ])
        .unwrap();
        let first = classify(&result, None, &[], &sep());
        for _ in 0..10 {
            assert_eq!(classify(&result, None, &[], &sep()), first);
        }
    }
}
