//! Row-identity keys.
//!
//! Keys let report rows point back at origin rows even after a pack body has
//! filtered or summarized the data away from the original shape. They are
//! tracked out-of-band on the [`Subject`](crate::expose::Subject), so the
//! caller's frame never gains a key column. Pack bodies receive a keyed
//! working copy instead, with the keys under [`KEY_COLUMN`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ExposeError;
use crate::frame::Frame;

/// Reserved column name carrying row keys through pack bodies.
pub const KEY_COLUMN: &str = ".row_key";

/// Stable per-row identifiers for one dataset snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowKeys {
    keys: Vec<u64>,
}

impl RowKeys {
    /// Assign sequential keys, 1-based, one per row.
    pub fn for_frame(frame: &Frame) -> Self {
        Self {
            keys: (1..=frame.n_rows() as u64).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.keys.iter().copied()
    }

    /// Check that a key set from a prior exposure still fits the dataset.
    ///
    /// Re-entry with a reassigned row-identity scheme fails fast rather than
    /// silently re-keying.
    pub fn verify(&self, frame: &Frame) -> Result<(), ExposeError> {
        if self.keys.len() != frame.n_rows() {
            return Err(ExposeError::KeyConflict {
                expected: self.keys.len(),
                actual: frame.n_rows(),
            });
        }
        Ok(())
    }

    /// Build the keyed working copy handed to pack bodies.
    ///
    /// Any pre-existing `.row_key` column is external tagging and is stripped
    /// before the tracked keys are joined on as the first column.
    pub fn join_onto(&self, frame: &Frame) -> Frame {
        let stripped = frame.without_column(KEY_COLUMN);
        let mut keyed = Frame::new();
        keyed
            .push_column(
                KEY_COLUMN,
                self.keys.iter().map(|k| Value::from(*k)).collect(),
            )
            .expect("key column is first");
        for (name, values) in stripped.iter() {
            keyed
                .push_column(name, values.to_vec())
                .expect("stripped frame has unique names and equal lengths");
        }
        keyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn two_rows() -> Frame {
        Frame::with_columns([("x", vec![json!(1), json!(2)])]).unwrap()
    }

    #[test]
    fn keys_are_sequential_from_one() {
        let keys = RowKeys::for_frame(&two_rows());
        assert_eq!(keys.iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn join_prepends_key_column() {
        let frame = two_rows();
        let keyed = RowKeys::for_frame(&frame).join_onto(&frame);
        assert_eq!(keyed.names().collect::<Vec<_>>(), vec![KEY_COLUMN, "x"]);
        assert_eq!(keyed.column(KEY_COLUMN).unwrap(), &[json!(1), json!(2)]);
    }

    #[test]
    fn join_strips_external_key_tagging() {
        let tagged = Frame::with_columns([
            (KEY_COLUMN, vec![json!(90), json!(91)]),
            ("x", vec![json!(1), json!(2)]),
        ])
        .unwrap();
        let keyed = RowKeys::for_frame(&tagged).join_onto(&tagged);
        assert_eq!(keyed.column(KEY_COLUMN).unwrap(), &[json!(1), json!(2)]);
        assert_eq!(keyed.n_cols(), 2);
    }

    #[test]
    fn verify_rejects_row_count_drift() {
        let keys = RowKeys::for_frame(&two_rows());
        let grown = Frame::with_columns([("x", vec![json!(1), json!(2), json!(3)])]).unwrap();
        assert!(matches!(
            keys.verify(&grown),
            Err(ExposeError::KeyConflict {
                expected: 2,
                actual: 3
            })
        ));
    }
}
