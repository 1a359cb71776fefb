//! Minimal tabular data model.
//!
//! A [`Frame`] is an ordered sequence of named, equal-length columns of JSON
//! values. It is deliberately small: grouping, filtering and column-wise
//! transforms belong to the caller's data engine. The engine only needs
//! construction, lookup, and structural equality; equality is what makes the
//! "dataset returned unchanged" guarantee checkable with `==`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::FrameError;

/// An ordered collection of named columns, all of equal length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    columns: Vec<(String, Vec<Value>)>,
}

impl Frame {
    /// An empty frame: no columns, no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a frame from `(name, values)` pairs.
    ///
    /// Rejects duplicate names and unequal column lengths.
    pub fn with_columns<N: Into<String>>(
        columns: impl IntoIterator<Item = (N, Vec<Value>)>,
    ) -> Result<Self, FrameError> {
        let mut frame = Self::new();
        for (name, values) in columns {
            frame.push_column(name, values)?;
        }
        Ok(frame)
    }

    /// Append a column. The first column fixes the row count.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<Value>,
    ) -> Result<(), FrameError> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(FrameError::DuplicateColumn { name });
        }
        if !self.columns.is_empty() && values.len() != self.n_rows() {
            return Err(FrameError::LengthMismatch {
                name,
                expected: self.n_rows(),
                actual: values.len(),
            });
        }
        self.columns.push((name, values));
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |(_, v)| v.len())
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    /// Values of a named column.
    pub fn column(&self, name: &str) -> Result<&[Value], FrameError> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
            .ok_or_else(|| FrameError::UnknownColumn {
                name: name.to_string(),
            })
    }

    /// Columns in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// A copy of this frame without the named column. No-op when absent.
    pub fn without_column(&self, name: &str) -> Frame {
        Frame {
            columns: self
                .columns
                .iter()
                .filter(|(n, _)| n != name)
                .cloned()
                .collect(),
        }
    }

    /// A copy keeping only the rows where `keep` returns true.
    ///
    /// Stand-in for the caller's row-subsetting engine; pack bodies in tests
    /// use it to filter while carrying every column (keys included) along.
    pub fn retain_rows(&self, keep: impl Fn(usize) -> bool) -> Frame {
        Frame {
            columns: self
                .columns
                .iter()
                .map(|(n, v)| {
                    (
                        n.clone(),
                        v.iter()
                            .enumerate()
                            .filter(|(i, _)| keep(*i))
                            .map(|(_, value)| value.clone())
                            .collect(),
                    )
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Frame {
        Frame::with_columns([
            ("mpg", vec![json!(21.0), json!(22.8), json!(18.1)]),
            ("vs", vec![json!(0), json!(1), json!(1)]),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_duplicate_columns() {
        let err = Frame::with_columns([("a", vec![json!(1)]), ("a", vec![json!(2)])]).unwrap_err();
        assert!(matches!(err, FrameError::DuplicateColumn { .. }));
    }

    #[test]
    fn rejects_ragged_columns() {
        let err =
            Frame::with_columns([("a", vec![json!(1), json!(2)]), ("b", vec![json!(3)])])
                .unwrap_err();
        assert!(matches!(err, FrameError::LengthMismatch { .. }));
    }

    #[test]
    fn lookup_and_shape() {
        let frame = sample();
        assert_eq!(frame.n_rows(), 3);
        assert_eq!(frame.n_cols(), 2);
        assert_eq!(frame.column("vs").unwrap()[1], json!(1));
        assert!(frame.column("cyl").is_err());
    }

    #[test]
    fn retain_rows_keeps_column_alignment() {
        let filtered = sample().retain_rows(|i| i != 1);
        assert_eq!(filtered.n_rows(), 2);
        assert_eq!(filtered.column("mpg").unwrap(), &[json!(21.0), json!(18.1)]);
        assert_eq!(filtered.column("vs").unwrap(), &[json!(0), json!(1)]);
    }

    #[test]
    fn structural_equality() {
        assert_eq!(sample(), sample());
        assert_ne!(sample(), sample().without_column("vs"));
    }
}
