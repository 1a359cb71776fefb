//! Rule packs and pack collections.
//!
//! A pack is a named, pure function from a keyed frame to a raw result whose
//! shape falls into one of five types. Packs are defined by the caller and
//! never mutated; the engine runs them strictly in list order.

use serde::{Deserialize, Serialize};

use crate::frame::Frame;

/// The five result shapes a pack can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackType {
    /// One verdict per rule, applying to the entire dataset.
    Whole,
    /// One verdict per rule per group-key combination.
    Grouped,
    /// One verdict per rule per column, names composed as `rule<sep>variable`.
    Column,
    /// One verdict per rule per row, keyed by the row-identity column.
    Row,
    /// One verdict per rule per (row, column).
    Cell,
}

impl std::fmt::Display for PackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PackType::Whole => "whole",
            PackType::Grouped => "grouped",
            PackType::Column => "column",
            PackType::Row => "row",
            PackType::Cell => "cell",
        };
        write!(f, "{}", s)
    }
}

/// A pack body: keyed dataset in, raw rule results out.
pub type PackFn = Box<dyn Fn(&Frame) -> anyhow::Result<Frame>>;

/// A named rule collection applied to a dataset.
pub struct Pack {
    name: Option<String>,
    ty: Option<PackType>,
    group_vars: Vec<String>,
    run: PackFn,
}

impl Pack {
    /// An untyped pack; its type is guessed from the result shape.
    pub fn new(run: impl Fn(&Frame) -> anyhow::Result<Frame> + 'static) -> Self {
        Self {
            name: None,
            ty: None,
            group_vars: Vec::new(),
            run: Box::new(run),
        }
    }

    /// A pack producing one verdict per rule for the whole dataset.
    pub fn whole(run: impl Fn(&Frame) -> anyhow::Result<Frame> + 'static) -> Self {
        Self::new(run).typed(PackType::Whole)
    }

    /// A pack producing verdicts per group-key combination.
    ///
    /// `group_vars` name the grouping columns of the result, in the order
    /// they form the rendered group identifier.
    pub fn grouped(
        group_vars: impl IntoIterator<Item = impl Into<String>>,
        run: impl Fn(&Frame) -> anyhow::Result<Frame> + 'static,
    ) -> Self {
        let mut pack = Self::new(run).typed(PackType::Grouped);
        pack.group_vars = group_vars.into_iter().map(Into::into).collect();
        pack
    }

    /// A pack producing one verdict per rule per column.
    pub fn column(run: impl Fn(&Frame) -> anyhow::Result<Frame> + 'static) -> Self {
        Self::new(run).typed(PackType::Column)
    }

    /// A pack producing one verdict per rule per row.
    pub fn row(run: impl Fn(&Frame) -> anyhow::Result<Frame> + 'static) -> Self {
        Self::new(run).typed(PackType::Row)
    }

    /// A pack producing one verdict per rule per (row, column).
    pub fn cell(run: impl Fn(&Frame) -> anyhow::Result<Frame> + 'static) -> Self {
        Self::new(run).typed(PackType::Cell)
    }

    /// Override the pack name used in the report and pack info.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declare the pack type, skipping classification.
    pub fn typed(mut self, ty: PackType) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn pack_type(&self) -> Option<PackType> {
        self.ty
    }

    pub fn group_vars(&self) -> &[String] {
        &self.group_vars
    }

    pub(crate) fn run(&self, frame: &Frame) -> anyhow::Result<Frame> {
        (self.run)(frame)
    }
}

impl std::fmt::Debug for Pack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pack")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("group_vars", &self.group_vars)
            .finish_non_exhaustive()
    }
}

/// Bare packs or arbitrarily nested collections thereof.
///
/// Flattened to a plain list before execution, preserving declaration order.
pub enum Packs {
    One(Pack),
    Many(Vec<Packs>),
}

impl Packs {
    pub fn flatten(self) -> Vec<Pack> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(self, out: &mut Vec<Pack>) {
        match self {
            Packs::One(pack) => out.push(pack),
            Packs::Many(nested) => {
                for packs in nested {
                    packs.flatten_into(out);
                }
            }
        }
    }
}

impl From<Pack> for Packs {
    fn from(pack: Pack) -> Self {
        Packs::One(pack)
    }
}

impl From<Vec<Pack>> for Packs {
    fn from(packs: Vec<Pack>) -> Self {
        Packs::Many(packs.into_iter().map(Packs::One).collect())
    }
}

impl From<Vec<Packs>> for Packs {
    fn from(nested: Vec<Packs>) -> Self {
        Packs::Many(nested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(name: &str) -> Pack {
        Pack::new(|frame| Ok(frame.clone())).named(name)
    }

    #[test]
    fn nested_collections_flatten_in_order() {
        let packs: Packs = vec![
            Packs::from(noop("a")),
            Packs::from(vec![noop("b"), noop("c")]),
            Packs::from(noop("d")),
        ]
        .into();
        let names: Vec<_> = packs
            .flatten()
            .iter()
            .map(|p| p.name().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn typed_constructors_declare_types() {
        assert_eq!(
            Pack::whole(|f| Ok(f.clone())).pack_type(),
            Some(PackType::Whole)
        );
        let grouped = Pack::grouped(["vs", "am"], |f| Ok(f.clone()));
        assert_eq!(grouped.pack_type(), Some(PackType::Grouped));
        assert_eq!(grouped.group_vars(), ["vs", "am"]);
    }

    #[test]
    fn display_names_match_report_vocabulary() {
        assert_eq!(PackType::Whole.to_string(), "whole");
        assert_eq!(PackType::Cell.to_string(), "cell");
    }
}
