//! The exposure engine.
//!
//! [`Subject`] wraps a dataset together with its tracked row keys and any
//! attached exposure, which keeps the central guarantee structurally
//! checkable: exposing never changes the wrapped frame, only the attachment.
//!
//! Packs run strictly in list order. A failing pack is recorded and skipped,
//! never aborting the run; only configuration-level problems (bad separator,
//! guessing disabled for an untyped pack, row-key conflicts) fail the call.

use tracing::{debug, warn};

use crate::classify::classify;
use crate::errors::{ExposeError, NoExposure, PackFailure};
use crate::exposure::{Exposure, PackInfo, ReportRow};
use crate::frame::Frame;
use crate::keyer::RowKeys;
use crate::normalize::normalize;
use crate::pack::{Pack, PackType, Packs};
use crate::sep::RuleSep;

/// A dataset under scrutiny: the frame, its row keys, and any exposure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subject {
    frame: Frame,
    keys: Option<RowKeys>,
    exposure: Option<Exposure>,
}

impl Subject {
    pub fn new(frame: Frame) -> Self {
        Self {
            frame,
            keys: None,
            exposure: None,
        }
    }

    /// The wrapped dataset, exactly as the caller provided it.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn into_frame(self) -> Frame {
        self.frame
    }

    /// Row keys tracked for this dataset, once it has entered the engine.
    pub fn keys(&self) -> Option<&RowKeys> {
        self.keys.as_ref()
    }

    pub fn exposure(&self) -> Result<&Exposure, NoExposure> {
        self.exposure.as_ref().ok_or(NoExposure)
    }

    pub fn packs_info(&self) -> Result<&[PackInfo], NoExposure> {
        Ok(&self.exposure()?.packs_info)
    }

    pub fn report(&self) -> Result<&[ReportRow], NoExposure> {
        Ok(&self.exposure()?.report)
    }

    /// Detach and return the exposure, leaving the dataset bare.
    pub fn remove_exposure(&mut self) -> Option<Exposure> {
        self.exposure.take()
    }

    /// Transform the wrapped frame, keeping keys and exposure.
    ///
    /// Row keys are not reassigned here: a transform that changes the row
    /// count leaves the tracked keys stale, and the next `expose` call fails
    /// fast with a key conflict instead of silently re-keying.
    pub fn map_frame(mut self, f: impl FnOnce(Frame) -> Frame) -> Self {
        self.frame = f(self.frame);
        self
    }
}

impl From<Frame> for Subject {
    fn from(frame: Frame) -> Self {
        Subject::new(frame)
    }
}

/// Options for one `expose` call.
#[derive(Debug, Clone)]
pub struct ExposeOptions {
    /// Drop satisfied-rule rows from the report after all packs ran.
    pub remove_obeyers: bool,
    /// Infer types for packs that do not declare one.
    pub guess: bool,
    /// Separator for composite rule/variable column names.
    pub rule_sep: RuleSep,
}

impl Default for ExposeOptions {
    fn default() -> Self {
        Self {
            remove_obeyers: true,
            guess: true,
            rule_sep: RuleSep::default(),
        }
    }
}

impl ExposeOptions {
    pub fn remove_obeyers(mut self, remove: bool) -> Self {
        self.remove_obeyers = remove;
        self
    }

    pub fn guess(mut self, guess: bool) -> Self {
        self.guess = guess;
        self
    }

    pub fn rule_sep(mut self, sep: RuleSep) -> Self {
        self.rule_sep = sep;
        self
    }
}

/// Expose a dataset to packs with default options.
pub fn expose(subject: Subject, packs: impl Into<Packs>) -> Result<Subject, ExposeError> {
    expose_with_options(subject, packs, ExposeOptions::default())
}

/// Expose a dataset to packs.
///
/// Runs every pack against a keyed copy of the data, normalizes each raw
/// result into report rows, and attaches the merged exposure. The wrapped
/// frame comes back unchanged.
pub fn expose_with_options(
    subject: Subject,
    packs: impl Into<Packs>,
    options: ExposeOptions,
) -> Result<Subject, ExposeError> {
    let packs = packs.into().flatten();

    // With guessing disabled every pack needs a declared type; there is no
    // safe classification, so this fails before any pack runs.
    if !options.guess {
        for (index, pack) in packs.iter().enumerate() {
            if pack.pack_type().is_none() {
                return Err(ExposeError::AmbiguousPackType {
                    pack: effective_name(pack, None, index + 1),
                });
            }
        }
    }

    let keys = match subject.keys {
        Some(ref keys) => {
            keys.verify(&subject.frame)?;
            keys.clone()
        }
        None => RowKeys::for_frame(&subject.frame),
    };
    let keyed = keys.join_onto(&subject.frame);

    let mut packs_info = Vec::with_capacity(packs.len());
    let mut report = Vec::new();
    for (index, pack) in packs.iter().enumerate() {
        let (info, rows) = run_pack(pack, index + 1, &keyed, &options.rule_sep);
        debug!(
            pack = %info.name,
            succeeded = info.succeeded,
            rows = rows.len(),
            "pack processed"
        );
        packs_info.push(info);
        report.extend(rows);
    }

    if options.remove_obeyers {
        report.retain(|row| row.breaker);
    }

    let fresh = Exposure { packs_info, report };
    let exposure = match subject.exposure {
        Some(prior) => Exposure::merge(prior, fresh),
        None => fresh,
    };

    Ok(Subject {
        frame: subject.frame,
        keys: Some(keys),
        exposure: Some(exposure),
    })
}

/// Run one pack in isolation: any failure lands in its info row.
fn run_pack(pack: &Pack, position: usize, keyed: &Frame, sep: &RuleSep) -> (PackInfo, Vec<ReportRow>) {
    let declared = pack.pack_type();

    let raw = match pack.run(keyed) {
        Ok(raw) => raw,
        Err(e) => {
            let failure = PackFailure::Execution(format!("{:#}", e));
            return (failed_info(pack, declared, position, &failure), Vec::new());
        }
    };

    let ty = classify(&raw, declared, pack.group_vars(), sep);
    let name = effective_name(pack, Some(ty), position);
    match normalize(&raw, ty, &name, pack.group_vars(), sep) {
        Ok(normalized) => {
            if let Some(ref warning) = normalized.warning {
                warn!(pack = %name, warning = %warning, "pack produced a warning");
            }
            (
                PackInfo {
                    name,
                    pack_type: Some(ty),
                    succeeded: true,
                    warning: normalized.warning,
                    error: None,
                },
                normalized.rows,
            )
        }
        Err(failure) => {
            let info = PackInfo {
                name,
                pack_type: Some(ty),
                succeeded: false,
                warning: None,
                error: Some(failure.to_string()),
            };
            warn!(pack = %info.name, error = %failure, "pack failed");
            (info, Vec::new())
        }
    }
}

fn failed_info(
    pack: &Pack,
    ty: Option<PackType>,
    position: usize,
    failure: &PackFailure,
) -> PackInfo {
    let info = PackInfo {
        name: effective_name(pack, ty, position),
        pack_type: ty,
        succeeded: false,
        warning: None,
        error: Some(failure.to_string()),
    };
    warn!(pack = %info.name, error = %failure, "pack failed");
    info
}

/// The name recorded for a pack: the caller's, or `<type>..<position>`.
fn effective_name(pack: &Pack, ty: Option<PackType>, position: usize) -> String {
    match pack.name() {
        Some(name) => name.to_string(),
        None => {
            let ty = ty.or_else(|| pack.pack_type());
            let prefix = ty.map_or_else(|| "pack".to_string(), |t| t.to_string());
            format!("{}..{}", prefix, position)
        }
    }
}
