//! Rule-pack validation for tabular data.
//!
//! Datasets are exposed to rule packs; each pack's raw result, whatever its
//! shape, is classified, parsed, and normalized into one canonical report of
//! `(pack, rule, variable, row, breaker)` verdicts attached to the dataset.
//! The dataset itself always comes back unchanged.
//!
//! ```
//! use scrutiny_core::{expose, assert_any_breaker, Frame, Pack, Subject};
//! use serde_json::json;
//!
//! let frame = Frame::with_columns([("mpg", vec![json!(21.0), json!(30.4)])]).unwrap();
//! let checks = Pack::whole(|data| {
//!     Ok(Frame::with_columns([("has_rows", vec![json!(data.n_rows() > 0)])])?)
//! })
//! .named("dims");
//!
//! let exposed = expose(Subject::new(frame), checks).unwrap();
//! let exposed = assert_any_breaker(exposed).unwrap();
//! assert!(exposed.packs_info().unwrap()[0].succeeded);
//! ```

pub mod actions;
mod classify;
pub mod errors;
pub mod expose;
pub mod exposure;
pub mod frame;
pub mod keyer;
mod normalize;
pub mod pack;
pub mod sep;

// Convenience re-exports
pub use actions::{act, any_breaker, assert_any_breaker, Acted};
pub use errors::{ExposeError, FrameError, NoExposure, PackFailure, RuleViolation};
pub use exposure::{BreakerCount, Exposure, PackInfo, ReportRow, RowId, ALL_VARIABLE};
pub use expose::{expose, expose_with_options, ExposeOptions, Subject};
pub use frame::Frame;
pub use keyer::{RowKeys, KEY_COLUMN};
pub use pack::{Pack, PackFn, PackType, Packs};
pub use sep::{compose_name, RuleSep, RULE_MARKER};
