//! Post-exposure actions.
//!
//! A trigger inspects an exposed dataset; when it fires, an actor takes over
//! and its result is returned verbatim. When it does not, the dataset passes
//! through unchanged. The built-in assertion turns "any rule violated" into a
//! structured failure.

use crate::errors::RuleViolation;
use crate::expose::Subject;

/// Outcome of [`act`]: pass-through or the actor's result.
#[derive(Debug)]
pub enum Acted<R> {
    /// The trigger did not fire; the input comes back unchanged.
    Passed(Subject),
    /// The trigger fired; this is the actor's result, verbatim.
    Fired(R),
}

impl<R> Acted<R> {
    /// The passed-through subject, when the trigger did not fire.
    pub fn passed(self) -> Option<Subject> {
        match self {
            Acted::Passed(subject) => Some(subject),
            Acted::Fired(_) => None,
        }
    }
}

/// Evaluate `trigger` over the exposed dataset and run `actor` when it fires.
///
/// The actor is free to perform side effects and return whatever the caller's
/// pipeline expects next.
pub fn act<T, A, R>(subject: Subject, trigger: T, actor: A) -> Acted<R>
where
    T: FnOnce(&Subject) -> bool,
    A: FnOnce(Subject) -> R,
{
    if trigger(&subject) {
        Acted::Fired(actor(subject))
    } else {
        Acted::Passed(subject)
    }
}

/// True when the attached report holds at least one breaker.
///
/// False for a dataset with no exposure at all.
pub fn any_breaker(subject: &Subject) -> bool {
    subject
        .exposure()
        .map(|exposure| exposure.has_breakers())
        .unwrap_or(false)
}

/// Raise when any rule violation exists in the attached report.
///
/// Returns the subject unchanged when the report is clean; otherwise fails
/// with per-(pack, rule) breaker counts.
pub fn assert_any_breaker(subject: Subject) -> Result<Subject, RuleViolation> {
    let outcome = act(subject, any_breaker, |subject| {
        RuleViolation::new(
            subject
                .exposure()
                .expect("trigger fired, exposure present")
                .breaker_counts(),
        )
    });
    match outcome {
        Acted::Passed(subject) => Ok(subject),
        Acted::Fired(violation) => Err(violation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expose::{expose_with_options, ExposeOptions, Subject};
    use crate::frame::Frame;
    use crate::pack::Pack;
    use serde_json::json;

    fn exposed_with(breaker: bool) -> Subject {
        let frame = Frame::with_columns([("x", vec![json!(1), json!(2)])]).unwrap();
        let pack = Pack::whole(move |_| {
            Frame::with_columns([("rule", vec![json!(!breaker)])]).map_err(Into::into)
        })
        .named("checks");
        expose_with_options(
            Subject::new(frame),
            pack,
            ExposeOptions::default().remove_obeyers(false),
        )
        .unwrap()
    }

    #[test]
    fn act_passes_through_when_trigger_is_false() {
        let subject = exposed_with(false);
        let expected_frame = subject.frame().clone();
        let outcome: Acted<()> = act(subject, |_| false, |_| panic!("actor must not run"));
        let passed = outcome.passed().unwrap();
        assert_eq!(passed.frame(), &expected_frame);
    }

    #[test]
    fn act_returns_actor_result_when_trigger_fires() {
        let subject = exposed_with(true);
        let outcome = act(subject, any_breaker, |s| s.report().unwrap().len());
        match outcome {
            Acted::Fired(n) => assert_eq!(n, 1),
            Acted::Passed(_) => panic!("trigger should have fired"),
        }
    }

    #[test]
    fn any_breaker_is_false_without_exposure() {
        let subject = Subject::new(Frame::new());
        assert!(!any_breaker(&subject));
    }

    #[test]
    fn assert_any_breaker_passes_clean_reports() {
        let subject = exposed_with(false);
        let subject = assert_any_breaker(subject).unwrap();
        assert!(subject.exposure().is_ok());
    }

    #[test]
    fn assert_any_breaker_summarizes_violations() {
        let subject = exposed_with(true);
        let violation = assert_any_breaker(subject).unwrap_err();
        assert_eq!(violation.total(), 1);
        assert_eq!(violation.breakers[0].pack, "checks");
        assert_eq!(violation.breakers[0].rule, "rule");
        let message = violation.to_string();
        assert!(message.contains("checks"));
        assert!(message.contains("rule"));
    }

    #[test]
    fn detached_exposure_disarms_the_trigger() {
        let mut subject = exposed_with(true);
        assert!(any_breaker(&subject));
        let detached = subject.remove_exposure().unwrap();
        assert!(detached.has_breakers());
        assert!(!any_breaker(&subject));
    }
}
