//! Turning positional arguments into a root, a selector and a constraint.

use std::collections::VecDeque;

use crate::arg::Arg;
use crate::equality::{normalize, Constraint, Expectation};
use crate::result::{SelectError, SelectResult};
use crate::selection::Selection;
use crate::substitution::{placeholder_count, Substitute, SubstitutionContext};

/// Whether a call asserts presence or absence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallKind {
    /// Matches must satisfy the expectation
    #[default]
    Assert,
    /// Nothing may match; only content expectations are accepted
    Refute,
}

/// A fully resolved assertion call
#[derive(Debug, Clone)]
pub struct SelectorCall<'a> {
    /// Where to search
    pub root: Selection<'a>,
    /// Selector handed to the engine
    pub selector: String,
    /// Selector as shown in failure messages
    pub presentation: String,
    /// Patterns recorded while substituting `selector`
    pub substitutions: SubstitutionContext,
    /// Normalized expectation
    pub constraint: Constraint,
    /// Caller-supplied failure message
    pub message: Option<String>,
}

/// Root and substituted selector, plus whatever arguments are left
#[derive(Debug)]
pub(crate) struct Target<'a> {
    pub root: Selection<'a>,
    pub selector: String,
    pub presentation: String,
    pub substitutions: SubstitutionContext,
    pub rest: VecDeque<Arg<'a>>,
}

/// Resolve the root and the selector, consuming one value per placeholder.
///
/// An explicit root wins over `scope`, which wins over `document_root`.
pub(crate) fn resolve_target<'a>(
    args: Vec<Arg<'a>>,
    scope: Option<&Selection<'a>>,
    document_root: impl FnOnce() -> Selection<'a>,
) -> SelectResult<Target<'a>> {
    let mut rest: VecDeque<Arg<'a>> = args.into();

    if matches!(rest.front(), Some(Arg::Nil)) {
        return Err(SelectError::invalid(
            "First argument is either selector or element to select, but nil found. \
             Perhaps you called assert_select with an element that does not exist?",
        ));
    }
    let root = if rest.front().is_some_and(Arg::is_root) {
        rest.pop_front()
            .and_then(Arg::into_root)
            .unwrap_or_default()
    } else {
        scope.cloned().unwrap_or_else(document_root)
    };

    let selector = match rest.pop_front() {
        Some(Arg::Str(selector)) => selector,
        Some(other) => {
            return Err(SelectError::invalid(format!(
                "Expecting a selector string, got {}",
                other.kind()
            )))
        }
        None => return Err(SelectError::invalid("Expecting a selector argument")),
    };

    let wanted = placeholder_count(&selector);
    let mut values = Vec::new();
    while values.len() < wanted && rest.front().is_some_and(Arg::is_substitutable) {
        if let Some(value) = rest.pop_front().and_then(Arg::into_substitute) {
            values.push(value);
        }
    }

    let presentation = SubstitutionContext::present(&selector, &values);
    let mut substitutions = SubstitutionContext::new();
    let mut queue: VecDeque<Substitute> = values.into();
    let selector = substitutions.substitute(&selector, &mut queue);

    Ok(Target {
        root,
        selector,
        presentation,
        substitutions,
        rest,
    })
}

/// Resolve a complete assertion call.
///
/// # Errors
///
/// Returns [`SelectError::InvalidArgument`] for a nil root, a missing or
/// non-string selector, an unrecognized expectation, a non-string message
/// or leftover arguments.
pub fn resolve<'a>(
    args: Vec<Arg<'a>>,
    kind: CallKind,
    scope: Option<&Selection<'a>>,
    document_root: impl FnOnce() -> Selection<'a>,
) -> SelectResult<SelectorCall<'a>> {
    let mut target = resolve_target(args, scope, document_root)?;

    let expectation = match target.rest.pop_front() {
        Some(arg) => arg.into_expectation()?,
        None => None,
    };
    let constraint = match kind {
        CallKind::Assert => normalize(expectation),
        CallKind::Refute => refuting(expectation)?,
    };

    let message = match target.rest.pop_front() {
        None | Some(Arg::Nil) => None,
        Some(Arg::Str(message)) => Some(message),
        Some(Arg::Options(_)) => {
            return Err(SelectError::invalid(
                "Last argument was options, which would be used for the assertion message. \
                 You probably want this to be the equality test instead",
            ))
        }
        Some(other) => {
            return Err(SelectError::invalid(format!(
                "Expecting a failure message string, got {}",
                other.kind()
            )))
        }
    };

    if !target.rest.is_empty() {
        return Err(SelectError::invalid(
            "Not expecting that last argument, you either have too many arguments, \
             or they're the wrong type",
        ));
    }

    Ok(SelectorCall {
        root: target.root,
        selector: target.selector,
        presentation: target.presentation,
        substitutions: target.substitutions,
        constraint,
        message,
    })
}

fn refuting(expectation: Option<Expectation>) -> SelectResult<Constraint> {
    let allowed = match &expectation {
        None | Some(Expectation::Text(_)) => true,
        Some(Expectation::Options(options)) => !options.has_bounds(),
        Some(Expectation::Bool(_) | Expectation::Count(_) | Expectation::Range(_)) => false,
    };
    if !allowed {
        return Err(SelectError::invalid(
            "Cannot use true, false, an integer, a range, count, minimum or maximum \
             when asserting that a selector does not match",
        ));
    }
    let mut constraint = normalize(expectation);
    constraint.count = Some(0);
    constraint.minimum = Some(0);
    constraint.maximum = Some(0);
    Ok(constraint)
}
