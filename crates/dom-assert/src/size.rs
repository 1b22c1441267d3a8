//! Count checks against normalized bounds.

use crate::equality::Constraint;
use crate::result::{SelectError, SelectResult};

fn elements(n: usize) -> &'static str {
    if n == 1 {
        "element"
    } else {
        "elements"
    }
}

/// Natural-language description of the bounds in `constraint`
#[must_use]
pub fn count_description(constraint: &Constraint) -> Option<String> {
    match (constraint.minimum, constraint.maximum, constraint.count) {
        (_, _, Some(count)) => Some(format!("exactly {count} {}", elements(count))),
        (Some(min), Some(max), None) if min == max => {
            Some(format!("exactly {min} {}", elements(min)))
        }
        (Some(min), Some(max), None) => Some(format!("between {min} and {max} elements")),
        (Some(min), None, None) => Some(format!("at least {min} {}", elements(min))),
        (None, Some(max), None) => Some(format!("at most {max} {}", elements(max))),
        (None, None, None) => None,
    }
}

/// Check `size` against the bounds of `constraint`.
///
/// `message` overrides the generated failure message.
///
/// # Errors
///
/// Returns [`SelectError::AssertionFailed`] when the size is out of bounds.
pub fn assert_size(
    size: usize,
    constraint: &Constraint,
    selector: &str,
    message: Option<&str>,
) -> SelectResult<()> {
    let satisfied = match constraint.count {
        Some(count) => size == count,
        None => {
            constraint.minimum.map_or(true, |min| size >= min)
                && constraint.maximum.map_or(true, |max| size <= max)
        }
    };
    if satisfied {
        return Ok(());
    }

    let message = message.map_or_else(
        || {
            let description =
                count_description(constraint).unwrap_or_else(|| "any number of elements".to_string());
            format!("Expected {description} matching {selector:?}, found {size}.")
        },
        str::to_string,
    );
    Err(SelectError::failed(message))
}
