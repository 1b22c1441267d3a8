//! Positional arguments accepted by the assertion entry points.
//!
//! Calls take a flat list: an optional root, the selector, one value per
//! `?` placeholder, an optional expectation and an optional message.
//! [`Arg`] is the tagged value for one slot; build lists with
//! [`crate::args!`].

use std::ops::RangeInclusive;

use regex::Regex;
use scraper::ElementRef;

use crate::equality::{EqualityOptions, Expectation, TextMatch};
use crate::result::{SelectError, SelectResult};
use crate::selection::Selection;
use crate::substitution::Substitute;

/// One positional argument
#[derive(Debug, Clone)]
pub enum Arg<'a> {
    /// An absent root, e.g. the `None` of a lookup that found nothing
    Nil,
    /// A single element used as root
    Node(ElementRef<'a>),
    /// A bare list of elements used as root
    Nodes(Vec<ElementRef<'a>>),
    /// A selection used as root
    Selection(Selection<'a>),
    /// Selector, literal value, text expectation or message
    Str(String),
    /// Pattern value or text expectation
    Pattern(Regex),
    /// Literal value or exact count
    Int(i64),
    /// Presence (`true`) or absence (`false`)
    Bool(bool),
    /// Count bounds
    Range(RangeInclusive<usize>),
    /// Structured expectation
    Options(EqualityOptions),
}

impl Arg<'_> {
    /// Short name of the variant for error messages
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Node(_) => "element",
            Self::Nodes(_) => "element list",
            Self::Selection(_) => "selection",
            Self::Str(_) => "string",
            Self::Pattern(_) => "pattern",
            Self::Int(_) => "integer",
            Self::Bool(_) => "boolean",
            Self::Range(_) => "range",
            Self::Options(_) => "options",
        }
    }

    /// Whether this argument can stand in for a root
    #[must_use]
    pub const fn is_root(&self) -> bool {
        matches!(self, Self::Node(_) | Self::Nodes(_) | Self::Selection(_))
    }

    /// Whether a `?` placeholder may consume this argument
    #[must_use]
    pub const fn is_substitutable(&self) -> bool {
        matches!(self, Self::Str(_) | Self::Pattern(_) | Self::Int(_))
    }
}

impl<'a> Arg<'a> {
    /// Convert a root argument into a selection
    pub(crate) fn into_root(self) -> Option<Selection<'a>> {
        match self {
            Self::Node(node) => Some(Selection::from(node)),
            Self::Nodes(nodes) => Some(Selection::from_nodes(nodes)),
            Self::Selection(selection) => Some(selection),
            _ => None,
        }
    }

    /// Convert a placeholder value; `None` for non-substitutable shapes
    pub(crate) fn into_substitute(self) -> Option<Substitute> {
        match self {
            Self::Str(text) => Some(Substitute::Literal(text)),
            Self::Int(n) => Some(Substitute::from(n)),
            Self::Pattern(pattern) => Some(Substitute::Pattern(pattern)),
            _ => None,
        }
    }

    /// Interpret this argument as an expectation.
    ///
    /// `Nil` is treated as no expectation at all.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::InvalidArgument`] for shapes that do not
    /// describe an expectation, such as elements or negative integers.
    pub fn into_expectation(self) -> SelectResult<Option<Expectation>> {
        let expectation = match self {
            Self::Nil => return Ok(None),
            Self::Bool(b) => Expectation::Bool(b),
            Self::Int(n) => {
                let count = usize::try_from(n).map_err(|_| {
                    SelectError::invalid(format!("expected count must not be negative, got {n}"))
                })?;
                Expectation::Count(count)
            }
            Self::Range(range) => Expectation::Range(range),
            Self::Str(text) => Expectation::Text(TextMatch::Literal(text)),
            Self::Pattern(pattern) => Expectation::Text(TextMatch::Pattern(pattern)),
            Self::Options(options) => Expectation::Options(options),
            other => {
                return Err(SelectError::invalid(format!(
                    "I don't understand what you're trying to match: got {}",
                    other.kind()
                )))
            }
        };
        Ok(Some(expectation))
    }
}

impl From<&str> for Arg<'_> {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<&String> for Arg<'_> {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<String> for Arg<'_> {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Regex> for Arg<'_> {
    fn from(value: Regex) -> Self {
        Self::Pattern(value)
    }
}

impl From<&Regex> for Arg<'_> {
    fn from(value: &Regex) -> Self {
        Self::Pattern(value.clone())
    }
}

impl From<i64> for Arg<'_> {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Arg<'_> {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<usize> for Arg<'_> {
    fn from(value: usize) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<bool> for Arg<'_> {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<RangeInclusive<usize>> for Arg<'_> {
    fn from(value: RangeInclusive<usize>) -> Self {
        Self::Range(value)
    }
}

impl From<RangeInclusive<i32>> for Arg<'_> {
    fn from(value: RangeInclusive<i32>) -> Self {
        let (start, end) = value.into_inner();
        let clamp = |n: i32| usize::try_from(n).unwrap_or(0);
        Self::Range(clamp(start)..=clamp(end))
    }
}

impl From<EqualityOptions> for Arg<'_> {
    fn from(value: EqualityOptions) -> Self {
        Self::Options(value)
    }
}

impl<'a> From<ElementRef<'a>> for Arg<'a> {
    fn from(value: ElementRef<'a>) -> Self {
        Self::Node(value)
    }
}

impl<'a> From<Vec<ElementRef<'a>>> for Arg<'a> {
    fn from(value: Vec<ElementRef<'a>>) -> Self {
        Self::Nodes(value)
    }
}

impl<'a> From<Selection<'a>> for Arg<'a> {
    fn from(value: Selection<'a>) -> Self {
        Self::Selection(value)
    }
}

impl<'a> From<&Selection<'a>> for Arg<'a> {
    fn from(value: &Selection<'a>) -> Self {
        Self::Selection(value.clone())
    }
}

impl<'a, T: Into<Arg<'a>>> From<Option<T>> for Arg<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Nil, Into::into)
    }
}

/// Build a `Vec<Arg>` from heterogeneous values
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        ::std::vec![$($crate::Arg::from($arg)),*]
    };
}
