//! Expectations and their normalized constraints.

use std::fmt;
use std::ops::RangeInclusive;

use regex::Regex;

/// Expected content of a matched element
#[derive(Debug, Clone)]
pub enum TextMatch {
    /// Content must equal this string exactly
    Literal(String),
    /// Content must match this pattern somewhere
    Pattern(Regex),
}

impl TextMatch {
    /// Whether `content` satisfies this expectation
    #[must_use]
    pub fn matches(&self, content: &str) -> bool {
        match self {
            Self::Literal(expected) => content == expected,
            Self::Pattern(pattern) => pattern.is_match(content),
        }
    }
}

impl PartialEq for TextMatch {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Pattern(a), Self::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl fmt::Display for TextMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.write_str(text),
            Self::Pattern(pattern) => write!(f, "/{}/", pattern.as_str()),
        }
    }
}

impl From<&str> for TextMatch {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_string())
    }
}

impl From<String> for TextMatch {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

impl From<Regex> for TextMatch {
    fn from(value: Regex) -> Self {
        Self::Pattern(value)
    }
}

/// Structured expectation with explicit keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EqualityOptions {
    /// Exact number of matches
    pub count: Option<usize>,
    /// Lower bound on matches
    pub minimum: Option<usize>,
    /// Upper bound on matches
    pub maximum: Option<usize>,
    /// Required text content
    pub text: Option<TextMatch>,
    /// Required inner markup
    pub html: Option<TextMatch>,
}

impl EqualityOptions {
    /// Empty options (equivalent to "at least one")
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require exactly `count` matches
    #[must_use]
    pub const fn count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Require at least `minimum` matches
    #[must_use]
    pub const fn minimum(mut self, minimum: usize) -> Self {
        self.minimum = Some(minimum);
        self
    }

    /// Require at most `maximum` matches
    #[must_use]
    pub const fn maximum(mut self, maximum: usize) -> Self {
        self.maximum = Some(maximum);
        self
    }

    /// Require matching text content
    #[must_use]
    pub fn text(mut self, text: impl Into<TextMatch>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Require matching inner markup
    #[must_use]
    pub fn html(mut self, html: impl Into<TextMatch>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub(crate) const fn has_bounds(&self) -> bool {
        self.count.is_some() || self.minimum.is_some() || self.maximum.is_some()
    }
}

/// What the caller expects of a selector's matches
#[derive(Debug, Clone, PartialEq)]
pub enum Expectation {
    /// `true`: at least one match; `false`: none
    Bool(bool),
    /// Exactly this many
    Count(usize),
    /// Between the bounds, inclusive
    Range(RangeInclusive<usize>),
    /// At least one match with this text
    Text(TextMatch),
    /// Explicit keys
    Options(EqualityOptions),
}

/// Normalized count and content requirements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraint {
    /// Lower bound
    pub minimum: Option<usize>,
    /// Upper bound
    pub maximum: Option<usize>,
    /// Exact count; when set, both bounds equal it
    pub count: Option<usize>,
    /// Required text content
    pub text: Option<TextMatch>,
    /// Required inner markup; ignored when `text` is also set
    pub html: Option<TextMatch>,
}

impl Constraint {
    /// The content requirement the filter applies, text first
    #[must_use]
    pub fn content(&self) -> Option<ContentCheck<'_>> {
        self.text
            .as_ref()
            .map(ContentCheck::Text)
            .or_else(|| self.html.as_ref().map(ContentCheck::Html))
    }
}

/// Which content of an element is compared
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContentCheck<'c> {
    /// Rendered text
    Text(&'c TextMatch),
    /// Serialized inner markup
    Html(&'c TextMatch),
}

impl<'c> ContentCheck<'c> {
    /// The expectation being compared against
    #[must_use]
    pub const fn expected(self) -> &'c TextMatch {
        match self {
            Self::Text(m) | Self::Html(m) => m,
        }
    }
}

/// Turn an optional expectation into a constraint.
///
/// No expectation means "at least one match".
#[must_use]
pub fn normalize(expectation: Option<Expectation>) -> Constraint {
    let mut constraint = Constraint::default();
    match expectation {
        None | Some(Expectation::Bool(true)) => constraint.minimum = Some(1),
        Some(Expectation::Bool(false)) => constraint.count = Some(0),
        Some(Expectation::Count(count)) => constraint.count = Some(count),
        Some(Expectation::Range(range)) => {
            constraint.minimum = Some(*range.start());
            constraint.maximum = Some(*range.end());
        }
        Some(Expectation::Text(text)) => constraint.text = Some(text),
        Some(Expectation::Options(options)) => {
            constraint.count = options.count;
            constraint.minimum = options.minimum;
            constraint.maximum = options.maximum;
            constraint.text = options.text;
            constraint.html = options.html;
        }
    }

    if let Some(count) = constraint.count {
        constraint.minimum = Some(count);
        constraint.maximum = Some(count);
    } else if constraint.minimum.is_none() && constraint.maximum.is_none() {
        constraint.minimum = Some(1);
    }
    constraint
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// A count always pins both bounds to itself
        #[test]
        fn prop_count_pins_bounds(n in 0usize..1000) {
            let c = normalize(Some(Expectation::Count(n)));
            prop_assert_eq!(c.minimum, Some(n));
            prop_assert_eq!(c.maximum, Some(n));
            prop_assert_eq!(c.count, Some(n));
        }

        /// Ranges map straight onto the bounds
        #[test]
        fn prop_range_bounds(a in 0usize..100, len in 0usize..100) {
            let c = normalize(Some(Expectation::Range(a..=a + len)));
            prop_assert_eq!(c.minimum, Some(a));
            prop_assert_eq!(c.maximum, Some(a + len));
            prop_assert_eq!(c.count, None);
        }
    }
}
