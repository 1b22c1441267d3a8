//! Placeholder substitution for parameterized selectors.
//!
//! A selector such as `form[action=?] input:match('name', ?)` takes its
//! values positionally: the first `?` consumes the first value, and so on.
//! Literal values are spliced in as quoted CSS strings. Patterns cannot be
//! expressed in CSS, so they are recorded in the context and the `?` is
//! replaced by the pattern's index; the `:match('attr', N)` pseudo-class
//! refers back to it during matching (see [`crate::engine`]).
//!
//! `\?` is an escaped question mark and never consumes a value; `\\` is an
//! escaped backslash, so in `\\?` the placeholder is live.

use std::collections::VecDeque;

use regex::Regex;
use scraper::ElementRef;

/// Placeholder token in selector strings
pub const PLACEHOLDER: char = '?';

/// A value consumed by one placeholder
#[derive(Debug, Clone)]
pub enum Substitute {
    /// Spliced in as a quoted, escaped string
    Literal(String),
    /// Recorded by index for `:match`
    Pattern(Regex),
}

impl From<&str> for Substitute {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_string())
    }
}

impl From<String> for Substitute {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

impl From<i64> for Substitute {
    fn from(value: i64) -> Self {
        Self::Literal(value.to_string())
    }
}

impl From<Regex> for Substitute {
    fn from(value: Regex) -> Self {
        Self::Pattern(value)
    }
}

/// Count the unescaped placeholders in `selector`
#[must_use]
pub fn placeholder_count(selector: &str) -> usize {
    let mut count = 0;
    rewrite(selector, || {
        count += 1;
        None
    });
    count
}

/// Quote `value` as a double-quoted CSS string
#[must_use]
pub fn css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\a "),
            '\r' => out.push_str("\\d "),
            '\0' => out.push_str("\\fffd "),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Patterns recorded while rewriting one selector
#[derive(Debug, Clone, Default)]
pub struct SubstitutionContext {
    patterns: Vec<Regex>,
}

impl SubstitutionContext {
    /// Create an empty context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace placeholders left to right, consuming `values` from the front.
    ///
    /// Placeholders left over once `values` is exhausted stay in place.
    pub fn substitute(&mut self, selector: &str, values: &mut VecDeque<Substitute>) -> String {
        rewrite(selector, || {
            values.pop_front().map(|value| match value {
                Substitute::Literal(text) => css_string(&text),
                Substitute::Pattern(pattern) => {
                    self.patterns.push(pattern);
                    (self.patterns.len() - 1).to_string()
                }
            })
        })
    }

    /// Render `selector` with `values` for failure messages.
    ///
    /// Patterns appear as `/source/` instead of their index.
    #[must_use]
    pub fn present(selector: &str, values: &[Substitute]) -> String {
        let mut values = values.iter();
        rewrite(selector, || {
            values.next().map(|value| match value {
                Substitute::Literal(text) => css_string(text),
                Substitute::Pattern(pattern) => format!("/{}/", pattern.as_str()),
            })
        })
    }

    /// Pattern recorded at `index`
    #[must_use]
    pub fn pattern(&self, index: usize) -> Option<&Regex> {
        self.patterns.get(index)
    }

    /// All recorded patterns in index order
    #[must_use]
    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    /// Subset of `nodes` whose `attribute` matches the pattern at `index`
    #[must_use]
    pub fn matching<'a>(
        &self,
        nodes: &[ElementRef<'a>],
        attribute: &str,
        index: usize,
    ) -> Vec<ElementRef<'a>> {
        let Some(pattern) = self.pattern(index) else {
            return Vec::new();
        };
        nodes
            .iter()
            .copied()
            .filter(|node| {
                node.value()
                    .attr(attribute)
                    .is_some_and(|value| pattern.is_match(value))
            })
            .collect()
    }
}

fn rewrite(selector: &str, mut next: impl FnMut() -> Option<String>) -> String {
    let mut out = String::with_capacity(selector.len());
    let mut chars = selector.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.peek() {
                Some(&PLACEHOLDER) => {
                    chars.next();
                    out.push(PLACEHOLDER);
                }
                Some(&'\\') => {
                    chars.next();
                    out.push_str("\\\\");
                }
                _ => out.push(c),
            },
            PLACEHOLDER => match next() {
                Some(encoded) => out.push_str(&encoded),
                None => out.push(PLACEHOLDER),
            },
            _ => out.push(c),
        }
    }
    out
}
