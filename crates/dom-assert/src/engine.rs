//! Selector engine adapter.
//!
//! The core only needs two things from a CSS engine: query a set of roots
//! and test a single element. [`SelectorEngine`] captures that, and
//! [`ScraperEngine`] implements it on top of `scraper`.
//!
//! `scraper` has no hook for custom pseudo-classes, so `:match('attr', N)`
//! is expanded before parsing: the document's elements are run through
//! [`SubstitutionContext::matching`] and the pseudo-class is replaced by an
//! `:is(...)` list of the attribute values that matched pattern `N`.

use std::fmt;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use scraper::{ElementRef, Selector};

use crate::result::{SelectError, SelectResult};
use crate::selection::Selection;
use crate::substitution::{css_string, SubstitutionContext};

/// CSS matching as the assertion core sees it
pub trait SelectorEngine: fmt::Debug {
    /// Elements matching `selector` among each root and its descendants,
    /// without duplicates, in root order.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::SelectorSyntax`] if the selector does not parse.
    fn query<'a>(
        &self,
        root: &Selection<'a>,
        selector: &str,
        substitutions: &SubstitutionContext,
    ) -> SelectResult<Selection<'a>>;

    /// Whether `node` itself matches `selector`
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::SelectorSyntax`] if the selector does not parse.
    fn matches_self(
        &self,
        node: ElementRef<'_>,
        selector: &str,
        substitutions: &SubstitutionContext,
    ) -> SelectResult<bool>;
}

/// [`SelectorEngine`] backed by `scraper`
#[derive(Debug, Default, Clone, Copy)]
pub struct ScraperEngine;

impl ScraperEngine {
    /// Create the engine
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn compile(
        self,
        anchor: Option<ElementRef<'_>>,
        selector: &str,
        substitutions: &SubstitutionContext,
    ) -> SelectResult<Selector> {
        let elements = anchor.map(document_elements).unwrap_or_default();
        let expanded = expand_match(selector, &elements, substitutions)?;
        Selector::parse(&expanded).map_err(|err| SelectError::SelectorSyntax {
            message: err.to_string(),
            selector: expanded.clone(),
        })
    }
}

impl SelectorEngine for ScraperEngine {
    fn query<'a>(
        &self,
        root: &Selection<'a>,
        selector: &str,
        substitutions: &SubstitutionContext,
    ) -> SelectResult<Selection<'a>> {
        let compiled = self.compile(root.first(), selector, substitutions)?;
        Ok(root
            .iter()
            .flat_map(|scope| {
                let own = compiled.matches(&scope).then_some(scope);
                own.into_iter().chain(scope.select(&compiled))
            })
            .collect())
    }

    fn matches_self(
        &self,
        node: ElementRef<'_>,
        selector: &str,
        substitutions: &SubstitutionContext,
    ) -> SelectResult<bool> {
        let compiled = self.compile(Some(node), selector, substitutions)?;
        Ok(compiled.matches(&node))
    }
}

fn match_pseudo() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\A:match\(\s*(?:'([\w:-]+)'|"([\w:-]+)"|([\w:-]+))\s*,\s*(\d+)\s*\)"#)
            .expect("static pattern is valid")
    })
}

/// Every element in the tree that owns `anchor`
fn document_elements(anchor: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let top = anchor.ancestors().last().unwrap_or(*anchor);
    top.descendants().filter_map(ElementRef::wrap).collect()
}

/// Replace each `:match('attr', N)` with an attribute-equality list.
///
/// Quoted strings are copied through untouched, so a spliced literal that
/// happens to spell `:match(...)` stays a literal.
fn expand_match(
    selector: &str,
    elements: &[ElementRef<'_>],
    substitutions: &SubstitutionContext,
) -> SelectResult<String> {
    let mut out = String::with_capacity(selector.len());
    let mut rest = selector;
    while let Some(c) = rest.chars().next() {
        let taken = if let Some(caps) = match_pseudo().captures(rest) {
            out.push_str(&expand_one(selector, &caps, elements, substitutions)?);
            caps[0].len()
        } else if c == '"' || c == '\'' {
            let len = quoted_len(rest, c);
            out.push_str(&rest[..len]);
            len
        } else {
            out.push(c);
            c.len_utf8()
        };
        rest = &rest[taken..];
    }
    Ok(out)
}

fn expand_one(
    selector: &str,
    caps: &Captures<'_>,
    elements: &[ElementRef<'_>],
    substitutions: &SubstitutionContext,
) -> SelectResult<String> {
    let attribute = caps
        .get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map_or("", |m| m.as_str());
    let index = caps[4]
        .parse::<usize>()
        .ok()
        .filter(|i| substitutions.pattern(*i).is_some())
        .ok_or_else(|| SelectError::SelectorSyntax {
            selector: selector.to_string(),
            message: format!("no pattern substituted for {}", &caps[0]),
        })?;
    Ok(attribute_alternatives(
        attribute,
        &substitutions.matching(elements, attribute, index),
    ))
}

/// Byte length of the quoted string at the start of `rest`, quotes included.
/// An unterminated string runs to the end.
fn quoted_len(rest: &str, quote: char) -> usize {
    let mut escaped = false;
    for (i, c) in rest.char_indices().skip(1) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            _ if c == quote => return i + c.len_utf8(),
            _ => {}
        }
    }
    rest.len()
}

fn attribute_alternatives(attribute: &str, matched: &[ElementRef<'_>]) -> String {
    let mut values: Vec<&str> = Vec::new();
    for value in matched.iter().filter_map(|el| el.value().attr(attribute)) {
        if !values.contains(&value) {
            values.push(value);
        }
    }
    if values.is_empty() {
        return ":not(*)".to_string();
    }
    let alternatives: Vec<String> = values
        .iter()
        .map(|value| format!("[{attribute}={}]", css_string(value)))
        .collect();
    format!(":is({})", alternatives.join(", "))
}
