//! Per-test assertion context and the nested selection scope.
//!
//! An [`AssertContext`] owns the "current selection" used by unqualified
//! selector calls. Nested assertions push their matches for the duration of
//! a callback; a [`ScopeGuard`] restores the previous scope when the
//! callback returns, fails, or panics.
//!
//! ```ignore
//! let doc = Document::html("<ul><li>a</li><li>b</li></ul>");
//! let mut ctx = AssertContext::new(&doc);
//! ctx.assert_select_with(args!["ul"], |ctx, _| {
//!     assert_select!(ctx, "li", 2)?;
//!     Ok(())
//! })?;
//! ```

use std::ops::{Deref, DerefMut};

use scraper::Node;
use tracing::{debug, warn};

use crate::arg::Arg;
use crate::config::AssertConfig;
use crate::document::{ContentKind, Document};
use crate::engine::{ScraperEngine, SelectorEngine};
use crate::filter::filter;
use crate::resolver::{resolve, resolve_target, CallKind, SelectorCall};
use crate::result::{SelectError, SelectResult};
use crate::selection::Selection;
use crate::size::assert_size;

/// Assertion state for one test
#[derive(Debug)]
pub struct AssertContext<'a> {
    document: &'a Document,
    scope: Option<Selection<'a>>,
    config: AssertConfig,
    engine: Box<dyn SelectorEngine + 'a>,
    skipped: Vec<String>,
}

impl<'a> AssertContext<'a> {
    /// Create a context over `document` with default configuration
    #[must_use]
    pub fn new(document: &'a Document) -> Self {
        Self {
            document,
            scope: None,
            config: AssertConfig::default(),
            engine: Box::new(ScraperEngine::new()),
            skipped: Vec::new(),
        }
    }

    /// Replace the configuration
    #[must_use]
    pub fn with_config(mut self, config: AssertConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the selector engine
    #[must_use]
    pub fn with_engine(mut self, engine: impl SelectorEngine + 'a) -> Self {
        self.engine = Box::new(engine);
        self
    }

    /// The document assertions run against
    #[must_use]
    pub const fn document(&self) -> &'a Document {
        self.document
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &AssertConfig {
        &self.config
    }

    /// The current nested selection, if inside a callback
    #[must_use]
    pub const fn scope(&self) -> Option<&Selection<'a>> {
        self.scope.as_ref()
    }

    /// Warnings for assertions skipped because of invalid selectors
    #[must_use]
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Run `callback` with `selection` as the current scope.
    ///
    /// The previous scope is restored however the callback exits.
    pub fn with_scope<R>(
        &mut self,
        selection: Selection<'a>,
        callback: impl FnOnce(&mut Self, &Selection<'a>) -> R,
    ) -> R {
        let mut guard = ScopeGuard::enter(self, selection.clone());
        callback(&mut *guard, &selection)
    }

    /// Select matches without asserting anything about them.
    ///
    /// Root resolution and placeholder substitution work as in
    /// [`Self::assert_select`]; no expectation or message is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::InvalidArgument`] for a malformed call and
    /// [`SelectError::SelectorSyntax`] if the selector does not parse.
    pub fn css_select(&self, args: Vec<Arg<'a>>) -> SelectResult<Selection<'a>> {
        let document = self.document;
        let target = resolve_target(args, self.scope.as_ref(), || document.root())?;
        if let Some(extra) = target.rest.front() {
            return Err(SelectError::invalid(format!(
                "css_select takes a root, a selector and its substitution values; got an extra {}",
                extra.kind()
            )));
        }
        self.engine
            .query(&target.root, &target.selector, &target.substitutions)
    }

    /// Assert that a selector matches as expected and return the matches.
    ///
    /// An invalid selector skips the assertion with a warning and returns an
    /// empty selection, unless [`AssertConfig::skip_invalid_selectors`] is off.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::AssertionFailed`] when the expectation is not
    /// met and [`SelectError::InvalidArgument`] for a malformed call.
    pub fn assert_select(&mut self, args: Vec<Arg<'a>>) -> SelectResult<Selection<'a>> {
        self.run(args, CallKind::Assert)
    }

    /// Like [`Self::assert_select`], then run `callback` scoped to the
    /// matches when there are any.
    pub fn assert_select_with<F>(
        &mut self,
        args: Vec<Arg<'a>>,
        callback: F,
    ) -> SelectResult<Selection<'a>>
    where
        F: FnOnce(&mut Self, &Selection<'a>) -> SelectResult<()>,
    {
        let matches = self.run(args, CallKind::Assert)?;
        if !matches.is_empty() {
            self.with_scope(matches.clone(), callback)?;
        }
        Ok(matches)
    }

    /// Assert that nothing matches (optionally: nothing with given content)
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::AssertionFailed`] if something matches and
    /// [`SelectError::InvalidArgument`] if a count expectation is given.
    pub fn assert_not_select(&mut self, args: Vec<Arg<'a>>) -> SelectResult<Selection<'a>> {
        self.run(args, CallKind::Refute)
    }

    /// Parse the entity-encoded text of `element` (or of the current scope)
    /// as markup and run `callback` scoped to the decoded fragment.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::InvalidArgument`] when called outside a nested
    /// assertion without an element, and propagates the callback's error.
    pub fn assert_select_encoded<F>(
        &self,
        element: Option<&Selection<'a>>,
        callback: F,
    ) -> SelectResult<()>
    where
        F: for<'f> FnOnce(&mut AssertContext<'f>, &Selection<'f>) -> SelectResult<()>,
    {
        let Some(source) = element.or(self.scope.as_ref()) else {
            return Err(SelectError::invalid(
                "Element is required when called from a non-nested assert_select_encoded",
            ));
        };

        let content: String = source
            .iter()
            .flat_map(|el| el.children())
            .filter_map(|child| match child.value() {
                Node::Text(text) if !text.trim().is_empty() => Some(String::from(&**text)),
                _ => None,
            })
            .collect();
        debug!(bytes = content.len(), "decoding encoded markup");

        let fragment = Document::fragment(&content);
        let root = fragment.root();
        let has_markup = root
            .iter()
            .any(|el| el.children().any(|child| child.value().is_element()));
        if !has_markup {
            return Err(SelectError::failed(format!(
                "Expected encoded content to contain markup, found {content:?}."
            )));
        }
        let mut nested = AssertContext::new(&fragment).with_config(self.config.clone());
        nested.with_scope(root, callback)
    }

    fn run(&mut self, args: Vec<Arg<'a>>, kind: CallKind) -> SelectResult<Selection<'a>> {
        let document = self.document;
        let call = resolve(args, kind, self.scope.as_ref(), || document.root())?;
        if selecting_no_body(document, &call) {
            debug!(selector = %call.presentation, "absence of synthesized body assumed");
            return Ok(Selection::new());
        }
        match self.check(&call) {
            Err(SelectError::SelectorSyntax { selector, message })
                if self.config.skip_invalid_selectors =>
            {
                let warning = format!(
                    "The assertion was not run because of an invalid css selector.\n{message}"
                );
                warn!(selector = %selector, "{warning}");
                self.skipped.push(warning);
                Ok(Selection::new())
            }
            other => other,
        }
    }

    fn check(&self, call: &SelectorCall<'a>) -> SelectResult<Selection<'a>> {
        let raw = self
            .engine
            .query(&call.root, &call.selector, &call.substitutions)?;
        let filtered = filter(raw, &call.constraint, &self.config);
        debug!(
            selector = %call.presentation,
            matches = filtered.selection.len(),
            "assert_select"
        );
        let message = call.message.as_deref().or(filtered.mismatch.as_deref());
        assert_size(
            filtered.selection.len(),
            &call.constraint,
            &call.presentation,
            message,
        )?;
        Ok(filtered.selection)
    }
}

/// The HTML parser always synthesizes `body`, so an absence check on it
/// passes without querying
fn selecting_no_body(document: &Document, call: &SelectorCall<'_>) -> bool {
    document.kind() == ContentKind::Html
        && call.selector.trim() == "body"
        && call.constraint.count == Some(0)
}

/// Holds a context with a pushed scope; restores the previous one on drop
#[derive(Debug)]
pub struct ScopeGuard<'c, 'a> {
    context: &'c mut AssertContext<'a>,
    saved: Option<Selection<'a>>,
}

impl<'c, 'a> ScopeGuard<'c, 'a> {
    /// Push `selection` as the current scope of `context`
    pub fn enter(context: &'c mut AssertContext<'a>, selection: Selection<'a>) -> Self {
        let saved = context.scope.replace(selection);
        Self { context, saved }
    }
}

impl<'a> Deref for ScopeGuard<'_, 'a> {
    type Target = AssertContext<'a>;

    fn deref(&self) -> &Self::Target {
        self.context
    }
}

impl DerefMut for ScopeGuard<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.context
    }
}

impl Drop for ScopeGuard<'_, '_> {
    fn drop(&mut self) {
        self.context.scope = self.saved.take();
    }
}

/// Assert a selector through a context: `assert_select!(ctx, "li", 4)`
#[macro_export]
macro_rules! assert_select {
    ($ctx:expr, $($arg:expr),+ $(,)?) => {
        $ctx.assert_select($crate::args![$($arg),+])
    };
}

/// Refute a selector through a context: `assert_not_select!(ctx, ".error")`
#[macro_export]
macro_rules! assert_not_select {
    ($ctx:expr, $($arg:expr),+ $(,)?) => {
        $ctx.assert_not_select($crate::args![$($arg),+])
    };
}

/// Select without asserting: `css_select!(ctx, "a[href=?]", "/home")`
#[macro_export]
macro_rules! css_select {
    ($ctx:expr, $($arg:expr),+ $(,)?) => {
        $ctx.css_select($crate::args![$($arg),+])
    };
}
