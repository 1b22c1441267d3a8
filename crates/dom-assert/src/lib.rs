//! dom-assert: CSS selector assertions for rendered HTML and XML
//!
//! Parse a response body into a [`Document`], wrap it in an
//! [`AssertContext`] and assert on what selectors match:
//!
//! ```
//! use dom_assert::prelude::*;
//!
//! let doc = Document::html("<ul><li>a</li><li>b</li></ul>");
//! let mut ctx = AssertContext::new(&doc);
//!
//! assert_select!(ctx, "li", 2).unwrap();
//! assert_select!(ctx, "li", "a").unwrap();
//! assert_not_select!(ctx, "li.error").unwrap();
//!
//! ctx.assert_select_with(args!["ul"], |ctx, _| {
//!     assert_select!(ctx, "li", 1..=2)?;
//!     Ok(())
//! })
//! .unwrap();
//! ```
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────┐   ┌────────────┐   ┌────────┐   ┌────────┐   ┌──────┐
//! │ args     │──►│ resolver   │──►│ engine │──►│ filter │──►│ size │
//! │ (Arg)    │   │ + subst.   │   │ (css)  │   │ (text) │   │      │
//! └──────────┘   └────────────┘   └────────┘   └────────┘   └──────┘
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod arg;
mod config;
mod context;
mod document;
mod engine;
mod equality;
mod filter;
mod resolver;
mod result;
mod selection;
mod size;
mod substitution;

pub use arg::Arg;
pub use config::{AssertConfig, DEFAULT_WHITESPACE_SIGNIFICANT};
pub use context::{AssertContext, ScopeGuard};
pub use document::{ContentKind, Document};
pub use engine::{ScraperEngine, SelectorEngine};
pub use equality::{normalize, Constraint, ContentCheck, EqualityOptions, Expectation, TextMatch};
pub use filter::{comparable_content, filter, Filtered};
pub use resolver::{resolve, CallKind, SelectorCall};
pub use result::{SelectError, SelectResult};
pub use selection::Selection;
pub use size::{assert_size, count_description};
pub use substitution::{css_string, placeholder_count, Substitute, SubstitutionContext, PLACEHOLDER};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::arg::*;
    pub use super::config::*;
    pub use super::context::*;
    pub use super::document::*;
    pub use super::equality::*;
    pub use super::result::*;
    pub use super::selection::*;
    pub use crate::{args, assert_not_select, assert_select, css_select};
    pub use regex::Regex;
}
