//! Narrowing matches by text or inner markup.

use scraper::ElementRef;

use crate::config::AssertConfig;
use crate::equality::{Constraint, ContentCheck};
use crate::selection::Selection;

/// Outcome of content filtering
#[derive(Debug, Clone, Default)]
pub struct Filtered<'a> {
    /// Elements whose content satisfied the constraint
    pub selection: Selection<'a>,
    /// Mismatch for the first rejected element, set only when nothing passed
    pub mismatch: Option<String>,
}

/// Keep the elements of `selection` whose content satisfies `constraint`.
///
/// Text takes precedence when both text and html are constrained.
#[must_use]
pub fn filter<'a>(
    selection: Selection<'a>,
    constraint: &Constraint,
    config: &AssertConfig,
) -> Filtered<'a> {
    let check = match constraint.content() {
        Some(check) if !selection.is_empty() => check,
        _ => {
            return Filtered {
                selection,
                mismatch: None,
            }
        }
    };

    let expected = check.expected();
    let mut mismatch = None;
    let kept: Selection<'a> = selection
        .into_iter()
        .filter(|node| {
            let content = comparable_content(*node, check, config);
            if expected.matches(&content) {
                return true;
            }
            if mismatch.is_none() {
                mismatch = Some(content_mismatch(&expected.to_string(), &content));
            }
            false
        })
        .collect();

    Filtered {
        mismatch: if kept.is_empty() { mismatch } else { None },
        selection: kept,
    }
}

/// Content of `node` as compared by `check`
#[must_use]
pub fn comparable_content(node: ElementRef<'_>, check: ContentCheck<'_>, config: &AssertConfig) -> String {
    let name = node.value().name();
    let mut content = match check {
        ContentCheck::Text(_) => node.text().collect::<String>(),
        ContentCheck::Html(_) => node.inner_html(),
    };
    if !config.preserves_whitespace(name) {
        content = content.trim().to_string();
    }
    if matches!(check, ContentCheck::Text(_)) && name.eq_ignore_ascii_case("textarea") {
        if let Some(stripped) = content.strip_prefix('\n') {
            content = stripped.to_string();
        }
    }
    content
}

fn content_mismatch(expected: &str, actual: &str) -> String {
    format!("<{expected}> expected but was\n<{actual}>.")
}
