//! Parsed documents that assertions run against.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use scraper::{ElementRef, Html};

use crate::selection::Selection;

/// How a response body is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Full HTML document (`html`, `head` and `body` are synthesized)
    Html,
    /// Markup parsed as a fragment; nothing is synthesized around it
    Xml,
}

impl ContentKind {
    /// Pick the parse mode from a declared content type
    #[must_use]
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.to_ascii_lowercase().contains("xml") {
            Self::Xml
        } else {
            Self::Html
        }
    }
}

/// HTML elements that never take an end tag
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta",
    "param", "source", "track",
];

fn self_closing_tag() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<([A-Za-z][\w:.-]*)((?:[^>"'/]|"[^"]*"|'[^']*'|/[^>])*?)\s*/>"#)
            .expect("static pattern is valid")
    })
}

/// Rewrite `<name .../>` as `<name ...></name>` unless `name` is void in HTML
fn open_self_closing(content: &str) -> String {
    self_closing_tag()
        .replace_all(content, |caps: &Captures<'_>| {
            let name = &caps[1];
            if VOID_ELEMENTS.iter().any(|void| void.eq_ignore_ascii_case(name)) {
                caps[0].to_string()
            } else {
                format!("<{name}{}></{name}>", &caps[2])
            }
        })
        .into_owned()
}

/// An owned markup tree
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
    kind: ContentKind,
}

impl Document {
    /// Parse raw content according to its declared content type.
    ///
    /// XML is parsed with HTML fragment rules after self-closing tags such as
    /// `<entry/>` are expanded to `<entry></entry>`; tag names are lowercased.
    #[must_use]
    pub fn parse(content: &str, content_type: &str) -> Self {
        match ContentKind::from_content_type(content_type) {
            ContentKind::Html => Self::html(content),
            ContentKind::Xml => {
                Self::fragment_of_kind(&open_self_closing(content), ContentKind::Xml)
            }
        }
    }

    /// Parse a full HTML document
    #[must_use]
    pub fn html(content: &str) -> Self {
        Self {
            html: Html::parse_document(content),
            kind: ContentKind::Html,
        }
    }

    /// Parse an HTML fragment
    #[must_use]
    pub fn fragment(content: &str) -> Self {
        Self::fragment_of_kind(content, ContentKind::Html)
    }

    fn fragment_of_kind(content: &str, kind: ContentKind) -> Self {
        Self {
            html: Html::parse_fragment(content),
            kind,
        }
    }

    /// How this document was parsed
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        self.kind
    }

    /// The underlying parsed tree
    #[must_use]
    pub const fn tree(&self) -> &Html {
        &self.html
    }

    /// The document's root element
    #[must_use]
    pub fn root_element(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// The root element as a one-node selection
    #[must_use]
    pub fn root(&self) -> Selection<'_> {
        Selection::from(self.root_element())
    }
}
