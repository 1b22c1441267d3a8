//! Assertion configuration.

use serde::{Deserialize, Serialize};

use crate::result::SelectResult;

/// Tags whose content is compared without trimming whitespace
pub const DEFAULT_WHITESPACE_SIGNIFICANT: [&str; 4] = ["pre", "script", "style", "textarea"];

/// Configuration shared by every assertion made through one context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssertConfig {
    /// Tag names whose text/html is compared verbatim
    pub whitespace_significant: Vec<String>,
    /// Skip (with a warning) instead of failing when a selector does not parse
    pub skip_invalid_selectors: bool,
}

impl Default for AssertConfig {
    fn default() -> Self {
        Self {
            whitespace_significant: DEFAULT_WHITESPACE_SIGNIFICANT
                .iter()
                .map(|tag| (*tag).to_string())
                .collect(),
            skip_invalid_selectors: true,
        }
    }
}

impl AssertConfig {
    /// Create a new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from YAML; missing keys keep their defaults
    ///
    /// # Errors
    ///
    /// Returns [`crate::SelectError::Config`] if the document is not valid YAML
    /// for this shape.
    pub fn from_yaml(source: &str) -> SelectResult<Self> {
        Ok(serde_yaml_ng::from_str(source)?)
    }

    /// Replace the whitespace-significant tag list
    #[must_use]
    pub fn with_whitespace_significant<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.whitespace_significant = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Control whether unparseable selectors skip or fail
    #[must_use]
    pub const fn with_skip_invalid_selectors(mut self, skip: bool) -> Self {
        self.skip_invalid_selectors = skip;
        self
    }

    /// Whether content of `tag` keeps its surrounding whitespace
    #[must_use]
    pub fn preserves_whitespace(&self, tag: &str) -> bool {
        self.whitespace_significant
            .iter()
            .any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AssertConfig::default();
        assert!(config.skip_invalid_selectors);
        for tag in ["pre", "script", "style", "textarea"] {
            assert!(config.preserves_whitespace(tag));
        }
        assert!(!config.preserves_whitespace("div"));
    }

    #[test]
    fn test_builder() {
        let config = AssertConfig::new()
            .with_whitespace_significant(["code"])
            .with_skip_invalid_selectors(false);
        assert!(config.preserves_whitespace("CODE"));
        assert!(!config.preserves_whitespace("pre"));
        assert!(!config.skip_invalid_selectors);
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = AssertConfig::from_yaml("skip_invalid_selectors: false\n").unwrap();
        assert!(!config.skip_invalid_selectors);
        assert!(config.preserves_whitespace("pre"));
    }

    #[test]
    fn test_from_yaml_tags() {
        let yaml = "whitespace_significant:\n  - pre\n  - code\n";
        let config = AssertConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.whitespace_significant, vec!["pre", "code"]);
        assert!(config.skip_invalid_selectors);
    }

    #[test]
    fn test_from_yaml_invalid() {
        let err = AssertConfig::from_yaml("skip_invalid_selectors: [1, 2").unwrap_err();
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
