//! Ordered, duplicate-free sets of matched elements.

use std::collections::HashSet;

use scraper::ElementRef;

/// An ordered set of elements from one document.
///
/// Elements keep the order they were added in; adding an element that is
/// already present is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection<'a> {
    nodes: Vec<ElementRef<'a>>,
}

impl<'a> Selection<'a> {
    /// Create an empty selection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a bare list of elements, dropping duplicates
    #[must_use]
    pub fn from_nodes(nodes: Vec<ElementRef<'a>>) -> Self {
        nodes.into_iter().collect()
    }

    /// Number of elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First element, if any
    #[must_use]
    pub fn first(&self) -> Option<ElementRef<'a>> {
        self.nodes.first().copied()
    }

    /// Element at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<ElementRef<'a>> {
        self.nodes.get(index).copied()
    }

    /// Iterate over the elements in order
    pub fn iter(&self) -> impl Iterator<Item = ElementRef<'a>> + '_ {
        self.nodes.iter().copied()
    }

    /// Borrow the elements
    #[must_use]
    pub fn nodes(&self) -> &[ElementRef<'a>] {
        &self.nodes
    }

    /// Text content of each element
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.iter().map(|el| el.text().collect()).collect()
    }

    /// Whether `node` is part of this selection
    #[must_use]
    pub fn contains(&self, node: ElementRef<'_>) -> bool {
        self.nodes.iter().any(|n| n.id() == node.id())
    }
}

impl<'a> FromIterator<ElementRef<'a>> for Selection<'a> {
    fn from_iter<I: IntoIterator<Item = ElementRef<'a>>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        let nodes = iter.into_iter().filter(|el| seen.insert(el.id())).collect();
        Self { nodes }
    }
}

impl<'a> From<ElementRef<'a>> for Selection<'a> {
    fn from(node: ElementRef<'a>) -> Self {
        Self { nodes: vec![node] }
    }
}

impl<'a> From<Vec<ElementRef<'a>>> for Selection<'a> {
    fn from(nodes: Vec<ElementRef<'a>>) -> Self {
        Self::from_nodes(nodes)
    }
}

impl<'a> IntoIterator for Selection<'a> {
    type Item = ElementRef<'a>;
    type IntoIter = std::vec::IntoIter<ElementRef<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'s, 'a> IntoIterator for &'s Selection<'a> {
    type Item = &'s ElementRef<'a>;
    type IntoIter = std::slice::Iter<'s, ElementRef<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn test_duplicates_dropped_in_order() {
        let doc = Document::html("<p>a</p><p>b</p>");
        let ps: Vec<_> = doc
            .tree()
            .select(&scraper::Selector::parse("p").unwrap())
            .collect();
        let sel = Selection::from_nodes(vec![ps[1], ps[0], ps[1]]);
        assert_eq!(sel.len(), 2);
        assert_eq!(sel.texts(), vec!["b", "a"]);
    }

    #[test]
    fn test_empty() {
        let sel = Selection::new();
        assert!(sel.is_empty());
        assert!(sel.first().is_none());
    }

    #[test]
    fn test_contains() {
        let doc = Document::html("<p>a</p><span>b</span>");
        let root = doc.root_element();
        let sel = Selection::from(root);
        assert!(sel.contains(root));
        assert_eq!(sel.get(0), Some(root));
    }
}
