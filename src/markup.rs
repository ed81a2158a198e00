//! Element queries over a parsed HTML page.
//!
//! A [`Query`] describes an element by tag name, required classes and at most
//! one attribute condition. [`Page`] and [`Node`] answer "first" and "all"
//! descendant lookups for it, in document order.

use scraper::node::Element;
use scraper::{ElementRef, Html};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrMatch {
    Present(&'static str),
    Equals(&'static str, &'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    tag: &'static str,
    classes: &'static [&'static str],
    attr: Option<AttrMatch>,
}

impl Query {
    pub const fn tag(tag: &'static str) -> Self {
        Self {
            tag,
            classes: &[],
            attr: None,
        }
    }

    /// Require every listed class to be present on the element
    pub const fn with_classes(self, classes: &'static [&'static str]) -> Self {
        Self { classes, ..self }
    }

    pub const fn with_attr(self, name: &'static str, value: &'static str) -> Self {
        Self {
            attr: Some(AttrMatch::Equals(name, value)),
            ..self
        }
    }

    pub const fn having(self, name: &'static str) -> Self {
        Self {
            attr: Some(AttrMatch::Present(name)),
            ..self
        }
    }

    pub fn matches(&self, element: &Element) -> bool {
        if !element.name().eq_ignore_ascii_case(self.tag) {
            return false;
        }
        if !self
            .classes
            .iter()
            .all(|wanted| element.classes().any(|class| class == *wanted))
        {
            return false;
        }
        match self.attr {
            None => true,
            Some(AttrMatch::Present(name)) => element.attr(name).is_some(),
            Some(AttrMatch::Equals(name, value)) => element.attr(name) == Some(value),
        }
    }
}

/// A parsed HTML document
pub struct Page {
    document: Html,
}

impl Page {
    pub fn parse(markup: &str) -> Self {
        Self {
            document: Html::parse_document(markup),
        }
    }

    pub fn find(&self, query: &Query) -> Option<Node<'_>> {
        self.find_all(query).into_iter().next()
    }

    pub fn find_all(&self, query: &Query) -> Vec<Node<'_>> {
        self.document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|element| query.matches(element.value()))
            .map(|element| Node { element })
            .collect()
    }
}

/// An element inside a [`Page`]
#[derive(Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

impl<'a> Node<'a> {
    /// First matching descendant, not counting the node itself
    pub fn find(&self, query: &Query) -> Option<Node<'a>> {
        self.find_all(query).into_iter().next()
    }

    pub fn find_all(&self, query: &Query) -> Vec<Node<'a>> {
        self.element
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .filter(|element| query.matches(element.value()))
            .map(|element| Node { element })
            .collect()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Text content: every descendant text run trimmed, blanks dropped, the rest joined
    pub fn text(&self) -> String {
        self.element
            .text()
            .map(str::trim)
            .filter(|run| !run.is_empty())
            .collect()
    }
}
