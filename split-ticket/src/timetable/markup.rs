//! Owned element tree for markup-format responses.
//!
//! `sxd_document` trees borrow from their `Package` and can't be held
//! across an await, so responses are copied into a small owned tree right
//! after parsing.

use sxd_document::dom::{ChildOfElement, ChildOfRoot, Element};

use super::error::QueryError;

/// One element of a parsed markup response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkupElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<MarkupElement>,
    text: String,
}

impl MarkupElement {
    /// Parse a markup document and return its root element.
    pub fn parse(xml: &str) -> Result<Self, QueryError> {
        let package = sxd_document::parser::parse(xml).map_err(|e| {
            QueryError::protocol_with_body(format!("malformed markup: {e}"), xml)
        })?;
        let document = package.as_document();

        let root = document
            .root()
            .children()
            .into_iter()
            .find_map(|c| match c {
                ChildOfRoot::Element(e) => Some(e),
                _ => None,
            })
            .ok_or_else(|| QueryError::protocol_with_body("markup has no root element", xml))?;

        Ok(Self::from_element(root))
    }

    fn from_element(element: Element<'_>) -> Self {
        let attributes = element
            .attributes()
            .into_iter()
            .map(|a| (a.name().local_part().to_string(), a.value().to_string()))
            .collect();

        let mut children = Vec::new();
        let mut text = String::new();
        for child in element.children() {
            match child {
                ChildOfElement::Element(e) => children.push(Self::from_element(e)),
                ChildOfElement::Text(t) => text.push_str(t.text()),

                // neither children nor text
                ChildOfElement::Comment(_) => {}
                ChildOfElement::ProcessingInstruction(_) => {}
            }
        }

        Self {
            name: element.name().local_part().to_string(),
            attributes,
            children,
            text,
        }
    }

    /// Build an element by hand.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_child(mut self, child: MarkupElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct text content, trimmed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> &[MarkupElement] {
        &self.children
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&MarkupElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Elements reached by following `path` child names from this element.
    ///
    /// `root.select(&["Routes", "Stop"])` behaves like the relative path
    /// `./Routes/Stop`.
    pub fn select(&self, path: &[&str]) -> Vec<&MarkupElement> {
        let mut current = vec![self];
        for step in path {
            current = current
                .into_iter()
                .flat_map(|e| e.children.iter().filter(|c| c.name == *step))
                .collect();
        }
        current
    }
}
