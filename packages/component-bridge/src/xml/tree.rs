//! Owned attributed element tree.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::{Captures, Regex};
use roxmltree::{Document, Node, ParsingOptions};

use crate::error::{ConfigError, Result};

/// `${name}` placeholder inside an attribute value.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static PROPERTY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));

/// Position of an element in its source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Absolute URI of the document.
    pub system_id: Arc<str>,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
}

impl Location {
    /// Create a location.
    #[must_use]
    pub fn new(system_id: impl Into<Arc<str>>, line: u32, column: u32) -> Self {
        Self {
            system_id: system_id.into(),
            line,
            column,
        }
    }

    /// Location for elements that were not read from a document.
    #[must_use]
    pub fn unknown() -> Self {
        Self::new("<unknown>", 0, 0)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.system_id, self.line, self.column)
    }
}

/// An element with its attributes and element children.
///
/// Attribute order and child order follow the source document.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    location: Location,
}

impl Element {
    /// Create an element without attributes or children.
    #[must_use]
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            location,
        }
    }

    /// Add or replace an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    /// Append a child element.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Tag name without namespace prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get an attribute value, failing with the element's location if absent.
    pub fn required_attribute(&self, name: &str) -> Result<&str> {
        self.attribute(name)
            .ok_or_else(|| ConfigError::MissingAttribute {
                element: self.name.clone(),
                attribute: name.to_string(),
                location: self.location.clone(),
            })
    }

    /// Iterate over `(name, value)` pairs in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Element children in document order.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Element children with the given tag name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Where this element was declared.
    pub fn location(&self) -> &Location {
        &self.location
    }
}

/// Replace `${name}` placeholders with values from `properties`.
///
/// Placeholders without a matching property are left as written.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
/// use component_bridge::xml::expand_properties;
///
/// let props = HashMap::from([("home".to_string(), "/srv".to_string())]);
/// assert_eq!(expand_properties("${home}/conf", &props), "/srv/conf");
/// assert_eq!(expand_properties("${other}", &props), "${other}");
/// ```
pub fn expand_properties<'v>(value: &'v str, properties: &HashMap<String, String>) -> Cow<'v, str> {
    if properties.is_empty() || !value.contains("${") {
        return Cow::Borrowed(value);
    }
    PROPERTY_PATTERN.replace_all(value, |caps: &Captures<'_>| {
        properties
            .get(&caps[1])
            .cloned()
            .unwrap_or_else(|| caps[0].to_string())
    })
}

/// Parse a document into an owned element tree.
///
/// # Arguments
/// * `text` - Document source
/// * `system_id` - Absolute URI recorded in every element's [`Location`]
/// * `properties` - Values for `${name}` expansion in attribute values
///
/// # Returns
/// The root element, or the `roxmltree` parse error
pub fn parse_document(
    text: &str,
    system_id: &str,
    properties: &HashMap<String, String>,
) -> std::result::Result<Element, roxmltree::Error> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(text, options)?;
    let system_id: Arc<str> = Arc::from(system_id);
    Ok(convert(&doc, doc.root_element(), &system_id, properties))
}

fn convert(
    doc: &Document<'_>,
    node: Node<'_, '_>,
    system_id: &Arc<str>,
    properties: &HashMap<String, String>,
) -> Element {
    let pos = doc.text_pos_at(node.range().start);

    let attributes = node
        .attributes()
        .map(|attr| {
            (
                attr.name().to_string(),
                expand_properties(attr.value(), properties).into_owned(),
            )
        })
        .collect();

    let children = node
        .children()
        .filter(|child| child.is_element())
        .map(|child| convert(doc, child, system_id, properties))
        .collect();

    Element {
        name: node.tag_name().name().to_string(),
        attributes,
        children,
        location: Location {
            system_id: Arc::clone(system_id),
            line: pos.row,
            column: pos.col,
        },
    }
}
