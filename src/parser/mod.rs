// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! SVG ingesting.
//!
//! Converts SVG text into a generic labeled tree, which is then consumed
//! by the style resolver and the mapper.

use std::collections::BTreeMap;
use std::str::FromStr;

use svgtypes::ViewBox;

use crate::error::ParserError;

pub use self::css::{StyleRule, StyleSheet};
pub use self::options::ParseOptions;
pub use self::validate::Validation;

pub mod css;
mod options;
mod validate;

/// List of generic node types.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum NodeKind {
    #[allow(missing_docs)]
    Element,
    #[allow(missing_docs)]
    Text,
}

/// A generic SVG node.
#[derive(Clone, PartialEq, Debug)]
pub struct GenericNode {
    #[allow(missing_docs)]
    pub kind: NodeKind,
    /// Local tag name. Empty for text nodes.
    pub tag_name: String,
    /// Attributes by their local names.
    pub attributes: BTreeMap<String, String>,
    #[allow(missing_docs)]
    pub children: Vec<GenericNode>,
    /// Literal value of a text node.
    pub text: Option<String>,
}

impl GenericNode {
    /// Constructs a new element node.
    pub fn element(tag_name: &str) -> GenericNode {
        GenericNode {
            kind: NodeKind::Element,
            tag_name: tag_name.to_string(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Constructs a new text node.
    pub fn text(text: &str) -> GenericNode {
        GenericNode {
            kind: NodeKind::Text,
            tag_name: String::new(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            text: Some(text.to_string()),
        }
    }

    /// Returns `true` if the node is an element with the specified tag name.
    pub fn is(&self, tag_name: &str) -> bool {
        self.kind == NodeKind::Element && self.tag_name == tag_name
    }

    #[allow(missing_docs)]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Returns an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Returns a numeric attribute value.
    ///
    /// A `px` suffix is allowed.
    pub fn number_attribute(&self, name: &str) -> Option<f64> {
        let v = self.attribute(name)?.trim();
        let v = v.strip_suffix("px").unwrap_or(v);
        match v.parse() {
            Ok(n) => Some(n),
            Err(_) => {
                warn!("Attribute '{}' has an invalid numeric value '{}'.", name, v);
                None
            }
        }
    }

    /// Returns the literal value of the first descendant text node.
    pub fn first_text(&self) -> Option<&str> {
        if let Some(ref text) = self.text {
            return Some(text);
        }

        self.children.iter().filter_map(GenericNode::first_text).next()
    }

    /// Finds the first element with the specified tag name, depth-first,
    /// including the node itself.
    pub fn find(&self, tag_name: &str) -> Option<&GenericNode> {
        if self.is(tag_name) {
            return Some(self);
        }

        self.children.iter().filter_map(|c| c.find(tag_name)).next()
    }

    /// Finds the first element with the specified `id`, depth-first,
    /// including the node itself.
    pub fn find_by_id(&self, id: &str) -> Option<&GenericNode> {
        if self.is_element() && self.attribute("id") == Some(id) {
            return Some(self);
        }

        self.children.iter().filter_map(|c| c.find_by_id(id)).next()
    }
}


/// An ingested SVG document.
#[derive(Clone, PartialEq, Debug)]
pub struct Ingested {
    /// Children of the root `svg` element.
    pub root_children: Vec<GenericNode>,
    /// Width and height of the root `viewBox`.
    pub viewport: Option<(f64, f64)>,
}

impl Ingested {
    /// Returns the viewport or the fallback.
    pub fn viewport_or(&self, fallback: (f64, f64)) -> (f64, f64) {
        self.viewport.unwrap_or(fallback)
    }

    /// Finds the first element with the specified tag name, depth-first.
    pub fn find(&self, tag_name: &str) -> Option<&GenericNode> {
        self.root_children.iter().filter_map(|c| c.find(tag_name)).next()
    }

    /// Finds the first element with the specified `id`, depth-first.
    pub fn find_by_id(&self, id: &str) -> Option<&GenericNode> {
        self.root_children.iter().filter_map(|c| c.find_by_id(id)).next()
    }

    /// Checks the venue structure.
    pub fn validate(&self) -> Validation {
        Validation::check(self)
    }
}

/// Parses SVG text into a generic tree.
///
/// Comments, processing instructions and whitespace-only text outside
/// of `text` elements are skipped.
pub fn parse_svg(text: &str) -> Result<Ingested, ParserError> {
    let ro_opt = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };

    let doc = roxmltree::Document::parse_with_options(text, ro_opt)?;
    let svg = doc.root_element();
    if svg.tag_name().name() != "svg" {
        return Err(ParserError::NoSvgElement);
    }

    let viewport = match svg.attribute("viewBox") {
        Some(value) => parse_viewport(value),
        None => {
            warn!("The root element doesn't have a 'viewBox' attribute.");
            None
        }
    };

    let mut root_children = Vec::new();
    convert_children(svg, false, &mut root_children);

    Ok(Ingested {
        root_children,
        viewport,
    })
}

fn parse_viewport(value: &str) -> Option<(f64, f64)> {
    match ViewBox::from_str(value) {
        Ok(vb) => Some((vb.w, vb.h)),
        Err(e) => {
            warn!("Invalid 'viewBox' value '{}' cause {}.", value, e);
            None
        }
    }
}

fn convert_children(parent: roxmltree::Node, in_text: bool, nodes: &mut Vec<GenericNode>) {
    for node in parent.children() {
        if node.is_element() {
            nodes.push(convert_element(node, in_text));
        } else if node.is_text() {
            let text = node.text().unwrap_or("");
            if in_text || !text.trim().is_empty() {
                nodes.push(GenericNode::text(text));
            }
        }
    }
}

fn convert_element(node: roxmltree::Node, in_text: bool) -> GenericNode {
    let tag_name = node.tag_name().name();
    let mut elem = GenericNode::element(tag_name);
    for attr in node.attributes() {
        elem.attributes.insert(attr.name().to_string(), attr.value().to_string());
    }

    let in_text = in_text || tag_name == "text";
    convert_children(node, in_text, &mut elem.children);
    elem
}
