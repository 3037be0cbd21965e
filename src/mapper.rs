// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Generic SVG tree to primitives conversion.

use svgtypes::PointsParser;

use crate::annotate::Identifier;
use crate::dom::{
    Geometry,
    ImageHandle,
    NodeId,
    Primitive,
    PropertyMap,
    StyleValue,
    Tree,
};
use crate::error::ParserError;
use crate::parser::{
    self,
    css,
    GenericNode,
    Ingested,
    NodeKind,
    ParseOptions,
    StyleSheet,
    Validation,
};

/// Text baseline offset relative to the font size.
const BASELINE_SHIFT: f64 = 0.8;

/// Presentation attributes that are treated as style properties.
const PRESENTATION_ATTRIBUTES: &[&str] = &[
    "fill",
    "fill-opacity",
    "fill-rule",
    "font-family",
    "font-size",
    "font-style",
    "font-weight",
    "opacity",
    "stroke",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-opacity",
    "stroke-width",
    "text-anchor",
];

/// Elements that never produce primitives and are skipped silently.
const NON_RENDERABLE: &[&str] = &["style", "defs", "title", "desc", "metadata"];

/// A mapped SVG venue.
#[derive(Clone, Debug)]
pub struct Venue {
    /// Primitives tree.
    pub tree: Tree,
    /// Root viewport. The default one is used when `viewBox` is invalid.
    pub viewport: (f64, f64),
    /// Structure checks. Failed checks don't block loading.
    pub validation: Validation,
}

/// Parses and maps an SVG venue.
///
/// Fails only on an invalid XML or a non-SVG document, so no partial tree
/// is ever returned.
pub fn import_svg(text: &str, opt: &ParseOptions) -> Result<Venue, ParserError> {
    let doc = parser::parse_svg(text)?;
    let validation = doc.validate();
    if !validation.is_valid() {
        warn!("Venue structure issues: {}.", validation);
    }

    Ok(Venue {
        tree: map_document(&doc, opt),
        viewport: doc.viewport_or(opt.default_viewport),
        validation,
    })
}

/// Maps an ingested document.
///
/// Root children are appended to the tree root in document order.
pub fn map_document(doc: &Ingested, opt: &ParseOptions) -> Tree {
    let styles = StyleSheet::from_document(doc, opt);
    let mut tree = Tree::new();
    let root = tree.root();

    let mut dropped = 0;
    for node in &doc.root_children {
        dropped += map_node(&mut tree, root, node, &styles, opt).1;
    }

    if dropped != 0 && !opt.warn_unknown_elements {
        warn!("{} unsupported elements were dropped.", dropped);
    }

    tree
}

/// Maps a generic node and its children.
///
/// Returns the new node, if any, and the number of dropped unsupported elements.
pub fn map_node(
    tree: &mut Tree,
    parent: NodeId,
    node: &GenericNode,
    styles: &StyleSheet,
    opt: &ParseOptions,
) -> (Option<NodeId>, usize) {
    if node.kind == NodeKind::Text {
        // Text outside of text elements is not rendered.
        return (None, 0);
    }

    let tag_name = node.tag_name.as_str();
    if NON_RENDERABLE.contains(&tag_name) {
        return (None, 0);
    }

    let props = resolve_style(node, styles, opt);
    let geometry = match convert_geometry(node, &props, opt) {
        Some(v) => v,
        None => {
            if opt.warn_unknown_elements {
                warn!("Unsupported element '{}'. Skipped.", tag_name);
            }
            return (None, 1);
        }
    };

    let is_group = geometry == Geometry::Group;
    let mut p = Primitive::new(geometry);
    apply_common(node, props, &mut p);

    let id = match tree.append(parent, p) {
        Ok(id) => id,
        Err(e) => {
            warn!("Failed to append '{}' cause {}.", tag_name, e);
            return (None, 0);
        }
    };

    let mut dropped = 0;
    if is_group {
        for child in &node.children {
            dropped += map_node(tree, id, child, styles, opt).1;
        }
    }

    (Some(id), dropped)
}

/// Resolves node's style.
///
/// The `style` attribute wins over presentation attributes, which win
/// over the class rules.
fn resolve_style(node: &GenericNode, styles: &StyleSheet, opt: &ParseOptions) -> PropertyMap {
    let mut props = match node.attribute("class") {
        Some(classes) => styles.resolve(classes),
        None => PropertyMap::new(),
    };

    for name in PRESENTATION_ATTRIBUTES {
        if let Some(value) = node.attribute(name) {
            props.insert(css::convert_name(name, opt), css::convert_value(name, value));
        }
    }

    if let Some(text) = node.attribute("style") {
        props.extend(css::parse_declarations(text, opt));
    }

    props
}

fn convert_geometry(node: &GenericNode, props: &PropertyMap, opt: &ParseOptions) -> Option<Geometry> {
    let num = |name: &str| node.number_attribute(name).unwrap_or(0.0);

    let geometry = match node.tag_name.as_str() {
        "g" | "svg" => Geometry::Group,
        "rect" => {
            Geometry::Rect {
                width: num("width"),
                height: num("height"),
                corner_radius: num("rx"),
            }
        }
        "circle" => Geometry::Circle { radius: num("r") },
        "path" => {
            Geometry::Path { data: node.attribute("d").unwrap_or("").to_string() }
        }
        "line" => {
            Geometry::Line {
                points: vec![num("x1"), num("y1"), num("x2"), num("y2")],
                closed: false,
            }
        }
        "polyline" | "polygon" => {
            Geometry::Line {
                points: parse_points(node.attribute("points").unwrap_or("")),
                closed: node.tag_name == "polygon",
            }
        }
        "text" | "tspan" => {
            let font_size = props.get("fontSize")
                .and_then(StyleValue::as_number)
                .unwrap_or(opt.default_font_size);

            Geometry::Text {
                text: node.first_text().unwrap_or("").trim().to_string(),
                font_size,
            }
        }
        "image" => {
            let href = node.attribute("href").unwrap_or("");
            Geometry::Image {
                handle: ImageHandle::resolve(href),
                width: node.number_attribute("width"),
                height: node.number_attribute("height"),
            }
        }
        _ => return None,
    };

    Some(geometry)
}

fn apply_common(node: &GenericNode, mut props: PropertyMap, p: &mut Primitive) {
    match node.tag_name.as_str() {
        "rect" | "text" | "tspan" | "image" => {
            p.placement.x = node.number_attribute("x").unwrap_or(0.0);
            p.placement.y = node.number_attribute("y").unwrap_or(0.0);
        }
        "circle" => {
            p.placement.x = node.number_attribute("cx").unwrap_or(0.0);
            p.placement.y = node.number_attribute("cy").unwrap_or(0.0);
        }
        _ => {}
    }

    if let Some(ts) = node.attribute("transform") {
        p.placement.apply_svg_transform(ts);
    }

    if let Geometry::Text { font_size, .. } = p.geometry {
        p.placement.y -= font_size * BASELINE_SHIFT;
        p.flags.listening = false;
        p.flags.cache = true;
        props.remove("fontSize");
    }

    if let Some(opacity) = props.remove("opacity").and_then(|v| v.as_number()) {
        p.opacity = opacity;
    }

    let display = props.remove("display");
    let visibility = props.remove("visibility");
    if display.as_ref().and_then(StyleValue::as_text) == Some("none")
        || visibility.as_ref().and_then(StyleValue::as_text) == Some("hidden")
        || node.attribute("display") == Some("none")
    {
        p.visible = false;
    }

    p.style.extend(&props);

    if let Some(id) = node.attribute("id") {
        p.identifier = Identifier::from_name(id);
    }

    if let Some(class) = node.attribute("class") {
        p.name = Some(class.to_string());
    }

    for (name, value) in &node.attributes {
        if name.starts_with("data-") {
            p.attributes.insert(name, value.as_str());
        }
    }
}

fn parse_points(text: &str) -> Vec<f64> {
    let mut points = Vec::new();
    for (x, y) in PointsParser::from(text) {
        points.push(x);
        points.push(y);
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_points_1() {
        assert_eq!(parse_points("0,0 10,0 10 10"), vec![0.0, 0.0, 10.0, 0.0, 10.0, 10.0]);
    }
}
