// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Layer serialization.
//!
//! A layer is stored as nested `{ className, attrs, children }` objects.
//! Geometry, placement, style and open attributes are all flattened into `attrs`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::annotate::{CodeTable, Identifier, LAYER_TYPE};
use crate::dom::{
    AttrValue,
    Geometry,
    ImageHandle,
    NodeId,
    Primitive,
    PrimitiveKind,
    RuntimeFlags,
    StyleValue,
    Tree,
    FIELD_PREFIX,
    PURCHASABLE,
};
use crate::error::ExportError;

/// A serialized primitive.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SerializedNode {
    /// Primitive class name, like `Rect` or `Group`.
    #[serde(rename = "className")]
    pub class_name: String,
    #[allow(missing_docs)]
    #[serde(default)]
    pub attrs: Map<String, Value>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SerializedNode>,
}

impl SerializedNode {
    /// Returns the `id` attribute.
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").and_then(Value::as_str)
    }
}

/// Serializes a node with all its descendants.
pub fn serialize_subtree(tree: &Tree, id: NodeId, codes: &CodeTable) -> Option<SerializedNode> {
    let p = tree.get(id)?;
    let children = tree.children(id).iter()
        .filter_map(|c| serialize_subtree(tree, *c, codes))
        .collect();

    Some(SerializedNode {
        class_name: p.kind().class_name().to_string(),
        attrs: serialize_primitive(p, codes),
        children,
    })
}

/// Serializes primitive's attributes.
///
/// Default values are omitted.
pub fn serialize_primitive(p: &Primitive, codes: &CodeTable) -> Map<String, Value> {
    let mut attrs = Map::new();

    if let Some(ref ident) = p.identifier {
        let id = ident.render(&p.attributes, codes);
        if !id.is_empty() {
            attrs.insert("id".into(), id.into());
        }
    }

    if let Some(ref name) = p.name {
        attrs.insert("name".into(), name.as_str().into());
    }

    let pl = &p.placement;
    insert_number(&mut attrs, "x", pl.x, 0.0);
    insert_number(&mut attrs, "y", pl.y, 0.0);
    insert_number(&mut attrs, "rotation", pl.rotation, 0.0);
    insert_number(&mut attrs, "scaleX", pl.scale_x, 1.0);
    insert_number(&mut attrs, "scaleY", pl.scale_y, 1.0);
    insert_number(&mut attrs, "skewX", pl.skew_x, 0.0);
    insert_number(&mut attrs, "skewY", pl.skew_y, 0.0);
    insert_number(&mut attrs, "opacity", p.opacity, 1.0);

    match p.geometry {
        Geometry::Group => {}
        Geometry::Rect { width, height, corner_radius } => {
            attrs.insert("width".into(), width.into());
            attrs.insert("height".into(), height.into());
            insert_number(&mut attrs, "cornerRadius", corner_radius, 0.0);
        }
        Geometry::Circle { radius } => {
            attrs.insert("radius".into(), radius.into());
        }
        Geometry::Path { ref data } => {
            attrs.insert("data".into(), data.as_str().into());
        }
        Geometry::Line { ref points, closed } => {
            attrs.insert("points".into(), points.clone().into());
            if closed {
                attrs.insert("closed".into(), true.into());
            }
        }
        Geometry::Text { ref text, font_size } => {
            attrs.insert("text".into(), text.as_str().into());
            attrs.insert("fontSize".into(), font_size.into());
        }
        Geometry::Image { ref handle, width, height } => {
            attrs.insert("image".into(), handle.href().into());
            if let Some(w) = width {
                attrs.insert("width".into(), w.into());
            }
            if let Some(h) = height {
                attrs.insert("height".into(), h.into());
            }
        }
    }

    if !p.visible {
        attrs.insert("visible".into(), false.into());
    }

    let d = RuntimeFlags::default();
    insert_flag(&mut attrs, "listening", p.flags.listening, d.listening);
    insert_flag(&mut attrs, "hitEnabled", p.flags.hit_enabled, d.hit_enabled);
    insert_flag(&mut attrs, "perfectDrawEnabled", p.flags.perfect_draw, d.perfect_draw);
    insert_flag(&mut attrs, "shadowForStrokeEnabled", p.flags.shadow_for_stroke, d.shadow_for_stroke);
    insert_flag(&mut attrs, "cache", p.flags.cache, d.cache);

    for (name, value) in p.style.iter() {
        attrs.insert(name.clone(), style_to_json(value));
    }

    for (name, value) in p.attributes.iter() {
        attrs.insert(name.clone(), attr_to_json(value));
    }

    attrs
}

/// Loads a serialized subtree as the last child of `parent`.
pub fn deserialize_into(
    tree: &mut Tree,
    parent: NodeId,
    node: &SerializedNode,
    codes: &CodeTable,
) -> Result<NodeId, ExportError> {
    let p = deserialize_primitive(node, codes)?;
    let id = tree.append(parent, p)?;
    for child in &node.children {
        deserialize_into(tree, id, child, codes)?;
    }

    Ok(id)
}

/// Loads a serialized subtree as a new tree. The node becomes the root.
pub fn deserialize_tree(node: &SerializedNode, codes: &CodeTable) -> Result<Tree, ExportError> {
    let mut tree = Tree::with_root(deserialize_primitive(node, codes)?);
    let root = tree.root();
    for child in &node.children {
        deserialize_into(&mut tree, root, child, codes)?;
    }

    Ok(tree)
}

/// Builds a primitive from a serialized node, without children.
///
/// `field-*`, `data-*`, `purchasable` and `type` are loaded as attributes,
/// unknown keys as style properties. The identifier is rebuilt with the
/// `field-*` attributes as the source of truth.
pub fn deserialize_primitive(node: &SerializedNode, codes: &CodeTable) -> Result<Primitive, ExportError> {
    let kind = PrimitiveKind::from_class_name(&node.class_name)
        .ok_or_else(|| ExportError::UnknownClass(node.class_name.clone()))?;

    let attrs = &node.attrs;
    let num = |name: &str| attrs.get(name).and_then(Value::as_f64);
    let boolean = |name: &str| attrs.get(name).and_then(Value::as_bool);

    let geometry = match kind {
        PrimitiveKind::Group => Geometry::Group,
        PrimitiveKind::Rect => {
            Geometry::Rect {
                width: num("width").unwrap_or(0.0),
                height: num("height").unwrap_or(0.0),
                corner_radius: num("cornerRadius").unwrap_or(0.0),
            }
        }
        PrimitiveKind::Circle => Geometry::Circle { radius: num("radius").unwrap_or(0.0) },
        PrimitiveKind::Path => {
            let data = attrs.get("data").and_then(Value::as_str).unwrap_or("");
            Geometry::Path { data: data.to_string() }
        }
        PrimitiveKind::Line => {
            let points = match attrs.get("points") {
                Some(Value::Array(list)) => list.iter().filter_map(Value::as_f64).collect(),
                _ => Vec::new(),
            };

            Geometry::Line { points, closed: boolean("closed").unwrap_or(false) }
        }
        PrimitiveKind::Text => {
            Geometry::Text {
                text: attrs.get("text").and_then(Value::as_str).unwrap_or("").to_string(),
                font_size: num("fontSize").unwrap_or(12.0),
            }
        }
        PrimitiveKind::Image => {
            let href = attrs.get("image").and_then(Value::as_str).unwrap_or("");
            Geometry::Image {
                handle: ImageHandle::resolve(href),
                width: num("width"),
                height: num("height"),
            }
        }
    };

    let mut p = Primitive::new(geometry);
    p.placement.x = num("x").unwrap_or(0.0);
    p.placement.y = num("y").unwrap_or(0.0);
    p.placement.rotation = num("rotation").unwrap_or(0.0);
    p.placement.scale_x = num("scaleX").unwrap_or(1.0);
    p.placement.scale_y = num("scaleY").unwrap_or(1.0);
    p.placement.skew_x = num("skewX").unwrap_or(0.0);
    p.placement.skew_y = num("skewY").unwrap_or(0.0);
    p.opacity = num("opacity").unwrap_or(1.0);
    p.visible = boolean("visible").unwrap_or(true);
    p.name = attrs.get("name").and_then(Value::as_str).map(str::to_string);

    let defaults = RuntimeFlags::default();
    p.flags = RuntimeFlags {
        listening: boolean("listening").unwrap_or(defaults.listening),
        hit_enabled: boolean("hitEnabled").unwrap_or(defaults.hit_enabled),
        perfect_draw: boolean("perfectDrawEnabled").unwrap_or(defaults.perfect_draw),
        shadow_for_stroke: boolean("shadowForStrokeEnabled").unwrap_or(defaults.shadow_for_stroke),
        cache: boolean("cache").unwrap_or(defaults.cache),
    };

    for (name, value) in attrs {
        if is_reserved(kind, name) {
            continue;
        }

        if is_attribute(name) {
            if let Some(v) = json_to_attr(value) {
                p.attributes.insert(name, v);
            }
        } else if let Some(v) = json_to_style(value) {
            p.style.set(name, v);
        } else {
            debug!("Unsupported value of '{}' in {}. Skipped.", name, node.class_name);
        }
    }

    if let Some(id) = node.id() {
        p.identifier = Identifier::reconcile(id, &p.attributes, codes);
    }

    Ok(p)
}

fn insert_number(attrs: &mut Map<String, Value>, name: &str, v: f64, default: f64) {
    if v != default {
        attrs.insert(name.to_string(), v.into());
    }
}

fn insert_flag(attrs: &mut Map<String, Value>, name: &str, v: bool, default: bool) {
    if v != default {
        attrs.insert(name.to_string(), v.into());
    }
}

fn is_attribute(name: &str) -> bool {
    name.starts_with(FIELD_PREFIX)
        || name.starts_with("data-")
        || name == PURCHASABLE
        || name == LAYER_TYPE
}

fn is_reserved(kind: PrimitiveKind, name: &str) -> bool {
    let common = [
        "id", "name", "x", "y", "rotation", "scaleX", "scaleY", "skewX", "skewY",
        "opacity", "visible", "listening", "hitEnabled", "perfectDrawEnabled",
        "shadowForStrokeEnabled", "cache",
    ];

    if common.contains(&name) {
        return true;
    }

    let geometry: &[&str] = match kind {
        PrimitiveKind::Group => &[],
        PrimitiveKind::Rect => &["width", "height", "cornerRadius"],
        PrimitiveKind::Circle => &["radius"],
        PrimitiveKind::Path => &["data"],
        PrimitiveKind::Line => &["points", "closed"],
        PrimitiveKind::Text => &["text", "fontSize"],
        PrimitiveKind::Image => &["image", "width", "height"],
    };

    geometry.contains(&name)
}

fn style_to_json(value: &StyleValue) -> Value {
    match *value {
        StyleValue::Number(n) => n.into(),
        StyleValue::Text(ref s) => s.as_str().into(),
        StyleValue::List(ref list) => list.clone().into(),
    }
}

fn json_to_style(value: &Value) -> Option<StyleValue> {
    match *value {
        Value::Number(ref n) => n.as_f64().map(StyleValue::Number),
        Value::String(ref s) => Some(StyleValue::Text(s.clone())),
        Value::Array(ref list) => {
            let list = list.iter().map(|v| match *v {
                Value::String(ref s) => Some(s.clone()),
                Value::Number(ref n) => Some(n.to_string()),
                _ => None,
            }).collect::<Option<Vec<_>>>()?;
            Some(StyleValue::List(list))
        }
        _ => None,
    }
}

fn attr_to_json(value: &AttrValue) -> Value {
    match *value {
        AttrValue::Bool(b) => b.into(),
        AttrValue::Number(n) => n.into(),
        AttrValue::String(ref s) => s.as_str().into(),
    }
}

fn json_to_attr(value: &Value) -> Option<AttrValue> {
    match *value {
        Value::Bool(b) => Some(AttrValue::Bool(b)),
        Value::Number(ref n) => n.as_f64().map(AttrValue::Number),
        Value::String(ref s) => Some(AttrValue::String(s.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reload_rect() {
        let codes = CodeTable::standard();
        let mut p = Primitive::new(Geometry::Rect { width: 10.0, height: 5.0, corner_radius: 0.0 });
        p.placement.x = 3.0;
        p.style.set("fill", "#ff0000");
        p.attributes.insert("field-seat", "4");
        p.attributes.insert("purchasable", true);
        let mut ident = Identifier::from_name("r1").unwrap();
        ident.set_tag('s');
        p.identifier = Some(ident);

        let mut tree = Tree::new();
        let root = tree.root();
        let id = tree.append(root, p.clone()).unwrap();

        let node = serialize_subtree(&tree, id, codes).unwrap();
        assert_eq!(node.id(), Some("s4-r1"));
        assert_eq!(node.attrs.get("width"), Some(&Value::from(10.0)));
        assert_eq!(node.attrs.get("cornerRadius"), None);

        assert_eq!(deserialize_primitive(&node, codes).unwrap(), p);
    }

    #[test]
    fn unknown_class() {
        let node = SerializedNode {
            class_name: "Star".to_string(),
            attrs: Map::new(),
            children: Vec::new(),
        };

        match deserialize_primitive(&node, CodeTable::standard()) {
            Err(ExportError::UnknownClass(ref name)) => assert_eq!(name, "Star"),
            _ => panic!("must fail"),
        }
    }
}
