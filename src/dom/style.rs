// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};

/// A resolved style property value.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    /// A numeric value with units stripped.
    Number(f64),
    /// A keyword, color or any other text.
    Text(String),
    /// A whitespace or comma separated list, like `stroke-dasharray`.
    List(Vec<String>),
}

impl StyleValue {
    /// Returns a number.
    pub fn as_number(&self) -> Option<f64> {
        match *self {
            StyleValue::Number(n) => Some(n),
            StyleValue::Text(ref s) => s.parse().ok(),
            StyleValue::List(_) => None,
        }
    }

    /// Returns a text.
    pub fn as_text(&self) -> Option<&str> {
        match *self {
            StyleValue::Text(ref s) => Some(s),
            _ => None,
        }
    }
}

impl<'a> From<&'a str> for StyleValue {
    fn from(v: &'a str) -> Self {
        StyleValue::Text(v.to_string())
    }
}

impl From<f64> for StyleValue {
    fn from(v: f64) -> Self {
        StyleValue::Number(v)
    }
}

/// A flat property map, keyed by the mapper naming convention (`strokeWidth`, `dash`, ...).
pub type PropertyMap = BTreeMap<String, StyleValue>;

/// Resolved visual properties of a primitive.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct Style(PropertyMap);

impl Style {
    /// Constructs a new, empty style.
    pub fn new() -> Style {
        Style(BTreeMap::new())
    }

    /// Returns a property.
    pub fn get(&self, name: &str) -> Option<&StyleValue> {
        self.0.get(name)
    }

    /// Sets a property.
    pub fn set<V: Into<StyleValue>>(&mut self, name: &str, value: V) {
        self.0.insert(name.to_string(), value.into());
    }

    /// Removes a property.
    pub fn remove(&mut self, name: &str) -> Option<StyleValue> {
        self.0.remove(name)
    }

    /// Copies all properties from `props`, replacing existing ones.
    pub fn extend(&mut self, props: &PropertyMap) {
        for (k, v) in props {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Returns an iterator over properties.
    pub fn iter(&self) -> btree_map::Iter<String, StyleValue> {
        self.0.iter()
    }

    /// Returns `true` if there are no properties.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the fill color.
    pub fn fill(&self) -> Option<&str> {
        self.get("fill").and_then(StyleValue::as_text)
    }

    /// Returns the stroke color.
    pub fn stroke(&self) -> Option<&str> {
        self.get("stroke").and_then(StyleValue::as_text)
    }

    /// Returns the stroke width.
    pub fn stroke_width(&self) -> Option<f64> {
        self.get("strokeWidth").and_then(StyleValue::as_number)
    }

    /// Returns the font size.
    pub fn font_size(&self) -> Option<f64> {
        self.get("fontSize").and_then(StyleValue::as_number)
    }
}
