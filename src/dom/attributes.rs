// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix of the semantic tag attributes.
pub const FIELD_PREFIX: &str = "field-";

/// Name of the purchasable flag attribute.
pub const PURCHASABLE: &str = "purchasable";

/// A value of an open attribute.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    #[allow(missing_docs)]
    Bool(bool),
    #[allow(missing_docs)]
    Number(f64),
    #[allow(missing_docs)]
    String(String),
}

impl AttrValue {
    /// Returns a string value.
    pub fn as_str(&self) -> Option<&str> {
        match *self {
            AttrValue::String(ref s) => Some(s),
            _ => None,
        }
    }

    /// Returns a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            AttrValue::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Number(n) => write!(f, "{}", n),
            AttrValue::String(ref s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Number(v)
    }
}

impl<'a> From<&'a str> for AttrValue {
    fn from(v: &'a str) -> Self {
        AttrValue::String(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::String(v)
    }
}


/// An open attributes map.
///
/// Holds semantic tags (`field-*`), the `purchasable` flag and any other
/// operator or backend supplied data.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct Attributes(BTreeMap<String, AttrValue>);

impl Attributes {
    /// Constructs a new, empty attributes map.
    pub fn new() -> Attributes {
        Attributes(BTreeMap::new())
    }

    /// Returns an optional reference to the value.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0.get(name)
    }

    /// Returns a string value.
    #[inline]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttrValue::as_str)
    }

    /// Inserts a new attribute. Previous value will be replaced.
    #[inline]
    pub fn insert<V: Into<AttrValue>>(&mut self, name: &str, value: V) {
        self.0.insert(name.to_string(), value.into());
    }

    /// Removes an existing attribute.
    #[inline]
    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        self.0.remove(name)
    }

    /// Checks that the map contains an attribute.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns an iterator over attributes.
    #[inline]
    pub fn iter(&self) -> btree_map::Iter<String, AttrValue> {
        self.0.iter()
    }

    /// Retains only the attributes specified by the predicate.
    #[inline]
    pub fn retain<F>(&mut self, mut f: F)
        where F: FnMut(&str, &AttrValue) -> bool
    {
        let keys: Vec<String> = self.0.iter()
            .filter(|&(k, v)| !f(k, v))
            .map(|(k, _)| k.clone())
            .collect();

        for k in keys {
            self.0.remove(&k);
        }
    }

    /// Returns an iterator over semantic tag attributes as `(field, value)`.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().filter_map(|(k, v)| {
            let field = k.strip_prefix(FIELD_PREFIX)?;
            Some((field, v.as_str()?))
        })
    }

    /// Returns the `purchasable` flag, if set.
    pub fn purchasable(&self) -> Option<bool> {
        match self.get(PURCHASABLE)? {
            AttrValue::Bool(b) => Some(*b),
            AttrValue::String(ref s) => Some(s == "true"),
            AttrValue::Number(n) => Some(*n != 0.0),
        }
    }

    /// Returns `true` if the `purchasable` flag is explicitly set to `true`.
    pub fn is_purchasable(&self) -> bool {
        self.purchasable() == Some(true)
    }

    /// Returns the number of attributes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no attributes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Returns the attribute name of a semantic field.
pub fn field_key(field: &str) -> String {
    format!("{}{}", FIELD_PREFIX, field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_1() {
        let mut attrs = Attributes::new();
        attrs.insert("field-row", "12");
        attrs.insert("field-seat", "4");
        attrs.insert("purchasable", true);
        attrs.insert("type", "seat");

        let fields: Vec<_> = attrs.fields().collect();
        assert_eq!(fields, vec![("row", "12"), ("seat", "4")]);
        assert!(attrs.is_purchasable());
    }

    #[test]
    fn retain_1() {
        let mut attrs = Attributes::new();
        attrs.insert("a", 1.0);
        attrs.insert("b", "x");
        attrs.retain(|k, _| k != "a");
        assert!(!attrs.contains("a"));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn purchasable_from_string() {
        let mut attrs = Attributes::new();
        attrs.insert("purchasable", "true");
        assert_eq!(attrs.purchasable(), Some(true));
    }
}
