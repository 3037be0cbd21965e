// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use simplecss::DeclarationTokenizer;
use svgtypes::Color;

use crate::dom::{PropertyMap, StyleValue};
use super::{GenericNode, Ingested, ParseOptions};

const COLOR_PROPERTIES: &[&str] = &["fill", "stroke", "color", "stop-color"];

/// A single class rule.
///
/// A rule with several class selectors is expanded into several rules
/// with the same properties.
#[derive(Clone, PartialEq, Debug)]
pub struct StyleRule {
    #[allow(missing_docs)]
    pub class_name: String,
    #[allow(missing_docs)]
    pub properties: PropertyMap,
}

/// A class name to properties mapping.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct StyleSheet {
    classes: BTreeMap<String, PropertyMap>,
}

impl StyleSheet {
    /// Parses CSS text.
    ///
    /// When a class appears in several rule blocks, properties are merged
    /// and the later block wins.
    pub fn parse(text: &str, opt: &ParseOptions) -> StyleSheet {
        let mut sheet = StyleSheet::default();
        for rule in parse_rules(text, opt) {
            sheet.classes.entry(rule.class_name).or_insert_with(PropertyMap::new)
                .extend(rule.properties);
        }

        sheet
    }

    /// Parses the first `style` element of the document, depth-first.
    ///
    /// A document without styles produces an empty sheet.
    pub fn from_document(doc: &Ingested, opt: &ParseOptions) -> StyleSheet {
        match doc.find("style") {
            Some(style) => StyleSheet::parse(&collect_text(style), opt),
            None => StyleSheet::default(),
        }
    }

    /// Returns properties of a class.
    pub fn get(&self, class_name: &str) -> Option<&PropertyMap> {
        self.classes.get(class_name)
    }

    /// Resolves a whitespace-separated `class` attribute value.
    ///
    /// Classes are applied in order, unknown classes are ignored.
    pub fn resolve(&self, classes: &str) -> PropertyMap {
        let mut props = PropertyMap::new();
        for name in classes.split_whitespace() {
            match self.get(name) {
                Some(v) => props.extend(v.iter().map(|(k, v)| (k.clone(), v.clone()))),
                None => debug!("Class '{}' is not defined.", name),
            }
        }

        props
    }

    /// Returns the number of classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if there are no classes.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Scans CSS text for class rule blocks.
pub fn parse_rules(text: &str, opt: &ParseOptions) -> Vec<StyleRule> {
    static COMMENTS: OnceLock<Regex> = OnceLock::new();
    static BLOCKS: OnceLock<Regex> = OnceLock::new();

    let comments = COMMENTS.get_or_init(|| {
        Regex::new(r"(?s)/\*.*?\*/").expect("CSS comment regex must compile")
    });
    let blocks = BLOCKS.get_or_init(|| {
        Regex::new(r"([^{}]+)\{([^}]*)\}").expect("CSS block regex must compile")
    });

    let text = comments.replace_all(text, "");

    let mut rules = Vec::new();
    for caps in blocks.captures_iter(&text) {
        let (selectors, body) = match (caps.get(1), caps.get(2)) {
            (Some(s), Some(b)) => (s.as_str(), b.as_str()),
            _ => continue,
        };

        let properties = parse_declarations(body, opt);
        for selector in selectors.split(',').map(str::trim) {
            match class_selector(selector) {
                Some(name) => {
                    rules.push(StyleRule {
                        class_name: name.to_string(),
                        properties: properties.clone(),
                    });
                }
                None => debug!("Unsupported CSS selector '{}'. Skipped.", selector),
            }
        }
    }

    rules
}

/// Parses a declarations list, like the `style` attribute value.
pub fn parse_declarations(text: &str, opt: &ParseOptions) -> PropertyMap {
    let mut props = PropertyMap::new();
    for decl in DeclarationTokenizer::from(text) {
        props.insert(convert_name(decl.name, opt), convert_value(decl.name, decl.value));
    }

    props
}

/// Converts a CSS property name.
///
/// Uses the rename table first and falls back to camelCase.
pub fn convert_name(name: &str, opt: &ParseOptions) -> String {
    if let Some(to) = opt.css_rename(name) {
        return to.to_string();
    }

    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '-' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }

    out
}

/// Converts a CSS property value.
pub fn convert_value(name: &str, value: &str) -> StyleValue {
    let value = value.trim();

    if name == "fill" && value == "none" {
        return StyleValue::Text("transparent".to_string());
    }

    if let Some(n) = parse_number(value) {
        return StyleValue::Number(n);
    }

    let parts: Vec<&str> = value.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    if parts.len() > 1 && parts.iter().all(|p| parse_number(p).is_some()) {
        return StyleValue::List(parts.iter().map(|p| normalize_number(p)).collect());
    }

    if COLOR_PROPERTIES.contains(&name) {
        match Color::from_str(value) {
            Ok(c) if c.alpha == 255 => {
                return StyleValue::Text(format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue));
            }
            Ok(_) => {}
            Err(_) => warn!("Invalid color '{}' for '{}'. Kept as is.", value, name),
        }
    }

    StyleValue::Text(value.to_string())
}

fn normalize_number(text: &str) -> String {
    let text = text.strip_suffix("px").unwrap_or(text);
    if let Some(rest) = text.strip_prefix("-.") {
        format!("-0.{}", rest)
    } else if let Some(rest) = text.strip_prefix('.') {
        format!("0.{}", rest)
    } else {
        text.to_string()
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let text = normalize_number(text);
    let is_numeric = !text.is_empty()
        && text.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-' || c == '+' || c == 'e');
    if is_numeric { text.parse().ok() } else { None }
}

fn class_selector(selector: &str) -> Option<&str> {
    let name = selector.strip_prefix('.')?;
    let is_simple = !name.is_empty()
        && name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_');
    if is_simple { Some(name) } else { None }
}

fn collect_text(node: &GenericNode) -> String {
    let mut text = String::new();
    if let Some(ref t) = node.text {
        text.push_str(t);
    }

    for child in &node.children {
        text.push_str(&collect_text(child));
    }

    text
}
