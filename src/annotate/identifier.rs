// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;

use regex::Regex;

use crate::dom::{field_key, Attributes};
use super::CodeTable;

/// Identifier segments separator.
pub const SEPARATOR: char = '-';

/// A single identifier segment.
#[derive(Clone, PartialEq, Debug)]
pub enum Segment {
    /// A semantic tag. The value lives in the `field-<name>` attribute.
    Tag(char),
    /// A free-form naming segment.
    Name(String),
}

/// A structured semantic identifier.
///
/// Only the segment order and the free-form names are stored here.
/// Tag values are always read from the attributes, so the rendered string
/// can't disagree with them.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct Identifier {
    segments: Vec<Segment>,
}

impl Identifier {
    /// Constructs a new, empty identifier.
    pub fn new() -> Identifier {
        Identifier::default()
    }

    /// Constructs an identifier from a plain name.
    ///
    /// Each `-` separated part becomes a name segment. Returns `None` for an empty name.
    pub fn from_name(text: &str) -> Option<Identifier> {
        let segments: Vec<Segment> = split(text).map(|s| Segment::Name(s.to_string())).collect();
        if segments.is_empty() {
            None
        } else {
            Some(Identifier { segments })
        }
    }

    /// Reads an identifier using `attrs` as the source of truth.
    ///
    /// A `<code><value>` part becomes a tag only when the matching
    /// `field-*` attribute has exactly that value.
    pub fn reconcile(text: &str, attrs: &Attributes, codes: &CodeTable) -> Option<Identifier> {
        let mut id = Identifier::new();
        for part in split(text) {
            let tag = split_code(part).and_then(|(code, value)| {
                let entry = codes.by_code(code)?;
                let stored = attrs.get_str(&field_key(&entry.field))?;
                if stored == value && !id.has_tag(code) { Some(code) } else { None }
            });

            match tag {
                Some(code) => id.segments.push(Segment::Tag(code)),
                None => id.segments.push(Segment::Name(part.to_string())),
            }
        }

        if id.is_empty() { None } else { Some(id) }
    }

    /// Reads a legacy identifier using the identifier grammar alone.
    ///
    /// Every part that starts with a registered code becomes a tag.
    /// Returns the identifier and the extracted `(code, value)` pairs,
    /// which the caller must store as attributes.
    pub fn parse_tagged(text: &str, codes: &CodeTable) -> (Option<Identifier>, Vec<(char, String)>) {
        let mut id = Identifier::new();
        let mut tags = Vec::new();
        for part in split(text) {
            match split_code(part) {
                Some((code, value))
                    if codes.by_code(code).is_some()
                    && is_word(value)
                    && !id.has_tag(code) => {
                    id.segments.push(Segment::Tag(code));
                    tags.push((code, value.to_string()));
                }
                _ => id.segments.push(Segment::Name(part.to_string())),
            }
        }

        let id = if id.is_empty() { None } else { Some(id) };
        (id, tags)
    }

    /// Returns all segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns `true` if there are no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Checks that the identifier has a tag segment for the code.
    pub fn has_tag(&self, code: char) -> bool {
        self.segments.iter().any(|s| *s == Segment::Tag(code))
    }

    /// Checks that the identifier has a segment for the code.
    ///
    /// Unlike [`has_tag`], a name segment in the `<code><value>` form,
    /// like `ZA` from an uploaded id, counts too.
    ///
    /// [`has_tag`]: #method.has_tag
    pub fn has_segment(&self, code: char) -> bool {
        self.position(code).is_some()
    }

    /// Returns an iterator over tag codes in order.
    pub fn tags<'a>(&'a self) -> impl Iterator<Item = char> + 'a {
        self.segments.iter().filter_map(|s| match *s {
            Segment::Tag(c) => Some(c),
            Segment::Name(_) => None,
        })
    }

    /// Returns the most specific, i.e. last, tag.
    pub fn last_tag(&self) -> Option<char> {
        self.tags().last()
    }

    /// Adds a tag segment.
    ///
    /// An existing segment for the code, either a tag or a `<code><value>`
    /// name, is replaced in place. A new one is inserted right before
    /// the last segment, so the most specific part stays last.
    pub fn set_tag(&mut self, code: char) {
        match self.position(code) {
            Some(idx) => self.segments[idx] = Segment::Tag(code),
            None => {
                let idx = self.segments.len().saturating_sub(1);
                self.segments.insert(idx, Segment::Tag(code));
            }
        }
    }

    /// Removes a segment for the code, either a tag or a `<code><value>` name.
    ///
    /// Returns `false` if there was nothing to remove.
    pub fn remove_tag(&mut self, code: char) -> bool {
        match self.position(code) {
            Some(idx) => {
                self.segments.remove(idx);
                true
            }
            None => false,
        }
    }

    fn position(&self, code: char) -> Option<usize> {
        let is_named = |s: &Segment| match *s {
            Segment::Name(ref name) => match split_code(name) {
                Some((c, value)) => c == code && is_word(value),
                None => false,
            },
            Segment::Tag(_) => false,
        };

        self.segments.iter().position(|s| *s == Segment::Tag(code))
            .or_else(|| self.segments.iter().position(is_named))
    }

    /// Appends a free-form name segment.
    pub fn push_name(&mut self, name: &str) {
        for part in split(name) {
            self.segments.push(Segment::Name(part.to_string()));
        }
    }

    /// Renders a segment.
    ///
    /// Tags without a stored value render to `None`.
    pub fn render_segment(segment: &Segment, attrs: &Attributes, codes: &CodeTable) -> Option<String> {
        match *segment {
            Segment::Tag(code) => {
                let entry = codes.by_code(code)?;
                let value = attrs.get_str(&field_key(&entry.field))?;
                Some(format!("{}{}", code, value))
            }
            Segment::Name(ref name) => Some(name.clone()),
        }
    }

    /// Renders the identifier string.
    pub fn render(&self, attrs: &Attributes, codes: &CodeTable) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            if let Some(s) = Identifier::render_segment(segment, attrs, codes) {
                if !out.is_empty() {
                    out.push(SEPARATOR);
                }
                out.push_str(&s);
            }
        }

        out
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Segment::Tag(c) => write!(f, "{}", c),
            Segment::Name(ref s) => write!(f, "{}", s),
        }
    }
}


/// The identifier grammar: `^[codes]\w+(?:[-_][codes\w]\w+)*$`.
#[derive(Clone, Debug)]
pub struct IdentifierGrammar {
    full: Regex,
    segment: Regex,
}

impl IdentifierGrammar {
    /// Compiles the grammar for a code table.
    pub fn new(codes: &CodeTable) -> IdentifierGrammar {
        let alphabet = regex::escape(&codes.alphabet());
        let full = format!(r"^[{0}]\w+(?:[-_][{0}\w]\w+)*$", alphabet);
        let segment = format!(r"^([{0}])(\w+)$", alphabet);

        IdentifierGrammar {
            full: Regex::new(&full).expect("identifier regex must compile"),
            segment: Regex::new(&segment).expect("segment regex must compile"),
        }
    }

    /// Checks that the text follows the identifier grammar.
    pub fn is_match(&self, text: &str) -> bool {
        self.full.is_match(text)
    }

    /// Extracts all `<code><value>` segments.
    ///
    /// Only the first segment for each code is returned.
    pub fn extract_tags(&self, text: &str) -> Vec<(char, String)> {
        let mut tags: Vec<(char, String)> = Vec::new();
        for part in split(text) {
            let caps = match self.segment.captures(part) {
                Some(v) => v,
                None => continue,
            };

            let code = caps.get(1).and_then(|m| m.as_str().chars().next());
            let value = caps.get(2).map(|m| m.as_str());
            if let (Some(code), Some(value)) = (code, value) {
                if !tags.iter().any(|&(c, _)| c == code) {
                    tags.push((code, value.to_string()));
                }
            }
        }

        tags
    }
}

/// Encodes a tag value for storage.
///
/// Surrounding whitespace is trimmed and any other non-word character,
/// like a space, `-` or `.`, is replaced with an underscore, so the rendered
/// segment always follows the identifier grammar.
pub fn encode_value(value: &str) -> String {
    value.trim().chars().map(|c| if is_word_char(c) { c } else { '_' }).collect()
}

/// Decodes a stored tag value for display.
///
/// Only the first underscore is turned back into a space.
pub fn display_value(value: &str) -> String {
    value.replacen('_', " ", 1)
}

fn split(text: &str) -> impl Iterator<Item = &str> {
    text.split(SEPARATOR).map(str::trim).filter(|s| !s.is_empty())
}

fn split_code(part: &str) -> Option<(char, &str)> {
    let mut chars = part.chars();
    let code = chars.next()?;
    let value = chars.as_str();
    if value.is_empty() { None } else { Some((code, value)) }
}

fn is_word(s: &str) -> bool {
    s.chars().all(is_word_char)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
