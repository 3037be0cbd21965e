// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Semantic tags.
//!
//! A tag is a `field-<name>` attribute plus a matching segment of the
//! node's identifier. All functions here keep both in sync.

pub use self::codes::{Code, CodeTable, CodeTableBuilder, Family};
pub use self::debounce::{DebounceOptions, TagEditDebouncer};
pub use self::identifier::{
    display_value,
    encode_value,
    Identifier,
    IdentifierGrammar,
    Segment,
    SEPARATOR,
};

mod codes;
mod debounce;
mod identifier;

use crate::dom::{field_key, NodeId, Patch, Session};
use crate::error::Error;

/// An attribute that holds the layer type classification.
pub const LAYER_TYPE: &str = "type";

/// Sets a semantic tag.
///
/// The value is encoded with [`encode_value`]. An empty value clears the tag.
/// A node without an identifier gets a new one. An existing segment for the
/// same code is replaced, even when it came from an uploaded id as a plain name.
///
/// [`encode_value`]: fn.encode_value.html
pub fn set_tag(session: &mut Session, node: NodeId, field: &str, value: &str) -> Result<(), Error> {
    let code = match session.codes().by_field(field) {
        Some(c) => c.code,
        None => return Err(Error::UnknownField(field.to_string())),
    };

    let value = encode_value(value);
    if value.is_empty() {
        clear_tag(session, node, field)?;
        return Ok(());
    }

    let key = field_key(field);
    let p = session.node(node)?;
    let mut ident = p.identifier.clone().unwrap_or_default();
    if p.attributes.get_str(&key) == Some(value.as_str()) && ident.has_tag(code) {
        return Ok(());
    }

    ident.set_tag(code);
    session.mutate(node, Patch::SetAttribute(key, value.into()))?;
    session.mutate(node, Patch::SetIdentifier(Some(ident)))?;
    Ok(())
}

/// Clears a semantic tag.
///
/// Returns `false` when there was nothing to clear, including unknown fields.
pub fn clear_tag(session: &mut Session, node: NodeId, field: &str) -> Result<bool, Error> {
    let code = match session.codes().by_field(field) {
        Some(c) => c.code,
        None => {
            debug!("Unknown field '{}'. Skipped.", field);
            return Ok(false);
        }
    };

    let key = field_key(field);
    let p = session.node(node)?;
    let has_attr = p.attributes.contains(&key);
    let has_segment = p.identifier.as_ref().map(|i| i.has_segment(code)).unwrap_or(false);
    if !has_attr && !has_segment {
        return Ok(false);
    }

    let ident = p.identifier.clone().and_then(|mut i| {
        i.remove_tag(code);
        if i.is_empty() { None } else { Some(i) }
    });

    if has_attr {
        session.mutate(node, Patch::RemoveAttribute(key))?;
    }

    if has_segment {
        session.mutate(node, Patch::SetIdentifier(ident))?;
    }

    Ok(true)
}

/// Clears a semantic tag on all descendants, deepest first, and then on the node itself.
///
/// Returns the number of cleared nodes.
pub fn cascade_clear_tag(session: &mut Session, node: NodeId, field: &str) -> Result<usize, Error> {
    session.node(node)?;

    let mut count = 0;
    for id in post_order(session, node) {
        if clear_tag(session, id, field)? {
            count += 1;
        }
    }

    Ok(count)
}

/// Changes the layer type of a node.
///
/// When the previous type names a tag field, that field is cleared on the
/// whole subtree, since it doesn't apply to the new type.
pub fn set_layer_type(session: &mut Session, node: NodeId, kind: &str) -> Result<(), Error> {
    let prev = session.node(node)?.attributes.get_str(LAYER_TYPE).map(str::to_string);
    if prev.as_ref().map(String::as_str) == Some(kind) {
        return Ok(());
    }

    if let Some(prev) = prev {
        if session.codes().by_field(&prev).is_some() {
            let n = cascade_clear_tag(session, node, &prev)?;
            debug!("Layer type changed from '{}' to '{}'. {} tags cleared.", prev, kind, n);
        }
    }

    session.mutate(node, Patch::SetAttribute(LAYER_TYPE.to_string(), kind.into()))
}

/// Returns node's tags as `(field, value)` in identifier order.
pub fn tags(session: &Session, node: NodeId) -> Vec<(String, String)> {
    let p = match session.get(node) {
        Some(p) => p,
        None => return Vec::new(),
    };

    let ident = match p.identifier {
        Some(ref i) => i,
        None => return Vec::new(),
    };

    ident.tags().filter_map(|code| {
        let entry = session.codes().by_code(code)?;
        let value = p.attributes.get_str(&field_key(&entry.field))?;
        Some((entry.field.clone(), value.to_string()))
    }).collect()
}

/// Converts a legacy identifier into tags.
///
/// Each `<code><value>` segment of the current identifier is stored as
/// a `field-*` attribute. Returns the number of imported tags.
pub fn import_legacy_tags(session: &mut Session, node: NodeId) -> Result<usize, Error> {
    let text = session.identifier_string(node).unwrap_or_default();
    let (ident, pairs) = Identifier::parse_tagged(&text, session.codes());

    let mut patches = Vec::with_capacity(pairs.len() + 1);
    for (code, value) in &pairs {
        if let Some(entry) = session.codes().by_code(*code) {
            patches.push(Patch::SetAttribute(field_key(&entry.field), value.as_str().into()));
        }
    }
    patches.push(Patch::SetIdentifier(ident));

    for patch in patches {
        session.mutate(node, patch)?;
    }

    Ok(pairs.len())
}

fn post_order(session: &Session, node: NodeId) -> Vec<NodeId> {
    let mut order = Vec::new();
    let mut stack = vec![(node, false)];
    while let Some((id, visited)) = stack.pop() {
        if visited {
            order.push(id);
        } else {
            stack.push((id, true));
            for child in session.children(id).iter().rev() {
                stack.push((*child, false));
            }
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Primitive, Tree};

    #[test]
    fn post_order_1() {
        let mut session = Session::new(Tree::new());
        let root = session.root();
        let g = session.append(root, Primitive::group()).unwrap();
        let a = session.append(g, Primitive::group()).unwrap();
        let b = session.append(g, Primitive::group()).unwrap();

        assert_eq!(post_order(&session, g), vec![a, b, g]);
    }
}
