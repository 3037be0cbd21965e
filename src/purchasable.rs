// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Purchasable status inheritance.
//!
//! Only leaves are flagged `purchasable` explicitly. A group is *implied*
//! purchasable when its own tag segment is a part of any flagged identifier.

use std::collections::HashSet;

use crate::annotate::{CodeTable, Identifier, Segment, SEPARATOR};
use crate::dom::{NodeId, Tree};

/// A set of identifier segments implied by purchasable nodes.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct PurchasableSet {
    segments: HashSet<String>,
}

impl PurchasableSet {
    /// Scans the whole tree for nodes flagged purchasable.
    ///
    /// Segments of each flagged identifier are collected, except empty ones
    /// and ones starting with an inventory code, since those mark leaves only.
    pub fn build(tree: &Tree, codes: &CodeTable) -> PurchasableSet {
        let mut segments = HashSet::new();
        for id in tree.descendants(tree.root()) {
            let p = match tree.get(id) {
                Some(p) if p.attributes.is_purchasable() => p,
                _ => continue,
            };

            let text = match p.identifier {
                Some(ref ident) => ident.render(&p.attributes, codes),
                None => continue,
            };

            for segment in text.split(SEPARATOR) {
                let is_filler = segment.chars().next().map(|c| codes.is_filler(c)).unwrap_or(true);
                if !is_filler {
                    segments.insert(segment.to_string());
                }
            }
        }

        trace!("Purchasable set: {:?}.", segments);
        PurchasableSet { segments }
    }

    /// Checks that the set contains a segment.
    pub fn contains(&self, segment: &str) -> bool {
        self.segments.contains(segment)
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Checks that the node is implied purchasable.
    ///
    /// The node key is its most specific, i.e. last, tag rendered as
    /// `<code><value>`. Untagged identifiers use the last name segment.
    /// A node without an identifier is never implied.
    pub fn is_implied(&self, tree: &Tree, codes: &CodeTable, id: NodeId) -> bool {
        match own_key(tree, codes, id) {
            Some(key) => self.contains(&key),
            None => false,
        }
    }
}

/// Checks that the node is implied purchasable.
///
/// Builds the set on each call. Use [`Session::is_implied_purchasable`]
/// for repeated lookups.
///
/// [`Session::is_implied_purchasable`]: ../dom/struct.Session.html#method.is_implied_purchasable
pub fn is_implied_purchasable(tree: &Tree, codes: &CodeTable, id: NodeId) -> bool {
    PurchasableSet::build(tree, codes).is_implied(tree, codes, id)
}

fn own_key(tree: &Tree, codes: &CodeTable, id: NodeId) -> Option<String> {
    let p = tree.get(id)?;
    let ident = p.identifier.as_ref()?;
    match ident.last_tag() {
        Some(code) => Identifier::render_segment(&Segment::Tag(code), &p.attributes, codes),
        None => ident.segments().last().and_then(|s| Identifier::render_segment(s, &p.attributes, codes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{field_key, Primitive};

    fn tagged(name: &str, tags: &[(char, &str, &str)]) -> Primitive {
        let mut p = Primitive::group();
        let mut ident = Identifier::from_name(name).unwrap();
        for &(code, field, value) in tags {
            ident.set_tag(code);
            p.attributes.insert(&field_key(field), value);
        }
        p.identifier = Some(ident);
        p
    }

    #[test]
    fn inventory_codes_are_skipped() {
        let mut tree = Tree::new();
        let root = tree.root();
        let mut seat = tagged("x", &[('Z', "zone", "A"), ('s', "seat", "1")]);
        seat.attributes.insert("purchasable", true);
        tree.append(root, seat).unwrap();

        let set = PurchasableSet::build(&tree, CodeTable::standard());
        assert!(set.contains("ZA"));
        assert!(set.contains("x"));
        assert!(!set.contains("s1"));
    }

    #[test]
    fn untagged_node() {
        let mut tree = Tree::new();
        let root = tree.root();
        let g = tree.append(root, Primitive::group()).unwrap();
        assert!(!is_implied_purchasable(&tree, CodeTable::standard(), g));
    }
}
