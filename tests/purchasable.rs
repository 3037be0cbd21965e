// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use pretty_assertions::assert_eq;

use seatmap::annotate;
use seatmap::dom::{Geometry, Patch, PURCHASABLE};
use seatmap::purchasable::{self, PurchasableSet};
use seatmap::{CodeTable, Identifier, NodeId, Primitive, Session, Tree};

fn named(geometry: Geometry, name: &str) -> Primitive {
    let mut p = Primitive::new(geometry);
    p.identifier = Identifier::from_name(name);
    p
}

fn seat(name: &str, flagged: bool) -> Primitive {
    let mut p = named(Geometry::Rect { width: 10.0, height: 10.0, corner_radius: 0.0 }, name);
    if flagged {
        p.attributes.insert(PURCHASABLE, true);
    }
    p
}

/// `r001-ZA` with a flagged `r001-ZA-s1` seat, and an unrelated `r002-ZB` group.
fn venue() -> (Tree, NodeId, NodeId, NodeId) {
    let mut tree = Tree::new();
    let root = tree.root();
    let row = tree.append(root, named(Geometry::Group, "r001-ZA")).unwrap();
    let s1 = tree.append(row, seat("r001-ZA-s1", true)).unwrap();
    let other = tree.append(root, named(Geometry::Group, "r002-ZB")).unwrap();
    tree.append(other, seat("r002-ZB-s1", false)).unwrap();
    (tree, row, s1, other)
}

#[test]
fn implied_from_seat() {
    let (tree, row, _, other) = venue();
    let codes = CodeTable::standard();
    assert!(purchasable::is_implied_purchasable(&tree, codes, row));
    assert!(!purchasable::is_implied_purchasable(&tree, codes, other));
}

#[test]
fn seat_codes_are_filtered() {
    let (tree, ..) = venue();
    let set = PurchasableSet::build(&tree, CodeTable::standard());
    assert!(set.contains("ZA"));
    assert!(set.contains("r001"));
    assert!(!set.contains("s1"));
    assert_eq!(set.len(), 2);
}

#[test]
fn implied_from_tagged_group() {
    let (tree, row, s1, _) = venue();
    let mut session = Session::new(tree);
    annotate::import_legacy_tags(&mut session, row).unwrap();
    annotate::import_legacy_tags(&mut session, s1).unwrap();

    assert_eq!(session.identifier_string(row), Some("r001-ZA".to_string()));
    assert!(session.is_implied_purchasable(row));
    assert!(session.is_purchasable(row));
    assert!(session.is_purchasable(s1));
}

#[test]
fn session_cache_follows_flags() {
    let (tree, _, _, other) = venue();
    let mut session = Session::new(tree);
    let seat2 = session.children(other)[0];
    assert!(!session.is_implied_purchasable(other));

    session.mutate(seat2, Patch::SetAttribute(PURCHASABLE.to_string(), true.into())).unwrap();
    assert!(session.is_implied_purchasable(other));

    session.mutate(seat2, Patch::RemoveAttribute(PURCHASABLE.to_string())).unwrap();
    assert!(!session.is_implied_purchasable(other));
}

#[test]
fn session_cache_follows_removal() {
    let (tree, row, s1, _) = venue();
    let mut session = Session::new(tree);
    assert!(session.is_implied_purchasable(row));

    session.remove(s1).unwrap();
    assert!(!session.is_implied_purchasable(row));
    assert!(session.purchasable_set().is_empty());
}

#[test]
fn flag_false_is_not_purchasable() {
    let mut tree = Tree::new();
    let root = tree.root();
    let g = tree.append(root, named(Geometry::Group, "ZC")).unwrap();
    let mut s = seat("ZC-s1", false);
    s.attributes.insert(PURCHASABLE, false);
    tree.append(g, s).unwrap();

    assert!(!purchasable::is_implied_purchasable(&tree, CodeTable::standard(), g));
}

#[test]
fn no_identifier() {
    let (mut tree, ..) = venue();
    let root = tree.root();
    let g = tree.append(root, Primitive::group()).unwrap();
    assert!(!purchasable::is_implied_purchasable(&tree, CodeTable::standard(), g));
}
