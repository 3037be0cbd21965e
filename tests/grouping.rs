// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use pretty_assertions::assert_eq;

use seatmap::annotate;
use seatmap::dom::{Geometry, Patch};
use seatmap::grouping::{self, GroupAnalysis, SeatSuggestion};
use seatmap::types::Rect;
use seatmap::{import_svg, NodeId, ParseOptions, Primitive, Session};

const ROW: &str = "
<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
    <g id='r1'>
        <rect x='10' y='10' width='10' height='10'/>
        <text x='12' y='18' font-size='10'>1</text>
        <rect x='30' y='10' width='10' height='10'/>
        <rect x='50' y='10' width='40' height='4'/>
        <g/>
    </g>
</svg>
";

fn load() -> (Session, NodeId) {
    let venue = import_svg(ROW, &ParseOptions::default()).unwrap();
    let session = Session::new(venue.tree);
    let row = session.children(session.root())[0];
    (session, row)
}

fn path() -> Primitive {
    Primitive::new(Geometry::Path { data: "M 0 0 L 1 1".to_string() })
}

#[test]
fn analyze_two_paths() {
    assert_eq!(grouping::analyze_group(&[path(), path()]),
               GroupAnalysis { is_leaf_group: true, seat_like_count: 2 });
}

#[test]
fn analyze_nested_group() {
    assert_eq!(grouping::analyze_group(&[Primitive::group()]),
               GroupAnalysis { is_leaf_group: false, seat_like_count: 0 });
}

#[test]
fn analyze_single_shape() {
    assert_eq!(grouping::analyze_group(&[path()]),
               GroupAnalysis { is_leaf_group: false, seat_like_count: 1 });
}

#[test]
fn analyze_labels() {
    let label = |s: &str| Primitive::new(Geometry::Text { text: s.to_string(), font_size: 10.0 });
    let list = [path(), label("12"), label("Exit")];
    assert_eq!(grouping::analyze_group(&list).seat_like_count, 2);
}

#[test]
fn square_like() {
    assert!(grouping::is_square_like(&Rect::new(0.0, 0.0, 10.0, 10.0)));
    assert!(!grouping::is_square_like(&Rect::new(0.0, 0.0, 10.0, 2.0)));
}

#[test]
fn analyze_row() {
    let (session, row) = load();
    assert_eq!(grouping::analyze_node(&session, row),
               GroupAnalysis { is_leaf_group: true, seat_like_count: 4 });
}

#[test]
fn suggest_row() {
    let (session, row) = load();
    let children = session.children(row).to_vec();

    assert_eq!(grouping::suggest_seats(&session, row), vec![
        SeatSuggestion { node: children[0], run: 0, label: Some("1".to_string()) },
        SeatSuggestion { node: children[2], run: 1, label: None },
    ]);
}

#[test]
fn suggestions_are_not_stored() {
    let (session, row) = load();
    let before = session.tree().clone();
    grouping::suggest_seats(&session, row);

    for id in session.descendants(session.root()) {
        assert_eq!(session.get(id), before.get(id));
    }
}

#[test]
fn apply_suggestions() {
    let (mut session, row) = load();
    let children = session.children(row).to_vec();
    let list = grouping::suggest_seats(&session, row);

    assert_eq!(grouping::apply_seat_suggestions(&mut session, &list), Ok(2));
    assert_eq!(session.identifier_string(children[0]), Some("s1".to_string()));
    assert!(session.get(children[0]).unwrap().attributes.is_purchasable());
    assert!(session.get(children[2]).unwrap().attributes.is_purchasable());
    assert_eq!(session.identifier_string(children[2]), None);

    // Nothing left to apply.
    assert_eq!(grouping::apply_seat_suggestions(&mut session, &list), Ok(0));
}

#[test]
fn operator_values_win() {
    let (mut session, row) = load();
    let children = session.children(row).to_vec();

    annotate::set_tag(&mut session, children[0], "seat", "7").unwrap();
    session.mutate(children[2], Patch::SetAttribute("purchasable".to_string(), false.into())).unwrap();

    let list = grouping::suggest_seats(&session, row);
    assert_eq!(grouping::apply_seat_suggestions(&mut session, &list), Ok(1));
    assert_eq!(session.identifier_string(children[0]), Some("s7".to_string()));
    assert_eq!(session.get(children[2]).unwrap().attributes.purchasable(), Some(false));
}

#[test]
fn moved_label() {
    let (mut session, row) = load();
    let children = session.children(row).to_vec();

    // Move the label over the second seat. The bbox cache must be dropped.
    assert!(grouping::suggest_seats(&session, row)[0].label.is_some());
    session.mutate(children[1], Patch::Move { x: 32.0, y: 10.0 }).unwrap();

    let list = grouping::suggest_seats(&session, row);
    assert_eq!(list[0].label, None);
    assert_eq!(list[1].label, Some("1".to_string()));
}
