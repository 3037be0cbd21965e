// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use seatmap::annotate;
use seatmap::dom::{Geometry, Patch, RuntimeFlags, PURCHASABLE};
use seatmap::export::{self, ExportBundle, SerializedNode};
use seatmap::grouping;
use seatmap::{import_svg, CodeTable, ExportError, ExportOptions, Identifier, NodeId, ParseOptions, Primitive, Session, Tree};

const VENUE: &str = "
<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1000 500'>
    <style>.seat { fill: #ff0000 }</style>
    <g id='background'><rect width='1000' height='500' fill='#eeeeee'/></g>
    <g id='tickets'>
        <g id='r1'>
            <rect class='seat' x='10' y='10' width='10' height='10'/>
            <text x='12' y='18' font-size='10'>1</text>
            <rect class='seat' x='30' y='10' width='10' height='10'/>
        </g>
        <g id='r2'>
            <rect class='seat' x='10' y='40' width='10' height='10'/>
        </g>
    </g>
    <g id='masks'><rect id='ZA' width='100' height='50'/></g>
    <g id='selection'><rect width='5' height='5'/></g>
</svg>
";

struct Fixture {
    session: Session,
    row1: NodeId,
    row2: NodeId,
}

fn fixture() -> Fixture {
    let venue = import_svg(VENUE, &ParseOptions::default()).unwrap();
    let session = Session::new(venue.tree);
    let tickets = session.find_by_identifier("tickets").unwrap();
    let row1 = session.children(tickets)[0];
    let row2 = session.children(tickets)[1];
    Fixture { session, row1, row2 }
}

/// Labels seats of the first row and marks them purchasable.
fn annotated() -> Fixture {
    let mut f = fixture();
    let list = grouping::suggest_seats(&f.session, f.row1);
    grouping::apply_seat_suggestions(&mut f.session, &list).unwrap();

    let seat2 = f.session.children(f.row1)[2];
    annotate::set_tag(&mut f.session, seat2, "seat", "2").unwrap();
    f
}

fn child<'a>(node: &'a SerializedNode, path: &[usize]) -> &'a SerializedNode {
    path.iter().fold(node, |n, &i| &n.children[i])
}

#[test]
fn seats_manifest() {
    let f = annotated();
    let bundle = export::export(&f.session, &ExportOptions::default()).unwrap();

    let seats = serde_json::to_value(&bundle.seats).unwrap();
    assert_eq!(seats, json!([
        { "id": "s1", "className": "Rect", "field-seat": "1" },
        { "id": "s2", "className": "Rect", "field-seat": "2" },
    ]));
}

#[test]
fn text_is_never_a_seat() {
    let mut tree = Tree::new();
    let root = tree.root();
    let mut tickets = Primitive::group();
    tickets.identifier = Identifier::from_name("tickets");
    let tickets = tree.append(root, tickets).unwrap();
    let mut masks = Primitive::group();
    masks.identifier = Identifier::from_name("masks");
    tree.append(root, masks).unwrap();

    let mut text = Primitive::new(Geometry::Text { text: "1".to_string(), font_size: 10.0 });
    text.identifier = Identifier::from_name("label");
    text.attributes.insert(PURCHASABLE, true);
    text.attributes.insert("field-seat", "1");
    tree.append(tickets, text).unwrap();

    let mut rect = Primitive::new(Geometry::Rect { width: 5.0, height: 5.0, corner_radius: 0.0 });
    rect.identifier = Identifier::from_name("seat");
    rect.attributes.insert(PURCHASABLE, true);
    rect.attributes.insert("field-row", "3");
    tree.append(tickets, rect).unwrap();

    let bundle = export::export_tree(&tree, CodeTable::standard(), &ExportOptions::default()).unwrap();
    assert_eq!(bundle.seats.len(), 1);
    assert_eq!(serde_json::to_value(&bundle.seats[0]).unwrap(),
               json!({ "id": "seat", "className": "Rect", "field-row": "3" }));
}

#[test]
fn unavailable_fill() {
    let f = annotated();
    let bundle = export::export(&f.session, &ExportOptions::default()).unwrap();

    let fill = |path: &[usize]| child(&bundle.tickets, path).attrs.get("fill").cloned();
    assert_eq!(fill(&[0, 0]), Some(Value::from("#ff0000")));
    assert_eq!(fill(&[0, 2]), Some(Value::from("#ff0000")));
    assert_eq!(fill(&[1, 0]), Some(Value::from("#cccccc")));
    // Labels are never filled.
    assert_eq!(fill(&[0, 1]), None);
}

#[test]
fn implied_group_is_available() {
    let mut f = annotated();
    let seat = f.session.children(f.row2)[0];
    annotate::set_tag(&mut f.session, f.row2, "zone", "B").unwrap();

    // A sibling seat elsewhere makes `ZB` purchasable.
    let mut other = Primitive::new(Geometry::Rect { width: 5.0, height: 5.0, corner_radius: 0.0 });
    other.identifier = Identifier::from_name("ZB-s9");
    other.attributes.insert(PURCHASABLE, true);
    let root = f.session.root();
    f.session.append(root, other).unwrap();

    let bundle = export::export(&f.session, &ExportOptions::default()).unwrap();
    assert_eq!(child(&bundle.tickets, &[1, 0]).attrs.get("fill"), Some(&Value::from("#ff0000")));
    assert!(f.session.is_implied_purchasable(f.row2));
    assert!(!f.session.get(seat).unwrap().attributes.is_purchasable());
}

#[test]
fn editor_data_is_stripped() {
    let mut f = annotated();
    let seat = f.session.children(f.row1)[0];
    f.session.mutate(seat, Patch::SetAttribute("draggable".to_string(), true.into())).unwrap();
    f.session.mutate(seat, Patch::SetAttribute("data-price".to_string(), "10".into())).unwrap();
    f.session.mutate(seat, Patch::SetFlags(RuntimeFlags { listening: false, ..RuntimeFlags::default() })).unwrap();

    let bundle = export::export(&f.session, &ExportOptions::default()).unwrap();
    let attrs = &child(&bundle.tickets, &[0, 0]).attrs;
    assert!(!attrs.contains_key("draggable"));
    assert!(!attrs.contains_key("listening"));
    assert!(!attrs.contains_key("name"));
    assert_eq!(attrs.get("data-price"), Some(&Value::from("10")));

    let label = &child(&bundle.tickets, &[0, 1]).attrs;
    assert!(!label.contains_key("listening"));
    assert!(!label.contains_key("cache"));
}

#[test]
fn masks_layer() {
    let f = annotated();
    let bundle = export::export(&f.session, &ExportOptions::default()).unwrap();
    assert_eq!(bundle.masks.id(), Some("masks"));
    assert_eq!(child(&bundle.masks, &[0]).id(), Some("ZA"));
}

#[test]
fn layers_and_selection() {
    let f = annotated();
    let bundle = export::export(&f.session, &ExportOptions::default()).unwrap();

    assert_eq!(bundle.tickets.id(), Some("tickets"));
    assert_eq!(bundle.background.as_ref().and_then(|b| b.id()), Some("background"));

    let names: Vec<&str> = bundle.to_files().unwrap().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["seats.json", "tickets.json", "masks.json", "background.json"]);
}

#[test]
fn session_is_untouched() {
    let f = annotated();
    let before = f.session.tree().clone();
    export::export(&f.session, &ExportOptions::default()).unwrap();

    let seat = f.session.children(f.row2)[0];
    assert_eq!(f.session.get(seat).unwrap().style.fill(), Some("#ff0000"));
    for id in before.descendants(before.root()) {
        assert_eq!(f.session.get(id), before.get(id));
    }
}

#[test]
fn missing_masks() {
    let venue = import_svg("<svg><g id='tickets'><g/></g></svg>", &ParseOptions::default()).unwrap();
    let session = Session::new(venue.tree);
    let res = export::export(&session, &ExportOptions::default());
    assert!(matches!(res, Err(ExportError::MissingLayer(ref name)) if name == "masks"));
}

#[test]
fn custom_layer_names() {
    let venue = import_svg("<svg><g id='seats'><g/></g><g id='overview'/></svg>", &ParseOptions::default()).unwrap();
    let session = Session::new(venue.tree);
    let opt = ExportOptions {
        tickets_layer: "seats".to_string(),
        masks_layer: "overview".to_string(),
        ..ExportOptions::default()
    };

    let bundle = export::export(&session, &opt).unwrap();
    assert!(bundle.background.is_none());
    assert_eq!(bundle.to_files().unwrap().len(), 3);
}

#[test]
fn reload_tickets() {
    let f = annotated();
    let bundle = export::export(&f.session, &ExportOptions::default()).unwrap();
    let text = serde_json::to_string(&bundle.tickets).unwrap();

    let node: SerializedNode = serde_json::from_str(&text).unwrap();
    let tree = export::deserialize_tree(&node, CodeTable::standard()).unwrap();
    let session = Session::new(tree);

    let seat = session.find_by_identifier("s1").unwrap();
    assert_eq!(annotate::tags(&session, seat), vec![("seat".to_string(), "1".to_string())]);
    assert!(session.get(seat).unwrap().attributes.is_purchasable());
    assert_eq!(session.get(seat).unwrap().style.fill(), Some("#ff0000"));

    let row = session.children(session.root())[0];
    assert_eq!(session.children(row).len(), 3);
}

#[test]
fn bundle_file_names() {
    assert_eq!(ExportBundle::SEATS_FILE, "seats.json");
    assert_eq!(ExportBundle::MASKS_FILE, "masks.json");
}

#[test]
fn explicit_flag_wins_over_implied_group() {
    let text = "
    <svg xmlns='http://www.w3.org/2000/svg'>
        <g id='tickets'>
            <g id='ZA'>
                <rect id='ZA-s1' width='10' height='10' fill='#ff0000'/>
                <rect id='ZA-s2' x='20' width='10' height='10' fill='#ff0000'/>
                <rect id='ZA-s3' x='40' width='10' height='10' fill='#ff0000'/>
            </g>
        </g>
        <g id='masks'/>
    </svg>
    ";

    let venue = import_svg(text, &ParseOptions::default()).unwrap();
    let mut session = Session::new(venue.tree);
    let s1 = session.find_by_identifier("ZA-s1").unwrap();
    let s2 = session.find_by_identifier("ZA-s2").unwrap();
    session.mutate(s1, Patch::SetAttribute(PURCHASABLE.to_string(), true.into())).unwrap();
    session.mutate(s2, Patch::SetAttribute(PURCHASABLE.to_string(), false.into())).unwrap();

    let zone = session.find_by_identifier("ZA").unwrap();
    assert!(session.is_implied_purchasable(zone));

    let bundle = export::export(&session, &ExportOptions::default()).unwrap();
    let fill = |i: usize| child(&bundle.tickets, &[0, i]).attrs.get("fill").cloned();
    assert_eq!(fill(0), Some(Value::from("#ff0000")));
    assert_eq!(fill(1), Some(Value::from("#cccccc")));
    // No own flag, so the implied zone decides.
    assert_eq!(fill(2), Some(Value::from("#ff0000")));
}
