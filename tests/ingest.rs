// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use pretty_assertions::assert_eq;

use seatmap::parser::{parse_svg, NodeKind};
use seatmap::{import_svg, ParseOptions, ParserError};

fn venue_with_children(n: usize) -> String {
    let mut text = String::from("<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 10 10'>");
    for _ in 0..n {
        text.push_str("<g/>");
    }
    text.push_str("</svg>");
    text
}

#[test]
fn parse_no_svg() {
    let res = parse_svg("<rect/>");
    assert!(matches!(res, Err(ParserError::NoSvgElement)));
}

#[test]
fn parse_invalid_xml() {
    let res = parse_svg("<svg><g></svg>");
    assert!(matches!(res, Err(ParserError::RoXmlError(_))));
}

#[test]
fn viewport_1() {
    let doc = parse_svg("<svg viewBox='0 0 1200 800'/>").unwrap();
    assert_eq!(doc.viewport, Some((1200.0, 800.0)));
}

#[test]
fn missing_viewport_falls_back() {
    let venue = import_svg("<svg><g id='tickets'/><g id='masks'/></svg>", &ParseOptions::default()).unwrap();
    assert_eq!(venue.viewport, (1000.0, 1000.0));
}

#[test]
fn malformed_viewport_falls_back() {
    let doc = parse_svg("<svg viewBox='0 0 wide'/>").unwrap();
    assert_eq!(doc.viewport, None);
    assert_eq!(doc.viewport_or((5.0, 5.0)), (5.0, 5.0));
}

#[test]
fn whitespace_is_skipped() {
    let doc = parse_svg("<svg>\n  <g>\n    <rect/>\n  </g>\n</svg>").unwrap();
    assert_eq!(doc.root_children.len(), 1);
    assert_eq!(doc.root_children[0].children.len(), 1);
}

#[test]
fn text_is_kept() {
    let doc = parse_svg("<svg><text x='1'>A <tspan>12</tspan></text></svg>").unwrap();
    let text = doc.find("text").unwrap();
    assert_eq!(text.children[0].kind, NodeKind::Text);
    assert_eq!(text.first_text(), Some("A "));
    assert_eq!(text.attribute("x"), Some("1"));
}

#[test]
fn find_by_id_1() {
    let doc = parse_svg("<svg><g><g id='tickets'><g id='r1'/></g></g></svg>").unwrap();
    assert_eq!(doc.find_by_id("r1").map(|n| n.tag_name.as_str()), Some("g"));
    assert!(doc.find_by_id("r2").is_none());
}

#[test]
fn validation_valid() {
    let doc = parse_svg("<svg><g id='bg'/><g id='tickets'><g/><g/></g><g id='masks'/></svg>").unwrap();
    let v = doc.validate();
    assert!(v.is_valid());
    assert_eq!(v.to_string(), "valid");
}

#[test]
fn validation_too_many_children() {
    let doc = parse_svg(&venue_with_children(150)).unwrap();
    let v = doc.validate();
    assert!(!v.svg_grouped);
    assert!(!v.is_valid());
}

#[test]
fn validation_no_children() {
    let doc = parse_svg(&venue_with_children(0)).unwrap();
    assert!(!doc.validate().svg_grouped);
}

#[test]
fn validation_max_children() {
    let doc = parse_svg(&venue_with_children(100)).unwrap();
    assert!(doc.validate().svg_grouped);
}

#[test]
fn validation_raw_ticket_shape() {
    let doc = parse_svg("<svg><g id='tickets'><g/><rect/></g><g id='masks'/></svg>").unwrap();
    let v = doc.validate();
    assert!(!v.tickets_children_grouped);
    assert!(v.svg_grouped);
    assert_eq!(v.failures(), vec!["every child of the 'tickets' group must be a group"]);
}

#[test]
fn validation_missing_layers() {
    let doc = parse_svg("<svg><g/></svg>").unwrap();
    let v = doc.validate();
    assert!(!v.has_tickets);
    assert!(!v.has_masks);
    assert!(v.tickets_children_grouped);
}

#[test]
fn invalid_structure_still_loads() {
    let venue = import_svg("<svg><g id='tickets'><rect width='1' height='1'/></g></svg>",
                           &ParseOptions::default()).unwrap();
    assert!(!venue.validation.is_valid());
    assert_eq!(venue.tree.len(), 3);
}
