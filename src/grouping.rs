// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Seat grouping heuristics.
//!
//! Everything here is a suggestion computed on demand. Nothing is stored
//! until [`apply_seat_suggestions`] is called, and even then operator
//! values are never overwritten.
//!
//! [`apply_seat_suggestions`]: fn.apply_seat_suggestions.html

use crate::annotate;
use crate::dom::{NodeId, Patch, Primitive, PrimitiveKind, Session, PURCHASABLE};
use crate::error::Error;
use crate::types::Rect;

/// The minimal amount of seat-like children of a leaf group: a shape and a label.
const MIN_SEAT_LIKE: usize = 2;

/// Maximal deviation of a seat aspect ratio from a square.
const SQUARE_TOLERANCE: f64 = 0.5;

/// A field that holds seat labels.
pub const SEAT_FIELD: &str = "seat";

/// Checks that a primitive looks like a part of a seat.
///
/// Shapes are always seat-like. Text is seat-like only when it contains a digit.
pub fn is_seat_like_leaf(p: &Primitive) -> bool {
    match p.kind() {
        PrimitiveKind::Path | PrimitiveKind::Line | PrimitiveKind::Rect | PrimitiveKind::Circle => {
            true
        }
        PrimitiveKind::Text => {
            p.text().map(|t| t.chars().any(|c| c.is_ascii_digit())).unwrap_or(false)
        }
        PrimitiveKind::Group | PrimitiveKind::Image => false,
    }
}

/// Group analysis result.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct GroupAnalysis {
    /// The group is a single purchasable unit and not a container of sub-groups.
    pub is_leaf_group: bool,
    /// The number of seat-like children.
    pub seat_like_count: usize,
}

/// Analyzes group children.
pub fn analyze_group<'a, I>(children: I) -> GroupAnalysis
    where I: IntoIterator<Item = &'a Primitive>
{
    let seat_like_count = children.into_iter().filter(|p| is_seat_like_leaf(p)).count();
    GroupAnalysis {
        is_leaf_group: seat_like_count >= MIN_SEAT_LIKE,
        seat_like_count,
    }
}

/// Analyzes children of a session node.
pub fn analyze_node(session: &Session, id: NodeId) -> GroupAnalysis {
    analyze_group(session.children(id).iter().filter_map(|c| session.get(*c)))
}

/// Checks that a bounding box is close to a square.
///
/// Degenerated boxes are never square-like.
pub fn is_square_like(rect: &Rect) -> bool {
    match rect.aspect_ratio() {
        Some(ratio) => (ratio - 1.0).abs() <= SQUARE_TOLERANCE,
        None => false,
    }
}

/// A seat suggestion.
#[derive(Clone, PartialEq, Debug)]
pub struct SeatSuggestion {
    /// A seat shape.
    pub node: NodeId,
    /// Index of the run the shape belongs to.
    ///
    /// Runs are split by text siblings.
    pub run: usize,
    /// Literal value of the first overlapping text.
    pub label: Option<String>,
}

/// Suggests seat shapes among group children.
///
/// Children are split into runs, each text sibling ends a run.
/// A shape with a square-like bounding box becomes a seat candidate.
/// The candidate label is taken from the first text descendant of the group
/// whose bounding box overlaps the candidate one.
pub fn suggest_seats(session: &Session, group: NodeId) -> Vec<SeatSuggestion> {
    let labels: Vec<(Rect, &str)> = session.descendants(group)
        .filter_map(|id| {
            let text = session.get(id)?.text()?;
            Some((session.bbox(id)?, text))
        })
        .filter(|&(_, text)| !text.trim().is_empty())
        .collect();

    let mut list = Vec::new();
    let mut run = 0;
    for &child in session.children(group) {
        let p = match session.get(child) {
            Some(p) => p,
            None => continue,
        };

        if p.is_text() {
            run += 1;
            continue;
        }

        if p.is_group() || !is_seat_like_leaf(p) {
            continue;
        }

        let bbox = match session.bbox(child) {
            Some(r) if is_square_like(&r) => r,
            _ => continue,
        };

        let label = labels.iter()
            .find(|(r, _)| r.intersects(&bbox))
            .map(|(_, text)| text.trim().to_string());

        list.push(SeatSuggestion { node: child, run, label });
    }

    list
}

/// Applies seat suggestions.
///
/// A label is written only when the seat tag is not set yet, and the
/// purchasable flag only when it's absent. Returns the number of changed nodes.
pub fn apply_seat_suggestions(session: &mut Session, list: &[SeatSuggestion]) -> Result<usize, Error> {
    let seat_key = crate::dom::field_key(SEAT_FIELD);

    let mut count = 0;
    for s in list {
        let p = session.node(s.node)?;
        let set_label = s.label.is_some() && !p.attributes.contains(&seat_key);
        let set_flag = !p.attributes.contains(PURCHASABLE);

        if let (true, Some(label)) = (set_label, s.label.as_ref()) {
            annotate::set_tag(session, s.node, SEAT_FIELD, label)?;
        }

        if set_flag {
            session.mutate(s.node, Patch::SetAttribute(PURCHASABLE.to_string(), true.into()))?;
        }

        if set_label || set_flag {
            count += 1;
        }
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Geometry;

    fn text(s: &str) -> Primitive {
        Primitive::new(Geometry::Text { text: s.to_string(), font_size: 12.0 })
    }

    #[test]
    fn seat_like_text() {
        assert!(is_seat_like_leaf(&text("A12")));
        assert!(!is_seat_like_leaf(&text("Stage")));
        assert!(!is_seat_like_leaf(&Primitive::group()));
    }

    #[test]
    fn square_like() {
        assert!(is_square_like(&Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(is_square_like(&Rect::new(0.0, 0.0, 15.0, 10.0)));
        assert!(!is_square_like(&Rect::new(0.0, 0.0, 10.0, 2.0)));
        assert!(!is_square_like(&Rect::new(0.0, 0.0, 10.0, 0.0)));
    }
}
