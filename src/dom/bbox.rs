// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use svgtypes::{SimplePathSegment, SimplifyingPathParser};

use crate::types::{Rect, Transform};
use super::{Geometry, NodeId, Primitive, Tree};

/// Average glyph advance relative to the font size.
const GLYPH_WIDTH: f64 = 0.6;

/// Returns a bounding box in the primitive's own coordinates.
///
/// Groups are measured by their children.
pub fn local_bbox(tree: &Tree, id: NodeId) -> Option<Rect> {
    let p = tree.get(id)?;
    match p.geometry {
        Geometry::Group => {
            tree.children(id).iter()
                .filter_map(|c| bbox_in_parent(tree, *c))
                .fold(None, |acc: Option<Rect>, r| match acc {
                    Some(acc) => Some(acc.union(&r)),
                    None => Some(r),
                })
        }
        _ => shape_bbox(p),
    }
}

/// Returns a bounding box of a non-group primitive in its own coordinates.
pub fn shape_bbox(p: &Primitive) -> Option<Rect> {
    match p.geometry {
        Geometry::Group => None,
        Geometry::Rect { width, height, .. } => Some(Rect::new(0.0, 0.0, width, height)),
        Geometry::Circle { radius } => {
            Some(Rect::new(-radius, -radius, radius * 2.0, radius * 2.0))
        }
        Geometry::Path { ref data } => path_bbox(data),
        Geometry::Line { ref points, .. } => {
            Rect::from_points(points.chunks(2).filter(|c| c.len() == 2).map(|c| (c[0], c[1])))
        }
        Geometry::Text { ref text, font_size } => {
            let width = text.chars().count() as f64 * font_size * GLYPH_WIDTH;
            Some(Rect::new(0.0, 0.0, width, font_size))
        }
        Geometry::Image { width, height, .. } => {
            Some(Rect::new(0.0, 0.0, width?, height?))
        }
    }
}

/// Returns a bounding box in the parent's coordinates.
pub fn bbox_in_parent(tree: &Tree, id: NodeId) -> Option<Rect> {
    let p = tree.get(id)?;
    let local = local_bbox(tree, id)?;
    Some(local.transform(&p.placement.to_transform()))
}

/// Returns an accumulated transform from the root down to the node, inclusive.
pub fn absolute_transform(tree: &Tree, id: NodeId) -> Transform {
    let chain: Vec<NodeId> = tree.ancestors(id).collect();
    let mut ts = Transform::default();
    for node in chain.iter().rev() {
        if let Some(p) = tree.get(*node) {
            ts.append(&p.placement.to_transform());
        }
    }

    ts
}

/// Returns a bounding box in the root coordinates.
pub fn absolute_bbox(tree: &Tree, id: NodeId) -> Option<Rect> {
    let local = local_bbox(tree, id)?;
    Some(local.transform(&absolute_transform(tree, id)))
}

fn path_bbox(data: &str) -> Option<Rect> {
    let mut points = Vec::new();
    for segment in SimplifyingPathParser::from(data) {
        let segment = match segment {
            Ok(v) => v,
            Err(e) => {
                warn!("Invalid path data: {}.", e);
                break;
            }
        };

        match segment {
            SimplePathSegment::MoveTo { x, y } | SimplePathSegment::LineTo { x, y } => {
                points.push((x, y));
            }
            SimplePathSegment::Quadratic { x1, y1, x, y } => {
                points.push((x1, y1));
                points.push((x, y));
            }
            SimplePathSegment::CurveTo { x1, y1, x2, y2, x, y } => {
                points.push((x1, y1));
                points.push((x2, y2));
                points.push((x, y));
            }
            SimplePathSegment::ClosePath => {}
        }
    }

    Rect::from_points(points)
}
