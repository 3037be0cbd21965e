// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;

use crate::annotate::Identifier;
use crate::types::Placement;
use super::{Attributes, Style};

/// List of supported primitive variants.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PrimitiveKind {
    /// A container of other primitives.
    Group,
    /// A rectangle, optionally with rounded corners.
    Rect,
    /// A circle.
    Circle,
    /// A path with the raw SVG path data.
    Path,
    /// An open polyline or a closed polygon.
    Line,
    /// A text label.
    Text,
    /// A raster or vector image.
    Image,
}

impl PrimitiveKind {
    /// Returns a class name used in serialized layers.
    pub fn class_name(&self) -> &'static str {
        match *self {
            PrimitiveKind::Group => "Group",
            PrimitiveKind::Rect => "Rect",
            PrimitiveKind::Circle => "Circle",
            PrimitiveKind::Path => "Path",
            PrimitiveKind::Line => "Line",
            PrimitiveKind::Text => "Text",
            PrimitiveKind::Image => "Image",
        }
    }

    /// Parses a class name.
    ///
    /// `Layer` and `Shape` are accepted as aliases of `Group` and `Line`.
    pub fn from_class_name(name: &str) -> Option<PrimitiveKind> {
        Some(match name {
            "Group" | "Layer" => PrimitiveKind::Group,
            "Rect" => PrimitiveKind::Rect,
            "Circle" => PrimitiveKind::Circle,
            "Path" => PrimitiveKind::Path,
            "Line" | "Shape" => PrimitiveKind::Line,
            "Text" => PrimitiveKind::Text,
            "Image" => PrimitiveKind::Image,
            _ => return None,
        })
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.class_name())
    }
}


/// A resolved image reference.
///
/// The image itself is loaded by a renderer.
#[derive(Clone, PartialEq, Debug)]
pub enum ImageHandle {
    /// An inline `data:` URI.
    Inline {
        /// Media type, like `image/png`.
        mime: String,
        /// The whole URI.
        uri: String,
    },
    /// An external URL or path.
    External(String),
}

impl ImageHandle {
    /// Resolves an `href` value.
    pub fn resolve(href: &str) -> ImageHandle {
        let href = href.trim();
        match href.strip_prefix("data:") {
            Some(rest) => {
                let mime = rest.split(|c: char| c == ';' || c == ',').next().unwrap_or("");
                ImageHandle::Inline {
                    mime: mime.to_string(),
                    uri: href.to_string(),
                }
            }
            None => ImageHandle::External(href.to_string()),
        }
    }

    /// Returns the original `href`.
    pub fn href(&self) -> &str {
        match *self {
            ImageHandle::Inline { ref uri, .. } => uri,
            ImageHandle::External(ref url) => url,
        }
    }
}


/// Variant specific geometry.
#[derive(Clone, PartialEq, Debug)]
pub enum Geometry {
    #[allow(missing_docs)]
    Group,
    #[allow(missing_docs)]
    Rect {
        width: f64,
        height: f64,
        corner_radius: f64,
    },
    #[allow(missing_docs)]
    Circle {
        radius: f64,
    },
    /// Path data is stored verbatim.
    Path {
        #[allow(missing_docs)]
        data: String,
    },
    /// Flat list of `x y` pairs.
    Line {
        #[allow(missing_docs)]
        points: Vec<f64>,
        /// Polygons are closed by the draw routine.
        closed: bool,
    },
    #[allow(missing_docs)]
    Text {
        text: String,
        font_size: f64,
    },
    #[allow(missing_docs)]
    Image {
        handle: ImageHandle,
        width: Option<f64>,
        height: Option<f64>,
    },
}

impl Geometry {
    /// Returns a primitive variant of the geometry.
    pub fn kind(&self) -> PrimitiveKind {
        match *self {
            Geometry::Group => PrimitiveKind::Group,
            Geometry::Rect { .. } => PrimitiveKind::Rect,
            Geometry::Circle { .. } => PrimitiveKind::Circle,
            Geometry::Path { .. } => PrimitiveKind::Path,
            Geometry::Line { .. } => PrimitiveKind::Line,
            Geometry::Text { .. } => PrimitiveKind::Text,
            Geometry::Image { .. } => PrimitiveKind::Image,
        }
    }
}


/// A single step of a custom draw routine.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub enum DrawCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    ClosePath,
}


/// Editor and renderer flags.
///
/// None of them are part of the exported data.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RuntimeFlags {
    /// The primitive receives pointer events.
    pub listening: bool,
    /// The primitive takes part in hit-testing.
    pub hit_enabled: bool,
    /// Render with an extra buffer for exact stroke/fill blending.
    pub perfect_draw: bool,
    /// Render stroke shadows.
    pub shadow_for_stroke: bool,
    /// Rasterize once and reuse the bitmap.
    pub cache: bool,
}

impl Default for RuntimeFlags {
    fn default() -> RuntimeFlags {
        RuntimeFlags {
            listening: true,
            hit_enabled: true,
            perfect_draw: true,
            shadow_for_stroke: true,
            cache: false,
        }
    }
}


/// A typed drawing node.
#[derive(Clone, PartialEq, Debug)]
pub struct Primitive {
    /// Variant specific geometry.
    pub geometry: Geometry,
    /// Position, rotation, scale and skew.
    pub placement: Placement,
    /// Resolved visual properties.
    pub style: Style,
    /// Open attributes: semantic tags, flags, backend data.
    pub attributes: Attributes,
    /// Structured semantic identifier.
    pub identifier: Option<Identifier>,
    /// Class metadata copied from the source `class` attribute.
    pub name: Option<String>,
    /// Editor and renderer flags.
    pub flags: RuntimeFlags,
    #[allow(missing_docs)]
    pub opacity: f64,
    #[allow(missing_docs)]
    pub visible: bool,
}

impl Primitive {
    /// Constructs a new primitive with default placement and style.
    pub fn new(geometry: Geometry) -> Primitive {
        Primitive {
            geometry,
            placement: Placement::default(),
            style: Style::new(),
            attributes: Attributes::new(),
            identifier: None,
            name: None,
            flags: RuntimeFlags::default(),
            opacity: 1.0,
            visible: true,
        }
    }

    /// Constructs a new group.
    pub fn group() -> Primitive {
        Primitive::new(Geometry::Group)
    }

    /// Returns a primitive variant.
    pub fn kind(&self) -> PrimitiveKind {
        self.geometry.kind()
    }

    /// Checks that the primitive is a group.
    pub fn is_group(&self) -> bool {
        self.kind() == PrimitiveKind::Group
    }

    /// Checks that the primitive is a text.
    pub fn is_text(&self) -> bool {
        self.kind() == PrimitiveKind::Text
    }

    /// Returns the literal value of a text primitive.
    pub fn text(&self) -> Option<&str> {
        match self.geometry {
            Geometry::Text { ref text, .. } => Some(text),
            _ => None,
        }
    }

    /// Returns the draw routine of a line primitive.
    ///
    /// Walks the point pairs and closes the path for polygons.
    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        let (points, closed) = match self.geometry {
            Geometry::Line { ref points, closed } => (points, closed),
            _ => return Vec::new(),
        };

        let mut commands = Vec::with_capacity(points.len() / 2 + 1);
        for (i, pair) in points.chunks(2).enumerate() {
            if pair.len() != 2 {
                break;
            }

            if i == 0 {
                commands.push(DrawCommand::MoveTo(pair[0], pair[1]));
            } else {
                commands.push(DrawCommand::LineTo(pair[0], pair[1]));
            }
        }

        if closed && !commands.is_empty() {
            commands.push(DrawCommand::ClosePath);
        }

        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_commands_polygon() {
        let p = Primitive::new(Geometry::Line {
            points: vec![0.0, 0.0, 10.0, 0.0, 10.0, 10.0],
            closed: true,
        });

        assert_eq!(p.draw_commands(), vec![
            DrawCommand::MoveTo(0.0, 0.0),
            DrawCommand::LineTo(10.0, 0.0),
            DrawCommand::LineTo(10.0, 10.0),
            DrawCommand::ClosePath,
        ]);
    }

    #[test]
    fn draw_commands_polyline() {
        let p = Primitive::new(Geometry::Line {
            points: vec![0.0, 0.0, 10.0, 0.0],
            closed: false,
        });

        assert_eq!(p.draw_commands().last(), Some(&DrawCommand::LineTo(10.0, 0.0)));
    }

    #[test]
    fn image_handle_1() {
        let h = ImageHandle::resolve("data:image/png;base64,AAAA");
        assert_eq!(h, ImageHandle::Inline {
            mime: "image/png".to_string(),
            uri: "data:image/png;base64,AAAA".to_string(),
        });

        let h = ImageHandle::resolve("seat.png");
        assert_eq!(h.href(), "seat.png");
    }
}
