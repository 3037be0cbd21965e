// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::f64;

use svgtypes::NumberListParser;

/// Representation of an affine `matrix(a b c d e f)` transform.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Transform {
    /// Constructs a new transform.
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Transform {
        Transform { a, b, c, d, e, f }
    }

    /// Translates the current transform.
    pub fn translate(mut self, x: f64, y: f64) -> Transform {
        self.append(&Transform::new(1.0, 0.0, 0.0, 1.0, x, y));
        self
    }

    /// Scales the current transform.
    pub fn scale(mut self, sx: f64, sy: f64) -> Transform {
        self.append(&Transform::new(sx, 0.0, 0.0, sy, 0.0, 0.0));
        self
    }

    /// Rotates the current transform by an angle in degrees.
    pub fn rotate(mut self, angle: f64) -> Transform {
        let v = angle.to_radians();
        let (sin, cos) = v.sin_cos();
        self.append(&Transform::new(cos, sin, -sin, cos, 0.0, 0.0));
        self
    }

    /// Skews the current transform by shear factors.
    pub fn skew(mut self, kx: f64, ky: f64) -> Transform {
        self.append(&Transform::new(1.0, ky, kx, 1.0, 0.0, 0.0));
        self
    }

    /// Appends transform to the current transform.
    pub fn append(&mut self, t: &Transform) {
        let Transform { a, b, c, d, e, f } = *self;
        self.a = a * t.a + c * t.b;
        self.b = b * t.a + d * t.b;
        self.c = a * t.c + c * t.d;
        self.d = b * t.c + d * t.d;
        self.e = a * t.e + c * t.f + e;
        self.f = b * t.e + d * t.f + f;
    }

    /// Maps a point through the transform.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }

    /// Returns `true` if the current transform is default, aka (1 0 0 1 0 0).
    pub fn is_default(&self) -> bool {
           self.a == 1.0
        && self.b == 0.0
        && self.c == 0.0
        && self.d == 1.0
        && self.e == 0.0
        && self.f == 0.0
    }
}

impl Default for Transform {
    fn default() -> Transform {
        Transform::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }
}


/// Decomposed node placement.
///
/// Unlike [`Transform`], each component is stored separately, so a node can be
/// moved, rotated or scaled without touching the other parts.
///
/// [`Transform`]: struct.Transform.html
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Placement {
    /// Horizontal offset.
    pub x: f64,
    /// Vertical offset.
    pub y: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Horizontal scale factor.
    pub scale_x: f64,
    /// Vertical scale factor.
    pub scale_y: f64,
    /// Horizontal shear factor.
    pub skew_x: f64,
    /// Vertical shear factor.
    pub skew_y: f64,
}

impl Placement {
    /// Returns `true` if the placement does nothing.
    pub fn is_default(&self) -> bool {
        *self == Placement::default()
    }

    /// Composes the placement into a matrix.
    ///
    /// The order is translate, rotate, skew, scale.
    pub fn to_transform(&self) -> Transform {
        Transform::default()
            .translate(self.x, self.y)
            .rotate(self.rotation)
            .skew(self.skew_x, self.skew_y)
            .scale(self.scale_x, self.scale_y)
    }

    /// Applies an SVG `transform` attribute value.
    ///
    /// Each function is applied to the matching field in the encountered order.
    /// Fragments that can't be parsed are skipped.
    pub fn apply_svg_transform(&mut self, text: &str) {
        for fragment in text.split(')') {
            let fragment = fragment.trim().trim_start_matches(',').trim();
            if fragment.is_empty() {
                continue;
            }

            let (name, args) = match fragment.find('(') {
                Some(idx) => (fragment[..idx].trim(), &fragment[idx + 1..]),
                None => {
                    warn!("Invalid transform fragment '{}'.", fragment);
                    continue;
                }
            };

            let args: Vec<f64> = NumberListParser::from(args).filter_map(|n| n.ok()).collect();
            self.apply_function(name, &args);
        }
    }

    fn apply_function(&mut self, name: &str, args: &[f64]) {
        let arg = |i: usize| args.get(i).cloned();

        match name {
            "translate" => {
                self.x += arg(0).unwrap_or(0.0);
                self.y += arg(1).unwrap_or(0.0);
            }
            "rotate" => {
                if let Some(angle) = arg(0) {
                    self.rotation = angle;
                }
            }
            "scale" => {
                if let Some(sx) = arg(0) {
                    self.scale_x = sx;
                    self.scale_y = arg(1).unwrap_or(sx);
                }
            }
            "skew" => {
                if let Some(ax) = arg(0) {
                    self.skew_x = shear(ax);
                    self.skew_y = shear(arg(1).unwrap_or(ax));
                }
            }
            "skewX" => {
                if let Some(a) = arg(0) {
                    self.skew_x = shear(a);
                }
            }
            "skewY" => {
                if let Some(a) = arg(0) {
                    self.skew_y = shear(a);
                }
            }
            "matrix" if args.len() == 6 => {
                self.apply_matrix(&Transform::new(args[0], args[1], args[2],
                                                  args[3], args[4], args[5]));
            }
            _ => {
                warn!("Unsupported transform function '{}'.", name);
            }
        }
    }

    fn apply_matrix(&mut self, ts: &Transform) {
        let Transform { a, b, c, d, e, f } = *ts;
        let delta = a * d - b * c;

        self.x += e;
        self.y += f;

        if delta == 0.0 {
            return;
        }

        if a != 0.0 || b != 0.0 {
            let r = (a * a + b * b).sqrt();
            let angle = if b > 0.0 { (a / r).acos() } else { -(a / r).acos() };
            self.rotation = angle.to_degrees();
            self.scale_x = r;
            self.scale_y = delta / r;
            self.skew_x = (a * c + b * d) / delta;
            self.skew_y = 0.0;
        } else if c != 0.0 || d != 0.0 {
            let s = (c * c + d * d).sqrt();
            let angle = if d > 0.0 { (-c / s).acos() } else { -(c / s).acos() };
            self.rotation = (f64::consts::FRAC_PI_2 - angle).to_degrees();
            self.scale_x = delta / s;
            self.scale_y = s;
            self.skew_x = 0.0;
            self.skew_y = (a * b + c * d) / delta;
        }
    }
}

impl Default for Placement {
    fn default() -> Placement {
        Placement {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            skew_x: 0.0,
            skew_y: 0.0,
        }
    }
}

fn shear(angle: f64) -> f64 {
    angle.to_radians().tan()
}
