// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/// Options that defines SVG ingesting and mapping.
#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Viewport used when the root `viewBox` is missing or malformed.
    ///
    /// Default: 1000x1000
    pub default_viewport: (f64, f64),

    /// Font size of text nodes without an inline or class `font-size`.
    ///
    /// Default: 12
    pub default_font_size: f64,

    /// CSS property names that should not be converted to camelCase,
    /// but renamed explicitly.
    ///
    /// Default: `stroke-dasharray` -> `dash`, `stroke-dashoffset` -> `dashOffset`,
    /// `stroke-linecap` -> `lineCap`, `stroke-linejoin` -> `lineJoin`
    pub css_renames: Vec<(String, String)>,

    /// Log each dropped unsupported element.
    ///
    /// Unsupported elements are always dropped.
    /// When disabled, only the total amount is logged.
    pub warn_unknown_elements: bool,
}

impl ParseOptions {
    /// Returns a renamed CSS property, if any.
    pub fn css_rename(&self, name: &str) -> Option<&str> {
        self.css_renames.iter().find(|(from, _)| from == name).map(|(_, to)| to.as_str())
    }
}

impl Default for ParseOptions {
    fn default() -> ParseOptions {
        let renames = &[
            ("stroke-dasharray", "dash"),
            ("stroke-dashoffset", "dashOffset"),
            ("stroke-linecap", "lineCap"),
            ("stroke-linejoin", "lineJoin"),
        ];

        ParseOptions {
            default_viewport: (1000.0, 1000.0),
            default_font_size: 12.0,
            css_renames: renames.iter().map(|&(a, b)| (a.to_string(), b.to_string())).collect(),
            warn_unknown_elements: true,
        }
    }
}
