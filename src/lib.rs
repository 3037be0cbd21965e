// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/*!
This library is a core of a venue seat-map editor.

It takes an SVG floor plan and turns it into a tree of typed drawing primitives,
which can be annotated with semantic tags and exported as sellable seat data.

Here is simple overview of the pipeline:

- [`parse_svg`] reads SVG text into a generic element tree.
- [`import_svg`] resolves styles and maps elements into a primitive [`Tree`].
- [`Session`] owns the tree. All changes go through [`Session::mutate`].
- [`annotate`] keeps `field-*` attributes and [`Identifier`]s in sync.
- [`grouping`] suggests seats, [`purchasable`] resolves implied purchasable groups.
- [`export()`] produces the `seats`, `tickets`, `masks` and `background` layers.
- [`Viewer`] loads exported layers back and handles zoom.
- [`Submitter`] sends an export to a booking [`Backend`].

Each primitive keeps its tags in `field-<name>` attributes. The identifier is
an ordered list of segments that is rendered from those attributes on demand,
like `r001-ZA-s1`, so attributes are always the source of truth.

&nbsp;

See modules and structs documentation for details.

[`parse_svg`]: parser/fn.parse_svg.html
[`import_svg`]: mapper/fn.import_svg.html
[`Tree`]: dom/struct.Tree.html
[`Session`]: dom/struct.Session.html
[`Session::mutate`]: dom/struct.Session.html#method.mutate
[`annotate`]: annotate/index.html
[`Identifier`]: annotate/struct.Identifier.html
[`grouping`]: grouping/index.html
[`purchasable`]: purchasable/index.html
[`export()`]: export/fn.export.html
[`Viewer`]: viewer/struct.Viewer.html
[`Submitter`]: submit/struct.Submitter.html
[`Backend`]: submit/trait.Backend.html
*/

#![doc(html_root_url = "https://docs.rs/seatmap/0.1.0")]

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
extern crate log;

pub mod annotate;
pub mod dom;
pub mod export;
pub mod grouping;
pub mod mapper;
pub mod parser;
pub mod purchasable;
pub mod submit;
pub mod types;
pub mod viewer;
mod error;

pub use crate::annotate::{CodeTable, Identifier, IdentifierGrammar};
pub use crate::dom::{NodeId, Patch, Primitive, Session, Tree};
pub use crate::error::{BackendError, Error, ExportError, ParserError, SubmitError};
pub use crate::export::{export, ExportBundle, ExportOptions};
pub use crate::mapper::{import_svg, Venue};
pub use crate::parser::ParseOptions;
pub use crate::submit::{Backend, Submitter, SubmitOptions};
pub use crate::viewer::{Viewer, ViewerOptions};
