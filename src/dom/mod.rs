// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

pub use self::attributes::{field_key, AttrValue, Attributes, FIELD_PREFIX, PURCHASABLE};
pub use self::primitive::{
    DrawCommand,
    Geometry,
    ImageHandle,
    Primitive,
    PrimitiveKind,
    RuntimeFlags,
};
pub use self::session::{Change, ChangeKind, Patch, Session, SubscriptionId};
pub use self::style::{PropertyMap, Style, StyleValue};
pub use self::tree::{Ancestors, Descendants, NodeId, Tree};

pub mod bbox;
mod attributes;
mod primitive;
mod session;
mod style;
mod tree;
