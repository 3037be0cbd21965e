// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;

use super::{GenericNode, Ingested};

/// Maximum number of top-level elements.
const MAX_TOP_LEVEL: usize = 100;

/// A venue structure check result.
///
/// A failed check doesn't prevent the document from being used.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Validation {
    /// The root has between 1 and 100 top-level elements.
    pub svg_grouped: bool,
    /// Every immediate child of the `tickets` element is a `g`.
    ///
    /// Passes when there is no `tickets` element at all, which is
    /// reported by `has_tickets` instead.
    pub tickets_children_grouped: bool,
    /// An element with `id="tickets"` exists.
    pub has_tickets: bool,
    /// An element with `id="masks"` exists.
    pub has_masks: bool,
}

impl Validation {
    /// Runs all checks.
    pub fn check(doc: &Ingested) -> Validation {
        let top_level = doc.root_children.iter().filter(|n| n.is_element()).count();
        let tickets = doc.find_by_id("tickets");

        Validation {
            svg_grouped: top_level >= 1 && top_level <= MAX_TOP_LEVEL,
            tickets_children_grouped: tickets.map(children_grouped).unwrap_or(true),
            has_tickets: tickets.is_some(),
            has_masks: doc.find_by_id("masks").is_some(),
        }
    }

    /// Returns `true` if all checks have passed.
    pub fn is_valid(&self) -> bool {
        self.failures().is_empty()
    }

    /// Returns a message for each failed check.
    pub fn failures(&self) -> Vec<&'static str> {
        let mut list = Vec::new();
        if !self.svg_grouped {
            list.push("the document must have between 1 and 100 top-level elements");
        }

        if !self.tickets_children_grouped {
            list.push("every child of the 'tickets' group must be a group");
        }

        if !self.has_tickets {
            list.push("the 'tickets' group is missing");
        }

        if !self.has_masks {
            list.push("the 'masks' group is missing");
        }

        list
    }
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let failures = self.failures();
        if failures.is_empty() {
            write!(f, "valid")
        } else {
            write!(f, "{}", failures.join("; "))
        }
    }
}

fn children_grouped(node: &GenericNode) -> bool {
    node.children.iter().all(|n| n.is("g"))
}
