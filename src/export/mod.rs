// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Venue export.
//!
//! The editor tree is cloned first, so the exported data never shares
//! state with the session.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::annotate::CodeTable;
use crate::dom::{NodeId, RuntimeFlags, Session, Tree};
use crate::error::ExportError;
use crate::grouping;
use crate::purchasable::PurchasableSet;
use crate::types::Placement;

pub use self::serial::{
    deserialize_into,
    deserialize_primitive,
    deserialize_tree,
    serialize_primitive,
    serialize_subtree,
    SerializedNode,
};

mod serial;

/// Options that defines venue export.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    /// Fill of ticket shapes that are not for sale.
    ///
    /// Default: `#cccccc`
    pub unavailable_fill: String,

    /// Editor-only attributes removed from the tickets layer.
    ///
    /// Runtime flags and class metadata are always removed.
    ///
    /// Default: `draggable`, `selected`
    pub stripped_attributes: Vec<String>,

    /// Identifier of the tickets layer.
    ///
    /// Default: `tickets`
    pub tickets_layer: String,

    /// Identifier of the masks layer.
    ///
    /// Default: `masks`
    pub masks_layer: String,

    /// Identifier of the transient selection layer, which is never exported.
    ///
    /// Default: `selection`
    pub selection_layer: String,
}

impl Default for ExportOptions {
    fn default() -> ExportOptions {
        ExportOptions {
            unavailable_fill: "#cccccc".to_string(),
            stripped_attributes: vec!["draggable".to_string(), "selected".to_string()],
            tickets_layer: "tickets".to_string(),
            masks_layer: "masks".to_string(),
            selection_layer: "selection".to_string(),
        }
    }
}

/// A single purchasable item.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SeatRecord {
    /// Rendered identifier.
    pub id: String,
    /// Primitive class name.
    #[serde(rename = "className")]
    pub class_name: String,
    /// All `field-*` attributes.
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

/// Exported venue layers.
#[derive(Clone, PartialEq, Debug)]
pub struct ExportBundle {
    /// Purchasable items manifest.
    pub seats: Vec<SeatRecord>,
    /// The stripped tickets layer.
    pub tickets: SerializedNode,
    #[allow(missing_docs)]
    pub masks: SerializedNode,
    /// The first remaining top-level layer, if any.
    pub background: Option<SerializedNode>,
}

impl ExportBundle {
    /// Names of the exported files.
    pub const SEATS_FILE: &'static str = "seats.json";
    #[allow(missing_docs)]
    pub const TICKETS_FILE: &'static str = "tickets.json";
    #[allow(missing_docs)]
    pub const MASKS_FILE: &'static str = "masks.json";
    #[allow(missing_docs)]
    pub const BACKGROUND_FILE: &'static str = "background.json";

    /// Serializes each layer into a separate JSON file.
    ///
    /// The background file is present only when the venue has a background layer.
    pub fn to_files(&self) -> Result<Vec<(&'static str, String)>, ExportError> {
        let mut files = vec![
            (Self::SEATS_FILE, serde_json::to_string(&self.seats)?),
            (Self::TICKETS_FILE, serde_json::to_string(&self.tickets)?),
            (Self::MASKS_FILE, serde_json::to_string(&self.masks)?),
        ];

        if let Some(ref bg) = self.background {
            files.push((Self::BACKGROUND_FILE, serde_json::to_string(bg)?));
        }

        Ok(files)
    }
}

/// Exports the session tree.
pub fn export(session: &Session, opt: &ExportOptions) -> Result<ExportBundle, ExportError> {
    export_tree(session.tree(), session.codes(), opt)
}

/// Exports a tree.
///
/// - The tree is cloned and the root placement is reset.
/// - The selection layer is removed.
/// - The tickets layer is stripped of editor-only data, and ticket
///   shapes that are not for sale get the unavailable fill.
/// - Every non-text node flagged purchasable becomes a seat record.
pub fn export_tree(tree: &Tree, codes: &CodeTable, opt: &ExportOptions) -> Result<ExportBundle, ExportError> {
    let mut tree = tree.clone();
    let root = tree.root();

    if let Some(p) = tree.get_mut(root) {
        p.placement = Placement::default();
        p.opacity = 1.0;
        p.visible = true;
    }

    if let Some(selection) = find_layer(&tree, codes, &opt.selection_layer) {
        tree.remove(selection)?;
    }

    let tickets = find_layer(&tree, codes, &opt.tickets_layer)
        .ok_or_else(|| ExportError::MissingLayer(opt.tickets_layer.clone()))?;
    let masks = find_layer(&tree, codes, &opt.masks_layer)
        .ok_or_else(|| ExportError::MissingLayer(opt.masks_layer.clone()))?;
    let background = tree.children(root).iter()
        .cloned()
        .find(|id| *id != tickets && *id != masks);

    let unavailable = unavailable_shapes(&tree, codes, tickets);
    strip_tickets(&mut tree, tickets, &unavailable, opt);
    let seats = collect_seats(&tree, codes, tickets);
    debug!("Exported {} seats, {} unavailable shapes.", seats.len(), unavailable.len());

    let layer = |id: NodeId| serialize_subtree(&tree, id, codes);
    Ok(ExportBundle {
        seats,
        tickets: layer(tickets).ok_or_else(|| ExportError::MissingLayer(opt.tickets_layer.clone()))?,
        masks: layer(masks).ok_or_else(|| ExportError::MissingLayer(opt.masks_layer.clone()))?,
        background: background.and_then(layer),
    })
}

/// Finds a top-level layer by its identifier or class name.
pub fn find_layer(tree: &Tree, codes: &CodeTable, name: &str) -> Option<NodeId> {
    tree.children(tree.root()).iter().cloned().find(|id| {
        let p = match tree.get(*id) {
            Some(p) => p,
            None => return false,
        };

        let ident = p.identifier.as_ref().map(|i| i.render(&p.attributes, codes));
        ident.as_ref().map(String::as_str) == Some(name) || p.name.as_ref().map(String::as_str) == Some(name)
    })
}

/// Collects ticket shapes that are not for sale.
///
/// A shape's own `purchasable` flag always wins. A shape without one is
/// available only inside a flagged or implied purchasable group.
fn unavailable_shapes(tree: &Tree, codes: &CodeTable, tickets: NodeId) -> HashSet<NodeId> {
    let set = PurchasableSet::build(tree, codes);
    let is_available = |id: NodeId| {
        if let Some(flag) = tree.get(id).and_then(|p| p.attributes.purchasable()) {
            return flag;
        }

        tree.ancestors(id)
            .take_while(|a| *a != tree.root())
            .any(|a| {
                let flagged = tree.get(a).map(|p| p.attributes.is_purchasable()).unwrap_or(false);
                flagged || set.is_implied(tree, codes, a)
            })
    };

    tree.descendants(tickets)
        .filter(|id| {
            tree.get(*id).map(|p| grouping::is_seat_like_leaf(p) && !p.is_text()).unwrap_or(false)
        })
        .filter(|id| !is_available(*id))
        .collect()
}

fn strip_tickets(tree: &mut Tree, tickets: NodeId, unavailable: &HashSet<NodeId>, opt: &ExportOptions) {
    let nodes: Vec<NodeId> = tree.descendants(tickets).collect();
    for id in nodes {
        let p = match tree.get_mut(id) {
            Some(p) => p,
            None => continue,
        };

        p.flags = RuntimeFlags::default();
        p.name = None;
        p.attributes.retain(|name, _| !opt.stripped_attributes.iter().any(|s| s == name));

        if unavailable.contains(&id) {
            p.style.set("fill", opt.unavailable_fill.as_str());
        }
    }
}

fn collect_seats(tree: &Tree, codes: &CodeTable, tickets: NodeId) -> Vec<SeatRecord> {
    let mut seats = Vec::new();
    for id in tree.descendants(tickets) {
        let p = match tree.get(id) {
            Some(p) if !p.is_text() && p.attributes.is_purchasable() => p,
            _ => continue,
        };

        let ident = p.identifier.as_ref().map(|i| i.render(&p.attributes, codes)).unwrap_or_default();
        if ident.is_empty() {
            warn!("Purchasable {} {} has no identifier. Skipped.", p.kind(), id);
            continue;
        }

        let fields = p.attributes.iter()
            .filter(|(k, _)| k.starts_with(crate::dom::FIELD_PREFIX))
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect();

        seats.push(SeatRecord {
            id: ident,
            class_name: p.kind().class_name().to_string(),
            fields,
        });
    }

    seats
}
