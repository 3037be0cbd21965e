// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A read-only viewer of exported venues.
//!
//! The viewer has two states. `Idle` shows masks only, `Detailed` shows
//! itemized tickets. The state follows the stage scale, except right after
//! a mask drill-in, which always ends in `Detailed`.

use crate::annotate::{CodeTable, IdentifierGrammar};
use crate::dom::{bbox, NodeId, Tree};
use crate::error::ExportError;
use crate::export::{self, SerializedNode};
use crate::types::Rect;

/// Options that defines viewer behavior.
#[derive(Clone, Copy, Debug)]
pub struct ViewerOptions {
    /// Tickets are shown when the scaled content is wider than
    /// this part of the container.
    ///
    /// Default: 0.6
    pub zoom_threshold: f64,

    /// Scale factor of a single wheel step.
    ///
    /// Default: 1.1
    pub scale_by: f64,

    /// Default: 0.05
    pub min_scale: f64,

    /// Default: 20
    pub max_scale: f64,

    /// Space around a mask after drill-in, in container units.
    ///
    /// Default: 20
    pub drill_in_padding: f64,
}

impl Default for ViewerOptions {
    fn default() -> ViewerOptions {
        ViewerOptions {
            zoom_threshold: 0.6,
            scale_by: 1.1,
            min_scale: 0.05,
            max_scale: 20.0,
            drill_in_padding: 20.0,
        }
    }
}

/// Viewer states.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ViewState {
    /// Zoomed out. Only masks are shown.
    Idle,
    /// Zoomed in. Tickets are shown and can be clicked.
    Detailed,
}

/// Stage scale and offset.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Stage {
    #[allow(missing_docs)]
    pub scale: f64,
    #[allow(missing_docs)]
    pub x: f64,
    #[allow(missing_docs)]
    pub y: f64,
}

impl Stage {
    /// Converts a container point into content coordinates.
    pub fn to_content(&self, x: f64, y: f64) -> (f64, f64) {
        ((x - self.x) / self.scale, (y - self.y) / self.scale)
    }
}

impl Default for Stage {
    fn default() -> Stage {
        Stage { scale: 1.0, x: 0.0, y: 0.0 }
    }
}

/// A venue viewer.
#[derive(Clone, Debug)]
pub struct Viewer {
    tree: Tree,
    codes: CodeTable,
    grammar: IdentifierGrammar,
    background: Option<NodeId>,
    masks: NodeId,
    tickets: NodeId,
    content_width: f64,
    container: (f64, f64),
    opt: ViewerOptions,
    stage: Stage,
    state: ViewState,
    animation: Option<Stage>,
    redraws: usize,
}

impl Viewer {
    /// Loads exported layers.
    ///
    /// `viewport` is the venue size and `container` is the drawing surface size.
    pub fn load(
        tickets: &str,
        masks: &str,
        background: Option<&str>,
        viewport: (f64, f64),
        container: (f64, f64),
        opt: ViewerOptions,
    ) -> Result<Viewer, ExportError> {
        let codes = CodeTable::standard();
        let mut tree = Tree::new();
        let root = tree.root();

        let add = |tree: &mut Tree, text: &str| -> Result<NodeId, ExportError> {
            let node: SerializedNode = serde_json::from_str(text)?;
            export::deserialize_into(tree, root, &node, codes)
        };

        let background = match background {
            Some(text) => Some(add(&mut tree, text)?),
            None => None,
        };
        let masks = add(&mut tree, masks)?;
        let tickets = add(&mut tree, tickets)?;

        Ok(Viewer::new(tree, background, masks, tickets, viewport.0, container, codes, opt))
    }

    /// Constructs a viewer from an already loaded tree.
    ///
    /// The initial scale fits the content width into the container, and the
    /// initial state follows the zoom threshold at that scale. Applying the
    /// initial state isn't counted as a redraw.
    pub fn new(
        tree: Tree,
        background: Option<NodeId>,
        masks: NodeId,
        tickets: NodeId,
        content_width: f64,
        container: (f64, f64),
        codes: &CodeTable,
        opt: ViewerOptions,
    ) -> Viewer {
        let scale = if content_width > 0.0 { container.0 / content_width } else { 1.0 };

        let mut viewer = Viewer {
            tree,
            codes: codes.clone(),
            grammar: IdentifierGrammar::new(codes),
            background,
            masks,
            tickets,
            content_width,
            container,
            opt,
            stage: Stage { scale, x: 0.0, y: 0.0 },
            state: ViewState::Idle,
            animation: None,
            redraws: 0,
        };

        if viewer.is_zoomed_in(scale) {
            viewer.state = ViewState::Detailed;
        }

        viewer.apply_layers();
        viewer
    }

    /// Returns the loaded layers.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Returns the current state.
    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Returns the current stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Returns the number of layer visibility switches.
    pub fn redraws(&self) -> usize {
        self.redraws
    }

    /// Returns the pending drill-in animation target.
    pub fn animation(&self) -> Option<Stage> {
        self.animation
    }

    /// Checks that the content is zoomed in at the specified scale.
    pub fn is_zoomed_in(&self, scale: f64) -> bool {
        self.content_width * scale > self.container.0 * self.opt.zoom_threshold
    }

    /// Handles a wheel event.
    ///
    /// Zooms around the pointer, cancels a running animation and
    /// returns `true` when the state was switched.
    pub fn on_wheel(&mut self, pointer: (f64, f64), delta_y: f64) -> bool {
        self.animation = None;

        let old = self.stage.scale;
        let new = if delta_y > 0.0 { old / self.opt.scale_by } else { old * self.opt.scale_by };
        let new = new.max(self.opt.min_scale).min(self.opt.max_scale);

        let (cx, cy) = self.stage.to_content(pointer.0, pointer.1);
        self.stage = Stage {
            scale: new,
            x: pointer.0 - cx * new,
            y: pointer.1 - cy * new,
        };

        self.update_state()
    }

    /// Sets the scale, keeping the offset.
    ///
    /// Returns `true` when the state was switched.
    pub fn zoom_to(&mut self, scale: f64) -> bool {
        self.stage.scale = scale;
        self.update_state()
    }

    /// Finds a topmost mask shape under a container point.
    pub fn pick_mask(&self, x: f64, y: f64) -> Option<NodeId> {
        let (cx, cy) = self.stage.to_content(x, y);
        self.tree.descendants(self.masks)
            .filter(|id| self.tree.get(*id).map(|p| !p.is_group()).unwrap_or(false))
            .filter(|id| bbox::absolute_bbox(&self.tree, *id).map_or(false, |r| r.contains(cx, cy)))
            .last()
    }

    /// Starts a drill-in animation to a mask.
    ///
    /// Returns the target stage, or `None` when the node isn't a measurable mask.
    pub fn on_mask_click(&mut self, node: NodeId) -> Option<Stage> {
        if !self.tree.ancestors(node).any(|id| id == self.masks) {
            return None;
        }

        let r = bbox::absolute_bbox(&self.tree, node)?;
        let target = self.fit(&r)?;
        self.animation = Some(target);
        Some(target)
    }

    /// Finishes the drill-in animation.
    ///
    /// The state becomes `Detailed` regardless of the scale.
    pub fn finish_animation(&mut self) -> bool {
        match self.animation.take() {
            Some(target) => {
                self.stage = target;
                if self.state != ViewState::Detailed {
                    self.set_state(ViewState::Detailed);
                }
                true
            }
            None => false,
        }
    }

    /// Returns nodes to render, in tree order.
    ///
    /// The background is rendered as is. In masks and tickets only nodes with
    /// a grammar-conforming identifier are rendered, together with their subtrees.
    pub fn render_list(&self) -> Vec<NodeId> {
        let mut list = Vec::new();
        if let Some(bg) = self.background {
            list.extend(self.tree.descendants(bg));
        }

        for &layer in &[self.masks, self.tickets] {
            self.collect_matching(layer, &mut list);
        }

        list
    }

    /// Checks that a layer is visible.
    pub fn is_visible(&self, layer: NodeId) -> bool {
        self.tree.get(layer).map(|p| p.visible).unwrap_or(false)
    }

    /// Returns the tickets layer.
    pub fn tickets(&self) -> NodeId {
        self.tickets
    }

    /// Returns the masks layer.
    pub fn masks(&self) -> NodeId {
        self.masks
    }

    fn collect_matching(&self, id: NodeId, list: &mut Vec<NodeId>) {
        let matches = self.tree.get(id)
            .and_then(|p| p.identifier.as_ref().map(|i| i.render(&p.attributes, &self.codes)))
            .map_or(false, |s| self.grammar.is_match(&s));

        if matches {
            list.extend(self.tree.descendants(id));
            return;
        }

        for child in self.tree.children(id) {
            self.collect_matching(*child, list);
        }
    }

    fn fit(&self, r: &Rect) -> Option<Stage> {
        let pad = self.opt.drill_in_padding;
        let w = self.container.0 - pad * 2.0;
        let h = self.container.1 - pad * 2.0;
        if r.width <= 0.0 || r.height <= 0.0 || w <= 0.0 || h <= 0.0 {
            return None;
        }

        let scale = (w / r.width).min(h / r.height).max(self.opt.min_scale).min(self.opt.max_scale);
        let (cx, cy) = r.center();
        Some(Stage {
            scale,
            x: self.container.0 / 2.0 - cx * scale,
            y: self.container.1 / 2.0 - cy * scale,
        })
    }

    fn update_state(&mut self) -> bool {
        let zoomed_in = self.is_zoomed_in(self.stage.scale);
        let shown = self.state == ViewState::Detailed;
        if zoomed_in == shown {
            return false;
        }

        self.set_state(if zoomed_in { ViewState::Detailed } else { ViewState::Idle });
        true
    }

    fn set_state(&mut self, state: ViewState) {
        debug!("Viewer state: {:?}.", state);
        self.state = state;
        self.apply_layers();
        self.redraws += 1;
    }

    fn apply_layers(&mut self) {
        let detailed = self.state == ViewState::Detailed;
        if let Some(p) = self.tree.get_mut(self.tickets) {
            p.visible = detailed;
            p.flags.listening = detailed;
            p.flags.hit_enabled = detailed;
        }

        if let Some(p) = self.tree.get_mut(self.masks) {
            p.visible = !detailed;
            p.flags.listening = !detailed;
        }
    }
}
