// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use slab::Slab;

use crate::annotate::{CodeTable, Identifier};
use crate::error::Error;
use crate::purchasable::PurchasableSet;
use crate::types::{Placement, Rect};
use super::{
    bbox,
    AttrValue,
    Descendants,
    Geometry,
    NodeId,
    Primitive,
    RuntimeFlags,
    StyleValue,
    Tree,
};

/// A single primitive modification.
#[derive(Clone, PartialEq, Debug)]
pub enum Patch {
    /// Inserts or replaces an attribute.
    SetAttribute(String, AttrValue),
    /// Removes an attribute. Removing a missing attribute is not an error.
    RemoveAttribute(String),
    /// Inserts or replaces a style property.
    SetStyle(String, StyleValue),
    #[allow(missing_docs)]
    RemoveStyle(String),
    /// Sets the position.
    Move {
        #[allow(missing_docs)]
        x: f64,
        #[allow(missing_docs)]
        y: f64,
    },
    #[allow(missing_docs)]
    SetPlacement(Placement),
    #[allow(missing_docs)]
    SetGeometry(Geometry),
    #[allow(missing_docs)]
    SetVisible(bool),
    #[allow(missing_docs)]
    SetOpacity(f64),
    #[allow(missing_docs)]
    SetFlags(RuntimeFlags),
    #[allow(missing_docs)]
    SetName(Option<String>),
    #[allow(missing_docs)]
    SetIdentifier(Option<Identifier>),
}

impl Patch {
    fn affects_bbox(&self) -> bool {
        match *self {
            Patch::Move { .. } | Patch::SetPlacement(_) | Patch::SetGeometry(_) => true,
            _ => false,
        }
    }

    fn affects_purchasable(&self) -> bool {
        match *self {
            Patch::SetAttribute(..) | Patch::RemoveAttribute(_) | Patch::SetIdentifier(_) => true,
            _ => false,
        }
    }

    fn apply(self, p: &mut Primitive) {
        match self {
            Patch::SetAttribute(name, value) => p.attributes.insert(&name, value),
            Patch::RemoveAttribute(name) => { p.attributes.remove(&name); }
            Patch::SetStyle(name, value) => p.style.set(&name, value),
            Patch::RemoveStyle(name) => { p.style.remove(&name); }
            Patch::Move { x, y } => {
                p.placement.x = x;
                p.placement.y = y;
            }
            Patch::SetPlacement(v) => p.placement = v,
            Patch::SetGeometry(v) => p.geometry = v,
            Patch::SetVisible(v) => p.visible = v,
            Patch::SetOpacity(v) => p.opacity = v,
            Patch::SetFlags(v) => p.flags = v,
            Patch::SetName(v) => p.name = v,
            Patch::SetIdentifier(v) => p.identifier = v,
        }
    }
}


/// Kind of a tree change.
#[derive(Clone, PartialEq, Debug)]
pub enum ChangeKind {
    /// The primitive was patched.
    Patched(Patch),
    /// The node was appended.
    Appended,
    /// The node and its subtree were removed.
    Removed,
}

/// A change notification.
#[derive(Clone, PartialEq, Debug)]
pub struct Change {
    #[allow(missing_docs)]
    pub node: NodeId,
    #[allow(missing_docs)]
    pub kind: ChangeKind,
}

/// A subscription handle returned by [`Session::subscribe`].
///
/// [`Session::subscribe`]: struct.Session.html#method.subscribe
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SubscriptionId(usize);

type Listener = Box<dyn FnMut(&Change)>;

/// An editor session.
///
/// The session is the only owner of the primitive tree.
/// All modifications go through it, so subscribers are notified
/// and derived data is invalidated on every change.
pub struct Session {
    tree: Tree,
    codes: CodeTable,
    listeners: Slab<Listener>,
    bboxes: RefCell<HashMap<NodeId, Option<Rect>>>,
    purchasable: RefCell<Option<Rc<PurchasableSet>>>,
}

impl Session {
    /// Constructs a new session using the standard code table.
    pub fn new(tree: Tree) -> Session {
        Session::with_codes(tree, CodeTable::standard().clone())
    }

    /// Constructs a new session using a custom code table.
    pub fn with_codes(tree: Tree, codes: CodeTable) -> Session {
        Session {
            tree,
            codes,
            listeners: Slab::new(),
            bboxes: RefCell::new(HashMap::new()),
            purchasable: RefCell::new(None),
        }
    }

    /// Returns a read-only view of the tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Ends the session, returning the tree.
    pub fn into_tree(self) -> Tree {
        self.tree
    }

    /// Returns the session code table.
    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }

    /// Returns the root node.
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Returns a primitive.
    pub fn get(&self, id: NodeId) -> Option<&Primitive> {
        self.tree.get(id)
    }

    /// Returns a primitive or an error.
    pub fn node(&self, id: NodeId) -> Result<&Primitive, Error> {
        self.tree.node(id)
    }

    /// Returns node's children.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.tree.children(id)
    }

    /// Returns node's parent.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.parent(id)
    }

    /// Returns an iterator over the node and its descendants.
    pub fn descendants(&self, id: NodeId) -> Descendants {
        self.tree.descendants(id)
    }

    /// Applies a patch to the primitive.
    pub fn mutate(&mut self, id: NodeId, patch: Patch) -> Result<(), Error> {
        let p = self.tree.get_mut(id).ok_or(Error::NodeNotFound(id))?;

        if patch.affects_bbox() {
            self.bboxes.borrow_mut().clear();
        }

        if patch.affects_purchasable() {
            *self.purchasable.borrow_mut() = None;
        }

        trace!("Patch {}: {:?}.", id, patch);
        patch.clone().apply(p);
        self.notify(Change { node: id, kind: ChangeKind::Patched(patch) });
        Ok(())
    }

    /// Appends a new primitive.
    pub fn append(&mut self, parent: NodeId, primitive: Primitive) -> Result<NodeId, Error> {
        let id = self.tree.append(parent, primitive)?;
        self.invalidate();
        self.notify(Change { node: id, kind: ChangeKind::Appended });
        Ok(id)
    }

    /// Removes the node with all its descendants.
    pub fn remove(&mut self, id: NodeId) -> Result<Primitive, Error> {
        let p = self.tree.remove(id)?;
        self.invalidate();
        self.notify(Change { node: id, kind: ChangeKind::Removed });
        Ok(p)
    }

    /// Registers a change listener.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
        where F: FnMut(&Change) + 'static
    {
        SubscriptionId(self.listeners.insert(Box::new(listener)))
    }

    /// Removes a change listener.
    ///
    /// Returns `false` if the listener was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        if self.listeners.contains(id.0) {
            self.listeners.remove(id.0);
            true
        } else {
            false
        }
    }

    /// Returns an absolute bounding box of the node.
    ///
    /// The result is cached until the next geometry change.
    pub fn bbox(&self, id: NodeId) -> Option<Rect> {
        if let Some(r) = self.bboxes.borrow().get(&id) {
            return *r;
        }

        let r = bbox::absolute_bbox(&self.tree, id);
        self.bboxes.borrow_mut().insert(id, r);
        r
    }

    /// Renders node's identifier string.
    pub fn identifier_string(&self, id: NodeId) -> Option<String> {
        let p = self.tree.get(id)?;
        let ident = p.identifier.as_ref()?;
        Some(ident.render(&p.attributes, &self.codes))
    }

    /// Finds the first node, in tree order, with the specified identifier string.
    pub fn find_by_identifier(&self, text: &str) -> Option<NodeId> {
        self.tree.descendants(self.tree.root())
            .find(|id| self.identifier_string(*id).map_or(false, |s| s == text))
    }

    /// Returns a purchasable set of the whole tree.
    ///
    /// The set is built once and reused until tags or flags change.
    pub fn purchasable_set(&self) -> Rc<PurchasableSet> {
        if let Some(ref set) = *self.purchasable.borrow() {
            return set.clone();
        }

        let set = Rc::new(PurchasableSet::build(&self.tree, &self.codes));
        *self.purchasable.borrow_mut() = Some(set.clone());
        set
    }

    /// Checks that the node is purchasable because of flags set on other nodes.
    pub fn is_implied_purchasable(&self, id: NodeId) -> bool {
        self.purchasable_set().is_implied(&self.tree, &self.codes, id)
    }

    /// Checks that the node is either flagged or implied purchasable.
    pub fn is_purchasable(&self, id: NodeId) -> bool {
        let flagged = self.tree.get(id).map(|p| p.attributes.is_purchasable()).unwrap_or(false);
        flagged || self.is_implied_purchasable(id)
    }

    fn invalidate(&mut self) {
        self.bboxes.borrow_mut().clear();
        *self.purchasable.borrow_mut() = None;
    }

    fn notify(&mut self, change: Change) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&change);
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Session({} nodes, {} listeners)", self.tree.len(), self.listeners.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Primitive {
        Primitive::new(Geometry::Rect { width: 10.0, height: 10.0, corner_radius: 0.0 })
    }

    #[test]
    fn subscribe_1() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let mut session = Session::new(Tree::new());
        let root = session.root();

        let c = changes.clone();
        let sub = session.subscribe(move |ch| c.borrow_mut().push(ch.clone()));

        let r = session.append(root, rect()).unwrap();
        session.mutate(r, Patch::SetVisible(false)).unwrap();
        assert!(session.unsubscribe(sub));
        session.remove(r).unwrap();

        assert_eq!(*changes.borrow(), vec![
            Change { node: r, kind: ChangeKind::Appended },
            Change { node: r, kind: ChangeKind::Patched(Patch::SetVisible(false)) },
        ]);
        assert!(!session.unsubscribe(sub));
    }

    #[test]
    fn bbox_cache_invalidation() {
        let mut session = Session::new(Tree::new());
        let root = session.root();
        let g = session.append(root, Primitive::group()).unwrap();
        let r = session.append(g, rect()).unwrap();

        assert_eq!(session.bbox(r), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        session.mutate(g, Patch::Move { x: 5.0, y: 0.0 }).unwrap();
        assert_eq!(session.bbox(r), Some(Rect::new(5.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn mutate_missing_node() {
        let mut session = Session::new(Tree::new());
        let root = session.root();
        let r = session.append(root, rect()).unwrap();
        session.remove(r).unwrap();
        assert_eq!(session.mutate(r, Patch::SetVisible(false)), Err(Error::NodeNotFound(r)));
    }
}
