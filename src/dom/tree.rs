// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/*!
An arena of primitives.

* A tree is made up of nodes stored in a `Slab`.
* Each node has zero or more ordered *child* nodes.
* Each node except the root has exactly one *parent*.
* Nodes are addressed by a `NodeId`, which stays valid until the node is removed.
  A storage slot can be reused, but an id of a removed node never resolves
  to a newer node, since ids also carry an insertion stamp.
* Removing a node removes its whole subtree.

Cloning a `Tree` makes a deep, independent copy with the same ids.
*/

use std::fmt;

use slab::Slab;

use crate::error::Error;
use super::Primitive;

/// A node address inside a [`Tree`].
///
/// [`Tree`]: struct.Tree.html
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct NodeId {
    index: usize,
    stamp: u64,
}

impl NodeId {
    /// Returns a raw storage key.
    ///
    /// Keys of removed nodes are reused.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

#[derive(Clone, Debug)]
struct NodeData {
    stamp: u64,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    primitive: Primitive,
}

/// Container of primitives.
///
/// The root is always a group and can't be removed.
#[derive(Clone, Debug)]
pub struct Tree {
    storage: Slab<NodeData>,
    root: NodeId,
    next_stamp: u64,
}

impl Tree {
    /// Constructs a new `Tree` with an empty root group.
    pub fn new() -> Tree {
        Tree::with_root(Primitive::group())
    }

    /// Constructs a new `Tree` with a custom root primitive.
    pub fn with_root(primitive: Primitive) -> Tree {
        let mut storage = Slab::new();
        let index = storage.insert(NodeData {
            stamp: 0,
            parent: None,
            children: Vec::new(),
            primitive,
        });

        Tree {
            storage,
            root: NodeId { index, stamp: 0 },
            next_stamp: 1,
        }
    }

    /// Returns the root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Checks that the node belongs to the tree.
    pub fn contains(&self, id: NodeId) -> bool {
        self.data(id).is_some()
    }

    /// Returns a primitive.
    pub fn get(&self, id: NodeId) -> Option<&Primitive> {
        self.data(id).map(|d| &d.primitive)
    }

    /// Returns a mutable primitive.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Primitive> {
        self.data_mut(id).map(|d| &mut d.primitive)
    }

    /// Returns a primitive or an error.
    pub fn node(&self, id: NodeId) -> Result<&Primitive, Error> {
        self.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Returns a parent node, unless this node is the root of the tree.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).and_then(|d| d.parent)
    }

    /// Returns node's children in order.
    ///
    /// Unknown nodes have no children.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.data(id) {
            Some(d) => &d.children,
            None => &[],
        }
    }

    /// Checks that the node has children.
    pub fn has_children(&self, id: NodeId) -> bool {
        !self.children(id).is_empty()
    }

    /// Returns the number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns `true` if the tree has only the root node.
    pub fn is_empty(&self) -> bool {
        self.storage.len() == 1
    }

    /// Appends a new primitive as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, primitive: Primitive) -> Result<NodeId, Error> {
        if !self.contains(parent) {
            return Err(Error::NodeNotFound(parent));
        }

        let stamp = self.next_stamp;
        self.next_stamp += 1;

        let index = self.storage.insert(NodeData {
            stamp,
            parent: Some(parent),
            children: Vec::new(),
            primitive,
        });

        let id = NodeId { index, stamp };
        if let Some(d) = self.data_mut(parent) {
            d.children.push(id);
        }

        Ok(id)
    }

    /// Removes the node and all its descendants.
    ///
    /// Returns the removed primitive.
    pub fn remove(&mut self, id: NodeId) -> Result<Primitive, Error> {
        if id == self.root {
            return Err(Error::RootNode);
        }

        if !self.contains(id) {
            return Err(Error::NodeNotFound(id));
        }

        if let Some(parent) = self.parent(id) {
            if let Some(d) = self.data_mut(parent) {
                d.children.retain(|c| *c != id);
            }
        }

        let subtree: Vec<NodeId> = self.descendants(id).collect();
        let mut removed = None;
        for node in subtree {
            let d = self.storage.remove(node.index);
            if node == id {
                removed = Some(d.primitive);
            }
        }

        removed.ok_or(Error::NodeNotFound(id))
    }

    /// Returns an iterator over the node and its descendants in tree order.
    pub fn descendants(&self, id: NodeId) -> Descendants {
        let stack = if self.contains(id) { vec![id] } else { Vec::new() };
        Descendants { tree: self, stack }
    }

    /// Returns an iterator over the node and its ancestors.
    pub fn ancestors(&self, id: NodeId) -> Ancestors {
        let next = if self.contains(id) { Some(id) } else { None };
        Ancestors { tree: self, next }
    }

    fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.storage.get(id.index).filter(|d| d.stamp == id.stamp)
    }

    fn data_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.storage.get_mut(id.index).filter(|d| d.stamp == id.stamp)
    }
}

impl Default for Tree {
    fn default() -> Tree {
        Tree::new()
    }
}


/// An iterator of nodes to a given node and its descendants, in tree order.
pub struct Descendants<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack.extend(self.tree.children(id).iter().rev());
        Some(id)
    }
}


/// An iterator of nodes to a given node and its ancestors.
pub struct Ancestors<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next.take()?;
        self.next = self.tree.parent(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Geometry;

    fn rect() -> Primitive {
        Primitive::new(Geometry::Rect { width: 1.0, height: 1.0, corner_radius: 0.0 })
    }

    #[test]
    fn append_1() {
        let mut tree = Tree::new();
        let root = tree.root();
        let g = tree.append(root, Primitive::group()).unwrap();
        let r = tree.append(g, rect()).unwrap();

        assert_eq!(tree.children(root), &[g]);
        assert_eq!(tree.parent(r), Some(g));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn descendants_order() {
        let mut tree = Tree::new();
        let root = tree.root();
        let g1 = tree.append(root, Primitive::group()).unwrap();
        let r1 = tree.append(g1, rect()).unwrap();
        let g2 = tree.append(root, Primitive::group()).unwrap();
        let r2 = tree.append(g2, rect()).unwrap();

        let order: Vec<_> = tree.descendants(root).collect();
        assert_eq!(order, vec![root, g1, r1, g2, r2]);
    }

    #[test]
    fn remove_subtree() {
        let mut tree = Tree::new();
        let root = tree.root();
        let g = tree.append(root, Primitive::group()).unwrap();
        let r = tree.append(g, rect()).unwrap();

        tree.remove(g).unwrap();
        assert!(!tree.contains(g));
        assert!(!tree.contains(r));
        assert!(tree.is_empty());
        assert_eq!(tree.remove(root), Err(Error::RootNode));
    }

    #[test]
    fn removed_id_stays_dead() {
        let mut tree = Tree::new();
        let root = tree.root();
        let old = tree.append(root, rect()).unwrap();
        tree.remove(old).unwrap();

        let new = tree.append(root, Primitive::group()).unwrap();
        assert_eq!(new.index(), old.index());
        assert_ne!(new, old);
        assert!(!tree.contains(old));
        assert_eq!(tree.get(old), None);
        assert_eq!(tree.children(root), &[new]);
        assert_eq!(tree.remove(old), Err(Error::NodeNotFound(old)));
    }

    #[test]
    fn clone_is_independent() {
        let mut tree = Tree::new();
        let root = tree.root();
        let r = tree.append(root, rect()).unwrap();

        let copy = tree.clone();
        tree.get_mut(r).unwrap().visible = false;
        assert!(copy.get(r).unwrap().visible);
    }

    #[test]
    fn ancestors_1() {
        let mut tree = Tree::new();
        let root = tree.root();
        let g = tree.append(root, Primitive::group()).unwrap();
        let r = tree.append(g, rect()).unwrap();

        let chain: Vec<_> = tree.ancestors(r).collect();
        assert_eq!(chain, vec![r, g, root]);
    }
}
