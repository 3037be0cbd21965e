// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::time::{Duration, Instant};

use crate::dom::{NodeId, Session};

/// Options that defines tag edits debouncing.
#[derive(Clone, Copy, Debug)]
pub struct DebounceOptions {
    /// Delay between the last keystroke and the tree mutation.
    ///
    /// Default: 150ms
    pub delay: Duration,
}

impl Default for DebounceOptions {
    fn default() -> DebounceOptions {
        DebounceOptions {
            delay: Duration::from_millis(150),
        }
    }
}

#[derive(Debug)]
struct PendingEdit {
    node: NodeId,
    field: String,
    value: String,
    due: Instant,
}

/// Collects tag text-field edits and applies only the last one per
/// node and field, after a quiet period.
///
/// Time is passed in explicitly, so the caller's event loop decides
/// when to poll.
#[derive(Debug)]
pub struct TagEditDebouncer {
    opt: DebounceOptions,
    pending: Vec<PendingEdit>,
}

impl TagEditDebouncer {
    /// Constructs a new debouncer.
    pub fn new(opt: DebounceOptions) -> TagEditDebouncer {
        TagEditDebouncer {
            opt,
            pending: Vec::new(),
        }
    }

    /// Records an edit. A previous pending edit of the same field is replaced
    /// and its deadline is restarted.
    pub fn push(&mut self, now: Instant, node: NodeId, field: &str, value: &str) {
        let due = now + self.opt.delay;
        match self.pending.iter_mut().find(|e| e.node == node && e.field == field) {
            Some(e) => {
                e.value = value.to_string();
                e.due = due;
            }
            None => {
                self.pending.push(PendingEdit {
                    node,
                    field: field.to_string(),
                    value: value.to_string(),
                    due,
                });
            }
        }
    }

    /// Returns the earliest deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|e| e.due).min()
    }

    /// Returns `true` if there are no pending edits.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Applies all edits whose deadline has passed.
    ///
    /// Returns the number of applied edits.
    pub fn flush_due(&mut self, now: Instant, session: &mut Session) -> usize {
        let (due, rest): (Vec<_>, Vec<_>) = self.pending.drain(..).partition(|e| e.due <= now);
        self.pending = rest;
        apply(due, session)
    }

    /// Applies all pending edits immediately.
    pub fn flush_all(&mut self, session: &mut Session) -> usize {
        let edits: Vec<_> = self.pending.drain(..).collect();
        apply(edits, session)
    }
}

impl Default for TagEditDebouncer {
    fn default() -> TagEditDebouncer {
        TagEditDebouncer::new(DebounceOptions::default())
    }
}

fn apply(edits: Vec<PendingEdit>, session: &mut Session) -> usize {
    let mut count = 0;
    for e in edits {
        // The node may be removed while an edit is pending.
        match super::set_tag(session, e.node, &e.field, &e.value) {
            Ok(_) => count += 1,
            Err(err) => warn!("Tag edit of {} '{}' was dropped cause {}.", e.node, e.field, err),
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Primitive, Tree};

    #[test]
    fn last_edit_wins() {
        let mut session = Session::new(Tree::new());
        let root = session.root();
        let g = session.append(root, Primitive::group()).unwrap();

        let t0 = Instant::now();
        let mut d = TagEditDebouncer::default();
        d.push(t0, g, "row", "1");
        d.push(t0 + Duration::from_millis(50), g, "row", "12");

        assert_eq!(d.flush_due(t0 + Duration::from_millis(160), &mut session), 0);
        assert_eq!(d.next_deadline(), Some(t0 + Duration::from_millis(200)));
        assert_eq!(d.flush_due(t0 + Duration::from_millis(200), &mut session), 1);
        assert!(d.is_empty());
        assert_eq!(session.identifier_string(g), Some("R12".to_string()));
    }

    #[test]
    fn removed_node() {
        let mut session = Session::new(Tree::new());
        let root = session.root();
        let g = session.append(root, Primitive::group()).unwrap();

        let mut d = TagEditDebouncer::default();
        d.push(Instant::now(), g, "row", "1");
        session.remove(g).unwrap();
        assert_eq!(d.flush_all(&mut session), 0);
    }

    #[test]
    fn removed_node_slot_reused() {
        let mut session = Session::new(Tree::new());
        let root = session.root();
        let g = session.append(root, Primitive::group()).unwrap();

        let mut d = TagEditDebouncer::default();
        d.push(Instant::now(), g, "row", "1");
        session.remove(g).unwrap();
        let other = session.append(root, Primitive::group()).unwrap();
        assert_eq!(other.index(), g.index());

        assert_eq!(d.flush_all(&mut session), 0);
        assert_eq!(session.identifier_string(other), None);
        assert!(session.get(other).unwrap().attributes.is_empty());
    }
}
