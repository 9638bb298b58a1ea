//! Host-position resolution.
//!
//! Three questions the commit engine asks before it touches the host tree:
//!
//! - [`Tree::first_host_child`] - the first already-attached host node at or
//!   below a node's children, in document order.
//! - [`Tree::next_host_sibling`] - the host node that would appear
//!   immediately after a node in document order (the insertion anchor).
//! - [`Tree::host_parent`] - the real container a node's output attaches
//!   into.
//!
//! All three are pure reads over tree state. "Not found" is a normal answer,
//! never an error: the very first insertion has no sibling, a component may
//! have rendered nothing yet, and an unattached element simply has no host
//! node to report.

use super::flags::NodeKind;
use super::{NodeKey, Tree};

impl<R: PartialEq> Tree<R> {
    /// Whether a search may descend into (or climb out of) this node.
    ///
    /// Only component kinds are transparent to the search. A root boundary is
    /// transparent only while it still renders into the same container as its
    /// logical parent; once reparented, its output lives elsewhere in the
    /// host tree and must not be reported as positioned here.
    fn search_eligible(&self, key: NodeKey) -> bool {
        let Some(node) = self.get(key) else {
            return false;
        };
        if !node.kind.is_component() {
            return false;
        }
        if node.kind != NodeKind::Root {
            return true;
        }
        match node.parent {
            Some(parent) => node.declared_host() == self.host_parent(parent),
            // A detached root boundary has no logical container to diverge
            // from; treat it as in place.
            None => true,
        }
    }

    /// Find the first attached host node among `children[start..]`, in
    /// document order.
    ///
    /// Empty slots are skipped. An output-bearing child reports its own host
    /// node; if that is still unset the child counts as "not found here" and
    /// the scan moves on. Component children are searched recursively, except
    /// root boundaries that were reparented to a different container - their
    /// output is not positioned inside this parent.
    pub fn first_host_child(&self, key: NodeKey, start: usize) -> Option<&R> {
        let node = self.get(key)?;

        for slot in node.children.iter().skip(start) {
            let Some(child_key) = *slot else { continue };
            let Some(child) = self.get(child_key) else {
                continue;
            };

            if child.kind.owns_host() {
                if let Some(host) = child.host.as_ref() {
                    return Some(host);
                }
            }

            if self.search_eligible(child_key) {
                if let Some(host) = self.first_host_child(child_key, 0) {
                    return Some(host);
                }
            }
        }

        None
    }

    /// Find the nearest host node that would follow `key` in document order.
    ///
    /// This is the insertion anchor: a new host node for `key` goes right
    /// before the returned node, or at the end of its container when the
    /// result is `None` (end of document, or nothing attached after it yet).
    pub fn next_host_sibling(&self, key: NodeKey) -> Option<&R> {
        let parent = self.get(key)?.parent?;
        let position = self
            .get(parent)?
            .children
            .iter()
            .position(|slot| *slot == Some(key))?;
        self.host_sibling_from(parent, position + 1)
    }

    /// Resume the sibling search at an explicit position among `key`'s
    /// children.
    ///
    /// Looks through the remaining children first, then - if `key` is itself
    /// transparent to the search - continues one level up, after `key`'s own
    /// position. The climb stops at output-bearing nodes: past one of those
    /// the search would cross into host territory that does not belong to the
    /// starting node's container.
    pub fn host_sibling_from(&self, key: NodeKey, start: usize) -> Option<&R> {
        if let Some(host) = self.first_host_child(key, start) {
            return Some(host);
        }

        let node = self.get(key)?;
        if node.parent.is_some() && self.search_eligible(key) {
            return self.next_host_sibling(key);
        }

        None
    }

    /// Resolve the real container `key`'s output attaches into.
    ///
    /// A root boundary answers with its own declared target. Otherwise the
    /// walk climbs ancestors until one supplies a container: a root-boundary
    /// ancestor contributes its declared target, an element ancestor its
    /// attached host node. An element ancestor that is not attached yet
    /// contributes nothing and the walk continues.
    ///
    /// Reaching the tree root without a container means the caller asked
    /// about a detached node; the result is `None` and a diagnostic event.
    pub fn host_parent(&self, key: NodeKey) -> Option<&R> {
        let node = self.get(key)?;

        let mut container = match node.kind {
            NodeKind::Root => node.declared_host(),
            _ => None,
        };

        let mut cursor = node.parent;
        while container.is_none() {
            let Some(parent_key) = cursor else { break };
            let Some(parent) = self.get(parent_key) else {
                break;
            };
            match parent.kind {
                NodeKind::Root => container = parent.declared_host(),
                NodeKind::Element => container = parent.host.as_ref(),
                _ => {}
            }
            cursor = parent.parent;
        }

        if container.is_none() {
            tracing::debug!(node = ?key, "no host container above node");
        }

        container
    }
}

// =============================================================================
// Tests
// =============================================================================
