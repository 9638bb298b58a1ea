//! The persistent internal node.
//!
//! One `Internal` exists per rendered description occurrence. Nodes live in
//! the tree's arena and are mutated in place across renders by the diff
//! engine: children are replaced, the host node is attached and detached, the
//! component instance is retained. This module only defines the structure and
//! the read accessors traversal needs.

use std::any::Any;
use std::fmt;

use smallvec::SmallVec;

use crate::vnode::{HostRef, Key, Props, VNodeId, VType};

use super::flags::{ModeFlags, NodeKind};
use super::NodeKey;

/// Ordered child list. `None` entries are empty slots: positions whose
/// description was removed stay as gaps so sibling indices remain stable.
pub type ChildList = SmallVec<[Option<NodeKey>; 4]>;

/// Payload of an internal node: literal text, the no-output marker, or the
/// props of a structured description.
///
/// `Text` and `Empty` both belong to text-kind nodes and reconcile
/// identically; keeping them as separate variants preserves the difference
/// between "renders text" and "renders nothing" at the type level.
#[derive(Debug, Clone)]
pub enum NodeProps<R> {
    Text(String),
    Empty,
    Props(Props<R>),
}

impl<R> NodeProps<R> {
    /// Textual payload: the literal for `Text`, empty for everything else.
    pub fn text(&self) -> &str {
        match self {
            NodeProps::Text(text) => text,
            _ => "",
        }
    }

    /// Structured props, if any.
    pub fn props(&self) -> Option<&Props<R>> {
        match self {
            NodeProps::Props(props) => Some(props),
            _ => None,
        }
    }
}

/// A node of the internal tree.
///
/// Fields are public: the diff/commit engine owns `children`, `host`, and
/// `component` between traversals (see `Tree` for the mutation API it uses).
pub struct Internal<R> {
    /// Exclusive node kind.
    pub kind: NodeKind,
    /// Inherited rendering-mode bits.
    pub modes: ModeFlags,
    /// Tag or component reference; `None` for text-kind nodes.
    pub vtype: Option<VType>,
    /// Props or literal text payload.
    pub props: NodeProps<R>,
    /// Explicit reconciliation key.
    pub key: Option<Key>,
    /// Host-node ref callback from the description.
    pub host_ref: Option<HostRef<R>>,
    /// Ordered children; `None` entries are gaps.
    pub children: ChildList,
    /// Owning node, `None` at the tree root. Traversal only - never implies
    /// ownership.
    pub parent: Option<NodeKey>,
    /// Identity token; `None` is the no-identity sentinel (always the case
    /// for text-kind nodes).
    pub id: Option<VNodeId>,
    /// The single real output node this node owns, absent until attached.
    pub host: Option<R>,
    /// Live component instance; only meaningful for component kinds.
    pub component: Option<Box<dyn Any>>,
    /// Distance from the tree root.
    pub depth: u32,
}

impl<R> Internal<R> {
    /// Tag name, if this node was classified from a host tag.
    pub fn tag(&self) -> Option<&str> {
        match &self.vtype {
            Some(VType::Tag(tag)) => Some(tag),
            _ => None,
        }
    }

    /// The explicitly declared target container, for root-boundary nodes.
    pub fn declared_host(&self) -> Option<&R> {
        self.props.props().and_then(|props| props.host.as_ref())
    }

    /// Whether two nodes carry the same identity token.
    ///
    /// Sentinel ids (`None`) never match anything, including each other, so
    /// sibling text nodes are never reconciliation matches by identity alone.
    pub fn same_identity(&self, other: &Internal<R>) -> bool {
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

impl<R: fmt::Debug> fmt::Debug for Internal<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Internal")
            .field("kind", &self.kind)
            .field("modes", &self.modes)
            .field("vtype", &self.vtype)
            .field("key", &self.key)
            .field("id", &self.id)
            .field("host", &self.host)
            .field("depth", &self.depth)
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn text_node(id: Option<VNodeId>) -> Internal<()> {
        Internal {
            kind: NodeKind::Text,
            modes: ModeFlags::empty(),
            vtype: None,
            props: NodeProps::Text("hi".to_string()),
            key: None,
            host_ref: None,
            children: ChildList::new(),
            parent: None,
            id,
            host: None,
            component: None,
            depth: 0,
        }
    }

    #[test]
    fn sentinel_identity_never_matches() {
        let a = text_node(None);
        let b = text_node(None);
        assert!(!a.same_identity(&b));
        assert!(!a.same_identity(&a));
    }

    #[test]
    fn real_identity_matches_itself() {
        let id = VNodeId(42);
        let a = text_node(Some(id));
        let b = text_node(Some(id));
        assert!(a.same_identity(&b));
        assert!(!a.same_identity(&text_node(Some(VNodeId(43)))));
    }

    #[test]
    fn payload_text() {
        let node = text_node(None);
        assert_eq!(node.props.text(), "hi");
        assert_eq!(NodeProps::<()>::Empty.text(), "");
    }
}
