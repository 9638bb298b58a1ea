//! Node kind and inherited-mode flags.
//!
//! The source model packs both into one integer; here the mutually exclusive
//! kind is an enum (one kind per node by construction) and only the
//! orthogonal, inheritable mode bits stay a flag set. The old kind-group
//! unions (component kinds, output-bearing kinds) become predicates.

use bitflags::bitflags;

/// What a tree node is. Exactly one kind per node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Literal text or a no-output description.
    Text,
    /// A host element.
    Element,
    /// A function component.
    Function,
    /// A stateful (class-style) component.
    Class,
    /// A root boundary: a component rendering into an explicit container.
    Root,
}

impl NodeKind {
    /// Component kinds: nodes whose output comes from rendering children,
    /// not from a host node of their own creation.
    pub const fn is_component(self) -> bool {
        matches!(self, NodeKind::Function | NodeKind::Class | NodeKind::Root)
    }

    /// Output-bearing kinds: nodes that directly own a host node once
    /// attached.
    pub const fn owns_host(self) -> bool {
        matches!(self, NodeKind::Text | NodeKind::Element | NodeKind::Root)
    }
}

bitflags! {
    /// Orthogonal rendering-mode bits, computed at classification and
    /// propagated to children by default.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModeFlags: u8 {
        /// SVG namespace is active for this node's subtree.
        const SVG = 1 << 0;
    }
}

impl ModeFlags {
    /// The subset of mode bits children inherit from their parent.
    pub const INHERITED: ModeFlags = ModeFlags::SVG;

    /// Restrict to the inheritable subset.
    pub fn inherited(self) -> ModeFlags {
        self & Self::INHERITED
    }
}

// =============================================================================
// Tests
// =============================================================================
