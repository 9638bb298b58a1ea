//! # spark-vdom
//!
//! Virtual DOM tree model and host-position resolution for declarative
//! renderers.
//!
//! A renderer's diff engine decides *what* changed between two renders; this
//! crate answers *where the output goes*. It mirrors render descriptions as a
//! persistent, mutable tree and resolves host positions across re-renders,
//! while components render nothing, render into foreign containers
//! (portals), or haven't attached output yet.
//!
//! ## Architecture
//!
//! Nodes live in a slotmap arena owned by [`Tree`]; [`NodeKey`] is the stable
//! handle everything else passes around. The crate is generic over `R`, the
//! host-node handle of the target environment (a DOM node, a terminal cell
//! region, ...) - handles are stored and compared, never inspected.
//!
//! ```text
//! VNode description → classify → Internal node ─┐
//!                                               ├─ first_host_child
//!            diff engine mutates children/host ─┤  next_host_sibling
//!                                               └─ host_parent
//! ```
//!
//! Out of scope, by design: diffing, patching, scheduling, lifecycle
//! invocation, and host-node creation/removal all belong to the surrounding
//! engine. This crate never mutates the host environment.
//!
//! ## Modules
//!
//! - [`vnode`] - Render descriptions (VNode, Element, props, keys, identity)
//! - [`tree`] - The internal tree: arena, classifier, position queries

pub mod tree;
pub mod vnode;

// Re-export commonly used items
pub use tree::{ChildList, Internal, InstrumentHook, ModeFlags, NodeKey, NodeKind, NodeProps, Tree};

pub use vnode::{ComponentRef, Element, HostRef, Key, PropValue, Props, VNode, VNodeId, VType};
