//! The internal tree: arena, classifier, and mutation surface.
//!
//! `Tree` owns every node in a slotmap arena; `NodeKey` is the stable handle
//! the diff/commit engine passes back in. Classification
//! ([`Tree::classify`]) builds one node per render description; the position
//! queries ([`Tree::first_host_child`], [`Tree::next_host_sibling`],
//! [`Tree::host_parent`]) answer where output goes.
//!
//! The tree never mutates the host environment. The diff engine drives all
//! structural mutation through the explicit API here (`append_child`,
//! `set_children`, `set_host`, `remove_subtree`, ...), between traversals.

mod flags;
mod internal;
mod traverse;

pub use flags::{ModeFlags, NodeKind};
pub use internal::{ChildList, Internal, NodeProps};

use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

use crate::vnode::{VNode, VType};

new_key_type! {
    /// Stable arena handle of an internal node.
    pub struct NodeKey;
}

/// Hook invoked after every classification with the new node and the
/// description it was built from. Instrumentation only - nothing in this
/// crate depends on it.
pub type InstrumentHook<R> = Rc<dyn Fn(NodeKey, &Internal<R>, &VNode<R>)>;

/// The internal tree of a renderer instance.
pub struct Tree<R> {
    nodes: SlotMap<NodeKey, Internal<R>>,
    instrument: Option<InstrumentHook<R>>,
}

impl<R> Default for Tree<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Tree<R> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            instrument: None,
        }
    }

    // =========================================================================
    // Node access
    // =========================================================================

    pub fn get(&self, key: NodeKey) -> Option<&Internal<R>> {
        self.nodes.get(key)
    }

    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut Internal<R>> {
        self.nodes.get_mut(key)
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // =========================================================================
    // Instrumentation
    // =========================================================================

    /// Register the classification hook.
    pub fn set_instrument(&mut self, hook: impl Fn(NodeKey, &Internal<R>, &VNode<R>) + 'static) {
        self.instrument = Some(Rc::new(hook));
    }

    /// Remove the classification hook.
    pub fn clear_instrument(&mut self) {
        self.instrument = None;
    }

    // =========================================================================
    // Engine mutation surface
    // =========================================================================

    /// Append a child to a parent's child list.
    ///
    /// Classification leaves child lists to the engine; this and
    /// [`Tree::set_children`] are how links get made.
    pub fn append_child(&mut self, parent: NodeKey, child: NodeKey) {
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(Some(child));
    }

    /// Replace a parent's child list wholesale. `None` entries are gaps.
    pub fn set_children(
        &mut self,
        parent: NodeKey,
        children: impl IntoIterator<Item = Option<NodeKey>>,
    ) {
        let children: ChildList = children.into_iter().collect();
        for child in children.iter().flatten() {
            self.nodes[*child].parent = Some(parent);
        }
        self.nodes[parent].children = children;
    }

    /// Turn one child slot into a gap, keeping sibling indices stable.
    pub fn clear_child_slot(&mut self, parent: NodeKey, index: usize) {
        if let Some(slot) = self.nodes[parent].children.get_mut(index) {
            *slot = None;
        }
    }

    /// Attach the owned host node.
    pub fn set_host(&mut self, key: NodeKey, host: R) {
        self.nodes[key].host = Some(host);
    }

    /// Detach and return the owned host node.
    pub fn take_host(&mut self, key: NodeKey) -> Option<R> {
        self.nodes[key].host.take()
    }

    /// Retain the live component instance.
    pub fn set_component(&mut self, key: NodeKey, component: Box<dyn std::any::Any>) {
        self.nodes[key].component = Some(component);
    }

    /// Detach and return the component instance.
    pub fn take_component(&mut self, key: NodeKey) -> Option<Box<dyn std::any::Any>> {
        self.nodes[key].component.take()
    }

    /// Discard a node and all of its descendants.
    ///
    /// The node's slot in its parent's child list becomes a gap; removing the
    /// matching host nodes is the commit engine's job and happens before this
    /// is called.
    pub fn remove_subtree(&mut self, key: NodeKey) {
        if let Some(parent) = self.nodes.get(key).and_then(|node| node.parent) {
            if let Some(parent) = self.nodes.get_mut(parent) {
                if let Some(slot) = parent.children.iter_mut().find(|slot| **slot == Some(key)) {
                    *slot = None;
                }
            }
        }

        let mut pending = vec![key];
        while let Some(key) = pending.pop() {
            if let Some(node) = self.nodes.remove(key) {
                pending.extend(node.children.into_iter().flatten());
            }
        }
    }
}

impl<R: Clone> Tree<R> {
    // =========================================================================
    // Classification
    // =========================================================================

    /// Build one internal node from a render description.
    ///
    /// Every description classifies into exactly one kind:
    /// - text and no-output descriptions become text-kind nodes with the
    ///   no-identity sentinel;
    /// - a tag becomes an element;
    /// - a component becomes class kind when its definition is stateful, a
    ///   root boundary when its props declare a target container, and a
    ///   function component otherwise.
    ///
    /// Mode bits start from the parent's inheritable subset. An `svg` element
    /// turns SVG mode on; a child of a `foreignObject` that is itself in SVG
    /// mode turns it back off for the new node and its descendants.
    ///
    /// The new node is not linked into `parent.children` - child lists belong
    /// to the diff engine.
    pub fn classify(&mut self, vnode: &VNode<R>, parent: Option<NodeKey>) -> NodeKey {
        let parent_node = parent.map(|key| &self.nodes[key]);
        let mut modes = parent_node
            .map(|node| node.modes.inherited())
            .unwrap_or_default();
        let depth = parent_node.map(|node| node.depth + 1).unwrap_or(0);

        let (kind, vtype, props, key, host_ref, id) = match vnode {
            VNode::Text(text) => (
                NodeKind::Text,
                None,
                NodeProps::Text(text.clone()),
                None,
                None,
                None,
            ),
            VNode::Empty => (NodeKind::Text, None, NodeProps::Empty, None, None, None),
            VNode::Element(element) => {
                let kind = match &element.vtype {
                    VType::Tag(_) => NodeKind::Element,
                    VType::Component(component) if component.is_stateful() => NodeKind::Class,
                    VType::Component(_) if element.props.host.is_some() => NodeKind::Root,
                    VType::Component(_) => NodeKind::Function,
                };

                if kind == NodeKind::Element && element.vtype.tag_name() == Some("svg") {
                    modes |= ModeFlags::SVG;
                } else if let Some(parent) = parent_node {
                    if parent.modes.contains(ModeFlags::SVG)
                        && parent.tag() == Some("foreignObject")
                    {
                        modes -= ModeFlags::SVG;
                    }
                }

                (
                    kind,
                    Some(element.vtype.clone()),
                    NodeProps::Props(element.props.clone()),
                    element.key.clone(),
                    element.host_ref.clone(),
                    Some(element.id),
                )
            }
        };

        let node = self.nodes.insert(Internal {
            kind,
            modes,
            vtype,
            props,
            key,
            host_ref,
            children: ChildList::new(),
            parent,
            id,
            host: None,
            component: None,
            depth,
        });

        if let Some(hook) = self.instrument.clone() {
            hook(node, &self.nodes[node], vnode);
        }

        node
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vnode::{ComponentRef, Element, Key};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Stand-in host handle.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Host(&'static str);

    fn classify_one(vnode: impl Into<VNode<Host>>) -> (Tree<Host>, NodeKey) {
        let mut tree = Tree::new();
        let key = tree.classify(&vnode.into(), None);
        (tree, key)
    }

    #[test]
    fn text_classifies_with_sentinel_id() {
        let (tree, key) = classify_one("hello");
        let node = tree.get(key).unwrap();
        assert_eq!(node.kind, NodeKind::Text);
        assert_eq!(node.props.text(), "hello");
        assert!(node.id.is_none());
        assert!(node.vtype.is_none());
        assert_eq!(node.depth, 0);
    }

    #[test]
    fn empty_classifies_like_text() {
        let (tree, key) = classify_one(VNode::Empty);
        let node = tree.get(key).unwrap();
        assert_eq!(node.kind, NodeKind::Text);
        assert_eq!(node.props.text(), "");
        assert!(matches!(node.props, NodeProps::Empty));
        assert!(node.id.is_none());
    }

    #[test]
    fn sibling_text_nodes_never_match_by_identity() {
        let mut tree: Tree<Host> = Tree::new();
        let a = tree.classify(&VNode::text("a"), None);
        let b = tree.classify(&VNode::text("a"), None);
        assert!(!tree.get(a).unwrap().same_identity(tree.get(b).unwrap()));
    }

    #[test]
    fn tag_classifies_as_element() {
        let (tree, key) = classify_one(Element::tag("div").key("k"));
        let node = tree.get(key).unwrap();
        assert_eq!(node.kind, NodeKind::Element);
        assert_eq!(node.tag(), Some("div"));
        assert_eq!(node.key, Some(Key::Str("k".to_string())));
        assert!(node.id.is_some());
    }

    #[test]
    fn component_kinds() {
        let (tree, key) = classify_one(Element::component(ComponentRef::function("App")));
        assert_eq!(tree.get(key).unwrap().kind, NodeKind::Function);

        let (tree, key) = classify_one(Element::component(ComponentRef::stateful("App")));
        assert_eq!(tree.get(key).unwrap().kind, NodeKind::Class);

        let (tree, key) = classify_one(
            Element::component(ComponentRef::function("Overlay")).portal(Host("modal-layer")),
        );
        let node = tree.get(key).unwrap();
        assert_eq!(node.kind, NodeKind::Root);
        assert_eq!(node.declared_host(), Some(&Host("modal-layer")));
    }

    #[test]
    fn stateful_component_with_target_is_still_class_kind() {
        // The stateful marker wins over the declared container, as in the
        // source model's classification order.
        let (tree, key) = classify_one(
            Element::component(ComponentRef::stateful("Modal")).portal(Host("layer")),
        );
        assert_eq!(tree.get(key).unwrap().kind, NodeKind::Class);
    }

    #[test]
    fn depth_follows_parent_chain() {
        let mut tree: Tree<Host> = Tree::new();
        let root = tree.classify(&Element::tag("main").into(), None);
        let child = tree.classify(&Element::tag("section").into(), Some(root));
        let grandchild = tree.classify(&VNode::text("leaf"), Some(child));

        assert_eq!(tree.get(root).unwrap().depth, 0);
        assert_eq!(tree.get(child).unwrap().depth, 1);
        assert_eq!(tree.get(grandchild).unwrap().depth, 2);
    }

    #[test]
    fn svg_mode_turns_on_at_svg_tag_and_inherits() {
        let mut tree: Tree<Host> = Tree::new();
        let svg = tree.classify(&Element::tag("svg").into(), None);
        let circle = tree.classify(&Element::tag("circle").into(), Some(svg));
        let label = tree.classify(&VNode::text("label"), Some(circle));

        assert!(tree.get(svg).unwrap().modes.contains(ModeFlags::SVG));
        assert!(tree.get(circle).unwrap().modes.contains(ModeFlags::SVG));
        assert!(tree.get(label).unwrap().modes.contains(ModeFlags::SVG));
    }

    #[test]
    fn foreign_object_child_leaves_svg_mode() {
        let mut tree: Tree<Host> = Tree::new();
        let svg = tree.classify(&Element::tag("svg").into(), None);
        let foreign = tree.classify(&Element::tag("foreignObject").into(), Some(svg));
        let div = tree.classify(&Element::tag("div").into(), Some(foreign));
        let span = tree.classify(&Element::tag("span").into(), Some(div));

        // foreignObject itself is still inside SVG mode.
        assert!(tree.get(foreign).unwrap().modes.contains(ModeFlags::SVG));
        // Its element children and their descendants are not.
        assert!(!tree.get(div).unwrap().modes.contains(ModeFlags::SVG));
        assert!(!tree.get(span).unwrap().modes.contains(ModeFlags::SVG));
    }

    #[test]
    fn svg_mode_inherits_through_components() {
        let mut tree: Tree<Host> = Tree::new();
        let svg = tree.classify(&Element::tag("svg").into(), None);
        let comp = tree.classify(
            &Element::component(ComponentRef::function("Icon")).into(),
            Some(svg),
        );
        let path = tree.classify(&Element::tag("path").into(), Some(comp));

        assert!(tree.get(comp).unwrap().modes.contains(ModeFlags::SVG));
        assert!(tree.get(path).unwrap().modes.contains(ModeFlags::SVG));
    }

    #[test]
    fn classification_is_idempotent() {
        let vnode: VNode<Host> = Element::tag("div").key("stable").into();
        let mut tree: Tree<Host> = Tree::new();
        let a = tree.classify(&vnode, None);
        let b = tree.classify(&vnode, None);

        let (a, b) = (tree.get(a).unwrap(), tree.get(b).unwrap());
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.modes, b.modes);
        assert_eq!(a.key, b.key);
        assert_eq!(a.id, b.id);
        assert_eq!(a.depth, b.depth);
    }

    #[test]
    fn instrument_hook_sees_every_classification() {
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();

        let mut tree: Tree<Host> = Tree::new();
        tree.set_instrument(move |_, node, _| {
            assert_eq!(node.kind, NodeKind::Text);
            seen.set(seen.get() + 1);
        });
        tree.classify(&VNode::text("a"), None);
        tree.classify(&VNode::Empty, None);
        assert_eq!(count.get(), 2);

        tree.clear_instrument();
        tree.classify(&VNode::text("b"), None);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn remove_subtree_leaves_a_gap() {
        let mut tree: Tree<Host> = Tree::new();
        let root = tree.classify(&Element::tag("main").into(), None);
        let a = tree.classify(&Element::tag("a").into(), Some(root));
        let b = tree.classify(&Element::tag("b").into(), Some(root));
        let b_child = tree.classify(&VNode::text("x"), Some(b));
        tree.append_child(root, a);
        tree.append_child(root, b);
        tree.append_child(b, b_child);

        tree.remove_subtree(b);

        assert!(!tree.contains(b));
        assert!(!tree.contains(b_child));
        assert!(tree.contains(a));
        let children = &tree.get(root).unwrap().children;
        assert_eq!(children.as_slice(), &[Some(a), None]);
    }

    #[test]
    fn set_children_relinks_parents() {
        let mut tree: Tree<Host> = Tree::new();
        let root = tree.classify(&Element::tag("main").into(), None);
        let a = tree.classify(&Element::tag("a").into(), None);
        let b = tree.classify(&Element::tag("b").into(), None);

        tree.set_children(root, [Some(a), None, Some(b)]);

        assert_eq!(tree.get(a).unwrap().parent, Some(root));
        assert_eq!(tree.get(b).unwrap().parent, Some(root));
        assert_eq!(tree.get(root).unwrap().children.len(), 3);
    }
}
