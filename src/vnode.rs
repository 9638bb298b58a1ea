//! Render descriptions - the declarative input vocabulary of the tree.
//!
//! A [`VNode`] is what a render pass produces: literal text, "nothing", or a
//! structured [`Element`] carrying a type, props, an optional key/ref, and an
//! identity token. The classifier (`Tree::classify`) turns each description
//! into a persistent internal node; descriptions themselves are throwaway.
//!
//! Everything here is generic over `R`, the host-node handle of the target
//! environment. This crate never looks inside an `R` - it only stores,
//! compares, and returns handles.

use std::borrow::Cow;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

// =============================================================================
// Identity
// =============================================================================

thread_local! {
    /// Counter for generating description identity tokens.
    static NEXT_VNODE_ID: Cell<u64> = const { Cell::new(1) };
}

/// Opaque identity token carried by every structured description.
///
/// Text and empty descriptions carry no token at all (`Option<VNodeId>` is
/// `None` on their internal nodes), so two of them never compare as the same
/// identity - not even to themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VNodeId(pub u64);

impl VNodeId {
    /// Allocate a fresh, unique token.
    pub fn fresh() -> Self {
        NEXT_VNODE_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            VNodeId(id)
        })
    }
}

/// Explicit reconciliation key from the source description.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Str(String),
    Num(u64),
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Str(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Str(value)
    }
}

impl From<u64> for Key {
    fn from(value: u64) -> Self {
        Key::Num(value)
    }
}

// =============================================================================
// Component references
// =============================================================================

/// Reference to a component definition.
///
/// The `stateful` marker is what distinguishes a class-style component (one
/// that owns render state and exposes a render method) from a plain function
/// component during classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentRef {
    name: &'static str,
    stateful: bool,
}

impl ComponentRef {
    /// A function component definition.
    pub const fn function(name: &'static str) -> Self {
        Self {
            name,
            stateful: false,
        }
    }

    /// A stateful (class-style) component definition.
    pub const fn stateful(name: &'static str) -> Self {
        Self {
            name,
            stateful: true,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn is_stateful(&self) -> bool {
        self.stateful
    }
}

/// The type of a structured description: a host tag or a component reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VType {
    Tag(Cow<'static, str>),
    Component(ComponentRef),
}

impl VType {
    /// Tag name, if this is a host tag.
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            VType::Tag(tag) => Some(tag),
            VType::Component(_) => None,
        }
    }
}

// =============================================================================
// Props
// =============================================================================

/// A single attribute value. The tree stores these opaquely; reading them is
/// the diff engine's business.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Int(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Float(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

/// Properties of a structured description.
///
/// `host` is the explicit target container: a component description that
/// carries one classifies as a root boundary and renders its subtree into
/// that container instead of its logical parent's.
#[derive(Debug, Clone, PartialEq)]
pub struct Props<R> {
    /// Explicit target container (portal/root descriptions only).
    pub host: Option<R>,
    /// Opaque attribute map.
    pub values: BTreeMap<String, PropValue>,
}

impl<R> Default for Props<R> {
    fn default() -> Self {
        Self {
            host: None,
            values: BTreeMap::new(),
        }
    }
}

// =============================================================================
// Descriptions
// =============================================================================

/// Callback handed the owned host node once it is attached (and `None` when
/// it is detached). Stored by the tree, invoked by the commit engine.
pub type HostRef<R> = Rc<dyn Fn(Option<&R>)>;

/// A structured render description.
pub struct Element<R> {
    pub vtype: VType,
    pub props: Props<R>,
    pub key: Option<Key>,
    pub host_ref: Option<HostRef<R>>,
    pub id: VNodeId,
}

impl<R: Clone> Clone for Element<R> {
    fn clone(&self) -> Self {
        Self {
            vtype: self.vtype.clone(),
            props: self.props.clone(),
            key: self.key.clone(),
            host_ref: self.host_ref.clone(),
            id: self.id,
        }
    }
}

impl<R> fmt::Debug for Element<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("vtype", &self.vtype)
            .field("key", &self.key)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl<R> Element<R> {
    /// Describe a host element by tag name.
    pub fn tag(tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            vtype: VType::Tag(tag.into()),
            props: Props::default(),
            key: None,
            host_ref: None,
            id: VNodeId::fresh(),
        }
    }

    /// Describe a component instance.
    pub fn component(component: ComponentRef) -> Self {
        Self {
            vtype: VType::Component(component),
            props: Props::default(),
            key: None,
            host_ref: None,
            id: VNodeId::fresh(),
        }
    }

    /// Set the reconciliation key.
    pub fn key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set an attribute.
    pub fn prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.values.insert(name.into(), value.into());
        self
    }

    /// Declare an explicit target container, making a component description
    /// a root boundary.
    pub fn portal(mut self, host: R) -> Self {
        self.props.host = Some(host);
        self
    }

    /// Attach a host-node ref callback.
    pub fn host_ref(mut self, host_ref: impl Fn(Option<&R>) + 'static) -> Self {
        self.host_ref = Some(Rc::new(host_ref));
        self
    }

    /// Override the identity token (reconciliation reuses tokens across
    /// renders; fresh builders allocate a new one).
    pub fn id(mut self, id: VNodeId) -> Self {
        self.id = id;
        self
    }
}

/// One render description: what a single slot of a render output contains.
///
/// `Text` and `Empty` are kept distinct here and in the internal node payload
/// even though they classify identically (both become text-kind nodes with no
/// identity): the renderer treats "renders nothing" and "renders literal
/// text" the same way for reconciliation, but the payload distinction stays
/// visible at the type level.
#[derive(Debug, Clone)]
pub enum VNode<R> {
    /// Literal text.
    Text(String),
    /// A no-output description (absent/null/boolean in the source model).
    Empty,
    /// A structured description.
    Element(Box<Element<R>>),
}

impl<R> VNode<R> {
    pub fn text(text: impl Into<String>) -> Self {
        VNode::Text(text.into())
    }
}

impl<R> From<Element<R>> for VNode<R> {
    fn from(element: Element<R>) -> Self {
        VNode::Element(Box::new(element))
    }
}

impl<R> From<&str> for VNode<R> {
    fn from(text: &str) -> Self {
        VNode::Text(text.to_string())
    }
}

impl<R> From<String> for VNode<R> {
    fn from(text: String) -> Self {
        VNode::Text(text)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_unique() {
        let a = VNodeId::fresh();
        let b = VNodeId::fresh();
        assert_ne!(a, b);
    }

    #[test]
    fn tag_builder() {
        let el: Element<()> = Element::tag("div").key("row-1").prop("title", "hello");
        assert_eq!(el.vtype.tag_name(), Some("div"));
        assert_eq!(el.key, Some(Key::Str("row-1".to_string())));
        assert_eq!(
            el.props.values.get("title"),
            Some(&PropValue::Str("hello".to_string()))
        );
        assert!(el.props.host.is_none());
    }

    #[test]
    fn portal_builder_sets_target() {
        let el: Element<u32> = Element::component(ComponentRef::function("Overlay")).portal(7);
        assert_eq!(el.props.host, Some(7));
    }

    #[test]
    fn component_ref_markers() {
        assert!(!ComponentRef::function("App").is_stateful());
        assert!(ComponentRef::stateful("App").is_stateful());
        assert_eq!(ComponentRef::function("App").name(), "App");
    }
}
