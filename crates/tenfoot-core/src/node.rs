use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::{Anchors, Rect, Size, Vec2};

slotmap::new_key_type! {
    /// Arena key of a node inside a [`NodeTree`](crate::NodeTree).
    pub struct NodeId;
}

/// Stable serial number of a node, minted by the tree's [`IdGen`].
pub type ViewId = u64;

/// Record handed out by a data source. Slots only ever hold it transiently.
pub type Record = Rc<dyn Any>;

/// Serial id generator owned by a tree.
#[derive(Debug)]
pub struct IdGen {
    next: ViewId,
}

impl Default for IdGen {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGen {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn starting_at(first: ViewId) -> Self {
        Self { next: first }
    }

    pub fn next_id(&mut self) -> ViewId {
        let id = self.next;
        self.next += 1;
        id
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        const VISIBLE = 1;
        const ENABLE = 1 << 1;
        const FOCUSABLE = 1 << 2;
        const EDITABLE = 1 << 3;
        /// Set while the node is the page's pressed node.
        const CLICKING = 1 << 4;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        NodeFlags::VISIBLE | NodeFlags::ENABLE
    }
}

/// The closed set of node variants the core cares about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Plain,
    /// Item template of a list or grid, and the slots cloned from it.
    Item,
    /// Message template shown for a non-list display state
    /// (`loading`, `empty`, `error`, `error:<code>`).
    Message { state: String },
    List,
    Grid,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Plain => write!(f, "Plain"),
            NodeKind::Item => write!(f, "Item"),
            NodeKind::Message { state } => write!(f, "Message({state})"),
            NodeKind::List => write!(f, "List"),
            NodeKind::Grid => write!(f, "Grid"),
        }
    }
}

/// How a search root ranks candidates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FocusPolicy {
    /// Arrow keys: perpendicular deviation from the axis point is penalized.
    #[default]
    Directional,
    /// Plain distance from the axis point.
    Nearest,
}

/// Per-node hooks. All methods have no-op defaults.
pub trait Behavior: BehaviorClone + 'static {
    /// Node-pair compatibility check consulted on the *current* node.
    fn can_move_focus(&self, _from: NodeId, _to: NodeId) -> bool {
        true
    }

    /// Fired on every node along the losing/gaining chain of a focus change.
    fn on_focus_changed(&mut self, _node: NodeId, _focused: bool) {}

    /// Fired on a slot and each of its descendants after the slot is rebound.
    fn on_record_changed(&mut self, _node: NodeId, _index: Option<usize>, _record: Option<&Record>) {}

    /// Fired when the pressed node is released while still focused.
    fn on_activate(&mut self, _node: NodeId) {}
}

pub trait BehaviorClone {
    fn clone_box(&self) -> Box<dyn Behavior>;
}

impl<T: Behavior + Clone> BehaviorClone for T {
    fn clone_box(&self) -> Box<dyn Behavior> {
        Box::new(self.clone())
    }
}

/// A tree element. Build one with the chained setters, then hand it to
/// [`NodeTree::insert`](crate::NodeTree::insert).
pub struct Node {
    pub(crate) serial: ViewId,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: SmallVec<[NodeId; 4]>,
    pub(crate) anchors: Anchors,
    pub(crate) border: f32,
    pub(crate) flags: NodeFlags,
    pub(crate) policy: FocusPolicy,
    pub(crate) scroll: Vec2,
    pub(crate) scroll_extent: Size,
    pub(crate) record_index: Option<usize>,
    pub(crate) rect: Cell<Option<Rect>>,
    pub(crate) behavior: Option<Box<dyn Behavior>>,
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("serial", &self.serial)
            .field("kind", &self.kind)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("anchors", &self.anchors)
            .field("flags", &self.flags)
            .field("record_index", &self.record_index)
            .field("behavior", &self.behavior.as_ref().map(|_| "<behavior>"))
            .finish()
    }
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Node {
            serial: 0,
            kind,
            parent: None,
            children: SmallVec::new(),
            anchors: Anchors::default(),
            border: 0.0,
            flags: NodeFlags::default(),
            policy: FocusPolicy::default(),
            scroll: Vec2::ZERO,
            scroll_extent: Size::ZERO,
            record_index: None,
            rect: Cell::new(None),
            behavior: None,
        }
    }

    pub fn plain() -> Self {
        Self::new(NodeKind::Plain)
    }

    pub fn item() -> Self {
        Self::new(NodeKind::Item)
    }

    pub fn message(state: impl Into<String>) -> Self {
        Self::new(NodeKind::Message {
            state: state.into(),
        })
    }

    pub fn anchors(mut self, a: Anchors) -> Self {
        self.anchors = a;
        self
    }
    pub fn border(mut self, width: f32) -> Self {
        self.border = width.max(0.0);
        self
    }
    pub fn focusable(mut self, on: bool) -> Self {
        self.flags.set(NodeFlags::FOCUSABLE, on);
        self
    }
    pub fn visible(mut self, on: bool) -> Self {
        self.flags.set(NodeFlags::VISIBLE, on);
        self
    }
    pub fn enabled(mut self, on: bool) -> Self {
        self.flags.set(NodeFlags::ENABLE, on);
        self
    }
    pub fn editable(mut self, on: bool) -> Self {
        self.flags.set(NodeFlags::EDITABLE, on);
        self
    }
    pub fn policy(mut self, p: FocusPolicy) -> Self {
        self.policy = p;
        self
    }
    pub fn scroll_extent(mut self, s: Size) -> Self {
        self.scroll_extent = s;
        self
    }
    pub fn behavior(mut self, b: impl Behavior) -> Self {
        self.behavior = Some(Box::new(b));
        self
    }

    pub fn serial(&self) -> ViewId {
        self.serial
    }
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
    pub fn anchor_set(&self) -> &Anchors {
        &self.anchors
    }
    pub fn border_width(&self) -> f32 {
        self.border
    }
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }
    pub fn focus_policy(&self) -> FocusPolicy {
        self.policy
    }
    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }
    pub fn extent(&self) -> Size {
        self.scroll_extent
    }
    pub fn record_index(&self) -> Option<usize> {
        self.record_index
    }
    pub fn has_behavior(&self) -> bool {
        self.behavior.is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(NodeFlags::VISIBLE)
    }
    pub fn is_enabled(&self) -> bool {
        self.flags.contains(NodeFlags::ENABLE)
    }
    pub fn is_focusable(&self) -> bool {
        self.flags.contains(NodeFlags::FOCUSABLE)
    }
    pub fn is_editable(&self) -> bool {
        self.flags.contains(NodeFlags::EDITABLE)
    }

    /// Copy of this node without tree links, cached geometry or serial.
    pub(crate) fn duplicate(&self) -> Node {
        Node {
            serial: 0,
            kind: self.kind.clone(),
            parent: None,
            children: SmallVec::new(),
            anchors: self.anchors,
            border: self.border,
            flags: self.flags - NodeFlags::CLICKING,
            policy: self.policy,
            scroll: self.scroll,
            scroll_extent: self.scroll_extent,
            record_index: None,
            rect: Cell::new(None),
            behavior: self.behavior.as_ref().map(|b| b.clone_box()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_gen_is_sequential() {
        let mut ids = IdGen::starting_at(10);
        assert_eq!(ids.next_id(), 10);
        assert_eq!(ids.next_id(), 11);
    }

    #[test]
    fn test_default_flags() {
        let n = Node::plain();
        assert!(n.is_visible());
        assert!(n.is_enabled());
        assert!(!n.is_focusable());
    }

    #[test]
    fn test_duplicate_drops_links_and_pressed_state() {
        let mut n = Node::item().focusable(true);
        n.flags.insert(NodeFlags::CLICKING);
        n.record_index = Some(4);
        let d = n.duplicate();
        assert!(d.is_focusable());
        assert!(!d.flags().contains(NodeFlags::CLICKING));
        assert_eq!(d.record_index(), None);
        assert_eq!(d.kind(), &NodeKind::Item);
    }
}
