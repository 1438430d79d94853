//! # Tree, focus and navigation
//!
//! `tenfoot-core` is the part of tenfoot that knows nothing about data: an
//! owned node tree with anchored geometry, a focus directory, and a spatial
//! navigator that moves a single focus cursor with arrow keys.
//!
//! ## Nodes and geometry
//!
//! Every element is a [`Node`] in a [`NodeTree`]. A node is placed by
//! [`Anchors`]: optional `left/top/right/bottom` edges plus optional
//! `width/height`, each in px or percent of the parent's inner extent.
//!
//! ```rust
//! use tenfoot_core::*;
//!
//! let mut tree = NodeTree::new(Size::new(1280.0, 720.0));
//! let root = tree.root();
//!
//! // 40px from the left, stretched vertically, 200px wide
//! let rail = tree
//!     .insert(root, Node::plain().anchors(Anchors::new().left(40.0).top(0.0).bottom(0.0).width(200.0)))
//!     .unwrap();
//! assert_eq!(tree.rect(rail), Rect::new(40.0, 0.0, 200.0, 720.0));
//! ```
//!
//! Rectangles are resolved lazily and cached; changing anchors, borders or
//! the viewport invalidates the affected subtree.
//!
//! ## Focus
//!
//! A page owns one [`FocusDirectory`]. It holds the focused node, the pressed
//! node and the remembered axis point, and it fires
//! [`Behavior::on_focus_changed`] along the chains that lose and gain focus.
//!
//! ## Navigation
//!
//! [`Navigator::nearest_node`] picks the next node for an arrow key:
//!
//! - candidates are focusable, shown, enabled, and not hidden behind a
//!   scroll container the current node is not in;
//! - fewer edges to the common ancestor with the current node wins first;
//! - then the distance from the axis point, with deviation across the
//!   direction of travel weighted heavily.
//!
//! ```rust
//! use tenfoot_core::*;
//!
//! let mut tree = NodeTree::new(Size::new(400.0, 400.0));
//! let root = tree.root();
//! let a = tree.insert(root, Node::plain().anchors(Anchors::at(0.0, 0.0, 50.0, 50.0)).focusable(true)).unwrap();
//! let b = tree.insert(root, Node::plain().anchors(Anchors::at(100.0, 0.0, 50.0, 50.0)).focusable(true)).unwrap();
//!
//! let mut focus = FocusDirectory::new();
//! focus.set_focus(&mut tree, a, MoveAxis::Both).unwrap();
//!
//! let next = Navigator::new(&tree).nearest_in_direction(a, root, Direction::Right, focus.axis());
//! assert_eq!(next, Some(b));
//! ```
//!
//! [`Navigator::adjacent_node`] walks the same candidates in tree order for
//! Tab / Shift+Tab.
//!
//! ## Scrolling and time
//!
//! [`ScrollDispatch`] fans scroll offsets out to [`Scrollable`] sinks.
//! [`TaskQueue`] keeps per-node timers and [`AnimatedValue`] eases scroll
//! offsets; both take time from an explicit [`Clock`].

pub mod animation;
pub mod error;
pub mod focus;
pub mod geometry;
pub mod input;
pub mod navigator;
pub mod node;
pub mod prelude;
pub mod scroll;
pub mod signal;
pub mod tasks;
pub mod tests;
pub mod tree;

pub use animation::*;
pub use error::*;
pub use focus::*;
pub use geometry::*;
pub use input::*;
pub use navigator::*;
pub use node::*;
pub use scroll::*;
pub use signal::*;
pub use tasks::*;
pub use tree::*;
