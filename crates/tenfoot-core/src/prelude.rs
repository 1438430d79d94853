pub use crate::animation::{AnimatedValue, AnimationSpec, Clock, Easing, SystemClock, TestClock};
pub use crate::error::{Error, Result};
pub use crate::focus::FocusDirectory;
pub use crate::geometry::{Anchors, Length, Rect, Size, Vec2};
pub use crate::input::*;
pub use crate::navigator::{NavConfig, Navigator};
pub use crate::node::{Behavior, FocusPolicy, Node, NodeFlags, NodeId, NodeKind, Record};
pub use crate::scroll::{ScrollDispatch, Scrollable};
pub use crate::signal::{Signal, signal};
pub use crate::tasks::{TaskId, TaskQueue};
pub use crate::tree::NodeTree;
