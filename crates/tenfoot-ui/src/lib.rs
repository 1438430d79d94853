//! Recycling lists and grids, data sources, and the page-level key
//! dispatcher.
//!
//! A [`Page`] owns a [`tenfoot_core::NodeTree`] together with its focus, its
//! scroll sinks, its scheduled tasks and one [`RecyclingList`] per list or
//! grid container. The host feeds decoded events through a [`Dispatcher`],
//! calls [`Page::pump`] after data sources change and [`Page::tick`] when
//! [`Page::tasks`] has something due.
//!
//! ```rust
//! use std::rc::Rc;
//! use tenfoot_core::*;
//! use tenfoot_ui::*;
//!
//! let mut tree = NodeTree::new(Size::new(1280.0, 720.0));
//! let root = tree.root();
//! let list = tree
//!     .insert(root, Node::new(NodeKind::List).anchors(Anchors::at(0.0, 0.0, 400.0, 600.0)))
//!     .unwrap();
//! tree.insert(list, Node::item().anchors(Anchors::new().left(0.0).right(0.0).height(60.0)).focusable(true))
//!     .unwrap();
//! tree.insert(list, Node::message("loading")).unwrap();
//!
//! let source = shared(VecDataSource::<String>::new());
//! let mut page = Page::new(tree, Rc::new(SystemClock));
//! page.add_list(list, source.clone(), ListConfig::default()).unwrap();
//! assert_eq!(page.list(list).unwrap().state(), &DisplayState::Loading);
//!
//! source.borrow_mut().set_records((0..100).map(|i| format!("row {i}")).collect());
//! page.pump().unwrap();
//! page.reset_focus();
//!
//! let mut keys = Dispatcher::new();
//! keys.dispatch(&mut page, KeyEvent::down(Key::Down)).unwrap();
//! ```

pub mod datasource;
pub mod dispatch;
pub mod list;
pub mod page;
pub mod ring;
pub mod window;

pub use datasource::{DataSource, SharedSource, VecDataSource, record_as, shared};
pub use dispatch::{Dispatcher, Event, Handled};
pub use list::{ListCx, RecyclingList, TASK_ADVANCE, TASK_FRAME};
pub use page::Page;
pub use ring::SlotRing;
pub use window::{DisplayState, ListConfig, ListKind, MARGIN, Orientation, WindowState};
