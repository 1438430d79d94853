//! One displayed page: the tree, its focus, its list engines and the tasks
//! they schedule.

use std::collections::BTreeMap;
use std::rc::Rc;

use web_time::Instant;

use tenfoot_core::{
    AxisEvent, Clock, Direction, Error, FocusDirectory, MoveAxis, NavConfig, Navigator, NodeId,
    NodeTree, Result, ScrollDispatch, SharedScrollable, TaskQueue,
};

use crate::datasource::SharedSource;
use crate::list::{ListCx, RecyclingList};
use crate::window::{ListConfig, Orientation};

pub struct Page {
    tree: NodeTree,
    focus: FocusDirectory,
    scroll: ScrollDispatch,
    tasks: TaskQueue,
    lists: BTreeMap<NodeId, RecyclingList>,
    clock: Rc<dyn Clock>,
    nav: NavConfig,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("nodes", &self.tree.len())
            .field("focus", &self.focus.state())
            .field("lists", &self.lists.keys().collect::<Vec<_>>())
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

impl Page {
    pub fn new(tree: NodeTree, clock: Rc<dyn Clock>) -> Self {
        Self {
            tree,
            focus: FocusDirectory::new(),
            scroll: ScrollDispatch::new(),
            tasks: TaskQueue::new(),
            lists: BTreeMap::new(),
            clock,
            nav: NavConfig::default(),
        }
    }

    pub fn with_nav(mut self, nav: NavConfig) -> Self {
        self.nav = nav;
        self
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    /// Direct tree access for the host. Call [`Page::relayout`] after
    /// resizing a list container and [`Page::validate_focus`] after hiding
    /// focused content.
    pub fn tree_mut(&mut self) -> &mut NodeTree {
        &mut self.tree
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn focus(&self) -> Option<NodeId> {
        self.focus.focus()
    }

    pub fn focus_directory(&self) -> &FocusDirectory {
        &self.focus
    }

    pub fn tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn bind_scroll(&mut self, source: NodeId, sink: SharedScrollable) {
        self.scroll.bind(source, sink);
    }

    pub fn unbind_scroll(&mut self, source: NodeId, sink: &SharedScrollable) {
        self.scroll.unbind(source, sink);
    }

    // ---- list engines ----------------------------------------------------

    /// Turns `container` (a `List` or `Grid` node holding its templates)
    /// into a recycling list fed by `source`, and loads it.
    pub fn add_list(&mut self, container: NodeId, source: SharedSource, config: ListConfig) -> Result<()> {
        let list = RecyclingList::new(&mut self.tree, container, source, config)?;
        self.lists.insert(container, list);
        self.drive(container, |l, cx| l.reload(cx))
    }

    pub fn remove_list(&mut self, container: NodeId) -> Result<bool> {
        let Some(list) = self.lists.remove(&container) else {
            return Ok(false);
        };
        self.scroll.unbind_source(container);
        list.dispose(&mut self.tree, &mut self.tasks)?;
        self.validate_focus();
        Ok(true)
    }

    pub fn list(&self, container: NodeId) -> Option<&RecyclingList> {
        self.lists.get(&container)
    }

    pub fn lists(&self) -> impl Iterator<Item = &RecyclingList> + '_ {
        self.lists.values()
    }

    /// Runs `f` against the engine on `container` with the page's context.
    pub fn drive<R>(
        &mut self,
        container: NodeId,
        f: impl FnOnce(&mut RecyclingList, &mut ListCx<'_>) -> Result<R>,
    ) -> Result<R> {
        let now = self.clock.now();
        let list = self
            .lists
            .get_mut(&container)
            .ok_or(Error::NoEngine(container))?;
        let mut cx = ListCx {
            tree: &mut self.tree,
            focus: &mut self.focus,
            scroll: &self.scroll,
            tasks: &mut self.tasks,
            nav: self.nav,
            now,
        };
        f(list, &mut cx)
    }

    /// Innermost list engine whose container holds `node`.
    pub fn list_containing(&self, node: NodeId) -> Option<NodeId> {
        self.lists_containing(node).into_iter().next()
    }

    fn lists_containing(&self, node: NodeId) -> Vec<NodeId> {
        std::iter::once(node)
            .chain(self.tree.ancestors(node))
            .filter(|n| self.lists.contains_key(n))
            .collect()
    }

    /// Lets every engine react to pending data-source changes, then repairs
    /// focus. Returns how many engines reloaded.
    pub fn pump(&mut self) -> Result<usize> {
        let containers: Vec<NodeId> = self.lists.keys().copied().collect();
        let mut reloaded = 0;
        for c in containers {
            if self.drive(c, |l, cx| l.poll(cx))? {
                reloaded += 1;
            }
        }
        if self.focus.focus().is_some() {
            self.validate_focus();
        }
        Ok(reloaded)
    }

    /// Runs every task that is due. Returns how many ran.
    pub fn tick(&mut self) -> Result<usize> {
        let due = self.tasks.take_due(self.clock.now());
        let mut ran = 0;
        for (owner, task) in due {
            if !self.lists.contains_key(&owner) {
                log::warn!("task {task} for {owner:?} has no engine");
                continue;
            }
            if self.drive(owner, |l, cx| l.on_task(cx, task))? {
                ran += 1;
            }
        }
        Ok(ran)
    }

    /// Re-measures the engine on `container` after a resize.
    pub fn relayout(&mut self, container: NodeId) -> Result<bool> {
        self.drive(container, |l, cx| l.relayout(cx))
    }

    // ---- focus -----------------------------------------------------------

    pub fn set_focus(&mut self, node: NodeId) -> Result<bool> {
        self.focus.set_focus(&mut self.tree, node, MoveAxis::Both)
    }

    pub fn reset_focus(&mut self) -> Option<NodeId> {
        let root = self.tree.root();
        self.focus.reset_focus(&mut self.tree, root)
    }

    pub fn validate_focus(&mut self) -> Option<NodeId> {
        let root = self.tree.root();
        self.focus.validate(&mut self.tree, root)
    }

    /// Moves focus one step in `dir`. Lists holding the focus get the first
    /// chance (innermost first) and may scroll; otherwise the whole page is
    /// searched.
    pub fn navigate(&mut self, dir: Direction) -> Result<Option<NodeId>> {
        let Some(current) = self.focus.focus() else {
            return Ok(self.reset_focus());
        };
        if !self.tree.is_appeared_focusable(current) {
            return Ok(self.validate_focus());
        }

        for container in self.lists_containing(current) {
            if let Some(next) = self.drive(container, |l, cx| l.move_focus(cx, dir))? {
                return Ok(Some(next));
            }
        }

        let root = self.tree.root();
        let next = Navigator::with_config(&self.tree, self.nav).nearest_in_direction(
            current,
            root,
            dir,
            self.focus.axis(),
        );
        if let Some(next) = next {
            self.focus.do_focus(&mut self.tree, next, dir.axis(), false);
        }
        Ok(next)
    }

    /// Tab order: next (`dir > 0`) or previous focusable node on the page.
    pub fn tab(&mut self, dir: isize) -> Option<NodeId> {
        let root = self.tree.root();
        let next = match self.focus.focus() {
            Some(current) => Navigator::with_config(&self.tree, self.nav).adjacent_node(current, root, dir),
            None => return self.reset_focus(),
        }?;
        self.focus.do_focus(&mut self.tree, next, MoveAxis::Both, false);
        Some(next)
    }

    /// Pages the list holding the focus.
    pub fn scroll_page(&mut self, dir: isize) -> Result<bool> {
        let Some(container) = self.focus.focus().and_then(|f| self.list_containing(f)) else {
            return Ok(false);
        };
        self.drive(container, |l, cx| l.scroll_page(cx, dir))
    }

    /// Feeds a wheel delta to the list under the pointer (or holding the
    /// focus), passing what it cannot consume on to enclosing lists.
    /// Returns true if any of it was consumed.
    pub fn wheel(&mut self, ev: AxisEvent) -> Result<bool> {
        let start = match ev.at {
            Some(p) => self.tree.node_at(p),
            None => self.focus.focus(),
        };
        let Some(start) = start else {
            return Ok(false);
        };
        let mut consumed = false;
        for container in self.lists_containing(start) {
            let Some(list) = self.lists.get(&container) else { continue };
            let delta = match list.config().orientation {
                Orientation::Vertical => ev.delta.y,
                Orientation::Horizontal => ev.delta.x,
            };
            if delta == 0.0 {
                continue;
            }
            let left = self.drive(container, |l, cx| l.scroll_by(cx, delta))?;
            if (left - delta).abs() > 0.001 {
                consumed = true;
                break;
            }
        }
        Ok(consumed)
    }

    pub fn press(&mut self) -> Option<NodeId> {
        self.focus.press(&mut self.tree)
    }

    pub fn release(&mut self) -> bool {
        self.focus.release(&mut self.tree)
    }

    /// Cancels every scheduled task, drops all engines and forgets focus.
    pub fn unmount(&mut self) -> Result<()> {
        self.tasks.cancel_all();
        for (container, list) in std::mem::take(&mut self.lists) {
            self.scroll.unbind_source(container);
            list.dispose(&mut self.tree, &mut self.tasks)?;
        }
        self.focus.clear(&mut self.tree);
        log::info!("page unmounted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::VecDataSource;
    use std::cell::RefCell;
    use tenfoot_core::{Anchors, AnimationSpec, Node, NodeKind, Size, TestClock, Vec2};
    use web_time::Duration;

    struct Fixture {
        page: Page,
        clock: Rc<TestClock>,
        header: NodeId,
        search: NodeId,
        list: NodeId,
        source: Rc<RefCell<VecDataSource<u32>>>,
    }

    /// Header on top, a 5-line list below it, a search box to the right.
    fn fixture(config: ListConfig) -> Fixture {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut tree = NodeTree::new(Size::new(1280.0, 720.0));
        let root = tree.root();
        let header = tree
            .insert(root, Node::plain().anchors(Anchors::at(0.0, 0.0, 300.0, 50.0)).focusable(true))
            .unwrap();
        let list = tree
            .insert(root, Node::new(NodeKind::List).anchors(Anchors::at(0.0, 100.0, 300.0, 500.0)))
            .unwrap();
        tree.insert(
            list,
            Node::item()
                .anchors(Anchors::new().left(0.0).right(0.0).height(100.0))
                .focusable(true),
        )
        .unwrap();
        tree.insert(list, Node::message("loading")).unwrap();
        let search = tree
            .insert(
                root,
                Node::plain()
                    .anchors(Anchors::at(400.0, 0.0, 200.0, 50.0))
                    .focusable(true)
                    .editable(true),
            )
            .unwrap();

        let clock = Rc::new(TestClock::new());
        let mut page = Page::new(tree, clock.clone());
        let source = Rc::new(RefCell::new(VecDataSource::with_records((0..30).collect())));
        page.add_list(list, source.clone(), config).unwrap();
        Fixture {
            page,
            clock,
            header,
            search,
            list,
            source,
        }
    }

    fn focused_index(f: &Fixture) -> Option<usize> {
        let focus = f.page.focus()?;
        f.page.list(f.list)?.index_of(f.page.tree(), focus)
    }

    #[test]
    fn test_enter_list_walk_and_leave() {
        let mut f = fixture(ListConfig::default());
        f.page.set_focus(f.header).unwrap();

        f.page.navigate(Direction::Down).unwrap();
        assert_eq!(focused_index(&f), Some(0));

        for _ in 0..6 {
            f.page.navigate(Direction::Down).unwrap();
        }
        assert_eq!(focused_index(&f), Some(6));
        assert_eq!(f.page.list(f.list).unwrap().window().page_top_index, 2);

        for _ in 0..6 {
            f.page.navigate(Direction::Up).unwrap();
        }
        assert_eq!(focused_index(&f), Some(0));
        // past the first record focus leaves the list for the header, not
        // the search box further right
        assert_eq!(f.page.navigate(Direction::Up).unwrap(), Some(f.header));
    }

    #[test]
    fn test_tab_order() {
        let mut f = fixture(ListConfig::default());
        f.page.set_focus(f.header).unwrap();
        assert_eq!(f.page.tab(-1), Some(f.search));
        assert_eq!(f.page.tab(1), Some(f.header));
        f.page.tab(1);
        assert_eq!(focused_index(&f), Some(0));
    }

    #[test]
    fn test_pump_reloads_and_repairs_focus() {
        let mut f = fixture(ListConfig::default());
        assert_eq!(f.page.pump().unwrap(), 0);

        f.page.set_focus(f.header).unwrap();
        f.page.navigate(Direction::Down).unwrap();
        assert!(focused_index(&f).is_some());

        f.source.borrow_mut().set_loading();
        assert_eq!(f.page.pump().unwrap(), 1);
        // every slot is hidden: focus falls back to the first focusable node
        assert_eq!(f.page.focus(), Some(f.header));
    }

    #[test]
    fn test_wheel_targets_list_under_pointer() {
        let mut f = fixture(ListConfig::default());
        let ev = AxisEvent {
            delta: Vec2::new(0.0, 250.0),
            at: Some(Vec2::new(150.0, 300.0)),
        };
        assert!(f.page.wheel(ev).unwrap());
        assert_eq!(f.page.list(f.list).unwrap().scroll_offset(), 250.0);

        let outside = AxisEvent {
            delta: Vec2::new(0.0, 250.0),
            at: Some(Vec2::new(900.0, 300.0)),
        };
        assert!(!f.page.wheel(outside).unwrap());

        let sideways = AxisEvent {
            delta: Vec2::new(40.0, 0.0),
            at: Some(Vec2::new(150.0, 300.0)),
        };
        assert!(!f.page.wheel(sideways).unwrap());
    }

    #[test]
    fn test_tick_runs_eased_frames() {
        let mut f = fixture(ListConfig::default().animated(AnimationSpec::fast()));
        f.page.drive(f.list, |l, cx| l.scroll_record(cx, 1)).unwrap();
        assert!(!f.page.tasks().is_empty());

        f.clock.advance(Duration::from_millis(200));
        assert_eq!(f.page.tick().unwrap(), 1);
        let y = f.page.tree().get(f.list).unwrap().scroll().y;
        assert_eq!(y, 100.0);
        assert!(f.page.tasks().is_empty());
    }

    #[test]
    fn test_unmount_cancels_everything() {
        let mut f = fixture(ListConfig::default().auto_advance(Duration::from_secs(5)));
        f.page.set_focus(f.header).unwrap();
        assert_eq!(f.page.tasks().len(), 1);

        f.page.unmount().unwrap();
        assert!(f.page.tasks().is_empty());
        assert_eq!(f.page.focus(), None);
        assert!(f.page.list(f.list).is_none());
        assert!(matches!(
            f.page.drive(f.list, |l, cx| l.reload(cx)),
            Err(Error::NoEngine(_))
        ));
    }

    #[test]
    fn test_remove_list_moves_focus_out() {
        let mut f = fixture(ListConfig::default());
        f.page.set_focus(f.header).unwrap();
        f.page.navigate(Direction::Down).unwrap();
        assert!(f.page.remove_list(f.list).unwrap());
        assert_eq!(f.page.focus(), Some(f.header));
        assert!(!f.page.remove_list(f.list).unwrap());
    }
}
