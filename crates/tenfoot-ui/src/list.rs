//! # Recycling list and grid
//!
//! A [`RecyclingList`] drives a `List` or `Grid` container node. On
//! construction it takes the container's children as templates: exactly one
//! `Item` and any number of `Message { state }` nodes. Templates are detached
//! and only ever cloned.
//!
//! While records are shown the container holds a fixed pool of
//! `C * (L + 2 * margin)` item clones ("slots"), where `L` is the number of
//! lines a page shows and `C` the column count (1 for a list). The pool never
//! grows with the data set:
//!
//! ```text
//!   pool position      line            record (C = 1, top = 10)
//!   0..3               leading margin  7, 8, 9
//!   3..3+L             visible page    10 ..
//!   3+L..              trailing margin
//! ```
//!
//! Scrolling by one line rotates the slot ring so the line that left at one
//! end is reused at the other, and only those `C` slots are rebound. Slots
//! live at absolute positions in the container's scrolled space; the
//! container's scroll offset follows the first visible line plus a fractional
//! part used by wheel scrolling and eased steps.
//!
//! Non-list states (`loading`, `empty`, `error`, `error:<code>`) hide the
//! pool and show a clone of the matching message template.

use std::cell::Cell;
use std::rc::Rc;

use web_time::{Duration, Instant};

use tenfoot_core::{
    AnimatedValue, Anchors, Direction, Error, FocusDirectory, MoveAxis, NavConfig, Navigator, Node,
    NodeId, NodeKind, NodeTree, Result, ScrollDispatch, Signal, Size, SubId, TaskId, TaskQueue, Vec2,
};

use crate::datasource::SharedSource;
use crate::ring::SlotRing;
use crate::window::{DisplayState, ListConfig, ListKind, Orientation, WindowState};

/// Eased scroll frame.
pub const TASK_FRAME: TaskId = 1;
/// Auto-advance timer.
pub const TASK_ADVANCE: TaskId = 2;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Everything an engine touches outside itself while handling one event.
pub struct ListCx<'a> {
    pub tree: &'a mut NodeTree,
    pub focus: &'a mut FocusDirectory,
    pub scroll: &'a ScrollDispatch,
    pub tasks: &'a mut TaskQueue,
    pub nav: NavConfig,
    pub now: Instant,
}

/// Where focus sits inside the pool: slot position, and which focusable
/// node of that slot (pre-order) holds it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FocusMark {
    position: usize,
    field: usize,
}

pub struct RecyclingList {
    container: NodeId,
    kind: ListKind,
    config: ListConfig,
    source: SharedSource,
    changes: Signal<u64>,
    sub: SubId,
    pending: Rc<Cell<bool>>,
    item_template: NodeId,
    messages: Vec<(String, NodeId)>,
    message: Option<NodeId>,
    window: WindowState,
    ring: SlotRing,
    /// Line shown by pool position 0; only moves by whole steps.
    base_line: isize,
    frac: AnimatedValue<f32>,
    state: DisplayState,
    count: usize,
    loaded: bool,
}

impl std::fmt::Debug for RecyclingList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecyclingList")
            .field("container", &self.container)
            .field("kind", &self.kind)
            .field("state", &self.state)
            .field("count", &self.count)
            .field("window", &self.window)
            .field("slots", &self.ring.len())
            .finish()
    }
}

impl RecyclingList {
    pub fn new(
        tree: &mut NodeTree,
        container: NodeId,
        source: SharedSource,
        config: ListConfig,
    ) -> Result<Self> {
        let kind = match tree.node(container)?.kind() {
            NodeKind::List => ListKind::List,
            NodeKind::Grid => ListKind::Grid,
            other => return Err(Error::Template(format!("{other} cannot host a list"))),
        };
        let (item_template, messages) = find_templates(tree, container)?;
        let window = measure(tree, container, item_template, kind, &config)?;
        tree.detach(item_template)?;
        for (_, m) in &messages {
            tree.detach(*m)?;
        }

        let changes = source.borrow().changes();
        let pending = Rc::new(Cell::new(true));
        let flag = pending.clone();
        let sub = changes.subscribe(move |_| flag.set(true));

        log::debug!(
            "{kind:?} {container:?}: {} lines x {} columns, {} slots",
            window.lines_per_page,
            window.column_count,
            window.slot_count()
        );
        Ok(Self {
            container,
            kind,
            config,
            source,
            changes,
            sub,
            pending,
            item_template,
            messages,
            message: None,
            window,
            ring: SlotRing::default(),
            base_line: 0,
            frac: AnimatedValue::new(0.0, config.scroll_spec),
            state: DisplayState::Loading,
            count: 0,
            loaded: false,
        })
    }

    pub fn container(&self) -> NodeId {
        self.container
    }
    pub fn kind(&self) -> ListKind {
        self.kind
    }
    pub fn config(&self) -> &ListConfig {
        &self.config
    }
    pub fn state(&self) -> &DisplayState {
        &self.state
    }
    pub fn window(&self) -> &WindowState {
        &self.window
    }
    pub fn count(&self) -> usize {
        self.count
    }
    pub fn source(&self) -> &SharedSource {
        &self.source
    }
    pub fn item_template(&self) -> NodeId {
        self.item_template
    }
    /// The message clone currently shown, if any.
    pub fn message(&self) -> Option<NodeId> {
        self.message
    }
    pub fn is_looping(&self) -> bool {
        self.window.is_looping(self.config.looping, self.count)
    }
    pub fn is_animating(&self) -> bool {
        self.frac.is_animating()
    }

    /// Slots in pool order.
    pub fn slots(&self) -> Vec<NodeId> {
        self.ring.iter().collect()
    }

    pub fn slot_at(&self, position: usize) -> Option<NodeId> {
        self.ring.get(position)
    }

    /// Slot that contains `node` (or is `node`).
    pub fn slot_of(&self, tree: &NodeTree, node: NodeId) -> Option<NodeId> {
        std::iter::once(node)
            .chain(tree.ancestors(node))
            .find(|n| tree.parent(*n) == Some(self.container))
            .filter(|s| self.ring.position_of(*s).is_some())
    }

    pub fn position_of(&self, tree: &NodeTree, node: NodeId) -> Option<usize> {
        self.ring.position_of(self.slot_of(tree, node)?)
    }

    /// Record index bound to the slot holding `node`.
    pub fn index_of(&self, tree: &NodeTree, node: NodeId) -> Option<usize> {
        tree.get(self.slot_of(tree, node)?)?.record_index()
    }

    /// Logical scroll offset in px along the scroll axis.
    pub fn scroll_offset(&self) -> f32 {
        self.window.top_line() as f32 * self.window.line_size + *self.frac.get()
    }

    /// Asks the source for a new selection; the engine reloads on the next
    /// poll.
    pub fn select(&self, criteria: &str) {
        self.source.borrow_mut().select(criteria);
    }

    /// Reloads if the source reported a change since the last poll.
    pub fn poll(&mut self, cx: &mut ListCx<'_>) -> Result<bool> {
        if !self.pending.replace(false) {
            return Ok(false);
        }
        self.reload(cx)?;
        Ok(true)
    }

    /// Re-reads the source and moves to the matching display state.
    pub fn reload(&mut self, cx: &mut ListCx<'_>) -> Result<()> {
        self.pending.set(false);
        let (count, error, code, attention) = {
            let s = self.source.borrow();
            (s.count(), s.has_error(), s.error_code(), s.attention())
        };

        if error {
            self.count = 0;
            self.set_state(cx, DisplayState::Error(code))?;
        } else {
            match count {
                None => {
                    self.count = 0;
                    self.loaded = false;
                    self.set_state(cx, DisplayState::Loading)?;
                }
                Some(0) => {
                    self.count = 0;
                    self.set_state(cx, DisplayState::Empty)?;
                }
                Some(n) => {
                    let mark = if self.state == DisplayState::List {
                        self.capture_focus(cx.tree, cx.focus)
                    } else {
                        None
                    };
                    let wanted = if self.loaded {
                        self.window.page_top_index
                    } else {
                        attention
                    };
                    self.count = n;
                    self.loaded = true;
                    self.window.page_top_index = self.window.validate_index(wanted, n, self.config.looping);
                    self.settle(cx.tasks);
                    self.set_state(cx, DisplayState::List)?;
                    self.rebuild(cx.tree)?;
                    if let Some(mark) = mark {
                        self.restore_focus(cx, mark, true)?;
                    }
                }
            }
        }
        self.notify_scroll(cx.scroll);
        Ok(())
    }

    /// Moves by `lines` whole lines. Focus inside the list stays at the same
    /// pool position, so it lands on the record that slid under it.
    pub fn scroll_record(&mut self, cx: &mut ListCx<'_>, lines: isize) -> Result<bool> {
        let mark = self.capture_focus(cx.tree, cx.focus);
        let mut moved = false;
        for _ in 0..lines.unsigned_abs() {
            if !self.step(cx, lines.signum(), self.config.animate)? {
                break;
            }
            moved = true;
        }
        if moved && let Some(mark) = mark {
            self.restore_focus(cx, mark, false)?;
        }
        Ok(moved)
    }

    /// Moves by as many lines as fit on the page.
    pub fn scroll_page(&mut self, cx: &mut ListCx<'_>, dir: isize) -> Result<bool> {
        let lines = self.window.full_lines() as isize;
        self.scroll_record(cx, dir.signum() * lines)
    }

    /// Wheel scrolling by `px`. Returns the part of `px` that could not be
    /// consumed because an end was reached.
    pub fn scroll_by(&mut self, cx: &mut ListCx<'_>, px: f32) -> Result<f32> {
        if self.state != DisplayState::List || self.ring.is_empty() || px == 0.0 {
            return Ok(px);
        }
        self.halt(cx.tasks);
        let mark = self.capture_focus(cx.tree, cx.focus);
        let ls = self.window.line_size;
        let looping = self.is_looping();

        let current = self.scroll_offset();
        let consumed = if looping {
            px
        } else {
            (current + px).clamp(0.0, self.window.max_offset(self.count)) - current
        };
        let moved = *self.frac.get() + consumed;
        let lines = (moved / ls).floor() as isize;

        let pool_lines = (self.ring.len() / self.window.column_count) as isize;
        let before = self.window.top_line() as isize;
        let stepped = if lines.abs() >= pool_lines {
            self.jump(cx, lines)?;
            if looping {
                lines
            } else {
                self.window.top_line() as isize - before
            }
        } else {
            let mut n = 0;
            while n != lines {
                if !self.step(cx, lines.signum(), false)? {
                    break;
                }
                n += lines.signum();
            }
            n
        };

        let rest = (moved - stepped as f32 * ls).max(0.0);
        self.frac.snap(rest);
        self.apply_scroll(cx.tree)?;
        self.notify_scroll(cx.scroll);
        if let Some(mark) = mark {
            self.restore_focus(cx, mark, false)?;
        }
        log::trace!("wheel {px}: consumed {consumed}, offset {}", self.scroll_offset());
        Ok(px - consumed)
    }

    /// Jumps so that `index` is the first visible record (clamped).
    pub fn seek(&mut self, cx: &mut ListCx<'_>, index: usize) -> Result<()> {
        let mark = self.capture_focus(cx.tree, cx.focus);
        self.window.page_top_index = self.window.validate_index(index, self.count, self.config.looping);
        self.settle(cx.tasks);
        if self.state == DisplayState::List {
            self.rebuild(cx.tree)?;
            if let Some(mark) = mark {
                self.restore_focus(cx, mark, false)?;
            }
        }
        self.notify_scroll(cx.scroll);
        Ok(())
    }

    /// Re-measures after a container resize. The pool is rebuilt only when
    /// the page's line or column count changed.
    pub fn relayout(&mut self, cx: &mut ListCx<'_>) -> Result<bool> {
        let next = measure(cx.tree, self.container, self.item_template, self.kind, &self.config)?;
        let reshaped = next.lines_per_page != self.window.lines_per_page
            || next.column_count != self.window.column_count;
        let top = self.window.page_top_index;
        self.window = WindowState {
            page_top_index: top,
            ..next
        };

        if self.state == DisplayState::List {
            let mark = self.capture_focus(cx.tree, cx.focus);
            self.window.page_top_index = self.window.validate_index(top, self.count, self.config.looping);
            if reshaped {
                self.destroy_pool(cx.tree)?;
                self.build_pool(cx.tree)?;
            }
            self.settle(cx.tasks);
            self.rebuild(cx.tree)?;
            if let Some(mark) = mark {
                self.restore_focus(cx, mark, true)?;
            }
        } else if reshaped {
            self.destroy_pool(cx.tree)?;
        }
        if reshaped {
            log::debug!(
                "{:?} resized: {} lines x {} columns",
                self.container,
                self.window.lines_per_page,
                self.window.column_count
            );
        }
        self.notify_scroll(cx.scroll);
        Ok(reshaped)
    }

    /// Moves focus inside the list, scrolling as needed. `None` means the
    /// move leaves the list (or focus is not in it).
    pub fn move_focus(&mut self, cx: &mut ListCx<'_>, dir: Direction) -> Result<Option<NodeId>> {
        let Some(current) = cx.focus.focus() else {
            return Ok(None);
        };
        if self.state != DisplayState::List || !cx.tree.is_ancestor_of(self.container, current) {
            return Ok(None);
        }
        let along = match self.config.orientation {
            Orientation::Vertical => !dir.is_horizontal(),
            Orientation::Horizontal => dir.is_horizontal(),
        };

        let mut target = self.nearest(cx, current, dir);
        if target.is_none() && along && self.step(cx, dir.sign(), self.config.animate)? {
            target = self.nearest(cx, current, dir);
        }
        let Some(target) = target else {
            return Ok(None);
        };
        if let Some(slot) = self.slot_of(cx.tree, target) {
            self.ensure_visible(cx, slot)?;
        }
        cx.focus.do_focus(cx.tree, target, dir.axis(), false);
        Ok(Some(target))
    }

    /// Handles a due task scheduled by this engine.
    pub fn on_task(&mut self, cx: &mut ListCx<'_>, task: TaskId) -> Result<bool> {
        match task {
            TASK_FRAME => {
                let running = self.frac.update(cx.now);
                self.apply_scroll(cx.tree)?;
                self.notify_scroll(cx.scroll);
                if running {
                    cx.tasks.schedule(self.container, TASK_FRAME, cx.now + FRAME_INTERVAL, None);
                }
                Ok(true)
            }
            TASK_ADVANCE => {
                if self.state != DisplayState::List {
                    return Ok(false);
                }
                if !self.scroll_record(cx, 1)? {
                    self.seek(cx, 0)?;
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Tears the engine down: unsubscribes, cancels its tasks and frees the
    /// pool, the message and the templates.
    pub fn dispose(mut self, tree: &mut NodeTree, tasks: &mut TaskQueue) -> Result<()> {
        self.changes.unsubscribe(self.sub);
        tasks.cancel_owner(self.container);
        self.destroy_pool(tree)?;
        if let Some(m) = self.message.take() {
            tree.remove(m)?;
        }
        tree.remove(self.item_template)?;
        for (_, m) in &self.messages {
            tree.remove(*m)?;
        }
        log::debug!("{:?} disposed", self.container);
        Ok(())
    }

    // ---- state ----------------------------------------------------------

    fn set_state(&mut self, cx: &mut ListCx<'_>, next: DisplayState) -> Result<()> {
        if self.state == next && (next == DisplayState::List || self.message.is_some()) {
            return Ok(());
        }
        if let Some(m) = self.message.take() {
            cx.tree.remove(m)?;
        }

        if next == DisplayState::List {
            if self.ring.is_empty() {
                self.build_pool(cx.tree)?;
            }
            if let Some(every) = self.config.auto_advance
                && !cx.tasks.is_scheduled(self.container, TASK_ADVANCE)
            {
                cx.tasks.schedule(self.container, TASK_ADVANCE, cx.now + every, Some(every));
            }
        } else {
            for slot in self.ring.iter() {
                cx.tree.set_visible(slot, false)?;
            }
            cx.tasks.cancel(self.container, TASK_ADVANCE);
            self.settle(cx.tasks);
            self.message = self.show_message(cx.tree, &next)?;
        }

        log::debug!("{:?}: {:?} -> {:?}", self.container, self.state, next);
        self.state = next;
        Ok(())
    }

    fn show_message(&self, tree: &mut NodeTree, state: &DisplayState) -> Result<Option<NodeId>> {
        let keys = state.message_keys();
        let found = keys
            .iter()
            .find_map(|k| self.messages.iter().find(|(name, _)| name == k));
        let Some((_, template)) = found else {
            log::warn!("{:?} has no message template for {state:?}", self.container);
            return Ok(None);
        };
        let id = tree.clone_subtree(*template)?;
        tree.attach(self.container, id)?;
        Ok(Some(id))
    }

    // ---- pool -----------------------------------------------------------

    fn build_pool(&mut self, tree: &mut NodeTree) -> Result<()> {
        let n = self.window.slot_count();
        let mut slots = Vec::with_capacity(n);
        for _ in 0..n {
            let slot = tree.clone_subtree(self.item_template)?;
            tree.attach(self.container, slot)?;
            slots.push(slot);
        }
        debug_assert_eq!(slots.len(), self.window.slot_count());
        self.ring = SlotRing::new(slots);
        log::debug!("{:?}: built {n} slots", self.container);
        Ok(())
    }

    fn destroy_pool(&mut self, tree: &mut NodeTree) -> Result<()> {
        for slot in self.ring.take() {
            tree.remove(slot)?;
        }
        Ok(())
    }

    fn place(&self, tree: &mut NodeTree, position: usize) -> Result<()> {
        let Some(slot) = self.ring.get(position) else {
            return Ok(());
        };
        let w = &self.window;
        let line = self.base_line + (position / w.column_count) as isize;
        let along = line as f32 * w.line_size;
        let across = (position % w.column_count) as f32 * w.cross_size;
        let anchors = match self.config.orientation {
            Orientation::Vertical => Anchors::at(across, along, w.cross_size, w.line_size),
            Orientation::Horizontal => Anchors::at(along, across, w.line_size, w.cross_size),
        };
        tree.set_anchors(slot, anchors)
    }

    fn bind(&self, tree: &mut NodeTree, position: usize) -> Result<()> {
        let Some(slot) = self.ring.get(position) else {
            return Ok(());
        };
        let index = self.window.index_at(position, self.count, self.config.looping);
        let record = index.and_then(|i| self.source.borrow().record(i));
        tree.set_record_index(slot, index)?;
        tree.set_visible(slot, index.is_some())?;
        tree.notify_record_changed(slot, index, record.as_ref());
        log::trace!("slot {position} -> {index:?}");
        Ok(())
    }

    /// Re-places and rebinds every slot around the current top.
    fn rebuild(&mut self, tree: &mut NodeTree) -> Result<()> {
        self.base_line = self.window.top_line() as isize - self.window.margin as isize;
        for p in 0..self.ring.len() {
            self.place(tree, p)?;
            self.bind(tree, p)?;
        }
        self.apply_scroll(tree)
    }

    // ---- scrolling ------------------------------------------------------

    /// One line forward (`dir > 0`) or back. Only the `C` rotated slots are
    /// rebound. Returns false at a non-looping end.
    fn step(&mut self, cx: &mut ListCx<'_>, dir: isize, animate: bool) -> Result<bool> {
        if self.state != DisplayState::List || self.ring.is_empty() || dir == 0 {
            return Ok(false);
        }
        let c = self.window.column_count;
        let top = self.window.page_top_index;
        let next = if self.is_looping() {
            (top as isize + dir * c as isize).rem_euclid(self.count as isize) as usize
        } else if dir > 0 {
            if top + c > self.window.max_top(self.count) {
                return Ok(false);
            }
            top + c
        } else {
            if top < c {
                return Ok(false);
            }
            top - c
        };
        self.window.page_top_index = next;

        let n = self.ring.len();
        let rotated = if dir > 0 {
            self.ring.rotate_forward(c);
            self.base_line += 1;
            n - c..n
        } else {
            self.ring.rotate_backward(c);
            self.base_line -= 1;
            0..c
        };
        for p in rotated {
            self.place(cx.tree, p)?;
            self.bind(cx.tree, p)?;
        }

        if animate {
            let limit = self.window.margin as f32 * self.window.line_size;
            let start = (*self.frac.get() - dir as f32 * self.window.line_size).clamp(-limit, limit);
            self.frac.snap(start);
            self.frac.set_target(0.0, cx.now);
            if self.frac.is_animating() {
                cx.tasks.schedule(self.container, TASK_FRAME, cx.now, None);
            }
        }
        self.apply_scroll(cx.tree)?;
        self.notify_scroll(cx.scroll);
        log::debug!("{:?}: top {top} -> {next}", self.container);
        Ok(true)
    }

    /// Repositions the whole window `lines` lines away.
    fn jump(&mut self, cx: &mut ListCx<'_>, lines: isize) -> Result<()> {
        let c = self.window.column_count as isize;
        let wanted = self.window.page_top_index as isize + lines * c;
        let index = if self.is_looping() {
            wanted.rem_euclid(self.count as isize) as usize
        } else {
            wanted.max(0) as usize
        };
        self.window.page_top_index = self.window.validate_index(index, self.count, self.config.looping);
        self.rebuild(cx.tree)
    }

    /// Steps until `slot` sits on a fully visible line.
    fn ensure_visible(&mut self, cx: &mut ListCx<'_>, slot: NodeId) -> Result<()> {
        let first = self.window.margin;
        let last = first + self.window.full_lines() - 1;
        let mut settle_at = 0.0;
        while let Some(p) = self.ring.position_of(slot) {
            let line = p / self.window.column_count;
            let dir = if line < first {
                -1
            } else if line > last {
                1
            } else {
                break;
            };
            if !self.step(cx, dir, self.config.animate)? {
                if dir > 0 {
                    // no further step: show the rest of the last line
                    let top_px = self.window.top_line() as f32 * self.window.line_size;
                    settle_at = (self.window.max_offset(self.count) - top_px).max(0.0);
                }
                break;
            }
        }
        if *self.frac.target() != settle_at {
            self.ease_frac(cx, settle_at)?;
        }
        Ok(())
    }

    fn ease_frac(&mut self, cx: &mut ListCx<'_>, to: f32) -> Result<()> {
        if self.config.animate {
            self.frac.set_target(to, cx.now);
            cx.tasks.schedule(self.container, TASK_FRAME, cx.now, None);
        } else {
            self.frac.snap(to);
        }
        self.apply_scroll(cx.tree)?;
        self.notify_scroll(cx.scroll);
        Ok(())
    }

    /// Stops an eased step where it is.
    fn halt(&mut self, tasks: &mut TaskQueue) {
        let here = *self.frac.get();
        self.frac.snap(here);
        tasks.cancel(self.container, TASK_FRAME);
    }

    /// Drops any fractional offset.
    fn settle(&mut self, tasks: &mut TaskQueue) {
        self.frac.snap(0.0);
        tasks.cancel(self.container, TASK_FRAME);
    }

    fn apply_scroll(&self, tree: &mut NodeTree) -> Result<()> {
        let w = &self.window;
        let along = (self.base_line + w.margin as isize) as f32 * w.line_size + *self.frac.get();
        let extent = w.total_lines(self.count) as f32 * w.line_size;
        let (offset, size) = match self.config.orientation {
            Orientation::Vertical => (Vec2::new(0.0, along), Size::new(0.0, extent)),
            Orientation::Horizontal => (Vec2::new(along, 0.0), Size::new(extent, 0.0)),
        };
        tree.set_scroll(self.container, offset)?;
        tree.set_scroll_extent(self.container, size)
    }

    fn notify_scroll(&self, scroll: &ScrollDispatch) {
        let w = &self.window;
        let content = w.total_lines(self.count) as f32 * w.line_size;
        let limit = w.max_offset(self.count);
        let offset = self.scroll_offset().max(0.0);
        match self.config.orientation {
            Orientation::Vertical => scroll.notify_v(self.container, offset, limit, content),
            Orientation::Horizontal => scroll.notify_h(self.container, offset, limit, content),
        }
        let last_top = if self.count == 0 {
            0
        } else {
            w.validate_index(usize::MAX, self.count, self.config.looping)
        };
        scroll.notify_t(self.container, w.page_top_index, last_top, self.count);
    }

    // ---- focus ----------------------------------------------------------

    fn nearest(&self, cx: &ListCx<'_>, current: NodeId, dir: Direction) -> Option<NodeId> {
        Navigator::with_config(&*cx.tree, cx.nav).nearest_in_direction(
            current,
            self.container,
            dir,
            cx.focus.axis(),
        )
    }

    fn capture_focus(&self, tree: &NodeTree, focus: &FocusDirectory) -> Option<FocusMark> {
        let f = focus.focus()?;
        let slot = self.slot_of(tree, f)?;
        let position = self.ring.position_of(slot)?;
        let field = focusables(tree, slot)
            .iter()
            .position(|n| *n == f)
            .unwrap_or(0);
        Some(FocusMark { position, field })
    }

    /// Puts focus back on the slot at the marked position, or the nearest
    /// bound slot toward position 0, then past it.
    fn restore_focus(&mut self, cx: &mut ListCx<'_>, mark: FocusMark, reveal: bool) -> Result<bool> {
        let n = self.ring.len();
        let start = mark.position.min(n.saturating_sub(1));
        let order = (0..=start).rev().chain(start + 1..n);
        for p in order {
            let Some(slot) = self.ring.get(p) else { continue };
            if cx.tree.get(slot).and_then(Node::record_index).is_none() {
                continue;
            }
            let fields = focusables(cx.tree, slot);
            let Some(&target) = fields.get(mark.field).or(fields.first()) else {
                continue;
            };
            if !cx.tree.is_appeared(target) {
                continue;
            }
            if reveal {
                self.ensure_visible(cx, slot)?;
            }
            cx.focus.do_focus(cx.tree, target, MoveAxis::Both, true);
            return Ok(true);
        }
        log::warn!("{:?}: could not restore focus", self.container);
        Ok(false)
    }
}

fn focusables(tree: &NodeTree, slot: NodeId) -> Vec<NodeId> {
    tree.descendants(slot)
        .into_iter()
        .filter(|n| tree.get(*n).is_some_and(Node::is_focusable))
        .collect()
}

fn find_templates(tree: &NodeTree, container: NodeId) -> Result<(NodeId, Vec<(String, NodeId)>)> {
    let mut item = None;
    let mut messages = Vec::new();
    for &c in tree.children(container) {
        match tree.node(c)?.kind() {
            NodeKind::Item if item.is_none() => item = Some(c),
            NodeKind::Item => return Err(Error::Template("more than one item template".into())),
            NodeKind::Message { state } => messages.push((state.clone(), c)),
            other => return Err(Error::Template(format!("unexpected {other} child"))),
        }
    }
    let item = item.ok_or_else(|| Error::Template("no item template".into()))?;
    Ok((item, messages))
}

fn measure(
    tree: &NodeTree,
    container: NodeId,
    template: NodeId,
    kind: ListKind,
    config: &ListConfig,
) -> Result<WindowState> {
    let inner = tree.inner_size(container);
    let item = tree.measure(template, inner)?;
    let (line, cross, page, cross_extent) = match config.orientation {
        Orientation::Vertical => (item.h, item.w, inner.height, inner.width),
        Orientation::Horizontal => (item.w, item.h, inner.width, inner.height),
    };
    WindowState::measure(kind, line, cross, page, cross_extent, config.margin)
}
