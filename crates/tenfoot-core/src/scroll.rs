//! Scroll dispatch.
//!
//! A scroll bar (or any other indicator) implements [`Scrollable`] and binds
//! itself to a scrolling node. Whenever that node's offset or extent moves,
//! the owner calls one of the `notify_*` methods and every sink bound to the
//! node hears about it. Sinks never drive scrolling back.

use std::cell::RefCell;
use std::rc::Rc;

use crate::NodeId;

pub trait Scrollable {
    /// Horizontal pixel offset out of `limit` (max offset), with `count`
    /// px of total content.
    fn on_h_scroll(&mut self, _source: NodeId, _offset: f32, _limit: f32, _count: f32) {}
    fn on_v_scroll(&mut self, _source: NodeId, _offset: f32, _limit: f32, _count: f32) {}
    /// Record offset: first visible index, last valid first index, record
    /// count.
    fn on_t_scroll(&mut self, _source: NodeId, _offset: usize, _limit: usize, _count: usize) {}
}

pub type SharedScrollable = Rc<RefCell<dyn Scrollable>>;

#[derive(Default)]
pub struct ScrollDispatch {
    bindings: Vec<(NodeId, SharedScrollable)>,
}

impl std::fmt::Debug for ScrollDispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollDispatch")
            .field("bindings", &self.bindings.len())
            .finish()
    }
}

impl ScrollDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, source: NodeId, sink: SharedScrollable) {
        self.bindings.push((source, sink));
    }

    /// Drops every binding of `source` that points at `sink`.
    pub fn unbind(&mut self, source: NodeId, sink: &SharedScrollable) {
        self.bindings
            .retain(|(s, b)| !(*s == source && Rc::ptr_eq(b, sink)));
    }

    pub fn unbind_source(&mut self, source: NodeId) {
        self.bindings.retain(|(s, _)| *s != source);
    }

    pub fn is_bound(&self, source: NodeId) -> bool {
        self.bindings.iter().any(|(s, _)| *s == source)
    }

    pub fn notify_h(&self, source: NodeId, offset: f32, limit: f32, count: f32) {
        self.each(source, |s| s.on_h_scroll(source, offset, limit, count));
    }

    pub fn notify_v(&self, source: NodeId, offset: f32, limit: f32, count: f32) {
        self.each(source, |s| s.on_v_scroll(source, offset, limit, count));
    }

    pub fn notify_t(&self, source: NodeId, offset: usize, limit: usize, count: usize) {
        self.each(source, |s| s.on_t_scroll(source, offset, limit, count));
    }

    fn each(&self, source: NodeId, mut f: impl FnMut(&mut dyn Scrollable)) {
        for (s, sink) in &self.bindings {
            if *s != source {
                continue;
            }
            match sink.try_borrow_mut() {
                Ok(mut sink) => f(&mut *sink),
                Err(_) => log::warn!("scroll sink for {source:?} is busy; skipped"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[derive(Default)]
    struct Bar {
        v: Vec<(f32, f32, f32)>,
        t: Vec<(usize, usize, usize)>,
    }

    impl Scrollable for Bar {
        fn on_v_scroll(&mut self, _source: NodeId, offset: f32, limit: f32, count: f32) {
            self.v.push((offset, limit, count));
        }
        fn on_t_scroll(&mut self, _source: NodeId, offset: usize, limit: usize, count: usize) {
            self.t.push((offset, limit, count));
        }
    }

    #[test]
    fn test_only_bound_source_is_reported() {
        let mut ids: SlotMap<NodeId, ()> = SlotMap::with_key();
        let a = ids.insert(());
        let b = ids.insert(());

        let bar = Rc::new(RefCell::new(Bar::default()));
        let mut d = ScrollDispatch::new();
        d.bind(a, bar.clone());
        d.notify_v(a, 10.0, 100.0, 400.0);
        d.notify_v(b, 99.0, 99.0, 99.0);
        d.notify_t(a, 2, 25, 30);
        d.notify_h(a, 1.0, 1.0, 1.0);
        assert_eq!(bar.borrow().v, vec![(10.0, 100.0, 400.0)]);
        assert_eq!(bar.borrow().t, vec![(2, 25, 30)]);

        let sink: SharedScrollable = bar.clone();
        d.unbind(a, &sink);
        assert!(!d.is_bound(a));
        d.notify_t(a, 3, 25, 30);
        assert_eq!(bar.borrow().t.len(), 1);
    }
}
