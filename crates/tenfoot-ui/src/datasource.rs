//! Data sources feeding list and grid engines.
//!
//! A source is polled, never pushed: it bumps its change signal and the
//! engine re-reads `count`, `has_error` and the records it needs on its next
//! pump. Records are handed out as shared `Rc<dyn Any>` and slots hold them
//! only while notifying their subtree.

use std::cell::RefCell;
use std::rc::Rc;

use tenfoot_core::{Record, Signal, signal};

pub trait DataSource {
    /// `None` while the data is still loading.
    fn count(&self) -> Option<usize>;

    fn record(&self, index: usize) -> Option<Record>;

    fn criteria(&self) -> &str;

    /// Index the engine should bring into view on first load.
    fn attention(&self) -> usize {
        0
    }

    /// Switches to a new selection (filter, query, category). Sources that
    /// load asynchronously go back to `count() == None` here.
    fn select(&mut self, criteria: &str);

    fn has_error(&self) -> bool {
        false
    }

    fn error_code(&self) -> Option<i32> {
        None
    }

    /// Bumped on every change the engine should react to.
    fn changes(&self) -> Signal<u64>;
}

pub type SharedSource = Rc<RefCell<dyn DataSource>>;

pub fn shared<S: DataSource + 'static>(source: S) -> Rc<RefCell<S>> {
    Rc::new(RefCell::new(source))
}

/// Borrows a record as a concrete type.
pub fn record_as<T: 'static>(record: &Record) -> Option<&T> {
    record.downcast_ref::<T>()
}

type Filter<T> = Box<dyn Fn(&T, &str) -> bool>;

/// In-memory source over a `Vec<T>`.
///
/// Starts out loading. `set_records`, `set_loading` and `set_error` each
/// bump the change signal.
pub struct VecDataSource<T: 'static> {
    items: Vec<Rc<T>>,
    visible: Vec<usize>,
    loading: bool,
    error: Option<Option<i32>>,
    attention: usize,
    criteria: String,
    filter: Option<Filter<T>>,
    changes: Signal<u64>,
}

impl<T: 'static> Default for VecDataSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> std::fmt::Debug for VecDataSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VecDataSource")
            .field("items", &self.items.len())
            .field("visible", &self.visible.len())
            .field("loading", &self.loading)
            .field("error", &self.error)
            .field("criteria", &self.criteria)
            .finish()
    }
}

impl<T: 'static> VecDataSource<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            visible: Vec::new(),
            loading: true,
            error: None,
            attention: 0,
            criteria: String::new(),
            filter: None,
            changes: signal(0),
        }
    }

    /// A source that is already loaded with `items`.
    pub fn with_records(items: Vec<T>) -> Self {
        let mut s = Self::new();
        s.items = items.into_iter().map(Rc::new).collect();
        s.loading = false;
        s.refilter();
        s
    }

    /// Predicate deciding which records match the current criteria.
    pub fn with_filter(mut self, f: impl Fn(&T, &str) -> bool + 'static) -> Self {
        self.filter = Some(Box::new(f));
        self.refilter();
        self
    }

    pub fn set_records(&mut self, items: Vec<T>) {
        self.items = items.into_iter().map(Rc::new).collect();
        self.loading = false;
        self.error = None;
        self.refilter();
        self.bump();
    }

    pub fn set_loading(&mut self) {
        self.loading = true;
        self.error = None;
        self.bump();
    }

    pub fn set_error(&mut self, code: Option<i32>) {
        self.loading = false;
        self.error = Some(code);
        self.bump();
    }

    pub fn set_attention(&mut self, index: usize) {
        self.attention = index;
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.visible.get(index).map(|i| self.items[*i].as_ref())
    }

    /// Notifies subscribers without changing anything.
    pub fn bump(&self) {
        self.changes.update(|v| *v = v.wrapping_add(1));
    }

    fn refilter(&mut self) {
        self.visible = match &self.filter {
            Some(f) if !self.criteria.is_empty() => (0..self.items.len())
                .filter(|i| f(&self.items[*i], &self.criteria))
                .collect(),
            _ => (0..self.items.len()).collect(),
        };
    }
}

impl<T: 'static> DataSource for VecDataSource<T> {
    fn count(&self) -> Option<usize> {
        if self.loading {
            None
        } else if self.error.is_some() {
            Some(0)
        } else {
            Some(self.visible.len())
        }
    }

    fn record(&self, index: usize) -> Option<Record> {
        let i = *self.visible.get(index)?;
        let r: Record = self.items[i].clone();
        Some(r)
    }

    fn criteria(&self) -> &str {
        &self.criteria
    }

    fn attention(&self) -> usize {
        self.attention
    }

    fn select(&mut self, criteria: &str) {
        if self.criteria == criteria {
            return;
        }
        log::debug!("select {criteria:?}");
        self.criteria = criteria.to_string();
        self.refilter();
        self.bump();
    }

    fn has_error(&self) -> bool {
        self.error.is_some()
    }

    fn error_code(&self) -> Option<i32> {
        self.error.flatten()
    }

    fn changes(&self) -> Signal<u64> {
        self.changes.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_loading_then_loaded() {
        let mut s: VecDataSource<u32> = VecDataSource::new();
        assert_eq!(s.count(), None);
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        s.changes().subscribe(move |_| h.set(h.get() + 1));

        s.set_records(vec![1, 2, 3]);
        assert_eq!(s.count(), Some(3));
        assert_eq!(hits.get(), 1);
        let r = s.record(2).unwrap();
        assert_eq!(record_as::<u32>(&r), Some(&3));
        assert!(s.record(3).is_none());
    }

    #[test]
    fn test_error_state() {
        let mut s = VecDataSource::with_records(vec!["a"]);
        s.set_error(Some(404));
        assert!(s.has_error());
        assert_eq!(s.error_code(), Some(404));
        s.set_error(None);
        assert_eq!(s.error_code(), None);
        assert!(s.has_error());
    }

    #[test]
    fn test_select_filters() {
        let mut s = VecDataSource::with_records(vec!["apple", "banana", "avocado"])
            .with_filter(|item: &&str, c| item.starts_with(c));
        assert_eq!(s.count(), Some(3));
        s.select("a");
        assert_eq!(s.count(), Some(2));
        assert_eq!(s.get(1), Some(&"avocado"));
        assert_eq!(s.criteria(), "a");
        s.select("");
        assert_eq!(s.count(), Some(3));
    }
}
