//! Routes decoded remote-control events into a [`Page`].
//!
//! Only one event is in flight at a time: after an event changes the page
//! the dispatcher stays busy until the host reports that its visual sync
//! finished ([`Dispatcher::sync_done`]). Events arriving meanwhile are queued
//! and replayed in order.

use std::collections::VecDeque;

use tenfoot_core::{AxisEvent, Key, KeyEvent, KeyState, Result};

use crate::page::Page;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    Key(KeyEvent),
    Axis(AxisEvent),
}

impl From<KeyEvent> for Event {
    fn from(ev: KeyEvent) -> Self {
        Event::Key(ev)
    }
}

impl From<AxisEvent> for Event {
    fn from(ev: AxisEvent) -> Self {
        Event::Axis(ev)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handled {
    Yes,
    /// Not ours; the host may act on it (e.g. `Back`).
    No,
    /// Queued behind an event whose sync is still pending.
    Deferred,
}

#[derive(Debug, Default)]
pub struct Dispatcher {
    busy: bool,
    deferred: VecDeque<Event>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn pending(&self) -> usize {
        self.deferred.len()
    }

    pub fn dispatch(&mut self, page: &mut Page, ev: impl Into<Event>) -> Result<Handled> {
        let ev = ev.into();
        if self.busy {
            log::debug!("busy, deferring {ev:?}");
            self.deferred.push_back(ev);
            return Ok(Handled::Deferred);
        }
        self.run(page, ev)
    }

    /// The host finished syncing the last change. Replays queued events
    /// until one of them changes the page again; returns how many ran.
    pub fn sync_done(&mut self, page: &mut Page) -> Result<usize> {
        self.busy = false;
        let mut ran = 0;
        while !self.busy {
            let Some(ev) = self.deferred.pop_front() else { break };
            self.run(page, ev)?;
            ran += 1;
        }
        Ok(ran)
    }

    /// Drops queued events, e.g. when the page goes away.
    pub fn reset(&mut self) {
        self.busy = false;
        self.deferred.clear();
    }

    fn run(&mut self, page: &mut Page, ev: Event) -> Result<Handled> {
        let handled = match ev {
            Event::Key(k) => handle_key(page, k)?,
            Event::Axis(a) => page.wheel(a)?,
        };
        if handled {
            self.busy = true;
            Ok(Handled::Yes)
        } else {
            Ok(Handled::No)
        }
    }
}

fn handle_key(page: &mut Page, ev: KeyEvent) -> Result<bool> {
    if ev.state == KeyState::Up {
        return Ok(ev.key == Key::Enter && page.release());
    }

    if let Some(dir) = ev.key.direction() {
        // text entry keeps its own caret movement
        let editing = page
            .focus()
            .and_then(|f| page.tree().get(f))
            .is_some_and(|n| n.is_editable());
        if editing && dir.is_horizontal() {
            return Ok(false);
        }
        return Ok(page.navigate(dir)?.is_some());
    }

    match ev.key {
        Key::Enter => Ok(page.press().is_some()),
        Key::Tab => Ok(page.tab(1).is_some()),
        Key::BackTab => Ok(page.tab(-1).is_some()),
        Key::PageDown => page.scroll_page(1),
        Key::PageUp => page.scroll_page(-1),
        Key::Back => Ok(false),
        Key::Left | Key::Right | Key::Up | Key::Down => Ok(false),
    }
}
