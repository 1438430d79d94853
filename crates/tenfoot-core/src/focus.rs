//! # Focus directory
//!
//! One per page. It is the only writer of the page's focus: everything else
//! (key dispatch, list engines restoring focus after a reload) goes through
//! [`FocusDirectory::do_focus`] or [`FocusDirectory::set_focus`].
//!
//! Besides the focused node the directory remembers an *axis point*: the
//! horizontal center and the top edge of the last focus target, updated per
//! move axis. Moving down a column of uneven items therefore keeps aiming at
//! the column the user started in instead of drifting with each item's
//! center.

use crate::{MoveAxis, NodeFlags, NodeId, NodeTree, Result, Vec2};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FocusState {
    pub focus: Option<NodeId>,
    pub pressed: Option<NodeId>,
    pub axis: Vec2,
}

#[derive(Debug, Default)]
pub struct FocusDirectory {
    state: FocusState,
}

impl FocusDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> Option<NodeId> {
        self.state.focus
    }

    pub fn pressed(&self) -> Option<NodeId> {
        self.state.pressed
    }

    pub fn axis(&self) -> Vec2 {
        self.state.axis
    }

    pub fn state(&self) -> FocusState {
        self.state
    }

    /// Moves focus to `node` without checking that it can hold focus.
    ///
    /// Returns false (and does nothing) when `node` already has focus and
    /// `force` is off. A forced refocus of the same node re-fires its own
    /// "gained" hook and refreshes the axis point.
    pub fn do_focus(&mut self, tree: &mut NodeTree, node: NodeId, axis: MoveAxis, force: bool) -> bool {
        let old = self.state.focus.filter(|o| tree.contains(*o));
        if old == Some(node) {
            if !force {
                return false;
            }
            tree.with_behavior(node, |b| b.on_focus_changed(node, true));
            self.update_axis(tree, node, axis);
            return true;
        }

        if self.state.pressed.is_some() {
            self.release_without_activation(tree);
        }

        let stop = old.and_then(|o| tree.luca(o, node));
        if let Some(old) = old {
            let losing: Vec<NodeId> = std::iter::once(old)
                .chain(tree.ancestors(old))
                .take_while(|n| Some(*n) != stop)
                .collect();
            for n in losing {
                tree.with_behavior(n, |b| b.on_focus_changed(n, false));
            }
        }

        let mut gaining: Vec<NodeId> = std::iter::once(node)
            .chain(tree.ancestors(node))
            .take_while(|n| Some(*n) != stop)
            .collect();
        gaining.reverse();

        // focus is committed before the "gained" hooks run so they observe it
        self.state.focus = Some(node);
        for n in gaining {
            tree.with_behavior(n, |b| b.on_focus_changed(n, true));
        }
        self.update_axis(tree, node, axis);
        log::debug!("focus {old:?} -> {node:?}");
        true
    }

    /// Focuses `node` if it is currently able to hold focus.
    pub fn set_focus(&mut self, tree: &mut NodeTree, node: NodeId, axis: MoveAxis) -> Result<bool> {
        tree.node(node)?;
        if !tree.is_appeared_focusable(node) {
            log::warn!("focus target {node:?} is not focusable right now");
            return Ok(false);
        }
        Ok(self.do_focus(tree, node, axis, false))
    }

    /// Focuses the first appeared-focusable node under `root` in tree order.
    pub fn reset_focus(&mut self, tree: &mut NodeTree, root: NodeId) -> Option<NodeId> {
        let target = tree
            .descendants(root)
            .into_iter()
            .find(|n| tree.is_appeared_focusable(*n))?;
        self.do_focus(tree, target, MoveAxis::Both, true);
        Some(target)
    }

    /// Repairs focus if the focused node went away, was hidden, or was
    /// scrolled out entirely.
    pub fn validate(&mut self, tree: &mut NodeTree, root: NodeId) -> Option<NodeId> {
        if let Some(f) = self.state.focus
            && tree.is_appeared_focusable(f)
        {
            return Some(f);
        }
        if let Some(f) = self.state.focus {
            log::warn!("focused node {f:?} is no longer focusable; resetting");
        }
        match self.reset_focus(tree, root) {
            Some(n) => Some(n),
            None => {
                log::error!("lost focus");
                self.clear(tree);
                None
            }
        }
    }

    /// Marks the focused node as pressed.
    pub fn press(&mut self, tree: &mut NodeTree) -> Option<NodeId> {
        let f = self.state.focus?;
        if let Some(prev) = self.state.pressed
            && prev != f
        {
            let _ = tree.set_flag(prev, NodeFlags::CLICKING, false);
        }
        tree.set_flag(f, NodeFlags::CLICKING, true).ok()?;
        self.state.pressed = Some(f);
        Some(f)
    }

    /// Clears the pressed node. Activates it when it still has focus.
    pub fn release(&mut self, tree: &mut NodeTree) -> bool {
        let Some(p) = self.state.pressed.take() else {
            return false;
        };
        let _ = tree.set_flag(p, NodeFlags::CLICKING, false);
        if self.state.focus == Some(p) && tree.contains(p) {
            tree.with_behavior(p, |b| b.on_activate(p));
            log::debug!("activated {p:?}");
            true
        } else {
            false
        }
    }

    /// Forgets focus and pressed state, e.g. when the page unmounts.
    pub fn clear(&mut self, tree: &mut NodeTree) {
        if self.state.pressed.is_some() {
            self.release_without_activation(tree);
        }
        self.state = FocusState::default();
    }

    fn release_without_activation(&mut self, tree: &mut NodeTree) {
        if let Some(p) = self.state.pressed.take() {
            let _ = tree.set_flag(p, NodeFlags::CLICKING, false);
        }
    }

    fn update_axis(&mut self, tree: &NodeTree, node: NodeId, axis: MoveAxis) {
        let r = tree.global_rect(node);
        match axis {
            MoveAxis::X => self.state.axis.x = r.center_x(),
            MoveAxis::Y => self.state.axis.y = r.y,
            MoveAxis::Both => self.state.axis = Vec2::new(r.center_x(), r.y),
        }
    }
}
