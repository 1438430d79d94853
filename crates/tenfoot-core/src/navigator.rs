//! # Spatial navigation
//!
//! The navigator is stateless: it reads the tree and a remembered axis point
//! and answers "which node is next". It never mutates focus itself; the
//! [`FocusDirectory`](crate::FocusDirectory) does that with the answer.
//!
//! A node is a candidate when it is a focusable descendant of the search
//! root, is not inside a hidden or disabled subtree, is not the current node,
//! is accepted by the current node's `can_move_focus` hook, and is not
//! occluded: every ancestor that clips it must also be an ancestor of the
//! current node. That last rule lets focus walk into partially scrolled items
//! of the container it already lives in, while items hidden behind some
//! *other* scroll container stay out of reach.
//!
//! Candidates are ranked by degree (edges up to the common ancestor with the
//! current node; siblings beat cousins), then by distance from the axis
//! point.

use crate::{Direction, FocusPolicy, NodeId, NodeTree, Rect, Vec2};

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavConfig {
    /// Multiplier applied to the deviation perpendicular to the move.
    pub perpendicular_weight: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            perpendicular_weight: 65536.0,
        }
    }
}

#[derive(Debug)]
pub struct Navigator<'a> {
    tree: &'a NodeTree,
    config: NavConfig,
}

impl<'a> Navigator<'a> {
    pub fn new(tree: &'a NodeTree) -> Self {
        Self::with_config(tree, NavConfig::default())
    }

    pub fn with_config(tree: &'a NodeTree, config: NavConfig) -> Self {
        Self { tree, config }
    }

    /// Best candidate below `search_root` on the side of `current` that
    /// `filter(current_rect, candidate_rect)` accepts. Rects are global.
    pub fn nearest_node(
        &self,
        current: NodeId,
        search_root: NodeId,
        filter: impl Fn(&Rect, &Rect) -> bool,
        key: Direction,
        axis: Vec2,
    ) -> Option<NodeId> {
        let tree = self.tree;
        let cur_rect = tree.global_rect(current);
        let policy = tree
            .get(search_root)
            .map(|n| n.focus_policy())
            .unwrap_or_default();

        let mut best: Option<(usize, f64, NodeId)> = None;
        for cand in self.candidates(current, search_root) {
            let rect = tree.global_rect(cand);
            if !filter(&cur_rect, &rect) {
                continue;
            }
            let Some(degree) = tree.luca(cand, current).and_then(|l| tree.degree(cand, l)) else {
                continue;
            };
            let score = self.score(policy, key, axis, &rect);
            let better = match best {
                None => true,
                Some((bd, bs, _)) => degree < bd || (degree == bd && score < bs),
            };
            if better {
                best = Some((degree, score, cand));
            }
        }

        match best {
            Some((degree, score, id)) => {
                log::debug!("nearest {key:?}: {id:?} (degree {degree}, score {score:.1})");
                Some(id)
            }
            None => {
                log::debug!("nearest {key:?}: no candidate from {current:?}");
                None
            }
        }
    }

    /// [`nearest_node`](Self::nearest_node) with the direction's own
    /// half-plane test.
    pub fn nearest_in_direction(
        &self,
        current: NodeId,
        search_root: NodeId,
        key: Direction,
        axis: Vec2,
    ) -> Option<NodeId> {
        self.nearest_node(current, search_root, |c, r| key.accepts(c, r), key, axis)
    }

    /// Next (`dir > 0`) or previous (`dir < 0`) candidate in tree order,
    /// wrapping around. When `current` is not itself eligible the first or
    /// last candidate is returned.
    pub fn adjacent_node(&self, current: NodeId, search_root: NodeId, dir: isize) -> Option<NodeId> {
        let mut order = self.eligible(current, search_root, true);
        let Some(pos) = order.iter().position(|n| *n == current) else {
            return if dir >= 0 { order.first().copied() } else { order.pop() };
        };
        if order.len() < 2 {
            return None;
        }
        let next = (pos as isize + dir.signum()).rem_euclid(order.len() as isize) as usize;
        Some(order[next])
    }

    /// Every node `current` may move to below `search_root`, in tree order.
    pub fn candidates(&self, current: NodeId, search_root: NodeId) -> Vec<NodeId> {
        self.eligible(current, search_root, false)
    }

    fn eligible(&self, current: NodeId, search_root: NodeId, keep_current: bool) -> Vec<NodeId> {
        let tree = self.tree;
        let hook = tree.get(current);
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = tree.children(search_root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = tree.get(id) else { continue };
            if !node.is_visible() || !node.is_enabled() {
                continue;
            }
            stack.extend(tree.children(id).iter().rev().copied());
            if !node.is_focusable() {
                continue;
            }
            if id == current {
                if keep_current {
                    out.push(id);
                }
                continue;
            }
            let allowed = hook
                .and_then(|h| h.behavior.as_ref())
                .is_none_or(|b| b.can_move_focus(current, id));
            if allowed && !tree.is_occluded_from(id, current) {
                out.push(id);
            }
        }
        out
    }

    fn score(&self, policy: FocusPolicy, key: Direction, axis: Vec2, rect: &Rect) -> f64 {
        let dx = f64::from(rect.center_x() - axis.x);
        let dy = f64::from(rect.y - axis.y);
        let w = self.config.perpendicular_weight;
        match policy {
            FocusPolicy::Directional if key.is_horizontal() => dx.hypot(dy * w),
            FocusPolicy::Directional => (dx * w).hypot(dy),
            FocusPolicy::Nearest => dx.hypot(dy),
        }
    }
}
