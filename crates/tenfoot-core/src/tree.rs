//! # Node tree
//!
//! The tree is an arena (`slotmap`) of [`Node`]s. A parent owns the ordered
//! list of its children; a child keeps a plain `NodeId` back to its parent.
//! Nothing is reference counted, and moving a node under a new parent is
//! always `detach` followed by `attach`.
//!
//! Nodes that are detached (or inserted with [`NodeTree::insert_orphan`])
//! stay in the arena as orphans. The list engine keeps its templates that
//! way: they are never visited by the navigator because they cannot be
//! reached from the root.
//!
//! ## Geometry
//!
//! Each node resolves its rectangle from its [`Anchors`] against the parent's
//! *inner* size (size minus border on each side). The result is memoized per
//! node and invalidated for the whole subtree whenever anchors, borders or
//! the viewport change. A child's rectangle is relative to the parent's inner
//! origin, shifted by the parent's scroll offset:
//!
//! ```text
//! origin_in_parent(child) = rect(child).origin + parent.border - parent.scroll
//! ```
//!
//! Mapping a point between a node and one of its ancestors is a fold of that
//! offset over every level in between.

use std::fmt::Write as _;

use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::{
    Anchors, Error, IdGen, Node, NodeFlags, NodeId, NodeKind, Rect, Record, Result, Size, Vec2,
};

/// Direction of a point mapping between a node and one of its ancestors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapDir {
    /// Node-local point → ancestor space.
    ToRoot,
    /// Ancestor-space point → node-local space.
    ToLeaf,
}

pub struct NodeTree {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
    viewport: Size,
    ids: IdGen,
}

impl std::fmt::Debug for NodeTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeTree")
            .field("root", &self.root)
            .field("viewport", &self.viewport)
            .field("len", &self.nodes.len())
            .finish()
    }
}

impl NodeTree {
    pub fn new(viewport: Size) -> Self {
        Self::with_ids(viewport, IdGen::new())
    }

    /// Builds a tree whose node serials come from `ids`.
    pub fn with_ids(viewport: Size, mut ids: IdGen) -> Self {
        let mut nodes = SlotMap::with_key();
        let mut root = Node::plain().anchors(Anchors::fill());
        root.serial = ids.next_id();
        let root = nodes.insert(root);
        Self {
            nodes,
            root,
            viewport,
            ids,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        if self.viewport != viewport {
            self.viewport = viewport;
            self.invalidate(self.root);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(Error::StaleNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(Error::StaleNode(id))
    }

    // ---- structure ------------------------------------------------------

    /// Inserts `node` as the last child of `parent`.
    pub fn insert(&mut self, parent: NodeId, node: Node) -> Result<NodeId> {
        self.node(parent)?;
        let id = self.insert_orphan(node);
        self.attach(parent, id)?;
        Ok(id)
    }

    /// Inserts `node` without a parent.
    pub fn insert_orphan(&mut self, mut node: Node) -> NodeId {
        node.serial = self.ids.next_id();
        node.parent = None;
        node.children.clear();
        node.rect.set(None);
        self.nodes.insert(node)
    }

    /// Appends an orphan `child` to `parent`'s children.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node(parent)?;
        if self.node(child)?.parent.is_some() || child == self.root {
            return Err(Error::AlreadyAttached(child));
        }
        if child == parent || self.is_ancestor_of(child, parent) {
            return Err(Error::Invariant("attaching a node below itself"));
        }
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        self.invalidate(child);
        Ok(())
    }

    /// Unlinks `id` from its parent. The subtree stays alive as an orphan.
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(Error::Invariant("the root cannot be detached"));
        }
        let Some(parent) = self.node(id)?.parent else {
            return Ok(());
        };
        let siblings = &mut self.node_mut(parent)?.children;
        let Some(pos) = siblings.iter().position(|c| *c == id) else {
            return Err(Error::WrongParent { node: id, parent });
        };
        siblings.remove(pos);
        self.node_mut(id)?.parent = None;
        self.invalidate(id);
        Ok(())
    }

    /// Detaches `id` and frees its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        self.detach(id)?;
        for n in self.descendants(id) {
            self.nodes.remove(n);
        }
        Ok(())
    }

    /// Deep-copies the subtree rooted at `src` into a new orphan subtree.
    pub fn clone_subtree(&mut self, src: NodeId) -> Result<NodeId> {
        let copy = self.node(src)?.duplicate();
        let id = self.insert_orphan(copy);
        let children: SmallVec<[NodeId; 8]> = self.node(src)?.children.iter().copied().collect();
        for c in children {
            let cc = self.clone_subtree(c)?;
            self.attach(id, cc)?;
        }
        Ok(id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children()).unwrap_or(&[])
    }

    /// Iterates the strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// All nodes of the subtree rooted at `id`, in pre-order, `id` first.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// True when `a` is a strict ancestor of `b`.
    pub fn is_ancestor_of(&self, a: NodeId, b: NodeId) -> bool {
        self.ancestors(b).any(|x| x == a)
    }

    /// True when `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root || (self.contains(id) && self.is_ancestor_of(self.root, id))
    }

    /// Lowest common ancestor of `a` and `b`; a node that is an ancestor of
    /// the other is returned itself. `None` when the two live in different
    /// subtrees (e.g. one is an orphan).
    pub fn luca(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let ca = self.chain_from_top(a);
        let cb = self.chain_from_top(b);
        let mut last = None;
        for (x, y) in ca.iter().zip(cb.iter()) {
            if x != y {
                break;
            }
            last = Some(*x);
        }
        last
    }

    /// Number of edges from `node` up to `ancestor`; `None` if unreachable.
    pub fn degree(&self, node: NodeId, ancestor: NodeId) -> Option<usize> {
        if !self.contains(node) {
            return None;
        }
        if node == ancestor {
            return Some(0);
        }
        self.ancestors(node)
            .position(|a| a == ancestor)
            .map(|p| p + 1)
    }

    fn chain_from_top(&self, id: NodeId) -> SmallVec<[NodeId; 16]> {
        let mut chain: SmallVec<[NodeId; 16]> = SmallVec::new();
        if !self.contains(id) {
            return chain;
        }
        chain.push(id);
        chain.extend(self.ancestors(id));
        chain.reverse();
        chain
    }

    // ---- mutation -------------------------------------------------------

    pub fn set_anchors(&mut self, id: NodeId, anchors: Anchors) -> Result<()> {
        let n = self.node_mut(id)?;
        if n.anchors != anchors {
            n.anchors = anchors;
            self.invalidate(id);
        }
        Ok(())
    }

    pub fn set_border(&mut self, id: NodeId, width: f32) -> Result<()> {
        let n = self.node_mut(id)?;
        n.border = width.max(0.0);
        self.invalidate(id);
        Ok(())
    }

    /// Scroll offset only shifts children when mapped; cached rects stay.
    pub fn set_scroll(&mut self, id: NodeId, scroll: Vec2) -> Result<()> {
        self.node_mut(id)?.scroll = scroll;
        Ok(())
    }

    pub fn set_scroll_extent(&mut self, id: NodeId, extent: Size) -> Result<()> {
        self.node_mut(id)?.scroll_extent = extent;
        Ok(())
    }

    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) -> Result<()> {
        self.node_mut(id)?.kind = kind;
        Ok(())
    }

    pub fn set_flag(&mut self, id: NodeId, flag: NodeFlags, on: bool) -> Result<()> {
        self.node_mut(id)?.flags.set(flag, on);
        Ok(())
    }

    pub fn set_visible(&mut self, id: NodeId, on: bool) -> Result<()> {
        self.set_flag(id, NodeFlags::VISIBLE, on)
    }

    pub fn set_enabled(&mut self, id: NodeId, on: bool) -> Result<()> {
        self.set_flag(id, NodeFlags::ENABLE, on)
    }

    pub fn set_focusable(&mut self, id: NodeId, on: bool) -> Result<()> {
        self.set_flag(id, NodeFlags::FOCUSABLE, on)
    }

    pub fn set_record_index(&mut self, id: NodeId, index: Option<usize>) -> Result<()> {
        self.node_mut(id)?.record_index = index;
        Ok(())
    }

    /// Runs `f` on the behavior of `id`, if it has one.
    pub fn with_behavior<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn crate::Behavior) -> R,
    ) -> Option<R> {
        let b = self.nodes.get_mut(id)?.behavior.as_mut()?;
        Some(f(b.as_mut()))
    }

    /// Pushes a "record changed" notification through the subtree of `slot`.
    pub fn notify_record_changed(&mut self, slot: NodeId, index: Option<usize>, record: Option<&Record>) {
        for n in self.descendants(slot) {
            self.with_behavior(n, |b| b.on_record_changed(n, index, record));
        }
    }

    fn invalidate(&self, id: NodeId) {
        for n in self.descendants(id) {
            if let Some(node) = self.nodes.get(n) {
                node.rect.set(None);
            }
        }
    }

    // ---- geometry -------------------------------------------------------

    /// Resolved rectangle of `id` relative to its parent's inner origin.
    /// The root resolves against the viewport; orphans against zero size.
    pub fn rect(&self, id: NodeId) -> Rect {
        let Some(node) = self.nodes.get(id) else {
            return Rect::default();
        };
        if let Some(r) = node.rect.get() {
            return r;
        }
        let inner = match node.parent {
            Some(p) => self.inner_size(p),
            None if id == self.root => self.viewport,
            None => Size::ZERO,
        };
        let r = node.anchors.resolve(inner);
        node.rect.set(Some(r));
        r
    }

    /// Size of `id` minus its border on every side.
    pub fn inner_size(&self, id: NodeId) -> Size {
        let border = self.nodes.get(id).map(|n| n.border).unwrap_or(0.0);
        self.rect(id).inset(border).size()
    }

    /// Inner rectangle of `id` in its own local space (its visible viewport).
    pub fn viewport_of(&self, id: NodeId) -> Rect {
        let r = self.rect(id);
        let border = self.nodes.get(id).map(|n| n.border).unwrap_or(0.0);
        Rect::new(0.0, 0.0, r.w, r.h).inset(border)
    }

    /// Resolves a detached node's anchors against an explicit inner size.
    pub fn measure(&self, id: NodeId, inner: Size) -> Result<Rect> {
        Ok(self.node(id)?.anchors.resolve(inner))
    }

    /// Origin of `id`'s local space expressed in its parent's local space.
    pub fn origin_in_parent(&self, id: NodeId) -> Vec2 {
        let r = self.rect(id);
        match self.parent(id).and_then(|p| self.nodes.get(p)) {
            Some(p) => Vec2::new(r.x + p.border - p.scroll.x, r.y + p.border - p.scroll.y),
            None => r.origin(),
        }
    }

    fn offset_to(&self, id: NodeId, ancestor: Option<NodeId>) -> Option<Vec2> {
        let mut off = Vec2::ZERO;
        let mut cur = id;
        loop {
            if Some(cur) == ancestor {
                return Some(off);
            }
            let node = self.nodes.get(cur)?;
            match node.parent {
                Some(p) => {
                    off += self.origin_in_parent(cur);
                    cur = p;
                }
                None if ancestor.is_none() => {
                    off += self.rect(cur).origin();
                    return Some(off);
                }
                None => return None,
            }
        }
    }

    /// Maps `p` between `node`'s local space and `ancestor`'s local space.
    pub fn map_point(&self, node: NodeId, ancestor: NodeId, p: Vec2, dir: MapDir) -> Option<Vec2> {
        let off = self.offset_to(node, Some(ancestor))?;
        Some(match dir {
            MapDir::ToRoot => p + off,
            MapDir::ToLeaf => p - off,
        })
    }

    /// Rectangle of `id` in `ancestor`'s local space.
    pub fn rect_in(&self, id: NodeId, ancestor: NodeId) -> Option<Rect> {
        let off = self.offset_to(id, Some(ancestor))?;
        let r = self.rect(id);
        Some(Rect::new(off.x, off.y, r.w, r.h))
    }

    /// Rectangle of `id` in viewport coordinates.
    pub fn global_rect(&self, id: NodeId) -> Rect {
        let r = self.rect(id);
        match self.offset_to(id, None) {
            Some(off) => Rect::new(off.x, off.y, r.w, r.h),
            None => r,
        }
    }

    // ---- visibility -----------------------------------------------------

    /// Attached, and it and every ancestor are visible and enabled.
    pub fn is_appeared(&self, id: NodeId) -> bool {
        if !self.is_attached(id) {
            return false;
        }
        std::iter::once(id).chain(self.ancestors(id)).all(|n| {
            self.nodes
                .get(n)
                .is_some_and(|n| n.is_visible() && n.is_enabled())
        })
    }

    /// Appeared, focusable, and not completely clipped away by an ancestor.
    pub fn is_appeared_focusable(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(Node::is_focusable)
            && self.is_appeared(id)
            && !self.is_clipped_out(id)
    }

    /// Walks toward the root carrying `id`'s rectangle and calls `visit` with
    /// each ancestor and the rectangle expressed in that ancestor's space.
    fn walk_clip(&self, id: NodeId, mut visit: impl FnMut(NodeId, Rect) -> bool) {
        let r = self.rect(id);
        let mut acc = Rect::new(0.0, 0.0, r.w, r.h);
        let mut cur = id;
        while let Some(parent) = self.parent(cur) {
            acc = acc.translate(self.origin_in_parent(cur));
            if !visit(parent, acc) {
                return;
            }
            cur = parent;
        }
    }

    /// Nearest ancestor whose viewport does not fully contain `id`.
    pub fn blocker(&self, id: NodeId) -> Option<NodeId> {
        let mut found = None;
        self.walk_clip(id, |ancestor, acc| {
            if self.viewport_of(ancestor).contains_rect(&acc) {
                true
            } else {
                found = Some(ancestor);
                false
            }
        });
        found
    }

    /// True if some blocker of `id` is not also an ancestor of `current`.
    pub fn is_occluded_from(&self, id: NodeId, current: NodeId) -> bool {
        let mut occluded = false;
        self.walk_clip(id, |ancestor, acc| {
            if !self.viewport_of(ancestor).contains_rect(&acc)
                && !self.is_ancestor_of(ancestor, current)
            {
                occluded = true;
                return false;
            }
            true
        });
        occluded
    }

    /// True if some ancestor's viewport does not overlap `id` at all.
    pub fn is_clipped_out(&self, id: NodeId) -> bool {
        let mut out = false;
        self.walk_clip(id, |ancestor, acc| {
            if self.viewport_of(ancestor).overlaps(&acc) {
                true
            } else {
                out = true;
                false
            }
        });
        out
    }

    /// Deepest visible node containing the viewport point `p`.
    pub fn node_at(&self, p: Vec2) -> Option<NodeId> {
        let root = self.root;
        if !self.global_rect(root).contains(p) {
            return None;
        }
        let mut hit = root;
        'descend: loop {
            for &c in self.children(hit).iter().rev() {
                let Some(n) = self.nodes.get(c) else { continue };
                if n.is_visible() && self.global_rect(c).contains(p) {
                    hit = c;
                    continue 'descend;
                }
            }
            return Some(hit);
        }
    }

    /// Indented outline of the subtree at `id`, one node per line.
    pub fn dump(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(id, 0, &mut out);
        out
    }

    fn dump_into(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(n) = self.nodes.get(id) else { return };
        let r = self.rect(id);
        let _ = write!(
            out,
            "{:indent$}{} #{} [{},{} {}x{}]",
            "",
            n.kind,
            n.serial,
            r.x,
            r.y,
            r.w,
            r.h,
            indent = depth * 2
        );
        if n.is_focusable() {
            out.push_str(" focusable");
        }
        if !n.is_visible() {
            out.push_str(" hidden");
        }
        if !n.is_enabled() {
            out.push_str(" disabled");
        }
        if n.is_editable() {
            out.push_str(" editable");
        }
        if n.flags.contains(NodeFlags::CLICKING) {
            out.push_str(" pressed");
        }
        if let Some(i) = n.record_index {
            let _ = write!(out, " record={i}");
        }
        out.push('\n');
        for &c in n.children() {
            self.dump_into(c, depth + 1, out);
        }
    }
}

pub struct Ancestors<'a> {
    tree: &'a NodeTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let cur = self.next?;
        self.next = self.tree.parent(cur);
        Some(cur)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> NodeTree {
        NodeTree::new(Size::new(800.0, 600.0))
    }

    #[test]
    fn test_root_fills_viewport() {
        let t = tree();
        assert_eq!(t.rect(t.root()), Rect::new(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn test_child_resolves_against_parent_inner_rect() {
        let mut t = tree();
        let panel = t
            .insert(t.root(), Node::plain().anchors(Anchors::at(100.0, 50.0, 300.0, 200.0)).border(10.0))
            .unwrap();
        let child = t.insert(panel, Node::plain().anchors(Anchors::fill())).unwrap();
        assert_eq!(t.rect(child), Rect::new(0.0, 0.0, 280.0, 180.0));
        assert_eq!(t.global_rect(child), Rect::new(110.0, 60.0, 280.0, 180.0));
    }

    #[test]
    fn test_anchor_change_invalidates_subtree() {
        let mut t = tree();
        let panel = t
            .insert(t.root(), Node::plain().anchors(Anchors::at(0.0, 0.0, 100.0, 100.0)))
            .unwrap();
        let child = t.insert(panel, Node::plain().anchors(Anchors::fill())).unwrap();
        assert_eq!(t.rect(child).w, 100.0);
        t.set_anchors(panel, Anchors::at(0.0, 0.0, 250.0, 100.0)).unwrap();
        assert_eq!(t.rect(child).w, 250.0);
        t.set_viewport(Size::new(400.0, 300.0));
        assert_eq!(t.rect(t.root()).w, 400.0);
    }

    #[test]
    fn test_scroll_shifts_children_in_mapping() {
        let mut t = tree();
        let pane = t
            .insert(t.root(), Node::plain().anchors(Anchors::at(0.0, 0.0, 100.0, 100.0)))
            .unwrap();
        let row = t
            .insert(pane, Node::plain().anchors(Anchors::at(0.0, 150.0, 100.0, 40.0)))
            .unwrap();
        t.set_scroll(pane, Vec2::new(0.0, 120.0)).unwrap();
        assert_eq!(t.global_rect(row).y, 30.0);

        let p = t
            .map_point(row, t.root(), Vec2::new(5.0, 5.0), MapDir::ToRoot)
            .unwrap();
        assert_eq!(p, Vec2::new(5.0, 35.0));
        let back = t.map_point(row, t.root(), p, MapDir::ToLeaf).unwrap();
        assert_eq!(back, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_luca_and_degree() {
        let mut t = tree();
        let a = t.insert(t.root(), Node::plain()).unwrap();
        let a1 = t.insert(a, Node::plain()).unwrap();
        let a11 = t.insert(a1, Node::plain()).unwrap();
        let a2 = t.insert(a, Node::plain()).unwrap();
        let b = t.insert(t.root(), Node::plain()).unwrap();

        assert_eq!(t.luca(a11, a2), Some(a));
        assert_eq!(t.luca(a11, a1), Some(a1));
        assert_eq!(t.luca(a11, b), Some(t.root()));
        assert_eq!(t.degree(a11, a), Some(2));
        assert_eq!(t.degree(a11, a11), Some(0));
        assert_eq!(t.degree(a11, b), None);

        let orphan = t.insert_orphan(Node::plain());
        assert_eq!(t.luca(orphan, a), None);
    }

    #[test]
    fn test_detach_attach_and_reject_cycles() {
        let mut t = tree();
        let a = t.insert(t.root(), Node::plain()).unwrap();
        let b = t.insert(a, Node::plain()).unwrap();
        assert_eq!(t.attach(t.root(), b), Err(Error::AlreadyAttached(b)));

        t.detach(a).unwrap();
        assert!(!t.is_attached(b));
        assert_eq!(
            t.attach(b, a),
            Err(Error::Invariant("attaching a node below itself"))
        );
        t.attach(t.root(), a).unwrap();
        assert!(t.is_attached(b));
        assert!(t.detach(t.root()).is_err());
    }

    #[test]
    fn test_remove_frees_subtree() {
        let mut t = tree();
        let a = t.insert(t.root(), Node::plain()).unwrap();
        let b = t.insert(a, Node::plain()).unwrap();
        let before = t.len();
        t.remove(a).unwrap();
        assert_eq!(t.len(), before - 2);
        assert!(!t.contains(b));
        assert_eq!(t.node(b).unwrap_err(), Error::StaleNode(b));
    }

    #[test]
    fn test_clone_subtree_gets_fresh_serials() {
        let mut t = tree();
        let a = t
            .insert(t.root(), Node::item().anchors(Anchors::at(0.0, 0.0, 10.0, 10.0)).focusable(true))
            .unwrap();
        let _b = t.insert(a, Node::plain()).unwrap();
        let c = t.clone_subtree(a).unwrap();
        assert_eq!(t.parent(c), None);
        assert_eq!(t.children(c).len(), 1);
        assert_ne!(t.node(c).unwrap().serial(), t.node(a).unwrap().serial());
        assert!(t.node(c).unwrap().is_focusable());
    }

    #[test]
    fn test_blocker_and_clipping() {
        let mut t = tree();
        let pane = t
            .insert(t.root(), Node::plain().anchors(Anchors::at(0.0, 0.0, 100.0, 100.0)))
            .unwrap();
        let inside = t
            .insert(pane, Node::plain().anchors(Anchors::at(0.0, 0.0, 100.0, 50.0)))
            .unwrap();
        let partial = t
            .insert(pane, Node::plain().anchors(Anchors::at(0.0, 80.0, 100.0, 50.0)))
            .unwrap();
        let gone = t
            .insert(pane, Node::plain().anchors(Anchors::at(0.0, 300.0, 100.0, 50.0)))
            .unwrap();

        assert_eq!(t.blocker(inside), None);
        assert_eq!(t.blocker(partial), Some(pane));
        assert!(!t.is_clipped_out(partial));
        assert!(t.is_clipped_out(gone));

        assert!(t.is_occluded_from(partial, t.root()));
        assert!(!t.is_occluded_from(partial, inside));
    }

    #[test]
    fn test_node_at_prefers_topmost_child() {
        let mut t = tree();
        let under = t
            .insert(t.root(), Node::plain().anchors(Anchors::at(0.0, 0.0, 100.0, 100.0)))
            .unwrap();
        let over = t
            .insert(t.root(), Node::plain().anchors(Anchors::at(50.0, 50.0, 100.0, 100.0)))
            .unwrap();
        assert_eq!(t.node_at(Vec2::new(75.0, 75.0)), Some(over));
        assert_eq!(t.node_at(Vec2::new(10.0, 10.0)), Some(under));
        t.set_visible(over, false).unwrap();
        assert_eq!(t.node_at(Vec2::new(75.0, 75.0)), Some(under));
        assert_eq!(t.node_at(Vec2::new(900.0, 10.0)), None);
    }

    #[test]
    fn test_dump_outline() {
        let mut t = tree();
        let list = t
            .insert(t.root(), Node::new(NodeKind::List).anchors(Anchors::at(10.0, 20.0, 300.0, 200.0)))
            .unwrap();
        let item = t
            .insert(list, Node::item().anchors(Anchors::at(0.0, 0.0, 300.0, 50.0)).focusable(true))
            .unwrap();
        t.set_record_index(item, Some(3)).unwrap();
        t.insert(list, Node::message("empty").visible(false)).unwrap();

        insta::assert_snapshot!(t.dump(t.root()).trim_end(), @r"
        Plain #1 [0,0 800x600]
          List #2 [10,20 300x200]
            Item #3 [0,0 300x50] focusable record=3
            Message(empty) #4 [0,0 0x0] hidden
        ");
    }
}
