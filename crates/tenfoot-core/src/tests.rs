#[cfg(test)]
mod tests {
    use crate::*;

    fn focusable(t: &mut NodeTree, parent: NodeId, x: f32, y: f32, w: f32, h: f32) -> NodeId {
        let _ = env_logger::builder().is_test(true).try_init();
        t.insert(parent, Node::plain().anchors(Anchors::at(x, y, w, h)).focusable(true))
            .unwrap()
    }

    fn step(t: &mut NodeTree, focus: &mut FocusDirectory, dir: Direction) -> Option<NodeId> {
        let cur = focus.focus()?;
        let root = t.root();
        let next = Navigator::new(t).nearest_in_direction(cur, root, dir, focus.axis())?;
        focus.do_focus(t, next, dir.axis(), false);
        Some(next)
    }

    #[test]
    fn test_left_picks_same_row() {
        let mut t = NodeTree::new(Size::new(800.0, 600.0));
        let root = t.root();
        let current = focusable(&mut t, root, 100.0, 0.0, 50.0, 50.0);
        let a = focusable(&mut t, root, 0.0, 0.0, 50.0, 50.0);
        let _b = focusable(&mut t, root, 0.0, 100.0, 50.0, 50.0);

        let mut focus = FocusDirectory::new();
        focus.set_focus(&mut t, current, MoveAxis::Both).unwrap();
        assert_eq!(step(&mut t, &mut focus, Direction::Left), Some(a));
    }

    #[test]
    fn test_axis_point_keeps_column() {
        // wide header over a row of three: going down from the right cell,
        // through the header and back down, should land on the right cell
        let mut t = NodeTree::new(Size::new(900.0, 600.0));
        let root = t.root();
        let header = focusable(&mut t, root, 0.0, 0.0, 900.0, 50.0);
        let _l = focusable(&mut t, root, 0.0, 100.0, 300.0, 50.0);
        let _m = focusable(&mut t, root, 300.0, 100.0, 300.0, 50.0);
        let r = focusable(&mut t, root, 600.0, 100.0, 300.0, 50.0);

        let mut focus = FocusDirectory::new();
        focus.set_focus(&mut t, r, MoveAxis::Both).unwrap();
        assert_eq!(step(&mut t, &mut focus, Direction::Up), Some(header));
        assert_eq!(focus.axis().x, 750.0);
        assert_eq!(step(&mut t, &mut focus, Direction::Down), Some(r));
    }

    #[test]
    fn test_shallow_candidate_beats_nearer_nested_one() {
        let mut t = NodeTree::new(Size::new(1000.0, 1000.0));
        let root = t.root();
        let current = focusable(&mut t, root, 0.0, 0.0, 100.0, 50.0);
        let deg1 = focusable(&mut t, root, 0.0, 500.0, 100.0, 50.0);
        let w2 = t
            .insert(root, Node::plain().anchors(Anchors::at(0.0, 90.0, 1000.0, 100.0)))
            .unwrap();
        let deg2 = focusable(&mut t, w2, 0.0, 10.0, 100.0, 50.0);
        let w3 = t
            .insert(root, Node::plain().anchors(Anchors::at(0.0, 50.0, 1000.0, 100.0)))
            .unwrap();
        let w3b = t.insert(w3, Node::plain().anchors(Anchors::fill())).unwrap();
        let deg3 = focusable(&mut t, w3b, 0.0, 10.0, 100.0, 50.0);

        let axis = Vec2::new(50.0, 0.0);
        let nav = Navigator::new(&t);
        assert_eq!(nav.nearest_in_direction(current, root, Direction::Down, axis), Some(deg1));

        t.set_visible(deg1, false).unwrap();
        let nav = Navigator::new(&t);
        assert_eq!(nav.nearest_in_direction(current, root, Direction::Down, axis), Some(deg2));

        t.set_visible(deg2, false).unwrap();
        let nav = Navigator::new(&t);
        assert_eq!(nav.nearest_in_direction(current, root, Direction::Down, axis), Some(deg3));
    }

    #[test]
    fn test_scrolled_container_occludes_only_from_outside() {
        let mut t = NodeTree::new(Size::new(800.0, 600.0));
        let root = t.root();
        let outside = focusable(&mut t, root, 0.0, 0.0, 100.0, 40.0);
        let pane = t
            .insert(root, Node::plain().anchors(Anchors::at(0.0, 100.0, 400.0, 200.0)).border(2.0))
            .unwrap();
        let rows: Vec<NodeId> = (0..6)
            .map(|i| focusable(&mut t, pane, 0.0, i as f32 * 60.0, 300.0, 60.0))
            .collect();
        t.set_scroll(pane, Vec2::new(0.0, 70.0)).unwrap();

        // rows[0] is scrolled out above, rows[4] straddles the bottom edge
        assert!(t.is_clipped_out(rows[0]));
        assert_eq!(t.blocker(rows[4]), Some(pane));
        assert_eq!(t.blocker(rows[2]), None);

        let nav = Navigator::new(&t);
        let from_outside = nav.candidates(outside, root);
        assert!(!from_outside.contains(&rows[4]));
        assert!(from_outside.contains(&rows[2]));

        let inside = nav.candidates(rows[2], pane);
        assert!(inside.contains(&rows[4]));
    }

    #[test]
    fn test_tab_from_outside_skips_occluded_rows() {
        let mut t = NodeTree::new(Size::new(800.0, 600.0));
        let root = t.root();
        let outside = focusable(&mut t, root, 0.0, 0.0, 100.0, 40.0);
        let pane = t
            .insert(root, Node::plain().anchors(Anchors::at(0.0, 100.0, 400.0, 200.0)).border(2.0))
            .unwrap();
        let rows: Vec<NodeId> = (0..6)
            .map(|i| focusable(&mut t, pane, 0.0, i as f32 * 60.0, 300.0, 60.0))
            .collect();
        t.set_scroll(pane, Vec2::new(0.0, 70.0)).unwrap();

        // only rows[2] and rows[3] sit fully inside the pane
        let nav = Navigator::new(&t);
        assert_eq!(nav.adjacent_node(outside, root, 1), Some(rows[2]));
        assert_eq!(nav.adjacent_node(outside, root, -1), Some(rows[3]));

        t.set_scroll(pane, Vec2::new(0.0, 0.0)).unwrap();
        let nav = Navigator::new(&t);
        assert_eq!(nav.adjacent_node(outside, root, 1), Some(rows[0]));
        assert_eq!(nav.adjacent_node(outside, root, -1), Some(rows[2]));
    }

    #[test]
    fn test_map_point_through_scroll_and_border() {
        let mut t = NodeTree::new(Size::new(800.0, 600.0));
        let root = t.root();
        let pane = t
            .insert(root, Node::plain().anchors(Anchors::at(100.0, 100.0, 400.0, 200.0)).border(5.0))
            .unwrap();
        let child = focusable(&mut t, pane, 10.0, 300.0, 50.0, 50.0);
        t.set_scroll(pane, Vec2::new(0.0, 250.0)).unwrap();

        let g = t.global_rect(child);
        assert_eq!((g.x, g.y), (115.0, 155.0));
        let back = t.map_point(child, root, Vec2::new(115.0, 155.0), MapDir::ToLeaf);
        assert_eq!(back, Some(Vec2::ZERO));
        assert_eq!(t.node_at(Vec2::new(120.0, 160.0)), Some(child));
    }

    #[test]
    fn test_tab_order_wraps_and_skips_hidden() {
        let mut t = NodeTree::new(Size::new(800.0, 600.0));
        let root = t.root();
        let a = focusable(&mut t, root, 0.0, 0.0, 10.0, 10.0);
        let b = focusable(&mut t, root, 20.0, 0.0, 10.0, 10.0);
        let c = focusable(&mut t, root, 40.0, 0.0, 10.0, 10.0);
        t.set_visible(b, false).unwrap();
        let nav = Navigator::new(&t);
        assert_eq!(nav.adjacent_node(a, root, 1), Some(c));
        assert_eq!(nav.adjacent_node(c, root, 1), Some(a));
    }

    #[test]
    fn test_detached_template_is_not_a_candidate() {
        let mut t = NodeTree::new(Size::new(800.0, 600.0));
        let root = t.root();
        let a = focusable(&mut t, root, 0.0, 0.0, 10.0, 10.0);
        let tpl = focusable(&mut t, root, 0.0, 100.0, 10.0, 10.0);
        t.detach(tpl).unwrap();
        assert!(!t.is_appeared_focusable(tpl));
        let nav = Navigator::new(&t);
        assert_eq!(nav.nearest_in_direction(a, root, Direction::Down, Vec2::new(5.0, 0.0)), None);
    }
}
