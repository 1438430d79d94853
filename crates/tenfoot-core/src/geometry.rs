use std::ops::{Add, AddAssign, Neg, Sub};

/// Slack used when comparing accumulated float rectangles.
const EPSILON: f32 = 0.01;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x + o.x, self.y + o.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, o: Vec2) {
        self.x += o.x;
        self.y += o.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x - o.x, self.y - o.y)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    /// True when `other` lies entirely inside `self` (edges may touch).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x - EPSILON
            && other.y >= self.y - EPSILON
            && other.right() <= self.right() + EPSILON
            && other.bottom() <= self.bottom() + EPSILON
    }

    /// True when the two rectangles share any area or touch on an edge.
    pub fn overlaps(&self, other: &Rect) -> bool {
        (other.x <= self.right() - EPSILON
            && self.x <= other.right() - EPSILON
            && other.y <= self.bottom() - EPSILON
            && self.y <= other.bottom() - EPSILON)
            || self.contains_rect(other)
    }

    pub fn translate(&self, d: Vec2) -> Rect {
        Rect::new(self.x + d.x, self.y + d.y, self.w, self.h)
    }

    /// Shrinks the rectangle by `by` on every side, never below zero size.
    pub fn inset(&self, by: f32) -> Rect {
        Rect::new(
            self.x + by,
            self.y + by,
            (self.w - 2.0 * by).max(0.0),
            (self.h - 2.0 * by).max(0.0),
        )
    }
}

/// A length in one of the units anchors accept.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Length {
    Px(f32),
    /// Fraction (0..=100) of the parent's inner extent along the same axis.
    Percent(f32),
}

impl Length {
    pub fn resolve(self, extent: f32) -> f32 {
        match self {
            Length::Px(v) => v,
            Length::Percent(p) => extent * p / 100.0,
        }
    }
}

impl From<f32> for Length {
    fn from(v: f32) -> Self {
        Length::Px(v)
    }
}

// Untyped float literals fall back to f64.
impl From<f64> for Length {
    fn from(v: f64) -> Self {
        Length::Px(v as f32)
    }
}

/// Anchored-edge constraints of a node. Any subset may be set.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anchors {
    pub left: Option<Length>,
    pub top: Option<Length>,
    pub right: Option<Length>,
    pub bottom: Option<Length>,
    pub width: Option<Length>,
    pub height: Option<Length>,
}

impl Anchors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stretch over the whole parent inner rectangle.
    pub fn fill() -> Self {
        Self::new().left(0.0).top(0.0).right(0.0).bottom(0.0)
    }

    /// Absolute placement: `left`, `top`, `width`, `height` in px.
    pub fn at(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new().left(x).top(y).width(w).height(h)
    }

    pub fn left(mut self, v: impl Into<Length>) -> Self {
        self.left = Some(v.into());
        self
    }
    pub fn top(mut self, v: impl Into<Length>) -> Self {
        self.top = Some(v.into());
        self
    }
    pub fn right(mut self, v: impl Into<Length>) -> Self {
        self.right = Some(v.into());
        self
    }
    pub fn bottom(mut self, v: impl Into<Length>) -> Self {
        self.bottom = Some(v.into());
        self
    }
    pub fn width(mut self, v: impl Into<Length>) -> Self {
        self.width = Some(v.into());
        self
    }
    pub fn height(mut self, v: impl Into<Length>) -> Self {
        self.height = Some(v.into());
        self
    }

    /// Resolves these anchors against a parent's inner size. The returned
    /// rectangle is relative to the parent's inner origin.
    pub fn resolve(&self, inner: Size) -> Rect {
        let w = inner.width;
        let h = inner.height;
        let (x, rw) = resolve_axis(
            self.left.map(|l| l.resolve(w)),
            self.right.map(|l| l.resolve(w)),
            self.width.map(|l| l.resolve(w)),
            w,
        );
        let (y, rh) = resolve_axis(
            self.top.map(|l| l.resolve(h)),
            self.bottom.map(|l| l.resolve(h)),
            self.height.map(|l| l.resolve(h)),
            h,
        );
        Rect::new(x, y, rw, rh)
    }
}

/// Resolves one axis: returns `(position, length)` inside `extent`.
pub fn resolve_axis(near: Option<f32>, far: Option<f32>, size: Option<f32>, extent: f32) -> (f32, f32) {
    match (near, far, size) {
        (Some(n), None, Some(s)) => (n, s),
        (None, Some(f), Some(s)) => (extent - f - s, s),
        (Some(n), Some(f), None) => (n, (extent - n - f).max(0.0)),
        (Some(n), Some(f), Some(s)) => (n + (extent - n - f - s) / 2.0, s),
        (None, None, Some(s)) => (0.0, s),
        (Some(n), None, None) => (n, 0.0),
        (None, Some(f), None) => (extent - f, 0.0),
        (None, None, None) => (0.0, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_near_edge_and_size() {
        assert_eq!(resolve_axis(Some(10.0), None, Some(30.0), 100.0), (10.0, 30.0));
    }

    #[test]
    fn test_axis_far_edge_and_size() {
        assert_eq!(resolve_axis(None, Some(10.0), Some(30.0), 100.0), (60.0, 30.0));
    }

    #[test]
    fn test_axis_stretch() {
        assert_eq!(resolve_axis(Some(10.0), Some(20.0), None, 100.0), (10.0, 70.0));
    }

    #[test]
    fn test_axis_center_in_span() {
        // span is 10..80 (70 wide), 30 centered → starts at 30
        assert_eq!(resolve_axis(Some(10.0), Some(20.0), Some(30.0), 100.0), (30.0, 30.0));
    }

    #[test]
    fn test_axis_unconstrained() {
        assert_eq!(resolve_axis(None, None, None, 100.0), (0.0, 0.0));
    }

    #[test]
    fn test_percent_anchors() {
        let a = Anchors::new()
            .left(Length::Percent(10.0))
            .width(Length::Percent(50.0))
            .top(0.0)
            .bottom(Length::Percent(25.0));
        let r = a.resolve(Size::new(200.0, 400.0));
        assert_eq!(r, Rect::new(20.0, 0.0, 100.0, 300.0));
    }

    #[test]
    fn test_rect_contains_rect() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains_rect(&Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert!(outer.contains_rect(&Rect::new(10.0, 10.0, 20.0, 20.0)));
        assert!(!outer.contains_rect(&Rect::new(90.0, 10.0, 20.0, 20.0)));
    }

    #[test]
    fn test_rect_overlaps() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(a.overlaps(&Rect::new(90.0, 90.0, 20.0, 20.0)));
        assert!(!a.overlaps(&Rect::new(100.0, 0.0, 20.0, 20.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 150.0, 20.0, 20.0)));
        // a zero-size point inside still counts
        assert!(a.overlaps(&Rect::new(50.0, 50.0, 0.0, 0.0)));
    }
}
