use web_time::Duration;

use tenfoot_core::{AnimationSpec, Error, Result};

/// Lines of slots kept materialized before and after the visible page.
pub const MARGIN: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    List,
    Grid,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayState {
    Loading,
    Empty,
    Error(Option<i32>),
    List,
}

impl DisplayState {
    /// Message template names to try, most specific first.
    pub fn message_keys(&self) -> Vec<String> {
        match self {
            DisplayState::Loading => vec!["loading".into()],
            DisplayState::Empty => vec!["empty".into()],
            DisplayState::Error(Some(code)) => vec![format!("error:{code}"), "error".into()],
            DisplayState::Error(None) => vec!["error".into()],
            DisplayState::List => Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListConfig {
    pub orientation: Orientation,
    /// Wrap around at either end once there are at least a page of records.
    pub looping: bool,
    pub margin: usize,
    /// Ease discrete steps instead of jumping.
    pub animate: bool,
    pub scroll_spec: AnimationSpec,
    /// Step forward by one line on this interval while showing records.
    pub auto_advance: Option<Duration>,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            looping: false,
            margin: MARGIN,
            animate: false,
            scroll_spec: AnimationSpec::default(),
            auto_advance: None,
        }
    }
}

impl ListConfig {
    pub fn horizontal(mut self) -> Self {
        self.orientation = Orientation::Horizontal;
        self
    }
    pub fn looping(mut self, on: bool) -> Self {
        self.looping = on;
        self
    }
    pub fn animated(mut self, spec: AnimationSpec) -> Self {
        self.animate = true;
        self.scroll_spec = spec;
        self
    }
    pub fn auto_advance(mut self, every: Duration) -> Self {
        self.auto_advance = Some(every);
        self
    }
}

/// Sliding window of a list or grid.
///
/// Pool position `p` shows line `page_top_index / C - margin + p / C`, so
/// positions `0..margin*C` are the leading margin and the visible page starts
/// at `margin*C`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowState {
    pub page_top_index: usize,
    pub line_size: f32,
    pub cross_size: f32,
    pub page_size: f32,
    pub column_count: usize,
    pub lines_per_page: usize,
    pub margin: usize,
}

impl WindowState {
    /// Window for items of `line_size` x `cross_size` in a viewport of
    /// `page_size` along the scroll axis and `cross_extent` across it.
    pub fn measure(
        kind: ListKind,
        line_size: f32,
        cross_size: f32,
        page_size: f32,
        cross_extent: f32,
        margin: usize,
    ) -> Result<Self> {
        if line_size <= 0.0 {
            return Err(Error::ZeroLineSize);
        }
        let column_count = match kind {
            ListKind::List => 1,
            ListKind::Grid if cross_size > 0.0 => ((cross_extent / cross_size).floor() as usize).max(1),
            ListKind::Grid => 1,
        };
        let lines_per_page = ((page_size / line_size).ceil() as usize).max(1);
        Ok(Self {
            page_top_index: 0,
            line_size,
            cross_size,
            page_size,
            column_count,
            lines_per_page,
            margin,
        })
    }

    /// Materialized slots: `C * (L + 2 * margin)`.
    pub fn slot_count(&self) -> usize {
        self.column_count * (self.lines_per_page + 2 * self.margin)
    }

    /// Records on one page.
    pub fn page_capacity(&self) -> usize {
        self.column_count * self.lines_per_page
    }

    /// Lines that fit entirely in the viewport.
    pub fn full_lines(&self) -> usize {
        ((self.page_size / self.line_size).floor() as usize).max(1)
    }

    pub fn top_line(&self) -> usize {
        self.page_top_index / self.column_count
    }

    pub fn total_lines(&self, count: usize) -> usize {
        count.div_ceil(self.column_count)
    }

    pub fn is_looping(&self, looping: bool, count: usize) -> bool {
        looping && count > 0 && count >= self.page_capacity()
    }

    /// Largest non-looping first index: `count - C * L` rounded down to a
    /// row. A partial last row is reached through the fractional offset.
    pub fn max_top(&self, count: usize) -> usize {
        let c = self.column_count;
        count.saturating_sub(self.page_capacity()) / c * c
    }

    /// Clamps a wanted first index. A looping window keeps any index below
    /// `count`, since stepping by `C` modulo `count` leaves rows unaligned.
    pub fn validate_index(&self, index: usize, count: usize, looping: bool) -> usize {
        if self.is_looping(looping, count) {
            return index.min(count - 1);
        }
        let clamped = index.min(self.max_top(count));
        clamped - clamped % self.column_count
    }

    /// Record index shown at pool position `position`, if any.
    pub fn index_at(&self, position: usize, count: usize, looping: bool) -> Option<usize> {
        if count == 0 {
            return None;
        }
        let nominal = self.page_top_index as isize - (self.margin * self.column_count) as isize + position as isize;
        if self.is_looping(looping, count) {
            Some(nominal.rem_euclid(count as isize) as usize)
        } else if (0..count as isize).contains(&nominal) {
            Some(nominal as usize)
        } else {
            None
        }
    }

    /// Largest wheel offset in px: `max(0, total_lines * line_size - page_size)`.
    pub fn max_offset(&self, count: usize) -> f32 {
        (self.total_lines(count) as f32 * self.line_size - self.page_size).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(page: f32, line: f32) -> WindowState {
        WindowState::measure(ListKind::List, line, 300.0, page, 300.0, MARGIN).unwrap()
    }

    #[test]
    fn test_measure() {
        let w = list(500.0, 100.0);
        assert_eq!(w.lines_per_page, 5);
        assert_eq!(w.slot_count(), 11);
        assert_eq!(list(450.0, 100.0).lines_per_page, 5);
        assert_eq!(list(450.0, 100.0).full_lines(), 4);

        let g = WindowState::measure(ListKind::Grid, 100.0, 120.0, 300.0, 500.0, MARGIN).unwrap();
        assert_eq!(g.column_count, 4);
        assert_eq!(g.slot_count(), 4 * (3 + 6));

        assert_eq!(
            WindowState::measure(ListKind::List, 0.0, 10.0, 100.0, 100.0, MARGIN),
            Err(Error::ZeroLineSize)
        );
    }

    #[test]
    fn test_clamp_without_loop() {
        let w = list(500.0, 100.0);
        for count in [0, 1, 4, 5, 6, 30] {
            for i in [0, 3, 10, 29, 1000] {
                let v = w.validate_index(i, count, false);
                assert!(v <= count.saturating_sub(w.lines_per_page), "{i} of {count} -> {v}");
            }
        }
        assert_eq!(w.validate_index(27, 30, false), 25);

        // 3 columns, 2 rows per page
        let g = WindowState::measure(ListKind::Grid, 100.0, 100.0, 200.0, 300.0, MARGIN).unwrap();
        for count in [0, 2, 6, 7, 10, 11, 12, 30] {
            for i in [0, 1, 4, 8, 29, 1000] {
                let v = g.validate_index(i, count, false);
                assert!(v <= count.saturating_sub(g.page_capacity()), "{i} of {count} -> {v}");
                assert_eq!(v % g.column_count, 0);
            }
        }
        assert_eq!(g.validate_index(1000, 10, false), 3);
        assert_eq!(g.validate_index(1000, 12, false), 6);
        assert_eq!(g.validate_index(1000, 6, false), 0);

        // too few records to loop
        assert_eq!(w.validate_index(3, 4, true), 0);
        assert_eq!(w.validate_index(27, 30, true), 27);
        assert_eq!(w.validate_index(99, 30, true), 29);
    }

    #[test]
    fn test_grid_top_is_row_aligned() {
        let mut g = WindowState::measure(ListKind::Grid, 100.0, 100.0, 200.0, 300.0, MARGIN).unwrap();
        assert_eq!(g.column_count, 3);
        // 10 records = 4 rows, 2 rows per page
        assert_eq!(g.max_top(10), 3);
        assert_eq!(g.validate_index(8, 10, false), 3);
        assert_eq!(g.validate_index(2, 10, false), 0);
        g.page_top_index = 3;
        // the partial last row sits in the trailing margin
        assert_eq!(g.index_at(15, 10, false), Some(9));
        assert_eq!(g.index_at(16, 10, false), None);
    }

    #[test]
    fn test_looping_grid_keeps_unaligned_top() {
        let g = WindowState::measure(ListKind::Grid, 100.0, 100.0, 200.0, 300.0, MARGIN).unwrap();
        assert_eq!(g.validate_index(8, 10, true), 8);
        assert_eq!(g.validate_index(1, 10, true), 1);
        assert_eq!(g.validate_index(99, 10, true), 9);
        // below a page of records the grid does not loop
        assert_eq!(g.validate_index(4, 5, true), 0);
    }

    #[test]
    fn test_index_at_margins_and_loop() {
        let mut w = list(500.0, 100.0);
        assert_eq!(w.index_at(0, 30, false), None);
        assert_eq!(w.index_at(3, 30, false), Some(0));
        assert_eq!(w.index_at(0, 30, true), Some(27));
        w.page_top_index = 25;
        assert_eq!(w.index_at(10, 30, false), None);
        assert_eq!(w.index_at(7, 30, false), Some(29));
        assert_eq!(w.index_at(10, 30, true), Some(2));
    }

    #[test]
    fn test_max_offset() {
        let w = list(450.0, 100.0);
        assert_eq!(w.max_offset(30), 2550.0);
        assert_eq!(w.max_offset(3), 0.0);
    }
}
