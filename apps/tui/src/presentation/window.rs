use std::ops::Range;

/// Indices of the rows that fit in a viewport of `height` rows starting at
/// `offset`.
pub fn visible_range(total_rows: usize, offset: usize, height: usize) -> Range<usize> {
    let start = offset.min(total_rows);
    let end = start.saturating_add(height).min(total_rows);
    start..end
}

/// New scroll offset that keeps `selected` on screen, moving as little as
/// possible from `offset`.
pub fn scroll_offset(total_rows: usize, height: usize, selected: usize, offset: usize) -> usize {
    if height == 0 || total_rows <= height {
        return 0;
    }

    let offset = if selected < offset {
        selected
    } else if selected >= offset + height {
        selected + 1 - height
    } else {
        offset
    };

    offset.min(total_rows - height)
}

/// Scroll state for one virtualized list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub offset: usize,
    pub height: usize,
}

impl Viewport {
    /// Resizes to `height` and scrolls so `selected` stays visible.
    pub fn follow(&mut self, total_rows: usize, height: usize, selected: usize) -> Range<usize> {
        self.height = height;
        self.offset = scroll_offset(total_rows, height, selected, self.offset);
        visible_range(total_rows, self.offset, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_clipped_to_rows() {
        assert_eq!(visible_range(100, 10, 20), 10..30);
        assert_eq!(visible_range(25, 10, 20), 10..25);
        assert_eq!(visible_range(5, 10, 20), 5..5);
        assert_eq!(visible_range(0, 0, 20), 0..0);
    }

    #[test]
    fn offset_moves_only_when_selection_leaves_viewport() {
        assert_eq!(scroll_offset(100, 10, 5, 0), 0);
        assert_eq!(scroll_offset(100, 10, 10, 0), 1);
        assert_eq!(scroll_offset(100, 10, 50, 0), 41);
        assert_eq!(scroll_offset(100, 10, 45, 41), 41);
        assert_eq!(scroll_offset(100, 10, 3, 41), 3);
        assert_eq!(scroll_offset(8, 10, 7, 5), 0);
        assert_eq!(scroll_offset(100, 0, 7, 5), 0);
    }

    #[test]
    fn offset_never_leaves_blank_rows_after_shrink() {
        // Rows collapsed from 100 to 20 while scrolled near the end.
        assert_eq!(scroll_offset(20, 10, 15, 80), 10);
    }

    #[test]
    fn viewport_follows_selection() {
        let mut viewport = Viewport::default();
        assert_eq!(viewport.follow(50, 10, 0), 0..10);
        assert_eq!(viewport.follow(50, 10, 12), 3..13);
        assert_eq!(viewport.follow(50, 10, 8), 3..13);
        assert_eq!(viewport.follow(50, 5, 8), 4..9);
    }
}
