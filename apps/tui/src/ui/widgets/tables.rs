use std::ops::Range;

pub const fn scroll_offset(
    total_rows: usize,
    max_visible_rows: usize,
    selected_index: usize,
) -> usize {
    if total_rows <= max_visible_rows {
        return 0;
    }

    if selected_index >= max_visible_rows {
        return selected_index.saturating_sub(max_visible_rows) + 1;
    }

    0
}

/// Rows of a list to draw so that `selected_index` stays visible.
pub fn visible_rows(total_rows: usize, max_visible_rows: usize, selected_index: usize) -> Range<usize> {
    let start = scroll_offset(total_rows, max_visible_rows, selected_index);
    start..total_rows.min(start + max_visible_rows)
}
