//! Table component renderer.
//!
//! Renders the current page as fixed-width columns taken from the screen's
//! column descriptors, with selection and query-match highlighting.

use crate::ui::helpers::{self, fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{ColumnHeader, DisplayRow};

const COLUMN_GAP: &str = " ";

pub fn render_table_headers(out: &mut String, row: usize, columns: &[ColumnHeader], theme: &Theme, cols: usize) -> usize {
    position_cursor(out, row, 1);
    out.push_str(Theme::bold());
    out.push_str(&Theme::fg(&theme.colors.header_fg));

    let mut line = String::from(" ");
    for column in columns {
        line.push_str(&fit(&column.title, column.width));
        line.push_str(COLUMN_GAP);
    }
    out.push_str(&fit(&line, cols));
    out.push_str(Theme::reset());
    row + 1
}

pub fn render_table_rows(out: &mut String, row: usize, columns: &[ColumnHeader], rows: &[DisplayRow], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for item in rows {
        current_row = render_table_row(out, current_row, columns, item, theme, cols);
    }
    current_row
}

fn render_table_row(out: &mut String, row: usize, columns: &[ColumnHeader], item: &DisplayRow, theme: &Theme, cols: usize) -> usize {
    position_cursor(out, row, 1);

    if item.is_selected {
        out.push_str(&Theme::fg(&theme.colors.selection_fg));
        out.push_str(&Theme::bg(&theme.colors.selection_bg));
        out.push('>');
    } else {
        out.push_str(&Theme::fg(&theme.colors.text_normal));
        out.push(' ');
    }

    let mut used = 1;
    for (index, column) in columns.iter().enumerate() {
        let cell = item.cells.get(index).map_or("", String::as_str);
        let ranges = item.highlight_ranges.get(index).map_or(&[][..], Vec::as_slice);
        helpers::render_highlighted_text(out, &fit(cell, column.width), ranges, theme, item.is_selected);
        out.push_str(COLUMN_GAP);
        used += column.width + COLUMN_GAP.len();
    }

    out.push_str(&" ".repeat(cols.saturating_sub(used)));
    out.push_str(Theme::reset());
    row + 1
}
