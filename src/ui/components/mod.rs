//! UI component renderers.
//!
//! Each component writes one section of the frame starting at a given row
//! and returns the next free row.
//!
//! ```text
//! [Header + view tabs]
//! [Border]
//! [Search bar, 3 lines]       only while searching
//! [Table headers]
//! [Table rows | Empty state]
//! [Blank padding]
//! [Border]
//! [Pager]
//! [Status line]
//! [Footer]
//! ```

mod empty;
mod footer;
mod header;
mod pager;
mod search;
mod table;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::ViewModel;

use empty::render_empty_state;
use footer::{render_footer, render_status};
use header::render_header;
use pager::render_pager;
use search::render_search_bar;
use table::{render_table_headers, render_table_rows};

/// Lines below the table: border, pager, status, footer.
const BOTTOM_CHROME: usize = 4;

fn render_border(out: &mut String, row: usize, color: &str, cols: usize) -> usize {
    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(color));
    out.push_str(&"─".repeat(cols));
    out.push_str(Theme::reset());
    row + 1
}

/// Renders a whole frame into `out`.
pub fn render_frame(out: &mut String, vm: &ViewModel, theme: &Theme, rows: usize, cols: usize) {
    let mut current_row = 1;

    current_row = render_header(out, current_row, &vm.header, theme, cols);
    current_row = render_border(out, current_row, &theme.colors.border, cols);
    if let Some(search) = &vm.search {
        current_row = render_search_bar(out, current_row, search, theme, cols);
    }
    current_row = render_table_headers(out, current_row, &vm.columns, theme, cols);
    if let Some(empty) = &vm.empty_state {
        render_empty_state(out, current_row, empty, theme, cols);
    } else {
        render_table_rows(out, current_row, &vm.columns, &vm.rows, theme, cols);
    }

    let bottom = rows.saturating_sub(BOTTOM_CHROME).max(current_row) + 1;
    let mut row = render_border(out, bottom, &theme.colors.border, cols);
    row = render_pager(out, row, &vm.pager, theme, cols);
    row = render_status(out, row, vm.status.as_ref(), theme, cols);
    render_footer(out, row, &vm.footer, theme, cols);
}
