//! Pager component renderer.
//!
//! Renders the page counter between previous/next affordances. Affordances
//! that are not available are dimmed, never hidden, so the layout is stable.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::PagerInfo;

fn affordance(out: &mut String, text: &str, enabled: bool, theme: &Theme) {
    if enabled {
        out.push_str(&Theme::fg(&theme.colors.accent));
        out.push_str(Theme::bold());
    } else {
        out.push_str(Theme::dim());
        out.push_str(&Theme::fg(&theme.colors.text_dim));
    }
    out.push_str(text);
    out.push_str(Theme::reset());
}

pub fn render_pager(out: &mut String, row: usize, pager: &PagerInfo, theme: &Theme, cols: usize) -> usize {
    let counts = if pager.matched == pager.total {
        format!("{} records", pager.total)
    } else {
        format!("{} of {} records", pager.matched, pager.total)
    };
    let middle = format!("  {}  ", pager.label);
    let width = "[p] prev".len() + middle.chars().count() + "next [n]".len();

    position_cursor(out, row, 1);
    out.push(' ');
    affordance(out, "[p] prev", pager.can_go_previous, theme);
    out.push_str(&Theme::fg(&theme.colors.text_normal));
    out.push_str(&middle);
    affordance(out, "next [n]", pager.can_go_next, theme);

    out.push_str(&Theme::fg(&theme.colors.text_dim));
    let counts_len = counts.chars().count() + 1;
    out.push_str(&" ".repeat(cols.saturating_sub(width + 1 + counts_len)));
    out.push_str(&counts);
    out.push(' ');
    out.push_str(Theme::reset());
    row + 1
}
