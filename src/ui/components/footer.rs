//! Footer component renderer: the status line and the keybinding hints.

use crate::ui::helpers::{fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{FooterInfo, StatusKind, StatusLine};

pub fn render_status(out: &mut String, row: usize, status: Option<&StatusLine>, theme: &Theme, cols: usize) -> usize {
    position_cursor(out, row, 1);
    if let Some(status) = status {
        let color = match status.kind {
            StatusKind::Info => &theme.colors.text_normal,
            StatusKind::Loading => &theme.colors.loading_fg,
            StatusKind::Error => &theme.colors.error_fg,
        };
        out.push_str(&Theme::fg(color));
        out.push_str(&fit(&format!(" {}", status.message), cols));
        out.push_str(Theme::reset());
    } else {
        out.push_str(&" ".repeat(cols));
    }
    row + 1
}

pub fn render_footer(out: &mut String, row: usize, footer: &FooterInfo, theme: &Theme, cols: usize) -> usize {
    let help_text = &footer.keybindings;

    let text_len = help_text.chars().count().min(cols);
    let padding = cols.saturating_sub(text_len) / 2;

    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(&theme.colors.text_dim));
    out.push_str(&" ".repeat(padding));
    out.push_str(&fit(help_text, text_len));
    out.push_str(&" ".repeat(cols.saturating_sub(padding + text_len)));
    out.push_str(Theme::reset());
    row + 1
}
