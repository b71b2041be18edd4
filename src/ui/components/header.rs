//! Header component renderer.
//!
//! Renders the title bar: the window title on the left, the view tabs after
//! it, and the signed-in user right-aligned.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

pub fn render_header(out: &mut String, row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let base = |out: &mut String| {
        out.push_str(&Theme::fg(&theme.colors.header_fg));
        if let Some(bg) = &theme.colors.header_bg {
            out.push_str(&Theme::bg(bg));
        }
    };

    position_cursor(out, row, 1);
    base(out);
    out.push_str(Theme::bold());
    out.push(' ');
    out.push_str(&header.title);
    out.push_str(Theme::reset());
    base(out);

    let mut used = header.title.chars().count() + 1;
    for tab in &header.tabs {
        let text = format!("  {}:{}", tab.key, tab.label);
        used += text.chars().count();
        if tab.is_active {
            out.push_str(&Theme::fg(&theme.colors.accent));
            out.push_str(Theme::bold());
            out.push_str(&text);
            out.push_str(Theme::reset());
            base(out);
        } else {
            out.push_str(&text);
        }
    }

    let session = format!("{} ", header.session);
    let session_len = session.chars().count();
    out.push_str(&" ".repeat(cols.saturating_sub(used + session_len)));
    out.push_str(Theme::dim());
    out.push_str(&session);
    out.push_str(Theme::reset());
    row + 1
}
