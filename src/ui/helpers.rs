//! Shared rendering utilities.
//!
//! Components write ANSI sequences into a frame buffer (`&mut String`) that
//! the binary prints in one go. All width arithmetic is in chars, not bytes.

use crate::ui::theme::Theme;

/// Moves the cursor to a 1-based `row`/`col`.
pub fn position_cursor(out: &mut String, row: usize, col: usize) {
    out.push_str(&format!("\u{1b}[{row};{col}H"));
}

/// Clears the screen and homes the cursor.
pub fn clear_screen(out: &mut String) {
    out.push_str("\u{1b}[2J\u{1b}[H");
}

/// Truncates `text` to `width` chars (ending with `…` when cut) and pads it
/// with spaces to exactly `width`.
///
/// # Example
///
/// ```
/// use shelfdesk::ui::helpers::fit;
///
/// assert_eq!(fit("Dune", 6), "Dune  ");
/// assert_eq!(fit("Middlemarch", 6), "Middl…");
/// ```
#[must_use]
pub fn fit(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        let mut fitted = text.to_string();
        fitted.push_str(&" ".repeat(width - len));
        fitted
    } else if width == 0 {
        String::new()
    } else {
        let mut fitted: String = text.chars().take(width - 1).collect();
        fitted.push('…');
        fitted
    }
}

/// Writes `text` with the char `ranges` highlighted.
///
/// Ranges past the end of `text` are clipped. Selected rows are written
/// without highlights so the selection colors stay readable.
pub fn render_highlighted_text(
    out: &mut String,
    text: &str,
    ranges: &[(usize, usize)],
    theme: &Theme,
    is_selected: bool,
) {
    if ranges.is_empty() || is_selected {
        out.push_str(text);
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len()).max(current_pos);
        let end = end.min(chars.len());
        if start >= end {
            continue;
        }

        out.extend(&chars[current_pos..start]);
        out.push_str(&Theme::fg(&theme.colors.match_highlight_fg));
        out.push_str(&Theme::bg(&theme.colors.match_highlight_bg));
        out.extend(&chars[start..end]);
        out.push_str(Theme::reset());
        out.push_str(&Theme::fg(&theme.colors.text_normal));

        current_pos = end;
    }

    out.extend(&chars[current_pos..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_pads_and_truncates_by_chars() {
        assert_eq!(fit("", 3), "   ");
        assert_eq!(fit("Émile", 5), "Émile");
        assert_eq!(fit("Émile Zola", 6), "Émile…");
        assert_eq!(fit("abc", 0), "");
    }

    #[test]
    fn highlights_wrap_only_the_ranges() {
        let theme = Theme::default();
        let mut out = String::new();
        render_highlighted_text(&mut out, "banana", &[(1, 3)], &theme, false);

        assert!(out.starts_with('b'));
        assert!(out.ends_with("ana"));
        assert!(out.contains(&format!("{}an{}", Theme::bg(&theme.colors.match_highlight_bg), Theme::reset())));
    }

    #[test]
    fn selected_rows_and_out_of_range_ranges_are_plain() {
        let theme = Theme::default();

        let mut out = String::new();
        render_highlighted_text(&mut out, "banana", &[(1, 3)], &theme, true);
        assert_eq!(out, "banana");

        let mut out = String::new();
        render_highlighted_text(&mut out, "abc", &[(5, 9)], &theme, false);
        assert_eq!(out, "abc");
    }
}
