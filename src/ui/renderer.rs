//! Top-level rendering coordinator.
//!
//! Rendering is two steps: compute a [`ViewModel`] from the application, then
//! write every component into one frame string. The binary prints the frame;
//! tests inspect it.

use crate::app::App;
use crate::ui::components;
use crate::ui::helpers::clear_screen;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::ViewModel;

/// Renders the application into a frame of `rows` x `cols` cells.
#[must_use]
pub fn render(app: &App, rows: usize, cols: usize) -> String {
    let viewmodel = app.compute_viewmodel();
    render_viewmodel(&viewmodel, app.theme(), rows, cols)
}

/// Renders an already computed view model.
#[must_use]
pub fn render_viewmodel(vm: &ViewModel, theme: &Theme, rows: usize, cols: usize) -> String {
    let mut frame = String::with_capacity(rows * cols * 2);
    clear_screen(&mut frame);
    components::render_frame(&mut frame, vm, theme, rows, cols);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::viewmodel::{
        ColumnHeader, DisplayRow, EmptyState, FooterInfo, HeaderInfo, PagerInfo, SearchBarInfo, StatusKind,
        StatusLine, TabInfo,
    };

    fn viewmodel() -> ViewModel {
        ViewModel {
            header: HeaderInfo {
                title: "Shelfdesk".into(),
                tabs: vec![TabInfo { key: '1', label: "Books".into(), is_active: true }],
                session: "ada (librarian)".into(),
            },
            search: None,
            columns: vec![
                ColumnHeader { title: "ID".into(), width: 4 },
                ColumnHeader { title: "TITLE".into(), width: 12 },
            ],
            rows: vec![DisplayRow {
                cells: vec!["1".into(), "Dune".into()],
                highlight_ranges: vec![vec![], vec![]],
                is_selected: true,
            }],
            empty_state: None,
            pager: PagerInfo {
                label: "Page 1 of 3".into(),
                can_go_previous: false,
                can_go_next: true,
                matched: 25,
                total: 25,
            },
            status: Some(StatusLine { kind: StatusKind::Info, message: "Loaded 25 books".into() }),
            footer: FooterInfo { keybindings: "q quit".into() },
        }
    }

    #[test]
    fn frame_contains_every_section() {
        let frame = render_viewmodel(&viewmodel(), &Theme::default(), 24, 80);
        for text in ["Shelfdesk", "1:Books", "ada (librarian)", "TITLE", "Dune", "Page 1 of 3", "Loaded 25 books", "q quit"] {
            assert!(frame.contains(text), "missing {text}");
        }
    }

    #[test]
    fn search_bar_and_empty_state_replace_rows() {
        let mut vm = viewmodel();
        vm.search = Some(SearchBarInfo { field_label: "Title".into(), query: "zzz".into(), is_typing: true });
        vm.rows.clear();
        vm.empty_state = Some(EmptyState { message: "No matches".into(), subtitle: "Esc clears".into() });

        let frame = render_viewmodel(&vm, &Theme::default(), 24, 80);
        assert!(frame.contains("Title: zzz_"));
        assert!(frame.contains("No matches"));
        assert!(!frame.contains("Dune"));
    }

    #[test]
    fn tiny_terminals_do_not_panic() {
        let frame = render_viewmodel(&viewmodel(), &Theme::default(), 2, 5);
        assert!(frame.contains("Shelfdesk"));
    }
}
