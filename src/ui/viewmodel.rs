//! View model types for UI rendering.
//!
//! These are plain data snapshots computed from application state by
//! [`App::compute_viewmodel`](crate::app::App::compute_viewmodel). The
//! renderer only reads them, so everything the screen shows (including which
//! pager affordances are enabled) is decided before rendering starts.

/// Complete renderable state of one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub header: HeaderInfo,
    /// Present while a search is active or a query is applied.
    pub search: Option<SearchBarInfo>,
    /// Column headers of the active list screen.
    pub columns: Vec<ColumnHeader>,
    /// Rows of the current page.
    pub rows: Vec<DisplayRow>,
    /// Shown instead of the table when the current page is empty.
    pub empty_state: Option<EmptyState>,
    pub pager: PagerInfo,
    pub status: Option<StatusLine>,
    pub footer: FooterInfo,
}

/// Title bar: window title, navigation tabs and the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
    pub tabs: Vec<TabInfo>,
    pub session: String,
}

/// One entry of the view menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabInfo {
    /// Key that switches to this view.
    pub key: char,
    pub label: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    pub title: String,
    pub width: usize,
}

/// One table row, one string per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub cells: Vec<String>,
    /// Query matches per cell, as char ranges.
    pub highlight_ranges: Vec<Vec<(usize, usize)>>,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    /// Label of the searched field, e.g. `"All fields"`.
    pub field_label: String,
    pub query: String,
    /// Whether keystrokes currently edit the query.
    pub is_typing: bool,
}

/// Page counter and page-navigation affordances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerInfo {
    /// `"Page i of n"`.
    pub label: String,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    /// Records matching the criteria.
    pub matched: usize,
    /// Records loaded.
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Loading,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    pub keybindings: String,
}
