//! List screens: one generic controller for every catalog record type.
//!
//! A [`ListScreen<R>`] combines a [`PagedListModel`] with the screen's input
//! mode, row selection and load status. It never talks to the catalog
//! directly: loads and deletes go through the [`AsyncLoader`] handed in via
//! [`ScreenContext`], and their completions find the screen again through
//! the navigator's main content area.
//!
//! The [`Screen`] trait is the object-safe face the application uses to drive
//! whichever screen is currently embedded, without knowing its record type.

use super::actions::Action;
use super::handler::Event;
use super::modes::{InputMode, ScreenStatus, SearchFocus};
use crate::catalog::{CatalogRecord, CatalogService};
use crate::domain::error::Result;
use crate::domain::session::SessionContext;
use crate::domain::LoadError;
use crate::list::{highlight_ranges, ColumnDescriptor, PagedListModel, SearchCriteria};
use crate::navigation::{Controller, Navigator};
use crate::ui::viewmodel::{
    ColumnHeader, DisplayRow, EmptyState, FooterInfo, HeaderInfo, PagerInfo, SearchBarInfo, StatusKind,
    StatusLine, ViewModel,
};
use crate::worker::{AsyncLoader, LoadHandle, RequestSequencer, RequestTag};
use chrono::{DateTime, Local, Utc};
use std::cell::RefMut;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// What a screen needs to start catalog calls.
pub struct ScreenContext<'a> {
    pub loader: &'a mut AsyncLoader<Navigator>,
    pub service: &'a Arc<dyn CatalogService>,
}

/// A screen the application can drive without knowing its record type.
pub trait Screen {
    fn view_id(&self) -> &'static str;

    fn title(&self) -> &'static str;

    /// Applies a user event. Returns whether the screen needs a redraw and
    /// the actions the application should carry out.
    ///
    /// # Errors
    ///
    /// Reserved for events that cannot be applied; list screens currently
    /// accept every event.
    fn handle_event(&mut self, event: &Event) -> Result<(bool, Vec<Action>)>;

    /// Starts fetching the screen's records.
    fn begin_load(&mut self, ctx: &mut ScreenContext<'_>) -> LoadHandle;

    /// Starts deleting the record identified by `key`.
    fn begin_delete(&mut self, key: i64, ctx: &mut ScreenContext<'_>) -> LoadHandle;

    /// Builds the frame's view model around the given header.
    fn viewmodel(&self, header: HeaderInfo, pending_loads: usize) -> ViewModel;
}

/// Recovers the [`Screen`] behind a type-erased controller.
pub type ScreenCaster = fn(&mut dyn Controller) -> Option<&mut dyn Screen>;

fn cast_list_screen<R: CatalogRecord>(controller: &mut dyn Controller) -> Option<&mut dyn Screen> {
    controller
        .downcast_mut::<ListScreen<R>>()
        .map(|screen| screen as &mut dyn Screen)
}

/// The caster for `ListScreen<R>`.
#[must_use]
pub fn list_screen_caster<R: CatalogRecord>() -> ScreenCaster {
    cast_list_screen::<R>
}

/// Paginated, searchable list of one record type.
///
/// # Example
///
/// ```
/// use shelfdesk::app::{Event, ListScreen, Screen};
/// use shelfdesk::catalog::Group;
/// use shelfdesk::domain::SessionContext;
///
/// let mut screen = ListScreen::<Group>::new(10, SessionContext::default());
/// let (redraw, actions) = screen.handle_event(&Event::NextPage)?;
/// assert!(!redraw);
/// assert!(actions.is_empty());
/// # Ok::<(), shelfdesk::ShelfdeskError>(())
/// ```
pub struct ListScreen<R: CatalogRecord> {
    instance: u64,
    model: PagedListModel<R>,
    columns: Vec<ColumnDescriptor<R>>,
    sequencer: RequestSequencer,
    selected: usize,
    input_mode: InputMode,
    status: ScreenStatus,
    session: SessionContext,
    loaded_at: Option<DateTime<Utc>>,
}

impl<R: CatalogRecord> ListScreen<R> {
    #[must_use]
    pub fn new(page_size: usize, session: SessionContext) -> Self {
        Self {
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
            model: PagedListModel::new(page_size, R::accessors()),
            columns: R::columns(),
            sequencer: RequestSequencer::default(),
            selected: 0,
            input_mode: InputMode::Normal,
            status: ScreenStatus::Idle,
            session,
            loaded_at: None,
        }
    }

    pub const fn model(&self) -> &PagedListModel<R> {
        &self.model
    }

    /// Index of the selected row within the current page.
    pub const fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_record(&self) -> Option<&R> {
        self.model.current_page().get(self.selected)
    }

    pub const fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub const fn status(&self) -> &ScreenStatus {
        &self.status
    }

    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    /// The screen shown in `navigator`'s main area, if it is this very
    /// instance. Completions for screens that were navigated away from find
    /// nothing and are dropped.
    fn locate(navigator: &Navigator, instance: u64) -> Option<RefMut<'_, Self>> {
        let located = navigator
            .main_controller::<Self>()
            .filter(|screen| screen.instance == instance);
        if located.is_none() {
            tracing::debug!(view_id = R::VIEW_ID, instance, "screen no longer shown, dropping completion");
        }
        located
    }

    /// Applies a load completion unless a newer load has been issued since.
    ///
    /// A failure leaves the previously loaded records in place.
    pub fn finish_load(&mut self, tag: RequestTag, outcome: std::result::Result<Vec<R>, LoadError>) {
        if !self.sequencer.is_latest(tag) {
            tracing::debug!(view_id = R::VIEW_ID, tag = tag.value(), "discarding superseded load");
            return;
        }

        match outcome {
            Ok(records) => {
                let count = records.len();
                self.model.set_master(records);
                self.selected = 0;
                self.loaded_at = Some(Utc::now());
                self.status = ScreenStatus::Loaded { count };
                tracing::debug!(view_id = R::VIEW_ID, count, "records loaded");
            }
            Err(err) => {
                tracing::warn!(view_id = R::VIEW_ID, error = %err, "load failed, keeping previous records");
                self.status = ScreenStatus::Failed(format!("Could not load {}: {err}", R::TITLE.to_lowercase()));
            }
        }
    }

    /// Applies a delete completion by removing the record locally.
    pub fn finish_delete(&mut self, key: i64, outcome: std::result::Result<(), LoadError>) {
        match outcome {
            Ok(()) => {
                let removed = self.model.remove_one(|record| record.key() == key);
                self.clamp_selection();
                self.status = if removed.is_some() {
                    ScreenStatus::Notice(format!("Deleted {} {key}", R::KIND))
                } else {
                    ScreenStatus::Notice(format!("{} {key} was already gone", R::KIND))
                };
            }
            Err(err) => {
                tracing::warn!(view_id = R::VIEW_ID, key, error = %err, "delete failed");
                self.status = ScreenStatus::Failed(format!("Could not delete {} {key}: {err}", R::KIND));
            }
        }
    }

    fn update_criteria(&mut self, edit: impl FnOnce(&mut SearchCriteria)) {
        let mut criteria = self.model.criteria().clone();
        edit(&mut criteria);
        self.model.set_criteria(criteria);
        self.selected = 0;
    }

    fn clamp_selection(&mut self) {
        let len = self.model.current_page().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    fn move_selection(&mut self, forward: bool) -> bool {
        let len = self.model.current_page().len();
        if len == 0 {
            return false;
        }
        self.selected = if forward {
            (self.selected + 1) % len
        } else {
            (self.selected + len - 1) % len
        };
        true
    }

    fn status_line(&self, pending_loads: usize) -> Option<StatusLine> {
        let noun = R::TITLE.to_lowercase();
        let (kind, message) = match &self.status {
            ScreenStatus::Idle => return None,
            ScreenStatus::Loading => (StatusKind::Loading, format!("Loading {noun}… ({pending_loads} pending)")),
            ScreenStatus::Loaded { count } => {
                let at = self
                    .loaded_at
                    .map(|at| at.with_timezone(&Local).format("%H:%M:%S").to_string())
                    .unwrap_or_default();
                (StatusKind::Info, format!("Loaded {count} {noun} at {at}"))
            }
            ScreenStatus::Working(message) => (StatusKind::Loading, message.clone()),
            ScreenStatus::Notice(message) => (StatusKind::Info, message.clone()),
            ScreenStatus::Failed(message) => (StatusKind::Error, message.clone()),
        };
        Some(StatusLine { kind, message })
    }

    fn empty_state(&self) -> Option<EmptyState> {
        if !self.model.current_page().is_empty() {
            return None;
        }
        let noun = R::TITLE.to_lowercase();
        let (message, subtitle) = if !self.model.master().is_empty() {
            (
                format!("No {noun} match \"{}\"", self.model.criteria().query),
                "Type / alone to clear the search, or f to change the field".to_string(),
            )
        } else {
            match &self.status {
                ScreenStatus::Loading | ScreenStatus::Idle => (format!("Loading {noun}…"), String::new()),
                ScreenStatus::Failed(_) => (format!("No {noun} to show"), "Press r to try again".to_string()),
                _ => (format!("No {noun} yet"), "Press r to reload".to_string()),
            }
        };
        Some(EmptyState { message, subtitle })
    }

    fn keybindings(&self) -> String {
        let mut hints = vec!["n/p page", "j/k select", "/text search", "f field", "r reload"];
        if self.session.role.can_manage() {
            hints.push("d delete");
        }
        hints.extend(["1-5 views", "q quit"]);
        hints.join(" · ")
    }
}

impl<R: CatalogRecord> Controller for ListScreen<R> {
    fn initialize(&mut self) -> std::result::Result<(), crate::domain::BoxError> {
        tracing::debug!(
            view_id = R::VIEW_ID,
            instance = self.instance,
            page_size = self.model.page_size(),
            user = %self.session.label(),
            "list screen created"
        );
        Ok(())
    }
}

impl<R: CatalogRecord> Screen for ListScreen<R> {
    fn view_id(&self) -> &'static str {
        R::VIEW_ID
    }

    fn title(&self) -> &'static str {
        R::TITLE
    }

    #[allow(clippy::too_many_lines)]
    fn handle_event(&mut self, event: &Event) -> Result<(bool, Vec<Action>)> {
        match event {
            Event::SelectNext => Ok((self.move_selection(true), vec![])),
            Event::SelectPrevious => Ok((self.move_selection(false), vec![])),
            Event::NextPage => {
                if !self.model.can_go_next() {
                    return Ok((false, vec![]));
                }
                self.model.next_page();
                self.selected = 0;
                Ok((true, vec![]))
            }
            Event::PreviousPage => {
                if !self.model.can_go_previous() {
                    return Ok((false, vec![]));
                }
                self.model.previous_page();
                self.selected = 0;
                Ok((true, vec![]))
            }
            Event::SearchMode => {
                self.input_mode = InputMode::Search(SearchFocus::Typing);
                Ok((true, vec![]))
            }
            Event::Char(c) => {
                if !self.input_mode.is_typing() {
                    return Ok((false, vec![]));
                }
                self.update_criteria(|criteria| criteria.query.push(*c));
                tracing::trace!(query = %self.model.criteria().query, "search query updated");
                Ok((true, vec![]))
            }
            Event::Backspace => {
                if !self.input_mode.is_typing() {
                    return Ok((false, vec![]));
                }
                self.update_criteria(|criteria| {
                    criteria.query.pop();
                });
                Ok((true, vec![]))
            }
            Event::SetQuery(query) => {
                self.input_mode = if query.is_empty() {
                    InputMode::Normal
                } else {
                    InputMode::Search(SearchFocus::Navigating)
                };
                self.update_criteria(|criteria| criteria.query.clone_from(query));
                Ok((true, vec![]))
            }
            Event::FocusResults => {
                self.input_mode = if self.model.criteria().is_empty() {
                    InputMode::Normal
                } else {
                    InputMode::Search(SearchFocus::Navigating)
                };
                Ok((true, vec![]))
            }
            Event::ExitSearch => {
                tracing::debug!(query = %self.model.criteria().query, "exiting search mode");
                self.input_mode = InputMode::Normal;
                self.update_criteria(|criteria| criteria.query.clear());
                Ok((true, vec![]))
            }
            Event::CycleField => {
                let next = match self.model.accessors() {
                    Some(accessors) => accessors.next_selector(&self.model.criteria().field),
                    None => return Ok((false, vec![])),
                };
                self.update_criteria(|criteria| criteria.field = next);
                Ok((true, vec![]))
            }
            Event::Refresh => Ok((false, vec![Action::Reload])),
            Event::DeleteSelected => {
                if !self.session.role.can_manage() {
                    self.status = ScreenStatus::Failed(format!("{} may not delete records", self.session.label()));
                    return Ok((true, vec![]));
                }
                Ok(self.selected_record().map_or_else(
                    || (false, vec![]),
                    |record| (false, vec![Action::Delete { key: record.key() }]),
                ))
            }
            Event::ShowView(_) | Event::Quit => Ok((false, vec![])),
        }
    }

    fn begin_load(&mut self, ctx: &mut ScreenContext<'_>) -> LoadHandle {
        let tag = self.sequencer.issue();
        let instance = self.instance;
        let service = Arc::clone(ctx.service);
        self.status = ScreenStatus::Loading;
        tracing::debug!(view_id = R::VIEW_ID, tag = tag.value(), "loading records");

        ctx.loader.run(
            move || R::fetch(service.as_ref()),
            move |navigator: &mut Navigator, records: Vec<R>| {
                if let Some(mut screen) = Self::locate(navigator, instance) {
                    screen.finish_load(tag, Ok(records));
                }
            },
            move |navigator: &mut Navigator, err: LoadError| {
                if let Some(mut screen) = Self::locate(navigator, instance) {
                    screen.finish_load(tag, Err(err));
                }
            },
        )
    }

    fn begin_delete(&mut self, key: i64, ctx: &mut ScreenContext<'_>) -> LoadHandle {
        // Loads already in flight may still contain the record.
        let tag = self.sequencer.issue();
        let instance = self.instance;
        let service = Arc::clone(ctx.service);
        self.status = ScreenStatus::Working(format!("Deleting {} {key}…", R::KIND));
        tracing::debug!(view_id = R::VIEW_ID, key, tag = tag.value(), "deleting record");

        ctx.loader.run(
            move || service.delete(R::KIND, key),
            move |navigator: &mut Navigator, (): ()| {
                if let Some(mut screen) = Self::locate(navigator, instance) {
                    screen.finish_delete(key, Ok(()));
                }
            },
            move |navigator: &mut Navigator, err: LoadError| {
                if let Some(mut screen) = Self::locate(navigator, instance) {
                    screen.finish_delete(key, Err(err));
                }
            },
        )
    }

    fn viewmodel(&self, header: HeaderInfo, pending_loads: usize) -> ViewModel {
        let criteria = self.model.criteria();
        let accessors_label = self
            .model
            .accessors()
            .map_or_else(|| "Search".to_string(), |a| a.selector_label(&criteria.field));

        let search = (matches!(self.input_mode, InputMode::Search(_)) || !criteria.is_empty()).then(|| {
            SearchBarInfo {
                field_label: accessors_label,
                query: criteria.query.clone(),
                is_typing: self.input_mode.is_typing(),
            }
        });

        let rows = self
            .model
            .current_page()
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let cells: Vec<String> = self.columns.iter().map(|column| column.cell(record)).collect();
                let highlight_ranges = cells
                    .iter()
                    .map(|cell| highlight_ranges(cell, &criteria.query))
                    .collect();
                DisplayRow {
                    cells,
                    highlight_ranges,
                    is_selected: index == self.selected,
                }
            })
            .collect();

        ViewModel {
            header,
            search,
            columns: self
                .columns
                .iter()
                .map(|column| ColumnHeader {
                    title: column.header().to_string(),
                    width: column.width(),
                })
                .collect(),
            rows,
            empty_state: self.empty_state(),
            pager: PagerInfo {
                label: self.model.page_label(),
                can_go_previous: self.model.can_go_previous(),
                can_go_next: self.model.can_go_next(),
                matched: self.model.filtered().len(),
                total: self.model.master().len(),
            },
            status: self.status_line(pending_loads),
            footer: FooterInfo {
                keybindings: self.keybindings(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Book;
    use crate::domain::session::Role;
    use crate::list::FieldSelector;

    fn book(id: i64, title: &str) -> Book {
        Book {
            id,
            isbn: None,
            title: title.to_string(),
            author: format!("Author {id}"),
            publisher: None,
            year: None,
        }
    }

    fn books(count: i64) -> Vec<Book> {
        (1..=count).map(|id| book(id, &format!("Title {id}"))).collect()
    }

    fn librarian() -> SessionContext {
        SessionContext::new(1, "ada", Role::Librarian)
    }

    fn loaded(count: i64, session: SessionContext) -> ListScreen<Book> {
        let mut screen = ListScreen::<Book>::new(10, session);
        let tag = screen.sequencer.issue();
        screen.finish_load(tag, Ok(books(count)));
        screen
    }

    fn header() -> HeaderInfo {
        HeaderInfo {
            title: "Shelfdesk".into(),
            tabs: vec![],
            session: String::new(),
        }
    }

    #[test]
    fn paging_events_respect_boundaries() {
        let mut screen = loaded(25, librarian());

        assert_eq!(screen.handle_event(&Event::PreviousPage).unwrap(), (false, vec![]));
        assert!(screen.handle_event(&Event::NextPage).unwrap().0);
        assert!(screen.handle_event(&Event::NextPage).unwrap().0);
        assert_eq!(screen.model().current_page().len(), 5);
        assert_eq!(screen.handle_event(&Event::NextPage).unwrap(), (false, vec![]));
        assert_eq!(screen.model().current_page_index(), 2);
    }

    #[test]
    fn selection_wraps_within_the_page() {
        let mut screen = loaded(3, librarian());
        screen.handle_event(&Event::SelectPrevious).unwrap();
        assert_eq!(screen.selected(), 2);
        screen.handle_event(&Event::SelectNext).unwrap();
        assert_eq!(screen.selected(), 0);
    }

    #[test]
    fn typing_filters_and_resets_to_first_page() {
        let mut screen = loaded(25, librarian());
        screen.handle_event(&Event::NextPage).unwrap();

        assert!(!screen.handle_event(&Event::Char('x')).unwrap().0);
        screen.handle_event(&Event::SearchMode).unwrap();
        for c in "title 2".chars() {
            screen.handle_event(&Event::Char(c)).unwrap();
        }

        // "Title 2" and "Title 20" to "Title 25"
        assert_eq!(screen.model().filtered().len(), 7);
        assert_eq!(screen.model().current_page_index(), 0);

        screen.handle_event(&Event::Backspace).unwrap();
        assert_eq!(screen.model().criteria().query, "title ");

        screen.handle_event(&Event::ExitSearch).unwrap();
        assert_eq!(screen.input_mode(), InputMode::Normal);
        assert_eq!(screen.model().filtered().len(), 25);
    }

    #[test]
    fn set_query_switches_modes() {
        let mut screen = loaded(5, librarian());
        screen.handle_event(&Event::SetQuery("Author 3".into())).unwrap();
        assert_eq!(screen.input_mode(), InputMode::Search(SearchFocus::Navigating));
        assert_eq!(screen.model().filtered().len(), 1);

        screen.handle_event(&Event::SetQuery(String::new())).unwrap();
        assert_eq!(screen.input_mode(), InputMode::Normal);
        assert_eq!(screen.model().filtered().len(), 5);
    }

    #[test]
    fn cycling_fields_follows_accessor_order() {
        let mut screen = loaded(1, librarian());
        screen.handle_event(&Event::CycleField).unwrap();
        assert_eq!(screen.model().criteria().field, FieldSelector::field("id"));
        screen.handle_event(&Event::CycleField).unwrap();
        assert_eq!(screen.model().criteria().field, FieldSelector::field("title"));
    }

    #[test]
    fn superseded_loads_are_discarded() {
        let mut screen = ListScreen::<Book>::new(10, librarian());
        let first = screen.sequencer.issue();
        let second = screen.sequencer.issue();

        screen.finish_load(second, Ok(books(2)));
        screen.finish_load(first, Ok(books(9)));
        assert_eq!(screen.model().master().len(), 2);
    }

    #[test]
    fn failed_loads_keep_previous_records() {
        let mut screen = loaded(4, librarian());
        let tag = screen.sequencer.issue();
        screen.finish_load(tag, Err(LoadError::failed("boom")));

        assert_eq!(screen.model().master().len(), 4);
        assert!(matches!(screen.status(), ScreenStatus::Failed(message) if message.contains("boom")));
    }

    #[test]
    fn members_cannot_delete() {
        let mut screen = loaded(3, SessionContext::new(2, "grace", Role::Member));
        let (redraw, actions) = screen.handle_event(&Event::DeleteSelected).unwrap();
        assert!(redraw);
        assert!(actions.is_empty());
        assert!(matches!(screen.status(), ScreenStatus::Failed(_)));
    }

    #[test]
    fn librarians_delete_the_selected_record() {
        let mut screen = loaded(3, librarian());
        screen.handle_event(&Event::SelectNext).unwrap();
        let (_, actions) = screen.handle_event(&Event::DeleteSelected).unwrap();
        assert_eq!(actions, vec![Action::Delete { key: 2 }]);

        screen.finish_delete(2, Ok(()));
        assert_eq!(screen.model().master().len(), 2);
        assert_eq!(screen.status(), &ScreenStatus::Notice("Deleted book 2".into()));
    }

    #[test]
    fn reloads_in_flight_before_a_delete_are_discarded() {
        let mut screen = loaded(3, librarian());
        let reload = screen.sequencer.issue();

        let mut loader = AsyncLoader::<Navigator>::new(crate::worker::WorkerPool::new(1).unwrap());
        let service: Arc<dyn CatalogService> = Arc::new(crate::catalog::JsonCatalog::sample().unwrap());
        screen.begin_delete(
            2,
            &mut ScreenContext {
                loader: &mut loader,
                service: &service,
            },
        );
        screen.finish_delete(2, Ok(()));

        screen.finish_load(reload, Ok(books(3)));
        assert_eq!(screen.model().master().len(), 2);
        assert!(screen.model().master().iter().all(|book| book.id != 2));
        assert_eq!(screen.status(), &ScreenStatus::Notice("Deleted book 2".into()));
    }

    #[test]
    fn refresh_requests_a_reload() {
        let mut screen = loaded(1, librarian());
        assert_eq!(screen.handle_event(&Event::Refresh).unwrap(), (false, vec![Action::Reload]));
    }

    #[test]
    fn viewmodel_reflects_page_state() {
        let mut screen = loaded(25, librarian());
        screen.handle_event(&Event::SetQuery("title".into())).unwrap();

        let vm = screen.viewmodel(header(), 0);
        assert_eq!(vm.rows.len(), 10);
        assert!(vm.rows[0].is_selected);
        assert_eq!(vm.rows[0].highlight_ranges[1], vec![(0, 5)]);
        assert_eq!(vm.columns[1].title, "TITLE");
        assert_eq!(vm.pager.label, "Page 1 of 3");
        assert!(!vm.pager.can_go_previous);
        assert!(vm.pager.can_go_next);
        assert!(vm.search.is_some());
        assert!(vm.empty_state.is_none());
        assert!(vm.footer.keybindings.contains("d delete"));
    }

    #[test]
    fn empty_results_produce_an_empty_state() {
        let mut screen = loaded(5, librarian());
        screen.handle_event(&Event::SetQuery("zzz".into())).unwrap();

        let vm = screen.viewmodel(header(), 0);
        assert!(vm.rows.is_empty());
        assert_eq!(vm.empty_state.unwrap().message, "No books match \"zzz\"");
        assert!(!vm.pager.can_go_next);
        assert_eq!(vm.pager.matched, 0);
        assert_eq!(vm.pager.total, 5);
    }
}
