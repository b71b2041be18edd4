//! Master, filtered, and paged views over a screen's record list.
//!
//! [`PagedListModel`] is the one list component every screen reuses. It owns
//! three layers of state:
//!
//! - **Master list**: the records last loaded from the collaborator service,
//!   replaced wholesale on each successful load.
//! - **Filtered list**: the stable, order-preserving subset of the master list
//!   matching the current [`SearchCriteria`].
//! - **Page window**: a fixed-size slice of the filtered list at the current
//!   page index.
//!
//! Derived state is recomputed synchronously whenever its inputs change and is
//! never patched in place. Nothing here performs I/O or fails: every input,
//! including an empty list, produces an in-range result.
//!
//! # Invariants
//!
//! - `total_pages() == max(1, ceil(filtered.len() / page_size))`
//! - `current_page_index() < total_pages()`
//! - `current_page().len() <= page_size()`
//!
//! # Example
//!
//! ```
//! use shelfdesk::list::{FieldAccessors, PagedListModel, SearchCriteria};
//!
//! let accessors = FieldAccessors::new().with("n", "Number", |n: &u32| Some(n.to_string()));
//! let mut model = PagedListModel::new(10, accessors);
//! model.set_master((1..=25).collect());
//!
//! assert_eq!(model.total_pages(), 3);
//! model.next_page();
//! model.next_page();
//! assert_eq!(model.current_page(), &[21, 22, 23, 24, 25]);
//! assert!(!model.can_go_next());
//!
//! model.set_criteria(SearchCriteria::all("2"));
//! assert_eq!(model.current_page_index(), 0);
//! ```

use super::criteria::{FieldAccessors, SearchCriteria};
use super::matcher::CriteriaMatcher;
use std::fmt;

type Predicate<T> = Box<dyn Fn(&T, &SearchCriteria) -> bool>;

enum RecordFilter<T> {
    Fields(FieldAccessors<T>),
    Predicate(Predicate<T>),
}

/// Generic master/filtered/paged list state for one screen.
///
/// Each screen owns its own instance; instances are never shared, and all
/// access happens on the UI thread.
pub struct PagedListModel<T> {
    master: Vec<T>,
    filtered: Vec<T>,
    criteria: SearchCriteria,
    filter: RecordFilter<T>,
    page_size: usize,
    page_index: usize,
}

impl<T: Clone> PagedListModel<T> {
    /// Creates an empty model matching records through `accessors`.
    ///
    /// A `page_size` of zero is treated as one.
    #[must_use]
    pub fn new(page_size: usize, accessors: FieldAccessors<T>) -> Self {
        Self::with_filter(page_size, RecordFilter::Fields(accessors))
    }

    /// Creates an empty model matching records with an injected predicate.
    ///
    /// The predicate is only consulted for non-empty queries; an empty query
    /// always shows every record.
    #[must_use]
    pub fn with_predicate<P>(page_size: usize, predicate: P) -> Self
    where
        P: Fn(&T, &SearchCriteria) -> bool + 'static,
    {
        Self::with_filter(page_size, RecordFilter::Predicate(Box::new(predicate)))
    }

    fn with_filter(page_size: usize, filter: RecordFilter<T>) -> Self {
        Self {
            master: Vec::new(),
            filtered: Vec::new(),
            criteria: SearchCriteria::default(),
            filter,
            page_size: page_size.max(1),
            page_index: 0,
        }
    }

    /// Replaces the master list and returns to the first page.
    pub fn set_master(&mut self, records: Vec<T>) {
        self.master = records;
        self.page_index = 0;
        self.refilter();
    }

    /// Replaces the search criteria and returns to the first page.
    ///
    /// Applying identical criteria twice yields the same filtered list and
    /// resets the page index both times.
    pub fn set_criteria(&mut self, criteria: SearchCriteria) {
        self.criteria = criteria;
        self.page_index = 0;
        self.refilter();
    }

    /// Removes the first master record matching `predicate`.
    ///
    /// Used after a successful delete to avoid a full reload. Recomputes like
    /// [`set_master`](Self::set_master). Returns `None`, leaving every piece of
    /// state untouched, when no record matches.
    pub fn remove_one<P>(&mut self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        let position = self.master.iter().position(predicate)?;
        let removed = self.master.remove(position);
        self.page_index = 0;
        self.refilter();
        Some(removed)
    }

    /// Appends a record to the master list (after a successful create).
    ///
    /// Recomputes like [`set_master`](Self::set_master).
    pub fn insert_one(&mut self, record: T) {
        self.master.push(record);
        self.page_index = 0;
        self.refilter();
    }

    /// Advances one page; no-op on the last page.
    pub fn next_page(&mut self) {
        if self.page_index + 1 < self.total_pages() {
            self.page_index += 1;
        }
    }

    /// Goes back one page; no-op on the first page.
    pub fn previous_page(&mut self) {
        self.page_index = self.page_index.saturating_sub(1);
    }

    /// Whether a following page with content exists.
    ///
    /// Always `false` for an empty filtered list, even though
    /// [`total_pages`](Self::total_pages) reports 1 in that case.
    #[must_use]
    pub fn can_go_next(&self) -> bool {
        !self.filtered.is_empty() && self.page_index + 1 < self.total_pages()
    }

    #[must_use]
    pub const fn can_go_previous(&self) -> bool {
        self.page_index > 0
    }

    /// The visible slice of the filtered list.
    ///
    /// Returns an empty slice rather than panicking if the start index lies
    /// past the filtered length.
    #[must_use]
    pub fn current_page(&self) -> &[T] {
        let start = self.page_index.saturating_mul(self.page_size);
        if start >= self.filtered.len() {
            return &[];
        }
        let end = start.saturating_add(self.page_size).min(self.filtered.len());
        &self.filtered[start..end]
    }

    /// `max(1, ceil(filtered / page_size))`.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.filtered.len().div_ceil(self.page_size).max(1)
    }

    #[must_use]
    pub const fn current_page_index(&self) -> usize {
        self.page_index
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn master(&self) -> &[T] {
        &self.master
    }

    #[must_use]
    pub fn filtered(&self) -> &[T] {
        &self.filtered
    }

    #[must_use]
    pub const fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    /// Field accessors, when the model matches through accessors rather than
    /// an injected predicate.
    #[must_use]
    pub const fn accessors(&self) -> Option<&FieldAccessors<T>> {
        match &self.filter {
            RecordFilter::Fields(accessors) => Some(accessors),
            RecordFilter::Predicate(_) => None,
        }
    }

    /// Human-readable page counter, 1-based: `"Page 2 of 3"`.
    #[must_use]
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page_index + 1, self.total_pages())
    }

    fn refilter(&mut self) {
        let _span = tracing::debug_span!(
            "refilter",
            master = self.master.len(),
            query_len = self.criteria.query.len()
        )
        .entered();

        self.filtered = if self.criteria.is_empty() {
            self.master.clone()
        } else {
            match &self.filter {
                RecordFilter::Fields(accessors) => {
                    let matcher = CriteriaMatcher::new(&self.criteria);
                    self.master
                        .iter()
                        .filter(|record| matcher.matches(*record, accessors))
                        .cloned()
                        .collect()
                }
                RecordFilter::Predicate(predicate) => self
                    .master
                    .iter()
                    .filter(|record| predicate(record, &self.criteria))
                    .cloned()
                    .collect(),
            }
        };

        let last_page = self.total_pages() - 1;
        self.page_index = self.page_index.min(last_page);

        tracing::debug!(
            filtered = self.filtered.len(),
            pages = self.total_pages(),
            "list recomputed"
        );
    }
}

impl<T> fmt::Debug for PagedListModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedListModel")
            .field("master", &self.master.len())
            .field("filtered", &self.filtered.len())
            .field("criteria", &self.criteria)
            .field("page_size", &self.page_size)
            .field("page_index", &self.page_index)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::FieldSelector;

    fn numbers(page_size: usize) -> PagedListModel<u32> {
        let accessors = FieldAccessors::new().with("n", "Number", |n: &u32| Some(n.to_string()));
        PagedListModel::new(page_size, accessors)
    }

    fn words() -> PagedListModel<String> {
        let accessors = FieldAccessors::new().with("word", "Word", |w: &String| Some(w.clone()));
        PagedListModel::new(10, accessors)
    }

    #[test]
    fn twenty_five_records_make_three_pages() {
        let mut model = numbers(10);
        model.set_master((1..=25).collect());

        assert_eq!(model.total_pages(), 3);
        assert_eq!(model.current_page().len(), 10);
        assert!(model.can_go_next());
        assert!(!model.can_go_previous());

        model.next_page();
        assert_eq!(model.current_page_index(), 1);
        assert!(model.can_go_next());
        assert!(model.can_go_previous());

        model.next_page();
        assert_eq!(model.current_page(), &[21, 22, 23, 24, 25]);
        assert!(!model.can_go_next());
    }

    #[test]
    fn boundary_navigation_is_a_no_op() {
        let mut model = numbers(10);
        model.set_master((1..=25).collect());

        model.previous_page();
        assert_eq!(model.current_page_index(), 0);

        model.next_page();
        model.next_page();
        model.next_page();
        model.next_page();
        assert_eq!(model.current_page_index(), 2);
        assert_eq!(model.current_page().len(), 5);
    }

    #[test]
    fn empty_master_has_one_page_and_no_navigation() {
        let mut model = numbers(10);
        model.set_master(Vec::new());

        assert_eq!(model.total_pages(), 1);
        assert!(model.current_page().is_empty());
        assert!(!model.can_go_next());
        assert!(!model.can_go_previous());
        assert_eq!(model.page_label(), "Page 1 of 1");
    }

    #[test]
    fn filter_is_stable_and_resets_page() {
        let mut model = words();
        model.set_master(["Apple", "banana", "Cherry", "mango"].map(String::from).to_vec());
        model.set_criteria(SearchCriteria::all("an"));
        assert_eq!(model.filtered(), &["banana".to_string(), "mango".to_string()]);
    }

    #[test]
    fn set_criteria_twice_is_idempotent() {
        let mut model = numbers(3);
        model.set_master((1..=30).collect());
        let criteria = SearchCriteria::all("1");

        model.set_criteria(criteria.clone());
        let first = model.filtered().to_vec();
        model.next_page();

        model.set_criteria(criteria);
        assert_eq!(model.filtered(), first.as_slice());
        assert_eq!(model.current_page_index(), 0);
    }

    #[test]
    fn shrinking_filter_never_exposes_out_of_range_page() {
        let mut model = numbers(5);
        model.set_master((1..=40).collect());
        for _ in 0..7 {
            model.next_page();
        }
        assert_eq!(model.current_page_index(), 7);

        model.set_criteria(SearchCriteria::all("40"));
        assert_eq!(model.current_page_index(), 0);
        assert_eq!(model.current_page(), &[40]);
    }

    #[test]
    fn page_invariants_hold_across_sizes() {
        for page_size in 1..=7 {
            for len in 0..=23_u32 {
                let mut model = numbers(page_size);
                model.set_master((0..len).collect());
                let expected = (len as usize).div_ceil(page_size).max(1);
                assert_eq!(model.total_pages(), expected);
                loop {
                    assert!(model.current_page().len() <= page_size);
                    assert!(model.current_page_index() < model.total_pages());
                    if !model.can_go_next() {
                        break;
                    }
                    model.next_page();
                }
            }
        }
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let model = numbers(0);
        assert_eq!(model.page_size(), 1);
    }

    #[test]
    fn remove_one_splices_and_recomputes() {
        let mut model = numbers(10);
        model.set_master((1..=12).collect());
        model.next_page();

        assert_eq!(model.remove_one(|n| *n == 11), Some(11));
        assert_eq!(model.master().len(), 11);
        assert_eq!(model.current_page_index(), 0);
        assert_eq!(model.total_pages(), 2);
    }

    #[test]
    fn remove_one_without_match_leaves_state_alone() {
        let mut model = numbers(10);
        model.set_master((1..=12).collect());
        model.next_page();

        assert_eq!(model.remove_one(|n| *n == 99), None);
        assert_eq!(model.master().len(), 12);
        assert_eq!(model.current_page_index(), 1);
    }

    #[test]
    fn insert_one_respects_active_filter() {
        let mut model = words();
        model.set_master(vec!["banana".to_string()]);
        model.set_criteria(SearchCriteria::all("an"));

        model.insert_one("kiwi".to_string());
        model.insert_one("orange".to_string());
        assert_eq!(model.master().len(), 3);
        assert_eq!(model.filtered(), &["banana".to_string(), "orange".to_string()]);
    }

    #[test]
    fn injected_predicate_drives_filtering() {
        let mut model = PagedListModel::with_predicate(10, |n: &u32, c: &SearchCriteria| {
            c.query.parse::<u32>().is_ok_and(|min| *n >= min)
        });
        model.set_master((1..=20).collect());
        model.set_criteria(SearchCriteria::all("15"));
        assert_eq!(model.filtered(), &[15, 16, 17, 18, 19, 20]);
        assert!(model.accessors().is_none());
    }

    #[test]
    fn empty_query_with_field_selector_shows_everything() {
        let mut model = words();
        model.set_master(vec!["a".to_string(), "b".to_string()]);
        model.set_criteria(SearchCriteria::new(FieldSelector::field("missing"), ""));
        assert_eq!(model.filtered().len(), 2);
    }
}
