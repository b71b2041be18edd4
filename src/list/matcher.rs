//! Case-insensitive substring matching of records against search criteria.
//!
//! Matching is a pure function of the record, the criteria, and the field
//! accessors. It is cheap enough to run on the UI thread for every record on
//! every keystroke.
//!
//! # Rules
//!
//! - An empty query matches every record, whatever the field selector names.
//! - A specific field matches iff its value is present and its lowercase form
//!   contains the lowercase query.
//! - [`FieldSelector::All`] matches iff any accessor matches (short-circuits).
//! - A missing value, or a selector naming an unknown key, never matches a
//!   non-empty query.

use super::criteria::{FieldAccessors, FieldSelector, SearchCriteria};

/// Returns whether `record` satisfies `criteria`.
///
/// # Example
///
/// ```
/// use shelfdesk::list::{matches, FieldAccessors, SearchCriteria};
///
/// let accessors = FieldAccessors::new().with("name", "Name", |s: &&str| Some(s.to_string()));
/// assert!(matches(&"banana", &SearchCriteria::all("AN"), &accessors));
/// assert!(!matches(&"Cherry", &SearchCriteria::all("an"), &accessors));
/// ```
pub fn matches<T>(record: &T, criteria: &SearchCriteria, accessors: &FieldAccessors<T>) -> bool {
    CriteriaMatcher::new(criteria).matches(record, accessors)
}

/// A [`SearchCriteria`] prepared for repeated matching.
///
/// Lowercases the query once so a filter pass over a whole list does not
/// repeat that work per record.
#[derive(Debug, Clone)]
pub struct CriteriaMatcher<'c> {
    field: &'c FieldSelector,
    needle: Option<String>,
}

impl<'c> CriteriaMatcher<'c> {
    #[must_use]
    pub fn new(criteria: &'c SearchCriteria) -> Self {
        let needle = if criteria.query.is_empty() {
            None
        } else {
            Some(criteria.query.to_lowercase())
        };
        Self {
            field: &criteria.field,
            needle,
        }
    }

    pub fn matches<T>(&self, record: &T, accessors: &FieldAccessors<T>) -> bool {
        let Some(needle) = &self.needle else {
            return true;
        };

        match self.field {
            FieldSelector::Field(key) => accessors
                .read(key, record)
                .is_some_and(|value| contains_folded(&value, needle)),
            FieldSelector::All => accessors
                .values(record)
                .any(|value| value.is_some_and(|v| contains_folded(&v, needle))),
        }
    }
}

fn contains_folded(value: &str, lowered_needle: &str) -> bool {
    value.to_lowercase().contains(lowered_needle)
}

/// Character ranges of every case-insensitive occurrence of `query` in `text`.
///
/// Ranges are `(start, end)` char indices with exclusive end, non-overlapping
/// and in ascending order. An empty query yields no ranges.
///
/// ```
/// use shelfdesk::list::highlight_ranges;
///
/// assert_eq!(highlight_ranges("Banana", "an"), vec![(1, 3), (3, 5)]);
/// ```
#[must_use]
pub fn highlight_ranges(text: &str, query: &str) -> Vec<(usize, usize)> {
    if query.is_empty() {
        return Vec::new();
    }

    let haystack: Vec<char> = text.chars().flat_map(char::to_lowercase).collect();
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();

    // Lowercasing can change char counts (e.g. 'İ'); fall back to no
    // highlighting rather than emit ranges that do not line up with `text`.
    if haystack.len() != text.chars().count() || needle.is_empty() {
        return Vec::new();
    }

    let mut ranges = Vec::new();
    let mut start = 0;
    while start + needle.len() <= haystack.len() {
        if haystack[start..start + needle.len()] == needle[..] {
            ranges.push((start, start + needle.len()));
            start += needle.len();
        } else {
            start += 1;
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Member {
        name: String,
        email: Option<String>,
        id: u32,
    }

    fn member(name: &str, email: Option<&str>, id: u32) -> Member {
        Member {
            name: name.to_string(),
            email: email.map(String::from),
            id,
        }
    }

    fn accessors() -> FieldAccessors<Member> {
        FieldAccessors::new()
            .with("name", "Name", |m: &Member| Some(m.name.clone()))
            .with("email", "Email", |m: &Member| m.email.clone())
            .with("id", "ID", |m: &Member| Some(m.id.to_string()))
    }

    #[test]
    fn empty_query_matches_everything_even_null_fields() {
        let accessors = accessors();
        let record = member("Ada", None, 1);
        let criteria = SearchCriteria::new(FieldSelector::field("email"), "");
        assert!(matches(&record, &criteria, &accessors));
        assert!(matches(&record, &SearchCriteria::all(""), &accessors));
    }

    #[test]
    fn null_field_never_matches_non_empty_query() {
        let accessors = accessors();
        let record = member("Ada", None, 1);
        let criteria = SearchCriteria::new(FieldSelector::field("email"), "a");
        assert!(!matches(&record, &criteria, &accessors));
    }

    #[test]
    fn specific_field_ignores_other_fields() {
        let accessors = accessors();
        let record = member("Grace", Some("hopper@navy.mil"), 2);
        let by_name = SearchCriteria::new(FieldSelector::field("name"), "hopper");
        let by_email = SearchCriteria::new(FieldSelector::field("email"), "hopper");
        assert!(!matches(&record, &by_name, &accessors));
        assert!(matches(&record, &by_email, &accessors));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let accessors = accessors();
        let record = member("Grace Hopper", None, 2);
        for query in ["hop", "HOP", "HoP"] {
            assert!(matches(&record, &SearchCriteria::all(query), &accessors), "{query}");
        }
    }

    #[test]
    fn all_fields_is_logical_or() {
        let accessors = accessors();
        let record = member("Linus", Some("linus@example.org"), 123);
        assert!(matches(&record, &SearchCriteria::all("example"), &accessors));
        assert!(matches(&record, &SearchCriteria::all("12"), &accessors));
        assert!(!matches(&record, &SearchCriteria::all("zzz"), &accessors));
    }

    #[test]
    fn numeric_ids_match_by_substring() {
        let accessors = accessors();
        let record = member("Ken", None, 123);
        let criteria = SearchCriteria::new(FieldSelector::field("id"), "12");
        assert!(matches(&record, &criteria, &accessors));
    }

    #[test]
    fn unknown_field_key_never_matches_non_empty_query() {
        let accessors = accessors();
        let record = member("Ken", None, 1);
        let criteria = SearchCriteria::new(FieldSelector::field("phone"), "k");
        assert!(!matches(&record, &criteria, &accessors));
    }

    #[test]
    fn scenario_fruit_filter() {
        let accessors = FieldAccessors::new().with("name", "Name", |s: &String| Some(s.clone()));
        let fruit = ["Apple", "banana", "Cherry"].map(String::from);
        let criteria = SearchCriteria::all("an");
        let hits: Vec<&String> = fruit.iter().filter(|f| matches(*f, &criteria, &accessors)).collect();
        assert_eq!(hits, vec!["banana"]);
    }

    #[test]
    fn highlight_ranges_are_case_insensitive() {
        assert_eq!(highlight_ranges("Dune", "DU"), vec![(0, 2)]);
        assert_eq!(highlight_ranges("aaaa", "aa"), vec![(0, 2), (2, 4)]);
        assert!(highlight_ranges("Dune", "").is_empty());
        assert!(highlight_ranges("Dune", "x").is_empty());
    }
}
