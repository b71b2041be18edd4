//! Typed table columns.
//!
//! A column pairs a header with an explicit `T -> String` accessor, so a
//! table knows how to display each cell without looking fields up by name.

use std::fmt;

type CellFn<T> = Box<dyn Fn(&T) -> String>;

/// One table column for records of type `T`.
///
/// # Example
///
/// ```
/// use shelfdesk::list::ColumnDescriptor;
///
/// let title = ColumnDescriptor::new("Title", 30, |b: &(u32, &str)| b.1.to_string());
/// assert_eq!(title.cell(&(1, "Dune")), "Dune");
/// ```
pub struct ColumnDescriptor<T> {
    header: String,
    width: usize,
    cell: CellFn<T>,
}

impl<T> ColumnDescriptor<T> {
    /// Creates a column with a header, a preferred width in terminal cells, and
    /// a cell accessor.
    pub fn new<F>(header: impl Into<String>, width: usize, cell: F) -> Self
    where
        F: Fn(&T) -> String + 'static,
    {
        Self {
            header: header.into(),
            width,
            cell: Box::new(cell),
        }
    }

    /// Column for an optional value, shown as `-` when absent.
    pub fn optional<F>(header: impl Into<String>, width: usize, cell: F) -> Self
    where
        F: Fn(&T) -> Option<String> + 'static,
    {
        Self::new(header, width, move |record| cell(record).unwrap_or_else(|| "-".to_string()))
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    /// Display value of this column for `record`.
    pub fn cell(&self, record: &T) -> String {
        (self.cell)(record)
    }
}

impl<T> fmt::Debug for ColumnDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("header", &self.header)
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_column_shows_dash_for_missing_values() {
        let column = ColumnDescriptor::optional("Email", 20, |r: &Option<&str>| r.map(String::from));
        assert_eq!(column.cell(&Some("a@b.c")), "a@b.c");
        assert_eq!(column.cell(&None), "-");
        assert_eq!(column.header(), "Email");
        assert_eq!(column.width(), 20);
    }
}
