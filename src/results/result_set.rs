use super::row::TextRow;

/// The rows returned by one query statement
///
/// Rows are fully buffered before the statement's worker moves on, so a result set never
/// borrows from the connection that produced it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    /// The rows returned by the query
    pub rows: Vec<TextRow>,
    /// Number of columns the statement declared, known even when no row came back
    pub column_count: usize,
}

impl ResultSet {
    /// Create a new result set with a known capacity
    #[must_use]
    pub fn with_capacity(column_count: usize, capacity: usize) -> ResultSet {
        ResultSet {
            rows: Vec::with_capacity(capacity),
            column_count,
        }
    }

    /// Add a row to the result set
    pub fn add_row(&mut self, row: TextRow) {
        self.rows.push(row);
    }

    /// The first row, or `None` for an empty result
    #[must_use]
    pub fn first(&self) -> Option<&TextRow> {
        self.rows.first()
    }

    /// Iterate the leading rows that have exactly `width` columns.
    ///
    /// Iteration stops at the first row of any other width, which is how list-style lookups
    /// treat a malformed row: everything before it is kept, nothing after it is read.
    pub fn rows_of_width(&self, width: usize) -> impl Iterator<Item = &TextRow> {
        self.rows.iter().take_while(move |row| row.len() == width)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<TextRow> for ResultSet {
    fn from_iter<I: IntoIterator<Item = TextRow>>(iter: I) -> Self {
        let rows: Vec<TextRow> = iter.into_iter().collect();
        let column_count = rows.first().map_or(0, TextRow::len);
        ResultSet { rows, column_count }
    }
}
