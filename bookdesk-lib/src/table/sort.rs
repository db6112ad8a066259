//! Sort state and stable row ordering.

use crate::model::Book;

use super::Column;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Arrow shown next to a sorted column header.
    pub fn indicator(self) -> &'static str {
        match self {
            Direction::Asc => "▲",
            Direction::Desc => "▼",
        }
    }
}

/// The sorted column and its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: Column,
    pub direction: Direction,
}

impl SortSpec {
    pub fn asc(column: Column) -> Self {
        Self {
            column,
            direction: Direction::Asc,
        }
    }

    pub fn desc(column: Column) -> Self {
        Self {
            column,
            direction: Direction::Desc,
        }
    }

    /// Sort state after clicking `column`'s header.
    ///
    /// A new column sorts ascending, an ascending column flips to
    /// descending, and a descending column goes back to fetched order.
    pub fn cycle(current: Option<SortSpec>, column: Column) -> Option<SortSpec> {
        match current {
            Some(spec) if spec.column == column => match spec.direction {
                Direction::Asc => Some(Self::desc(column)),
                Direction::Desc => None,
            },
            _ => Some(Self::asc(column)),
        }
    }
}

/// Stably sorts row indices by `spec`.
///
/// Rows with equal keys keep their relative order in both directions.
pub fn sort_indices(rows: &[Book], indices: &mut [usize], spec: SortSpec) {
    indices.sort_by(|&a, &b| {
        let ordering = spec.column.compare(&rows[a], &rows[b]);
        match spec.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BookStub;

    fn rows() -> Vec<Book> {
        [
            ("B", "x", 1990),
            ("A", "y", 1980),
            ("C", "z", 1990),
            ("D", "w", 1970),
        ]
        .into_iter()
        .map(|(title, author, year)| {
            Book::unenriched(BookStub::new(title, author).with_year(year))
        })
        .collect()
    }

    #[test]
    fn test_cycle() {
        let asc = SortSpec::cycle(None, Column::Title);
        assert_eq!(asc, Some(SortSpec::asc(Column::Title)));

        let desc = SortSpec::cycle(asc, Column::Title);
        assert_eq!(desc, Some(SortSpec::desc(Column::Title)));

        assert_eq!(SortSpec::cycle(desc, Column::Title), None);
        assert_eq!(
            SortSpec::cycle(desc, Column::AuthorName),
            Some(SortSpec::asc(Column::AuthorName))
        );
    }

    #[test]
    fn test_sort_is_stable_both_directions() {
        let rows = rows();

        let mut asc: Vec<usize> = (0..rows.len()).collect();
        sort_indices(&rows, &mut asc, SortSpec::asc(Column::FirstPublishYear));
        assert_eq!(asc, vec![3, 1, 0, 2]);

        let mut desc: Vec<usize> = (0..rows.len()).collect();
        sort_indices(&rows, &mut desc, SortSpec::desc(Column::FirstPublishYear));
        assert_eq!(desc, vec![0, 2, 1, 3]);
    }
}
