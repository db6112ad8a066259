//! Table columns and field access by accessor name.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::FieldError;
use crate::model::Author;
use crate::model::Book;

/// A column of the book table.
///
/// The accessor names double as CSV header names and as the field names
/// accepted by draft edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Title,
    AuthorName,
    FirstPublishYear,
    Subject,
    RatingsAverage,
    AuthorBirthDate,
    AuthorTopWork,
}

impl Column {
    /// All columns in display order.
    pub const ALL: [Column; 7] = [
        Column::Title,
        Column::AuthorName,
        Column::FirstPublishYear,
        Column::Subject,
        Column::RatingsAverage,
        Column::AuthorBirthDate,
        Column::AuthorTopWork,
    ];

    pub fn accessor(self) -> &'static str {
        match self {
            Column::Title => "title",
            Column::AuthorName => "authors[0].name",
            Column::FirstPublishYear => "first_publish_year",
            Column::Subject => "subject",
            Column::RatingsAverage => "ratings_average",
            Column::AuthorBirthDate => "author_birth_date",
            Column::AuthorTopWork => "author_top_work",
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            Column::Title => "Title",
            Column::AuthorName => "Author Name",
            Column::FirstPublishYear => "First Publish Year",
            Column::Subject => "Subject",
            Column::RatingsAverage => "Ratings Average",
            Column::AuthorBirthDate => "Author Birth Date",
            Column::AuthorTopWork => "Author Top Work",
        }
    }

    /// Text stored in a text column. `None` for the year column and for a
    /// missing first author.
    fn text(self, book: &Book) -> Option<&str> {
        match self {
            Column::Title => Some(&book.title),
            Column::AuthorName => book.first_author(),
            Column::FirstPublishYear => None,
            Column::Subject => Some(&book.subject),
            Column::RatingsAverage => Some(&book.ratings_average),
            Column::AuthorBirthDate => Some(&book.author_birth_date),
            Column::AuthorTopWork => Some(&book.author_top_work),
        }
    }

    /// The cell value of `book`, or `None` if the field is missing.
    pub fn value(self, book: &Book) -> Option<String> {
        match self {
            Column::FirstPublishYear => book.first_publish_year.map(|y| y.to_string()),
            _ => self.text(book).map(str::to_string),
        }
    }

    /// Writes `value` into this column's field of `book`.
    ///
    /// An empty year clears it. Writing the author name of a book with no
    /// authors adds one.
    pub fn set(self, book: &mut Book, value: &str) -> Result<(), FieldError> {
        match self {
            Column::Title => book.title = value.to_string(),
            Column::AuthorName => match book.authors.first_mut() {
                Some(author) => author.name = value.to_string(),
                None => book.authors.push(Author::new(value)),
            },
            Column::FirstPublishYear => {
                let trimmed = value.trim();
                book.first_publish_year = if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.parse().map_err(|_| {
                        FieldError::invalid_value(self.accessor(), value, "a whole year")
                    })?)
                };
            }
            Column::Subject => book.subject = value.to_string(),
            Column::RatingsAverage => book.ratings_average = value.to_string(),
            Column::AuthorBirthDate => book.author_birth_date = value.to_string(),
            Column::AuthorTopWork => book.author_top_work = value.to_string(),
        }
        Ok(())
    }

    /// Ascending order of two books by this column. Missing values sort
    /// first; text compares with [`alphanumeric`].
    pub fn compare(self, a: &Book, b: &Book) -> Ordering {
        match self {
            Column::FirstPublishYear => a.first_publish_year.cmp(&b.first_publish_year),
            _ => match (self.text(a), self.text(b)) {
                (Some(a), Some(b)) => alphanumeric(a, b),
                (a, b) => a.cmp(&b),
            },
        }
    }
}

/// Orders text by alternating runs of digits and non-digits.
///
/// Digit runs compare by numeric value, so "Book 9" sorts before "Book 10".
/// Other runs compare as plain (case-sensitive) strings, and a non-digit run
/// sorts before a digit run. With equal runs, the text with fewer runs comes
/// first.
pub fn alphanumeric(a: &str, b: &str) -> Ordering {
    let mut a_runs = runs(a);
    let mut b_runs = runs(b);

    loop {
        let (x, y) = match (a_runs.next(), b_runs.next()) {
            (Some(x), Some(y)) => (x, y),
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
        };

        let ordering = match (is_digits(x), is_digits(y)) {
            (true, true) => compare_digits(x, y),
            (false, false) => x.cmp(y),
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

fn runs(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let digits = is_digits(rest);
        if rest.is_empty() {
            return None;
        }
        let end = rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        rest = tail;
        Some(run)
    })
}

fn is_digits(run: &str) -> bool {
    run.starts_with(|c: char| c.is_ascii_digit())
}

/// Numeric order of two digit runs of any length.
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.accessor())
    }
}

impl FromStr for Column {
    type Err = FieldError;

    /// Parses an accessor name, or the short aliases `author` and `year`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(column) = Column::ALL.into_iter().find(|c| c.accessor() == s) {
            return Ok(column);
        }

        match s {
            "author" => Ok(Column::AuthorName),
            "year" => Ok(Column::FirstPublishYear),
            _ => Err(FieldError::unknown(s)),
        }
    }
}
