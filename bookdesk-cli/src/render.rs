//! Text rendering of the table state.

use std::fmt::Write;

use bookdesk_lib::model::Book;
use bookdesk_lib::table::{Column, TableState};
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Widest a cell may get before it is cut with an ellipsis.
const MAX_CELL_WIDTH: usize = 28;

/// Renders the status line, the page window, the draft and any notice.
pub fn render(state: &TableState) -> String {
    let mut out = String::new();
    let view = state.view();

    let _ = write!(
        out,
        "Page {} of {}  |  {} per page",
        view.page_index + 1,
        view.page_count,
        state.page_size()
    );
    if !state.search().is_empty() {
        let _ = write!(out, "  |  author contains \"{}\"", state.search());
    }
    out.push('\n');

    if state.loading() {
        out.push_str("Loading…\n");
    } else {
        let headers: Vec<String> = std::iter::once("#".to_string())
            .chain(Column::ALL.iter().map(|column| {
                match view.sort.filter(|spec| spec.column == *column) {
                    Some(spec) => format!("{} {}", column.header(), spec.direction.indicator()),
                    None => column.header().to_string(),
                }
            }))
            .collect();

        let body: Vec<Vec<String>> = view
            .rows
            .iter()
            .map(|row| {
                let editing = state.editing_index() == Some(row.index);
                let book = match state.draft() {
                    Some(draft) if editing => draft,
                    _ => row.book,
                };
                let marker = if editing { "*" } else { "" };
                std::iter::once(format!("{}{}", row.index + 1, marker))
                    .chain(cells(book))
                    .collect()
            })
            .collect();

        write_grid(&mut out, &headers, &body);

        if body.is_empty() {
            out.push_str("(no rows match)\n");
        }
    }

    if let Some(edit) = state.edit() {
        let _ = writeln!(out, "Editing row {} ('save' to commit):", edit.index + 1);
        for column in Column::ALL {
            let _ = writeln!(
                out,
                "  {:<20} {}",
                column.accessor(),
                column.value(&edit.draft).unwrap_or_default()
            );
        }
    }

    let prev = if view.can_previous() { "prev" } else { "    " };
    let next = if view.can_next() { "next" } else { "    " };
    let _ = writeln!(out, "[{}] [{}]", prev, next);

    if let Some(notice) = state.notice() {
        let _ = writeln!(out, "! {}", notice);
    }

    out
}

fn cells(book: &Book) -> impl Iterator<Item = String> + '_ {
    Column::ALL
        .into_iter()
        .map(move |column| column.value(book).unwrap_or_default())
}

fn write_grid(out: &mut String, headers: &[String], body: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in body {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }
    for width in &mut widths {
        *width = (*width).min(MAX_CELL_WIDTH);
    }

    write_row(out, headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(out, &rule, &widths);
    for row in body {
        write_row(out, row, &widths);
    }
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(&truncate(cell, *width), *width))
        .collect();
    out.push_str(line.join(" | ").trim_end());
    out.push('\n');
}

/// Cuts `text` to at most `width` columns, ending in `…` if shortened.
fn truncate(text: &str, width: usize) -> String {
    // Newlines would break the grid
    let text = text.replace(['\n', '\r'], " ");
    if text.width() <= width {
        return text;
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookdesk_lib::api::Page;
    use bookdesk_lib::model::BookStub;

    fn loaded(books: Vec<Book>) -> TableState {
        let mut state = TableState::default();
        let request = state.reload();
        state.complete(request, Ok(Page::new(request.page, books)));
        state
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long title", 8), "a very …");
        assert_eq!(truncate("line\nbreak", 20), "line break");
    }

    #[test]
    fn test_loading_hides_table() {
        let mut state = TableState::default();
        state.reload();

        let out = render(&state);
        assert!(out.contains("Loading…"));
        assert!(!out.contains("Title"));
    }

    #[test]
    fn test_rows_and_sort_indicator() {
        let mut state = loaded(vec![
            Book::unenriched(BookStub::new("Cosmos", "Carl Sagan").with_year(1980)),
            Book::unenriched(BookStub::new("Dune", "Frank Herbert").with_year(1965)),
        ]);
        state.sort_by(Column::FirstPublishYear);

        let out = render(&state);
        assert!(out.contains("First Publish Year ▲"));
        let dune = out.find("Dune").unwrap();
        let cosmos = out.find("Cosmos").unwrap();
        assert!(dune < cosmos);
        assert!(out.contains("Page 1 of 10"));
    }

    #[test]
    fn test_draft_is_shown_in_place() {
        let mut state = loaded(vec![Book::unenriched(BookStub::new("Cosmos", "Carl Sagan"))]);
        state.begin_edit(0).unwrap();
        state.update_draft_field("title", "Cosmos II").unwrap();

        let out = render(&state);
        assert!(out.contains("1*"));
        assert!(out.contains("Cosmos II"));
        assert!(out.contains("Editing row 1"));
    }
}
