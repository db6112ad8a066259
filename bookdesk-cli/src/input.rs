//! Parsing of typed commands.

use std::path::PathBuf;

use bookdesk_lib::api::PageSize;
use bookdesk_lib::error::{FieldError, TableError};
use bookdesk_lib::table::{Column, Command};
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  search <text>        filter by first author (empty text clears)
  sort <column>        cycle sort: ascending, descending, off
  page <n> | next | prev
  size <10|20|50|100>
  edit <row>           open a draft of row number <row>
  set <field> <value>  change a draft field
  save                 commit the draft
  export [path]        write the fetched page as CSV
  reload | show | help | quit

Columns: title, author, year, subject, ratings_average,
         author_birth_date, author_top_work (or 1-7)";

/// What a line of input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Table(Command),
    Export(Option<PathBuf>),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{command}' needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },

    #[error("'{0}' is not a positive number")]
    NotANumber(String),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Parses one line. Blank lines redraw the table.
pub fn parse(line: &str) -> Result<Action, InputError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let action = match word {
        "" | "show" => Action::Show,
        "help" | "?" => Action::Help,
        "quit" | "exit" | "q" => Action::Quit,
        "search" => Action::Table(Command::SetSearch(rest.to_string())),
        "next" | "n" => Action::Table(Command::NextPage),
        "prev" | "p" => Action::Table(Command::PreviousPage),
        "page" => Action::Table(Command::SetPage(ordinal(rest, "page", "a page number")?)),
        "size" => {
            let size = number(rest, "size", "a page size")?;
            Action::Table(Command::SetPageSize(PageSize::new(size)?))
        }
        "sort" => Action::Table(Command::SortBy(column(rest)?)),
        "edit" => Action::Table(Command::BeginEdit(ordinal(rest, "edit", "a row number")?)),
        "set" => {
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            if field.is_empty() {
                return Err(InputError::MissingArgument {
                    command: "set",
                    what: "a field name",
                });
            }
            let field = column(field)?.accessor().to_string();
            Action::Table(Command::UpdateDraft {
                field,
                value: value.to_string(),
            })
        }
        "save" => Action::Table(Command::CommitEdit),
        "reload" => Action::Table(Command::Reload),
        "export" => Action::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
        other => return Err(InputError::Unknown(other.to_string())),
    };

    Ok(action)
}

fn number(arg: &str, command: &'static str, what: &'static str) -> Result<usize, InputError> {
    if arg.is_empty() {
        return Err(InputError::MissingArgument { command, what });
    }
    arg.parse()
        .map_err(|_| InputError::NotANumber(arg.to_string()))
}

/// A 1-based number as shown on screen, converted to an index.
fn ordinal(arg: &str, command: &'static str, what: &'static str) -> Result<usize, InputError> {
    match number(arg, command, what)? {
        0 => Err(InputError::NotANumber(arg.to_string())),
        n => Ok(n - 1),
    }
}

/// A column accessor, alias, or 1-based column number.
fn column(arg: &str) -> Result<Column, InputError> {
    if arg.is_empty() {
        return Err(InputError::MissingArgument {
            command: "sort",
            what: "a column",
        });
    }
    if let Ok(n) = arg.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| Column::ALL.get(i).copied())
            .ok_or_else(|| FieldError::unknown(arg).into());
    }
    Ok(arg.parse::<Column>()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation() {
        assert_eq!(parse("next"), Ok(Action::Table(Command::NextPage)));
        assert_eq!(parse("  page 3 "), Ok(Action::Table(Command::SetPage(2))));
        assert_eq!(
            parse("size 20"),
            Ok(Action::Table(Command::SetPageSize(PageSize::new(20).unwrap())))
        );
        assert_eq!(parse("size 30"), Err(InputError::Table(TableError::PageSize(30))));
        assert_eq!(parse("page 0"), Err(InputError::NotANumber("0".into())));
    }

    #[test]
    fn test_search_keeps_inner_spaces() {
        assert_eq!(
            parse("search carl  sagan"),
            Ok(Action::Table(Command::SetSearch("carl  sagan".into())))
        );
        assert_eq!(parse("search"), Ok(Action::Table(Command::SetSearch(String::new()))));
    }

    #[test]
    fn test_sort_by_name_or_number() {
        assert_eq!(parse("sort year"), Ok(Action::Table(Command::SortBy(Column::FirstPublishYear))));
        assert_eq!(parse("sort 2"), Ok(Action::Table(Command::SortBy(Column::AuthorName))));
        assert!(matches!(parse("sort 8"), Err(InputError::Field(_))));
        assert!(matches!(parse("sort"), Err(InputError::MissingArgument { .. })));
    }

    #[test]
    fn test_edit_commands() {
        assert_eq!(parse("edit 1"), Ok(Action::Table(Command::BeginEdit(0))));
        assert_eq!(
            parse("set author Ann Druyan"),
            Ok(Action::Table(Command::UpdateDraft {
                field: "authors[0].name".into(),
                value: "Ann Druyan".into(),
            }))
        );
        assert_eq!(
            parse("set year"),
            Ok(Action::Table(Command::UpdateDraft {
                field: "first_publish_year".into(),
                value: String::new(),
            }))
        );
        assert_eq!(parse("save"), Ok(Action::Table(Command::CommitEdit)));
    }

    #[test]
    fn test_export_and_misc() {
        assert_eq!(parse("export"), Ok(Action::Export(None)));
        assert_eq!(
            parse("export /tmp/out.csv"),
            Ok(Action::Export(Some(PathBuf::from("/tmp/out.csv"))))
        );
        assert_eq!(parse(""), Ok(Action::Show));
        assert_eq!(parse("bogus"), Err(InputError::Unknown("bogus".into())));
    }
}
