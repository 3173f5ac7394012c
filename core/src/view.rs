//! Presentation model of the student page.
//!
//! # Design
//! `PageView::build` turns a cache snapshot plus the UI store into plain
//! data; renderers (`Display` here, `maud::Render` in `html`) never look at
//! the cache or store directly. Precedence follows what a user should see:
//! a failed fetch replaces the whole page, cached rows beat the loading
//! indicator, and an empty finished fetch shows the empty-state message.

use std::fmt;

use crate::cache::Snapshot;
use crate::store::StudentStore;
use serde_json::Number;

use crate::types::{Draft, Student, StudentId};

pub const TITLE: &str = "Students";
pub const LOADING_TEXT: &str = "Loading...";
pub const EMPTY_TEXT: &str = "No students found.";
pub const LOAD_FAILED_TEXT: &str = "Failed to load students";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    /// The list fetch failed; nothing else is shown.
    Failed { message: String },
    Ready {
        table: TableView,
        form: Option<FormView>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableView {
    Loading,
    Empty,
    Rows(Vec<RowView>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: StudentId,
    pub mode: RowMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowMode {
    Display { name: String, email: String, age: Number },
    Editing(Draft),
}

/// The modal creation form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub draft: Draft,
    pub submitting: bool,
}

impl PageView {
    pub fn build(snapshot: &Snapshot<Vec<Student>>, store: &StudentStore) -> Self {
        if let Some(error) = &snapshot.error {
            // The load error shows the transport-level text, not the body's message.
            let message = error.to_string();
            let message = if message.is_empty() {
                LOAD_FAILED_TEXT.to_string()
            } else {
                message
            };
            return PageView::Failed { message };
        }

        let table = match snapshot.data.as_deref() {
            Some(students) if !students.is_empty() => {
                TableView::Rows(students.iter().map(|s| RowView::build(s, store)).collect())
            }
            _ if snapshot.is_loading => TableView::Loading,
            _ => TableView::Empty,
        };

        let form = store.is_form_visible().then(|| FormView {
            draft: store.new_draft().clone(),
            submitting: store.is_submitting(),
        });

        PageView::Ready { table, form }
    }

    pub fn rows(&self) -> &[RowView] {
        match self {
            PageView::Ready {
                table: TableView::Rows(rows),
                ..
            } => rows,
            _ => &[],
        }
    }

    pub fn form(&self) -> Option<&FormView> {
        match self {
            PageView::Ready { form, .. } => form.as_ref(),
            PageView::Failed { .. } => None,
        }
    }
}

impl RowView {
    fn build(student: &Student, store: &StudentStore) -> Self {
        let mode = match store.edit() {
            Some(session) if session.id == student.id => RowMode::Editing(session.draft.clone()),
            _ => RowMode::Display {
                name: student.name.clone(),
                email: student.email.clone(),
                age: student.age.clone(),
            },
        };
        Self {
            id: student.id.clone(),
            mode,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, RowMode::Editing(_))
    }
}

impl FormView {
    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            "Saving..."
        } else {
            "Submit"
        }
    }
}

impl fmt::Display for PageView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageView::Failed { message } => write!(f, "Error\n{message}"),
            PageView::Ready { table, form } => {
                writeln!(f, "{TITLE}")?;
                write!(f, "{table}")?;
                if let Some(form) = form {
                    write!(f, "\n\n{form}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for TableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = match self {
            TableView::Loading => return f.write_str(LOADING_TEXT),
            TableView::Empty => return f.write_str(EMPTY_TEXT),
            TableView::Rows(rows) => rows,
        };

        let mut cells = vec![["#", "Name", "Email", "Age", "Actions"].map(String::from)];
        for (index, row) in rows.iter().enumerate() {
            let number = (index + 1).to_string();
            cells.push(match &row.mode {
                RowMode::Display { name, email, age } => [
                    number,
                    name.clone(),
                    email.clone(),
                    age.to_string(),
                    "Edit | Delete".to_string(),
                ],
                RowMode::Editing(draft) => [
                    format!("{number}*"),
                    format!("[{}]", draft.name),
                    format!("[{}]", draft.email),
                    format!("[{}]", draft.age),
                    "Update | Cancel".to_string(),
                ],
            });
        }

        let mut widths = [0usize; 5];
        for line in &cells {
            for (width, cell) in widths.iter_mut().zip(line) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let lines: Vec<String> = cells
            .iter()
            .map(|line| {
                let padded: Vec<String> = line
                    .iter()
                    .zip(widths)
                    .map(|(cell, width)| format!("{cell:<width$}"))
                    .collect();
                padded.join("  ").trim_end().to_string()
            })
            .collect();
        f.write_str(&lines.join("\n"))
    }
}

impl fmt::Display for FormView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Add Student")?;
        writeln!(f, "  Name:  {}", self.draft.name)?;
        writeln!(f, "  Email: {}", self.draft.email)?;
        writeln!(f, "  Age:   {}", self.draft.age)?;
        write!(f, "  [Cancel] [{}]", self.submit_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::types::Field;

    fn student(id: &str, name: &str, age: u32) -> Student {
        Student {
            id: StudentId::new(id),
            name: name.to_string(),
            email: format!("{}@x.com", name.to_lowercase()),
            age: age.into(),
        }
    }

    fn loaded(students: Vec<Student>) -> Snapshot<Vec<Student>> {
        Snapshot {
            data: Some(students),
            error: None,
            is_loading: false,
        }
    }

    #[test]
    fn pending_fetch_shows_loading() {
        let view = PageView::build(&Snapshot::pending(), &StudentStore::new());
        assert!(matches!(
            view,
            PageView::Ready {
                table: TableView::Loading,
                form: None
            }
        ));
        assert!(view.to_string().contains(LOADING_TEXT));
    }

    #[test]
    fn finished_empty_fetch_shows_empty_state() {
        let view = PageView::build(&loaded(Vec::new()), &StudentStore::new());
        assert!(view.rows().is_empty());
        assert_eq!(view.to_string(), format!("{TITLE}\n{EMPTY_TEXT}"));
    }

    #[test]
    fn cached_rows_win_over_loading() {
        let mut snapshot = loaded(vec![student("1", "Ann", 20)]);
        snapshot.is_loading = true;
        let view = PageView::build(&snapshot, &StudentStore::new());
        assert_eq!(view.rows().len(), 1);
    }

    #[test]
    fn fetch_error_replaces_page() {
        let snapshot = Snapshot {
            data: Some(vec![student("1", "Ann", 20)]),
            error: Some(ApiError::from_status(
                500,
                r#"{"message":"database offline"}"#.to_string(),
            )),
            is_loading: false,
        };
        let view = PageView::build(&snapshot, &StudentStore::new());
        assert_eq!(
            view,
            PageView::Failed {
                message: "Request failed with status code 500".to_string()
            }
        );
        assert!(view.rows().is_empty());
        assert!(view.form().is_none());
    }

    #[test]
    fn empty_error_text_falls_back() {
        let snapshot = Snapshot {
            data: None,
            error: Some(ApiError::Transport(String::new())),
            is_loading: false,
        };
        let view = PageView::build(&snapshot, &StudentStore::new());
        assert_eq!(
            view,
            PageView::Failed {
                message: LOAD_FAILED_TEXT.to_string()
            }
        );
    }

    #[test]
    fn only_the_edited_row_is_in_edit_mode() {
        let ann = student("1", "Ann", 20);
        let bob = student("2", "Bob", 31);
        let mut store = StudentStore::new();
        store.begin_edit(&bob);
        store.set_edit_field(Field::Name, "Robert");

        let view = PageView::build(&loaded(vec![ann, bob]), &store);
        let rows = view.rows();
        assert!(!rows[0].is_editing());
        match &rows[1].mode {
            RowMode::Editing(draft) => assert_eq!(draft.name, "Robert"),
            other => panic!("expected edit mode, got {other:?}"),
        }
    }

    #[test]
    fn text_table_aligns_columns() {
        let view = PageView::build(
            &loaded(vec![student("1", "Ann", 20), student("2", "Bob", 31)]),
            &StudentStore::new(),
        );
        let expected = "\
Students
#  Name  Email      Age  Actions
1  Ann   ann@x.com  20   Edit | Delete
2  Bob   bob@x.com  31   Edit | Delete";
        assert_eq!(view.to_string(), expected);
    }

    #[test]
    fn form_shows_saving_while_submitting() {
        let mut store = StudentStore::new();
        store.open_form();
        store.set_new_field(Field::Name, "Ann");
        store.set_submitting(true);

        let view = PageView::build(&loaded(Vec::new()), &store);
        let form = view.form().unwrap();
        assert!(form.submitting);
        assert_eq!(form.submit_label(), "Saving...");
        assert!(view.to_string().ends_with("[Cancel] [Saving...]"));
    }
}
