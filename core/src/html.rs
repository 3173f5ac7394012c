//! HTML rendering of `PageView` with maud.

use maud::{html, Markup, Render, DOCTYPE};

use crate::types::Draft;
use crate::view::{
    FormView, PageView, RowMode, RowView, TableView, EMPTY_TEXT, LOADING_TEXT, TITLE,
};

const COLUMNS: [&str; 4] = ["Name", "Email", "Age", "Actions"];

impl Render for PageView {
    fn render(&self) -> Markup {
        match self {
            PageView::Failed { message } => html! {
                div class="min-h-screen flex items-center justify-center bg-red-50 p-4" {
                    div class="bg-white border border-red-300 rounded-md p-6 shadow-md text-center max-w-md w-full" {
                        h1 class="text-xl font-semibold text-red-600" { "Error" }
                        p class="mt-2 text-gray-700" { (message) }
                    }
                }
            },
            PageView::Ready { table, form } => html! {
                div class="min-h-screen p-4 md:p-8" {
                    div class="max-w-7xl mx-auto" {
                        div class="flex justify-between items-center mb-6 gap-4" {
                            h1 class="text-2xl font-bold" { (TITLE) }
                            button type="button" name="action" value="open-form" { "+ Add Student" }
                        }
                        table class="min-w-full text-sm text-left" {
                            thead {
                                tr {
                                    @for column in COLUMNS {
                                        th class="px-4 py-3" { (column) }
                                    }
                                }
                            }
                            tbody { (table) }
                        }
                    }
                    @if let Some(form) = form {
                        (form)
                    }
                }
            },
        }
    }
}

impl Render for TableView {
    fn render(&self) -> Markup {
        match self {
            TableView::Loading => message_row(LOADING_TEXT),
            TableView::Empty => message_row(EMPTY_TEXT),
            TableView::Rows(rows) => html! {
                @for row in rows { (row) }
            },
        }
    }
}

fn message_row(text: &str) -> Markup {
    html! {
        tr {
            td colspan=(COLUMNS.len()) class="text-center py-6" { (text) }
        }
    }
}

impl Render for RowView {
    fn render(&self) -> Markup {
        let id = self.id.as_str();
        match &self.mode {
            RowMode::Display { name, email, age } => html! {
                tr data-id=(id) {
                    td class="px-4 py-3" { span class="capitalize font-medium" { (name) } }
                    td class="px-4 py-3" { (email) }
                    td class="px-4 py-3" { (age.to_string()) }
                    td class="px-4 py-3 text-center" {
                        button type="button" name="edit" value=(id) { "Edit" }
                        button type="button" name="delete" value=(id) { "Delete" }
                    }
                }
            },
            RowMode::Editing(draft) => html! {
                tr data-id=(id) data-editing="true" {
                    (draft_cells(draft))
                    td class="px-4 py-3 text-center" {
                        button type="button" name="update" value=(id) { "Update" }
                        button type="button" name="cancel" { "Cancel" }
                    }
                }
            },
        }
    }
}

fn draft_cells(draft: &Draft) -> Markup {
    html! {
        td class="px-4 py-3" { input type="text" name="name" value=(draft.name); }
        td class="px-4 py-3" { input type="email" name="email" value=(draft.email); }
        td class="px-4 py-3" { input type="number" name="age" value=(draft.age); }
    }
}

impl Render for FormView {
    fn render(&self) -> Markup {
        html! {
            div class="fixed inset-0 flex justify-center items-center px-4 z-50" role="dialog" {
                div class="bg-white w-full max-w-md p-6 rounded-lg shadow-lg" {
                    h3 class="text-xl font-bold mb-4" { "Add Student" }
                    form class="space-y-4" {
                        (labelled("Name", "text", "name", &self.draft.name, "Enter name"))
                        (labelled("Email", "email", "email", &self.draft.email, "Enter email"))
                        (labelled("Age", "number", "age", &self.draft.age, "Enter age"))
                        div class="flex justify-end space-x-3 pt-3" {
                            button type="button" name="action" value="close-form" { "Cancel" }
                            button type="submit" disabled[self.submitting] { (self.submit_label()) }
                        }
                    }
                }
            }
        }
    }
}

fn labelled(label: &str, kind: &str, name: &str, value: &str, placeholder: &str) -> Markup {
    html! {
        div {
            label class="block mb-1 text-sm font-medium" for=(name) { (label) }
            input id=(name) type=(kind) name=(name) value=(value) placeholder=(placeholder);
        }
    }
}

/// A standalone HTML document for `view`.
pub fn render_document(view: &PageView) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (TITLE) }
            }
            body { (view) }
        }
    }
}
