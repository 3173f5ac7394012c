//! Transient UI state of the student page.
//!
//! Holds the creation draft, the single optional edit session, the
//! submitting flag and form visibility. Nothing here talks to the network;
//! the page's command handlers drive these transitions.

use crate::types::{Draft, Field, Student, StudentId};

/// The record currently rendered as inline inputs, and its unsaved values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub id: StudentId,
    pub draft: Draft,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentStore {
    new_draft: Draft,
    edit: Option<EditSession>,
    submitting: bool,
    form_visible: bool,
}

impl StudentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_draft(&self) -> &Draft {
        &self.new_draft
    }

    pub fn edit(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn edit_id(&self) -> Option<&StudentId> {
        self.edit.as_ref().map(|e| &e.id)
    }

    pub fn is_editing(&self, id: &StudentId) -> bool {
        self.edit_id() == Some(id)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_form_visible(&self) -> bool {
        self.form_visible
    }

    pub fn open_form(&mut self) {
        self.form_visible = true;
    }

    /// Hide the creation form; the draft is discarded.
    pub fn close_form(&mut self) {
        self.form_visible = false;
        self.new_draft = Draft::default();
    }

    pub fn set_new_field(&mut self, field: Field, value: impl Into<String>) {
        self.new_draft.set(field, value);
    }

    pub(crate) fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }

    /// Start editing `student`, replacing any session already open.
    pub fn begin_edit(&mut self, student: &Student) {
        self.edit = Some(EditSession {
            id: student.id.clone(),
            draft: Draft::from(student),
        });
    }

    /// Returns `false` when no record is in edit mode.
    pub fn set_edit_field(&mut self, field: Field, value: impl Into<String>) -> bool {
        match self.edit.as_mut() {
            Some(session) => {
                session.draft.set(field, value);
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: &str, name: &str) -> Student {
        Student {
            id: StudentId::new(id),
            name: name.to_string(),
            email: format!("{}@x.com", name.to_lowercase()),
            age: serde_json::Number::from(20u32),
        }
    }

    #[test]
    fn closing_form_resets_draft() {
        let mut store = StudentStore::new();
        store.open_form();
        store.set_new_field(Field::Name, "Ann");
        assert!(store.is_form_visible());
        assert_eq!(store.new_draft().name, "Ann");

        store.close_form();
        assert!(!store.is_form_visible());
        assert!(store.new_draft().is_empty());
    }

    #[test]
    fn editing_another_record_replaces_session() {
        let mut store = StudentStore::new();
        let ann = student("a", "Ann");
        let bob = student("b", "Bob");

        store.begin_edit(&ann);
        store.set_edit_field(Field::Name, "Annie");
        store.begin_edit(&bob);

        let session = store.edit().unwrap();
        assert_eq!(session.id, bob.id);
        assert_eq!(session.draft.name, "Bob");
        assert!(!store.is_editing(&ann.id));
        assert!(store.is_editing(&bob.id));
    }

    #[test]
    fn cancel_edit_clears_session() {
        let mut store = StudentStore::new();
        store.begin_edit(&student("a", "Ann"));
        store.cancel_edit();
        assert!(store.edit().is_none());
        assert!(!store.set_edit_field(Field::Age, "30"));
    }

    #[test]
    fn edit_and_creation_drafts_are_independent() {
        let mut store = StudentStore::new();
        store.set_new_field(Field::Email, "new@x.com");
        store.begin_edit(&student("a", "Ann"));
        assert!(store.set_edit_field(Field::Email, "edited@x.com"));

        assert_eq!(store.new_draft().email, "new@x.com");
        assert_eq!(store.edit().unwrap().draft.email, "edited@x.com");
    }
}
