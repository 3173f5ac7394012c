//! The student page: UI state, cached list and the CRUD command handlers.
//!
//! # Design
//! `StudentPage` owns everything the page needs: the API adapter, the remote
//! cache, the UI store and the notifier. Handlers never touch the cached
//! list; after a successful mutation they invalidate the collection key and
//! the list is re-read from the backend. A failed mutation changes nothing
//! but the notification stream.
//!
//! Handlers block for their network step, so the submitting state only
//! exists while `create` is running. Hosts that want to draw it register a
//! `watch` listener, which receives the rebuilt view whenever the
//! submitting flag changes.

use std::fmt;

use crate::api::StudentApi;
use crate::cache::{CacheKey, RemoteCache, Snapshot, SubscriptionId};
use crate::error::ApiError;
use crate::notify::{Notification, Notifier};
use crate::store::StudentStore;
use crate::transport::Transport;
use crate::types::{Field, Student, StudentId};
use crate::view::PageView;

/// Result of a command handler, mirrored by the notification it emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Completed { message: String },
    Failed { message: String },
    /// Preconditions not met; no request was made and nothing was notified.
    Ignored,
}

type ViewListener = Box<dyn FnMut(&PageView)>;

pub struct StudentPage<T, N> {
    api: StudentApi<T>,
    cache: RemoteCache<Vec<Student>>,
    store: StudentStore,
    notifier: N,
    watchers: Vec<ViewListener>,
}

impl<T: fmt::Debug, N: fmt::Debug> fmt::Debug for StudentPage<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudentPage")
            .field("api", &self.api)
            .field("cache", &self.cache)
            .field("store", &self.store)
            .field("notifier", &self.notifier)
            .field("watchers", &self.watchers.len())
            .finish()
    }
}

impl<T: Transport, N: Notifier> StudentPage<T, N> {
    pub fn new(api: StudentApi<T>, notifier: N) -> Self {
        Self {
            api,
            cache: RemoteCache::new(),
            store: StudentStore::new(),
            notifier,
            watchers: Vec::new(),
        }
    }

    pub fn api(&self) -> &StudentApi<T> {
        &self.api
    }

    pub fn store(&self) -> &StudentStore {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn snapshot(&self) -> Option<&Snapshot<Vec<Student>>> {
        self.cache.get(CacheKey::STUDENTS)
    }

    /// Students from the last successful fetch.
    pub fn students(&self) -> &[Student] {
        self.snapshot()
            .and_then(|s| s.data.as_deref())
            .unwrap_or_default()
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&Snapshot<Vec<Student>>) + 'static,
    ) -> SubscriptionId {
        self.cache.subscribe(CacheKey::STUDENTS, listener).0
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.cache.unsubscribe(CacheKey::STUDENTS, id)
    }

    /// Receive the page view each time a submission starts or finishes.
    pub fn watch(&mut self, listener: impl FnMut(&PageView) + 'static) {
        self.watchers.push(Box::new(listener));
    }

    fn publish(&mut self) {
        if self.watchers.is_empty() {
            return;
        }
        let view = self.view();
        for watcher in &mut self.watchers {
            watcher(&view);
        }
    }

    /// Re-fetch the student list.
    pub fn refresh(&mut self) -> &Snapshot<Vec<Student>> {
        let api = &self.api;
        self.cache
            .invalidate(CacheKey::STUDENTS, |key| api.list_students_at(key.path()))
    }

    pub fn view(&self) -> PageView {
        match self.snapshot() {
            Some(snapshot) => PageView::build(snapshot, &self.store),
            None => PageView::build(&Snapshot::pending(), &self.store),
        }
    }

    pub fn open_form(&mut self) {
        self.store.open_form();
    }

    pub fn close_form(&mut self) {
        self.store.close_form();
    }

    pub fn set_new_field(&mut self, field: Field, value: impl Into<String>) {
        self.store.set_new_field(field, value);
    }

    pub fn set_edit_field(&mut self, field: Field, value: impl Into<String>) -> bool {
        self.store.set_edit_field(field, value)
    }

    /// Put the cached record `id` into edit mode. Returns `false` if the
    /// record is not in the current list.
    pub fn begin_edit(&mut self, id: &StudentId) -> bool {
        let Some(student) = self.students().iter().find(|s| &s.id == id).cloned() else {
            return false;
        };
        self.store.begin_edit(&student);
        true
    }

    /// Leave edit mode without saving. Never touches the network.
    pub fn cancel_edit(&mut self) {
        self.store.cancel_edit();
    }

    /// Submit the creation form.
    pub fn create(&mut self) -> CommandOutcome {
        if self.store.is_submitting() {
            return CommandOutcome::Ignored;
        }
        self.store.set_submitting(true);
        self.publish();
        let payload = self.store.new_draft().to_payload();
        let result = self.api.create_student(&payload);
        self.store.set_submitting(false);
        self.publish();

        match result {
            Ok(message) => {
                tracing::info!(%message, "student created");
                self.notifier.notify(Notification::success(message.clone()));
                self.store.close_form();
                self.refresh();
                CommandOutcome::Completed { message }
            }
            Err(error) => self.fail("create", &error),
        }
    }

    /// Save the record currently in edit mode.
    pub fn update(&mut self) -> CommandOutcome {
        let Some(session) = self.store.edit().cloned() else {
            return CommandOutcome::Ignored;
        };

        match self.api.update_student(&session.id, &session.draft.to_payload()) {
            Ok(message) => {
                tracing::info!(id = %session.id, %message, "student updated");
                self.notifier.notify(Notification::success(message.clone()));
                self.refresh();
                self.store.cancel_edit();
                CommandOutcome::Completed { message }
            }
            Err(error) => self.fail("update", &error),
        }
    }

    /// Delete `id` immediately; there is no confirmation step.
    pub fn delete(&mut self, id: &StudentId) -> CommandOutcome {
        match self.api.delete_student(id) {
            Ok(message) => {
                tracing::info!(%id, %message, "student deleted");
                self.notifier.notify(Notification::success(message.clone()));
                if self.store.is_editing(id) {
                    self.store.cancel_edit();
                }
                self.refresh();
                CommandOutcome::Completed { message }
            }
            Err(error) => self.fail("delete", &error),
        }
    }

    fn fail(&mut self, operation: &'static str, error: &ApiError) -> CommandOutcome {
        let message = error.user_message();
        tracing::warn!(operation, %error, "command failed");
        self.notifier.notify(Notification::error(message.clone()));
        CommandOutcome::Failed { message }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use super::*;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};
    use crate::notify::Level;
    use crate::view::{RowMode, TableView, EMPTY_TEXT};

    /// Replays canned responses in order and records every request.
    #[derive(Default)]
    struct ScriptedTransport {
        responses: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
        requests: RefCell<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        fn respond(self, status: u16, body: &str) -> Self {
            self.responses.borrow_mut().push_back(Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            }));
            self
        }

        fn fail(self, reason: &str) -> Self {
            self.responses
                .borrow_mut()
                .push_back(Err(ApiError::Transport(reason.to_string())));
            self
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.borrow().clone()
        }
    }

    impl Transport for ScriptedTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.borrow_mut().push(request.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| panic!("unexpected request: {} {}", request.method, request.url))
        }
    }

    const ANN: &str = r#"{"_id":"123","name":"Ann","email":"ann@x.com","age":20}"#;
    const BOB: &str = r#"{"_id":"456","name":"Bob","email":"bob@x.com","age":31}"#;

    fn list(students: &[&str]) -> String {
        format!(r#"{{"students":[{}]}}"#, students.join(","))
    }

    fn page(transport: ScriptedTransport) -> StudentPage<ScriptedTransport, Vec<Notification>> {
        let api = StudentApi::new("http://api.test/api/v1/students", transport);
        StudentPage::new(api, Vec::new())
    }

    fn id(raw: &str) -> StudentId {
        StudentId::new(raw)
    }

    #[test]
    fn empty_collection_shows_empty_state() {
        let mut page = page(ScriptedTransport::default().respond(200, r#"{"students":[]}"#));
        assert!(matches!(
            page.view(),
            PageView::Ready {
                table: TableView::Loading,
                ..
            }
        ));

        page.refresh();
        let view = page.view();
        assert!(view.rows().is_empty());
        assert!(view.to_string().contains(EMPTY_TEXT));
    }

    #[test]
    fn successful_create_resets_form_and_refetches() {
        let transport = ScriptedTransport::default()
            .respond(200, &list(&[]))
            .respond(201, r#"{"message":"Created"}"#)
            .respond(200, &list(&[ANN]));
        let mut page = page(transport);
        page.refresh();

        page.open_form();
        page.set_new_field(Field::Name, "Ann");
        page.set_new_field(Field::Email, "ann@x.com");
        page.set_new_field(Field::Age, "20");
        let outcome = page.create();

        assert_eq!(
            outcome,
            CommandOutcome::Completed {
                message: "Created".to_string()
            }
        );
        assert_eq!(page.notifier(), &vec![Notification::success("Created")]);
        assert!(!page.store().is_form_visible());
        assert!(page.store().new_draft().is_empty());
        assert!(!page.store().is_submitting());
        assert_eq!(page.view().rows().len(), 1);

        let requests = page.api().transport().requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[1].method, HttpMethod::Post);
        let body: serde_json::Value =
            serde_json::from_str(requests[1].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"name":"Ann","email":"ann@x.com","age":20}));
        assert_eq!(requests[2].method, HttpMethod::Get);
    }

    #[test]
    fn failed_create_keeps_form_and_draft() {
        let transport = ScriptedTransport::default()
            .respond(200, &list(&[]))
            .respond(400, r#"{"message":"Email is required"}"#);
        let mut page = page(transport);
        page.refresh();
        page.open_form();
        page.set_new_field(Field::Name, "Ann");
        let before = page.store().clone();

        let outcome = page.create();

        assert_eq!(
            outcome,
            CommandOutcome::Failed {
                message: "Email is required".to_string()
            }
        );
        assert_eq!(page.store(), &before);
        assert_eq!(page.notifier()[0].level, Level::Error);
        assert_eq!(page.api().transport().requests().len(), 2);
    }

    #[test]
    fn create_while_submitting_is_ignored() {
        let mut page = page(ScriptedTransport::default());
        page.store.set_submitting(true);
        assert_eq!(page.create(), CommandOutcome::Ignored);
        assert!(page.api().transport().requests().is_empty());
        assert!(page.notifier().is_empty());
    }

    #[test]
    fn failed_update_stays_in_edit_mode() {
        let transport = ScriptedTransport::default()
            .respond(200, &list(&[ANN]))
            .respond(409, r#"{"message":"Email taken"}"#);
        let mut page = page(transport);
        page.refresh();

        assert!(page.begin_edit(&id("123")));
        page.set_edit_field(Field::Email, "bob@x.com");
        let outcome = page.update();

        assert_eq!(
            outcome,
            CommandOutcome::Failed {
                message: "Email taken".to_string()
            }
        );
        assert_eq!(page.notifier(), &vec![Notification::error("Email taken")]);
        let session = page.store().edit().unwrap();
        assert_eq!(session.id, id("123"));
        assert_eq!(session.draft.email, "bob@x.com");
        assert!(page.view().rows()[0].is_editing());

        let requests = page.api().transport().requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].method, HttpMethod::Put);
        assert!(requests[1].url.ends_with("/123"));
    }

    #[test]
    fn successful_update_leaves_edit_mode() {
        let transport = ScriptedTransport::default()
            .respond(200, &list(&[ANN]))
            .respond(200, r#"{"message":"Updated"}"#)
            .respond(
                200,
                &list(&[r#"{"_id":"123","name":"Annie","email":"ann@x.com","age":21}"#]),
            );
        let mut page = page(transport);
        page.refresh();
        page.begin_edit(&id("123"));
        page.set_edit_field(Field::Name, "Annie");

        assert!(matches!(page.update(), CommandOutcome::Completed { .. }));
        assert!(page.store().edit().is_none());
        assert_eq!(page.students()[0].name, "Annie");
    }

    #[test]
    fn update_without_edit_session_is_ignored() {
        let mut page = page(ScriptedTransport::default());
        assert_eq!(page.update(), CommandOutcome::Ignored);
        assert!(page.api().transport().requests().is_empty());
    }

    #[test]
    fn begin_edit_on_unknown_record_is_refused() {
        let mut page = page(ScriptedTransport::default().respond(200, &list(&[ANN])));
        page.refresh();
        assert!(!page.begin_edit(&id("999")));
        assert!(page.store().edit().is_none());
    }

    #[test]
    fn switching_edit_target_replaces_session() {
        let mut page = page(ScriptedTransport::default().respond(200, &list(&[ANN, BOB])));
        page.refresh();
        page.begin_edit(&id("123"));
        page.set_edit_field(Field::Name, "changed");
        page.begin_edit(&id("456"));

        let editing: Vec<_> = page.view().rows().iter().filter(|r| r.is_editing()).cloned().collect();
        assert_eq!(editing.len(), 1);
        assert_eq!(editing[0].id, id("456"));
    }

    #[test]
    fn cancel_edit_makes_no_request() {
        let mut page = page(ScriptedTransport::default().respond(200, &list(&[ANN])));
        page.refresh();
        page.begin_edit(&id("123"));
        page.set_edit_field(Field::Name, "Changed");
        page.cancel_edit();

        assert_eq!(page.api().transport().requests().len(), 1);
        assert!(page.store().edit().is_none());
        assert!(!page.view().rows()[0].is_editing());
        assert!(page.view().to_string().contains("Ann"));
    }

    #[test]
    fn successful_delete_removes_row_after_refetch() {
        let transport = ScriptedTransport::default()
            .respond(200, &list(&[ANN, BOB]))
            .respond(200, r#"{"message":"Deleted"}"#)
            .respond(200, &list(&[BOB]));
        let mut page = page(transport);
        page.refresh();
        page.begin_edit(&id("123"));

        let outcome = page.delete(&id("123"));

        assert_eq!(
            outcome,
            CommandOutcome::Completed {
                message: "Deleted".to_string()
            }
        );
        assert!(page.students().iter().all(|s| s.id != id("123")));
        assert!(page.store().edit().is_none());
        let requests = page.api().transport().requests();
        assert_eq!(requests[1].method, HttpMethod::Delete);
        assert!(requests[1].body.is_none());
    }

    #[test]
    fn failed_delete_only_notifies() {
        let transport = ScriptedTransport::default()
            .respond(200, &list(&[ANN]))
            .fail("connection refused");
        let mut page = page(transport);
        page.refresh();
        let before = page.view();

        let outcome = page.delete(&id("123"));

        assert_eq!(
            outcome,
            CommandOutcome::Failed {
                message: "connection refused".to_string()
            }
        );
        assert_eq!(page.view(), before);
        assert_eq!(page.notifier(), &vec![Notification::error("connection refused")]);
    }

    #[test]
    fn failed_fetch_shows_error_page() {
        let mut page = page(ScriptedTransport::default().respond(500, "oops"));
        page.refresh();
        assert_eq!(
            page.view(),
            PageView::Failed {
                message: "Request failed with status code 500".to_string()
            }
        );
    }

    #[test]
    fn subscribers_follow_invalidations_until_unsubscribed() {
        let transport = ScriptedTransport::default()
            .respond(200, &list(&[ANN]))
            .respond(200, &list(&[ANN, BOB]));
        let mut page = page(transport);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let subscription = page.subscribe(move |snapshot: &Snapshot<Vec<Student>>| {
            let count = snapshot.data.as_ref().map(Vec::len);
            sink.borrow_mut().push((snapshot.is_loading, count));
        });

        page.refresh();
        assert!(page.unsubscribe(subscription));
        page.refresh();

        assert_eq!(*seen.borrow(), vec![(true, None), (false, Some(1))]);
        assert_eq!(page.students().len(), 2);
    }

    #[test]
    fn watchers_see_saving_while_create_is_in_flight() {
        let transport = ScriptedTransport::default()
            .respond(201, r#"{"message":"Created"}"#)
            .respond(200, &list(&[ANN]));
        let mut page = page(transport);
        let labels = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&labels);
        page.watch(move |view| {
            let label = view.form().map(|form| form.submit_label());
            sink.borrow_mut().push(label);
        });

        page.open_form();
        page.set_new_field(Field::Name, "Ann");
        page.create();

        assert_eq!(*labels.borrow(), vec![Some("Saving..."), Some("Submit")]);
        assert!(!page.store().is_form_visible());
    }

    #[test]
    fn fractional_age_does_not_break_the_list() {
        let odd = r#"{"_id":"789","name":"Cy","email":"cy@x.com","age":20.5}"#;
        let mut page = page(ScriptedTransport::default().respond(200, &list(&[ANN, odd])));
        page.refresh();

        let view = page.view();
        assert_eq!(view.rows().len(), 2);
        match &view.rows()[1].mode {
            RowMode::Display { age, .. } => assert_eq!(age.to_string(), "20.5"),
            other => panic!("expected display mode, got {other:?}"),
        }
        assert!(view.to_string().contains("20.5"));

        assert!(page.begin_edit(&id("789")));
        assert_eq!(page.store().edit().unwrap().draft.age, "20.5");
    }
}
