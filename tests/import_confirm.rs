#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use estatebook_lib::error::codes;
use estatebook_lib::notify::{MemoryNotifier, NotificationKind};
use estatebook_lib::screen::EntityScreen;
use estatebook_lib::store::{MemoryStore, RecordStore, StoreError, StoreFilter};
use estatebook_lib::table::TableBody;
use estatebook_lib::{AppResult, Person, Record};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{Map, Value};

/// Refuses to create people whose name is in `reject`.
struct PickyStore {
    inner: MemoryStore<Person>,
    reject: Vec<&'static str>,
}

impl RecordStore<Person> for PickyStore {
    fn list<'a>(&'a self, filter: &'a StoreFilter) -> BoxFuture<'a, AppResult<Vec<Person>>> {
        self.inner.list(filter)
    }

    fn create(&self, record: Person) -> BoxFuture<'_, AppResult<Person>> {
        if self.reject.contains(&record.name.as_str()) {
            let refused: AppResult<Person> = Err(StoreError::Unavailable.into());
            return async move { refused }.boxed();
        }
        self.inner.create(record)
    }

    fn update<'a>(&'a self, id: &'a str, patch: Map<String, Value>) -> BoxFuture<'a, AppResult<()>> {
        self.inner.update(id, patch)
    }

    fn delete<'a>(&'a self, id: &'a str) -> BoxFuture<'a, AppResult<()>> {
        self.inner.delete(id)
    }
}

const FOUR_PEOPLE: &str = "Name,Email,Flat Number\n\
                           Ada,ada@example.com,1A\n\
                           Bob,bob@example.com,1B\n\
                           Cy,cy@example.com,2A\n\
                           Di,di@example.com,2B";

#[tokio::test]
async fn confirm_is_blocked_while_errors_remain() {
    let store = Arc::new(MemoryStore::<Person>::new());
    let notifier = Arc::new(MemoryNotifier::new());
    let mut screen = EntityScreen::new(store.clone(), notifier.clone());

    let preview = screen
        .begin_import("Name,Email\nAda,ada@example.com\nBob,nope")
        .unwrap();
    assert!(!preview.can_confirm);
    assert_eq!(preview.summary.valid, 1);
    assert_eq!(preview.summary.errors, 1);

    let err = screen.confirm_import().await.unwrap_err();
    assert_eq!(err.code(), codes::IMPORT_BLOCKED);
    assert!(screen.pending_import().is_some());
    assert!(store.snapshot().is_empty());
    assert!(notifier.sent().is_empty());

    screen.cancel_import();
    assert!(screen.pending_import().is_none());
}

#[tokio::test]
async fn per_item_failures_are_reported_with_record_ids() {
    let store = Arc::new(PickyStore {
        inner: MemoryStore::new(),
        reject: vec!["Bob", "Di"],
    });
    let notifier = Arc::new(MemoryNotifier::new());
    let mut screen = EntityScreen::new(store.clone(), notifier.clone()).for_user("manager-1");

    let preview = screen.begin_import(FOUR_PEOPLE).unwrap();
    assert_eq!(preview.preview.len(), 4);
    let expected_ids: Vec<String> = preview.preview.iter().map(|p| p.id().to_string()).collect();

    let report = screen.confirm_import().await.unwrap();
    assert_eq!(report.created, 2);
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.failures[0].index, 1);
    assert_eq!(report.failures[0].record_id, expected_ids[1]);
    assert_eq!(report.failures[1].index, 3);
    assert_eq!(report.failures[1].code, codes::STORE_UNAVAILABLE);

    let names: Vec<&str> = screen.records().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Ada", "Cy"]);
    assert_eq!(store.inner.snapshot().len(), 2);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, NotificationKind::Warning);
    assert_eq!(sent[0].user_id.as_deref(), Some("manager-1"));
}

#[tokio::test]
async fn imported_people_show_up_in_the_table() {
    let store = Arc::new(MemoryStore::<Person>::new());
    let notifier = Arc::new(MemoryNotifier::new());
    let mut screen = EntityScreen::new(store.clone(), notifier).with_page_size(3);

    screen.begin_import(FOUR_PEOPLE).unwrap();
    screen.confirm_import().await.unwrap();

    let rendered = screen.render();
    assert_eq!(rendered.page.total, 4);
    assert_eq!(rendered.page.page_count, 2);

    screen.set_query("cy@");
    let TableBody::Rows { rows } = screen.render().body else {
        panic!("expected rows");
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].cells[0], "Cy");

    let mut reloaded = EntityScreen::new(store, Arc::new(MemoryNotifier::new()));
    reloaded.load().await.unwrap();
    assert_eq!(reloaded.records().len(), 4);
}

#[tokio::test]
async fn archived_records_leave_the_default_view_and_export() {
    let store = Arc::new(MemoryStore::<Person>::new());
    let mut screen = EntityScreen::new(store.clone(), Arc::new(MemoryNotifier::new()));
    screen.begin_import(FOUR_PEOPLE).unwrap();
    screen.confirm_import().await.unwrap();

    let bob = screen.records()[1].id().to_string();
    screen.perform("archive", &bob).await.unwrap();

    assert_eq!(screen.render().page.total, 3);
    assert!(!screen.export_csv().contains("bob@example.com"));
    assert_eq!(store.list(&StoreFilter::default()).await.unwrap().len(), 3);

    let err = screen.perform("archive", &bob).await.unwrap_err();
    assert_eq!(err.code(), codes::TABLE_ACTION_DISABLED);

    screen.restore(&bob).await.unwrap();
    assert_eq!(screen.render().page.total, 4);
    assert!(screen.export_csv().contains("bob@example.com"));
}

#[tokio::test]
async fn failed_archive_notifies_and_leaves_state_alone() {
    let mut ada = Person::new("Ada", "ada@example.com");
    ada.stamp("p1".into(), 1);
    let store = Arc::new(MemoryStore::with_records(vec![ada]));
    let notifier = Arc::new(MemoryNotifier::new());
    let mut screen = EntityScreen::new(store.clone(), notifier.clone());
    screen.load().await.unwrap();

    store.delete("p1").await.unwrap();
    let err = screen.archive("p1").await.unwrap_err();
    assert_eq!(err.code(), codes::STORE_NOT_FOUND);
    assert!(screen.records()[0].is_active());

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, NotificationKind::Error);
    assert!(sent[0].message.contains(codes::STORE_NOT_FOUND));
}
