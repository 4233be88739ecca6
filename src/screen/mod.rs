//! Per-entity list screen: table state, soft delete and the CSV import flow.
//!
//! An [`EntityScreen`] owns the in-memory record list and is mutated only
//! through its methods. Store failures are turned into notifications and
//! returned to the caller; nothing is retried.

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};
use ts_rs::TS;

use crate::error::codes;
use crate::export::{self, ExportFormat};
use crate::import::{self, ImportIssue, ImportSummary, ImportValidationResult, Importable};
use crate::notify::{Notification, NotificationKind, Notifier};
use crate::model::Record;
use crate::store::{RecordStore, StoreFilter};
use crate::table::{RenderedTable, RowAction, TableConfig, TableState};
use crate::{time, AppError, AppResult};

mod columns;

pub use columns::ScreenColumns;

pub const ARCHIVE_ACTION: &str = "archive";
pub const RESTORE_ACTION: &str = "restore";

/// A lifecycle change asked for by a row action handler.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Requested {
    Archive(String),
    Restore(String),
}

type Requests = Arc<Mutex<Vec<Requested>>>;

fn requester<T: Record>(
    requests: &Requests,
    make: fn(String) -> Requested,
) -> impl Fn(&T) + Send + Sync + 'static {
    let requests = Arc::clone(requests);
    move |record: &T| {
        if let Ok(mut queue) = requests.lock() {
            queue.push(make(record.id().to_string()));
        }
    }
}

/// What the user sees before confirming an import.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreview<T> {
    pub summary: ImportSummary,
    pub preview: Vec<T>,
    pub errors: Vec<ImportIssue>,
    pub warnings: Vec<ImportIssue>,
    pub can_confirm: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ImportItemFailure {
    /// Position of the record in the accepted list.
    #[ts(type = "number")]
    pub index: usize,
    pub record_id: String,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ImportConfirmReport {
    #[ts(type = "number")]
    pub created: usize,
    pub failures: Vec<ImportItemFailure>,
}

impl ImportConfirmReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct EntityScreen<T> {
    store: Arc<dyn RecordStore<T>>,
    notifier: Arc<dyn Notifier>,
    table: TableConfig<T>,
    state: TableState,
    records: Vec<T>,
    loading: bool,
    building_id: Option<String>,
    user_id: Option<String>,
    show_archived: bool,
    pending: Option<ImportValidationResult<T>>,
    requests: Requests,
}

impl<T> EntityScreen<T>
where
    T: Importable + ScreenColumns + DeserializeOwned,
{
    pub fn new(store: Arc<dyn RecordStore<T>>, notifier: Arc<dyn Notifier>) -> Self {
        let requests = Requests::default();
        let table = TableConfig::new(T::columns())
            .with_empty_message(format!("No {} found.", T::KIND.plural()))
            .with_action(
                RowAction::new(ARCHIVE_ACTION, "Archive", requester(&requests, Requested::Archive))
                    .enabled_when(T::is_active),
            )
            .with_action(
                RowAction::new(RESTORE_ACTION, "Restore", requester(&requests, Requested::Restore))
                    .enabled_when(|record: &T| !record.is_active()),
            );
        EntityScreen {
            store,
            notifier,
            table,
            state: TableState::default(),
            records: Vec::new(),
            loading: false,
            building_id: None,
            user_id: None,
            show_archived: false,
            pending: None,
            requests,
        }
    }

    pub fn with_building(mut self, building_id: impl Into<String>) -> Self {
        self.building_id = Some(building_id.into());
        self
    }

    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.table = self.table.with_page_size(page_size);
        self
    }

    pub fn table(&self) -> &TableConfig<T> {
        &self.table
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    /// Every loaded record, archived ones included.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn pending_import(&self) -> Option<&ImportValidationResult<T>> {
        self.pending.as_ref()
    }

    /// Replaces the in-memory list with the store's records for this building.
    pub async fn load(&mut self) -> AppResult<()> {
        let filter = StoreFilter {
            building_id: self.building_id.clone(),
            include_inactive: true,
        };
        self.loading = true;
        let result = self.store.list(&filter).await;
        self.loading = false;
        match result {
            Ok(records) => {
                info!(
                    target: "estatebook",
                    event = "screen_loaded",
                    entity = %T::KIND,
                    records = records.len()
                );
                self.records = records;
                Ok(())
            }
            Err(err) => {
                self.report_failure(&format!("Could not load {}", T::KIND.plural()), &err);
                Err(err)
            }
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.state.set_query(query);
    }

    pub fn toggle_sort(&mut self, key: &str) {
        self.state.toggle_sort(&self.table.columns, key);
    }

    pub fn set_page(&mut self, page: usize) {
        self.state.set_page(page);
    }

    pub fn show_archived(&mut self, show: bool) {
        self.show_archived = show;
        self.state.set_page(1);
    }

    /// Records the table is built from: active only unless archived are shown.
    pub fn visible(&self) -> Vec<T> {
        self.records
            .iter()
            .filter(|record| self.show_archived || record.is_active())
            .cloned()
            .collect()
    }

    pub fn render(&self) -> RenderedTable {
        self.table.render(&self.visible(), &self.state, self.loading)
    }

    /// The current search and sort, all pages, under the import headers.
    pub fn export_csv(&self) -> String {
        let visible = self.visible();
        let rows = self.table.filtered_sorted(&visible, &self.state);
        export::serialize(rows, Some(T::HEADERS))
    }

    pub fn export_json(&self) -> AppResult<String> {
        let visible = self.visible();
        export::serialize_json(self.table.filtered_sorted(&visible, &self.state))
    }

    pub fn export(&self, format: ExportFormat) -> AppResult<String> {
        match format {
            ExportFormat::Csv => Ok(self.export_csv()),
            ExportFormat::Json => self.export_json(),
        }
    }

    pub fn export_filename(&self, building_name: Option<&str>, format: ExportFormat) -> String {
        export::export_filename(T::KIND, building_name, time::today(), format.extension())
    }

    /// Parses and validates `text`, holding the result until confirmed.
    pub fn begin_import(&mut self, text: &str) -> AppResult<ImportPreview<T>> {
        let mut result = match import::import_text::<T>(text) {
            Ok(result) => result,
            Err(err) => {
                self.report_failure("Import failed", &err);
                return Err(err);
            }
        };
        for record in &mut result.valid {
            record.set_building(self.building_id.clone());
        }
        let preview = ImportPreview {
            summary: result.summary(),
            preview: result.preview().to_vec(),
            errors: result.errors.clone(),
            warnings: result.warnings.clone(),
            can_confirm: result.can_confirm(),
        };
        self.pending = Some(result);
        Ok(preview)
    }

    pub fn cancel_import(&mut self) {
        self.pending = None;
    }

    /// Creates every accepted record in order.
    ///
    /// A blocked import stays pending so it can be inspected; any other
    /// outcome clears it.
    pub async fn confirm_import(&mut self) -> AppResult<ImportConfirmReport> {
        let Some(pending) = self.pending.as_ref() else {
            return Err(AppError::new(
                codes::IMPORT_NOTHING_PENDING,
                "There is no import waiting for confirmation",
            ));
        };
        if !pending.can_confirm() {
            let summary = pending.summary();
            return Err(AppError::new(
                codes::IMPORT_BLOCKED,
                format!(
                    "Fix the {} error(s) before importing {}",
                    summary.errors,
                    T::KIND.plural()
                ),
            )
            .with_context("errors", summary.errors.to_string())
            .with_context("valid", summary.valid.to_string()));
        }
        let Some(pending) = self.pending.take() else {
            return Ok(ImportConfirmReport::default());
        };

        let mut report = ImportConfirmReport::default();
        for (index, record) in pending.valid.into_iter().enumerate() {
            let record_id = record.id().to_string();
            match self.store.create(record).await {
                Ok(created) => {
                    self.records.push(created);
                    report.created += 1;
                }
                Err(err) => {
                    warn!(
                        target: "estatebook",
                        event = "import_item_failed",
                        entity = %T::KIND,
                        index,
                        record_id = %record_id,
                        code = %err.code()
                    );
                    report.failures.push(ImportItemFailure {
                        index,
                        record_id,
                        code: err.code().to_string(),
                        message: err.message().to_string(),
                    });
                }
            }
        }

        info!(
            target: "estatebook",
            event = "import_confirmed",
            entity = %T::KIND,
            created = report.created,
            failed = report.failures.len()
        );
        self.notify(self.confirm_notification(&report));
        Ok(report)
    }

    fn confirm_notification(&self, report: &ImportConfirmReport) -> Notification {
        let plural = T::KIND.plural();
        let failed = report.failures.len();
        if failed == 0 {
            Notification::new(
                NotificationKind::Success,
                "Import complete",
                format!("Imported {} {plural}", report.created),
            )
        } else if report.created == 0 {
            Notification::new(
                NotificationKind::Error,
                "Import failed",
                format!("None of the {failed} {plural} could be saved"),
            )
        } else {
            Notification::new(
                NotificationKind::Warning,
                "Import partially complete",
                format!("Imported {} {plural}, {failed} failed", report.created),
            )
        }
    }

    /// Soft delete: the record stays in the store with `isActive = false`.
    pub async fn archive(&mut self, id: &str) -> AppResult<()> {
        self.set_active(id, false).await
    }

    pub async fn restore(&mut self, id: &str) -> AppResult<()> {
        self.set_active(id, true).await
    }

    /// Runs a row action by key, honouring its enabled predicate, then
    /// applies whatever its handler requested.
    pub async fn perform(&mut self, action_key: &str, id: &str) -> AppResult<()> {
        let position = self.position(id)?;
        self.take_requests();
        self.table.trigger(action_key, &self.records[position])?;
        for request in self.take_requests() {
            match request {
                Requested::Archive(id) => self.archive(&id).await?,
                Requested::Restore(id) => self.restore(&id).await?,
            }
        }
        Ok(())
    }

    async fn set_active(&mut self, id: &str, active: bool) -> AppResult<()> {
        let position = self.position(id)?;
        let mut patch = Map::new();
        patch.insert("isActive".into(), Value::Bool(active));
        if let Err(err) = self.store.update(id, patch).await {
            let title = if active { "Restore failed" } else { "Archive failed" };
            self.report_failure(title, &err);
            return Err(err);
        }
        let record = &mut self.records[position];
        record.set_active(active);
        record.touch(time::now_ms());
        let label = record.label();
        let event = if active { "record_restored" } else { "record_archived" };
        info!(
            target: "estatebook",
            event = event,
            entity = %T::KIND,
            id = id
        );
        let verb = if active { "restored" } else { "archived" };
        self.notify(Notification::new(
            NotificationKind::Success,
            format!("Record {verb}"),
            format!("{label} was {verb}"),
        ));
        Ok(())
    }

    fn take_requests(&self) -> Vec<Requested> {
        match self.requests.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(_) => Vec::new(),
        }
    }

    fn position(&self, id: &str) -> AppResult<usize> {
        self.records
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| {
                AppError::new(
                    codes::SCREEN_RECORD_MISSING,
                    format!("No {} with this id is loaded", T::KIND.singular()),
                )
                .with_context("id", id)
            })
    }

    fn report_failure(&self, title: &str, err: &AppError) {
        self.notify(Notification::new(
            NotificationKind::Error,
            title,
            format!("{} ({})", err.message(), err.code()),
        ));
    }

    fn notify(&self, notification: Notification) {
        self.notifier.notify(notification.for_user(self.user_id.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Record, Supplier};
    use crate::notify::MemoryNotifier;
    use crate::store::MemoryStore;
    use crate::table::TableBody;

    fn screen(
        records: Vec<Supplier>,
    ) -> (EntityScreen<Supplier>, Arc<MemoryStore<Supplier>>, Arc<MemoryNotifier>) {
        let store = Arc::new(MemoryStore::with_records(records));
        let notifier = Arc::new(MemoryNotifier::new());
        let screen = EntityScreen::new(store.clone(), notifier.clone()).for_user("u1");
        (screen, store, notifier)
    }

    fn supplier(id: &str, name: &str) -> Supplier {
        let mut s = Supplier::new(name, &format!("{}@example.com", name.to_lowercase()));
        s.stamp(id.to_string(), 1);
        s
    }

    #[tokio::test]
    async fn archive_hides_and_restore_returns() {
        let (mut screen, store, notifier) = screen(vec![supplier("s1", "Acme"), supplier("s2", "Bolt")]);
        screen.load().await.expect("load");
        screen.archive("s1").await.expect("archive");

        let TableBody::Rows { rows } = screen.render().body else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "s2");
        assert!(!store.snapshot()[0].is_active());

        screen.show_archived(true);
        screen.perform(RESTORE_ACTION, "s1").await.expect("restore");
        assert!(screen.records()[0].is_active());

        let sent = notifier.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].user_id.as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn perform_applies_only_the_triggered_request() {
        let (mut screen, store, _) = screen(vec![supplier("s1", "Acme"), supplier("s2", "Bolt")]);
        screen.load().await.expect("load");

        // A bare trigger queues a request that nothing applies.
        let first = screen.records()[0].clone();
        screen.table().trigger(ARCHIVE_ACTION, &first).expect("trigger");

        screen.perform(ARCHIVE_ACTION, "s2").await.expect("archive");
        let active: Vec<bool> = store.snapshot().iter().map(|s| s.is_active()).collect();
        assert_eq!(active, [true, false]);
        assert!(screen.take_requests().is_empty());
    }

    #[tokio::test]
    async fn disabled_action_is_refused() {
        let (mut screen, _, _) = screen(vec![supplier("s1", "Acme")]);
        screen.load().await.expect("load");
        let err = screen.perform(RESTORE_ACTION, "s1").await.unwrap_err();
        assert_eq!(err.code(), codes::TABLE_ACTION_DISABLED);
        let err = screen.archive("nope").await.unwrap_err();
        assert_eq!(err.code(), codes::SCREEN_RECORD_MISSING);
    }

    #[tokio::test]
    async fn import_assigns_building_and_persists() {
        let (screen, store, notifier) = screen(Vec::new());
        let mut screen = screen.with_building("b1");
        let preview = screen
            .begin_import("Name,Email\nAcme,ops@acme.example\nBolt,hi@bolt.example")
            .expect("preview");
        assert!(preview.can_confirm);
        assert_eq!(preview.summary.valid, 2);

        let report = screen.confirm_import().await.expect("confirm");
        assert_eq!(report.created, 2);
        assert!(report.is_complete());
        assert!(screen.pending_import().is_none());
        assert!(store
            .snapshot()
            .iter()
            .all(|s| s.building_id() == Some("b1") && s.id().starts_with("supplier-import-")));
        assert_eq!(notifier.sent()[0].kind, NotificationKind::Success);
    }

    #[tokio::test]
    async fn confirm_without_pending_import_fails() {
        let (mut screen, _, _) = screen(Vec::new());
        let err = screen.confirm_import().await.unwrap_err();
        assert_eq!(err.code(), codes::IMPORT_NOTHING_PENDING);
    }
}
