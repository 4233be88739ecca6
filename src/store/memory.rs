use std::sync::{Mutex, MutexGuard};

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{apply_patch, prepare_create, RecordStore, StoreError, StoreFilter};
use crate::model::Record;
use crate::AppResult;

/// Keeps records in insertion order behind a mutex.
#[derive(Debug)]
pub struct MemoryStore<T> {
    records: Mutex<Vec<T>>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        MemoryStore {
            records: Mutex::new(Vec::new()),
        }
    }
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<T>) -> Self {
        MemoryStore {
            records: Mutex::new(records),
        }
    }

    /// Every stored record, inactive ones included.
    pub fn snapshot(&self) -> Vec<T> {
        self.records
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn guard(&self) -> Result<MutexGuard<'_, Vec<T>>, StoreError> {
        self.records.lock().map_err(|_| StoreError::Unavailable)
    }
}

impl<T> RecordStore<T> for MemoryStore<T>
where
    T: Record + Serialize + DeserializeOwned,
{
    fn list<'a>(&'a self, filter: &'a StoreFilter) -> BoxFuture<'a, AppResult<Vec<T>>> {
        async move {
            let guard = self.guard()?;
            Ok(guard.iter().filter(|r| filter.matches(*r)).cloned().collect())
        }
        .boxed()
    }

    fn create(&self, record: T) -> BoxFuture<'_, AppResult<T>> {
        async move {
            let mut guard = self.guard()?;
            let record = prepare_create(record, &guard)?;
            guard.push(record.clone());
            Ok(record)
        }
        .boxed()
    }

    fn update<'a>(&'a self, id: &'a str, patch: Map<String, Value>) -> BoxFuture<'a, AppResult<()>> {
        async move {
            let mut guard = self.guard()?;
            let slot = guard
                .iter_mut()
                .find(|r| r.id() == id)
                .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
            *slot = apply_patch(slot, patch)?;
            Ok(())
        }
        .boxed()
    }

    fn delete<'a>(&'a self, id: &'a str) -> BoxFuture<'a, AppResult<()>> {
        async move {
            let mut guard = self.guard()?;
            let before = guard.len();
            guard.retain(|r| r.id() != id);
            if guard.len() == before {
                return Err(StoreError::NotFound { id: id.to_string() }.into());
            }
            Ok(())
        }
        .boxed()
    }
}
