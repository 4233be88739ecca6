use std::ffi::OsString;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{apply_patch, prepare_create, RecordStore, StoreError, StoreFilter};
use crate::model::Record;
use crate::AppResult;

const PARTIAL_SUFFIX: &str = ".partial";

/// One JSON array file per entity, rewritten atomically on every mutation.
#[derive(Debug)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T>
where
    T: Record + Serialize + DeserializeOwned,
{
    /// Store file `<dir>/<entity>.json`, e.g. `suppliers.json`.
    pub fn open(dir: impl AsRef<Path>) -> Self {
        let path = dir.as_ref().join(format!("{}.json", T::KIND.plural()));
        JsonFileStore {
            path,
            lock: Mutex::new(()),
            _records: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<T>, StoreError> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        serde_json::from_slice(&data).map_err(|source| {
            warn!(
                target: "estatebook",
                event = "store_file_corrupt",
                entity = %T::KIND,
                line = source.line()
            );
            StoreError::Corrupt { source }
        })
    }

    async fn write_all(&self, records: &[T]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let data = serde_json::to_vec_pretty(records).map_err(|source| StoreError::Corrupt { source })?;
        let mut tmp = OsString::from(self.path.as_os_str());
        tmp.push(PARTIAL_SUFFIX);
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, data).await?;
        if let Err(err) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err.into());
        }
        debug!(
            target: "estatebook",
            event = "store_file_written",
            entity = %T::KIND,
            records = records.len()
        );
        Ok(())
    }
}

impl<T> RecordStore<T> for JsonFileStore<T>
where
    T: Record + Serialize + DeserializeOwned,
{
    fn list<'a>(&'a self, filter: &'a StoreFilter) -> BoxFuture<'a, AppResult<Vec<T>>> {
        async move {
            let _guard = self.lock.lock().await;
            let records = self.read_all().await?;
            Ok(records.into_iter().filter(|r| filter.matches(r)).collect())
        }
        .boxed()
    }

    fn create(&self, record: T) -> BoxFuture<'_, AppResult<T>> {
        async move {
            let _guard = self.lock.lock().await;
            let mut records = self.read_all().await?;
            let record = prepare_create(record, &records)?;
            records.push(record.clone());
            self.write_all(&records).await?;
            Ok(record)
        }
        .boxed()
    }

    fn update<'a>(&'a self, id: &'a str, patch: Map<String, Value>) -> BoxFuture<'a, AppResult<()>> {
        async move {
            let _guard = self.lock.lock().await;
            let mut records = self.read_all().await?;
            let slot = records
                .iter_mut()
                .find(|r| r.id() == id)
                .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
            *slot = apply_patch(slot, patch)?;
            self.write_all(&records).await?;
            Ok(())
        }
        .boxed()
    }

    fn delete<'a>(&'a self, id: &'a str) -> BoxFuture<'a, AppResult<()>> {
        async move {
            let _guard = self.lock.lock().await;
            let mut records = self.read_all().await?;
            let before = records.len();
            records.retain(|r| r.id() != id);
            if records.len() == before {
                return Err(StoreError::NotFound { id: id.to_string() }.into());
            }
            self.write_all(&records).await?;
            Ok(())
        }
        .boxed()
    }
}
