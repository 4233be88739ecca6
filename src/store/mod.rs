//! Record persistence seam.
//!
//! Screens talk to a [`RecordStore`] and never to a concrete backend. Every
//! call is independently fallible and there are no transactions.

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::codes;
use crate::model::Record;
use crate::{time, AppError, AppResult};

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound { id: String },
    #[error("a record with this id already exists")]
    Conflict { id: String },
    #[error("store file could not be decoded")]
    Corrupt {
        #[source]
        source: serde_json::Error,
    },
    #[error("patch rejected: {reason}")]
    InvalidPatch { id: String, reason: String },
    #[error("store is unavailable")]
    Unavailable,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        let message = error.to_string();
        match error {
            StoreError::NotFound { id } => {
                AppError::new(codes::STORE_NOT_FOUND, message).with_context("id", id)
            }
            StoreError::Conflict { id } => {
                AppError::new(codes::STORE_CONFLICT, message).with_context("id", id)
            }
            StoreError::Corrupt { source } => {
                AppError::new(codes::STORE_CORRUPT, message).with_cause(AppError::from(source))
            }
            StoreError::InvalidPatch { id, .. } => {
                AppError::new(codes::STORE_INVALID_PATCH, message).with_context("id", id)
            }
            StoreError::Unavailable => AppError::new(codes::STORE_UNAVAILABLE, message),
            StoreError::Io(io) => AppError::new(codes::STORE_UNAVAILABLE, message)
                .with_cause(AppError::from(io)),
        }
    }
}

/// Which records a list call returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreFilter {
    pub building_id: Option<String>,
    pub include_inactive: bool,
}

impl StoreFilter {
    pub fn building(building_id: impl Into<String>) -> Self {
        StoreFilter {
            building_id: Some(building_id.into()),
            include_inactive: false,
        }
    }

    pub fn with_inactive(mut self) -> Self {
        self.include_inactive = true;
        self
    }

    pub fn matches<T: Record>(&self, record: &T) -> bool {
        if !self.include_inactive && !record.is_active() {
            return false;
        }
        match &self.building_id {
            Some(wanted) => record.building_id() == Some(wanted.as_str()),
            None => true,
        }
    }
}

pub trait RecordStore<T: Record>: Send + Sync {
    fn list<'a>(&'a self, filter: &'a StoreFilter) -> BoxFuture<'a, AppResult<Vec<T>>>;

    /// Persists a new record. Records without an id receive one.
    fn create(&self, record: T) -> BoxFuture<'_, AppResult<T>>;

    /// Merges a camelCase field patch into the stored record.
    fn update<'a>(&'a self, id: &'a str, patch: Map<String, Value>) -> BoxFuture<'a, AppResult<()>>;

    /// Removes the record outright; soft deletion is an `isActive` patch.
    fn delete<'a>(&'a self, id: &'a str) -> BoxFuture<'a, AppResult<()>>;
}

pub(crate) fn prepare_create<T: Record>(mut record: T, existing: &[T]) -> Result<T, StoreError> {
    if record.id().is_empty() {
        record.stamp(crate::id::new_uuid_v7(), time::now_ms());
    }
    if existing.iter().any(|r| r.id() == record.id()) {
        return Err(StoreError::Conflict {
            id: record.id().to_string(),
        });
    }
    Ok(record)
}

/// Applies `patch` to the JSON form of `record` and decodes the result.
pub(crate) fn apply_patch<T>(record: &T, patch: Map<String, Value>) -> Result<T, StoreError>
where
    T: Record + Serialize + DeserializeOwned,
{
    let id = record.id().to_string();
    let invalid = |reason: String| StoreError::InvalidPatch {
        id: id.clone(),
        reason,
    };
    if patch.get("id").is_some_and(|value| value.as_str() != Some(id.as_str())) {
        return Err(invalid("the id cannot be changed".into()));
    }
    let mut value = serde_json::to_value(record).map_err(|err| invalid(err.to_string()))?;
    let Value::Object(fields) = &mut value else {
        return Err(invalid("record is not an object".into()));
    };
    for (key, new_value) in patch {
        fields.insert(key, new_value);
    }
    fields.insert("updatedAt".into(), Value::from(time::now_ms()));
    serde_json::from_value(value).map_err(|err| invalid(err.to_string()))
}
