//! Error type shared by the library and the CLI.
//!
//! Every failure carries a namespaced code from [`codes`] (`IMPORT/PARSE`,
//! `STORE/NOT_FOUND`, ...) so a caller can branch on it, plus a message that
//! is safe to show in a notification.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod codes;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AppError {
    pub code: String,
    pub message: String,
    /// Record ids, file lines and similar details. Never cell contents.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    #[ts(optional, as = "Option<BTreeMap<String, String>>")]
    pub context: BTreeMap<String, String>,
    /// The lower-level failure, when one layer wraps another.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub cause: Option<Box<AppError>>,
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            cause: None,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &BTreeMap<String, String> {
        &self.context
    }

    pub fn cause(&self) -> Option<&AppError> {
        self.cause.as_deref()
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn with_cause(mut self, cause: impl Into<AppError>) -> Self {
        self.cause = Some(Box::new(cause.into()));
        self
    }
}

/// `[CODE] message (key=value, ...)`; the context part is omitted when empty.
impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if self.context.is_empty() {
            return Ok(());
        }
        let pairs: Vec<String> = self
            .context
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        write!(f, " ({})", pairs.join(", "))
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

// io codes keep the kind so a missing file reads as `IO/NotFound`.
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let app = AppError::new(format!("IO/{:?}", err.kind()), err.to_string());
        match err.raw_os_error() {
            Some(os) => app.with_context("os_code", os.to_string()),
            None => app,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        let code = match err.classify() {
            Category::Data => codes::JSON_DATA,
            Category::Syntax => codes::JSON_SYNTAX,
            Category::Eof => codes::JSON_EOF,
            Category::Io => codes::JSON_IO,
        };
        let (line, column) = (err.line(), err.column());
        let app = AppError::new(code, err.to_string());
        if line == 0 {
            return app;
        }
        app.with_context("line", line.to_string())
            .with_context("column", column.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|pos| pos.line());
        let message = err.to_string();
        let app = match err.into_kind() {
            csv::ErrorKind::Io(io) => AppError::new(codes::IMPORT_UNREADABLE, message).with_cause(io),
            csv::ErrorKind::Utf8 { .. } => AppError::new(codes::IMPORT_UNREADABLE, message),
            _ => AppError::new(codes::IMPORT_PARSE, message),
        };
        match line {
            Some(line) => app.with_context("line", line.to_string()),
            None => app,
        }
    }
}
