//! CSV import: parse, map headers, validate rows into records.
//!
//! Validation never fails as a whole. Header problems produce a single
//! row-0 error; every data row is judged on its own and reported with its
//! spreadsheet row number (data index + 2).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use ts_rs::TS;

use crate::id::import_record_id;
use crate::model::Record;
use crate::time;

mod assets;
pub mod file;
mod flats;
pub mod parse;
mod people;
mod row;
mod suppliers;

pub use file::read_import_file;
pub use parse::parse;
pub use row::{map_headers, RowReader};

/// Number of accepted records shown before confirmation.
pub const PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ImportIssue {
    /// 0 for header problems, otherwise the 1-based spreadsheet row.
    #[ts(type = "number")]
    pub row: usize,
    pub field: String,
    pub message: String,
    #[ts(type = "unknown")]
    pub data: Value,
}

impl ImportIssue {
    pub fn new(row: usize, field: &str, message: impl Into<String>, data: Value) -> Self {
        ImportIssue {
            row,
            field: field.to_string(),
            message: message.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ImportSummary {
    #[ts(type = "number")]
    pub valid: usize,
    #[ts(type = "number")]
    pub errors: usize,
    #[ts(type = "number")]
    pub warnings: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportValidationResult<T> {
    pub valid: Vec<T>,
    pub errors: Vec<ImportIssue>,
    pub warnings: Vec<ImportIssue>,
}

impl<T> Default for ImportValidationResult<T> {
    fn default() -> Self {
        ImportValidationResult {
            valid: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl<T> ImportValidationResult<T> {
    /// Warnings alone never block confirmation.
    pub fn can_confirm(&self) -> bool {
        self.errors.is_empty() && !self.valid.is_empty()
    }

    pub fn summary(&self) -> ImportSummary {
        ImportSummary {
            valid: self.valid.len(),
            errors: self.errors.len(),
            warnings: self.warnings.len(),
        }
    }

    pub fn preview(&self) -> &[T] {
        &self.valid[..self.valid.len().min(PREVIEW_ROWS)]
    }
}

/// An entity that can be built from a CSV row.
pub trait Importable: Record + Serialize {
    /// `(field name, display label)` in template column order.
    const HEADERS: &'static [(&'static str, &'static str)];
    const REQUIRED: &'static [&'static str];
    /// Example values for the template, aligned with [`Importable::HEADERS`].
    const SAMPLE: &'static [&'static str];

    /// Builds the record from a row whose required cells are present.
    /// Problems are reported through the reader.
    fn from_row(row: &mut RowReader<'_>) -> Self;
}

pub fn validate<T: Importable>(rows: &[Vec<String>]) -> ImportValidationResult<T> {
    validate_with_required(rows, T::REQUIRED)
}

pub fn validate_with_required<T: Importable>(
    rows: &[Vec<String>],
    required: &[&str],
) -> ImportValidationResult<T> {
    let mut result = ImportValidationResult::default();
    let header = rows.first().map(Vec::as_slice).unwrap_or_default();
    let columns = map_headers(header, T::HEADERS);

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|field| !columns.contains_key(field))
        .collect();
    if !missing.is_empty() {
        let labels: Vec<String> = missing
            .iter()
            .map(|field| row::label_for(T::HEADERS, field))
            .collect();
        let message = if labels.len() == 1 {
            format!("Missing required column: {}", labels[0])
        } else {
            format!("Missing required columns: {}", labels.join(", "))
        };
        result.errors.push(ImportIssue::new(
            0,
            &missing.join(","),
            message,
            Value::from(header.to_vec()),
        ));
        info!(
            target: "estatebook",
            event = "import_header_rejected",
            entity = %T::KIND,
            missing = %missing.join(",")
        );
        return result;
    }

    let now = time::now_ms();
    for (idx, cells) in rows.iter().enumerate().skip(1) {
        let mut reader = RowReader::new(idx + 1, cells, &columns, T::HEADERS);
        for field in required {
            reader.require(field);
        }
        let mut record = T::from_row(&mut reader);
        let rejected = reader.has_errors();
        let (errors, warnings) = reader.into_issues();
        result.errors.extend(errors);
        if rejected {
            continue;
        }
        result.warnings.extend(warnings);
        record.stamp(import_record_id(T::KIND.singular()), now);
        result.valid.push(record);
    }

    let summary = result.summary();
    info!(
        target: "estatebook",
        event = "import_validated",
        entity = %T::KIND,
        valid = summary.valid,
        errors = summary.errors,
        warnings = summary.warnings
    );
    result
}

/// Parses CSV text and validates it in one step.
pub fn import_text<T: Importable>(text: &str) -> crate::AppResult<ImportValidationResult<T>> {
    let rows = parse(text)?;
    Ok(validate(&rows))
}
