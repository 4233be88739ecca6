use std::path::Path;

use tracing::warn;

use crate::error::codes;
use crate::{AppError, AppResult};

/// Reads an uploaded import file as UTF-8 text.
///
/// The extension is checked before any bytes are read.
pub async fn read_import_file(path: impl AsRef<Path>) -> AppResult<String> {
    let path = path.as_ref();
    check_extension(path)?;

    let bytes = tokio::fs::read(path).await.map_err(|err| {
        AppError::new(codes::IMPORT_UNREADABLE, "The import file could not be read")
            .with_context("operation", "read_import_file")
            .with_cause(AppError::from(err))
    })?;

    String::from_utf8(bytes).map_err(|err| {
        warn!(
            target: "estatebook",
            event = "import_file_not_utf8",
            valid_up_to = err.utf8_error().valid_up_to()
        );
        AppError::new(
            codes::IMPORT_UNREADABLE,
            "The import file is not UTF-8 text; re-save it as CSV (UTF-8)",
        )
        .with_context("valid_up_to", err.utf8_error().valid_up_to().to_string())
    })
}

fn check_extension(path: &Path) -> AppResult<()> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("csv") => Ok(()),
        Some(ext @ ("xls" | "xlsx")) => Err(AppError::new(
            codes::IMPORT_UNSUPPORTED_FORMAT,
            "Excel workbooks cannot be imported directly; save the sheet as CSV and try again",
        )
        .with_context("extension", ext)),
        other => Err(AppError::new(
            codes::IMPORT_UNSUPPORTED_FORMAT,
            "Only .csv files can be imported",
        )
        .with_context("extension", other.unwrap_or(""))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn rejects_non_csv_before_reading() {
        let missing = Path::new("/definitely/not/here/people.xlsx");
        let err = read_import_file(missing).await.unwrap_err();
        assert_eq!(err.code(), codes::IMPORT_UNSUPPORTED_FORMAT);
        assert!(err.message().contains("save the sheet as CSV"));

        let err = read_import_file("/definitely/not/here/people.txt").await.unwrap_err();
        assert_eq!(err.code(), codes::IMPORT_UNSUPPORTED_FORMAT);
    }

    #[tokio::test]
    async fn reads_utf8_and_rejects_other_bytes() {
        let dir = tempdir().expect("tempdir");
        let good = dir.path().join("people.CSV");
        std::fs::write(&good, "Name,Email\n").expect("write");
        assert_eq!(read_import_file(&good).await.expect("read"), "Name,Email\n");

        let bad = dir.path().join("latin1.csv");
        std::fs::write(&bad, b"Name\n\xe9\n").expect("write");
        let err = read_import_file(&bad).await.unwrap_err();
        assert_eq!(err.code(), codes::IMPORT_UNREADABLE);

        let err = read_import_file(dir.path().join("absent.csv")).await.unwrap_err();
        assert_eq!(err.code(), codes::IMPORT_UNREADABLE);
        assert_eq!(err.cause().map(AppError::code), Some("IO/NotFound"));
    }
}
