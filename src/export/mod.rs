use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::error::codes;
use crate::import::Importable;
use crate::model::{Asset, EntityKind, Flat, Person, Record, Supplier};
use crate::table::FieldValue;
use crate::{AppError, AppResult};

const PARTIAL_SUFFIX: &str = ".partial";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Renders records as CSV text.
///
/// With `labels` the columns follow the label map's order and use its
/// display headers; without it every field is written under its raw name.
/// Lines are joined with `\n` and there is no trailing newline.
pub fn serialize<'a, T, I>(records: I, labels: Option<&[(&str, &str)]>) -> String
where
    T: Record + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let (fields, headers): (Vec<&str>, Vec<&str>) = match labels {
        Some(map) => map.iter().copied().unzip(),
        None => T::field_names().iter().map(|name| (*name, *name)).unzip(),
    };

    let mut lines = Vec::new();
    lines.push(headers.iter().map(|h| escape(h)).collect::<Vec<_>>().join(","));
    for record in records {
        let cells: Vec<String> = fields
            .iter()
            .map(|field| to_cell(&record.field(field)))
            .collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

/// Text of one CSV cell.
pub fn to_cell(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => String::new(),
        FieldValue::List(items) => quote(&items.join(";")),
        FieldValue::Json(json) => quote(&json.to_string()),
        other => escape(&other.display()),
    }
}

fn escape(raw: &str) -> String {
    if raw.contains(['"', ',', '\n', '\r']) {
        quote(raw)
    } else {
        raw.to_string()
    }
}

fn quote(raw: &str) -> String {
    format!("\"{}\"", raw.replace('"', "\"\""))
}

/// Pretty JSON array of the records' wire form.
pub fn serialize_json<'a, T, I>(records: I) -> AppResult<String>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let items: Vec<&T> = records.into_iter().collect();
    serde_json::to_string_pretty(&items)
        .map_err(|err| AppError::from(err).with_context("operation", "serialize_json"))
}

/// `<entity>_<building-slug or YYYY-MM-DD>.<ext>`.
pub fn export_filename(
    entity: EntityKind,
    building_name: Option<&str>,
    date: NaiveDate,
    ext: &str,
) -> String {
    let suffix = building_name
        .map(slug)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| date.format("%Y-%m-%d").to_string());
    format!("{}_{suffix}.{ext}", entity.plural())
}

fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    out.trim_end_matches('-').to_string()
}

/// Writes `contents` to `dir/filename` through a `.partial` file and rename.
pub async fn write_export(dir: &Path, filename: &str, contents: &str) -> AppResult<PathBuf> {
    let map_err = |err: std::io::Error, operation: &str, path: &Path| {
        AppError::new(codes::EXPORT_WRITE, "Could not write the export file")
            .with_context("operation", operation)
            .with_context("path", path.display().to_string())
            .with_cause(AppError::from(err))
    };

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|err| map_err(err, "create_dir", dir))?;
    let path = dir.join(filename);
    let tmp = tmp_path(&path);
    tokio::fs::write(&tmp, contents.as_bytes())
        .await
        .map_err(|err| map_err(err, "write_partial", &tmp))?;
    if let Err(err) = tokio::fs::rename(&tmp, &path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(map_err(err, "rename", &path));
    }
    info!(
        target: "estatebook",
        event = "export_written",
        file = filename,
        bytes = contents.len()
    );
    Ok(path)
}

fn tmp_path(final_path: &Path) -> PathBuf {
    let mut s = OsString::from(final_path.as_os_str());
    s.push(PARTIAL_SUFFIX);
    PathBuf::from(s)
}

/// Import template: the header row plus one example row.
pub fn template<T: Importable>() -> String {
    let header: Vec<String> = T::HEADERS.iter().map(|(_, label)| escape(label)).collect();
    let sample: Vec<String> = T::SAMPLE.iter().map(|value| escape(value)).collect();
    format!("{}\n{}", header.join(","), sample.join(","))
}

pub fn template_for(kind: EntityKind) -> String {
    match kind {
        EntityKind::People => template::<Person>(),
        EntityKind::Flats => template::<Flat>(),
        EntityKind::Assets => template::<Asset>(),
        EntityKind::Suppliers => template::<Supplier>(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::parse;
    use rust_decimal::Decimal;
    use tempfile::tempdir;

    #[test]
    fn cells_follow_type_rules() {
        assert_eq!(to_cell(&FieldValue::Null), "");
        assert_eq!(
            to_cell(&FieldValue::Date(NaiveDate::from_ymd_opt(2024, 3, 9).expect("date"))),
            "2024-03-09"
        );
        assert_eq!(
            to_cell(&FieldValue::List(vec!["Plumbing".into(), "Gas".into()])),
            "\"Plumbing;Gas\""
        );
        assert_eq!(
            to_cell(&FieldValue::Json(serde_json::json!({"a": "b"}))),
            "\"{\"\"a\"\":\"\"b\"\"}\""
        );
        assert_eq!(to_cell(&FieldValue::text("Acme, Inc.")), "\"Acme, Inc.\"");
        assert_eq!(to_cell(&FieldValue::text("He said \"hi\"")), "\"He said \"\"hi\"\"\"");
        assert_eq!(to_cell(&FieldValue::Decimal(Decimal::new(450, 2))), "4.5");
    }

    #[test]
    fn serialize_uses_labels_in_map_order() {
        let mut supplier = Supplier::new("Acme, Inc.", "ops@acme.example");
        supplier.specialties = vec!["Roofing".into()];
        let labels = [("email", "Email"), ("name", "Name"), ("specialties", "Specialties")];
        let csv = serialize(&[supplier], Some(&labels));
        assert_eq!(csv, "Email,Name,Specialties\nops@acme.example,\"Acme, Inc.\",\"Roofing\"");
    }

    #[test]
    fn serialize_without_labels_writes_every_field() {
        let person = Person::new("Ada", "ada@example.com");
        let csv = serialize(&[person], None);
        let rows = parse(&csv).expect("parse");
        assert_eq!(rows[0].len(), Person::field_names().len());
        assert_eq!(rows[0][2], "name");
        assert_eq!(rows[1][2], "Ada");
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn filenames_prefer_building_slug() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 1).expect("date");
        assert_eq!(
            export_filename(EntityKind::Flats, Some("  Kings Court (East) "), date, "csv"),
            "flats_kings-court-east.csv"
        );
        assert_eq!(
            export_filename(EntityKind::People, None, date, "json"),
            "people_2024-07-01.json"
        );
        assert_eq!(
            export_filename(EntityKind::Assets, Some("!!"), date, "csv"),
            "assets_2024-07-01.csv"
        );
    }

    #[test]
    fn supplier_template_is_importable() {
        assert_eq!(
            template::<Supplier>(),
            "Name,Company Name,Email,Phone,Specialties,Rating\n\
             John Doe Plumbing,John Doe Plumbing Inc,john@example.com,+1-555-0100,Plumbing,4.5"
        );
    }

    #[tokio::test]
    async fn write_export_is_atomic() {
        let dir = tempdir().expect("tempdir");
        let out = dir.path().join("exports");
        let path = write_export(&out, "people_2024-01-01.csv", "Name\nAda")
            .await
            .expect("write export");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "Name\nAda");
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn json_export_is_an_array() {
        let flats = vec![Flat::new("1"), Flat::new("2")];
        let json = serialize_json(&flats).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[1]["flatNumber"], "2");
    }
}
