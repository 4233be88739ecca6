use std::collections::HashMap;
use std::fmt::Display;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::ImportIssue;
use crate::{time, validators};

/// Maps header cells onto field names through an entity's header dictionary.
///
/// Matching ignores case and surrounding whitespace and accepts either the
/// display label or the raw field name. The first matching column wins.
pub fn map_headers(
    header: &[String],
    dictionary: &[(&'static str, &'static str)],
) -> HashMap<&'static str, usize> {
    let mut mapped = HashMap::new();
    for (idx, cell) in header.iter().enumerate() {
        let wanted = cell.trim().to_lowercase();
        if wanted.is_empty() {
            continue;
        }
        let hit = dictionary.iter().find(|(field, label)| {
            label.to_lowercase() == wanted || field.to_lowercase() == wanted
        });
        if let Some((field, _)) = hit {
            mapped.entry(*field).or_insert(idx);
        }
    }
    mapped
}

pub(crate) fn label_for(dictionary: &[(&'static str, &'static str)], field: &str) -> String {
    dictionary
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| field.to_string())
}

/// One data row being converted into a record.
///
/// Typed accessors never fail: hard problems are collected as errors and
/// soft problems as warnings, with the value defaulted.
pub struct RowReader<'a> {
    row: usize,
    cells: &'a [String],
    columns: &'a HashMap<&'static str, usize>,
    dictionary: &'a [(&'static str, &'static str)],
    errors: Vec<ImportIssue>,
    warnings: Vec<ImportIssue>,
}

impl<'a> RowReader<'a> {
    pub(crate) fn new(
        row: usize,
        cells: &'a [String],
        columns: &'a HashMap<&'static str, usize>,
        dictionary: &'a [(&'static str, &'static str)],
    ) -> Self {
        RowReader {
            row,
            cells,
            columns,
            dictionary,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn label(&self, field: &str) -> String {
        label_for(self.dictionary, field)
    }

    /// Raw cells keyed by field name, attached to every issue of the row.
    pub fn data(&self) -> Value {
        let mut map = Map::new();
        for (field, _) in self.dictionary {
            if let Some(idx) = self.columns.get(field) {
                let cell = self.cells.get(*idx).cloned().unwrap_or_default();
                map.insert((*field).to_string(), Value::String(cell));
            }
        }
        Value::Object(map)
    }

    pub fn error(&mut self, field: &str, message: impl Into<String>) {
        let issue = ImportIssue::new(self.row, field, message, self.data());
        self.errors.push(issue);
    }

    pub fn warn(&mut self, field: &str, message: impl Into<String>) {
        let issue = ImportIssue::new(self.row, field, message, self.data());
        self.warnings.push(issue);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub(crate) fn into_issues(self) -> (Vec<ImportIssue>, Vec<ImportIssue>) {
        (self.errors, self.warnings)
    }

    /// Trimmed cell text; `None` when the column is absent or the cell blank.
    pub fn text(&self, field: &str) -> Option<String> {
        let idx = *self.columns.get(field)?;
        let cell = self.cells.get(idx)?.trim();
        (!cell.is_empty()).then(|| cell.to_string())
    }

    pub fn text_or_default(&self, field: &str) -> String {
        self.text(field).unwrap_or_default()
    }

    /// Reports an error when the cell is blank.
    pub fn require(&mut self, field: &str) -> bool {
        if self.text(field).is_some() {
            return true;
        }
        let message = format!("{} is required", self.label(field));
        self.error(field, message);
        false
    }

    /// An invalid address is an error that rejects the row.
    pub fn email(&mut self, field: &str) -> Option<String> {
        let value = self.text(field)?;
        if validators::is_valid_email(&value) {
            Some(value)
        } else {
            self.error(field, format!("Invalid email address '{value}'"));
            None
        }
    }

    /// Suspicious phone numbers are kept as entered and flagged.
    pub fn phone(&mut self, field: &str) -> Option<String> {
        let value = self.text(field)?;
        if !validators::is_valid_phone(&value) {
            self.warn(field, format!("Phone number '{value}' may be invalid"));
        }
        Some(value)
    }

    pub fn choice<E>(&mut self, field: &str, parse: impl Fn(&str) -> Option<E>) -> E
    where
        E: Default + Display,
    {
        let Some(raw) = self.text(field) else {
            return E::default();
        };
        match parse(&raw) {
            Some(value) => value,
            None => {
                let fallback = E::default();
                let message = format!(
                    "Unknown {} '{raw}', using {fallback}",
                    self.label(field).to_lowercase()
                );
                self.warn(field, message);
                fallback
            }
        }
    }

    pub fn integer<N>(&mut self, field: &str) -> Option<N>
    where
        N: TryFrom<i64>,
    {
        let raw = self.text(field)?;
        let parsed = raw
            .replace(',', "")
            .parse::<i64>()
            .ok()
            .or_else(|| {
                raw.parse::<Decimal>()
                    .ok()
                    .filter(|d| d.fract().is_zero())
                    .and_then(|d| d.to_i64())
            })
            .and_then(|n| N::try_from(n).ok());
        if parsed.is_none() {
            let message = format!("{} '{raw}' is not a valid whole number", self.label(field));
            self.warn(field, message);
        }
        parsed
    }

    pub fn decimal(&mut self, field: &str) -> Option<Decimal> {
        let raw = self.text(field)?;
        let cleaned: String = raw
            .chars()
            .filter(|c| !matches!(c, '£' | '$' | '€' | ',' | ' '))
            .collect();
        match cleaned.parse::<Decimal>() {
            Ok(value) => Some(value),
            Err(_) => {
                let message = format!("{} '{raw}' is not a valid number", self.label(field));
                self.warn(field, message);
                None
            }
        }
    }

    /// Currency amount; negatives are clamped to zero.
    pub fn money(&mut self, field: &str) -> Option<Decimal> {
        let value = self.decimal(field)?;
        if value.is_sign_negative() && !value.is_zero() {
            let message = format!("{} cannot be negative, using 0", self.label(field));
            self.warn(field, message);
            return Some(Decimal::ZERO);
        }
        Some(value)
    }

    pub fn date(&mut self, field: &str) -> Option<chrono::NaiveDate> {
        let raw = self.text(field)?;
        let parsed = time::parse_date(&raw);
        if parsed.is_none() {
            let message = format!("{} '{raw}' is not a recognised date", self.label(field));
            self.warn(field, message);
        }
        parsed
    }

    pub fn flag(&mut self, field: &str) -> bool {
        let Some(raw) = self.text(field) else {
            return false;
        };
        match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => true,
            "false" | "no" | "n" | "0" => false,
            _ => {
                let message = format!("{} '{raw}' is not yes or no, using no", self.label(field));
                self.warn(field, message);
                false
            }
        }
    }

    /// Splits on `;` or `,`, trimming items and dropping repeats.
    pub fn list(&self, field: &str) -> Vec<String> {
        let Some(raw) = self.text(field) else {
            return Vec::new();
        };
        let mut items: Vec<String> = Vec::new();
        for item in raw.split([';', ',']).map(str::trim).filter(|s| !s.is_empty()) {
            if !items.iter().any(|seen| seen.eq_ignore_ascii_case(item)) {
                items.push(item.to_string());
            }
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DICT: &[(&str, &str)] = &[
        ("name", "Name"),
        ("companyName", "Company Name"),
        ("rent", "Rent"),
        ("tags", "Tags"),
    ];

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn headers_match_labels_or_field_names() {
        let header = cells(&[" company name ", "NAME", "Unknown", "rent", "Name"]);
        let map = map_headers(&header, DICT);
        assert_eq!(map.get("companyName"), Some(&0));
        assert_eq!(map.get("name"), Some(&1));
        assert_eq!(map.get("rent"), Some(&3));
        assert!(!map.contains_key("tags"));
    }

    #[test]
    fn typed_accessors_collect_warnings() {
        let header = cells(&["Name", "Rent", "Tags"]);
        let map = map_headers(&header, DICT);
        let row = cells(&["  Ada ", "-£1,200.50", "a; b;A ;, c"]);
        let mut reader = RowReader::new(2, &row, &map, DICT);

        assert_eq!(reader.text("name").as_deref(), Some("Ada"));
        assert_eq!(reader.money("rent"), Some(Decimal::ZERO));
        assert_eq!(reader.list("tags"), ["a", "b", "c"]);
        assert_eq!(reader.text("companyName"), None);
        assert!(!reader.has_errors());

        let (errors, warnings) = reader.into_issues();
        assert!(errors.is_empty());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].row, 2);
        assert_eq!(warnings[0].field, "rent");
        assert_eq!(warnings[0].data["name"], "  Ada ");
    }

    #[test]
    fn require_reports_label() {
        let header = cells(&["Name"]);
        let map = map_headers(&header, DICT);
        let row = cells(&["   "]);
        let mut reader = RowReader::new(5, &row, &map, DICT);
        assert!(!reader.require("name"));
        let (errors, _) = reader.into_issues();
        assert_eq!(errors[0].message, "Name is required");
    }

    #[test]
    fn integers_accept_whole_decimals_only() {
        let header = cells(&["Rent"]);
        let map = map_headers(&header, DICT);
        for (raw, expected) in [("3", Some(3u32)), ("4.0", Some(4)), ("2.5", None), ("-1", None)] {
            let row = cells(&[raw]);
            let mut reader = RowReader::new(2, &row, &map, DICT);
            assert_eq!(reader.integer::<u32>("rent"), expected, "input {raw}");
        }
    }
}
