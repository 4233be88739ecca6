use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{person::default_active, EntityKind, Record};
use crate::table::FieldValue;

pub const MIN_RATING: Decimal = Decimal::ZERO;
pub const MAX_RATING: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Supplier {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub building_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub rating: Option<Decimal>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    #[ts(type = "number")]
    pub created_at: i64,
    #[serde(default)]
    #[ts(type = "number")]
    pub updated_at: i64,
}

impl Supplier {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Supplier {
            id: String::new(),
            building_id: None,
            name: name.into(),
            company_name: None,
            email: email.into(),
            phone: None,
            specialties: Vec::new(),
            rating: None,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    pub fn offers(&self, specialty: &str) -> bool {
        self.specialties
            .iter()
            .any(|s| s.eq_ignore_ascii_case(specialty.trim()))
    }
}

/// Clamp a rating into the accepted 0..=5 range.
pub fn clamp_rating(rating: Decimal) -> Decimal {
    rating.clamp(MIN_RATING, MAX_RATING)
}

const FIELD_NAMES: &[&str] = &[
    "id",
    "buildingId",
    "name",
    "companyName",
    "email",
    "phone",
    "specialties",
    "rating",
    "isActive",
    "createdAt",
    "updatedAt",
];

impl Record for Supplier {
    const KIND: EntityKind = EntityKind::Suppliers;

    fn id(&self) -> &str {
        &self.id
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", FieldValue::text(&self.id)),
            ("buildingId", FieldValue::opt_text(self.building_id.as_deref())),
            ("name", FieldValue::text(&self.name)),
            ("companyName", FieldValue::opt_text(self.company_name.as_deref())),
            ("email", FieldValue::text(&self.email)),
            ("phone", FieldValue::opt_text(self.phone.as_deref())),
            ("specialties", FieldValue::List(self.specialties.clone())),
            ("rating", FieldValue::opt_decimal(self.rating)),
            ("isActive", FieldValue::Bool(self.is_active)),
            ("createdAt", FieldValue::timestamp_ms(self.created_at)),
            ("updatedAt", FieldValue::timestamp_ms(self.updated_at)),
        ]
    }

    fn field_names() -> &'static [&'static str] {
        FIELD_NAMES
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    fn building_id(&self) -> Option<&str> {
        self.building_id.as_deref()
    }

    fn set_building(&mut self, building_id: Option<String>) {
        self.building_id = building_id;
    }

    fn stamp(&mut self, id: String, now_ms: i64) {
        self.id = id;
        self.is_active = true;
        self.created_at = now_ms;
        self.updated_at = now_ms;
    }

    fn touch(&mut self, now_ms: i64) {
        self.updated_at = now_ms;
    }

    fn label(&self) -> String {
        self.company_name
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(|company| format!("{} ({company})", self.name))
            .unwrap_or_else(|| self.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_rating_into_range() {
        assert_eq!(clamp_rating(Decimal::from(7)), MAX_RATING);
        assert_eq!(clamp_rating(Decimal::from(-2)), MIN_RATING);
        assert_eq!(clamp_rating(Decimal::new(45, 1)), Decimal::new(45, 1));
    }

    #[test]
    fn specialty_lookup_ignores_case() {
        let mut supplier = Supplier::new("Fixit", "ops@fixit.example");
        supplier.specialties = vec!["Plumbing".into(), "Heating".into()];
        assert!(supplier.offers("plumbing "));
        assert!(!supplier.offers("Roofing"));
    }

    #[test]
    fn label_includes_company() {
        let mut supplier = Supplier::new("John Doe", "john@example.com");
        assert_eq!(supplier.label(), "John Doe");
        supplier.company_name = Some("Doe Plumbing Inc".into());
        assert_eq!(supplier.label(), "John Doe (Doe Plumbing Inc)");
    }
}
