use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{person::default_active, EntityKind, Record};
use crate::table::FieldValue;

string_enum! {
    pub enum FlatStatus {
        Vacant => "vacant" | "empty",
        Occupied => "occupied" | "let",
        Maintenance => "maintenance" | "under_maintenance",
        Reserved => "reserved",
    }
    default = Vacant;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Flat {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub building_id: Option<String>,
    pub flat_number: String,
    #[serde(default)]
    pub floor: Option<i32>,
    #[serde(default)]
    pub area_sq_ft: Option<u32>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub current_rent: Option<Decimal>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub ground_rent: Option<Decimal>,
    #[serde(default)]
    pub status: FlatStatus,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    #[ts(type = "number")]
    pub created_at: i64,
    #[serde(default)]
    #[ts(type = "number")]
    pub updated_at: i64,
}

impl Flat {
    pub fn new(flat_number: impl Into<String>) -> Self {
        Flat {
            id: String::new(),
            building_id: None,
            flat_number: flat_number.into(),
            floor: None,
            area_sq_ft: None,
            bedrooms: None,
            bathrooms: None,
            current_rent: None,
            ground_rent: None,
            status: FlatStatus::default(),
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Yearly rent per square foot, when both figures are known.
    pub fn rent_per_sq_ft(&self) -> Option<Decimal> {
        let rent = self.current_rent?;
        let area = self.area_sq_ft.filter(|a| *a > 0)?;
        Some((rent / Decimal::from(area)).round_dp(2))
    }
}

const FIELD_NAMES: &[&str] = &[
    "id",
    "buildingId",
    "flatNumber",
    "floor",
    "areaSqFt",
    "bedrooms",
    "bathrooms",
    "currentRent",
    "groundRent",
    "status",
    "isActive",
    "createdAt",
    "updatedAt",
];

impl Record for Flat {
    const KIND: EntityKind = EntityKind::Flats;

    fn id(&self) -> &str {
        &self.id
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", FieldValue::text(&self.id)),
            ("buildingId", FieldValue::opt_text(self.building_id.as_deref())),
            ("flatNumber", FieldValue::text(&self.flat_number)),
            ("floor", FieldValue::opt_int(self.floor)),
            ("areaSqFt", FieldValue::opt_int(self.area_sq_ft)),
            ("bedrooms", FieldValue::opt_int(self.bedrooms)),
            ("bathrooms", FieldValue::opt_int(self.bathrooms)),
            ("currentRent", FieldValue::opt_decimal(self.current_rent)),
            ("groundRent", FieldValue::opt_decimal(self.ground_rent)),
            ("status", FieldValue::text(self.status.as_str())),
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
        format!("Flat {}", self.flat_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rent_per_sq_ft_requires_area() {
        let mut flat = Flat::new("4B");
        flat.current_rent = Some(Decimal::new(1200000, 2));
        assert_eq!(flat.rent_per_sq_ft(), None);
        flat.area_sq_ft = Some(800);
        assert_eq!(flat.rent_per_sq_ft(), Some(Decimal::new(1500, 2)));
        flat.area_sq_ft = Some(0);
        assert_eq!(flat.rent_per_sq_ft(), None);
    }

    #[test]
    fn rent_round_trips_through_json() {
        let mut flat = Flat::new("12");
        flat.ground_rent = Some(Decimal::new(25050, 2));
        flat.status = FlatStatus::Occupied;
        let json = serde_json::to_string(&flat).expect("serialize");
        let back: Flat = serde_json::from_str(&json).expect("decode");
        assert_eq!(back, flat);
        assert!(json.contains("\"status\":\"occupied\""));
    }
}
