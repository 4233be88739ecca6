use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{person::default_active, EntityKind, Record};
use crate::table::FieldValue;

string_enum! {
    pub enum AssetCategory {
        Hvac => "HVAC" | "heating" | "ventilation",
        Electrical => "ELECTRICAL",
        Plumbing => "PLUMBING",
        Lift => "LIFT" | "elevator",
        FireSafety => "FIRE_SAFETY" | "fire",
        Security => "SECURITY",
        Structural => "STRUCTURAL",
        Grounds => "GROUNDS" | "landscaping",
        Other => "OTHER",
    }
    default = Other;
}

string_enum! {
    pub enum AssetStatus {
        Operational => "OPERATIONAL" | "ok" | "working",
        NeedsRepair => "NEEDS_REPAIR",
        InRepair => "IN_REPAIR" | "under_repair",
        Decommissioned => "DECOMMISSIONED" | "retired",
    }
    default = Operational;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Asset {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub building_id: Option<String>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub asset_type: String,
    #[serde(default)]
    pub category: AssetCategory,
    #[serde(default)]
    pub status: AssetStatus,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model_number: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub installation_date: Option<NaiveDate>,
    #[serde(default)]
    pub warranty_expiry_date: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    #[ts(type = "number")]
    pub created_at: i64,
    #[serde(default)]
    #[ts(type = "number")]
    pub updated_at: i64,
}

impl Asset {
    pub fn new(name: impl Into<String>, category: AssetCategory) -> Self {
        Asset {
            id: String::new(),
            building_id: None,
            name: name.into(),
            asset_type: String::new(),
            category,
            status: AssetStatus::default(),
            manufacturer: None,
            model_number: None,
            serial_number: None,
            installation_date: None,
            warranty_expiry_date: None,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    /// `None` when no expiry date is recorded.
    pub fn warranty_active(&self, today: NaiveDate) -> Option<bool> {
        self.warranty_expiry_date.map(|expiry| expiry >= today)
    }
}

const FIELD_NAMES: &[&str] = &[
    "id",
    "buildingId",
    "name",
    "type",
    "category",
    "status",
    "manufacturer",
    "modelNumber",
    "serialNumber",
    "installationDate",
    "warrantyExpiryDate",
    "isActive",
    "createdAt",
    "updatedAt",
];

impl Record for Asset {
    const KIND: EntityKind = EntityKind::Assets;

    fn id(&self) -> &str {
        &self.id
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", FieldValue::text(&self.id)),
            ("buildingId", FieldValue::opt_text(self.building_id.as_deref())),
            ("name", FieldValue::text(&self.name)),
            ("type", FieldValue::text(&self.asset_type)),
            ("category", FieldValue::text(self.category.as_str())),
            ("status", FieldValue::text(self.status.as_str())),
            ("manufacturer", FieldValue::opt_text(self.manufacturer.as_deref())),
            ("modelNumber", FieldValue::opt_text(self.model_number.as_deref())),
            ("serialNumber", FieldValue::opt_text(self.serial_number.as_deref())),
            ("installationDate", FieldValue::opt_date(self.installation_date)),
            ("warrantyExpiryDate", FieldValue::opt_date(self.warranty_expiry_date)),
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
        self.name.clone()
    }
}
