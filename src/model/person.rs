use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{EntityKind, Record};
use crate::table::FieldValue;

string_enum! {
    pub enum PersonStatus {
        Owner => "OWNER" | "landlord",
        Tenant => "TENANT" | "renter",
        Resident => "RESIDENT",
        Manager => "MANAGER" | "property_manager",
        PendingApproval => "PENDING_APPROVAL" | "pending",
    }
    default = Resident;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Person {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub building_id: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: PersonStatus,
    #[serde(default)]
    pub flat_number: Option<String>,
    #[serde(default)]
    pub move_in_date: Option<NaiveDate>,
    #[serde(default)]
    pub move_out_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_primary_contact: bool,
    #[serde(default = "crate::model::person::default_active")]
    pub is_active: bool,
    #[serde(default)]
    #[ts(type = "number")]
    pub created_at: i64,
    #[serde(default)]
    #[ts(type = "number")]
    pub updated_at: i64,
}

pub(crate) fn default_active() -> bool {
    true
}

impl Person {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Person {
            id: String::new(),
            building_id: None,
            name: name.into(),
            email: email.into(),
            phone: None,
            status: PersonStatus::default(),
            flat_number: None,
            move_in_date: None,
            move_out_date: None,
            is_primary_contact: false,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Badge text for the status column; moved-out residents read as "Former".
    pub fn status_badge(&self, today: NaiveDate) -> &'static str {
        if !self.is_active {
            return "Archived";
        }
        match self.move_out_date {
            Some(out) if out <= today => "Former",
            _ => match self.status {
                PersonStatus::Owner => "Owner",
                PersonStatus::Tenant => "Tenant",
                PersonStatus::Resident => "Resident",
                PersonStatus::Manager => "Manager",
                PersonStatus::PendingApproval => "Pending approval",
            },
        }
    }
}

const FIELD_NAMES: &[&str] = &[
    "id",
    "buildingId",
    "name",
    "email",
    "phone",
    "status",
    "flatNumber",
    "moveInDate",
    "moveOutDate",
    "isPrimaryContact",
    "isActive",
    "createdAt",
    "updatedAt",
];

impl Record for Person {
    const KIND: EntityKind = EntityKind::People;

    fn id(&self) -> &str {
        &self.id
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", FieldValue::text(&self.id)),
            ("buildingId", FieldValue::opt_text(self.building_id.as_deref())),
            ("name", FieldValue::text(&self.name)),
            ("email", FieldValue::text(&self.email)),
            ("phone", FieldValue::opt_text(self.phone.as_deref())),
            ("status", FieldValue::text(self.status.as_str())),
            ("flatNumber", FieldValue::opt_text(self.flat_number.as_deref())),
            ("moveInDate", FieldValue::opt_date(self.move_in_date)),
            ("moveOutDate", FieldValue::opt_date(self.move_out_date)),
            ("isPrimaryContact", FieldValue::Bool(self.is_primary_contact)),
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
