use rust_decimal::Decimal;

use crate::model::{Asset, Flat, Person, Record, Supplier};
use crate::table::{Column, FieldValue};
use crate::time;

/// Default column set of an entity's list screen.
pub trait ScreenColumns: Record {
    fn columns() -> Vec<Column<Self>>;
}

fn money(value: Option<Decimal>) -> String {
    value.map(|v| format!("{:.2}", v.round_dp(2))).unwrap_or_default()
}

impl ScreenColumns for Person {
    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("name", "Name", |p: &Person| FieldValue::text(&p.name)),
            Column::new("email", "Email", |p: &Person| FieldValue::text(&p.email)),
            Column::new("phone", "Phone", |p: &Person| FieldValue::opt_text(p.phone.as_deref()))
                .unsortable(),
            Column::new("flatNumber", "Flat", |p: &Person| {
                FieldValue::opt_text(p.flat_number.as_deref())
            }),
            Column::new("status", "Status", |p: &Person| FieldValue::text(p.status.as_str()))
                .with_renderer(|p: &Person| p.status_badge(time::today()).to_string()),
            Column::new("isPrimaryContact", "Primary", |p: &Person| {
                FieldValue::Bool(p.is_primary_contact)
            })
            .with_renderer(|p: &Person| (if p.is_primary_contact { "Yes" } else { "" }).to_string()),
            Column::new("moveInDate", "Moved In", |p: &Person| FieldValue::opt_date(p.move_in_date)),
        ]
    }
}

impl ScreenColumns for Flat {
    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("flatNumber", "Flat", |f: &Flat| FieldValue::text(&f.flat_number)),
            Column::new("floor", "Floor", |f: &Flat| FieldValue::opt_int(f.floor)),
            Column::new("bedrooms", "Beds", |f: &Flat| FieldValue::opt_int(f.bedrooms)),
            Column::new("areaSqFt", "Area (sq ft)", |f: &Flat| FieldValue::opt_int(f.area_sq_ft)),
            Column::new("currentRent", "Rent", |f: &Flat| FieldValue::opt_decimal(f.current_rent))
                .with_renderer(|f: &Flat| match f.rent_per_sq_ft() {
                    Some(per_sq_ft) => format!("{} ({per_sq_ft:.2}/sq ft)", money(f.current_rent)),
                    None => money(f.current_rent),
                }),
            Column::new("groundRent", "Ground Rent", |f: &Flat| {
                FieldValue::opt_decimal(f.ground_rent)
            })
            .with_renderer(|f: &Flat| money(f.ground_rent)),
            Column::new("status", "Status", |f: &Flat| FieldValue::text(f.status.as_str())),
        ]
    }
}

impl ScreenColumns for Asset {
    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("name", "Name", |a: &Asset| FieldValue::text(&a.name)),
            Column::new("type", "Type", |a: &Asset| FieldValue::text(&a.asset_type)),
            Column::new("category", "Category", |a: &Asset| FieldValue::text(a.category.as_str())),
            Column::new("status", "Status", |a: &Asset| FieldValue::text(a.status.as_str())),
            Column::new("manufacturer", "Manufacturer", |a: &Asset| {
                FieldValue::opt_text(a.manufacturer.as_deref())
            }),
            Column::new("warrantyExpiryDate", "Warranty", |a: &Asset| {
                FieldValue::opt_date(a.warranty_expiry_date)
            })
            .with_renderer(|a: &Asset| match a.warranty_active(time::today()) {
                Some(true) => format!("Until {}", FieldValue::opt_date(a.warranty_expiry_date).display()),
                Some(false) => "Expired".to_string(),
                None => String::new(),
            }),
        ]
    }
}

impl ScreenColumns for Supplier {
    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("name", "Name", |s: &Supplier| FieldValue::text(&s.name)),
            Column::new("companyName", "Company", |s: &Supplier| {
                FieldValue::opt_text(s.company_name.as_deref())
            }),
            Column::new("email", "Email", |s: &Supplier| FieldValue::text(&s.email)),
            Column::new("specialties", "Specialties", |s: &Supplier| {
                FieldValue::List(s.specialties.clone())
            })
            .unsortable(),
            Column::new("rating", "Rating", |s: &Supplier| FieldValue::opt_decimal(s.rating))
                .with_renderer(|s: &Supplier| {
                    s.rating
                        .map(|r| format!("{} / 5", r.normalize()))
                        .unwrap_or_default()
                }),
        ]
    }
}
