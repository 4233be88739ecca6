use super::{Importable, RowReader};
use crate::model::{Flat, FlatStatus};

impl Importable for Flat {
    const HEADERS: &'static [(&'static str, &'static str)] = &[
        ("flatNumber", "Flat Number"),
        ("floor", "Floor"),
        ("areaSqFt", "Area (sq ft)"),
        ("bedrooms", "Bedrooms"),
        ("bathrooms", "Bathrooms"),
        ("currentRent", "Current Rent"),
        ("groundRent", "Ground Rent"),
        ("status", "Status"),
    ];
    const REQUIRED: &'static [&'static str] = &["flatNumber"];
    const SAMPLE: &'static [&'static str] =
        &["4B", "2", "850", "2", "1", "1450.00", "250.00", "occupied"];

    fn from_row(row: &mut RowReader<'_>) -> Self {
        let mut flat = Flat::new(row.text_or_default("flatNumber"));
        flat.floor = row.integer("floor");
        flat.area_sq_ft = row.integer("areaSqFt");
        flat.bedrooms = row.integer("bedrooms");
        flat.bathrooms = row.integer("bathrooms");
        flat.current_rent = row.money("currentRent");
        flat.ground_rent = row.money("groundRent");
        flat.status = row.choice("status", FlatStatus::parse_loose);
        flat
    }
}
