use super::{Importable, RowReader};
use crate::model::supplier::{clamp_rating, MAX_RATING, MIN_RATING};
use crate::model::Supplier;

impl Importable for Supplier {
    const HEADERS: &'static [(&'static str, &'static str)] = &[
        ("name", "Name"),
        ("companyName", "Company Name"),
        ("email", "Email"),
        ("phone", "Phone"),
        ("specialties", "Specialties"),
        ("rating", "Rating"),
    ];
    const REQUIRED: &'static [&'static str] = &["name", "email"];
    const SAMPLE: &'static [&'static str] = &[
        "John Doe Plumbing",
        "John Doe Plumbing Inc",
        "john@example.com",
        "+1-555-0100",
        "Plumbing",
        "4.5",
    ];

    fn from_row(row: &mut RowReader<'_>) -> Self {
        let mut supplier = Supplier::new(row.text_or_default("name"), String::new());
        supplier.company_name = row.text("companyName");
        supplier.email = row.email("email").unwrap_or_default();
        supplier.phone = row.phone("phone");
        supplier.specialties = row.list("specialties");
        supplier.rating = row.decimal("rating").map(|rating| {
            if rating < MIN_RATING || rating > MAX_RATING {
                row.warn("rating", "Rating should be between 0 and 5");
            }
            clamp_rating(rating)
        });
        supplier
    }
}
