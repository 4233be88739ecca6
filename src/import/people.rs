use super::{Importable, RowReader};
use crate::model::{Person, PersonStatus};

impl Importable for Person {
    const HEADERS: &'static [(&'static str, &'static str)] = &[
        ("name", "Name"),
        ("email", "Email"),
        ("phone", "Phone"),
        ("status", "Status"),
        ("flatNumber", "Flat Number"),
        ("moveInDate", "Move In Date"),
        ("moveOutDate", "Move Out Date"),
        ("isPrimaryContact", "Primary Contact"),
    ];
    const REQUIRED: &'static [&'static str] = &["name", "email"];
    const SAMPLE: &'static [&'static str] = &[
        "Jane Smith",
        "jane.smith@example.com",
        "+44 20 7946 0958",
        "TENANT",
        "4B",
        "2024-01-15",
        "",
        "yes",
    ];

    fn from_row(row: &mut RowReader<'_>) -> Self {
        let mut person = Person::new(row.text_or_default("name"), String::new());
        person.email = row.email("email").unwrap_or_default();
        person.phone = row.phone("phone");
        person.status = row.choice("status", PersonStatus::parse_loose);
        person.flat_number = row.text("flatNumber");
        person.move_in_date = row.date("moveInDate");
        person.move_out_date = row.date("moveOutDate");
        if let (Some(move_in), Some(move_out)) = (person.move_in_date, person.move_out_date) {
            if move_out < move_in {
                row.warn("moveOutDate", "Move out date is before move in date and was ignored");
                person.move_out_date = None;
            }
        }
        person.is_primary_contact = row.flag("isPrimaryContact");
        person
    }
}

#[cfg(test)]
mod tests {
    use crate::import::{import_text, ImportValidationResult};
    use crate::model::{Person, PersonStatus};

    #[test]
    fn lenient_fields_warn_instead_of_rejecting() {
        let csv = "Name,Email,Phone,Status,Move In Date,Move Out Date,Primary Contact\n\
                   Ada,ada@example.com,call me,astronaut,2024-05-01,2024-04-01,maybe";
        let result: ImportValidationResult<Person> = import_text(csv).expect("import");
        assert!(result.errors.is_empty());
        assert_eq!(result.valid.len(), 1);
        let fields: Vec<&str> = result.warnings.iter().map(|w| w.field.as_str()).collect();
        assert_eq!(fields, ["phone", "status", "moveOutDate", "isPrimaryContact"]);

        let ada = &result.valid[0];
        assert_eq!(ada.phone.as_deref(), Some("call me"));
        assert_eq!(ada.status, PersonStatus::Resident);
        assert_eq!(ada.move_out_date, None);
        assert!(!ada.is_primary_contact);
    }

    #[test]
    fn invalid_email_is_an_error() {
        let csv = "name,EMAIL\nAda,not-an-email";
        let result: ImportValidationResult<Person> = import_text(csv).expect("import");
        assert!(result.valid.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "email");
        assert_eq!(result.errors[0].data["email"], "not-an-email");
    }
}
