#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::NaiveDate;
use estatebook_lib::export;
use estatebook_lib::import::{import_text, ImportValidationResult, Importable};
use estatebook_lib::model::{AssetCategory, AssetStatus, FlatStatus, PersonStatus};
use estatebook_lib::{Asset, Flat, Person};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn reimport<T: Importable>(records: &[T]) -> ImportValidationResult<T> {
    let csv = export::serialize(records, Some(T::HEADERS));
    let result: ImportValidationResult<T> = import_text(&csv).unwrap();
    assert!(result.errors.is_empty(), "{:?}\n{csv}", result.errors);
    assert!(result.warnings.is_empty(), "{:?}\n{csv}", result.warnings);
    assert_eq!(result.valid.len(), records.len());
    result
}

fn date() -> impl Strategy<Value = NaiveDate> {
    (730_000i32..740_000).prop_map(|days| NaiveDate::from_num_days_from_ce_opt(days).unwrap())
}

fn later(from: NaiveDate) -> impl Strategy<Value = Option<NaiveDate>> {
    prop::option::of((0u64..4_000).prop_map(move |gap| from + chrono::Days::new(gap)))
}

fn money() -> impl Strategy<Value = Option<Decimal>> {
    prop::option::of((0i64..10_000_000, 0u32..=2).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale)))
}

fn name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,8}( [A-Z][a-z]{1,8})?"
}

fn person() -> impl Strategy<Value = Person> {
    let status = prop_oneof![
        Just(PersonStatus::Owner),
        Just(PersonStatus::Tenant),
        Just(PersonStatus::Resident),
        Just(PersonStatus::Manager),
        Just(PersonStatus::PendingApproval),
    ];
    let dates = prop::option::of(date()).prop_flat_map(|move_in| match move_in {
        Some(day) => later(day).prop_map(move |out| (Some(day), out)).boxed(),
        None => Just((None, None)).boxed(),
    });
    (name(), "[a-z]{1,8}@[a-z]{2,6}\\.example", status, prop::option::of("[1-9][0-9]?[A-D]"), dates, any::<bool>())
        .prop_map(|(name, email, status, flat, (move_in, move_out), primary)| {
            let mut person = Person::new(name, email);
            person.status = status;
            person.flat_number = flat;
            person.move_in_date = move_in;
            person.move_out_date = move_out;
            person.is_primary_contact = primary;
            person
        })
}

fn flat() -> impl Strategy<Value = Flat> {
    let status = prop_oneof![
        Just(FlatStatus::Vacant),
        Just(FlatStatus::Occupied),
        Just(FlatStatus::Maintenance),
        Just(FlatStatus::Reserved),
    ];
    (
        "[1-9][0-9]{0,2}[A-D]?",
        prop::option::of(-3i32..60),
        prop::option::of(1u32..6_000),
        (prop::option::of(0u32..8), prop::option::of(0u32..5)),
        (money(), money()),
        status,
    )
        .prop_map(|(number, floor, area, (beds, baths), (rent, ground), status)| {
            let mut flat = Flat::new(number);
            flat.floor = floor;
            flat.area_sq_ft = area;
            flat.bedrooms = beds;
            flat.bathrooms = baths;
            flat.current_rent = rent;
            flat.ground_rent = ground;
            flat.status = status;
            flat
        })
}

fn asset() -> impl Strategy<Value = Asset> {
    let category = prop_oneof![
        Just(AssetCategory::Hvac),
        Just(AssetCategory::Plumbing),
        Just(AssetCategory::Lift),
        Just(AssetCategory::FireSafety),
        Just(AssetCategory::Other),
    ];
    let status = prop_oneof![
        Just(AssetStatus::Operational),
        Just(AssetStatus::NeedsRepair),
        Just(AssetStatus::InRepair),
        Just(AssetStatus::Decommissioned),
    ];
    let dates = prop::option::of(date()).prop_flat_map(|installed| match installed {
        Some(day) => later(day).prop_map(move |expiry| (Some(day), expiry)).boxed(),
        None => prop::option::of(date()).prop_map(|expiry| (None, expiry)).boxed(),
    });
    (name(), category, status, prop::option::of("[A-Z]{2}-[0-9]{4}"), dates).prop_map(
        |(name, category, status, serial, (installed, expiry))| {
            let mut asset = Asset::new(name, category);
            asset.asset_type = "Pump".into();
            asset.status = status;
            asset.serial_number = serial;
            asset.installation_date = installed;
            asset.warranty_expiry_date = expiry;
            asset
        },
    )
}

#[test]
fn labelled_person_export_reimports_dates() {
    let mut person = Person::new("Jane Smith", "jane@example.com");
    person.move_in_date = NaiveDate::from_ymd_opt(2024, 1, 15);
    person.move_out_date = NaiveDate::from_ymd_opt(2025, 2, 28);
    person.is_primary_contact = true;

    let back = &reimport(std::slice::from_ref(&person)).valid[0];
    assert_eq!(back.move_in_date, person.move_in_date);
    assert_eq!(back.move_out_date, person.move_out_date);
    assert!(back.is_primary_contact);
    assert_ne!(back.id, person.id);
}

#[test]
fn flat_money_keeps_its_value_after_normalizing() {
    let mut flat = Flat::new("4B");
    flat.floor = Some(-1);
    flat.current_rent = Some(Decimal::new(145000, 2));

    let csv = export::serialize([&flat], Some(Flat::HEADERS));
    assert!(csv.lines().nth(1).unwrap().contains(",1450,"));
    let back = &reimport(&[flat.clone()]).valid[0];
    assert_eq!(back.floor, Some(-1));
    assert_eq!(back.current_rent, flat.current_rent);
}

proptest! {
    #[test]
    fn people_survive_export_and_reimport(people in prop::collection::vec(person(), 1..6)) {
        let back = reimport(&people).valid;
        for (original, copy) in people.iter().zip(&back) {
            prop_assert_eq!(&copy.name, &original.name);
            prop_assert_eq!(&copy.email, &original.email);
            prop_assert_eq!(copy.status, original.status);
            prop_assert_eq!(&copy.flat_number, &original.flat_number);
            prop_assert_eq!(copy.move_in_date, original.move_in_date);
            prop_assert_eq!(copy.move_out_date, original.move_out_date);
            prop_assert_eq!(copy.is_primary_contact, original.is_primary_contact);
        }
    }

    #[test]
    fn flats_survive_export_and_reimport(flats in prop::collection::vec(flat(), 1..6)) {
        let back = reimport(&flats).valid;
        for (original, copy) in flats.iter().zip(&back) {
            prop_assert_eq!(&copy.flat_number, &original.flat_number);
            prop_assert_eq!(copy.floor, original.floor);
            prop_assert_eq!(copy.area_sq_ft, original.area_sq_ft);
            prop_assert_eq!(copy.bedrooms, original.bedrooms);
            prop_assert_eq!(copy.bathrooms, original.bathrooms);
            prop_assert_eq!(copy.current_rent, original.current_rent);
            prop_assert_eq!(copy.ground_rent, original.ground_rent);
            prop_assert_eq!(copy.status, original.status);
        }
    }

    #[test]
    fn assets_survive_export_and_reimport(assets in prop::collection::vec(asset(), 1..6)) {
        let back = reimport(&assets).valid;
        for (original, copy) in assets.iter().zip(&back) {
            prop_assert_eq!(&copy.name, &original.name);
            prop_assert_eq!(copy.category, original.category);
            prop_assert_eq!(copy.status, original.status);
            prop_assert_eq!(&copy.serial_number, &original.serial_number);
            prop_assert_eq!(copy.installation_date, original.installation_date);
            prop_assert_eq!(copy.warranty_expiry_date, original.warranty_expiry_date);
        }
    }
}
