use super::{Importable, RowReader};
use crate::model::{Asset, AssetCategory, AssetStatus};

impl Importable for Asset {
    const HEADERS: &'static [(&'static str, &'static str)] = &[
        ("name", "Name"),
        ("type", "Type"),
        ("category", "Category"),
        ("status", "Status"),
        ("manufacturer", "Manufacturer"),
        ("modelNumber", "Model Number"),
        ("serialNumber", "Serial Number"),
        ("installationDate", "Installation Date"),
        ("warrantyExpiryDate", "Warranty Expiry Date"),
    ];
    const REQUIRED: &'static [&'static str] = &["name", "category"];
    const SAMPLE: &'static [&'static str] = &[
        "Main Boiler",
        "Gas boiler",
        "HVAC",
        "OPERATIONAL",
        "Vaillant",
        "ecoTEC plus 438",
        "VB-2291-77",
        "2021-03-10",
        "2026-03-10",
    ];

    fn from_row(row: &mut RowReader<'_>) -> Self {
        let category = row.choice("category", AssetCategory::parse_loose);
        let mut asset = Asset::new(row.text_or_default("name"), category);
        asset.asset_type = row.text_or_default("type");
        asset.status = row.choice("status", AssetStatus::parse_loose);
        asset.manufacturer = row.text("manufacturer");
        asset.model_number = row.text("modelNumber");
        asset.serial_number = row.text("serialNumber");
        asset.installation_date = row.date("installationDate");
        asset.warranty_expiry_date = row.date("warrantyExpiryDate");
        if let (Some(installed), Some(expiry)) = (asset.installation_date, asset.warranty_expiry_date) {
            if expiry < installed {
                row.warn(
                    "warrantyExpiryDate",
                    "Warranty expiry date is before installation date and was ignored",
                );
                asset.warranty_expiry_date = None;
            }
        }
        asset
    }
}

#[cfg(test)]
mod tests {
    use crate::import::{import_text, ImportValidationResult};
    use crate::model::{Asset, AssetCategory, AssetStatus};

    #[test]
    fn category_is_required_but_unknown_values_default() {
        let csv = "Name,Type,Category,Status\n\
                   Lift A,Passenger,elevator,broken\n\
                   Pump,Water,,OPERATIONAL\n\
                   Gate,Access,spaceship,";
        let result: ImportValidationResult<Asset> = import_text(csv).expect("import");

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].row, 3);
        assert_eq!(result.errors[0].message, "Category is required");

        assert_eq!(result.valid.len(), 2);
        assert_eq!(result.valid[0].category, AssetCategory::Lift);
        assert_eq!(result.valid[0].status, AssetStatus::Operational);
        assert_eq!(result.valid[1].category, AssetCategory::Other);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn warranty_before_installation_is_dropped() {
        let csv = "Name,Category,Installation Date,Warranty Expiry Date\n\
                   Boiler,HVAC,10/03/2021,2020-01-01";
        let result: ImportValidationResult<Asset> = import_text(csv).expect("import");
        let boiler = &result.valid[0];
        assert!(boiler.installation_date.is_some());
        assert_eq!(boiler.warranty_expiry_date, None);
        assert_eq!(result.warnings[0].field, "warrantyExpiryDate");
    }
}
