use uuid::Uuid;

pub fn new_uuid_v7() -> String {
    Uuid::now_v7().to_string()
}

/// Id for a record accepted through the CSV importer, e.g. `supplier-import-<uuid>`.
pub fn import_record_id(entity: &str) -> String {
    format!("{entity}-import-{}", new_uuid_v7())
}
