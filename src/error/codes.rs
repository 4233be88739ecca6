//! Namespaced error codes. The prefix names the layer that failed.

pub const IMPORT_UNSUPPORTED_FORMAT: &str = "IMPORT/UNSUPPORTED_FORMAT";
pub const IMPORT_UNREADABLE: &str = "IMPORT/UNREADABLE";
pub const IMPORT_PARSE: &str = "IMPORT/PARSE";
pub const IMPORT_BLOCKED: &str = "IMPORT/BLOCKED";
pub const IMPORT_NOTHING_PENDING: &str = "IMPORT/NOTHING_PENDING";

pub const EXPORT_WRITE: &str = "EXPORT/WRITE";

pub const STORE_NOT_FOUND: &str = "STORE/NOT_FOUND";
pub const STORE_CONFLICT: &str = "STORE/CONFLICT";
pub const STORE_CORRUPT: &str = "STORE/CORRUPT";
pub const STORE_INVALID_PATCH: &str = "STORE/INVALID_PATCH";
pub const STORE_UNAVAILABLE: &str = "STORE/UNAVAILABLE";

pub const TABLE_UNKNOWN_ACTION: &str = "TABLE/UNKNOWN_ACTION";
pub const TABLE_ACTION_DISABLED: &str = "TABLE/ACTION_DISABLED";

pub const SCREEN_RECORD_MISSING: &str = "SCREEN/RECORD_NOT_FOUND";

pub const JSON_DATA: &str = "JSON/DATA";
pub const JSON_SYNTAX: &str = "JSON/SYNTAX";
pub const JSON_EOF: &str = "JSON/EOF";
pub const JSON_IO: &str = "JSON/IO";
