//! Building management records: generic list screens over people, flats,
//! assets and suppliers, with CSV import and export.

pub mod config;
pub mod error;
pub mod export;
pub mod id;
pub mod import;
pub mod logging;
pub mod model;
pub mod notify;
pub mod screen;
pub mod store;
pub mod table;
pub mod time;
pub mod validators;

pub use error::{AppError, AppResult};
pub use logging::init_logging;
pub use model::{Asset, EntityKind, Flat, Person, Record, Supplier};
pub use screen::EntityScreen;
