//! Entity records managed by the back office.
//!
//! Every entity is a flat record keyed by an opaque string id. The [`Record`]
//! trait gives the table engine, the CSV serializer and the screens a uniform
//! view over the fields of any entity.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::table::FieldValue;

/// Declares a closed string enum with case-insensitive lenient parsing.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $variant:ident => $wire:literal $(| $alias:literal)* ),+ $(,)?
        }
        default = $default:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, ts_rs::TS)]
        #[ts(export)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            /// Matches the wire value or an alias ignoring case, spaces and dashes.
            pub fn parse_loose(raw: &str) -> Option<Self> {
                let normalized: String = raw
                    .trim()
                    .chars()
                    .map(|c| if c == ' ' || c == '-' { '_' } else { c.to_ascii_lowercase() })
                    .collect();
                if normalized.is_empty() {
                    return None;
                }
                $(
                    if normalized == $wire.to_ascii_lowercase()
                        $(|| normalized == $alias)*
                    {
                        return Some($name::$variant);
                    }
                )+
                None
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod asset;
pub mod flat;
pub mod person;
pub mod supplier;

pub use asset::{Asset, AssetCategory, AssetStatus};
pub use flat::{Flat, FlatStatus};
pub use person::{Person, PersonStatus};
pub use supplier::Supplier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum EntityKind {
    #[value(alias = "person")]
    People,
    #[value(alias = "flat")]
    Flats,
    #[value(alias = "asset")]
    Assets,
    #[value(alias = "supplier")]
    Suppliers,
}

impl EntityKind {
    /// Singular slug used in generated ids (`person-import-...`).
    pub fn singular(self) -> &'static str {
        match self {
            EntityKind::People => "person",
            EntityKind::Flats => "flat",
            EntityKind::Assets => "asset",
            EntityKind::Suppliers => "supplier",
        }
    }

    /// Plural slug used for file names and store files.
    pub fn plural(self) -> &'static str {
        match self {
            EntityKind::People => "people",
            EntityKind::Flats => "flats",
            EntityKind::Assets => "assets",
            EntityKind::Suppliers => "suppliers",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.plural())
    }
}

/// Uniform access to an entity's identity, fields and lifecycle flags.
pub trait Record: Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    /// Every field in declaration order, keyed by its camelCase name.
    fn fields(&self) -> Vec<(&'static str, FieldValue)>;

    fn field_names() -> &'static [&'static str];

    fn field(&self, name: &str) -> FieldValue {
        self.fields()
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
            .unwrap_or(FieldValue::Null)
    }

    fn is_active(&self) -> bool;

    fn set_active(&mut self, active: bool);

    fn building_id(&self) -> Option<&str>;

    fn set_building(&mut self, building_id: Option<String>);

    /// Gives a new record its identity and creation stamp.
    fn stamp(&mut self, id: String, now_ms: i64);

    /// Stamp the update time after a local mutation.
    fn touch(&mut self, now_ms: i64);

    /// Short human readable label used in reports and notifications.
    fn label(&self) -> String;
}
