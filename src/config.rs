use std::env;
use std::path::PathBuf;

use crate::table::DEFAULT_PAGE_SIZE;

pub const APP_IDENTIFIER: &str = "com.estatebook.app";
pub const DATA_DIR_VAR: &str = "ESTATEBOOK_DATA_DIR";
pub const PAGE_SIZE_VAR: &str = "ESTATEBOOK_PAGE_SIZE";
pub const LOG_VAR: &str = "ESTATEBOOK_LOG";

const HARD_MAX_PAGE_SIZE: usize = 500;
const DEFAULT_LOG_FILTER: &str = "estatebook=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub page_size: usize,
    pub log_filter: String,
}

impl AppConfig {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let page_size = lookup(PAGE_SIZE_VAR)
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|value| *value > 0)
            .map(|value| value.min(HARD_MAX_PAGE_SIZE))
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let log_filter = lookup(LOG_VAR)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Self {
            data_dir,
            page_size,
            log_filter,
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    pub fn export_dir(&self) -> PathBuf {
        self.data_dir.join("exports")
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_IDENTIFIER)
}
