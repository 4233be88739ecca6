//! Client-side search, sort and pagination over in-memory records.

mod column;
mod engine;
mod value;

pub use column::{Column, RowAction};
pub use engine::{
    clamp_page, page_count, sort_rows, PageInfo, RenderedAction, RenderedHeader, RenderedRow,
    RenderedTable, SortDirection, SortState, TableBody, TableConfig, TableState, TableView,
    DEFAULT_EMPTY_MESSAGE, DEFAULT_PAGE_SIZE,
};
pub use value::FieldValue;
