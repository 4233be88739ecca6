use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use super::{Column, FieldValue, RowAction};
use crate::error::codes;
use crate::model::Record;
use crate::{AppError, AppResult};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_EMPTY_MESSAGE: &str = "No records found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SortState {
    pub key: String,
    pub direction: SortDirection,
}

/// Search, sort and page position of one table. Mutated only through its
/// methods so that search and sort changes always return to the first page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TableState {
    query: String,
    sort: Option<SortState>,
    #[ts(type = "number")]
    page: usize,
}

impl Default for TableState {
    fn default() -> Self {
        TableState {
            query: String::new(),
            sort: None,
            page: 1,
        }
    }
}

impl TableState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    /// Unsorted, ascending, descending, then unsorted again for the same
    /// column. A different column always starts ascending. Non-sortable and
    /// unknown columns leave the state untouched.
    pub fn toggle_sort<T>(&mut self, columns: &[Column<T>], key: &str) {
        let sortable = columns.iter().any(|c| c.key == key && c.sortable);
        if !sortable {
            return;
        }
        self.sort = match self.sort.take() {
            Some(current) if current.key == key => match current.direction {
                SortDirection::Asc => Some(SortState {
                    key: current.key,
                    direction: SortDirection::Desc,
                }),
                SortDirection::Desc => None,
            },
            _ => Some(SortState {
                key: key.to_string(),
                direction: SortDirection::Asc,
            }),
        };
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PageInfo {
    #[ts(type = "number")]
    pub page: usize,
    #[ts(type = "number")]
    pub page_count: usize,
    #[ts(type = "number")]
    pub page_size: usize,
    #[ts(type = "number")]
    pub total: usize,
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

pub fn clamp_page(page: usize, page_count: usize) -> usize {
    page.clamp(1, page_count.max(1))
}

/// Sorts `(original index, record)` pairs by one column.
///
/// Ties keep original order in both directions and `Null` values always come
/// last, whichever way the column is sorted.
pub fn sort_rows<T>(rows: &mut Vec<(usize, &T)>, column: &Column<T>, direction: SortDirection) {
    let mut keyed: Vec<(FieldValue, usize, &T)> = rows
        .drain(..)
        .map(|(idx, record)| (column.value(record), idx, record))
        .collect();
    keyed.sort_by(|(a, ia, _), (b, ib, _)| {
        let ord = match (a.is_null(), b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => match direction {
                SortDirection::Asc => a.natural_cmp(b),
                SortDirection::Desc => b.natural_cmp(a),
            },
        };
        ord.then_with(|| ia.cmp(ib))
    });
    rows.extend(keyed.into_iter().map(|(_, idx, record)| (idx, record)));
}

/// Column descriptors plus the static options of a table.
pub struct TableConfig<T> {
    pub columns: Vec<Column<T>>,
    pub searchable: bool,
    pub search_keys: Option<Vec<String>>,
    pub page_size: usize,
    pub paginated: bool,
    pub actions: Vec<RowAction<T>>,
    pub empty_message: String,
}

impl<T> Clone for TableConfig<T> {
    fn clone(&self) -> Self {
        TableConfig {
            columns: self.columns.clone(),
            searchable: self.searchable,
            search_keys: self.search_keys.clone(),
            page_size: self.page_size,
            paginated: self.paginated,
            actions: self.actions.clone(),
            empty_message: self.empty_message.clone(),
        }
    }
}

impl<T> std::fmt::Debug for TableConfig<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableConfig")
            .field("columns", &self.columns)
            .field("searchable", &self.searchable)
            .field("search_keys", &self.search_keys)
            .field("page_size", &self.page_size)
            .field("paginated", &self.paginated)
            .field("actions", &self.actions)
            .finish()
    }
}

#[derive(Debug)]
pub struct TableView<'a, T> {
    pub rows: Vec<&'a T>,
    pub page: PageInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RenderedHeader {
    pub key: String,
    pub title: String,
    pub sortable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub sorted: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RenderedAction {
    pub key: String,
    pub label: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RenderedRow {
    pub id: String,
    pub cells: Vec<String>,
    pub actions: Vec<RenderedAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export)]
pub enum TableBody {
    Loading,
    Empty { message: String },
    Rows { rows: Vec<RenderedRow> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RenderedTable {
    pub headers: Vec<RenderedHeader>,
    pub body: TableBody,
    pub page: PageInfo,
}

impl<T> TableConfig<T> {
    pub fn new(columns: Vec<Column<T>>) -> Self {
        TableConfig {
            columns,
            searchable: true,
            search_keys: None,
            page_size: DEFAULT_PAGE_SIZE,
            paginated: true,
            actions: Vec::new(),
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_search_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    pub fn paginated(mut self, paginated: bool) -> Self {
        self.paginated = paginated;
        self
    }

    pub fn with_action(mut self, action: RowAction<T>) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    pub fn column(&self, key: &str) -> Option<&Column<T>> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Runs a row action unless it is unknown or disabled for `record`.
    pub fn trigger(&self, action_key: &str, record: &T) -> AppResult<()> {
        let Some(action) = self.actions.iter().find(|a| a.key == action_key) else {
            return Err(AppError::new(
                codes::TABLE_UNKNOWN_ACTION,
                format!("No action named '{action_key}'"),
            )
            .with_context("action", action_key));
        };
        if !action.is_enabled(record) {
            return Err(AppError::new(
                codes::TABLE_ACTION_DISABLED,
                format!("'{}' is not available for this row", action.label),
            )
            .with_context("action", action_key));
        }
        debug!(target: "estatebook", event = "table_action", action = action_key);
        action.run(record);
        Ok(())
    }
}

impl<T: Record> TableConfig<T> {
    fn matches(&self, record: &T, needle: &str) -> bool {
        let hit = |value: FieldValue| value.display().to_lowercase().contains(needle);
        match &self.search_keys {
            Some(keys) => keys.iter().any(|key| match self.column(key) {
                Some(column) => hit(column.value(record)),
                None => hit(record.field(key)),
            }),
            None => record.fields().into_iter().any(|(_, value)| hit(value)),
        }
    }

    fn search<'a>(&self, data: &'a [T], query: &str) -> Vec<(usize, &'a T)> {
        let needle = query.trim().to_lowercase();
        data.iter()
            .enumerate()
            .filter(|(_, record)| !self.searchable || needle.is_empty() || self.matches(record, &needle))
            .collect()
    }

    /// Searched and sorted rows, ignoring pagination.
    pub fn filtered_sorted<'a>(&self, data: &'a [T], state: &TableState) -> Vec<&'a T> {
        let mut rows = self.search(data, state.query());
        if let Some(sort) = state.sort() {
            if let Some(column) = self.column(&sort.key).filter(|c| c.sortable) {
                sort_rows(&mut rows, column, sort.direction);
            }
        }
        rows.into_iter().map(|(_, record)| record).collect()
    }

    pub fn view<'a>(&self, data: &'a [T], state: &TableState) -> TableView<'a, T> {
        let rows = self.filtered_sorted(data, state);
        let total = rows.len();
        if !self.paginated {
            return TableView {
                rows,
                page: PageInfo {
                    page: 1,
                    page_count: usize::from(total > 0),
                    page_size: total,
                    total,
                },
            };
        }
        let count = page_count(total, self.page_size);
        let page = clamp_page(state.page(), count);
        let start = (page - 1) * self.page_size;
        let rows = rows.into_iter().skip(start).take(self.page_size).collect();
        TableView {
            rows,
            page: PageInfo {
                page,
                page_count: count,
                page_size: self.page_size,
                total,
            },
        }
    }

    pub fn render(&self, data: &[T], state: &TableState, loading: bool) -> RenderedTable {
        let headers = self
            .columns
            .iter()
            .map(|column| RenderedHeader {
                key: column.key.clone(),
                title: column.title.clone(),
                sortable: column.sortable,
                sorted: state
                    .sort()
                    .filter(|s| s.key == column.key)
                    .map(|s| s.direction),
            })
            .collect();
        let view = self.view(data, state);
        let body = if loading {
            TableBody::Loading
        } else if view.rows.is_empty() {
            TableBody::Empty {
                message: self.empty_message.clone(),
            }
        } else {
            TableBody::Rows {
                rows: view.rows.iter().map(|record| self.render_row(record)).collect(),
            }
        };
        RenderedTable {
            headers,
            body,
            page: view.page,
        }
    }

    fn render_row(&self, record: &T) -> RenderedRow {
        RenderedRow {
            id: record.id().to_string(),
            cells: self.columns.iter().map(|c| c.cell(record)).collect(),
            actions: self
                .actions
                .iter()
                .map(|action| RenderedAction {
                    key: action.key.clone(),
                    label: action.label.clone(),
                    enabled: action.is_enabled(record),
                })
                .collect(),
        }
    }
}
