use std::fmt;
use std::sync::Arc;

use super::FieldValue;

type Accessor<T> = Arc<dyn Fn(&T) -> FieldValue + Send + Sync>;
type Renderer<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;
type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Describes one table column: which value it reads and how it is shown.
pub struct Column<T> {
    pub key: String,
    pub title: String,
    pub sortable: bool,
    accessor: Accessor<T>,
    renderer: Option<Renderer<T>>,
}

impl<T> Column<T> {
    /// A sortable column reading its value through `accessor`.
    pub fn new(
        key: impl Into<String>,
        title: impl Into<String>,
        accessor: impl Fn(&T) -> FieldValue + Send + Sync + 'static,
    ) -> Self {
        Column {
            key: key.into(),
            title: title.into(),
            sortable: true,
            accessor: Arc::new(accessor),
            renderer: None,
        }
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Overrides the default stringification of the cell.
    pub fn with_renderer(mut self, renderer: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    pub fn value(&self, record: &T) -> FieldValue {
        (self.accessor)(record)
    }

    pub fn cell(&self, record: &T) -> String {
        match &self.renderer {
            Some(render) => render(record),
            None => self.value(record).display(),
        }
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Column {
            key: self.key.clone(),
            title: self.title.clone(),
            sortable: self.sortable,
            accessor: Arc::clone(&self.accessor),
            renderer: self.renderer.clone(),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("sortable", &self.sortable)
            .field("custom_renderer", &self.renderer.is_some())
            .finish()
    }
}

/// A per-row button. Without a predicate the action is always enabled.
pub struct RowAction<T> {
    pub key: String,
    pub label: String,
    handler: Handler<T>,
    enabled: Option<Predicate<T>>,
}

impl<T> RowAction<T> {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        handler: impl Fn(&T) + Send + Sync + 'static,
    ) -> Self {
        RowAction {
            key: key.into(),
            label: label.into(),
            handler: Arc::new(handler),
            enabled: None,
        }
    }

    pub fn enabled_when(mut self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.enabled = Some(Arc::new(predicate));
        self
    }

    pub fn is_enabled(&self, record: &T) -> bool {
        self.enabled.as_ref().map_or(true, |predicate| predicate(record))
    }

    pub(crate) fn run(&self, record: &T) {
        (self.handler)(record)
    }
}

impl<T> Clone for RowAction<T> {
    fn clone(&self) -> Self {
        RowAction {
            key: self.key.clone(),
            label: self.label.clone(),
            handler: Arc::clone(&self.handler),
            enabled: self.enabled.clone(),
        }
    }
}

impl<T> fmt::Debug for RowAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowAction")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("has_predicate", &self.enabled.is_some())
            .finish()
    }
}
