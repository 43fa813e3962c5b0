//! Column and dropdown-filter descriptors.

use std::sync::Arc;

type Accessor<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// One table column, read through a typed accessor.
pub struct Column<T> {
    pub id: String,
    pub header: String,
    pub sortable: bool,
    pub searchable: bool,
    accessor: Accessor<T>,
}

impl<T> Column<T> {
    /// Sortable and searchable by default.
    pub fn new(
        id: impl Into<String>,
        header: impl Into<String>,
        accessor: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            sortable: true,
            searchable: true,
            accessor: Arc::new(accessor),
        }
    }

    pub fn not_sortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn not_searchable(mut self) -> Self {
        self.searchable = false;
        self
    }

    pub fn value(&self, row: &T) -> String {
        (self.accessor)(row)
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            sortable: self.sortable,
            searchable: self.searchable,
            accessor: self.accessor.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("sortable", &self.sortable)
            .field("searchable", &self.searchable)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

/// Equality filter offered as a dropdown above the table.
pub struct DropdownFilter<T> {
    pub id: String,
    pub label: String,
    pub options: Vec<FilterOption>,
    accessor: Accessor<T>,
}

impl<T> DropdownFilter<T> {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        accessor: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            options: Vec::new(),
            accessor: Arc::new(accessor),
        }
    }

    pub fn option(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push(FilterOption {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    /// One option per distinct accessor value, in first-seen order.
    pub fn options_from(mut self, rows: &[T]) -> Self {
        for row in rows {
            let value = (self.accessor)(row);
            if !value.is_empty() && !self.options.iter().any(|o| o.value == value) {
                self.options.push(FilterOption {
                    label: value.clone(),
                    value,
                });
            }
        }
        self
    }

    pub fn matches(&self, row: &T, selected: &str) -> bool {
        (self.accessor)(row) == selected
    }
}

impl<T> Clone for DropdownFilter<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            label: self.label.clone(),
            options: self.options.clone(),
            accessor: self.accessor.clone(),
        }
    }
}

impl<T> std::fmt::Debug for DropdownFilter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropdownFilter")
            .field("id", &self.id)
            .field("options", &self.options)
            .finish()
    }
}
