//! Generic management table: filter, search, sort, paginate, select, and
//! route add/edit/delete through [`TableActions`].
//!
//! All state lives in the [`ManagementTable`] value; nothing is persisted.

mod actions;
mod column;
mod pagination;
mod search;
mod sort;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::error::AppResult;
use crate::forms::{EntityForm, FormAction, FormDefinition, FormState, reduce};
use crate::models::Identified;

pub use actions::TableActions;
pub use column::{Column, DropdownFilter, FilterOption};
pub use pagination::{PageItem, page_numbers};
pub use search::{MatchRank, best_rank, rank};
pub use sort::{SortDirection, SortKey, SortState, compare_cells};

/// Where the edit page of a row lives.
pub enum LinkTarget<T> {
    /// `<base>/<id>` for every row.
    Static(String),
    PerRow(Arc<dyn Fn(&T) -> String + Send + Sync>),
}

impl<T> Clone for LinkTarget<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(base) => Self::Static(base.clone()),
            Self::PerRow(f) => Self::PerRow(f.clone()),
        }
    }
}

/// How add and edit are presented.
pub enum EditMode<T> {
    Modal,
    Link { add_url: String, edit: LinkTarget<T> },
}

impl<T> Clone for EditMode<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Modal => Self::Modal,
            Self::Link { add_url, edit } => Self::Link {
                add_url: add_url.clone(),
                edit: edit.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalMode {
    Add,
    Edit(String),
}

/// An open add/edit modal.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalState {
    pub mode: ModalMode,
    pub form: FormState,
}

/// Result of clicking Add or Edit.
#[derive(Debug, Clone, PartialEq)]
pub enum RowAction {
    OpenModal(ModalState),
    Navigate(String),
}

/// Proof that the user opened the delete confirmation for a row.
#[derive(Debug, PartialEq, Eq)]
pub struct DeleteConfirmation {
    id: String,
}

impl DeleteConfirmation {
    pub fn id(&self) -> &str {
        &self.id
    }
}

pub struct ManagementTable<T> {
    rows: Vec<T>,
    columns: Vec<Column<T>>,
    filters: Vec<DropdownFilter<T>>,
    filter_values: BTreeMap<String, String>,
    search: String,
    sort: SortState,
    page: usize,
    page_size: usize,
    /// `None` when row selection is disabled
    selection: Option<BTreeSet<String>>,
    edit_mode: EditMode<T>,
    /// Indices into `rows` after filter, search, and sort
    view: Vec<usize>,
}

impl<T: Identified + Clone> ManagementTable<T> {
    pub fn new(rows: Vec<T>, columns: Vec<Column<T>>, page_size: usize) -> Self {
        let mut table = Self {
            rows,
            columns,
            filters: Vec::new(),
            filter_values: BTreeMap::new(),
            search: String::new(),
            sort: SortState::default(),
            page: 0,
            page_size: page_size.max(1),
            selection: None,
            edit_mode: EditMode::Modal,
            view: Vec::new(),
        };
        table.recompute();
        table
    }

    pub fn with_filters(mut self, filters: Vec<DropdownFilter<T>>) -> Self {
        self.filters = filters;
        self.recompute();
        self
    }

    pub fn with_selection(mut self) -> Self {
        self.selection = Some(BTreeSet::new());
        self
    }

    pub fn with_edit_mode(mut self, edit_mode: EditMode<T>) -> Self {
        self.edit_mode = edit_mode;
        self
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn filters(&self) -> &[DropdownFilter<T>] {
        &self.filters
    }

    /// Replace the data set, e.g. after a refetch. Page is clamped, not reset.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.recompute();
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    // ========================================================================
    // Filter, search, sort
    // ========================================================================

    /// Select a dropdown value; `None` or an empty value clears the filter.
    pub fn set_filter(&mut self, filter_id: &str, value: Option<&str>) {
        match value.filter(|v| !v.is_empty()) {
            Some(v) => {
                self.filter_values.insert(filter_id.to_string(), v.to_string());
            }
            None => {
                self.filter_values.remove(filter_id);
            }
        }
        self.page = 0;
        self.recompute();
    }

    pub fn filter_value(&self, filter_id: &str) -> Option<&str> {
        self.filter_values.get(filter_id).map(String::as_str)
    }

    pub fn clear_filters(&mut self) {
        self.filter_values.clear();
        self.page = 0;
        self.recompute();
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.to_string();
        self.page = 0;
        self.recompute();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Header click. Columns that are unknown or not sortable are ignored.
    pub fn toggle_sort(&mut self, column_id: &str) {
        if self
            .columns
            .iter()
            .any(|c| c.id == column_id && c.sortable)
        {
            self.sort.cycle(column_id);
            self.recompute();
        }
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    fn recompute(&mut self) {
        let mut view: Vec<usize> = (0..self.rows.len())
            .filter(|&i| {
                let row = &self.rows[i];
                self.filter_values.iter().all(|(id, selected)| {
                    self.filters
                        .iter()
                        .find(|f| &f.id == id)
                        .is_none_or(|f| f.matches(row, selected))
                })
            })
            .collect();

        if !self.search.trim().is_empty() {
            let mut ranked: Vec<(MatchRank, usize)> = view
                .into_iter()
                .filter_map(|i| {
                    let row = &self.rows[i];
                    let cells: Vec<String> = self
                        .columns
                        .iter()
                        .filter(|c| c.searchable)
                        .map(|c| c.value(row))
                        .collect();
                    best_rank(cells.iter().map(String::as_str), &self.search).map(|r| (r, i))
                })
                .collect();
            ranked.sort_by_key(|(rank, _)| *rank);
            view = ranked.into_iter().map(|(_, i)| i).collect();
        }

        if let Some(column) = self
            .sort
            .column()
            .and_then(|id| self.columns.iter().find(|c| c.id == id))
        {
            let keys: BTreeMap<usize, SortKey> = view
                .iter()
                .map(|&i| (i, SortKey::parse(&column.value(&self.rows[i]))))
                .collect();
            view.sort_by(|a, b| keys[a].cmp(&keys[b]));
            // Descending is the exact reverse of ascending, ties included
            if self.sort.direction_for(&column.id) == Some(SortDirection::Desc) {
                view.reverse();
            }
        }

        self.view = view;
        self.page = self.page.min(self.page_count().saturating_sub(1));

        if let Some(selection) = self.selection.as_mut() {
            let visible: BTreeSet<&str> = self.view.iter().map(|&i| self.rows[i].id()).collect();
            selection.retain(|id| visible.contains(id.as_str()));
        }
    }

    /// Rows after filter, search, and sort, across all pages.
    pub fn filtered_rows(&self) -> Vec<&T> {
        self.view.iter().map(|&i| &self.rows[i]).collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.view.len()
    }

    // ========================================================================
    // Pagination
    // ========================================================================

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.view.len().div_ceil(self.page_size)
    }

    pub fn page_rows(&self) -> Vec<&T> {
        self.view
            .iter()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .map(|&i| &self.rows[i])
            .collect()
    }

    pub fn goto_page(&mut self, page: usize) {
        self.page = page.min(self.page_count().saturating_sub(1));
    }

    pub fn next_page(&mut self) {
        self.goto_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.goto_page(self.page.saturating_sub(1));
    }

    pub fn page_numbers(&self) -> Vec<PageItem> {
        page_numbers(self.page, self.page_count())
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn selection_enabled(&self) -> bool {
        self.selection.is_some()
    }

    /// Toggle one row. Rows outside the filtered set cannot be selected.
    pub fn toggle_row(&mut self, id: &str) {
        let visible = self.view.iter().any(|&i| self.rows[i].id() == id);
        if let Some(selection) = self.selection.as_mut()
            && visible
            && !selection.remove(id)
        {
            selection.insert(id.to_string());
        }
    }

    /// Select every row of the current page, or clear them if all are selected.
    pub fn toggle_all_visible(&mut self) {
        let ids: Vec<String> = self.page_rows().iter().map(|r| r.id().to_string()).collect();
        if let Some(selection) = self.selection.as_mut() {
            if ids.iter().all(|id| selection.contains(id)) {
                for id in &ids {
                    selection.remove(id);
                }
            } else {
                selection.extend(ids);
            }
        }
    }

    pub fn clear_selection(&mut self) {
        if let Some(selection) = self.selection.as_mut() {
            selection.clear();
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.as_ref().is_some_and(|s| s.contains(id))
    }

    pub fn selected_ids(&self) -> Vec<&str> {
        self.selection
            .iter()
            .flatten()
            .map(String::as_str)
            .collect()
    }

    // ========================================================================
    // Add / edit
    // ========================================================================

    pub fn begin_add<F: FormDefinition>(&self, form: &F) -> RowAction {
        match &self.edit_mode {
            EditMode::Modal => RowAction::OpenModal(ModalState {
                mode: ModalMode::Add,
                form: form.initial_state(),
            }),
            EditMode::Link { add_url, .. } => RowAction::Navigate(add_url.clone()),
        }
    }

    /// `None` when `id` is not a loaded row.
    pub fn begin_edit<F: EntityForm<T>>(&self, id: &str, form: &F) -> Option<RowAction> {
        let row = self.rows.iter().find(|r| r.id() == id)?;
        Some(match &self.edit_mode {
            EditMode::Modal => RowAction::OpenModal(ModalState {
                mode: ModalMode::Edit(id.to_string()),
                form: FormState::new(form.from_entity(row)),
            }),
            EditMode::Link {
                edit: LinkTarget::Static(base),
                ..
            } => RowAction::Navigate(format!(
                "{}/{}",
                base.trim_end_matches('/'),
                urlencoding::encode(id)
            )),
            EditMode::Link {
                edit: LinkTarget::PerRow(link),
                ..
            } => RowAction::Navigate(link(row)),
        })
    }

    /// Validate the modal form and send it through `actions`.
    ///
    /// Invalid input stays in the modal with errors set and nothing is
    /// called. On a failed write the modal keeps its values and the table is
    /// untouched. On success the rows are refetched.
    pub async fn submit_modal<F, A>(
        &mut self,
        modal: &mut ModalState,
        form: &F,
        actions: &A,
    ) -> AppResult<()>
    where
        F: FormDefinition,
        A: TableActions<T, Payload = F::Payload> + ?Sized,
    {
        let (state, payload) = form.submit(std::mem::take(&mut modal.form));
        modal.form = state;
        let payload = payload?;

        let result = match &modal.mode {
            ModalMode::Add => actions.add(&payload).await,
            ModalMode::Edit(id) => actions.edit(id, &payload).await,
        };
        modal.form = reduce(
            std::mem::take(&mut modal.form),
            FormAction::SubmitFinished { ok: result.is_ok() },
        );
        result?;

        self.reload(actions).await
    }

    // ========================================================================
    // Delete
    // ========================================================================

    /// Open the confirmation for a loaded row.
    pub fn request_delete(&self, id: &str) -> Option<DeleteConfirmation> {
        self.rows.iter().any(|r| r.id() == id).then(|| DeleteConfirmation {
            id: id.to_string(),
        })
    }

    /// The only path to `actions.delete`.
    pub async fn confirm_delete<A>(
        &mut self,
        confirmation: DeleteConfirmation,
        actions: &A,
    ) -> AppResult<()>
    where
        A: TableActions<T> + ?Sized,
    {
        actions.delete(&confirmation.id).await?;
        if let Some(selection) = self.selection.as_mut() {
            selection.remove(&confirmation.id);
        }
        self.reload(actions).await
    }

    /// Dismiss the confirmation; the token is consumed.
    pub fn cancel_delete(&self, _confirmation: DeleteConfirmation) {}

    async fn reload<A>(&mut self, actions: &A) -> AppResult<()>
    where
        A: TableActions<T> + ?Sized,
    {
        let rows = actions.refetch().await?;
        self.set_rows(rows);
        Ok(())
    }
}

impl<T> std::fmt::Debug for ManagementTable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagementTable")
            .field("rows", &self.rows.len())
            .field("filtered", &self.view.len())
            .field("search", &self.search)
            .field("sort", &self.sort)
            .field("page", &self.page)
            .finish()
    }
}
