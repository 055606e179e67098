use tracing::{debug, trace, warn};

use crate::cell::Cell;
use crate::config::{Config, PageInfo};
use crate::date::DateParser;
use crate::error::{GridError, Result};
use crate::events::{Event, EventBus, EventKind, Subscription};
use crate::export::{self, ExportOptions};
use crate::import::{self, ImportOptions};
use crate::pager::{build_pager, PagerButton, PagerLayout};
use crate::paginate::Paginator;
use crate::render::{NullRenderer, PageView, Renderer};
use crate::row::{Row, RowId, RowRef};
use crate::search::{SearchEngine, SearchOptions};
use crate::sort::{Direction, SortEngine, SortState};
use crate::table::{ColumnSpec, Table};

/// The data table: owns the table model and drives search, sort, pagination,
/// rendering and events.
///
/// Every change runs the same pipeline: filter the rows in natural order,
/// re-apply the current sort, paginate, render. Interaction methods return
/// `false` (after logging at debug level) when a request is rejected, and
/// leave the state untouched.
pub struct DataTable<R: Renderer = NullRenderer> {
    table: Table,
    config: Config,
    layout: PagerLayout,
    renderer: R,
    events: EventBus,
    sorter: SortEngine,
    paginator: Paginator,
    sort_state: Option<SortState>,
    search: Option<SearchOptions>,
    /// Active rows (natural-order positions) in display order
    active: Vec<usize>,
    initialized: bool,
}

impl DataTable<NullRenderer> {
    /// Create a headless data table
    pub fn new(config: Config) -> Result<Self> {
        Self::with_renderer(config, NullRenderer)
    }
}

impl<R: Renderer> DataTable<R> {
    /// Create a data table from a configuration, building the table from
    /// `config.data` when present
    pub fn with_renderer(mut config: Config, renderer: R) -> Result<Self> {
        let table = config.data.take().map(Table::from_data).unwrap_or_default();
        Self::from_table(table, config, renderer)
    }

    /// Adopt an existing table, repairing ragged rows and colliding handles
    pub fn from_table(mut table: Table, config: Config, renderer: R) -> Result<Self> {
        config.validate()?;
        table.repair();

        let mut datatable = DataTable {
            layout: config.pager_layout(),
            paginator: Paginator::new(config.per_page),
            table,
            config,
            renderer,
            events: EventBus::new(),
            sorter: SortEngine::default(),
            sort_state: None,
            search: None,
            active: Vec::new(),
            initialized: false,
        };
        datatable.rebuild_active();
        datatable.paginator.paginate(&datatable.active);
        Ok(datatable)
    }

    /// Apply column options, then paginate and render for the first time.
    /// Calling it again does nothing.
    pub fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        self.config.validate_columns(self.table.column_count())?;
        self.apply_column_options()?;
        self.initialized = true;

        self.rebuild_active();
        self.paginator.paginate(&self.active);
        self.render();
        self.events.emit(&Event::Init);
        debug!(
            rows = self.table.row_count(),
            columns = self.table.column_count(),
            "data table initialized"
        );
        Ok(())
    }

    fn apply_column_options(&mut self) -> Result<()> {
        for options in &self.config.columns {
            let indices = options.select.indices();
            if options.has_meta() {
                for &index in &indices {
                    self.table.set_column_meta(index, options.meta())?;
                }
            }
            if options.hidden {
                self.table.hide_columns(&indices)?;
            }
            if let Some((column, direction)) = options.initial_sort() {
                self.sort_state = Some(SortState { column, direction });
            }
        }
        Ok(())
    }

    /// Paginate the active rows, render and emit `update`
    pub fn update(&mut self) {
        self.paginator.paginate(&self.active);
        self.render();
        self.events.emit(&Event::Update);
    }

    /// Recompute the active rows from scratch, then update
    fn refresh(&mut self) {
        self.rebuild_active();
        self.update();
    }

    fn rebuild_active(&mut self) {
        let searched = self
            .search
            .as_ref()
            .map(|options| SearchEngine::search(&self.table, options));

        let mut rows = match searched {
            Some(Ok(rows)) => rows,
            Some(Err(err)) => {
                debug!(error = %err, "dropping search that no longer applies");
                self.search = None;
                (0..self.table.row_count()).collect()
            }
            None => (0..self.table.row_count()).collect(),
        };

        if let Some(state) = self.sort_state {
            if state.column < self.table.column_count() {
                self.sorter.sort(&self.table, &mut rows, state.column, state.direction);
            } else {
                self.sort_state = None;
            }
        }

        trace!(
            rows = rows.len(),
            searching = self.search.is_some(),
            "active rows rebuilt"
        );
        self.active = rows;
    }

    fn render(&mut self) {
        let view = self.page_view();
        self.renderer.render_page(&view);
        if view.is_empty() {
            self.renderer.render_message(&self.config.labels.no_rows);
        }

        let pager = self.pager();
        self.renderer.render_pager(&pager);
        let info = self.info();
        self.renderer.render_info(&info);

        self.events.emit(&Event::RowsRender { page: view.page });
    }

    /// What the current page looks like
    pub fn page_view(&self) -> PageView {
        PageView::build(
            &self.table,
            self.paginator.current_rows(),
            self.sort_state,
            self.config.sortable,
            &self.config.texts,
        )
        .with_page(self.paginator.current_page(), self.paginator.total_pages())
    }

    /// Pager buttons for the current page
    pub fn pager(&self) -> Vec<PagerButton> {
        build_pager(
            self.paginator.current_page(),
            self.paginator.total_pages(),
            &self.layout,
        )
    }

    /// Show `message` in place of the rows until the next render
    pub fn set_message(&mut self, message: &str) {
        self.renderer.render_message(message);
    }

    fn reject(&self, operation: &str, err: GridError) -> bool {
        debug!(operation, code = err.code(), error = %err, "request rejected");
        false
    }

    // --- Search ---

    /// Filter rows by `query`, optionally within a single column.
    ///
    /// A blank query clears the filter. Either way the table returns to page 1.
    pub fn search(&mut self, query: &str, column: Option<usize>) -> bool {
        if !self.config.searchable {
            return self.reject("search", GridError::SearchDisabled);
        }

        let mut options = SearchOptions::new(query)
            .include_hidden(self.config.search.include_hidden_columns);
        options.column = column;

        if options.is_blank() {
            self.search = None;
        } else {
            if let Err(err) = SearchEngine::search(&self.table, &options) {
                return self.reject("search", err);
            }
            self.search = Some(options);
        }

        self.paginator.reset();
        self.refresh();

        let mut positions = self.active.clone();
        positions.sort_unstable();
        let matches: Vec<RowId> = positions
            .iter()
            .filter_map(|&p| self.table.row(p))
            .map(|row| row.id)
            .collect();
        self.events.emit(&Event::Search {
            query: query.to_string(),
            matches,
        });
        true
    }

    /// Drop the search filter
    pub fn clear_search(&mut self) -> bool {
        self.search("", None)
    }

    pub fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    pub fn search_query(&self) -> Option<&str> {
        self.search.as_ref().map(|options| options.query.as_str())
    }

    // --- Sort ---

    /// Sort by `column`. Without a direction the last sorted column flips
    /// and any other column starts ascending.
    pub fn sort(&mut self, column: usize, direction: Option<Direction>) -> bool {
        let count = self.table.column_count();
        if column >= count {
            return self.reject("sort", GridError::ColumnOutOfRange { index: column, count });
        }
        let sortable = self
            .table
            .columns()
            .get(column)
            .map(|c| c.sortable)
            .unwrap_or(false);
        if !self.config.sortable || !sortable {
            return self.reject("sort", GridError::NotSortable(column));
        }

        let direction = direction.unwrap_or_else(|| SortState::next_direction(self.sort_state, column));
        let previous = self.sort_state.map(|state| state.column);
        self.sort_state = Some(SortState { column, direction });

        self.refresh();
        self.events.emit(&Event::ColumnsSort {
            column,
            direction,
            previous,
        });
        true
    }

    pub fn sort_state(&self) -> Option<SortState> {
        self.sort_state
    }

    /// Replace the date parser used for date columns
    pub fn set_date_parser(&mut self, parser: Box<dyn DateParser>) {
        self.sorter.set_date_parser(parser);
        self.refresh();
    }

    // --- Pagination ---

    /// Go to `page`; out-of-range pages and the current page are rejected
    pub fn page(&mut self, page: usize) -> bool {
        match self.paginator.go_to(page) {
            Ok(true) => {
                self.render();
                self.events.emit(&Event::Page { page });
                true
            }
            Ok(false) => false,
            Err(err) => self.reject("page", err),
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.page(self.paginator.current_page() + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        if self.paginator.is_first_page() {
            return false;
        }
        self.page(self.paginator.current_page() - 1)
    }

    /// Change the number of rows per page
    pub fn set_per_page(&mut self, per_page: usize) -> bool {
        if let Err(err) = self.paginator.set_per_page(per_page) {
            return self.reject("set_per_page", err);
        }
        self.config.per_page = per_page;
        self.update();
        true
    }

    pub fn current_page(&self) -> usize {
        self.paginator.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.paginator.total_pages()
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    /// Natural-order positions of the active rows, in display order
    pub fn active_rows(&self) -> &[usize] {
        &self.active
    }

    /// Rows shown on the current page
    pub fn page_rows(&self) -> Vec<&Row> {
        self.paginator
            .current_rows()
            .iter()
            .filter_map(|&p| self.table.row(p))
            .collect()
    }

    pub fn page_info(&self) -> PageInfo {
        let (start, end) = self.paginator.bounds().unwrap_or((0, 0));
        PageInfo {
            start,
            end,
            rows: self.paginator.total_rows(),
            page: self.paginator.current_page(),
            pages: self.paginator.total_pages(),
        }
    }

    /// The info label for the current page
    pub fn info(&self) -> String {
        self.config.labels.info_text(&self.page_info())
    }

    // --- Rows ---

    /// Insert a row at `at` (default: the start)
    pub fn add_row<I, S>(&mut self, values: I, at: Option<usize>) -> RowId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = values.into_iter().map(Into::into).collect();
        let ids = self.add_rows(vec![row], at);
        ids[0]
    }

    /// Insert a batch of rows at `at`, keeping their order
    pub fn add_rows(&mut self, rows: Vec<Vec<String>>, at: Option<usize>) -> Vec<RowId> {
        let ids = self.table.add_rows(rows, at);
        if ids.is_empty() {
            return ids;
        }
        self.refresh();
        self.events.emit(&Event::RowsAdd { rows: ids.clone() });
        ids
    }

    pub fn remove_row(&mut self, row: impl Into<RowRef>) -> bool {
        self.remove_rows(&[row.into()])
    }

    /// Remove rows by handle or position; nothing is removed if any reference is unknown
    pub fn remove_rows(&mut self, rows: &[RowRef]) -> bool {
        match self.table.remove_rows(rows) {
            Ok(removed) => {
                self.refresh();
                self.events.emit(&Event::RowsRemove {
                    rows: removed.iter().map(|r| r.id).collect(),
                });
                true
            }
            Err(err) => self.reject("remove_rows", err),
        }
    }

    // --- Columns ---

    /// Append a column, returning its index
    pub fn add_column(&mut self, spec: ColumnSpec) -> usize {
        let column = self.table.add_column(spec);
        self.refresh();
        self.events.emit(&Event::ColumnsAdd { column });
        column
    }

    pub fn remove_columns(&mut self, columns: &[usize]) -> bool {
        if let Err(err) = self.table.remove_columns(columns) {
            return self.reject("remove_columns", err);
        }

        let mut removed = columns.to_vec();
        removed.sort_unstable();
        removed.dedup();

        let shift = |column: usize| {
            if removed.binary_search(&column).is_ok() {
                None
            } else {
                Some(column - removed.iter().filter(|&&r| r < column).count())
            }
        };
        self.remap_columns(shift);

        self.refresh();
        self.events.emit(&Event::ColumnsRemove { columns: removed });
        true
    }

    /// Reorder columns; `order[i]` is the current column that moves to position `i`
    pub fn order_columns(&mut self, order: &[usize]) -> bool {
        if let Err(err) = self.table.reorder_columns(order) {
            return self.reject("order_columns", err);
        }

        self.remap_columns(|column| order.iter().position(|&c| c == column));

        self.refresh();
        self.events.emit(&Event::ColumnsOrder {
            order: order.to_vec(),
        });
        true
    }

    /// Carry the sort and search columns across a column move or removal
    fn remap_columns<F>(&mut self, remap: F)
    where
        F: Fn(usize) -> Option<usize>,
    {
        self.sort_state = self.sort_state.and_then(|state| {
            remap(state.column).map(|column| SortState { column, ..state })
        });

        if let Some(column) = self.search.as_ref().and_then(|options| options.column) {
            match remap(column) {
                Some(moved) => {
                    if let Some(options) = self.search.as_mut() {
                        options.column = Some(moved);
                    }
                }
                None => self.search = None,
            }
        }
    }

    pub fn hide_columns(&mut self, columns: &[usize]) -> bool {
        if let Err(err) = self.table.hide_columns(columns) {
            return self.reject("hide_columns", err);
        }
        self.refresh();
        self.events.emit(&Event::ColumnsHide {
            columns: columns.to_vec(),
        });
        true
    }

    pub fn show_columns(&mut self, columns: &[usize]) -> bool {
        if let Err(err) = self.table.show_columns(columns) {
            return self.reject("show_columns", err);
        }
        self.refresh();
        self.events.emit(&Event::ColumnsShow {
            columns: columns.to_vec(),
        });
        true
    }

    /// Visibility of the given columns, or of every column
    pub fn visible(&self, columns: Option<&[usize]>) -> Vec<bool> {
        self.table.columns().visible(columns)
    }

    /// Rewrite the content of the given columns through `render`
    pub fn render_column<F>(&mut self, columns: &[usize], render: F) -> bool
    where
        F: FnMut(&Cell, &Row) -> String,
    {
        if let Err(err) = self.table.map_column_content(columns, render) {
            return self.reject("render_column", err);
        }
        self.refresh();
        true
    }

    // --- Cells ---

    pub fn set_cell(&mut self, row: impl Into<RowRef>, column: usize, content: impl Into<String>) -> bool {
        if let Err(err) = self.table.set_cell(row, column, content) {
            return self.reject("set_cell", err);
        }
        self.refresh();
        true
    }

    pub fn set_heading(&mut self, column: usize, heading: impl Into<String>) -> bool {
        if let Err(err) = self.table.set_heading(column, heading) {
            return self.reject("set_heading", err);
        }
        self.update();
        true
    }

    // --- Import / export ---

    /// Import CSV or JSON text, returning the number of rows added.
    ///
    /// An empty table is built from the payload. Otherwise imported headings
    /// overwrite existing ones by position and rows are appended.
    pub fn import(&mut self, options: &ImportOptions) -> Result<usize> {
        let data = match import::parse(options) {
            Ok(data) => data,
            Err(err) => {
                warn!(format = ?options.format, error = %err, "import failed");
                return Err(err.into());
            }
        };

        let rows = data.data.as_ref().map(Vec::len).unwrap_or(0);

        if self.table.column_count() == 0 {
            self.table.build(data.headings, data.data);
        } else {
            if let Some(headings) = data.headings {
                let count = self.table.column_count();
                for (column, heading) in headings.into_iter().take(count).enumerate() {
                    self.table.set_heading(column, heading)?;
                }
            }
            if let Some(data) = data.data {
                let at = self.table.row_count();
                self.table.add_rows(data, Some(at));
            }
        }

        self.refresh();
        self.events.emit(&Event::Import { rows });
        Ok(rows)
    }

    /// Export the active rows in display order
    pub fn export(&self, options: &ExportOptions) -> Result<String> {
        let rows = options.selection.resolve(&self.paginator);
        export::export(&self.table, &rows, options)
    }

    // --- Events ---

    /// Listen for an event
    pub fn on<F>(&mut self, kind: EventKind, listener: F) -> Subscription
    where
        F: FnMut(&Event) + 'static,
    {
        self.events.subscribe(kind, listener)
    }

    /// Stop listening; returns `false` if the listener was already removed
    pub fn off(&mut self, subscription: Subscription) -> bool {
        self.events.unsubscribe(subscription)
    }

    // --- Accessors ---

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}
