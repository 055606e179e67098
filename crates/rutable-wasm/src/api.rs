use js_sys::Function;
use rutable_core::import::value_to_string;
use rutable_core::{
    ColumnSelect, ColumnSpec, Config, DataTable, Direction, EventKind, ExportOptions, GridError,
    ImportOptions, RowRef, Subscription, TableData,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use tracing::debug;
use wasm_bindgen::prelude::*;

use crate::render::{CallQueue, JsRenderer};

/// Data table exposed to JavaScript.
///
/// Render callbacks and event listeners run after the table is released, so
/// they may call back into the grid, including methods that change it.
#[wasm_bindgen]
pub struct DataGrid {
    table: RefCell<DataTable<JsRenderer>>,
    queue: CallQueue,
    listeners: RefCell<HashMap<u32, Subscription>>,
    next_listener: Cell<u32>,
}

/// Structured error object for JavaScript
#[derive(Serialize)]
pub struct JsRuTableError {
    code: String,
    message: String,
}

impl From<GridError> for JsRuTableError {
    fn from(err: GridError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl JsRuTableError {
    fn from_error<E: std::fmt::Display>(err: E) -> JsValue {
        let error = Self {
            code: "ERROR".to_string(),
            message: err.to_string(),
        };
        serde_wasm_bindgen::to_value(&error).unwrap_or(JsValue::NULL)
    }
}

fn to_js_error(err: GridError) -> JsValue {
    let js_error = JsRuTableError::from(err);
    serde_wasm_bindgen::to_value(&js_error).unwrap_or(JsValue::NULL)
}

/// Row reference from JavaScript: `{"id": 3}` or `{"index": 0}`
#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum RowRefData {
    Id(u64),
    Index(usize),
}

impl From<RowRefData> for RowRef {
    fn from(data: RowRefData) -> Self {
        match data {
            RowRefData::Id(id) => RowRef::Id(rutable_core::RowId(id)),
            RowRefData::Index(index) => RowRef::Index(index),
        }
    }
}

/// Column indices given as a single number or an array
fn parse_columns(json: &str) -> Option<Vec<usize>> {
    match serde_json::from_str::<ColumnSelect>(json) {
        Ok(select) => Some(select.indices()),
        Err(err) => {
            debug!(error = %err, "invalid column selection");
            None
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

impl DataGrid {
    fn from_config(config_json: &str) -> Result<Self, GridError> {
        let config = if config_json.trim().is_empty() {
            Config::default()
        } else {
            Config::from_json(config_json)?
        };
        let queue = CallQueue::default();
        let table = DataTable::with_renderer(config, JsRenderer::new(queue.clone()))?;
        Ok(Self {
            table: RefCell::new(table),
            queue,
            listeners: RefCell::new(HashMap::new()),
            next_listener: Cell::new(0),
        })
    }

    /// Run `f` against the table, then deliver the JavaScript calls it queued
    fn with_table<T>(&self, f: impl FnOnce(&mut DataTable<JsRenderer>) -> T) -> T {
        let result = f(&mut self.table.borrow_mut());
        self.queue.flush();
        result
    }

    fn read<T>(&self, f: impl FnOnce(&DataTable<JsRenderer>) -> T) -> T {
        f(&self.table.borrow())
    }
}

#[wasm_bindgen]
impl DataGrid {
    /// Create a data table from a JSON configuration (camelCase keys)
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<DataGrid, JsValue> {
        Self::from_config(config_json).map_err(to_js_error)
    }

    /// Apply column options and render the first page. Safe to call twice.
    pub fn init(&self) -> Result<(), JsValue> {
        self.with_table(|table| table.init()).map_err(to_js_error)
    }

    /// Re-paginate and render
    pub fn update(&self) {
        self.with_table(|table| table.update());
    }

    /// Show a message in place of the rows until the next render
    #[wasm_bindgen(js_name = setMessage)]
    pub fn set_message(&self, message: &str) {
        self.with_table(|table| table.set_message(message));
    }

    // --- Render callbacks ---

    /// Receives the page view: `{headers, rows, page, totalPages}`
    #[wasm_bindgen(js_name = setPageRenderer)]
    pub fn set_page_renderer(&self, callback: Option<Function>) {
        self.table.borrow_mut().renderer_mut().page = callback;
    }

    /// Receives the pager buttons: `[{kind, label, page, active, ellipsis}]`
    #[wasm_bindgen(js_name = setPagerRenderer)]
    pub fn set_pager_renderer(&self, callback: Option<Function>) {
        self.table.borrow_mut().renderer_mut().pager = callback;
    }

    #[wasm_bindgen(js_name = setInfoRenderer)]
    pub fn set_info_renderer(&self, callback: Option<Function>) {
        self.table.borrow_mut().renderer_mut().info = callback;
    }

    /// Receives the placeholder shown when no rows match
    #[wasm_bindgen(js_name = setMessageRenderer)]
    pub fn set_message_renderer(&self, callback: Option<Function>) {
        self.table.borrow_mut().renderer_mut().message = callback;
    }

    // --- Search / sort / pages ---

    pub fn search(&self, query: &str, column: Option<u32>) -> bool {
        self.with_table(|table| table.search(query, column.map(|c| c as usize)))
    }

    /// Sort by column; `direction` is "asc", "desc" or omitted to toggle
    pub fn sort(&self, column: u32, direction: Option<String>) -> bool {
        let direction = match direction.as_deref() {
            None => None,
            Some("asc") => Some(Direction::Asc),
            Some("desc") => Some(Direction::Desc),
            Some(other) => {
                debug!(direction = other, "unknown sort direction");
                return false;
            }
        };
        self.with_table(|table| table.sort(column as usize, direction))
    }

    pub fn page(&self, page: u32) -> bool {
        self.with_table(|table| table.page(page as usize))
    }

    #[wasm_bindgen(js_name = nextPage)]
    pub fn next_page(&self) -> bool {
        self.with_table(|table| table.next_page())
    }

    #[wasm_bindgen(js_name = prevPage)]
    pub fn prev_page(&self) -> bool {
        self.with_table(|table| table.prev_page())
    }

    #[wasm_bindgen(js_name = setPerPage)]
    pub fn set_per_page(&self, per_page: u32) -> bool {
        self.with_table(|table| table.set_per_page(per_page as usize))
    }

    // --- Rows ---

    /// Insert rows given as a JSON array of arrays.
    /// Returns a JSON array of the new row ids.
    #[wasm_bindgen(js_name = addRows)]
    pub fn add_rows(&self, rows_json: &str, at: Option<u32>) -> Result<String, JsValue> {
        let rows: Vec<Vec<Value>> =
            serde_json::from_str(rows_json).map_err(JsRuTableError::from_error)?;
        let rows = rows
            .iter()
            .map(|row| row.iter().map(value_to_string).collect())
            .collect();

        let ids = self.with_table(|table| table.add_rows(rows, at.map(|a| a as usize)));
        serde_json::to_string(&ids).map_err(JsRuTableError::from_error)
    }

    /// Remove rows given as a JSON array of `{"id": n}` or `{"index": n}`
    #[wasm_bindgen(js_name = removeRows)]
    pub fn remove_rows(&self, rows_json: &str) -> bool {
        let refs: Vec<RowRefData> = match serde_json::from_str(rows_json) {
            Ok(refs) => refs,
            Err(err) => {
                debug!(error = %err, "invalid row references");
                return false;
            }
        };
        let refs: Vec<RowRef> = refs.into_iter().map(RowRef::from).collect();
        self.with_table(|table| table.remove_rows(&refs))
    }

    // --- Columns ---

    /// Append a column from `{heading, data, columnType, sortable}`; returns its index
    #[wasm_bindgen(js_name = addColumn)]
    pub fn add_column(&self, spec_json: &str) -> Result<u32, JsValue> {
        let spec: ColumnSpec =
            serde_json::from_str(spec_json).map_err(JsRuTableError::from_error)?;
        Ok(self.with_table(|table| table.add_column(spec)) as u32)
    }

    #[wasm_bindgen(js_name = removeColumns)]
    pub fn remove_columns(&self, columns_json: &str) -> bool {
        parse_columns(columns_json)
            .map(|columns| self.with_table(|table| table.remove_columns(&columns)))
            .unwrap_or(false)
    }

    /// Reorder columns with a JSON permutation array
    #[wasm_bindgen(js_name = orderColumns)]
    pub fn order_columns(&self, order_json: &str) -> bool {
        match serde_json::from_str::<Vec<usize>>(order_json) {
            Ok(order) => self.with_table(|table| table.order_columns(&order)),
            Err(err) => {
                debug!(error = %err, "invalid column order");
                false
            }
        }
    }

    #[wasm_bindgen(js_name = hideColumns)]
    pub fn hide_columns(&self, columns_json: &str) -> bool {
        parse_columns(columns_json)
            .map(|columns| self.with_table(|table| table.hide_columns(&columns)))
            .unwrap_or(false)
    }

    #[wasm_bindgen(js_name = showColumns)]
    pub fn show_columns(&self, columns_json: &str) -> bool {
        parse_columns(columns_json)
            .map(|columns| self.with_table(|table| table.show_columns(&columns)))
            .unwrap_or(false)
    }

    /// JSON array of visibility flags for the given columns, or all columns
    pub fn visible(&self, columns_json: Option<String>) -> String {
        let columns = columns_json.as_deref().and_then(parse_columns);
        to_json(&self.read(|table| table.visible(columns.as_deref())))
    }

    // --- Cells ---

    /// Edit a body cell addressed by natural-order row position
    #[wasm_bindgen(js_name = setCell)]
    pub fn set_cell(&self, row: u32, column: u32, content: &str) -> bool {
        self.with_table(|table| table.set_cell(row as usize, column as usize, content))
    }

    #[wasm_bindgen(js_name = setHeading)]
    pub fn set_heading(&self, column: u32, heading: &str) -> bool {
        self.with_table(|table| table.set_heading(column as usize, heading))
    }

    // --- Import / export ---

    /// Import `{type: "csv" | "json", data, columnDelimiter, headings}`;
    /// returns the number of rows added
    pub fn import(&self, options_json: &str) -> Result<u32, JsValue> {
        let options: ImportOptions =
            serde_json::from_str(options_json).map_err(JsRuTableError::from_error)?;
        let rows = self.with_table(|table| table.import(&options)).map_err(to_js_error)?;
        Ok(rows as u32)
    }

    /// Export the active rows as CSV, JSON or SQL text
    pub fn export(&self, options_json: &str) -> Result<String, JsValue> {
        let options: ExportOptions = if options_json.trim().is_empty() {
            ExportOptions::default()
        } else {
            serde_json::from_str(options_json).map_err(JsRuTableError::from_error)?
        };
        self.read(|table| table.export(&options)).map_err(to_js_error)
    }

    // --- Queries ---

    pub fn info(&self) -> String {
        self.read(|table| table.info())
    }

    /// JSON `{start, end, rows, page, pages}`
    #[wasm_bindgen(js_name = pageInfo)]
    pub fn page_info(&self) -> String {
        to_json(&self.read(|table| table.page_info()))
    }

    #[wasm_bindgen(js_name = currentPage)]
    pub fn current_page(&self) -> u32 {
        self.read(|table| table.current_page()) as u32
    }

    #[wasm_bindgen(js_name = totalPages)]
    pub fn total_pages(&self) -> u32 {
        self.read(|table| table.total_pages()) as u32
    }

    /// JSON page view of the current page
    #[wasm_bindgen(js_name = getPage)]
    pub fn get_page(&self) -> String {
        to_json(&self.read(|table| table.page_view()))
    }

    /// JSON pager buttons for the current page
    #[wasm_bindgen(js_name = getPager)]
    pub fn get_pager(&self) -> String {
        to_json(&self.read(|table| table.pager()))
    }

    #[wasm_bindgen(js_name = getColumns)]
    pub fn get_columns(&self) -> String {
        self.read(|table| {
            let columns: Vec<_> = table.table().columns().iter().collect();
            to_json(&columns)
        })
    }

    /// JSON `{headings, data}` of the whole table in natural order
    #[wasm_bindgen(js_name = getData)]
    pub fn get_data(&self) -> String {
        self.read(|table| {
            let table = table.table();
            let data = TableData {
                headings: Some(table.columns().headings()),
                data: Some(table.rows().iter().map(|row| row.values()).collect()),
            };
            to_json(&data)
        })
    }

    /// JSON `{column, direction}` or `null`
    #[wasm_bindgen(js_name = sortState)]
    pub fn sort_state(&self) -> String {
        to_json(&self.read(|table| table.sort_state()))
    }

    #[wasm_bindgen(js_name = isSearching)]
    pub fn is_searching(&self) -> bool {
        self.read(|table| table.is_searching())
    }

    // --- Events ---

    /// Listen for an event such as "page" or "columns.sort".
    /// The callback receives the event payload; returns a listener id for `off`.
    pub fn on(&self, event: &str, callback: Function) -> Result<u32, JsValue> {
        let kind: EventKind = event.parse().map_err(JsRuTableError::from_error)?;
        let queue = self.queue.clone();
        let subscription = self
            .table
            .borrow_mut()
            .on(kind, move |event| queue.push(&callback, event));

        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        self.listeners.borrow_mut().insert(id, subscription);
        Ok(id)
    }

    pub fn off(&self, listener: u32) -> bool {
        let subscription = self.listeners.borrow_mut().remove(&listener);
        match subscription {
            Some(subscription) => self.table.borrow_mut().off(subscription),
            None => false,
        }
    }
}
