//! The render contract. The engine describes what to show; a [`Renderer`]
//! decides how.

use serde::Serialize;

use crate::config::Texts;
use crate::pager::PagerButton;
use crate::row::RowId;
use crate::sort::{Direction, SortState};
use crate::table::Table;

/// A visible header cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderView {
    /// Column index in the table
    pub column: usize,
    pub heading: String,
    pub sortable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Direction>,
    /// Sort glyph for the sorted column, empty otherwise
    pub indicator: String,
}

/// A body row with hidden cells left out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub id: RowId,
    pub index: usize,
    pub cells: Vec<String>,
}

/// Everything needed to draw the current page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub headers: Vec<HeaderView>,
    pub rows: Vec<RowView>,
    pub page: usize,
    pub total_pages: usize,
}

impl PageView {
    /// Build the view of `rows` (natural-order positions) for the given sort state
    pub fn build(
        table: &Table,
        rows: &[usize],
        sort: Option<SortState>,
        sortable: bool,
        texts: &Texts,
    ) -> Self {
        let headers = table
            .header()
            .map(|header| {
                header
                    .visible_cells()
                    .map(|cell| {
                        let direction = sort
                            .filter(|state| state.column == cell.index)
                            .map(|state| state.direction);
                        HeaderView {
                            column: cell.index,
                            heading: cell.content.clone(),
                            sortable: sortable && cell.meta.sortable,
                            sort: direction,
                            indicator: direction
                                .map(|d| texts.indicator(d).to_string())
                                .unwrap_or_default(),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        let rows = rows
            .iter()
            .filter_map(|&position| table.row(position))
            .map(|row| RowView {
                id: row.id,
                index: row.index,
                cells: row.visible_cells().map(|c| c.content.clone()).collect(),
            })
            .collect();

        PageView {
            headers,
            rows,
            page: 0,
            total_pages: 0,
        }
    }

    pub fn with_page(mut self, page: usize, total_pages: usize) -> Self {
        self.page = page;
        self.total_pages = total_pages;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Receives render instructions from the data table
pub trait Renderer {
    /// Draw the header and the rows of the current page
    fn render_page(&mut self, view: &PageView);

    /// Draw the pager; an empty slice removes it
    fn render_pager(&mut self, buttons: &[PagerButton]);

    fn render_info(&mut self, info: &str);

    /// Show a placeholder message in place of the rows
    fn render_message(&mut self, message: &str);
}

/// Renderer that draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render_page(&mut self, _view: &PageView) {}

    fn render_pager(&mut self, _buttons: &[PagerButton]) {}

    fn render_info(&mut self, _info: &str) {}

    fn render_message(&mut self, _message: &str) {}
}

/// Renderer that keeps the last instructions it received
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingRenderer {
    pub page: PageView,
    pub pager: Vec<PagerButton>,
    pub info: String,
    pub message: Option<String>,
    pub renders: usize,
}

impl Renderer for RecordingRenderer {
    fn render_page(&mut self, view: &PageView) {
        self.page = view.clone();
        self.message = None;
        self.renders += 1;
    }

    fn render_pager(&mut self, buttons: &[PagerButton]) {
        self.pager = buttons.to_vec();
    }

    fn render_info(&mut self, info: &str) {
        self.info = info.to_string();
    }

    fn render_message(&mut self, message: &str) {
        self.message = Some(message.to_string());
    }
}
