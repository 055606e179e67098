use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::cell::Cell;
use crate::column::{ColumnMeta, Columns};
use crate::error::{GridError, Result};
use crate::import::deserialize_rows;
use crate::row::{Row, RowId, RowRef};

/// Raw `{headings, data}` payload used to materialize a table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headings: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_rows", skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Vec<String>>>,
}

impl TableData {
    pub fn new<H, R, S>(headings: H, data: Vec<R>) -> Self
    where
        H: IntoIterator<Item = S>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TableData {
            headings: Some(headings.into_iter().map(Into::into).collect()),
            data: Some(
                data.into_iter()
                    .map(|row| row.into_iter().map(Into::into).collect())
                    .collect(),
            ),
        }
    }
}

/// Column to append with [`Table::add_column`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    #[serde(default)]
    pub heading: String,
    /// Values indexed by natural-order row position; missing entries are empty
    #[serde(default, deserialize_with = "crate::import::deserialize_values")]
    pub data: Vec<String>,
    #[serde(flatten)]
    pub meta: ColumnMeta,
}

impl ColumnSpec {
    pub fn new(heading: impl Into<String>) -> Self {
        ColumnSpec {
            heading: heading.into(),
            ..Default::default()
        }
    }

    pub fn with_data<I, S>(mut self, data: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data = data.into_iter().map(Into::into).collect();
        self
    }
}

/// The table model: an optional header row plus body rows in natural order.
///
/// Every body row holds exactly as many cells as the header, and body row
/// indices are kept contiguous after every mutation. Deserialized tables are
/// repaired on the way in, so the same holds for adopted ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTable", rename_all = "camelCase")]
pub struct Table {
    header: Option<Row>,
    rows: Vec<Row>,
    next_id: u64,
}

/// Table as it arrives over the wire, before repair
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTable {
    #[serde(default)]
    header: Option<Row>,
    #[serde(default)]
    rows: Vec<Row>,
    #[serde(default)]
    next_id: u64,
}

impl From<RawTable> for Table {
    fn from(raw: RawTable) -> Self {
        let mut table = Table {
            header: raw.header,
            rows: raw.rows,
            next_id: raw.next_id,
        };
        table.repair();
        table
    }
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize a table from a `{headings, data}` payload
    pub fn from_data(data: TableData) -> Self {
        let mut table = Table::new();
        table.build(data.headings, data.data);
        table
    }

    /// Replace the header and/or the body wholesale.
    ///
    /// Returns `false` without touching the table when neither is supplied.
    pub fn build(&mut self, headings: Option<Vec<String>>, data: Option<Vec<Vec<String>>>) -> bool {
        if headings.is_none() && data.is_none() {
            return false;
        }

        if let Some(headings) = headings {
            let id = self.allocate_id();
            self.header = Some(Row::header(id, headings));
        }

        if let Some(data) = data {
            self.rows.clear();
            for values in data {
                let id = self.allocate_id();
                self.rows.push(Row::new(id, 0, values));
            }
        }

        if self.header.is_none() {
            if let Some(width) = self.rows.first().map(Row::len) {
                self.synthesize_header(width);
            }
        }

        self.normalize();
        true
    }

    // --- Accessors ---

    pub fn header(&self) -> Option<&Row> {
        self.header.as_ref()
    }

    pub fn has_header(&self) -> bool {
        self.header.is_some()
    }

    /// Body rows in natural order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        match &self.header {
            Some(header) => header.len(),
            None => self.rows.first().map(Row::len).unwrap_or(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> Columns<'_> {
        Columns::new(self)
    }

    /// Resolve a row reference to its natural-order position
    pub fn position_of(&self, row: RowRef) -> Result<usize> {
        match row {
            RowRef::Index(index) if index < self.rows.len() => Ok(index),
            RowRef::Index(index) => Err(GridError::RowOutOfRange {
                index,
                count: self.rows.len(),
            }),
            RowRef::Id(id) => self
                .rows
                .iter()
                .position(|r| r.id == id)
                .ok_or(GridError::UnknownRow(id.0)),
        }
    }

    // --- Rows ---

    /// Insert a row at `at` (default: the start), returning its handle.
    ///
    /// Positions past the end append. The row is padded or truncated to the
    /// column count; a table without a header gets an empty one sized to the row.
    pub fn add_row<I, S>(&mut self, values: I, at: Option<usize>) -> RowId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids = self.add_rows(vec![values.into_iter().map(Into::into).collect()], at);
        ids[0]
    }

    /// Insert a batch of rows at `at`, keeping their order. Re-indexes once.
    pub fn add_rows(&mut self, data: Vec<Vec<String>>, at: Option<usize>) -> Vec<RowId> {
        if data.is_empty() {
            return Vec::new();
        }

        if self.header.is_none() {
            let width = if self.rows.is_empty() {
                data[0].len()
            } else {
                self.column_count()
            };
            self.synthesize_header(width);
        }

        let width = self.column_count();
        let at = at.unwrap_or(0).min(self.rows.len());

        let mut new_rows = Vec::with_capacity(data.len());
        for values in data {
            let id = self.allocate_id();
            let mut row = Row::new(id, 0, values);
            row.fit_to(width);
            new_rows.push(row);
        }

        let ids = new_rows.iter().map(|r| r.id).collect();
        self.rows.splice(at..at, new_rows);
        self.reindex();
        ids
    }

    /// Remove a single row by handle or position
    pub fn remove_row(&mut self, row: impl Into<RowRef>) -> Result<Row> {
        let position = self.position_of(row.into())?;
        let removed = self.rows.remove(position);
        self.reindex();
        Ok(removed)
    }

    /// Remove several rows at once.
    ///
    /// All references are resolved before anything is removed; an unknown
    /// reference aborts the whole call. Removed rows are returned in natural order.
    pub fn remove_rows(&mut self, rows: &[RowRef]) -> Result<Vec<Row>> {
        let mut positions = rows
            .iter()
            .map(|&r| self.position_of(r))
            .collect::<Result<Vec<_>>>()?;
        positions.sort_unstable();
        positions.dedup();

        let mut removed = Vec::with_capacity(positions.len());
        for &position in positions.iter().rev() {
            removed.push(self.rows.remove(position));
        }
        removed.reverse();

        self.reindex();
        Ok(removed)
    }

    /// Reassign body row indices to `0..n`
    pub fn reindex(&mut self) {
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.index = i;
        }
    }

    // --- Columns ---

    /// Append a column to the header and every body row, returning its index
    pub fn add_column(&mut self, spec: ColumnSpec) -> usize {
        let index = self.column_count();

        let mut heading = Cell::new(spec.heading, index);
        heading.meta = spec.meta;
        match &mut self.header {
            Some(header) => header.cells.push(heading),
            None => {
                let id = self.allocate_id();
                let mut header = Row::header(id, Vec::<String>::new());
                header.fit_to(index);
                header.cells.push(heading);
                self.header = Some(header);
            }
        }

        for (i, row) in self.rows.iter_mut().enumerate() {
            let content = spec.data.get(i).cloned().unwrap_or_default();
            row.cells.push(Cell::new(content, index));
        }

        index
    }

    /// Remove columns from the header and every row.
    ///
    /// Indices are validated up front and removed in descending order.
    pub fn remove_columns(&mut self, indices: &[usize]) -> Result<()> {
        self.check_columns(indices)?;

        let mut indices = indices.to_vec();
        indices.sort_unstable_by(|a, b| b.cmp(a));
        indices.dedup();

        for row in self.all_rows_mut() {
            for &index in &indices {
                row.cells.remove(index);
            }
            row.reindex_cells();
        }

        Ok(())
    }

    /// Permute the columns of the header and every row.
    ///
    /// `order[i]` names the current column that moves to position `i`.
    pub fn reorder_columns(&mut self, order: &[usize]) -> Result<()> {
        let count = self.column_count();
        if order.len() != count {
            return Err(GridError::InvalidOrder(format!(
                "expected {} columns, got {}",
                count,
                order.len()
            )));
        }

        let mut seen = vec![false; count];
        for &column in order {
            if column >= count {
                return Err(GridError::ColumnOutOfRange { index: column, count });
            }
            if std::mem::replace(&mut seen[column], true) {
                return Err(GridError::InvalidOrder(format!("column {} repeated", column)));
            }
        }

        for row in self.all_rows_mut() {
            let mut old: Vec<Option<Cell>> = row.cells.drain(..).map(Some).collect();
            row.cells = order.iter().filter_map(|&column| old[column].take()).collect();
            row.reindex_cells();
        }

        Ok(())
    }

    pub fn hide_columns(&mut self, indices: &[usize]) -> Result<()> {
        self.set_columns_hidden(indices, true)
    }

    pub fn show_columns(&mut self, indices: &[usize]) -> Result<()> {
        self.set_columns_hidden(indices, false)
    }

    /// Attach sort metadata to a header cell
    pub fn set_column_meta(&mut self, index: usize, meta: ColumnMeta) -> Result<()> {
        self.check_columns(&[index])?;
        if let Some(cell) = self.header.as_mut().and_then(|h| h.cell_mut(index)) {
            cell.meta = meta;
        }
        Ok(())
    }

    // --- Cells ---

    /// Edit a body cell in place; its original content is kept
    pub fn set_cell(&mut self, row: impl Into<RowRef>, column: usize, content: impl Into<String>) -> Result<()> {
        let position = self.position_of(row.into())?;
        self.check_columns(&[column])?;
        if let Some(cell) = self.rows[position].cell_mut(column) {
            cell.set_content(content);
        }
        Ok(())
    }

    /// Edit a header cell in place
    pub fn set_heading(&mut self, column: usize, content: impl Into<String>) -> Result<()> {
        self.check_columns(&[column])?;
        if let Some(cell) = self.header.as_mut().and_then(|h| h.cell_mut(column)) {
            cell.set_content(content);
        }
        Ok(())
    }

    /// Rewrite the content of every body cell in the given columns
    pub fn map_column_content<F>(&mut self, columns: &[usize], mut f: F) -> Result<()>
    where
        F: FnMut(&Cell, &Row) -> String,
    {
        self.check_columns(columns)?;
        for row in self.rows.iter_mut() {
            for &column in columns {
                let content = f(&row.cells[column], row);
                row.cells[column].set_content(content);
            }
        }
        Ok(())
    }

    /// Restore the table invariants on a table built outside this module.
    ///
    /// The header is flagged as such, body rows are fitted to the header width,
    /// and positions are re-indexed. Row handles that collide with an earlier
    /// one are replaced, and allocation resumes past the largest handle.
    pub fn repair(&mut self) {
        let largest = self
            .header
            .iter()
            .chain(self.rows.iter())
            .map(|row| row.id.0 + 1)
            .max()
            .unwrap_or(0);
        self.next_id = self.next_id.max(largest);

        let mut seen = HashSet::new();
        if let Some(header) = &mut self.header {
            header.is_header = true;
            header.index = 0;
            seen.insert(header.id);
        }

        let mut next_id = self.next_id;
        for row in self.rows.iter_mut() {
            row.is_header = false;
            if !seen.insert(row.id) {
                row.id = RowId(next_id);
                next_id += 1;
                seen.insert(row.id);
            }
        }
        self.next_id = next_id;

        if self.header.is_none() {
            if let Some(width) = self.rows.first().map(Row::len) {
                self.synthesize_header(width);
            }
        }

        self.normalize();

        if let Some(header) = &self.header {
            let hidden: Vec<bool> = header.cells.iter().map(|c| c.hidden).collect();
            for row in self.rows.iter_mut() {
                for (cell, &hidden) in row.cells.iter_mut().zip(&hidden) {
                    cell.hidden = hidden;
                }
            }
        }
    }

    // --- Internals ---

    fn allocate_id(&mut self) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;
        id
    }

    fn synthesize_header(&mut self, width: usize) {
        let id = self.allocate_id();
        self.header = Some(Row::header(id, vec![String::new(); width]));
    }

    /// Fit every body row to the header width and restore contiguous indices
    fn normalize(&mut self) {
        let width = self.column_count();
        for row in self.rows.iter_mut() {
            row.fit_to(width);
            row.reindex_cells();
        }
        if let Some(header) = &mut self.header {
            header.reindex_cells();
        }
        self.reindex();
    }

    fn check_columns(&self, indices: &[usize]) -> Result<()> {
        let count = self.column_count();
        match indices.iter().find(|&&i| i >= count) {
            Some(&index) => Err(GridError::ColumnOutOfRange { index, count }),
            None => Ok(()),
        }
    }

    fn set_columns_hidden(&mut self, indices: &[usize], hidden: bool) -> Result<()> {
        self.check_columns(indices)?;
        for row in self.all_rows_mut() {
            for &index in indices {
                row.cells[index].hidden = hidden;
            }
        }
        Ok(())
    }

    fn all_rows_mut(&mut self) -> impl Iterator<Item = &mut Row> + '_ {
        self.header.iter_mut().chain(self.rows.iter_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Table {
        Table::from_data(TableData::new(
            vec!["Name", "Age", "City"],
            vec![
                vec!["Bob", "30", "Oslo"],
                vec!["Ann", "25", "Rome"],
                vec!["Cid", "41", "Lima"],
            ],
        ))
    }

    fn assert_indices_contiguous(table: &Table) {
        for (i, row) in table.rows().iter().enumerate() {
            assert_eq!(row.index, i);
            assert_eq!(row.len(), table.column_count());
            for (j, cell) in row.cells.iter().enumerate() {
                assert_eq!(cell.index, j);
            }
        }
    }

    /// Two-column header, a one-cell row and a three-cell row, all sharing id 0
    const RAGGED: &str = r#"{
        "header": {"id": 0, "cells": [
            {"content": "A", "originalContent": "A"},
            {"content": "B", "originalContent": "B", "hidden": true}
        ]},
        "rows": [
            {"id": 0, "isHeader": true, "cells": [{"content": "x", "originalContent": "x"}]},
            {"id": 4, "index": 9, "cells": [
                {"content": "1", "originalContent": "1"},
                {"content": "2", "originalContent": "2"},
                {"content": "3", "originalContent": "3"}
            ]}
        ]
    }"#;

    #[test]
    fn test_deserialize_repairs_ragged_rows() {
        let mut table: Table = serde_json::from_str(RAGGED).unwrap();

        assert!(table.header().unwrap().is_header);
        assert!(!table.rows()[0].is_header);
        assert_eq!(table.rows()[0].values(), vec!["x", ""]);
        assert_eq!(table.rows()[1].values(), vec!["1", "2"]);
        assert!(table.rows()[0].cells[1].hidden);
        assert_indices_contiguous(&table);

        table.show_columns(&[1]).unwrap();
        table.remove_columns(&[0]).unwrap();
        table.reorder_columns(&[0]).unwrap();
        assert_eq!(table.rows()[0].values(), vec![""]);
    }

    #[test]
    fn test_repair_gives_unique_handles() {
        let mut table: Table = serde_json::from_str(RAGGED).unwrap();
        let mut ids: Vec<RowId> = table.header().into_iter().chain(table.rows()).map(|r| r.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);

        let added = table.add_row(["y"], None);
        assert!(added.0 > 4);
        assert_eq!(table.position_of(RowRef::Id(RowId(4))), Ok(2));
    }

    #[test]
    fn test_serialize_round_trip_keeps_next_id() {
        let mut table = people();
        let removed = table.rows()[2].id;
        table.remove_row(removed).unwrap();

        let json = serde_json::to_string(&table).unwrap();
        let mut restored: Table = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, table);
        assert_ne!(restored.add_row(["Eve"], None), removed);
    }

    #[test]
    fn test_build_from_data() {
        let table = people();
        assert!(table.has_header());
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.header().unwrap().values(), vec!["Name", "Age", "City"]);
        assert!(table.header().unwrap().is_header);
        assert_indices_contiguous(&table);
    }

    #[test]
    fn test_build_without_input_is_noop() {
        let mut table = people();
        let before = table.clone();
        assert!(!table.build(None, None));
        assert_eq!(table, before);
    }

    #[test]
    fn test_build_pads_short_and_truncates_long_rows() {
        let table = Table::from_data(TableData::new(
            vec!["A", "B"],
            vec![vec!["1"], vec!["1", "2", "3"]],
        ));
        assert_eq!(table.rows()[0].values(), vec!["1", ""]);
        assert_eq!(table.rows()[1].values(), vec!["1", "2"]);
    }

    #[test]
    fn test_build_data_only_synthesizes_header() {
        let mut table = Table::new();
        table.build(None, Some(vec![vec!["a".into(), "b".into()]]));
        assert_eq!(table.header().unwrap().values(), vec!["", ""]);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_add_row_defaults_to_start() {
        let mut table = people();
        let id = table.add_row(["Dee", "19", "Kyiv"], None);

        assert_eq!(table.rows()[0].id, id);
        assert_eq!(table.rows()[0].values(), vec!["Dee", "19", "Kyiv"]);
        assert_indices_contiguous(&table);
    }

    #[test]
    fn test_add_rows_keeps_batch_order() {
        let mut table = people();
        table.add_rows(
            vec![vec!["X".into()], vec!["Y".into()]],
            Some(1),
        );
        let names: Vec<_> = table.rows().iter().map(|r| r.cells[0].content.clone()).collect();
        assert_eq!(names, vec!["Bob", "X", "Y", "Ann", "Cid"]);
        assert_eq!(table.rows()[1].values(), vec!["X", "", ""]);
        assert_indices_contiguous(&table);
    }

    #[test]
    fn test_add_row_to_empty_table_synthesizes_header() {
        let mut table = Table::new();
        table.add_row(["a", "b", "c"], None);
        assert!(table.has_header());
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.header().unwrap().values(), vec!["", "", ""]);
    }

    #[test]
    fn test_remove_row_by_id_and_index() {
        let mut table = people();
        let ann = table.rows()[1].id;

        let removed = table.remove_row(ann).unwrap();
        assert_eq!(removed.cells[0].content, "Ann");

        let removed = table.remove_row(0usize).unwrap();
        assert_eq!(removed.cells[0].content, "Bob");

        assert_eq!(table.row_count(), 1);
        assert_indices_contiguous(&table);

        assert_eq!(table.remove_row(ann), Err(GridError::UnknownRow(ann.0)));
        assert!(matches!(
            table.remove_row(5usize),
            Err(GridError::RowOutOfRange { index: 5, count: 1 })
        ));
    }

    #[test]
    fn test_remove_rows_descending() {
        let mut table = people();
        let cid = table.rows()[2].id;

        let removed = table
            .remove_rows(&[RowRef::Index(0), RowRef::Id(cid), RowRef::Index(0)])
            .unwrap();
        let names: Vec<_> = removed.iter().map(|r| r.cells[0].content.clone()).collect();
        assert_eq!(names, vec!["Bob", "Cid"]);

        assert_eq!(table.row_count(), 1);
        assert_eq!(table.rows()[0].cells[0].content, "Ann");
        assert_indices_contiguous(&table);
    }

    #[test]
    fn test_remove_rows_is_atomic() {
        let mut table = people();
        let result = table.remove_rows(&[RowRef::Index(0), RowRef::Index(9)]);
        assert!(result.is_err());
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_row_ids_are_never_reused() {
        let mut table = people();
        let first = table.rows()[0].id;
        table.remove_row(first).unwrap();
        let added = table.add_row(["Eve"], None);
        assert_ne!(added, first);
    }

    #[test]
    fn test_reindex_after_mixed_mutations() {
        let mut table = people();
        table.add_row(["a"], Some(2));
        table.remove_row(1usize).unwrap();
        table.add_row(["b"], Some(100));
        table.remove_rows(&[RowRef::Index(0), RowRef::Index(2)]).unwrap();
        table.add_row(["c"], None);
        assert_indices_contiguous(&table);
    }

    #[test]
    fn test_add_column() {
        let mut table = people();
        let index = table.add_column(ColumnSpec::new("Score").with_data(["10", "20"]));

        assert_eq!(index, 3);
        assert_eq!(table.column_count(), 4);
        assert_eq!(table.header().unwrap().cells[3].content, "Score");
        assert_eq!(table.rows()[0].cells[3].content, "10");
        assert_eq!(table.rows()[1].cells[3].content, "20");
        assert_eq!(table.rows()[2].cells[3].content, "");
        assert_indices_contiguous(&table);
    }

    #[test]
    fn test_add_column_to_empty_table() {
        let mut table = Table::new();
        table.add_column(ColumnSpec::new("Only"));
        assert_eq!(table.column_count(), 1);
        assert_eq!(table.header().unwrap().values(), vec!["Only"]);
    }

    #[test]
    fn test_remove_columns() {
        let mut table = people();
        table.remove_columns(&[0, 2]).unwrap();

        assert_eq!(table.header().unwrap().values(), vec!["Age"]);
        assert_eq!(table.rows()[0].values(), vec!["30"]);
        assert_indices_contiguous(&table);

        assert!(matches!(
            table.remove_columns(&[3]),
            Err(GridError::ColumnOutOfRange { index: 3, count: 1 })
        ));
    }

    #[test]
    fn test_reorder_columns() {
        let mut table = people();
        table.reorder_columns(&[2, 0, 1]).unwrap();

        assert_eq!(table.header().unwrap().values(), vec!["City", "Name", "Age"]);
        assert_eq!(table.rows()[1].values(), vec!["Rome", "Ann", "25"]);
        assert_indices_contiguous(&table);
    }

    #[test]
    fn test_reorder_columns_validates() {
        let mut table = people();
        assert!(matches!(table.reorder_columns(&[0, 1]), Err(GridError::InvalidOrder(_))));
        assert!(matches!(table.reorder_columns(&[0, 0, 1]), Err(GridError::InvalidOrder(_))));
        assert!(matches!(
            table.reorder_columns(&[0, 1, 7]),
            Err(GridError::ColumnOutOfRange { .. })
        ));
        assert_eq!(table.header().unwrap().values(), vec!["Name", "Age", "City"]);
    }

    #[test]
    fn test_hide_show_round_trip() {
        let mut table = people();
        let before = table.clone();

        table.hide_columns(&[1]).unwrap();
        assert!(table.header().unwrap().cells[1].hidden);
        assert!(table.rows().iter().all(|r| r.cells[1].hidden));
        assert_eq!(table.column_count(), 3);

        table.show_columns(&[1]).unwrap();
        assert_eq!(table, before);
    }

    #[test]
    fn test_hide_invalid_column_changes_nothing() {
        let mut table = people();
        assert!(table.hide_columns(&[0, 5]).is_err());
        assert!(!table.header().unwrap().cells[0].hidden);
    }

    #[test]
    fn test_set_cell_keeps_original() {
        let mut table = people();
        table.set_cell(0usize, 1, "31").unwrap();
        let cell = &table.rows()[0].cells[1];
        assert_eq!(cell.content, "31");
        assert_eq!(cell.original_content, "30");

        table.set_heading(1, "Years").unwrap();
        assert_eq!(table.header().unwrap().cells[1].content, "Years");
        assert!(table.set_cell(0usize, 9, "x").is_err());
    }

    #[test]
    fn test_map_column_content() {
        let mut table = people();
        table
            .map_column_content(&[1], |cell, row| format!("{}:{}", row.index, cell.content))
            .unwrap();
        assert_eq!(table.rows()[2].cells[1].content, "2:41");
        assert_eq!(table.rows()[2].cells[1].original_content, "41");
    }
}
