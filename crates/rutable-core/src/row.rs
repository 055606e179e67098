use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cell::Cell;

/// Stable handle for a body row, never reused within one table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a body row, either by handle or by natural-order position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRef {
    Id(RowId),
    Index(usize),
}

impl From<RowId> for RowRef {
    fn from(id: RowId) -> Self {
        RowRef::Id(id)
    }
}

impl From<usize> for RowRef {
    fn from(index: usize) -> Self {
        RowRef::Index(index)
    }
}

/// Ordered sequence of cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: RowId,
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub is_header: bool,
    /// Position among body rows (header rows keep 0)
    #[serde(default)]
    pub index: usize,
}

impl Row {
    /// Build a body row from raw values
    pub fn new<I, S>(id: RowId, index: usize, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cells = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| Cell::new(value, i))
            .collect();

        Row {
            id,
            cells,
            is_header: false,
            index,
        }
    }

    /// Build a header row from headings
    pub fn header<I, S>(id: RowId, headings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row = Row::new(id, 0, headings);
        row.is_header = true;
        row
    }

    /// Pad with empty cells or truncate so the row holds exactly `width` cells
    pub fn fit_to(&mut self, width: usize) {
        if self.cells.len() > width {
            self.cells.truncate(width);
        }
        while self.cells.len() < width {
            let index = self.cells.len();
            self.cells.push(Cell::empty(index));
        }
    }

    /// Reassign cell indices to match their positions
    pub fn reindex_cells(&mut self) {
        for (i, cell) in self.cells.iter_mut().enumerate() {
            cell.index = i;
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn cell_mut(&mut self, index: usize) -> Option<&mut Cell> {
        self.cells.get_mut(index)
    }

    /// Current contents of all cells, in column order
    pub fn values(&self) -> Vec<String> {
        self.cells.iter().map(|c| c.content.clone()).collect()
    }

    /// Cells that are not hidden
    pub fn visible_cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter().filter(|c| !c.hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_from_values() {
        let row = Row::new(RowId(7), 3, ["Bob", "30"]);
        assert_eq!(row.id, RowId(7));
        assert_eq!(row.index, 3);
        assert!(!row.is_header);
        assert_eq!(row.values(), vec!["Bob", "30"]);
        assert_eq!(row.cells[1].index, 1);
    }

    #[test]
    fn test_fit_to_pads_and_truncates() {
        let mut row = Row::new(RowId(0), 0, ["a"]);
        row.fit_to(3);
        assert_eq!(row.values(), vec!["a", "", ""]);
        assert_eq!(row.cells[2].index, 2);

        row.fit_to(2);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_visible_cells() {
        let mut row = Row::header(RowId(0), ["Name", "Age", "City"]);
        row.cells[1].hidden = true;
        let visible: Vec<_> = row.visible_cells().map(|c| c.content.as_str()).collect();
        assert_eq!(visible, vec!["Name", "City"]);
        assert!(row.is_header);
    }

    #[test]
    fn test_row_ref_conversions() {
        assert_eq!(RowRef::from(RowId(3)), RowRef::Id(RowId(3)));
        assert_eq!(RowRef::from(2usize), RowRef::Index(2));
    }
}
