use serde::{Deserialize, Serialize};

use crate::column::ColumnMeta;

/// Smallest addressable unit of table content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Current display value
    pub content: String,
    /// Value at creation time, kept across in-place edits
    pub original_content: String,
    /// Hidden cells keep their data but are skipped by rendering and (by default) search
    #[serde(default)]
    pub hidden: bool,
    /// Column position; always equal to the cell's position within its row
    #[serde(default)]
    pub index: usize,
    /// Column metadata; only consulted on header cells
    #[serde(default, skip_serializing_if = "ColumnMeta::is_default")]
    pub meta: ColumnMeta,
}

impl Cell {
    /// Create a visible cell at the given column position
    pub fn new(content: impl Into<String>, index: usize) -> Self {
        let content = content.into();
        Cell {
            original_content: content.clone(),
            content,
            hidden: false,
            index,
            meta: ColumnMeta::default(),
        }
    }

    /// Create an empty cell
    pub fn empty(index: usize) -> Self {
        Cell::new(String::new(), index)
    }

    /// Replace the display value, keeping the original content
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
