//! Column registry: a derived view over the header row plus the cell at the
//! same position in every body row. Columns are never stored on their own.

use serde::{Deserialize, Serialize};

use crate::table::Table;

/// Date format declared on a date column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DateFormat {
    /// ISO-8601 (`2017-03-14`, `2017-03-14T10:00:00Z`)
    Iso8601,
    /// RFC-2822 (`Tue, 14 Mar 2017 10:00:00 +0000`)
    Rfc2822,
    /// SQL datetime (`2017-03-14 10:00:00`)
    Mysql,
    /// Milliseconds since the Unix epoch
    Unix,
    /// User format string using `YYYY`, `MM`, `DD`, `HH`, `mm`, `ss` style tokens
    Custom(String),
}

impl From<String> for DateFormat {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ISO_8601" => DateFormat::Iso8601,
            "RFC_2822" => DateFormat::Rfc2822,
            "MYSQL" => DateFormat::Mysql,
            "UNIX" => DateFormat::Unix,
            _ => DateFormat::Custom(s),
        }
    }
}

impl From<DateFormat> for String {
    fn from(format: DateFormat) -> Self {
        match format {
            DateFormat::Iso8601 => "ISO_8601".to_string(),
            DateFormat::Rfc2822 => "RFC_2822".to_string(),
            DateFormat::Mysql => "MYSQL".to_string(),
            DateFormat::Unix => "UNIX".to_string(),
            DateFormat::Custom(s) => s,
        }
    }
}

/// How a column's values are coerced before sorting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnType {
    /// Numeric when the decoration-stripped text is a number, otherwise lexical
    #[default]
    Text,
    /// Parsed through the date parser
    Date {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<DateFormat>,
    },
}

impl ColumnType {
    pub fn date(format: Option<DateFormat>) -> Self {
        ColumnType::Date { format }
    }

    pub fn is_date(&self) -> bool {
        matches!(self, ColumnType::Date { .. })
    }
}

/// Column metadata carried by header cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMeta {
    #[serde(default)]
    pub column_type: ColumnType,
    #[serde(default = "default_sortable")]
    pub sortable: bool,
}

fn default_sortable() -> bool {
    true
}

impl Default for ColumnMeta {
    fn default() -> Self {
        ColumnMeta {
            column_type: ColumnType::Text,
            sortable: true,
        }
    }
}

impl ColumnMeta {
    pub fn is_default(&self) -> bool {
        *self == ColumnMeta::default()
    }
}

/// Snapshot of one logical column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub index: usize,
    pub heading: String,
    pub hidden: bool,
    pub column_type: ColumnType,
    pub sortable: bool,
}

/// Read-only registry of the columns of a table
#[derive(Debug, Clone, Copy)]
pub struct Columns<'a> {
    table: &'a Table,
}

impl<'a> Columns<'a> {
    pub fn new(table: &'a Table) -> Self {
        Columns { table }
    }

    pub fn count(&self) -> usize {
        self.table.column_count()
    }

    /// Get a column by index
    pub fn get(&self, index: usize) -> Option<Column> {
        let header = self.table.header()?;
        let cell = header.cell(index)?;
        Some(Column {
            index,
            heading: cell.content.clone(),
            hidden: cell.hidden,
            column_type: cell.meta.column_type.clone(),
            sortable: cell.meta.sortable,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Column> + 'a {
        let columns = *self;
        (0..self.count()).filter_map(move |i| columns.get(i))
    }

    /// Check if a column is hidden; out-of-range columns report `false`
    pub fn is_hidden(&self, index: usize) -> bool {
        self.get(index).map(|c| c.hidden).unwrap_or(false)
    }

    /// Visibility of the given columns, or of every column when `indices` is `None`.
    /// Out-of-range indices are skipped.
    pub fn visible(&self, indices: Option<&[usize]>) -> Vec<bool> {
        match indices {
            Some(indices) => indices
                .iter()
                .filter(|&&i| i < self.count())
                .map(|&i| !self.is_hidden(i))
                .collect(),
            None => (0..self.count()).map(|i| !self.is_hidden(i)).collect(),
        }
    }

    pub fn headings(&self) -> Vec<String> {
        self.table
            .header()
            .map(|h| h.values())
            .unwrap_or_default()
    }
}
