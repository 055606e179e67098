//! Snapshots of the active rows rendered as CSV, JSON or SQL text

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GridError, Result};
use crate::paginate::Paginator;
use crate::table::Table;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Sql,
}

/// Which rows to export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Selection {
    /// The whole active row set
    #[default]
    All,
    CurrentPage,
    /// The given pages (1-based); unknown pages are skipped
    Pages(Vec<usize>),
}

impl Selection {
    /// Natural-order positions selected from the paginated row set, in displayed order
    pub fn resolve(&self, paginator: &Paginator) -> Vec<usize> {
        match self {
            Selection::All => paginator.pages().concat(),
            Selection::CurrentPage => paginator.current_rows().to_vec(),
            Selection::Pages(pages) => pages
                .iter()
                .filter_map(|&page| paginator.page(page))
                .flatten()
                .copied()
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOptions {
    #[serde(rename = "type")]
    pub format: ExportFormat,
    /// Column indices left out of the export
    pub skip_columns: Vec<usize>,
    pub selection: Selection,
    pub include_hidden: bool,
    /// Write a heading record first (CSV only)
    pub headings: bool,
    pub column_delimiter: char,
    pub table_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            format: ExportFormat::Csv,
            skip_columns: Vec::new(),
            selection: Selection::All,
            include_hidden: false,
            headings: true,
            column_delimiter: ',',
            table_name: "table".to_string(),
        }
    }
}

impl ExportOptions {
    pub fn new(format: ExportFormat) -> Self {
        ExportOptions {
            format,
            ..Default::default()
        }
    }
}

/// Headings and values of the exported columns, one entry per row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub headings: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Snapshot {
    /// Capture `rows` (natural-order positions) of `table`
    pub fn capture(table: &Table, rows: &[usize], options: &ExportOptions) -> Self {
        let columns = table.columns();
        let selected: Vec<usize> = (0..columns.count())
            .filter(|i| !options.skip_columns.contains(i))
            .filter(|&i| options.include_hidden || !columns.is_hidden(i))
            .collect();

        let headings = table
            .header()
            .map(|header| {
                selected
                    .iter()
                    .filter_map(|&i| header.cell(i))
                    .map(|c| c.content.clone())
                    .collect()
            })
            .unwrap_or_default();

        let rows = rows
            .iter()
            .filter_map(|&position| table.row(position))
            .map(|row| {
                selected
                    .iter()
                    .map(|&i| row.cell(i).map(|c| c.content.clone()).unwrap_or_default())
                    .collect()
            })
            .collect();

        Snapshot { headings, rows }
    }

    pub fn to_csv(&self, delimiter: char, headings: bool) -> Result<String> {
        let delimiter = u8::try_from(delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| GridError::Export(format!("delimiter {:?} is not an ASCII character", delimiter)))?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        let export_err = |e: csv::Error| GridError::Export(e.to_string());
        if headings {
            writer.write_record(&self.headings).map_err(export_err)?;
        }
        for row in &self.rows {
            writer.write_record(row).map_err(export_err)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| GridError::Export(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| GridError::Export(e.to_string()))
    }

    /// Array of objects keyed by heading, keys in column order
    pub fn to_json(&self) -> Result<String> {
        let objects: Vec<Map<String, Value>> = self
            .rows
            .iter()
            .map(|row| {
                self.headings
                    .iter()
                    .zip(row)
                    .map(|(heading, value)| (heading.clone(), Value::String(value.clone())))
                    .collect()
            })
            .collect();
        serde_json::to_string(&objects).map_err(|e| GridError::Export(e.to_string()))
    }

    /// A single multi-row `INSERT` statement; empty when there are no rows
    pub fn to_sql(&self, table_name: &str) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        let columns = self
            .headings
            .iter()
            .map(|h| quote_identifier(h))
            .collect::<Vec<_>>()
            .join(",");

        let values = self
            .rows
            .iter()
            .map(|row| {
                let literals = row.iter().map(|v| quote_literal(v)).collect::<Vec<_>>();
                format!("({})", literals.join(","))
            })
            .collect::<Vec<_>>()
            .join(",");

        format!(
            "INSERT INTO {} ({}) VALUES {};",
            quote_identifier(table_name),
            columns,
            values
        )
    }
}

fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Export `rows` of `table` in the requested format
pub fn export(table: &Table, rows: &[usize], options: &ExportOptions) -> Result<String> {
    let snapshot = Snapshot::capture(table, rows, options);
    match options.format {
        ExportFormat::Csv => snapshot.to_csv(options.column_delimiter, options.headings),
        ExportFormat::Json => snapshot.to_json(),
        ExportFormat::Sql => Ok(snapshot.to_sql(&options.table_name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableData;

    fn create_test_table() -> Table {
        Table::from_data(TableData::new(
            vec!["Name", "Note", "Age"],
            vec![
                vec!["Bob", "likes, commas", "30"],
                vec!["O'Brien", "says \"hi\"", "41"],
            ],
        ))
    }

    #[test]
    fn test_csv_quotes_special_characters() {
        let table = create_test_table();
        let csv = export(&table, &[0, 1], &ExportOptions::default()).unwrap();
        assert_eq!(
            csv,
            "Name,Note,Age\nBob,\"likes, commas\",30\nO'Brien,\"says \"\"hi\"\"\",41\n"
        );
    }

    #[test]
    fn test_csv_without_headings_and_custom_delimiter() {
        let table = create_test_table();
        let options = ExportOptions {
            headings: false,
            column_delimiter: ';',
            skip_columns: vec![1],
            ..Default::default()
        };
        let csv = export(&table, &[1], &options).unwrap();
        assert_eq!(csv, "O'Brien;41\n");
    }

    #[test]
    fn test_json_keyed_by_heading() {
        let table = create_test_table();
        let options = ExportOptions {
            skip_columns: vec![1],
            ..ExportOptions::new(ExportFormat::Json)
        };
        let json = export(&table, &[1, 0], &options).unwrap();
        assert_eq!(json, r#"[{"Name":"O'Brien","Age":"41"},{"Name":"Bob","Age":"30"}]"#);
    }

    #[test]
    fn test_sql_escapes_quotes() {
        let table = create_test_table();
        let options = ExportOptions {
            skip_columns: vec![1],
            table_name: "people".to_string(),
            ..ExportOptions::new(ExportFormat::Sql)
        };
        let sql = export(&table, &[0, 1], &options).unwrap();
        assert_eq!(
            sql,
            "INSERT INTO `people` (`Name`,`Age`) VALUES ('Bob','30'),('O''Brien','41');"
        );
        assert_eq!(Snapshot::default().to_sql("t"), "");
    }

    #[test]
    fn test_hidden_columns() {
        let mut table = create_test_table();
        table.hide_columns(&[0]).unwrap();

        let snapshot = Snapshot::capture(&table, &[0], &ExportOptions::default());
        assert_eq!(snapshot.headings, vec!["Note", "Age"]);

        let options = ExportOptions {
            include_hidden: true,
            ..Default::default()
        };
        let snapshot = Snapshot::capture(&table, &[0], &options);
        assert_eq!(snapshot.headings, vec!["Name", "Note", "Age"]);
    }

    #[test]
    fn test_selection() {
        let mut paginator = Paginator::new(2);
        paginator.paginate(&[4, 3, 2, 1, 0]);
        paginator.go_to(2).unwrap();

        assert_eq!(Selection::All.resolve(&paginator), vec![4, 3, 2, 1, 0]);
        assert_eq!(Selection::CurrentPage.resolve(&paginator), vec![2, 1]);
        assert_eq!(Selection::Pages(vec![3, 1, 9]).resolve(&paginator), vec![0, 4, 3]);
    }

    #[test]
    fn test_options_serde() {
        let options: ExportOptions = serde_json::from_str(
            r#"{"type":"sql","selection":{"pages":[1,2]},"skipColumns":[0]}"#,
        )
        .unwrap();
        assert_eq!(options.format, ExportFormat::Sql);
        assert_eq!(options.selection, Selection::Pages(vec![1, 2]));
        assert_eq!(options.table_name, "table");

        let options: ExportOptions =
            serde_json::from_str(r#"{"selection":"currentPage"}"#).unwrap();
        assert_eq!(options.selection, Selection::CurrentPage);
    }
}
