use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::row::Row;
use crate::table::Table;

/// Options for filtering the rows of a table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    /// The search query; blank queries match nothing and signal "no filter"
    pub query: String,
    /// Restrict matching to a single column
    #[serde(default)]
    pub column: Option<usize>,
    /// Whether hidden cells take part in whole-row matching
    #[serde(default)]
    pub include_hidden_columns: bool,
}

impl SearchOptions {
    pub fn new(query: impl Into<String>) -> Self {
        SearchOptions {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn in_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    pub fn include_hidden(mut self, include: bool) -> Self {
        self.include_hidden_columns = include;
        self
    }

    /// Check if the query is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }
}

/// Matching strategy applied to each row
trait RowMatcher {
    fn is_match(&self, row: &Row) -> bool;
}

/// Case-insensitive substring match against one column
struct ColumnMatcher {
    column: usize,
    needle: String,
}

impl RowMatcher for ColumnMatcher {
    fn is_match(&self, row: &Row) -> bool {
        row.cell(self.column)
            .map(|cell| cell.content.to_lowercase().contains(&self.needle))
            .unwrap_or(false)
    }
}

/// Every whitespace-separated token must appear in some searchable cell
struct TokenMatcher {
    tokens: Vec<String>,
    include_hidden: bool,
}

impl RowMatcher for TokenMatcher {
    fn is_match(&self, row: &Row) -> bool {
        let haystack: Vec<String> = row
            .cells
            .iter()
            .filter(|cell| self.include_hidden || !cell.hidden)
            .map(|cell| cell.content.to_lowercase())
            .collect();

        self.tokens
            .iter()
            .all(|token| haystack.iter().any(|content| content.contains(token.as_str())))
    }
}

/// Search engine computing the filtered subset of a table's rows.
/// Never mutates the table.
pub struct SearchEngine;

impl SearchEngine {
    /// Natural-order positions of matching rows.
    ///
    /// A blank query yields an empty result; callers treat it as "clear the
    /// filter" via [`SearchOptions::is_blank`].
    pub fn search(table: &Table, options: &SearchOptions) -> Result<Vec<usize>> {
        if options.is_blank() {
            return Ok(Vec::new());
        }

        let matcher = Self::build_matcher(table, options)?;

        Ok(table
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| matcher.is_match(row))
            .map(|(position, _)| position)
            .collect())
    }

    fn build_matcher(table: &Table, options: &SearchOptions) -> Result<Box<dyn RowMatcher>> {
        let query = options.query.to_lowercase();

        match options.column {
            Some(column) => {
                let count = table.column_count();
                if column >= count {
                    return Err(GridError::ColumnOutOfRange { index: column, count });
                }
                Ok(Box::new(ColumnMatcher {
                    column,
                    needle: query.trim().to_string(),
                }))
            }
            None => Ok(Box::new(TokenMatcher {
                tokens: query.split_whitespace().map(str::to_string).collect(),
                include_hidden: options.include_hidden_columns,
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableData;

    fn create_test_table() -> Table {
        Table::from_data(TableData::new(
            vec!["First", "Last", "City"],
            vec![
                vec!["Alice", "Smith", "London"],
                vec!["Alice", "Jones", "Paris"],
                vec!["Bob", "Smith", "Berlin"],
                vec!["Smithers", "Alicia", "Rome"],
            ],
        ))
    }

    #[test]
    fn test_whole_row_and_semantics() {
        let table = create_test_table();
        let results = SearchEngine::search(&table, &SearchOptions::new("alice smith")).unwrap();
        // Row 3 contains both "smith" (Smithers) and "ali" but not "alice"
        assert_eq!(results, vec![0]);
    }

    #[test]
    fn test_case_insensitive() {
        let table = create_test_table();
        let results = SearchEngine::search(&table, &SearchOptions::new("SMITH")).unwrap();
        assert_eq!(results, vec![0, 2, 3]);
    }

    #[test]
    fn test_tokens_may_match_different_cells() {
        let table = create_test_table();
        let results = SearchEngine::search(&table, &SearchOptions::new("  bob   berlin ")).unwrap();
        assert_eq!(results, vec![2]);
    }

    #[test]
    fn test_blank_query() {
        let table = create_test_table();
        let options = SearchOptions::new("   ");
        assert!(options.is_blank());
        assert!(SearchEngine::search(&table, &options).unwrap().is_empty());
    }

    #[test]
    fn test_single_column() {
        let table = create_test_table();
        let results =
            SearchEngine::search(&table, &SearchOptions::new("ALI").in_column(1)).unwrap();
        assert_eq!(results, vec![3]);

        let results =
            SearchEngine::search(&table, &SearchOptions::new("alice smith").in_column(0)).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_single_column_out_of_range() {
        let table = create_test_table();
        let result = SearchEngine::search(&table, &SearchOptions::new("a").in_column(3));
        assert!(matches!(result, Err(GridError::ColumnOutOfRange { index: 3, count: 3 })));
    }

    #[test]
    fn test_hidden_columns_excluded_by_default() {
        let mut table = create_test_table();
        table.hide_columns(&[2]).unwrap();

        let results = SearchEngine::search(&table, &SearchOptions::new("paris")).unwrap();
        assert!(results.is_empty());

        let results =
            SearchEngine::search(&table, &SearchOptions::new("paris").include_hidden(true)).unwrap();
        assert_eq!(results, vec![1]);
    }

    #[test]
    fn test_hidden_cell_does_not_shadow_visible_match() {
        let mut table = Table::from_data(TableData::new(
            vec!["A", "B"],
            vec![vec!["red", "red car"]],
        ));
        table.hide_columns(&[0]).unwrap();
        let results = SearchEngine::search(&table, &SearchOptions::new("red")).unwrap();
        assert_eq!(results, vec![0]);
    }

    #[test]
    fn test_search_options_serde() {
        let options: SearchOptions =
            serde_json::from_str(r#"{"query":"x","column":2,"includeHiddenColumns":true}"#).unwrap();
        assert_eq!(options, SearchOptions::new("x").in_column(2).include_hidden(true));
    }
}
