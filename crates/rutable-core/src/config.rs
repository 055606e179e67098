use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::column::{ColumnMeta, ColumnType, DateFormat};
use crate::error::{GridError, Result};
use crate::pager::{PagerLayout, PagerTexts};
use crate::paginate::DEFAULT_PER_PAGE;
use crate::sort::Direction;
use crate::table::TableData;

/// Data table configuration.
///
/// Deserialized from camelCase JSON; every field is optional and falls back
/// to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub per_page: usize,
    pub per_page_select: Vec<usize>,
    pub sortable: bool,
    pub searchable: bool,
    pub search: SearchConfig,
    pub truncate_pager: bool,
    pub pager_delta: usize,
    pub next_prev: bool,
    pub first_last: bool,
    pub labels: Labels,
    pub texts: Texts,
    pub columns: Vec<ColumnOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<TableData>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            per_page: DEFAULT_PER_PAGE,
            per_page_select: vec![5, 10, 15, 20, 25],
            sortable: true,
            searchable: true,
            search: SearchConfig::default(),
            truncate_pager: true,
            pager_delta: 2,
            next_prev: true,
            first_last: false,
            labels: Labels::default(),
            texts: Texts::default(),
            columns: Vec::new(),
            data: None,
        }
    }
}

impl Config {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Config> {
        let config: Config =
            serde_json::from_str(json).map_err(|e| GridError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.per_page == 0 {
            return Err(GridError::InvalidConfig("perPage must be greater than 0".into()));
        }
        if self.per_page_select.contains(&0) {
            return Err(GridError::InvalidConfig(
                "perPageSelect options must be greater than 0".into(),
            ));
        }
        if self.pager_delta == 0 {
            return Err(GridError::InvalidConfig("pagerDelta must be at least 1".into()));
        }
        Ok(())
    }

    /// Check that every column option selects an existing column
    pub fn validate_columns(&self, column_count: usize) -> Result<()> {
        for options in &self.columns {
            if let Some(&index) = options.select.indices().iter().find(|&&i| i >= column_count) {
                return Err(GridError::ColumnOutOfRange {
                    index,
                    count: column_count,
                });
            }
        }
        Ok(())
    }

    pub fn pager_layout(&self) -> PagerLayout {
        PagerLayout {
            next_prev: self.next_prev,
            first_last: self.first_last,
            truncate: self.truncate_pager,
            delta: self.pager_delta,
            texts: self.texts.pager.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchConfig {
    pub include_hidden_columns: bool,
}

/// Values substituted into the info label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub start: usize,
    pub end: usize,
    pub rows: usize,
    pub page: usize,
    pub pages: usize,
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{(start|end|rows|page|pages)\}").expect("valid placeholder pattern")
    })
}

/// Substitute `{start}`, `{end}`, `{rows}`, `{page}` and `{pages}` in `template`.
/// Unknown placeholders are left alone.
pub fn fill_template(template: &str, info: &PageInfo) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures| {
            let value = match &caps[1] {
                "start" => info.start,
                "end" => info.end,
                "rows" => info.rows,
                "page" => info.page,
                _ => info.pages,
            };
            value.to_string()
        })
        .into_owned()
}

/// User-facing strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Labels {
    pub placeholder: String,
    pub per_page: String,
    pub no_rows: String,
    pub info: String,
}

impl Default for Labels {
    fn default() -> Self {
        Labels {
            placeholder: "Search...".to_string(),
            per_page: "{select} entries per page".to_string(),
            no_rows: "No entries found".to_string(),
            info: "Showing {start} to {end} of {rows} entries".to_string(),
        }
    }
}

impl Labels {
    /// The info label for `info`; empty when there are no rows to show
    pub fn info_text(&self, info: &PageInfo) -> String {
        if info.rows == 0 {
            return String::new();
        }
        fill_template(&self.info, info)
    }
}

/// Glyphs for pager buttons and sort indicators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Texts {
    #[serde(flatten)]
    pub pager: PagerTexts,
    pub asc_text: String,
    pub desc_text: String,
}

impl Default for Texts {
    fn default() -> Self {
        Texts {
            pager: PagerTexts::default(),
            asc_text: "\u{25b4}".to_string(),
            desc_text: "\u{25be}".to_string(),
        }
    }
}

impl Texts {
    pub fn indicator(&self, direction: Direction) -> &str {
        match direction {
            Direction::Asc => &self.asc_text,
            Direction::Desc => &self.desc_text,
        }
    }
}

/// One column index or several
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnSelect {
    One(usize),
    Many(Vec<usize>),
}

impl Default for ColumnSelect {
    fn default() -> Self {
        ColumnSelect::Many(Vec::new())
    }
}

impl ColumnSelect {
    pub fn indices(&self) -> Vec<usize> {
        match self {
            ColumnSelect::One(index) => vec![*index],
            ColumnSelect::Many(indices) => indices.clone(),
        }
    }
}

impl From<usize> for ColumnSelect {
    fn from(index: usize) -> Self {
        ColumnSelect::One(index)
    }
}

impl From<Vec<usize>> for ColumnSelect {
    fn from(indices: Vec<usize>) -> Self {
        ColumnSelect::Many(indices)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Text,
    Date,
}

/// Per-column options applied at init
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnOptions {
    pub select: ColumnSelect,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ColumnKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<DateFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sortable: Option<bool>,
    pub hidden: bool,
    /// Initial sort, honored only when a single column is selected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Direction>,
}

impl ColumnOptions {
    pub fn new(select: impl Into<ColumnSelect>) -> Self {
        ColumnOptions {
            select: select.into(),
            ..Default::default()
        }
    }

    /// Whether these options carry any header metadata
    pub fn has_meta(&self) -> bool {
        self.kind.is_some() || self.format.is_some() || self.sortable.is_some()
    }

    /// Header metadata described by these options
    pub fn meta(&self) -> ColumnMeta {
        let column_type = match self.kind {
            Some(ColumnKind::Date) => ColumnType::date(self.format.clone()),
            _ => ColumnType::Text,
        };
        ColumnMeta {
            column_type,
            sortable: self.sortable.unwrap_or(true),
        }
    }

    /// Column for the initial sort, if exactly one column is selected
    pub fn initial_sort(&self) -> Option<(usize, Direction)> {
        let direction = self.sort?;
        match self.select.indices().as_slice() {
            [column] => Some((*column, direction)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.per_page, 10);
        assert_eq!(config.per_page_select, vec![5, 10, 15, 20, 25]);
        assert!(config.sortable && config.searchable);
        assert!(!config.search.include_hidden_columns);
        assert!(config.truncate_pager);
        assert_eq!(config.pager_delta, 2);
        assert!(config.next_prev && !config.first_last);
        assert_eq!(config.texts.pager.prev_text, "\u{2039}");
        assert_eq!(config.texts.asc_text, "\u{25b4}");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = Config::from_json(
            r#"{
                "perPage": 5,
                "search": {"includeHiddenColumns": true},
                "labels": {"noRows": "Nothing"},
                "texts": {"nextText": ">", "descText": "v"},
                "columns": [
                    {"select": 1, "type": "date", "format": "DD/MM/YYYY", "sort": "desc"},
                    {"select": [2, 3], "hidden": true, "sortable": false}
                ],
                "data": {"headings": ["a"], "data": [[1], [null]]}
            }"#,
        )
        .unwrap();

        assert_eq!(config.per_page, 5);
        assert!(config.search.include_hidden_columns);
        assert_eq!(config.labels.no_rows, "Nothing");
        assert_eq!(config.labels.placeholder, "Search...");
        assert_eq!(config.texts.pager.next_text, ">");
        assert_eq!(config.texts.pager.prev_text, "\u{2039}");
        assert_eq!(config.texts.indicator(Direction::Desc), "v");

        let date = &config.columns[0];
        assert_eq!(date.select, ColumnSelect::One(1));
        assert_eq!(
            date.meta().column_type,
            ColumnType::date(Some(DateFormat::Custom("DD/MM/YYYY".into())))
        );
        assert_eq!(date.initial_sort(), Some((1, Direction::Desc)));

        let hidden = &config.columns[1];
        assert_eq!(hidden.select.indices(), vec![2, 3]);
        assert!(hidden.hidden);
        assert!(!hidden.meta().sortable);

        let data = config.data.unwrap();
        assert_eq!(data.data, Some(vec![vec!["1".to_string()], vec![String::new()]]));
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            Config::from_json(r#"{"perPage": 0}"#),
            Err(GridError::InvalidConfig(_))
        ));
        assert!(Config::from_json(r#"{"perPageSelect": [5, 0]}"#).is_err());
        assert!(Config::from_json(r#"{"pagerDelta": 0}"#).is_err());
        assert!(Config::from_json(r#"{"perPage": "ten"}"#).is_err());
    }

    #[test]
    fn test_validate_columns() {
        let config = Config {
            columns: vec![ColumnOptions::new(vec![0, 4])],
            ..Config::default()
        };
        assert!(config.validate_columns(5).is_ok());
        assert_eq!(
            config.validate_columns(3),
            Err(GridError::ColumnOutOfRange { index: 4, count: 3 })
        );
    }

    #[test]
    fn test_initial_sort_needs_single_column() {
        let mut options = ColumnOptions::new(vec![0, 1]);
        options.sort = Some(Direction::Asc);
        assert_eq!(options.initial_sort(), None);
    }

    #[test]
    fn test_info_label() {
        let labels = Labels::default();
        let info = PageInfo {
            start: 11,
            end: 20,
            rows: 23,
            page: 2,
            pages: 3,
        };
        assert_eq!(labels.info_text(&info), "Showing 11 to 20 of 23 entries");
        assert_eq!(labels.info_text(&PageInfo::default()), "");
        assert_eq!(
            fill_template("Page {page} of {pages} {unknown}", &info),
            "Page 2 of 3 {unknown}"
        );
    }

    #[test]
    fn test_pager_layout() {
        let config = Config {
            first_last: true,
            pager_delta: 3,
            ..Config::default()
        };
        let layout = config.pager_layout();
        assert!(layout.first_last);
        assert_eq!(layout.delta, 3);
        assert_eq!(layout.texts.last_text, "\u{bb}");
    }
}
