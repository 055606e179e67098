use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

use crate::column::ColumnType;
use crate::date::{ChronoDateParser, DateParser};
use crate::table::Table;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn toggle(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The column and direction of the last sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: usize,
    pub direction: Direction,
}

impl SortState {
    /// Direction to use when `column` is sorted without an explicit direction:
    /// the same column flips, any other column starts ascending
    pub fn next_direction(last: Option<SortState>, column: usize) -> Direction {
        match last {
            Some(state) if state.column == column => state.direction.toggle(),
            _ => Direction::Asc,
        }
    }
}

/// A coerced cell value. Numbers order before text.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Number(f64),
    Text(String),
}

impl Eq for SortKey {}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
        }
    }
}

fn decoration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[$,\s%]").expect("valid decoration pattern"))
}

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)$").expect("valid number pattern"))
}

/// Coerce plain (non-date) content: strip currency, percent, comma and
/// whitespace decoration, then compare numerically if what is left is a number
pub fn text_key(content: &str) -> SortKey {
    let stripped = decoration_regex().replace_all(content, "");
    if number_regex().is_match(&stripped) {
        if let Ok(n) = stripped.parse::<f64>() {
            return SortKey::Number(n);
        }
    }
    SortKey::Text(stripped.into_owned())
}

/// Reorders row subsets by column value
pub struct SortEngine {
    parser: Box<dyn DateParser>,
}

impl Default for SortEngine {
    fn default() -> Self {
        Self::new(Box::new(ChronoDateParser))
    }
}

impl fmt::Debug for SortEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortEngine").finish_non_exhaustive()
    }
}

impl SortEngine {
    pub fn new(parser: Box<dyn DateParser>) -> Self {
        Self { parser }
    }

    /// Swap the date parser
    pub fn set_date_parser(&mut self, parser: Box<dyn DateParser>) {
        self.parser = parser;
    }

    /// Coerce a cell's content according to its column type.
    /// Unparseable dates fall back to their raw text and sort after real dates.
    pub fn key(&self, content: &str, column_type: &ColumnType) -> SortKey {
        match column_type {
            ColumnType::Date { format } => match self.parser.sort_key(content, format.as_ref()) {
                Some(millis) => SortKey::Number(millis as f64),
                None => SortKey::Text(content.to_string()),
            },
            ColumnType::Text => text_key(content),
        }
    }

    /// Sort `rows` (natural-order positions into `table`) in place by `column`.
    ///
    /// Equal keys keep ascending natural order in both directions.
    pub fn sort(&self, table: &Table, rows: &mut [usize], column: usize, direction: Direction) {
        let column_type = table
            .header()
            .and_then(|h| h.cell(column))
            .map(|c| c.meta.column_type.clone())
            .unwrap_or_default();

        let mut keyed: Vec<(SortKey, usize)> = rows
            .iter()
            .map(|&position| {
                let content = table
                    .row(position)
                    .and_then(|r| r.cell(column))
                    .map(|c| c.content.as_str())
                    .unwrap_or("");
                (self.key(content, &column_type), position)
            })
            .collect();

        keyed.sort_by(|(ka, pa), (kb, pb)| {
            let ord = match direction {
                Direction::Asc => ka.cmp(kb),
                Direction::Desc => kb.cmp(ka),
            };
            ord.then(pa.cmp(pb))
        });

        for (slot, (_, position)) in rows.iter_mut().zip(keyed) {
            *slot = position;
        }
    }
}
