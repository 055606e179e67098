//! Parsing of CSV and JSON text into a `{headings, data}` payload

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ImportError;
use crate::table::TableData;

/// Text format of an import payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportFormat {
    #[default]
    Csv,
    Json,
}

/// What to import and how to read it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImportOptions {
    #[serde(rename = "type")]
    pub format: ImportFormat,
    pub data: String,
    /// CSV field separator; must be a single ASCII character
    pub column_delimiter: char,
    /// Whether the first CSV record holds the headings
    pub headings: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        ImportOptions {
            format: ImportFormat::Csv,
            data: String::new(),
            column_delimiter: ',',
            headings: false,
        }
    }
}

impl ImportOptions {
    pub fn csv(data: impl Into<String>) -> Self {
        ImportOptions {
            format: ImportFormat::Csv,
            data: data.into(),
            ..Default::default()
        }
    }

    pub fn json(data: impl Into<String>) -> Self {
        ImportOptions {
            format: ImportFormat::Json,
            data: data.into(),
            ..Default::default()
        }
    }

    pub fn with_headings(mut self, headings: bool) -> Self {
        self.headings = headings;
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.column_delimiter = delimiter;
        self
    }
}

/// Parse an import payload
pub fn parse(options: &ImportOptions) -> Result<TableData, ImportError> {
    if options.data.trim().is_empty() {
        return Err(ImportError::Empty);
    }

    match options.format {
        ImportFormat::Csv => parse_csv(&options.data, options.column_delimiter, options.headings),
        ImportFormat::Json => parse_json(&options.data),
    }
}

/// Parse delimited text. Records may differ in length; the table model pads
/// or truncates them later.
pub fn parse_csv(data: &str, delimiter: char, headings: bool) -> Result<TableData, ImportError> {
    let delimiter = u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| ImportError::Csv(format!("delimiter {:?} is not an ASCII character", delimiter)))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(data.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    if rows.is_empty() {
        return Err(ImportError::Empty);
    }

    let headings = if headings { Some(rows.remove(0)) } else { None };

    Ok(TableData {
        headings,
        data: Some(rows),
    })
}

/// Parse a JSON array of objects (headings taken from the keys in first-seen
/// order) or a JSON array of arrays (no headings)
pub fn parse_json(data: &str) -> Result<TableData, ImportError> {
    let value: Value = serde_json::from_str(data)?;
    let Value::Array(items) = value else {
        return Err(ImportError::UnexpectedJsonShape);
    };

    if items.is_empty() {
        return Err(ImportError::Empty);
    }

    if items.iter().all(Value::is_array) {
        let rows = items
            .iter()
            .filter_map(Value::as_array)
            .map(|values| values.iter().map(value_to_string).collect())
            .collect();
        return Ok(TableData {
            headings: None,
            data: Some(rows),
        });
    }

    if !items.iter().all(Value::is_object) {
        return Err(ImportError::UnexpectedJsonShape);
    }

    let mut headings: Vec<String> = Vec::new();
    for object in items.iter().filter_map(Value::as_object) {
        for key in object.keys() {
            if !headings.contains(key) {
                headings.push(key.clone());
            }
        }
    }

    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|object| {
            headings
                .iter()
                .map(|heading| object.get(heading).map(value_to_string).unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(TableData {
        headings: Some(headings),
        data: Some(rows),
    })
}

/// Cell text for a JSON scalar. `null` becomes empty; nested values keep
/// their JSON text.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Deserialize optional rows of JSON scalars as cell text
pub fn deserialize_rows<'de, D>(deserializer: D) -> Result<Option<Vec<Vec<String>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Option::<Vec<Vec<Value>>>::deserialize(deserializer)?;
    Ok(rows.map(|rows| {
        rows.iter()
            .map(|row| row.iter().map(value_to_string).collect())
            .collect()
    }))
}

/// Deserialize a list of JSON scalars as cell text
pub fn deserialize_values<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values.iter().map(value_to_string).collect())
}
