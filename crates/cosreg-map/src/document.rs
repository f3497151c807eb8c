//! Raw per-jurisdiction source documents.
//!
//! A document is held as a JSON value regardless of its on-disk format; CSV
//! files become an array of string-valued objects keyed by header.

use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use cosreg_model::TableType;
use cosreg_normalize::parse_date;
use serde_json::{Map, Value};

use crate::error::SourceReadError;

/// Keys searched for the row array when no `records_path` is configured.
const ROW_CONTAINER_KEYS: &[&str] = &["records", "ingredients", "data", "rows", "items"];

#[derive(Debug, Clone)]
pub struct RawDocument {
    origin: String,
    root: Value,
}

impl RawDocument {
    pub fn from_value(origin: impl Into<String>, root: Value) -> Self {
        Self {
            origin: origin.into(),
            root,
        }
    }

    pub fn from_json_str(origin: impl Into<String>, text: &str) -> Result<Self, SourceReadError> {
        let origin = origin.into();
        let root = serde_json::from_str(text).map_err(|source| SourceReadError::Json {
            origin: origin.clone(),
            source,
        })?;
        Ok(Self { origin, root })
    }

    /// Reads CSV with a header row. Every cell becomes a string.
    pub fn from_csv_reader<R: Read>(
        origin: impl Into<String>,
        reader: R,
    ) -> Result<Self, SourceReadError> {
        let origin = origin.into();
        let csv_error = |source| SourceReadError::Csv {
            origin: origin.clone(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers: Vec<String> = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(normalize_header)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            let mut row = Map::new();
            for (header, cell) in headers.iter().zip(record.iter()) {
                if header.is_empty() {
                    continue;
                }
                row.insert(header.clone(), Value::String(cell.trim().to_string()));
            }
            rows.push(Value::Object(row));
        }
        Ok(Self {
            origin,
            root: Value::Array(rows),
        })
    }

    /// Loads a `.json` or `.csv` file.
    pub fn from_path(path: &Path) -> Result<Self, SourceReadError> {
        let origin = path.display().to_string();
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => {
                let text = fs::read_to_string(path).map_err(|e| SourceReadError::io(path, e))?;
                Self::from_json_str(origin, &text)
            }
            Some("csv") => {
                let file = fs::File::open(path).map_err(|e| SourceReadError::io(path, e))?;
                Self::from_csv_reader(origin, file)
            }
            _ => Err(SourceReadError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Locates the row array for a table.
    ///
    /// With a `records_path` the pointer must resolve to an array. Without
    /// one, the root array is used, else the first array found under the
    /// table's file stem or a conventional container key.
    pub fn rows(
        &self,
        records_path: Option<&str>,
        table_type: TableType,
    ) -> Result<&[Value], SourceReadError> {
        if let Some(pointer) = records_path.filter(|p| !p.is_empty()) {
            return match self.root.pointer(pointer) {
                Some(Value::Array(rows)) => Ok(rows.as_slice()),
                _ => Err(self.records_not_found(pointer)),
            };
        }

        match &self.root {
            Value::Array(rows) => Ok(rows.as_slice()),
            Value::Object(map) => std::iter::once(table_type.file_stem())
                .chain(ROW_CONTAINER_KEYS.iter().copied())
                .find_map(|key| match map.get(key) {
                    Some(Value::Array(rows)) => Some(rows.as_slice()),
                    _ => None,
                })
                .ok_or_else(|| self.records_not_found("")),
            _ => Err(self.records_not_found("")),
        }
    }

    /// Document-level publication date from `metadata`.
    pub fn published_date(&self) -> Option<NaiveDate> {
        ["/metadata/published_at", "/metadata/effective_date"]
            .iter()
            .filter_map(|pointer| self.root.pointer(pointer))
            .filter_map(scalar_text)
            .find_map(|text| parse_date(&text))
    }

    /// Snapshot version label from `metadata.version`.
    pub fn version(&self) -> Option<String> {
        self.root.pointer("/metadata/version").and_then(scalar_text)
    }

    fn records_not_found(&self, records_path: &str) -> SourceReadError {
        SourceReadError::RecordsNotFound {
            origin: self.origin.clone(),
            records_path: records_path.to_string(),
        }
    }
}

/// Looks up a possibly dotted field name in a row.
///
/// An exact key match wins over a dotted path, so keys that contain dots
/// still resolve.
pub fn lookup<'a>(row: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    if let Some(value) = row.get(field) {
        return Some(value);
    }
    let mut parts = field.split('.');
    let first = parts.next()?;
    let mut current = row.get(first)?;
    for part in parts {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Text of a scalar value; blank strings and nulls are `None`.
///
/// Arrays of scalars are joined with `"; "`.
pub fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null | Value::Object(_) => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(scalar_text)
            .collect::<Vec<_>>()
            .join("; "),
    };
    (!text.is_empty()).then_some(text)
}

fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
