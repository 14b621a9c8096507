use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A normalized recipient table produced by one of the ingestion paths
/// (CSV upload or linked spreadsheet).
///
/// The invariant maintained by [`DataSource::from_parts`] is that every row
/// carries exactly the keys listed in `columns`, in the source column order.
/// Instances are never mutated in place; re-ingesting builds a fresh value
/// that replaces the previous one wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub columns: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

impl DataSource {
    /// Normalizes parser output (`columns` + row maps) into a `DataSource`.
    ///
    /// Rows are reshaped so each holds exactly the header keys: values for
    /// missing columns become empty strings and keys outside the header are
    /// dropped. Fails when the column set is empty, contains an empty name,
    /// or repeats a name.
    pub fn from_parts(columns: Vec<String>, rows: Vec<HashMap<String, String>>) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::Parse("data source has no columns".into()));
        }
        let mut seen = Vec::with_capacity(columns.len());
        for column in &columns {
            if column.trim().is_empty() {
                return Err(Error::Parse("data source has an unnamed column".into()));
            }
            if seen.contains(&column) {
                return Err(Error::Parse(format!("duplicate column \"{}\"", column)));
            }
            seen.push(column);
        }

        let rows = rows
            .into_iter()
            .map(|mut raw| {
                columns
                    .iter()
                    .map(|column| {
                        let value = raw.remove(column).unwrap_or_default();
                        (column.clone(), value)
                    })
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
