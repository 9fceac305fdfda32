//! Delimited dataset loading
//!
//! Reads a labeled tabular CSV into column-major storage, validating the
//! header against a [`FeatureSchema`] and the label column against the
//! binary {0, 1} domain. Cell-level missing values (empty fields) are kept
//! as `None` and left for the transformer's imputers.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{LatirError, Result};
use crate::schema::FeatureSchema;

/// Parse options passed through to the CSV reader
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    /// Field delimiter byte
    pub delimiter: u8,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Column-major labeled dataset
///
/// Column vectors are parallel to the schema's `numeric` and `categorical`
/// lists. Every row carries a validated binary label.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// One vector per numeric column, `None` marks a missing cell
    pub numeric: Vec<Vec<Option<f64>>>,
    /// One vector per categorical column, `None` marks a missing cell
    pub categorical: Vec<Vec<Option<String>>>,
    /// Binary labels, one per row
    pub labels: Vec<i32>,
}

impl Dataset {
    /// Load a dataset from a delimited file
    ///
    /// Fails if the file is unreadable, if any schema column is absent from
    /// the header, if a numeric cell cannot be parsed, or if a label falls
    /// outside {0, 1}.
    pub fn from_csv(path: &Path, schema: &FeatureSchema, options: &ReadOptions) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        let index: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim(), i))
            .collect();

        let column_index = |name: &str| -> Result<usize> {
            index
                .get(name)
                .copied()
                .ok_or_else(|| LatirError::MissingColumn {
                    column: name.to_string(),
                })
        };

        let numeric_idx: Vec<usize> = schema
            .numeric
            .iter()
            .map(|c| column_index(c))
            .collect::<Result<_>>()?;
        let categorical_idx: Vec<usize> = schema
            .categorical
            .iter()
            .map(|c| column_index(c))
            .collect::<Result<_>>()?;
        let label_idx = column_index(&schema.label)?;

        let mut numeric: Vec<Vec<Option<f64>>> = vec![Vec::new(); numeric_idx.len()];
        let mut categorical: Vec<Vec<Option<String>>> = vec![Vec::new(); categorical_idx.len()];
        let mut labels: Vec<i32> = Vec::new();

        for (row, record) in reader.records().enumerate() {
            let record = record?;

            for (slot, &col) in numeric_idx.iter().enumerate() {
                let cell = record.get(col).unwrap_or("").trim();
                if cell.is_empty() {
                    numeric[slot].push(None);
                } else {
                    let value =
                        cell.parse::<f64>()
                            .map_err(|_| LatirError::InvalidValue {
                                column: schema.numeric[slot].clone(),
                                value: cell.to_string(),
                                row,
                            })?;
                    numeric[slot].push(Some(value));
                }
            }

            for (slot, &col) in categorical_idx.iter().enumerate() {
                let cell = record.get(col).unwrap_or("").trim();
                if cell.is_empty() {
                    categorical[slot].push(None);
                } else {
                    categorical[slot].push(Some(cell.to_string()));
                }
            }

            let cell = record.get(label_idx).unwrap_or("").trim();
            labels.push(parse_binary_label(cell, row)?);
        }

        Ok(Self {
            numeric,
            categorical,
            labels,
        })
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the dataset has no rows
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Build a new dataset from a row-index selection (used for the
    /// train/validation split)
    pub fn select(&self, rows: &[usize]) -> Self {
        Self {
            numeric: self
                .numeric
                .iter()
                .map(|col| rows.iter().map(|&r| col[r]).collect())
                .collect(),
            categorical: self
                .categorical
                .iter()
                .map(|col| rows.iter().map(|&r| col[r].clone()).collect())
                .collect(),
            labels: rows.iter().map(|&r| self.labels[r]).collect(),
        }
    }
}

/// Parse a label cell, enforcing the binary {0, 1} domain
fn parse_binary_label(cell: &str, row: usize) -> Result<i32> {
    match cell.parse::<f64>() {
        Ok(v) if v == 0.0 => Ok(0),
        Ok(v) if v == 1.0 => Ok(1),
        _ => Err(LatirError::LabelDomain {
            value: cell.to_string(),
            row,
        }),
    }
}
