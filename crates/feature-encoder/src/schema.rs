//! Training Schema and Column Alignment

use crate::error::SchemaError;
use crate::input::{producible_columns, NumericField};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::trace;

/// Ordered feature columns a trained model expects.
///
/// Column names are unique and non-blank. The schema is immutable once
/// built; clones share the column list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct TrainingSchema {
    columns: Arc<[String]>,
    positions: Arc<HashMap<String, usize>>,
}

impl TrainingSchema {
    /// Build a schema from training-time column names
    pub fn new(columns: Vec<String>) -> Result<Self, SchemaError> {
        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut positions = HashMap::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            if column.trim().is_empty() {
                return Err(SchemaError::BlankColumn(idx));
            }
            if positions.insert(column.clone(), idx).is_some() {
                return Err(SchemaError::DuplicateColumn(column.clone()));
            }
        }

        Ok(Self {
            columns: columns.into(),
            positions: Arc::new(positions),
        })
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false for a constructed schema
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column
    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    /// Reindex a named record onto this schema.
    ///
    /// Schema columns missing from the record are 0, record columns not in
    /// the schema are dropped, and the output follows schema order.
    pub fn reindex(&self, record: &[(String, f64)]) -> EncodedVector {
        let mut values = vec![0.0; self.columns.len()];
        for (column, value) in record {
            match self.positions.get(column) {
                Some(&idx) => values[idx] = *value,
                None => trace!("Dropping column '{}' absent from training schema", column),
            }
        }

        EncodedVector {
            columns: Arc::clone(&self.columns),
            positions: Arc::clone(&self.positions),
            values,
        }
    }

    /// Compare the schema against what raw inputs can produce
    pub fn coverage(&self) -> SchemaCoverage {
        let producible = producible_columns();
        let producible_set: HashSet<&str> = producible.iter().map(String::as_str).collect();
        let numeric: HashSet<&str> = NumericField::ALL.iter().map(|f| f.name()).collect();

        let unreachable = self
            .columns
            .iter()
            .filter(|column| !producible_set.contains(column.as_str()))
            .cloned()
            .collect();

        let untrained_levels = producible
            .iter()
            .filter(|column| !numeric.contains(column.as_str()))
            .filter(|column| !self.positions.contains_key(column.as_str()))
            .cloned()
            .collect();

        SchemaCoverage {
            unreachable,
            untrained_levels,
        }
    }
}

impl PartialEq for TrainingSchema {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}

impl TryFrom<Vec<String>> for TrainingSchema {
    type Error = SchemaError;

    fn try_from(columns: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(columns)
    }
}

impl From<TrainingSchema> for Vec<String> {
    fn from(schema: TrainingSchema) -> Self {
        schema.columns.to_vec()
    }
}

/// How a schema relates to the columns raw inputs can produce
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaCoverage {
    /// Schema columns no input can produce; always encoded as 0
    pub unreachable: Vec<String>,
    /// Categorical levels missing from the schema; selecting one encodes
    /// its field as all zeros
    pub untrained_levels: Vec<String>,
}

impl SchemaCoverage {
    /// Whether every schema column is producible and every level trained
    pub fn is_complete(&self) -> bool {
        self.unreachable.is_empty() && self.untrained_levels.is_empty()
    }
}

/// Feature vector aligned to a training schema
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedVector {
    columns: Arc<[String]>,
    positions: Arc<HashMap<String, usize>>,
    values: Vec<f64>,
}

impl EncodedVector {
    /// Values in schema order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Column names in schema order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Value of a named column
    pub fn get(&self, column: &str) -> Option<f64> {
        self.positions
            .get(column)
            .and_then(|&idx| self.values.get(idx).copied())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consume into the raw values
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}
