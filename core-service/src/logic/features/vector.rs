//! Feature Vector - Core data structure for ML input
//!
//! The column artifact names the encoded columns in the order the model was
//! trained on. Each name resolves against the schema:
//! - `<field>` for numeric fields copies the value
//! - `<field>_<category>` for categorical fields is a one-hot indicator
//!
//! Categories without a column (the dropped reference level) simply encode
//! as all zeros. A column that resolves to nothing is schema drift and is
//! reported as a mismatch rather than silently zero-filled.

use serde::{Deserialize, Serialize};

use super::layout::{FieldKind, SCHEMA};
use super::record::{FeatureRecord, FieldValue};
use crate::logic::error::{CardioError, CardioResult};

// ============================================================================
// COLUMN RESOLUTION
// ============================================================================

/// Where an encoded column takes its value from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSource {
    Numeric { field: usize },
    Indicator { field: usize, category: &'static str },
}

impl ColumnSource {
    /// Index of the schema field that owns this column
    pub fn field(&self) -> usize {
        match self {
            ColumnSource::Numeric { field } | ColumnSource::Indicator { field, .. } => *field,
        }
    }
}

/// Resolve one encoded column name against the schema
pub fn resolve_column(column: &str) -> Option<ColumnSource> {
    for (index, spec) in SCHEMA.iter().enumerate() {
        match spec.kind {
            FieldKind::Number { .. } if column == spec.name => {
                return Some(ColumnSource::Numeric { field: index });
            }
            FieldKind::Category { options } => {
                let Some(suffix) = column
                    .strip_prefix(spec.name)
                    .and_then(|rest| rest.strip_prefix('_'))
                else {
                    continue;
                };
                if let Some(option) = options.iter().find(|c| c.slug == suffix) {
                    return Some(ColumnSource::Indicator { field: index, category: option.slug });
                }
            }
            _ => {}
        }
    }
    None
}

/// Column ordering from the column artifact, resolved once at load time
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    names: Vec<String>,
    sources: Vec<Option<ColumnSource>>,
}

impl ColumnLayout {
    pub fn new(names: Vec<String>) -> Self {
        let sources = names.iter().map(|n| resolve_column(n)).collect();
        Self { names, sources }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Columns that no schema field produces
    pub fn unresolved(&self) -> Vec<&str> {
        self.names
            .iter()
            .zip(self.sources.iter())
            .filter(|(_, s)| s.is_none())
            .map(|(n, _)| n.as_str())
            .collect()
    }

    /// Schema field owning each column (`None` for unresolved columns)
    pub fn owners(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        self.sources.iter().map(|s| s.map(|s| s.field()))
    }

    /// Encode a record into column order
    pub fn encode(&self, record: &FeatureRecord) -> CardioResult<FeatureVector> {
        let mut values = Vec::with_capacity(self.len());

        for (name, source) in self.names.iter().zip(self.sources.iter()) {
            let source = source.ok_or_else(|| CardioError::SchemaMismatch {
                expected: self.len(),
                actual: self.len() - self.unresolved().len(),
                detail: format!("column '{}' is not produced by the feature schema", name),
            })?;

            let value = match (source, &record.values()[source.field()]) {
                (ColumnSource::Numeric { .. }, FieldValue::Number(n)) => *n,
                (ColumnSource::Indicator { category, .. }, FieldValue::Category(slug)) => {
                    if slug == category { 1.0 } else { 0.0 }
                }
                _ => {
                    return Err(CardioError::SchemaMismatch {
                        expected: self.len(),
                        actual: values.len(),
                        detail: format!("column '{}' received a value of the wrong kind", name),
                    })
                }
            };
            values.push(value);
        }

        Ok(FeatureVector::from_values(values))
    }
}

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Encoded model input in column-artifact order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
