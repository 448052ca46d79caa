//! Feature Record - validated raw input
//!
//! A [`FeatureRecord`] can only be built through validation against
//! [`SCHEMA`](super::layout::SCHEMA): every field present, nothing unknown,
//! numbers finite and in range, categories from the field's enumeration.
//! Once built it is immutable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::layout::{FieldKind, FieldSpec, FIELD_COUNT, SCHEMA};
use crate::logic::error::{CardioError, CardioResult};

/// Raw or canonical value of one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Category(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Category(_) => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            FieldValue::Category(s) => Some(s.as_str()),
            FieldValue::Number(_) => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Category(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Category(s)
    }
}

/// Validated input record, values stored in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    values: Vec<FieldValue>,
}

impl FeatureRecord {
    /// Validate a raw field map
    pub fn from_map(mut raw: BTreeMap<String, FieldValue>) -> CardioResult<Self> {
        let mut values = Vec::with_capacity(FIELD_COUNT);

        for spec in SCHEMA {
            let value = raw
                .remove(spec.name)
                .ok_or_else(|| CardioError::validation(format!("missing required field '{}'", spec.name)))?;
            values.push(canonicalize(spec, value)?);
        }

        if let Some(unknown) = raw.keys().next() {
            return Err(CardioError::validation(format!("unknown field '{}'", unknown)));
        }

        Ok(Self { values })
    }

    /// Convenience constructor from `(name, value)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> CardioResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let mut raw = BTreeMap::new();
        for (k, v) in pairs {
            let key = k.into();
            if raw.insert(key.clone(), v.into()).is_some() {
                return Err(CardioError::validation(format!("duplicate field '{}'", key)));
            }
        }
        Self::from_map(raw)
    }

    /// Values in schema order
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        super::layout::field_index(name).and_then(|i| self.values.get(i))
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_number)
    }

    pub fn category(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_category)
    }

    /// Copy with one numeric field replaced (re-validated)
    pub fn with_number(&self, name: &str, value: f64) -> CardioResult<Self> {
        let index = super::layout::field_index(name)
            .ok_or_else(|| CardioError::validation(format!("unknown field '{}'", name)))?;
        let mut values = self.values.clone();
        values[index] = canonicalize(&SCHEMA[index], FieldValue::Number(value))?;
        Ok(Self { values })
    }

    /// Field → value snapshot for persistence
    pub fn to_map(&self) -> BTreeMap<String, FieldValue> {
        SCHEMA
            .iter()
            .zip(self.values.iter())
            .map(|(spec, value)| (spec.name.to_string(), value.clone()))
            .collect()
    }
}

fn canonicalize(spec: &FieldSpec, value: FieldValue) -> CardioResult<FieldValue> {
    match spec.kind {
        FieldKind::Number { min, max, .. } => {
            let n = match value {
                FieldValue::Number(n) => n,
                // Form posts sometimes carry numbers as strings
                FieldValue::Category(s) => s.trim().parse::<f64>().map_err(|_| {
                    CardioError::validation(format!("field '{}' expects a number, got '{}'", spec.name, s))
                })?,
            };
            if !n.is_finite() || n < min || n > max {
                return Err(CardioError::validation(format!(
                    "field '{}' must be between {} and {}, got {}",
                    spec.name, min, max, n
                )));
            }
            Ok(FieldValue::Number(n))
        }
        FieldKind::Category { options } => {
            let FieldValue::Category(s) = value else {
                return Err(CardioError::validation(format!(
                    "field '{}' expects one of: {}",
                    spec.name,
                    options.iter().map(|c| c.label).collect::<Vec<_>>().join(", ")
                )));
            };
            let category = spec.category(&s).ok_or_else(|| {
                CardioError::validation(format!("field '{}' has no option '{}'", spec.name, s))
            })?;
            Ok(FieldValue::Category(category.slug.to_string()))
        }
    }
}
