//! Feature Layout - Centralized Feature Schema
//!
//! **CRITICAL: This file controls the raw input schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add field → increment SCHEMA_VERSION
//! 2. Change order → increment SCHEMA_VERSION
//! 3. Remove field or category → increment SCHEMA_VERSION
//!
//! History entries carry the version and layout hash they were recorded
//! with, and the column artifact is resolved against these names.

use crc32fast::Hasher;
use serde::Serialize;

// ============================================================================
// SCHEMA VERSION
// ============================================================================

/// Current schema version
/// MUST be incremented when the layout changes
pub const SCHEMA_VERSION: u8 = 1;

// ============================================================================
// FIELD NAMES
// ============================================================================

pub const AGE: &str = "age";
pub const SEX: &str = "sex";
pub const CHEST_PAIN_TYPE: &str = "chest_pain_type";
pub const RESTING_BLOOD_PRESSURE: &str = "resting_blood_pressure";
pub const CHOLESTEROL: &str = "cholesterol";
pub const FASTING_BLOOD_SUGAR: &str = "fasting_blood_sugar";
pub const REST_ECG: &str = "rest_ecg";
pub const MAX_HEART_RATE: &str = "max_heart_rate";
pub const EXERCISE_INDUCED_ANGINA: &str = "exercise_induced_angina";
pub const OLDPEAK: &str = "oldpeak";
pub const SLOPE: &str = "slope";

// ============================================================================
// FIELD DEFINITIONS
// ============================================================================

/// One allowed value of a categorical field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Category {
    /// Canonical value, also the one-hot column suffix
    pub slug: &'static str,
    /// Human readable form label
    pub label: &'static str,
}

const fn cat(slug: &'static str, label: &'static str) -> Category {
    Category { slug, label }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Inclusive range; `default` is what the form pre-fills
    Number { min: f64, max: f64, default: f64 },
    Category { options: &'static [Category] },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, FieldKind::Number { .. })
    }

    /// Look up a category by slug or label (case-insensitive)
    pub fn category(&self, input: &str) -> Option<&'static Category> {
        let FieldKind::Category { options } = self.kind else {
            return None;
        };
        let needle = input.trim();
        options.iter().find(|c| {
            c.slug.eq_ignore_ascii_case(needle) || c.label.eq_ignore_ascii_case(needle)
        })
    }

    /// Inclusive bounds for numeric fields
    pub fn range(&self) -> Option<(f64, f64)> {
        match self.kind {
            FieldKind::Number { min, max, .. } => Some((min, max)),
            FieldKind::Category { .. } => None,
        }
    }
}

const BINARY: &[Category] = &[cat("no", "No"), cat("yes", "Yes")];

const SEX_OPTIONS: &[Category] = &[cat("female", "Female"), cat("male", "Male")];

const CHEST_PAIN_OPTIONS: &[Category] = &[
    cat("typical_angina", "Typical Angina"),
    cat("atypical_angina", "Atypical Angina"),
    cat("non_anginal_pain", "Non-Anginal Pain"),
    cat("asymptomatic", "Asymptomatic"),
];

const REST_ECG_OPTIONS: &[Category] = &[
    cat("normal", "Normal"),
    cat("st_t_abnormality", "ST-T abnormality"),
    cat("left_ventricular_hypertrophy", "Left Ventricular Hypertrophy"),
];

const SLOPE_OPTIONS: &[Category] = &[cat("up", "Up"), cat("flat", "Flat"), cat("down", "Down")];

/// Raw form fields in the exact order they are validated and stored
/// This is the SINGLE SOURCE OF TRUTH for the input schema
pub const SCHEMA: &[FieldSpec] = &[
    FieldSpec {
        name: AGE,
        label: "Age",
        kind: FieldKind::Number { min: 20.0, max: 100.0, default: 50.0 },
    },
    FieldSpec {
        name: SEX,
        label: "Sex",
        kind: FieldKind::Category { options: SEX_OPTIONS },
    },
    FieldSpec {
        name: CHEST_PAIN_TYPE,
        label: "Chest Pain Type",
        kind: FieldKind::Category { options: CHEST_PAIN_OPTIONS },
    },
    FieldSpec {
        name: RESTING_BLOOD_PRESSURE,
        label: "Resting Blood Pressure (mm Hg)",
        kind: FieldKind::Number { min: 80.0, max: 200.0, default: 120.0 },
    },
    FieldSpec {
        name: CHOLESTEROL,
        label: "Cholesterol (mg/dl)",
        kind: FieldKind::Number { min: 100.0, max: 600.0, default: 200.0 },
    },
    FieldSpec {
        name: FASTING_BLOOD_SUGAR,
        label: "Fasting Blood Sugar > 120 mg/dl",
        kind: FieldKind::Category { options: BINARY },
    },
    FieldSpec {
        name: REST_ECG,
        label: "Resting ECG",
        kind: FieldKind::Category { options: REST_ECG_OPTIONS },
    },
    FieldSpec {
        name: MAX_HEART_RATE,
        label: "Maximum Heart Rate",
        kind: FieldKind::Number { min: 60.0, max: 210.0, default: 150.0 },
    },
    FieldSpec {
        name: EXERCISE_INDUCED_ANGINA,
        label: "Exercise Induced Angina",
        kind: FieldKind::Category { options: BINARY },
    },
    FieldSpec {
        name: OLDPEAK,
        label: "Oldpeak (ST depression)",
        kind: FieldKind::Number { min: 0.0, max: 6.0, default: 1.0 },
    },
    FieldSpec {
        name: SLOPE,
        label: "ST Slope",
        kind: FieldKind::Category { options: SLOPE_OPTIONS },
    },
];

/// Total number of raw fields
/// IMPORTANT: Must match SCHEMA.len()!
pub const FIELD_COUNT: usize = 11;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the schema
/// Used to tie persisted history to the schema that produced it
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[SCHEMA_VERSION]);

    for field in SCHEMA {
        hasher.update(field.name.as_bytes());
        hasher.update(&[0]);
        if let FieldKind::Category { options } = field.kind {
            for option in options {
                hasher.update(option.slug.as_bytes());
                hasher.update(&[1]);
            }
        }
    }

    hasher.finalize()
}

pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete schema description for form rendering
#[derive(Debug, Clone, Serialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub field_count: usize,
    pub fields: &'static [FieldSpec],
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: SCHEMA_VERSION,
            hash: layout_hash(),
            field_count: FIELD_COUNT,
            fields: SCHEMA,
        }
    }
}

// ============================================================================
// FIELD LOOKUP
// ============================================================================

/// Get field index by name (O(n) but fields are few)
pub fn field_index(name: &str) -> Option<usize> {
    SCHEMA.iter().position(|f| f.name == name)
}

pub fn field(name: &str) -> Option<&'static FieldSpec> {
    SCHEMA.iter().find(|f| f.name == name)
}

/// Get field name by index
pub fn field_name(index: usize) -> Option<&'static str> {
    SCHEMA.get(index).map(|f| f.name)
}

// ============================================================================
// TESTS
// ============================================================================
