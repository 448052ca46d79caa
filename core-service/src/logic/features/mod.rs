//! Features Module - Input Schema & Encoding
//!
//! Raw form input is validated into a [`FeatureRecord`], then encoded into a
//! [`FeatureVector`] following the column artifact's ordering.

pub mod layout;
pub mod record;
pub mod vector;


// Re-export common types
pub use layout::{FieldKind, FieldSpec, LayoutInfo, FIELD_COUNT, SCHEMA, SCHEMA_VERSION};
pub use record::{FeatureRecord, FieldValue};
pub use vector::{ColumnLayout, ColumnSource, FeatureVector};
