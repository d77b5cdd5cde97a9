//! One-Hot Encoding and Schema Alignment

use crate::input::{NumericField, RawInput};
use crate::schema::{EncodedVector, TrainingSchema};
use tracing::debug;

/// Expand an input into named columns: one `field_level = 1.0` column per
/// categorical field, and the numeric fields under their own names.
///
/// Only the selected levels are materialized; aligning onto a schema fills
/// everything else with zeros.
pub fn one_hot(input: &RawInput) -> Vec<(String, f64)> {
    let mut record = Vec::with_capacity(NumericField::ALL.len() + 7);

    for field in NumericField::ALL {
        record.push((field.name().to_string(), input.numeric(field)));
    }
    for column in input.selected_columns() {
        record.push((column, 1.0));
    }

    record
}

/// Encode an input into the feature vector `schema` describes
pub fn encode(input: &RawInput, schema: &TrainingSchema) -> EncodedVector {
    let record = one_hot(input);
    let vector = schema.reindex(&record);

    debug!(
        "Encoded input into {} columns ({} set by input)",
        vector.len(),
        record
            .iter()
            .filter(|(column, _)| schema.position(column).is_some())
            .count()
    );

    vector
}
