//! Feature Encoding Engine
//!
//! Turns a raw car specification into the fixed-width feature vector a
//! trained price model expects: categorical fields are one-hot encoded,
//! numeric fields pass through, and the result is aligned onto the model's
//! training columns.

mod encoder;
mod error;
mod input;
mod schema;

pub use encoder::{encode, one_hot};
pub use error::{ParseLevelError, SchemaError};
pub use input::{
    field_descriptors, producible_columns, Aspiration, Brand, CarBody, Categorical, DoorNumber,
    DriveWheel, EngineLocation, FieldDescriptor, FuelType, NumericBounds, NumericField, RawInput,
};
pub use schema::{EncodedVector, SchemaCoverage, TrainingSchema};
