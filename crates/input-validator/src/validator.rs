//! Range Validator for Car Specifications

use crate::error::{RangeConfigError, ValidationError};
use feature_encoder::{NumericField, RawInput};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Validation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Engine size valid range (cc)
    pub enginesize_range: (f64, f64),
    /// Horsepower valid range (hp)
    pub horsepower_range: (f64, f64),
    /// City fuel economy valid range (mpg)
    pub citympg_range: (f64, f64),
    /// Highway fuel economy valid range (mpg)
    pub highwaympg_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        let range = |field: NumericField| {
            let bounds = field.bounds();
            (bounds.min, bounds.max)
        };
        Self {
            enginesize_range: range(NumericField::EngineSize),
            horsepower_range: range(NumericField::Horsepower),
            citympg_range: range(NumericField::CityMpg),
            highwaympg_range: range(NumericField::HighwayMpg),
        }
    }
}

impl ValidationConfig {
    /// Configured range for a field
    pub fn range(&self, field: NumericField) -> (f64, f64) {
        match field {
            NumericField::EngineSize => self.enginesize_range,
            NumericField::Horsepower => self.horsepower_range,
            NumericField::CityMpg => self.citympg_range,
            NumericField::HighwayMpg => self.highwaympg_range,
        }
    }

    /// Reject ranges that would turn every value away
    pub fn check(&self) -> Result<(), RangeConfigError> {
        for &field in NumericField::ALL.iter() {
            let (min, max) = self.range(field);
            if !(min.is_finite() && max.is_finite() && min <= max) {
                return Err(RangeConfigError {
                    field: field.name(),
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}

/// Result of validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether all values are valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of fields validated
    pub fields_checked: usize,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid(fields_checked: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            fields_checked,
        }
    }

    /// Create an invalid result with errors
    pub fn invalid(errors: Vec<ValidationError>, fields_checked: usize) -> Self {
        Self {
            valid: false,
            errors,
            fields_checked,
        }
    }

    /// Convert into a `Result`, keeping every error
    pub fn into_result(self) -> Result<(), Vec<ValidationError>> {
        if self.valid {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Validator for submitted car specifications
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite { field });
        }
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate one numeric field against its configured range
    pub fn validate_field(&self, field: NumericField, value: f64) -> Result<(), ValidationError> {
        self.validate_range(field.name(), value, self.config.range(field))
    }

    /// Validate every numeric field of an input, collecting all errors
    pub fn validate(&self, input: &RawInput) -> ValidationResult {
        let errors: Vec<ValidationError> = NumericField::ALL
            .iter()
            .filter_map(|&field| self.validate_field(field, input.numeric(field)).err())
            .collect();

        let fields_checked = NumericField::ALL.len();
        if errors.is_empty() {
            ValidationResult::valid(fields_checked)
        } else {
            debug!("Input rejected with {} validation error(s)", errors.len());
            ValidationResult::invalid(errors, fields_checked)
        }
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
