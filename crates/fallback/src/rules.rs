//! Heuristic Pricing Rules

use feature_encoder::{CarBody, DriveWheel, FuelType, RawInput};
use price_model::{PredictionError, PriceEstimate, PriceEstimator};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// Weights of the heuristic price formula
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    /// Starting price before adjustments
    pub base_price: f64,
    /// Added per horsepower
    pub horsepower_factor: f64,
    /// Added per cc of engine size
    pub enginesize_factor: f64,
    /// Subtracted per city mpg
    pub citympg_deduction: f64,
    /// Added for convertibles
    pub convertible_premium: f64,
    /// Added for rear-wheel drive
    pub rwd_premium: f64,
    /// Added for diesel engines
    pub diesel_premium: f64,
    /// Lowest price ever returned
    pub floor: f64,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            base_price: 8000.0,
            horsepower_factor: 50.0,
            enginesize_factor: 20.0,
            citympg_deduction: 100.0,
            convertible_premium: 5000.0,
            rwd_premium: 2000.0,
            diesel_premium: 1500.0,
            floor: 5000.0,
        }
    }
}

/// Rule-based estimator over the raw input fields
#[derive(Debug, Clone, Default)]
pub struct HeuristicEstimator {
    config: HeuristicConfig,
}

impl HeuristicEstimator {
    /// Create an estimator with the given weights
    pub fn new(config: HeuristicConfig) -> Self {
        Self { config }
    }

    /// Price an input with the heuristic formula
    pub fn price(&self, input: &RawInput) -> f64 {
        let c = &self.config;
        let mut price = c.base_price + input.horsepower * c.horsepower_factor
            + input.enginesize * c.enginesize_factor
            - input.citympg * c.citympg_deduction;

        if input.carbody == CarBody::Convertible {
            price += c.convertible_premium;
        }
        if input.drivewheel == DriveWheel::Rwd {
            price += c.rwd_premium;
        }
        if input.fueltype == FuelType::Diesel {
            price += c.diesel_premium;
        }

        if price.is_nan() {
            return price;
        }
        price.max(c.floor)
    }
}

impl PriceEstimator for HeuristicEstimator {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn estimate(&self, input: &RawInput) -> Result<PriceEstimate, PredictionError> {
        let start = Instant::now();
        let price = self.price(input);
        if !price.is_finite() {
            return Err(PredictionError::NonFinite(price));
        }

        debug!("Heuristic price {:.2}", price);
        Ok(PriceEstimate {
            price,
            latency_us: start.elapsed().as_micros() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_input_price() {
        // 8000 + 100*50 + 150*20 - 15*100 + convertible 5000
        let estimator = HeuristicEstimator::default();
        assert_eq!(estimator.price(&RawInput::default()), 19_500.0);
    }

    #[test]
    fn test_premiums_stack() {
        let input = RawInput {
            carbody: CarBody::Sedan,
            drivewheel: DriveWheel::Rwd,
            fueltype: FuelType::Diesel,
            ..Default::default()
        };
        // 14500 + 2000 + 1500
        assert_eq!(HeuristicEstimator::default().price(&input), 18_000.0);
    }

    #[test]
    fn test_price_is_floored() {
        let input = RawInput {
            carbody: CarBody::Sedan,
            enginesize: 50.0,
            horsepower: 40.0,
            citympg: 40.0,
            ..Default::default()
        };
        // 8000 + 2000 + 1000 - 4000 = 7000, still above the floor
        assert_eq!(HeuristicEstimator::default().price(&input), 7000.0);

        let strict = HeuristicEstimator::new(HeuristicConfig {
            citympg_deduction: 500.0,
            ..Default::default()
        });
        assert_eq!(strict.price(&input), 5000.0);
    }

    #[test]
    fn test_non_finite_input_is_an_error() {
        let input = RawInput {
            horsepower: f64::NAN,
            ..Default::default()
        };
        assert!(HeuristicEstimator::default().estimate(&input).is_err());
    }

    proptest! {
        #[test]
        fn prop_never_below_floor(
            enginesize in 50.0f64..=600.0,
            horsepower in 40.0f64..=400.0,
            citympg in 5.0f64..=40.0,
        ) {
            let input = RawInput { enginesize, horsepower, citympg, ..Default::default() };
            prop_assert!(HeuristicEstimator::default().price(&input) >= 5000.0);
        }
    }
}
