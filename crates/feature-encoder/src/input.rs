//! Raw Car Specification Input

use crate::error::ParseLevelError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A closed set of levels for one categorical field.
///
/// The one-hot column for a level is named `{FIELD}_{level}`, matching the
/// dummy-variable naming used when the model was trained.
pub trait Categorical: Copy + Sized + 'static {
    /// Field name as it appears in the input record
    const FIELD: &'static str;
    /// Every level, in declaration order
    const LEVELS: &'static [Self];

    /// Literal for this level
    fn level(&self) -> &'static str;

    /// One-hot column name for this level
    fn column(&self) -> String {
        format!("{}_{}", Self::FIELD, self.level())
    }
}

macro_rules! categorical_field {
    ($(#[$meta:meta])* $name:ident, $field:literal, { $($variant:ident => $level:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl Categorical for $name {
            const FIELD: &'static str = $field;
            const LEVELS: &'static [Self] = &[$($name::$variant),+];

            fn level(&self) -> &'static str {
                match self {
                    $($name::$variant => $level),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ParseLevelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($level => Ok($name::$variant),)+
                    _ => Err(ParseLevelError::new::<Self>(s)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.level())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.level())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

categorical_field!(
    /// Car manufacturer
    Brand, "brand", {
        Audi => "audi",
        Bmw => "bmw",
        Chevrolet => "chevrolet",
        Honda => "honda",
        Hyundai => "hyundai",
        Jaguar => "jaguar",
        Mazda => "mazda",
        Mercedes => "mercedes",
        Mitsubishi => "mitsubishi",
        Nissan => "nissan",
        Porsche => "porsche",
        Subaru => "subaru",
        Toyota => "toyota",
        Volkswagen => "volkswagen",
        Volvo => "volvo",
    }
);

categorical_field!(
    /// Fuel type
    FuelType, "fueltype", { Gas => "gas", Diesel => "diesel" }
);

categorical_field!(
    /// Engine aspiration
    Aspiration, "aspiration", { Std => "std", Turbo => "turbo" }
);

categorical_field!(
    /// Number of doors
    DoorNumber, "doornumber", { Two => "two", Four => "four" }
);

categorical_field!(
    /// Body style
    CarBody, "carbody", {
        Sedan => "sedan",
        Hatchback => "hatchback",
        Convertible => "convertible",
        Wagon => "wagon",
        Hardtop => "hardtop",
    }
);

categorical_field!(
    /// Driven wheels
    DriveWheel, "drivewheel", { Fwd => "fwd", Rwd => "rwd", FourWd => "4wd" }
);

categorical_field!(
    /// Engine placement
    EngineLocation, "enginelocation", { Front => "front", Rear => "rear" }
);

/// Declared range of a numeric input field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

/// Numeric fields passed through to the model unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    /// Engine displacement (cc)
    EngineSize,
    /// Engine power (hp)
    Horsepower,
    /// City fuel economy (mpg)
    CityMpg,
    /// Highway fuel economy (mpg)
    HighwayMpg,
}

impl NumericField {
    /// All numeric fields, in record order
    pub const ALL: [NumericField; 4] = [
        NumericField::EngineSize,
        NumericField::Horsepower,
        NumericField::CityMpg,
        NumericField::HighwayMpg,
    ];

    /// Column name, identical to the field name
    pub fn name(&self) -> &'static str {
        match self {
            NumericField::EngineSize => "enginesize",
            NumericField::Horsepower => "horsepower",
            NumericField::CityMpg => "citympg",
            NumericField::HighwayMpg => "highwaympg",
        }
    }

    /// Declared bounds for form widgets and validation
    pub fn bounds(&self) -> NumericBounds {
        let (min, max, default) = match self {
            NumericField::EngineSize => (50.0, 600.0, 150.0),
            NumericField::Horsepower => (40.0, 400.0, 100.0),
            NumericField::CityMpg => (5.0, 40.0, 15.0),
            NumericField::HighwayMpg => (5.0, 50.0, 20.0),
        };
        NumericBounds {
            min,
            max,
            step: 1.0,
            default,
        }
    }
}

/// One car specification as submitted by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawInput {
    pub brand: Brand,
    pub fueltype: FuelType,
    pub aspiration: Aspiration,
    pub doornumber: DoorNumber,
    pub carbody: CarBody,
    pub drivewheel: DriveWheel,
    pub enginelocation: EngineLocation,
    pub enginesize: f64,
    pub horsepower: f64,
    pub citympg: f64,
    pub highwaympg: f64,
}

impl Default for RawInput {
    fn default() -> Self {
        Self {
            brand: Brand::Mercedes,
            fueltype: FuelType::Gas,
            aspiration: Aspiration::Turbo,
            doornumber: DoorNumber::Four,
            carbody: CarBody::Convertible,
            drivewheel: DriveWheel::FourWd,
            enginelocation: EngineLocation::Front,
            enginesize: NumericField::EngineSize.bounds().default,
            horsepower: NumericField::Horsepower.bounds().default,
            citympg: NumericField::CityMpg.bounds().default,
            highwaympg: NumericField::HighwayMpg.bounds().default,
        }
    }
}

impl RawInput {
    /// Value of a numeric field
    pub fn numeric(&self, field: NumericField) -> f64 {
        match field {
            NumericField::EngineSize => self.enginesize,
            NumericField::Horsepower => self.horsepower,
            NumericField::CityMpg => self.citympg,
            NumericField::HighwayMpg => self.highwaympg,
        }
    }

    /// One-hot column selected by each categorical field
    pub fn selected_columns(&self) -> [String; 7] {
        [
            self.brand.column(),
            self.fueltype.column(),
            self.aspiration.column(),
            self.doornumber.column(),
            self.carbody.column(),
            self.drivewheel.column(),
            self.enginelocation.column(),
        ]
    }
}

fn level_columns<C: Categorical>() -> impl Iterator<Item = String> {
    C::LEVELS.iter().map(|level| level.column())
}

/// Every column some `RawInput` can produce: numeric fields first, then
/// each categorical level.
pub fn producible_columns() -> Vec<String> {
    NumericField::ALL
        .iter()
        .map(|field| field.name().to_string())
        .chain(level_columns::<Brand>())
        .chain(level_columns::<FuelType>())
        .chain(level_columns::<Aspiration>())
        .chain(level_columns::<DoorNumber>())
        .chain(level_columns::<CarBody>())
        .chain(level_columns::<DriveWheel>())
        .chain(level_columns::<EngineLocation>())
        .collect()
}

/// Description of one input field for building constrained form widgets
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldDescriptor {
    Categorical {
        name: &'static str,
        levels: Vec<&'static str>,
        default: &'static str,
    },
    Numeric {
        name: &'static str,
        #[serde(flatten)]
        bounds: NumericBounds,
    },
}

fn categorical_descriptor<C: Categorical>(default: C) -> FieldDescriptor {
    FieldDescriptor::Categorical {
        name: C::FIELD,
        levels: C::LEVELS.iter().map(|level| level.level()).collect(),
        default: default.level(),
    }
}

/// Descriptors for every field of `RawInput`, defaults taken from
/// `RawInput::default()`
pub fn field_descriptors() -> Vec<FieldDescriptor> {
    let defaults = RawInput::default();
    let mut fields = vec![
        categorical_descriptor(defaults.brand),
        categorical_descriptor(defaults.fueltype),
        categorical_descriptor(defaults.aspiration),
        categorical_descriptor(defaults.doornumber),
        categorical_descriptor(defaults.carbody),
        categorical_descriptor(defaults.drivewheel),
        categorical_descriptor(defaults.enginelocation),
    ];
    fields.extend(NumericField::ALL.iter().map(|field| FieldDescriptor::Numeric {
        name: field.name(),
        bounds: field.bounds(),
    }));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_normalizes_case() {
        assert_eq!(" Toyota ".parse::<Brand>().unwrap(), Brand::Toyota);
        assert_eq!("4WD".parse::<DriveWheel>().unwrap(), DriveWheel::FourWd);
    }

    #[test]
    fn test_parse_unknown_level() {
        let err = "tesla".parse::<Brand>().unwrap_err();
        assert_eq!(err.field, "brand");
        assert_eq!(err.value, "tesla");
        assert_eq!(err.expected.len(), 15);
        assert!(err.to_string().contains("unknown brand level 'tesla'"));
    }

    #[test]
    fn test_column_naming() {
        assert_eq!(Brand::Toyota.column(), "brand_toyota");
        assert_eq!(DriveWheel::FourWd.column(), "drivewheel_4wd");
        assert_eq!(EngineLocation::Rear.column(), "enginelocation_rear");
    }

    #[test]
    fn test_deserialize_rejects_unknown_literal() {
        let json = r#"{
            "brand": "tesla", "fueltype": "gas", "aspiration": "std",
            "doornumber": "four", "carbody": "sedan", "drivewheel": "fwd",
            "enginelocation": "front", "enginesize": 150, "horsepower": 100,
            "citympg": 15, "highwaympg": 20
        }"#;
        let err = serde_json::from_str::<RawInput>(json).unwrap_err();
        assert!(err.to_string().contains("unknown brand level"));
    }

    #[test]
    fn test_serde_uses_level_literals() {
        let input = RawInput::default();
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["brand"], "mercedes");
        assert_eq!(json["drivewheel"], "4wd");
        let back: RawInput = serde_json::from_value(json).unwrap();
        assert_eq!(back, input);
    }

    #[test]
    fn test_producible_columns() {
        let columns = producible_columns();
        // 4 numeric + 15 + 2 + 2 + 2 + 5 + 3 + 2 levels
        assert_eq!(columns.len(), 35);
        assert_eq!(&columns[..4], ["enginesize", "horsepower", "citympg", "highwaympg"]);
        assert!(columns.contains(&"carbody_hardtop".to_string()));
    }

    #[test]
    fn test_field_descriptors_follow_defaults() {
        let fields = field_descriptors();
        assert_eq!(fields.len(), 11);
        match &fields[0] {
            FieldDescriptor::Categorical { name, default, .. } => {
                assert_eq!(*name, "brand");
                assert_eq!(*default, "mercedes");
            }
            other => panic!("unexpected descriptor {:?}", other),
        }
        let json = serde_json::to_value(&fields[7]).unwrap();
        assert_eq!(json["kind"], "numeric");
        assert_eq!(json["name"], "enginesize");
        assert_eq!(json["max"], 600.0);
    }
}
