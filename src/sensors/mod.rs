//! Sensor subsystem: the thermistor model and the unit converter.
//!
//! [`convert`] is the pure mapping from a raw ADC count to a reportable
//! [`Temperature`].  It never produces NaN: samples outside the thermistor's
//! domain come back as `None` and the event loop skips that emission.

pub mod thermistor;

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use thermistor::ThermistorModel;

/// One raw reading from the ADC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSample(pub u16);

/// Reporting unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "C")]
    Celsius,
    #[default]
    #[serde(rename = "F")]
    Fahrenheit,
}

impl Unit {
    /// Single-letter selector used on the wire (`SCALE=C`) and the CLI.
    pub const fn letter(self) -> char {
        match self {
            Self::Celsius => 'C',
            Self::Fahrenheit => 'F',
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Unit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C" => Ok(Self::Celsius),
            "F" => Ok(Self::Fahrenheit),
            other => Err(ConfigError::InvalidUnit(other.to_string())),
        }
    }
}

/// A converted measurement.  Displays with one decimal place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperature {
    pub value: f64,
    pub unit: Unit,
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.value)
    }
}

/// Standard linear transform.
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Convert with the reference thermistor.  `None` means the sample is
/// outside the defined domain and must not be reported.
pub fn convert(raw: RawSample, unit: Unit) -> Option<Temperature> {
    convert_with(&ThermistorModel::GROVE_V1_2, raw, unit)
}

/// Convert with an explicit thermistor model.
pub fn convert_with(model: &ThermistorModel, raw: RawSample, unit: Unit) -> Option<Temperature> {
    let celsius = model.celsius(raw.0)?;
    let value = match unit {
        Unit::Celsius => celsius,
        Unit::Fahrenheit => celsius_to_fahrenheit(celsius),
    };
    Some(Temperature { value, unit })
}
