// SPDX-License-Identifier: GPL-3.0-or-later
use std::fmt;

use serde::Deserialize;

#[derive(Clone, Copy, Debug, Deserialize, Hash, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(match self {
            TemperatureUnit::Celsius => "C",
            TemperatureUnit::Fahrenheit => "F",
        })
    }
}

/// A temperature with its unit attached.
///
/// When deserializing, either a bare number (taken as Celsius) or a single entry map of unit to
/// value (`{ fahrenheit = 98.6 }`) is accepted.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(from = "DeserializedTemperature")]
pub(crate) enum Temperature {
    Celsius(f32),
    Fahrenheit(f32),
}

impl Temperature {
    pub(crate) fn unit(&self) -> TemperatureUnit {
        match self {
            Self::Celsius(_) => TemperatureUnit::Celsius,
            Self::Fahrenheit(_) => TemperatureUnit::Fahrenheit,
        }
    }

    /// The value of this temperature expressed in the given unit.
    pub(crate) fn in_unit(&self, unit: TemperatureUnit) -> f32 {
        match (self, unit) {
            (Self::Celsius(c), TemperatureUnit::Celsius) => *c,
            (Self::Fahrenheit(f), TemperatureUnit::Fahrenheit) => *f,
            (Self::Celsius(c), TemperatureUnit::Fahrenheit) => c * 1.8 + 32.0,
            (Self::Fahrenheit(f), TemperatureUnit::Celsius) => (f - 32.0) / 1.8,
        }
    }
}

impl fmt::Display for Temperature {
    /// Format the temperature like a plain number. With the alternate flag (`#`) the degree
    /// symbol and unit are appended, without a space.
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.in_unit(self.unit()), fmt)?;
        if fmt.alternate() {
            write!(fmt, "°{}", self.unit())?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(untagged)]
enum DeserializedTemperature {
    Number(f32),
    Wrapped(WrappedTemperature),
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum WrappedTemperature {
    #[serde(alias = "c", alias = "C")]
    Celsius(f32),

    #[serde(alias = "f", alias = "F")]
    Fahrenheit(f32),
}

impl From<DeserializedTemperature> for Temperature {
    fn from(deserialized: DeserializedTemperature) -> Self {
        match deserialized {
            DeserializedTemperature::Number(c) => Self::Celsius(c),
            DeserializedTemperature::Wrapped(WrappedTemperature::Celsius(c)) => Self::Celsius(c),
            DeserializedTemperature::Wrapped(WrappedTemperature::Fahrenheit(f)) => {
                Self::Fahrenheit(f)
            }
        }
    }
}
