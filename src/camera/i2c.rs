// SPDX-License-Identifier: GPL-3.0-or-later
use linux_embedded_hal::I2cdev;

use i2cdev::linux::LinuxI2CError;
use serde::de::{self, Deserializer};
use serde::Deserialize;

use std::convert::TryFrom;
use std::path::PathBuf;

use crate::util::parse_int_decimal_hex;

/// An I2C bus, either by number (`/dev/i2c-N`) or by device path.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub(crate) enum Bus {
    Number(u32),
    Path(String),
}

impl Bus {
    pub(crate) fn device_path(&self) -> PathBuf {
        match self {
            Bus::Number(n) => PathBuf::from(format!("/dev/i2c-{}", n)),
            Bus::Path(p) => PathBuf::from(p),
        }
    }
}

impl TryFrom<&Bus> for I2cdev {
    type Error = LinuxI2CError;

    fn try_from(bus: &Bus) -> Result<Self, Self::Error> {
        I2cdev::new(bus.device_path())
    }
}

/// Deserialize an I2C address given either as an integer or a decimal/hex string ("0x68").
pub(crate) fn deserialize_address<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAddress {
        Number(u8),
        Text(String),
    }

    match RawAddress::deserialize(deserializer)? {
        RawAddress::Number(address) => Ok(address),
        RawAddress::Text(text) => parse_int_decimal_hex(&text).map_err(|_| {
            de::Error::invalid_value(de::Unexpected::Str(&text), &"an I2C address")
        }),
    }
}
