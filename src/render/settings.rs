// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::PathBuf;

use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::error::Error;
use crate::settings::gradient;
use crate::temperature::{Temperature, TemperatureUnit};

use super::color_map::{ColorRange, Profile};
use super::interpolate::Method;
use super::palette::ColorTable;

fn default_colors() -> colorous::Gradient {
    colorous::TURBO
}

fn default_table_size() -> usize {
    ColorTable::DEFAULT_SIZE
}

fn default_scale() -> u32 {
    10
}

/// The largest image scale accepted, giving a 2400x2400 image.
const MAX_SCALE: u32 = 100;

fn deserialize_scale<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let scale = u32::deserialize(deserializer)?;
    if (1..=MAX_SCALE).contains(&scale) {
        Ok(scale)
    } else {
        Err(de::Error::invalid_value(
            de::Unexpected::Unsigned(scale.into()),
            &"an image scale from 1 to 100",
        ))
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub(crate) struct RenderSettings {
    /// The named color range to use. Defaults to the ambient range.
    #[serde(default)]
    pub(crate) profile: Profile,

    /// Overrides the lower bound of the profile's range.
    #[serde(default)]
    pub(crate) lower_limit: Option<Temperature>,

    /// Overrides the upper bound of the profile's range.
    #[serde(default)]
    pub(crate) upper_limit: Option<Temperature>,

    #[serde(default = "default_colors", deserialize_with = "gradient::deserialize")]
    pub(crate) colors: colorous::Gradient,

    /// The number of entries in the color table.
    #[serde(default = "default_table_size")]
    pub(crate) table_size: usize,

    #[serde(default)]
    pub(crate) scaling_method: Method,
}

impl RenderSettings {
    /// The color range from the profile, with any explicit limits applied.
    ///
    /// Limits are always converted to Celsius, as that's what the sensor reports.
    pub(crate) fn color_range(&self) -> Result<ColorRange, Error> {
        let preset = self.profile.range();
        let in_celsius = |limit: Option<Temperature>, fallback: f32| {
            limit.map_or(fallback, |t| t.in_unit(TemperatureUnit::Celsius))
        };
        ColorRange::new(
            in_celsius(self.lower_limit, preset.min()),
            in_celsius(self.upper_limit, preset.max()),
        )
    }

    pub(crate) fn color_table(&self) -> Result<ColorTable, Error> {
        ColorTable::from_gradient(self.colors, self.table_size)
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            lower_limit: None,
            upper_limit: None,
            colors: default_colors(),
            table_size: default_table_size(),
            scaling_method: Method::default(),
        }
    }
}

/// Where colorized frames are sent.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub(crate) enum OutputSettings {
    /// Only log a summary of each frame.
    Log,

    /// Write each frame to an image file, with each interpolated cell `scale` pixels wide.
    Image {
        path: PathBuf,

        #[serde(default = "default_scale", deserialize_with = "deserialize_scale")]
        scale: u32,
    },
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self::Log
    }
}

#[cfg(test)]
mod test {
    use float_cmp::approx_eq;

    use super::{OutputSettings, RenderSettings};
    use crate::error::Error;
    use crate::render::color_map::{ColorRange, Profile};
    use crate::render::interpolate::Method;
    use crate::temperature::Temperature;

    fn parse(source: &str) -> RenderSettings {
        let parsed: Result<RenderSettings, _> = toml::from_str(source);
        assert!(
            parsed.is_ok(),
            "Failed to parse render settings: {}",
            parsed.unwrap_err()
        );
        parsed.unwrap()
    }

    #[test]
    fn defaults() {
        let parsed = parse("");
        let expected = RenderSettings::default();
        assert_eq!(parsed.profile, expected.profile);
        assert_eq!(parsed.lower_limit, None);
        assert_eq!(parsed.upper_limit, None);
        assert_eq!(parsed.table_size, 256);
        assert_eq!(parsed.scaling_method, Method::CatmullRom);
        assert_eq!(
            format!("{:?}", parsed.colors),
            format!("{:?}", colorous::TURBO)
        );
        assert_eq!(parsed.color_range(), Ok(ColorRange::AMBIENT));
    }

    #[test]
    fn elevated_profile() {
        let parsed = parse("profile = \"elevated\"");
        assert_eq!(parsed.profile, Profile::Elevated);
        assert_eq!(parsed.color_range(), Ok(ColorRange::ELEVATED));
    }

    #[test]
    fn custom_limits() {
        let parsed = parse(
            r#"
            lower_limit = 15
            upper_limit = 35.5
            "#,
        );
        assert_eq!(parsed.lower_limit, Some(Temperature::Celsius(15.0)));
        assert_eq!(parsed.color_range(), ColorRange::new(15.0, 35.5));
    }

    #[test]
    fn fahrenheit_limit() {
        let parsed = parse(
            r#"
            profile = "elevated"
            upper_limit = { fahrenheit = 104 }
            "#,
        );
        let range = parsed.color_range().unwrap();
        assert_eq!(range.min(), 28.0);
        assert!(approx_eq!(f32, range.max(), 40.0, epsilon = 1e-4));
    }

    #[test]
    fn inverted_limits() {
        let parsed = parse("lower_limit = 30");
        assert_eq!(
            parsed.color_range(),
            Err(Error::InvalidRange {
                min: 30.0,
                max: 28.0
            })
        );
    }

    #[test]
    fn table() {
        let parsed = parse(
            r#"
            colors = "greys"
            table_size = 64
            scaling_method = "linear"
            "#,
        );
        assert_eq!(parsed.color_table().unwrap().len(), 64);
        assert_eq!(parsed.scaling_method, Method::Linear);
        let parsed = parse("table_size = 0");
        assert_eq!(parsed.color_table(), Err(Error::EmptyColorTable));
    }

    #[test]
    fn bad_gradient() {
        let parsed: Result<RenderSettings, _> = toml::from_str("colors = \"plaid\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn output_default() {
        #[derive(Debug, serde::Deserialize)]
        struct Wrapper {
            #[serde(default)]
            output: OutputSettings,
        }
        let parsed: Wrapper = toml::from_str("").unwrap();
        assert_eq!(parsed.output, OutputSettings::Log);
    }

    #[test]
    fn output_image() {
        let parsed: OutputSettings = toml::from_str(
            r#"
            kind = "image"
            path = "/tmp/frame.png"
            "#,
        )
        .unwrap();
        assert_eq!(
            parsed,
            OutputSettings::Image {
                path: "/tmp/frame.png".into(),
                scale: 10
            }
        );
    }

    #[test]
    fn output_scale_bounds() {
        let with_scale = |scale: &str| {
            toml::from_str::<OutputSettings>(&format!(
                "kind = \"image\"\npath = \"frame.png\"\nscale = {}",
                scale
            ))
        };
        assert!(with_scale("1").is_ok());
        assert!(with_scale("100").is_ok());
        for scale in &["0", "101", "200000000", "-3"] {
            assert!(with_scale(*scale).is_err(), "Accepted a scale of {}", scale);
        }
    }
}
