// SPDX-License-Identifier: GPL-3.0-or-later
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, instrument, trace};

use crate::error::Error;
use crate::frame::{IndexFrame, InterpolatedFrame};

use super::palette::{ColorIndex, ColorTable};

/// The temperatures mapped to the coldest and hottest ends of a color table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ColorRange {
    min: f32,
    max: f32,
}

impl ColorRange {
    /// Room temperature scenes.
    pub(crate) const AMBIENT: Self = Self {
        min: 20.0,
        max: 28.0,
    };

    /// Warmer scenes, like people or pets close to the sensor.
    pub(crate) const ELEVATED: Self = Self {
        min: 28.0,
        max: 40.0,
    };

    /// Create a new range. `min` and `max` may be equal, but `min` may not be above `max`.
    pub(crate) fn new(min: f32, max: f32) -> Result<Self, Error> {
        if min.is_finite() && max.is_finite() && min <= max {
            Ok(Self { min, max })
        } else {
            Err(Error::InvalidRange { min, max })
        }
    }

    pub(crate) fn min(&self) -> f32 {
        self.min
    }

    pub(crate) fn max(&self) -> f32 {
        self.max
    }

    /// A zero-width range, where every temperature maps to the same color.
    pub(crate) fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Where a temperature falls in this range, from 0.0 to 1.0.
    ///
    /// Temperatures outside of the range are clamped to it, and NaN is treated as the minimum.
    /// Degenerate ranges put everything in the middle.
    pub(crate) fn position(&self, temperature: f32) -> f32 {
        if self.is_degenerate() {
            return 0.5;
        }
        let clamped = temperature.max(self.min).min(self.max);
        (clamped - self.min) / (self.max - self.min)
    }
}

impl fmt::Display for ColorRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Named color range presets.
#[derive(Clone, Copy, Debug, Deserialize, Hash, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Profile {
    Ambient,
    Elevated,
}

impl Default for Profile {
    fn default() -> Self {
        Self::Ambient
    }
}

impl Profile {
    pub(crate) fn range(self) -> ColorRange {
        match self {
            Self::Ambient => ColorRange::AMBIENT,
            Self::Elevated => ColorRange::ELEVATED,
        }
    }
}

impl FromStr for Profile {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &s.to_ascii_lowercase() as &str {
            "ambient" => Ok(Self::Ambient),
            "elevated" => Ok(Self::Elevated),
            _ => Err("unknown color profile, expected 'ambient' or 'elevated'"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Mapping {
    range: ColorRange,
    table: ColorTable,
}

impl Mapping {
    fn index(&self, temperature: f32) -> ColorIndex {
        if self.range.is_degenerate() {
            self.table.midpoint()
        } else {
            self.table.index_at(self.range.position(temperature))
        }
    }
}

/// Maps temperatures to entries in a color table.
///
/// A new mapper is unconfigured, and refuses to map anything until [`ColorMapper::configure`] is
/// called. It can be reconfigured at any time after that.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ColorMapper {
    mapping: Option<Mapping>,
}

impl ColorMapper {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn configure(&mut self, range: ColorRange, table: ColorTable) {
        debug!(%range, table_size = table.len(), "configuring color mapping");
        self.mapping = Some(Mapping { range, table });
    }

    pub(crate) fn is_configured(&self) -> bool {
        self.mapping.is_some()
    }

    pub(crate) fn range(&self) -> Option<ColorRange> {
        self.mapping.as_ref().map(|mapping| mapping.range)
    }

    pub(crate) fn table(&self) -> Option<&ColorTable> {
        self.mapping.as_ref().map(|mapping| &mapping.table)
    }

    fn mapping(&self) -> Result<&Mapping, Error> {
        self.mapping.as_ref().ok_or(Error::NotConfigured)
    }

    /// Find the color table entry for a temperature.
    pub(crate) fn map_to_color(&self, temperature: f32) -> Result<ColorIndex, Error> {
        self.mapping().map(|mapping| mapping.index(temperature))
    }

    /// Map every temperature in a frame to a color table entry.
    #[instrument(level = "trace", skip(self, frame))]
    pub(crate) fn map_frame(&self, frame: &InterpolatedFrame) -> Result<IndexFrame, Error> {
        let mapping = self.mapping()?;
        let indices = frame
            .view()
            .map(|temperature| mapping.index(*temperature));
        trace!("mapped temperatures to colors");
        Ok(IndexFrame::new(indices))
    }
}
