// SPDX-License-Identifier: GPL-3.0-or-later
use crate::error::Error;

use super::color::Color;

/// A position within a [`ColorTable`].
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct ColorIndex(usize);

impl ColorIndex {
    pub(crate) fn get(self) -> usize {
        self.0
    }
}

/// An ordered palette of display colors, coldest first.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ColorTable {
    colors: Vec<Color>,
}

impl ColorTable {
    /// Palette size used when none is configured.
    pub(crate) const DEFAULT_SIZE: usize = 256;

    pub(crate) fn new(colors: Vec<Color>) -> Result<Self, Error> {
        if colors.is_empty() {
            Err(Error::EmptyColorTable)
        } else {
            Ok(Self { colors })
        }
    }

    /// Sample `size` evenly spaced colors from a gradient, including both ends.
    pub(crate) fn from_gradient(gradient: colorous::Gradient, size: usize) -> Result<Self, Error> {
        let last = size.saturating_sub(1).max(1) as f64;
        let colors = (0..size)
            .map(|n| Color::from(gradient.eval_continuous(n as f64 / last)))
            .collect();
        Self::new(colors)
    }

    pub(crate) fn len(&self) -> usize {
        self.colors.len()
    }

    pub(crate) fn get(&self, index: ColorIndex) -> Option<Color> {
        self.colors.get(index.0).copied()
    }

    /// The index for a position between 0.0 (coldest) and 1.0 (hottest).
    ///
    /// Positions are clamped into that range, and rounded to the nearest entry (halfway
    /// positions round up). NaN maps to the first entry.
    pub(crate) fn index_at(&self, position: f32) -> ColorIndex {
        let position = position.max(0.0).min(1.0);
        let last = (self.colors.len() - 1) as f32;
        // The float to int cast saturates, but position is already in range.
        ColorIndex((position * last).round() as usize)
    }

    /// The index halfway along the table.
    pub(crate) fn midpoint(&self) -> ColorIndex {
        self.index_at(0.5)
    }
}
