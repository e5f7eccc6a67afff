// SPDX-License-Identifier: GPL-3.0-or-later
use ndarray::{Array2, ArrayView2};

use crate::error::Error;
use crate::render::ColorIndex;

/// Number of rows in the GridEYE sensor array.
pub(crate) const SENSOR_ROWS: usize = 8;
/// Number of columns in the GridEYE sensor array.
pub(crate) const SENSOR_COLS: usize = 8;
pub(crate) const SENSOR_PIXELS: usize = SENSOR_ROWS * SENSOR_COLS;

/// Number of rows in an upsampled frame.
pub(crate) const INTERPOLATED_ROWS: usize = 24;
/// Number of columns in an upsampled frame.
pub(crate) const INTERPOLATED_COLS: usize = 24;

/// One generation of readings straight from the sensor, in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RawFrame {
    cells: Array2<f32>,
}

impl RawFrame {
    /// Build a frame from a row-major sequence of [`SENSOR_PIXELS`] readings.
    #[cfg(test)]
    pub(crate) fn from_readings(readings: &[f32]) -> Result<Self, Error> {
        let mut frame = Self::zeroed();
        frame.overwrite(readings)?;
        Ok(frame)
    }

    pub(crate) fn zeroed() -> Self {
        Self {
            cells: Array2::zeros((SENSOR_ROWS, SENSOR_COLS)),
        }
    }

    /// Replace every reading in place. Nothing is written unless the length is correct.
    pub(crate) fn overwrite(&mut self, readings: &[f32]) -> Result<(), Error> {
        check_length(readings.len())?;
        self.cells
            .iter_mut()
            .zip(readings)
            .for_each(|(cell, reading)| *cell = *reading);
        Ok(())
    }

    pub(crate) fn view(&self) -> ArrayView2<'_, f32> {
        self.cells.view()
    }

    /// Rearrange the readings with a view transformation (flips, transposes).
    ///
    /// The sensor grid is square, so any such transform keeps the frame 8x8.
    pub(crate) fn reoriented<F>(&self, transform: F) -> Self
    where
        F: for<'a> FnOnce(ArrayView2<'a, f32>) -> ArrayView2<'a, f32>,
    {
        let cells = transform(self.cells.view()).to_owned();
        debug_assert_eq!(cells.dim(), (SENSOR_ROWS, SENSOR_COLS));
        Self { cells }
    }
}

fn check_length(actual: usize) -> Result<(), Error> {
    if actual == SENSOR_PIXELS {
        Ok(())
    } else {
        Err(Error::InvalidInput {
            expected: SENSOR_PIXELS,
            actual,
        })
    }
}

/// The upsampled temperatures derived from a [`RawFrame`].
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct InterpolatedFrame {
    cells: Array2<f32>,
}

impl InterpolatedFrame {
    pub(crate) fn new(cells: Array2<f32>) -> Self {
        debug_assert_eq!(cells.dim(), (INTERPOLATED_ROWS, INTERPOLATED_COLS));
        Self { cells }
    }

    pub(crate) fn view(&self) -> ArrayView2<'_, f32> {
        self.cells.view()
    }
}

/// A frame of palette indices, ready to hand to a display.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct IndexFrame {
    cells: Array2<ColorIndex>,
}

impl IndexFrame {
    pub(crate) fn new(cells: Array2<ColorIndex>) -> Self {
        Self { cells }
    }

    pub(crate) fn view(&self) -> ArrayView2<'_, ColorIndex> {
        self.cells.view()
    }

    pub(crate) fn dim(&self) -> (usize, usize) {
        self.cells.dim()
    }
}
