// SPDX-License-Identifier: GPL-3.0-or-later
use std::convert::TryFrom;
use std::error::Error as StdError;
use std::fmt;

use anyhow::Context as _;
use embedded_hal::blocking::i2c;
use ndarray::{s, ArrayView2};
use tracing::trace;

use crate::temperature::Temperature;

/// The operations a thermal camera needs to provide for the capture loop.
pub(crate) trait ThermalCamera: fmt::Debug {
    /// Get the temperature of the camera itself.
    fn temperature(&mut self) -> anyhow::Result<Temperature>;

    /// Read one frame of temperatures, in row-major order with the top row first.
    fn thermal_image(&mut self) -> anyhow::Result<Vec<f32>>;

    fn set_frame_rate(&mut self, frame_rate: u8) -> anyhow::Result<()>;
}

/// Flatten a grid whose first row is the bottom of the scene into top-down, row-major order.
fn bottom_up_to_raster(grid: ArrayView2<'_, f32>) -> Vec<f32> {
    // Iteration follows the logical order of the view, whatever the memory layout is.
    grid.slice(s![..;-1, ..]).iter().copied().collect()
}

/// A Panasonic GridEYE (AMG88xx) on an I2C bus.
pub(crate) struct GridEye<I2C> {
    camera: amg88::GridEye<I2C>,
}

impl<I2C: i2c::WriteRead> GridEye<I2C> {
    pub(crate) fn new(bus: I2C, address: amg88::Address) -> Self {
        Self {
            camera: amg88::GridEye::new(bus, address),
        }
    }
}

// amg88::GridEye doesn't implement Debug
impl<I2C> fmt::Debug for GridEye<I2C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridEye").finish()
    }
}

impl<I2C> ThermalCamera for GridEye<I2C>
where
    I2C: i2c::WriteRead,
    <I2C as i2c::WriteRead>::Error: 'static + StdError + Sync + Send,
{
    fn temperature(&mut self) -> anyhow::Result<Temperature> {
        self.camera
            .thermistor()
            .context("Error retrieving temperature from camera")
            .map(Temperature::Celsius)
    }

    fn thermal_image(&mut self) -> anyhow::Result<Vec<f32>> {
        let grid = self
            .camera
            .image()
            .context("Error retrieving thermal image from camera")?;
        trace!(dimensions = ?grid.dim(), "read GridEYE image");
        // The GridEYE reports its rows with the Y-axis pointing up.
        Ok(bottom_up_to_raster(grid.view()))
    }

    fn set_frame_rate(&mut self, frame_rate: u8) -> anyhow::Result<()> {
        let grideye_frame_rate =
            amg88::FrameRateValue::try_from(frame_rate).context("Invalid frame rate")?;
        self.camera
            .set_frame_rate(grideye_frame_rate)
            .context("Error setting camera frame rate")
    }
}

#[cfg(test)]
mod test {
    use ndarray::arr2;

    use super::bottom_up_to_raster;

    #[test]
    fn rows_are_reversed() {
        let grid = arr2(&[[0.0, 1.0], [2.0, 3.0], [4.0, 5.0]]);
        assert_eq!(
            bottom_up_to_raster(grid.view()),
            vec![4.0, 5.0, 2.0, 3.0, 0.0, 1.0]
        );
    }

    #[test]
    fn column_major_layout() {
        let grid = arr2(&[[0.0, 1.0], [2.0, 3.0]]).reversed_axes();
        // Logically [[0, 2], [1, 3]], even though the memory is laid out the other way.
        assert_eq!(bottom_up_to_raster(grid.view()), vec![1.0, 3.0, 0.0, 2.0]);
    }
}
