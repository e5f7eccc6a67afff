// SPDX-License-Identifier: GPL-3.0-or-later
use ndarray::{Array2, ArrayView1};
use serde::Deserialize;
use tracing::{debug, instrument, trace};

use crate::frame::{
    InterpolatedFrame, RawFrame, INTERPOLATED_COLS, INTERPOLATED_ROWS, SENSOR_COLS, SENSOR_ROWS,
};

/// Interpolation kernels available for enlarging a sensor frame.
#[derive(Copy, Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Method {
    /// Linear interpolation along each axis (bilinear overall).
    #[serde(alias = "triangle", alias = "bilinear")]
    Linear,

    /// Catmull-Rom (aka bicubic) interpolation.
    #[serde(alias = "bicubic")]
    CatmullRom,
}

impl Default for Method {
    fn default() -> Self {
        Self::CatmullRom
    }
}

impl Method {
    /// The weights for the four samples around a point, `t` of the way from the second sample to
    /// the third.
    fn weights(self, t: f32) -> [f32; 4] {
        match self {
            Self::Linear => [0.0, 1.0 - t, t, 0.0],
            Self::CatmullRom => {
                let t2 = t * t;
                let t3 = t2 * t;
                [
                    0.5 * (-t3 + 2.0 * t2 - t),
                    0.5 * (3.0 * t3 - 5.0 * t2 + 2.0),
                    0.5 * (-3.0 * t3 + 4.0 * t2 + t),
                    0.5 * (t3 - t2),
                ]
            }
        }
    }

    /// The largest amount an enlarged frame can exceed the range of its 4x4 source
    /// neighborhood, as a fraction of that range.
    ///
    /// The negative lobes of the Catmull-Rom kernel sum to at most 1/8 along one axis. Applied
    /// along both axes the absolute weights sum to at most (5/4)^2, leaving 9/32 of negative
    /// weight.
    pub(crate) fn max_overshoot(self) -> f32 {
        match self {
            Self::Linear => 0.0,
            Self::CatmullRom => 9.0 / 32.0,
        }
    }
}

/// The source samples and weights contributing to a single output sample.
#[derive(Clone, Debug, PartialEq)]
struct Taps {
    indices: [usize; 4],
    weights: [f32; 4],
}

impl Taps {
    /// Taps for every output position when resampling `source_len` samples to `output_len`.
    ///
    /// The first and last samples of the output line up with the first and last source samples,
    /// and neighbors past either end repeat the edge sample.
    fn for_axis(method: Method, source_len: usize, output_len: usize) -> Vec<Self> {
        let last_source = source_len as isize - 1;
        (0..output_len)
            .map(|output_index| {
                // Dividing last keeps the end points exact.
                let position =
                    (output_index * (source_len - 1)) as f32 / (output_len - 1) as f32;
                let base = (position.floor() as isize).min(last_source);
                let t = position - base as f32;
                let mut indices = [0usize; 4];
                for (offset, index) in indices.iter_mut().enumerate() {
                    *index = (base + offset as isize - 1).clamp(0, last_source) as usize;
                }
                Self {
                    indices,
                    weights: method.weights(t),
                }
            })
            .collect()
    }

    /// Apply these taps to a line of samples.
    ///
    /// This is computed as offsets from the sample at the interpolated position, so that a line
    /// of identical samples produces that exact value again.
    fn apply(&self, line: ArrayView1<'_, f32>) -> f32 {
        let anchor = line[self.indices[1]];
        let offset: f32 = self
            .indices
            .iter()
            .zip(self.weights.iter())
            .enumerate()
            .filter(|(tap, _)| *tap != 1)
            .map(|(_, (index, weight))| weight * (line[*index] - anchor))
            .sum();
        anchor + offset
    }
}

/// Enlarges 8x8 sensor frames to 24x24 using a separable kernel.
#[derive(Clone, Debug)]
pub(crate) struct Interpolator {
    method: Method,
    column_taps: Vec<Taps>,
    row_taps: Vec<Taps>,
}

impl Interpolator {
    pub(crate) fn new(method: Method) -> Self {
        debug!(
            ?method,
            max_overshoot = method.max_overshoot(),
            "creating interpolator"
        );
        Self {
            method,
            column_taps: Taps::for_axis(method, SENSOR_COLS, INTERPOLATED_COLS),
            row_taps: Taps::for_axis(method, SENSOR_ROWS, INTERPOLATED_ROWS),
        }
    }

    /// Enlarge a raw frame.
    ///
    /// Rows are interpolated first, giving an 8x24 intermediate, then the columns of that are
    /// interpolated to give the final 24x24 frame.
    #[instrument(level = "trace", skip(self, raw))]
    pub(crate) fn interpolate(&self, raw: &RawFrame) -> InterpolatedFrame {
        let source = raw.view();
        let widened = Array2::from_shape_fn((SENSOR_ROWS, INTERPOLATED_COLS), |(row, col)| {
            self.column_taps[col].apply(source.row(row))
        });
        let enlarged =
            Array2::from_shape_fn((INTERPOLATED_ROWS, INTERPOLATED_COLS), |(row, col)| {
                self.row_taps[row].apply(widened.column(col))
            });
        trace!(method = ?self.method, "enlarged frame");
        InterpolatedFrame::new(enlarged)
    }
}

impl Default for Interpolator {
    fn default() -> Self {
        Self::new(Method::default())
    }
}
