// SPDX-License-Identifier: GPL-3.0-or-later
use std::error::Error as StdError;
use std::fmt;

/// Errors raised by the capture pipeline itself.
///
/// Application plumbing (settings, camera access, file output) uses [`anyhow::Error`] instead;
/// these variants are the ones a caller of the pipeline is expected to match on.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Error {
    /// A frame was supplied with the wrong number of readings.
    ///
    /// The previous frame is left untouched, so the caller can skip the cycle.
    InvalidInput { expected: usize, actual: usize },

    /// Color mapping was requested before a range and table were configured.
    NotConfigured,

    /// A color range with a lower bound above its upper bound, or a non-finite bound.
    InvalidRange { min: f32, max: f32 },

    /// A color table needs at least one entry.
    EmptyColorTable,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { expected, actual } => write!(
                f,
                "expected {} temperature readings, but {} were given",
                expected, actual
            ),
            Self::NotConfigured => f.write_str("color mapping has not been configured"),
            Self::InvalidRange { min, max } => {
                write!(f, "invalid color range from {} to {}", min, max)
            }
            Self::EmptyColorTable => f.write_str("a color table needs at least one color"),
        }
    }
}

impl StdError for Error {}
