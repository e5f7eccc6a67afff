// SPDX-License-Identifier: GPL-3.0-or-later
//! Turning raw sensor frames into colored images: interpolation, color mapping, and output.
mod color;
mod color_map;
mod interpolate;
mod palette;
mod settings;
mod sink;

pub(crate) use color_map::{ColorMapper, Profile};
pub(crate) use interpolate::Interpolator;
pub(crate) use palette::{ColorIndex, ColorTable};
pub(crate) use settings::{OutputSettings, RenderSettings};
pub(crate) use sink::FrameSink;
