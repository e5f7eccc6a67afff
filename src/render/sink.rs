// SPDX-License-Identifier: GPL-3.0-or-later
use std::convert::TryFrom;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context as _};
use image::RgbImage;
use tracing::{debug, info};

use crate::frame::IndexFrame;

use super::color::Color;
use super::palette::ColorTable;
use super::settings::OutputSettings;

/// Something that consumes colorized frames, usually a display of some sort.
pub(crate) trait FrameSink: fmt::Debug {
    fn present(&mut self, frame: &IndexFrame, table: &ColorTable) -> anyhow::Result<()>;
}

impl From<&OutputSettings> for Box<dyn FrameSink + Send> {
    fn from(settings: &OutputSettings) -> Self {
        match settings {
            OutputSettings::Log => Box::new(LogSink::default()),
            OutputSettings::Image { path, scale } => Box::new(ImageSink::new(path, *scale)),
        }
    }
}

/// Look up the color for every cell, scaling each cell up to a `scale` pixel square.
pub(crate) fn colorize(
    frame: &IndexFrame,
    table: &ColorTable,
    scale: u32,
) -> anyhow::Result<RgbImage> {
    let view = frame.view();
    let colors = view
        .iter()
        .map(|index| {
            table
                .get(*index)
                .ok_or_else(|| anyhow!("color index {} outside of palette", index.get()))
        })
        .collect::<anyhow::Result<Vec<Color>>>()?;
    let (rows, cols) = frame.dim();
    let scale = scale.max(1);
    let scaled = |cells: usize| {
        u32::try_from(cells)
            .ok()
            .and_then(|cells| cells.checked_mul(scale))
    };
    let (width, height) = scaled(cols)
        .zip(scaled(rows))
        // Three bytes per pixel have to fit in memory as well.
        .filter(|(width, height)| {
            (*width as usize)
                .checked_mul(*height as usize)
                .and_then(|pixels| pixels.checked_mul(3))
                .is_some()
        })
        .ok_or_else(|| anyhow!("a {}x{} frame is too large to scale by {}", cols, rows, scale))?;
    Ok(RgbImage::from_fn(width, height, |x, y| {
        let row = (y / scale) as usize;
        let col = (x / scale) as usize;
        colors[row * cols + col].into()
    }))
}

/// Reports a summary of each frame through the log.
#[derive(Debug, Default)]
pub(crate) struct LogSink {
    frames: u64,
}

impl FrameSink for LogSink {
    fn present(&mut self, frame: &IndexFrame, table: &ColorTable) -> anyhow::Result<()> {
        self.frames += 1;
        let view = frame.view();
        let hottest = view.iter().max().copied().unwrap_or_default();
        let coldest = view.iter().min().copied().unwrap_or_default();
        let hottest_color = table.get(hottest).unwrap_or_default();
        info!(
            frame = self.frames,
            coldest = coldest.get(),
            hottest = hottest.get(),
            hottest_color = %format!("{:x}", hottest_color),
            "captured frame"
        );
        Ok(())
    }
}

/// Writes the most recent frame to an image file, replacing it each time.
///
/// The format is chosen from the file extension.
#[derive(Debug)]
pub(crate) struct ImageSink {
    path: PathBuf,
    scale: u32,
}

impl ImageSink {
    pub(crate) fn new<P: AsRef<Path>>(path: P, scale: u32) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            scale,
        }
    }
}

impl FrameSink for ImageSink {
    fn present(&mut self, frame: &IndexFrame, table: &ColorTable) -> anyhow::Result<()> {
        let image = colorize(frame, table, self.scale)?;
        image
            .save(&self.path)
            .with_context(|| format!("Unable to write frame to {}", self.path.display()))?;
        debug!(path = %self.path.display(), "wrote frame image");
        Ok(())
    }
}
