// SPDX-License-Identifier: GPL-3.0-or-later
use std::thread;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, info, instrument, warn};

use crate::camera::{Orientation, ThermalCamera};
use crate::error::Error;
use crate::frame::IndexFrame;
use crate::frame_buffer::FrameBuffer;
use crate::render::{ColorMapper, ColorTable, FrameSink, Interpolator, RenderSettings};
use crate::temperature::TemperatureUnit;

/// One pass of the pipeline: buffer the readings, enlarge them, then map them to colors.
#[derive(Debug)]
pub(crate) struct Capture {
    buffer: FrameBuffer,
    interpolator: Interpolator,
    mapper: ColorMapper,
    orientation: Orientation,
}

impl Capture {
    pub(crate) fn new(
        interpolator: Interpolator,
        mapper: ColorMapper,
        orientation: Orientation,
    ) -> Self {
        Self {
            buffer: FrameBuffer::new(),
            interpolator,
            mapper,
            orientation,
        }
    }

    /// Build a configured pipeline from the render settings.
    pub(crate) fn from_settings(
        settings: &RenderSettings,
        orientation: Orientation,
    ) -> Result<Self, Error> {
        let mut mapper = ColorMapper::new();
        mapper.configure(settings.color_range()?, settings.color_table()?);
        Ok(Self::new(
            Interpolator::new(settings.scaling_method),
            mapper,
            orientation,
        ))
    }

    pub(crate) fn table(&self) -> Option<&ColorTable> {
        self.mapper.table()
    }

    /// Number of frames that have made it into the buffer.
    pub(crate) fn frames(&self) -> u64 {
        self.buffer.generation()
    }

    /// Run one set of readings through the pipeline.
    ///
    /// Readings of the wrong length are rejected with [`Error::InvalidInput`] before anything is
    /// changed.
    #[instrument(level = "trace", skip(self, readings))]
    pub(crate) fn cycle(&mut self, readings: &[f32]) -> Result<IndexFrame, Error> {
        if !self.mapper.is_configured() {
            return Err(Error::NotConfigured);
        }
        self.buffer.update(readings)?;
        let raw = self.buffer.read();
        let raw = if self.orientation.is_identity() {
            raw
        } else {
            let orientation = self.orientation;
            raw.reoriented(move |view| orientation.apply(view))
        };
        let enlarged = self.interpolator.interpolate(&raw);
        self.mapper.map_frame(&enlarged)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum CaptureCommand {
    Shutdown,
}

/// Used to control a running [`CaptureLoop`] from another task.
#[derive(Clone, Debug)]
pub(crate) struct CaptureHandle {
    commands: mpsc::UnboundedSender<CaptureCommand>,
}

impl CaptureHandle {
    /// Ask the loop to stop after the current frame.
    pub(crate) fn shutdown(&self) {
        // If the loop has already stopped there's nothing to do.
        let _ = self.commands.send(CaptureCommand::Shutdown);
    }
}

/// Reads frames from a camera at a fixed rate and feeds them through a [`Capture`] to a sink.
///
/// The loop blocks, so it should be run on a thread where that's acceptable (like with
/// `tokio::task::spawn_blocking`).
#[derive(Debug)]
pub(crate) struct CaptureLoop {
    camera: Box<dyn ThermalCamera + Send>,
    capture: Capture,
    sink: Box<dyn FrameSink + Send>,
    frame_delay: Duration,
    commands: mpsc::UnboundedReceiver<CaptureCommand>,
}

impl CaptureLoop {
    pub(crate) fn new(
        camera: Box<dyn ThermalCamera + Send>,
        capture: Capture,
        sink: Box<dyn FrameSink + Send>,
        frame_rate: u8,
    ) -> (Self, CaptureHandle) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let frame_delay = Duration::from_secs(1) / u32::from(frame_rate.max(1));
        debug!(?frame_delay, "creating capture loop");
        let capture_loop = Self {
            camera,
            capture,
            sink,
            frame_delay,
            commands: receiver,
        };
        (capture_loop, CaptureHandle { commands: sender })
    }

    /// Read one frame from the camera and pass it along.
    ///
    /// Returns `false` if the frame was skipped because the camera gave a malformed frame.
    pub(crate) fn step(&mut self) -> anyhow::Result<bool> {
        let readings = self.camera.thermal_image()?;
        match self.capture.cycle(&readings) {
            Ok(frame) => {
                let table = self.capture.table().ok_or(Error::NotConfigured)?;
                self.sink.present(&frame, table)?;
                Ok(true)
            }
            Err(err @ Error::InvalidInput { .. }) => {
                warn!(%err, "skipping frame");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn should_stop(&mut self) -> bool {
        match self.commands.try_recv() {
            Ok(CaptureCommand::Shutdown) => true,
            Err(TryRecvError::Disconnected) => {
                debug!("all capture handles dropped");
                true
            }
            Err(TryRecvError::Empty) => false,
        }
    }

    /// Capture frames until told to stop, or until an error occurs.
    pub(crate) fn run(mut self) -> anyhow::Result<()> {
        if let Some(range) = self.capture.mapper.range() {
            info!(%range, "mapping temperatures to colors");
        }
        match self.camera.temperature() {
            Ok(temperature) => info!(
                camera_temperature = %format!("{:#}", temperature),
                camera_color = ?self
                    .capture
                    .mapper
                    .map_to_color(temperature.in_unit(TemperatureUnit::Celsius))
                    .map(|index| index.get()),
                "starting capture"
            ),
            Err(err) => warn!(%err, "unable to read camera temperature"),
        }
        while !self.should_stop() {
            let started = Instant::now();
            self.step()?;
            if let Some(remaining) = self.frame_delay.checked_sub(started.elapsed()) {
                thread::sleep(remaining);
            }
        }
        info!(frames = self.capture.frames(), "capture stopped");
        Ok(())
    }
}
