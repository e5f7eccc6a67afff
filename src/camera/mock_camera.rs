// SPDX-License-Identifier: GPL-3.0-or-later
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context as _};
use serde::Deserialize;
use tracing::{debug, trace};

use super::thermal_camera::ThermalCamera;
use crate::temperature::Temperature;

/// One recorded frame.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub(crate) struct RecordedFrame {
    /// Temperatures in degrees Celsius, row-major.
    values: Vec<f32>,

    /// The temperature of the camera itself when this frame was taken.
    #[serde(default = "default_thermistor")]
    thermistor: Temperature,
}

fn default_thermistor() -> Temperature {
    Temperature::Celsius(25.0)
}

#[derive(Debug, Deserialize)]
struct Recording {
    frames: Vec<RecordedFrame>,
}

/// A camera that plays back a recording, looping back to the start once it reaches the end.
#[derive(Debug)]
pub(crate) struct MockCamera {
    frames: Vec<RecordedFrame>,
    next: usize,
    frame_rate: u8,
}

impl MockCamera {
    pub(crate) fn new(frames: Vec<RecordedFrame>) -> anyhow::Result<Self> {
        if frames.is_empty() {
            return Err(anyhow!("A recording needs at least one frame"));
        }
        Ok(Self {
            frames,
            next: 0,
            frame_rate: 1,
        })
    }

    /// Load a recording from a TOML file with a `[[frames]]` table for every frame.
    pub(crate) fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("Unable to read recording from {}", path.display()))?;
        let recording: Recording = toml::from_str(&data)
            .with_context(|| format!("Invalid recording in {}", path.display()))?;
        debug!(path = %path.display(), frames = recording.frames.len(), "loaded recording");
        Self::new(recording.frames)
    }

    fn current(&self) -> &RecordedFrame {
        &self.frames[self.next]
    }
}

impl ThermalCamera for MockCamera {
    fn temperature(&mut self) -> anyhow::Result<Temperature> {
        Ok(self.current().thermistor)
    }

    fn thermal_image(&mut self) -> anyhow::Result<Vec<f32>> {
        let values = self.current().values.clone();
        trace!(
            frame = self.next,
            frame_rate = self.frame_rate,
            "replaying recorded frame"
        );
        self.next = (self.next + 1) % self.frames.len();
        Ok(values)
    }

    fn set_frame_rate(&mut self, frame_rate: u8) -> anyhow::Result<()> {
        // Playback is paced by the capture loop.
        self.frame_rate = frame_rate;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::{MockCamera, RecordedFrame};
    use crate::camera::ThermalCamera;
    use crate::temperature::Temperature;

    fn frame(value: f32) -> RecordedFrame {
        RecordedFrame {
            values: vec![value; 64],
            thermistor: Temperature::Celsius(value),
        }
    }

    #[test]
    fn empty_recording() {
        assert!(MockCamera::new(Vec::new()).is_err());
    }

    #[test]
    fn loops() {
        let mut camera = MockCamera::new(vec![frame(20.0), frame(30.0)]).unwrap();
        assert_eq!(camera.temperature().unwrap(), Temperature::Celsius(20.0));
        assert_eq!(camera.thermal_image().unwrap(), vec![20.0; 64]);
        assert_eq!(camera.temperature().unwrap(), Temperature::Celsius(30.0));
        assert_eq!(camera.thermal_image().unwrap(), vec![30.0; 64]);
        assert_eq!(camera.thermal_image().unwrap(), vec![20.0; 64]);
    }

    #[test]
    fn from_file() {
        let mut file = NamedTempFile::new().expect("to be able to create a temp file");
        write!(
            file,
            r#"
            [[frames]]
            values = [1.0, 2.0, 3.0]
            thermistor = {{ fahrenheit = 77.0 }}

            [[frames]]
            values = [4.0, 5.0]
            "#
        )
        .expect("to be able to write to a new temp file");
        let camera = MockCamera::from_path(file.path());
        assert!(camera.is_ok(), "{:?}", camera.unwrap_err());
        let mut camera = camera.unwrap();
        assert_eq!(camera.temperature().unwrap(), Temperature::Fahrenheit(77.0));
        assert_eq!(camera.thermal_image().unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(camera.temperature().unwrap(), Temperature::Celsius(25.0));
        // Frames may be recorded with the wrong number of values; the frame buffer rejects them.
        assert_eq!(camera.thermal_image().unwrap(), vec![4.0, 5.0]);
    }

    #[test]
    fn demo_recording() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/recording.toml");
        let mut camera = MockCamera::from_path(path).unwrap();
        assert_eq!(camera.frames.len(), 4);
        for _ in 0..camera.frames.len() {
            assert_eq!(camera.thermal_image().unwrap().len(), 64);
        }
    }

    #[test]
    fn missing_file() {
        assert!(MockCamera::from_path("/not/a/real/recording.toml").is_err());
    }
}
