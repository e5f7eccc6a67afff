// SPDX-License-Identifier: GPL-3.0-or-later
use std::convert::TryFrom;
use std::path::PathBuf;

use anyhow::Context as _;
use linux_embedded_hal::I2cdev;
use ndarray::{s, ArrayView2};
use serde::de::{Deserialize, Deserializer, Error};
use serde_repr::Deserialize_repr;
use tracing::debug;

use super::i2c::{self, Bus};
use super::mock_camera::MockCamera;
use super::thermal_camera::{GridEye, ThermalCamera};

// This enum is purely used to restrict the acceptable values for rotation.
#[derive(Clone, Copy, Deserialize_repr, PartialEq, Debug)]
#[repr(u16)]
pub(crate) enum Rotation {
    Zero = 0,
    Ninety = 90,
    OneEighty = 180,
    TwoSeventy = 270,
}

impl Default for Rotation {
    fn default() -> Self {
        Self::Zero
    }
}

/// How a frame needs to be turned so that it matches how the camera is mounted.
///
/// Flips are applied before the rotation, and rotations are clockwise.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Orientation {
    pub(crate) rotation: Rotation,
    pub(crate) flip_horizontal: bool,
    pub(crate) flip_vertical: bool,
}

impl Orientation {
    pub(crate) fn is_identity(&self) -> bool {
        self.rotation == Rotation::Zero && !self.flip_horizontal && !self.flip_vertical
    }

    /// Re-orient a view of a frame. Only the strides of the view are changed, nothing is copied.
    pub(crate) fn apply<'a>(&self, view: ArrayView2<'a, f32>) -> ArrayView2<'a, f32> {
        let mut view = view;
        if self.flip_horizontal {
            view = view.slice_move(s![.., ..;-1]);
        }
        if self.flip_vertical {
            view = view.slice_move(s![..;-1, ..]);
        }
        match self.rotation {
            Rotation::Zero => view,
            Rotation::Ninety => view.reversed_axes().slice_move(s![.., ..;-1]),
            Rotation::OneEighty => view.slice_move(s![..;-1, ..;-1]),
            Rotation::TwoSeventy => view.reversed_axes().slice_move(s![..;-1, ..]),
        }
    }
}

fn deserialize_grideye_address<'de, D>(deserializer: D) -> Result<amg88::Address, D::Error>
where
    D: Deserializer<'de>,
{
    let address = i2c::deserialize_address(deserializer)?;
    amg88::Address::try_from(address).map_err(D::Error::custom)
}

fn default_grideye_frame_rate() -> amg88::FrameRateValue {
    amg88::FrameRateValue::Fps10
}

fn deserialize_grideye_frame_rate<'de, D>(
    deserializer: D,
) -> Result<amg88::FrameRateValue, D::Error>
where
    D: Deserializer<'de>,
{
    // amg88 also converts the raw register values, so 0 would otherwise be read as 10 FPS.
    match u8::deserialize(deserializer)? {
        1 => Ok(amg88::FrameRateValue::Fps1),
        10 => Ok(amg88::FrameRateValue::Fps10),
        other => Err(D::Error::custom(format!(
            "GridEYE frame rate must be 1 or 10, not {}",
            other
        ))),
    }
}

fn default_mock_frame_rate() -> u8 {
    1
}

fn deserialize_mock_frame_rate<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    match u8::deserialize(deserializer)? {
        0 => Err(D::Error::custom("frame rate must be at least 1")),
        frame_rate => Ok(frame_rate),
    }
}

/// The kind of camera, along with the settings specific to that kind.
#[derive(Clone, Debug, serde::Deserialize, PartialEq)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub(crate) enum CameraKind {
    GridEye {
        bus: Bus,

        #[serde(deserialize_with = "deserialize_grideye_address")]
        address: amg88::Address,

        #[serde(
            default = "default_grideye_frame_rate",
            deserialize_with = "deserialize_grideye_frame_rate"
        )]
        frame_rate: amg88::FrameRateValue,
    },
    /// Replay frames from a recording instead of using real hardware.
    Mock {
        path: PathBuf,

        #[serde(
            default = "default_mock_frame_rate",
            deserialize_with = "deserialize_mock_frame_rate"
        )]
        frame_rate: u8,
    },
}

#[derive(Clone, Debug, serde::Deserialize, PartialEq)]
pub(crate) struct CameraSettings {
    #[serde(flatten)]
    pub(crate) kind: CameraKind,

    #[serde(default)]
    pub(crate) rotation: Rotation,

    #[serde(default)]
    pub(crate) flip_horizontal: bool,

    #[serde(default)]
    pub(crate) flip_vertical: bool,
}

impl CameraSettings {
    pub(crate) fn orientation(&self) -> Orientation {
        Orientation {
            rotation: self.rotation,
            flip_horizontal: self.flip_horizontal,
            flip_vertical: self.flip_vertical,
        }
    }

    /// Frames per second the camera is read at.
    pub(crate) fn frame_rate(&self) -> u8 {
        match &self.kind {
            CameraKind::GridEye {
                frame_rate: amg88::FrameRateValue::Fps1,
                ..
            } => 1,
            CameraKind::GridEye {
                frame_rate: amg88::FrameRateValue::Fps10,
                ..
            } => 10,
            CameraKind::Mock { frame_rate, .. } => *frame_rate,
        }
    }

    pub(crate) fn create_camera(&self) -> anyhow::Result<Box<dyn ThermalCamera + Send>> {
        let mut camera: Box<dyn ThermalCamera + Send> = match &self.kind {
            CameraKind::GridEye { bus, address, .. } => {
                debug!(bus = %bus.device_path().display(), ?address, "opening GridEYE");
                let bus = I2cdev::try_from(bus).context("Unable to connect to I2C bus")?;
                Box::new(GridEye::new(bus, *address))
            }
            CameraKind::Mock { path, .. } => Box::new(MockCamera::from_path(path)?),
        };
        camera.set_frame_rate(self.frame_rate())?;
        Ok(camera)
    }
}

#[cfg(test)]
mod test {
    use ndarray::{arr2, Array2};

    use super::{Bus, CameraKind, CameraSettings, Orientation, Rotation};

    fn parse(source: &str) -> Result<CameraSettings, toml::de::Error> {
        toml::from_str(source)
    }

    #[test]
    fn grideye_minimal() {
        let parsed = parse("kind = \"grideye\"\nbus = 1\naddress = 0x69");
        assert!(parsed.is_ok(), "Unable to parse TOML: {:?}", parsed);
        let parsed = parsed.unwrap();
        assert_eq!(
            parsed.kind,
            CameraKind::GridEye {
                bus: Bus::Number(1),
                address: amg88::Address::High,
                frame_rate: amg88::FrameRateValue::Fps10,
            }
        );
        assert!(parsed.orientation().is_identity());
        assert_eq!(parsed.frame_rate(), 10);
    }

    #[test]
    fn grideye_full() {
        let parsed = parse(
            r#"
            kind = "grideye"
            bus = "/dev/i2c-3"
            address = "0x68"
            frame_rate = 1
            rotation = 270
            flip_vertical = true
            "#,
        );
        assert!(parsed.is_ok(), "Unable to parse TOML: {:?}", parsed);
        let parsed = parsed.unwrap();
        assert_eq!(
            parsed.kind,
            CameraKind::GridEye {
                bus: Bus::Path("/dev/i2c-3".to_string()),
                address: amg88::Address::Low,
                frame_rate: amg88::FrameRateValue::Fps1,
            }
        );
        assert_eq!(parsed.rotation, Rotation::TwoSeventy);
        assert!(parsed.flip_vertical);
        assert!(!parsed.flip_horizontal);
        assert_eq!(parsed.frame_rate(), 1);
    }

    #[test]
    fn grideye_frame_rates() {
        let with_rate = |rate: &str| {
            parse(&format!(
                "kind = \"grideye\"\nbus = 1\naddress = 0x69\nframe_rate = {}",
                rate
            ))
        };
        assert_eq!(with_rate("1").ok().map(|s| s.frame_rate()), Some(1));
        assert_eq!(with_rate("10").ok().map(|s| s.frame_rate()), Some(10));
        // 0 is the register value for 10 FPS, but not a frame rate.
        for rate in &["0", "2", "-1", "256"] {
            assert!(with_rate(*rate).is_err(), "Accepted a frame rate of {}", rate);
        }
    }

    #[test]
    fn mock() {
        let parsed = parse("kind = \"mock\"\npath = \"recording.toml\"\nframe_rate = 4");
        assert!(parsed.is_ok(), "Unable to parse TOML: {:?}", parsed);
        let parsed = parsed.unwrap();
        assert_eq!(
            parsed.kind,
            CameraKind::Mock {
                path: "recording.toml".into(),
                frame_rate: 4,
            }
        );
        assert_eq!(parsed.frame_rate(), 4);
    }

    #[test]
    fn invalid_values() {
        let sources = [
            // Not one of the two GridEYE addresses
            "kind = \"grideye\"\nbus = 1\naddress = 30",
            "kind = \"grideye\"\nbus = 1\naddress = 0x69\nframe_rate = 0",
            "kind = \"grideye\"\nbus = 1\naddress = 0x69\nframe_rate = 7",
            "kind = \"grideye\"\nbus = 1\naddress = 0x69\nrotation = 100",
            "kind = \"mock\"\npath = \"recording.toml\"\nframe_rate = 0",
            "kind = \"NotARealCamera\"\nbus = 1\naddress = 0x69",
        ];
        for source in &sources {
            assert!(parse(source).is_err(), "Accepted invalid settings:\n{}", source);
        }
    }

    #[test]
    fn missing_keys() {
        let lines = ["kind = \"grideye\"", "bus = 1", "address = 0x69"];
        for skipped in 0..lines.len() {
            let source = lines
                .iter()
                .enumerate()
                .filter(|(n, _)| *n != skipped)
                .map(|(_, line)| *line)
                .collect::<Vec<_>>()
                .join("\n");
            assert!(
                parse(&source).is_err(),
                "Did not detect missing key from:\n{}",
                source
            );
        }
    }

    // 0 1 2
    // 3 4 5
    fn wide() -> Array2<f32> {
        arr2(&[[0.0, 1.0, 2.0], [3.0, 4.0, 5.0]])
    }

    fn oriented(orientation: Orientation) -> Array2<f32> {
        let source = wide();
        orientation.apply(source.view()).to_owned()
    }

    #[test]
    fn identity() {
        assert_eq!(oriented(Orientation::default()), wide());
    }

    #[test]
    fn flips() {
        let horizontal = Orientation {
            flip_horizontal: true,
            ..Orientation::default()
        };
        assert_eq!(
            oriented(horizontal),
            arr2(&[[2.0, 1.0, 0.0], [5.0, 4.0, 3.0]])
        );
        let vertical = Orientation {
            flip_vertical: true,
            ..Orientation::default()
        };
        assert_eq!(oriented(vertical), arr2(&[[3.0, 4.0, 5.0], [0.0, 1.0, 2.0]]));
    }

    #[test]
    fn rotations() {
        let rotate = |rotation| Orientation {
            rotation,
            ..Orientation::default()
        };
        assert_eq!(
            oriented(rotate(Rotation::Ninety)),
            arr2(&[[3.0, 0.0], [4.0, 1.0], [5.0, 2.0]])
        );
        assert_eq!(
            oriented(rotate(Rotation::OneEighty)),
            arr2(&[[5.0, 4.0, 3.0], [2.0, 1.0, 0.0]])
        );
        assert_eq!(
            oriented(rotate(Rotation::TwoSeventy)),
            arr2(&[[2.0, 5.0], [1.0, 4.0], [0.0, 3.0]])
        );
    }

    #[test]
    fn flip_then_rotate() {
        let orientation = Orientation {
            rotation: Rotation::Ninety,
            flip_horizontal: true,
            flip_vertical: false,
        };
        // Flipped: 2 1 0 / 5 4 3, then rotated clockwise.
        assert_eq!(
            oriented(orientation),
            arr2(&[[5.0, 2.0], [4.0, 1.0], [3.0, 0.0]])
        );
    }
}
