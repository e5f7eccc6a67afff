// SPDX-License-Identifier: GPL-3.0-or-later
mod i2c;
mod mock_camera;
mod settings;
mod thermal_camera;

pub(crate) use settings::{CameraSettings, Orientation};
pub(crate) use thermal_camera::ThermalCamera;
