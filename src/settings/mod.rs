// SPDX-License-Identifier: GPL-3.0-or-later
use std::fs;
use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;
use tracing::debug;

mod cli;
pub(crate) mod gradient;

use crate::camera::CameraSettings;
use crate::render::{OutputSettings, RenderSettings};
pub(crate) use cli::Args;

#[derive(Debug, Deserialize)]
pub(crate) struct Settings {
    /// Camera-specific settings.
    pub(crate) camera: CameraSettings,

    /// How frames are enlarged and colored.
    #[serde(default)]
    pub(crate) render: RenderSettings,

    /// Where colored frames are sent.
    #[serde(default)]
    pub(crate) output: OutputSettings,
}

impl Settings {
    pub(crate) fn from_path(path: &Path) -> anyhow::Result<Self> {
        debug!(path = %path.display(), "loading settings");
        let data = fs::read_to_string(path)
            .with_context(|| format!("Unable to read settings from {}", path.display()))?;
        toml::from_str(&data)
            .with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// Apply any overrides given on the command line.
    pub(crate) fn with_args(mut self, args: &Args) -> Self {
        if let Some(profile) = args.profile {
            debug!(?profile, "overriding color profile from the command line");
            self.render.profile = profile;
        }
        self
    }
}
