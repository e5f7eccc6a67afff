// SPDX-License-Identifier: GPL-3.0-or-later
use structopt::StructOpt;

use std::path::PathBuf;

use crate::render::Profile;

#[derive(Debug, StructOpt)]
#[structopt(about = "Capture, enlarge, and colorize frames from a GridEYE thermal camera.")]
pub(crate) struct Args {
    /// Path to a configuration file.
    #[structopt(short, long, parse(from_os_str), default_value = "config.toml")]
    pub(crate) config_path: PathBuf,

    /// Color range profile to use instead of the one in the configuration file ("ambient" or
    /// "elevated").
    #[structopt(short, long)]
    pub(crate) profile: Option<Profile>,

    /// Log debugging messages (unless overridden by RUST_LOG).
    #[structopt(short, long)]
    pub(crate) verbose: bool,
}
