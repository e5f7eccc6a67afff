// SPDX-License-Identifier: GPL-3.0-or-later
use anyhow::Context as _;
use futures::FutureExt as _;
use structopt::StructOpt as _;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod camera;
mod capture;
mod error;
mod frame;
mod frame_buffer;
mod render;
mod settings;
mod temperature;
mod util;

use crate::capture::{Capture, CaptureLoop};
use crate::render::FrameSink;
use crate::settings::{Args, Settings};
use crate::util::flatten_join_result;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::from_args();
    init_logging(args.verbose);
    let settings = Settings::from_path(&args.config_path)?.with_args(&args);
    info!(
        profile = ?settings.render.profile,
        scaling_method = ?settings.render.scaling_method,
        "loaded settings"
    );

    let capture = Capture::from_settings(&settings.render, settings.camera.orientation())
        .context("Invalid render settings")?;
    let camera = settings.camera.create_camera()?;
    let sink = <Box<dyn FrameSink + Send>>::from(&settings.output);
    let (capture_loop, handle) =
        CaptureLoop::new(camera, capture, sink, settings.camera.frame_rate());

    let mut capture_task = tokio::task::spawn_blocking(move || capture_loop.run())
        .map(flatten_join_result)
        .boxed();
    tokio::select! {
        result = &mut capture_task => {
            if let Err(err) = &result {
                error!("capture failed: {:?}", err);
            }
            return result;
        }
        signal_result = signal::ctrl_c() => {
            signal_result.context("Unable to listen for shutdown signal")?;
            info!("shutting down");
        }
    }
    handle.shutdown();
    capture_task.await
}
