//! Inferno - headless simulation session: loads a level and catalog, then flies a scripted player through it.

mod catalog;
mod config;
mod level_file;
mod script;
mod session;

use anyhow::Result;
use config::GameConfig;
use session::Session;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GameConfig::load();
    log::info!(
        "Starting Inferno session: {:.1} s at {:.0} fps",
        config.session_seconds,
        config.frame_rate
    );

    let catalog = catalog::load(&config.catalog_path).or_else(|e| {
        log::warn!("{:#}; using the built-in catalog", e);
        catalog::builtin()
    })?;
    let mut session = Session::new(&config, catalog, level_file::builtin()?);
    if config.level_path.exists() {
        if let Err(e) = session.reload_level(&config.level_path) {
            log::warn!("{:#}; keeping level {:?}", e, session.level_name());
        }
    } else {
        log::info!(
            "{} not found, playing the built-in level",
            config.level_path.display()
        );
    }

    let frame_seconds = config.frame_seconds();
    let frame = Duration::from_secs_f32(frame_seconds);
    let frames = (config.session_seconds.max(0.0) / frame_seconds).ceil() as u32;
    let stall = (config.stall_seconds.is_finite() && config.stall_seconds > 0.0)
        .then(|| Duration::from_secs_f32(config.stall_seconds));

    let mut time = 0.0;
    for i in 0..frames {
        let mut delta = frame;
        if let Some(stall) = stall.filter(|_| i == frames / 2) {
            log::info!("Simulating a {:.1} s stall", stall.as_secs_f32());
            delta += stall;
        }
        session.frame(time, delta);
        time += delta.as_secs_f32();
    }

    session.finish();
    Ok(())
}
