//! pixshade - animated per-pixel scenes in the terminal
//!
//! Controls:
//!   - Space: Pause / resume
//!   - N / Tab, 1-3: Switch scene
//!   - Left / Right: Scrub time
//!   - R: Restart the clock
//!   - Q/ESC: Quit

use anyhow::{Context, Result};
use clap::Parser;
use pixshade_terminal::logging::{init_logging, LoggingConfig};
use pixshade_terminal::{print_once, AppConfig, Cli, TerminalApp};
use std::io::stdout;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        log_file: cli.log_file.clone(),
        fullscreen: !cli.once,
    })
    .context("failed to open log file")?;

    let config = AppConfig::from_cli(&cli)?;
    log::info!(
        "scene={} scale={} fps={} divide={:?}",
        config.scene,
        config.scale,
        config.fps,
        config.divide
    );

    if cli.once {
        return print_once(&config, &mut stdout().lock()).context("failed to print frame");
    }

    let mut app = TerminalApp::new(config).context("failed to query terminal size")?;
    app.run().context("terminal renderer failed")?;

    Ok(())
}
