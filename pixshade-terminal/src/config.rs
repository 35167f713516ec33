//! Command line and resolved application settings
use anyhow::{bail, Context, Result};
use clap::Parser;
use nalgebra::Vector2;
use pixshade_core::{HomogeneousDivide, ProjectionScene, SceneKind, Shader};
use std::path::PathBuf;
use std::time::Duration;

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f32 = 2.0;

#[derive(Parser, Debug)]
#[command(name = "pixshade")]
#[command(version, about = "Animate per-pixel scenes as coloured ASCII in the terminal")]
pub struct Cli {
    /// Scene to render: glow, shadow or projection
    #[arg(short, long, default_value = "glow")]
    pub scene: SceneKind,

    /// Scene pixels covered by one terminal column
    #[arg(long, default_value_t = 10.0)]
    pub scale: f32,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Divide projected points by W (the projection scene skips the divide by default)
    #[arg(long)]
    pub perspective_divide: bool,

    /// Draw only the projection markers, without the cube
    #[arg(long)]
    pub no_cube: bool,

    /// Print a single frame and exit
    #[arg(long)]
    pub once: bool,

    /// Scene time in seconds to start at
    #[arg(short, long, default_value_t = 0.0)]
    pub time: f32,

    /// Output size as COLUMNSxROWS (defaults to the terminal size)
    #[arg(long, value_parser = parse_size)]
    pub size: Option<(u16, u16)>,

    /// Log filter, e.g. "debug" (falls back to RUST_LOG)
    #[arg(long)]
    pub log: Option<String>,

    /// Append log records to this file (the animated view logs nothing otherwise)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

fn parse_size(value: &str) -> Result<(u16, u16)> {
    let (columns, rows) = value
        .split_once(|c| c == 'x' || c == 'X')
        .with_context(|| format!("expected COLUMNSxROWS, got '{}'", value))?;
    let columns: u16 = columns.trim().parse().context("invalid column count")?;
    let rows: u16 = rows.trim().parse().context("invalid row count")?;
    if columns == 0 || rows == 0 {
        bail!("size must be at least 1x1");
    }
    Ok((columns, rows))
}

/// Settings the terminal host runs with
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub scene: SceneKind,
    pub scale: f32,
    pub fps: u32,
    pub divide: HomogeneousDivide,
    pub cube: bool,
    pub start_time: f32,
    pub size: Option<(u16, u16)>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scene: SceneKind::Glow,
            scale: 10.0,
            fps: 30,
            divide: HomogeneousDivide::Discard,
            cube: true,
            start_time: 0.0,
            size: None,
        }
    }
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        if !(cli.scale.is_finite() && cli.scale > 0.0) {
            bail!("--scale must be a positive number, got {}", cli.scale);
        }
        if !(1..=240).contains(&cli.fps) {
            bail!("--fps must be between 1 and 240, got {}", cli.fps);
        }
        if !cli.time.is_finite() {
            bail!("--time must be finite");
        }

        Ok(Self {
            scene: cli.scene,
            scale: cli.scale,
            fps: cli.fps,
            divide: if cli.perspective_divide {
                HomogeneousDivide::Perspective
            } else {
                HomogeneousDivide::Discard
            },
            cube: !cli.no_cube,
            start_time: cli.time,
            size: cli.size,
        })
    }

    /// Scene resolution in pixels for a grid of terminal cells
    pub fn resolution(&self, columns: usize, rows: usize) -> Vector2<f32> {
        Vector2::new(
            columns as f32 * self.scale,
            rows as f32 * self.scale * CELL_ASPECT,
        )
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps as f64)
    }

    /// Build `kind` with the projection settings of this config applied
    pub fn build_scene(&self, kind: SceneKind) -> Box<dyn Shader> {
        match kind {
            SceneKind::Projection => {
                let defaults = ProjectionScene::default();
                Box::new(ProjectionScene {
                    divide: self.divide,
                    cube: if self.cube { defaults.cube } else { None },
                    ..defaults
                })
            }
            other => other.build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["pixshade"]).unwrap();
        let config = AppConfig::from_cli(&cli).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_cli_projection_flags() {
        let cli = Cli::try_parse_from([
            "pixshade",
            "--scene",
            "projection",
            "--perspective-divide",
            "--no-cube",
            "--size",
            "120x40",
            "--once",
        ])
        .unwrap();
        assert!(cli.once);
        let config = AppConfig::from_cli(&cli).unwrap();
        assert_eq!(config.scene, SceneKind::Projection);
        assert_eq!(config.divide, HomogeneousDivide::Perspective);
        assert!(!config.cube);
        assert_eq!(config.size, Some((120, 40)));
    }

    #[test]
    fn test_cli_log_flags() {
        let cli = Cli::try_parse_from(["pixshade", "--log", "debug", "--log-file", "run.log"]).unwrap();
        assert_eq!(cli.log.as_deref(), Some("debug"));
        assert_eq!(cli.log_file, Some(PathBuf::from("run.log")));
    }

    #[test]
    fn test_cli_rejects_unknown_scene() {
        assert!(Cli::try_parse_from(["pixshade", "--scene", "plasma"]).is_err());
    }

    #[test]
    fn test_cli_rejects_bad_size() {
        assert!(Cli::try_parse_from(["pixshade", "--size", "80"]).is_err());
        assert!(Cli::try_parse_from(["pixshade", "--size", "0x10"]).is_err());
    }

    #[test]
    fn test_config_rejects_bad_scale() {
        let cli = Cli::try_parse_from(["pixshade", "--scale", "0"]).unwrap();
        assert!(AppConfig::from_cli(&cli).is_err());
    }

    #[test]
    fn test_resolution_accounts_for_cell_aspect() {
        let config = AppConfig {
            scale: 4.0,
            ..AppConfig::default()
        };
        assert_eq!(config.resolution(80, 24), Vector2::new(320.0, 192.0));
    }
}
