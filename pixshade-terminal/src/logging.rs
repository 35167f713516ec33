//! Logger setup that keeps records off the animated view
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Once;

/// Level used when neither `--log` nor `RUST_LOG` is set
const DEFAULT_FILTER: &str = "warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "warn",
/// "pixshade_core=debug,pixshade_terminal=info").
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    /// Append records to this file instead of stderr
    pub log_file: Option<PathBuf>,
    /// The animated view owns the terminal; stderr output would tear the frame
    pub fullscreen: bool,
}

/// Where log records end up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    /// Fullscreen without a log file: nothing is written
    Discard,
}

impl LoggingConfig {
    pub fn target(&self) -> LogTarget {
        match (&self.log_file, self.fullscreen) {
            (Some(path), _) => LogTarget::File(path.clone()),
            (None, true) => LogTarget::Discard,
            (None, false) => LogTarget::Stderr,
        }
    }

    /// Filter directives: the configured filter, then `rust_log`, then warnings only
    pub fn filter_spec(&self, rust_log: Option<String>) -> String {
        self.env_filter
            .clone()
            .or(rust_log)
            .unwrap_or_else(|| DEFAULT_FILTER.to_string())
    }

    fn builder(&self) -> io::Result<env_logger::Builder> {
        let mut builder = env_logger::Builder::new();

        match self.target() {
            LogTarget::Discard => {
                builder.filter_level(log::LevelFilter::Off);
            }
            LogTarget::Stderr => {
                builder.parse_filters(&self.filter_spec(std::env::var("RUST_LOG").ok()));
                builder.target(env_logger::Target::Stderr);
            }
            LogTarget::File(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                builder.parse_filters(&self.filter_spec(std::env::var("RUST_LOG").ok()));
                builder.target(env_logger::Target::Pipe(Box::new(file)));
                builder.write_style(env_logger::WriteStyle::Never);
            }
        }

        Ok(builder)
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
///
/// Fails only when the log file cannot be opened.
pub fn init_logging(config: LoggingConfig) -> io::Result<()> {
    let mut result = Ok(());
    INIT.call_once(|| {
        result = config.builder().map(|mut builder| {
            builder.init();
            log::debug!("logging initialized ({:?})", config.target());
        });
    });
    result
}
