use crate::config::AppConfig;
use color_eyre::eyre::{eyre, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Where log lines go for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    File,
    Stderr,
    Discard,
}

/// A configured log file always wins; otherwise headless runs log to stderr
/// and the interactive UI discards logs so they cannot corrupt the screen.
pub const fn log_target(config: &AppConfig, headless: bool) -> LogTarget {
    if config.log_file.is_some() {
        LogTarget::File
    } else if headless {
        LogTarget::Stderr
    } else {
        LogTarget::Discard
    }
}

/// `RUST_LOG` when set, else `info` (`debug` for this crate in debug mode).
pub fn env_filter(debug: bool) -> EnvFilter {
    let fallback = if debug {
        "info,marketing_dashboard=debug"
    } else {
        "info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

pub fn init_logging(config: &AppConfig, headless: bool) -> Result<()> {
    let target = log_target(config, headless);
    let writer = match (target, &config.log_file) {
        (LogTarget::File, Some(path)) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| eyre!("failed to open log file {}: {e}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        (LogTarget::Stderr, _) => BoxMakeWriter::new(std::io::stderr),
        _ => BoxMakeWriter::new(std::io::sink),
    };

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(target == LogTarget::Stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(layer)
        .with(env_filter(config.debug))
        .try_init()
        .map_err(|e| eyre!("failed to initialise logging: {e}"))?;

    tracing::info!(?target, debug = config.debug, "logging initialised");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn log_file_takes_precedence() {
        let mut config = AppConfig::default();
        assert_eq!(log_target(&config, false), LogTarget::Discard);
        assert_eq!(log_target(&config, true), LogTarget::Stderr);

        config.log_file = Some(PathBuf::from("dashboard.log"));
        assert_eq!(log_target(&config, false), LogTarget::File);
        assert_eq!(log_target(&config, true), LogTarget::File);
    }

    #[test]
    fn file_logging_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.log");
        let config = AppConfig {
            log_file: Some(path.clone()),
            ..AppConfig::default()
        };

        // Another test may already own the global subscriber.
        let _ = init_logging(&config, false);
        assert!(path.exists());
    }
}
