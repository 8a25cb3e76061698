//! Stderr logging for the analyzers and the CLI.
//!
//! Two backends are available:
//! - [`init_with_level`] installs a `log` logger that prints
//!   `[elapsed LEVEL target] message` lines,
//! - [`init_tracing`] (feature `tracing`) installs a `tracing-subscriber`
//!   formatter, plain or JSON, filtered by `RUST_LOG`.
//!
//! Either one may be installed once per process; later calls are no-ops.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

impl StderrLogger {
    /// Strip the crate path down to its last segment (`brandcheck_geometry::checker` -> `checker`).
    fn short_target<'a>(&self, target: &'a str) -> &'a str {
        target.rsplit("::").next().unwrap_or(target)
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:7.3}s {:>5} {}] {}",
            elapsed,
            record.level(),
            self.short_target(record.target()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger with the provided level filter.
///
/// Only the first call installs a logger. It fails if another `log`
/// implementation was registered first.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| StderrLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Install a `tracing` subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `default_level`. `log` records are
/// forwarded into the subscriber, so analyzer messages appear in both modes.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool, default_level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string().to_lowercase()));
    if json {
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .flatten_event(true)
            .finish()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_no_op() {
        assert!(init_with_level(LevelFilter::Warn).is_ok());
        assert!(init_with_level(LevelFilter::Trace).is_ok());
        assert_eq!(log::max_level(), LevelFilter::Warn);
    }

    #[test]
    fn target_is_shortened() {
        let logger = StderrLogger {
            level: LevelFilter::Info,
            started: Instant::now(),
        };
        assert_eq!(logger.short_target("brandcheck_color::kmeans"), "kmeans");
        assert_eq!(logger.short_target("brandcheck"), "brandcheck");
    }
}
