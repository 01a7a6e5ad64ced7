use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LoggingConfig, ResolvedOutputs};

/// Per-decision candidate dumps from `AgentSession`, all at DEBUG.
pub const DECISION_TARGET: &str = "hearts_strategy::decision";
/// Moon commitments and aborts (INFO) plus detector hits (DEBUG).
pub const MOON_TARGET: &str = "hearts_strategy::moon";

/// Keeps the background writer alive; dropping it flushes pending events.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub telemetry_path: PathBuf,
}

/// Filter directives for the configured level and strategy targets.
///
/// Decision traces are off unless requested, even at a DEBUG base level,
/// because they add one event per card played.
pub fn filter_directives(logging: &LoggingConfig) -> String {
    let base = logging.level().unwrap_or(Level::INFO);
    let decision = if logging.decision_traces { "debug" } else { "off" };
    let moon = if logging.moon_events { "debug" } else { "warn" };
    format!(
        "{},{DECISION_TARGET}={decision},{MOON_TARGET}={moon}",
        base.as_str().to_ascii_lowercase()
    )
}

/// `RUST_LOG` replaces the configured directives wholesale when set.
pub fn build_filter(logging: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directives = filter_directives(logging);
    EnvFilter::try_new(&directives)
        .with_context(|| format!("parsing tracing directives '{directives}'"))
}

fn open_telemetry(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating telemetry directory at {}", dir.display()))?;
    }
    File::create(path).with_context(|| format!("creating telemetry file at {}", path.display()))
}

/// Streams the strategy's tracing events to `telemetry.jsonl` beside the game
/// rows, one JSON object per line. Returns `None` when structured logging is
/// disabled.
pub fn init_logging(
    logging: &LoggingConfig,
    outputs: &ResolvedOutputs,
) -> Result<Option<LoggingGuard>> {
    if !logging.enable_structured {
        return Ok(None);
    }

    let filter = build_filter(logging)?;
    let file = open_telemetry(&outputs.telemetry)?;
    // Lossless: a full channel blocks the game loop instead of dropping events.
    let (writer, guard) = NonBlockingBuilder::default().lossy(false).finish(file);

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .json()
        .flatten_event(true)
        .with_target(true)
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer)
        .finish();

    // A global subscriber may already be installed, e.g. by another test.
    let _ = tracing::subscriber::set_global_default(subscriber);

    Ok(Some(LoggingGuard {
        _guard: guard,
        telemetry_path: outputs.telemetry.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logging(level: &str, decision_traces: bool, moon_events: bool) -> LoggingConfig {
        LoggingConfig {
            enable_structured: true,
            tracing_level: level.to_string(),
            decision_traces,
            moon_events,
        }
    }

    #[test]
    fn defaults_keep_moon_events_and_silence_decisions() {
        assert_eq!(
            filter_directives(&LoggingConfig::default()),
            "info,hearts_strategy::decision=off,hearts_strategy::moon=debug"
        );
    }

    #[test]
    fn flags_select_strategy_targets() {
        assert_eq!(
            filter_directives(&logging("warn", true, false)),
            "warn,hearts_strategy::decision=debug,hearts_strategy::moon=warn"
        );
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        let directives = filter_directives(&logging("chatty", false, true));
        assert!(directives.starts_with("info,"));
        assert!(EnvFilter::try_new(&directives).is_ok());
    }

    #[test]
    fn disabled_logging_creates_nothing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let outputs = ResolvedOutputs {
            jsonl: dir.path().join("games.jsonl"),
            telemetry: dir.path().join("nested").join("telemetry.jsonl"),
        };
        let config = LoggingConfig::default();
        assert!(init_logging(&config, &outputs).expect("init").is_none());
        assert!(!outputs.telemetry.exists());
    }

    #[test]
    fn telemetry_file_is_created_with_its_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("run").join("telemetry.jsonl");
        open_telemetry(&path).expect("open");
        assert!(path.is_file());
    }
}
