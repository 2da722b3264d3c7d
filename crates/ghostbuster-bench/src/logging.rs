use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use ghostbuster_core::AppInfo;
use tracing::{Level, event};
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{BenchmarkConfig, ResolvedOutputs};

/// Keeps the background writer alive; dropping it flushes pending events.
pub struct EventLog {
    _guard: WorkerGuard,
    pub path: PathBuf,
}

/// Routes engine, bot and harness events to `outputs.events_jsonl` as JSON lines.
///
/// Returns `None` when `logging.enable_structured` is off. `RUST_LOG` overrides
/// the configured level.
pub fn init_event_log(
    config: &BenchmarkConfig,
    outputs: &ResolvedOutputs,
) -> Result<Option<EventLog>> {
    if !config.logging.enable_structured {
        return Ok(None);
    }

    let path = outputs.events_jsonl.clone();
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating event log directory {}", dir.display()))?;
    }
    let file = File::create(&path)
        .with_context(|| format!("creating event log {}", path.display()))?;

    let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file);

    let level = config.logging.level().unwrap_or(Level::INFO);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .json()
        .flatten_event(true)
        .with_target(true)
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer)
        .finish();

    // Only the first run in a process owns the global subscriber.
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        event!(
            target: "ghostbuster_bench::run",
            Level::WARN,
            path = %path.display(),
            "event subscriber already installed; log file stays empty"
        );
    }

    event!(
        target: "ghostbuster_bench::run",
        Level::INFO,
        run_id = %config.run_id,
        engine = AppInfo::name(),
        engine_version = AppInfo::version(),
        games = config.games.count,
        grid_size = config.game.grid_size,
        max_inquiries = config.games.max_inquiries,
        agents = config.agents.len(),
        "bench run started"
    );

    Ok(Some(EventLog { _guard: guard, path }))
}
