use std::io::Write;

use analyzer_core::settings::Settings;
use analyzer_data::analysis::{AnalysisOptions, AnalysisReport};
use analyzer_data::filter::DateRange;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map an upper-case level name (`DEBUG`, `WARNING`, ...) to a tracing filter directive.
///
/// Unknown names pass through lowercased so `EnvFilter` can still accept
/// directives such as `"analyzer_data=debug"`.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Output goes to stderr so `--json` output on stdout stays parseable.
/// Falls back to `"warn"` if the level string is not recognised.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()?;

    Ok(())
}

// ── Run configuration ──────────────────────────────────────────────────────────

/// Translate CLI settings into pipeline options.
pub fn analysis_options(settings: &Settings) -> AnalysisOptions {
    AnalysisOptions {
        range: DateRange::new(settings.start, settings.end),
        user_ids: settings.user_filter(),
        top_n: settings.ranking_size(),
    }
}

/// Write the report as pretty JSON followed by a newline.
pub fn write_json<W: Write>(report: &AnalysisReport, out: &mut W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
