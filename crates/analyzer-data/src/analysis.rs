//! Main analysis pipeline and summary statistics.
//!
//! Orchestrates loading, range filtering and every aggregation, returning an
//! [`AnalysisReport`] ready for the UI layer or JSON output.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use analyzer_core::error::Result;
use analyzer_core::models::{Channel, ChannelInfo, Message};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use crate::aggregator::{ActivityMatrix, DailyPoint, HourCount, MessageAggregator, UserRank};
use crate::filter::DateRange;
use crate::reader::load_export;

// ── Summary statistics ────────────────────────────────────────────────────────

/// Date extent and per-day rate of a non-empty message collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivePeriod {
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    /// Inclusive calendar span: `last_date - first_date + 1` days.
    pub day_span: i64,
    /// Dates with at least one message.
    pub active_days: usize,
    /// `total_messages / active_days`; quiet dates inside the span are not
    /// part of the denominator.
    pub mean_per_active_day: f64,
}

/// Fixed-shape overview of a (filtered) message collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub channel: ChannelInfo,
    pub total_messages: u64,
    pub distinct_users: usize,
    /// `None` when there are no messages.
    pub period: Option<ActivePeriod>,
}

impl SummaryStatistics {
    /// Compute summary statistics for `messages` posted in `channel`.
    pub fn compute(channel: &ChannelInfo, messages: &[Message]) -> Self {
        let total_messages = messages.len() as u64;
        let distinct_users = MessageAggregator::distinct_users(messages);

        let period = Self::active_period(messages, total_messages);

        Self {
            channel: channel.clone(),
            total_messages,
            distinct_users,
            period,
        }
    }

    /// Whether there was anything to summarise.
    pub fn has_data(&self) -> bool {
        self.period.is_some()
    }

    fn active_period(messages: &[Message], total: u64) -> Option<ActivePeriod> {
        let dates: HashSet<NaiveDate> = messages.iter().map(Message::date).collect();
        let first_date = *dates.iter().min()?;
        let last_date = *dates.iter().max()?;

        Some(ActivePeriod {
            first_date,
            last_date,
            day_span: (last_date - first_date).num_days() + 1,
            active_days: dates.len(),
            mean_per_active_day: total as f64 / dates.len() as f64,
        })
    }
}

// ── Pipeline types ────────────────────────────────────────────────────────────

/// Parameters for one analysis run.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Inclusive timestamp window applied before aggregation.
    pub range: DateRange,
    /// Restrict the daily series to these senders.
    pub user_ids: Option<BTreeSet<i64>>,
    /// Truncate the ranking to this many users; `None` keeps all.
    pub top_n: Option<usize>,
}

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// ISO-8601 timestamp when this report was generated.
    pub generated_at: String,
    /// Messages kept by ingestion.
    pub messages_loaded: usize,
    /// Messages left after the range filter.
    pub messages_in_range: usize,
    /// The range filter that was applied.
    pub range: DateRange,
    /// Wall-clock seconds spent reading and normalising the export.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent filtering and aggregating.
    pub aggregate_time_seconds: f64,
}

/// The complete output of [`analyze_export`] / [`analyze_channel`].
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub summary: SummaryStatistics,
    pub hourly: Vec<HourCount>,
    pub matrix: ActivityMatrix,
    pub daily: Vec<DailyPoint>,
    pub ranking: Vec<UserRank>,
    pub metadata: ReportMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full pipeline on the export at `path`.
///
/// 1. Load and normalise the export.
/// 2. Apply the range filter.
/// 3. Run every aggregation over the filtered messages.
pub fn analyze_export(path: &Path, options: &AnalysisOptions) -> Result<AnalysisReport> {
    let load_start = std::time::Instant::now();
    let channel = load_export(path)?;
    let load_time = load_start.elapsed().as_secs_f64();

    info!(
        "Loaded {} messages from {}",
        channel.messages.len(),
        channel.display_name()
    );

    build_report(&channel, options, load_time)
}

/// Run filtering and aggregation on an already-ingested channel.
pub fn analyze_channel(channel: &Channel, options: &AnalysisOptions) -> Result<AnalysisReport> {
    build_report(channel, options, 0.0)
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn build_report(
    channel: &Channel,
    options: &AnalysisOptions,
    load_time: f64,
) -> Result<AnalysisReport> {
    let aggregate_start = std::time::Instant::now();

    let messages = options.range.apply(&channel.messages);
    if !options.range.is_unbounded() {
        info!(
            "Range filter kept {} of {} messages",
            messages.len(),
            channel.messages.len()
        );
    }

    let ranking = MessageAggregator::user_ranking(&messages, options.top_n)?;
    let daily = MessageAggregator::daily_series(&messages, options.user_ids.as_ref())?;
    let hourly = MessageAggregator::hourly_histogram(&messages);
    let matrix = MessageAggregator::weekday_hour_matrix(&messages);
    let summary = SummaryStatistics::compute(&channel.info, &messages);

    let metadata = ReportMetadata {
        generated_at: Utc::now().to_rfc3339(),
        messages_loaded: channel.messages.len(),
        messages_in_range: messages.len(),
        range: options.range,
        load_time_seconds: load_time,
        aggregate_time_seconds: aggregate_start.elapsed().as_secs_f64(),
    };

    Ok(AnalysisReport {
        summary,
        hourly,
        matrix,
        daily,
        ranking,
        metadata,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
