use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::Parser;
use serde::Serialize;

use crate::time_utils::parse_range_bound;

// ── ReportView ─────────────────────────────────────────────────────────────────

/// One analytical view the user can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportView {
    Summary,
    Hourly,
    Heatmap,
    Daily,
    Ranking,
}

impl ReportView {
    /// Short tab label used by the terminal UI.
    pub fn title(&self) -> &'static str {
        match self {
            ReportView::Summary => "Summary",
            ReportView::Hourly => "Posting Hours",
            ReportView::Heatmap => "Weekday x Hour",
            ReportView::Daily => "Daily Activity",
            ReportView::Ranking => "Top Users",
        }
    }
}

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Analyse a chat export JSON file and print activity insights
#[derive(Parser, Debug, Clone)]
#[command(
    name = "chat-analyzer",
    about = "Analyse a chat export JSON file and print activity insights",
    version
)]
pub struct Settings {
    /// Export file (result.json) or the export directory containing it
    pub file: PathBuf,

    /// First moment to consider (inclusive), e.g. 2024-01-15 or 2024-01-15T08:00
    #[arg(long, value_parser = parse_range_bound)]
    pub start: Option<NaiveDateTime>,

    /// Last moment to consider (inclusive), e.g. 2024-02-01 or 2024-02-01T23:59:59
    #[arg(long, value_parser = parse_range_bound)]
    pub end: Option<NaiveDateTime>,

    /// Show the distribution of posting hours
    #[arg(short = 't', long)]
    pub time: bool,

    /// Show the weekday x hour activity matrix
    #[arg(long)]
    pub heatmap: bool,

    /// Show the number of messages per day
    #[arg(long)]
    pub daily: bool,

    /// Show the N most active users
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub users: Option<u64>,

    /// Show every user ranked by message count
    #[arg(long, conflicts_with = "users")]
    pub all_users: bool,

    /// Restrict the daily view to these user ids (comma separated)
    #[arg(long = "user-id", value_name = "ID", value_delimiter = ',')]
    pub user_ids: Vec<i64>,

    /// Show summary statistics (default when no other view is selected)
    #[arg(long)]
    pub summary: bool,

    /// Print the full report as JSON instead of the terminal UI
    #[arg(long)]
    pub json: bool,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and resolve derived values.
    pub fn load() -> Self {
        Self::parse().resolve()
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list, for
    /// tests.
    pub fn try_load_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args).map(Self::resolve)
    }

    /// Apply the `--debug` flag.
    fn resolve(mut self) -> Self {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }

    /// Views requested on the command line, in display order.
    ///
    /// Falls back to the summary alone when nothing was requested. Passing
    /// `--user-id` implies the daily view.
    pub fn selected_views(&self) -> Vec<ReportView> {
        let mut views = Vec::new();
        if self.summary {
            views.push(ReportView::Summary);
        }
        if self.time {
            views.push(ReportView::Hourly);
        }
        if self.heatmap {
            views.push(ReportView::Heatmap);
        }
        if self.daily || !self.user_ids.is_empty() {
            views.push(ReportView::Daily);
        }
        if self.users.is_some() || self.all_users {
            views.push(ReportView::Ranking);
        }
        if views.is_empty() {
            views.push(ReportView::Summary);
        }
        views
    }

    /// Ranking size: `None` means every user.
    pub fn ranking_size(&self) -> Option<usize> {
        if self.all_users {
            return None;
        }
        self.users.map(|n| n as usize)
    }

    /// User ids the daily view is restricted to, if any were given.
    pub fn user_filter(&self) -> Option<BTreeSet<i64>> {
        if self.user_ids.is_empty() {
            None
        } else {
            Some(self.user_ids.iter().copied().collect())
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
