//! Message aggregations: hourly histogram, weekday × hour matrix, daily
//! series and user ranking.
//!
//! Every query is a pure function of a message slice and accepts an empty
//! slice, returning an explicitly empty or zero-filled result.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use analyzer_core::error::{AnalyzerError, Result};
use analyzer_core::models::{serialize_weekday, Message, HOURS_PER_DAY, WEEKDAYS};
use chrono::{NaiveDate, Weekday};
use serde::Serialize;

// ── Result types ──────────────────────────────────────────────────────────────

/// Messages posted during one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourCount {
    /// Hour of day, 0–23.
    pub hour: u32,
    pub count: u64,
}

/// One weekday row of the activity matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayRow {
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday,
    /// Counts indexed by hour of day.
    pub hours: [u64; HOURS_PER_DAY],
}

/// Complete 7 × 24 weekday/hour count grid, Monday first, hour 0 first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityMatrix {
    rows: Vec<WeekdayRow>,
}

impl ActivityMatrix {
    /// All 168 cells present and set to zero.
    fn zeroed() -> Self {
        Self {
            rows: WEEKDAYS
                .iter()
                .map(|&weekday| WeekdayRow {
                    weekday,
                    hours: [0; HOURS_PER_DAY],
                })
                .collect(),
        }
    }

    fn increment(&mut self, weekday: Weekday, hour: u32) {
        let row = weekday.num_days_from_monday() as usize;
        self.rows[row].hours[hour as usize] += 1;
    }

    /// Rows in Monday → Sunday order.
    pub fn rows(&self) -> &[WeekdayRow] {
        &self.rows
    }

    /// Count for a single cell. Hours outside 0–23 read as zero.
    pub fn get(&self, weekday: Weekday, hour: u32) -> u64 {
        self.rows[weekday.num_days_from_monday() as usize]
            .hours
            .get(hour as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Number of cells; always `7 * 24`.
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|r| r.hours.len()).sum()
    }

    /// Sum over every cell.
    pub fn total(&self) -> u64 {
        self.rows.iter().flat_map(|r| r.hours.iter()).sum()
    }

    /// Largest single cell value, 0 for an empty matrix.
    pub fn max_count(&self) -> u64 {
        self.rows
            .iter()
            .flat_map(|r| r.hours.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

/// Message count for one calendar date, optionally for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    /// Set when the series was partitioned by user.
    pub user_id: Option<i64>,
    pub count: u64,
}

/// One row of the most-active-user ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRank {
    /// First display name seen for this user, if any.
    pub username: Option<String>,
    pub user_id: i64,
    pub message_count: u64,
}

// ── MessageAggregator ─────────────────────────────────────────────────────────

/// Stateless helper grouping messages by hour, weekday, date and sender.
pub struct MessageAggregator;

impl MessageAggregator {
    /// Count messages per hour of day.
    ///
    /// Always returns 24 entries in hour order; empty hours carry `0`.
    pub fn hourly_histogram(messages: &[Message]) -> Vec<HourCount> {
        let mut counts = [0u64; HOURS_PER_DAY];
        for msg in messages {
            counts[msg.hour() as usize] += 1;
        }

        counts
            .iter()
            .enumerate()
            .map(|(hour, &count)| HourCount {
                hour: hour as u32,
                count,
            })
            .collect()
    }

    /// Count messages per (weekday, hour) into a full 7 × 24 grid.
    pub fn weekday_hour_matrix(messages: &[Message]) -> ActivityMatrix {
        let mut matrix = ActivityMatrix::zeroed();
        for msg in messages {
            matrix.increment(msg.weekday(), msg.hour());
        }
        matrix
    }

    /// Messages per active date.
    ///
    /// With `user_ids = None` every sender is folded into one series and each
    /// point has `user_id = None`. With a set of ids, only those senders'
    /// messages count and the result holds one sub-series per user, ordered
    /// by user id and then date. Dates without messages are never
    /// synthesised.
    ///
    /// An empty id set is rejected with [`AnalyzerError::InvalidArgument`].
    pub fn daily_series(
        messages: &[Message],
        user_ids: Option<&BTreeSet<i64>>,
    ) -> Result<Vec<DailyPoint>> {
        let Some(user_ids) = user_ids else {
            let mut per_date: BTreeMap<NaiveDate, u64> = BTreeMap::new();
            for msg in messages {
                *per_date.entry(msg.date()).or_default() += 1;
            }
            return Ok(per_date
                .into_iter()
                .map(|(date, count)| DailyPoint {
                    date,
                    user_id: None,
                    count,
                })
                .collect());
        };

        if user_ids.is_empty() {
            return Err(AnalyzerError::InvalidArgument(
                "user id selection must not be empty".to_string(),
            ));
        }

        let mut per_user_date: BTreeMap<(i64, NaiveDate), u64> = BTreeMap::new();
        for msg in messages.iter().filter(|m| user_ids.contains(&m.user_id())) {
            *per_user_date.entry((msg.user_id(), msg.date())).or_default() += 1;
        }

        Ok(per_user_date
            .into_iter()
            .map(|((user_id, date), count)| DailyPoint {
                date,
                user_id: Some(user_id),
                count,
            })
            .collect())
    }

    /// Rank senders by message count, highest first.
    ///
    /// Equal counts are ordered by ascending user id. Each user appears once,
    /// labelled with the first non-null username seen in message order.
    /// `top_n` truncates the ranking and must be at least 1.
    pub fn user_ranking(messages: &[Message], top_n: Option<usize>) -> Result<Vec<UserRank>> {
        if top_n == Some(0) {
            return Err(AnalyzerError::InvalidArgument(
                "ranking size must be a positive integer".to_string(),
            ));
        }

        let mut per_user: HashMap<i64, UserRank> = HashMap::new();
        for msg in messages {
            let rank = per_user.entry(msg.user_id()).or_insert_with(|| UserRank {
                username: None,
                user_id: msg.user_id(),
                message_count: 0,
            });
            rank.message_count += 1;
            if rank.username.is_none() {
                rank.username = msg.username().map(str::to_string);
            }
        }

        let mut ranking: Vec<UserRank> = per_user.into_values().collect();
        ranking.sort_by(|a, b| {
            b.message_count
                .cmp(&a.message_count)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        if let Some(n) = top_n {
            ranking.truncate(n);
        }
        Ok(ranking)
    }

    /// Number of distinct senders.
    pub fn distinct_users(messages: &[Message]) -> usize {
        messages
            .iter()
            .map(Message::user_id)
            .collect::<BTreeSet<_>>()
            .len()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
