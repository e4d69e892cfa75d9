//! Chart widgets: the posting-hours bar chart and the daily activity
//! sparkline.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Sparkline},
    Frame,
};

use analyzer_core::formatting;
use analyzer_data::aggregator::{DailyPoint, HourCount};

use crate::themes::Theme;

const BAR_WIDTH: u16 = 2;
const BAR_GAP: u16 = 1;

/// Render the 24-bucket hour histogram as a vertical bar chart.
///
/// `total_messages` comes from the report summary and is shown in the title.
pub fn render_hourly_chart(
    frame: &mut Frame,
    area: Rect,
    hourly: &[HourCount],
    total_messages: u64,
    theme: &Theme,
) {
    let peak = hourly
        .iter()
        .filter(|h| h.count > 0)
        .max_by(|a, b| a.count.cmp(&b.count).then_with(|| b.hour.cmp(&a.hour)));

    let title = match peak {
        Some(p) => format!(
            " Posting Hours ({} messages, peak {:02}:00 with {}) ",
            formatting::format_count(total_messages),
            p.hour,
            formatting::format_count(p.count)
        ),
        None => " Posting Hours (no messages) ".to_string(),
    };

    let bars: Vec<Bar> = hourly
        .iter()
        .map(|h| {
            Bar::default()
                .value(h.count)
                .label(Line::from(format!("{:02}", h.hour)))
                .text_value(formatting::format_count(h.count))
        })
        .collect();

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .bar_width(BAR_WIDTH)
        .bar_gap(BAR_GAP)
        .bar_style(theme.bar)
        .value_style(theme.bar_value)
        .label_style(theme.label)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

/// Split a daily series into its per-user runs.
///
/// The series is ordered by user id, so each run is a contiguous slice. A
/// combined series comes back as a single run keyed by `None`.
pub fn sub_series(points: &[DailyPoint]) -> Vec<(Option<i64>, &[DailyPoint])> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=points.len() {
        if i == points.len() || points[i].user_id != points[start].user_id {
            runs.push((points[start].user_id, &points[start..i]));
            start = i;
        }
    }
    runs
}

/// Render the daily series as sparklines, one per user sub-series.
///
/// Only active dates are plotted, in series order; the title names the
/// first and last of them.
pub fn render_daily_sparkline(frame: &mut Frame, area: Rect, points: &[DailyPoint], theme: &Theme) {
    let runs = sub_series(points);
    if runs.is_empty() {
        let empty = Sparkline::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Messages per Active Day "),
            )
            .style(theme.sparkline);
        frame.render_widget(empty, area);
        return;
    }

    let areas = Layout::vertical(vec![Constraint::Ratio(1, runs.len() as u32); runs.len()])
        .split(area);

    for ((user_id, run), slot) in runs.iter().zip(areas.iter()) {
        let who = match user_id {
            Some(id) => format!("user {}: ", id),
            None => String::new(),
        };
        let title = match (run.first(), run.last()) {
            (Some(first), Some(last)) => format!(
                " Messages per Active Day ({}{} to {}) ",
                who,
                first.date.format("%Y-%m-%d"),
                last.date.format("%Y-%m-%d")
            ),
            _ => " Messages per Active Day ".to_string(),
        };

        // Keep the most recent days when the run is wider than the widget.
        let inner_width = slot.width.saturating_sub(2) as usize;
        let skip = run.len().saturating_sub(inner_width);

        let sparkline = Sparkline::default()
            .block(Block::default().borders(Borders::ALL).title(title))
            .style(theme.sparkline)
            .data(run.iter().skip(skip).map(|p| p.count));

        frame.render_widget(sparkline, *slot);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
