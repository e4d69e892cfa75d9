//! Summary panel: channel identity, totals and the active period.

use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use analyzer_core::formatting;
use analyzer_data::analysis::AnalysisReport;
use analyzer_data::filter::DateRange;

use crate::themes::Theme;

const LABEL_WIDTH: usize = 22;

fn field<'a>(label: &str, value: String, theme: &'a Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<width$}", label, width = LABEL_WIDTH), theme.label),
        Span::styled(value, theme.value),
    ])
}

fn describe_range(range: &DateRange) -> String {
    let fmt = |bound: Option<chrono::NaiveDateTime>, open: &str| {
        bound
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| open.to_string())
    };
    if range.is_unbounded() {
        "all messages".to_string()
    } else {
        format!("{} → {}", fmt(range.start, "beginning"), fmt(range.end, "end"))
    }
}

/// Build the summary lines (extracted for testability).
pub fn build_summary_lines<'a>(report: &AnalysisReport, theme: &'a Theme) -> Vec<Line<'a>> {
    let summary = &report.summary;
    let meta = &report.metadata;
    let mut lines: Vec<Line<'a>> = Vec::with_capacity(16);

    lines.push(Line::from(Span::styled(
        summary.channel.display_name().to_string(),
        theme.header,
    )));
    lines.push(Line::from(Span::styled("─".repeat(48), theme.dim)));

    if let Some(kind) = &summary.channel.kind {
        lines.push(field("Chat type", kind.clone(), theme));
    }
    if let Some(id) = summary.channel.id {
        lines.push(field("Chat ID", id.to_string(), theme));
    }
    lines.push(field("Range", describe_range(&meta.range), theme));
    lines.push(Line::from(""));

    lines.push(field(
        "Messages",
        formatting::format_count(summary.total_messages),
        theme,
    ));
    if meta.messages_in_range != meta.messages_loaded {
        lines.push(field(
            "Loaded from export",
            formatting::format_count(meta.messages_loaded as u64),
            theme,
        ));
    }
    lines.push(field(
        "Distinct users",
        formatting::format_count(summary.distinct_users as u64),
        theme,
    ));

    match &summary.period {
        Some(period) => {
            lines.push(field(
                "First message",
                period.first_date.format("%Y-%m-%d").to_string(),
                theme,
            ));
            lines.push(field(
                "Last message",
                period.last_date.format("%Y-%m-%d").to_string(),
                theme,
            ));
            lines.push(field("Span", formatting::format_days(period.day_span), theme));
            lines.push(field(
                "Active days",
                formatting::format_days(period.active_days as i64),
                theme,
            ));
            lines.push(field(
                "Mean per active day",
                formatting::format_rate(period.mean_per_active_day, 2),
                theme,
            ));
        }
        None => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "No messages in the selected range",
                theme.warning,
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            "Loaded in {:.2}s, aggregated in {:.2}s",
            meta.load_time_seconds, meta.aggregate_time_seconds
        ),
        theme.dim,
    )));

    lines
}

/// Render the summary panel into `area`.
pub fn render_summary_view(frame: &mut Frame, area: Rect, report: &AnalysisReport, theme: &Theme) {
    let lines = build_summary_lines(report, theme);
    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(" Summary "));
    frame.render_widget(paragraph, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
