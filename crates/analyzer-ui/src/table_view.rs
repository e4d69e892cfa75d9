//! Table views for the chat analyzer TUI: user ranking, weekday × hour
//! heat-map and the daily message series.
//!
//! Every view renders into a bordered [`ratatui::widgets::Table`]. Totals
//! shown here come from the report summary, never from the rows.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use chrono::Datelike;
use unicode_width::UnicodeWidthChar;

use analyzer_core::formatting;
use analyzer_core::models::weekday_name;
use analyzer_data::aggregator::{ActivityMatrix, DailyPoint, UserRank};
use analyzer_data::analysis::SummaryStatistics;

use crate::themes::Theme;

/// Column width reserved for user names in the ranking table.
pub const NAME_COLUMN_WIDTH: usize = 28;

/// Label shown for senders whose account no longer has a display name.
pub const DELETED_ACCOUNT: &str = "Deleted Account";

fn row_style(theme: &Theme, index: usize) -> ratatui::style::Style {
    if index % 2 == 0 {
        theme.table_row
    } else {
        theme.table_row_alt
    }
}

fn bordered(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
}

/// Truncate `text` to at most `max_width` terminal columns, appending `…`
/// when anything was cut.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().filter_map(UnicodeWidthChar::width).sum();
    if total <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

// ── Ranking ───────────────────────────────────────────────────────────────────

/// Render the most-active-user ranking.
///
/// The share column and the footer row are driven by `summary`, the
/// statistics of the whole filtered collection.
pub fn render_ranking(
    frame: &mut Frame,
    area: Rect,
    ranking: &[UserRank],
    summary: &SummaryStatistics,
    theme: &Theme,
) {
    let total_messages = summary.total_messages;
    let header = Row::new(
        ["#", "User", "User ID", "Messages", "Share"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let mut rows: Vec<Row> = ranking
        .iter()
        .enumerate()
        .map(|(i, rank)| {
            let name = rank.username.as_deref().unwrap_or(DELETED_ACCOUNT);
            Row::new(vec![
                Cell::from((i + 1).to_string()),
                Cell::from(truncate_to_width(name, NAME_COLUMN_WIDTH)),
                Cell::from(rank.user_id.to_string()),
                Cell::from(formatting::format_count(rank.message_count)),
                Cell::from(format!(
                    "{:.1}%",
                    formatting::percentage(rank.message_count, total_messages, 1)
                )),
            ])
            .style(row_style(theme, i))
        })
        .collect();

    rows.push(
        Row::new(vec![
            Cell::from(""),
            Cell::from(format!("{} users in range", summary.distinct_users)),
            Cell::from(""),
            Cell::from(formatting::format_count(total_messages)),
            Cell::from(""),
        ])
        .style(theme.table_total),
    );

    let widths = [
        Constraint::Length(5),
        Constraint::Length(NAME_COLUMN_WIDTH as u16 + 2),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(bordered("Top Users"))
        .style(theme.text);
    frame.render_widget(table, area);
}

// ── Heat-map ──────────────────────────────────────────────────────────────────

/// Render the 7 × 24 weekday/hour matrix as a coloured table.
///
/// Each cell is tinted by [`Theme::heat_style`] relative to the busiest cell.
pub fn render_heatmap(frame: &mut Frame, area: Rect, matrix: &ActivityMatrix, theme: &Theme) {
    let max = matrix.max_count();

    let mut header_cells = vec![Cell::from("").style(theme.table_header)];
    header_cells.extend((0..24).map(|h| Cell::from(format!("{:>3}", h)).style(theme.table_header)));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = matrix
        .rows()
        .iter()
        .map(|row| {
            let mut cells = vec![Cell::from(&weekday_name(row.weekday)[..3]).style(theme.label)];
            cells.extend(row.hours.iter().map(|&count| {
                let label = if count == 0 {
                    format!("{:>3}", "·")
                } else {
                    format!("{:>3}", compact_count(count))
                };
                Cell::from(label).style(theme.heat_style(count, max))
            }));
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(4)];
    widths.extend(std::iter::repeat(Constraint::Length(3)).take(24));

    let title = format!(
        "Weekday x Hour (busiest cell: {})",
        formatting::format_count(max)
    );
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(0)
        .block(bordered(&title))
        .style(theme.text);
    frame.render_widget(table, area);
}

/// Fit a cell count into three columns: `999`, `1k`, `12k`, `.4M`, `9M`.
pub fn compact_count(count: u64) -> String {
    match count {
        0..=999 => count.to_string(),
        1_000..=99_999 => format!("{}k", count / 1_000),
        100_000..=999_999 => format!(".{}M", count / 100_000),
        _ => format!("{}M", (count / 1_000_000).min(99)),
    }
}

// ── Daily series ──────────────────────────────────────────────────────────────

/// Render the daily series as a table.
///
/// A per-user series gets a user id column; the combined series does not.
pub fn render_daily_table(frame: &mut Frame, area: Rect, points: &[DailyPoint], theme: &Theme) {
    let per_user = points.iter().any(|p| p.user_id.is_some());

    let titles: &[&str] = if per_user {
        &["Date", "Weekday", "User ID", "Messages"]
    } else {
        &["Date", "Weekday", "Messages"]
    };
    let header = Row::new(
        titles
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let rows: Vec<Row> = points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let mut cells = vec![
                Cell::from(point.date.format("%Y-%m-%d").to_string()),
                Cell::from(weekday_name(point.date.weekday())),
            ];
            if per_user {
                cells.push(Cell::from(
                    point.user_id.map(|id| id.to_string()).unwrap_or_default(),
                ));
            }
            cells.push(Cell::from(formatting::format_count(point.count)));
            Row::new(cells).style(row_style(theme, i))
        })
        .collect();

    let widths: Vec<Constraint> = if per_user {
        vec![
            Constraint::Length(12),
            Constraint::Length(11),
            Constraint::Length(14),
            Constraint::Length(12),
        ]
    } else {
        vec![
            Constraint::Length(12),
            Constraint::Length(11),
            Constraint::Length(12),
        ]
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(bordered("Daily Activity"))
        .style(theme.text);
    frame.render_widget(table, area);
}

/// Render a "no data" placeholder when the filtered collection is empty.
pub fn render_no_data(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No messages in the selected range", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Try widening --start/--end or check the export file.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(bordered(title)),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
