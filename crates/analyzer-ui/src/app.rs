//! Main application state and TUI event loop for the chat analyzer.
//!
//! [`App`] owns the theme, the requested views and the finished
//! [`AnalysisReport`]. Each view gets its own tab; the report is computed
//! once up front so the loop only redraws and handles keys.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame, Terminal,
};

use tracing::debug;

use analyzer_core::error::{AnalyzerError, Result};
use analyzer_core::settings::ReportView;
use analyzer_data::analysis::AnalysisReport;

use crate::charts;
use crate::summary_view;
use crate::table_view;
use crate::themes::Theme;

/// Outcome of a single key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Terminal UI over a finished analysis report.
pub struct App {
    theme: Theme,
    views: Vec<ReportView>,
    selected: usize,
    report: AnalysisReport,
}

impl App {
    /// Construct the application. An empty view list shows the summary.
    pub fn new(theme_name: &str, views: Vec<ReportView>, report: AnalysisReport) -> Self {
        let views = if views.is_empty() {
            vec![ReportView::Summary]
        } else {
            views
        };
        Self {
            theme: Theme::from_name(theme_name),
            views,
            selected: 0,
            report,
        }
    }

    /// The view whose tab is currently active.
    pub fn selected_view(&self) -> ReportView {
        self.views[self.selected]
    }

    pub fn next_view(&mut self) {
        self.selected = (self.selected + 1) % self.views.len();
    }

    pub fn previous_view(&mut self) {
        self.selected = (self.selected + self.views.len() - 1) % self.views.len();
    }

    /// Apply a key press: `Tab`/`→` and `Shift+Tab`/`←` switch views,
    /// `q`, `Q`, `Esc` and `Ctrl+C` quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyAction {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
                self.next_view();
                KeyAction::Continue
            }
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
                self.previous_view();
                KeyAction::Continue
            }
            _ => KeyAction::Continue,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Show the report until the user quits.
    ///
    /// Terminal failures surface as [`AnalyzerError::Terminal`].
    pub fn run(self) -> Result<()> {
        self.run_terminal()
            .map_err(|e| AnalyzerError::Terminal(e.to_string()))
    }

    /// Polls for keys with a 250 ms timeout; the terminal is restored even
    /// when setup or drawing fails.
    fn run_terminal(mut self) -> io::Result<()> {
        debug!("Starting terminal UI with views {:?}", self.views);
        enable_raw_mode()?;
        let mut terminal = restore_on_error(
            || {
                let mut stdout = io::stdout();
                execute!(stdout, EnterAlternateScreen)?;
                Terminal::new(CrosstermBackend::new(stdout))
            },
            restore_terminal,
        )?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => {
                        if self.handle_key(key) == KeyAction::Quit {
                            break Ok(());
                        }
                    }
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let [tabs_area, body, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let titles: Vec<Line> = self.views.iter().map(|v| Line::from(v.title())).collect();
        let tabs = Tabs::new(titles)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", self.report.summary.channel.display_name())),
            )
            .select(self.selected)
            .style(self.theme.tab)
            .highlight_style(self.theme.tab_selected);
        frame.render_widget(tabs, tabs_area);

        self.render_view(frame, body);

        let help = Line::from(vec![
            Span::styled("Tab/←/→", self.theme.value),
            Span::styled(" switch view   ", self.theme.dim),
            Span::styled("q", self.theme.value),
            Span::styled(" quit", self.theme.dim),
        ]);
        frame.render_widget(Paragraph::new(help), footer);
    }

    fn render_view(&self, frame: &mut Frame, area: Rect) {
        let view = self.selected_view();
        let report = &self.report;
        let theme = &self.theme;

        if view != ReportView::Summary && !report.summary.has_data() {
            table_view::render_no_data(frame, area, view.title(), theme);
            return;
        }

        match view {
            ReportView::Summary => summary_view::render_summary_view(frame, area, report, theme),
            ReportView::Hourly => charts::render_hourly_chart(
                frame,
                area,
                &report.hourly,
                report.summary.total_messages,
                theme,
            ),
            ReportView::Heatmap => table_view::render_heatmap(frame, area, &report.matrix, theme),
            ReportView::Daily => {
                let [chart, table] =
                    Layout::vertical([Constraint::Percentage(40), Constraint::Min(0)]).areas(area);
                charts::render_daily_sparkline(frame, chart, &report.daily, theme);
                table_view::render_daily_table(frame, table, &report.daily, theme);
            }
            ReportView::Ranking => {
                table_view::render_ranking(frame, area, &report.ranking, &report.summary, theme)
            }
        }
    }
}

/// Run `setup`, calling `restore` before handing back any error it returns.
fn restore_on_error<T>(
    setup: impl FnOnce() -> io::Result<T>,
    restore: impl FnOnce(),
) -> io::Result<T> {
    match setup() {
        Ok(value) => Ok(value),
        Err(e) => {
            restore();
            Err(e)
        }
    }
}

/// Best-effort undo of raw mode and the alternate screen after a failed setup.
fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        debug!("Failed to disable raw mode: {}", e);
    }
    if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen) {
        debug!("Failed to leave alternate screen: {}", e);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
