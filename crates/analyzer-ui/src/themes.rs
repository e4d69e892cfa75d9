use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are considered dark; 7–15 light. Absent or unparseable values fall
/// back to [`BackgroundType::Dark`].
pub fn detect_background() -> BackgroundType {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|val| val.split(';').next_back()?.parse::<u8>().ok())
        .map(|bg| {
            if bg <= 6 {
                BackgroundType::Dark
            } else {
                BackgroundType::Light
            }
        })
        .unwrap_or(BackgroundType::Dark)
}

/// Number of intensity steps in the heat-map palette.
pub const HEAT_LEVELS: usize = 5;

/// All UI styles used by the report views.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Text ─────────────────────────────────────────────────────────────────
    pub header: Style,
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,
    pub warning: Style,

    // ── Tabs ─────────────────────────────────────────────────────────────────
    pub tab: Style,
    pub tab_selected: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    pub bar: Style,
    pub bar_value: Style,
    pub sparkline: Style,
    /// Heat-map cell styles from empty (index 0) to busiest.
    pub heat: [Style; HEAT_LEVELS],

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,
}

impl Theme {
    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Yellow),

            tab: Style::default().fg(Color::Gray),
            tab_selected: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),

            bar: Style::default().fg(Color::Green),
            bar_value: Style::default().fg(Color::Black).bg(Color::Green),
            sparkline: Style::default().fg(Color::Cyan),
            heat: [
                Style::default().fg(Color::DarkGray),
                Style::default().fg(Color::Black).bg(Color::Blue),
                Style::default().fg(Color::Black).bg(Color::Cyan),
                Style::default().fg(Color::Black).bg(Color::Yellow),
                Style::default().fg(Color::White).bg(Color::Red),
            ],

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Red),

            tab: Style::default().fg(Color::DarkGray),
            tab_selected: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),

            bar: Style::default().fg(Color::Blue),
            bar_value: Style::default().fg(Color::White).bg(Color::Blue),
            sparkline: Style::default().fg(Color::Blue),
            heat: [
                Style::default().fg(Color::Gray),
                Style::default().fg(Color::Black).bg(Color::LightCyan),
                Style::default().fg(Color::Black).bg(Color::LightGreen),
                Style::default().fg(Color::Black).bg(Color::LightYellow),
                Style::default().fg(Color::White).bg(Color::Red),
            ],

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Pick a theme from the terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            BackgroundType::Dark => Self::dark(),
        }
    }

    /// Resolve a `--theme` value; anything unrecognised auto-detects.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Heat-map style for `count` relative to the busiest cell `max`.
    ///
    /// Zero always maps to level 0; any non-zero count gets at least level 1.
    pub fn heat_style(&self, count: u64, max: u64) -> Style {
        self.heat[heat_level(count, max)]
    }
}

/// Bucket `count` into `0..HEAT_LEVELS` relative to `max`.
pub fn heat_level(count: u64, max: u64) -> usize {
    if count == 0 || max == 0 {
        return 0;
    }
    let steps = (HEAT_LEVELS - 1) as u64;
    let level = (count.min(max) * steps).div_ceil(max);
    level.max(1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_dark_and_light() {
        assert_eq!(Theme::from_name("dark").text.fg, Some(Color::White));
        assert_eq!(Theme::from_name("light").text.fg, Some(Color::Black));
    }

    #[test]
    fn test_from_name_unknown_falls_back() {
        // Must not panic; auto-detect picks one of the two palettes.
        let theme = Theme::from_name("neon");
        assert!(theme.text.fg == Some(Color::White) || theme.text.fg == Some(Color::Black));
    }

    #[test]
    fn test_heat_level_bounds() {
        assert_eq!(heat_level(0, 10), 0);
        assert_eq!(heat_level(0, 0), 0);
        assert_eq!(heat_level(1, 100), 1);
        assert_eq!(heat_level(10, 10), HEAT_LEVELS - 1);
        assert_eq!(heat_level(50, 10), HEAT_LEVELS - 1);
    }

    #[test]
    fn test_heat_level_monotonic() {
        let levels: Vec<usize> = (0..=20).map(|c| heat_level(c, 20)).collect();
        assert!(levels.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_heat_style_empty_cell_uses_first_level() {
        let theme = Theme::dark();
        assert_eq!(theme.heat_style(0, 5), theme.heat[0]);
        assert_eq!(theme.heat_style(5, 5), theme.heat[HEAT_LEVELS - 1]);
    }
}
