mod bootstrap;

use analyzer_core::settings::Settings;
use analyzer_data::analysis::analyze_export;
use analyzer_ui::app::App;
use anyhow::{Context, Result};

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Chat Analyzer v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        "File: {}, Views: {:?}, Theme: {}",
        settings.file.display(),
        settings.selected_views(),
        settings.theme
    );

    let options = bootstrap::analysis_options(&settings);
    let report = analyze_export(&settings.file, &options)
        .with_context(|| format!("failed to analyse {}", settings.file.display()))?;

    if settings.json {
        let stdout = std::io::stdout();
        bootstrap::write_json(&report, &mut stdout.lock())?;
        return Ok(());
    }

    App::new(&settings.theme, settings.selected_views(), report).run()?;

    Ok(())
}
