mod bootstrap;

use anyhow::Result;
use board_core::settings::Settings;
use board_runtime::session::Session;
use board_ui::app::App;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("brandboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("Theme: {}", settings.theme);

    let data_dir = bootstrap::resolve_data_dir(settings.data_dir.clone());
    tracing::info!("Data directory: {}", data_dir.display());

    let session = Session::new(settings.access_code.clone());
    let app = App::new(&settings.theme, session, data_dir);

    app.run()?;

    Ok(())
}
