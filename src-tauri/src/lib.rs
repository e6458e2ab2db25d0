mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

use config::{Settings, SETTINGS_FILE};
use services::classifier::model_context::ModelContext;
use services::session::SessionState;
use tauri::Manager;
use tracing::{error, info};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_window_state::Builder::default().build())
        .setup(|app| {
            let app_data_dir = app.path().app_data_dir()?;
            let config_dir = app.path().app_config_dir()?;
            std::fs::create_dir_all(&app_data_dir)?;

            let settings = Settings::load(&config_dir.join(SETTINGS_FILE))?.resolve_paths(&app_data_dir);
            info!(
                "Starting with locale {:?}, model {}",
                settings.locale,
                settings.model_path.display()
            );

            // Without a model there is nothing to show; refuse to start.
            let model = ModelContext::load(&settings).map_err(|e| {
                error!("{}", e);
                e
            })?;

            let session = SessionState::new(&settings);
            if let Some(window) = app.get_webview_window("main") {
                if let Err(e) = window.set_title(session.ui_text().page_title) {
                    error!("Failed to set window title: {}", e);
                }
            }

            app.manage(model);
            app.manage(session);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::session::get_ui_text,
            commands::session::get_session,
            commands::session::clear_predictions,
            commands::session::toggle_info,
            commands::classifier::get_categories,
            commands::classifier::predict,
            commands::upload::upload_images,
            commands::upload::upload_files,
            commands::upload::remove_upload,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
