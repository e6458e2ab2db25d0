use crate::error::AppError;
use crate::models::classify_types::SessionView;
use crate::models::locale::UiText;
use crate::services::classifier::model_context::ModelContext;
use crate::services::session::SessionState;
use tauri::State;

#[tauri::command]
pub fn get_ui_text(session: State<'_, SessionState>) -> Result<UiText, AppError> {
    Ok(session.ui_text().clone())
}

#[tauri::command]
pub fn get_session(
    model: State<'_, ModelContext>,
    session: State<'_, SessionState>,
) -> Result<SessionView, AppError> {
    session.snapshot(model.catalog())
}

#[tauri::command]
pub fn clear_predictions(session: State<'_, SessionState>) -> Result<(), AppError> {
    session.clear_predictions()
}

#[tauri::command]
pub fn toggle_info(session: State<'_, SessionState>) -> Result<bool, AppError> {
    session.toggle_info()
}
