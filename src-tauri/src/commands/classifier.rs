use crate::error::AppError;
use crate::models::classify_types::{CategoryView, PredictionView};
use crate::services::classifier::model_context::ModelContext;
use crate::services::presentation;
use crate::services::session::SessionState;
use tauri::State;

#[tauri::command]
pub async fn get_categories(model: State<'_, ModelContext>) -> Result<Vec<CategoryView>, AppError> {
    Ok(presentation::category_views(model.catalog()))
}

/// Runs on a blocking worker; the model lock keeps forward passes sequential.
#[tauri::command]
pub async fn predict(
    model: State<'_, ModelContext>,
    session: State<'_, SessionState>,
    file_name: String,
) -> Result<PredictionView, AppError> {
    let model = model.inner().clone();
    let session = session.inner().clone();

    tauri::async_runtime::spawn_blocking(move || session.predict(&model, &file_name))
        .await
        .map_err(|e| AppError::inference(format!("Task join failed: {}", e)))?
}
