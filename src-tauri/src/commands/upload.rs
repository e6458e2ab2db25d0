use crate::error::AppError;
use crate::models::classify_types::{UploadOutcome, UploadRequest};
use crate::services::session::SessionState;
use base64::Engine;
use std::path::Path;
use tauri::State;

/// Files picked through the webview's file input, sent as base64.
#[tauri::command]
pub async fn upload_images(
    session: State<'_, SessionState>,
    files: Vec<UploadRequest>,
) -> Result<Vec<UploadOutcome>, AppError> {
    let session = session.inner().clone();

    tauri::async_runtime::spawn_blocking(move || {
        let decoded = files
            .into_iter()
            .map(|file| {
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(file.data_base64.as_bytes())
                    .map_err(|e| format!("Invalid base64 image data: {}", e));
                (file.file_name, bytes)
            })
            .collect();
        session.upload_many(decoded)
    })
    .await
    .map_err(|e| AppError::inference(format!("Task join failed: {}", e)))
}

/// Paths returned by the native open dialog.
#[tauri::command]
pub async fn upload_files(
    session: State<'_, SessionState>,
    paths: Vec<String>,
) -> Result<Vec<UploadOutcome>, AppError> {
    let mut loaded = Vec::with_capacity(paths.len());

    for path in paths {
        let file_name = Path::new(&path)
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| format!("Failed to read {}: {}", path, e));
        loaded.push((file_name, bytes));
    }

    let session = session.inner().clone();
    tauri::async_runtime::spawn_blocking(move || session.upload_many(loaded))
        .await
        .map_err(|e| AppError::inference(format!("Task join failed: {}", e)))
}

#[tauri::command]
pub fn remove_upload(session: State<'_, SessionState>, file_name: String) -> Result<bool, AppError> {
    session.remove_upload(&file_name)
}
