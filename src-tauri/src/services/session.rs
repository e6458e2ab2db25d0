use crate::config::Settings;
use crate::error::{AppError, ClassifierError};
use crate::models::catalog::CategoryCatalog;
use crate::models::classify_types::{
    CategoryPrediction, PredictionView, SessionView, UploadOutcome, UploadView,
};
use crate::models::locale::UiText;
use crate::services::classifier::inference;
use crate::services::classifier::model_context::ModelContext;
use crate::services::presentation;
use image::DynamicImage;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub fn is_supported_image(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let lower = e.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

#[derive(Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub image: Arc<DynamicImage>,
    pub preview: String,
}

/// Per-window bookkeeping: uploads in arrival order, last prediction per file, info toggle.
#[derive(Default)]
pub struct Session {
    uploads: Vec<UploadedImage>,
    predictions: HashMap<String, CategoryPrediction>,
    show_info: bool,
}

impl Session {
    /// Returns true when an upload with the same name was replaced.
    pub fn add_upload(&mut self, upload: UploadedImage) -> bool {
        // A new image under an old name must not inherit the old verdict.
        self.predictions.remove(&upload.file_name);
        match self
            .uploads
            .iter_mut()
            .find(|u| u.file_name == upload.file_name)
        {
            Some(existing) => {
                *existing = upload;
                true
            }
            None => {
                self.uploads.push(upload);
                false
            }
        }
    }

    pub fn remove_upload(&mut self, file_name: &str) -> bool {
        self.predictions.remove(file_name);
        let before = self.uploads.len();
        self.uploads.retain(|u| u.file_name != file_name);
        self.uploads.len() != before
    }

    pub fn image(&self, file_name: &str) -> Option<Arc<DynamicImage>> {
        self.uploads
            .iter()
            .find(|u| u.file_name == file_name)
            .map(|u| Arc::clone(&u.image))
    }

    pub fn record_prediction(&mut self, file_name: &str, prediction: CategoryPrediction) {
        self.predictions.insert(file_name.to_string(), prediction);
    }

    pub fn prediction(&self, file_name: &str) -> Option<&CategoryPrediction> {
        self.predictions.get(file_name)
    }

    pub fn prediction_count(&self) -> usize {
        self.predictions.len()
    }

    pub fn clear_predictions(&mut self) {
        self.predictions.clear();
    }

    pub fn toggle_info(&mut self) -> bool {
        self.show_info = !self.show_info;
        self.show_info
    }

    pub fn show_info(&self) -> bool {
        self.show_info
    }

    pub fn uploads(&self) -> &[UploadedImage] {
        &self.uploads
    }
}

/// Session shared with the Tauri command handlers.
#[derive(Clone)]
pub struct SessionState {
    session: Arc<Mutex<Session>>,
    ui: UiText,
    show_scores: bool,
    preview_width: u32,
}

impl SessionState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::default())),
            ui: settings.locale.ui_text(),
            show_scores: settings.show_scores(),
            preview_width: settings.preview_width,
        }
    }

    pub fn ui_text(&self) -> &UiText {
        &self.ui
    }

    fn lock(&self) -> Result<MutexGuard<'_, Session>, AppError> {
        self.session
            .lock()
            .map_err(|_| AppError::inference("Session lock poisoned"))
    }

    fn upload_view(&self, upload: &UploadedImage, session: &Session, catalog: &CategoryCatalog) -> UploadView {
        UploadView {
            file_name: upload.file_name.clone(),
            width: upload.image.width(),
            height: upload.image.height(),
            preview: upload.preview.clone(),
            prediction: session.prediction(&upload.file_name).map(|p| {
                presentation::prediction_view(&upload.file_name, p, catalog, &self.ui, self.show_scores)
            }),
        }
    }

    /// Decode and store one file. Decoding happens before the session lock is taken.
    pub fn upload(&self, file_name: &str, bytes: &[u8]) -> Result<UploadView, AppError> {
        if !is_supported_image(file_name) {
            return Err(ClassifierError::ImageDecode {
                name: file_name.to_string(),
                reason: "unsupported file type, expected JPEG or PNG".to_string(),
            }
            .into());
        }

        let image = inference::decode_image(file_name, bytes)?;
        let preview = presentation::preview_data_uri(&image, self.preview_width)?;
        let upload = UploadedImage {
            file_name: file_name.to_string(),
            image: Arc::new(image),
            preview,
        };

        let mut session = self.lock()?;
        if session.add_upload(upload.clone()) {
            info!("Replaced upload {}", file_name);
        } else {
            info!(
                "Uploaded {} ({}x{})",
                file_name,
                upload.image.width(),
                upload.image.height()
            );
        }

        Ok(UploadView {
            file_name: upload.file_name,
            width: upload.image.width(),
            height: upload.image.height(),
            preview: upload.preview,
            prediction: None,
        })
    }

    /// Upload several files; a failure is reported for that file only.
    ///
    /// An `Err` payload is a failure that happened before decoding (unreadable
    /// file, bad base64). Outcomes come back in input order.
    pub fn upload_many(&self, files: Vec<(String, Result<Vec<u8>, String>)>) -> Vec<UploadOutcome> {
        files
            .into_iter()
            .map(|(file_name, bytes)| {
                let result = bytes.and_then(|b| self.upload(&file_name, &b).map_err(|e| e.message));
                match result {
                    Ok(view) => UploadOutcome {
                        file_name,
                        upload: Some(view),
                        error: None,
                    },
                    Err(error) => {
                        warn!("Rejected upload {}: {}", file_name, error);
                        UploadOutcome {
                            file_name,
                            upload: None,
                            error: Some(error),
                        }
                    }
                }
            })
            .collect()
    }

    pub fn remove_upload(&self, file_name: &str) -> Result<bool, AppError> {
        Ok(self.lock()?.remove_upload(file_name))
    }

    /// Classify a stored upload and record the verdict, replacing any earlier one.
    ///
    /// The session lock is released during the forward pass.
    pub fn predict(&self, model: &ModelContext, file_name: &str) -> Result<PredictionView, AppError> {
        let image = self
            .lock()?
            .image(file_name)
            .ok_or_else(|| AppError::inference(format!("No uploaded image named {}", file_name)))?;

        let prediction = model.classify(&image).map_err(|e| {
            warn!("Prediction failed for {}: {}", file_name, e);
            AppError::from(e)
        })?;
        info!(
            "Predicted {} for {} (confidence {:.2})",
            prediction.category, file_name, prediction.confidence
        );

        let view =
            presentation::prediction_view(file_name, &prediction, model.catalog(), &self.ui, self.show_scores);

        let mut session = self.lock()?;
        // The verdict belongs to the pixels it was computed on, not to the name.
        match session.image(file_name) {
            Some(current) if Arc::ptr_eq(&current, &image) => {}
            _ => {
                return Err(AppError::inference(format!(
                    "{} was removed or replaced before its prediction finished",
                    file_name
                )));
            }
        }
        session.record_prediction(file_name, prediction);
        Ok(view)
    }

    pub fn clear_predictions(&self) -> Result<(), AppError> {
        let mut session = self.lock()?;
        let cleared = session.prediction_count();
        session.clear_predictions();
        info!("Cleared {} predictions", cleared);
        Ok(())
    }

    pub fn toggle_info(&self) -> Result<bool, AppError> {
        Ok(self.lock()?.toggle_info())
    }

    pub fn snapshot(&self, catalog: &CategoryCatalog) -> Result<SessionView, AppError> {
        let session = self.lock()?;
        let uploads = session
            .uploads()
            .iter()
            .map(|u| self.upload_view(u, &session, catalog))
            .collect();
        Ok(SessionView {
            uploads,
            show_info: session.show_info(),
        })
    }
}
