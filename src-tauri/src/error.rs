use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failures of the classification pipeline, from model loading to post-processing.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    #[error("Failed to decode image {name}: {reason}")]
    ImageDecode { name: String, reason: String },

    #[error("Model produced {actual} scores but the catalog has {expected} categories")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Model output is not a probability vector: {0}")]
    InvalidScores(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}

impl From<ort::Error> for ClassifierError {
    fn from(err: ort::Error) -> Self {
        ClassifierError::Inference(err.to_string())
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ModelLoad,
    ImageDecode,
    Inference,
    Config,
}

#[derive(Debug, Serialize)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        AppError {
            kind,
            message: message.into(),
        }
    }

    pub fn inference(message: impl Into<String>) -> Self {
        AppError::new(ErrorKind::Inference, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        AppError::new(ErrorKind::Config, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl From<ClassifierError> for AppError {
    fn from(err: ClassifierError) -> Self {
        let kind = match err {
            ClassifierError::ModelLoad(_) => ErrorKind::ModelLoad,
            ClassifierError::ImageDecode { .. } => ErrorKind::ImageDecode,
            ClassifierError::ShapeMismatch { .. }
            | ClassifierError::InvalidScores(_)
            | ClassifierError::Inference(_) => ErrorKind::Inference,
        };
        AppError {
            kind,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_surfaces_as_inference_kind() {
        let err: AppError = ClassifierError::ShapeMismatch {
            expected: 8,
            actual: 5,
        }
        .into();
        assert_eq!(err.kind, ErrorKind::Inference);
        assert!(err.message.contains("5 scores"));
    }

    #[test]
    fn decode_error_keeps_file_name() {
        let err: AppError = ClassifierError::ImageDecode {
            name: "broken.png".into(),
            reason: "bad header".into(),
        }
        .into();
        assert_eq!(err.kind, ErrorKind::ImageDecode);
        assert_eq!(err.message, "Failed to decode image broken.png: bad header");
    }

    #[test]
    fn app_error_serializes_kind_in_snake_case() {
        let err = AppError::new(ErrorKind::ModelLoad, "missing file");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "model_load");
        assert_eq!(json["message"], "missing file");
    }
}
