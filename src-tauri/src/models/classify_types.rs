use serde::{Deserialize, Serialize};

/// Outcome of one forward pass, before any display formatting.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CategoryPrediction {
    pub category: String,
    pub confidence: f32,
    pub scores: Vec<f32>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ScoreLine {
    pub category: String,
    pub label: String,
    pub score: f32,
    pub score_text: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PredictionView {
    pub file_name: String,
    pub category: String,
    pub label: String,
    pub emoji: String,
    pub color: String,
    pub confidence: f32,
    pub confidence_text: String,
    pub success_text: String,
    pub banner_text: String,
    pub scores: Option<Vec<ScoreLine>>,
}

#[derive(Debug, Serialize, Clone)]
pub struct UploadView {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub preview: String,
    pub prediction: Option<PredictionView>,
}

#[derive(Debug, Serialize, Clone)]
pub struct UploadOutcome {
    pub file_name: String,
    pub upload: Option<UploadView>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct SessionView {
    pub uploads: Vec<UploadView>,
    pub show_info: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub data_base64: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct CategoryView {
    pub key: String,
    pub label: String,
    pub emoji: String,
    pub color: String,
}
