use crate::config::Settings;
use crate::error::ClassifierError;
use crate::models::catalog::CategoryCatalog;
use crate::models::classify_types::CategoryPrediction;
use crate::services::classifier::inference::{self, Classifier, INPUT_SIZE};
use image::DynamicImage;
use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// ONNX Runtime session exported from the trained Keras model.
pub struct OnnxClassifier {
    session: Session,
    input_name: String,
}

impl OnnxClassifier {
    pub fn load(model_path: &Path, use_gpu: bool, intra_threads: usize) -> Result<Self, ClassifierError> {
        if !model_path.exists() {
            return Err(ClassifierError::ModelLoad(format!(
                "Model file not found: {}",
                model_path.display()
            )));
        }

        let _ = ort::init().with_name("product-lens").commit();

        let mut builder = Session::builder()
            .map_err(|e| ClassifierError::ModelLoad(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)
            .map_err(|e| ClassifierError::ModelLoad(format!("Failed to set optimization level: {}", e)))?
            .with_intra_threads(intra_threads)
            .map_err(|e| ClassifierError::ModelLoad(format!("Failed to set intra threads: {}", e)))?;

        if use_gpu {
            builder = builder
                .with_execution_providers([
                    ort::execution_providers::CUDAExecutionProvider::default().build(),
                    ort::execution_providers::CoreMLExecutionProvider::default().build(),
                    ort::execution_providers::CPUExecutionProvider::default().build(),
                ])
                .map_err(|e| {
                    ClassifierError::ModelLoad(format!("Failed to register GPU execution providers: {}", e))
                })?;
        } else {
            builder = builder
                .with_execution_providers([ort::execution_providers::CPUExecutionProvider::default().build()])
                .map_err(|e| {
                    ClassifierError::ModelLoad(format!("Failed to register CPU execution provider: {}", e))
                })?;
        }

        let session = builder
            .commit_from_file(model_path)
            .map_err(|e| ClassifierError::ModelLoad(format!("Failed to load ONNX model: {}", e)))?;

        let input_name = session
            .inputs()
            .first()
            .map(|input| input.name().to_string())
            .ok_or_else(|| ClassifierError::ModelLoad("Model declares no inputs".to_string()))?;

        Ok(Self { session, input_name })
    }
}

impl Classifier for OnnxClassifier {
    fn forward(&mut self, input: Array4<f32>) -> Result<Vec<f32>, ClassifierError> {
        let input_tensor = Value::from_array(input)
            .map_err(|e| ClassifierError::Inference(format!("Failed to create tensor value: {}", e)))?;

        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])?;

        let output_value = outputs
            .values()
            .next()
            .ok_or_else(|| ClassifierError::Inference("Model produced no outputs".to_string()))?;

        let (_, data) = output_value
            .try_extract_tensor::<f32>()
            .map_err(|e| ClassifierError::Inference(format!("Failed to extract output tensor: {}", e)))?;

        Ok(data.to_vec())
    }
}

/// The loaded model paired with the catalog that names its outputs.
///
/// Cloning is cheap; every clone shares the same model lock, so forward passes
/// run one at a time no matter which command issues them.
#[derive(Clone)]
pub struct ModelContext {
    model: Arc<Mutex<Box<dyn Classifier>>>,
    catalog: Arc<CategoryCatalog>,
    score_sum_tolerance: f32,
}

impl ModelContext {
    /// Wrap a classifier without probing it.
    pub fn new(classifier: Box<dyn Classifier>, catalog: CategoryCatalog, score_sum_tolerance: f32) -> Self {
        Self {
            model: Arc::new(Mutex::new(classifier)),
            catalog: Arc::new(catalog),
            score_sum_tolerance,
        }
    }

    /// Wrap a classifier after checking that its output length matches the catalog.
    pub fn bind(
        mut classifier: Box<dyn Classifier>,
        catalog: CategoryCatalog,
        score_sum_tolerance: f32,
    ) -> Result<Self, ClassifierError> {
        let size = INPUT_SIZE as usize;
        let blank = Array4::<f32>::zeros((1, size, size, 3));
        let scores = classifier
            .forward(blank)
            .map_err(|e| ClassifierError::ModelLoad(format!("Check inference on a blank input failed: {}", e)))?;

        if scores.len() != catalog.len() {
            return Err(ClassifierError::ModelLoad(format!(
                "Model outputs {} scores but the catalog lists {} categories ({})",
                scores.len(),
                catalog.len(),
                catalog.keys().join(", ")
            )));
        }
        debug!("Check inference returned {} scores", scores.len());

        Ok(Self::new(classifier, catalog, score_sum_tolerance))
    }

    pub fn load(settings: &Settings) -> Result<Self, ClassifierError> {
        let catalog = match &settings.catalog_path {
            Some(path) => CategoryCatalog::from_file(path)?,
            None => settings.locale.default_catalog(),
        };

        info!(
            "Loading model {} (gpu: {}, categories: {})",
            settings.model_path.display(),
            settings.use_gpu,
            catalog.len()
        );
        let classifier = OnnxClassifier::load(&settings.model_path, settings.use_gpu, settings.intra_threads)?;

        let context = Self::bind(Box::new(classifier), catalog, settings.score_sum_tolerance)?;
        info!("Model ready");
        Ok(context)
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    pub fn classify(&self, img: &DynamicImage) -> Result<CategoryPrediction, ClassifierError> {
        let mut guard = self
            .model
            .lock()
            .map_err(|_| ClassifierError::Inference("Model lock poisoned".to_string()))?;
        inference::classify_image_with_model(guard.as_mut(), img, &self.catalog, self.score_sum_tolerance)
    }
}
