use crate::error::ClassifierError;
use crate::models::catalog::CategoryCatalog;
use crate::models::classify_types::CategoryPrediction;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use ndarray::Array4;
use std::io::Cursor;

/// Side length of the square input the product models were trained on.
pub const INPUT_SIZE: u32 = 96;

/// A loaded model that maps one NHWC batch of shape (1, 96, 96, 3) to per-category scores.
pub trait Classifier: Send {
    fn forward(&mut self, input: Array4<f32>) -> Result<Vec<f32>, ClassifierError>;
}

pub fn decode_image(name: &str, bytes: &[u8]) -> Result<DynamicImage, ClassifierError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ClassifierError::ImageDecode {
            name: name.to_string(),
            reason: e.to_string(),
        })?
        .decode()
        .map_err(|e| ClassifierError::ImageDecode {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

/// Resize to 96x96 (aspect ratio is not kept), scale to [0,1] and add the batch axis.
pub fn preprocess_image(img: &DynamicImage) -> Result<Array4<f32>, ClassifierError> {
    let resized = img.resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::CatmullRom);
    let rgb = resized.to_rgb8();

    // RgbImage is already row-major HWC, which is the layout the model expects.
    let data: Vec<f32> = rgb
        .into_raw()
        .into_iter()
        .map(|v| v as f32 / 255.0)
        .collect();

    Array4::from_shape_vec((1, INPUT_SIZE as usize, INPUT_SIZE as usize, 3), data)
        .map_err(|e| ClassifierError::Inference(format!("Failed to create tensor: {}", e)))
}

/// Pick the best category from a probability vector.
///
/// The vector must line up with the catalog and already be normalized (softmax head);
/// the winning score is reported as-is as the confidence.
pub fn postprocess_scores(
    scores: &[f32],
    catalog: &CategoryCatalog,
    score_sum_tolerance: f32,
) -> Result<CategoryPrediction, ClassifierError> {
    if scores.len() != catalog.len() {
        return Err(ClassifierError::ShapeMismatch {
            expected: catalog.len(),
            actual: scores.len(),
        });
    }

    for (idx, &score) in scores.iter().enumerate() {
        if !score.is_finite() {
            return Err(ClassifierError::InvalidScores(format!(
                "score at index {} is not finite",
                idx
            )));
        }
        if score < -score_sum_tolerance || score > 1.0 + score_sum_tolerance {
            return Err(ClassifierError::InvalidScores(format!(
                "score {} at index {} is outside [0, 1]",
                score, idx
            )));
        }
    }

    let sum: f32 = scores.iter().sum();
    if (sum - 1.0).abs() > score_sum_tolerance {
        return Err(ClassifierError::InvalidScores(format!(
            "scores sum to {:.4}, expected 1.0",
            sum
        )));
    }

    // First maximum wins, like numpy's argmax.
    let (best_idx, best_score) = scores
        .iter()
        .copied()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (idx, score)| {
            if score > best.1 {
                (idx, score)
            } else {
                best
            }
        });

    let category = catalog
        .get(best_idx)
        .map(|c| c.key.clone())
        .ok_or(ClassifierError::ShapeMismatch {
            expected: catalog.len(),
            actual: scores.len(),
        })?;

    Ok(CategoryPrediction {
        category,
        confidence: best_score.clamp(0.0, 1.0),
        scores: scores.to_vec(),
    })
}

pub fn classify_image_with_model(
    model: &mut dyn Classifier,
    img: &DynamicImage,
    catalog: &CategoryCatalog,
    score_sum_tolerance: f32,
) -> Result<CategoryPrediction, ClassifierError> {
    let tensor = preprocess_image(img)?;
    let scores = model.forward(tensor)?;

    tracing::debug!(
        "Raw predictions: {}",
        catalog
            .iter()
            .zip(scores.iter())
            .map(|(c, s)| format!("{}={:.4}", c.key, s))
            .collect::<Vec<_>>()
            .join(", ")
    );

    postprocess_scores(&scores, catalog, score_sum_tolerance)
}
