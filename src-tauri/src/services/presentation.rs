use crate::error::ClassifierError;
use crate::models::catalog::CategoryCatalog;
use crate::models::classify_types::{CategoryPrediction, CategoryView, PredictionView, ScoreLine};
use crate::models::locale::UiText;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use std::io::Cursor;

const PREVIEW_QUALITY: u8 = 80;
const FALLBACK_EMOJI: &str = "🏷️";
const FALLBACK_COLOR: &str = "gray";

/// `home_goods` -> `Home goods`
pub fn humanize_label(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

pub fn format_confidence(confidence: f32) -> String {
    format!("{:.2}", confidence)
}

pub fn category_views(catalog: &CategoryCatalog) -> Vec<CategoryView> {
    catalog
        .iter()
        .map(|c| CategoryView {
            key: c.key.clone(),
            label: humanize_label(&c.key),
            emoji: c.emoji.clone(),
            color: c.color.clone(),
        })
        .collect()
}

pub fn prediction_view(
    file_name: &str,
    prediction: &CategoryPrediction,
    catalog: &CategoryCatalog,
    ui: &UiText,
    show_scores: bool,
) -> PredictionView {
    let label = humanize_label(&prediction.category);
    let (emoji, color) = catalog
        .find(&prediction.category)
        .map(|c| (c.emoji.clone(), c.color.clone()))
        .unwrap_or_else(|| (FALLBACK_EMOJI.to_string(), FALLBACK_COLOR.to_string()));

    let scores = show_scores.then(|| {
        catalog
            .iter()
            .zip(prediction.scores.iter())
            .map(|(c, &score)| ScoreLine {
                category: c.key.clone(),
                label: humanize_label(&c.key),
                score,
                score_text: format!("{:.4}", score),
            })
            .collect()
    });

    PredictionView {
        file_name: file_name.to_string(),
        category: prediction.category.clone(),
        success_text: format!("{} {}", ui.success_prefix, label),
        banner_text: format!("{} {}", ui.banner_prefix, label),
        label,
        emoji,
        color,
        confidence: prediction.confidence,
        confidence_text: format_confidence(prediction.confidence),
        scores,
    }
}

/// Downscale to `width` (never upscale) and return a JPEG data URI for display.
pub fn preview_data_uri(img: &DynamicImage, width: u32) -> Result<String, ClassifierError> {
    let preview = if img.width() > width {
        let height = ((img.height() as f64 * width as f64) / img.width() as f64)
            .round()
            .max(1.0) as u32;
        img.resize_exact(width, height, FilterType::Triangle)
    } else {
        img.clone()
    };

    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgb8(preview.to_rgb8());

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, PREVIEW_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| ClassifierError::Inference(format!("Failed to encode preview: {}", e)))?;

    let b64 = base64::engine::general_purpose::STANDARD.encode(buffer.into_inner());
    Ok(format!("data:image/jpeg;base64,{}", b64))
}
