use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use ndarray::Array4;

use product_lens_lib::config::Settings;
use product_lens_lib::error::{ClassifierError, ErrorKind};
use product_lens_lib::models::catalog::CategoryCatalog;
use product_lens_lib::models::locale::Locale;
use product_lens_lib::services::classifier::inference::Classifier;
use product_lens_lib::services::classifier::model_context::ModelContext;
use product_lens_lib::services::session::SessionState;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Puts 0.9 on the bucket of the mean red channel and spreads the rest evenly.
struct RedBucketModel {
    classes: usize,
    calls: Arc<AtomicUsize>,
}

impl Classifier for RedBucketModel {
    fn forward(&mut self, input: Array4<f32>) -> Result<Vec<f32>, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let red: Vec<f32> = input.iter().step_by(3).copied().collect();
        let mean = red.iter().sum::<f32>() / red.len() as f32;
        let hot = ((mean * self.classes as f32) as usize).min(self.classes - 1);
        let rest = 0.1 / (self.classes - 1) as f32;
        Ok((0..self.classes)
            .map(|i| if i == hot { 0.9 } else { rest })
            .collect())
    }
}

struct LogitModel;

impl Classifier for LogitModel {
    fn forward(&mut self, _input: Array4<f32>) -> Result<Vec<f32>, ClassifierError> {
        Ok(vec![3.2, -1.0, 0.4, 0.0, 0.0, 0.0, 0.0, 0.0])
    }
}

fn model(catalog: CategoryCatalog) -> (ModelContext, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let classifier = RedBucketModel {
        classes: catalog.len(),
        calls: Arc::clone(&calls),
    };
    let context = ModelContext::bind(Box::new(classifier), catalog, 0.01)
        .map_err(|e| e.to_string())
        .expect("fake model should bind");
    (context, calls)
}

fn encoded(red: u8, width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([red, 40, 40])));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format).expect("encode fixture image");
    buffer.into_inner()
}

#[test]
fn test_predict_records_result_per_file() {
    let (model, _) = model(CategoryCatalog::english());
    let session = SessionState::new(&Settings::default());

    // Red 80 of 255 lands in bucket 2 of 8: home_goods.
    session
        .upload("lamp.png", &encoded(80, 640, 480, ImageFormat::Png))
        .expect("upload lamp");
    session
        .upload("dress.jpg", &encoded(150, 300, 900, ImageFormat::Jpeg))
        .expect("upload dress");

    let lamp = session.predict(&model, "lamp.png").expect("predict lamp");
    assert_eq!(lamp.category, "home_goods");
    assert_eq!(lamp.label, "Home goods");
    assert_eq!(lamp.color, "orange");
    assert_eq!(lamp.confidence_text, "0.90");
    assert!(lamp.scores.is_none(), "English build hides the raw scores");

    let view = session.snapshot(model.catalog()).expect("snapshot");
    let names: Vec<&str> = view.uploads.iter().map(|u| u.file_name.as_str()).collect();
    assert_eq!(names, vec!["lamp.png", "dress.jpg"]);
    assert!(view.uploads[0].prediction.is_some());
    assert!(view.uploads[1].prediction.is_none(), "prediction is never automatic");
    assert_eq!((view.uploads[1].width, view.uploads[1].height), (300, 900));
}

#[test]
fn test_repeated_predict_overwrites() {
    let (model, calls) = model(CategoryCatalog::english());
    let session = SessionState::new(&Settings::default());
    session
        .upload("mug.png", &encoded(20, 50, 50, ImageFormat::Png))
        .expect("upload");

    let first = session.predict(&model, "mug.png").expect("first predict");
    let second = session.predict(&model, "mug.png").expect("second predict");
    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 3, "bind check plus one pass per trigger");

    let view = session.snapshot(model.catalog()).expect("snapshot");
    assert_eq!(view.uploads.len(), 1);
    assert_eq!(view.uploads[0].prediction.as_ref().map(|p| p.category.as_str()), Some("electronics"));
}

#[test]
fn test_clear_predictions_keeps_uploads() {
    let (model, _) = model(CategoryCatalog::english());
    let session = SessionState::new(&Settings::default());
    for (name, red) in [("a.png", 10), ("b.png", 120), ("c.png", 250)] {
        session
            .upload(name, &encoded(red, 32, 32, ImageFormat::Png))
            .expect("upload");
        session.predict(&model, name).expect("predict");
    }

    session.clear_predictions().expect("clear");
    let view = session.snapshot(model.catalog()).expect("snapshot");
    assert_eq!(view.uploads.len(), 3);
    assert!(view.uploads.iter().all(|u| u.prediction.is_none()));

    session.clear_predictions().expect("clearing an empty map is fine");
}

#[test]
fn test_bad_upload_does_not_affect_others() {
    let session = SessionState::new(&Settings::default());
    let outcomes = session.upload_many(vec![
        ("good.png".to_string(), Ok(encoded(90, 20, 20, ImageFormat::Png))),
        ("broken.png".to_string(), Ok(b"\x89PNG but not really".to_vec())),
        ("scan.gif".to_string(), Ok(encoded(90, 20, 20, ImageFormat::Png))),
        ("also-good.jpeg".to_string(), Ok(encoded(90, 20, 20, ImageFormat::Jpeg))),
    ]);

    let failed: Vec<&str> = outcomes
        .iter()
        .filter(|o| o.error.is_some())
        .map(|o| o.file_name.as_str())
        .collect();
    assert_eq!(failed, vec!["broken.png", "scan.gif"]);

    let (model, _) = model(CategoryCatalog::english());
    let view = session.snapshot(model.catalog()).expect("snapshot");
    assert_eq!(view.uploads.len(), 2);
}

#[test]
fn test_unnormalized_output_is_reported_and_session_survives() {
    let context = ModelContext::new(Box::new(LogitModel), CategoryCatalog::english(), 0.01);
    let session = SessionState::new(&Settings::default());
    session
        .upload("shoe.png", &encoded(200, 64, 64, ImageFormat::Png))
        .expect("upload");

    let err = session.predict(&context, "shoe.png").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Inference);
    assert!(err.message.contains("not a probability vector"));

    let view = session.snapshot(context.catalog()).expect("snapshot");
    assert_eq!(view.uploads.len(), 1);
    assert!(view.uploads[0].prediction.is_none());
}

#[test]
fn test_predict_unknown_file_is_inference_error() {
    let (model, _) = model(CategoryCatalog::english());
    let session = SessionState::new(&Settings::default());
    let err = session.predict(&model, "ghost.png").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Inference);
}

#[test]
fn test_turkish_session_shows_scores_and_localized_texts() {
    let settings = Settings {
        locale: Locale::Turkish,
        ..Settings::default()
    };
    let (model, _) = model(CategoryCatalog::turkish());
    let session = SessionState::new(&settings);
    session
        .upload("elma.png", &encoded(255, 40, 40, ImageFormat::Png))
        .expect("upload");

    let prediction = session.predict(&model, "elma.png").expect("predict");
    assert_eq!(prediction.category, "yiyecek_icecek");
    assert_eq!(prediction.banner_text, "Tahmin Edilen Kategori: Yiyecek icecek");
    let scores = prediction.scores.expect("Turkish build dumps raw scores");
    assert_eq!(scores.len(), 8);
    assert_eq!(scores[7].score_text, "0.9000");
}

#[test]
fn test_toggle_info_is_reflected_in_snapshot() {
    let (model, _) = model(CategoryCatalog::english());
    let session = SessionState::new(&Settings::default());
    assert!(!session.snapshot(model.catalog()).expect("snapshot").show_info);
    assert!(session.toggle_info().expect("toggle"));
    assert!(session.snapshot(model.catalog()).expect("snapshot").show_info);
    assert!(!session.toggle_info().expect("toggle"));
}

#[test]
fn test_catalog_file_binds_custom_model() {
    let catalog = CategoryCatalog::from_file(&fixture_path("catalog.json")).expect("fixture catalog");
    assert_eq!(catalog.keys(), vec!["books", "garden", "toys"]);

    let (model, _) = model(catalog);
    let session = SessionState::new(&Settings::default());
    session
        .upload("bear.png", &encoded(240, 16, 16, ImageFormat::Png))
        .expect("upload");
    let prediction = session.predict(&model, "bear.png").expect("predict");
    assert_eq!(prediction.category, "toys");
    assert_eq!(prediction.color, "gold");
    assert_eq!(prediction.emoji, "🧸");
}

#[test]
fn test_catalog_mismatch_fails_at_bind() {
    let classifier = RedBucketModel {
        classes: 5,
        calls: Arc::new(AtomicUsize::new(0)),
    };
    let err = ModelContext::bind(Box::new(classifier), CategoryCatalog::english(), 0.01)
        .err()
        .expect("mismatch must fail");
    assert!(matches!(err, ClassifierError::ModelLoad(_)));
}
