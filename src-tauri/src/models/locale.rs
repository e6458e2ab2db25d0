use crate::models::catalog::CategoryCatalog;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "tr")]
    Turkish,
}

#[derive(Debug, Serialize, Clone)]
pub struct ProjectDetails {
    pub heading: &'static str,
    pub summary: &'static str,
    pub models_heading: &'static str,
    pub models: &'static [&'static str],
    pub goals_heading: &'static str,
    pub goals: &'static [&'static str],
}

#[derive(Debug, Serialize, Clone)]
pub struct Contact {
    pub email: &'static str,
    pub linkedin_url: &'static str,
    pub linkedin_label: &'static str,
}

/// Every static string the frontend renders.
#[derive(Debug, Serialize, Clone)]
pub struct UiText {
    pub page_title: &'static str,
    pub title: &'static str,
    pub brand: &'static str,
    pub info_header: &'static str,
    pub info_blurb: &'static str,
    pub more_info_button: &'static str,
    pub project_details: ProjectDetails,
    pub categories_header: &'static str,
    pub upload_label: &'static str,
    pub image_caption: &'static str,
    pub predict_button: &'static str,
    pub success_prefix: &'static str,
    pub confidence_label: &'static str,
    pub banner_prefix: &'static str,
    pub raw_scores_header: &'static str,
    pub reset_button: &'static str,
    pub contact: Option<Contact>,
}

impl Locale {
    pub fn default_catalog(&self) -> CategoryCatalog {
        match self {
            Locale::English => CategoryCatalog::english(),
            Locale::Turkish => CategoryCatalog::turkish(),
        }
    }

    /// The Turkish build dumped raw scores next to each prediction; the English one did not.
    pub fn shows_scores_by_default(&self) -> bool {
        matches!(self, Locale::Turkish)
    }

    pub fn ui_text(&self) -> UiText {
        match self {
            Locale::English => UiText {
                page_title: "Product Category Prediction",
                title: "🛍️ Product Category Prediction App",
                brand: "EMSBAY HANDEL",
                info_header: "Information",
                info_blurb: "This application predicts the product category based on the uploaded image.",
                more_info_button: "More Information",
                project_details: ProjectDetails {
                    heading: "Project Details",
                    summary: "This project predicts product categories using various machine learning models.",
                    models_heading: "Model Used:",
                    models: &["Xception (Chosen for its best score)"],
                    goals_heading: "Goals:",
                    goals: &[
                        "Increase accuracy.",
                        "Enhance user experience.",
                        "Reduce processing time.",
                    ],
                },
                categories_header: "Categories",
                upload_label: "Upload Images",
                image_caption: "Uploaded Image",
                predict_button: "Predict",
                success_prefix: "This product category is:",
                confidence_label: "Confidence",
                banner_prefix: "Predicted Category:",
                raw_scores_header: "Raw Predictions",
                reset_button: "Add New Product",
                contact: Some(Contact {
                    email: "cobanabdullahgazi@gmail.com",
                    linkedin_url: "https://www.linkedin.com/in/abdullah-gazi-coban",
                    linkedin_label: "LinkedIn",
                }),
            },
            Locale::Turkish => UiText {
                page_title: "Ürün Kategori Tahmini",
                title: "🛍️ Ürün Kategori Tahmini Uygulaması",
                brand: "EMBASSY",
                info_header: "Bilgi",
                info_blurb: "Bu uygulama, yüklenen görüntüye dayalı olarak ürün kategorisini tahmin eder.",
                more_info_button: "Daha Fazla Bilgi",
                project_details: ProjectDetails {
                    heading: "Proje Detayları",
                    summary: "Bu proje, çeşitli makine öğrenimi modelleri kullanarak ürün kategorilerini tahmin eder.",
                    models_heading: "Kullanılan Modeller:",
                    models: &["Xception", "MobileNetV2", "Özel CNN Modeliniz", "ResNet50"],
                    goals_heading: "Amaçlar:",
                    goals: &[
                        "Doğruluğu artırmak.",
                        "Kullanıcı deneyimini geliştirmek.",
                        "İşleme süresini azaltmak.",
                    ],
                },
                categories_header: "Kategoriler",
                upload_label: "Görüntüleri yükle",
                image_caption: "Yüklenen Görüntü",
                predict_button: "Tahmin Et",
                success_prefix: "Bu ürün kategorisi:",
                confidence_label: "Güven",
                banner_prefix: "Tahmin Edilen Kategori:",
                raw_scores_header: "Ham Tahminler",
                reset_button: "Yeni Ürün Ekle",
                contact: None,
            },
        }
    }
}
