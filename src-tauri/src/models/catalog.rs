use crate::error::ClassifierError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

const DEFAULT_EMOJI: &str = "🏷️";
const DEFAULT_COLOR: &str = "gray";

// Index order matches the class order the bundled models were trained with.
const ENGLISH: [(&str, &str, &str); 8] = [
    ("electronics", "🔌", "blue"),
    ("pet_products", "🐶", "green"),
    ("home_goods", "🏠", "orange"),
    ("stationery", "✏️", "purple"),
    ("fashion", "👗", "red"),
    ("sports_products", "🏀", "pink"),
    ("cleaning", "🧹", "cyan"),
    ("food_and_drink", "🍎", "brown"),
];

const TURKISH: [(&str, &str, &str); 8] = [
    ("elektronik", "🔌", "blue"),
    ("evcil_hayvan_urunleri", "🐶", "green"),
    ("ev_esyalari", "🏠", "orange"),
    ("kirtasiye", "✏️", "purple"),
    ("moda", "👗", "red"),
    ("spor_urunleri", "🏀", "pink"),
    ("temizlik", "🧹", "cyan"),
    ("yiyecek_icecek", "🍎", "brown"),
];

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Category {
    pub key: String,
    pub emoji: String,
    pub color: String,
}

impl Category {
    pub fn new(key: impl Into<String>, emoji: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            emoji: emoji.into(),
            color: color.into(),
        }
    }
}

/// Ordered category list. Position `i` names the model's output index `i`.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

/// On-disk catalog: `id2label` binds every output index to a key explicitly.
#[derive(Deserialize)]
struct CatalogFile {
    id2label: HashMap<String, String>,
    #[serde(default)]
    emoji: HashMap<String, String>,
    #[serde(default)]
    colors: HashMap<String, String>,
}

impl CategoryCatalog {
    pub fn new(categories: Vec<Category>) -> Result<Self, ClassifierError> {
        if categories.is_empty() {
            return Err(ClassifierError::ModelLoad(
                "Category catalog is empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for category in &categories {
            if category.key.trim().is_empty() {
                return Err(ClassifierError::ModelLoad(
                    "Category catalog contains an empty key".to_string(),
                ));
            }
            if !seen.insert(category.key.as_str()) {
                return Err(ClassifierError::ModelLoad(format!(
                    "Duplicate category key in catalog: {}",
                    category.key
                )));
            }
        }

        Ok(Self { categories })
    }

    pub fn english() -> Self {
        Self::from_preset(&ENGLISH)
    }

    pub fn turkish() -> Self {
        Self::from_preset(&TURKISH)
    }

    fn from_preset(preset: &[(&str, &str, &str)]) -> Self {
        Self {
            categories: preset
                .iter()
                .map(|(key, emoji, color)| Category::new(*key, *emoji, *color))
                .collect(),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self, ClassifierError> {
        let file: CatalogFile = serde_json::from_str(content).map_err(|e| {
            ClassifierError::ModelLoad(format!("Failed to parse catalog JSON: {}", e))
        })?;

        let mut indexed: Vec<(usize, String)> = file
            .id2label
            .into_iter()
            .map(|(k, v)| {
                k.trim()
                    .parse::<usize>()
                    .map(|idx| (idx, v))
                    .map_err(|_| {
                        ClassifierError::ModelLoad(format!("Invalid class index in id2label: {:?}", k))
                    })
            })
            .collect::<Result<_, _>>()?;
        indexed.sort_by_key(|(idx, _)| *idx);

        for pair in indexed.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(ClassifierError::ModelLoad(format!(
                    "id2label has duplicate index {}",
                    pair[0].0
                )));
            }
        }

        for (expected, (idx, _)) in indexed.iter().enumerate() {
            if *idx != expected {
                return Err(ClassifierError::ModelLoad(format!(
                    "id2label indices must be contiguous from 0, missing index {}",
                    expected
                )));
            }
        }

        let categories = indexed
            .into_iter()
            .map(|(_, key)| {
                let emoji = file
                    .emoji
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_EMOJI.to_string());
                let color = file
                    .colors
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_COLOR.to_string());
                Category { key, emoji, color }
            })
            .collect();

        Self::new(categories)
    }

    pub fn from_file(path: &Path) -> Result<Self, ClassifierError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClassifierError::ModelLoad(format!(
                "Failed to read catalog file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&content)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    pub fn find(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.key.as_str()).collect()
    }
}
