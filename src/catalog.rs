//! Investment product catalog
//!
//! Loaded once at startup from a CSV or JSON file and never mutated afterwards.
//! Shared across request handlers behind an `Arc`.

use crate::error::AssistantError;
use crate::models::{Product, ProductFilter};
use crate::Result;
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Load the catalog from `.csv` or `.json`, preserving source order.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(AssistantError::DataLoadError(format!(
                "catalog file not found: {}",
                path.display()
            )));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let products = match extension.as_deref() {
            Some("csv") => read_csv(path)?,
            Some("json") => read_json(path)?,
            _ => {
                return Err(AssistantError::DataLoadError(format!(
                    "unsupported catalog format: {}",
                    path.display()
                )))
            }
        };

        let catalog = Self::new(products);

        if catalog.is_empty() {
            warn!("Catalog {} contains no products", path.display());
        }

        for product in catalog.products.iter().filter(|p| !p.has_known_risk_level()) {
            warn!(
                product = %product.name,
                risk_level = %product.risk_level,
                "Unrecognized risk level in catalog"
            );
        }

        info!(
            products = catalog.len(),
            fingerprint = %catalog.fingerprint(),
            "Catalog loaded from {}",
            path.display()
        );

        Ok(catalog)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name)
    }

    /// Products matching every given predicate, in catalog order.
    pub fn filter(&self, filter: &ProductFilter) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect()
    }

    /// Textual dump of every product, embedded in advisor prompts.
    pub fn render_table(&self) -> String {
        if self.products.is_empty() {
            return "(no products available)".to_string();
        }

        self.products
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{}. {}", i + 1, p))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// SHA-256 over the serialized product list.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();

        match serde_json::to_vec(&self.products) {
            Ok(bytes) => hasher.update(&bytes),
            Err(_) => return String::new(),
        }

        hex::encode(hasher.finalize())
    }
}

fn read_csv(path: &Path) -> Result<Vec<Product>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| {
            AssistantError::DataLoadError(format!("failed to open {}: {}", path.display(), e))
        })?;

    reader
        .deserialize::<Product>()
        .enumerate()
        .map(|(i, row)| {
            row.map_err(|e| {
                AssistantError::DataLoadError(format!(
                    "malformed record {} in {}: {}",
                    i + 1,
                    path.display(),
                    e
                ))
            })
        })
        .collect()
}

fn read_json(path: &Path) -> Result<Vec<Product>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        AssistantError::DataLoadError(format!("failed to read {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&raw).map_err(|e| {
        AssistantError::DataLoadError(format!("malformed JSON in {}: {}", path.display(), e))
    })
}
