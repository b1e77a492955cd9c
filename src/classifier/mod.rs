use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::{ClassificationResult, NormalizedDocument, Verdict};

pub mod bundle;

pub use bundle::ModelBundle;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model bundle {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model bundle is not valid: {0}")]
    Format(#[from] serde_json::Error),
    #[error("model bundle is incompatible: {0}")]
    Incompatible(String),
}

pub trait SiteClassifier: Send + Sync {
    fn classify(&self, document: &NormalizedDocument) -> Result<ClassificationResult, ModelError>;
}

/// Scores documents with a bundle loaded once at startup.
pub struct BundleClassifier {
    bundle: ModelBundle,
}

impl BundleClassifier {
    pub fn new(bundle: ModelBundle) -> Self {
        Self { bundle }
    }

    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let bundle = ModelBundle::load(path)?;
        tracing::info!(
            target: "model",
            path = %path.display(),
            features = bundle.vectorizer.vocabulary.len(),
            "model bundle loaded"
        );
        Ok(Self::new(bundle))
    }
}

impl SiteClassifier for BundleClassifier {
    fn classify(&self, document: &NormalizedDocument) -> Result<ClassificationResult, ModelError> {
        let row = self.bundle.vectorizer.transform(&document.text);
        let probability = self.bundle.classifier.probability(&row);
        if !probability.is_finite() {
            return Err(ModelError::Incompatible(format!(
                "classifier produced {probability} for {}",
                document.url
            )));
        }

        let verdict = if probability >= self.bundle.classifier.threshold {
            Verdict::Safe
        } else {
            Verdict::Malicious
        };
        tracing::debug!(
            target: "model",
            url = %document.url,
            active_features = row.len(),
            probability,
            verdict = %verdict,
            "document classified"
        );
        Ok(ClassificationResult {
            verdict,
            probability,
        })
    }
}
