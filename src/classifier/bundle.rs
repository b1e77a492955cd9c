use std::{collections::HashMap, fs, path::Path};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::ModelError;

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid regex"));

/// On-disk layout of a trained model: a fitted TF-IDF vectorizer next to a
/// fitted linear classifier.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelBundle {
    pub vectorizer: TfIdfVectorizer,
    pub classifier: LinearClassifier,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TfIdfVectorizer {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinearClassifier {
    pub coef: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    0.5
}

impl ModelBundle {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let raw = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        let bundle: ModelBundle = serde_json::from_str(raw)?;
        bundle.validate()?;
        Ok(bundle)
    }

    fn validate(&self) -> Result<(), ModelError> {
        let features = self.vectorizer.vocabulary.len();
        if self.vectorizer.idf.len() != features {
            return Err(ModelError::Incompatible(format!(
                "vectorizer has {features} terms but {} idf weights",
                self.vectorizer.idf.len()
            )));
        }
        if self.classifier.coef.len() != features {
            return Err(ModelError::Incompatible(format!(
                "classifier expects {} features, vectorizer produces {features}",
                self.classifier.coef.len()
            )));
        }
        if let Some((term, index)) = self
            .vectorizer
            .vocabulary
            .iter()
            .find(|(_, &index)| index >= features)
        {
            return Err(ModelError::Incompatible(format!(
                "term {term:?} maps to out-of-range column {index}"
            )));
        }
        let finite = self
            .vectorizer
            .idf
            .iter()
            .chain(&self.classifier.coef)
            .chain([&self.classifier.intercept, &self.classifier.threshold])
            .all(|v| v.is_finite());
        if !finite {
            return Err(ModelError::Incompatible("non-finite weight".into()));
        }
        if !(0.0..=1.0).contains(&self.classifier.threshold) {
            return Err(ModelError::Incompatible(format!(
                "threshold {} outside [0, 1]",
                self.classifier.threshold
            )));
        }
        Ok(())
    }
}

impl TfIdfVectorizer {
    /// Sparse TF-IDF row for one document, as (column, weight) pairs.
    pub fn transform(&self, document: &str) -> Vec<(usize, f64)> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in TOKEN.find_iter(&document.to_lowercase()) {
            if let Some(&column) = self.vocabulary.get(token.as_str()) {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }

        let mut row: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(column, count)| {
                let tf = if self.sublinear_tf { count.ln() + 1.0 } else { count };
                (column, tf * self.idf[column])
            })
            .collect();
        row.sort_unstable_by_key(|(column, _)| *column);

        let scale = match self.norm {
            Some(Norm::L2) => row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt(),
            Some(Norm::L1) => row.iter().map(|(_, w)| w.abs()).sum::<f64>(),
            None => 1.0,
        };
        if scale > 0.0 {
            for (_, weight) in &mut row {
                *weight /= scale;
            }
        }
        row
    }
}

impl LinearClassifier {
    pub fn decision(&self, row: &[(usize, f64)]) -> f64 {
        row.iter()
            .map(|&(column, weight)| self.coef[column] * weight)
            .sum::<f64>()
            + self.intercept
    }

    /// Probability of class index 1.
    pub fn probability(&self, row: &[(usize, f64)]) -> f64 {
        sigmoid(self.decision(row))
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
