//! Pre-fit text classifier: a TF-IDF vectorizer feeding a linear model.
//!
//! Both artifacts are JSON exports of an already-fitted pipeline; nothing here
//! updates vocabulary or weights.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use ycsa_core::{ClassId, Classify, LabelMap, LabelSpaceError, SentimentLabel};
use ycsa_logging::ycsa_info;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("cannot read model artifact {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse model artifact {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("inconsistent model artifact: {0}")]
    Shape(String),
    #[error("vectorizer emits {vectorizer} features but classifier expects {model}")]
    DimensionMismatch { vectorizer: usize, model: usize },
    #[error(transparent)]
    LabelSpace(#[from] LabelSpaceError),
}

/// Sparse feature vector with a fixed dimension; entries sorted by index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    dimension: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    fn dot(&self, weights: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|(index, value)| weights.get(*index).copied().unwrap_or(0.0) * value)
            .sum()
    }
}

pub trait Vectorize: Send + Sync {
    /// Internal consistency of the fitted artifact; `transform` may panic on
    /// a vectorizer that fails this.
    fn validate(&self) -> Result<(), ModelError>;
    fn dimension(&self) -> usize;
    fn transform(&self, text: &str) -> FeatureVector;
}

pub trait Predict: Send + Sync {
    fn validate(&self) -> Result<(), ModelError>;
    fn classes(&self) -> &[ClassId];
    fn n_features(&self) -> usize;
    fn predict(&self, features: &FeatureVector) -> ClassId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    L1,
    None,
}

fn default_true() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// Fitted TF-IDF transform.
///
/// Tokens are runs of alphanumeric or `_` characters at least two characters
/// long, optionally lowercased first. Options this transform does not
/// implement are rejected at parse time.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    #[serde(default = "default_true")]
    lowercase: bool,
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default)]
    norm: Norm,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
}

impl TfidfVectorizer {
    fn check_shape(&self) -> Result<(), ModelError> {
        let dimension = self.idf.len();
        if dimension == 0 {
            return Err(ModelError::Shape("vectorizer has an empty idf table".into()));
        }
        if let Some((term, index)) = self.vocabulary.iter().find(|(_, i)| **i >= dimension) {
            return Err(ModelError::Shape(format!(
                "term {term:?} maps to column {index} but idf has {dimension} entries"
            )));
        }
        if self.idf.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::Shape("idf contains non-finite weights".into()));
        }
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ModelError::Shape(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }
        Ok(())
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|token| token.chars().count() >= 2)
            .map(str::to_string)
            .collect()
    }

    fn terms(&self, tokens: &[String]) -> Vec<String> {
        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n == 1 {
                terms.extend(tokens.iter().cloned());
            } else {
                terms.extend(tokens.windows(n).map(|window| window.join(" ")));
            }
        }
        terms
    }
}

impl Vectorize for TfidfVectorizer {
    fn validate(&self) -> Result<(), ModelError> {
        self.check_shape()
    }

    fn dimension(&self) -> usize {
        self.idf.len()
    }

    fn transform(&self, text: &str) -> FeatureVector {
        let tokens = self.tokenize(text);
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.terms(&tokens) {
            if let Some(index) = self.vocabulary.get(&term) {
                *counts.entry(*index).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, count)| {
                let tf = if self.sublinear_tf {
                    1.0 + count.ln()
                } else {
                    count
                };
                (index, tf * self.idf[index])
            })
            .collect();
        entries.sort_by_key(|(index, _)| *index);

        let norm = match self.norm {
            Norm::L2 => entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            Norm::L1 => entries.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            Norm::None => 1.0,
        };
        if norm > 0.0 {
            for (_, value) in &mut entries {
                *value /= norm;
            }
        }

        FeatureVector {
            dimension: self.idf.len(),
            entries,
        }
    }
}

/// Fitted linear classifier: one weight row per class, or a single row for
/// the binary case.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    classes: Vec<ClassId>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
}

impl LinearModel {
    fn check_shape(&self) -> Result<(), ModelError> {
        if self.classes.len() < 2 {
            return Err(ModelError::Shape(format!(
                "classifier needs at least two classes, found {}",
                self.classes.len()
            )));
        }
        let expected_rows = if self.classes.len() == 2 && self.coef.len() == 1 {
            1
        } else {
            self.classes.len()
        };
        if self.coef.len() != expected_rows {
            return Err(ModelError::Shape(format!(
                "coef has {} rows for {} classes",
                self.coef.len(),
                self.classes.len()
            )));
        }
        if self.intercept.len() != self.coef.len() {
            return Err(ModelError::Shape(format!(
                "intercept has {} entries for {} coef rows",
                self.intercept.len(),
                self.coef.len()
            )));
        }
        let width = self.n_features();
        if width == 0 || self.coef.iter().any(|row| row.len() != width) {
            return Err(ModelError::Shape("coef rows must share a non-zero width".into()));
        }
        Ok(())
    }
}

impl Predict for LinearModel {
    fn validate(&self) -> Result<(), ModelError> {
        self.check_shape()
    }

    fn classes(&self) -> &[ClassId] {
        &self.classes
    }

    fn n_features(&self) -> usize {
        self.coef.first().map(Vec::len).unwrap_or(0)
    }

    fn predict(&self, features: &FeatureVector) -> ClassId {
        let scores: Vec<f64> = self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, bias)| features.dot(row) + bias)
            .collect();
        if scores.len() == 1 {
            return if scores[0] > 0.0 {
                self.classes[1]
            } else {
                self.classes[0]
            };
        }
        // First maximum wins on ties.
        let mut best = 0;
        for (index, score) in scores.iter().enumerate() {
            if *score > scores[best] {
                best = index;
            }
        }
        self.classes[best]
    }
}

/// Vectorizer + model + label table, validated against each other.
#[derive(Debug, Clone)]
pub struct SentimentClassifier<V = TfidfVectorizer, P = LinearModel> {
    vectorizer: V,
    model: P,
    labels: LabelMap,
}

impl<V: Vectorize, P: Predict> SentimentClassifier<V, P> {
    pub fn new(vectorizer: V, model: P, labels: LabelMap) -> Result<Self, ModelError> {
        vectorizer.validate()?;
        model.validate()?;
        if vectorizer.dimension() != model.n_features() {
            return Err(ModelError::DimensionMismatch {
                vectorizer: vectorizer.dimension(),
                model: model.n_features(),
            });
        }
        labels.validate(model.classes())?;
        Ok(Self {
            vectorizer,
            model,
            labels,
        })
    }

    pub fn predict_class(&self, text: &str) -> ClassId {
        self.model.predict(&self.vectorizer.transform(text))
    }
}

impl<V: Vectorize, P: Predict> Classify for SentimentClassifier<V, P> {
    fn classify(&self, text: &str) -> SentimentLabel {
        self.labels.label_for(self.predict_class(text))
    }
}

/// Loads and cross-checks both artifacts. Any failure here is fatal for the app.
pub fn load_classifier(
    vectorizer_path: &Path,
    classifier_path: &Path,
    labels: LabelMap,
) -> Result<SentimentClassifier, ModelError> {
    let vectorizer: TfidfVectorizer = read_json(vectorizer_path)?;
    let model: LinearModel = read_json(classifier_path)?;

    let classifier = SentimentClassifier::new(vectorizer, model, labels)?;
    ycsa_info!(
        "Loaded classifier: {} features, classes {:?}",
        classifier.vectorizer.dimension(),
        classifier.model.classes()
    );
    Ok(classifier)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let text = fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
