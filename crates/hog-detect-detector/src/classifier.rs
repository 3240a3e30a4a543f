use std::fs;
use std::path::Path;

use nalgebra::{DVector, DVectorView};
use serde::{Deserialize, Serialize};

/// Two-class probabilistic classifier over window descriptors.
///
/// Implementations are shared across worker threads and must not rely on
/// interior state between calls.
pub trait Classifier: Send + Sync {
    /// `[p_negative, p_positive]` for one descriptor.
    fn predict_probability(&self, descriptor: &[f32]) -> [f32; 2];

    /// Descriptor length the classifier was trained on, when known.
    fn input_len(&self) -> Option<usize> {
        None
    }
}

impl<F> Classifier for F
where
    F: Fn(&[f32]) -> [f32; 2] + Send + Sync,
{
    fn predict_probability(&self, descriptor: &[f32]) -> [f32; 2] {
        self(descriptor)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("failed to parse model JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read or write model file: {0}")]
    Io(#[from] std::io::Error),
}

/// Linear decision function with Platt-scaled probabilities.
///
/// `f = w . d + bias`, `p_positive = 1 / (1 + exp(platt_a * f + platt_b))`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "LinearModelFile", into = "LinearModelFile")]
pub struct LinearClassifier {
    weights: DVector<f32>,
    bias: f32,
    platt_a: f32,
    platt_b: f32,
}

#[derive(Serialize, Deserialize)]
struct LinearModelFile {
    weights: Vec<f32>,
    #[serde(default)]
    bias: f32,
    #[serde(default = "default_platt_a")]
    platt_a: f32,
    #[serde(default)]
    platt_b: f32,
}

fn default_platt_a() -> f32 {
    -1.0
}

impl From<LinearModelFile> for LinearClassifier {
    fn from(f: LinearModelFile) -> Self {
        Self {
            weights: DVector::from_vec(f.weights),
            bias: f.bias,
            platt_a: f.platt_a,
            platt_b: f.platt_b,
        }
    }
}

impl From<LinearClassifier> for LinearModelFile {
    fn from(c: LinearClassifier) -> Self {
        Self {
            weights: c.weights.as_slice().to_vec(),
            bias: c.bias,
            platt_a: c.platt_a,
            platt_b: c.platt_b,
        }
    }
}

impl LinearClassifier {
    /// Plain logistic link: `platt_a = -1`, `platt_b = 0`.
    pub fn new(weights: Vec<f32>, bias: f32) -> Self {
        Self {
            weights: DVector::from_vec(weights),
            bias,
            platt_a: default_platt_a(),
            platt_b: 0.0,
        }
    }

    pub fn with_platt(mut self, a: f32, b: f32) -> Self {
        self.platt_a = a;
        self.platt_b = b;
        self
    }

    pub fn weights(&self) -> &DVector<f32> {
        &self.weights
    }

    pub fn bias(&self) -> f32 {
        self.bias
    }

    pub fn platt(&self) -> (f32, f32) {
        (self.platt_a, self.platt_b)
    }

    /// Signed distance-like score `w . d + bias`.
    ///
    /// Only the common prefix of `weights` and `descriptor` contributes.
    pub fn decision_function(&self, descriptor: &[f32]) -> f32 {
        let n = self.weights.len().min(descriptor.len());
        let x = DVectorView::from_slice(&descriptor[..n], n);
        self.weights.rows(0, n).dot(&x) + self.bias
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Numerically stable `1 / (1 + exp(z))`.
fn sigmoid_predict(z: f32) -> f32 {
    if z >= 0.0 {
        let e = (-z).exp();
        e / (1.0 + e)
    } else {
        1.0 / (1.0 + z.exp())
    }
}

impl Classifier for LinearClassifier {
    fn predict_probability(&self, descriptor: &[f32]) -> [f32; 2] {
        let f = self.decision_function(descriptor);
        let p = sigmoid_predict(self.platt_a * f + self.platt_b);
        [1.0 - p, p]
    }

    fn input_len(&self) -> Option<usize> {
        Some(self.weights.len())
    }
}
