//! Labelled descriptor rows for training a window classifier.
//!
//! Text format: one sample per line, the descriptor values separated by single
//! spaces followed by the label (`0` or `1`). Blank lines are ignored.

use std::io::{BufRead, Write};

use hog_detect_core::{ImageError, LumaImageView, ResizeMode};

use crate::descriptor::HogDescriptor;

#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("line {line}: cannot parse `{token}` as a number")]
    Parse { line: usize, token: String },
    #[error("line {line}: expected {expected} descriptor values, got {got}")]
    LengthMismatch {
        line: usize,
        expected: usize,
        got: usize,
    },
    #[error("line {line}: label must be 0 or 1 (got {label})")]
    InvalidLabel { line: usize, label: String },
}

/// Parallel feature rows and 0/1 labels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabeledFeatures {
    pub features: Vec<Vec<f32>>,
    pub labels: Vec<u8>,
}

impl LabeledFeatures {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Write every row in the line format.
    pub fn write_text<W: Write>(&self, mut out: W) -> Result<(), DatasetError> {
        for (row, label) in self.features.iter().zip(&self.labels) {
            for v in row {
                write!(out, "{v} ")?;
            }
            writeln!(out, "{label}")?;
        }
        out.flush()?;
        Ok(())
    }

    /// Parse rows written by [`LabeledFeatures::write_text`].
    ///
    /// Labels are read as numbers, so `1.0` is accepted as `1`. Every row
    /// must have the length of the first one.
    pub fn read_text<R: BufRead>(input: R) -> Result<Self, DatasetError> {
        let mut out = Self::default();
        let mut expected: Option<usize> = None;

        for (idx, line) in input.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            let mut tokens: Vec<&str> = line.split_whitespace().collect();
            let Some(label_tok) = tokens.pop() else {
                continue;
            };

            let label = match label_tok.parse::<f32>() {
                Ok(v) if v == 0.0 => 0u8,
                Ok(v) if v == 1.0 => 1u8,
                _ => {
                    return Err(DatasetError::InvalidLabel {
                        line: line_no,
                        label: label_tok.to_string(),
                    })
                }
            };

            let row = tokens
                .iter()
                .map(|t| {
                    t.parse::<f32>().map_err(|_| DatasetError::Parse {
                        line: line_no,
                        token: (*t).to_string(),
                    })
                })
                .collect::<Result<Vec<f32>, _>>()?;

            match expected {
                Some(n) if n != row.len() => {
                    return Err(DatasetError::LengthMismatch {
                        line: line_no,
                        expected: n,
                        got: row.len(),
                    })
                }
                Some(_) => {}
                None => expected = Some(row.len()),
            }

            out.features.push(row);
            out.labels.push(label);
        }

        log::debug!(
            "read {} samples of length {}",
            out.len(),
            expected.unwrap_or(0)
        );
        Ok(out)
    }
}

/// Accumulates descriptors of sample images resized to a fixed training size.
#[derive(Clone, Debug)]
pub struct DescriptorDataset {
    descriptor: HogDescriptor,
    canonical_size: [usize; 2],
    rows: LabeledFeatures,
}

impl DescriptorDataset {
    /// `canonical_size` is `[height, width]`.
    pub fn new(descriptor: HogDescriptor, canonical_size: [usize; 2]) -> Self {
        Self {
            descriptor,
            canonical_size,
            rows: LabeledFeatures::default(),
        }
    }

    /// Length of every row pushed through [`DescriptorDataset::push_image`].
    pub fn feature_len(&self) -> usize {
        let [h, w] = self.canonical_size;
        self.descriptor.length(w, h)
    }

    /// Resize `image` to the canonical size, describe it and store the row.
    pub fn push_image(
        &mut self,
        image: &LumaImageView<'_>,
        positive: bool,
    ) -> Result<(), DatasetError> {
        let [h, w] = self.canonical_size;
        let resized = image.resize(w, h, ResizeMode::Bilinear)?;
        let mut row = Vec::with_capacity(self.feature_len());
        row.extend(self.descriptor.compute(&resized.view()));
        self.rows.features.push(row);
        self.rows.labels.push(u8::from(positive));
        Ok(())
    }

    /// Store a precomputed descriptor.
    pub fn push_descriptor(
        &mut self,
        descriptor: Vec<f32>,
        positive: bool,
    ) -> Result<(), DatasetError> {
        let expected = self.feature_len();
        if descriptor.len() != expected {
            return Err(DatasetError::LengthMismatch {
                line: self.rows.len() + 1,
                expected,
                got: descriptor.len(),
            });
        }
        self.rows.features.push(descriptor);
        self.rows.labels.push(u8::from(positive));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &LabeledFeatures {
        &self.rows
    }

    pub fn into_inner(self) -> LabeledFeatures {
        self.rows
    }
}
