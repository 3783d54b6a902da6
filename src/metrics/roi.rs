//! ROI weight tables for prioritized distortion measures (P-MSE, P-PSNR).

use serde::{Deserialize, Serialize};

use crate::error::{CompareError, Result};

/// Weight applied to pixels carrying one mask label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiWeight {
    /// Mask label (0..=255).
    pub label: u8,
    /// Factor applied to `reference - test` for pixels with this label.
    pub weight: f64,
}

/// Ordered table of mask label weights.
///
/// Lookup is first-match: when several entries share a label, the earliest
/// entry wins. Pixels whose label matches no entry keep weight 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RoiWeights {
    entries: Vec<RoiWeight>,
}

impl RoiWeights {
    /// Create a table from explicit entries.
    pub fn new(entries: Vec<RoiWeight>) -> Result<Self> {
        if entries.is_empty() {
            return Err(CompareError::RoiTable(
                "at least one label/weight pair is required".into(),
            ));
        }
        if let Some(bad) = entries.iter().find(|e| !e.weight.is_finite()) {
            return Err(CompareError::RoiTable(format!(
                "weight for label {} is not finite",
                bad.label
            )));
        }
        Ok(Self { entries })
    }

    /// Create a table from a flat `label weight label weight ...` list.
    pub fn from_pairs(values: &[f64]) -> Result<Self> {
        if values.len() % 2 != 0 {
            return Err(CompareError::RoiTable(format!(
                "values must come in label/weight pairs, got {} numbers",
                values.len()
            )));
        }

        let entries = values
            .chunks_exact(2)
            .map(|pair| {
                let label = pair[0];
                if label.fract() != 0.0 || !(0.0..=255.0).contains(&label) {
                    return Err(CompareError::RoiTable(format!(
                        "mask label {} is not an integer in 0..=255",
                        label
                    )));
                }
                Ok(RoiWeight {
                    label: label as u8,
                    weight: pair[1],
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(entries)
    }

    /// Table entries in lookup order.
    pub fn entries(&self) -> &[RoiWeight] {
        &self.entries
    }

    /// Weight for a mask label.
    pub fn weight_for(&self, label: u8) -> f64 {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map_or(1.0, |e| e.weight)
    }

    /// Largest weight in the table, never below zero.
    pub fn max_weight(&self) -> f64 {
        self.entries.iter().fold(0.0, |max, e| e.weight.max(max))
    }

    /// Precompute the weight of every label.
    pub(crate) fn lookup_table(&self) -> [f64; 256] {
        let mut table = [1.0; 256];
        for (label, slot) in table.iter_mut().enumerate() {
            *slot = self.weight_for(label as u8);
        }
        table
    }
}
