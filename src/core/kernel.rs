use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelMethod {
    #[default]
    Epanechnikov,
}

/// Kernel density estimator over a fixed evaluation grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KernelDensity {
    pub method: KernelMethod,
    pub smoothing: f64,
}

impl KernelDensity {
    pub fn new(method: KernelMethod, smoothing: f64) -> ChartResult<Self> {
        if !smoothing.is_finite() || smoothing <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "kernel smoothing must be finite and > 0".to_owned(),
            ));
        }
        Ok(Self { method, smoothing })
    }

    /// Kernel weight of sample `y` seen from grid point `x`.
    #[must_use]
    pub fn weight(self, x: f64, y: f64) -> f64 {
        match self.method {
            KernelMethod::Epanechnikov => {
                let u = (x - y) / self.smoothing;
                if u.abs() <= 1.0 {
                    0.75 * (1.0 - u * u) / self.smoothing
                } else {
                    0.0
                }
            }
        }
    }

    /// Returns `(x, mean weight over samples)` for each grid point.
    ///
    /// Non-finite samples are ignored; with no samples every density is 0.
    #[must_use]
    pub fn estimate(self, grid: &[f64], samples: &[f64]) -> Vec<(f64, f64)> {
        let finite: Vec<f64> = samples.iter().copied().filter(|s| s.is_finite()).collect();
        grid.iter()
            .map(|&x| {
                if finite.is_empty() {
                    return (x, 0.0);
                }
                let total: f64 = finite.iter().map(|&y| self.weight(x, y)).sum();
                (x, total / finite.len() as f64)
            })
            .collect()
    }
}
