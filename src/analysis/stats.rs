use serde::Serialize;

/// Mean/min/max/variance of a sample. Variance is the population variance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub variance: f64,
}

impl Summary {
    pub fn of(values: &[f64]) -> Option<Summary> {
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Some(Summary {
            count,
            mean,
            min,
            max,
            variance,
        })
    }

    /// Summary used when there is nothing to aggregate.
    pub fn constant(value: f64) -> Summary {
        Summary {
            count: 0,
            mean: value,
            min: value,
            max: value,
            variance: 0.0,
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
