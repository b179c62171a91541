//! Sample statistics over observed values.
//!
//! Every function returns `None` when it has too few observations to be defined, or when
//! floating-point evaluation produces a non-finite result.

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Arithmetic mean. Undefined for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    finite(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance with Bessel's correction (divides by `n - 1`).
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mu = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mu) * (v - mu)).sum();
    finite(sum_sq / (values.len() - 1) as f64)
}

/// Sample standard deviation, the square root of [`sample_variance`].
pub fn sample_std(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Sample covariance (divides by `n - 1`) of two equally long series.
pub fn sample_covariance(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mu_x = mean(xs)?;
    let mu_y = mean(ys)?;
    let sum: f64 = xs.iter().zip(ys).map(|(x, y)| (x - mu_x) * (y - mu_y)).sum();
    finite(sum / (xs.len() - 1) as f64)
}
