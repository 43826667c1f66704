//! Descriptive statistics, Pearson correlation, and least-squares regression
//!
//! Every function returns `None` for degenerate input (too few samples, zero
//! variance) instead of propagating NaN or infinity into downstream tables.

/// Arithmetic mean
///
/// Returns `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (one delta degree of freedom)
///
/// Returns `None` for fewer than two samples.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_squared: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((sum_squared / (values.len() - 1) as f64).sqrt())
}

/// Pearson correlation coefficient between two paired samples
///
/// Pairs beyond the shorter slice are ignored. Returns `None` for fewer than
/// two pairs or when either sample has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }

    let x_mean = mean(xs.get(..n)?)?;
    let y_mean = mean(ys.get(..n)?)?;

    let mut covariance = 0.0;
    let mut x_variance = 0.0;
    let mut y_variance = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        let dx = x - x_mean;
        let dy = y - y_mean;
        covariance = dx.mul_add(dy, covariance);
        x_variance = dx.mul_add(dx, x_variance);
        y_variance = dy.mul_add(dy, y_variance);
    }

    let denominator = (x_variance * y_variance).sqrt();
    if denominator == 0.0 {
        return None;
    }
    Some(covariance / denominator)
}

/// Single-variable least-squares fit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// Slope of the fitted line
    pub slope: f64,
    /// Intercept of the fitted line
    pub intercept: f64,
    /// Coefficient of determination of the fit
    pub r_squared: f64,
}

/// Fit `y = slope * x + intercept` by ordinary least squares
///
/// Pairs beyond the shorter slice are ignored. Returns `None` for fewer than
/// two pairs or when the predictor has zero variance. A response with zero
/// variance is fitted exactly by the horizontal line through its mean, so its
/// coefficient of determination is reported as 1.0.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }

    let x_mean = mean(xs.get(..n)?)?;
    let y_mean = mean(ys.get(..n)?)?;

    let mut covariance = 0.0;
    let mut x_variance = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        let dx = x - x_mean;
        covariance = dx.mul_add(y - y_mean, covariance);
        x_variance = dx.mul_add(dx, x_variance);
    }

    if x_variance == 0.0 {
        return None;
    }

    let slope = covariance / x_variance;
    let intercept = slope.mul_add(-x_mean, y_mean);

    let mut residual_sum = 0.0;
    let mut total_sum = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        let predicted = slope.mul_add(*x, intercept);
        let residual = y - predicted;
        let deviation = y - y_mean;
        residual_sum = residual.mul_add(residual, residual_sum);
        total_sum = deviation.mul_add(deviation, total_sum);
    }

    let r_squared = if total_sum == 0.0 {
        1.0
    } else {
        1.0 - residual_sum / total_sum
    };

    Some(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}
