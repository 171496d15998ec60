//! Forecasting model tiers.
//!
//! Each tier is a [`Forecaster`] strategy; the engine tries them in order
//! until one succeeds. The zero-fill tier sits in the same chain as an
//! always-successful terminal member, so the chain as a whole is total.

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Degenerate series: {0}")]
    DegenerateSeries(String),

    #[error("Model fit failed: {0}")]
    FitFailed(String),
}

/// One forecasting strategy: fit on the full series, predict `horizon`
/// steps ahead. Implementations either return exactly `horizon` values or
/// an error; partial results are never produced.
pub trait Forecaster: Send + Sync {
    fn name(&self) -> &'static str;

    fn fit_and_predict(&self, values: &[f64], horizon: usize) -> Result<Vec<f64>, ForecastError>;
}

fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

/// Recursive multi-step prediction for an AR model with coefficients
/// `[intercept, phi_1, ..., phi_p]`: each step feeds the previous
/// prediction back in as the newest lag.
fn predict_ar(values: &[f64], coeffs: &[f64], horizon: usize) -> Vec<f64> {
    let p = coeffs.len() - 1;
    let mut history = values.to_vec();
    let mut predictions = Vec::with_capacity(horizon);
    for _ in 0..horizon {
        let mut next = coeffs[0];
        for j in 0..p {
            next += coeffs[j + 1] * history[history.len() - 1 - j];
        }
        history.push(next);
        predictions.push(next);
    }
    predictions
}

fn ensure_finite(predictions: Vec<f64>) -> Result<Vec<f64>, ForecastError> {
    if predictions.iter().all(|v| v.is_finite()) {
        Ok(predictions)
    } else {
        Err(ForecastError::FitFailed(
            "predictions are not finite".to_string(),
        ))
    }
}

/// AR(p) with intercept, order selected by AIC. The best-quality tier and
/// the most failure-prone on short or flat series.
pub struct AutoArForecaster {
    max_order: usize,
}

impl AutoArForecaster {
    const MIN_POINTS: usize = 8;

    pub fn new(max_order: usize) -> Self {
        Self { max_order }
    }

    /// Fit AR(p) by least squares over the lag design matrix. Returns the
    /// coefficients `[intercept, phi_1..phi_p]` and the residual sum of
    /// squares.
    fn fit_ar(values: &[f64], p: usize) -> Result<(Vec<f64>, f64), ForecastError> {
        let rows = values.len() - p;
        let mut x = DMatrix::<f64>::zeros(rows, p + 1);
        let mut y = DVector::<f64>::zeros(rows);
        for t in 0..rows {
            x[(t, 0)] = 1.0;
            for j in 0..p {
                x[(t, j + 1)] = values[p + t - 1 - j];
            }
            y[t] = values[p + t];
        }

        let svd = x.clone().svd(true, true);
        let beta = svd
            .solve(&y, 1e-10)
            .map_err(|e| ForecastError::FitFailed(e.to_string()))?;
        let rss = (&x * &beta - &y).norm_squared();
        Ok((beta.iter().copied().collect(), rss))
    }
}

impl Default for AutoArForecaster {
    fn default() -> Self {
        Self::new(5)
    }
}

impl Forecaster for AutoArForecaster {
    fn name(&self) -> &'static str {
        "auto_ar"
    }

    fn fit_and_predict(&self, values: &[f64], horizon: usize) -> Result<Vec<f64>, ForecastError> {
        let n = values.len();
        if n < Self::MIN_POINTS {
            return Err(ForecastError::InsufficientData(format!(
                "need at least {} points for order selection, have {n}",
                Self::MIN_POINTS
            )));
        }
        if population_variance(values) == 0.0 {
            return Err(ForecastError::DegenerateSeries(
                "series is constant".to_string(),
            ));
        }

        // Cap the order so every candidate keeps residual degrees of freedom.
        let max_order = self.max_order.min((n - 2) / 2).max(1);

        let mut best: Option<(f64, Vec<f64>)> = None;
        for p in 1..=max_order {
            let (coeffs, rss) = match Self::fit_ar(values, p) {
                Ok(fit) => fit,
                Err(_) => continue,
            };
            let n_eff = (n - p) as f64;
            let aic = n_eff * (rss / n_eff).max(1e-12).ln() + 2.0 * (p as f64 + 1.0);
            if best.as_ref().map_or(true, |(best_aic, _)| aic < *best_aic) {
                best = Some((aic, coeffs));
            }
        }

        let (_, coeffs) = best.ok_or_else(|| {
            ForecastError::FitFailed("no autoregressive order could be fitted".to_string())
        })?;
        ensure_finite(predict_ar(values, &coeffs, horizon))
    }
}

/// AR(1) with intercept, closed-form moment fit, no differencing. A simpler
/// fallback for series too short or too noisy for order selection.
pub struct FixedArForecaster;

impl Forecaster for FixedArForecaster {
    fn name(&self) -> &'static str {
        "ar1"
    }

    fn fit_and_predict(&self, values: &[f64], horizon: usize) -> Result<Vec<f64>, ForecastError> {
        let n = values.len();
        if n < 3 {
            return Err(ForecastError::InsufficientData(format!(
                "need at least 3 points, have {n}"
            )));
        }

        let lagged = &values[..n - 1];
        let current = &values[1..];
        let mean_x = lagged.iter().sum::<f64>() / lagged.len() as f64;
        let mean_y = current.iter().sum::<f64>() / current.len() as f64;

        let mut sxy = 0.0;
        let mut sxx = 0.0;
        for (x, y) in lagged.iter().zip(current) {
            sxy += (x - mean_x) * (y - mean_y);
            sxx += (x - mean_x) * (x - mean_x);
        }
        if sxx == 0.0 {
            return Err(ForecastError::DegenerateSeries(
                "lagged series has zero variance".to_string(),
            ));
        }

        let phi = sxy / sxx;
        let intercept = mean_y - phi * mean_x;
        ensure_finite(predict_ar(values, &[intercept, phi], horizon))
    }
}

/// Exponential smoothing with additive trend (Holt's linear method).
/// Smoothing parameters are chosen by one-step-ahead SSE over a small grid,
/// which keeps the tier tolerant of very short series.
pub struct HoltForecaster;

impl HoltForecaster {
    const GRID: [f64; 5] = [0.1, 0.3, 0.5, 0.7, 0.9];

    /// One smoothing pass; returns the one-step-ahead SSE and the final
    /// level/trend state.
    fn smooth(values: &[f64], alpha: f64, beta: f64) -> (f64, f64, f64) {
        let mut level = values[0];
        let mut trend = values[1] - values[0];
        let mut sse = 0.0;
        for &y in &values[1..] {
            let prediction = level + trend;
            let err = y - prediction;
            sse += err * err;
            let prev_level = level;
            level = alpha * y + (1.0 - alpha) * (level + trend);
            trend = beta * (level - prev_level) + (1.0 - beta) * trend;
        }
        (sse, level, trend)
    }
}

impl Forecaster for HoltForecaster {
    fn name(&self) -> &'static str {
        "holt_linear"
    }

    fn fit_and_predict(&self, values: &[f64], horizon: usize) -> Result<Vec<f64>, ForecastError> {
        if values.len() < 2 {
            return Err(ForecastError::InsufficientData(format!(
                "need at least 2 points, have {}",
                values.len()
            )));
        }

        let mut best: Option<(f64, f64, f64)> = None;
        for &alpha in &Self::GRID {
            for &beta in &Self::GRID {
                let (sse, level, trend) = Self::smooth(values, alpha, beta);
                if best.as_ref().map_or(true, |(best_sse, _, _)| sse < *best_sse) {
                    best = Some((sse, level, trend));
                }
            }
        }

        // The grid is non-empty, so a state always exists.
        let (_, level, trend) = best.expect("non-empty smoothing grid");
        let predictions = (1..=horizon)
            .map(|h| level + h as f64 * trend)
            .collect();
        ensure_finite(predictions)
    }
}

/// Terminal tier: a forecast of zeros. Never fails, which guarantees the
/// chain always yields a result of the requested length.
pub struct ZeroFillForecaster;

impl Forecaster for ZeroFillForecaster {
    fn name(&self) -> &'static str {
        "zero_fill"
    }

    fn fit_and_predict(&self, _values: &[f64], horizon: usize) -> Result<Vec<f64>, ForecastError> {
        Ok(vec![0.0; horizon])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_ar_rejects_short_and_constant_series() {
        let auto = AutoArForecaster::default();
        assert!(matches!(
            auto.fit_and_predict(&[1.0, 2.0, 3.0], 4),
            Err(ForecastError::InsufficientData(_))
        ));
        assert!(matches!(
            auto.fit_and_predict(&[5.0; 10], 4),
            Err(ForecastError::DegenerateSeries(_))
        ));
    }

    #[test]
    fn auto_ar_extends_a_linear_series() {
        let values: Vec<f64> = (1..=12).map(|i| i as f64).collect();
        let predictions = AutoArForecaster::default().fit_and_predict(&values, 3).unwrap();
        assert_eq!(predictions.len(), 3);
        // y_t = y_{t-1} + 1 fits a linear ramp exactly.
        for (i, p) in predictions.iter().enumerate() {
            assert!((p - (13.0 + i as f64)).abs() < 1e-6, "step {i} was {p}");
        }
    }

    #[test]
    fn ar1_rejects_degenerate_input() {
        assert!(matches!(
            FixedArForecaster.fit_and_predict(&[1.0, 2.0], 4),
            Err(ForecastError::InsufficientData(_))
        ));
        assert!(matches!(
            FixedArForecaster.fit_and_predict(&[3.0, 3.0, 3.0, 3.0], 4),
            Err(ForecastError::DegenerateSeries(_))
        ));
    }

    #[test]
    fn ar1_produces_requested_horizon() {
        let values = vec![10.0, 12.0, 11.0, 13.0, 12.5, 14.0];
        let predictions = FixedArForecaster.fit_and_predict(&values, 5).unwrap();
        assert_eq!(predictions.len(), 5);
        assert!(predictions.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn holt_handles_constant_series() {
        let predictions = HoltForecaster.fit_and_predict(&[7.0; 6], 4).unwrap();
        assert_eq!(predictions.len(), 4);
        for p in predictions {
            assert!((p - 7.0).abs() < 1e-9);
        }
    }

    #[test]
    fn holt_tracks_an_additive_trend() {
        let values: Vec<f64> = (0..8).map(|i| 5.0 + 2.0 * i as f64).collect();
        let predictions = HoltForecaster.fit_and_predict(&values, 2).unwrap();
        assert!(predictions[1] > predictions[0]);
        assert!(predictions[0] > *values.last().unwrap() - 1e-9);
    }

    #[test]
    fn zero_fill_never_fails() {
        let predictions = ZeroFillForecaster.fit_and_predict(&[], 6).unwrap();
        assert_eq!(predictions, vec![0.0; 6]);
    }
}
