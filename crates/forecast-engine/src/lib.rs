//! Short-horizon series forecasting via an ordered fallback chain.
//!
//! The chain tries an order-selected autoregressive model first, then an
//! AR(1) fallback, then Holt's linear smoothing, and finally a zero fill.
//! A tier failure is never fatal; the zero-fill terminal tier guarantees a
//! result of exactly the requested horizon on any input.

pub mod models;

pub use models::{
    AutoArForecaster, FixedArForecaster, ForecastError, Forecaster, HoltForecaster,
    ZeroFillForecaster,
};

use insight_core::{ForecastResult, NumericSeries};

pub struct ForecastEngine {
    chain: Vec<Box<dyn Forecaster>>,
}

impl ForecastEngine {
    pub fn new() -> Self {
        Self::with_chain(vec![
            Box::new(AutoArForecaster::default()),
            Box::new(FixedArForecaster),
            Box::new(HoltForecaster),
            Box::new(ZeroFillForecaster),
        ])
    }

    /// Build an engine with a custom model chain, tried in order.
    pub fn with_chain(chain: Vec<Box<dyn Forecaster>>) -> Self {
        Self { chain }
    }

    /// Forecast `horizon` steps ahead. Tiers are attempted in order and a
    /// failing tier falls through to the next; tier results are never
    /// mixed. The returned values always have length `horizon`.
    pub fn forecast(&self, series: &NumericSeries, horizon: usize) -> ForecastResult {
        for model in &self.chain {
            match model.fit_and_predict(series.values(), horizon) {
                Ok(values) => {
                    tracing::debug!(model = model.name(), horizon, "forecast model selected");
                    return ForecastResult {
                        model: model.name().to_string(),
                        values,
                    };
                }
                Err(err) => {
                    tracing::warn!(model = model.name(), %err, "forecast model failed, falling back");
                }
            }
        }

        // Only reachable with a custom chain that lacks the terminal
        // zero-fill member; kept so the contract stays total regardless.
        ForecastResult {
            model: ZeroFillForecaster.name().to_string(),
            values: vec![0.0; horizon],
        }
    }
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::new()
    }
}
