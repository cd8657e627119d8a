//! Monthly spend series analysis
//!
//! The analysis functions are pure over a slice of totals. Where the series
//! comes from is a [`SpendSeriesSource`]: a real ledger, or the seeded
//! synthetic generator used for demos.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::types::TrendDirection;
use crate::config::SpendingConfig;
use crate::models::{MonthlySpend, SpendingInsights};
use crate::money::sanitize;

/// Months averaged at each end of the series for trend and prediction
const TREND_SPAN: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityBand {
    #[default]
    Low,
    Moderate,
    High,
}

impl VolatilityBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolatilityBand::Low => "low",
            VolatilityBand::Moderate => "moderate",
            VolatilityBand::High => "high",
        }
    }

    fn prediction_confidence(&self) -> f64 {
        match self {
            VolatilityBand::Low => 0.85,
            VolatilityBand::Moderate => 0.7,
            VolatilityBand::High => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpendTrend {
    pub direction: TrendDirection,
    /// Percent change of the trailing average over the leading average
    pub rate_pct: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Volatility {
    /// Population standard deviation over mean, in percent
    pub coefficient_pct: f64,
    pub band: VolatilityBand,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpendPrediction {
    pub amount: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpendingAnalysis {
    pub months: usize,
    pub trend: SpendTrend,
    pub volatility: Volatility,
    /// Labels of months that spike above the rest of the series
    pub seasonal_months: Vec<String>,
    pub next_month: SpendPrediction,
}

impl SpendingAnalysis {
    pub fn is_seasonal(&self) -> bool {
        !self.seasonal_months.is_empty()
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Analyzer for trend, volatility, seasonality and next-month prediction
#[derive(Debug, Clone, Default)]
pub struct SpendingAnalyzer {
    config: SpendingConfig,
}

impl SpendingAnalyzer {
    pub fn new(config: SpendingConfig) -> Self {
        Self { config }
    }

    /// Leading vs trailing average. Fewer than two months is stable.
    pub fn trend(&self, totals: &[f64]) -> SpendTrend {
        if totals.len() < 2 {
            return SpendTrend::default();
        }
        let span = TREND_SPAN.min(totals.len());
        let leading = mean(&totals[..span]);
        let trailing = mean(&totals[totals.len() - span..]);
        if leading <= 0.0 {
            return SpendTrend::default();
        }

        let rate_pct = (trailing - leading) / leading * 100.0;
        let direction = if rate_pct > self.config.stability_band_pct {
            TrendDirection::Increasing
        } else if rate_pct < -self.config.stability_band_pct {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        };
        SpendTrend {
            direction,
            rate_pct,
        }
    }

    pub fn volatility(&self, totals: &[f64]) -> Volatility {
        let avg = mean(totals);
        if avg <= 0.0 {
            return Volatility::default();
        }
        let variance = totals.iter().map(|t| (t - avg).powi(2)).sum::<f64>() / totals.len() as f64;
        let coefficient_pct = variance.sqrt() / avg * 100.0;

        let band = if coefficient_pct < self.config.low_volatility_pct {
            VolatilityBand::Low
        } else if coefficient_pct < self.config.moderate_volatility_pct {
            VolatilityBand::Moderate
        } else {
            VolatilityBand::High
        };
        Volatility {
            coefficient_pct,
            band,
        }
    }

    /// Indices of months above the mean of all other months by more than the
    /// seasonality threshold
    pub fn seasonal_indices(&self, totals: &[f64]) -> Vec<usize> {
        if totals.len() < 2 {
            return Vec::new();
        }
        let sum: f64 = totals.iter().sum();
        let factor = 1.0 + self.config.seasonality_threshold_pct / 100.0;

        totals
            .iter()
            .enumerate()
            .filter(|(_, total)| {
                let others = (sum - **total) / (totals.len() - 1) as f64;
                **total > 0.0 && **total > others * factor
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Trailing average moved by the trend rate, unless the trend is stable
    pub fn predict_next_month(&self, totals: &[f64]) -> SpendPrediction {
        if totals.is_empty() {
            return SpendPrediction::default();
        }
        let span = TREND_SPAN.min(totals.len());
        let base = mean(&totals[totals.len() - span..]);
        let trend = self.trend(totals);
        let amount = match trend.direction {
            TrendDirection::Stable => base,
            _ => sanitize(base * (1.0 + trend.rate_pct / 100.0)),
        };

        SpendPrediction {
            amount,
            confidence: self.volatility(totals).band.prediction_confidence(),
        }
    }

    pub fn analyze_series(&self, series: &[MonthlySpend]) -> SpendingAnalysis {
        let totals: Vec<f64> = series.iter().map(|m| sanitize(m.total)).collect();
        let seasonal_months = self
            .seasonal_indices(&totals)
            .into_iter()
            .map(|i| series[i].month.clone())
            .collect();

        let analysis = SpendingAnalysis {
            months: totals.len(),
            trend: self.trend(&totals),
            volatility: self.volatility(&totals),
            seasonal_months,
            next_month: self.predict_next_month(&totals),
        };
        tracing::debug!(
            months = analysis.months,
            trend = analysis.trend.direction.as_str(),
            volatility = analysis.volatility.band.as_str(),
            seasonal = analysis.seasonal_months.len(),
            "Spending analyzed"
        );
        analysis
    }

    pub fn analyze(&self, source: &dyn SpendSeriesSource) -> SpendingAnalysis {
        tracing::debug!(source = source.name(), "Loading spend series");
        self.analyze_series(&source.monthly_series())
    }
}

/// Where a chronological monthly spend series comes from
pub trait SpendSeriesSource {
    fn name(&self) -> &str;

    /// Oldest month first
    fn monthly_series(&self) -> Vec<MonthlySpend>;
}

/// Series from real aggregated transactions
#[derive(Debug, Clone, Default)]
pub struct LedgerSpendSource {
    months: Vec<MonthlySpend>,
}

impl LedgerSpendSource {
    pub fn new(months: Vec<MonthlySpend>) -> Self {
        Self { months }
    }

    /// The ledger carried by a spending record, if it has one
    pub fn from_insights(insights: &SpendingInsights) -> Option<Self> {
        insights
            .monthly_spending
            .as_ref()
            .filter(|months| !months.is_empty())
            .map(|months| Self::new(months.clone()))
    }
}

impl SpendSeriesSource for LedgerSpendSource {
    fn name(&self) -> &str {
        "ledger"
    }

    fn monthly_series(&self) -> Vec<MonthlySpend> {
        self.months.clone()
    }
}

/// Demo-only generator of plausible spending, deterministic per seed.
///
/// Adds a festive-season bump in October and November and up to ±5% noise.
/// Never use its output as a user's real data.
#[derive(Debug, Clone)]
pub struct SyntheticSpendSource {
    pub seed: u64,
    pub months: usize,
    pub base_amount: f64,
    pub start_year: i32,
    /// 1-based calendar month of the first generated month
    pub start_month: u32,
}

const FESTIVE_BUMP: f64 = 1.35;
const NOISE: f64 = 0.05;

impl SyntheticSpendSource {
    pub fn new(seed: u64, months: usize, base_amount: f64) -> Self {
        Self {
            seed,
            months,
            base_amount: sanitize(base_amount),
            start_year: 2025,
            start_month: 1,
        }
    }

    pub fn starting(mut self, year: i32, month: u32) -> Self {
        self.start_year = year;
        self.start_month = month.clamp(1, 12);
        self
    }
}

impl SpendSeriesSource for SyntheticSpendSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn monthly_series(&self) -> Vec<MonthlySpend> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let (start_year, start_month0) = (self.start_year, self.start_month.clamp(1, 12) as usize - 1);

        (0..self.months)
            .map(|offset| {
                let month0 = (start_month0 + offset) % 12;
                let year = start_year + ((start_month0 + offset) / 12) as i32;
                let festive = if month0 == 9 || month0 == 10 {
                    FESTIVE_BUMP
                } else {
                    1.0
                };
                let noise = 1.0 + rng.gen_range(-NOISE..NOISE);
                let total = (self.base_amount * festive * noise).round();
                MonthlySpend::new(format!("{:04}-{:02}", year, month0 + 1), total)
            })
            .collect()
    }
}
