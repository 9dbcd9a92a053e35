//! Composite health scoring.
//!
//! Sub-scores come from ordered band tables (thresholds are data, not code)
//! and combine into a weighted composite with a discrete rating label. A
//! period missing any required ratio gets no composite at all; partial scores
//! are never produced.

use filing_core::HealthRating;
use ratio_analysis::PeriodRatios;
use serde::{Deserialize, Serialize};

/// Ordered (threshold, score) pairs, evaluated top-down; first match wins.
/// Values matching no band take the fallback score. Bands are exclusive of
/// the stated threshold: a value landing exactly on a threshold falls into
/// the band below it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandTable {
    pub bands: Vec<(f64, f64)>,
    pub fallback: f64,
}

impl BandTable {
    /// Score for "bigger is better" inputs: first band whose threshold the
    /// value strictly exceeds.
    pub fn score_above(&self, value: f64) -> f64 {
        self.bands
            .iter()
            .find(|(threshold, _)| value > *threshold)
            .map(|(_, score)| *score)
            .unwrap_or(self.fallback)
    }

    /// Score for "smaller is better" inputs: first band whose threshold the
    /// value is strictly below.
    pub fn score_below(&self, value: f64) -> f64 {
        self.bands
            .iter()
            .find(|(threshold, _)| value < *threshold)
            .map(|(_, score)| *score)
            .unwrap_or(self.fallback)
    }
}

/// Sub-score band tables and composite weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreConfig {
    /// Net margin (%), bigger is better.
    pub profitability: BandTable,
    /// Current ratio, bigger is better.
    pub liquidity: BandTable,
    /// Debt-to-assets (%), smaller is better.
    pub leverage: BandTable,
    pub profitability_weight: f64,
    pub liquidity_weight: f64,
    pub leverage_weight: f64,
    /// Composite thresholds (inclusive) for rating labels, descending.
    pub rating_bands: Vec<(f64, HealthRating)>,
    pub rating_fallback: HealthRating,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            profitability: BandTable {
                bands: vec![
                    (30.0, 100.0),
                    (20.0, 80.0),
                    (10.0, 60.0),
                    (5.0, 40.0),
                    (0.0, 20.0),
                ],
                fallback: 0.0,
            },
            liquidity: BandTable {
                bands: vec![(3.0, 100.0), (2.0, 80.0), (1.5, 60.0), (1.0, 40.0)],
                fallback: 20.0,
            },
            leverage: BandTable {
                bands: vec![(20.0, 100.0), (40.0, 80.0), (60.0, 60.0), (80.0, 40.0)],
                fallback: 20.0,
            },
            profitability_weight: 0.4,
            liquidity_weight: 0.3,
            leverage_weight: 0.3,
            rating_bands: vec![
                (85.0, HealthRating::Excellent),
                (70.0, HealthRating::Good),
                (55.0, HealthRating::Fair),
            ],
            rating_fallback: HealthRating::Poor,
        }
    }
}

/// Sub-scores, weighted composite, and rating for one period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthScore {
    pub profitability: f64,
    pub liquidity: f64,
    pub leverage: f64,
    /// Weighted sum, rounded to one decimal. Always within [20, 100].
    pub composite: f64,
    pub rating: HealthRating,
}

pub struct HealthScorer {
    config: ScoreConfig,
}

impl HealthScorer {
    pub fn new() -> Self {
        Self {
            config: ScoreConfig::default(),
        }
    }

    pub fn with_config(config: ScoreConfig) -> Self {
        Self { config }
    }

    pub fn profitability_score(&self, net_margin: f64) -> f64 {
        self.config.profitability.score_above(net_margin)
    }

    pub fn liquidity_score(&self, current_ratio: f64) -> f64 {
        self.config.liquidity.score_above(current_ratio)
    }

    pub fn leverage_score(&self, debt_to_assets: f64) -> f64 {
        self.config.leverage.score_below(debt_to_assets)
    }

    pub fn rating(&self, composite: f64) -> HealthRating {
        self.config
            .rating_bands
            .iter()
            .find(|(threshold, _)| composite >= *threshold)
            .map(|(_, rating)| *rating)
            .unwrap_or(self.config.rating_fallback)
    }

    /// Composite health score for one period's ratios. `None` when any of
    /// the three required ratios is undefined.
    pub fn score(&self, ratios: &PeriodRatios) -> Option<HealthScore> {
        let net_margin = ratios.net_margin?;
        let current_ratio = ratios.current_ratio?;
        let debt_to_assets = ratios.debt_to_assets?;

        let profitability = self.profitability_score(net_margin);
        let liquidity = self.liquidity_score(current_ratio);
        let leverage = self.leverage_score(debt_to_assets);

        let weighted = profitability * self.config.profitability_weight
            + liquidity * self.config.liquidity_weight
            + leverage * self.config.leverage_weight;
        let composite = (weighted * 10.0).round() / 10.0;

        Some(HealthScore {
            profitability,
            liquidity,
            leverage,
            composite,
            rating: self.rating(composite),
        })
    }
}

impl Default for HealthScorer {
    fn default() -> Self {
        Self::new()
    }
}
