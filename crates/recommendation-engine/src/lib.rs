//! Investment-tier classification from annual filing history.
//!
//! Consumes recent-window margin, recent-vs-historical revenue growth, and
//! margin volatility, and maps them to a discrete tier through an ordered
//! rule table (first match wins). Entities without enough annual history are
//! excluded from classification entirely rather than scored on partial data.

use filing_core::{FilingType, PeriodSequencer, RecommendationTier, RiskProfile};
use ratio_analysis::RatioCalculator;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// One row of the rule table. Absent thresholds are not evaluated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRule {
    pub min_margin: Option<f64>,
    pub min_growth: Option<f64>,
    pub max_volatility: Option<f64>,
    /// `AllOf`: every present threshold must pass. `AnyOf`: one is enough.
    pub mode: RuleMode,
    pub tier: RecommendationTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleMode {
    AllOf,
    AnyOf,
}

impl RecommendationRule {
    fn matches(&self, margin: f64, growth: f64, volatility: f64) -> bool {
        let checks = [
            self.min_margin.map(|t| margin > t),
            self.min_growth.map(|t| growth > t),
            self.max_volatility.map(|t| volatility < t),
        ];
        let mut evaluated = checks.iter().flatten();
        match self.mode {
            RuleMode::AllOf => evaluated.all(|&passed| passed),
            RuleMode::AnyOf => evaluated.any(|&passed| passed),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Fiscal years counted as "recent", anchored on the as-of year.
    pub recent_years: i32,
    /// Fiscal years before the recent window counted as "historical".
    pub historical_years: i32,
    /// Minimum fiscal years with a defined margin; below this the entity is
    /// excluded from classification.
    pub min_history_years: usize,
    pub rules: Vec<RecommendationRule>,
    pub fallback_tier: RecommendationTier,
    /// (exclusive threshold, profile), descending.
    pub risk_bands: Vec<(f64, RiskProfile)>,
    pub risk_fallback: RiskProfile,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            recent_years: 2,
            historical_years: 3,
            min_history_years: 3,
            rules: vec![
                RecommendationRule {
                    min_margin: Some(25.0),
                    min_growth: Some(15.0),
                    max_volatility: Some(5.0),
                    mode: RuleMode::AllOf,
                    tier: RecommendationTier::StrongBuy,
                },
                RecommendationRule {
                    min_margin: Some(20.0),
                    min_growth: Some(10.0),
                    max_volatility: None,
                    mode: RuleMode::AllOf,
                    tier: RecommendationTier::Buy,
                },
                RecommendationRule {
                    min_margin: Some(15.0),
                    min_growth: Some(5.0),
                    max_volatility: None,
                    mode: RuleMode::AllOf,
                    tier: RecommendationTier::Hold,
                },
                RecommendationRule {
                    min_margin: Some(10.0),
                    min_growth: Some(0.0),
                    max_volatility: None,
                    mode: RuleMode::AnyOf,
                    tier: RecommendationTier::WeakHold,
                },
            ],
            fallback_tier: RecommendationTier::Sell,
            risk_bands: vec![(10.0, RiskProfile::High), (5.0, RiskProfile::Medium)],
            risk_fallback: RiskProfile::Low,
        }
    }
}

/// Classifier inputs derived from one entity's annual history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySignals {
    /// Average net margin (%) across the recent window.
    pub current_margin: f64,
    /// Recent-window average revenue vs. historical-window average, percent.
    pub revenue_growth: f64,
    /// Sample standard deviation of per-fiscal-year net margins.
    pub margin_volatility: f64,
}

/// Classification output for one entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityClassification {
    pub cik: String,
    pub signals: EntitySignals,
    pub tier: RecommendationTier,
    pub risk: RiskProfile,
}

pub struct RecommendationEngine {
    config: ClassifierConfig,
    ratios: RatioCalculator,
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self {
            config: ClassifierConfig::default(),
            ratios: RatioCalculator::new(),
        }
    }

    pub fn with_config(config: ClassifierConfig) -> Self {
        Self {
            config,
            ratios: RatioCalculator::new(),
        }
    }

    /// First matching rule wins; identical inputs always produce the same
    /// tier regardless of batch composition.
    pub fn classify(&self, signals: &EntitySignals) -> RecommendationTier {
        self.config
            .rules
            .iter()
            .find(|rule| {
                rule.matches(
                    signals.current_margin,
                    signals.revenue_growth,
                    signals.margin_volatility,
                )
            })
            .map(|rule| rule.tier)
            .unwrap_or(self.config.fallback_tier)
    }

    /// Risk profile from volatility alone, independent of the tier.
    pub fn risk_profile(&self, volatility: f64) -> RiskProfile {
        self.config
            .risk_bands
            .iter()
            .find(|(threshold, _)| volatility > *threshold)
            .map(|(_, profile)| *profile)
            .unwrap_or(self.config.risk_fallback)
    }

    /// Derive classifier inputs from the annual partition. `None` when the
    /// entity lacks the minimum history or any input is uncomputable; such
    /// entities are excluded from classification, not defaulted.
    pub fn derive_signals(
        &self,
        sequencer: &PeriodSequencer,
        as_of_year: i32,
    ) -> Option<EntitySignals> {
        let annual = sequencer.partition(FilingType::Annual);
        let recent_cutoff = as_of_year - self.config.recent_years;
        let historical_cutoff = recent_cutoff - self.config.historical_years;

        let yearly_margins: Vec<(i32, f64)> = annual
            .iter()
            .filter_map(|r| {
                self.ratios
                    .net_margin(r.net_income, r.revenue)
                    .map(|m| (r.fiscal_year, m))
            })
            .collect();
        if yearly_margins.len() < self.config.min_history_years {
            return None;
        }

        let margins: Vec<f64> = yearly_margins.iter().map(|&(_, m)| m).collect();
        let margin_volatility = margins.std_dev();

        let recent_margins: Vec<f64> = yearly_margins
            .iter()
            .filter(|&&(year, _)| year > recent_cutoff)
            .map(|&(_, m)| m)
            .collect();
        if recent_margins.is_empty() {
            return None;
        }
        let current_margin = recent_margins.iter().sum::<f64>() / recent_margins.len() as f64;

        let revenue_in = |lo: i32, hi: i32| -> Vec<f64> {
            annual
                .iter()
                .filter(|r| r.fiscal_year > lo && r.fiscal_year <= hi)
                .filter_map(|r| r.revenue)
                .collect()
        };
        let recent_revenue = revenue_in(recent_cutoff, as_of_year);
        let historical_revenue = revenue_in(historical_cutoff, recent_cutoff);
        if recent_revenue.is_empty() || historical_revenue.is_empty() {
            return None;
        }
        let recent_avg = recent_revenue.iter().sum::<f64>() / recent_revenue.len() as f64;
        let historical_avg =
            historical_revenue.iter().sum::<f64>() / historical_revenue.len() as f64;
        if historical_avg <= 0.0 {
            return None;
        }
        let revenue_growth = (recent_avg - historical_avg) / historical_avg * 100.0;

        Some(EntitySignals {
            current_margin,
            revenue_growth,
            margin_volatility,
        })
    }

    /// Full classification for one entity, or `None` when excluded.
    pub fn classify_entity(
        &self,
        sequencer: &PeriodSequencer,
        as_of_year: i32,
    ) -> Option<EntityClassification> {
        let signals = self.derive_signals(sequencer, as_of_year)?;
        let tier = self.classify(&signals);
        let risk = self.risk_profile(signals.margin_volatility);
        Some(EntityClassification {
            cik: sequencer.cik().to_string(),
            signals,
            tier,
            risk,
        })
    }

    /// Presentation ordering contract: tier rank ascending (StrongBuy first),
    /// then current margin descending.
    pub fn rank(&self, classifications: &mut [EntityClassification]) {
        classifications.sort_by(|a, b| {
            a.tier.rank().cmp(&b.tier.rank()).then(
                b.signals
                    .current_margin
                    .partial_cmp(&a.signals.current_margin)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
        });
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}
