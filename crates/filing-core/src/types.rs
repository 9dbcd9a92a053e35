use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A covered company. Registered at onboarding, never mutated by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub cik: String,
    pub ticker: String,
    pub company_name: String,
}

/// Filing type. Annual and quarterly filings form independent time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilingType {
    Annual,
    Quarterly,
}

impl FilingType {
    /// Map a raw SEC form type string to a filing type.
    pub fn from_form_type(form_type: &str) -> Option<Self> {
        match form_type.trim() {
            "10-K" => Some(FilingType::Annual),
            "10-Q" => Some(FilingType::Quarterly),
            _ => None,
        }
    }

    pub fn as_form_type(&self) -> &'static str {
        match self {
            FilingType::Annual => "10-K",
            FilingType::Quarterly => "10-Q",
        }
    }
}

/// One statement snapshot for one entity. Immutable once ingested; a restated
/// filing arrives as a new record, never as an in-place update.
///
/// Absent financial fields mean "not reported" and stay absent through every
/// downstream computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingRecord {
    pub cik: String,
    pub filing_type: FilingType,
    pub fiscal_year: i32,
    /// 1-4 for quarterly filings, `None` for annual.
    pub fiscal_quarter: Option<u8>,
    pub filing_date: NaiveDate,
    pub period_end_date: NaiveDate,

    // Income statement
    pub revenue: Option<f64>,
    pub operating_income: Option<f64>,
    pub net_income: Option<f64>,
    pub eps_basic: Option<f64>,
    pub eps_diluted: Option<f64>,

    // Balance sheet
    pub total_assets: Option<f64>,
    pub current_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub current_liabilities: Option<f64>,
    pub stockholders_equity: Option<f64>,

    // Cash flow
    pub operating_cash_flow: Option<f64>,
    pub investing_cash_flow: Option<f64>,
    pub financing_cash_flow: Option<f64>,
    pub free_cash_flow: Option<f64>,
}

impl FilingRecord {
    /// Ordering key within a filing-type partition.
    pub fn period_key(&self) -> PeriodKey {
        PeriodKey {
            fiscal_year: self.fiscal_year,
            fiscal_quarter: self.fiscal_quarter.unwrap_or(0),
        }
    }
}

/// Derived ordering key: (fiscal year, fiscal quarter-or-0). Annual and
/// quarterly sequences are ordered and compared independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeriodKey {
    pub fiscal_year: i32,
    pub fiscal_quarter: u8,
}

/// Growth category buckets, evaluated top-down over a growth percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthCategory {
    HighGrowth,
    SteadyGrowth,
    ModestGrowth,
    Declining,
}

impl GrowthCategory {
    pub fn label(&self) -> &'static str {
        match self {
            GrowthCategory::HighGrowth => "high growth",
            GrowthCategory::SteadyGrowth => "steady growth",
            GrowthCategory::ModestGrowth => "modest growth",
            GrowthCategory::Declining => "declining",
        }
    }
}

/// Rating label on the composite health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthRating {
    pub fn label(&self) -> &'static str {
        match self {
            HealthRating::Excellent => "excellent",
            HealthRating::Good => "good",
            HealthRating::Fair => "fair",
            HealthRating::Poor => "poor",
        }
    }
}

/// Investment action tiers, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationTier {
    StrongBuy,
    Buy,
    Hold,
    WeakHold,
    Sell,
}

impl RecommendationTier {
    /// Presentation rank: StrongBuy first.
    pub fn rank(&self) -> u8 {
        match self {
            RecommendationTier::StrongBuy => 0,
            RecommendationTier::Buy => 1,
            RecommendationTier::Hold => 2,
            RecommendationTier::WeakHold => 3,
            RecommendationTier::Sell => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecommendationTier::StrongBuy => "STRONG_BUY",
            RecommendationTier::Buy => "BUY",
            RecommendationTier::Hold => "HOLD",
            RecommendationTier::WeakHold => "WEAK_HOLD",
            RecommendationTier::Sell => "SELL",
        }
    }
}

/// Risk profile from margin volatility, independent of the recommendation tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskProfile {
    High,
    Medium,
    Low,
}

impl RiskProfile {
    pub fn label(&self) -> &'static str {
        match self {
            RiskProfile::High => "HIGH",
            RiskProfile::Medium => "MEDIUM",
            RiskProfile::Low => "LOW",
        }
    }
}

/// Completeness rating of an entity's filing history within a trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoverageQuality {
    Excellent,
    Good,
    Limited,
    Poor,
}

impl CoverageQuality {
    pub fn label(&self) -> &'static str {
        match self {
            CoverageQuality::Excellent => "excellent",
            CoverageQuality::Good => "good",
            CoverageQuality::Limited => "limited",
            CoverageQuality::Poor => "poor",
        }
    }
}

/// Staleness rating on days since the latest filing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecencyStatus {
    Current,
    Recent,
    Stale,
    VeryStale,
}

impl RecencyStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RecencyStatus::Current => "current",
            RecencyStatus::Recent => "recent",
            RecencyStatus::Stale => "stale",
            RecencyStatus::VeryStale => "very stale",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_type_mapping_round_trips() {
        assert_eq!(FilingType::from_form_type("10-K"), Some(FilingType::Annual));
        assert_eq!(
            FilingType::from_form_type("10-Q"),
            Some(FilingType::Quarterly)
        );
        assert_eq!(FilingType::from_form_type(" 10-K "), Some(FilingType::Annual));
        assert_eq!(FilingType::from_form_type("8-K"), None);
        assert_eq!(FilingType::Annual.as_form_type(), "10-K");
        assert_eq!(FilingType::Quarterly.as_form_type(), "10-Q");
    }

    #[test]
    fn period_keys_order_annual_before_quarters_within_a_year() {
        let annual = PeriodKey {
            fiscal_year: 2023,
            fiscal_quarter: 0,
        };
        let q1 = PeriodKey {
            fiscal_year: 2023,
            fiscal_quarter: 1,
        };
        let prior_q4 = PeriodKey {
            fiscal_year: 2022,
            fiscal_quarter: 4,
        };
        assert!(prior_q4 < annual);
        assert!(annual < q1);
    }

    #[test]
    fn tier_ranks_are_strictly_ordered() {
        let tiers = [
            RecommendationTier::StrongBuy,
            RecommendationTier::Buy,
            RecommendationTier::Hold,
            RecommendationTier::WeakHold,
            RecommendationTier::Sell,
        ];
        for pair in tiers.windows(2) {
            assert!(pair[0].rank() < pair[1].rank());
        }
    }
}
