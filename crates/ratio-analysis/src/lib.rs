//! Statement ratios with explicit domain guards.
//!
//! Every ratio is a pure function of one filing record. A zero or absent
//! denominator yields no value, never zero and never an error; absence is a
//! first-class outcome that downstream scoring must propagate.

use filing_core::FilingRecord;
use serde::{Deserialize, Serialize};

/// Ratios derived from a single filing period. Margins and debt-to-assets are
/// percentages; current ratio and cash flow quality are raw multiples.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeriodRatios {
    pub net_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub current_ratio: Option<f64>,
    pub debt_to_assets: Option<f64>,
    pub cash_flow_quality: Option<f64>,
}

pub struct RatioCalculator;

impl RatioCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Net income as a percentage of revenue. Defined only when revenue is
    /// reported and positive.
    pub fn net_margin(&self, net_income: Option<f64>, revenue: Option<f64>) -> Option<f64> {
        match (net_income, revenue) {
            (Some(income), Some(rev)) if rev > 0.0 => Some(income / rev * 100.0),
            _ => None,
        }
    }

    /// Operating income as a percentage of revenue, same guard as net margin.
    pub fn operating_margin(
        &self,
        operating_income: Option<f64>,
        revenue: Option<f64>,
    ) -> Option<f64> {
        match (operating_income, revenue) {
            (Some(income), Some(rev)) if rev > 0.0 => Some(income / rev * 100.0),
            _ => None,
        }
    }

    /// Current assets over current liabilities. Defined only when current
    /// liabilities are reported and positive.
    pub fn current_ratio(
        &self,
        current_assets: Option<f64>,
        current_liabilities: Option<f64>,
    ) -> Option<f64> {
        match (current_assets, current_liabilities) {
            (Some(assets), Some(liabilities)) if liabilities > 0.0 => Some(assets / liabilities),
            _ => None,
        }
    }

    /// Total liabilities as a percentage of total assets. Defined only when
    /// total assets are reported and positive.
    pub fn debt_to_assets(
        &self,
        total_liabilities: Option<f64>,
        total_assets: Option<f64>,
    ) -> Option<f64> {
        match (total_liabilities, total_assets) {
            (Some(liabilities), Some(assets)) if assets > 0.0 => {
                Some(liabilities / assets * 100.0)
            }
            _ => None,
        }
    }

    /// Operating cash flow over net income. Defined for any non-zero net
    /// income; the sign carries meaning (negative earnings with positive cash
    /// flow is a negative ratio) and is never clamped.
    pub fn cash_flow_quality(
        &self,
        operating_cash_flow: Option<f64>,
        net_income: Option<f64>,
    ) -> Option<f64> {
        match (operating_cash_flow, net_income) {
            (Some(ocf), Some(income)) if income != 0.0 => Some(ocf / income),
            _ => None,
        }
    }

    /// All five ratios for one filing period.
    pub fn compute(&self, record: &FilingRecord) -> PeriodRatios {
        PeriodRatios {
            net_margin: self.net_margin(record.net_income, record.revenue),
            operating_margin: self.operating_margin(record.operating_income, record.revenue),
            current_ratio: self.current_ratio(record.current_assets, record.current_liabilities),
            debt_to_assets: self.debt_to_assets(record.total_liabilities, record.total_assets),
            cash_flow_quality: self
                .cash_flow_quality(record.operating_cash_flow, record.net_income),
        }
    }
}

impl Default for RatioCalculator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use filing_core::FilingType;

    fn base_record() -> FilingRecord {
        FilingRecord {
            cik: "0001".to_string(),
            filing_type: FilingType::Annual,
            fiscal_year: 2024,
            fiscal_quarter: None,
            filing_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            period_end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            revenue: None,
            operating_income: None,
            net_income: None,
            eps_basic: None,
            eps_diluted: None,
            total_assets: None,
            current_assets: None,
            total_liabilities: None,
            current_liabilities: None,
            stockholders_equity: None,
            operating_cash_flow: None,
            investing_cash_flow: None,
            financing_cash_flow: None,
            free_cash_flow: None,
        }
    }

    #[test]
    fn net_margin_requires_positive_revenue() {
        let calc = RatioCalculator::new();
        assert_eq!(calc.net_margin(Some(250.0), Some(1_000.0)), Some(25.0));
        assert_eq!(calc.net_margin(Some(250.0), Some(0.0)), None);
        assert_eq!(calc.net_margin(Some(250.0), Some(-10.0)), None);
        assert_eq!(calc.net_margin(Some(250.0), None), None);
        assert_eq!(calc.net_margin(None, Some(1_000.0)), None);
    }

    #[test]
    fn current_ratio_requires_positive_liabilities() {
        let calc = RatioCalculator::new();
        assert_eq!(
            calc.current_ratio(Some(3_000.0), Some(1_000.0)),
            Some(3.0)
        );
        assert_eq!(calc.current_ratio(Some(3_000.0), Some(0.0)), None);
        assert_eq!(calc.current_ratio(None, Some(1_000.0)), None);
    }

    #[test]
    fn debt_to_assets_is_a_percentage() {
        let calc = RatioCalculator::new();
        assert_eq!(
            calc.debt_to_assets(Some(1_500.0), Some(5_000.0)),
            Some(30.0)
        );
        assert_eq!(calc.debt_to_assets(Some(1_500.0), Some(0.0)), None);
    }

    #[test]
    fn cash_flow_quality_preserves_sign() {
        let calc = RatioCalculator::new();
        // Positive OCF against a loss: negative ratio, meaningful, not clamped.
        assert_eq!(
            calc.cash_flow_quality(Some(200.0), Some(-100.0)),
            Some(-2.0)
        );
        assert_eq!(calc.cash_flow_quality(Some(200.0), Some(0.0)), None);
        assert_eq!(calc.cash_flow_quality(Some(300.0), Some(200.0)), Some(1.5));
    }

    #[test]
    fn compute_fills_defined_ratios_and_leaves_the_rest_absent() {
        let mut record = base_record();
        record.revenue = Some(1_000.0);
        record.net_income = Some(250.0);
        // No balance sheet fields reported.
        let ratios = RatioCalculator::new().compute(&record);

        assert_eq!(ratios.net_margin, Some(25.0));
        assert_eq!(ratios.operating_margin, None);
        assert_eq!(ratios.current_ratio, None);
        assert_eq!(ratios.debt_to_assets, None);
        assert_eq!(ratios.cash_flow_quality, None);
    }

    #[test]
    fn all_ratios_absent_on_an_empty_record() {
        let ratios = RatioCalculator::new().compute(&base_record());
        assert!(ratios.net_margin.is_none());
        assert!(ratios.operating_margin.is_none());
        assert!(ratios.current_ratio.is_none());
        assert!(ratios.debt_to_assets.is_none());
        assert!(ratios.cash_flow_quality.is_none());
    }
}
