//! Period-over-period trends within a filing-type partition.
//!
//! Growth rates compare against the N-th prior *filed* record of the same
//! filing type (see `filing_core::PeriodSequencer`); annual and quarterly
//! sequences never mix. All rates are percentages.

use filing_core::{FilingRecord, FilingType, GrowthCategory, PeriodKey, PeriodSequencer};
use serde::{Deserialize, Serialize};

/// Ordered growth buckets applied to a growth percentage. Evaluated top-down,
/// first match wins; anything below the last threshold takes the fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthBands {
    /// (exclusive lower threshold, category), descending by threshold.
    pub bands: Vec<(f64, GrowthCategory)>,
    pub fallback: GrowthCategory,
}

impl Default for GrowthBands {
    fn default() -> Self {
        Self {
            bands: vec![
                (20.0, GrowthCategory::HighGrowth),
                (10.0, GrowthCategory::SteadyGrowth),
                (0.0, GrowthCategory::ModestGrowth),
            ],
            fallback: GrowthCategory::Declining,
        }
    }
}

impl GrowthBands {
    pub fn categorize(&self, growth_pct: f64) -> GrowthCategory {
        self.bands
            .iter()
            .find(|(threshold, _)| growth_pct > *threshold)
            .map(|(_, category)| *category)
            .unwrap_or(self.fallback)
    }
}

/// Trend metrics for one period within one filing-type partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodTrends {
    pub period: PeriodKey,
    pub filing_type: FilingType,
    pub revenue_sequential_growth: Option<f64>,
    /// Quarterly: vs. 4 quarterly periods back. Annual: same as sequential.
    pub revenue_yoy_growth: Option<f64>,
    pub revenue_growth_category: Option<GrowthCategory>,
    pub net_income_sequential_growth: Option<f64>,
    pub net_income_yoy_growth: Option<f64>,
    /// Trailing 3-period revenue average; absent periods excluded.
    pub revenue_rolling_average: Option<f64>,
    /// Compound revenue growth over the configured lookback.
    pub revenue_compound_growth: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Trailing window for rolling averages (current + n-1 prior periods).
    pub rolling_window: usize,
    /// Lookback in periods for the compound growth rate.
    pub compound_periods: usize,
    pub growth_bands: GrowthBands,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            rolling_window: 3,
            compound_periods: 3,
            growth_bands: GrowthBands::default(),
        }
    }
}

pub struct TrendAnalyzer {
    config: TrendConfig,
}

impl TrendAnalyzer {
    pub fn new() -> Self {
        Self {
            config: TrendConfig::default(),
        }
    }

    pub fn with_config(config: TrendConfig) -> Self {
        Self { config }
    }

    /// `(current - previous) / |previous| * 100`. Undefined when either value
    /// is absent or the previous value is zero.
    pub fn growth_rate(&self, current: Option<f64>, previous: Option<f64>) -> Option<f64> {
        match (current, previous) {
            (Some(cur), Some(prev)) if prev != 0.0 => Some((cur - prev) / prev.abs() * 100.0),
            _ => None,
        }
    }

    /// `((current / base)^(1/n) - 1) * 100`. Undefined when the base is
    /// absent, zero, or the ratio would put a negative number under a
    /// fractional exponent.
    pub fn compound_growth_rate(
        &self,
        current: Option<f64>,
        base: Option<f64>,
        periods: usize,
    ) -> Option<f64> {
        match (current, base) {
            (Some(cur), Some(b)) if periods > 0 && b > 0.0 && cur / b > 0.0 => {
                Some(((cur / b).powf(1.0 / periods as f64) - 1.0) * 100.0)
            }
            _ => None,
        }
    }

    /// Mean of the defined values; absent values are excluded, not zeroed.
    /// Undefined when no defined value exists.
    pub fn rolling_average(&self, values: &[Option<f64>]) -> Option<f64> {
        let defined: Vec<f64> = values.iter().flatten().copied().collect();
        if defined.is_empty() {
            None
        } else {
            Some(defined.iter().sum::<f64>() / defined.len() as f64)
        }
    }

    pub fn categorize(&self, growth_pct: f64) -> GrowthCategory {
        self.config.growth_bands.categorize(growth_pct)
    }

    /// Trend metrics for every period of one filing-type partition, ascending
    /// by period key.
    pub fn analyze_partition(
        &self,
        sequencer: &PeriodSequencer,
        filing_type: FilingType,
    ) -> Vec<PeriodTrends> {
        let partition = sequencer.partition(filing_type);
        let yoy_offset = match filing_type {
            FilingType::Quarterly => 4,
            FilingType::Annual => 1,
        };

        partition
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let prev = |offset: usize| sequencer.previous(filing_type, index, offset);

                let revenue_sequential_growth =
                    self.growth_rate(record.revenue, prev(1).and_then(|r| r.revenue));
                let revenue_yoy_growth =
                    self.growth_rate(record.revenue, prev(yoy_offset).and_then(|r| r.revenue));
                let net_income_sequential_growth =
                    self.growth_rate(record.net_income, prev(1).and_then(|r| r.net_income));
                let net_income_yoy_growth = self.growth_rate(
                    record.net_income,
                    prev(yoy_offset).and_then(|r| r.net_income),
                );

                let window_start =
                    index.saturating_sub(self.config.rolling_window.saturating_sub(1));
                let window: Vec<Option<f64>> = partition[window_start..=index]
                    .iter()
                    .map(|r: &FilingRecord| r.revenue)
                    .collect();
                let revenue_rolling_average = self.rolling_average(&window);

                let revenue_compound_growth = self.compound_growth_rate(
                    record.revenue,
                    prev(self.config.compound_periods).and_then(|r| r.revenue),
                    self.config.compound_periods,
                );

                PeriodTrends {
                    period: record.period_key(),
                    filing_type,
                    revenue_sequential_growth,
                    revenue_yoy_growth,
                    revenue_growth_category: revenue_yoy_growth.map(|g| self.categorize(g)),
                    net_income_sequential_growth,
                    net_income_yoy_growth,
                    revenue_rolling_average,
                    revenue_compound_growth,
                }
            })
            .collect()
    }
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(
        filing_type: FilingType,
        year: i32,
        quarter: Option<u8>,
        revenue: Option<f64>,
        net_income: Option<f64>,
    ) -> FilingRecord {
        let month = quarter.map(|q| u32::from(q) * 3).unwrap_or(12);
        FilingRecord {
            cik: "0001".to_string(),
            filing_type,
            fiscal_year: year,
            fiscal_quarter: quarter,
            filing_date: NaiveDate::from_ymd_opt(year, month, 15).unwrap(),
            period_end_date: NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
            revenue,
            operating_income: None,
            net_income,
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

    fn annual_sequencer(revenues: &[(i32, Option<f64>)]) -> PeriodSequencer {
        let records: Vec<FilingRecord> = revenues
            .iter()
            .map(|&(year, rev)| record(FilingType::Annual, year, None, rev, None))
            .collect();
        PeriodSequencer::build("0001", &records).unwrap()
    }

    #[test]
    fn growth_rate_guards_zero_and_absent_previous() {
        let analyzer = TrendAnalyzer::new();
        assert_eq!(
            analyzer.growth_rate(Some(120.0), Some(100.0)),
            Some(20.0)
        );
        assert_eq!(analyzer.growth_rate(Some(120.0), Some(0.0)), None);
        assert_eq!(analyzer.growth_rate(Some(120.0), None), None);
        assert_eq!(analyzer.growth_rate(None, Some(100.0)), None);
    }

    #[test]
    fn growth_rate_uses_absolute_previous_as_denominator() {
        let analyzer = TrendAnalyzer::new();
        // Loss shrinking from -100 to -50 is an improvement of +50%.
        assert_eq!(
            analyzer.growth_rate(Some(-50.0), Some(-100.0)),
            Some(50.0)
        );
    }

    #[test]
    fn compound_growth_guards_non_positive_bases() {
        let analyzer = TrendAnalyzer::new();
        let cagr = analyzer
            .compound_growth_rate(Some(1_331.0), Some(1_000.0), 3)
            .unwrap();
        assert!((cagr - 10.0).abs() < 1e-9);

        assert_eq!(analyzer.compound_growth_rate(Some(100.0), Some(0.0), 3), None);
        assert_eq!(
            analyzer.compound_growth_rate(Some(100.0), Some(-50.0), 3),
            None
        );
        // Negative ratio would need a fractional power of a negative base.
        assert_eq!(
            analyzer.compound_growth_rate(Some(-100.0), Some(50.0), 3),
            None
        );
    }

    #[test]
    fn rolling_average_excludes_absent_values() {
        let analyzer = TrendAnalyzer::new();
        assert_eq!(
            analyzer.rolling_average(&[Some(100.0), None, Some(200.0)]),
            Some(150.0)
        );
        assert_eq!(analyzer.rolling_average(&[None, None, None]), None);
        assert_eq!(analyzer.rolling_average(&[Some(42.0)]), Some(42.0));
    }

    #[test]
    fn bucket_assignment_is_exhaustive_and_first_match_wins() {
        let bands = GrowthBands::default();
        assert_eq!(bands.categorize(25.0), GrowthCategory::HighGrowth);
        assert_eq!(bands.categorize(20.0), GrowthCategory::SteadyGrowth);
        assert_eq!(bands.categorize(15.0), GrowthCategory::SteadyGrowth);
        assert_eq!(bands.categorize(10.0), GrowthCategory::ModestGrowth);
        assert_eq!(bands.categorize(5.0), GrowthCategory::ModestGrowth);
        assert_eq!(bands.categorize(0.0), GrowthCategory::Declining);
        assert_eq!(bands.categorize(-12.0), GrowthCategory::Declining);
    }

    #[test]
    fn annual_yoy_equals_sequential() {
        let seq = annual_sequencer(&[
            (2021, Some(1_000.0)),
            (2022, Some(1_050.0)),
            (2023, Some(1_102.5)),
        ]);
        let trends = TrendAnalyzer::new().analyze_partition(&seq, FilingType::Annual);

        let latest = trends.last().unwrap();
        assert_eq!(latest.revenue_sequential_growth, latest.revenue_yoy_growth);
        let growth = latest.revenue_sequential_growth.unwrap();
        assert!((growth - 5.0).abs() < 1e-9);
        assert_eq!(
            latest.revenue_growth_category,
            Some(GrowthCategory::ModestGrowth)
        );
    }

    #[test]
    fn quarterly_yoy_compares_four_periods_back() {
        let records: Vec<FilingRecord> = [
            (2023, 1, 100.0),
            (2023, 2, 110.0),
            (2023, 3, 120.0),
            (2023, 4, 130.0),
            (2024, 1, 150.0),
        ]
        .iter()
        .map(|&(y, q, rev)| record(FilingType::Quarterly, y, Some(q), Some(rev), None))
        .collect();
        let seq = PeriodSequencer::build("0001", &records).unwrap();
        let trends = TrendAnalyzer::new().analyze_partition(&seq, FilingType::Quarterly);

        let latest = trends.last().unwrap();
        let yoy = latest.revenue_yoy_growth.unwrap();
        assert!((yoy - 50.0).abs() < 1e-9);
        let sequential = latest.revenue_sequential_growth.unwrap();
        assert!((sequential - (20.0 / 130.0 * 100.0)).abs() < 1e-9);
    }

    #[test]
    fn first_period_has_no_growth_but_has_a_rolling_average() {
        let seq = annual_sequencer(&[(2022, Some(500.0)), (2023, Some(600.0))]);
        let trends = TrendAnalyzer::new().analyze_partition(&seq, FilingType::Annual);

        assert_eq!(trends[0].revenue_sequential_growth, None);
        assert_eq!(trends[0].revenue_rolling_average, Some(500.0));
        assert_eq!(trends[1].revenue_rolling_average, Some(550.0));
    }

    #[test]
    fn undefined_inputs_propagate_cleanly_through_rolling_averages() {
        let seq = annual_sequencer(&[(2021, None), (2022, None), (2023, None)]);
        let trends = TrendAnalyzer::new().analyze_partition(&seq, FilingType::Annual);

        for t in &trends {
            assert_eq!(t.revenue_rolling_average, None);
            assert_eq!(t.revenue_sequential_growth, None);
            assert_eq!(t.revenue_growth_category, None);
        }
    }
}
