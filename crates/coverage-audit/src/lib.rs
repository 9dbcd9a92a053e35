//! Data-completeness and staleness diagnostics per entity.
//!
//! Independent of the scoring pipeline; shares the period sequencer. All
//! time-relative figures are computed against a caller-supplied as-of date,
//! never an implicit clock read, so the audit stays deterministic.

use chrono::{Datelike, NaiveDate};
use filing_core::{CoverageQuality, FilingType, PeriodSequencer, RecencyStatus};
use serde::{Deserialize, Serialize};

/// One row of the coverage band table, first match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageBand {
    pub min_annual: usize,
    pub min_quarterly: usize,
    pub quality: CoverageQuality,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageConfig {
    /// Trailing fiscal-year window for the annual count, anchored on the
    /// as-of calendar year.
    pub annual_window_years: i32,
    /// Trailing fiscal-year window for the quarterly count.
    pub quarterly_window_years: i32,
    pub coverage_bands: Vec<CoverageBand>,
    pub coverage_fallback: CoverageQuality,
    /// (inclusive max days, status), ascending.
    pub recency_bands: Vec<(i64, RecencyStatus)>,
    pub recency_fallback: RecencyStatus,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            annual_window_years: 5,
            quarterly_window_years: 3,
            coverage_bands: vec![
                CoverageBand {
                    min_annual: 4,
                    min_quarterly: 6,
                    quality: CoverageQuality::Excellent,
                },
                CoverageBand {
                    min_annual: 3,
                    min_quarterly: 3,
                    quality: CoverageQuality::Good,
                },
                CoverageBand {
                    min_annual: 2,
                    min_quarterly: 0,
                    quality: CoverageQuality::Limited,
                },
            ],
            coverage_fallback: CoverageQuality::Poor,
            recency_bands: vec![
                (90, RecencyStatus::Current),
                (180, RecencyStatus::Recent),
                (365, RecencyStatus::Stale),
            ],
            recency_fallback: RecencyStatus::VeryStale,
        }
    }
}

/// Per-filing-type history extent and windowed count.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilingTypeCoverage {
    pub windowed_count: usize,
    pub earliest_fiscal_year: Option<i32>,
    pub latest_fiscal_year: Option<i32>,
}

/// Identity of the most recently filed record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestFiling {
    pub filing_type: FilingType,
    pub fiscal_year: i32,
    pub fiscal_quarter: Option<u8>,
    pub filing_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageReport {
    pub cik: String,
    pub total_records: usize,
    pub annual: FilingTypeCoverage,
    pub quarterly: FilingTypeCoverage,
    pub latest_filing: Option<LatestFiling>,
    pub days_since_latest_filing: Option<i64>,
    pub coverage_quality: CoverageQuality,
    pub recency: Option<RecencyStatus>,
}

pub struct CoverageAuditor {
    config: CoverageConfig,
}

impl CoverageAuditor {
    pub fn new() -> Self {
        Self {
            config: CoverageConfig::default(),
        }
    }

    pub fn with_config(config: CoverageConfig) -> Self {
        Self { config }
    }

    fn type_coverage(
        &self,
        sequencer: &PeriodSequencer,
        filing_type: FilingType,
        window_years: i32,
        as_of_year: i32,
    ) -> FilingTypeCoverage {
        let partition = sequencer.partition(filing_type);
        let cutoff = as_of_year - window_years;
        FilingTypeCoverage {
            windowed_count: partition
                .iter()
                .filter(|r| r.fiscal_year > cutoff)
                .count(),
            earliest_fiscal_year: partition.first().map(|r| r.fiscal_year),
            latest_fiscal_year: partition.last().map(|r| r.fiscal_year),
        }
    }

    pub fn coverage_quality(&self, annual_count: usize, quarterly_count: usize) -> CoverageQuality {
        self.config
            .coverage_bands
            .iter()
            .find(|band| annual_count >= band.min_annual && quarterly_count >= band.min_quarterly)
            .map(|band| band.quality)
            .unwrap_or(self.config.coverage_fallback)
    }

    pub fn recency(&self, days_since_latest: i64) -> RecencyStatus {
        self.config
            .recency_bands
            .iter()
            .find(|(max_days, _)| days_since_latest <= *max_days)
            .map(|(_, status)| *status)
            .unwrap_or(self.config.recency_fallback)
    }

    pub fn audit(&self, sequencer: &PeriodSequencer, as_of: NaiveDate) -> CoverageReport {
        let as_of_year = as_of.year();
        let annual = self.type_coverage(
            sequencer,
            FilingType::Annual,
            self.config.annual_window_years,
            as_of_year,
        );
        let quarterly = self.type_coverage(
            sequencer,
            FilingType::Quarterly,
            self.config.quarterly_window_years,
            as_of_year,
        );

        let latest_filing = sequencer.latest_filed().map(|r| LatestFiling {
            filing_type: r.filing_type,
            fiscal_year: r.fiscal_year,
            fiscal_quarter: r.fiscal_quarter,
            filing_date: r.filing_date,
        });
        let days_since_latest_filing = latest_filing
            .as_ref()
            .map(|latest| (as_of - latest.filing_date).num_days());

        CoverageReport {
            cik: sequencer.cik().to_string(),
            total_records: sequencer.partition(FilingType::Annual).len()
                + sequencer.partition(FilingType::Quarterly).len(),
            coverage_quality: self
                .coverage_quality(annual.windowed_count, quarterly.windowed_count),
            recency: days_since_latest_filing.map(|days| self.recency(days)),
            annual,
            quarterly,
            latest_filing,
            days_since_latest_filing,
        }
    }
}

impl Default for CoverageAuditor {
    fn default() -> Self {
        Self::new()
    }
}
