//! Batch orchestration of the filing analytics engines.
//!
//! Takes an immutable snapshot of companies and filing records (mixed
//! entities, mixed filing types) plus an explicit as-of date and produces
//! per-entity, per-period results: ratios, trends, health scores, ranked
//! recommendations, and coverage diagnostics. Pure computation; entities are
//! independent, so callers may fan out per entity if they want parallelism.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use coverage_audit::{CoverageAuditor, CoverageReport};
use filing_core::{
    AnalysisError, Company, FilingRecord, FilingType, PeriodKey, PeriodSequencer,
    RecommendationTier, RiskProfile,
};
use health_score::{HealthScore, HealthScorer};
use ratio_analysis::{PeriodRatios, RatioCalculator};
use recommendation_engine::{EntityClassification, RecommendationEngine};
use serde::{Deserialize, Serialize};
use trend_analysis::{PeriodTrends, TrendAnalyzer};

/// Everything the engines derive for one filing period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodAnalysis {
    pub period: PeriodKey,
    pub filing_type: FilingType,
    pub fiscal_year: i32,
    pub fiscal_quarter: Option<u8>,
    pub ratios: PeriodRatios,
    pub trends: PeriodTrends,
    /// Absent when any required ratio is undefined for the period.
    pub health: Option<HealthScore>,
}

/// Reporting row for one filing period: raw figures scaled to millions plus
/// the presentation ratios. Serialization to CSV or rows is the reporting
/// collaborator's job.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodSummary {
    pub ticker: String,
    pub company_name: String,
    pub fiscal_year: i32,
    pub fiscal_quarter: Option<u8>,
    pub form_type: &'static str,
    pub filing_date: NaiveDate,
    pub period_end_date: NaiveDate,
    pub revenue_millions: Option<f64>,
    pub operating_income_millions: Option<f64>,
    pub net_income_millions: Option<f64>,
    pub eps_basic: Option<f64>,
    pub eps_diluted: Option<f64>,
    pub total_assets_millions: Option<f64>,
    pub current_assets_millions: Option<f64>,
    pub total_liabilities_millions: Option<f64>,
    pub current_liabilities_millions: Option<f64>,
    pub stockholders_equity_millions: Option<f64>,
    pub operating_cash_flow_millions: Option<f64>,
    pub investing_cash_flow_millions: Option<f64>,
    pub financing_cash_flow_millions: Option<f64>,
    pub net_margin_percent: Option<f64>,
    pub operating_margin_percent: Option<f64>,
    pub current_ratio: Option<f64>,
    pub debt_to_assets_percent: Option<f64>,
}

/// Per-entity results: both period partitions (ascending by period key) and
/// the coverage diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityAnalysis {
    pub company: Company,
    pub annual_periods: Vec<PeriodAnalysis>,
    pub quarterly_periods: Vec<PeriodAnalysis>,
    pub coverage: CoverageReport,
}

/// One row of the ranked recommendation output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedRecommendation {
    pub cik: String,
    pub ticker: String,
    pub company_name: String,
    pub current_margin: f64,
    pub revenue_growth: f64,
    pub margin_volatility: f64,
    pub tier: RecommendationTier,
    pub risk: RiskProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchAnalysis {
    pub as_of: NaiveDate,
    /// One entry per registered company, ordered by ticker.
    pub entities: Vec<EntityAnalysis>,
    /// Classified entities only, ordered by tier rank then current margin
    /// descending. Entities with insufficient history are absent.
    pub recommendations: Vec<RankedRecommendation>,
    /// Reporting rows across the whole batch, entity by entity.
    pub summaries: Vec<PeriodSummary>,
}

pub struct FilingAnalyticsEngine {
    ratio_calculator: RatioCalculator,
    trend_analyzer: TrendAnalyzer,
    health_scorer: HealthScorer,
    recommendation_engine: RecommendationEngine,
    coverage_auditor: CoverageAuditor,
}

impl FilingAnalyticsEngine {
    pub fn new() -> Self {
        Self {
            ratio_calculator: RatioCalculator::new(),
            trend_analyzer: TrendAnalyzer::new(),
            health_scorer: HealthScorer::new(),
            recommendation_engine: RecommendationEngine::new(),
            coverage_auditor: CoverageAuditor::new(),
        }
    }

    /// Analyze a batch snapshot. Malformed input (a record for an
    /// unregistered CIK, a duplicate period key) fails once here, at the
    /// batch boundary; recoverable per-record gaps flow through as absent
    /// values.
    pub fn analyze_batch(
        &self,
        companies: &[Company],
        records: &[FilingRecord],
        as_of: NaiveDate,
    ) -> Result<BatchAnalysis, AnalysisError> {
        let registry: HashMap<&str, &Company> =
            companies.iter().map(|c| (c.cik.as_str(), c)).collect();
        if let Some(orphan) = records
            .iter()
            .find(|r| !registry.contains_key(r.cik.as_str()))
        {
            return Err(AnalysisError::InvalidData(format!(
                "filing record for unregistered CIK {}",
                orphan.cik
            )));
        }

        let mut ordered: Vec<&Company> = companies.iter().collect();
        ordered.sort_by(|a, b| a.ticker.cmp(&b.ticker));

        let mut entities = Vec::with_capacity(ordered.len());
        let mut classifications: Vec<EntityClassification> = Vec::new();
        let mut summaries = Vec::new();

        for company in ordered {
            let sequencer = PeriodSequencer::build(&company.cik, records)?;
            tracing::debug!(
                "analyzing {} ({}): {} annual / {} quarterly filings",
                company.ticker,
                company.cik,
                sequencer.partition(FilingType::Annual).len(),
                sequencer.partition(FilingType::Quarterly).len()
            );

            let annual_periods = self.analyze_partition(&sequencer, FilingType::Annual);
            let quarterly_periods = self.analyze_partition(&sequencer, FilingType::Quarterly);
            let coverage = self.coverage_auditor.audit(&sequencer, as_of);

            match self
                .recommendation_engine
                .classify_entity(&sequencer, as_of.year())
            {
                Some(classification) => classifications.push(classification),
                None => tracing::debug!(
                    "{}: insufficient annual history, excluded from classification",
                    company.ticker
                ),
            }

            for (record, ratios) in sequencer
                .partition(FilingType::Annual)
                .iter()
                .chain(sequencer.partition(FilingType::Quarterly).iter())
                .map(|r| (r, self.ratio_calculator.compute(r)))
            {
                summaries.push(summary_row(company, record, &ratios));
            }

            entities.push(EntityAnalysis {
                company: company.clone(),
                annual_periods,
                quarterly_periods,
                coverage,
            });
        }

        self.recommendation_engine.rank(&mut classifications);
        let recommendations = classifications
            .into_iter()
            .map(|c| {
                let company = registry[c.cik.as_str()];
                RankedRecommendation {
                    cik: c.cik,
                    ticker: company.ticker.clone(),
                    company_name: company.company_name.clone(),
                    current_margin: c.signals.current_margin,
                    revenue_growth: c.signals.revenue_growth,
                    margin_volatility: c.signals.margin_volatility,
                    tier: c.tier,
                    risk: c.risk,
                }
            })
            .collect::<Vec<_>>();

        tracing::info!(
            "analyzed {} entities, {} classified, {} summary rows",
            entities.len(),
            recommendations.len(),
            summaries.len()
        );

        Ok(BatchAnalysis {
            as_of,
            entities,
            recommendations,
            summaries,
        })
    }

    fn analyze_partition(
        &self,
        sequencer: &PeriodSequencer,
        filing_type: FilingType,
    ) -> Vec<PeriodAnalysis> {
        let trends = self.trend_analyzer.analyze_partition(sequencer, filing_type);
        sequencer
            .partition(filing_type)
            .iter()
            .zip(trends)
            .map(|(record, trends)| {
                let ratios = self.ratio_calculator.compute(record);
                let health = self.health_scorer.score(&ratios);
                PeriodAnalysis {
                    period: record.period_key(),
                    filing_type,
                    fiscal_year: record.fiscal_year,
                    fiscal_quarter: record.fiscal_quarter,
                    ratios,
                    trends,
                    health,
                }
            })
            .collect()
    }
}

impl Default for FilingAnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn millions(value: Option<f64>) -> Option<f64> {
    value.map(|v| (v / 1_000_000.0 * 100.0).round() / 100.0)
}

fn rounded(value: Option<f64>) -> Option<f64> {
    value.map(|v| (v * 100.0).round() / 100.0)
}

fn summary_row(company: &Company, record: &FilingRecord, ratios: &PeriodRatios) -> PeriodSummary {
    PeriodSummary {
        ticker: company.ticker.clone(),
        company_name: company.company_name.clone(),
        fiscal_year: record.fiscal_year,
        fiscal_quarter: record.fiscal_quarter,
        form_type: record.filing_type.as_form_type(),
        filing_date: record.filing_date,
        period_end_date: record.period_end_date,
        revenue_millions: millions(record.revenue),
        operating_income_millions: millions(record.operating_income),
        net_income_millions: millions(record.net_income),
        eps_basic: record.eps_basic,
        eps_diluted: record.eps_diluted,
        total_assets_millions: millions(record.total_assets),
        current_assets_millions: millions(record.current_assets),
        total_liabilities_millions: millions(record.total_liabilities),
        current_liabilities_millions: millions(record.current_liabilities),
        stockholders_equity_millions: millions(record.stockholders_equity),
        operating_cash_flow_millions: millions(record.operating_cash_flow),
        investing_cash_flow_millions: millions(record.investing_cash_flow),
        financing_cash_flow_millions: millions(record.financing_cash_flow),
        net_margin_percent: rounded(ratios.net_margin),
        operating_margin_percent: rounded(ratios.operating_margin),
        current_ratio: rounded(ratios.current_ratio),
        debt_to_assets_percent: rounded(ratios.debt_to_assets),
    }
}
