//! Period ordering and lag lookups for one entity's filing history.
//!
//! Annual and quarterly filings are sequenced as independent partitions;
//! `previous` never crosses from one partition into the other. Offsets count
//! filed records, not calendar periods: a missing quarter silently shifts a
//! 4-period lookback onto an older quarter. Callers treat that as a known
//! limitation of sparse filers rather than something to interpolate over.

use crate::error::AnalysisError;
use crate::types::{FilingRecord, FilingType};

/// One entity's filings, partitioned by filing type and sorted ascending by
/// (fiscal year, fiscal quarter).
#[derive(Debug, Clone)]
pub struct PeriodSequencer {
    cik: String,
    annual: Vec<FilingRecord>,
    quarterly: Vec<FilingRecord>,
}

impl PeriodSequencer {
    /// Build the sequencer from an unordered record set. Records belonging to
    /// other entities are ignored. A duplicate (filing type, fiscal year,
    /// fiscal quarter) key is a batch precondition violation and is reported
    /// here, once.
    pub fn build(cik: &str, records: &[FilingRecord]) -> Result<Self, AnalysisError> {
        let mut annual: Vec<FilingRecord> = Vec::new();
        let mut quarterly: Vec<FilingRecord> = Vec::new();

        for record in records.iter().filter(|r| r.cik == cik) {
            match record.filing_type {
                FilingType::Annual => annual.push(record.clone()),
                FilingType::Quarterly => quarterly.push(record.clone()),
            }
        }

        annual.sort_by_key(|r| r.period_key());
        quarterly.sort_by_key(|r| r.period_key());

        for partition in [&annual, &quarterly] {
            for pair in partition.windows(2) {
                if pair[0].period_key() == pair[1].period_key() {
                    return Err(AnalysisError::DuplicatePeriod {
                        cik: cik.to_string(),
                        filing_type: pair[0].filing_type,
                        fiscal_year: pair[0].fiscal_year,
                        fiscal_quarter: pair[0].fiscal_quarter.unwrap_or(0),
                    });
                }
            }
        }

        Ok(Self {
            cik: cik.to_string(),
            annual,
            quarterly,
        })
    }

    pub fn cik(&self) -> &str {
        &self.cik
    }

    /// Records of one partition, ascending by period key.
    pub fn partition(&self, filing_type: FilingType) -> &[FilingRecord] {
        match filing_type {
            FilingType::Annual => &self.annual,
            FilingType::Quarterly => &self.quarterly,
        }
    }

    /// The record `offset` positions earlier in the same partition, or `None`
    /// if the history does not reach that far. Strictly the N-th prior filed
    /// record of the same filing type, never the nearest record in absolute
    /// time.
    pub fn previous(
        &self,
        filing_type: FilingType,
        index: usize,
        offset: usize,
    ) -> Option<&FilingRecord> {
        let partition = self.partition(filing_type);
        if index >= partition.len() {
            return None;
        }
        index.checked_sub(offset).map(|i| &partition[i])
    }

    /// Most recent filing across both partitions, by filing date.
    pub fn latest_filed(&self) -> Option<&FilingRecord> {
        self.annual
            .iter()
            .chain(self.quarterly.iter())
            .max_by_key(|r| r.filing_date)
    }

    pub fn is_empty(&self) -> bool {
        self.annual.is_empty() && self.quarterly.is_empty()
    }
}
