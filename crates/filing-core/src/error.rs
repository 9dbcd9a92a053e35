use thiserror::Error;

use crate::types::FilingType;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Duplicate period for CIK {cik}: {filing_type:?} FY{fiscal_year} Q{fiscal_quarter}")]
    DuplicatePeriod {
        cik: String,
        filing_type: FilingType,
        fiscal_year: i32,
        fiscal_quarter: u8,
    },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}
