//! Population analyses on molecular-orbital coefficients.

use std::error::Error;
use std::fmt;

pub mod groups;
pub mod opa;
pub mod progress;

/// Enumerated type for errors arising in population analyses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopulationAnalysisError {
    /// A required input quantity is absent.
    MissingRequiredInput(String),

    /// Input quantities have inconsistent dimensions.
    DimensionMismatch(String),
}

impl fmt::Display for PopulationAnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MissingRequiredInput(msg) => {
                write!(f, "Population analysis error: missing required input: {msg}")
            }
            Self::DimensionMismatch(msg) => {
                write!(f, "Population analysis error: dimension mismatch: {msg}")
            }
        }
    }
}

impl Error for PopulationAnalysisError {}
