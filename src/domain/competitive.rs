use std::fmt;

use crate::error::AnalysisError;

use super::{params::NormalizedParams, request::Location};

pub const MAX_EMPLOYEE_COUNT: i32 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompetitiveTarget {
    /// Five character, zero padded zip code.
    Zip(String),
    /// Two letter state code.
    State(String),
}

impl fmt::Display for CompetitiveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompetitiveTarget::Zip(zip) => write!(f, "ZIP {}", zip),
            CompetitiveTarget::State(code) => write!(f, "State {}", code),
        }
    }
}

/// One call to a competitive landscape procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitiveQuery {
    pub target: CompetitiveTarget,
    pub naics_code: String,
    pub employee_count: i32,
}

impl CompetitiveQuery {
    /// Decides whether a full analysis gets a competitive leg.
    ///
    /// States always get one. A zip gets one only for a point query; once the
    /// caller asked for a radius the loan numbers cover many zips and a single
    /// zip snapshot would not match them.
    pub fn plan(params: &NormalizedParams) -> Option<Self> {
        let naics_code = representative_naics(&params.naics_codes)?;

        let target = match &params.location {
            Location::State(code) => CompetitiveTarget::State(code.clone()),
            Location::Zip(_) if params.areal_range_requested => return None,
            Location::Zip(zip) => CompetitiveTarget::Zip(pad_zip(*zip)),
        };

        Some(CompetitiveQuery {
            target,
            naics_code,
            employee_count: params.employee_count,
        })
    }

    pub fn procedure(&self) -> &'static str {
        match self.target {
            CompetitiveTarget::Zip(_) => "analyze_competitive_landscape_by_zip",
            CompetitiveTarget::State(_) => "analyze_competitive_landscape_by_state",
        }
    }

    /// Argument bounds the remote procedures enforce.
    pub fn check(&self) -> Result<(), AnalysisError> {
        match &self.target {
            CompetitiveTarget::Zip(zip) if zip.len() != 5 => {
                return Err(AnalysisError::remote("ZIP code must be a 5-digit string"));
            }
            CompetitiveTarget::State(code) if code.len() != 2 => {
                return Err(AnalysisError::remote(
                    r#"State code must be a 2-letter string (e.g., "TX", "CA")"#,
                ));
            }
            _ => {}
        }

        if !(2..=6).contains(&self.naics_code.len()) {
            return Err(AnalysisError::remote(
                "NAICS code must be between 2 and 6 digits",
            ));
        }

        if !(1..=MAX_EMPLOYEE_COUNT).contains(&self.employee_count) {
            return Err(AnalysisError::remote(
                "Employee count must be between 1 and 1,000,000",
            ));
        }

        Ok(())
    }
}

/// First NAICS code cut down to its first four characters.
pub fn representative_naics(naics_codes: &[i32]) -> Option<String> {
    naics_codes
        .first()
        .map(|code| code.to_string().chars().take(4).collect())
}

pub fn pad_zip(zip: i32) -> String {
    format!("{:05}", zip)
}
