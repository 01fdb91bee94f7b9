use crate::error::AnalysisError;

use super::request::Location;

pub const AREAL_ZIP_RANGE: i32 = 40;
pub const DIRECT_ZIP_RANGE: i32 = 0;
pub const DEFAULT_TOP_N: i32 = 3;
pub const MAX_TOP_N: i32 = 100;
pub const DEFAULT_EMPLOYEE_COUNT: i32 = 25;

/// Zip range used when the caller gives none. Each endpoint picks its own,
/// the full analysis tool uses `DirectZip` so a bare zip gets competitive data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZipRangeDefault {
    Areal,
    DirectZip,
}

impl ZipRangeDefault {
    pub fn miles(self) -> i32 {
        match self {
            ZipRangeDefault::Areal => AREAL_ZIP_RANGE,
            ZipRangeDefault::DirectZip => DIRECT_ZIP_RANGE,
        }
    }
}

/// Arguments of the loan/bank procedures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanQueryParams {
    pub state: Option<String>,
    pub zip_code: Option<i32>,
    pub naics_prefixes: Vec<i32>,
    pub zip_range: i32,
}

impl LoanQueryParams {
    pub fn check(&self) -> Result<(), AnalysisError> {
        if self.naics_prefixes.is_empty() {
            return Err(AnalysisError::remote(
                "At least one NAICS prefix is required",
            ));
        }
        Ok(())
    }
}

pub fn check_top_n(top_n: i32) -> Result<(), AnalysisError> {
    if !(1..=MAX_TOP_N).contains(&top_n) {
        return Err(AnalysisError::validation(format!(
            "topN must be between 1 and {}",
            MAX_TOP_N
        )));
    }
    Ok(())
}

/// Caller input before defaults are applied.
#[derive(Debug, Clone)]
pub struct RawParams {
    pub naics_codes: Vec<i32>,
    pub location: Location,
    pub zip_range: Option<i32>,
    pub top_n: Option<i32>,
    pub employee_count: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedParams {
    pub naics_codes: Vec<i32>,
    pub location: Location,
    /// Range sent to the loan and bank procedures.
    pub zip_range: i32,
    /// Whether the caller sent a non-zero zip range, before defaulting.
    pub areal_range_requested: bool,
    pub top_n: i32,
    pub employee_count: i32,
}

impl RawParams {
    pub fn normalize(
        self,
        default_range: ZipRangeDefault,
    ) -> Result<NormalizedParams, AnalysisError> {
        if self.naics_codes.is_empty() {
            return Err(AnalysisError::validation("NAICS codes are required"));
        }

        let positive_range = self.zip_range.filter(|r| *r > 0);
        let top_n = positive_or(self.top_n, DEFAULT_TOP_N);
        check_top_n(top_n)?;

        Ok(NormalizedParams {
            naics_codes: self.naics_codes,
            location: self.location,
            zip_range: positive_range.unwrap_or(default_range.miles()),
            // Negative ranges count as areal too
            areal_range_requested: self.zip_range.is_some_and(|r| r != 0),
            top_n,
            employee_count: positive_or(self.employee_count, DEFAULT_EMPLOYEE_COUNT),
        })
    }
}

fn positive_or(value: Option<i32>, default: i32) -> i32 {
    value.filter(|v| *v > 0).unwrap_or(default)
}

impl NormalizedParams {
    pub fn loan_query(&self) -> LoanQueryParams {
        LoanQueryParams {
            state: self.location.state().map(str::to_string),
            zip_code: self.location.zip_code(),
            naics_prefixes: self.naics_codes.clone(),
            zip_range: self.zip_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RawParams, ZipRangeDefault};
    use crate::domain::request::Location;

    fn raw(zip_range: Option<i32>) -> RawParams {
        RawParams {
            naics_codes: vec![541110],
            location: Location::Zip(90001),
            zip_range,
            top_n: None,
            employee_count: None,
        }
    }

    #[test]
    fn defaults_depend_on_endpoint() {
        let areal = raw(None).normalize(ZipRangeDefault::Areal).unwrap();
        let direct = raw(None).normalize(ZipRangeDefault::DirectZip).unwrap();

        assert_eq!(areal.zip_range, 40);
        assert_eq!(direct.zip_range, 0);
        assert!(!areal.areal_range_requested);
        assert!(!direct.areal_range_requested);
    }

    #[test]
    fn positive_range_wins_over_default() {
        let params = raw(Some(25)).normalize(ZipRangeDefault::DirectZip).unwrap();

        assert_eq!(params.zip_range, 25);
        assert!(params.areal_range_requested);
    }

    #[test]
    fn zero_range_is_a_point_query() {
        let params = raw(Some(0)).normalize(ZipRangeDefault::Areal).unwrap();

        assert_eq!(params.zip_range, 40);
        assert!(!params.areal_range_requested);
    }

    #[test]
    fn negative_range_falls_back_but_still_counts_as_areal() {
        let areal = raw(Some(-10)).normalize(ZipRangeDefault::Areal).unwrap();
        let direct = raw(Some(-10)).normalize(ZipRangeDefault::DirectZip).unwrap();

        assert_eq!(areal.zip_range, 40);
        assert_eq!(direct.zip_range, 0);
        assert!(areal.areal_range_requested);
        assert!(direct.areal_range_requested);
    }

    #[test]
    fn top_n_and_employee_count_default() {
        let params = raw(None).normalize(ZipRangeDefault::Areal).unwrap();

        assert_eq!(params.top_n, 3);
        assert_eq!(params.employee_count, 25);
    }

    #[test]
    fn top_n_above_limit_is_rejected() {
        let mut input = raw(None);
        input.top_n = Some(101);

        let error = input.normalize(ZipRangeDefault::Areal).unwrap_err();
        assert!(error.is_validation());
    }

    #[test]
    fn loan_query_carries_only_one_location() {
        let params = RawParams {
            naics_codes: vec![54, 62],
            location: Location::State("TX".to_string()),
            zip_range: None,
            top_n: Some(5),
            employee_count: None,
        }
        .normalize(ZipRangeDefault::Areal)
        .unwrap();
        let query = params.loan_query();

        assert_eq!(query.state.as_deref(), Some("TX"));
        assert_eq!(query.zip_code, None);
        assert_eq!(query.naics_prefixes, vec![54, 62]);
        assert_eq!(query.zip_range, 40);
    }
}
