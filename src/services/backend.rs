use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::PgPool;

use crate::{
    dal::{landscape_db, loan_db},
    domain::{
        competitive::{CompetitiveQuery, CompetitiveTarget},
        landscape::CompetitiveLandscapeData,
        params::{check_top_n, LoanQueryParams},
        stats::{LoanDataStats, LoanStats, TopBanksInfo},
    },
    error::AnalysisError,
};

/// The remote statistics procedures. Everything heavy happens behind this seam.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn loan_data_stats(&self, params: &LoanQueryParams)
        -> Result<LoanDataStats, AnalysisError>;

    async fn loan_stats(&self, params: &LoanQueryParams) -> Result<LoanStats, AnalysisError>;

    async fn top_banks(
        &self,
        params: &LoanQueryParams,
        top_n: i32,
    ) -> Result<TopBanksInfo, AnalysisError>;

    async fn competitive_landscape(
        &self,
        query: &CompetitiveQuery,
    ) -> Result<CompetitiveLandscapeData, AnalysisError>;
}

pub struct PgAnalysisBackend {
    pool: PgPool,
}

impl PgAnalysisBackend {
    pub fn new(pool: PgPool) -> Self {
        PgAnalysisBackend { pool }
    }
}

#[async_trait]
impl AnalysisBackend for PgAnalysisBackend {
    async fn loan_data_stats(
        &self,
        params: &LoanQueryParams,
    ) -> Result<LoanDataStats, AnalysisError> {
        params.check()?;
        let data = loan_db::get_loan_data_stats(&self.pool, params)
            .await
            .map_err(|e| call_failed("get_loan_data_stats", "loan data stats", e))?;
        decode("get_loan_data_stats", data)
    }

    async fn loan_stats(&self, params: &LoanQueryParams) -> Result<LoanStats, AnalysisError> {
        params.check()?;
        let data = loan_db::get_loan_stats(&self.pool, params)
            .await
            .map_err(|e| call_failed("get_loan_stats", "loan stats", e))?;
        decode("get_loan_stats", data)
    }

    async fn top_banks(
        &self,
        params: &LoanQueryParams,
        top_n: i32,
    ) -> Result<TopBanksInfo, AnalysisError> {
        params.check()?;
        check_top_n(top_n)?;
        let data = loan_db::get_top_banks_info(&self.pool, params, top_n)
            .await
            .map_err(|e| call_failed("get_top_banks_info", "top banks info", e))?;
        decode("get_top_banks_info", data)
    }

    async fn competitive_landscape(
        &self,
        query: &CompetitiveQuery,
    ) -> Result<CompetitiveLandscapeData, AnalysisError> {
        query.check()?;
        let data = match &query.target {
            CompetitiveTarget::Zip(zip) => {
                landscape_db::analyze_competitive_landscape_by_zip(
                    &self.pool,
                    zip,
                    &query.naics_code,
                    query.employee_count,
                )
                .await
            }
            CompetitiveTarget::State(code) => {
                landscape_db::analyze_competitive_landscape_by_state(
                    &self.pool,
                    &code.to_uppercase(),
                    &query.naics_code,
                    query.employee_count,
                )
                .await
            }
        }
        .map_err(|e| call_failed(query.procedure(), "competitive landscape", e))?;

        decode(query.procedure(), data)
    }
}

fn call_failed(procedure: &str, what: &str, error: sqlx::Error) -> AnalysisError {
    log::error!("Error calling {}: {:?}", procedure, error);
    AnalysisError::remote(format!("Failed to fetch {}: {}", what, error))
}

/// Reads a procedure's jsonb result into its typed shape. SQL NULL counts as failure.
pub(crate) fn decode<T: DeserializeOwned>(
    procedure: &str,
    data: Option<Value>,
) -> Result<T, AnalysisError> {
    let data = data.ok_or_else(|| {
        AnalysisError::remote(format!("No data returned from {}", procedure))
    })?;

    serde_json::from_value(data).map_err(|e| AnalysisError::MalformedResponse {
        function: procedure.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::decode;
    use crate::{
        domain::{landscape::CompetitiveLandscapeData, stats::LoanDataStats},
        error::AnalysisError,
    };

    #[test]
    fn null_result_is_a_remote_error() {
        let error = decode::<LoanDataStats>("get_loan_data_stats", None).unwrap_err();
        assert_eq!(error.to_string(), "No data returned from get_loan_data_stats");
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let error = decode::<CompetitiveLandscapeData>(
            "analyze_competitive_landscape_by_zip",
            Some(json!({"unexpected": true})),
        )
        .unwrap_err();

        assert!(matches!(error, AnalysisError::MalformedResponse { .. }));
    }
}
