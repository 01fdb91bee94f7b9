use std::{sync::Mutex, time::Duration};

use async_trait::async_trait;
use serde_json::json;

use super::backend::{decode, AnalysisBackend};
use crate::{
    domain::{
        competitive::{CompetitiveQuery, CompetitiveTarget},
        landscape::{fixtures, CompetitiveLandscapeData},
        params::LoanQueryParams,
        stats::{LoanDataStats, LoanStats, TopBanksInfo},
    },
    error::AnalysisError,
};

/// In-memory stand-in for the remote procedures.
#[derive(Default)]
pub struct MockBackend {
    pub fail_loan_stats: bool,
    pub fail_top_banks: bool,
    pub fail_competitive: bool,
    pub competitive_has_no_data: bool,
    pub delay: Option<Duration>,
    pub(crate) calls: Mutex<Vec<&'static str>>,
    pub(crate) loan_queries: Mutex<Vec<LoanQueryParams>>,
    pub(crate) competitive_queries: Mutex<Vec<CompetitiveQuery>>,
}

impl MockBackend {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn loan_queries(&self) -> Vec<LoanQueryParams> {
        self.loan_queries.lock().unwrap().clone()
    }

    pub fn competitive_queries(&self) -> Vec<CompetitiveQuery> {
        self.competitive_queries.lock().unwrap().clone()
    }

    async fn record(&self, procedure: &'static str) {
        self.calls.lock().unwrap().push(procedure);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl AnalysisBackend for MockBackend {
    async fn loan_data_stats(
        &self,
        params: &LoanQueryParams,
    ) -> Result<LoanDataStats, AnalysisError> {
        self.loan_queries.lock().unwrap().push(params.clone());
        self.record("get_loan_data_stats").await;
        if self.fail_loan_stats {
            return Err(AnalysisError::remote(
                "Failed to fetch loan data stats: connection reset",
            ));
        }
        decode(
            "get_loan_data_stats",
            Some(json!({
                "pctSoldBefore2020": 41.5,
                "preCovidDefaultRate": 3.2,
                "recent3yrDefaultRate": 1.9,
                "avgMonthsToPif": 58.0,
                "avgMonthsToChgoff": 31.4
            })),
        )
    }

    async fn loan_stats(&self, _params: &LoanQueryParams) -> Result<LoanStats, AnalysisError> {
        self.record("get_loan_stats").await;
        decode(
            "get_loan_stats",
            Some(json!({
                "riskPremium": {"p25": 2.75, "p75": 4.5, "mean": 3.6, "median": 3.5, "count": 212},
                "JobsSupported": {"p25": 3.0, "p75": 12.0, "mean": 8.2, "median": 6.0, "count": 212},
                "inflationAdjustedLoanAmount": {
                    "p25": 85000.0, "p75": 410000.0, "mean": 298000.0, "median": 190000.0, "count": 212
                }
            })),
        )
    }

    async fn top_banks(
        &self,
        _params: &LoanQueryParams,
        top_n: i32,
    ) -> Result<TopBanksInfo, AnalysisError> {
        self.record("get_top_banks_info").await;
        if self.fail_top_banks {
            return Err(AnalysisError::remote(
                "Failed to fetch top banks info: statement timeout",
            ));
        }
        let banks: Vec<_> = (1..=top_n)
            .map(|rank| json!({"bankName": format!("Bank {}", rank), "count": 100 - rank}))
            .collect();
        decode(
            "get_top_banks_info",
            Some(json!({
                "topBanks": banks,
                "topBanksByProcessingMethod": {
                    "7a General": [{
                        "bankName": "Bank 1",
                        "street": "1 Main St",
                        "city": "Austin",
                        "state": "TX",
                        "zip": "78701",
                        "count": 42
                    }]
                }
            })),
        )
    }

    async fn competitive_landscape(
        &self,
        query: &CompetitiveQuery,
    ) -> Result<CompetitiveLandscapeData, AnalysisError> {
        self.competitive_queries.lock().unwrap().push(query.clone());
        self.record(query.procedure()).await;
        if self.fail_competitive {
            return Err(AnalysisError::remote(
                "Failed to fetch competitive landscape: function timed out",
            ));
        }
        let data = match (&query.target, self.competitive_has_no_data) {
            (CompetitiveTarget::Zip(zip), true) => fixtures::no_data_landscape_json(zip),
            (CompetitiveTarget::Zip(zip), false) => fixtures::zip_landscape_json(zip),
            (CompetitiveTarget::State(code), _) => fixtures::state_landscape_json(code),
        };
        decode(query.procedure(), Some(data))
    }
}
