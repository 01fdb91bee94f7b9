use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Output of `get_loan_data_stats`. Rates are already scaled to percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanDataStats {
    pub pct_sold_before2020: Option<f64>,
    pub pre_covid_default_rate: Option<f64>,
    pub recent3yr_default_rate: Option<f64>,
    pub avg_months_to_pif: Option<f64>,
    pub avg_months_to_chgoff: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalMetric {
    pub p25: Option<f64>,
    pub p75: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    #[serde(default)]
    pub count: i64,
}

/// Output of `get_loan_stats`, keyed by metric name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanStats(pub BTreeMap<String, StatisticalMetric>);

impl LoanStats {
    pub const RISK_PREMIUM: &'static str = "riskPremium";
    pub const JOBS_SUPPORTED: &'static str = "JobsSupported";
    pub const INFLATION_ADJUSTED_LOAN_AMOUNT: &'static str = "inflationAdjustedLoanAmount";

    pub fn metric(&self, name: &str) -> Option<&StatisticalMetric> {
        self.0.get(name)
    }

    /// Loans behind the numbers, taken from the first headline metric that has any.
    pub fn loan_count(&self) -> i64 {
        [
            Self::RISK_PREMIUM,
            Self::JOBS_SUPPORTED,
            Self::INFLATION_ADJUSTED_LOAN_AMOUNT,
        ]
        .iter()
        .filter_map(|name| self.metric(name))
        .map(|metric| metric.count)
        .find(|count| *count > 0)
        .unwrap_or(0)
    }
}

/// The `loanStatistics` leg: both loan procedures side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanStatistics {
    pub data_stats: LoanDataStats,
    pub loan_stats: LoanStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicBankInfo {
    pub bank_name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedBankInfo {
    pub bank_name: String,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub count: i64,
}

/// Output of `get_top_banks_info`, the `bankResults` leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopBanksInfo {
    pub top_banks: Option<Vec<BasicBankInfo>>,
    pub top_banks_by_processing_method: Option<BTreeMap<String, Vec<DetailedBankInfo>>>,
}
