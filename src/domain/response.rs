use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use super::{
    landscape::CompetitiveLandscapeData,
    request::LocationInput,
    stats::{LoanStatistics, TopBanksInfo},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResults {
    pub loan_statistics: LoanStatistics,
    pub bank_results: TopBanksInfo,
    /// Absent when not requested or when the enrichment call failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitive_landscape: Option<CompetitiveLandscapeData>,
}

impl AnalysisResults {
    pub fn assemble(
        loan_statistics: LoanStatistics,
        bank_results: TopBanksInfo,
        competitive_landscape: Option<CompetitiveLandscapeData>,
    ) -> Self {
        AnalysisResults {
            loan_statistics,
            bank_results,
            competitive_landscape,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub timestamp: String,
    pub naics_codes: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationInput>,
    /// Milliseconds.
    pub execution_time: u64,
}

impl ResponseMetadata {
    pub fn new(naics_codes: Vec<i32>, location: Option<LocationInput>, started: Instant) -> Self {
        ResponseMetadata {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            naics_codes,
            location,
            execution_time: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<AnalysisResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResponse {
    pub fn success(data: AnalysisResults, metadata: ResponseMetadata) -> Self {
        AnalysisResponse {
            success: true,
            data: Some(data),
            metadata: Some(metadata),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        AnalysisResponse {
            success: false,
            data: None,
            metadata: None,
            error: Some(error.into()),
        }
    }
}
