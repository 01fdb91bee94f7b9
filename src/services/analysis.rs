use std::{future::Future, time::Duration};

use crate::{
    domain::{
        competitive::CompetitiveQuery,
        landscape::CompetitiveLandscapeData,
        params::{LoanQueryParams, NormalizedParams},
        response::AnalysisResults,
        stats::LoanStatistics,
    },
    error::AnalysisError,
};

use super::backend::AnalysisBackend;

/// Both loan procedures, joined into the `loanStatistics` leg.
pub async fn get_loan_statistics(
    backend: &dyn AnalysisBackend,
    params: &LoanQueryParams,
) -> Result<LoanStatistics, AnalysisError> {
    let (data_stats, loan_stats) =
        tokio::try_join!(backend.loan_data_stats(params), backend.loan_stats(params))?;

    Ok(LoanStatistics {
        data_stats,
        loan_stats,
    })
}

/// Loan statistics, top banks and (when the location calls for it) the
/// competitive landscape, all in flight at once.
///
/// A failing loan or bank leg fails the whole analysis. The competitive leg
/// can only ever drop out of the result.
pub async fn run_full_analysis(
    backend: &dyn AnalysisBackend,
    params: &NormalizedParams,
) -> Result<AnalysisResults, AnalysisError> {
    let loan_query = params.loan_query();
    let competitive_query = CompetitiveQuery::plan(params);

    let (loan_statistics, bank_results, competitive_landscape) = tokio::try_join!(
        get_loan_statistics(backend, &loan_query),
        backend.top_banks(&loan_query, params.top_n),
        competitive_enrichment(backend, competitive_query.as_ref()),
    )?;

    log::info!(
        "Analysis covered {} loans, competitive landscape {}",
        loan_statistics.loan_stats.loan_count(),
        if competitive_landscape.is_some() {
            "included"
        } else {
            "omitted"
        }
    );

    Ok(AnalysisResults::assemble(
        loan_statistics,
        bank_results,
        competitive_landscape,
    ))
}

async fn competitive_enrichment(
    backend: &dyn AnalysisBackend,
    query: Option<&CompetitiveQuery>,
) -> Result<Option<CompetitiveLandscapeData>, AnalysisError> {
    let Some(query) = query else {
        return Ok(None);
    };

    match backend.competitive_landscape(query).await {
        Ok(landscape) => {
            if let Some(reason) = landscape.unavailable_reason() {
                log::info!("Competitive landscape ({}) has no data: {}", query.target, reason);
            } else if let Some(market) = landscape.market_analysis() {
                log::info!(
                    "Competitive landscape ({}): {} market, HHI {}",
                    query.target,
                    market.market_concentration.market_type,
                    market.market_concentration.estimated_hhi
                );
            }
            Ok(Some(landscape))
        }
        Err(e) => {
            log::warn!("Competitive landscape ({}) error: {}", query.target, e);
            Ok(None)
        }
    }
}

/// Runs `work` under one deadline. Whatever is still in flight when it fires is dropped.
pub async fn with_deadline<T, F>(deadline: Duration, work: F) -> Result<T, AnalysisError>
where
    F: Future<Output = Result<T, AnalysisError>>,
{
    tokio::time::timeout(deadline, work)
        .await
        .map_err(|_| AnalysisError::Timeout(deadline))?
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{get_loan_statistics, run_full_analysis, with_deadline};
    use crate::{
        domain::{
            competitive::CompetitiveTarget,
            landscape::fixtures,
            params::{NormalizedParams, RawParams, ZipRangeDefault},
            request::Location,
        },
        error::AnalysisError,
        services::mock_backend::MockBackend,
    };

    fn params(location: Location, zip_range: Option<i32>) -> NormalizedParams {
        RawParams {
            naics_codes: vec![541110, 541211],
            location,
            zip_range,
            top_n: Some(3),
            employee_count: None,
        }
        .normalize(ZipRangeDefault::Areal)
        .unwrap()
    }

    #[tokio::test]
    async fn state_request_includes_competitive_landscape() {
        let backend = MockBackend::default();
        let results = run_full_analysis(&backend, &params(Location::State("TX".into()), None))
            .await
            .unwrap();

        let landscape = results.competitive_landscape.unwrap();
        assert_eq!(landscape.state_info().unwrap().state_abbr, "TX");
        assert_eq!(
            backend.competitive_queries()[0].target,
            CompetitiveTarget::State("TX".to_string())
        );
        assert_eq!(backend.competitive_queries()[0].naics_code, "5411");
        assert_eq!(results.bank_results.top_banks.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn zip_with_range_skips_competitive_landscape() {
        let backend = MockBackend::default();
        let results = run_full_analysis(&backend, &params(Location::Zip(90001), Some(40)))
            .await
            .unwrap();

        assert!(results.competitive_landscape.is_none());
        assert!(backend.competitive_queries().is_empty());
        assert_eq!(backend.calls().len(), 3);
    }

    #[tokio::test]
    async fn point_zip_includes_competitive_landscape() {
        let backend = MockBackend::default();
        let results = run_full_analysis(&backend, &params(Location::Zip(9001), None))
            .await
            .unwrap();

        assert!(results.competitive_landscape.is_some());
        assert_eq!(
            backend.competitive_queries()[0].target,
            CompetitiveTarget::Zip("09001".to_string())
        );
        // loan queries still get the areal default
        assert_eq!(backend.loan_queries()[0].zip_range, 40);
    }

    #[tokio::test]
    async fn competitive_failure_is_absorbed() {
        let backend = MockBackend {
            fail_competitive: true,
            ..Default::default()
        };
        let results = run_full_analysis(&backend, &params(Location::State("TX".into()), None))
            .await
            .unwrap();

        assert!(results.competitive_landscape.is_none());
        assert!(backend
            .calls()
            .contains(&"analyze_competitive_landscape_by_state"));
    }

    #[tokio::test]
    async fn in_band_no_data_is_forwarded() {
        let backend = MockBackend {
            competitive_has_no_data: true,
            ..Default::default()
        };
        let results = run_full_analysis(&backend, &params(Location::Zip(90001), Some(0)))
            .await
            .unwrap();

        let landscape = results.competitive_landscape.unwrap();
        assert_eq!(
            landscape.unavailable_reason(),
            Some("No establishments for this NAICS code in the county")
        );
        assert_eq!(
            serde_json::to_value(&landscape).unwrap(),
            fixtures::no_data_landscape_json("90001")
        );
    }

    #[tokio::test]
    async fn loan_failure_fails_everything() {
        let backend = MockBackend {
            fail_loan_stats: true,
            ..Default::default()
        };
        let error = run_full_analysis(&backend, &params(Location::State("TX".into()), None))
            .await
            .unwrap_err();

        assert!(matches!(error, AnalysisError::RemoteQuery(_)));
    }

    #[tokio::test]
    async fn bank_failure_fails_everything() {
        let backend = MockBackend {
            fail_top_banks: true,
            ..Default::default()
        };
        let result = run_full_analysis(&backend, &params(Location::Zip(90001), None)).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn loan_statistics_joins_both_procedures() {
        let backend = MockBackend::default();
        let query = params(Location::State("CA".into()), Some(15)).loan_query();
        let statistics = get_loan_statistics(&backend, &query).await.unwrap();

        assert_eq!(statistics.loan_stats.loan_count(), 212);
        assert_eq!(statistics.data_stats.pre_covid_default_rate, Some(3.2));
        let mut calls = backend.calls();
        calls.sort();
        assert_eq!(calls, vec!["get_loan_data_stats", "get_loan_stats"]);
    }

    #[tokio::test]
    async fn deadline_fails_the_whole_analysis() {
        let backend = MockBackend {
            delay: Some(Duration::from_secs(5)),
            ..Default::default()
        };
        let params = params(Location::State("TX".into()), None);
        let error = with_deadline(
            Duration::from_millis(50),
            run_full_analysis(&backend, &params),
        )
        .await
        .unwrap_err();

        assert!(matches!(error, AnalysisError::Timeout(_)));
    }
}
