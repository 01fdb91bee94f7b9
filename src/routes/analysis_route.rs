use std::time::Instant;

use actix_web::{post, web, HttpResponse};
use uuid::Uuid;

use crate::{
    configuration::AnalysisSettings,
    domain::{
        request::AnalysisRequest,
        response::{AnalysisResponse, ResponseMetadata},
    },
    error::AnalysisError,
    services::{run_full_analysis, with_deadline, AnalysisBackend},
};

#[post("/analysis")]
async fn analysis(
    backend: web::Data<dyn AnalysisBackend>,
    settings: web::Data<AnalysisSettings>,
    body: web::Json<AnalysisRequest>,
) -> Result<HttpResponse, AnalysisError> {
    let started = Instant::now();
    let request_id = Uuid::new_v4();
    let request = body.into_inner();

    let params = request.normalize().map_err(|e| {
        log::warn!("[{}] Rejected analysis request: {}", request_id, e);
        e
    })?;

    log::info!(
        "[{}] Analysing NAICS {:?} in {:?} (range {}, top {})",
        request_id,
        params.naics_codes,
        params.location,
        params.zip_range,
        params.top_n
    );

    let results = with_deadline(
        settings.deadline(),
        run_full_analysis(backend.get_ref(), &params),
    )
    .await
    .map_err(|e| {
        log::error!("[{}] Analysis failed: {}", request_id, e);
        e
    })?;

    let metadata = ResponseMetadata::new(request.naics_codes, request.location, started);
    log::info!(
        "[{}] Analysis finished in {} ms",
        request_id,
        metadata.execution_time
    );

    Ok(HttpResponse::Ok().json(AnalysisResponse::success(results, metadata)))
}
