use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    configuration::AnalysisSettings,
    domain::chat::ChatTurn,
    error::AnalysisError,
    services::{with_deadline, AnalysisBackend, OpenaiClient},
};

#[derive(Deserialize)]
struct ChatBody {
    #[serde(default)]
    messages: Vec<ChatTurn>,
}

#[post("/chat")]
async fn chat(
    backend: web::Data<dyn AnalysisBackend>,
    openai_client: web::Data<OpenaiClient>,
    settings: web::Data<AnalysisSettings>,
    body: web::Json<ChatBody>,
) -> Result<HttpResponse, AnalysisError> {
    if body.messages.is_empty() {
        return Err(AnalysisError::validation("Messages are required"));
    }

    let request_id = Uuid::new_v4();
    log::info!(
        "[{}] Chat request with {} message(s)",
        request_id,
        body.messages.len()
    );

    let reply = with_deadline(
        settings.deadline(),
        openai_client.run_agent(backend.get_ref(), &body.messages),
    )
    .await
    .map_err(|e| {
        log::error!("[{}] Chat failed: {}", request_id, e);
        e
    })?;

    log::info!(
        "[{}] Chat answered after {} tool call(s)",
        request_id,
        reply.tool_results.len()
    );

    Ok(HttpResponse::Ok().json(reply))
}
