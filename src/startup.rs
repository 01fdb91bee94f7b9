use std::{net::TcpListener, sync::Arc};

use actix_web::{
    dev::Server,
    middleware::Logger,
    web::{self, Data},
    App, HttpServer,
};

use crate::{
    configuration::AnalysisSettings,
    error::AnalysisError,
    routes::{analysis_route, chat_route, default_route, mode_route, reference_route},
    services::{AnalysisBackend, ModeContext, OpenaiClient},
};

/// Malformed bodies get the same `{success:false, error}` shape as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::warn!("Rejected request body: {}", err);
        AnalysisError::validation(err.to_string()).into()
    })
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(default_route::default).service(
        web::scope("/api")
            .app_data(json_config())
            .service(analysis_route::analysis)
            .service(chat_route::chat)
            .service(mode_route::get_mode)
            .service(mode_route::set_mode)
            .service(mode_route::toggle_mode)
            .service(reference_route::states)
            .service(reference_route::naics_presets)
            .service(reference_route::parse_naics)
            .service(reference_route::validate_location),
    );
}

pub fn run(
    listener: TcpListener,
    backend: Arc<dyn AnalysisBackend>,
    openai_client: OpenaiClient,
    mode_context: ModeContext,
    analysis_settings: AnalysisSettings,
) -> Result<Server, std::io::Error> {
    let backend: Data<dyn AnalysisBackend> = Data::from(backend);
    let openai_client = Data::new(openai_client);
    let mode_context = Data::new(mode_context);
    let analysis_settings = Data::new(analysis_settings);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(routes)
            .app_data(backend.clone())
            .app_data(openai_client.clone())
            .app_data(mode_context.clone())
            .app_data(analysis_settings.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
