use std::{net::TcpListener, sync::Arc, time::Duration};

use anyhow::Context;
use env_logger::Env;
use loanscope::{
    configuration::get_configuration,
    services::{ModeContext, OpenaiClient, PgAnalysisBackend, PgPreferenceStore},
    startup::run,
};
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().context("Failed to read configuration")?;

    let pool_options = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(15 * 60)) // 15 minutes
        .max_lifetime(None);

    let connection_pool = pool_options.connect_lazy_with(configuration.database.with_db());

    if let Err(e) = sqlx::migrate!("./migrations").run(&connection_pool).await {
        log::error!("Could not run migrations, mode preference will not persist: {:?}", e);
    }

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener =
        TcpListener::bind(&address).with_context(|| format!("Failed to bind {}", address))?;
    log::info!("Listening on {}", address);

    let openai_client =
        OpenaiClient::new(configuration.api_keys.openai, &configuration.analysis);
    let backend = Arc::new(PgAnalysisBackend::new(connection_pool.clone()));
    let mode_context =
        ModeContext::load(Arc::new(PgPreferenceStore::new(connection_pool))).await;

    run(
        listener,
        backend,
        openai_client,
        mode_context,
        configuration.analysis,
    )?
    .await?;

    Ok(())
}
