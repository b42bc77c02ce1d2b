use clearcut_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();
    clearcut_api::telemetry::init_tracing();

    let config = Config::from_env()?;

    let state = clearcut_api::setup::storage::build_state(&config).await?;
    let router = clearcut_api::setup::routes::setup_routes(&config, state)?;

    clearcut_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
