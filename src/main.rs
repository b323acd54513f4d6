use usersvc::{app, config::AppConfig, state::AppState, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    telemetry::init_tracing(&config.log);

    let app_state = AppState::init(&config).await?;
    app::serve(app::build_app(app_state), &config.bind_addr()).await
}
