use anyhow::Context;
use usersvc::{config::AppConfig, db, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    telemetry::init_tracing(&config.log);

    let db_cfg = config
        .database
        .as_ref()
        .context("migrations need STORE=postgres and DATABASE_URL")?;

    tracing::info!("starting migration");
    let pool = db::connect(db_cfg).await?;
    db::migrate(&pool).await?;
    pool.close().await;
    tracing::info!("migration completed");
    Ok(())
}
