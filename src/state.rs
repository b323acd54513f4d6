use std::sync::Arc;

use crate::config::{AppConfig, StoreKind};
use crate::db;
use crate::users::{MemoryUserStore, PgUserStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
}

impl AppState {
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn UserStore> = match (config.store, &config.database) {
            (StoreKind::Postgres, Some(db_cfg)) => {
                let pool = db::connect(db_cfg).await?;
                if db_cfg.run_migrations {
                    db::migrate(&pool).await?;
                }
                Arc::new(PgUserStore::new(pool))
            }
            (StoreKind::Postgres, None) => anyhow::bail!("postgres store needs a database config"),
            (StoreKind::Memory, _) => {
                tracing::warn!("using in-memory user store; data is lost on exit");
                Arc::new(MemoryUserStore::new())
            }
        };

        Ok(Self::from_store(store))
    }

    pub fn from_store(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// State over a fresh in-memory store, for tests and local runs.
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(MemoryUserStore::new()))
    }
}
