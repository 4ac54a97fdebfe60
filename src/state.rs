use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use crate::config::{AppConfig, StoreKind};
use crate::users::{memory::MemoryUserStore, repo::PgUserStore, repo::UserStore, services::UserGateway};

#[derive(Clone)]
pub struct AppState {
    pub users: UserGateway,
    pub config: Arc<AppConfig>,
    /// Set only for the postgres store; closed on shutdown.
    pub db: Option<PgPool>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let (store, db): (Arc<dyn UserStore>, Option<PgPool>) = match (config.store, &config.db) {
            (StoreKind::Postgres, Some(db_cfg)) => {
                let db = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(db_cfg.max_connections)
                    .acquire_timeout(db_cfg.acquire_timeout())
                    .connect(&db_cfg.url)
                    .await
                    .context("connect to database")?;
                (Arc::new(PgUserStore::new(db.clone())), Some(db))
            }
            (StoreKind::Postgres, None) => anyhow::bail!("postgres store selected without database settings"),
            (StoreKind::Memory, _) => {
                tracing::warn!("using in-memory user store; records are lost on restart");
                (Arc::new(MemoryUserStore::new()), None)
            }
        };

        Ok(Self::from_parts(store, config, db))
    }

    pub fn from_parts(store: Arc<dyn UserStore>, config: Arc<AppConfig>, db: Option<PgPool>) -> Self {
        Self {
            users: UserGateway::new(store),
            config,
            db,
        }
    }

    /// State over a fresh in-memory store, for tests.
    #[cfg(test)]
    pub fn fake() -> Self {
        Self::with_store(Arc::new(MemoryUserStore::new()))
    }

    #[cfg(test)]
    pub fn with_store(store: Arc<dyn UserStore>) -> Self {
        let config = Arc::new(AppConfig {
            store: StoreKind::Memory,
            db: None,
            host: "127.0.0.1".into(),
            port: 0,
        });
        Self::from_parts(store, config, None)
    }

    pub async fn shutdown(&self) {
        if let Some(db) = &self.db {
            db.close().await;
            tracing::info!("database pool closed");
        }
    }
}
