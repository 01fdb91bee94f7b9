use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::{dal::config_db, domain::mode::Mode};

/// Where the UI mode preference outlives a restart.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn load_mode(&self) -> Result<Option<String>, sqlx::Error>;
    async fn save_mode(&self, mode: Mode) -> Result<(), sqlx::Error>;
}

pub struct PgPreferenceStore {
    pool: PgPool,
}

impl PgPreferenceStore {
    pub fn new(pool: PgPool) -> Self {
        PgPreferenceStore { pool }
    }
}

#[async_trait]
impl PreferenceStore for PgPreferenceStore {
    async fn load_mode(&self) -> Result<Option<String>, sqlx::Error> {
        config_db::get_mode_preference(&self.pool).await
    }

    async fn save_mode(&self, mode: Mode) -> Result<(), sqlx::Error> {
        config_db::set_mode_preference(&self.pool, mode.as_str()).await
    }
}

/// Direct form or chat agent, shared by every request.
pub struct ModeContext {
    current: RwLock<Mode>,
    store: Arc<dyn PreferenceStore>,
}

impl ModeContext {
    /// Reads the stored preference once. Anything unreadable falls back to `Direct`.
    pub async fn load(store: Arc<dyn PreferenceStore>) -> Self {
        let mode = match store.load_mode().await {
            Ok(Some(value)) => Mode::from_str_value(&value).unwrap_or_else(|| {
                log::warn!("Ignoring unknown stored mode {:?}", value);
                Mode::default()
            }),
            Ok(None) => Mode::default(),
            Err(e) => {
                log::error!("Could not read mode preference: {:?}", e);
                Mode::default()
            }
        };

        log::info!("Starting in {} mode", mode);

        ModeContext {
            current: RwLock::new(mode),
            store,
        }
    }

    pub async fn current(&self) -> Mode {
        *self.current.read().await
    }

    /// Switches in memory first, then persists. Readers never wait on the store.
    pub async fn set(&self, mode: Mode) -> Mode {
        *self.current.write().await = mode;

        if let Err(e) = self.store.save_mode(mode).await {
            log::error!("Could not persist mode preference {}: {:?}", mode, e);
        }

        mode
    }

    pub async fn toggle(&self) -> Mode {
        let next = self.current().await.toggled();
        self.set(next).await
    }
}
