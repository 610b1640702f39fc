mod pool;
mod session;

use crate::catalog::{CatalogError, MovieCatalog};
use crate::protocol::SessionView;
use crate::random::RandomSource;
use crate::sampler::MovieSampler;
use crate::types::*;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Message shown for every kind of movie loading failure
pub const LOAD_ERROR_MESSAGE: &str = "Error al cargar la película. Revisa tu conexión o API Key.";

/// Errors surfaced by session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid player count: {0}")]
    InvalidPlayerCount(usize),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl SessionError {
    /// Text for the setup screen; catalog failures all collapse into one message
    pub fn user_message(&self) -> String {
        match self {
            SessionError::InvalidPlayerCount(_) => self.to_string(),
            SessionError::Catalog(_) => LOAD_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Shared application state: the one live session plus setup-time preferences
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<SessionState>>,
    /// Curated movies `start` draws from instead of sampling the catalog
    pub custom_pool: Arc<RwLock<Vec<Movie>>>,
    pub status: Arc<RwLock<LoadStatus>>,
    pub sampler: MovieSampler,
    pub rng: RandomSource,
}

impl AppState {
    pub fn new(catalog: Arc<dyn MovieCatalog>, rng: RandomSource) -> Self {
        Self {
            session: Arc::new(RwLock::new(SessionState::default())),
            custom_pool: Arc::new(RwLock::new(Vec::new())),
            status: Arc::new(RwLock::new(LoadStatus::default())),
            sampler: MovieSampler::new(catalog, rng.clone()),
            rng,
        }
    }

    /// Get a snapshot of the current session
    pub async fn get_session(&self) -> SessionState {
        self.session.read().await.clone()
    }

    pub async fn get_status(&self) -> LoadStatus {
        self.status.read().await.clone()
    }

    /// Everything the presentation layer renders, in one snapshot
    pub async fn view(&self) -> SessionView {
        let session = self.get_session().await;
        let status = self.get_status().await;
        let role_card = Self::revealed_card(&session);
        let is_last_turn = session.is_last_turn();
        let custom_pool_size = self.custom_pool.read().await.len();

        SessionView {
            session,
            is_loading: status.is_loading,
            error: status.error,
            role_card,
            is_last_turn,
            custom_pool_size,
        }
    }
}
