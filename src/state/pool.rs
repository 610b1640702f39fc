use super::{AppState, SessionError};
use crate::sampler::dedup_by_id;
use crate::types::*;
use std::collections::HashSet;

impl AppState {
    /// Fetch candidates for manual curation. Nothing is stored.
    pub async fn load_pool_candidates(
        &self,
        filters: &FilterCriteria,
    ) -> Result<Vec<Movie>, SessionError> {
        self.sampler.sample_pool(filters).await.map_err(|e| {
            tracing::warn!("Failed to load candidate pool: {}", e);
            SessionError::from(e)
        })
    }

    /// Replace the custom pool, dropping repeated ids
    pub async fn set_custom_pool(&self, movies: Vec<Movie>) -> Vec<Movie> {
        let pool = dedup_by_id(movies);
        tracing::info!("Custom pool set with {} movies", pool.len());
        *self.custom_pool.write().await = pool.clone();
        pool
    }

    /// Go back to live sampling
    pub async fn clear_custom_pool(&self) {
        self.custom_pool.write().await.clear();
        tracing::info!("Custom pool cleared");
    }

    pub async fn custom_pool(&self) -> Vec<Movie> {
        self.custom_pool.read().await.clone()
    }

    /// Store the approved subset of `candidates` (candidate order kept) as the custom pool
    pub async fn approve_pool(
        &self,
        candidates: Vec<Movie>,
        selected_ids: &HashSet<MovieId>,
    ) -> Vec<Movie> {
        let approved = candidates
            .into_iter()
            .filter(|movie| selected_ids.contains(&movie.id))
            .collect();
        self.set_custom_pool(approved).await
    }
}
