//! Runtime configuration read from the environment (after `.env` is loaded).

use crate::catalog::{CatalogResult, TmdbCatalog};
use crate::random::RandomSource;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_LANGUAGE: &str = "es-ES";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Configuration for the catalog client and the local server
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TMDB API key (None = every sampling call fails)
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: String,
    /// Locale passed to TMDB for titles and overviews
    pub language: String,
    pub request_timeout: Duration,
    pub bind_addr: SocketAddr,
    /// Fixed seed for reproducible sessions
    pub rng_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            tmdb_base_url: DEFAULT_TMDB_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            request_timeout: Duration::from_secs(10),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            rng_seed: None,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        // The web build exposed the key under its public-prefixed name
        let tmdb_api_key =
            non_empty_var("TMDB_API_KEY").or_else(|| non_empty_var("NEXT_PUBLIC_TMDB_API_KEY"));
        if tmdb_api_key.is_none() {
            tracing::warn!("TMDB_API_KEY not set - movies cannot be loaded until it is configured");
        }

        let bind_addr = match non_empty_var("BIND_ADDR") {
            Some(addr) => addr.parse().unwrap_or_else(|e| {
                tracing::warn!(
                    "Invalid BIND_ADDR '{}': {}, falling back to {}",
                    addr,
                    e,
                    DEFAULT_BIND_ADDR
                );
                defaults.bind_addr
            }),
            None => defaults.bind_addr,
        };

        Self {
            tmdb_api_key,
            tmdb_base_url: non_empty_var("TMDB_BASE_URL").unwrap_or(defaults.tmdb_base_url),
            language: non_empty_var("TMDB_LANGUAGE").unwrap_or(defaults.language),
            request_timeout: non_empty_var("TMDB_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            bind_addr,
            rng_seed: non_empty_var("RNG_SEED").and_then(|s| s.parse().ok()),
        }
    }

    /// Build the TMDB client for this configuration
    pub fn build_catalog(&self) -> CatalogResult<TmdbCatalog> {
        TmdbCatalog::new(
            self.tmdb_api_key.clone(),
            self.tmdb_base_url.clone(),
            self.language.clone(),
            self.request_timeout,
        )
    }

    pub fn random_source(&self) -> RandomSource {
        match self.rng_seed {
            Some(seed) => {
                tracing::info!(seed, "Using seeded random source");
                RandomSource::seeded(seed)
            }
            None => RandomSource::from_os(),
        }
    }
}
