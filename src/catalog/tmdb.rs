use super::*;
use std::time::{Duration, Instant};

/// TMDB discover API client
pub struct TmdbCatalog {
    api_key: Option<String>,
    base_url: String,
    language: String,
    client: reqwest::Client,
}

impl TmdbCatalog {
    /// Create a client; a missing key is only reported when a request is made
    pub fn new(
        api_key: Option<String>,
        base_url: String,
        language: String,
        timeout: Duration,
    ) -> CatalogResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            language,
            client,
        })
    }
}

#[async_trait]
impl MovieCatalog for TmdbCatalog {
    async fn discover(&self, query: &DiscoverQuery) -> CatalogResult<DiscoverPage> {
        let api_key = self.api_key.as_deref().ok_or(CatalogError::MissingApiKey)?;
        let start = Instant::now();

        let mut params = vec![
            ("api_key", api_key.to_string()),
            ("language", self.language.clone()),
        ];
        params.extend(query.params());

        let url = format!("{}/discover/movie", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        if !response.status().is_success() {
            tracing::warn!(
                page = query.page,
                status = %response.status(),
                "TMDB discover request rejected"
            );
            return Err(CatalogError::Status(response.status().as_u16()));
        }

        let page: DiscoverPage = response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))?;

        tracing::debug!(
            page = query.page,
            results = page.results.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "TMDB discover page fetched"
        );

        Ok(page)
    }

    fn name(&self) -> &str {
        "tmdb"
    }
}
