//! Movie selection on top of a [`MovieCatalog`].
//!
//! `sample_one` draws a random page within the tier's depth and a random entry
//! from that page. `sample_pool` fetches the first few pages at once for manual
//! curation.

use crate::catalog::{CatalogError, CatalogResult, DiscoverQuery, MovieCatalog};
use crate::random::RandomSource;
use crate::types::{FilterCriteria, Movie, MovieId};
use std::collections::HashSet;
use std::sync::Arc;

/// Pages fetched when building a candidate pool
pub const POOL_PAGES: [u32; 3] = [1, 2, 3];

/// Depth cap when filtering on a single year
const EXACT_YEAR_MAX_PAGE: u32 = 10;

/// Deepest page to draw from for these filters, never below 1
pub fn max_page(filters: &FilterCriteria) -> u32 {
    let depth = filters.popularity_tier.page_depth();
    let depth = match filters.year() {
        Some(_) => depth.min(EXACT_YEAR_MAX_PAGE),
        None => depth,
    };
    depth.max(1)
}

/// Drop repeated ids, keeping the first occurrence and the original order
pub fn dedup_by_id(movies: impl IntoIterator<Item = Movie>) -> Vec<Movie> {
    let mut seen: HashSet<MovieId> = HashSet::new();
    movies
        .into_iter()
        .filter(|movie| seen.insert(movie.id))
        .collect()
}

#[derive(Clone)]
pub struct MovieSampler {
    catalog: Arc<dyn MovieCatalog>,
    rng: RandomSource,
}

impl MovieSampler {
    pub fn new(catalog: Arc<dyn MovieCatalog>, rng: RandomSource) -> Self {
        Self { catalog, rng }
    }

    /// Pick one random movie matching the filters
    pub async fn sample_one(&self, filters: &FilterCriteria) -> CatalogResult<Movie> {
        let max_page = max_page(filters);
        let page = self.rng.page(max_page);
        tracing::debug!(
            catalog = self.catalog.name(),
            page,
            max_page,
            "Sampling movie from discover page"
        );

        let query = DiscoverQuery::from_filters(filters, page);
        let result = self.catalog.discover(&query).await?;

        let raw = self
            .rng
            .pick(&result.results)
            .cloned()
            .ok_or(CatalogError::EmptyResults { page })?;

        let movie = Movie::from(raw);
        tracing::info!(movie_id = movie.id, page, "Sampled movie");
        Ok(movie)
    }

    /// Fetch the first pages concurrently and merge them into a deduplicated pool.
    /// One failing page fails the whole pool.
    pub async fn sample_pool(&self, filters: &FilterCriteria) -> CatalogResult<Vec<Movie>> {
        let queries: Vec<DiscoverQuery> = POOL_PAGES
            .iter()
            .map(|page| DiscoverQuery::from_filters(filters, *page))
            .collect();

        let pages =
            futures::future::try_join_all(queries.iter().map(|q| self.catalog.discover(q))).await?;

        let fetched: usize = pages.iter().map(|p| p.results.len()).sum();
        let pool = dedup_by_id(
            pages
                .into_iter()
                .flat_map(|p| p.results)
                .map(Movie::from),
        );

        tracing::info!(
            fetched,
            unique = pool.len(),
            "Built candidate pool from {} pages",
            POOL_PAGES.len()
        );
        Ok(pool)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::{DiscoverPage, RawMovie};
    use crate::types::{Era, PopularityTier};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    pub(crate) fn raw(id: u64) -> RawMovie {
        RawMovie {
            id,
            title: format!("Movie {}", id),
            genre_ids: vec![18],
            overview: format!("Overview {}", id),
            poster_path: None,
            release_date: Some("1995-06-01".to_string()),
        }
    }

    /// Catalog double returning canned pages (by page number) or a fixed error
    #[derive(Default)]
    pub(crate) struct StubCatalog {
        pub pages: Vec<(u32, Vec<RawMovie>)>,
        /// Page used for any page number not listed in `pages`
        pub fallback: Option<Vec<RawMovie>>,
        pub error: Option<CatalogError>,
        pub calls: AtomicUsize,
        pub queries: Mutex<Vec<DiscoverQuery>>,
    }

    impl StubCatalog {
        pub(crate) fn with_every_page(results: Vec<RawMovie>) -> Self {
            Self {
                fallback: Some(results),
                ..Default::default()
            }
        }

        pub(crate) fn failing(error: CatalogError) -> Self {
            Self {
                error: Some(error),
                ..Default::default()
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MovieCatalog for StubCatalog {
        async fn discover(&self, query: &DiscoverQuery) -> CatalogResult<DiscoverPage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.clone());

            if let Some(err) = &self.error {
                return Err(err.clone());
            }

            let results = self
                .pages
                .iter()
                .find(|(page, _)| *page == query.page)
                .map(|(_, results)| results.clone())
                .or_else(|| self.fallback.clone())
                .unwrap_or_default();

            Ok(DiscoverPage {
                page: query.page,
                total_results: results.len() as u32,
                results,
                total_pages: 500,
            })
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    #[test]
    fn test_max_page_per_tier() {
        let mut filters = FilterCriteria::default();
        assert_eq!(max_page(&filters), 5);
        filters.popularity_tier = PopularityTier::Top500;
        assert_eq!(max_page(&filters), 25);
        filters.popularity_tier = PopularityTier::Hardcore;
        assert_eq!(max_page(&filters), 100);
        filters.popularity_tier = PopularityTier::Classics;
        assert_eq!(max_page(&filters), 15);
    }

    #[test]
    fn test_exact_year_caps_depth() {
        let filters = FilterCriteria {
            era: Era::All,
            popularity_tier: PopularityTier::Hardcore,
            exact_year: Some(1997),
        };
        assert_eq!(max_page(&filters), 10);

        let shallow = FilterCriteria {
            exact_year: Some(1997),
            ..FilterCriteria::default()
        };
        assert_eq!(max_page(&shallow), 5);

        let unset = FilterCriteria {
            exact_year: Some(0),
            ..filters
        };
        assert_eq!(max_page(&unset), 100);
    }

    #[tokio::test]
    async fn test_sample_one_picks_from_page() {
        let results: Vec<RawMovie> = (1..=12).map(raw).collect();
        let catalog = Arc::new(StubCatalog::with_every_page(results));
        let sampler = MovieSampler::new(catalog.clone(), RandomSource::seeded(3));

        let filters = FilterCriteria {
            era: Era::Nineties,
            popularity_tier: PopularityTier::Top100,
            exact_year: None,
        };
        let movie = sampler.sample_one(&filters).await.unwrap();

        assert!((1..=12).contains(&movie.id));
        assert_eq!(movie.genre, "Drama");
        assert_eq!(catalog.call_count(), 1);

        let queries = catalog.queries.lock().unwrap();
        assert!((1..=5).contains(&queries[0].page));
        assert_eq!(
            queries[0].release_date_range,
            Some(("1990-01-01", "1999-12-31"))
        );
    }

    #[tokio::test]
    async fn test_sample_one_empty_page_fails() {
        let catalog = Arc::new(StubCatalog::with_every_page(vec![]));
        let sampler = MovieSampler::new(catalog.clone(), RandomSource::seeded(3));

        let err = sampler
            .sample_one(&FilterCriteria::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::EmptyResults { .. }));
        // No retry on another page
        assert_eq!(catalog.call_count(), 1);
    }

    #[tokio::test]
    async fn test_sample_one_propagates_catalog_error() {
        let catalog = Arc::new(StubCatalog::failing(CatalogError::Status(500)));
        let sampler = MovieSampler::new(catalog, RandomSource::seeded(3));

        let err = sampler
            .sample_one(&FilterCriteria::default())
            .await
            .unwrap_err();
        assert_eq!(err, CatalogError::Status(500));
    }

    #[tokio::test]
    async fn test_sample_pool_dedups_across_pages() {
        // 3 pages x 20, 5 ids of page 2 repeat ids from page 1
        let page1: Vec<RawMovie> = (1..=20).map(raw).collect();
        let page2: Vec<RawMovie> = (16..=35).map(raw).collect();
        let page3: Vec<RawMovie> = (101..=120).map(raw).collect();
        let catalog = Arc::new(StubCatalog {
            pages: vec![(1, page1), (2, page2), (3, page3)],
            ..Default::default()
        });
        let sampler = MovieSampler::new(catalog.clone(), RandomSource::seeded(1));

        let pool = sampler
            .sample_pool(&FilterCriteria::default())
            .await
            .unwrap();

        assert_eq!(pool.len(), 55);
        let ids: HashSet<MovieId> = pool.iter().map(|m| m.id).collect();
        assert_eq!(ids.len(), pool.len());
        assert_eq!(pool[0].id, 1);
        assert_eq!(catalog.call_count(), 3);
    }

    #[tokio::test]
    async fn test_sample_pool_all_empty_is_ok() {
        let catalog = Arc::new(StubCatalog::with_every_page(vec![]));
        let sampler = MovieSampler::new(catalog, RandomSource::seeded(1));

        let pool = sampler
            .sample_pool(&FilterCriteria::default())
            .await
            .unwrap();
        assert!(pool.is_empty());
    }

    #[tokio::test]
    async fn test_sample_pool_fails_if_any_page_fails() {
        let catalog = Arc::new(StubCatalog::failing(CatalogError::Request(
            "connection reset".to_string(),
        )));
        let sampler = MovieSampler::new(catalog, RandomSource::seeded(1));

        let result = sampler.sample_pool(&FilterCriteria::default()).await;
        assert!(matches!(result, Err(CatalogError::Request(_))));
    }

    #[test]
    fn test_dedup_keeps_first_seen() {
        let mut first = Movie::from(raw(7));
        first.title = "first".to_string();
        let mut second = Movie::from(raw(7));
        second.title = "second".to_string();

        let deduped = dedup_by_id(vec![first, Movie::from(raw(8)), second]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].title, "first");
    }
}
