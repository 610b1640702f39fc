mod tmdb;

use crate::types::{FilterCriteria, Movie, PopularityTier};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use tmdb::TmdbCatalog;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while talking to the movie catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Missing TMDB API key")]
    MissingApiKey,

    #[error("Catalog request failed: {0}")]
    Request(String),

    #[error("Catalog returned status: {0}")]
    Status(u16),

    #[error("Response parsing failed: {0}")]
    Parse(String),

    #[error("No movies found on page {page}")]
    EmptyResults { page: u32 },
}

/// Minimum vote count a movie needs to be considered at all
pub const MIN_VOTE_COUNT: u32 = 300;

/// Label used when a record has no (known) genre
pub const UNKNOWN_GENRE: &str = "Género desconocido";

/// TMDB genre ids with their Spanish labels
const GENRES: &[(u32, &str)] = &[
    (28, "Acción"),
    (12, "Aventura"),
    (16, "Animación"),
    (35, "Comedia"),
    (80, "Crimen"),
    (99, "Documental"),
    (18, "Drama"),
    (10751, "Familia"),
    (14, "Fantasía"),
    (36, "Historia"),
    (27, "Terror"),
    (10402, "Música"),
    (9648, "Misterio"),
    (10749, "Romance"),
    (878, "Ciencia ficción"),
    (10770, "Película de TV"),
    (53, "Suspense"),
    (10752, "Bélica"),
    (37, "Western"),
];

/// Localized genre label for a TMDB genre id
pub fn genre_name(id: u32) -> Option<&'static str> {
    GENRES
        .iter()
        .find(|(genre_id, _)| *genre_id == id)
        .map(|(_, name)| *name)
}

/// Parameters of one discover request, minus credential and locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverQuery {
    pub sort_by: &'static str,
    pub min_vote_count: u32,
    pub release_year: Option<u16>,
    /// Inclusive `YYYY-MM-DD` bounds, absent when `release_year` is set
    pub release_date_range: Option<(&'static str, &'static str)>,
    pub page: u32,
}

impl DiscoverQuery {
    pub fn from_filters(filters: &FilterCriteria, page: u32) -> Self {
        // Classics are all-time favourites, everything else follows current popularity
        let sort_by = match filters.popularity_tier {
            PopularityTier::Classics => "vote_count.desc",
            _ => "popularity.desc",
        };

        let (release_year, release_date_range) = match filters.year() {
            Some(year) => (Some(year), None),
            None => (None, Some(filters.era.date_range())),
        };

        Self {
            sort_by,
            min_vote_count: MIN_VOTE_COUNT,
            release_year,
            release_date_range,
            page: page.max(1),
        }
    }

    /// Query string pairs in the order the catalog documents them
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("sort_by", self.sort_by.to_string()),
            ("include_adult", "false".to_string()),
            ("include_video", "false".to_string()),
            ("vote_count.gte", self.min_vote_count.to_string()),
        ];

        if let Some(year) = self.release_year {
            params.push(("primary_release_year", year.to_string()));
        } else if let Some((min, max)) = self.release_date_range {
            params.push(("primary_release_date.gte", min.to_string()));
            params.push(("primary_release_date.lte", max.to_string()));
        }

        params.push(("page", self.page.to_string()));
        params
    }
}

/// A movie record as returned by the discover endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawMovie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

impl From<RawMovie> for Movie {
    fn from(raw: RawMovie) -> Self {
        let genre = raw
            .genre_ids
            .first()
            .and_then(|id| genre_name(*id))
            .unwrap_or(UNKNOWN_GENRE)
            .to_string();

        let release_year = raw
            .release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .filter(|year| year.chars().all(|c| c.is_ascii_digit()))
            .map(str::to_string);

        Movie {
            id: raw.id,
            title: raw.title,
            genre,
            overview: raw.overview,
            poster_path: raw.poster_path,
            release_year,
            keywords: None,
        }
    }
}

/// One page of discover results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DiscoverPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<RawMovie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

/// Trait that every movie catalog backend must implement
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Fetch one page of the discover listing
    async fn discover(&self, query: &DiscoverQuery) -> CatalogResult<DiscoverPage>;

    /// Get the name of this catalog
    fn name(&self) -> &str;
}
