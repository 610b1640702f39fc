use crate::types::*;
use serde::{Deserialize, Serialize};

/// Snapshot of everything the screens render
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionView {
    #[serde(flatten)]
    pub session: SessionState,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Present while the current player is looking at their role
    pub role_card: Option<RoleCard>,
    /// Next advance opens the discussion
    pub is_last_turn: bool,
    pub custom_pool_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRequest {
    pub player_count: usize,
    #[serde(default)]
    pub filters: FilterCriteria,
    #[serde(default)]
    pub hints: HintConfig,
    /// Draw from these movies instead of the stored pool or the catalog
    #[serde(default)]
    pub pool: Option<Vec<Movie>>,
}

/// Result of the curation screen: all fetched candidates plus the ticked ids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSelection {
    pub candidates: Vec<Movie>,
    pub selected_ids: Vec<MovieId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub msg: String,
}
