use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type SessionId = String;
pub type MovieId = u64;
pub type PlayerId = usize;

/// Fewest players a session can be started with
pub const MIN_PLAYERS: usize = 3;
/// Most players the setup screen offers
pub const MAX_PLAYERS: usize = 12;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    #[default]
    Setup,
    PassDevice,
    Playing,
}

/// Where the current turn is inside PASS_DEVICE
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnStep {
    /// Device handed over, role still covered
    #[default]
    AwaitingReady,
    /// Current player is looking at their role card
    Revealed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    Normal,
    Impostor,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub role: Role,
    /// True once this player's turn has been passed on
    pub is_revealed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub genre: String,
    pub overview: String,
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

impl Movie {
    /// Full poster image URL for the given TMDB size bucket (e.g. "w342")
    pub fn poster_url(&self, size: &str) -> Option<String> {
        self.poster_path
            .as_ref()
            .map(|path| format!("https://image.tmdb.org/t/p/{}{}", size, path))
    }
}

/// Decade filter for release dates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Era {
    #[default]
    #[serde(rename = "ALL")]
    All,
    #[serde(rename = "80s")]
    Eighties,
    #[serde(rename = "90s")]
    Nineties,
    #[serde(rename = "00s")]
    Noughties,
    #[serde(rename = "10s")]
    Tens,
    #[serde(rename = "20s")]
    Twenties,
}

impl Era {
    /// Inclusive release date range as (min, max) in `YYYY-MM-DD`
    pub fn date_range(self) -> (&'static str, &'static str) {
        match self {
            Era::All => ("1970-01-01", "2025-12-31"),
            Era::Eighties => ("1980-01-01", "1989-12-31"),
            Era::Nineties => ("1990-01-01", "1999-12-31"),
            Era::Noughties => ("2000-01-01", "2009-12-31"),
            Era::Tens => ("2010-01-01", "2019-12-31"),
            Era::Twenties => ("2020-01-01", "2029-12-31"),
        }
    }
}

/// How famous the candidate movies are, expressed as catalog page depth
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PopularityTier {
    #[default]
    #[serde(rename = "TOP_100")]
    Top100,
    #[serde(rename = "TOP_500")]
    Top500,
    Hardcore,
    Classics,
}

impl PopularityTier {
    /// Deepest discover page worth sampling from for this tier
    pub fn page_depth(self) -> u32 {
        match self {
            PopularityTier::Top100 => 5,
            PopularityTier::Top500 => 25,
            PopularityTier::Hardcore => 100,
            // Top ~300 by vote count
            PopularityTier::Classics => 15,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    #[serde(default)]
    pub era: Era,
    #[serde(default)]
    pub popularity_tier: PopularityTier,
    /// Overrides `era` when set
    #[serde(default)]
    pub exact_year: Option<u16>,
}

impl FilterCriteria {
    /// Year to pin the search to; 0 counts as unset
    pub fn year(&self) -> Option<u16> {
        self.exact_year.filter(|&year| year > 0)
    }
}

/// Which clues the impostor gets instead of the title
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HintConfig {
    #[serde(default = "default_true")]
    pub genre: bool,
    #[serde(default)]
    pub release_year: bool,
    #[serde(default)]
    pub overview: bool,
}

fn default_true() -> bool {
    true
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            genre: true,
            release_year: false,
            overview: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SessionState {
    pub id: Option<SessionId>,
    pub players: Vec<Player>,
    pub player_count: usize,
    pub current_turn_index: usize,
    pub turn_step: TurnStep,
    pub current_movie: Option<Movie>,
    pub hints: HintConfig,
    pub phase: GamePhase,
    pub started_at: Option<String>, // RFC3339, set on start
}

impl SessionState {
    pub fn impostor(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.role == Role::Impostor)
    }

    pub fn current_player(&self) -> Option<&Player> {
        if self.phase != GamePhase::PassDevice {
            return None;
        }
        self.players.get(self.current_turn_index)
    }

    /// True when the current turn is the last one before discussion
    pub fn is_last_turn(&self) -> bool {
        self.phase == GamePhase::PassDevice && self.current_turn_index + 1 == self.player_count
    }
}

/// Clue shown to the impostor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Hint {
    Genre(String),
    ReleaseYear(String),
    Overview(String),
}

/// What the current player sees after tapping "reveal"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "role")]
pub enum RoleCard {
    Normal {
        /// 1-based, as shown on screen
        player_no: usize,
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        poster_path: Option<String>,
    },
    Impostor {
        player_no: usize,
        hints: Vec<Hint>,
    },
}

impl RoleCard {
    pub fn for_player(player: &Player, movie: &Movie, hints: &HintConfig) -> Self {
        let player_no = player.id + 1;
        match player.role {
            Role::Normal => RoleCard::Normal {
                player_no,
                title: movie.title.clone(),
                poster_path: movie.poster_path.clone(),
            },
            Role::Impostor => {
                let mut clues = Vec::new();
                if hints.genre {
                    clues.push(Hint::Genre(movie.genre.clone()));
                }
                if hints.release_year {
                    if let Some(year) = &movie.release_year {
                        clues.push(Hint::ReleaseYear(year.clone()));
                    }
                }
                if hints.overview && !movie.overview.is_empty() {
                    clues.push(Hint::Overview(movie.overview.clone()));
                }
                RoleCard::Impostor {
                    player_no,
                    hints: clues,
                }
            }
        }
    }
}

/// Loading/error flags the setup screen renders
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LoadStatus {
    pub is_loading: bool,
    pub error: Option<String>,
}
