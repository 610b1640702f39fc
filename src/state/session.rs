use super::{AppState, SessionError};
use crate::types::*;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Clears `is_loading` if a catalog load is dropped before it finishes
struct LoadingGuard {
    status: Option<Arc<RwLock<LoadStatus>>>,
}

impl LoadingGuard {
    fn new(status: Arc<RwLock<LoadStatus>>) -> Self {
        Self {
            status: Some(status),
        }
    }

    fn disarm(mut self) {
        self.status = None;
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let Some(status) = self.status.take() else {
            return;
        };
        tracing::debug!("Movie load cancelled");
        let cleared = match status.try_write() {
            Ok(mut current) => {
                current.is_loading = false;
                true
            }
            Err(_) => false,
        };
        if !cleared {
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                handle.spawn(async move {
                    status.write().await.is_loading = false;
                });
            }
        }
    }
}

impl AppState {
    /// Start a new session.
    ///
    /// Draws the movie from `pool` (or the stored custom pool) when non-empty,
    /// otherwise samples the catalog. The session is published in a single
    /// write once the movie is known; on failure the previous state stays.
    pub async fn start(
        &self,
        player_count: usize,
        filters: FilterCriteria,
        hints: HintConfig,
        pool: Option<Vec<Movie>>,
    ) -> Result<SessionState, SessionError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
            tracing::warn!("Rejected start with {} players", player_count);
            return Err(SessionError::InvalidPlayerCount(player_count));
        }

        let pool = match pool {
            Some(movies) if !movies.is_empty() => movies,
            _ => self.custom_pool.read().await.clone(),
        };

        let movie = match self.rng.pick(&pool) {
            Some(movie) => {
                tracing::info!(
                    movie_id = movie.id,
                    pool_size = pool.len(),
                    "Drew movie from custom pool"
                );
                movie.clone()
            }
            None => self.load_movie(&filters).await?,
        };

        let session = self.build_session(player_count, movie, hints);
        {
            let mut status = self.status.write().await;
            *self.session.write().await = session.clone();
            status.error = None;
        }

        tracing::info!(
            session_id = session.id.as_deref().unwrap_or_default(),
            players = player_count,
            "Session started"
        );
        Ok(session)
    }

    /// Sample one movie, tracking the loading flag and the user-facing error
    async fn load_movie(&self, filters: &FilterCriteria) -> Result<Movie, SessionError> {
        {
            let mut status = self.status.write().await;
            status.is_loading = true;
            status.error = None;
        }

        let guard = LoadingGuard::new(self.status.clone());
        let result = self.sampler.sample_one(filters).await;

        let mut status = self.status.write().await;
        guard.disarm();
        status.is_loading = false;
        match result {
            Ok(movie) => Ok(movie),
            Err(e) => {
                tracing::warn!("Failed to load movie: {}", e);
                let err = SessionError::from(e);
                status.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    fn build_session(&self, player_count: usize, movie: Movie, hints: HintConfig) -> SessionState {
        let impostor = self.rng.index(player_count);
        let players = (0..player_count)
            .map(|id| Player {
                id,
                role: if id == impostor {
                    Role::Impostor
                } else {
                    Role::Normal
                },
                is_revealed: false,
            })
            .collect();

        SessionState {
            id: Some(ulid::Ulid::new().to_string()),
            players,
            player_count,
            current_turn_index: 0,
            turn_step: TurnStep::AwaitingReady,
            current_movie: Some(movie),
            hints,
            phase: GamePhase::PassDevice,
            started_at: Some(chrono::Utc::now().to_rfc3339()),
        }
    }

    /// Uncover the current player's role. Repeating it in the same turn returns
    /// the same card; outside PASS_DEVICE there is nothing to reveal.
    pub async fn reveal_role(&self) -> Option<RoleCard> {
        let mut session = self.session.write().await;
        if session.phase != GamePhase::PassDevice {
            return None;
        }
        session.turn_step = TurnStep::Revealed;
        Self::revealed_card(&session)
    }

    /// Card for the current turn, only once it has been revealed
    pub async fn role_card(&self) -> Option<RoleCard> {
        Self::revealed_card(&*self.session.read().await)
    }

    pub(super) fn revealed_card(session: &SessionState) -> Option<RoleCard> {
        if session.turn_step != TurnStep::Revealed {
            return None;
        }
        let player = session.current_player()?;
        let movie = session.current_movie.as_ref()?;
        Some(RoleCard::for_player(player, movie, &session.hints))
    }

    /// Hand the device to the next player, or open the discussion after the last one.
    /// Ignored outside PASS_DEVICE. Returns the resulting phase.
    pub async fn advance_turn(&self) -> GamePhase {
        let mut session = self.session.write().await;
        if session.phase != GamePhase::PassDevice {
            tracing::debug!("Ignoring advance_turn in {:?}", session.phase);
            return session.phase;
        }

        let index = session.current_turn_index;
        if let Some(player) = session.players.get_mut(index) {
            player.is_revealed = true;
        }
        session.turn_step = TurnStep::AwaitingReady;

        let next = index + 1;
        if next >= session.player_count {
            session.phase = GamePhase::Playing;
            session.current_turn_index = 0;
            tracing::info!("All roles seen, discussion started");
        } else {
            session.current_turn_index = next;
        }

        session.phase
    }

    /// Back to setup. The custom pool is a setup preference and survives.
    pub async fn reset(&self) {
        *self.session.write().await = SessionState::default();
        self.status.write().await.error = None;
        tracing::info!("Session reset");
    }
}
