//! Live game sessions and the boundary to whatever displays them.
//!
//! Each session owns one [`Game`] behind an async mutex. An action is checked
//! and applied without yielding, then the fresh view is rendered while the
//! lock is still held, so two clicks racing for the last vote or the same
//! turn cannot both pass validation and renders for one game stay ordered.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    action::{ActionId, GameId},
    error::{GameError, RenderError, Result},
    game::{Game, Rejection, Transition},
    participant::Participant,
    view::GameView,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Displays game views for one game instance.
///
/// Each call replaces whatever was shown before, so repeated calls with the
/// same view must be harmless.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, view: GameView) -> std::result::Result<(), RenderError>;
}

struct SessionState {
    game: Game,
    deadline: Instant,
}

struct Session {
    state: Mutex<SessionState>,
    renderer: Arc<dyn Renderer>,
}

impl Session {
    async fn render(&self, game_id: GameId, view: GameView) {
        if let Err(e) = self.renderer.render(view).await {
            warn!("Failed to render game {}: {}", game_id, e);
        }
    }
}

struct RegistryInner {
    sessions: RwLock<HashMap<GameId, Arc<Session>>>,
    timeout: Duration,
}

/// Every game currently being played, keyed by id
#[derive(Clone)]
pub struct GameRegistry {
    inner: Arc<RegistryInner>,
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl GameRegistry {
    pub fn new(timeout: Duration) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                sessions: RwLock::new(HashMap::new()),
                timeout,
            }),
        }
    }

    /// Inactivity window after which an unfinished game is cancelled
    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    pub fn len(&self) -> usize {
        self.inner.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.sessions.read().is_empty()
    }

    pub fn contains(&self, game_id: GameId) -> bool {
        self.inner.sessions.read().contains_key(&game_id)
    }

    /// Start hosting a game and arm its inactivity timer.
    ///
    /// The caller is expected to have shown the game's initial view already;
    /// `renderer` is used for every update after that.
    pub fn start(&self, game: impl Into<Game>, renderer: Arc<dyn Renderer>) -> GameId {
        let game = game.into();
        let game_id = game.id();
        let kind = game.kind();

        let session = Arc::new(Session {
            state: Mutex::new(SessionState {
                game,
                deadline: Instant::now() + self.inner.timeout,
            }),
            renderer,
        });

        self.inner
            .sessions
            .write()
            .insert(game_id, Arc::clone(&session));
        tokio::spawn(watch_inactivity(
            Arc::downgrade(&self.inner),
            game_id,
            session,
        ));

        info!("Started {} game {}", kind, game_id);
        game_id
    }

    /// Apply a participant's action to the game it targets.
    ///
    /// Rejected actions come back as [`Transition::Ignored`]; only a game id
    /// that is not live is an error.
    pub async fn dispatch(&self, action: &ActionId, participant: &Participant) -> Result<Transition> {
        let session = self
            .session(action.game)
            .ok_or(GameError::UnknownGame {
                game_id: action.game,
            })?;

        let mut state = session.state.lock().await;

        let transition = if state.game.kind() == action.kind {
            state.game.apply(participant, action.action)
        } else {
            Transition::Ignored(Rejection::UnsupportedAction)
        };

        if let Transition::Ignored(reason) = transition {
            debug!(
                "Ignored {:?} from {} on game {}: {}",
                action.action, participant.id, action.game, reason
            );
            return Ok(transition);
        }

        state.deadline = Instant::now() + self.inner.timeout;
        if state.game.is_terminal() {
            info!("Game {} finished", action.game);
            self.remove(action.game);
        }

        let view = state.game.view();
        session.render(action.game, view).await;

        Ok(transition)
    }

    /// Run the timeout path for a game right away
    pub async fn expire(&self, game_id: GameId) -> Result<Transition> {
        let session = self
            .session(game_id)
            .ok_or(GameError::UnknownGame { game_id })?;
        let mut state = session.state.lock().await;
        Ok(settle_expired(&self.inner, game_id, &session, &mut state).await)
    }

    /// Drop a game without rendering, for when it never made it on screen.
    ///
    /// Returns whether the game was live.
    pub async fn discard(&self, game_id: GameId) -> bool {
        let Some(session) = self.session(game_id) else {
            return false;
        };
        let mut state = session.state.lock().await;
        state.game.expire();
        self.remove(game_id);
        debug!("Discarded game {}", game_id);
        true
    }

    fn session(&self, game_id: GameId) -> Option<Arc<Session>> {
        self.inner.sessions.read().get(&game_id).cloned()
    }

    fn remove(&self, game_id: GameId) {
        self.inner.sessions.write().remove(&game_id);
    }
}

async fn settle_expired(
    inner: &RegistryInner,
    game_id: GameId,
    session: &Session,
    state: &mut SessionState,
) -> Transition {
    let transition = state.game.expire();
    inner.sessions.write().remove(&game_id);

    if transition.is_applied() {
        info!("Game {} cancelled after inactivity", game_id);
        session.render(game_id, state.game.view()).await;
    }
    transition
}

/// One-shot inactivity timer, pushed back whenever the game sees activity
async fn watch_inactivity(registry: Weak<RegistryInner>, game_id: GameId, session: Arc<Session>) {
    loop {
        let deadline = session.state.lock().await.deadline;
        tokio::time::sleep_until(deadline).await;

        let Some(inner) = registry.upgrade() else {
            return;
        };
        let mut state = session.state.lock().await;

        if state.game.is_terminal() {
            inner.sessions.write().remove(&game_id);
            return;
        }
        if Instant::now() < state.deadline {
            continue;
        }

        settle_expired(&inner, game_id, &session, &mut state).await;
        return;
    }
}
