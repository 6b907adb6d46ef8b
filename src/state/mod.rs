mod ask;
mod browse;
mod guess;
mod reveal;
mod session;
mod store;

pub use guess::normalize_guess_text;
pub use store::{EvictionPolicy, SessionStore};

use crate::catalog::Catalog;
use crate::error::GameError;
use crate::media::{CatalogImageResolver, ImageObscurer, ImageResolver, PlaceholderObscurer};
use crate::random::{RandomSource, StdRandom};
use crate::types::*;
use std::sync::Arc;

/// Shared application state
///
/// The catalog is immutable after load. All session mutation goes through
/// [`SessionStore::with_session`].
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub sessions: SessionStore,
    pub config: GameConfig,
    rng: Arc<dyn RandomSource>,
    resolver: Arc<dyn ImageResolver>,
    obscurer: Arc<dyn ImageObscurer>,
}

impl AppState {
    pub fn new(catalog: Catalog, config: GameConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            sessions: SessionStore::new(),
            config,
            rng: Arc::new(StdRandom::from_os()),
            resolver: Arc::new(CatalogImageResolver),
            obscurer: Arc::new(PlaceholderObscurer),
        }
    }

    pub fn with_random(mut self, rng: Arc<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn ImageResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_obscurer(mut self, obscurer: Arc<dyn ImageObscurer>) -> Self {
        self.obscurer = obscurer;
        self
    }

    /// The catalog entry a session is bound to
    fn secret_of(&self, session: &Session) -> Result<&CatalogEntry, GameError> {
        self.catalog
            .by_id(session.secret_id)
            .ok_or(GameError::SecretMissing(session.secret_id))
    }
}
