//! Concurrency-safe session registry.
//!
//! The table itself sits behind an `RwLock` that is only held for
//! bookkeeping (lookup, insert, evict). Each session has its own `Mutex`, so
//! operations on different sessions never wait on each other, while
//! operations on the same session are totally ordered.

use chrono::{DateTime, Utc};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

use super::ask::narrowing_for;
use crate::catalog::Catalog;
use crate::error::GameError;
use crate::random::{new_session_id, RandomSource};
use crate::types::*;

struct Slot {
    created_at: DateTime<Utc>,
    session: Mutex<Session>,
}

/// When to drop sessions. The default keeps everything.
#[derive(Debug, Clone, Default)]
pub struct EvictionPolicy {
    pub max_age: Option<Duration>,
    pub max_sessions: Option<usize>,
}

impl EvictionPolicy {
    pub fn is_noop(&self) -> bool {
        self.max_age.is_none() && self.max_sessions.is_none()
    }
}

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Arc<Slot>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a new session to a uniformly chosen catalog entry and register it
    pub async fn create_session(
        &self,
        catalog: &Catalog,
        rng: &dyn RandomSource,
        config: &GameConfig,
        mode: GameMode,
    ) -> Result<Session, GameError> {
        let secret = catalog.random_entry(rng).ok_or(GameError::EmptyCatalog)?;

        let session = Session {
            id: new_session_id(),
            created_at: Utc::now(),
            secret_id: secret.id,
            lives: config.lives,
            outcome: Outcome::Active,
            revealed_count: 0,
            max_reveals: config.max_reveals,
            used_categories: Default::default(),
            narrowing: match mode {
                GameMode::Lottery => None,
                GameMode::Narrowing => Some(narrowing_for(catalog, config.max_questions)),
            },
            image_url: None,
            blur_path: None,
        };

        self.insert(session.clone()).await?;
        let total = self.len().await;

        tracing::info!(
            session_id = %session.id,
            entry_id = secret.id,
            ?mode,
            total,
            "Session created"
        );
        Ok(session)
    }

    /// Register a session. An id that is already taken is rejected, never overwritten.
    pub async fn insert(&self, session: Session) -> Result<(), GameError> {
        let mut sessions = self.sessions.write().await;
        match sessions.entry(session.id.clone()) {
            Entry::Occupied(_) => {
                tracing::warn!(session_id = %session.id, "Rejected duplicate session id");
                Err(GameError::DuplicateSessionId)
            }
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(Slot {
                    created_at: session.created_at,
                    session: Mutex::new(session),
                }));
                Ok(())
            }
        }
    }

    async fn slot(&self, id: &str) -> Option<Arc<Slot>> {
        let id = id.trim();
        let sessions = self.sessions.read().await;
        let slot = sessions.get(id).cloned();
        if slot.is_none() {
            tracing::warn!(session_id = id, total = sessions.len(), "Session lookup miss");
        }
        slot
    }

    /// Snapshot of a session. Changes to the copy are not written back.
    pub async fn get(&self, id: &str) -> Option<Session> {
        let slot = self.slot(id).await?;
        let session = slot.session.lock().await;
        Some(session.clone())
    }

    /// Run `mutator` with exclusive access to one session.
    ///
    /// The table lock is released before the session lock is taken. The
    /// mutator must not block; its error is returned verbatim.
    pub async fn with_session<T, F>(&self, id: &str, mutator: F) -> Result<T, GameError>
    where
        F: FnOnce(&mut Session) -> Result<T, GameError>,
    {
        let slot = self.slot(id).await.ok_or(GameError::SessionNotFound)?;
        let mut session = slot.session.lock().await;
        mutator(&mut session)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop sessions older than `max_age`, then the oldest ones beyond
    /// `max_sessions`. Returns how many were removed.
    pub async fn evict(&self, policy: &EvictionPolicy, now: DateTime<Utc>) -> usize {
        if policy.is_noop() {
            return 0;
        }

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        if let Some(max_age) = policy.max_age {
            sessions.retain(|_, slot| {
                // Clock skew can make the age negative; treat that as brand new
                let age = (now - slot.created_at).to_std().unwrap_or_default();
                age < max_age
            });
        }

        if let Some(max_sessions) = policy.max_sessions {
            if sessions.len() > max_sessions {
                let mut by_age: Vec<(DateTime<Utc>, SessionId)> = sessions
                    .iter()
                    .map(|(id, slot)| (slot.created_at, id.clone()))
                    .collect();
                by_age.sort();

                let excess = sessions.len() - max_sessions;
                for (_, id) in by_age.into_iter().take(excess) {
                    sessions.remove(&id);
                }
            }
        }

        let removed = before - sessions.len();
        if removed > 0 {
            tracing::info!(removed, remaining = sessions.len(), "Evicted sessions");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::StdRandom;
    use crate::state::fixtures::*;

    fn catalog(n: i64) -> Catalog {
        Catalog::from_entries((1..=n).map(|i| plain_entry(i, &format!("Game {i}"))).collect())
    }

    async fn create(store: &SessionStore, catalog: &Catalog) -> Session {
        store
            .create_session(
                catalog,
                &StdRandom::seeded(1),
                &GameConfig::default(),
                GameMode::Lottery,
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_session_defaults() {
        let store = SessionStore::new();
        let catalog = catalog(5);
        let session = create(&store, &catalog).await;

        assert_eq!(session.lives, 3);
        assert_eq!(session.max_reveals, 10);
        assert_eq!(session.revealed_count, 0);
        assert_eq!(session.outcome, Outcome::Active);
        assert!(session.used_categories.is_empty());
        assert!(session.narrowing.is_none());
        assert!(catalog.by_id(session.secret_id).is_some());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_narrowing_session_has_full_candidates() {
        let store = SessionStore::new();
        let catalog = catalog(4);
        let session = store
            .create_session(
                &catalog,
                &StdRandom::seeded(1),
                &GameConfig::default(),
                GameMode::Narrowing,
            )
            .await
            .unwrap();

        let narrowing = session.narrowing.unwrap();
        assert_eq!(narrowing.candidate_ids.len(), 4);
        assert_eq!(narrowing.questions_asked, 0);
        assert_eq!(narrowing.max_questions, 20);
    }

    #[tokio::test]
    async fn test_create_session_empty_catalog() {
        let store = SessionStore::new();
        let result = store
            .create_session(
                &Catalog::default(),
                &StdRandom::seeded(1),
                &GameConfig::default(),
                GameMode::Lottery,
            )
            .await;

        assert_eq!(result.unwrap_err(), GameError::EmptyCatalog);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = SessionStore::new();
        let catalog = catalog(2);
        let session = create(&store, &catalog).await;

        let mut impostor = session.clone();
        impostor.lives = 99;
        let result = store.insert(impostor).await;

        assert_eq!(result.unwrap_err(), GameError::DuplicateSessionId);
        assert_eq!(store.get(&session.id).await.unwrap().lives, 3);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_returns_snapshot() {
        let store = SessionStore::new();
        let catalog = catalog(2);
        let session = create(&store, &catalog).await;

        let mut copy = store.get(&session.id).await.unwrap();
        copy.lives = 0;

        assert_eq!(store.get(&session.id).await.unwrap().lives, 3);
        assert!(store.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_with_session_trims_id_and_propagates_errors() {
        let store = SessionStore::new();
        let catalog = catalog(2);
        let session = create(&store, &catalog).await;

        let padded = format!("  {}\n", session.id);
        let lives = store
            .with_session(&padded, |s| {
                s.lives -= 1;
                Ok(s.lives)
            })
            .await
            .unwrap();
        assert_eq!(lives, 2);

        let err = store
            .with_session(&session.id, |_| Err::<(), _>(GameError::RevealLimitReached))
            .await
            .unwrap_err();
        assert_eq!(err, GameError::RevealLimitReached);

        let missing = store.with_session("nope", |_| Ok(())).await;
        assert_eq!(missing.unwrap_err(), GameError::SessionNotFound);
    }

    #[tokio::test]
    async fn test_with_session_serializes_same_id() {
        let store = Arc::new(SessionStore::new());
        let catalog = catalog(1);
        let session = create(&store, &catalog).await;

        let mut handles = Vec::new();
        for _ in 0..50 {
            let store = store.clone();
            let id = session.id.clone();
            handles.push(tokio::spawn(async move {
                store
                    .with_session(&id, |s| {
                        s.revealed_count += 1;
                        Ok(())
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.get(&session.id).await.unwrap().revealed_count, 50);
    }

    #[tokio::test]
    async fn test_evict_noop_by_default() {
        let store = SessionStore::new();
        let catalog = catalog(2);
        create(&store, &catalog).await;

        let removed = store
            .evict(&EvictionPolicy::default(), Utc::now() + chrono::Duration::days(365))
            .await;
        assert_eq!(removed, 0);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_evict_by_age() {
        let store = SessionStore::new();
        let catalog = catalog(2);
        let old = create(&store, &catalog).await;

        let policy = EvictionPolicy {
            max_age: Some(Duration::from_secs(60)),
            max_sessions: None,
        };

        assert_eq!(store.evict(&policy, Utc::now()).await, 0);

        let later = old.created_at + chrono::Duration::seconds(61);
        assert_eq!(store.evict(&policy, later).await, 1);
        assert!(store.get(&old.id).await.is_none());
    }

    #[tokio::test]
    async fn test_evict_by_capacity_drops_oldest() {
        let store = SessionStore::new();
        let catalog = catalog(2);

        let mut ids = Vec::new();
        for offset in 0..4 {
            let mut session = create(&store, &catalog).await;
            store.sessions.write().await.remove(&session.id);
            session.created_at = Utc::now() + chrono::Duration::seconds(offset);
            ids.push(session.id.clone());
            store.insert(session).await.unwrap();
        }

        let policy = EvictionPolicy {
            max_age: None,
            max_sessions: Some(2),
        };
        assert_eq!(store.evict(&policy, Utc::now()).await, 2);

        assert!(store.get(&ids[0]).await.is_none());
        assert!(store.get(&ids[1]).await.is_none());
        assert!(store.get(&ids[2]).await.is_some());
        assert!(store.get(&ids[3]).await.is_some());
    }
}
