use crate::state::{AppState, EvictionPolicy};
use std::sync::Arc;
use std::time::Duration;

/// Spawns a background task that periodically evicts stale sessions.
/// Does nothing when the policy keeps everything.
pub fn spawn_session_sweeper(
    state: Arc<AppState>,
    policy: EvictionPolicy,
    interval: Duration,
) -> Option<tokio::task::JoinHandle<()>> {
    if policy.is_noop() {
        tracing::debug!("Session eviction disabled");
        return None;
    }

    tracing::info!(
        max_age_secs = policy.max_age.map(|d| d.as_secs()),
        max_sessions = policy.max_sessions,
        interval_secs = interval.as_secs(),
        "Session sweeper started"
    );

    Some(tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            state.sessions.evict(&policy, chrono::Utc::now()).await;
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fixtures::*;
    use crate::types::GameMode;

    #[tokio::test]
    async fn test_noop_policy_spawns_nothing() {
        let state = Arc::new(state_with(vec![plain_entry(1, "Celeste")]));
        let handle =
            spawn_session_sweeper(state, EvictionPolicy::default(), Duration::from_millis(10));
        assert!(handle.is_none());
    }

    #[tokio::test]
    async fn test_sweeper_enforces_capacity() {
        let state = Arc::new(state_with(vec![plain_entry(1, "Celeste")]));
        for _ in 0..3 {
            state.start_game(GameMode::Lottery).await.unwrap();
        }

        let policy = EvictionPolicy {
            max_age: None,
            max_sessions: Some(1),
        };
        let handle = spawn_session_sweeper(state.clone(), policy, Duration::from_millis(10))
            .expect("sweeper should start");

        let evicted = tokio::time::timeout(Duration::from_secs(5), async {
            while state.sessions.len().await > 1 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        handle.abort();

        assert!(evicted.is_ok(), "sweeper never evicted down to capacity");
        assert_eq!(state.sessions.len().await, 1);
    }
}
