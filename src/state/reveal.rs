use super::AppState;
use crate::categories;
use crate::error::GameError;
use crate::protocol::{CategoriesResponse, RevealResponse};
use crate::random::RandomSource;
use crate::types::*;

impl Session {
    /// Current lottery: unused, data-bearing categories for the secret entry
    pub fn offer(
        &self,
        secret: &CatalogEntry,
        offer_size: usize,
        rng: &dyn RandomSource,
    ) -> Vec<String> {
        categories::available_categories(secret, &self.used_categories, offer_size, rng)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Reveal one category. Everything is validated before the session is touched.
    pub fn reveal(
        &mut self,
        secret: &CatalogEntry,
        category: &str,
        offer_size: usize,
        rng: &dyn RandomSource,
    ) -> Result<RevealResponse, GameError> {
        if self.revealed_count >= self.max_reveals {
            return Err(GameError::RevealLimitReached);
        }
        if self.is_finished() {
            return Err(GameError::SessionFinished);
        }
        if self.used_categories.contains(category) {
            return Err(GameError::CategoryAlreadyRevealed(category.to_string()));
        }
        let value = categories::extract(secret, category)
            .ok_or_else(|| GameError::NoDataForCategory(category.to_string()))?;

        self.used_categories.insert(category.to_string());
        self.revealed_count += 1;

        Ok(RevealResponse {
            category: category.to_string(),
            value,
            next_categories: self.offer(secret, offer_size, rng),
            revealed_count: self.revealed_count,
        })
    }
}

impl AppState {
    /// Read-only: offer the next categories without committing anything
    pub async fn offer_categories(&self, session_id: &str) -> Result<CategoriesResponse, GameError> {
        let offer_size = self.config.offer_size;
        let rng = self.rng.as_ref();

        self.sessions
            .with_session(session_id, |session| {
                let secret = self.secret_of(session)?;
                Ok(CategoriesResponse {
                    categories: session.offer(secret, offer_size, rng),
                    revealed_count: session.revealed_count,
                })
            })
            .await
    }

    pub async fn reveal(
        &self,
        session_id: &str,
        category: &str,
    ) -> Result<RevealResponse, GameError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(GameError::InvalidRequest("missing category".to_string()));
        }
        let offer_size = self.config.offer_size;
        let rng = self.rng.as_ref();

        let response = self
            .sessions
            .with_session(session_id, |session| {
                let secret = self.secret_of(session)?;
                session.reveal(secret, category, offer_size, rng)
            })
            .await?;

        tracing::debug!(
            session_id = session_id.trim(),
            category,
            revealed = response.revealed_count,
            "Category revealed"
        );
        Ok(response)
    }
}
