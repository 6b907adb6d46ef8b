use super::AppState;
use crate::error::GameError;
use crate::media::PLACEHOLDER_IMAGE;
use crate::protocol::StartResponse;
use crate::types::*;

impl AppState {
    /// Start a new game in the given mode.
    ///
    /// Image resolution and obscuring run outside the session lock; their
    /// results are written back in a second short mutation.
    pub async fn start_game(&self, mode: GameMode) -> Result<StartResponse, GameError> {
        let session = self
            .sessions
            .create_session(&self.catalog, self.rng.as_ref(), &self.config, mode)
            .await?;
        let secret = self.secret_of(&session)?;

        let image_url = self.resolver.resolve(secret).await;
        let source = image_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE);
        let blur_path = match self.obscurer.obscure(&session.id, source).await {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(
                    session_id = %session.id,
                    "Obscuring secret image failed: {}, using placeholder",
                    e
                );
                PLACEHOLDER_IMAGE.to_string()
            }
        };

        let stored_blur = blur_path.clone();
        self.sessions
            .with_session(&session.id, move |s| {
                s.image_url = image_url;
                s.blur_path = Some(stored_blur);
                Ok(())
            })
            .await?;

        Ok(StartResponse {
            session_id: session.id,
            lives: session.lives,
            max_reveals: session.max_reveals,
            dataset_size: self.catalog.size(),
            candidates_count: session.narrowing.as_ref().map(|n| n.candidate_ids.len()),
            max_questions: session.narrowing.as_ref().map(|n| n.max_questions),
            blur_image_url: blur_path,
        })
    }
}
