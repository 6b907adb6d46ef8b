use super::AppState;
use crate::catalog::Catalog;
use crate::error::GameError;
use crate::protocol::AskResponse;
use crate::templates::{self, QuestionTemplate};
use crate::types::*;

/// Fresh narrowing state: every catalog entry is still a candidate
pub(crate) fn narrowing_for(catalog: &Catalog, max_questions: u32) -> NarrowingState {
    NarrowingState {
        candidate_ids: catalog.ids().collect(),
        questions_asked: 0,
        max_questions,
    }
}

impl Session {
    /// Answer one yes/no question about the secret and drop every candidate
    /// that would have answered differently.
    pub fn ask(
        &mut self,
        catalog: &Catalog,
        template: &QuestionTemplate,
        option: &str,
        max_questions: u32,
    ) -> Result<AskResponse, GameError> {
        if self.is_finished() {
            return Err(GameError::SessionFinished);
        }
        let asked = self.narrowing.as_ref().map_or(0, |n| n.questions_asked);
        let limit = self.narrowing.as_ref().map_or(max_questions, |n| n.max_questions);
        if asked >= limit {
            return Err(GameError::QuestionLimitReached);
        }
        let secret = catalog
            .by_id(self.secret_id)
            .ok_or(GameError::SecretMissing(self.secret_id))?;

        let truth = (template.matches)(secret, option);
        let narrowing = self
            .narrowing
            .get_or_insert_with(|| narrowing_for(catalog, max_questions));
        narrowing.questions_asked += 1;
        narrowing.candidate_ids.retain(|id| {
            catalog
                .by_id(*id)
                .is_some_and(|entry| (template.matches)(entry, option) == truth)
        });

        Ok(AskResponse {
            answer: truth.into(),
            candidates_count: narrowing.candidate_ids.len(),
        })
    }
}

impl AppState {
    pub async fn ask(
        &self,
        session_id: &str,
        template_id: &str,
        option: &str,
    ) -> Result<AskResponse, GameError> {
        let template = templates::find(template_id.trim())
            .ok_or_else(|| GameError::UnknownQuestion(template_id.to_string()))?;
        let option = option.trim();
        if option.is_empty() {
            return Err(GameError::InvalidRequest("missing option".to_string()));
        }
        let max_questions = self.config.max_questions;

        let response = self
            .sessions
            .with_session(session_id, |session| {
                session.ask(&self.catalog, template, option, max_questions)
            })
            .await?;

        tracing::debug!(
            session_id = session_id.trim(),
            question = template.id,
            option,
            answer = ?response.answer,
            remaining = response.candidates_count,
            "Question answered"
        );
        Ok(response)
    }
}
