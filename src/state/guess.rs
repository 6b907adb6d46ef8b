use super::AppState;
use crate::error::GameError;
use crate::protocol::GuessResponse;
use crate::types::*;

const STRIPPED_CHARS: &[char] = &[
    '™', '®', ':', '-', ',', '.', '\'', '"', '‘', '’', '“', '”', '•', '–', '—',
];

const EDITION_WORDS: &[&str] = &["edition", "remastered", "definitive"];

/// Comparison key for guesses. Not a fuzzy matcher: two titles are the same
/// guess only if their keys are equal.
pub fn normalize_guess_text(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect();

    stripped
        .split_whitespace()
        .filter(|word| !EDITION_WORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

impl Session {
    pub fn submit_guess(
        &mut self,
        secret: &CatalogEntry,
        raw_guess: &str,
    ) -> Result<GuessResponse, GameError> {
        if self.is_finished() {
            return Err(GameError::SessionFinished);
        }

        // A secret whose name normalizes to nothing can never be guessed
        let target = normalize_guess_text(&secret.name);
        let correct = !target.is_empty() && normalize_guess_text(raw_guess) == target;
        if correct {
            self.outcome = Outcome::Won;
        } else {
            self.lives = self.lives.saturating_sub(1);
            if self.lives == 0 {
                self.outcome = Outcome::Lost;
            }
        }

        let game = self.is_finished().then(|| {
            let mut summary = EntrySummary::from(secret);
            if let Some(url) = &self.image_url {
                summary.image_url = Some(url.clone());
            }
            summary
        });

        Ok(GuessResponse {
            correct,
            win: self.outcome == Outcome::Won,
            lose: self.outcome == Outcome::Lost,
            lives: self.lives,
            game,
        })
    }
}

impl AppState {
    pub async fn submit_guess(
        &self,
        session_id: &str,
        guess: &str,
    ) -> Result<GuessResponse, GameError> {
        if guess.trim().is_empty() {
            return Err(GameError::InvalidRequest("missing guess".to_string()));
        }

        let response = self
            .sessions
            .with_session(session_id, |session| {
                let secret = self.secret_of(session)?;
                session.submit_guess(secret, guess)
            })
            .await?;

        tracing::info!(
            session_id = session_id.trim(),
            correct = response.correct,
            lives = response.lives,
            win = response.win,
            lose = response.lose,
            "Guess submitted"
        );
        Ok(response)
    }
}
