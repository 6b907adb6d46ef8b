//! Read-only catalog views. None of these touch the session store.

use std::collections::BTreeMap;

use super::AppState;
use crate::error::GameError;
use crate::protocol::{DreamRollResponse, SuggestResponse, TemplatesResponse, TickerResponse};
use crate::templates;
use crate::types::EntrySummary;

impl AppState {
    /// A uniformly random entry with all of its attributes
    pub fn dream_roll(&self) -> Result<DreamRollResponse, GameError> {
        let entry = self
            .catalog
            .random_entry(self.rng.as_ref())
            .ok_or(GameError::EmptyCatalog)?;
        Ok(DreamRollResponse {
            game: entry.clone(),
        })
    }

    pub fn suggest(&self, query: &str) -> SuggestResponse {
        SuggestResponse {
            names: self.catalog.suggest(query, self.config.suggest_limit),
        }
    }

    pub fn ticker(&self) -> TickerResponse {
        TickerResponse {
            games: self
                .catalog
                .ticker(self.rng.as_ref(), self.config.ticker_limit),
        }
    }

    pub fn question_templates(&self) -> TemplatesResponse {
        TemplatesResponse {
            templates: templates::list(),
        }
    }

    pub fn explore_by_year(&self) -> BTreeMap<i64, Vec<EntrySummary>> {
        self.catalog.group_by_year()
    }

    pub fn explore_by_platform(&self) -> BTreeMap<String, Vec<EntrySummary>> {
        self.catalog.group_by_platform()
    }

    pub fn explore_by_genre(&self) -> BTreeMap<String, Vec<EntrySummary>> {
        self.catalog.group_by_genre()
    }
}
