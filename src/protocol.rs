//! Request and response contracts shared with the front-end.
//!
//! Field names are camelCase on the wire.

use crate::templates::TemplateInfo;
use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    pub session_id: SessionId,
    pub lives: u32,
    pub max_reveals: u32,
    pub dataset_size: usize,
    /// Only for narrowing sessions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_questions: Option<u32>,
    pub blur_image_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionQuery {
    #[serde(default)]
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
    pub revealed_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealRequest {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealResponse {
    pub category: String,
    pub value: RevealValue,
    pub next_categories: Vec<String>,
    pub revealed_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessRequest {
    #[serde(default)]
    pub guess: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessResponse {
    pub correct: bool,
    pub win: bool,
    pub lose: bool,
    pub lives: u32,
    /// Identity of the secret, present once the session is over
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<EntrySummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    pub question_type_id: String,
    #[serde(default)]
    pub option: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    pub answer: Answer,
    pub candidates_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestResponse {
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerResponse {
    pub games: Vec<EntrySummary>,
}

/// One random entry, shown in full
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DreamRollResponse {
    pub game: CatalogEntry,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplatesResponse {
    pub templates: Vec<TemplateInfo>,
}

/// Body of every rejected request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub msg: String,
}
