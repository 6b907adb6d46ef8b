use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Opaque ID types
pub type EntryId = i64;
pub type SessionId = String;

/// One secret candidate from the catalog.
///
/// Everything except `id` and `name` is optional in the source data; missing
/// fields deserialize to their empty value and are treated as "no data" by the
/// category registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogEntry {
    // Identity
    pub id: EntryId,
    pub name: String,
    pub slug: String,
    pub year: i64,
    pub released: String,
    pub series: String,

    // Platforms & distribution
    pub platforms: Vec<String>,
    pub stores: Vec<String>,

    // Genres & tags
    #[serde(alias = "main_genre")]
    pub primary_genre: String,
    #[serde(alias = "genres")]
    pub sub_genres: Vec<String>,
    pub tags: Vec<String>,
    pub vibe_tags: Vec<String>,

    // Protagonist
    pub protagonist_type: String,
    pub protagonist_identity: String,
    pub protagonist_gender: String,
    pub protagonist_role: String,

    // World
    pub world_type: String,
    pub world_setting: String,
    pub world_origin: String,
    pub time_period: String,
    pub environment_type: String,
    pub world_tone: String,
    pub world_features: Vec<String>,

    // Narrative
    pub story_presence: String,
    pub story_structure: String,
    pub story_themes: Vec<String>,
    pub dialogue_type: String,
    pub choices_impact: String,
    pub narrative_perspective: String,

    // Combat & movement
    pub combat_style: String,
    pub combat_pacing: String,
    pub combat_complexity: String,
    pub movement_type: String,
    pub enemy_types: Vec<String>,

    // Presentation
    #[serde(alias = "perspective")]
    pub camera_view: String,
    pub camera_behavior: String,
    pub visual_style: String,
    pub color_palette: String,

    // Structure & systems
    pub game_structure: String,
    pub progression_type: String,
    pub crafting_system: String,
    pub loot_system: String,
    pub economic_system: String,
    pub puzzle_presence: String,
    pub special_mechanics: Vec<String>,
    pub iconic_features: Vec<String>,

    // Multiplayer
    pub multiplayer: bool,
    pub co_op: bool,
    pub multiplayer_presence: String,
    pub multiplayer_type: String,
    pub online_requirement: String,
    pub coop_scale: String,
    pub pvp_scale: String,

    // Feel
    pub overall_tone: String,
    pub player_emotion: String,
    pub difficulty_style: String,
    pub challenge_type: String,
    pub average_playtime: String,
    pub pace: String,
    pub immersion_type: String,
    pub reward_style: String,

    // Ratings
    pub esrb: String,
    pub age_rating: String,
    pub violence_level: String,
    pub maturity_level: String,
    pub major_themes: Vec<String>,
    pub metacritic: i64,
    pub playtime: i64,

    // Production
    pub developers: Vec<String>,
    pub publishers: Vec<String>,

    // Media
    #[serde(rename = "imageUrl", alias = "image_url")]
    pub image_url: String,
}

/// Public identity of an entry. Only handed out once a guess resolves,
/// or by the catalog browsing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntrySummary {
    pub id: EntryId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<&CatalogEntry> for EntrySummary {
    fn from(entry: &CatalogEntry) -> Self {
        let image = entry.image_url.trim();
        Self {
            id: entry.id,
            name: entry.name.clone(),
            image_url: (!image.is_empty()).then(|| image.to_string()),
        }
    }
}

/// Cleaned value of one category, as revealed to the player.
///
/// Serialized untagged so the wire shape is the bare value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RevealValue {
    Flag(bool),
    Number(i64),
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
}

impl From<bool> for Answer {
    fn from(yes: bool) -> Self {
        if yes {
            Answer::Yes
        } else {
            Answer::No
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Spend reveals drawn from a randomized category lottery
    Lottery,
    /// Legacy yes/no questions narrowing a candidate set
    Narrowing,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Active,
    Won,
    Lost,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub lives: u32,
    pub max_reveals: u32,
    /// How many categories the lottery offers at once
    pub offer_size: usize,
    pub max_questions: u32,
    pub suggest_limit: usize,
    pub ticker_limit: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lives: 3,
            max_reveals: 10,
            offer_size: 3,
            max_questions: 20,
            suggest_limit: 15,
            ticker_limit: 40,
        }
    }
}

/// Candidate narrowing state, only present once the legacy mode is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrowingState {
    pub candidate_ids: HashSet<EntryId>,
    pub questions_asked: u32,
    pub max_questions: u32,
}

/// One active game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub secret_id: EntryId,
    pub lives: u32,
    pub outcome: Outcome,
    pub revealed_count: u32,
    pub max_reveals: u32,
    pub used_categories: HashSet<String>,
    pub narrowing: Option<NarrowingState>,
    /// Image URL resolved for the secret entry at creation
    pub image_url: Option<String>,
    /// Obscured preview handed to the player
    pub blur_path: Option<String>,
}

impl Session {
    pub fn is_finished(&self) -> bool {
        self.outcome != Outcome::Active
    }
}
