//! Yes/no question templates for the narrowing mode.
//!
//! A template plus a player-chosen option forms one question; the predicate
//! answers it for any catalog entry.

use serde::Serialize;

use crate::types::CatalogEntry;

#[derive(Clone, Copy)]
pub struct QuestionTemplate {
    pub id: &'static str,
    pub label: &'static str,
    pub matches: fn(&CatalogEntry, &str) -> bool,
}

/// Listing shape for the front-end
#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub id: &'static str,
    pub label: &'static str,
}

pub static TEMPLATES: &[QuestionTemplate] = &[
    QuestionTemplate {
        id: "platform",
        label: "Platform",
        matches: match_platform,
    },
    QuestionTemplate {
        id: "genre",
        label: "Main Genre",
        matches: match_genre,
    },
    QuestionTemplate {
        id: "perspective",
        label: "Perspective",
        matches: |e, opt| contains_ci(&e.camera_view, opt),
    },
    QuestionTemplate {
        id: "world",
        label: "World Type",
        matches: |e, opt| contains_ci(&e.world_type, opt),
    },
    QuestionTemplate {
        id: "multiplayer",
        label: "Multiplayer",
        matches: match_multiplayer,
    },
    QuestionTemplate {
        id: "rating",
        label: "Age Rating",
        matches: match_rating,
    },
    QuestionTemplate {
        id: "style",
        label: "Visual Style",
        matches: |e, opt| contains_ci(&e.visual_style, opt),
    },
    QuestionTemplate {
        id: "theme",
        label: "Theme",
        matches: match_theme,
    },
];

pub fn find(id: &str) -> Option<&'static QuestionTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

pub fn list() -> Vec<TemplateInfo> {
    TEMPLATES
        .iter()
        .map(|t| TemplateInfo {
            id: t.id,
            label: t.label,
        })
        .collect()
}

/// Case-insensitive substring. Blank haystacks never match.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    let haystack = haystack.trim();
    !haystack.is_empty() && haystack.to_lowercase().contains(&needle.trim().to_lowercase())
}

fn any_contains(values: &[String], needle: &str) -> bool {
    values.iter().any(|v| contains_ci(v, needle))
}

fn match_platform(entry: &CatalogEntry, option: &str) -> bool {
    match option.trim().to_lowercase().as_str() {
        "multi-platform" | "multiplatform" => entry.platforms.len() >= 3,
        _ => any_contains(&entry.platforms, option),
    }
}

fn match_genre(entry: &CatalogEntry, option: &str) -> bool {
    contains_ci(&entry.primary_genre, option) || any_contains(&entry.sub_genres, option)
}

fn match_multiplayer(entry: &CatalogEntry, option: &str) -> bool {
    match option.trim().to_lowercase().as_str() {
        "single-player" | "singleplayer" => !entry.multiplayer && !entry.co_op,
        "online multiplayer" => entry.multiplayer,
        "local co-op" | "local coop" => entry.co_op,
        _ => false,
    }
}

/// Minimum ages named in a free-form rating such as "PEGI 16+" or "USK 12"
fn rating_ages(age_rating: &str) -> Vec<u32> {
    age_rating
        .split(|c: char| !c.is_ascii_digit())
        .filter_map(|token| token.parse().ok())
        .collect()
}

fn match_rating(entry: &CatalogEntry, option: &str) -> bool {
    let esrb = entry.esrb.trim().to_lowercase();
    let ages = rating_ages(&entry.age_rating);
    let esrb_is = |codes: &[&str]| codes.contains(&esrb.as_str());
    let age_in = |range: std::ops::RangeInclusive<u32>| ages.iter().any(|a| range.contains(a));

    match option.trim().to_lowercase().as_str() {
        "everyone" => esrb_is(&["e", "e10+", "everyone", "everyone 10+"]) || age_in(0..=10),
        "teen" => esrb_is(&["t", "teen"]) || age_in(11..=15),
        "mature" => esrb_is(&["m", "mature", "ao", "adults only"]) || age_in(16..=21),
        _ => false,
    }
}

fn match_theme(entry: &CatalogEntry, option: &str) -> bool {
    contains_ci(&entry.world_setting, option) || any_contains(&entry.major_themes, option)
}
