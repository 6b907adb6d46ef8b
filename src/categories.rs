//! Category registry and data cleaning.
//!
//! Every revealable attribute is declared once in [`REGISTRY`] together with
//! the rule that pulls it out of a [`CatalogEntry`]. Raw catalog data is noisy
//! (placeholders like "N/A", duplicated tags, store boilerplate), so every
//! value goes through the cleaning helpers below before it is considered
//! present.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;

use crate::random::RandomSource;
use crate::types::{CatalogEntry, RevealValue};

/// Default cap for list-valued categories
const LIST_CAP: usize = 10;

/// Values that mean "no data"
const PLACEHOLDERS: &[&str] = &[
    "null", "n/a", "n/a.", "n\\a", "na", "unknown", "unk", "tbd", "-", "?", "other", "not set",
];

/// Tags that nearly every entry carries, compared case-insensitively
const GENERIC_TAGS: &[&str] = &["singleplayer", "single-player", "co-op", "steam achievements"];

/// Substrings marking store boilerplate tags
const GENERIC_TAG_FRAGMENTS: &[&str] = &["controller support", "steam cloud", "trading cards"];

/// How a category reads its value out of an entry
#[derive(Clone, Copy)]
pub enum Extractor {
    Text(fn(&CatalogEntry) -> &str),
    List(fn(&CatalogEntry) -> &[String], usize),
    /// Absent when <= 0
    Number(fn(&CatalogEntry) -> i64),
    /// Always present, `false` is meaningful
    Flag(fn(&CatalogEntry) -> bool),
}

#[derive(Clone, Copy)]
pub struct Category {
    pub key: &'static str,
    pub extractor: Extractor,
}

macro_rules! text {
    ($key:literal, $field:ident) => {
        Category {
            key: $key,
            extractor: Extractor::Text(|e| e.$field.as_str()),
        }
    };
}

macro_rules! list {
    ($key:literal, $field:ident) => {
        list!($key, $field, LIST_CAP)
    };
    ($key:literal, $field:ident, $cap:expr) => {
        Category {
            key: $key,
            extractor: Extractor::List(|e| e.$field.as_slice(), $cap),
        }
    };
}

macro_rules! number {
    ($key:literal, $field:ident) => {
        Category {
            key: $key,
            extractor: Extractor::Number(|e| e.$field),
        }
    };
}

macro_rules! flag {
    ($key:literal, $field:ident) => {
        Category {
            key: $key,
            extractor: Extractor::Flag(|e| e.$field),
        }
    };
}

/// All revealable categories, in declaration order
pub static REGISTRY: &[Category] = &[
    text!("primary_genre", primary_genre),
    list!("sub_genres", sub_genres),
    list!("platforms", platforms),
    text!("series", series),
    list!("tags", tags, 8),
    text!("protagonist_type", protagonist_type),
    text!("protagonist_identity", protagonist_identity),
    text!("protagonist_gender", protagonist_gender),
    text!("protagonist_role", protagonist_role),
    text!("world_type", world_type),
    text!("world_setting", world_setting),
    text!("world_origin", world_origin),
    text!("time_period", time_period),
    text!("environment_type", environment_type),
    text!("world_tone", world_tone),
    text!("story_presence", story_presence),
    text!("story_structure", story_structure),
    list!("story_themes", story_themes),
    text!("dialogue_type", dialogue_type),
    text!("choices_impact", choices_impact),
    text!("narrative_perspective", narrative_perspective),
    text!("combat_style", combat_style),
    text!("combat_pacing", combat_pacing),
    text!("combat_complexity", combat_complexity),
    text!("movement_type", movement_type),
    list!("enemy_types", enemy_types),
    text!("camera_view", camera_view),
    text!("camera_behavior", camera_behavior),
    text!("visual_style", visual_style),
    text!("color_palette", color_palette),
    text!("game_structure", game_structure),
    text!("progression_type", progression_type),
    text!("crafting_system", crafting_system),
    text!("loot_system", loot_system),
    text!("economic_system", economic_system),
    text!("puzzle_presence", puzzle_presence),
    flag!("multiplayer", multiplayer),
    flag!("co_op", co_op),
    text!("multiplayer_presence", multiplayer_presence),
    text!("multiplayer_type", multiplayer_type),
    text!("online_requirement", online_requirement),
    text!("coop_scale", coop_scale),
    text!("pvp_scale", pvp_scale),
    text!("overall_tone", overall_tone),
    text!("player_emotion", player_emotion),
    list!("vibe_tags", vibe_tags, 8),
    text!("difficulty_style", difficulty_style),
    text!("challenge_type", challenge_type),
    text!("average_playtime", average_playtime),
    number!("playtime", playtime),
    text!("pace", pace),
    text!("immersion_type", immersion_type),
    text!("reward_style", reward_style),
    text!("esrb", esrb),
    text!("age_rating", age_rating),
    text!("violence_level", violence_level),
    text!("maturity_level", maturity_level),
    number!("metacritic", metacritic),
    list!("major_themes", major_themes),
    list!("special_mechanics", special_mechanics),
    list!("iconic_features", iconic_features),
    list!("world_features", world_features),
    list!("developers", developers, 5),
    list!("publishers", publishers, 5),
    number!("year", year),
];

/// Look up a declared category by key
pub fn find(key: &str) -> Option<&'static Category> {
    REGISTRY.iter().find(|c| c.key == key)
}

fn is_placeholder(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    PLACEHOLDERS.contains(&lower.as_str())
}

fn is_generic_tag(value: &str) -> bool {
    let lower = value.to_lowercase();
    GENERIC_TAGS.contains(&lower.as_str())
        || GENERIC_TAG_FRAGMENTS.iter().any(|f| lower.contains(f))
}

/// Trimmed value, or `None` for empty strings and placeholders
pub fn clean_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || is_placeholder(trimmed) {
        return None;
    }
    Some(trimmed.to_string())
}

/// Clean every element, drop generic tags, de-duplicate case-insensitively
/// keeping first-seen order, and cap the length. `None` if nothing survives.
pub fn clean_list(values: &[String], cap: usize) -> Option<Vec<String>> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for value in values {
        if out.len() >= cap {
            break;
        }
        let Some(cleaned) = clean_text(value) else {
            continue;
        };
        if is_generic_tag(&cleaned) {
            continue;
        }
        if seen.insert(cleaned.to_lowercase()) {
            out.push(cleaned);
        }
    }

    (!out.is_empty()).then_some(out)
}

fn extract_with(entry: &CatalogEntry, category: &Category) -> Option<RevealValue> {
    match category.extractor {
        Extractor::Text(get) => clean_text(get(entry)).map(RevealValue::Text),
        Extractor::List(get, cap) => clean_list(get(entry), cap).map(RevealValue::List),
        Extractor::Number(get) => {
            let n = get(entry);
            (n > 0).then_some(RevealValue::Number(n))
        }
        Extractor::Flag(get) => Some(RevealValue::Flag(get(entry))),
    }
}

/// Cleaned value of `key` for `entry`, or `None` when the entry has no
/// meaningful data (or the key is not a declared category)
pub fn extract(entry: &CatalogEntry, key: &str) -> Option<RevealValue> {
    find(key).and_then(|category| extract_with(entry, category))
}

pub fn has_value(entry: &CatalogEntry, key: &str) -> bool {
    match find(key) {
        Some(Category {
            extractor: Extractor::Flag(_),
            ..
        }) => true,
        Some(category) => extract_with(entry, category).is_some(),
        None => false,
    }
}

/// Unused categories that carry data for `entry`, shuffled and truncated to
/// `offer_size`. An empty result means the reveal pool is exhausted.
pub fn available_categories<S>(
    entry: &CatalogEntry,
    used: &HashSet<S>,
    offer_size: usize,
    rng: &dyn RandomSource,
) -> Vec<&'static str>
where
    S: Borrow<str> + Hash + Eq,
{
    let mut positions: Vec<usize> = REGISTRY
        .iter()
        .enumerate()
        .filter(|(_, c)| !used.contains(c.key))
        .filter(|(_, c)| has_value(entry, c.key))
        .map(|(pos, _)| pos)
        .collect();

    rng.shuffle(&mut positions);
    positions.truncate(offer_size);
    positions.into_iter().map(|pos| REGISTRY[pos].key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::StdRandom;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_registry_keys_unique() {
        let keys: HashSet<&str> = REGISTRY.iter().map(|c| c.key).collect();
        assert_eq!(keys.len(), REGISTRY.len());
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  Fantasy "), Some("Fantasy".to_string()));
        assert_eq!(clean_text(""), None);
        assert_eq!(clean_text("   "), None);
        assert_eq!(clean_text("N/A"), None);
        assert_eq!(clean_text(" Unknown "), None);
        assert_eq!(clean_text("NOT SET"), None);
        assert_eq!(clean_text("?"), None);
        assert_eq!(clean_text("Other"), None);
    }

    #[test]
    fn test_clean_list_dedup_and_order() {
        let cleaned = clean_list(
            &strings(&["RPG", " rpg", "Action", "null", "", "ACTION", "Puzzle"]),
            10,
        );
        assert_eq!(cleaned, Some(strings(&["RPG", "Action", "Puzzle"])));
    }

    #[test]
    fn test_clean_list_drops_generic_tags() {
        let cleaned = clean_list(
            &strings(&[
                "Singleplayer",
                "Steam Achievements",
                "Full controller support",
                "Steam Cloud",
                "Steam Trading Cards",
                "co-op",
                "Metroidvania",
            ]),
            10,
        );
        assert_eq!(cleaned, Some(strings(&["Metroidvania"])));
    }

    #[test]
    fn test_clean_list_cap_and_empty() {
        let many: Vec<String> = (0..20).map(|i| format!("tag {i}")).collect();
        assert_eq!(clean_list(&many, 5).map(|v| v.len()), Some(5));
        assert_eq!(clean_list(&strings(&["n/a", "-"]), 5), None);
        assert_eq!(clean_list(&[], 5), None);
    }

    #[test]
    fn test_clean_list_is_idempotent() {
        let once = clean_list(&strings(&[" Roguelike ", "roguelike", "TBD", "Deckbuilder"]), 10)
            .unwrap();
        let twice = clean_list(&once, 10).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_extract_shapes() {
        let entry = CatalogEntry {
            id: 1,
            name: "Hollow Knight".to_string(),
            primary_genre: " Metroidvania ".to_string(),
            platforms: strings(&["PC", "Switch", "pc"]),
            year: 2017,
            metacritic: 0,
            multiplayer: false,
            ..Default::default()
        };

        assert_eq!(
            extract(&entry, "primary_genre"),
            Some(RevealValue::Text("Metroidvania".to_string()))
        );
        assert_eq!(
            extract(&entry, "platforms"),
            Some(RevealValue::List(strings(&["PC", "Switch"])))
        );
        assert_eq!(extract(&entry, "year"), Some(RevealValue::Number(2017)));
        assert_eq!(extract(&entry, "metacritic"), None);
        assert_eq!(extract(&entry, "multiplayer"), Some(RevealValue::Flag(false)));
        assert_eq!(extract(&entry, "series"), None);
        assert_eq!(extract(&entry, "not_a_category"), None);
    }

    #[test]
    fn test_has_value_matches_extract() {
        let entry = CatalogEntry {
            id: 1,
            name: "Sparse".to_string(),
            series: "N/A".to_string(),
            tags: strings(&["Steam Cloud"]),
            playtime: -3,
            world_type: "Open world".to_string(),
            ..Default::default()
        };

        for category in REGISTRY {
            let present = extract(&entry, category.key).is_some();
            assert_eq!(has_value(&entry, category.key), present, "{}", category.key);
        }
        assert!(has_value(&entry, "co_op"));
        assert!(!has_value(&entry, "series"));
        assert!(!has_value(&entry, "tags"));
        assert!(!has_value(&entry, "playtime"));
        assert!(has_value(&entry, "world_type"));
    }

    #[test]
    fn test_available_categories_respects_used_and_data() {
        let entry = CatalogEntry {
            id: 1,
            name: "Celeste".to_string(),
            primary_genre: "Platformer".to_string(),
            year: 2018,
            series: "unknown".to_string(),
            ..Default::default()
        };
        let rng = StdRandom::seeded(5);

        let used: HashSet<String> = HashSet::new();
        let mut offered = available_categories(&entry, &used, 10, &rng);
        offered.sort_unstable();
        assert_eq!(offered, vec!["co_op", "multiplayer", "primary_genre", "year"]);

        let used: HashSet<String> = ["year".to_string(), "co_op".to_string()].into();
        let offered = available_categories(&entry, &used, 10, &rng);
        assert_eq!(offered.len(), 2);
        assert!(!offered.contains(&"year"));
        assert!(!offered.contains(&"co_op"));
    }

    #[test]
    fn test_available_categories_caps_offer() {
        let entry = CatalogEntry {
            id: 1,
            name: "Rich".to_string(),
            primary_genre: "RPG".to_string(),
            series: "Saga".to_string(),
            world_type: "Open world".to_string(),
            camera_view: "Third person".to_string(),
            year: 2020,
            ..Default::default()
        };
        let rng = StdRandom::seeded(11);
        let used: HashSet<String> = HashSet::new();

        for _ in 0..50 {
            let offered = available_categories(&entry, &used, 3, &rng);
            assert_eq!(offered.len(), 3);
            let distinct: HashSet<_> = offered.iter().collect();
            assert_eq!(distinct.len(), 3);
        }
    }

    #[test]
    fn test_available_categories_exhausted() {
        let entry = CatalogEntry::default();
        let used: HashSet<&str> = ["multiplayer", "co_op"].into();
        let offered = available_categories(&entry, &used, 3, &StdRandom::seeded(1));
        assert!(offered.is_empty());
    }
}
