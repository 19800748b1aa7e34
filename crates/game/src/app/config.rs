use engine::{LoopConfig, Stage};
use tracing::warn;

const START_STAGE_ENV_VAR: &str = "EXPLORER_START_STAGE";
const PLAYER_SPEED_ENV_VAR: &str = "EXPLORER_PLAYER_SPEED";
const FULLSCREEN_ENV_VAR: &str = "EXPLORER_FULLSCREEN";

const WINDOW_TITLE: &str = "The Lonely Explorer";

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GameConfig {
    pub(crate) start_stage: Stage,
    pub(crate) player_speed: f32,
    pub(crate) map_scale: f32,
    pub(crate) player_name: String,
    pub(crate) map_file: String,
    pub(crate) atlas_file: String,
    pub(crate) story_file: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_stage: Stage::MainMenu,
            player_speed: 4.0,
            map_scale: 1.5,
            player_name: "RX-7".to_string(),
            map_file: "map.json".to_string(),
            atlas_file: "tileset.png".to_string(),
            story_file: "story.json".to_string(),
        }
    }
}

impl GameConfig {
    pub(crate) fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Applies overrides from `lookup`; values that do not parse are logged and ignored.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup(START_STAGE_ENV_VAR) {
            match Stage::parse(&raw) {
                Some(stage @ (Stage::MainMenu | Stage::Scene | Stage::Game)) => {
                    config.start_stage = stage;
                }
                _ => warn!(
                    var = START_STAGE_ENV_VAR,
                    value = raw.as_str(),
                    fallback = %config.start_stage,
                    "invalid_env_override"
                ),
            }
        }
        if let Some(raw) = lookup(PLAYER_SPEED_ENV_VAR) {
            match raw.trim().parse::<f32>() {
                Ok(speed) if speed.is_finite() && speed > 0.0 => config.player_speed = speed,
                _ => warn!(
                    var = PLAYER_SPEED_ENV_VAR,
                    value = raw.as_str(),
                    fallback = config.player_speed,
                    "invalid_env_override"
                ),
            }
        }
        config
    }
}

pub(crate) fn loop_config_from_env() -> LoopConfig {
    loop_config_from_lookup(|name| std::env::var(name).ok())
}

pub(crate) fn loop_config_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> LoopConfig {
    let mut config = LoopConfig {
        window_title: WINDOW_TITLE.to_string(),
        ..LoopConfig::default()
    };
    if let Some(raw) = lookup(FULLSCREEN_ENV_VAR) {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" => config.fullscreen = true,
            "0" | "false" | "" => config.fullscreen = false,
            _ => warn!(
                var = FULLSCREEN_ENV_VAR,
                value = raw.as_str(),
                fallback = config.fullscreen,
                "invalid_env_override"
            ),
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| values.get(name).cloned()
    }

    #[test]
    fn defaults_without_overrides() {
        let config = GameConfig::from_lookup(|_| None);
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.start_stage, Stage::MainMenu);
        assert_eq!(config.player_speed, 4.0);
        assert_eq!(config.map_scale, 1.5);
    }

    #[test]
    fn valid_overrides_apply() {
        let config = GameConfig::from_lookup(lookup_from(&[
            (START_STAGE_ENV_VAR, "game"),
            (PLAYER_SPEED_ENV_VAR, " 6.5 "),
        ]));
        assert_eq!(config.start_stage, Stage::Game);
        assert_eq!(config.player_speed, 6.5);
    }

    #[test]
    fn invalid_overrides_fall_back() {
        let config = GameConfig::from_lookup(lookup_from(&[
            (START_STAGE_ENV_VAR, "dialog"),
            (PLAYER_SPEED_ENV_VAR, "-3"),
        ]));
        assert_eq!(config.start_stage, Stage::MainMenu);
        assert_eq!(config.player_speed, 4.0);
    }

    #[test]
    fn fullscreen_flag_parses() {
        assert!(loop_config_from_lookup(lookup_from(&[(FULLSCREEN_ENV_VAR, "TRUE")])).fullscreen);
        assert!(!loop_config_from_lookup(lookup_from(&[(FULLSCREEN_ENV_VAR, "maybe")])).fullscreen);
        let config = loop_config_from_lookup(|_| None);
        assert!(!config.fullscreen);
        assert_eq!(config.window_title, WINDOW_TITLE);
    }
}
