use std::{fs, path::Path};

use afk_spot_core::{AttackRule, Command, DEFAULT_TILE_COUNT};
use anyhow::{Context, Result};
use serde::Deserialize;

/// User-facing settings mirroring the host configuration panel.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    /// Number of top tiles to highlight.
    #[serde(alias = "numberOfTiles")]
    pub(crate) number_of_tiles: usize,
    /// Delimiter-separated entity names; empty accepts every attackable entity.
    #[serde(alias = "npcNames", alias = "npcName")]
    pub(crate) npc_names: String,
    /// Rule deciding which action labels count as attack options.
    #[serde(alias = "attackRule")]
    pub(crate) attack_rule: AttackRule,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            number_of_tiles: DEFAULT_TILE_COUNT,
            npc_names: String::new(),
            attack_rule: AttackRule::default(),
        }
    }
}

/// Errors raised while reading settings.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    /// The settings document is not valid TOML for [`Settings`].
    #[error("could not parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    /// The settings requested zero tiles.
    #[error("number_of_tiles must be at least 1")]
    ZeroTiles,
}

impl Settings {
    /// Parses and validates settings from TOML text.
    pub(crate) fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(contents)?;
        settings.validated()
    }

    /// Reads settings from the file at the provided path.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings at {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid settings in {}", path.display()))
    }

    pub(crate) fn validated(self) -> Result<Self, ConfigError> {
        if self.number_of_tiles == 0 {
            return Err(ConfigError::ZeroTiles);
        }
        Ok(self)
    }

    /// Commands that bring a fresh world in line with these settings.
    pub(crate) fn commands(&self) -> Vec<Command> {
        vec![
            Command::ConfigureTileCount {
                count: self.number_of_tiles,
            },
            Command::ConfigureAttackRule {
                rule: self.attack_rule,
            },
            Command::ConfigureNameFilter {
                raw: self.npc_names.clone(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use afk_spot_core::AttackRule;

    use super::{ConfigError, Settings};

    #[test]
    fn empty_document_uses_defaults() {
        let settings = Settings::from_toml_str("").expect("defaults are valid");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.number_of_tiles, 3);
        assert!(settings.npc_names.is_empty());
        assert_eq!(settings.attack_rule, AttackRule::Exact);
    }

    #[test]
    fn host_key_names_are_accepted() {
        let settings = Settings::from_toml_str(
            "numberOfTiles = 5\nnpcNames = \"goblin; cow\"\nattackRule = \"substring\"\n",
        )
        .expect("valid settings");
        assert_eq!(settings.number_of_tiles, 5);
        assert_eq!(settings.npc_names, "goblin; cow");
        assert_eq!(settings.attack_rule, AttackRule::Substring);
    }

    #[test]
    fn legacy_single_name_key_is_accepted() {
        let settings = Settings::from_toml_str("npcName = \"Goblin\"").expect("valid settings");
        assert_eq!(settings.npc_names, "Goblin");
    }

    #[test]
    fn zero_tiles_are_rejected() {
        let error = Settings::from_toml_str("number_of_tiles = 0").expect_err("zero is invalid");
        assert!(matches!(error, ConfigError::ZeroTiles));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = Settings::from_toml_str("tiles = 2").expect_err("unknown key");
        assert!(matches!(error, ConfigError::Parse(_)));
    }
}
