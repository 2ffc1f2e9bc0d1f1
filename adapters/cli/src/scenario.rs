use std::{fs, path::Path};

use afk_spot_core::{
    CellKey, Composition, EntityId, EntitySnapshot, EntityView, Extent, Plane, RegionId,
    SessionState,
};
use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::Settings;

/// Scripted sequence of host ticks replayed through the engine.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    /// Settings applied before the first tick; command-line flags override them.
    #[serde(default)]
    pub(crate) settings: Option<Settings>,
    /// Session state reported before the first tick.
    #[serde(default = "logged_in")]
    pub(crate) initial_session: SessionState,
    /// Ticks replayed in order.
    #[serde(default)]
    pub(crate) ticks: Vec<TickScript>,
}

/// One scripted host tick.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TickScript {
    #[serde(default)]
    plane: i32,
    #[serde(default)]
    region: u32,
    /// Session change reported right before this tick.
    #[serde(default)]
    session: Option<SessionState>,
    /// Name filter change reported right before this tick.
    #[serde(default)]
    npc_names: Option<String>,
    #[serde(default)]
    entities: Vec<EntityRecord>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntityRecord {
    id: u32,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    x: Option<i32>,
    #[serde(default)]
    y: Option<i32>,
    #[serde(default = "unit_span")]
    width: u32,
    #[serde(default = "unit_span")]
    height: u32,
    #[serde(default = "alive")]
    alive: bool,
    #[serde(default)]
    actions: Option<Vec<String>>,
}

fn logged_in() -> SessionState {
    SessionState::LoggedIn
}

fn unit_span() -> u32 {
    1
}

fn alive() -> bool {
    true
}

impl Scenario {
    /// Parses a scenario from TOML text.
    pub(crate) fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse scenario toml contents")
    }

    /// Reads a scenario from the file at the provided path.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario at {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("invalid scenario {}", path.display()))
    }
}

impl TickScript {
    pub(crate) fn plane(&self) -> Plane {
        Plane::new(self.plane)
    }

    pub(crate) fn region(&self) -> RegionId {
        RegionId::new(self.region)
    }

    pub(crate) fn session(&self) -> Option<SessionState> {
        self.session
    }

    pub(crate) fn npc_names(&self) -> Option<&str> {
        self.npc_names.as_deref()
    }

    /// Builds the entity view the host would report for this tick.
    pub(crate) fn entities(&self) -> EntityView {
        EntityView::from_snapshots(
            self.entities
                .iter()
                .map(|record| record.to_snapshot(self.plane))
                .collect(),
        )
    }
}

impl EntityRecord {
    fn to_snapshot(&self, plane: i32) -> EntitySnapshot {
        let footprint = match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Extent::new(
                CellKey::new(x, y, plane),
                self.width,
                self.height,
            )),
            _ => None,
        };

        EntitySnapshot {
            id: EntityId::new(self.id),
            footprint,
            alive: self.alive,
            name: self.name.clone(),
            composition: self.actions.clone().map(Composition::new),
        }
    }
}
