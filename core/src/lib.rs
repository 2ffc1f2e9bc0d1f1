#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the AFK spot engine.
//!
//! This crate defines the message surface that connects the host adapter, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams and query
//! immutable views such as [`OccupancyView`].

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Number of top tiles reported when the host does not configure a count.
pub const DEFAULT_TILE_COUNT: usize = 3;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Sets how many top tiles downstream selection should report.
    ConfigureTileCount {
        /// Requested number of tiles. Zero is rejected by the world.
        count: usize,
    },
    /// Replaces the active name filter with one parsed from the raw string.
    ConfigureNameFilter {
        /// Delimiter-separated list of entity names.
        raw: String,
    },
    /// Selects the rule used to decide whether an action label grants attack.
    ConfigureAttackRule {
        /// Rule that becomes active.
        rule: AttackRule,
    },
    /// Reports a change in the host session state.
    ChangeSession {
        /// Session state reported by the host.
        state: SessionState,
    },
    /// Aggregates one host tick worth of entity occupancy.
    Tick {
        /// Plane the local player currently stands on.
        plane: Plane,
        /// Region the local player currently stands in.
        region: RegionId,
        /// Entities observed by the host during this tick.
        entities: EntityView,
    },
    /// Tears the engine down to its startup state.
    Shutdown,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that every accumulated occupancy entry was discarded.
    OccupancyCleared {
        /// Transition that triggered the clear.
        reason: ClearReason,
    },
    /// Confirms that a tick was aggregated into the tracker.
    OccupancyRecorded {
        /// Sequence number of the aggregated tick.
        tick: u64,
        /// Reports whether at least one cell gained a new occupant.
        changed: bool,
    },
    /// Confirms that the name filter was rebuilt from configuration.
    FilterRebuilt {
        /// Number of distinct names in the rebuilt filter.
        names: usize,
    },
    /// Confirms that the requested tile count changed.
    TileCountChanged {
        /// Tile count that became active.
        count: usize,
    },
    /// Reports that a tile count request was rejected.
    TileCountRejected {
        /// Count provided in the rejected request.
        count: usize,
    },
}

/// Context transitions that reset the observation window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClearReason {
    /// The session transitioned into a fresh login.
    Login,
    /// The local player entered a different region.
    RegionChanged,
    /// The local player moved to a different plane.
    PlaneChanged,
    /// The configured name filter changed.
    FilterChanged,
    /// The attack eligibility rule changed.
    RuleChanged,
    /// The engine was shut down.
    Shutdown,
}

/// Session states reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No session is active.
    #[default]
    LoggedOut,
    /// The host is loading a scene; ticks are not aggregated.
    Loading,
    /// A session is active and ticks are aggregated.
    LoggedIn,
}

/// Plane or layer index of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Plane(i32);

impl Plane {
    /// Creates a new plane index.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric plane index.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }
}

/// Identifier of the region the local player occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(u32);

impl RegionId {
    /// Creates a new region identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric region identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of an entity, stable within the host's snapshot array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell on a plane.
///
/// Keys order lexicographically by `x`, then `y`, then `plane`. Selection
/// relies on this ordering to break occupancy ties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey {
    x: i32,
    y: i32,
    plane: i32,
}

impl CellKey {
    /// Creates a new cell key.
    #[must_use]
    pub const fn new(x: i32, y: i32, plane: i32) -> Self {
        Self { x, y, plane }
    }

    /// Horizontal grid coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical grid coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Plane the cell belongs to.
    #[must_use]
    pub const fn plane(&self) -> i32 {
        self.plane
    }
}

/// Rectangular footprint anchored at its south-west cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent {
    origin: CellKey,
    width: u32,
    height: u32,
}

impl Extent {
    /// Constructs an extent from an origin cell and dimensions.
    #[must_use]
    pub const fn new(origin: CellKey, width: u32, height: u32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Constructs a one-by-one extent covering a single cell.
    #[must_use]
    pub const fn single(cell: CellKey) -> Self {
        Self::new(cell, 1, 1)
    }

    /// Cell that anchors the extent.
    #[must_use]
    pub const fn origin(&self) -> CellKey {
        self.origin
    }

    /// Width of the extent in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the extent in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Iterates every cell covered by the extent, column by column, so cells
    /// come out in ascending [`CellKey`] order.
    ///
    /// A zero width or height covers no cells. Offsets that would overflow the
    /// coordinate space are skipped.
    pub fn cells(&self) -> impl Iterator<Item = CellKey> {
        let origin = self.origin;
        let height = self.height;
        (0..self.width).flat_map(move |dx| {
            (0..height).filter_map(move |dy| {
                let x = i32::try_from(dx).ok()?.checked_add(origin.x())?;
                let y = i32::try_from(dy).ok()?.checked_add(origin.y())?;
                Some(CellKey::new(x, y, origin.plane()))
            })
        })
    }
}

/// Known capability tags an entity may expose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Capability {
    /// The entity can be attacked.
    Attack,
    /// The entity can be spoken to.
    TalkTo,
    /// The entity can be examined.
    Examine,
    /// The entity can be pickpocketed.
    Pickpocket,
}

/// Rule deciding which action labels grant [`Capability::Attack`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackRule {
    /// Only the exact label `Attack` grants the capability.
    #[default]
    Exact,
    /// Any label containing `attack`, ignoring case, grants the capability.
    ///
    /// This also admits labels such as `Cannot Attack`.
    Substring,
}

impl AttackRule {
    /// Reports whether the provided action label grants the attack capability.
    #[must_use]
    pub fn grants_attack(self, label: &str) -> bool {
        match self {
            Self::Exact => label == "Attack",
            Self::Substring => label.to_lowercase().contains("attack"),
        }
    }
}

/// Host-provided definition describing what an entity can do.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    actions: Vec<String>,
}

impl Composition {
    /// Creates a composition from raw action labels.
    #[must_use]
    pub fn new(actions: Vec<String>) -> Self {
        Self { actions }
    }

    /// Raw action labels as supplied by the host.
    #[must_use]
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    /// Resolves the raw action labels into known capability tags.
    ///
    /// Labels that match no known tag are ignored.
    #[must_use]
    pub fn capabilities(&self, rule: AttackRule) -> BTreeSet<Capability> {
        self.actions
            .iter()
            .filter_map(|label| {
                if rule.grants_attack(label) {
                    return Some(Capability::Attack);
                }
                match label.as_str() {
                    "Talk-to" => Some(Capability::TalkTo),
                    "Examine" => Some(Capability::Examine),
                    "Pickpocket" => Some(Capability::Pickpocket),
                    _ => None,
                }
            })
            .collect()
    }
}

/// Immutable representation of a single entity observed during a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntitySnapshot {
    /// Identifier of the entity within the host snapshot.
    pub id: EntityId,
    /// Cells covered by the entity, if the host resolved a location.
    pub footprint: Option<Extent>,
    /// Indicates whether the entity is alive.
    pub alive: bool,
    /// Display name of the entity, if any.
    pub name: Option<String>,
    /// Definition exposing the entity's actions, if any.
    pub composition: Option<Composition>,
}

/// Read-only snapshot describing all entities observed during a tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntityView {
    snapshots: Vec<EntitySnapshot>,
}

impl EntityView {
    /// Creates a new entity view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EntitySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Read-only view into the accumulated occupancy map.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyView<'a> {
    cells: &'a HashMap<CellKey, HashSet<EntityId>>,
}

impl<'a> OccupancyView<'a> {
    /// Captures a new occupancy view backed by the provided map.
    #[must_use]
    pub fn new(cells: &'a HashMap<CellKey, HashSet<EntityId>>) -> Self {
        Self { cells }
    }

    /// Number of distinct entities recorded against the cell.
    #[must_use]
    pub fn occupancy(&self, cell: CellKey) -> usize {
        self.cells.get(&cell).map_or(0, HashSet::len)
    }

    /// Iterates every occupied cell alongside its occupancy count.
    pub fn iter(&self) -> impl Iterator<Item = (CellKey, usize)> + 'a {
        self.cells.iter().map(|(cell, ids)| (*cell, ids.len()))
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether no cell is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Coarse density bucket used for presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// A single occupant, or none.
    Low,
    /// Exactly two occupants.
    Medium,
    /// Three or more occupants.
    High,
}

impl Severity {
    /// Maps an occupancy count to its severity bucket.
    #[must_use]
    pub const fn classify(count: usize) -> Self {
        match count {
            0 | 1 => Self::Low,
            2 => Self::Medium,
            _ => Self::High,
        }
    }

    /// Colour the presentation layer paints for this severity.
    #[must_use]
    pub const fn color(self) -> TileColor {
        match self {
            Self::Low => TileColor::from_rgb(0x00, 0xff, 0x00),
            Self::Medium => TileColor::from_rgb(0xff, 0xff, 0x00),
            Self::High => TileColor::from_rgb(0xff, 0x00, 0x00),
        }
    }
}

/// Colour applied to a highlighted tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl TileColor {
    /// Creates a new tile color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Cell selected as one of the most densely occupied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopTile {
    /// Cell that was selected.
    pub cell: CellKey,
    /// Number of distinct entities recorded against the cell.
    pub occupancy: usize,
}

impl TopTile {
    /// Severity bucket of the tile's occupancy.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        Severity::classify(self.occupancy)
    }
}

/// Reasons a top tile selection request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum SelectionError {
    /// The caller requested zero tiles.
    #[error("tile count must be at least 1")]
    ZeroCount,
}
