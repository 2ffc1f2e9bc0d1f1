#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative occupancy state management for the AFK spot engine.
//!
//! All mutations flow through [`apply`], so a single caller owns the
//! observation window at any time. Hosts that receive configuration changes
//! on another thread must forward them as [`Command`] values to the context
//! that owns the [`World`].

mod context;
mod occupancy;

use afk_spot_core::{AttackRule, ClearReason, Command, Event, SessionState, DEFAULT_TILE_COUNT};
use afk_spot_system_entity_filter::{parse_filters, EntityFilter, FilterSet};
use tracing::{debug, info, trace, warn};

use crate::{context::ContextGuard, occupancy::OccupancyTracker};

/// Represents the authoritative AFK spot state.
#[derive(Debug)]
pub struct World {
    occupancy: OccupancyTracker,
    guard: ContextGuard,
    filters: FilterSet,
    rule: AttackRule,
    tile_count: usize,
    tick_index: u64,
}

impl World {
    /// Creates a new world with an empty observation window.
    #[must_use]
    pub fn new() -> Self {
        Self {
            occupancy: OccupancyTracker::default(),
            guard: ContextGuard::default(),
            filters: FilterSet::default(),
            rule: AttackRule::default(),
            tile_count: DEFAULT_TILE_COUNT,
            tick_index: 0,
        }
    }

    fn clear(&mut self, reason: ClearReason, out_events: &mut Vec<Event>) {
        debug!(?reason, "clearing occupancy");
        self.occupancy.clear();
        out_events.push(Event::OccupancyCleared { reason });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureTileCount { count } => {
            if count == 0 {
                warn!("rejecting tile count of zero");
                out_events.push(Event::TileCountRejected { count });
            } else if count != world.tile_count {
                world.tile_count = count;
                out_events.push(Event::TileCountChanged { count });
            }
        }
        Command::ConfigureNameFilter { raw } => {
            if world.guard.observe_filter(&raw) {
                world.filters = parse_filters(&raw);
                let names = world.filters.len();
                info!(names, "rebuilt name filter");
                out_events.push(Event::FilterRebuilt { names });
                world.clear(ClearReason::FilterChanged, out_events);
            }
        }
        Command::ConfigureAttackRule { rule } => {
            if rule != world.rule {
                world.rule = rule;
                world.clear(ClearReason::RuleChanged, out_events);
            }
        }
        Command::ChangeSession { state } => {
            if world.guard.observe_session(state) {
                world.clear(ClearReason::Login, out_events);
            }
        }
        Command::Tick {
            plane,
            region,
            entities,
        } => {
            if world.guard.session() != SessionState::LoggedIn {
                return;
            }

            if let Some(reason) = world.guard.observe_location(plane, region) {
                world.clear(reason, out_events);
            }

            world.tick_index = world.tick_index.saturating_add(1);
            let filter = EntityFilter::new(&world.filters, world.rule);
            let changed = world.occupancy.record_tick(&entities, &filter);
            trace!(tick = world.tick_index, entities = entities.len(), changed, "recorded tick");
            out_events.push(Event::OccupancyRecorded {
                tick: world.tick_index,
                changed,
            });
        }
        Command::Shutdown => {
            info!("shutting down occupancy tracking");
            world.clear(ClearReason::Shutdown, out_events);
            world.guard.reset();
            world.filters = FilterSet::default();
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use afk_spot_core::{AttackRule, OccupancyView, Plane, SessionState};
    use afk_spot_system_entity_filter::FilterSet;

    use super::World;

    /// Provides a read-only view of the accumulated occupancy map.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        world.occupancy.snapshot()
    }

    /// Number of top tiles downstream selection should report.
    #[must_use]
    pub fn tile_count(world: &World) -> usize {
        world.tile_count
    }

    /// Name filter currently gating occupancy.
    #[must_use]
    pub fn filters(world: &World) -> &FilterSet {
        &world.filters
    }

    /// Attack rule currently gating occupancy.
    #[must_use]
    pub fn attack_rule(world: &World) -> AttackRule {
        world.rule
    }

    /// Last session state reported by the host.
    #[must_use]
    pub fn session(world: &World) -> SessionState {
        world.guard.session()
    }

    /// Plane of the most recently aggregated tick, if any.
    #[must_use]
    pub fn current_plane(world: &World) -> Option<Plane> {
        world.guard.plane()
    }

    /// Sequence number of the most recently aggregated tick.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
