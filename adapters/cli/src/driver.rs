use std::sync::mpsc::{self, Receiver, Sender};

use afk_spot_core::{Command, EntityView, Event, Plane, RegionId, SelectionError, TopTile};
use afk_spot_system_top_tiles::TopTiles;
use afk_spot_world::{self as world, query, World};

/// Handle used by other threads to request world mutations.
///
/// Commands are queued and applied by the owning [`Driver`] before its next
/// tick, never inline on the sending thread.
#[derive(Clone, Debug)]
pub(crate) struct CommandSender {
    inner: Sender<Command>,
}

/// Errors raised while forwarding commands to the driver.
#[derive(Debug, thiserror::Error)]
pub(crate) enum DriverError {
    /// The driver that owned the queue was dropped.
    #[error("driver is no longer accepting commands")]
    Disconnected,
}

impl CommandSender {
    /// Queues a command for the driver's execution context.
    pub(crate) fn send(&self, command: Command) -> Result<(), DriverError> {
        self.inner
            .send(command)
            .map_err(|_| DriverError::Disconnected)
    }
}

/// Owns the world and serializes every mutation onto a single context.
#[derive(Debug)]
pub(crate) struct Driver {
    world: World,
    top_tiles: TopTiles,
    inbox: Receiver<Command>,
    sender: Sender<Command>,
    events: Vec<Event>,
}

impl Driver {
    /// Creates a driver around a fresh world.
    pub(crate) fn new() -> Self {
        let (sender, inbox) = mpsc::channel();
        Self {
            world: World::new(),
            top_tiles: TopTiles::new(),
            inbox,
            sender,
            events: Vec::new(),
        }
    }

    /// Returns a handle that queues commands for this driver.
    pub(crate) fn sender(&self) -> CommandSender {
        CommandSender {
            inner: self.sender.clone(),
        }
    }

    /// Applies queued commands without aggregating a tick.
    ///
    /// Returns `true` when the top tile selection was republished.
    pub(crate) fn pump(&mut self) -> Result<bool, SelectionError> {
        self.drain();
        self.publish()
    }

    /// Applies queued commands and then aggregates one tick.
    ///
    /// Returns `true` when the top tile selection was republished.
    pub(crate) fn tick(
        &mut self,
        plane: Plane,
        region: RegionId,
        entities: EntityView,
    ) -> Result<bool, SelectionError> {
        self.drain();
        world::apply(
            &mut self.world,
            Command::Tick {
                plane,
                region,
                entities,
            },
            &mut self.events,
        );
        self.publish()
    }

    /// Latest top tiles that lie on the player's current plane.
    pub(crate) fn visible_tiles(&self) -> Vec<TopTile> {
        match query::current_plane(&self.world) {
            Some(plane) => self.top_tiles.visible_on(plane).copied().collect(),
            None => self.top_tiles.latest().to_vec(),
        }
    }

    /// Sequence number of the most recently aggregated tick.
    pub(crate) fn tick_index(&self) -> u64 {
        query::tick_index(&self.world)
    }

    fn drain(&mut self) {
        while let Ok(command) = self.inbox.try_recv() {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    fn publish(&mut self) -> Result<bool, SelectionError> {
        let published = self.top_tiles.handle(
            &self.events,
            query::occupancy_view(&self.world),
            query::tile_count(&self.world),
        );
        self.events.clear();
        published
    }
}
