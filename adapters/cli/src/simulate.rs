use afk_spot_core::{
    CellKey, Composition, EntityId, EntitySnapshot, EntityView, Extent, Plane, RegionId,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const ARENA_ORIGIN: (i32, i32) = (3200, 3200);
const ARENA_SPAN: i32 = 12;
const NAMES: [&str; 3] = ["Goblin", "Giant rat", "Cow"];
const DEATH_CHANCE: f64 = 0.05;

/// Plane the simulated crowd wanders on.
pub(crate) const SIMULATED_PLANE: Plane = Plane::new(0);
/// Region the simulated crowd wanders in.
pub(crate) const SIMULATED_REGION: RegionId = RegionId::new(12850);

#[derive(Clone, Copy, Debug)]
struct Walker {
    id: EntityId,
    name: &'static str,
    column: i32,
    row: i32,
    size: u32,
}

/// Seeded crowd of wandering entities standing in for a live host.
#[derive(Debug)]
pub(crate) struct Simulation {
    rng: ChaCha8Rng,
    walkers: Vec<Walker>,
}

impl Simulation {
    /// Spawns `entities` walkers at seeded positions.
    pub(crate) fn new(seed: u64, entities: u32) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let walkers = (0..entities)
            .map(|index| Walker {
                id: EntityId::new(index),
                name: NAMES[rng.gen_range(0..NAMES.len())],
                column: rng.gen_range(0..ARENA_SPAN),
                row: rng.gen_range(0..ARENA_SPAN),
                size: if rng.gen_bool(0.1) { 2 } else { 1 },
            })
            .collect();
        Self { rng, walkers }
    }

    /// Moves every walker by at most one cell and reports the resulting view.
    pub(crate) fn next_tick(&mut self) -> EntityView {
        let mut snapshots = Vec::with_capacity(self.walkers.len());
        for walker in &mut self.walkers {
            walker.column = (walker.column + self.rng.gen_range(-1..=1)).clamp(0, ARENA_SPAN - 1);
            walker.row = (walker.row + self.rng.gen_range(-1..=1)).clamp(0, ARENA_SPAN - 1);
            let alive = !self.rng.gen_bool(DEATH_CHANCE);

            let origin = CellKey::new(
                ARENA_ORIGIN.0 + walker.column,
                ARENA_ORIGIN.1 + walker.row,
                SIMULATED_PLANE.get(),
            );
            snapshots.push(EntitySnapshot {
                id: walker.id,
                footprint: Some(Extent::new(origin, walker.size, walker.size)),
                alive,
                name: Some(walker.name.to_owned()),
                composition: Some(Composition::new(vec![
                    "Attack".to_owned(),
                    "Examine".to_owned(),
                ])),
            });
        }
        EntityView::from_snapshots(snapshots)
    }
}
