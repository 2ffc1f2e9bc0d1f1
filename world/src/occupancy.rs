use std::collections::{HashMap, HashSet};

use afk_spot_core::{CellKey, EntityId, EntityView, OccupancyView};
use afk_spot_system_entity_filter::EntityFilter;

/// Cumulative mapping from cell to the distinct entities seen on it.
///
/// Cells are never pruned individually; the whole map is dropped on
/// [`OccupancyTracker::clear`].
#[derive(Debug, Default)]
pub(crate) struct OccupancyTracker {
    cells: HashMap<CellKey, HashSet<EntityId>>,
}

impl OccupancyTracker {
    /// Records every eligible entity against each cell of its footprint.
    ///
    /// Returns `true` when at least one cell gained an occupant it did not
    /// already hold.
    pub(crate) fn record_tick(&mut self, entities: &EntityView, filter: &EntityFilter<'_>) -> bool {
        let mut changed = false;

        for entity in entities.iter() {
            let Some(footprint) = entity.footprint else {
                continue;
            };
            if !filter.is_eligible(entity) {
                continue;
            }

            for cell in footprint.cells() {
                changed |= self.cells.entry(cell).or_default().insert(entity.id);
            }
        }

        changed
    }

    pub(crate) fn clear(&mut self) {
        self.cells.clear();
    }

    pub(crate) fn snapshot(&self) -> OccupancyView<'_> {
        OccupancyView::new(&self.cells)
    }
}
