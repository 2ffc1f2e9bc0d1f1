#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects the most densely occupied cells.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

use afk_spot_core::{CellKey, Event, OccupancyView, Plane, SelectionError, TopTile};

/// Returns the `n` cells with the greatest occupancy, best first.
///
/// Candidates are ranked by occupancy and then by the smaller [`CellKey`], so
/// ties at the admission boundary always resolve to the same cells regardless
/// of map iteration order. Only `n` candidates are held at any time.
pub fn select_top_n(view: OccupancyView<'_>, n: usize) -> Result<Vec<TopTile>, SelectionError> {
    if n == 0 {
        return Err(SelectionError::ZeroCount);
    }

    let mut heap: BinaryHeap<Reverse<Rank>> = BinaryHeap::with_capacity(n.min(view.len()));
    for (cell, occupancy) in view.iter() {
        let rank = Rank { occupancy, cell };
        if heap.len() < n {
            heap.push(Reverse(rank));
            continue;
        }

        if let Some(mut weakest) = heap.peek_mut() {
            if rank > weakest.0 {
                *weakest = Reverse(rank);
            }
        }
    }

    Ok(heap
        .into_sorted_vec()
        .into_iter()
        .map(|Reverse(rank)| TopTile {
            cell: rank.cell,
            occupancy: rank.occupancy,
        })
        .collect())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Rank {
    occupancy: usize,
    cell: CellKey,
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.occupancy
            .cmp(&other.occupancy)
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Keeps the latest top tile selection in step with world events.
#[derive(Debug, Default)]
pub struct TopTiles {
    latest: Vec<TopTile>,
}

impl TopTiles {
    /// Creates a new system with an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently published selection, best first.
    #[must_use]
    pub fn latest(&self) -> &[TopTile] {
        &self.latest
    }

    /// Selected tiles that lie on the provided plane.
    pub fn visible_on(&self, plane: Plane) -> impl Iterator<Item = &TopTile> {
        self.latest
            .iter()
            .filter(move |tile| tile.cell.plane() == plane.get())
    }

    /// Consumes world events and recomputes the selection when occupancy changed.
    ///
    /// Returns `Ok(true)` when a new selection was published. Ticks that added
    /// no new occupant leave the previous selection untouched.
    pub fn handle(
        &mut self,
        events: &[Event],
        view: OccupancyView<'_>,
        count: usize,
    ) -> Result<bool, SelectionError> {
        let stale = events.iter().any(|event| {
            matches!(
                event,
                Event::OccupancyCleared { .. }
                    | Event::OccupancyRecorded { changed: true, .. }
                    | Event::TileCountChanged { .. }
            )
        });
        if !stale {
            return Ok(false);
        }

        self.latest = select_top_n(view, count)?;
        Ok(true)
    }
}
