//! Breadth-first route planner used by the reference arena.

use std::collections::VecDeque;

use breach_planner_core::{Cell, Edge, ARENA_SIZE};

const UNREACHED: u16 = u16::MAX;

/// Dense breadth-first distance field over the arena bounding square.
///
/// Distances are measured in steps from the seed cell. Cells outside the
/// diamond or blocked by stationary units keep `u16::MAX`.
#[derive(Clone, Debug, Default)]
pub(crate) struct NavigationField {
    distances: Vec<u16>,
}

impl NavigationField {
    /// Rebuilds the field with a breadth-first search from `seed`.
    pub(crate) fn rebuild_with<F>(&mut self, seed: Cell, mut is_blocked: F)
    where
        F: FnMut(Cell) -> bool,
    {
        let cell_count = (ARENA_SIZE * ARENA_SIZE) as usize;
        if self.distances.len() != cell_count {
            self.distances = vec![UNREACHED; cell_count];
        } else {
            self.distances.fill(UNREACHED);
        }

        if !seed.in_arena() || is_blocked(seed) {
            return;
        }

        let Some(seed_index) = index(seed) else {
            return;
        };
        self.distances[seed_index] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(seed);

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = index(cell) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);
            if next_distance == UNREACHED {
                continue;
            }

            for neighbor in cell.neighbors() {
                if is_blocked(neighbor) {
                    continue;
                }

                let Some(neighbor_index) = index(neighbor) else {
                    continue;
                };

                if self.distances[neighbor_index] <= next_distance {
                    continue;
                }

                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Distance captured for the provided cell, if it was reached.
    #[must_use]
    pub(crate) fn distance(&self, cell: Cell) -> Option<u16> {
        index(cell)
            .and_then(|offset| self.distances.get(offset).copied())
            .filter(|distance| *distance != UNREACHED)
    }

    /// Picks the destination a unit heading for `target` settles on.
    ///
    /// The closest reachable cell of the target edge wins. When the edge is
    /// cut off, the reachable cell deepest toward it is chosen, preferring
    /// the one closest to the start.
    #[must_use]
    pub(crate) fn destination(&self, target: Edge) -> Option<Cell> {
        let edge_cell = target
            .cells()
            .into_iter()
            .filter_map(|cell| self.distance(cell).map(|distance| (distance, cell)))
            .min();
        if let Some((_, cell)) = edge_cell {
            return Some(cell);
        }

        breach_planner_core::arena_cells()
            .filter_map(|cell| self.distance(cell).map(|distance| (cell, distance)))
            .max_by(|(left, left_distance), (right, right_distance)| {
                target
                    .depth_of(*left)
                    .cmp(&target.depth_of(*right))
                    .then(right_distance.cmp(left_distance))
                    .then(right.cmp(left))
            })
            .map(|(cell, _)| cell)
    }

    /// Walks the field backwards from `destination` to the seed.
    ///
    /// The returned route starts at the seed and ends at `destination`.
    #[must_use]
    pub(crate) fn route_to(&self, destination: Cell) -> Vec<Cell> {
        let Some(mut remaining) = self.distance(destination) else {
            return Vec::new();
        };

        let mut route = Vec::with_capacity(usize::from(remaining) + 1);
        let mut cursor = destination;
        route.push(cursor);

        while remaining > 0 {
            let previous = cursor
                .neighbors()
                .find(|neighbor| self.distance(*neighbor) == Some(remaining - 1));
            let Some(previous) = previous else {
                break;
            };
            cursor = previous;
            remaining -= 1;
            route.push(cursor);
        }

        route.reverse();
        route
    }
}

fn index(cell: Cell) -> Option<usize> {
    if cell.x() >= ARENA_SIZE || cell.y() >= ARENA_SIZE {
        return None;
    }

    let x = usize::try_from(cell.x()).ok()?;
    let y = usize::try_from(cell.y()).ok()?;
    let width = usize::try_from(ARENA_SIZE).ok()?;
    y.checked_mul(width)?.checked_add(x)
}
