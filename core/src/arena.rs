//! Geometry of the diamond-shaped arena shared by both players.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Number of cells along each axis of the arena bounding square.
pub const ARENA_SIZE: u32 = 28;

/// Number of rows owned by each player.
pub const HALF_ARENA: u32 = ARENA_SIZE / 2;

/// Location of a single arena cell expressed as `x` and `y` coordinates.
///
/// Cells order row-major: by `y` first, then by `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    x: u32,
    y: u32,
}

impl Cell {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Vertical coordinate of the cell. Row zero is the friendly back line.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Reports whether the cell lies inside the diamond arena.
    #[must_use]
    pub const fn in_arena(&self) -> bool {
        if self.y >= ARENA_SIZE {
            return false;
        }

        let (low, high) = row_span(self.y);
        self.x >= low && self.x <= high
    }

    /// Reports whether the cell lies inside the friendly triangular half.
    #[must_use]
    pub const fn in_friendly_half(&self) -> bool {
        self.y < HALF_ARENA && self.in_arena()
    }

    /// Reports whether the cell lies inside the opponent's triangular half.
    #[must_use]
    pub const fn in_opponent_half(&self) -> bool {
        self.y >= HALF_ARENA && self.in_arena()
    }

    /// Squared Euclidean distance between two cells.
    #[must_use]
    pub fn distance_squared(self, other: Cell) -> u64 {
        let dx = u64::from(self.x.abs_diff(other.x));
        let dy = u64::from(self.y.abs_diff(other.y));
        dx * dx + dy * dy
    }

    /// In-arena cells sharing a side with this cell, in north, east, south,
    /// west order.
    pub fn neighbors(self) -> impl Iterator<Item = Cell> {
        let candidates = [
            self.y.checked_add(1).map(|y| Cell::new(self.x, y)),
            self.x.checked_add(1).map(|x| Cell::new(x, self.y)),
            self.y.checked_sub(1).map(|y| Cell::new(self.x, y)),
            self.x.checked_sub(1).map(|x| Cell::new(x, self.y)),
        ];

        candidates
            .into_iter()
            .flatten()
            .filter(|cell| cell.in_arena())
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Inclusive range of valid `x` coordinates for the provided row.
const fn row_span(y: u32) -> (u32, u32) {
    if y < HALF_ARENA {
        (HALF_ARENA - 1 - y, HALF_ARENA + y)
    } else {
        (y - HALF_ARENA, ARENA_SIZE + HALF_ARENA - 1 - y)
    }
}

/// Enumerates every cell of the friendly half in row-major order.
pub fn friendly_region() -> impl Iterator<Item = Cell> {
    (0..HALF_ARENA).flat_map(|y| {
        let (low, high) = row_span(y);
        (low..=high).map(move |x| Cell::new(x, y))
    })
}

/// Enumerates every cell of the arena in row-major order.
pub fn arena_cells() -> impl Iterator<Item = Cell> {
    (0..ARENA_SIZE).flat_map(|y| {
        let (low, high) = row_span(y);
        (low..=high).map(move |x| Cell::new(x, y))
    })
}

/// Diagonal boundaries of the arena from which mobile units launch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    /// Opponent boundary running from the top corner toward the right corner.
    TopRight,
    /// Opponent boundary running from the top corner toward the left corner.
    TopLeft,
    /// Friendly boundary running from the bottom corner toward the left corner.
    BottomLeft,
    /// Friendly boundary running from the bottom corner toward the right corner.
    BottomRight,
}

impl Edge {
    /// Every edge in a stable order.
    pub const ALL: [Edge; 4] = [
        Edge::TopRight,
        Edge::TopLeft,
        Edge::BottomLeft,
        Edge::BottomRight,
    ];

    /// Edges the friendly player launches mobile units from.
    pub const FRIENDLY: [Edge; 2] = [Edge::BottomLeft, Edge::BottomRight];

    /// Edges the opponent launches mobile units from.
    pub const OPPONENT: [Edge; 2] = [Edge::TopLeft, Edge::TopRight];

    /// Cells composing the edge, ordered from the centre line outward.
    #[must_use]
    pub fn cells(self) -> Vec<Cell> {
        (0..HALF_ARENA)
            .map(|n| match self {
                Self::TopRight => Cell::new(HALF_ARENA + n, ARENA_SIZE - 1 - n),
                Self::TopLeft => Cell::new(HALF_ARENA - 1 - n, ARENA_SIZE - 1 - n),
                Self::BottomLeft => Cell::new(HALF_ARENA - 1 - n, n),
                Self::BottomRight => Cell::new(HALF_ARENA + n, n),
            })
            .collect()
    }

    /// Reports whether the cell lies on this edge.
    #[must_use]
    pub const fn contains(self, cell: Cell) -> bool {
        let (x, y) = (cell.x, cell.y);
        match self {
            Self::TopRight => y >= HALF_ARENA && y < ARENA_SIZE && x + y == 41,
            Self::TopLeft => y >= HALF_ARENA && y < ARENA_SIZE && y == x + HALF_ARENA,
            Self::BottomLeft => y < HALF_ARENA && x + y == HALF_ARENA - 1,
            Self::BottomRight => y < HALF_ARENA && x == y + HALF_ARENA,
        }
    }

    /// Edge the cell lies on, if any.
    #[must_use]
    pub fn of(cell: Cell) -> Option<Self> {
        Self::ALL.into_iter().find(|edge| edge.contains(cell))
    }

    /// Progress of a cell toward this edge, where larger is closer.
    ///
    /// Used to pick the deepest reachable cell when the edge itself cannot be
    /// reached.
    #[must_use]
    pub const fn depth_of(self, cell: Cell) -> u32 {
        match self {
            Self::TopRight | Self::TopLeft => cell.y,
            Self::BottomLeft | Self::BottomRight => ARENA_SIZE - 1 - cell.y,
        }
    }
}

/// Launch cells available to opponent mobile units, left edge first.
#[must_use]
pub fn opponent_launch_cells() -> Vec<Cell> {
    let mut cells = Edge::TopLeft.cells();
    cells.sort_by_key(|cell| cell.x());
    let mut right = Edge::TopRight.cells();
    cells.append(&mut right);
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn friendly_region_spans_triangle() {
        let cells: Vec<Cell> = friendly_region().collect();
        assert_eq!(cells.len(), 210);
        assert_eq!(cells.first(), Some(&Cell::new(13, 0)));
        assert_eq!(cells.last(), Some(&Cell::new(27, 13)));
        assert!(cells.iter().all(Cell::in_friendly_half));
    }

    #[test]
    fn arena_is_mirrored_diamond() {
        assert_eq!(arena_cells().count(), 420);
        assert!(Cell::new(0, 13).in_arena());
        assert!(Cell::new(0, 14).in_arena());
        assert!(!Cell::new(0, 12).in_arena());
        assert!(!Cell::new(12, 0).in_arena());
        assert!(Cell::new(13, 27).in_opponent_half());
    }

    #[test]
    fn edges_contain_their_cells() {
        for edge in Edge::ALL {
            let cells = edge.cells();
            assert_eq!(cells.len(), 14);
            for cell in cells {
                assert!(cell.in_arena(), "{cell:?} outside arena");
                assert_eq!(Edge::of(cell), Some(edge));
            }
        }
    }

    #[test]
    fn opponent_launch_cells_follow_left_then_right_edge() {
        let cells = opponent_launch_cells();
        assert_eq!(cells.len(), 28);
        assert_eq!(cells[0], Cell::new(0, 14));
        assert_eq!(cells[13], Cell::new(13, 27));
        assert_eq!(cells[14], Cell::new(14, 27));
        assert_eq!(cells[27], Cell::new(27, 14));
    }

    #[test]
    fn cells_order_row_major() {
        assert!(Cell::new(20, 0) < Cell::new(13, 1));
        assert!(Cell::new(13, 1) < Cell::new(14, 1));
    }

    #[test]
    fn neighbors_stay_inside_arena() {
        let corner: Vec<Cell> = Cell::new(13, 0).neighbors().collect();
        assert_eq!(corner, vec![Cell::new(13, 1), Cell::new(14, 0)]);
    }
}
