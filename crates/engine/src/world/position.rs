use std::ops::Add;

/// Smallest cell size the mapping accepts. Anything at or below zero is
/// clamped up to this.
pub const MIN_CELL_SIZE: f64 = 1e-4;

/// Offset of a cell's reference point from its lattice corner, in cells.
/// Cells are anchored at their vertical center.
pub const CELL_OFFSET: [f64; 3] = [0.0, 0.5, 0.0];

/// Integer lattice coordinate of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Cell {
    pub const ORIGIN: Cell = Cell::new(0, 0, 0);

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The six axis-aligned neighbors, in expansion order:
    /// -X, +X, +Z, -Z, +Y, -Y.
    pub const fn neighbors(&self) -> [Cell; 6] {
        [
            self.offset(-1, 0, 0),
            self.offset(1, 0, 0),
            self.offset(0, 0, 1),
            self.offset(0, 0, -1),
            self.offset(0, 1, 0),
            self.offset(0, -1, 0),
        ]
    }
}

impl Add for Cell {
    type Output = Cell;

    fn add(self, rhs: Cell) -> Cell {
        self.offset(rhs.x, rhs.y, rhs.z)
    }
}

/// A point in continuous world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldPos {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorldPos {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Conversion between lattice cells and world space.
///
/// `world = (cell + CELL_OFFSET) * cell_size`; the inverse rounds to the
/// nearest cell. Every placement and every occupancy probe goes through the
/// same mapping, so a spawn and a later probe of the same point always agree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMapping {
    cell_size: f64,
}

impl GridMapping {
    /// Build a mapping. Non-positive (or non-finite) sizes clamp to
    /// [`MIN_CELL_SIZE`].
    pub fn new(cell_size: f64) -> Self {
        let clamped = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size.max(MIN_CELL_SIZE)
        } else {
            tracing::warn!(
                "Cell size {} is not positive, clamping to {}",
                cell_size,
                MIN_CELL_SIZE
            );
            MIN_CELL_SIZE
        };
        Self { cell_size: clamped }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn grid_to_world(&self, cell: Cell) -> WorldPos {
        WorldPos::new(
            (cell.x as f64 + CELL_OFFSET[0]) * self.cell_size,
            (cell.y as f64 + CELL_OFFSET[1]) * self.cell_size,
            (cell.z as f64 + CELL_OFFSET[2]) * self.cell_size,
        )
    }

    pub fn world_to_grid(&self, pos: WorldPos) -> Cell {
        Cell::new(
            (pos.x / self.cell_size - CELL_OFFSET[0]).round() as i32,
            (pos.y / self.cell_size - CELL_OFFSET[1]).round() as i32,
            (pos.z / self.cell_size - CELL_OFFSET[2]).round() as i32,
        )
    }
}

impl Default for GridMapping {
    fn default() -> Self {
        Self::new(1.0)
    }
}
