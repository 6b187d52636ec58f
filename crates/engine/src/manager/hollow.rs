use crate::world::position::{Cell, GridMapping, WorldPos};

/// Largest hollow extent along any axis, in cells.
pub const MAX_HOLLOW_EXTENT: u32 = 1024;

/// Anchor coordinates are kept within this many cells of the origin, so the
/// shell and the frontier grown from it stay well inside the `i32` lattice.
pub const MAX_ANCHOR: i32 = 1 << 29;

/// Which layer of the starting room's shell a cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellPart {
    Floor,
    Wall,
    Ceiling,
}

/// The interior playable volume, kept empty forever.
///
/// `min` is the lowest corner; the hollow spans `size` cells along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hollow {
    pub min: Cell,
    pub size: [i32; 3],
}

impl Hollow {
    /// Anchor a hollow of `size` cells at the cell below `hint` in X/Z, with
    /// its floor layer at y = 0.
    ///
    /// Sizes clamp to `1..=MAX_HOLLOW_EXTENT` and the anchor to
    /// `±MAX_ANCHOR`; a non-finite hint anchors at 0.
    pub fn anchored(hint: WorldPos, size: [u32; 3], mapping: &GridMapping) -> Self {
        let cell_size = mapping.cell_size();
        let min = Cell::new(
            anchor_axis(hint.x / cell_size),
            0,
            anchor_axis(hint.z / cell_size),
        );
        if size.iter().any(|&s| s > MAX_HOLLOW_EXTENT) {
            tracing::warn!(
                "Hollow {:?} exceeds {} cells per axis, clamping",
                size,
                MAX_HOLLOW_EXTENT
            );
        }
        Self {
            min,
            size: size.map(|s| s.clamp(1, MAX_HOLLOW_EXTENT) as i32),
        }
    }

    /// Inclusive upper corner.
    pub fn max(&self) -> Cell {
        self.min.offset(self.size[0] - 1, self.size[1] - 1, self.size[2] - 1)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        let max = self.max();
        (self.min.x..=max.x).contains(&cell.x)
            && (self.min.y..=max.y).contains(&cell.y)
            && (self.min.z..=max.z).contains(&cell.z)
    }

    /// Y of the floor layer, one below the hollow.
    pub fn floor_y(&self) -> i32 {
        self.min.y - 1
    }

    /// Y of the ceiling layer, one above the hollow.
    pub fn ceiling_y(&self) -> i32 {
        self.min.y + self.size[1]
    }

    /// Whether cells at height `y` take the structural archetype.
    pub fn is_boundary_layer(&self, y: i32) -> bool {
        y == self.floor_y() || y == self.ceiling_y()
    }

    /// Where the player is placed: the middle of the origin column's cell in
    /// X/Z, lifted one cell height.
    pub fn spawn_point(&self, mapping: &GridMapping) -> WorldPos {
        let size = mapping.cell_size();
        WorldPos::new(
            (self.min.x as f64 + 0.5) * size,
            size,
            (self.min.z as f64 + 0.5) * size,
        )
    }

    /// Every cell of the one-cell-thick shell around the hollow, floor first,
    /// then walls bottom-up, then ceiling. Floor, ceiling and the X walls
    /// reach one cell past the footprint to cover the corners.
    pub fn shell(&self) -> Vec<(Cell, ShellPart)> {
        let min = self.min;
        let max = self.max();
        let mut cells = Vec::new();

        let slab = |y: i32, part: ShellPart, cells: &mut Vec<(Cell, ShellPart)>| {
            for x in min.x - 1..=max.x + 1 {
                for z in min.z - 1..=max.z + 1 {
                    cells.push((Cell::new(x, y, z), part));
                }
            }
        };

        slab(self.floor_y(), ShellPart::Floor, &mut cells);

        for y in min.y..=max.y {
            for z in min.z - 1..=max.z + 1 {
                cells.push((Cell::new(min.x - 1, y, z), ShellPart::Wall));
                cells.push((Cell::new(max.x + 1, y, z), ShellPart::Wall));
            }
            for x in min.x..=max.x {
                cells.push((Cell::new(x, y, min.z - 1), ShellPart::Wall));
                cells.push((Cell::new(x, y, max.z + 1), ShellPart::Wall));
            }
        }

        slab(self.ceiling_y(), ShellPart::Ceiling, &mut cells);
        cells
    }
}

fn anchor_axis(cells: f64) -> i32 {
    let cell = cells.floor();
    if !cell.is_finite() {
        tracing::warn!("Spawn hint maps to {} cells, anchoring at 0", cell);
        return 0;
    }
    let limit = MAX_ANCHOR as f64;
    if cell.abs() > limit {
        tracing::warn!("Spawn hint maps to cell {}, clamping to ±{}", cell, MAX_ANCHOR);
    }
    cell.clamp(-limit, limit) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchored_below_hint() {
        let m = GridMapping::new(2.0);
        let h = Hollow::anchored(WorldPos::new(5.0, 40.0, -1.0), [8, 3, 8], &m);
        assert_eq!(h.min, Cell::new(2, 0, -1));
        assert_eq!(h.max(), Cell::new(9, 2, 6));
    }

    #[test]
    fn boundary_layers() {
        let h = Hollow::anchored(WorldPos::default(), [4, 3, 4], &GridMapping::default());
        assert!(h.is_boundary_layer(-1));
        assert!(h.is_boundary_layer(3));
        assert!(!h.is_boundary_layer(0));
        assert!(!h.is_boundary_layer(2));
    }

    #[test]
    fn shell_has_no_duplicates_and_skips_interior() {
        let h = Hollow::anchored(WorldPos::default(), [8, 3, 8], &GridMapping::default());
        let shell = h.shell();
        assert_eq!(shell.len(), 100 + 108 + 100);
        let mut cells: Vec<Cell> = shell.iter().map(|(c, _)| *c).collect();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), shell.len());
        assert!(cells.iter().all(|c| !h.contains(*c)));
    }

    #[test]
    fn zero_size_is_clamped() {
        let h = Hollow::anchored(WorldPos::default(), [0, 0, 0], &GridMapping::default());
        assert_eq!(h.size, [1, 1, 1]);
        assert!(h.contains(Cell::ORIGIN));
    }

    #[test]
    fn far_hint_stays_on_the_lattice() {
        let m = GridMapping::new(1e-4);
        let h = Hollow::anchored(WorldPos::new(3.0e9, 0.0, -3.0e9), [8, 3, 8], &m);
        assert_eq!(h.min, Cell::new(MAX_ANCHOR, 0, -MAX_ANCHOR));
        assert_eq!(h.max(), Cell::new(MAX_ANCHOR + 7, 2, -MAX_ANCHOR + 7));
        assert_eq!(h.shell().len(), 100 + 108 + 100);

        let h = Hollow::anchored(WorldPos::new(f64::NAN, 0.0, f64::INFINITY), [2, 2, 2], &m);
        assert_eq!(h.min, Cell::ORIGIN);
    }

    #[test]
    fn huge_extent_is_capped() {
        let h = Hollow::anchored(WorldPos::default(), [u32::MAX, 3, 5000], &GridMapping::default());
        assert_eq!(h.size, [MAX_HOLLOW_EXTENT as i32, 3, MAX_HOLLOW_EXTENT as i32]);
    }
}
