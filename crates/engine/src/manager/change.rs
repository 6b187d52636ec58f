use crate::world::archetype::ArchetypeId;
use crate::world::position::Cell;

/// One change to the set of occupied cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridChange {
    /// A block of `archetype` now occupies `cell`.
    Spawned { cell: Cell, archetype: ArchetypeId },
    /// The block at `cell` was mined out; the cell is retired.
    Removed { cell: Cell, archetype: ArchetypeId },
}

impl GridChange {
    pub fn cell(&self) -> Cell {
        match self {
            GridChange::Spawned { cell, .. } | GridChange::Removed { cell, .. } => *cell,
        }
    }
}
