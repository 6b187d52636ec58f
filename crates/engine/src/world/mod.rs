pub mod archetype;
pub mod position;

use std::collections::{HashMap, HashSet};

use position::Cell;
use slotmap::{SlotMap, new_key_type};

use crate::mining::block::Block;

new_key_type! {
    /// Handle to a spawned block. Stays valid until the block is removed.
    pub struct BlockKey;
}

/// Occupancy map from cell to block, plus the permanent mined set.
///
/// Blocks live in a slot-map arena; the occupancy map only stores keys.
/// Invariant: a cell is in at most one of `occupancy` and `mined`, and every
/// key in `occupancy` resolves to a live block whose cell is that key.
pub struct GridStore {
    blocks: SlotMap<BlockKey, Block>,
    occupancy: HashMap<Cell, BlockKey>,
    /// Cells that have been mined out. Never shrinks.
    mined: HashSet<Cell>,
}

impl GridStore {
    pub fn new() -> Self {
        Self {
            blocks: SlotMap::with_key(),
            occupancy: HashMap::new(),
            mined: HashSet::new(),
        }
    }

    /// Store a block at `cell`. Returns `None` (and drops the block) if the
    /// cell is occupied or already mined.
    pub fn insert(&mut self, cell: Cell, mut block: Block) -> Option<BlockKey> {
        if self.occupancy.contains_key(&cell) || self.mined.contains(&cell) {
            return None;
        }
        block.set_cell(cell);
        let key = self.blocks.insert(block);
        self.occupancy.insert(cell, key);
        Some(key)
    }

    /// Remove a block, retiring its cell into the mined set.
    /// Returns the vacated cell and the block, or `None` for a stale key.
    pub fn remove(&mut self, key: BlockKey) -> Option<(Cell, Block)> {
        let block = self.blocks.remove(key)?;
        let cell = block.cell();
        self.occupancy.remove(&cell);
        self.mined.insert(cell);
        Some((cell, block))
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.occupancy.contains_key(&cell)
    }

    pub fn is_mined(&self, cell: Cell) -> bool {
        self.mined.contains(&cell)
    }

    pub fn key_at(&self, cell: Cell) -> Option<BlockKey> {
        self.occupancy.get(&cell).copied()
    }

    pub fn block_at(&self, cell: Cell) -> Option<&Block> {
        self.key_at(cell).and_then(|key| self.blocks.get(key))
    }

    pub fn get(&self, key: BlockKey) -> Option<&Block> {
        self.blocks.get(key)
    }

    pub fn get_mut(&mut self, key: BlockKey) -> Option<&mut Block> {
        self.blocks.get_mut(key)
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.occupancy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupancy.is_empty()
    }

    pub fn mined_count(&self) -> usize {
        self.mined.len()
    }

    /// Iterate over all spawned blocks (unordered).
    pub fn iter(&self) -> impl Iterator<Item = (BlockKey, &Block)> {
        self.blocks.iter()
    }

    /// All occupied cells, sorted so output is reproducible.
    pub fn occupied_cells(&self) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self.occupancy.keys().copied().collect();
        cells.sort();
        cells
    }
}

impl Default for GridStore {
    fn default() -> Self {
        Self::new()
    }
}
