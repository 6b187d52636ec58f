//! Procedural terrain manager: owns the grid store, carves the starting room,
//! and grows the frontier as blocks are mined out.

pub mod change;
pub mod hollow;

use std::sync::atomic::{AtomicU64, Ordering};

use change::GridChange;
use hollow::Hollow;

use crate::mining::block::{Block, BlockRequest, MineStep, UnitId};
use crate::mining::ordering::UnitOrdering;
use crate::mining::unit::{SubUnit, UnitHit};
use crate::world::archetype::ArchetypeId;
use crate::world::position::{Cell, GridMapping, WorldPos};
use crate::world::{BlockKey, GridStore};

static NEXT_MANAGER_ID: AtomicU64 = AtomicU64::new(1);

/// Registration handle a block holds for the manager that spawned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ManagerId(u64);

impl ManagerId {
    /// Allocate a process-unique id.
    pub fn next() -> Self {
        Self(NEXT_MANAGER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Builds the sub-units of a freshly spawned block.
pub trait BlockFactory {
    fn build(&self, archetype: ArchetypeId) -> Vec<SubUnit>;
}

impl<F> BlockFactory for F
where
    F: Fn(ArchetypeId) -> Vec<SubUnit>,
{
    fn build(&self, archetype: ArchetypeId) -> Vec<SubUnit> {
        self(archetype)
    }
}

/// Static settings of a [`ProceduralManager`].
#[derive(Debug, Clone, PartialEq)]
pub struct ManagerConfig {
    /// Standard terrain, used for walls and general expansion.
    pub ore: ArchetypeId,
    /// Structural terrain, used on the floor and ceiling layers.
    pub ceiling_floor: ArchetypeId,
    /// Hollow extents in cells: X, Y (height), Z.
    pub hollow: [u32; 3],
    /// World point the hollow is anchored near.
    pub spawn_hint: WorldPos,
    /// Edge length of one cell. Clamped to a small epsilon if not positive.
    pub cell_size: f64,
    pub ordering: UnitOrdering,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            ore: ArchetypeId(1),
            ceiling_floor: ArchetypeId(2),
            hollow: [8, 3, 8],
            spawn_hint: WorldPos::default(),
            cell_size: 1.0,
            ordering: UnitOrdering::default(),
        }
    }
}

/// What one [`ProceduralManager::mine_next`] call did.
#[derive(Debug, Clone, PartialEq)]
pub enum MineOutcome {
    /// The key does not name a live block.
    NoBlock,
    /// The block had nothing left to mine.
    Idle { cell: Cell },
    /// A hit landed; the block is still standing.
    Hit { cell: Cell, unit: UnitId, hit: UnitHit },
    /// The block was depleted, its neighbors expanded and the cell retired.
    Cleared {
        cell: Cell,
        unit: UnitId,
        hit: UnitHit,
        spawned: usize,
    },
    /// The block was depleted but could not reach a manager; it stays in
    /// place, inert.
    Stuck { cell: Cell, unit: UnitId, hit: UnitHit },
}

/// Owns the grid and is the only thing that spawns or removes blocks.
///
/// Single mutator: every mutating call takes `&mut self` and runs to
/// completion, so no caller can observe a half-applied cascade.
pub struct ProceduralManager {
    id: ManagerId,
    config: ManagerConfig,
    mapping: GridMapping,
    hollow: Hollow,
    store: GridStore,
    factory: Box<dyn BlockFactory>,
    carved: bool,
    changes: Vec<GridChange>,
}

impl ProceduralManager {
    pub fn new(config: ManagerConfig, factory: impl BlockFactory + 'static) -> Self {
        let mapping = GridMapping::new(config.cell_size);
        let hollow = Hollow::anchored(config.spawn_hint, config.hollow, &mapping);
        Self {
            id: ManagerId::next(),
            config,
            mapping,
            hollow,
            store: GridStore::new(),
            factory: Box::new(factory),
            carved: false,
            changes: Vec::new(),
        }
    }

    pub fn id(&self) -> ManagerId {
        self.id
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn mapping(&self) -> &GridMapping {
        &self.mapping
    }

    pub fn hollow(&self) -> &Hollow {
        &self.hollow
    }

    /// Read-only view of the grid.
    pub fn store(&self) -> &GridStore {
        &self.store
    }

    /// Where the player should be placed for the carved room.
    pub fn spawn_point(&self) -> WorldPos {
        self.hollow.spawn_point(&self.mapping)
    }

    // ── Coordinate mapping ──────────────────────────────────────────────

    pub fn world_to_grid(&self, pos: WorldPos) -> Cell {
        self.mapping.world_to_grid(pos)
    }

    pub fn grid_to_world(&self, cell: Cell) -> WorldPos {
        self.mapping.grid_to_world(cell)
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.store.is_occupied(cell)
    }

    pub fn is_mined(&self, cell: Cell) -> bool {
        self.store.is_mined(cell)
    }

    pub fn block_at(&self, cell: Cell) -> Option<&Block> {
        self.store.block_at(cell)
    }

    pub fn key_at(&self, cell: Cell) -> Option<BlockKey> {
        self.store.key_at(cell)
    }

    pub fn block(&self, key: BlockKey) -> Option<&Block> {
        self.store.get(key)
    }

    // ── Initial room ────────────────────────────────────────────────────

    /// Spawn the floor, walls and ceiling around the hollow. Only the first
    /// call does anything. Returns the number of blocks spawned.
    pub fn carve_initial_room(&mut self) -> usize {
        if self.carved {
            tracing::warn!("Initial room already carved, ignoring");
            return 0;
        }
        self.carved = true;

        let mut spawned = 0;
        for (cell, part) in self.hollow.shell() {
            let archetype = match part {
                hollow::ShellPart::Floor | hollow::ShellPart::Ceiling => self.config.ceiling_floor,
                hollow::ShellPart::Wall => self.config.ore,
            };
            if self.spawn_block_at(cell, archetype).is_some() {
                spawned += 1;
            }
        }

        tracing::info!(
            "Carved initial room: hollow {:?}..={:?}, {} blocks",
            self.hollow.min,
            self.hollow.max(),
            spawned
        );
        spawned
    }

    // ── Spawning and removal ────────────────────────────────────────────

    /// Spawn a block of `archetype` at `cell`.
    ///
    /// No-op (returns `None`) if the cell is occupied or already mined.
    pub fn spawn_block_at(&mut self, cell: Cell, archetype: ArchetypeId) -> Option<BlockKey> {
        if self.store.is_occupied(cell) {
            tracing::trace!("Spawn at {:?} skipped: occupied", cell);
            return None;
        }
        if self.store.is_mined(cell) {
            tracing::trace!("Spawn at {:?} skipped: already mined", cell);
            return None;
        }

        let mut block = Block::new(archetype, self.factory.build(archetype))
            .with_ordering(self.config.ordering);
        block.set_position(self.mapping.grid_to_world(cell));
        block.register(self.id);

        let key = self.store.insert(cell, block)?;
        self.changes.push(GridChange::Spawned { cell, archetype });
        tracing::debug!("Spawned {:?} at {:?}", archetype, cell);
        Some(key)
    }

    /// Remove a block and retire its cell into the mined set. Stale keys are
    /// ignored.
    pub fn remove_block(&mut self, key: BlockKey) {
        let Some((cell, block)) = self.store.remove(key) else {
            return;
        };
        self.changes.push(GridChange::Removed {
            cell,
            archetype: block.archetype(),
        });
        tracing::debug!("Removed block at {:?}", cell);
    }

    /// Spawn every eligible axis neighbor of the block's cell. Occupied,
    /// mined and hollow cells are skipped. Returns the number spawned.
    pub fn spawn_neighbors(&mut self, key: BlockKey) -> usize {
        let Some(block) = self.store.get(key) else {
            return 0;
        };
        let origin = block.cell();

        let mut spawned = 0;
        for n in origin.neighbors() {
            if self.store.is_occupied(n) || self.store.is_mined(n) || self.hollow.contains(n) {
                continue;
            }
            let archetype = if self.hollow.is_boundary_layer(n.y) {
                self.config.ceiling_floor
            } else {
                self.config.ore
            };
            if self.spawn_block_at(n, archetype).is_some() {
                spawned += 1;
            }
        }

        tracing::trace!("Expanded {} neighbors around {:?}", spawned, origin);
        spawned
    }

    // ── Mining ──────────────────────────────────────────────────────────

    /// Mine the block behind `key` once.
    ///
    /// The block lands one hit on its next sub-unit; if that depletes it, the
    /// requests it issues are applied in order (expansion, then removal), so
    /// the cell is vacated only after its neighbors exist.
    pub fn mine_next(&mut self, key: BlockKey) -> MineOutcome {
        let Some(block) = self.store.get_mut(key) else {
            return MineOutcome::NoBlock;
        };
        let cell = block.cell();

        match block.mine_next() {
            MineStep::Idle => MineOutcome::Idle { cell },
            MineStep::Hit { unit, hit } => MineOutcome::Hit { cell, unit, hit },
            MineStep::Depleted { unit, hit, requests } => {
                if requests.is_empty() {
                    return MineOutcome::Stuck { cell, unit, hit };
                }
                let mut spawned = 0;
                for request in requests {
                    spawned += self.apply(key, request);
                }
                if self.store.get(key).is_some() {
                    return MineOutcome::Stuck { cell, unit, hit };
                }
                MineOutcome::Cleared {
                    cell,
                    unit,
                    hit,
                    spawned,
                }
            }
        }
    }

    /// Mine the block at `cell`, if any.
    pub fn mine_at(&mut self, cell: Cell) -> MineOutcome {
        match self.store.key_at(cell) {
            Some(key) => self.mine_next(key),
            None => MineOutcome::NoBlock,
        }
    }

    fn apply(&mut self, key: BlockKey, request: BlockRequest) -> usize {
        let target = match request {
            BlockRequest::SpawnNeighbors { manager } | BlockRequest::RemoveSelf { manager } => manager,
        };
        if target != self.id {
            tracing::warn!("Ignoring {:?} addressed to another manager", request);
            return 0;
        }
        match request {
            BlockRequest::SpawnNeighbors { .. } => self.spawn_neighbors(key),
            BlockRequest::RemoveSelf { .. } => {
                self.remove_block(key);
                0
            }
        }
    }

    // ── Change log ──────────────────────────────────────────────────────

    /// Drain and return every spawn/removal since the last call.
    ///
    /// The log is unbounded: it holds one entry per spawn or removal until
    /// drained, so callers are expected to take it after each mining step.
    pub fn take_changes(&mut self) -> Vec<GridChange> {
        std::mem::take(&mut self.changes)
    }

    /// Number of changes [`take_changes`](Self::take_changes) would return.
    pub fn pending_changes(&self) -> usize {
        self.changes.len()
    }
}
