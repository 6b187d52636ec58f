//! The per-cell mining aggregate.

use super::ordering::{Placement, UnitOrdering};
use super::unit::{SubUnit, UnitHit};
use crate::manager::ManagerId;
use crate::world::archetype::ArchetypeId;
use crate::world::position::{Cell, WorldPos};

/// A block holds at most this many sub-units (TL, TR, BL, BR).
pub const MAX_UNITS: usize = 4;

/// Index of a sub-unit slot inside its block. Slots are never compacted, so
/// an id stays meaningful after the unit in it is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitId(pub usize);

/// Something a depleted block asks of the manager it is registered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRequest {
    /// Spawn every eligible axis neighbor of the block's cell.
    SpawnNeighbors { manager: ManagerId },
    /// Remove the block and retire its cell.
    RemoveSelf { manager: ManagerId },
}

/// Result of one [`Block::mine_next`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum MineStep {
    /// Nothing mineable was left; the call changed nothing.
    Idle,
    /// One hit landed and the block still has mineable units.
    Hit { unit: UnitId, hit: UnitHit },
    /// One hit landed and it depleted the block. `requests` must be applied in
    /// order; it is empty when the block has no manager.
    Depleted {
        unit: UnitId,
        hit: UnitHit,
        requests: Vec<BlockRequest>,
    },
}

#[derive(Debug, Clone)]
struct UnitSlot {
    placement: Placement,
    unit: Option<SubUnit>,
}

/// Up to four sub-units occupying one lattice cell.
///
/// The block decides the order its units are mined in and, once the last one
/// is gone, asks its manager to expand the frontier and then to remove it.
#[derive(Debug, Clone)]
pub struct Block {
    archetype: ArchetypeId,
    cell: Cell,
    position: WorldPos,
    manager: Option<ManagerId>,
    slots: Vec<UnitSlot>,
    /// Indices into `slots`, in mining order.
    order: Vec<usize>,
    ordering: UnitOrdering,
    needs_refresh: bool,
}

impl Block {
    /// Build an unplaced, unregistered block. Units beyond [`MAX_UNITS`] are
    /// dropped with a warning.
    pub fn new(archetype: ArchetypeId, units: impl IntoIterator<Item = SubUnit>) -> Self {
        let mut block = Self {
            archetype,
            cell: Cell::ORIGIN,
            position: WorldPos::default(),
            manager: None,
            slots: Vec::with_capacity(MAX_UNITS),
            order: Vec::with_capacity(MAX_UNITS),
            ordering: UnitOrdering::default(),
            needs_refresh: true,
        };
        for unit in units {
            block.attach_unit(unit);
        }
        block.refresh_units_if_needed();
        block
    }

    pub fn with_ordering(mut self, ordering: UnitOrdering) -> Self {
        self.set_ordering(ordering);
        self
    }

    pub fn set_ordering(&mut self, ordering: UnitOrdering) {
        if self.ordering != ordering {
            self.ordering = ordering;
            self.needs_refresh = true;
        }
    }

    /// Add a sub-unit. Returns its id, or `None` if the block is full.
    pub fn attach_unit(&mut self, unit: SubUnit) -> Option<UnitId> {
        if self.slots.len() >= MAX_UNITS {
            tracing::warn!(
                "Block {:?} already holds {} units, dropping extra unit",
                self.archetype,
                MAX_UNITS
            );
            return None;
        }
        self.slots.push(UnitSlot {
            placement: unit.placement(),
            unit: Some(unit),
        });
        self.needs_refresh = true;
        Some(UnitId(self.slots.len() - 1))
    }

    /// Recompute the mining order if the unit set or strategy changed.
    ///
    /// The order covers every declared slot, including emptied ones, so
    /// destroying a unit never reshuffles the rest.
    pub fn refresh_units_if_needed(&mut self) {
        if !self.needs_refresh {
            return;
        }
        let placements: Vec<Placement> = self.slots.iter().map(|s| s.placement).collect();
        self.order = self.ordering.order(&placements);
        self.needs_refresh = false;
    }

    pub fn archetype(&self) -> ArchetypeId {
        self.archetype
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn position(&self) -> WorldPos {
        self.position
    }

    pub fn manager(&self) -> Option<ManagerId> {
        self.manager
    }

    pub fn ordering(&self) -> UnitOrdering {
        self.ordering
    }

    pub(crate) fn set_cell(&mut self, cell: Cell) {
        self.cell = cell;
    }

    pub(crate) fn set_position(&mut self, position: WorldPos) {
        self.position = position;
    }

    pub(crate) fn register(&mut self, manager: ManagerId) {
        self.manager = Some(manager);
    }

    pub fn unit(&self, id: UnitId) -> Option<&SubUnit> {
        self.slots.get(id.0).and_then(|s| s.unit.as_ref())
    }

    /// Slots in mining order. Emptied slots yield `None`.
    pub fn ordered_units(&self) -> impl Iterator<Item = (UnitId, Option<&SubUnit>)> + '_ {
        self.order
            .iter()
            .map(|&i| (UnitId(i), self.slots[i].unit.as_ref()))
    }

    /// The unit the next [`Block::mine_next`] call will hit.
    pub fn next_unit(&self) -> Option<UnitId> {
        self.ordered_units()
            .find(|(_, u)| u.is_some_and(SubUnit::is_mineable))
            .map(|(id, _)| id)
    }

    pub fn is_mineable(&self) -> bool {
        self.slots
            .iter()
            .any(|s| s.unit.as_ref().is_some_and(SubUnit::is_mineable))
    }

    /// Hits still needed to deplete the whole block.
    pub fn remaining_hits(&self) -> u32 {
        self.slots
            .iter()
            .filter_map(|s| s.unit.as_ref())
            .map(SubUnit::remaining_hits)
            .sum()
    }

    pub fn live_units(&self) -> usize {
        self.slots.iter().filter(|s| s.unit.is_some()).count()
    }

    /// Mine the next sub-unit in order.
    ///
    /// Lands exactly one hit. If that leaves nothing mineable the block is
    /// terminal and asks its manager to spawn neighbors, then to remove it.
    pub fn mine_next(&mut self) -> MineStep {
        self.refresh_units_if_needed();

        let Some(id) = self.next_unit() else {
            return MineStep::Idle;
        };
        let Some(unit) = self.slots[id.0].unit.as_mut() else {
            return MineStep::Idle;
        };

        let hit = unit.mine();
        if matches!(hit, UnitHit::Destroyed { .. }) {
            self.notify_unit_destroyed(id);
        }

        if self.is_mineable() {
            return MineStep::Hit { unit: id, hit };
        }

        let requests = match self.manager {
            Some(manager) => vec![
                BlockRequest::SpawnNeighbors { manager },
                BlockRequest::RemoveSelf { manager },
            ],
            None => {
                tracing::warn!(
                    "Block at {:?} depleted with no manager assigned, leaving it in place",
                    self.cell
                );
                Vec::new()
            }
        };
        MineStep::Depleted {
            unit: id,
            hit,
            requests,
        }
    }

    /// Empty the slot of a destroyed unit. Does nothing else: expansion and
    /// removal are decided by [`Block::mine_next`] alone.
    pub fn notify_unit_destroyed(&mut self, unit: UnitId) {
        if let Some(slot) = self.slots.get_mut(unit.0) {
            slot.unit = None;
        }
    }

    /// Average damage over the declared units; emptied slots count as fully
    /// damaged.
    pub fn damage_fraction(&self) -> f32 {
        if self.slots.is_empty() {
            return 1.0;
        }
        let total: f32 = self
            .slots
            .iter()
            .map(|s| s.unit.as_ref().map_or(1.0, SubUnit::damage_fraction))
            .sum();
        total / self.slots.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quadrants(required: u32) -> Vec<SubUnit> {
        vec![
            SubUnit::new(required, Some(0), 0).at(-0.25, 0.25),
            SubUnit::new(required, Some(1), 0).at(0.25, 0.25),
            SubUnit::new(required, Some(2), 0).at(-0.25, -0.25),
            SubUnit::new(required, Some(3), 0).at(0.25, -0.25),
        ]
    }

    #[test]
    fn mines_in_slot_order() {
        let mut units = quadrants(1);
        units.reverse();
        let mut block = Block::new(ArchetypeId(1), units);
        let mut slots = Vec::new();
        while let Some(id) = block.next_unit() {
            slots.push(block.unit(id).and_then(SubUnit::slot));
            block.mine_next();
        }
        assert_eq!(slots, vec![Some(0), Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn finishes_one_unit_before_the_next() {
        let mut block = Block::new(ArchetypeId(1), quadrants(2));
        assert_eq!(block.mine_next(), MineStep::Hit {
            unit: UnitId(0),
            hit: UnitHit::Damaged { hits: 1, remaining: 1 },
        });
        assert_eq!(block.mine_next(), MineStep::Hit {
            unit: UnitId(0),
            hit: UnitHit::Destroyed { rarity: 0 },
        });
        assert!(block.unit(UnitId(0)).is_none());
        assert_eq!(block.next_unit(), Some(UnitId(1)));
    }

    #[test]
    fn unregistered_block_depletes_without_requests() {
        let mut block = Block::new(ArchetypeId(1), [SubUnit::new(1, Some(0), 0)]);
        match block.mine_next() {
            MineStep::Depleted { requests, .. } => assert!(requests.is_empty()),
            other => panic!("expected depletion, got {other:?}"),
        }
        assert_eq!(block.mine_next(), MineStep::Idle);
    }

    #[test]
    fn registered_block_asks_for_expansion_before_removal() {
        let manager = ManagerId::next();
        let mut block = Block::new(ArchetypeId(1), [SubUnit::new(1, Some(0), 0)]);
        block.register(manager);
        let MineStep::Depleted { requests, .. } = block.mine_next() else {
            panic!("expected depletion");
        };
        assert_eq!(requests, vec![
            BlockRequest::SpawnNeighbors { manager },
            BlockRequest::RemoveSelf { manager },
        ]);
    }

    #[test]
    fn extra_units_are_dropped() {
        let mut units = quadrants(1);
        units.push(SubUnit::new(1, Some(0), 0));
        let block = Block::new(ArchetypeId(1), units);
        assert_eq!(block.live_units(), MAX_UNITS);
    }

    #[test]
    fn empty_block_is_idle() {
        let mut block = Block::new(ArchetypeId(1), Vec::new());
        assert!(!block.is_mineable());
        assert_eq!(block.mine_next(), MineStep::Idle);
    }

    #[test]
    fn order_survives_destroyed_slots() {
        let mut block = Block::new(ArchetypeId(1), quadrants(1));
        block.mine_next();
        block.refresh_units_if_needed();
        let order: Vec<UnitId> = block.ordered_units().map(|(id, _)| id).collect();
        assert_eq!(order, vec![UnitId(0), UnitId(1), UnitId(2), UnitId(3)]);
        assert_eq!(block.live_units(), 3);
        assert_eq!(block.damage_fraction(), 0.25);
    }
}
