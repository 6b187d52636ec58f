//! Running counters for one mining session.
//!
//! Folded from mining outcomes and the manager's change log; printed as JSON
//! at the end of a run.

use std::collections::BTreeMap;

use delve_engine::manager::MineOutcome;
use delve_engine::manager::change::GridChange;
use delve_engine::mining::unit::UnitHit;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Hits that landed on a sub-unit.
    pub hits: u64,
    /// Swings that found nothing to mine.
    pub misses: u64,
    pub units_destroyed: u64,
    /// Destroyed sub-units per rarity tag.
    pub units_by_rarity: BTreeMap<u32, u64>,
    pub blocks_spawned: u64,
    pub blocks_removed: u64,
    /// Blocks depleted but left in place because no manager took them.
    pub blocks_stuck: u64,
    pub steps: u64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_outcome(&mut self, outcome: &MineOutcome) {
        let hit = match outcome {
            MineOutcome::NoBlock | MineOutcome::Idle { .. } => {
                self.misses += 1;
                return;
            }
            MineOutcome::Hit { hit, .. } | MineOutcome::Cleared { hit, .. } => hit,
            MineOutcome::Stuck { hit, .. } => {
                self.blocks_stuck += 1;
                hit
            }
        };
        match hit {
            UnitHit::Damaged { .. } => self.hits += 1,
            UnitHit::Destroyed { rarity } => {
                self.hits += 1;
                self.units_destroyed += 1;
                *self.units_by_rarity.entry(*rarity).or_default() += 1;
            }
            UnitHit::Ignored => self.misses += 1,
        }
    }

    pub fn record_changes(&mut self, changes: &[GridChange]) {
        for change in changes {
            match change {
                GridChange::Spawned { .. } => self.blocks_spawned += 1,
                GridChange::Removed { .. } => self.blocks_removed += 1,
            }
        }
    }

    pub fn record_step(&mut self) {
        self.steps += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_engine::mining::block::UnitId;
    use delve_engine::world::archetype::ArchetypeId;
    use delve_engine::world::position::Cell;

    #[test]
    fn outcomes_fold_into_counters() {
        let mut stats = SessionStats::new();
        let cell = Cell::ORIGIN;
        stats.record_outcome(&MineOutcome::Hit {
            cell,
            unit: UnitId(0),
            hit: UnitHit::Damaged { hits: 1, remaining: 1 },
        });
        stats.record_outcome(&MineOutcome::Cleared {
            cell,
            unit: UnitId(0),
            hit: UnitHit::Destroyed { rarity: 2 },
            spawned: 3,
        });
        stats.record_outcome(&MineOutcome::NoBlock);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.units_destroyed, 1);
        assert_eq!(stats.units_by_rarity.get(&2), Some(&1));
    }

    #[test]
    fn changes_fold_into_block_counts() {
        let mut stats = SessionStats::new();
        let archetype = ArchetypeId(1);
        stats.record_changes(&[
            GridChange::Spawned { cell: Cell::new(1, 0, 0), archetype },
            GridChange::Spawned { cell: Cell::new(2, 0, 0), archetype },
            GridChange::Removed { cell: Cell::new(1, 0, 0), archetype },
        ]);
        assert_eq!(stats.blocks_spawned, 2);
        assert_eq!(stats.blocks_removed, 1);
    }
}
