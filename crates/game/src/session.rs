//! A player digging through the lattice on a grid.
//!
//! The session stands in for the movement and targeting layer: it only reads
//! the grid through occupancy probes and mutates it through the manager's
//! single mining entry point.

use delve_engine::manager::{MineOutcome, ProceduralManager};
use delve_engine::world::position::Cell;

use crate::stats::SessionStats;

/// Horizontal direction the player faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    /// +Z
    #[default]
    North,
    /// +X
    East,
    /// -Z
    South,
    /// -X
    West,
}

impl Facing {
    pub fn step(self) -> Cell {
        match self {
            Facing::North => Cell::new(0, 0, 1),
            Facing::East => Cell::new(1, 0, 0),
            Facing::South => Cell::new(0, 0, -1),
            Facing::West => Cell::new(-1, 0, 0),
        }
    }

    pub fn left(self) -> Self {
        match self {
            Facing::North => Facing::West,
            Facing::West => Facing::South,
            Facing::South => Facing::East,
            Facing::East => Facing::North,
        }
    }

    pub fn right(self) -> Self {
        match self {
            Facing::North => Facing::East,
            Facing::East => Facing::South,
            Facing::South => Facing::West,
            Facing::West => Facing::North,
        }
    }
}

/// The player is two cells tall: feet and head.
const PLAYER_HEIGHT: i32 = 2;

pub struct MiningSession {
    manager: ProceduralManager,
    /// Cell holding the player's feet.
    cell: Cell,
    facing: Facing,
    stats: SessionStats,
}

impl MiningSession {
    /// Carve the manager's starting room and stand the player in its origin
    /// corner.
    pub fn new(mut manager: ProceduralManager) -> Self {
        manager.carve_initial_room();
        let cell = manager.hollow().min;
        let mut stats = SessionStats::new();
        stats.record_changes(&manager.take_changes());
        tracing::info!(
            "Player placed at {:?} (world {:?})",
            cell,
            manager.spawn_point()
        );
        Self {
            manager,
            cell,
            facing: Facing::default(),
            stats,
        }
    }

    pub fn manager(&self) -> &ProceduralManager {
        &self.manager
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn turn_left(&mut self) {
        self.facing = self.facing.left();
    }

    pub fn turn_right(&mut self) {
        self.facing = self.facing.right();
    }

    /// Occupancy probe routed through world space, the way a collider test
    /// would see it.
    fn probe(&self, cell: Cell) -> bool {
        let point = self.manager.grid_to_world(cell);
        self.manager.is_occupied(self.manager.world_to_grid(point))
    }

    /// The cells the player's body would occupy one step ahead, feet first.
    fn ahead(&self) -> impl Iterator<Item = Cell> + '_ {
        let front = self.cell + self.facing.step();
        (0..PLAYER_HEIGHT).map(move |dy| front.offset(0, dy, 0))
    }

    /// The lowest occupied cell in front of the player, if any.
    pub fn target(&self) -> Option<Cell> {
        self.ahead().find(|c| self.probe(*c))
    }

    /// Move one cell forward if nothing blocks the way.
    pub fn step_forward(&mut self) -> bool {
        if self.target().is_some() {
            return false;
        }
        self.cell = self.cell + self.facing.step();
        self.stats.record_step();
        tracing::trace!("Stepped to {:?}", self.cell);
        true
    }

    /// Swing once at whatever is in front.
    pub fn mine_ahead(&mut self) -> MineOutcome {
        let outcome = match self.target() {
            Some(cell) => self.manager.mine_at(cell),
            None => MineOutcome::NoBlock,
        };
        self.stats.record_outcome(&outcome);
        let changes = self.manager.take_changes();
        self.stats.record_changes(&changes);

        if let MineOutcome::Cleared { cell, spawned, .. } = &outcome {
            tracing::debug!("Cleared {:?}, {} neighbors spawned", cell, spawned);
        }
        outcome
    }

    /// Mine until the way ahead is clear, then step. Gives up after
    /// `max_swings` swings. Returns whether the player moved.
    pub fn dig_forward(&mut self, max_swings: usize) -> bool {
        for _ in 0..max_swings {
            if self.step_forward() {
                return true;
            }
            if matches!(
                self.mine_ahead(),
                MineOutcome::NoBlock | MineOutcome::Idle { .. } | MineOutcome::Stuck { .. }
            ) && self.target().is_some()
            {
                tracing::warn!("Path ahead of {:?} cannot be mined", self.cell);
                return false;
            }
        }
        self.step_forward()
    }
}
