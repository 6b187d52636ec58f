//! A single mineable quadrant of a block.

use super::ordering::Placement;

/// Where a sub-unit is in its hit lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    /// No hits taken.
    Fresh,
    /// Hit at least once but not yet depleted.
    Damaged,
    /// Terminal: hits reached the requirement.
    Depleted,
}

/// Result of landing one hit on a sub-unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitHit {
    /// The unit took the hit and is still mineable.
    Damaged { hits: u32, remaining: u32 },
    /// This hit depleted the unit. The owning block must drop it.
    Destroyed { rarity: u32 },
    /// The unit was already depleted; nothing changed.
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubUnit {
    required_hits: u32,
    hits: u32,
    rarity: u32,
    placement: Placement,
}

impl SubUnit {
    /// `required_hits` below 1 is raised to 1.
    pub fn new(required_hits: u32, slot: Option<u8>, rarity: u32) -> Self {
        Self {
            required_hits: required_hits.max(1),
            hits: 0,
            rarity,
            placement: Placement::slot(slot),
        }
    }

    /// Set the unit's local offset inside its block (used by spatial ordering).
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.placement.x = x;
        self.placement.y = y;
        self
    }

    pub fn required_hits(&self) -> u32 {
        self.required_hits
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn rarity(&self) -> u32 {
        self.rarity
    }

    pub fn slot(&self) -> Option<u8> {
        self.placement.slot
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn state(&self) -> UnitState {
        if self.hits == 0 {
            UnitState::Fresh
        } else if self.hits < self.required_hits {
            UnitState::Damaged
        } else {
            UnitState::Depleted
        }
    }

    pub fn is_mineable(&self) -> bool {
        self.hits < self.required_hits
    }

    pub fn remaining_hits(&self) -> u32 {
        self.required_hits.saturating_sub(self.hits)
    }

    /// Fraction of the required hits already taken, in `0.0..=1.0`.
    pub fn damage_fraction(&self) -> f32 {
        self.hits.min(self.required_hits) as f32 / self.required_hits as f32
    }

    /// Land one hit. Callers check [`SubUnit::is_mineable`] first; a hit on a
    /// depleted unit is reported as [`UnitHit::Ignored`].
    pub fn mine(&mut self) -> UnitHit {
        if !self.is_mineable() {
            return UnitHit::Ignored;
        }
        self.hits += 1;
        if self.hits >= self.required_hits {
            UnitHit::Destroyed { rarity: self.rarity }
        } else {
            UnitHit::Damaged {
                hits: self.hits,
                remaining: self.remaining_hits(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_fresh_damaged_depleted() {
        let mut unit = SubUnit::new(3, Some(0), 2);
        assert_eq!(unit.state(), UnitState::Fresh);
        assert_eq!(unit.mine(), UnitHit::Damaged { hits: 1, remaining: 2 });
        assert_eq!(unit.state(), UnitState::Damaged);
        assert_eq!(unit.mine(), UnitHit::Damaged { hits: 2, remaining: 1 });
        assert_eq!(unit.mine(), UnitHit::Destroyed { rarity: 2 });
        assert_eq!(unit.state(), UnitState::Depleted);
        assert!(!unit.is_mineable());
    }

    #[test]
    fn depleted_unit_ignores_hits() {
        let mut unit = SubUnit::new(1, None, 0);
        assert_eq!(unit.mine(), UnitHit::Destroyed { rarity: 0 });
        assert_eq!(unit.mine(), UnitHit::Ignored);
        assert_eq!(unit.hits(), 1);
    }

    #[test]
    fn zero_requirement_is_raised_to_one() {
        let unit = SubUnit::new(0, Some(1), 0);
        assert_eq!(unit.required_hits(), 1);
        assert!(unit.is_mineable());
    }

    #[test]
    fn damage_fraction_tracks_hits() {
        let mut unit = SubUnit::new(4, Some(2), 0);
        assert_eq!(unit.damage_fraction(), 0.0);
        unit.mine();
        assert_eq!(unit.damage_fraction(), 0.25);
    }
}
