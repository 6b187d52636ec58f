//! Terrain archetype definitions and the block factory built from them.
//!
//! The engine treats `ArchetypeId`s as opaque; this module gives them
//! meaning by mapping each id to the sub-units its blocks are made of.

use delve_engine::manager::BlockFactory;
use delve_engine::mining::unit::SubUnit;
use delve_engine::world::archetype::ArchetypeId;
use serde::{Deserialize, Serialize};

// -- Stock archetype ids --

pub const ORE: ArchetypeId = ArchetypeId(1);
pub const CEILING_FLOOR: ArchetypeId = ArchetypeId(2);

/// Local offsets of the four quadrants, indexed by slot (TL, TR, BL, BR).
pub const QUADRANT_OFFSETS: [[f32; 2]; 4] = [
    [-0.25, 0.25],
    [0.25, 0.25],
    [-0.25, -0.25],
    [0.25, -0.25],
];

/// One sub-unit of an archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTemplate {
    /// Quadrant id, 0 TL, 1 TR, 2 BL, 3 BR. May be left out.
    #[serde(default)]
    pub slot: Option<u8>,
    /// Local (x, y) offset inside the block.
    #[serde(default)]
    pub offset: [f32; 2],
    pub required_hits: u32,
    #[serde(default)]
    pub rarity: u32,
}

impl UnitTemplate {
    pub fn build(&self) -> SubUnit {
        SubUnit::new(self.required_hits, self.slot, self.rarity).at(self.offset[0], self.offset[1])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeTemplate {
    pub id: u16,
    pub name: String,
    pub units: Vec<UnitTemplate>,
}

impl ArchetypeTemplate {
    /// A full four-quadrant archetype with identical units.
    pub fn quadrants(id: ArchetypeId, name: &str, required_hits: u32, rarity: u32) -> Self {
        let units = QUADRANT_OFFSETS
            .iter()
            .enumerate()
            .map(|(slot, offset)| UnitTemplate {
                slot: Some(slot as u8),
                offset: *offset,
                required_hits,
                rarity,
            })
            .collect();
        Self {
            id: id.0,
            name: name.to_string(),
            units,
        }
    }

    pub fn archetype(&self) -> ArchetypeId {
        ArchetypeId(self.id)
    }
}

/// Every archetype the game can spawn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchetypeCatalog {
    archetypes: Vec<ArchetypeTemplate>,
}

impl ArchetypeCatalog {
    /// The stock terrain: ore walls needing three hits per quadrant and
    /// sturdier ceiling/floor needing five.
    pub fn stock() -> Self {
        Self {
            archetypes: vec![
                ArchetypeTemplate::quadrants(ORE, "ore", 3, 1),
                ArchetypeTemplate::quadrants(CEILING_FLOOR, "ceiling_floor", 5, 0),
            ],
        }
    }

    /// Add or replace an archetype.
    pub fn insert(&mut self, template: ArchetypeTemplate) {
        match self.archetypes.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template,
            None => self.archetypes.push(template),
        }
    }

    pub fn get(&self, id: ArchetypeId) -> Option<&ArchetypeTemplate> {
        self.archetypes.iter().find(|t| t.id == id.0)
    }

    pub fn name_of(&self, id: ArchetypeId) -> &str {
        self.get(id).map_or("unknown", |t| t.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArchetypeTemplate> {
        self.archetypes.iter()
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }
}

impl BlockFactory for ArchetypeCatalog {
    fn build(&self, archetype: ArchetypeId) -> Vec<SubUnit> {
        match self.get(archetype) {
            Some(template) => template.units.iter().map(UnitTemplate::build).collect(),
            None => {
                tracing::warn!("No template for {:?}, spawning an empty block", archetype);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_quadrants_cover_every_slot() {
        let catalog = ArchetypeCatalog::stock();
        let units = catalog.build(ORE);
        let slots: Vec<Option<u8>> = units.iter().map(SubUnit::slot).collect();
        assert_eq!(slots, vec![Some(0), Some(1), Some(2), Some(3)]);
        assert!(units.iter().all(|u| u.required_hits() == 3 && u.rarity() == 1));
        assert_eq!(catalog.build(CEILING_FLOOR)[0].required_hits(), 5);
    }

    #[test]
    fn unknown_archetype_builds_nothing() {
        let catalog = ArchetypeCatalog::stock();
        assert!(catalog.build(ArchetypeId(99)).is_empty());
        assert_eq!(catalog.name_of(ArchetypeId(99)), "unknown");
    }

    #[test]
    fn insert_replaces_by_id() {
        let mut catalog = ArchetypeCatalog::stock();
        catalog.insert(ArchetypeTemplate::quadrants(ORE, "rich_ore", 2, 4));
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.name_of(ORE), "rich_ore");
    }
}
