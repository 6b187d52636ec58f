//! Game configuration, loaded from JSON.
//!
//! Every field has a default, so a config file only needs the values it
//! changes. `GameConfig::default()` is the stock game.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail, ensure};
use delve_engine::manager::hollow::{MAX_ANCHOR, MAX_HOLLOW_EXTENT};
use delve_engine::manager::{ManagerConfig, ProceduralManager};
use delve_engine::mining::block::MAX_UNITS;
use delve_engine::mining::ordering::UnitOrdering;
use delve_engine::world::archetype::ArchetypeId;
use delve_engine::world::position::{GridMapping, WorldPos};
use serde::{Deserialize, Serialize};

use crate::archetype::{self, ArchetypeCatalog};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HollowSize {
    pub x: u32,
    /// Height.
    pub y: u32,
    pub z: u32,
}

/// Which catalog entries fill the two terrain roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchetypeRoles {
    pub ore: u16,
    pub ceiling_floor: u16,
}

/// Serializable name of a [`UnitOrdering`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingName {
    #[default]
    SlotIndexOrSpatial,
    Spatial,
    Declared,
}

impl From<OrderingName> for UnitOrdering {
    fn from(name: OrderingName) -> Self {
        match name {
            OrderingName::SlotIndexOrSpatial => UnitOrdering::SlotIndexOrSpatial,
            OrderingName::Spatial => UnitOrdering::Spatial,
            OrderingName::Declared => UnitOrdering::Declared,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub cell_size: f64,
    pub hollow: HollowSize,
    pub spawn_hint: [f64; 3],
    pub ordering: OrderingName,
    pub archetypes: ArchetypeRoles,
    pub catalog: ArchetypeCatalog,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            hollow: HollowSize { x: 8, y: 3, z: 8 },
            spawn_hint: [0.0, 0.0, 0.0],
            ordering: OrderingName::default(),
            archetypes: ArchetypeRoles {
                ore: archetype::ORE.0,
                ceiling_floor: archetype::CEILING_FLOOR.0,
            },
            catalog: ArchetypeCatalog::stock(),
        }
    }
}

impl GameConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("loading config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(text).context("parsing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing config")
    }

    pub fn validate(&self) -> Result<()> {
        let h = self.hollow;
        ensure!(
            h.x >= 1 && h.y >= 1 && h.z >= 1,
            "hollow must be at least 1x1x1, got {}x{}x{}",
            h.x,
            h.y,
            h.z
        );
        ensure!(
            h.x <= MAX_HOLLOW_EXTENT && h.y <= MAX_HOLLOW_EXTENT && h.z <= MAX_HOLLOW_EXTENT,
            "hollow {}x{}x{} exceeds {} cells per axis",
            h.x,
            h.y,
            h.z,
            MAX_HOLLOW_EXTENT
        );

        let cell_size = GridMapping::new(self.cell_size).cell_size();
        for (axis, coord) in [("x", self.spawn_hint[0]), ("z", self.spawn_hint[2])] {
            let cells = (coord / cell_size).floor();
            ensure!(
                cells.is_finite() && cells.abs() <= f64::from(MAX_ANCHOR),
                "spawn_hint {} = {} is {} cells from the origin, limit is {}",
                axis,
                coord,
                cells,
                MAX_ANCHOR
            );
        }
        ensure!(
            self.spawn_hint[1].is_finite(),
            "spawn_hint y = {} is not finite",
            self.spawn_hint[1]
        );

        for template in self.catalog.iter() {
            ensure!(
                !template.units.is_empty() && template.units.len() <= MAX_UNITS,
                "archetype {} ({}) has {} units, expected 1..={}",
                template.id,
                template.name,
                template.units.len(),
                MAX_UNITS
            );
            for unit in &template.units {
                ensure!(
                    unit.required_hits >= 1,
                    "archetype {} ({}) has a unit needing 0 hits",
                    template.id,
                    template.name
                );
                if let Some(slot) = unit.slot {
                    ensure!(
                        (slot as usize) < MAX_UNITS,
                        "archetype {} ({}) uses slot {}, expected 0..=3",
                        template.id,
                        template.name,
                        slot
                    );
                }
            }
        }

        for (role, id) in [
            ("ore", self.archetypes.ore),
            ("ceiling_floor", self.archetypes.ceiling_floor),
        ] {
            if self.catalog.get(ArchetypeId(id)).is_none() {
                bail!("{} archetype {} is not in the catalog", role, id);
            }
        }
        Ok(())
    }

    pub fn manager_config(&self) -> ManagerConfig {
        ManagerConfig {
            ore: ArchetypeId(self.archetypes.ore),
            ceiling_floor: ArchetypeId(self.archetypes.ceiling_floor),
            hollow: [self.hollow.x, self.hollow.y, self.hollow.z],
            spawn_hint: WorldPos::new(self.spawn_hint[0], self.spawn_hint[1], self.spawn_hint[2]),
            cell_size: self.cell_size,
            ordering: self.ordering.into(),
        }
    }

    /// A manager for this config, spawning blocks from its catalog.
    pub fn build_manager(&self) -> ProceduralManager {
        ProceduralManager::new(self.manager_config(), self.catalog.clone())
    }
}
