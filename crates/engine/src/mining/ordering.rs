//! Mining order of the sub-units inside one block.

use std::cmp::Ordering;

/// Declared position of a sub-unit: its quadrant id (0 TL, 1 TR, 2 BL, 3 BR)
/// and its local offset inside the block.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    pub slot: Option<u8>,
    pub x: f32,
    pub y: f32,
}

impl Placement {
    pub const fn slot(slot: Option<u8>) -> Self {
        Self { slot, x: 0.0, y: 0.0 }
    }
}

/// Strategy that decides in which order a block's sub-units are mined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitOrdering {
    /// Ascending slot index when the slots are exactly {0,1,2,3}; otherwise
    /// the spatial order.
    #[default]
    SlotIndexOrSpatial,
    /// Always spatial: top row first, left to right.
    Spatial,
    /// The order the units were attached in.
    Declared,
}

impl UnitOrdering {
    /// Return the indices of `placements` in mining order.
    pub fn order(self, placements: &[Placement]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..placements.len()).collect();
        match self {
            UnitOrdering::Declared => {}
            UnitOrdering::SlotIndexOrSpatial if has_canonical_slots(placements) => {
                order.sort_by_key(|&i| placements[i].slot);
            }
            UnitOrdering::SlotIndexOrSpatial | UnitOrdering::Spatial => {
                order.sort_by(|&a, &b| spatial_cmp(&placements[a], &placements[b]).then(a.cmp(&b)));
            }
        }
        order
    }
}

/// True iff the slot indices are exactly {0,1,2,3}, each once.
fn has_canonical_slots(placements: &[Placement]) -> bool {
    if placements.len() != 4 {
        return false;
    }
    let mut seen = [false; 4];
    for p in placements {
        match p.slot {
            Some(s) if (s as usize) < 4 && !seen[s as usize] => seen[s as usize] = true,
            _ => return false,
        }
    }
    true
}

/// Higher `y` first, then lower `x`, then slot index (absent last).
fn spatial_cmp(a: &Placement, b: &Placement) -> Ordering {
    b.y.total_cmp(&a.y)
        .then(a.x.total_cmp(&b.x))
        .then_with(|| match (a.slot, b.slot) {
            (Some(sa), Some(sb)) => sa.cmp(&sb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}
