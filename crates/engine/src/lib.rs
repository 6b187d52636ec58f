//! Game-agnostic core of a mining sandbox: a sparse lattice of destructible
//! cells that grows outward as cells are mined out.
//!
//! - [`world`] holds coordinates, the cell/world mapping and the grid store.
//! - [`mining`] holds the per-cell state machines (sub-units and blocks).
//! - [`manager`] owns the store and drives spawning, removal and expansion.

pub mod manager;
pub mod mining;
pub mod world;
