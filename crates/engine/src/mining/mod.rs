//! Per-cell mining state machines.
//!
//! A [`block::Block`] owns up to four [`unit::SubUnit`]s and mines them one hit
//! at a time in the order chosen by an [`ordering::UnitOrdering`].

pub mod block;
pub mod ordering;
pub mod unit;
