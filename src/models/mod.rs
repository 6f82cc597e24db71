//! Diesel rows for the single-table entity store.

pub mod catalog;
pub mod geography;
pub mod identity;
