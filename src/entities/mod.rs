//! SeaORM entities for the register tables.

pub mod prelude;

pub mod appointments;
pub mod dismissals;
pub mod entries;
