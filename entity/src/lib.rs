//! SeaORM entities for the panelbot database.

pub mod prelude;

pub mod whitelist_entry;
