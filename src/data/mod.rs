//! Database repositories.
//!
//! Repositories borrow the connection and convert entity models into domain models at
//! this boundary; nothing above the data layer sees SeaORM types.

pub mod whitelist_entry;

#[cfg(test)]
mod test;
