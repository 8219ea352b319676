//! Factory methods for creating test data.
//!
//! Each entity has its own factory module with both a `Factory` struct for customization
//! and a `create_*` convenience function for quick default creation.
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let entry = factory::whitelist_entry::create_whitelist_entry(&db).await?;
//!
//! let entry = factory::whitelist_entry::WhitelistEntryFactory::new(&db)
//!     .player_name("Steve")
//!     .discord_id("123456789")
//!     .build()
//!     .await?;
//! ```

pub mod helpers;
pub mod whitelist_entry;

pub use whitelist_entry::create_whitelist_entry;
