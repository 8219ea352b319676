//! Panelbot Test Utils
//!
//! Provides shared testing utilities for the panelbot crates. This crate offers a builder
//! pattern for creating test contexts with in-memory SQLite databases and factories for
//! inserting rows with sensible defaults.
//!
//! # Overview
//!
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing the database connection
//! - **TestError**: Error types that can occur during test setup
//! - **factory**: Row factories for each entity
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//! use entity::prelude::WhitelistEntry;
//!
//! #[tokio::test]
//! async fn test_whitelist_operations() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_table(WhitelistEntry)
//!         .build()
//!         .await?;
//!
//!     let db = test.db.unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
