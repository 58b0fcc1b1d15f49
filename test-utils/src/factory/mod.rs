//! Factory methods for creating test data.
//!
//! This module provides factory methods for creating test entities with sensible defaults,
//! reducing boilerplate in tests. Each entity has its own factory module with both a
//! `Factory` struct for customization and a `create_*` convenience function for quick
//! default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     // Create with defaults
//!     let settings = factory::guild_settings::create_settings(&db, 1).await?;
//!     let balance = factory::balance::create_balance(&db, 1, 2, 100).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Customization
//!
//! Use the factory builders for custom values:
//!
//! ```rust,ignore
//! let card = factory::card_instance::CardInstanceFactory::new(&db)
//!     .owner(42)
//!     .rarity("legendary")
//!     .stars(5)
//!     .build()
//!     .await?;
//! ```

pub mod balance;
pub mod card_instance;
pub mod global_ban;
pub mod guild_settings;
pub mod helpers;
pub mod level;
pub mod trade;
pub mod warn;

// Re-export commonly used factory functions for concise usage
pub use balance::create_balance;
pub use card_instance::create_card;
pub use global_ban::create_ban;
pub use guild_settings::create_settings;
pub use level::create_level;
pub use trade::create_open_trade;
pub use warn::create_warn;
