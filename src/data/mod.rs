//! Database repository layer for all domain entities.
//!
//! This module contains repository structs that handle database operations (CRUD) for
//! each domain in the bot. Repositories use SeaORM entity models internally and are
//! generic over `ConnectionTrait` so services can run them against the shared
//! connection or inside a transaction. All database queries, inserts, updates, and
//! deletes are performed through these repositories.

pub mod cards;
pub mod economy;
pub mod guild_settings;
pub mod level;
pub mod moderation;
pub mod pet;

#[cfg(test)]
mod test;
