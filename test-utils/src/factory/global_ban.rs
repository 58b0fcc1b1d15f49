//! Global ban factory for creating timed ban rows.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Creates a ban row.
///
/// `unban_at` of `None` creates a permanent ban that the reaper
/// never expires.
///
/// # Arguments
/// - `db` - Database connection
/// - `guild_id` - Guild the ban applies in
/// - `user_id` - Banned member
/// - `unban_at` - Optional expiry timestamp
///
/// # Returns
/// - `Ok(entity::global_ban::Model)` - Created ban row
/// - `Err(DbErr)` - Database error during insert
pub async fn create_ban(
    db: &DatabaseConnection,
    guild_id: i64,
    user_id: i64,
    unban_at: Option<DateTime<Utc>>,
) -> Result<entity::global_ban::Model, DbErr> {
    entity::global_ban::ActiveModel {
        guild_id: ActiveValue::Set(guild_id),
        user_id: ActiveValue::Set(user_id),
        moderator_id: ActiveValue::Set(999),
        reason: ActiveValue::Set("rule violation".to_string()),
        unban_at: ActiveValue::Set(unban_at),
        ..Default::default()
    }
    .insert(db)
    .await
}
