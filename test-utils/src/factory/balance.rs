//! Balance factory for seeding member wallets.

use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Creates a balance row for a member.
///
/// # Arguments
/// - `db` - Database connection
/// - `guild_id` - Guild the balance belongs to
/// - `user_id` - Member owning the balance
/// - `amount` - Starting amount
///
/// # Returns
/// - `Ok(entity::balance::Model)` - Created balance row
/// - `Err(DbErr)` - Database error during insert
pub async fn create_balance(
    db: &DatabaseConnection,
    guild_id: i64,
    user_id: i64,
    amount: i64,
) -> Result<entity::balance::Model, DbErr> {
    entity::balance::ActiveModel {
        guild_id: ActiveValue::Set(guild_id),
        user_id: ActiveValue::Set(user_id),
        amount: ActiveValue::Set(amount),
        ..Default::default()
    }
    .insert(db)
    .await
}
