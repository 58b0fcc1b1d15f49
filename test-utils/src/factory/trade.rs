//! Trade factory for creating trade offer rows.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Creates an open trade between two card instances.
///
/// # Arguments
/// - `db` - Database connection
/// - `guild_id` - Guild the trade happens in
/// - `offerer` - `(user_id, card_uid)` of the offering side
/// - `offeree` - `(user_id, card_uid)` of the receiving side
///
/// # Returns
/// - `Ok(entity::trade::Model)` - Created trade row in state `"open"`
/// - `Err(DbErr)` - Database error during insert
pub async fn create_open_trade(
    db: &DatabaseConnection,
    guild_id: i64,
    offerer: (i64, i64),
    offeree: (i64, i64),
) -> Result<entity::trade::Model, DbErr> {
    entity::trade::ActiveModel {
        guild_id: ActiveValue::Set(guild_id),
        offerer_user_id: ActiveValue::Set(offerer.0),
        offerer_uid: ActiveValue::Set(offerer.1),
        offeree_user_id: ActiveValue::Set(offeree.0),
        offeree_uid: ActiveValue::Set(offeree.1),
        state: ActiveValue::Set("open".to_string()),
        created_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}
