//! Warn factory for creating moderation warning rows.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test warns with customizable fields.
pub struct WarnFactory<'a> {
    db: &'a DatabaseConnection,
    case_number: i32,
    guild_id: i64,
    user_id: i64,
    moderator_id: i64,
    reason: String,
}

impl<'a> WarnFactory<'a> {
    /// Creates a new WarnFactory with default values.
    ///
    /// Defaults: case number 1, guild 1, user 2, moderator 3,
    /// reason `"spam"`.
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            case_number: 1,
            guild_id: 1,
            user_id: 2,
            moderator_id: 3,
            reason: "spam".to_string(),
        }
    }

    pub fn case_number(mut self, case_number: i32) -> Self {
        self.case_number = case_number;
        self
    }

    pub fn guild_id(mut self, guild_id: i64) -> Self {
        self.guild_id = guild_id;
        self
    }

    pub fn user_id(mut self, user_id: i64) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn moderator_id(mut self, moderator_id: i64) -> Self {
        self.moderator_id = moderator_id;
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Builds and inserts the warn row.
    pub async fn build(self) -> Result<entity::warn::Model, DbErr> {
        entity::warn::ActiveModel {
            case_number: ActiveValue::Set(self.case_number),
            guild_id: ActiveValue::Set(self.guild_id),
            user_id: ActiveValue::Set(self.user_id),
            moderator_id: ActiveValue::Set(self.moderator_id),
            reason: ActiveValue::Set(self.reason),
            issued_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a warn with default values.
pub async fn create_warn(db: &DatabaseConnection) -> Result<entity::warn::Model, DbErr> {
    WarnFactory::new(db).build().await
}
