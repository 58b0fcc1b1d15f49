//! Level factory for creating leveling rows.

use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test level rows with customizable fields.
pub struct LevelFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: i64,
    user_id: i64,
    prestige: i32,
    level: i32,
    exp_need: i64,
    exp_now: i64,
}

impl<'a> LevelFactory<'a> {
    /// Creates a new LevelFactory with default values.
    ///
    /// Defaults: guild 1, user 2, prestige 0, level 1, 100 exp needed,
    /// 0 exp accrued.
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            guild_id: 1,
            user_id: 2,
            prestige: 0,
            level: 1,
            exp_need: 100,
            exp_now: 0,
        }
    }

    pub fn guild_id(mut self, guild_id: i64) -> Self {
        self.guild_id = guild_id;
        self
    }

    pub fn user_id(mut self, user_id: i64) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn prestige(mut self, prestige: i32) -> Self {
        self.prestige = prestige;
        self
    }

    pub fn level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    pub fn exp(mut self, exp_now: i64, exp_need: i64) -> Self {
        self.exp_now = exp_now;
        self.exp_need = exp_need;
        self
    }

    /// Builds and inserts the level row.
    pub async fn build(self) -> Result<entity::level::Model, DbErr> {
        entity::level::ActiveModel {
            guild_id: ActiveValue::Set(self.guild_id),
            user_id: ActiveValue::Set(self.user_id),
            prestige: ActiveValue::Set(self.prestige),
            level: ActiveValue::Set(self.level),
            exp_need: ActiveValue::Set(self.exp_need),
            exp_now: ActiveValue::Set(self.exp_now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a level row with default values.
pub async fn create_level(db: &DatabaseConnection) -> Result<entity::level::Model, DbErr> {
    LevelFactory::new(db).build().await
}
