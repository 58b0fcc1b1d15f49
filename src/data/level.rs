use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

/// Starting XP requirement for a fresh level row.
pub const BASE_EXP_NEED: i64 = 100;

pub struct LevelRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> LevelRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find(
        &self,
        guild_id: i64,
        user_id: i64,
    ) -> Result<Option<entity::level::Model>, DbErr> {
        entity::prelude::Level::find()
            .filter(entity::level::Column::GuildId.eq(guild_id))
            .filter(entity::level::Column::UserId.eq(user_id))
            .one(self.db)
            .await
    }

    /// Fetches a member's level row, creating the level-1 default on
    /// first message.
    pub async fn get_or_create(
        &self,
        guild_id: i64,
        user_id: i64,
    ) -> Result<entity::level::Model, DbErr> {
        if let Some(existing) = self.find(guild_id, user_id).await? {
            return Ok(existing);
        }

        entity::level::ActiveModel {
            guild_id: ActiveValue::Set(guild_id),
            user_id: ActiveValue::Set(user_id),
            prestige: ActiveValue::Set(0),
            level: ActiveValue::Set(1),
            exp_need: ActiveValue::Set(BASE_EXP_NEED),
            exp_now: ActiveValue::Set(0),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Persists updated progress for an existing row.
    pub async fn save_progress(
        &self,
        row: entity::level::Model,
        prestige: i32,
        level: i32,
        exp_need: i64,
        exp_now: i64,
    ) -> Result<entity::level::Model, DbErr> {
        let mut active: entity::level::ActiveModel = row.into();
        active.prestige = ActiveValue::Set(prestige);
        active.level = ActiveValue::Set(level);
        active.exp_need = ActiveValue::Set(exp_need);
        active.exp_now = ActiveValue::Set(exp_now);
        active.update(self.db).await
    }
}
