use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

pub struct PetRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PetRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find(
        &self,
        guild_id: i64,
        user_id: i64,
    ) -> Result<Option<entity::pet::Model>, DbErr> {
        entity::prelude::Pet::find()
            .filter(entity::pet::Column::GuildId.eq(guild_id))
            .filter(entity::pet::Column::UserId.eq(user_id))
            .one(self.db)
            .await
    }

    pub async fn insert(
        &self,
        guild_id: i64,
        user_id: i64,
        name: &str,
        kind: &str,
    ) -> Result<entity::pet::Model, DbErr> {
        entity::pet::ActiveModel {
            guild_id: ActiveValue::Set(guild_id),
            user_id: ActiveValue::Set(user_id),
            name: ActiveValue::Set(name.to_string()),
            kind: ActiveValue::Set(kind.to_string()),
            level: ActiveValue::Set(1),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn delete(&self, guild_id: i64, user_id: i64) -> Result<bool, DbErr> {
        let res = entity::prelude::Pet::delete_many()
            .filter(entity::pet::Column::GuildId.eq(guild_id))
            .filter(entity::pet::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;
        Ok(res.rows_affected > 0)
    }
}
