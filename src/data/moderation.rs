use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Punishment kinds tracked in `moderation_stat`.
pub mod punishment {
    pub const WARN: &str = "warn";
    pub const BAN: &str = "ban";
    pub const TIMEOUT: &str = "timeout";
}

pub struct GlobalBanRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> GlobalBanRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Records a ban. `unban_at` of `None` means permanent.
    pub async fn insert(
        &self,
        guild_id: i64,
        user_id: i64,
        moderator_id: i64,
        reason: &str,
        unban_at: Option<DateTime<Utc>>,
    ) -> Result<entity::global_ban::Model, DbErr> {
        entity::global_ban::ActiveModel {
            guild_id: ActiveValue::Set(guild_id),
            user_id: ActiveValue::Set(user_id),
            moderator_id: ActiveValue::Set(moderator_id),
            reason: ActiveValue::Set(reason.to_string()),
            unban_at: ActiveValue::Set(unban_at),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Bans whose expiry has passed. Permanent bans never match.
    pub async fn due(&self, now: DateTime<Utc>) -> Result<Vec<entity::global_ban::Model>, DbErr> {
        entity::prelude::GlobalBan::find()
            .filter(entity::global_ban::Column::UnbanAt.is_not_null())
            .filter(entity::global_ban::Column::UnbanAt.lte(now))
            .all(self.db)
            .await
    }

    pub async fn delete(&self, id: i32) -> Result<(), DbErr> {
        entity::prelude::GlobalBan::delete_by_id(id).exec(self.db).await?;
        Ok(())
    }
}

pub struct WarnRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> WarnRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Allocates the next guild-scoped case number.
    ///
    /// Case numbers stay monotonic even after warns are removed because
    /// allocation looks at the historical maximum, not the row count.
    pub async fn next_case_number(&self, guild_id: i64) -> Result<i32, DbErr> {
        let max: Option<i32> = entity::prelude::Warn::find()
            .filter(entity::warn::Column::GuildId.eq(guild_id))
            .order_by_desc(entity::warn::Column::CaseNumber)
            .limit(1)
            .all(self.db)
            .await?
            .first()
            .map(|w| w.case_number);

        Ok(max.unwrap_or(0) + 1)
    }

    pub async fn insert(
        &self,
        case_number: i32,
        guild_id: i64,
        user_id: i64,
        moderator_id: i64,
        reason: &str,
    ) -> Result<entity::warn::Model, DbErr> {
        entity::warn::ActiveModel {
            case_number: ActiveValue::Set(case_number),
            guild_id: ActiveValue::Set(guild_id),
            user_id: ActiveValue::Set(user_id),
            moderator_id: ActiveValue::Set(moderator_id),
            reason: ActiveValue::Set(reason.to_string()),
            issued_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn list_for_user(
        &self,
        guild_id: i64,
        user_id: i64,
    ) -> Result<Vec<entity::warn::Model>, DbErr> {
        entity::prelude::Warn::find()
            .filter(entity::warn::Column::GuildId.eq(guild_id))
            .filter(entity::warn::Column::UserId.eq(user_id))
            .order_by_asc(entity::warn::Column::CaseNumber)
            .all(self.db)
            .await
    }

    /// Removes the warn with the given guild-scoped case number.
    ///
    /// # Returns
    /// - `Ok(true)` - a warn was removed
    /// - `Ok(false)` - no warn with that case number existed
    pub async fn remove_by_case(&self, guild_id: i64, case_number: i32) -> Result<bool, DbErr> {
        let res = entity::prelude::Warn::delete_many()
            .filter(entity::warn::Column::GuildId.eq(guild_id))
            .filter(entity::warn::Column::CaseNumber.eq(case_number))
            .exec(self.db)
            .await?;

        Ok(res.rows_affected > 0)
    }
}

pub struct ModerationStatRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ModerationStatRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    async fn get_or_create(
        &self,
        guild_id: i64,
        user_id: i64,
        kind: &str,
    ) -> Result<entity::moderation_stat::Model, DbErr> {
        let existing = entity::prelude::ModerationStat::find()
            .filter(entity::moderation_stat::Column::GuildId.eq(guild_id))
            .filter(entity::moderation_stat::Column::UserId.eq(user_id))
            .filter(entity::moderation_stat::Column::PunishmentKind.eq(kind))
            .one(self.db)
            .await?;

        if let Some(stat) = existing {
            return Ok(stat);
        }

        entity::moderation_stat::ActiveModel {
            guild_id: ActiveValue::Set(guild_id),
            user_id: ActiveValue::Set(user_id),
            punishment_kind: ActiveValue::Set(kind.to_string()),
            given_count: ActiveValue::Set(0),
            received_count: ActiveValue::Set(0),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Counts one punishment issued by `user_id` as moderator.
    pub async fn increment_given(&self, guild_id: i64, user_id: i64, kind: &str) -> Result<(), DbErr> {
        let stat = self.get_or_create(guild_id, user_id, kind).await?;
        let given = stat.given_count + 1;
        let mut active: entity::moderation_stat::ActiveModel = stat.into();
        active.given_count = ActiveValue::Set(given);
        active.update(self.db).await?;
        Ok(())
    }

    /// Counts one punishment received by `user_id` as target.
    pub async fn increment_received(
        &self,
        guild_id: i64,
        user_id: i64,
        kind: &str,
    ) -> Result<(), DbErr> {
        let stat = self.get_or_create(guild_id, user_id, kind).await?;
        let received = stat.received_count + 1;
        let mut active: entity::moderation_stat::ActiveModel = stat.into();
        active.received_count = ActiveValue::Set(received);
        active.update(self.db).await?;
        Ok(())
    }

    /// All counters for one member, every punishment kind.
    pub async fn stats_for(
        &self,
        guild_id: i64,
        user_id: i64,
    ) -> Result<Vec<entity::moderation_stat::Model>, DbErr> {
        entity::prelude::ModerationStat::find()
            .filter(entity::moderation_stat::Column::GuildId.eq(guild_id))
            .filter(entity::moderation_stat::Column::UserId.eq(user_id))
            .all(self.db)
            .await
    }
}
