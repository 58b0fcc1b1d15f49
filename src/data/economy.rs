use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// Transaction directions stored in the `kind` column.
pub mod direction {
    pub const INCOMING: &str = "incoming";
    pub const OUTGOING: &str = "outgoing";
}

/// Transactions shown per page in the history paginator.
pub const TRANSACTIONS_PER_PAGE: u64 = 10;

pub struct BalanceRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> BalanceRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find(
        &self,
        guild_id: i64,
        user_id: i64,
    ) -> Result<Option<entity::balance::Model>, DbErr> {
        entity::prelude::Balance::find()
            .filter(entity::balance::Column::GuildId.eq(guild_id))
            .filter(entity::balance::Column::UserId.eq(user_id))
            .one(self.db)
            .await
    }

    /// Current amount; zero for members with no balance row yet.
    pub async fn amount(&self, guild_id: i64, user_id: i64) -> Result<i64, DbErr> {
        Ok(self.find(guild_id, user_id).await?.map(|b| b.amount).unwrap_or(0))
    }

    async fn get_or_create(
        &self,
        guild_id: i64,
        user_id: i64,
    ) -> Result<entity::balance::Model, DbErr> {
        if let Some(existing) = self.find(guild_id, user_id).await? {
            return Ok(existing);
        }

        entity::balance::ActiveModel {
            guild_id: ActiveValue::Set(guild_id),
            user_id: ActiveValue::Set(user_id),
            amount: ActiveValue::Set(0),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Applies a signed delta to the stored amount.
    ///
    /// Callers must have validated non-negativity; the economy service is
    /// the only caller and raises `NotEnoughMoney` before getting here.
    pub async fn apply(&self, guild_id: i64, user_id: i64, delta: i64) -> Result<i64, DbErr> {
        let balance = self.get_or_create(guild_id, user_id).await?;
        let updated = balance.amount + delta;
        let mut active: entity::balance::ActiveModel = balance.into();
        active.amount = ActiveValue::Set(updated);
        active.update(self.db).await?;
        Ok(updated)
    }
}

pub struct TransactionRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TransactionRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Appends one log row. The log is append-only; nothing ever updates
    /// an existing transaction.
    pub async fn append(
        &self,
        guild_id: i64,
        user_id: i64,
        amount: i64,
        kind: &str,
        locale_key: &str,
    ) -> Result<entity::transaction::Model, DbErr> {
        entity::transaction::ActiveModel {
            guild_id: ActiveValue::Set(guild_id),
            user_id: ActiveValue::Set(user_id),
            amount: ActiveValue::Set(amount),
            kind: ActiveValue::Set(kind.to_string()),
            locale_key: ActiveValue::Set(locale_key.to_string()),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// One page of a member's history, newest first.
    ///
    /// # Arguments
    /// - `page` - zero-based page index
    ///
    /// # Returns
    /// - `Ok((rows, total_pages))`
    pub async fn list_page(
        &self,
        guild_id: i64,
        user_id: i64,
        page: u64,
    ) -> Result<(Vec<entity::transaction::Model>, u64), DbErr> {
        let query = entity::prelude::Transaction::find()
            .filter(entity::transaction::Column::GuildId.eq(guild_id))
            .filter(entity::transaction::Column::UserId.eq(user_id))
            .order_by_desc(entity::transaction::Column::CreatedAt)
            .order_by_desc(entity::transaction::Column::Id);

        let total = query.clone().count(self.db).await?;
        let total_pages = total.div_ceil(TRANSACTIONS_PER_PAGE);

        let rows = query
            .offset(page * TRANSACTIONS_PER_PAGE)
            .limit(TRANSACTIONS_PER_PAGE)
            .all(self.db)
            .await?;

        Ok((rows, total_pages))
    }

    /// Drops daily statistic rows older than the cutoff. Run by the
    /// analytics loop at the configured expiry hour.
    pub async fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DbErr> {
        let res = entity::prelude::Transaction::delete_many()
            .filter(entity::transaction::Column::CreatedAt.lt(cutoff))
            .exec(self.db)
            .await?;
        Ok(res.rows_affected)
    }
}

pub struct InGameRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> InGameRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Whether the member currently holds the in-game mutex.
    pub async fn is_active(&self, guild_id: i64, user_id: i64) -> Result<bool, DbErr> {
        let row = entity::prelude::InGame::find()
            .filter(entity::in_game::Column::GuildId.eq(guild_id))
            .filter(entity::in_game::Column::UserId.eq(user_id))
            .one(self.db)
            .await?;

        Ok(row.map(|r| r.active).unwrap_or(false))
    }

    /// Sets or clears the in-game mutex flag.
    pub async fn set(&self, guild_id: i64, user_id: i64, active: bool) -> Result<(), DbErr> {
        let row = entity::prelude::InGame::find()
            .filter(entity::in_game::Column::GuildId.eq(guild_id))
            .filter(entity::in_game::Column::UserId.eq(user_id))
            .one(self.db)
            .await?;

        match row {
            Some(row) => {
                let mut active_model: entity::in_game::ActiveModel = row.into();
                active_model.active = ActiveValue::Set(active);
                active_model.update(self.db).await?;
            }
            None => {
                entity::in_game::ActiveModel {
                    guild_id: ActiveValue::Set(guild_id),
                    user_id: ActiveValue::Set(user_id),
                    active: ActiveValue::Set(active),
                    ..Default::default()
                }
                .insert(self.db)
                .await?;
            }
        }

        Ok(())
    }
}
