use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use crate::cards::rarity_priority;

/// Cards shown per inventory page.
pub const CARDS_PER_PAGE: usize = 15;

/// Trade row states.
pub mod trade_state {
    pub const OPEN: &str = "open";
    pub const ACCEPTED: &str = "accepted";
    pub const DECLINED: &str = "declined";
    pub const EXPIRED: &str = "expired";
}

/// Inventory sort orders offered by the filter select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventorySort {
    ByDate,
    ByRarityPriority,
    ByUidAsc,
    ByUidDesc,
}

pub struct CardInstanceRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CardInstanceRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Allocates the next instance uid.
    pub async fn next_uid(&self) -> Result<i64, DbErr> {
        let max = entity::prelude::CardInstance::find()
            .order_by_desc(entity::card_instance::Column::Uid)
            .limit(1)
            .all(self.db)
            .await?
            .first()
            .map(|c| c.uid)
            .unwrap_or(0);

        Ok(max + 1)
    }

    pub async fn insert(
        &self,
        uid: i64,
        card_id: i32,
        owner_user_id: i64,
        rarity: &str,
        stars_count: i32,
    ) -> Result<entity::card_instance::Model, DbErr> {
        entity::card_instance::ActiveModel {
            uid: ActiveValue::Set(uid),
            card_id: ActiveValue::Set(card_id),
            owner_user_id: ActiveValue::Set(owner_user_id),
            rarity: ActiveValue::Set(rarity.to_string()),
            stars_count: ActiveValue::Set(stars_count),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn find_by_uid(
        &self,
        uid: i64,
    ) -> Result<Option<entity::card_instance::Model>, DbErr> {
        entity::prelude::CardInstance::find()
            .filter(entity::card_instance::Column::Uid.eq(uid))
            .one(self.db)
            .await
    }

    /// One page of an owner's inventory under the chosen sort.
    ///
    /// Rarity-priority ordering comes from the static catalog
    /// configuration, so that sort happens in memory after fetching the
    /// owner's cards.
    ///
    /// # Arguments
    /// - `page` - zero-based page index
    ///
    /// # Returns
    /// - `Ok((rows, total_pages))`
    pub async fn list_owner_page(
        &self,
        owner_user_id: i64,
        sort: InventorySort,
        page: usize,
    ) -> Result<(Vec<entity::card_instance::Model>, usize), DbErr> {
        let mut rows = entity::prelude::CardInstance::find()
            .filter(entity::card_instance::Column::OwnerUserId.eq(owner_user_id))
            .all(self.db)
            .await?;

        match sort {
            InventorySort::ByDate => {
                rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.uid.cmp(&a.uid)))
            }
            InventorySort::ByRarityPriority => rows.sort_by(|a, b| {
                rarity_priority(&b.rarity)
                    .cmp(&rarity_priority(&a.rarity))
                    .then(a.uid.cmp(&b.uid))
            }),
            InventorySort::ByUidAsc => rows.sort_by_key(|c| c.uid),
            InventorySort::ByUidDesc => rows.sort_by_key(|c| std::cmp::Reverse(c.uid)),
        }

        let total_pages = rows.len().div_ceil(CARDS_PER_PAGE);
        let start = page * CARDS_PER_PAGE;
        let page_rows = rows
            .into_iter()
            .skip(start)
            .take(CARDS_PER_PAGE)
            .collect();

        Ok((page_rows, total_pages))
    }

    /// Reassigns ownership of one instance. Used by trade acceptance
    /// inside a transaction so both sides swap or neither does.
    pub async fn set_owner(&self, uid: i64, new_owner: i64) -> Result<(), DbErr> {
        let card = self
            .find_by_uid(uid)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("card instance {uid}")))?;

        let mut active: entity::card_instance::ActiveModel = card.into();
        active.owner_user_id = ActiveValue::Set(new_owner);
        active.update(self.db).await?;
        Ok(())
    }
}

pub struct TradeRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TradeRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn insert_open(
        &self,
        guild_id: i64,
        offerer_user_id: i64,
        offerer_uid: i64,
        offeree_user_id: i64,
        offeree_uid: i64,
    ) -> Result<entity::trade::Model, DbErr> {
        entity::trade::ActiveModel {
            guild_id: ActiveValue::Set(guild_id),
            offerer_user_id: ActiveValue::Set(offerer_user_id),
            offerer_uid: ActiveValue::Set(offerer_uid),
            offeree_user_id: ActiveValue::Set(offeree_user_id),
            offeree_uid: ActiveValue::Set(offeree_uid),
            state: ActiveValue::Set(trade_state::OPEN.to_string()),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn find(&self, id: i32) -> Result<Option<entity::trade::Model>, DbErr> {
        entity::prelude::Trade::find_by_id(id).one(self.db).await
    }

    /// The open trade a card uid participates in, if any.
    ///
    /// The exclusive-lock invariant means this returns at most one row;
    /// every state-machine transition re-checks through this query.
    pub async fn open_trade_for_uid(
        &self,
        uid: i64,
    ) -> Result<Option<entity::trade::Model>, DbErr> {
        entity::prelude::Trade::find()
            .filter(entity::trade::Column::State.eq(trade_state::OPEN))
            .filter(
                Condition::any()
                    .add(entity::trade::Column::OffererUid.eq(uid))
                    .add(entity::trade::Column::OffereeUid.eq(uid)),
            )
            .one(self.db)
            .await
    }

    /// Moves a trade to a terminal state.
    pub async fn set_state(&self, id: i32, state: &str) -> Result<entity::trade::Model, DbErr> {
        let trade = self
            .find(id)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("trade {id}")))?;

        let mut active: entity::trade::ActiveModel = trade.into();
        active.state = ActiveValue::Set(state.to_string());
        active.update(self.db).await
    }

    /// Open trades created before the cutoff; fed to the expiry sweep.
    pub async fn open_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<entity::trade::Model>, DbErr> {
        entity::prelude::Trade::find()
            .filter(entity::trade::Column::State.eq(trade_state::OPEN))
            .filter(entity::trade::Column::CreatedAt.lt(cutoff))
            .all(self.db)
            .await
    }
}
