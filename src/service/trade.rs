//! Trade state machine.
//!
//! Persistent states: `open` then terminal `accepted` / `declined` /
//! `expired`. The drafting and pending-confirm steps before `open` live
//! only in the offer dialog. Every transition re-reads the trade table
//! because the dialog may outlive the state it observed at construction.
//!
//! Both participants hold the in-game flag from `open` to the terminal
//! state, so a member mid-trade cannot start a roll, a duel, or another
//! trade.

use chrono::{Duration, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::data::cards::{trade_state, CardInstanceRepository, TradeRepository};
use crate::data::economy::InGameRepository;
use crate::error::{AppError, DomainError};

/// How long an open offer stays valid.
pub const OFFER_TIMEOUT_SECS: i64 = 300;

pub struct TradeService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TradeService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates a drafted offer without persisting anything.
    ///
    /// Run when the offerer submits the offeree card uid and again on
    /// confirm, since another trade or game may have started in between.
    pub async fn check_offer(
        &self,
        guild_id: i64,
        offerer_user_id: i64,
        offerer_uid: i64,
        offeree_user_id: i64,
        offeree_uid: i64,
    ) -> Result<(), AppError> {
        self.ensure_owned(self.db, offerer_uid, offerer_user_id).await?;
        self.ensure_owned(self.db, offeree_uid, offeree_user_id).await?;
        self.ensure_unlocked(offerer_uid).await?;
        self.ensure_unlocked(offeree_uid).await?;

        let flags = InGameRepository::new(self.db);
        if flags.is_active(guild_id, offerer_user_id).await?
            || flags.is_active(guild_id, offeree_user_id).await?
        {
            return Err(DomainError::AlreadyInGame.into());
        }
        Ok(())
    }

    /// Opens the trade after a final exclusivity re-check.
    ///
    /// Both participants must have the in-game flag cleared; opening sets
    /// it for both until the trade reaches a terminal state.
    pub async fn open(
        &self,
        guild_id: i64,
        offerer_user_id: i64,
        offerer_uid: i64,
        offeree_user_id: i64,
        offeree_uid: i64,
    ) -> Result<entity::trade::Model, AppError> {
        self.check_offer(guild_id, offerer_user_id, offerer_uid, offeree_user_id, offeree_uid)
            .await?;

        let trade = TradeRepository::new(self.db)
            .insert_open(guild_id, offerer_user_id, offerer_uid, offeree_user_id, offeree_uid)
            .await?;

        let flags = InGameRepository::new(self.db);
        flags.set(guild_id, offerer_user_id, true).await?;
        flags.set(guild_id, offeree_user_id, true).await?;
        Ok(trade)
    }

    /// Accepts an open trade: swaps both owners and closes the row in one
    /// database transaction.
    pub async fn accept(&self, trade_id: i32) -> Result<entity::trade::Model, AppError> {
        let trade = self.load_open(trade_id).await?;

        // Ownership may have drifted since the offer opened.
        self.ensure_owned(self.db, trade.offerer_uid, trade.offerer_user_id).await?;
        self.ensure_owned(self.db, trade.offeree_uid, trade.offeree_user_id).await?;

        let txn = self.db.begin().await?;

        let cards = CardInstanceRepository::new(&txn);
        cards.set_owner(trade.offerer_uid, trade.offeree_user_id).await?;
        cards.set_owner(trade.offeree_uid, trade.offerer_user_id).await?;

        let closed = TradeRepository::new(&txn)
            .set_state(trade.id, trade_state::ACCEPTED)
            .await?;

        txn.commit().await?;
        self.release_participants(&trade).await?;
        Ok(closed)
    }

    /// Declines an open trade. Used both for the offeree's decline and the
    /// offerer's cancel.
    pub async fn decline(&self, trade_id: i32) -> Result<entity::trade::Model, AppError> {
        let trade = self.load_open(trade_id).await?;
        let closed = TradeRepository::new(self.db)
            .set_state(trade.id, trade_state::DECLINED)
            .await?;
        self.release_participants(&trade).await?;
        Ok(closed)
    }

    /// Expires an open trade on dialog timeout. Already-closed trades are
    /// left alone.
    pub async fn expire(&self, trade_id: i32) -> Result<(), AppError> {
        let repo = TradeRepository::new(self.db);
        match repo.find(trade_id).await? {
            Some(trade) if trade.state == trade_state::OPEN => {
                repo.set_state(trade.id, trade_state::EXPIRED).await?;
                self.release_participants(&trade).await?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Expires every open trade older than the offer timeout.
    ///
    /// Backstop for offers whose dialog task died before finalizing.
    pub async fn expire_stale(&self) -> Result<u64, AppError> {
        let cutoff = Utc::now() - Duration::seconds(OFFER_TIMEOUT_SECS);
        let repo = TradeRepository::new(self.db);

        let stale = repo.open_older_than(cutoff).await?;
        let count = stale.len() as u64;
        for trade in stale {
            repo.set_state(trade.id, trade_state::EXPIRED).await?;
            self.release_participants(&trade).await?;
        }
        Ok(count)
    }

    async fn load_open(&self, trade_id: i32) -> Result<entity::trade::Model, AppError> {
        let trade = TradeRepository::new(self.db)
            .find(trade_id)
            .await?
            .ok_or(DomainError::CardNotInTrade { uid: 0 })?;

        if trade.state != trade_state::OPEN {
            return Err(DomainError::CardNotInTrade { uid: trade.offerer_uid }.into());
        }
        Ok(trade)
    }

    async fn ensure_owned<C: ConnectionTrait>(
        &self,
        db: &C,
        uid: i64,
        expected_owner: i64,
    ) -> Result<(), AppError> {
        let card = CardInstanceRepository::new(db)
            .find_by_uid(uid)
            .await?
            .ok_or(DomainError::CardNotInTrade { uid })?;

        if card.owner_user_id != expected_owner {
            return Err(DomainError::CardNotInTrade { uid }.into());
        }
        Ok(())
    }

    /// Clears the in-game flag of both participants of a closed trade.
    async fn release_participants(&self, trade: &entity::trade::Model) -> Result<(), AppError> {
        let flags = InGameRepository::new(self.db);
        flags.set(trade.guild_id, trade.offerer_user_id, false).await?;
        flags.set(trade.guild_id, trade.offeree_user_id, false).await?;
        Ok(())
    }

    async fn ensure_unlocked(&self, uid: i64) -> Result<(), AppError> {
        if TradeRepository::new(self.db).open_trade_for_uid(uid).await?.is_some() {
            return Err(DomainError::AlreadyInTrade { uid }.into());
        }
        Ok(())
    }
}
