use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::data::economy::{direction, BalanceRepository, TransactionRepository};
use crate::data::pet::PetRepository;
use crate::error::{AppError, DomainError};

/// Transfers allowed per member per rolling hour.
pub const TRANSFERS_PER_HOUR: usize = 10;

/// Pets offered by the shop: `(kind, price)`.
pub const SHOP_PETS: [(&str, i64); 4] = [("cat", 500), ("dog", 500), ("owl", 1_500), ("dragon", 5_000)];

/// Shop price for a pet kind.
pub fn pet_price(kind: &str) -> Option<i64> {
    SHOP_PETS.iter().find(|(k, _)| *k == kind).map(|(_, price)| *price)
}

const TRANSFER_WINDOW: Duration = Duration::from_secs(3600);

pub struct EconomyService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> EconomyService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Credits a member and logs one incoming transaction row.
    ///
    /// # Returns
    /// - `Ok(i64)` - Balance after the credit
    pub async fn add(
        &self,
        guild_id: i64,
        user_id: i64,
        amount: i64,
        locale_key: &str,
    ) -> Result<i64, AppError> {
        let txn = self.db.begin().await?;

        let after = BalanceRepository::new(&txn).apply(guild_id, user_id, amount).await?;
        TransactionRepository::new(&txn)
            .append(guild_id, user_id, amount, direction::INCOMING, locale_key)
            .await?;

        txn.commit().await?;
        Ok(after)
    }

    /// Debits a member and logs one outgoing transaction row.
    ///
    /// # Returns
    /// - `Ok(i64)` - Balance after the debit
    /// - `Err(AppError::DomainErr(NotEnoughMoney))` - Debit would drive the
    ///   balance below zero; state is left unchanged
    pub async fn remove(
        &self,
        guild_id: i64,
        user_id: i64,
        amount: i64,
        locale_key: &str,
    ) -> Result<i64, AppError> {
        let have = BalanceRepository::new(self.db).amount(guild_id, user_id).await?;
        if have < amount {
            return Err(DomainError::NotEnoughMoney { needed: amount, have }.into());
        }

        let txn = self.db.begin().await?;

        let after = BalanceRepository::new(&txn).apply(guild_id, user_id, -amount).await?;
        TransactionRepository::new(&txn)
            .append(guild_id, user_id, amount, direction::OUTGOING, locale_key)
            .await?;

        txn.commit().await?;
        Ok(after)
    }

    /// Moves `amount` from one member to another.
    ///
    /// Both balance mutations and both transaction rows commit in a single
    /// database transaction: either everything lands or nothing does.
    pub async fn pay(
        &self,
        guild_id: i64,
        from_user_id: i64,
        to_user_id: i64,
        amount: i64,
    ) -> Result<(), AppError> {
        let have = BalanceRepository::new(self.db).amount(guild_id, from_user_id).await?;
        if have < amount {
            return Err(DomainError::NotEnoughMoney { needed: amount, have }.into());
        }

        let txn = self.db.begin().await?;

        let balances = BalanceRepository::new(&txn);
        balances.apply(guild_id, from_user_id, -amount).await?;
        balances.apply(guild_id, to_user_id, amount).await?;

        let transactions = TransactionRepository::new(&txn);
        transactions
            .append(guild_id, from_user_id, amount, direction::OUTGOING, "transactions.pay_out")
            .await?;
        transactions
            .append(guild_id, to_user_id, amount, direction::INCOMING, "transactions.pay_in")
            .await?;

        txn.commit().await?;
        Ok(())
    }

    /// Sells the member's pet back to the shop for half its price.
    ///
    /// # Returns
    /// - `Ok((pet, refund))` - the sold pet and the amount credited
    /// - `Err(AppError::DomainErr(DoesntHavePet))` - the member owns no pet
    pub async fn sell_pet(
        &self,
        guild_id: i64,
        user_id: i64,
    ) -> Result<(entity::pet::Model, i64), AppError> {
        let Some(pet) = PetRepository::new(self.db).find(guild_id, user_id).await? else {
            return Err(DomainError::DoesntHavePet.into());
        };
        let refund = pet_price(&pet.kind).unwrap_or(0) / 2;

        let txn = self.db.begin().await?;

        PetRepository::new(&txn).delete(guild_id, user_id).await?;
        BalanceRepository::new(&txn).apply(guild_id, user_id, refund).await?;
        TransactionRepository::new(&txn)
            .append(guild_id, user_id, refund, direction::INCOMING, "transactions.sell_pet")
            .await?;

        txn.commit().await?;
        Ok((pet, refund))
    }
}

/// In-memory rolling-window limiter for the transfer command.
///
/// Volatile by design: a restart resets everyone's allowance.
pub struct TransferLimiter {
    invocations: Mutex<HashMap<(i64, i64), Vec<Instant>>>,
}

impl TransferLimiter {
    pub fn new() -> Self {
        Self {
            invocations: Mutex::new(HashMap::new()),
        }
    }

    /// Records one transfer attempt for the member.
    ///
    /// # Returns
    /// - `Err(DomainError::TransferCooldown)` - the member already made
    ///   [`TRANSFERS_PER_HOUR`] transfers in the last hour
    pub fn try_acquire(&self, guild_id: i64, user_id: i64) -> Result<(), DomainError> {
        let now = Instant::now();
        let mut map = self.invocations.lock().unwrap_or_else(|e| e.into_inner());

        let entries = map.entry((guild_id, user_id)).or_default();
        entries.retain(|at| now.duration_since(*at) < TRANSFER_WINDOW);

        if entries.len() >= TRANSFERS_PER_HOUR {
            return Err(DomainError::TransferCooldown);
        }

        entries.push(now);
        Ok(())
    }
}

impl Default for TransferLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats an amount for embeds, abbreviating anything over 999 999 with
/// an SI suffix.
pub fn format_amount(amount: i64) -> String {
    const SUFFIXES: [&str; 6] = ["k", "M", "G", "T", "P", "E"];

    if amount.abs() <= 999_999 {
        return amount.to_string();
    }

    let mut value = amount as f64;
    let mut suffix = "";
    for next in SUFFIXES {
        if value.abs() < 1000.0 {
            break;
        }
        value /= 1000.0;
        suffix = next;
    }

    let formatted = format!("{value:.1}");
    let trimmed = formatted.strip_suffix(".0").unwrap_or(&formatted);
    format!("{trimmed}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_amounts_stay_plain() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999_999), "999999");
        assert_eq!(format_amount(-999_999), "-999999");
    }

    #[test]
    fn large_amounts_get_si_suffixes() {
        assert_eq!(format_amount(1_000_000), "1M");
        assert_eq!(format_amount(1_500_000), "1.5M");
        assert_eq!(format_amount(2_300_000_000), "2.3G");
        assert_eq!(format_amount(-1_000_000), "-1M");
    }

    #[test]
    fn limiter_blocks_eleventh_transfer() {
        let limiter = TransferLimiter::new();
        for _ in 0..TRANSFERS_PER_HOUR {
            limiter.try_acquire(1, 2).unwrap();
        }
        assert_eq!(limiter.try_acquire(1, 2), Err(DomainError::TransferCooldown));

        // Other members are unaffected.
        limiter.try_acquire(1, 3).unwrap();
    }
}
