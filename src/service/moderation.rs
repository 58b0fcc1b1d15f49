use chrono::{DateTime, Duration, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::data::moderation::{
    punishment, GlobalBanRepository, ModerationStatRepository, WarnRepository,
};
use crate::error::{AppError, DomainError};

/// Longest finite ban, about 31 days.
pub const MAX_BAN_MINUTES: i64 = 44_640;

/// Longest timeout the platform accepts, 28 days.
pub const MAX_TIMEOUT_MINUTES: i64 = 40_320;

/// Parses a free-form duration of the shape `<int><unit>`.
///
/// Units: `m` minutes, `h` hours, `d` days, `w` weeks. Anything else, a
/// missing number, or a total above `cap_minutes` is rejected.
pub fn parse_duration(input: &str, cap_minutes: i64) -> Result<Duration, DomainError> {
    let input = input.trim();
    let invalid = || DomainError::InvalidDuration(input.to_string());

    let split = input
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .ok_or_else(invalid)?;

    let (digits, unit) = input.split_at(split);
    let value: i64 = digits.parse().map_err(|_| invalid())?;
    if value == 0 {
        return Err(invalid());
    }

    let minutes = match unit {
        "m" => value,
        "h" => value.checked_mul(60).ok_or_else(invalid)?,
        "d" => value.checked_mul(1_440).ok_or_else(invalid)?,
        "w" => value.checked_mul(10_080).ok_or_else(invalid)?,
        _ => return Err(invalid()),
    };

    if minutes > cap_minutes {
        return Err(invalid());
    }

    Ok(Duration::minutes(minutes))
}

/// Validates `clear` arguments: count in 2..=100 messages, within the last
/// 1..=14 days.
pub fn validate_clear(count: u8, days: u8) -> Result<(), DomainError> {
    if !(2..=100).contains(&count) || !(1..=14).contains(&days) {
        return Err(DomainError::ClearOutOfRange { count, days });
    }
    Ok(())
}

pub struct ModerationService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ModerationService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a ban and bumps both sides' ban counters.
    ///
    /// `duration` of `None` records a permanent ban the reaper never
    /// expires. The platform-side ban call is the command handler's job;
    /// this only owns the persistent state.
    pub async fn add_ban(
        &self,
        guild_id: i64,
        user_id: i64,
        moderator_id: i64,
        reason: &str,
        duration: Option<Duration>,
    ) -> Result<entity::global_ban::Model, AppError> {
        let unban_at = duration.map(|d| Utc::now() + d);

        let txn = self.db.begin().await?;

        let ban = GlobalBanRepository::new(&txn)
            .insert(guild_id, user_id, moderator_id, reason, unban_at)
            .await?;

        let stats = ModerationStatRepository::new(&txn);
        stats.increment_given(guild_id, moderator_id, punishment::BAN).await?;
        stats.increment_received(guild_id, user_id, punishment::BAN).await?;

        txn.commit().await?;
        Ok(ban)
    }

    /// Records a warn under the next guild-scoped case number and bumps
    /// both sides' warn counters.
    pub async fn add_warn(
        &self,
        guild_id: i64,
        user_id: i64,
        moderator_id: i64,
        reason: &str,
    ) -> Result<entity::warn::Model, AppError> {
        let txn = self.db.begin().await?;

        let warns = WarnRepository::new(&txn);
        let case_number = warns.next_case_number(guild_id).await?;
        let warn = warns.insert(case_number, guild_id, user_id, moderator_id, reason).await?;

        let stats = ModerationStatRepository::new(&txn);
        stats.increment_given(guild_id, moderator_id, punishment::WARN).await?;
        stats.increment_received(guild_id, user_id, punishment::WARN).await?;

        txn.commit().await?;
        Ok(warn)
    }

    /// Removes a warn by case number.
    pub async fn remove_warn(&self, guild_id: i64, case_number: i32) -> Result<bool, AppError> {
        let removed = WarnRepository::new(self.db).remove_by_case(guild_id, case_number).await?;
        Ok(removed)
    }

    /// Records a timeout in the punishment counters.
    pub async fn record_timeout(
        &self,
        guild_id: i64,
        user_id: i64,
        moderator_id: i64,
    ) -> Result<(), AppError> {
        let stats = ModerationStatRepository::new(self.db);
        stats.increment_given(guild_id, moderator_id, punishment::TIMEOUT).await?;
        stats.increment_received(guild_id, user_id, punishment::TIMEOUT).await?;
        Ok(())
    }

    /// Bans whose expiry has passed, for the unban reaper.
    pub async fn due_bans(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<entity::global_ban::Model>, AppError> {
        Ok(GlobalBanRepository::new(self.db).due(now).await?)
    }

    /// Purges one ban record after the reaper handled it.
    pub async fn purge_ban(&self, id: i32) -> Result<(), AppError> {
        GlobalBanRepository::new(self.db).delete(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_unit() {
        assert_eq!(parse_duration("30m", MAX_BAN_MINUTES).unwrap(), Duration::minutes(30));
        assert_eq!(parse_duration("2h", MAX_BAN_MINUTES).unwrap(), Duration::hours(2));
        assert_eq!(parse_duration("3d", MAX_BAN_MINUTES).unwrap(), Duration::days(3));
        assert_eq!(parse_duration("2w", MAX_BAN_MINUTES).unwrap(), Duration::weeks(2));
    }

    #[test]
    fn rejects_malformed_input() {
        for input in ["", "h", "10", "10x", "-5m", "1.5h", "m10"] {
            assert!(parse_duration(input, MAX_BAN_MINUTES).is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn rejects_zero_and_over_cap() {
        assert!(parse_duration("0m", MAX_BAN_MINUTES).is_err());
        assert!(parse_duration("44640m", MAX_BAN_MINUTES).is_ok());
        assert!(parse_duration("44641m", MAX_BAN_MINUTES).is_err());
        // Timeout cap is tighter than the ban cap.
        assert!(parse_duration("4w", MAX_TIMEOUT_MINUTES).is_ok());
        assert!(parse_duration("5w", MAX_TIMEOUT_MINUTES).is_err());
    }

    #[test]
    fn clear_bounds() {
        assert!(validate_clear(2, 1).is_ok());
        assert!(validate_clear(100, 14).is_ok());
        assert!(validate_clear(1, 7).is_err());
        assert!(validate_clear(101, 7).is_err());
        assert!(validate_clear(50, 0).is_err());
        assert!(validate_clear(50, 15).is_err());
    }
}
