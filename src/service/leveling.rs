use sea_orm::DatabaseConnection;

use crate::data::level::LevelRepository;
use crate::error::AppError;

/// Hard rank ceilings.
pub const MAX_LEVEL: i32 = 100;
pub const MAX_PRESTIGE: i32 = 10;

/// Extra XP required per level gained.
const EXP_NEED_STEP: i64 = 50;

/// Outcome of applying message XP when the member crossed a level
/// boundary. Fed into the announcement listener over the event bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUp {
    pub guild_id: i64,
    pub user_id: i64,
    pub last_level: i32,
    pub level: i32,
    pub prestige: i32,
    pub exp_now: i64,
    pub exp_need: i64,
    pub can_prestige: bool,
}

pub struct LevelingService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> LevelingService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Accrues message XP for a member.
    ///
    /// Levels are raised while the accrued XP covers the requirement,
    /// carrying the remainder over. At level 100 the XP saturates at
    /// `exp_need`, which is the prestige-eligible state.
    ///
    /// # Returns
    /// - `Ok(Some(LevelUp))` - the message crossed a level boundary
    /// - `Ok(None)` - plain accrual
    pub async fn apply_message_exp(
        &self,
        guild_id: i64,
        user_id: i64,
        exp: i64,
    ) -> Result<Option<LevelUp>, AppError> {
        let repo = LevelRepository::new(self.db);
        let row = repo.get_or_create(guild_id, user_id).await?;

        let last_level = row.level;
        let mut level = row.level;
        let mut exp_need = row.exp_need;
        let mut exp_now = row.exp_now + exp;

        while exp_now >= exp_need && level < MAX_LEVEL {
            exp_now -= exp_need;
            level += 1;
            exp_need += EXP_NEED_STEP;
        }
        if level == MAX_LEVEL && exp_now > exp_need {
            exp_now = exp_need;
        }

        let prestige = row.prestige;
        let updated = repo.save_progress(row, prestige, level, exp_need, exp_now).await?;

        if updated.level == last_level {
            return Ok(None);
        }

        Ok(Some(LevelUp {
            guild_id,
            user_id,
            last_level,
            level: updated.level,
            prestige: updated.prestige,
            exp_now: updated.exp_now,
            exp_need: updated.exp_need,
            can_prestige: can_prestige(&updated),
        }))
    }

    /// Increments prestige if the member is in the eligible state.
    ///
    /// # Returns
    /// - `Ok(Some(model))` - prestige raised, rank reset to level 1
    /// - `Ok(None)` - member is not prestige-eligible
    pub async fn prestige(
        &self,
        guild_id: i64,
        user_id: i64,
    ) -> Result<Option<entity::level::Model>, AppError> {
        let repo = LevelRepository::new(self.db);
        let Some(row) = repo.find(guild_id, user_id).await? else {
            return Ok(None);
        };

        if !can_prestige(&row) {
            return Ok(None);
        }

        let prestige = row.prestige + 1;
        let updated = repo
            .save_progress(row, prestige, 1, crate::data::level::BASE_EXP_NEED, 0)
            .await?;
        Ok(Some(updated))
    }
}

/// Whether the row is in the prestige-eligible state.
pub fn can_prestige(row: &entity::level::Model) -> bool {
    row.level == MAX_LEVEL && row.exp_now == row.exp_need && row.prestige < MAX_PRESTIGE
}
