use thiserror::Error;

/// Domain errors surfaced to the command invoker as localized error embeds.
///
/// Raised by services during command handling and converted by the
/// per-feature error paths into ephemeral replies. Each variant maps to a
/// locale key via [`DomainError::locale_key`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A `remove` or `pay` would drive a balance below zero.
    #[error("not enough money: needed {needed}, have {have}")]
    NotEnoughMoney { needed: i64, have: i64 },

    /// The member has no pet.
    #[error("member has no pet")]
    DoesntHavePet,

    /// The member already has a pet.
    #[error("member already has a pet")]
    AlreadyHavePet,

    /// A card referenced by a trade transition is no longer (or was never)
    /// part of the expected trade.
    #[error("card {uid} is not available for this trade")]
    CardNotInTrade { uid: i64 },

    /// A card already sits in another open trade.
    #[error("card {uid} is already in an open trade")]
    AlreadyInTrade { uid: i64 },

    /// A stored serialized embed could not be decoded.
    #[error("failed to decode stored JSON form")]
    DecodeJson,

    /// The caller lacks every role listed in the per-command override.
    #[error("caller lacks all of the required roles")]
    DoesntHaveAgreedRole { required_roles: Vec<u64> },

    /// The referenced member could not be resolved.
    #[error("member not found")]
    MemberNotFound,

    /// The member is already participating in a game, trade, or pending
    /// confirmation.
    #[error("member is already in a game")]
    AlreadyInGame,

    /// Free-form duration failed validation.
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// Bulk-delete arguments outside the allowed ranges.
    #[error("clear arguments out of range: count {count}, days {days}")]
    ClearOutOfRange { count: u8, days: u8 },

    /// The guild's boost count is too low for the banner module.
    #[error("guild needs more than {needed} boosts")]
    NotEnoughBoosts { needed: u64 },

    /// The member exhausted the hourly transfer allowance.
    #[error("transfer cooldown active")]
    TransferCooldown,

    /// The render service did not answer the status probe.
    #[error("render service is offline")]
    RenderOffline,
}

impl DomainError {
    /// Locale key of the error embed body shown to the invoker.
    pub fn locale_key(&self) -> &'static str {
        match self {
            Self::NotEnoughMoney { .. } => "errors.not_enough_money",
            Self::DoesntHavePet => "errors.doesnt_have_pet",
            Self::AlreadyHavePet => "errors.already_have_pet",
            Self::CardNotInTrade { .. } => "errors.card_not_in_trade",
            Self::AlreadyInTrade { .. } => "errors.already_in_trade",
            Self::DecodeJson => "errors.decode_json",
            Self::DoesntHaveAgreedRole { .. } => "errors.doesnt_have_agreed_role",
            Self::MemberNotFound => "errors.member_not_found",
            Self::AlreadyInGame => "errors.already_in_game",
            Self::InvalidDuration(_) => "errors.invalid_duration",
            Self::ClearOutOfRange { .. } => "errors.clear_out_of_range",
            Self::NotEnoughBoosts { .. } => "errors.not_enough_boosts",
            Self::TransferCooldown => "errors.transfer_cooldown",
            Self::RenderOffline => "errors.render_offline",
        }
    }
}
