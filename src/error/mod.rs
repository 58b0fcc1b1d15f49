//! Error types for the bot.
//!
//! `AppError` is the top-level aggregate wrapping infrastructure failures;
//! `DomainError` covers command-visible domain failures that get converted
//! into localized error embeds instead of aborting the handler.

pub mod config;
pub mod domain;

use thiserror::Error;

pub use config::ConfigError;
pub use domain::DomainError;

/// Top-level application error type.
///
/// Aggregates all error types that can occur in the application. Most
/// variants use `#[from]` for automatic conversion. Domain errors are kept
/// as a distinct variant so command handlers can pattern-match and reply
/// with a localized embed rather than logging a failure.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Command-visible domain failure (insufficient funds, locked card, ...).
    #[error(transparent)]
    DomainErr(#[from] DomainError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// HTTP client request error from reqwest.
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// JSON decode error while reading locale files or stored embed forms.
    #[error(transparent)]
    JsonErr(#[from] serde_json::Error),

    /// Internal error with custom message.
    #[error("{0}")]
    InternalError(String),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

impl AppError {
    /// Returns the domain error inside, if this is one.
    ///
    /// Command dispatch uses this to decide between an ephemeral localized
    /// error embed (domain failure) and a warning log (infrastructure).
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::DomainErr(e) => Some(e),
            _ => None,
        }
    }
}
