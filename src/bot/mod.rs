//! Serenity wiring: event handler, slash-command tree, embeds, and the
//! level-up announcement listener.

pub mod announce;
pub mod commands;
pub mod embeds;
pub mod handler;
pub mod start;
