//! Domain services built on top of the repository layer.
//!
//! Services own the business rules (validation, atomicity, state machine
//! transitions) and leave raw persistence to `crate::data`.

pub mod banner;
pub mod cards;
pub mod economy;
pub mod leveling;
pub mod moderation;
pub mod settings;
pub mod trade;

#[cfg(test)]
mod test;
