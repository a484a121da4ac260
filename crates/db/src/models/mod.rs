//! Database models for Corkboard.
//!
//! One module per table. Each model owns its query functions; handlers in
//! the server crate never touch SQL directly.

pub mod board;
pub mod card;
pub mod list;
pub mod session;
pub mod user;
