//! `tenantrelay-core`: shared building blocks.
//!
//! This crate contains identifiers and the error model shared by the relay
//! crates (no dispatch or infrastructure concerns).

pub mod error;
pub mod id;

pub use error::CoreError;
pub use id::{ChannelId, MessageId, TenantId, UserId};
