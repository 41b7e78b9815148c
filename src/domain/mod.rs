//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `catalog` - Insurance products and category mapping
//! - `chat` - Chat sessions, rule-based replies, recommendation formatting
//! - `lead` - Customer intake records

pub mod catalog;
pub mod chat;
pub mod foundation;
pub mod lead;
