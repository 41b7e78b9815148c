//! PolicyPal - Insurance lead capture with a conversational assistant
//!
//! This crate keeps per-visitor chat sessions, answers through a remote
//! chat-completion model with a rule-based fallback, and splices catalog
//! product recommendations into every reply.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
