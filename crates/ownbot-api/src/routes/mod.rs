//! API route modules.

pub mod admin;
pub mod chat;
pub mod clients;
pub mod documents;
pub mod meta;
pub mod numbers;
pub mod subscriptions;
