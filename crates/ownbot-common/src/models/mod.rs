//! Core domain models shared across all OwnBot services.
//!
//! These are the "truth" types — what the database stores and the API serializes.
//! Every model carries a UUID v7 for a globally unique, time-sortable identifier.

pub mod chat;
pub mod client;
pub mod document;
pub mod number;
pub mod subscription;

/// Re-export all model types for convenience.
pub use chat::*;
pub use client::*;
pub use document::*;
pub use number::*;
pub use subscription::*;
