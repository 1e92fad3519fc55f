//! Shared domain types for the Frames marketplace.
//!
//! This crate carries everything the other workspace members agree on:
//! primitive type aliases, the domain error enum, role name constants,
//! domain event-type names, and the status state machines.

pub mod error;
pub mod events;
pub mod roles;
pub mod status;
pub mod types;
