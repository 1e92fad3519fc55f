//! Request handlers, one module per resource.

pub mod admin_newsletters;
pub mod admin_proposals;
pub mod auth;
pub mod calendar;
pub mod collaborations;
pub mod newsletters;
pub mod proposals;
