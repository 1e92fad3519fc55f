//! Outbound delivery channels. Currently email over SMTP.

pub mod email;
