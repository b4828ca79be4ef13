//! `mb-domain`: types shared by every makebridge crate: the error type,
//! configuration and structured trace events.

pub mod config;
pub mod error;
pub mod trace;
