//! # Authentication Endpoints
//!
//! Login with the per-account lockout machine, administrative unlock, and
//! user administration.

pub mod handlers;
pub mod users;
