//! # Data Transfer Objects
//!
//! Request and response types for the HTTP surface.

pub mod auth;
pub mod reports;
pub mod users;
pub mod works;
