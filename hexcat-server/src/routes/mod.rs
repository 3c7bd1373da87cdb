//! HTTP route handlers

pub mod error;
pub mod game;
pub mod reports;
pub mod status;
