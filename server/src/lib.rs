//! Game backend: `/play`, `/leaderboard`, `/submit_score`.
//!
//! Exposed as a library so the client crate can boot a real instance in its
//! end-to-end tests.

pub mod bot;
pub mod config;
pub mod routes;
pub mod state;
pub mod store;
