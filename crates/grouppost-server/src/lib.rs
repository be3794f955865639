//! grouppost-server
//!
//! HTTP surface of the group posting service: OAuth callback, group listing,
//! single and fan-out posting, and the static client.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
