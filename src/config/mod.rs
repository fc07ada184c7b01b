//! Application configuration loaded from environment variables.
//!
//! JWT settings live in `gatehouse-auth` and cache settings in
//! `gatehouse-cache`, next to the code they parameterize.

pub mod audit;
pub mod cors;
