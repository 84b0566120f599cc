//! github
//!
//! Access to the GitHub REST API.
//!
//! # Architecture
//!
//! The `GitHubApi` trait defines the three reads githunts performs: a
//! public profile, a user's most recently updated repositories, and the
//! owner of a personal access token. Commands depend on the trait; the
//! dashboard and auth layers never import the HTTP client directly.
//!
//! GitHub failures never compromise local state: a failed repository fetch
//! leaves a previously fetched profile in place.
//!
//! # Modules
//!
//! - `traits`: `GitHubApi` trait, record types, and `FetchError`
//! - [`client`]: `reqwest` implementation
//! - [`mock`]: in-memory implementation for deterministic tests

pub mod client;
pub mod mock;
mod traits;

pub use client::GitHubClient;
pub use traits::*;
