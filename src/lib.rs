//! githunts - GitHub profiles and repository activity charts
//!
//! githunts looks up a GitHub user, fetches their most recently updated
//! repositories, and derives chart data from both. A dashboard view is
//! gated on a signed-in identity, which may come from either of two
//! independent sources: a personal-access-token account or a local
//! email session.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, dispatches)
//! - [`dashboard`] - Lookups, request sequencing, chart derivation
//! - [`auth`] - Identity sources, reconciliation, error translation
//! - [`github`] - GitHub REST API client and mock
//! - [`core`] - Strong types and configuration
//! - [`secrets`] - Secret storage abstraction
//! - [`ui`] - Output, prompts, and terminal charts
//!
//! # Invariants
//!
//! 1. The dashboard is never shown while authentication is still loading
//! 2. A response for an older lookup never overwrites a newer one
//! 3. Chart derivations are pure and never fail on empty input
//! 4. Tokens are never printed or logged

pub mod auth;
pub mod cli;
pub mod core;
pub mod dashboard;
pub mod github;
pub mod secrets;
pub mod ui;
