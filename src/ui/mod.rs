//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`prompts`] - Interactive prompts
//! - [`output`] - Output formatting and display
//! - [`chart_text`] - Terminal rendering of chart data
//!
//! # Design
//!
//! All user-facing output and prompts go through this module so that quiet
//! mode and non-interactive runs behave consistently.

pub mod chart_text;
pub mod output;
pub mod prompts;
