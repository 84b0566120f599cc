//! core
//!
//! Core domain types and configuration for githunts.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Handle, PageSize
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid lookups from reaching the network
//! - Config schemas are strict and reject unknown keys

pub mod config;
pub mod types;
