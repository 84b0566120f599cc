//! dashboard
//!
//! Everything between a typed handle and a drawn chart.
//!
//! # Modules
//!
//! - [`lookup`]: profile and repository fetching with request sequencing
//! - [`charts`]: pure chart data derivations
//! - [`theme`]: colour palettes
//! - [`chart_spec`]: JSON chart configuration for an external renderer

pub mod chart_spec;
pub mod charts;
pub mod lookup;
pub mod theme;

pub use charts::{derive, ChartData, ChartKind};
pub use lookup::{DashboardState, LookupController, LookupError, LookupOutcome};
pub use theme::Theme;
