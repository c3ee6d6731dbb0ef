//! CLI subcommand definitions

use clap::Subcommand;

/// Dashboard views. Every view recomputes from the full dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub(crate) enum Commands {
    /// Overall KPI summary (default)
    Summary,
    /// Per-department completion and SLA compliance rates
    Department,
    /// Daily KPI trend
    Daily,
    /// Weekly KPI trend
    Weekly,
    /// Monthly KPI trend
    Monthly,
    /// Show the loaded task records
    Records,
}
