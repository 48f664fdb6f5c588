#![forbid(unsafe_code)]

//! Core recovery model for people who have stopped using nicotine.
//!
//! This crate provides:
//! - Domain types (product categories, usage profiles, metrics, phases)
//! - The saturating recovery curve and the metric registry
//! - Weighted aggregation, trends, milestones and projections
//! - Progress statistics (time clean, savings, life regained)
//! - Unit conversion for display
//! - Configuration, logging and timeline export for embedding binaries
//!
//! All calculations are pure functions of their arguments.

pub mod types;
pub mod error;
pub mod model;
pub mod registry;
pub mod phase;
pub mod units;
pub mod aggregator;
pub mod messages;
pub mod stats;
pub mod timeline;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use model::{recover, saturating_recovery, DEFAULT_STEEPNESS};
pub use registry::{build_default_registry, get_default_registry};
pub use phase::{classify_phase, phase_progress, PhaseProgress, RECOVERY_PHASES};
pub use units::{display_units, DisplayQuantity};
pub use aggregator::{
    aggregate_recovery, MetricStatus, Projections, RecoveryAggregator, RecoveryBreakdown, Trend,
};
pub use messages::recovery_message;
pub use stats::{
    compute_progress_stats, compute_recovery, days_clean, normalize_daily_units, CleanTime,
    ProgressStats, ProgressStatsCalculator, RecoveryResult, SavingsProjection,
};
pub use timeline::{export_timeline_csv, timeline, write_timeline_csv, TimelinePoint};
pub use config::Config;
