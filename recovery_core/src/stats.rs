//! Progress statistics computed from a quit date and a usage profile.
//!
//! This is the entry point collaborators call: it turns elapsed time into
//! day/hour/minute buckets, savings and life regained, and delegates the
//! biological modelling to the aggregator.

use crate::aggregator::{RecoveryAggregator, RecoveryBreakdown};
use crate::messages::recovery_message;
use crate::model::round_to;
use crate::phase::{classify_phase, phase_progress, PhaseProgress};
use crate::{Error, RecoveryPhase, Result, UsageBasis, UsageProfile};
use chrono::{DateTime, Utc};
use serde::Serialize;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3_600;
const SECONDS_PER_DAY: u64 = 86_400;

/// Elapsed-time totals, savings and health score
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ProgressStats {
    pub days_clean: u32,
    pub hours_clean: u64,
    pub minutes_clean: u64,
    pub seconds_clean: u64,
    pub units_avoided: f64,
    pub money_saved: f64,
    pub life_regained_hours: f64,
    pub health_score: f64,
}

/// Elapsed time split into display components
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct CleanTime {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl ProgressStats {
    /// Split `seconds_clean` into days, hours (0-23), minutes and seconds (0-59)
    pub fn clean_time(&self) -> CleanTime {
        let s = self.seconds_clean;
        CleanTime {
            days: s / SECONDS_PER_DAY,
            hours: (s % SECONDS_PER_DAY) / SECONDS_PER_HOUR,
            minutes: (s % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE,
            seconds: s % SECONDS_PER_MINUTE,
        }
    }

    /// Life regained expressed in whole days
    pub fn life_regained_days(&self) -> f64 {
        round_to(self.life_regained_hours / 24.0, 1)
    }
}

/// Money and units not spent over one horizon
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SavingsHorizon {
    pub days: u32,
    pub money: f64,
    pub units: f64,
}

/// Forward savings at a week, a month and a year
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SavingsProjection {
    pub week: SavingsHorizon,
    pub month: SavingsHorizon,
    pub year: SavingsHorizon,
}

impl SavingsProjection {
    pub fn from_profile(profile: &UsageProfile) -> Result<Self> {
        let daily_units = normalize_daily_units(profile)?;
        let horizon = |days: u32| SavingsHorizon {
            days,
            money: round_to(days as f64 * profile.daily_cost, 2),
            units: round_to(days as f64 * daily_units, 1),
        };
        Ok(Self {
            week: horizon(7),
            month: horizon(30),
            year: horizon(365),
        })
    }
}

/// Everything derived for one point in time
#[derive(Clone, Debug, Serialize)]
pub struct RecoveryResult {
    pub stats: ProgressStats,
    pub phase: &'static RecoveryPhase,
    pub phase_progress: PhaseProgress,
    pub message: &'static str,
    pub breakdown: RecoveryBreakdown,
    pub savings: SavingsProjection,
}

/// Convert the profile's recorded consumption into native units per day
pub fn normalize_daily_units(profile: &UsageProfile) -> Result<f64> {
    profile.validate()?;
    let daily = match profile.category.config().usage_basis {
        UsageBasis::UnitsPerDay => profile.units,
        UsageBasis::PackagesPerWeek { units_per_package } => {
            let packages_per_day = profile.units / 7.0;
            packages_per_day * units_per_package
        }
    };
    Ok(daily)
}

/// Whole seconds between the quit date and `now`
///
/// Fails with [`Error::InvalidCessationDate`] when the quit date is in the future.
pub fn seconds_clean(now: DateTime<Utc>, quit_at: DateTime<Utc>) -> Result<u64> {
    if quit_at > now {
        return Err(Error::InvalidCessationDate { quit_at, now });
    }
    Ok((now - quit_at).num_seconds().max(0) as u64)
}

/// Full days between the quit date and `now`
pub fn days_clean(now: DateTime<Utc>, quit_at: DateTime<Utc>) -> Result<u32> {
    let seconds = seconds_clean(now, quit_at)?;
    Ok(u32::try_from(seconds / SECONDS_PER_DAY).unwrap_or(u32::MAX))
}

/// Computes progress from timestamps using a configurable aggregator
#[derive(Clone, Copy, Debug)]
pub struct ProgressStatsCalculator<'a> {
    aggregator: RecoveryAggregator<'a>,
}

impl Default for ProgressStatsCalculator<'static> {
    fn default() -> Self {
        Self::new(RecoveryAggregator::default())
    }
}

impl<'a> ProgressStatsCalculator<'a> {
    pub fn new(aggregator: RecoveryAggregator<'a>) -> Self {
        Self { aggregator }
    }

    pub fn compute(
        &self,
        now: DateTime<Utc>,
        quit_at: DateTime<Utc>,
        profile: &UsageProfile,
    ) -> Result<ProgressStats> {
        self.compute_with_breakdown(now, quit_at, profile)
            .map(|(stats, _)| stats)
    }

    pub fn compute_recovery(
        &self,
        now: DateTime<Utc>,
        quit_at: DateTime<Utc>,
        profile: &UsageProfile,
    ) -> Result<RecoveryResult> {
        let (stats, breakdown) = self.compute_with_breakdown(now, quit_at, profile)?;
        let days = stats.days_clean;

        Ok(RecoveryResult {
            phase: classify_phase(days),
            phase_progress: phase_progress(days),
            message: recovery_message(days),
            savings: SavingsProjection::from_profile(profile)?,
            breakdown,
            stats,
        })
    }

    fn compute_with_breakdown(
        &self,
        now: DateTime<Utc>,
        quit_at: DateTime<Utc>,
        profile: &UsageProfile,
    ) -> Result<(ProgressStats, RecoveryBreakdown)> {
        let seconds_clean = seconds_clean(now, quit_at)?;
        let daily_units = normalize_daily_units(profile)?;

        let days_clean = u32::try_from(seconds_clean / SECONDS_PER_DAY).unwrap_or(u32::MAX);
        let days = days_clean as f64;

        let units_avoided = days * daily_units;
        let money_saved = days * profile.daily_cost;
        let life_regained_hours =
            units_avoided * profile.category.config().minutes_per_unit / 60.0;

        let breakdown = self.aggregator.aggregate(days, profile)?;

        tracing::debug!(
            "Computed progress for {} ({} days clean, {:.1} units avoided)",
            profile.category,
            days_clean,
            units_avoided
        );

        let stats = ProgressStats {
            days_clean,
            hours_clean: seconds_clean / SECONDS_PER_HOUR,
            minutes_clean: seconds_clean / SECONDS_PER_MINUTE,
            seconds_clean,
            units_avoided: round_to(units_avoided, 1),
            money_saved: round_to(money_saved, 2),
            life_regained_hours: round_to(life_regained_hours, 1),
            health_score: breakdown.overall,
        };

        Ok((stats, breakdown))
    }
}

/// Compute progress statistics with the default model
pub fn compute_progress_stats(
    now: DateTime<Utc>,
    quit_at: DateTime<Utc>,
    profile: &UsageProfile,
) -> Result<ProgressStats> {
    ProgressStatsCalculator::default().compute(now, quit_at, profile)
}

/// Compute the full recovery result with the default model
pub fn compute_recovery(
    now: DateTime<Utc>,
    quit_at: DateTime<Utc>,
    profile: &UsageProfile,
) -> Result<RecoveryResult> {
    ProgressStatsCalculator::default().compute_recovery(now, quit_at, profile)
}
