//! Aggregation of per-metric recovery curves into composite scores.
//!
//! For a given number of days clean this module computes:
//! - Each registered metric's value, trend and distance to its next milestone
//! - Weighted overall, neurological and physical composites
//! - Projections of the overall composite at fixed horizons

use crate::model::{round_to, saturating_recovery, DEFAULT_STEEPNESS};
use crate::registry::get_default_registry;
use crate::{MetricCategory, MetricDefinition, MetricRegistry, Result, UsageProfile};
use serde::Serialize;
use std::collections::BTreeMap;

/// Look-ahead window used to classify trends, in days
pub const TREND_WINDOW_DAYS: f64 = 7.0;

/// Furthest ahead the milestone search looks, in days
pub const MILESTONE_SEARCH_DAYS: u32 = 365;

/// Gain, in percentage points, that counts as the next milestone
pub const MILESTONE_STEP: f64 = 5.0;

/// Direction a metric is heading over the next week
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Plateau,
}

/// Current state of one metric
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct MetricStatus {
    pub value: f64,
    pub trend: Trend,
    /// `None` once the metric is within a point of its ceiling, or when the
    /// next milestone lies beyond the search window
    pub days_to_next_milestone: Option<u32>,
}

/// Overall composite at fixed horizons
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Projections {
    pub days30: f64,
    pub days90: f64,
    pub days180: f64,
    pub days365: f64,
}

/// Everything the aggregator derives for one day count
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RecoveryBreakdown {
    pub metrics: BTreeMap<String, MetricStatus>,
    pub overall: f64,
    pub neurological: f64,
    pub physical: f64,
    pub projections: Projections,
}

/// Combines a metric registry into weighted recovery scores
#[derive(Clone, Copy, Debug)]
pub struct RecoveryAggregator<'a> {
    registry: &'a MetricRegistry,
    steepness: f64,
}

impl Default for RecoveryAggregator<'static> {
    fn default() -> Self {
        Self::new(get_default_registry(), DEFAULT_STEEPNESS)
    }
}

impl<'a> RecoveryAggregator<'a> {
    pub fn new(registry: &'a MetricRegistry, steepness: f64) -> Self {
        Self {
            registry,
            steepness,
        }
    }

    pub fn registry(&self) -> &'a MetricRegistry {
        self.registry
    }

    /// Unrounded value of one metric after `days`
    pub fn metric_value(&self, metric: &MetricDefinition, days: f64, harm_level: f64) -> f64 {
        saturating_recovery(
            days,
            metric.half_life.resolve(harm_level),
            metric.max_recovery,
            self.steepness,
        )
    }

    /// Unrounded weighted composite over the metrics accepted by `filter`
    pub fn composite_at<F>(&self, days: f64, harm_level: f64, filter: F) -> f64
    where
        F: Fn(&MetricDefinition) -> bool,
    {
        weighted_average(
            self.registry
                .metrics
                .iter()
                .filter(|m| filter(m))
                .map(|m| (self.metric_value(m, days, harm_level), m.weight)),
        )
    }

    /// Compute the full breakdown for `days` clean
    pub fn aggregate(&self, days: f64, profile: &UsageProfile) -> Result<RecoveryBreakdown> {
        profile.validate()?;
        let days = if days > 0.0 { days } else { 0.0 };
        let harm = profile.harm_level;

        let mut metrics = BTreeMap::new();
        for metric in &self.registry.metrics {
            let curve = |d: f64| self.metric_value(metric, d, harm);
            let current = curve(days);
            let status = MetricStatus {
                value: round_to(current, 1),
                trend: classify_trend(current, curve(days + TREND_WINDOW_DAYS)),
                days_to_next_milestone: days_to_next_milestone(curve, days, metric.max_recovery),
            };
            metrics.insert(metric.id.clone(), status);
        }

        let overall = self.composite_at(days, harm, |_| true);
        let neurological =
            self.composite_at(days, harm, |m| m.category == MetricCategory::Neurological);
        let physical = self.composite_at(days, harm, |m| m.category != MetricCategory::Neurological);

        tracing::debug!(
            "Aggregated {} metrics at day {:.1}: overall {:.2}, neurological {:.2}, physical {:.2}",
            metrics.len(),
            days,
            overall,
            neurological,
            physical
        );

        Ok(RecoveryBreakdown {
            metrics,
            overall: round_to(overall, 1),
            neurological: round_to(neurological, 1),
            physical: round_to(physical, 1),
            projections: self.projections(harm),
        })
    }

    /// Overall composite at 30, 90, 180 and 365 days
    pub fn projections(&self, harm_level: f64) -> Projections {
        let at = |days: f64| round_to(self.composite_at(days, harm_level, |_| true), 1);
        Projections {
            days30: at(30.0),
            days90: at(90.0),
            days180: at(180.0),
            days365: at(365.0),
        }
    }
}

/// Aggregate with the default registry and steepness
pub fn aggregate_recovery(days: f64, profile: &UsageProfile) -> Result<RecoveryBreakdown> {
    RecoveryAggregator::default().aggregate(days, profile)
}

/// `Σ(value · weight) / Σ(weight)`, or 0 when there is no weight
pub fn weighted_average<I>(values: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (sum, total_weight) = values
        .into_iter()
        .fold((0.0, 0.0), |(sum, total), (value, weight)| {
            (sum + value * weight, total + weight)
        });

    if total_weight > 0.0 {
        sum / total_weight
    } else {
        0.0
    }
}

/// Classify the change between now and a week ahead
pub fn classify_trend(current: f64, week_ahead: f64) -> Trend {
    let delta = week_ahead - current;
    if delta > 1.0 {
        Trend::Improving
    } else if delta > 0.1 {
        Trend::Stable
    } else {
        Trend::Plateau
    }
}

/// Days until `curve` gains another milestone step from its value at `days`
///
/// Binary search over whole-day offsets within [`MILESTONE_SEARCH_DAYS`].
pub fn days_to_next_milestone<F>(curve: F, days: f64, max_recovery: f64) -> Option<u32>
where
    F: Fn(f64) -> f64,
{
    let current = curve(days);
    if current >= max_recovery - 1.0 {
        return None;
    }
    let target = (current + MILESTONE_STEP).min(max_recovery);
    let reached = |offset: u32| curve(days + offset as f64) >= target;

    if !reached(MILESTONE_SEARCH_DAYS) {
        return None;
    }

    let (mut lo, mut hi) = (0u32, MILESTONE_SEARCH_DAYS);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if reached(mid) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    Some(lo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HalfLife, ProductCategory};

    fn smoker() -> UsageProfile {
        UsageProfile::new(ProductCategory::Cigarettes, 20.0, 15.0, 8.0)
    }

    fn two_metric_registry() -> MetricRegistry {
        MetricRegistry {
            metrics: vec![
                MetricDefinition {
                    id: "a".into(),
                    name: "A".into(),
                    category: MetricCategory::Neurological,
                    weight: 0.6,
                    max_recovery: 100.0,
                    half_life: HalfLife::Fixed(10.0),
                },
                MetricDefinition {
                    id: "b".into(),
                    name: "B".into(),
                    category: MetricCategory::Respiratory,
                    weight: 0.4,
                    max_recovery: 50.0,
                    half_life: HalfLife::Fixed(10.0),
                },
            ],
        }
    }

    #[test]
    fn test_weighted_average() {
        let overall = weighted_average([(80.0, 0.6), (40.0, 0.4)]);
        assert!((overall - 64.0).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_average_normalizes_weights() {
        let overall = weighted_average([(80.0, 3.0), (40.0, 2.0)]);
        assert!((overall - 64.0).abs() < 1e-9);
        assert_eq!(weighted_average(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_custom_registry_weighting() {
        let registry = two_metric_registry();
        let aggregator = RecoveryAggregator::new(&registry, DEFAULT_STEEPNESS);

        // At the shared half-life the metrics sit at 50 and 25.
        let breakdown = aggregator.aggregate(10.0, &smoker()).unwrap();
        assert_eq!(breakdown.metrics["a"].value, 50.0);
        assert_eq!(breakdown.metrics["b"].value, 25.0);
        assert_eq!(breakdown.overall, 40.0);
        assert_eq!(breakdown.neurological, 50.0);
        assert_eq!(breakdown.physical, 25.0);
    }

    #[test]
    fn test_overall_monotonic_in_days() {
        let aggregator = RecoveryAggregator::default();
        let profile = smoker();
        let mut previous = 0.0;
        for day in 0..=730 {
            let overall = aggregator.aggregate(day as f64, &profile).unwrap().overall;
            assert!(overall >= previous, "overall dropped at day {}", day);
            assert!((0.0..=100.0).contains(&overall));
            previous = overall;
        }
    }

    #[test]
    fn test_day_zero_is_zero() {
        let breakdown = aggregate_recovery(0.0, &smoker()).unwrap();
        assert_eq!(breakdown.overall, 0.0);
        assert!(breakdown.metrics.values().all(|m| m.value == 0.0));
    }

    #[test]
    fn test_negative_days_clamped() {
        let breakdown = aggregate_recovery(-4.0, &smoker()).unwrap();
        assert_eq!(breakdown.overall, 0.0);
    }

    #[test]
    fn test_huge_day_counts_give_finite_scores() {
        for days in [1e300, f64::MAX, f64::INFINITY] {
            let breakdown = aggregate_recovery(days, &smoker()).unwrap();
            assert!((0.0..=100.0).contains(&breakdown.overall), "days={}", days);
            assert!((0.0..=100.0).contains(&breakdown.neurological));
            assert!((0.0..=100.0).contains(&breakdown.physical));
            for status in breakdown.metrics.values() {
                assert!(status.value.is_finite());
                assert_eq!(status.trend, Trend::Plateau);
                assert_eq!(status.days_to_next_milestone, None);
            }
        }
    }

    #[test]
    fn test_harm_level_only_affects_addiction_metric() {
        let mild = UsageProfile::new(ProductCategory::Cigarettes, 20.0, 15.0, 2.0);
        let severe = UsageProfile::new(ProductCategory::Cigarettes, 20.0, 15.0, 10.0);

        let mild = aggregate_recovery(60.0, &mild).unwrap();
        let severe = aggregate_recovery(60.0, &severe).unwrap();

        for (id, status) in &mild.metrics {
            if id == crate::registry::ADDICTION_RECOVERY_ID {
                assert!(status.value > severe.metrics[id].value);
            } else {
                assert_eq!(status.value, severe.metrics[id].value, "metric {}", id);
            }
        }
        assert!(mild.overall > severe.overall);
    }

    #[test]
    fn test_addiction_half_life_scales_with_harm() {
        // harm 5 -> half-life 45 days -> half of 100 at day 45
        let profile = UsageProfile::new(ProductCategory::Vape, 2.0, 6.0, 5.0);
        let breakdown = aggregate_recovery(45.0, &profile).unwrap();
        assert_eq!(
            breakdown.metrics[crate::registry::ADDICTION_RECOVERY_ID].value,
            50.0
        );
    }

    #[test]
    fn test_projections_ignore_current_day() {
        let profile = smoker();
        let early = aggregate_recovery(1.0, &profile).unwrap();
        let late = aggregate_recovery(400.0, &profile).unwrap();
        assert_eq!(early.projections, late.projections);

        let p = &early.projections;
        assert!(p.days30 < p.days90 && p.days90 < p.days180 && p.days180 < p.days365);

        let at_30 = aggregate_recovery(30.0, &profile).unwrap();
        assert_eq!(at_30.overall, p.days30);
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let profile = UsageProfile::new(ProductCategory::Cigarettes, 20.0, 15.0, 0.0);
        assert!(matches!(
            aggregate_recovery(10.0, &profile),
            Err(crate::Error::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_trend_classification() {
        assert_eq!(classify_trend(10.0, 12.0), Trend::Improving);
        assert_eq!(classify_trend(10.0, 10.5), Trend::Stable);
        assert_eq!(classify_trend(10.0, 10.05), Trend::Plateau);
        assert_eq!(classify_trend(10.0, 11.0), Trend::Stable);
    }

    #[test]
    fn test_trends_across_the_curve() {
        let profile = smoker();
        let early = aggregate_recovery(2.0, &profile).unwrap();
        assert_eq!(early.metrics["sensory"].trend, Trend::Improving);

        let late = aggregate_recovery(5000.0, &profile).unwrap();
        assert_eq!(late.metrics["sensory"].trend, Trend::Plateau);
    }

    #[test]
    fn test_milestone_from_day_zero() {
        // cardiovascular: max 95, half-life 30 -> crosses 5.0 on day 3
        let registry = get_default_registry();
        let metric = registry.get("cardiovascular").unwrap();
        let aggregator = RecoveryAggregator::default();
        let curve = |d: f64| aggregator.metric_value(metric, d, 8.0);
        assert_eq!(days_to_next_milestone(curve, 0.0, metric.max_recovery), Some(3));
    }

    #[test]
    fn test_milestone_found_is_minimal() {
        let aggregator = RecoveryAggregator::default();
        let metric = get_default_registry().get("respiratory").unwrap();
        let curve = |d: f64| aggregator.metric_value(metric, d, 8.0);

        let days = 40.0;
        let offset = days_to_next_milestone(curve, days, metric.max_recovery).unwrap();
        let target = curve(days) + MILESTONE_STEP;
        assert!(curve(days + offset as f64) >= target);
        assert!(curve(days + offset as f64 - 1.0) < target);
    }

    #[test]
    fn test_milestone_sentinel_near_ceiling() {
        assert_eq!(days_to_next_milestone(|_| 99.5, 10.0, 100.0), None);

        let breakdown = aggregate_recovery(2000.0, &smoker()).unwrap();
        assert_eq!(breakdown.metrics["sensory"].days_to_next_milestone, None);
    }

    #[test]
    fn test_milestone_sentinel_outside_window() {
        let slow = |d: f64| saturating_recovery(d, 100_000.0, 100.0, DEFAULT_STEEPNESS);
        assert_eq!(days_to_next_milestone(slow, 0.0, 100.0), None);
    }
}
