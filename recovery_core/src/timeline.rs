//! Recovery timeline sampling and CSV export.
//!
//! A timeline samples the composite scores at a fixed day step so callers can
//! chart the expected curve. Export writes one CSV row per sample.

use crate::aggregator::RecoveryAggregator;
use crate::phase::classify_phase;
use crate::{Error, Result, UsageProfile};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Largest number of samples a single timeline may hold
pub const MAX_TIMELINE_POINTS: u64 = 100_000;

/// One sampled day
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TimelinePoint {
    pub day: u32,
    pub overall: f64,
    pub neurological: f64,
    pub physical: f64,
    pub phase: &'static str,
}

/// Sample the default model from `from_day` to `to_day` inclusive
pub fn timeline(
    profile: &UsageProfile,
    from_day: u32,
    to_day: u32,
    step: u32,
) -> Result<Vec<TimelinePoint>> {
    timeline_with(&RecoveryAggregator::default(), profile, from_day, to_day, step)
}

/// Sample `aggregator` from `from_day` to `to_day` inclusive, every `step` days
///
/// `to_day` is always included even when the step does not land on it.
pub fn timeline_with(
    aggregator: &RecoveryAggregator<'_>,
    profile: &UsageProfile,
    from_day: u32,
    to_day: u32,
    step: u32,
) -> Result<Vec<TimelinePoint>> {
    if step == 0 {
        return Err(Error::InvalidTimeline("step must be at least 1 day".into()));
    }
    if from_day > to_day {
        return Err(Error::InvalidTimeline(format!(
            "start day {} is after end day {}",
            from_day, to_day
        )));
    }
    let span = u64::from(to_day - from_day);
    let step_days = u64::from(step);
    let count = span / step_days + 1 + u64::from(span % step_days != 0);
    if count > MAX_TIMELINE_POINTS {
        return Err(Error::InvalidTimeline(format!(
            "{} samples requested, at most {} allowed",
            count, MAX_TIMELINE_POINTS
        )));
    }

    let mut days: Vec<u32> = (from_day..=to_day).step_by(step as usize).collect();
    if days.last() != Some(&to_day) {
        days.push(to_day);
    }

    let mut points = Vec::with_capacity(days.len());
    for day in days {
        let breakdown = aggregator.aggregate(day as f64, profile)?;
        points.push(TimelinePoint {
            day,
            overall: breakdown.overall,
            neurological: breakdown.neurological,
            physical: breakdown.physical,
            phase: classify_phase(day).name,
        });
    }

    tracing::debug!(
        "Sampled {} timeline points between day {} and day {}",
        points.len(),
        from_day,
        to_day
    );
    Ok(points)
}

/// Write timeline points as CSV with a header row
///
/// Returns the number of rows written.
pub fn write_timeline_csv<W: Write>(points: &[TimelinePoint], writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for point in points {
        csv_writer.serialize(point)?;
    }
    csv_writer.flush()?;
    Ok(points.len())
}

/// Write timeline points to a CSV file, creating parent directories
pub fn export_timeline_csv(points: &[TimelinePoint], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let count = write_timeline_csv(points, file)?;
    tracing::info!("Exported {} timeline rows to {:?}", count, path);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProductCategory;

    fn vaper() -> UsageProfile {
        UsageProfile::new(ProductCategory::Vape, 1.5, 9.0, 6.0)
    }

    #[test]
    fn test_timeline_includes_end_day() {
        let points = timeline(&vaper(), 0, 30, 7).unwrap();
        let days: Vec<u32> = points.iter().map(|p| p.day).collect();
        assert_eq!(days, vec![0, 7, 14, 21, 28, 30]);
    }

    #[test]
    fn test_timeline_single_day() {
        let points = timeline(&vaper(), 90, 90, 5).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].phase, "Neural Rewiring");
    }

    #[test]
    fn test_timeline_is_non_decreasing() {
        let points = timeline(&vaper(), 0, 365, 1).unwrap();
        for pair in points.windows(2) {
            assert!(pair[1].overall >= pair[0].overall);
        }
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(matches!(
            timeline(&vaper(), 0, 10, 0),
            Err(Error::InvalidTimeline(_))
        ));
        assert!(matches!(
            timeline(&vaper(), 20, 10, 1),
            Err(Error::InvalidTimeline(_))
        ));
    }

    #[test]
    fn test_oversized_range_rejected() {
        match timeline(&vaper(), 0, u32::MAX, 1) {
            Err(Error::InvalidTimeline(msg)) => assert!(msg.contains("at most")),
            other => panic!("expected InvalidTimeline, got {:?}", other.map(|p| p.len())),
        }
        // A coarse step over the same span is fine.
        let points = timeline(&vaper(), 0, u32::MAX, u32::MAX / 4).unwrap();
        assert_eq!(points.len(), 6);
        assert_eq!(points.last().map(|p| p.day), Some(u32::MAX));
    }

    #[test]
    fn test_csv_output() {
        let points = timeline(&vaper(), 0, 14, 7).unwrap();
        let mut buffer = Vec::new();
        let rows = write_timeline_csv(&points, &mut buffer).unwrap();
        assert_eq!(rows, 3);

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("day,overall,neurological,physical,phase")
        );
        assert!(lines.next().unwrap().starts_with("0,0.0,0.0,0.0,Nicotine Clearance"));
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("timeline.csv");
        let points = timeline(&vaper(), 0, 60, 30).unwrap();

        let rows = export_timeline_csv(&points, &path).unwrap();
        assert_eq!(rows, 3);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Receptor Rebalancing"));
    }
}
