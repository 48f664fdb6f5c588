//! Recovery phase table and classification.
//!
//! Phases are contiguous `[start_day, end_day)` intervals starting at day 0;
//! the last one is open-ended, so every day count maps to exactly one phase.

use crate::RecoveryPhase;
use serde::Serialize;

/// Ordered phase table
pub static RECOVERY_PHASES: [RecoveryPhase; 7] = [
    RecoveryPhase {
        name: "Nicotine Clearance",
        start_day: 0,
        end_day: Some(3),
        key_processes: &[
            "Nicotine and carbon monoxide leave the bloodstream",
            "Blood oxygen levels normalise",
        ],
        expected_symptoms: &["Strong cravings", "Irritability", "Restlessness"],
        expected_improvements: &["Heart rate and blood pressure drop", "Oxygen delivery improves"],
    },
    RecoveryPhase {
        name: "Acute Withdrawal",
        start_day: 3,
        end_day: Some(14),
        key_processes: &[
            "Nicotinic receptors begin to downregulate",
            "Dopamine signalling recalibrates",
        ],
        expected_symptoms: &[
            "Peak cravings",
            "Difficulty concentrating",
            "Disturbed sleep",
            "Increased appetite",
        ],
        expected_improvements: &["Taste and smell sharpen", "Breathing feels easier"],
    },
    RecoveryPhase {
        name: "Early Recovery",
        start_day: 14,
        end_day: Some(30),
        key_processes: &["Circulation improves", "Cilia in the airways regrow"],
        expected_symptoms: &["Occasional cravings triggered by routine", "Mild mood swings"],
        expected_improvements: &["More energy", "Better exercise tolerance"],
    },
    RecoveryPhase {
        name: "Receptor Rebalancing",
        start_day: 30,
        end_day: Some(90),
        key_processes: &[
            "Receptor density approaches non-user levels",
            "Reward pathways stabilise",
        ],
        expected_symptoms: &["Infrequent cravings", "Lingering habit cues"],
        expected_improvements: &["Stable mood", "Deeper sleep", "Lung function up to 30% better"],
    },
    RecoveryPhase {
        name: "Neural Rewiring",
        start_day: 90,
        end_day: Some(180),
        key_processes: &[
            "Prefrontal control over impulses strengthens",
            "New routines become automatic",
        ],
        expected_symptoms: &["Rare, short-lived cravings"],
        expected_improvements: &["Sharper focus", "Reduced coughing and shortness of breath"],
    },
    RecoveryPhase {
        name: "Consolidation",
        start_day: 180,
        end_day: Some(365),
        key_processes: &["Inflammation markers decline", "Metabolism settles"],
        expected_symptoms: &["Cravings mostly absent"],
        expected_improvements: &["Lower infection risk", "Improved cardiovascular fitness"],
    },
    RecoveryPhase {
        name: "Long-term Freedom",
        start_day: 365,
        end_day: None,
        key_processes: &["Long-term disease risk keeps falling"],
        expected_symptoms: &[],
        expected_improvements: &["Heart disease risk roughly half that of a user"],
    },
];

/// Map elapsed days to the phase containing them
pub fn classify_phase(days: u32) -> &'static RecoveryPhase {
    // Number of phases starting on or before `days`; always at least 1
    // because the first phase starts at day 0.
    let idx = RECOVERY_PHASES.partition_point(|p| p.start_day <= days);
    &RECOVERY_PHASES[idx.saturating_sub(1)]
}

/// Position within the current phase
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PhaseProgress {
    pub phase: &'static RecoveryPhase,
    pub next_phase: Option<&'static RecoveryPhase>,
    pub days_into_phase: u32,
    /// Days until the next phase starts; `None` in the final phase
    pub days_remaining: Option<u32>,
    pub percent_complete: f64,
}

/// Describe how far `days` is through its phase
pub fn phase_progress(days: u32) -> PhaseProgress {
    let phase = classify_phase(days);
    let next_phase = RECOVERY_PHASES
        .iter()
        .find(|p| Some(p.start_day) == phase.end_day);
    let days_into_phase = days - phase.start_day;

    let (days_remaining, percent_complete) = match phase.end_day {
        Some(end) => {
            let length = end - phase.start_day;
            let percent = days_into_phase as f64 / length as f64 * 100.0;
            (Some(end - days), crate::model::round_to(percent, 1))
        }
        None => (None, 100.0),
    };

    PhaseProgress {
        phase,
        next_phase,
        days_into_phase,
        days_remaining,
        percent_complete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_contiguous() {
        assert_eq!(RECOVERY_PHASES[0].start_day, 0);
        for pair in RECOVERY_PHASES.windows(2) {
            assert_eq!(pair[0].end_day, Some(pair[1].start_day));
        }
        assert_eq!(RECOVERY_PHASES.last().unwrap().end_day, None);
    }

    #[test]
    fn test_every_day_maps_to_exactly_one_phase() {
        for day in 0..=10_000u32 {
            let matching = RECOVERY_PHASES.iter().filter(|p| p.contains(day)).count();
            assert_eq!(matching, 1, "day {} matched {} phases", day, matching);
            assert!(classify_phase(day).contains(day));
        }
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(classify_phase(0).name, "Nicotine Clearance");
        assert_eq!(classify_phase(2).name, "Nicotine Clearance");
        assert_eq!(classify_phase(3).name, "Acute Withdrawal");
        assert_eq!(classify_phase(29).name, "Early Recovery");
        assert_eq!(classify_phase(30).name, "Receptor Rebalancing");
        assert_eq!(classify_phase(365).name, "Long-term Freedom");
        assert_eq!(classify_phase(u32::MAX).name, "Long-term Freedom");
    }

    #[test]
    fn test_phase_progress_midway() {
        let progress = phase_progress(60);
        assert_eq!(progress.phase.name, "Receptor Rebalancing");
        assert_eq!(progress.next_phase.map(|p| p.name), Some("Neural Rewiring"));
        assert_eq!(progress.days_into_phase, 30);
        assert_eq!(progress.days_remaining, Some(30));
        assert_eq!(progress.percent_complete, 50.0);
    }

    #[test]
    fn test_phase_progress_at_phase_start() {
        let progress = phase_progress(14);
        assert_eq!(progress.days_into_phase, 0);
        assert_eq!(progress.days_remaining, Some(16));
        assert_eq!(progress.percent_complete, 0.0);
    }

    #[test]
    fn test_phase_progress_final_phase() {
        let progress = phase_progress(500);
        assert_eq!(progress.phase.name, "Long-term Freedom");
        assert!(progress.next_phase.is_none());
        assert_eq!(progress.days_remaining, None);
        assert_eq!(progress.days_into_phase, 135);
        assert_eq!(progress.percent_complete, 100.0);
    }
}
