//! Default registry of tracked recovery metrics.
//!
//! This module provides the built-in metric definitions the aggregator combines.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Id of the metric whose half-life scales with the profile's harm level
pub const ADDICTION_RECOVERY_ID: &str = "addiction_recovery";

/// Base half-life, in days, of the addiction-recovery metric at harm level 10
pub const ADDICTION_BASE_HALF_LIFE: f64 = 90.0;

/// Cached default registry - built once and reused across all operations
static DEFAULT_REGISTRY: Lazy<MetricRegistry> = Lazy::new(build_default_registry);

/// Get a reference to the cached default registry
pub fn get_default_registry() -> &'static MetricRegistry {
    &DEFAULT_REGISTRY
}

fn metric(
    id: &str,
    name: &str,
    category: MetricCategory,
    weight: f64,
    max_recovery: f64,
    half_life: HalfLife,
) -> MetricDefinition {
    MetricDefinition {
        id: id.into(),
        name: name.into(),
        category,
        weight,
        max_recovery,
        half_life,
    }
}

/// Builds the default registry
///
/// **Note**: For production use, prefer `get_default_registry()` which returns a
/// cached reference. This function is retained for testing and custom registries.
pub fn build_default_registry() -> MetricRegistry {
    use MetricCategory::*;

    let metrics = vec![
        metric(
            "dopamine_receptors",
            "Dopamine receptor density",
            Neurological,
            0.20,
            95.0,
            HalfLife::Fixed(45.0),
        ),
        metric(
            "prefrontal_function",
            "Prefrontal cortex function",
            Neurological,
            0.15,
            90.0,
            HalfLife::Fixed(60.0),
        ),
        metric(
            ADDICTION_RECOVERY_ID,
            "Addiction recovery",
            Neurological,
            0.15,
            100.0,
            HalfLife::HarmScaled {
                base_days: ADDICTION_BASE_HALF_LIFE,
            },
        ),
        metric(
            "sleep_architecture",
            "Sleep architecture",
            Neurological,
            0.08,
            95.0,
            HalfLife::Fixed(21.0),
        ),
        metric(
            "cardiovascular",
            "Cardiovascular function",
            Cardiovascular,
            0.15,
            95.0,
            HalfLife::Fixed(30.0),
        ),
        metric(
            "respiratory",
            "Respiratory function",
            Respiratory,
            0.12,
            90.0,
            HalfLife::Fixed(60.0),
        ),
        metric(
            "sensory",
            "Taste and smell",
            Sensory,
            0.05,
            100.0,
            HalfLife::Fixed(7.0),
        ),
        metric(
            "metabolic",
            "Metabolic function",
            Metabolic,
            0.05,
            90.0,
            HalfLife::Fixed(45.0),
        ),
        metric(
            "inflammatory_markers",
            "Inflammatory markers",
            Metabolic,
            0.05,
            85.0,
            HalfLife::Fixed(90.0),
        ),
    ];

    MetricRegistry { metrics }
}

impl MetricRegistry {
    pub fn get(&self, id: &str) -> Option<&MetricDefinition> {
        self.metrics.iter().find(|m| m.id == id)
    }

    /// Validate the registry for consistency
    ///
    /// Returns a list of validation errors (empty if valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.metrics.is_empty() {
            errors.push("Registry has no metrics".to_string());
        }

        let mut seen = HashSet::new();
        for m in &self.metrics {
            if !seen.insert(m.id.as_str()) {
                errors.push(format!("Metric '{}' is defined more than once", m.id));
            }
            if !(m.weight > 0.0 && m.weight <= 1.0) {
                errors.push(format!(
                    "Metric '{}': weight {} outside (0, 1]",
                    m.id, m.weight
                ));
            }
            if !(m.max_recovery > 0.0 && m.max_recovery <= 100.0) {
                errors.push(format!(
                    "Metric '{}': max recovery {} outside (0, 100]",
                    m.id, m.max_recovery
                ));
            }
            let base = match m.half_life {
                HalfLife::Fixed(days) => days,
                HalfLife::HarmScaled { base_days } => base_days,
            };
            if !(base > 0.0) {
                errors.push(format!(
                    "Metric '{}': half-life {} must be positive",
                    m.id, base
                ));
            }
        }

        errors
    }
}
