//! Core domain types for the recovery model.
//!
//! This module defines the fundamental types used throughout the system:
//! - Product categories and their static configuration
//! - The usage profile supplied by callers
//! - Metric definitions for the biological systems being tracked
//! - Recovery phases

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Product Categories
// ============================================================================

/// Nicotine product the person stopped using
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Cigarettes,
    Vape,
    Pouches,
    Chewing,
}

/// How the profile-collection flow records consumption for a category
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UsageBasis {
    /// Native units per day, used as-is
    UnitsPerDay,
    /// Whole packages per week, each holding a fixed number of native units
    PackagesPerWeek { units_per_package: f64 },
}

/// Static per-category configuration
#[derive(Clone, Copy, Debug)]
pub struct CategoryConfig {
    pub units_per_package: f64,
    pub unit_singular: &'static str,
    pub unit_plural: &'static str,
    pub package_singular: &'static str,
    pub package_plural: &'static str,
    /// Minutes of life expectancy attributed to each native unit
    pub minutes_per_unit: f64,
    pub usage_basis: UsageBasis,
}

const CIGARETTES: CategoryConfig = CategoryConfig {
    units_per_package: 20.0,
    unit_singular: "cigarette",
    unit_plural: "cigarettes",
    package_singular: "pack",
    package_plural: "packs",
    minutes_per_unit: 11.0,
    usage_basis: UsageBasis::UnitsPerDay,
};

const VAPE: CategoryConfig = CategoryConfig {
    units_per_package: 1.0,
    unit_singular: "pod",
    unit_plural: "pods",
    package_singular: "pod",
    package_plural: "pods",
    minutes_per_unit: 5.0,
    usage_basis: UsageBasis::UnitsPerDay,
};

const POUCHES: CategoryConfig = CategoryConfig {
    units_per_package: 15.0,
    unit_singular: "pouch",
    unit_plural: "pouches",
    package_singular: "tin",
    package_plural: "tins",
    minutes_per_unit: 3.0,
    usage_basis: UsageBasis::UnitsPerDay,
};

// Chewing tobacco is recorded as tins per week and tracked in portions.
const CHEWING: CategoryConfig = CategoryConfig {
    units_per_package: 1.0,
    unit_singular: "portion",
    unit_plural: "portions",
    package_singular: "tin",
    package_plural: "tins",
    minutes_per_unit: 8.0,
    usage_basis: UsageBasis::PackagesPerWeek {
        units_per_package: 5.0,
    },
};

impl ProductCategory {
    pub const ALL: [ProductCategory; 4] = [
        ProductCategory::Cigarettes,
        ProductCategory::Vape,
        ProductCategory::Pouches,
        ProductCategory::Chewing,
    ];

    /// Static configuration for this category
    pub fn config(self) -> &'static CategoryConfig {
        match self {
            ProductCategory::Cigarettes => &CIGARETTES,
            ProductCategory::Vape => &VAPE,
            ProductCategory::Pouches => &POUCHES,
            ProductCategory::Chewing => &CHEWING,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProductCategory::Cigarettes => "cigarettes",
            ProductCategory::Vape => "vape",
            ProductCategory::Pouches => "pouches",
            ProductCategory::Chewing => "chewing",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "cigarettes" | "cigarette" => Ok(ProductCategory::Cigarettes),
            "vape" | "vaping" => Ok(ProductCategory::Vape),
            "pouches" | "pouch" => Ok(ProductCategory::Pouches),
            "chewing" | "chew" => Ok(ProductCategory::Chewing),
            other => Err(Error::InvalidProfile(format!(
                "unknown product category '{}'",
                other
            ))),
        }
    }
}

// ============================================================================
// Usage Profile
// ============================================================================

/// Consumption profile captured before quitting
///
/// `units` is recorded in the category's [`UsageBasis`]: native units per day
/// for most categories, tins per week for chewing tobacco. Use
/// [`crate::normalize_daily_units`] to get a daily native-unit rate.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UsageProfile {
    pub category: ProductCategory,
    pub units: f64,
    pub daily_cost: f64,
    pub harm_level: f64,
}

impl UsageProfile {
    pub fn new(category: ProductCategory, units: f64, daily_cost: f64, harm_level: f64) -> Self {
        Self {
            category,
            units,
            daily_cost,
            harm_level,
        }
    }

    /// Reject profiles with negative, non-finite or out-of-range fields
    pub fn validate(&self) -> Result<()> {
        if !self.units.is_finite() || self.units < 0.0 {
            return Err(Error::InvalidProfile(format!(
                "units must be a non-negative number, got {}",
                self.units
            )));
        }
        if !self.daily_cost.is_finite() || self.daily_cost < 0.0 {
            return Err(Error::InvalidProfile(format!(
                "daily cost must be a non-negative number, got {}",
                self.daily_cost
            )));
        }
        if !(1.0..=10.0).contains(&self.harm_level) {
            return Err(Error::InvalidProfile(format!(
                "harm level must be between 1 and 10, got {}",
                self.harm_level
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Metric Definitions
// ============================================================================

/// Body system a metric belongs to
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    Neurological,
    Cardiovascular,
    Respiratory,
    Metabolic,
    Sensory,
}

/// Half-life of a metric's recovery curve, in days
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HalfLife {
    Fixed(f64),
    /// Scaled by the profile's harm level: `base_days * harm_level / 10`
    HarmScaled { base_days: f64 },
}

impl HalfLife {
    pub fn resolve(self, harm_level: f64) -> f64 {
        match self {
            HalfLife::Fixed(days) => days,
            HalfLife::HarmScaled { base_days } => base_days * (harm_level / 10.0),
        }
    }
}

/// One tracked biological system
#[derive(Clone, Debug)]
pub struct MetricDefinition {
    pub id: String,
    pub name: String,
    pub category: MetricCategory,
    pub weight: f64,
    pub max_recovery: f64,
    pub half_life: HalfLife,
}

/// The set of metrics the aggregator combines
#[derive(Clone, Debug)]
pub struct MetricRegistry {
    pub metrics: Vec<MetricDefinition>,
}

// ============================================================================
// Recovery Phases
// ============================================================================

/// A named stage of recovery covering `[start_day, end_day)`
#[derive(Debug, Serialize, PartialEq)]
pub struct RecoveryPhase {
    pub name: &'static str,
    pub start_day: u32,
    /// `None` for the open-ended final phase
    pub end_day: Option<u32>,
    pub key_processes: &'static [&'static str],
    pub expected_symptoms: &'static [&'static str],
    pub expected_improvements: &'static [&'static str],
}

impl RecoveryPhase {
    pub fn contains(&self, day: u32) -> bool {
        day >= self.start_day && self.end_day.map_or(true, |end| day < end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing() {
        assert_eq!(
            "Cigarettes".parse::<ProductCategory>().unwrap(),
            ProductCategory::Cigarettes
        );
        assert_eq!(
            " chew ".parse::<ProductCategory>().unwrap(),
            ProductCategory::Chewing
        );
        assert!(matches!(
            "snuff".parse::<ProductCategory>(),
            Err(Error::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_category_display_roundtrip() {
        for category in ProductCategory::ALL {
            let parsed: ProductCategory = category.to_string().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_profile_validation() {
        let ok = UsageProfile::new(ProductCategory::Vape, 1.0, 8.0, 5.0);
        assert!(ok.validate().is_ok());

        let negative_units = UsageProfile::new(ProductCategory::Vape, -1.0, 8.0, 5.0);
        assert!(matches!(
            negative_units.validate(),
            Err(Error::InvalidProfile(_))
        ));

        let nan_cost = UsageProfile::new(ProductCategory::Vape, 1.0, f64::NAN, 5.0);
        assert!(nan_cost.validate().is_err());

        let harm_too_high = UsageProfile::new(ProductCategory::Vape, 1.0, 8.0, 11.0);
        assert!(harm_too_high.validate().is_err());

        let harm_too_low = UsageProfile::new(ProductCategory::Vape, 1.0, 8.0, 0.5);
        assert!(harm_too_low.validate().is_err());
    }

    #[test]
    fn test_profile_deserializes_snake_case_category() {
        let json = r#"{"category":"pouches","units":10,"daily_cost":4.5,"harm_level":3}"#;
        let profile: UsageProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.category, ProductCategory::Pouches);
        assert_eq!(profile.units, 10.0);
    }

    #[test]
    fn test_harm_scaled_half_life() {
        let half_life = HalfLife::HarmScaled { base_days: 90.0 };
        assert!((half_life.resolve(10.0) - 90.0).abs() < 1e-9);
        assert!((half_life.resolve(5.0) - 45.0).abs() < 1e-9);
        assert_eq!(HalfLife::Fixed(30.0).resolve(2.0), 30.0);
    }
}
