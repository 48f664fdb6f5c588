//! Conversion of avoided-unit counts into display quantities.
//!
//! Counts large enough to fill a package are shown in packages (20 cigarettes
//! become "1 pack"), everything else in native units.

use crate::model::round_to;
use crate::ProductCategory;
use serde::Serialize;

/// A count paired with the label it should be shown with
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DisplayQuantity {
    pub value: f64,
    pub unit_label: &'static str,
}

/// Express `raw_count` native units of `category` for display
///
/// Negative or NaN counts are treated as zero. Zero uses the plural label.
pub fn display_units(raw_count: f64, category: ProductCategory) -> DisplayQuantity {
    let config = category.config();
    let raw = if raw_count > 0.0 { raw_count } else { 0.0 };

    if config.units_per_package > 1.0 {
        let packages = raw / config.units_per_package;
        if packages >= 1.0 {
            let value = round_to(packages, 1);
            let unit_label = if value == 1.0 {
                config.package_singular
            } else {
                config.package_plural
            };
            return DisplayQuantity { value, unit_label };
        }
    }

    let value = round_to(raw, 1);
    let unit_label = if value == 1.0 {
        config.unit_singular
    } else {
        config.unit_plural
    };
    DisplayQuantity { value, unit_label }
}
