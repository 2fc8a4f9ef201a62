//! Webbing entity type - woven strap material sold by the yard

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::region::Region;

/// Widths (inches) the looms are set up for
pub const STANDARD_WIDTHS: [f64; 6] = [0.5, 0.75, 1.0, 1.5, 2.0, 3.0];

/// A color the webbing is stocked in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorOption {
    /// Color name (e.g., "black", "navy")
    pub name: String,

    /// Swatch color for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
}

/// Physical properties of the webbing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebbingSpecs {
    /// Breaking strength in pounds
    #[serde(default)]
    pub tensile_strength_lbs: f64,

    /// Weight in ounces per yard, used for shipping estimates
    #[serde(default)]
    pub weight_per_yard_oz: f64,

    /// Elongation at working load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stretch_percent: Option<f64>,
}

/// A Webbing catalog record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebbingItem {
    /// Catalog identifier
    pub id: String,

    /// Material name (e.g., "nylon", "polyester")
    pub material: String,

    /// Width in inches
    pub width: f64,

    /// Stocked colors
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub color_options: Vec<ColorOption>,

    /// Price per yard in each region
    #[serde(default)]
    pub price_per_yard_by_region: BTreeMap<Region, f64>,

    /// Minimum order quantity in each region
    #[serde(default)]
    pub moq_by_region: BTreeMap<Region, u32>,

    /// Physical specs
    #[serde(default)]
    pub specs: WebbingSpecs,

    /// Inactive records are hidden from catalog listings
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl WebbingItem {
    /// Price per yard in the given region, if the region is stocked
    pub fn price_per_yard(&self, region: Region) -> Option<f64> {
        self.price_per_yard_by_region.get(&region).copied()
    }

    /// Whether the color is one of the stocked options (case-insensitive)
    pub fn offers_color(&self, color: &str) -> bool {
        self.color_options
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(color))
    }

    /// Whether the width is one of the standard loom widths
    pub fn has_standard_width(&self) -> bool {
        STANDARD_WIDTHS
            .iter()
            .any(|w| (w - self.width).abs() < f64::EPSILON)
    }

    /// Short display label, e.g. `Nylon 1"`
    pub fn display_name(&self) -> String {
        let mut chars = self.material.chars();
        let material = match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        };
        format!("{} {}\"", material, self.width)
    }
}
