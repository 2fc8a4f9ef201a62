//! Hardware entity type - buckles, rings, sliders and snaps
//!
//! Hardware is priced by quantity tier. In catalog files the tiers are a map
//! keyed by the minimum quantity at which the price applies:
//!
//! ```yaml
//! price_tiers:
//!   "1": 1.00
//!   "500": 0.80
//!   "2500": 0.65
//! ```
//!
//! The map is loaded into a [`PriceTiers`] table sorted by threshold so the
//! lookup is deterministic regardless of key order in the file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hardware category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HardwareCategory {
    Buckle,
    Ring,
    Slider,
    Snap,
    Other,
}

impl Default for HardwareCategory {
    fn default() -> Self {
        HardwareCategory::Other
    }
}

impl std::fmt::Display for HardwareCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HardwareCategory::Buckle => write!(f, "buckle"),
            HardwareCategory::Ring => write!(f, "ring"),
            HardwareCategory::Slider => write!(f, "slider"),
            HardwareCategory::Snap => write!(f, "snap"),
            HardwareCategory::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for HardwareCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buckle" => Ok(HardwareCategory::Buckle),
            "ring" => Ok(HardwareCategory::Ring),
            "slider" => Ok(HardwareCategory::Slider),
            "snap" => Ok(HardwareCategory::Snap),
            "other" => Ok(HardwareCategory::Other),
            _ => Err(format!(
                "Invalid category: {}. Use buckle, ring, slider, snap, or other",
                s
            )),
        }
    }
}

/// One quantity tier: `unit_price` applies at `min_qty` units and above
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceTier {
    pub min_qty: u32,
    pub unit_price: f64,
}

/// Quantity price tiers, kept sorted ascending by threshold
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct PriceTiers(Vec<PriceTier>);

impl PriceTiers {
    /// Build a tier table from (threshold, price) pairs in any order.
    /// A repeated threshold keeps the last price given.
    pub fn new(tiers: impl IntoIterator<Item = (u32, f64)>) -> Self {
        let mut sorted: Vec<PriceTier> = Vec::new();
        for (min_qty, unit_price) in tiers {
            match sorted.binary_search_by_key(&min_qty, |t| t.min_qty) {
                Ok(pos) => sorted[pos].unit_price = unit_price,
                Err(pos) => sorted.insert(pos, PriceTier { min_qty, unit_price }),
            }
        }
        Self(sorted)
    }

    /// Price at the base tier (threshold 1), if present
    pub fn base_price(&self) -> Option<f64> {
        self.0
            .binary_search_by_key(&1, |t| t.min_qty)
            .ok()
            .map(|pos| self.0[pos].unit_price)
    }

    /// Unit price for an order of `total_qty` units.
    ///
    /// Picks the highest threshold that is `<= total_qty`. When no threshold
    /// qualifies the base tier applies, and an item without a base tier is
    /// priced at zero.
    pub fn unit_price(&self, total_qty: u64) -> f64 {
        let qualifying = self
            .0
            .partition_point(|t| u64::from(t.min_qty) <= total_qty);
        if qualifying == 0 {
            return self.base_price().unwrap_or(0.0);
        }
        self.0[qualifying - 1].unit_price
    }

    /// Tiers in ascending threshold order
    pub fn iter(&self) -> impl Iterator<Item = &PriceTier> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<BTreeMap<String, f64>> for PriceTiers {
    type Error = String;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut tiers = Vec::with_capacity(map.len());
        for (key, price) in map {
            let min_qty: u32 = key
                .trim()
                .parse()
                .map_err(|_| format!("price tier key '{}' is not a whole quantity", key))?;
            tiers.push((min_qty, price));
        }
        Ok(Self::new(tiers))
    }
}

impl From<PriceTiers> for BTreeMap<String, f64> {
    fn from(tiers: PriceTiers) -> Self {
        tiers
            .0
            .into_iter()
            .map(|t| (t.min_qty.to_string(), t.unit_price))
            .collect()
    }
}

/// Physical properties of a hardware item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardwareSpecs {
    /// Weight in grams
    #[serde(default)]
    pub weight_g: f64,

    /// Base material (e.g., "acetal", "stainless steel")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,

    /// Surface finish
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish: Option<String>,

    /// Rated working load in pounds
    #[serde(default)]
    pub load_rating_lbs: f64,
}

/// A Hardware catalog record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareItem {
    /// Catalog identifier
    pub id: String,

    /// Stock keeping unit
    pub sku: String,

    /// Display name
    pub name: String,

    /// Category
    #[serde(default)]
    pub category: HardwareCategory,

    /// Finer-grained type (e.g., "side-release"); tooling is charged per type
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub hardware_type: Option<String>,

    /// Webbing widths this item fits (empty = fits any width)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub width_options: Vec<f64>,

    /// Quantity price tiers
    #[serde(default)]
    pub price_tiers: PriceTiers,

    /// Physical specs
    #[serde(default)]
    pub specs: HardwareSpecs,

    /// Inactive records are hidden from catalog listings
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl HardwareItem {
    /// Type key used to count distinct tooling setups
    pub fn tooling_type(&self) -> String {
        self.hardware_type
            .clone()
            .unwrap_or_else(|| self.category.to_string())
    }

    /// Whether the item fits webbing of the given width
    pub fn fits_width(&self, width: f64) -> bool {
        self.width_options.is_empty()
            || self
                .width_options
                .iter()
                .any(|w| (w - width).abs() < f64::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundary() {
        let tiers = PriceTiers::new([(1, 1.00), (500, 0.80)]);
        assert_eq!(tiers.unit_price(499), 1.00);
        assert_eq!(tiers.unit_price(500), 0.80);
        assert_eq!(tiers.unit_price(10_000), 0.80);
    }

    #[test]
    fn test_highest_qualifying_tier_wins() {
        let tiers = PriceTiers::new([(2500, 0.65), (1, 1.00), (500, 0.80)]);
        assert_eq!(tiers.unit_price(2499), 0.80);
        assert_eq!(tiers.unit_price(2500), 0.65);
    }

    #[test]
    fn test_below_every_threshold_falls_back_to_base() {
        let tiers = PriceTiers::new([(1, 1.25), (100, 1.00)]);
        assert_eq!(tiers.unit_price(0), 1.25);

        let no_base = PriceTiers::new([(100, 1.00)]);
        assert_eq!(no_base.unit_price(50), 0.0);
        assert_eq!(no_base.base_price(), None);
    }

    #[test]
    fn test_repeated_threshold_keeps_last_price() {
        let tiers = PriceTiers::new([(1, 1.00), (1, 0.90)]);
        assert_eq!(tiers.len(), 1);
        assert_eq!(tiers.base_price(), Some(0.90));
    }

    #[test]
    fn test_tiers_deserialize_from_string_keys() {
        let tiers: PriceTiers = serde_yml::from_str("\"500\": 0.8\n\"1\": 1.0\n").unwrap();
        let thresholds: Vec<u32> = tiers.iter().map(|t| t.min_qty).collect();
        assert_eq!(thresholds, vec![1, 500]);
    }

    #[test]
    fn test_tiers_reject_non_numeric_key() {
        let result: Result<PriceTiers, _> = serde_yml::from_str("\"bulk\": 0.5\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_tooling_type_falls_back_to_category() {
        let mut item: HardwareItem = serde_yml::from_str(
            r#"
id: HW-SR-1
sku: SR-100
name: Side Release Buckle 1"
category: buckle
price_tiers:
  "1": 0.45
"#,
        )
        .unwrap();
        assert_eq!(item.tooling_type(), "buckle");
        item.hardware_type = Some("side-release".to_string());
        assert_eq!(item.tooling_type(), "side-release");
    }

    #[test]
    fn test_fits_width() {
        let item = HardwareItem {
            id: "HW-D-1".to_string(),
            sku: "DR-100".to_string(),
            name: "D-Ring".to_string(),
            category: HardwareCategory::Ring,
            hardware_type: None,
            width_options: vec![1.0, 1.5],
            price_tiers: PriceTiers::new([(1, 0.30)]),
            specs: HardwareSpecs::default(),
            active: true,
        };
        assert!(item.fits_width(1.0));
        assert!(!item.fits_width(2.0));
    }
}
