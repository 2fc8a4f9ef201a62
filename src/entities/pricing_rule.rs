//! Pricing rule entity type - per-region cost model

use serde::{Deserialize, Serialize};

use crate::entities::region::Region;

/// A volume discount bracket. `max` of `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QtyBreak {
    /// Lowest order quantity in the bracket
    pub min: u32,

    /// Highest order quantity in the bracket (inclusive)
    #[serde(default)]
    pub max: Option<u32>,

    /// Discount rate, e.g. 0.10 for 10%
    pub discount: f64,
}

impl QtyBreak {
    /// Whether `quantity` falls inside `[min, max]`
    pub fn contains(&self, quantity: u32) -> bool {
        quantity >= self.min && self.max.map_or(true, |max| quantity <= max)
    }
}

/// A PricingRule catalog record - one per manufacturing region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRule {
    /// Region this rule prices
    pub region: Region,

    /// Assembly labor per finished strap
    pub labor_rate_per_unit: f64,

    /// One-time setup cost per order
    pub tooling_base: f64,

    /// Additional one-time setup per distinct hardware type
    pub tooling_per_hardware_type: f64,

    /// Freight charge per pound
    pub shipping_rate_per_lb: f64,

    /// Flat freight charge per shipment
    pub shipping_base: f64,

    /// Fastest lead time in weeks
    pub lead_time_weeks_min: u32,

    /// Slowest lead time in weeks
    pub lead_time_weeks_max: u32,

    /// Minimum order quantity the region accepts
    pub moq: u32,

    /// Volume discount brackets, in ascending order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qty_breaks: Vec<QtyBreak>,
}

impl PricingRule {
    /// Discount rate for the first bracket containing `quantity`, or 0
    pub fn discount_rate(&self, quantity: u32) -> f64 {
        self.qty_breaks
            .iter()
            .find(|b| b.contains(quantity))
            .map_or(0.0, |b| b.discount)
    }

    /// Whether `quantity` satisfies the region's MOQ
    pub fn meets_minimum(&self, quantity: u32) -> bool {
        quantity >= self.moq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> PricingRule {
        serde_yml::from_str(
            r#"
region: usa
labor_rate_per_unit: 0.20
tooling_base: 50
tooling_per_hardware_type: 25
shipping_rate_per_lb: 0.10
shipping_base: 20
lead_time_weeks_min: 2
lead_time_weeks_max: 4
moq: 100
qty_breaks:
  - { min: 25, max: 49, discount: 0.05 }
  - { min: 50, max: 99, discount: 0.10 }
  - { min: 100, discount: 0.15 }
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_discount_boundaries() {
        let rule = rule();
        assert_eq!(rule.discount_rate(24), 0.0);
        assert_eq!(rule.discount_rate(25), 0.05);
        assert_eq!(rule.discount_rate(49), 0.05);
        assert_eq!(rule.discount_rate(50), 0.10);
        assert_eq!(rule.discount_rate(100), 0.15);
        assert_eq!(rule.discount_rate(1_000_000), 0.15);
    }

    #[test]
    fn test_unbounded_break_parses_as_none() {
        let rule = rule();
        assert_eq!(rule.qty_breaks[2].max, None);
        assert_eq!(rule.qty_breaks[0].max, Some(49));
    }

    #[test]
    fn test_first_matching_break_wins() {
        let mut rule = rule();
        rule.qty_breaks = vec![
            QtyBreak { min: 10, max: Some(100), discount: 0.02 },
            QtyBreak { min: 50, max: None, discount: 0.30 },
        ];
        assert_eq!(rule.discount_rate(60), 0.02);
    }

    #[test]
    fn test_meets_minimum() {
        let rule = rule();
        assert!(!rule.meets_minimum(99));
        assert!(rule.meets_minimum(100));
    }
}
