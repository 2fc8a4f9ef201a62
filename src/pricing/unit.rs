//! Flat single-region pricing for the quick strap builder
//!
//! The strap is priced by length and width, scaled by a material multiplier,
//! plus a fixed per-unit price for each hardware add-on. One volume discount
//! rate is applied to the whole subtotal.

use serde::{Deserialize, Serialize};

use crate::pricing::round_cents;

/// Strap price per foot of length
pub const BASE_PRICE_PER_FOOT: f64 = 2.50;

/// Strap price per inch of width
pub const BASE_PRICE_PER_INCH_WIDTH: f64 = 0.50;

/// (minimum quantity, discount rate), highest threshold first
const QUANTITY_DISCOUNTS: [(u32, f64); 4] = [(100, 0.15), (50, 0.10), (25, 0.05), (1, 0.0)];

const D_RING_PRICE: f64 = 0.75;
const RIVET_PRICE: f64 = 0.35;
const SNAP_PRICE: f64 = 0.85;
const VELCRO_PRICE: f64 = 1.50;
const TRI_GLIDE_PRICE: f64 = 0.65;

/// Strap material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    Nylon,
    Polyester,
    Polypropylene,
    Cotton,
    Leather,
    Neoprene,
}

impl Default for Material {
    fn default() -> Self {
        Material::Nylon
    }
}

impl Material {
    /// Price multiplier relative to nylon
    pub fn multiplier(&self) -> f64 {
        match self {
            Material::Nylon => 1.0,
            Material::Polyester => 1.2,
            Material::Polypropylene => 0.9,
            Material::Cotton => 1.3,
            Material::Leather => 3.5,
            Material::Neoprene => 2.0,
        }
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Material::Nylon => write!(f, "nylon"),
            Material::Polyester => write!(f, "polyester"),
            Material::Polypropylene => write!(f, "polypropylene"),
            Material::Cotton => write!(f, "cotton"),
            Material::Leather => write!(f, "leather"),
            Material::Neoprene => write!(f, "neoprene"),
        }
    }
}

/// Buckle option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BuckleType {
    None,
    SideRelease,
    Cam,
    LadderLock,
    Metal,
}

impl Default for BuckleType {
    fn default() -> Self {
        BuckleType::None
    }
}

impl BuckleType {
    /// Per-unit add-on price
    pub fn price(&self) -> f64 {
        match self {
            BuckleType::None => 0.0,
            BuckleType::SideRelease => 1.25,
            BuckleType::Cam => 1.75,
            BuckleType::LadderLock => 1.50,
            BuckleType::Metal => 2.50,
        }
    }

    /// Line item label
    pub fn label(&self) -> &'static str {
        match self {
            BuckleType::None => "No Buckle",
            BuckleType::SideRelease => "Side Release Buckle",
            BuckleType::Cam => "Cam Buckle",
            BuckleType::LadderLock => "Ladder Lock Buckle",
            BuckleType::Metal => "Metal Buckle",
        }
    }
}

/// Strap dimensions and material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrapSpecs {
    /// Length in inches
    pub length: f64,

    /// Width in inches
    pub width: f64,

    #[serde(default)]
    pub material: Material,

    #[serde(default)]
    pub color: String,
}

/// Hardware add-ons, each applied once per strap
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HardwareSelection {
    pub buckle: BuckleType,
    pub d_rings: bool,
    pub rivets: bool,
    pub snaps: bool,
    pub velcro: bool,
    pub tri_glide: bool,
}

impl HardwareSelection {
    /// Selected add-ons as (label, per-unit price)
    fn add_ons(&self) -> Vec<(&'static str, f64)> {
        let mut add_ons = Vec::new();
        if self.buckle != BuckleType::None {
            add_ons.push((self.buckle.label(), self.buckle.price()));
        }
        let flags = [
            (self.d_rings, "D-Rings (pair)", D_RING_PRICE),
            (self.rivets, "Rivets (set)", RIVET_PRICE),
            (self.snaps, "Snap Fasteners", SNAP_PRICE),
            (self.velcro, "Velcro Strips", VELCRO_PRICE),
            (self.tri_glide, "Tri-Glide Adjuster", TRI_GLIDE_PRICE),
        ];
        for (selected, label, price) in flags {
            if selected {
                add_ons.push((label, price));
            }
        }
        add_ons
    }
}

/// One row of the printed quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total: f64,
}

/// Flat quote breakdown, money fields rounded to cents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Strap price before the material multiplier
    pub base_strap_price: f64,
    pub material_multiplier: f64,

    /// Hardware add-ons per strap
    pub hardware_total: f64,
    pub subtotal: f64,
    pub quantity_discount: f64,
    pub total: f64,
    pub line_items: Vec<LineItem>,
}

/// Discount rate for an order of `quantity` straps
pub fn discount_rate(quantity: u32) -> f64 {
    QUANTITY_DISCOUNTS
        .iter()
        .find(|(min, _)| quantity >= *min)
        .map_or(0.0, |(_, rate)| *rate)
}

/// Customer-facing message about the volume discount
pub fn quantity_discount_label(quantity: u32) -> &'static str {
    match quantity {
        q if q >= 100 => "15% volume discount applied",
        q if q >= 50 => "10% volume discount applied",
        q if q >= 25 => "5% volume discount applied",
        _ => "Order 25+ for volume discounts",
    }
}

/// Price `quantity` straps of `specs` with the selected hardware
pub fn calculate_price(
    specs: &StrapSpecs,
    hardware: &HardwareSelection,
    quantity: u32,
) -> PriceBreakdown {
    let qty = f64::from(quantity);
    let base_strap_price =
        specs.length / 12.0 * BASE_PRICE_PER_FOOT + specs.width * BASE_PRICE_PER_INCH_WIDTH;
    let material_multiplier = specs.material.multiplier();
    let strap_price = base_strap_price * material_multiplier;

    let mut line_items = vec![LineItem {
        description: format!(
            "{} Strap - {}\" x {}\"",
            capitalize(&specs.material.to_string()),
            specs.length,
            specs.width
        ),
        quantity,
        unit_price: round_cents(strap_price),
        total: round_cents(strap_price * qty),
    }];

    let mut hardware_total = 0.0;
    for (label, price) in hardware.add_ons() {
        hardware_total += price;
        line_items.push(LineItem {
            description: label.to_string(),
            quantity,
            unit_price: price,
            total: round_cents(price * qty),
        });
    }

    let subtotal = (strap_price + hardware_total) * qty;
    let quantity_discount = subtotal * discount_rate(quantity);
    let total = subtotal - quantity_discount;

    PriceBreakdown {
        base_strap_price: round_cents(base_strap_price),
        material_multiplier,
        hardware_total: round_cents(hardware_total),
        subtotal: round_cents(subtotal),
        quantity_discount: round_cents(quantity_discount),
        total: round_cents(total),
        line_items,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs(material: Material) -> StrapSpecs {
        StrapSpecs {
            length: 36.0,
            width: 1.0,
            material,
            color: "black".to_string(),
        }
    }

    #[test]
    fn test_plain_nylon_strap() {
        let price = calculate_price(&specs(Material::Nylon), &HardwareSelection::default(), 10);
        // 3 ft × 2.50 + 1 in × 0.50
        assert_eq!(price.base_strap_price, 8.0);
        assert_eq!(price.material_multiplier, 1.0);
        assert_eq!(price.hardware_total, 0.0);
        assert_eq!(price.subtotal, 80.0);
        assert_eq!(price.quantity_discount, 0.0);
        assert_eq!(price.total, 80.0);
        assert_eq!(price.line_items.len(), 1);
        assert_eq!(price.line_items[0].description, "Nylon Strap - 36\" x 1\"");
    }

    #[test]
    fn test_material_multiplier_applies_to_strap_only() {
        let hardware = HardwareSelection {
            buckle: BuckleType::SideRelease,
            ..HardwareSelection::default()
        };
        let price = calculate_price(&specs(Material::Leather), &hardware, 1);
        assert_eq!(price.base_strap_price, 8.0);
        assert_eq!(price.line_items[0].unit_price, 28.0);
        assert_eq!(price.hardware_total, 1.25);
        assert_eq!(price.subtotal, 29.25);
    }

    #[test]
    fn test_hardware_add_ons_produce_line_items() {
        let hardware = HardwareSelection {
            buckle: BuckleType::Cam,
            d_rings: true,
            rivets: true,
            snaps: true,
            velcro: true,
            tri_glide: true,
        };
        let price = calculate_price(&specs(Material::Nylon), &hardware, 2);
        let descriptions: Vec<&str> = price
            .line_items
            .iter()
            .map(|l| l.description.as_str())
            .collect();
        assert_eq!(
            descriptions,
            vec![
                "Nylon Strap - 36\" x 1\"",
                "Cam Buckle",
                "D-Rings (pair)",
                "Rivets (set)",
                "Snap Fasteners",
                "Velcro Strips",
                "Tri-Glide Adjuster",
            ]
        );
        // 1.75 + 0.75 + 0.35 + 0.85 + 1.50 + 0.65
        assert_eq!(price.hardware_total, 5.85);
        assert_eq!(price.line_items[1].total, 3.5);
    }

    #[test]
    fn test_discount_applies_to_whole_subtotal() {
        let hardware = HardwareSelection {
            d_rings: true,
            ..HardwareSelection::default()
        };
        let price = calculate_price(&specs(Material::Nylon), &hardware, 100);
        assert_eq!(price.subtotal, 875.0);
        assert_eq!(price.quantity_discount, 131.25);
        assert_eq!(price.total, 743.75);
    }

    #[test]
    fn test_discount_thresholds() {
        assert_eq!(discount_rate(0), 0.0);
        assert_eq!(discount_rate(24), 0.0);
        assert_eq!(discount_rate(25), 0.05);
        assert_eq!(discount_rate(49), 0.05);
        assert_eq!(discount_rate(50), 0.10);
        assert_eq!(discount_rate(99), 0.10);
        assert_eq!(discount_rate(100), 0.15);
    }

    #[test]
    fn test_discount_labels() {
        assert_eq!(quantity_discount_label(10), "Order 25+ for volume discounts");
        assert_eq!(quantity_discount_label(25), "5% volume discount applied");
        assert_eq!(quantity_discount_label(60), "10% volume discount applied");
        assert_eq!(quantity_discount_label(250), "15% volume discount applied");
    }

    #[test]
    fn test_buckle_none_adds_nothing() {
        let price = calculate_price(&specs(Material::Polyester), &HardwareSelection::default(), 1);
        assert_eq!(price.line_items.len(), 1);
        assert_eq!(price.material_multiplier, 1.2);
    }
}
