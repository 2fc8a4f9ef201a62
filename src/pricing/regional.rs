//! Multi-region landed-cost quotes
//!
//! [`calculate_quote`] prices one strap configuration in every region that
//! has a [`PricingRule`], and ranks the regions cheapest-first by per-unit
//! cost. It is a pure function over catalog snapshots: callers load the
//! webbing, hardware and pricing-rule catalogs first and pass them in.
//!
//! Per region the landed cost is built up as:
//!
//! | Line | Formula |
//! |------|---------|
//! | webbing | `length / 36 × plies × price_per_yard × quantity` |
//! | hardware | `Σ tier_price(qty_per_unit × quantity) × qty_per_unit × quantity` |
//! | labor | `labor_rate_per_unit × quantity` |
//! | tooling | `tooling_base + tooling_per_hardware_type × distinct types` |
//! | discount | `break_rate × (webbing + hardware + labor)` |
//! | shipping | `shipping_base + shipping_rate_per_lb × max(1, weight_lbs)` |
//!
//! `total = webbing + hardware + labor + tooling − discount + shipping`.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::entities::hardware::HardwareItem;
use crate::entities::pricing_rule::PricingRule;
use crate::entities::region::Region;
use crate::entities::webbing::WebbingItem;
use crate::pricing::{round_cents, INCHES_PER_YARD};

/// Ounces per pound, for shipping weight
const OUNCES_PER_POUND: f64 = 16.0;

/// Shipments are never billed below this weight
const MIN_SHIPPING_WEIGHT_LBS: f64 = 1.0;

/// One hardware selection: `qty` pieces of catalog item `id` on every strap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareLine {
    pub id: String,
    pub qty: u32,
}

impl std::str::FromStr for HardwareLine {
    type Err = String;

    /// Parse `ID` or `ID:QTY` (quantity defaults to 1)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, qty) = match s.rsplit_once(':') {
            Some((id, qty)) => {
                let qty: u32 = qty
                    .trim()
                    .parse()
                    .map_err(|_| format!("Invalid hardware quantity in '{}'. Use ID:QTY", s))?;
                (id.trim(), qty)
            }
            None => (s.trim(), 1),
        };
        if id.is_empty() {
            return Err(format!("Missing hardware id in '{}'", s));
        }
        Ok(Self {
            id: id.to_string(),
            qty,
        })
    }
}

/// A strap configuration to quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// Webbing catalog id
    pub webbing_id: String,

    /// Finished strap length in inches
    pub length_inches: f64,

    /// Requested webbing color
    #[serde(default)]
    pub color: String,

    /// Layers of webbing laminated together
    #[serde(default = "default_plies")]
    pub plies: u32,

    /// Hardware on each strap
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hardware: Vec<HardwareLine>,

    /// Number of finished straps
    pub quantity: u32,
}

fn default_plies() -> u32 {
    1
}

impl QuoteConfig {
    /// Check the configuration preconditions: positive quantity and length,
    /// at least one ply.
    pub fn validate(&self) -> Result<(), QuoteError> {
        if self.quantity == 0 {
            return Err(QuoteError::InvalidConfig(
                "quantity must be greater than zero".to_string(),
            ));
        }
        if !(self.length_inches > 0.0) || !self.length_inches.is_finite() {
            return Err(QuoteError::InvalidConfig(format!(
                "length must be a positive number of inches (got {})",
                self.length_inches
            )));
        }
        if self.plies == 0 {
            return Err(QuoteError::InvalidConfig(
                "plies must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Yards of webbing consumed by one finished strap
    pub fn yards_per_unit(&self) -> f64 {
        self.length_inches / INCHES_PER_YARD * f64::from(self.plies)
    }
}

/// Errors that prevent a quote from being produced
#[derive(Debug, Error, Diagnostic)]
pub enum QuoteError {
    #[error("webbing '{id}' not found in catalog")]
    #[diagnostic(
        code(sqt::quote::webbing_not_found),
        help("run `sqt webbing list` to see the available webbing ids")
    )]
    WebbingNotFound { id: String },

    #[error("invalid quote configuration: {0}")]
    #[diagnostic(code(sqt::quote::invalid_config))]
    InvalidConfig(String),
}

/// Advisory issues found while quoting. None of these stop the quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuoteWarning {
    /// A selected hardware id is not in the catalog and was left out
    SkippedHardware { id: String },

    /// The webbing has no price for a region; its webbing cost there is zero
    MissingRegionPrice { region: Region },

    /// The requested color is not one of the webbing's stocked colors
    UnlistedColor { color: String },

    /// A hardware item does not list the webbing width as compatible
    IncompatibleWidth { id: String, width: f64 },
}

impl std::fmt::Display for QuoteWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteWarning::SkippedHardware { id } => {
                write!(f, "hardware '{}' not found in catalog; left out of the quote", id)
            }
            QuoteWarning::MissingRegionPrice { region } => {
                write!(f, "webbing has no price for region '{}'; priced at 0", region)
            }
            QuoteWarning::UnlistedColor { color } => {
                write!(f, "color '{}' is not a stocked option for this webbing", color)
            }
            QuoteWarning::IncompatibleWidth { id, width } => {
                write!(f, "hardware '{}' is not listed for {}\" webbing", id, width)
            }
        }
    }
}

/// Landed-cost breakdown for one region, every field rounded to cents
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub webbing_cost: f64,
    pub hardware_cost: f64,
    pub labor_cost: f64,
    pub tooling_cost: f64,
    pub subtotal: f64,
    pub volume_discount: f64,
    pub shipping_cost: f64,
    pub total: f64,
    pub per_unit: f64,
}

/// Quote for one manufacturing region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionQuote {
    pub region: Region,
    pub region_label: String,

    /// Whether the order quantity satisfies the region's MOQ. Regions below
    /// MOQ are still fully priced.
    pub meets_minimum: bool,

    pub moq: u32,
    pub lead_time_min: u32,
    pub lead_time_max: u32,
    pub breakdown: CostBreakdown,
}

/// A resolved hardware item with the per-strap quantity that was requested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestedHardware {
    #[serde(flatten)]
    pub item: HardwareItem,
    pub requested_qty: u32,
}

/// Result of quoting one configuration across all regions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub config: QuoteConfig,
    pub webbing: WebbingItem,
    pub hardware_items: Vec<RequestedHardware>,

    /// Region quotes, cheapest per-unit first
    pub quotes: Vec<RegionQuote>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<QuoteWarning>,
}

impl QuoteResult {
    /// Regions whose MOQ the order satisfies, in ranking order
    pub fn eligible(&self) -> impl Iterator<Item = &RegionQuote> {
        self.quotes.iter().filter(|q| q.meets_minimum)
    }

    /// Lowest per-unit cost among MOQ-eligible regions
    pub fn best_value(&self) -> Option<&RegionQuote> {
        self.eligible()
            .min_by(|a, b| a.breakdown.per_unit.total_cmp(&b.breakdown.per_unit))
    }

    /// Shortest minimum lead time among MOQ-eligible regions, not counting
    /// the best-value region
    pub fn fastest(&self) -> Option<&RegionQuote> {
        let best = self.best_value().map(|q| q.region);
        self.eligible()
            .filter(|q| Some(q.region) != best)
            .min_by_key(|q| q.lead_time_min)
    }
}

/// Unrounded costs for one region
#[derive(Debug, Clone, Copy, Default)]
struct RawCosts {
    webbing: f64,
    hardware: f64,
    labor: f64,
    tooling: f64,
    discount: f64,
    shipping: f64,
    quantity: u32,
}

impl RawCosts {
    fn subtotal(&self) -> f64 {
        self.webbing + self.hardware + self.labor + self.tooling
    }

    fn total(&self) -> f64 {
        self.subtotal() - self.discount + self.shipping
    }

    fn per_unit(&self) -> f64 {
        if self.quantity > 0 {
            self.total() / f64::from(self.quantity)
        } else {
            0.0
        }
    }

    fn rounded(&self) -> CostBreakdown {
        CostBreakdown {
            webbing_cost: round_cents(self.webbing),
            hardware_cost: round_cents(self.hardware),
            labor_cost: round_cents(self.labor),
            tooling_cost: round_cents(self.tooling),
            subtotal: round_cents(self.subtotal()),
            volume_discount: round_cents(self.discount),
            shipping_cost: round_cents(self.shipping),
            total: round_cents(self.total()),
            per_unit: round_cents(self.per_unit()),
        }
    }
}

/// Price `config` in every region of `pricing_rules`.
///
/// Fails only when the webbing id cannot be resolved. Hardware ids missing
/// from `hardware_catalog` are left out of the costs and reported in
/// [`QuoteResult::warnings`]. An empty rule set yields an empty quote list.
pub fn calculate_quote(
    config: &QuoteConfig,
    webbing_catalog: &[WebbingItem],
    hardware_catalog: &[HardwareItem],
    pricing_rules: &[PricingRule],
) -> Result<QuoteResult, QuoteError> {
    let webbing = webbing_catalog
        .iter()
        .find(|w| w.id == config.webbing_id)
        .ok_or_else(|| QuoteError::WebbingNotFound {
            id: config.webbing_id.clone(),
        })?;

    let mut warnings = Vec::new();

    if !config.color.is_empty()
        && !webbing.color_options.is_empty()
        && !webbing.offers_color(&config.color)
    {
        warnings.push(QuoteWarning::UnlistedColor {
            color: config.color.clone(),
        });
    }

    let mut resolved: Vec<(&HardwareItem, u32)> = Vec::new();
    for line in &config.hardware {
        match hardware_catalog.iter().find(|h| h.id == line.id) {
            Some(item) => {
                if !item.fits_width(webbing.width) {
                    warnings.push(QuoteWarning::IncompatibleWidth {
                        id: item.id.clone(),
                        width: webbing.width,
                    });
                }
                resolved.push((item, line.qty));
            }
            None => {
                tracing::warn!(hardware_id = %line.id, "hardware not found in catalog, skipping");
                warnings.push(QuoteWarning::SkippedHardware {
                    id: line.id.clone(),
                });
            }
        }
    }

    let quantity = f64::from(config.quantity);
    let yards_per_unit = config.yards_per_unit();
    let hardware_cost = hardware_cost(&resolved, config.quantity);
    let tooling_types: BTreeSet<String> =
        resolved.iter().map(|(item, _)| item.tooling_type()).collect();
    let weight_lbs = (webbing.specs.weight_per_yard_oz * yards_per_unit / OUNCES_PER_POUND
        * quantity)
        .max(MIN_SHIPPING_WEIGHT_LBS);

    let mut quotes = Vec::with_capacity(pricing_rules.len());
    for rule in pricing_rules {
        let price_per_yard = match webbing.price_per_yard(rule.region) {
            Some(price) => price,
            None => {
                warnings.push(QuoteWarning::MissingRegionPrice {
                    region: rule.region,
                });
                0.0
            }
        };

        let mut raw = RawCosts {
            webbing: yards_per_unit * price_per_yard * quantity,
            hardware: hardware_cost,
            labor: rule.labor_rate_per_unit * quantity,
            tooling: rule.tooling_base
                + rule.tooling_per_hardware_type * tooling_types.len() as f64,
            shipping: rule.shipping_base + rule.shipping_rate_per_lb * weight_lbs,
            quantity: config.quantity,
            ..RawCosts::default()
        };
        raw.discount = (raw.webbing + raw.hardware + raw.labor) * rule.discount_rate(config.quantity);

        let breakdown = raw.rounded();
        tracing::debug!(
            region = %rule.region,
            total = breakdown.total,
            per_unit = breakdown.per_unit,
            "priced region"
        );

        quotes.push(RegionQuote {
            region: rule.region,
            region_label: rule.region.label().to_string(),
            meets_minimum: rule.meets_minimum(config.quantity),
            moq: rule.moq,
            lead_time_min: rule.lead_time_weeks_min,
            lead_time_max: rule.lead_time_weeks_max,
            breakdown,
        });
    }

    // Stable sort: equal per-unit costs keep pricing-rule order
    quotes.sort_by(|a, b| a.breakdown.per_unit.total_cmp(&b.breakdown.per_unit));

    // One entry per catalog item; a repeated id reports its first line's qty
    let mut hardware_items: Vec<RequestedHardware> = Vec::with_capacity(resolved.len());
    for (item, qty) in resolved {
        if hardware_items.iter().all(|h| h.item.id != item.id) {
            hardware_items.push(RequestedHardware {
                item: item.clone(),
                requested_qty: qty,
            });
        }
    }

    Ok(QuoteResult {
        config: config.clone(),
        webbing: webbing.clone(),
        hardware_items,
        quotes,
        warnings,
    })
}

/// Hardware cost for the whole order. Each line is priced at the tier for its
/// total piece count across the order.
fn hardware_cost(lines: &[(&HardwareItem, u32)], quantity: u32) -> f64 {
    lines
        .iter()
        .map(|(item, qty_per_unit)| {
            let total_units = u64::from(*qty_per_unit) * u64::from(quantity);
            let unit_price = item.price_tiers.unit_price(total_units);
            unit_price * f64::from(*qty_per_unit) * f64::from(quantity)
        })
        .sum()
}
