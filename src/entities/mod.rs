//! Catalog record types
//!
//! SQT prices straps from three kinds of catalog records:
//!
//! - [`WebbingItem`] - Woven strap material with per-region yard pricing and MOQs
//! - [`HardwareItem`] - Buckles, rings, sliders and snaps with quantity price tiers
//! - [`PricingRule`] - Labor, tooling, shipping and volume breaks for one [`Region`]

pub mod hardware;
pub mod pricing_rule;
pub mod region;
pub mod webbing;

pub use hardware::{HardwareCategory, HardwareItem, PriceTier, PriceTiers};
pub use pricing_rule::{PricingRule, QtyBreak};
pub use region::Region;
pub use webbing::{ColorOption, WebbingItem, STANDARD_WIDTHS};
