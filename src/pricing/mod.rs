//! Strap pricing
//!
//! Two independent pricing models live here:
//!
//! - [`regional`] - landed-cost quotes across every manufacturing region,
//!   driven by the webbing, hardware and pricing-rule catalogs
//! - [`unit`] - the flat single-region quote used by the quick builder
//!
//! They differ in how the volume discount is applied (the regional model
//! exempts tooling from the discount base, the flat model discounts the whole
//! subtotal) and are intentionally kept separate.
//!
//! # Rounding
//!
//! Every monetary figure is rounded to cents on its own, from the unrounded
//! intermediate values. Reported subtotals and totals are therefore *not*
//! re-sums of the rounded line items and may differ from them by a cent or
//! two.

pub mod regional;
pub mod unit;

pub use regional::{
    calculate_quote, CostBreakdown, HardwareLine, QuoteConfig, QuoteError, QuoteResult,
    QuoteWarning, RegionQuote, RequestedHardware,
};
pub use unit::{
    calculate_price, quantity_discount_label, BuckleType, HardwareSelection, LineItem, Material,
    PriceBreakdown, StrapSpecs,
};

/// Inches of webbing per yard
pub const INCHES_PER_YARD: f64 = 36.0;

/// Round a monetary amount to cents
///
/// Rounds the exact decimal value of `amount`, not `amount * 100`, so
/// 1.105 (stored as 1.10499...) becomes 1.10. Half-cent ties that a double
/// represents exactly (odd multiples of 1/8) go away from zero.
pub fn round_cents(amount: f64) -> f64 {
    let eighths = amount * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        return (amount * 100.0).round() / 100.0;
    }
    format!("{:.2}", amount).parse().unwrap_or(amount)
}
