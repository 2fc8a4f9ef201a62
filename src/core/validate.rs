//! Catalog consistency checks
//!
//! Records that parse can still be unusable for quoting: a webbing missing a
//! price for a region that has a pricing rule, hardware without a base tier,
//! overlapping volume breaks. These checks run across the whole catalog.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::core::catalog::Catalog;
use crate::entities::{HardwareItem, PricingRule, Region, WebbingItem, STANDARD_WIDTHS};

/// How serious an issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single problem with a catalog record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Record the issue belongs to, e.g. `webbing WEB-NYLON-1`
    pub record: String,
    pub message: String,
}

/// All issues found in a catalog
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    fn error(&mut self, record: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            severity: Severity::Error,
            record: record.into(),
            message: message.into(),
        });
    }

    fn warning(&mut self, record: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            severity: Severity::Warning,
            record: record.into(),
            message: message.into(),
        });
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// Whether the catalog passes; in strict mode warnings also fail it
    pub fn passes(&self, strict: bool) -> bool {
        if strict {
            self.issues.is_empty()
        } else {
            self.errors().next().is_none()
        }
    }
}

/// Check every cross-record invariant of `catalog`
pub fn validate_catalog(catalog: &Catalog) -> ValidationReport {
    let mut report = ValidationReport::default();

    let mut priced_regions = BTreeSet::new();
    for rule in &catalog.pricing_rules {
        if !priced_regions.insert(rule.region) {
            report.error(
                format!("pricing {}", rule.region),
                "region has more than one pricing rule",
            );
        }
        check_rule(rule, &mut report);
    }

    check_unique_ids(catalog.webbing.iter().map(|w| w.id.as_str()), "webbing", &mut report);
    check_unique_ids(catalog.hardware.iter().map(|h| h.id.as_str()), "hardware", &mut report);

    for webbing in &catalog.webbing {
        check_webbing(webbing, &priced_regions, &mut report);
    }
    for item in &catalog.hardware {
        check_hardware(item, &mut report);
    }

    report
}

fn check_unique_ids<'a>(
    ids: impl Iterator<Item = &'a str>,
    kind: &str,
    report: &mut ValidationReport,
) {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            report.error(format!("{} {}", kind, id), "duplicate id");
        }
    }
}

fn check_rule(rule: &PricingRule, report: &mut ValidationReport) {
    let record = format!("pricing {}", rule.region);

    let costs = [
        ("labor_rate_per_unit", rule.labor_rate_per_unit),
        ("tooling_base", rule.tooling_base),
        ("tooling_per_hardware_type", rule.tooling_per_hardware_type),
        ("shipping_rate_per_lb", rule.shipping_rate_per_lb),
        ("shipping_base", rule.shipping_base),
    ];
    for (field, value) in costs {
        if !(value >= 0.0) {
            report.error(&record, format!("{} must not be negative (got {})", field, value));
        }
    }

    if rule.lead_time_weeks_min > rule.lead_time_weeks_max {
        report.error(
            &record,
            format!(
                "lead time minimum {} exceeds maximum {}",
                rule.lead_time_weeks_min, rule.lead_time_weeks_max
            ),
        );
    }

    let mut previous_max: Option<Option<u32>> = None;
    for (i, brk) in rule.qty_breaks.iter().enumerate() {
        if !(0.0..1.0).contains(&brk.discount) {
            report.error(
                &record,
                format!("qty break {} discount {} is outside 0..1", i + 1, brk.discount),
            );
        }
        if let Some(max) = brk.max {
            if max < brk.min {
                report.error(
                    &record,
                    format!("qty break {} has max {} below min {}", i + 1, max, brk.min),
                );
            }
        }
        match previous_max {
            Some(None) => report.error(
                &record,
                format!("qty break {} follows an unbounded break", i + 1),
            ),
            Some(Some(prev)) if brk.min <= prev => report.error(
                &record,
                format!(
                    "qty break {} starts at {} but the previous break runs to {}",
                    i + 1,
                    brk.min,
                    prev
                ),
            ),
            _ => {}
        }
        previous_max = Some(brk.max);
    }
}

fn check_webbing(webbing: &WebbingItem, priced_regions: &BTreeSet<Region>, report: &mut ValidationReport) {
    let record = format!("webbing {}", webbing.id);

    for region in priced_regions {
        if !webbing.price_per_yard_by_region.contains_key(region) {
            report.error(&record, format!("no price_per_yard for region {}", region));
        }
        if !webbing.moq_by_region.contains_key(region) {
            report.error(&record, format!("no moq for region {}", region));
        }
    }

    for (region, price) in &webbing.price_per_yard_by_region {
        if !(*price >= 0.0) {
            report.error(&record, format!("negative price_per_yard for region {}", region));
        }
    }

    if !webbing.has_standard_width() {
        report.warning(
            &record,
            format!(
                "width {} is not a standard width ({})",
                webbing.width,
                STANDARD_WIDTHS
                    .iter()
                    .map(|w| w.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        );
    }

    if webbing.specs.weight_per_yard_oz <= 0.0 {
        report.warning(
            &record,
            "weight_per_yard_oz is not set; shipping will be billed at the 1 lb minimum",
        );
    }
}

fn check_hardware(item: &HardwareItem, report: &mut ValidationReport) {
    let record = format!("hardware {}", item.id);

    if item.price_tiers.base_price().is_none() {
        report.error(&record, "price_tiers has no base tier at quantity \"1\"");
    }

    let mut previous: Option<f64> = None;
    for tier in item.price_tiers.iter() {
        if !(tier.unit_price >= 0.0) {
            report.error(
                &record,
                format!("negative unit price at tier {}", tier.min_qty),
            );
        }
        if let Some(prev) = previous {
            if tier.unit_price > prev {
                report.warning(
                    &record,
                    format!(
                        "tier {} costs more per unit than the tier below it",
                        tier.min_qty
                    ),
                );
            }
        }
        previous = Some(tier.unit_price);
    }
}
