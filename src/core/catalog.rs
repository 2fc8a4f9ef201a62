//! Catalog snapshot - webbing, hardware and pricing rules loaded together
//!
//! A catalog directory holds one subdirectory per record type:
//!
//! ```text
//! catalog/
//!   webbing/    WebbingItem records
//!   hardware/   HardwareItem records
//!   pricing/    PricingRule records, one per region
//! ```

use miette::Diagnostic;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::loader;
use crate::entities::{HardwareCategory, HardwareItem, PricingRule, WebbingItem};
use crate::pricing::regional::{calculate_quote, QuoteConfig, QuoteError, QuoteResult};
use crate::yaml::YamlSyntaxError;

/// Subdirectory holding webbing records
pub const WEBBING_DIR: &str = "webbing";
/// Subdirectory holding hardware records
pub const HARDWARE_DIR: &str = "hardware";
/// Subdirectory holding pricing rules
pub const PRICING_DIR: &str = "pricing";

/// Errors raised while loading catalog data
#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("catalog data unavailable at {path:?}: {reason}")]
    #[diagnostic(
        code(sqt::catalog::unavailable),
        help("run `sqt init` to create a catalog, or set catalog_dir in .sqt/config.yaml")
    )]
    DataUnavailable { path: PathBuf, reason: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] YamlSyntaxError),
}

/// Filter for webbing listings
#[derive(Debug, Clone, Default)]
pub struct WebbingFilter {
    /// Only this material (case-insensitive)
    pub material: Option<String>,
    /// Include records with `active: false`
    pub include_inactive: bool,
}

impl WebbingFilter {
    fn matches(&self, item: &WebbingItem) -> bool {
        (self.include_inactive || item.active)
            && self
                .material
                .as_ref()
                .map_or(true, |m| item.material.eq_ignore_ascii_case(m))
    }
}

/// Filter for hardware listings
#[derive(Debug, Clone, Default)]
pub struct HardwareFilter {
    pub category: Option<HardwareCategory>,
    /// Only items that fit this webbing width
    pub width: Option<f64>,
    /// Include records with `active: false`
    pub include_inactive: bool,
}

impl HardwareFilter {
    fn matches(&self, item: &HardwareItem) -> bool {
        (self.include_inactive || item.active)
            && self.category.map_or(true, |c| item.category == c)
            && self.width.map_or(true, |w| item.fits_width(w))
    }
}

/// An in-memory snapshot of all three catalogs
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub webbing: Vec<WebbingItem>,
    pub hardware: Vec<HardwareItem>,
    pub pricing_rules: Vec<PricingRule>,
}

impl Catalog {
    /// Load every catalog under `dir`
    pub fn load(dir: &Path) -> Result<Self, CatalogError> {
        let catalog = Self {
            webbing: loader::load_all(&dir.join(WEBBING_DIR))?,
            hardware: loader::load_all(&dir.join(HARDWARE_DIR))?,
            pricing_rules: loader::load_all(&dir.join(PRICING_DIR))?,
        };
        tracing::info!(
            dir = %dir.display(),
            webbing = catalog.webbing.len(),
            hardware = catalog.hardware.len(),
            rules = catalog.pricing_rules.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Look up webbing by id, active or not
    pub fn webbing_by_id(&self, id: &str) -> Option<&WebbingItem> {
        self.webbing.iter().find(|w| w.id == id)
    }

    /// Look up hardware by id, active or not
    pub fn hardware_by_id(&self, id: &str) -> Option<&HardwareItem> {
        self.hardware.iter().find(|h| h.id == id)
    }

    /// Webbing matching `filter`, ordered by material then width
    pub fn list_webbing(&self, filter: &WebbingFilter) -> Vec<&WebbingItem> {
        let mut items: Vec<&WebbingItem> =
            self.webbing.iter().filter(|w| filter.matches(w)).collect();
        items.sort_by(|a, b| {
            a.material
                .cmp(&b.material)
                .then(a.width.total_cmp(&b.width))
        });
        items
    }

    /// Hardware matching `filter`, ordered by category then name
    pub fn list_hardware(&self, filter: &HardwareFilter) -> Vec<&HardwareItem> {
        let mut items: Vec<&HardwareItem> =
            self.hardware.iter().filter(|h| filter.matches(h)).collect();
        items.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
        items
    }

    /// Webbing matching `filter`, grouped by material
    pub fn webbing_by_material(&self, filter: &WebbingFilter) -> BTreeMap<String, Vec<&WebbingItem>> {
        let mut grouped: BTreeMap<String, Vec<&WebbingItem>> = BTreeMap::new();
        for item in self.list_webbing(filter) {
            grouped.entry(item.material.clone()).or_default().push(item);
        }
        grouped
    }

    /// Hardware matching `filter`, grouped by category
    pub fn hardware_by_category(
        &self,
        filter: &HardwareFilter,
    ) -> BTreeMap<HardwareCategory, Vec<&HardwareItem>> {
        let mut grouped: BTreeMap<HardwareCategory, Vec<&HardwareItem>> = BTreeMap::new();
        for item in self.list_hardware(filter) {
            grouped.entry(item.category).or_default().push(item);
        }
        grouped
    }

    /// Pricing rules ordered by ascending MOQ
    pub fn rules_by_moq(&self) -> Vec<&PricingRule> {
        let mut rules: Vec<&PricingRule> = self.pricing_rules.iter().collect();
        rules.sort_by_key(|r| r.moq);
        rules
    }

    /// Quote `config` against this snapshot
    pub fn quote(&self, config: &QuoteConfig) -> Result<QuoteResult, QuoteError> {
        calculate_quote(config, &self.webbing, &self.hardware, &self.pricing_rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::hardware::{HardwareSpecs, PriceTiers};
    use crate::entities::region::Region;
    use std::fs;
    use tempfile::tempdir;

    fn hw(id: &str, name: &str, category: HardwareCategory, widths: &[f64], active: bool) -> HardwareItem {
        HardwareItem {
            id: id.to_string(),
            sku: id.to_string(),
            name: name.to_string(),
            category,
            hardware_type: None,
            width_options: widths.to_vec(),
            price_tiers: PriceTiers::new([(1, 0.50)]),
            specs: HardwareSpecs::default(),
            active,
        }
    }

    fn web(id: &str, material: &str, width: f64, active: bool) -> WebbingItem {
        WebbingItem {
            id: id.to_string(),
            material: material.to_string(),
            width,
            color_options: Vec::new(),
            price_per_yard_by_region: Default::default(),
            moq_by_region: Default::default(),
            specs: Default::default(),
            active,
        }
    }

    fn sample() -> Catalog {
        Catalog {
            webbing: vec![
                web("W-POLY-1", "polyester", 1.0, true),
                web("W-NYL-15", "nylon", 1.5, true),
                web("W-NYL-1", "nylon", 1.0, true),
                web("W-OLD", "nylon", 2.0, false),
            ],
            hardware: vec![
                hw("H-SLIDE", "Tri-Glide", HardwareCategory::Slider, &[], true),
                hw("H-CAM", "Cam Buckle", HardwareCategory::Buckle, &[1.0], true),
                hw("H-SR", "Side Release", HardwareCategory::Buckle, &[1.5], true),
                hw("H-GONE", "Retired Ring", HardwareCategory::Ring, &[], false),
            ],
            pricing_rules: Vec::new(),
        }
    }

    #[test]
    fn test_list_webbing_filters_inactive_and_sorts() {
        let catalog = sample();
        let ids: Vec<&str> = catalog
            .list_webbing(&WebbingFilter::default())
            .iter()
            .map(|w| w.id.as_str())
            .collect();
        assert_eq!(ids, vec!["W-NYL-1", "W-NYL-15", "W-POLY-1"]);

        let all = catalog.list_webbing(&WebbingFilter {
            include_inactive: true,
            ..Default::default()
        });
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn test_webbing_material_filter() {
        let catalog = sample();
        let filter = WebbingFilter {
            material: Some("Polyester".to_string()),
            ..Default::default()
        };
        assert_eq!(catalog.list_webbing(&filter).len(), 1);
    }

    #[test]
    fn test_hardware_category_and_width_filters() {
        let catalog = sample();
        let buckles = catalog.list_hardware(&HardwareFilter {
            category: Some(HardwareCategory::Buckle),
            ..Default::default()
        });
        assert_eq!(buckles.len(), 2);
        assert_eq!(buckles[0].name, "Cam Buckle");

        let fits_one_inch: Vec<&str> = catalog
            .list_hardware(&HardwareFilter {
                width: Some(1.0),
                ..Default::default()
            })
            .iter()
            .map(|h| h.id.as_str())
            .collect();
        assert_eq!(fits_one_inch, vec!["H-CAM", "H-SLIDE"]);
    }

    #[test]
    fn test_grouping() {
        let catalog = sample();
        let by_category = catalog.hardware_by_category(&HardwareFilter::default());
        assert_eq!(by_category[&HardwareCategory::Buckle].len(), 2);
        assert!(!by_category.contains_key(&HardwareCategory::Ring));

        let by_material = catalog.webbing_by_material(&WebbingFilter::default());
        assert_eq!(by_material["nylon"].len(), 2);
        assert_eq!(by_material["polyester"].len(), 1);
    }

    #[test]
    fn test_lookup_by_id_includes_inactive() {
        let catalog = sample();
        assert!(catalog.webbing_by_id("W-OLD").is_some());
        assert!(catalog.hardware_by_id("H-GONE").is_some());
        assert!(catalog.hardware_by_id("H-NOPE").is_none());
    }

    #[test]
    fn test_load_requires_all_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(WEBBING_DIR)).unwrap();
        fs::create_dir_all(dir.path().join(HARDWARE_DIR)).unwrap();

        let err = Catalog::load(dir.path()).unwrap_err();
        assert!(matches!(err, CatalogError::DataUnavailable { .. }));

        fs::create_dir_all(dir.path().join(PRICING_DIR)).unwrap();
        let catalog = Catalog::load(dir.path()).unwrap();
        assert!(catalog.pricing_rules.is_empty());
    }

    #[test]
    fn test_rules_by_moq() {
        let mut catalog = sample();
        let yaml = |region: &str, moq: u32| {
            format!(
                "region: {region}\nlabor_rate_per_unit: 1\ntooling_base: 0\ntooling_per_hardware_type: 0\n\
shipping_rate_per_lb: 0\nshipping_base: 0\nlead_time_weeks_min: 1\nlead_time_weeks_max: 2\nmoq: {moq}\n"
            )
        };
        catalog.pricing_rules = vec![
            serde_yml::from_str(&yaml("china", 1000)).unwrap(),
            serde_yml::from_str(&yaml("usa", 100)).unwrap(),
        ];
        let regions: Vec<Region> = catalog.rules_by_moq().iter().map(|r| r.region).collect();
        assert_eq!(regions, vec![Region::Usa, Region::China]);
    }
}
