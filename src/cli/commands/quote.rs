//! `sqt quote` command - Multi-region strap quotes

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::helpers::{
    format_inches, format_money, markdown_table, print_json, print_yaml, truncate_str, write_csv,
    CatalogContext,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::entities::Region;
use crate::pricing::{HardwareLine, QuoteConfig, QuoteResult, RegionQuote};
use crate::yaml::parse_yaml;

#[derive(clap::Args, Debug)]
pub struct QuoteArgs {
    /// Webbing catalog id
    #[arg(long, short = 'w', required_unless_present = "file")]
    pub webbing: Option<String>,

    /// Finished strap length in inches
    #[arg(long, short = 'l', required_unless_present = "file")]
    pub length: Option<f64>,

    /// Layers of webbing (default: config default_plies, else 1)
    #[arg(long, short = 'p')]
    pub plies: Option<u32>,

    /// Webbing color
    #[arg(long, short = 'c')]
    pub color: Option<String>,

    /// Hardware per strap as ID or ID:QTY (repeatable)
    #[arg(long = "hardware", short = 'H')]
    pub hardware: Vec<HardwareLine>,

    /// Number of finished straps
    #[arg(long, short = 'n', required_unless_present = "file")]
    pub quantity: Option<u32>,

    /// Read the strap configuration from a YAML or JSON file
    #[arg(long, conflicts_with_all = ["webbing", "length", "plies", "color", "hardware", "quantity"])]
    pub file: Option<PathBuf>,

    /// Only show regions whose minimum order quantity is met
    #[arg(long)]
    pub eligible: bool,

    /// Show the full cost breakdown per region
    #[arg(long, short = 'd')]
    pub detail: bool,
}

/// Serialized form of a quote, with the highlighted regions called out
#[derive(Serialize)]
struct QuoteReport<'a> {
    #[serde(flatten)]
    result: &'a QuoteResult,
    best_value: Option<Region>,
    fastest: Option<Region>,
}

pub fn run(args: QuoteArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = CatalogContext::load(global)?;
    let config = build_config(&args, &ctx.config)?;
    config.validate()?;

    let mut result = ctx.catalog.quote(&config)?;
    let best_value = result.best_value().map(|q| q.region);
    let fastest = result.fastest().map(|q| q.region);
    if args.eligible {
        result.quotes.retain(|q| q.meets_minimum);
    }

    let format = ctx.format(global, OutputFormat::Tsv);
    if !matches!(format, OutputFormat::Json | OutputFormat::Yaml) && !global.quiet {
        for warning in &result.warnings {
            eprintln!("{} {}", style("!").yellow(), warning);
        }
    }

    match format {
        OutputFormat::Json => print_json(&QuoteReport {
            result: &result,
            best_value,
            fastest,
        })?,
        OutputFormat::Yaml => print_yaml(&QuoteReport {
            result: &result,
            best_value,
            fastest,
        })?,
        OutputFormat::Csv => write_csv(
            &[
                "rank",
                "region",
                "meets_minimum",
                "moq",
                "lead_time_min",
                "lead_time_max",
                "webbing_cost",
                "hardware_cost",
                "labor_cost",
                "tooling_cost",
                "subtotal",
                "volume_discount",
                "shipping_cost",
                "total",
                "per_unit",
            ],
            result.quotes.iter().enumerate().map(|(i, q)| {
                let b = &q.breakdown;
                vec![
                    (i + 1).to_string(),
                    q.region.to_string(),
                    q.meets_minimum.to_string(),
                    q.moq.to_string(),
                    q.lead_time_min.to_string(),
                    q.lead_time_max.to_string(),
                    format!("{:.2}", b.webbing_cost),
                    format!("{:.2}", b.hardware_cost),
                    format!("{:.2}", b.labor_cost),
                    format!("{:.2}", b.tooling_cost),
                    format!("{:.2}", b.subtotal),
                    format!("{:.2}", b.volume_discount),
                    format!("{:.2}", b.shipping_cost),
                    format!("{:.2}", b.total),
                    format!("{:.2}", b.per_unit),
                ]
            }),
        )?,
        OutputFormat::Id => {
            for quote in &result.quotes {
                println!("{}", quote.region);
            }
        }
        OutputFormat::Md => print_markdown(&result, best_value, fastest),
        OutputFormat::Tsv | OutputFormat::Auto => {
            print_table(&result, best_value, fastest, args.detail, global.quiet)
        }
    }

    Ok(())
}

/// Assemble the configuration from `--file` or the individual flags
fn build_config(args: &QuoteArgs, config: &Config) -> Result<QuoteConfig> {
    if let Some(path) = &args.file {
        return read_config_file(path, config);
    }

    let missing = |flag: &str| miette::miette!("{} is required unless --file is given", flag);
    Ok(QuoteConfig {
        webbing_id: args.webbing.clone().ok_or_else(|| missing("--webbing"))?,
        length_inches: args.length.ok_or_else(|| missing("--length"))?,
        color: args.color.clone().unwrap_or_default(),
        plies: args.plies.unwrap_or_else(|| config.plies()),
        hardware: args.hardware.clone(),
        quantity: args.quantity.ok_or_else(|| missing("--quantity"))?,
    })
}

/// Whether a config file sets `plies` at all
#[derive(Deserialize)]
struct PliesField {
    plies: Option<u32>,
}

/// Read a config file. A file without `plies` takes the configured default.
fn read_config_file(path: &Path, defaults: &Config) -> Result<QuoteConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| miette::miette!("cannot read {}: {}", path.display(), e))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let (mut config, plies) = if is_json {
        let config: QuoteConfig = serde_json::from_str(&content).into_diagnostic()?;
        let field: PliesField = serde_json::from_str(&content).into_diagnostic()?;
        (config, field.plies)
    } else {
        let filename = path.display().to_string();
        let config: QuoteConfig = parse_yaml(&content, &filename)?;
        let field: PliesField = parse_yaml(&content, &filename)?;
        (config, field.plies)
    };

    if plies.is_none() {
        config.plies = defaults.plies();
    }
    Ok(config)
}

fn marker(quote: &RegionQuote, best: Option<Region>, fastest: Option<Region>) -> String {
    if Some(quote.region) == best {
        "★ best value".to_string()
    } else if Some(quote.region) == fastest {
        "⚡ fastest".to_string()
    } else if !quote.meets_minimum {
        format!("below MOQ ({})", quote.moq)
    } else {
        String::new()
    }
}

fn lead_time(quote: &RegionQuote) -> String {
    format!("{}-{} wk", quote.lead_time_min, quote.lead_time_max)
}

fn print_table(
    result: &QuoteResult,
    best: Option<Region>,
    fastest: Option<Region>,
    detail: bool,
    quiet: bool,
) {
    let config = &result.config;
    if !quiet {
        println!(
            "{} {} ({}) × {} straps",
            style("Quote:").bold(),
            style(result.webbing.display_name()).cyan(),
            result.webbing.id,
            style(config.quantity).cyan()
        );
        let color = if config.color.is_empty() {
            String::new()
        } else {
            format!(", {}", config.color)
        };
        println!(
            "  {} long, {} ply{}",
            format_inches(config.length_inches),
            config.plies,
            color
        );
        for requested in &result.hardware_items {
            println!(
                "  {} {} × {}",
                style("+").dim(),
                requested.item.name,
                requested.requested_qty
            );
        }
        println!();
    }

    let mut header = vec![
        format!("{:<4}", style("#").bold().dim()),
        format!("{:<22}", style("REGION").bold()),
        format!("{:<10}", style("PER UNIT").bold()),
        format!("{:<12}", style("TOTAL").bold()),
    ];
    if detail {
        for title in ["WEBBING", "HARDWARE", "LABOR", "TOOLING", "DISCOUNT", "SHIPPING"] {
            header.push(format!("{:<11}", style(title).bold()));
        }
    }
    header.push(format!("{:<7}", style("MOQ").bold()));
    header.push(format!("{:<9}", style("LEAD").bold()));
    println!("{}", header.join(" "));
    println!("{}", "-".repeat(if detail { 144 } else { 76 }));

    for (i, quote) in result.quotes.iter().enumerate() {
        let b = &quote.breakdown;
        let mut row = vec![
            format!("{:<4}", i + 1),
            format!("{:<22}", style(truncate_str(&quote.region_label, 22)).cyan()),
            format!("{:<10}", format_money(b.per_unit)),
            format!("{:<12}", format_money(b.total)),
        ];
        if detail {
            for amount in [
                b.webbing_cost,
                b.hardware_cost,
                b.labor_cost,
                b.tooling_cost,
                -b.volume_discount,
                b.shipping_cost,
            ] {
                row.push(format!("{:<11}", format_money(amount)));
            }
        }
        row.push(format!("{:<7}", quote.moq));
        row.push(format!("{:<9}", lead_time(quote)));

        let mark = marker(quote, best, fastest);
        let mark = if Some(quote.region) == best {
            style(mark).green().bold().to_string()
        } else if Some(quote.region) == fastest {
            style(mark).yellow().to_string()
        } else {
            style(mark).dim().to_string()
        };
        row.push(mark);
        println!("{}", row.join(" "));
    }

    if quiet {
        return;
    }
    println!();
    if result.quotes.is_empty() {
        println!("{} No pricing rules in the catalog", style("!").yellow());
        return;
    }
    match best {
        Some(_) => println!(
            "{} of {} region(s) meet the minimum order quantity.",
            style(result.eligible().count()).cyan(),
            style(result.quotes.len()).cyan()
        ),
        None => println!(
            "{} No region's minimum order quantity is met at {} straps",
            style("!").yellow(),
            config.quantity
        ),
    }
}

fn print_markdown(result: &QuoteResult, best: Option<Region>, fastest: Option<Region>) {
    println!(
        "# Quote: {} ({}) × {}\n",
        result.webbing.display_name(),
        result.webbing.id,
        result.config.quantity
    );
    let rows = result.quotes.iter().enumerate().map(|(i, q)| {
        let b = &q.breakdown;
        vec![
            (i + 1).to_string(),
            q.region_label.clone(),
            format_money(b.webbing_cost),
            format_money(b.hardware_cost),
            format_money(b.labor_cost),
            format_money(b.tooling_cost),
            format_money(-b.volume_discount),
            format_money(b.shipping_cost),
            format_money(b.total),
            format_money(b.per_unit),
            q.moq.to_string(),
            lead_time(q),
            marker(q, best, fastest),
        ]
    });
    println!(
        "{}",
        markdown_table(
            &[
                "#", "Region", "Webbing", "Hardware", "Labor", "Tooling", "Discount", "Shipping",
                "Total", "Per Unit", "MOQ", "Lead", "Notes",
            ],
            rows,
        )
    );
    if !result.warnings.is_empty() {
        println!("\n## Warnings\n");
        for warning in &result.warnings {
            println!("- {}", warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> QuoteArgs {
        QuoteArgs {
            webbing: Some("WEB-NYL-100".to_string()),
            length: Some(24.0),
            plies: None,
            color: None,
            hardware: vec!["HW-SRB-100:2".parse().unwrap()],
            quantity: Some(500),
            file: None,
            eligible: false,
            detail: false,
        }
    }

    #[test]
    fn test_build_config_uses_configured_plies() {
        let config = Config {
            default_plies: Some(2),
            ..Default::default()
        };
        let quote = build_config(&args(), &config).unwrap();
        assert_eq!(quote.plies, 2);
        assert_eq!(quote.hardware[0].qty, 2);
        assert_eq!(quote.color, "");

        let explicit = QuoteArgs {
            plies: Some(3),
            ..args()
        };
        assert_eq!(build_config(&explicit, &config).unwrap().plies, 3);
    }

    #[test]
    fn test_read_config_file_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("strap.yaml");
        std::fs::write(
            &yaml,
            "webbing_id: WEB-NYL-100\nlength_inches: 18\nquantity: 250\nhardware:\n  - id: HW-CAM-100\n    qty: 1\n",
        )
        .unwrap();
        let config = read_config_file(&yaml, &Config::default()).unwrap();
        assert_eq!(config.quantity, 250);
        assert_eq!(config.plies, 1);
        assert_eq!(config.hardware.len(), 1);

        let json = dir.path().join("strap.json");
        std::fs::write(
            &json,
            r#"{"webbing_id": "WEB-PES-100", "length_inches": 30, "plies": 2, "quantity": 100}"#,
        )
        .unwrap();
        let config = read_config_file(&json, &Config::default()).unwrap();
        assert_eq!(config.webbing_id, "WEB-PES-100");
        assert_eq!(config.plies, 2);
    }

    #[test]
    fn test_config_file_without_plies_uses_configured_default() {
        let dir = tempfile::tempdir().unwrap();
        let defaults = Config {
            default_plies: Some(2),
            ..Default::default()
        };

        let yaml = dir.path().join("strap.yaml");
        std::fs::write(&yaml, "webbing_id: WEB-NYL-100\nlength_inches: 24\nquantity: 500\n").unwrap();
        assert_eq!(read_config_file(&yaml, &defaults).unwrap().plies, 2);

        let json = dir.path().join("strap.json");
        std::fs::write(
            &json,
            r#"{"webbing_id": "WEB-NYL-100", "length_inches": 24, "quantity": 500}"#,
        )
        .unwrap();
        assert_eq!(read_config_file(&json, &defaults).unwrap().plies, 2);

        // An explicit value in the file still wins
        let explicit = dir.path().join("explicit.yaml");
        std::fs::write(
            &explicit,
            "webbing_id: WEB-NYL-100\nlength_inches: 24\nplies: 1\nquantity: 500\n",
        )
        .unwrap();
        assert_eq!(read_config_file(&explicit, &defaults).unwrap().plies, 1);
    }

    #[test]
    fn test_lead_time_format() {
        let quote = RegionQuote {
            region: Region::Usa,
            region_label: Region::Usa.label().to_string(),
            meets_minimum: false,
            moq: 100,
            lead_time_min: 2,
            lead_time_max: 4,
            breakdown: Default::default(),
        };
        assert_eq!(lead_time(&quote), "2-4 wk");
        assert_eq!(marker(&quote, None, None), "below MOQ (100)");
        assert_eq!(marker(&quote, Some(Region::Usa), None), "★ best value");
    }
}
