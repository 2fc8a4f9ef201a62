//! `sqt hardware` command - Browse the hardware catalog

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{
    format_inches, format_money, markdown_table, print_json, print_yaml, truncate_str, write_csv,
    CatalogContext,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::HardwareFilter;
use crate::entities::{HardwareCategory, HardwareItem};

#[derive(Subcommand, Debug)]
pub enum HardwareCommands {
    /// List hardware with filtering
    List(ListArgs),

    /// Show a hardware record's details and price tiers
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by category (buckle, ring, slider, snap, other)
    #[arg(long, short = 'c')]
    pub category: Option<HardwareCategory>,

    /// Only hardware that fits this webbing width in inches
    #[arg(long, short = 'w')]
    pub width: Option<f64>,

    /// Group the listing by category
    #[arg(long, short = 'g')]
    pub grouped: bool,

    /// Include inactive records
    #[arg(long)]
    pub all: bool,

    /// Show count only
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Hardware id
    pub id: String,
}

pub fn run(cmd: HardwareCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        HardwareCommands::List(args) => run_list(args, global),
        HardwareCommands::Show(args) => run_show(args, global),
    }
}

fn widths_cell(item: &HardwareItem) -> String {
    if item.width_options.is_empty() {
        "any".to_string()
    } else {
        item.width_options
            .iter()
            .map(|w| format_inches(*w))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn base_price_cell(item: &HardwareItem) -> String {
    item.price_tiers
        .base_price()
        .map_or("-".to_string(), format_money)
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = CatalogContext::load(global)?;
    let filter = HardwareFilter {
        category: args.category,
        width: args.width,
        include_inactive: args.all,
    };
    let items = ctx.catalog.list_hardware(&filter);

    if args.count {
        println!("{}", items.len());
        return Ok(());
    }

    if items.is_empty() {
        if !global.quiet {
            println!("No hardware found.");
        }
        return Ok(());
    }

    match ctx.format(global, OutputFormat::Tsv) {
        OutputFormat::Json => print_json(&items)?,
        OutputFormat::Yaml => print_yaml(&items)?,
        OutputFormat::Csv => write_csv(
            &["id", "sku", "name", "category", "type", "widths", "base_price", "active"],
            items.iter().map(|h| {
                vec![
                    h.id.clone(),
                    h.sku.clone(),
                    h.name.clone(),
                    h.category.to_string(),
                    h.tooling_type(),
                    widths_cell(h),
                    h.price_tiers
                        .base_price()
                        .map_or(String::new(), |p| format!("{:.2}", p)),
                    h.active.to_string(),
                ]
            }),
        )?,
        OutputFormat::Id => {
            for item in &items {
                println!("{}", item.id);
            }
        }
        OutputFormat::Md => println!(
            "{}",
            markdown_table(
                &["ID", "Name", "Category", "Type", "Widths", "Base Price"],
                items.iter().map(|h| {
                    vec![
                        h.id.clone(),
                        h.name.clone(),
                        h.category.to_string(),
                        h.tooling_type(),
                        widths_cell(h),
                        base_price_cell(h),
                    ]
                }),
            )
        ),
        OutputFormat::Tsv | OutputFormat::Auto => {
            let print_header = || {
                println!(
                    "{:<12} {:<26} {:<9} {:<14} {:<12} {:<8}",
                    style("ID").bold(),
                    style("NAME").bold(),
                    style("CATEGORY").bold(),
                    style("TYPE").bold(),
                    style("WIDTHS").bold(),
                    style("BASE").bold()
                );
                println!("{}", "-".repeat(86));
            };
            let print_row = |h: &HardwareItem| {
                let id = if h.active {
                    style(truncate_str(&h.id, 12)).cyan()
                } else {
                    style(truncate_str(&h.id, 12)).dim()
                };
                println!(
                    "{:<12} {:<26} {:<9} {:<14} {:<12} {:<8}",
                    id,
                    truncate_str(&h.name, 26),
                    h.category,
                    truncate_str(&h.tooling_type(), 14),
                    truncate_str(&widths_cell(h), 12),
                    base_price_cell(h)
                );
            };

            if args.grouped {
                for (category, group) in ctx.catalog.hardware_by_category(&filter) {
                    println!(
                        "{} ({})",
                        style(category).bold().underlined(),
                        group.len()
                    );
                    print_header();
                    for item in group {
                        print_row(item);
                    }
                    println!();
                }
            } else {
                print_header();
                for item in &items {
                    print_row(item);
                }
                println!();
            }

            if !global.quiet {
                println!("{} hardware record(s) found.", style(items.len()).cyan());
            }
        }
    }

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = CatalogContext::load(global)?;
    let item = ctx.catalog.hardware_by_id(&args.id).ok_or_else(|| {
        miette::miette!(
            help = "run `sqt hardware list --all` to see every id",
            "No hardware found matching '{}'",
            args.id
        )
    })?;

    match ctx.format(global, OutputFormat::Yaml) {
        OutputFormat::Json => print_json(item)?,
        OutputFormat::Id => println!("{}", item.id),
        OutputFormat::Md => println!("{}", tier_table(item)),
        OutputFormat::Tsv => print_detail(item),
        _ => print_yaml(item)?,
    }

    Ok(())
}

fn tier_table(item: &HardwareItem) -> String {
    markdown_table(
        &["Min Qty", "Unit Price"],
        item.price_tiers
            .iter()
            .map(|t| vec![t.min_qty.to_string(), format_money(t.unit_price)]),
    )
}

fn print_detail(item: &HardwareItem) {
    println!(
        "{}",
        style(format!("{} ({})", item.name, item.id)).bold()
    );
    if !item.active {
        println!("  {}", style("inactive").yellow());
    }
    println!("  SKU:       {}", item.sku);
    println!("  Category:  {} ({})", item.category, item.tooling_type());
    println!("  Widths:    {}", widths_cell(item));
    if let Some(material) = &item.specs.material {
        let finish = item
            .specs
            .finish
            .as_ref()
            .map(|f| format!(", {}", f))
            .unwrap_or_default();
        println!("  Material:  {}{}", material, finish);
    }
    println!(
        "  Weight:    {} g   Load rating: {} lbs",
        item.specs.weight_g, item.specs.load_rating_lbs
    );
    println!();
    println!(
        "{:<10} {:<10}",
        style("MIN QTY").bold(),
        style("UNIT").bold()
    );
    for tier in item.price_tiers.iter() {
        println!("{:<10} {:<10}", tier.min_qty, format_money(tier.unit_price));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::hardware::{HardwareSpecs, PriceTiers};

    fn buckle(widths: &[f64]) -> HardwareItem {
        HardwareItem {
            id: "HW-SRB-100".to_string(),
            sku: "SRB-1".to_string(),
            name: "Side Release Buckle".to_string(),
            category: HardwareCategory::Buckle,
            hardware_type: Some("side-release".to_string()),
            width_options: widths.to_vec(),
            price_tiers: PriceTiers::new([(500, 0.80), (1, 1.00)]),
            specs: HardwareSpecs::default(),
            active: true,
        }
    }

    #[test]
    fn test_widths_cell() {
        assert_eq!(widths_cell(&buckle(&[])), "any");
        assert_eq!(widths_cell(&buckle(&[1.0, 1.5])), "1\" 1.5\"");
    }

    #[test]
    fn test_tier_table_is_ascending() {
        let table = tier_table(&buckle(&[]));
        let base = table.find("$1.00").unwrap();
        let bulk = table.find("$0.80").unwrap();
        assert!(base < bulk);
        assert_eq!(base_price_cell(&buckle(&[])), "$1.00");
    }
}
