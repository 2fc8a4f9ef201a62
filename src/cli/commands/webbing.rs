//! `sqt webbing` command - Browse the webbing catalog

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{
    format_inches, format_money, markdown_table, print_json, print_yaml, truncate_str, write_csv,
    CatalogContext,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::WebbingFilter;
use crate::entities::{Region, WebbingItem};

#[derive(Subcommand, Debug)]
pub enum WebbingCommands {
    /// List webbing with filtering
    List(ListArgs),

    /// Show a webbing record's details
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by material (e.g., nylon)
    #[arg(long, short = 'm')]
    pub material: Option<String>,

    /// Show price and MOQ for this region instead of the cheapest price
    #[arg(long, short = 'r')]
    pub region: Option<Region>,

    /// Group the listing by material
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
    /// Webbing id
    pub id: String,
}

pub fn run(cmd: WebbingCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        WebbingCommands::List(args) => run_list(args, global),
        WebbingCommands::Show(args) => run_show(args, global),
    }
}

/// Price column for a listing: the chosen region's price, else the cheapest
fn price_cell(item: &WebbingItem, region: Option<Region>) -> String {
    match region {
        Some(region) => item
            .price_per_yard(region)
            .map_or("-".to_string(), format_money),
        None => item
            .price_per_yard_by_region
            .values()
            .copied()
            .min_by(f64::total_cmp)
            .map_or("-".to_string(), |p| format!("from {}", format_money(p))),
    }
}

fn moq_cell(item: &WebbingItem, region: Option<Region>) -> String {
    match region {
        Some(region) => item
            .moq_by_region
            .get(&region)
            .map_or("-".to_string(), |m| m.to_string()),
        None => item
            .moq_by_region
            .values()
            .min()
            .map_or("-".to_string(), |m| m.to_string()),
    }
}

fn colors_cell(item: &WebbingItem) -> String {
    item.color_options
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = CatalogContext::load(global)?;
    let filter = WebbingFilter {
        material: args.material.clone(),
        include_inactive: args.all,
    };
    let items = ctx.catalog.list_webbing(&filter);

    if args.count {
        println!("{}", items.len());
        return Ok(());
    }

    if items.is_empty() {
        if !global.quiet {
            println!("No webbing found.");
        }
        return Ok(());
    }

    match ctx.format(global, OutputFormat::Tsv) {
        OutputFormat::Json => print_json(&items)?,
        OutputFormat::Yaml => print_yaml(&items)?,
        OutputFormat::Csv => write_csv(
            &["id", "material", "width", "colors", "price_per_yard", "moq", "active"],
            items.iter().map(|w| {
                vec![
                    w.id.clone(),
                    w.material.clone(),
                    w.width.to_string(),
                    colors_cell(w),
                    price_cell(w, args.region),
                    moq_cell(w, args.region),
                    w.active.to_string(),
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
                &["ID", "Material", "Width", "Colors", "Price/yd", "MOQ"],
                items.iter().map(|w| {
                    vec![
                        w.id.clone(),
                        w.material.clone(),
                        format_inches(w.width),
                        colors_cell(w),
                        price_cell(w, args.region),
                        moq_cell(w, args.region),
                    ]
                }),
            )
        ),
        OutputFormat::Tsv | OutputFormat::Auto => {
            let print_header = || {
                println!(
                    "{:<14} {:<14} {:<7} {:<26} {:<14} {:<6}",
                    style("ID").bold(),
                    style("MATERIAL").bold(),
                    style("WIDTH").bold(),
                    style("COLORS").bold(),
                    style("PRICE/YD").bold(),
                    style("MOQ").bold()
                );
                println!("{}", "-".repeat(86));
            };
            let print_row = |w: &WebbingItem| {
                let id = if w.active {
                    style(truncate_str(&w.id, 14)).cyan()
                } else {
                    style(truncate_str(&w.id, 14)).dim()
                };
                println!(
                    "{:<14} {:<14} {:<7} {:<26} {:<14} {:<6}",
                    id,
                    truncate_str(&w.material, 14),
                    format_inches(w.width),
                    truncate_str(&colors_cell(w), 26),
                    price_cell(w, args.region),
                    moq_cell(w, args.region)
                );
            };

            if args.grouped {
                for (material, group) in ctx.catalog.webbing_by_material(&filter) {
                    println!("{} ({})", style(&material).bold().underlined(), group.len());
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
                let priced = match args.region {
                    Some(region) => format!("Prices shown for {}.", region.label()),
                    None => "Prices shown are the lowest across regions.".to_string(),
                };
                println!(
                    "{} webbing record(s) found. {}",
                    style(items.len()).cyan(),
                    priced
                );
            }
        }
    }

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = CatalogContext::load(global)?;
    let item = ctx.catalog.webbing_by_id(&args.id).ok_or_else(|| {
        miette::miette!(
            help = "run `sqt webbing list --all` to see every id",
            "No webbing found matching '{}'",
            args.id
        )
    })?;

    match ctx.format(global, OutputFormat::Yaml) {
        OutputFormat::Json => print_json(item)?,
        OutputFormat::Id => println!("{}", item.id),
        OutputFormat::Tsv => print_detail(item),
        OutputFormat::Md => println!(
            "{}",
            markdown_table(
                &["Region", "Price/yd", "MOQ"],
                region_rows(item).map(|(label, price, moq)| vec![label, price, moq]),
            )
        ),
        _ => print_yaml(item)?,
    }

    Ok(())
}

fn region_rows(item: &WebbingItem) -> impl Iterator<Item = (String, String, String)> + '_ {
    Region::ALL.into_iter().map(move |region| {
        (
            region.label().to_string(),
            item.price_per_yard(region)
                .map_or("-".to_string(), format_money),
            item.moq_by_region
                .get(&region)
                .map_or("-".to_string(), |m| m.to_string()),
        )
    })
}

fn print_detail(item: &WebbingItem) {
    println!("{}", style(format!("{} ({})", item.display_name(), item.id)).bold());
    if !item.active {
        println!("  {}", style("inactive").yellow());
    }
    println!("  Colors:    {}", colors_cell(item));
    println!(
        "  Strength:  {} lbs   Weight: {} oz/yd",
        item.specs.tensile_strength_lbs, item.specs.weight_per_yard_oz
    );
    if let Some(stretch) = item.specs.stretch_percent {
        println!("  Stretch:   {}%", stretch);
    }
    println!();
    println!(
        "{:<22} {:<10} {:<6}",
        style("REGION").bold(),
        style("PRICE/YD").bold(),
        style("MOQ").bold()
    );
    for (label, price, moq) in region_rows(item) {
        println!("{:<22} {:<10} {:<6}", label, price, moq);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn item() -> WebbingItem {
        WebbingItem {
            id: "WEB-NYL-100".to_string(),
            material: "nylon".to_string(),
            width: 1.0,
            color_options: Vec::new(),
            price_per_yard_by_region: BTreeMap::from([
                (Region::Usa, 0.50),
                (Region::China, 0.18),
            ]),
            moq_by_region: BTreeMap::from([(Region::Usa, 100), (Region::China, 1000)]),
            specs: Default::default(),
            active: true,
        }
    }

    #[test]
    fn test_price_cell() {
        assert_eq!(price_cell(&item(), None), "from $0.18");
        assert_eq!(price_cell(&item(), Some(Region::Usa)), "$0.50");
        assert_eq!(price_cell(&item(), Some(Region::Mexico)), "-");
    }

    #[test]
    fn test_moq_cell() {
        assert_eq!(moq_cell(&item(), None), "100");
        assert_eq!(moq_cell(&item(), Some(Region::China)), "1000");
    }

    #[test]
    fn test_region_rows_cover_every_region() {
        let rows: Vec<_> = region_rows(&item()).collect();
        assert_eq!(rows.len(), Region::ALL.len());
        assert_eq!(rows[0].1, "$0.50");
    }
}
