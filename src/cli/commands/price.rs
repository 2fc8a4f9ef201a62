//! `sqt price` command - Flat single-region strap pricing

use console::style;
use miette::Result;

use crate::cli::helpers::{
    format_inches, format_money, markdown_table, print_json, print_yaml, resolve_format,
    write_csv,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Config, Project};
use crate::pricing::{
    calculate_price, quantity_discount_label, BuckleType, HardwareSelection, Material,
    PriceBreakdown, StrapSpecs,
};

#[derive(clap::Args, Debug)]
pub struct PriceArgs {
    /// Strap length in inches
    #[arg(long, short = 'l')]
    pub length: f64,

    /// Strap width in inches
    #[arg(long, short = 'w', default_value_t = 1.0)]
    pub width: f64,

    /// Strap material
    #[arg(long, short = 'm', value_enum, default_value_t = Material::Nylon)]
    pub material: Material,

    /// Strap color
    #[arg(long, short = 'c', default_value = "black")]
    pub color: String,

    /// Buckle style
    #[arg(long, short = 'b', value_enum, default_value_t = BuckleType::None)]
    pub buckle: BuckleType,

    /// Add a pair of D-rings
    #[arg(long)]
    pub d_rings: bool,

    /// Add a rivet set
    #[arg(long)]
    pub rivets: bool,

    /// Add snap fasteners
    #[arg(long)]
    pub snaps: bool,

    /// Add velcro strips
    #[arg(long)]
    pub velcro: bool,

    /// Add a tri-glide adjuster
    #[arg(long)]
    pub tri_glide: bool,

    /// Number of straps
    #[arg(long, short = 'n', default_value_t = 1)]
    pub quantity: u32,
}

impl PriceArgs {
    fn specs(&self) -> StrapSpecs {
        StrapSpecs {
            length: self.length,
            width: self.width,
            material: self.material,
            color: self.color.clone(),
        }
    }

    fn hardware(&self) -> HardwareSelection {
        HardwareSelection {
            buckle: self.buckle,
            d_rings: self.d_rings,
            rivets: self.rivets,
            snaps: self.snaps,
            velcro: self.velcro,
            tri_glide: self.tri_glide,
        }
    }

    fn check(&self) -> Result<()> {
        if self.quantity == 0 {
            return Err(miette::miette!("quantity must be greater than zero"));
        }
        for (name, value) in [("length", self.length), ("width", self.width)] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(miette::miette!(
                    "{} must be a positive number of inches (got {})",
                    name,
                    value
                ));
            }
        }
        Ok(())
    }
}

pub fn run(args: PriceArgs, global: &GlobalOpts) -> Result<()> {
    args.check()?;

    // Pricing needs no catalog, but a project config may still set the format
    let project = Project::resolve(global.project.as_deref()).ok();
    let config = Config::load(project.as_ref());
    let format = resolve_format(
        global.format,
        config.default_format.as_deref(),
        OutputFormat::Tsv,
    );

    let specs = args.specs();
    let breakdown = calculate_price(&specs, &args.hardware(), args.quantity);
    tracing::debug!(total = breakdown.total, quantity = args.quantity, "priced strap");

    match format {
        OutputFormat::Json => print_json(&breakdown)?,
        OutputFormat::Yaml => print_yaml(&breakdown)?,
        OutputFormat::Csv => write_csv(
            &["description", "quantity", "unit_price", "total"],
            breakdown.line_items.iter().map(|item| {
                vec![
                    item.description.clone(),
                    item.quantity.to_string(),
                    format!("{:.2}", item.unit_price),
                    format!("{:.2}", item.total),
                ]
            }),
        )?,
        OutputFormat::Md => {
            println!("{}", line_item_table(&breakdown));
            println!();
            println!("- **Subtotal:** {}", format_money(breakdown.subtotal));
            println!(
                "- **Discount:** {}",
                format_money(-breakdown.quantity_discount)
            );
            println!("- **Total:** {}", format_money(breakdown.total));
        }
        OutputFormat::Id => println!("{:.2}", breakdown.total),
        OutputFormat::Tsv | OutputFormat::Auto => {
            print_summary(&specs, &breakdown, args.quantity, global.quiet)
        }
    }

    Ok(())
}

fn line_item_table(breakdown: &PriceBreakdown) -> String {
    markdown_table(
        &["Item", "Qty", "Unit", "Total"],
        breakdown.line_items.iter().map(|item| {
            vec![
                item.description.clone(),
                item.quantity.to_string(),
                format_money(item.unit_price),
                format_money(item.total),
            ]
        }),
    )
}

fn print_summary(specs: &StrapSpecs, breakdown: &PriceBreakdown, quantity: u32, quiet: bool) {
    if !quiet {
        println!(
            "{} {} × {} {} strap, {}",
            style("Strap:").bold(),
            format_inches(specs.length),
            format_inches(specs.width),
            specs.material,
            specs.color
        );
        println!();
    }

    println!(
        "{:<28} {:<6} {:<10} {:<10}",
        style("ITEM").bold(),
        style("QTY").bold(),
        style("UNIT").bold(),
        style("TOTAL").bold()
    );
    println!("{}", "-".repeat(58));
    for item in &breakdown.line_items {
        println!(
            "{:<28} {:<6} {:<10} {:<10}",
            item.description,
            item.quantity,
            format_money(item.unit_price),
            format_money(item.total)
        );
    }
    println!("{}", "-".repeat(58));
    println!("{:<46} {}", "Subtotal", format_money(breakdown.subtotal));
    if breakdown.quantity_discount > 0.0 {
        println!(
            "{:<46} {}",
            "Volume discount",
            style(format_money(-breakdown.quantity_discount)).green()
        );
    }
    println!(
        "{:<46} {}",
        style("Total").bold(),
        style(format_money(breakdown.total)).bold()
    );

    if !quiet {
        println!();
        println!(
            "{} {}",
            style("→").blue(),
            quantity_discount_label(quantity)
        );
    }
}
