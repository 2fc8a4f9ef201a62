//! `sqt rules` command - Browse regional pricing rules

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{
    format_money, markdown_table, print_json, print_yaml, write_csv, CatalogContext,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::{PricingRule, QtyBreak, Region};

#[derive(Subcommand, Debug)]
pub enum RulesCommands {
    /// List pricing rules, lowest MOQ first
    List(ListArgs),

    /// Show one region's pricing rule and volume breaks
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show count only
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Region (usa, mexico, taiwan, vietnam, cambodia, china)
    pub region: Region,
}

pub fn run(cmd: RulesCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        RulesCommands::List(args) => run_list(args, global),
        RulesCommands::Show(args) => run_show(args, global),
    }
}

fn break_range(b: &QtyBreak) -> String {
    match b.max {
        Some(max) => format!("{}-{}", b.min, max),
        None => format!("{}+", b.min),
    }
}

fn break_label(b: &QtyBreak) -> String {
    format!("{} {:.0}%", break_range(b), b.discount * 100.0)
}

fn breaks_cell(rule: &PricingRule) -> String {
    rule.qty_breaks
        .iter()
        .map(break_label)
        .collect::<Vec<_>>()
        .join(", ")
}

fn lead_cell(rule: &PricingRule) -> String {
    format!("{}-{} wk", rule.lead_time_weeks_min, rule.lead_time_weeks_max)
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = CatalogContext::load(global)?;
    let rules = ctx.catalog.rules_by_moq();

    if args.count {
        println!("{}", rules.len());
        return Ok(());
    }

    if rules.is_empty() {
        if !global.quiet {
            println!("No pricing rules found.");
        }
        return Ok(());
    }

    match ctx.format(global, OutputFormat::Tsv) {
        OutputFormat::Json => print_json(&rules)?,
        OutputFormat::Yaml => print_yaml(&rules)?,
        OutputFormat::Csv => write_csv(
            &[
                "region",
                "labor_rate_per_unit",
                "tooling_base",
                "tooling_per_hardware_type",
                "shipping_rate_per_lb",
                "shipping_base",
                "lead_time_weeks_min",
                "lead_time_weeks_max",
                "moq",
            ],
            rules.iter().map(|r| {
                vec![
                    r.region.to_string(),
                    format!("{:.2}", r.labor_rate_per_unit),
                    format!("{:.2}", r.tooling_base),
                    format!("{:.2}", r.tooling_per_hardware_type),
                    format!("{:.2}", r.shipping_rate_per_lb),
                    format!("{:.2}", r.shipping_base),
                    r.lead_time_weeks_min.to_string(),
                    r.lead_time_weeks_max.to_string(),
                    r.moq.to_string(),
                ]
            }),
        )?,
        OutputFormat::Id => {
            for rule in &rules {
                println!("{}", rule.region);
            }
        }
        OutputFormat::Md => println!(
            "{}",
            markdown_table(
                &[
                    "Region",
                    "Labor/unit",
                    "Tooling",
                    "Per type",
                    "Ship/lb",
                    "Ship base",
                    "Lead",
                    "MOQ",
                    "Breaks",
                ],
                rules.iter().map(|r| {
                    vec![
                        r.region.label().to_string(),
                        format_money(r.labor_rate_per_unit),
                        format_money(r.tooling_base),
                        format_money(r.tooling_per_hardware_type),
                        format_money(r.shipping_rate_per_lb),
                        format_money(r.shipping_base),
                        lead_cell(r),
                        r.moq.to_string(),
                        breaks_cell(r),
                    ]
                }),
            )
        ),
        OutputFormat::Tsv | OutputFormat::Auto => {
            println!(
                "{:<22} {:<8} {:<9} {:<9} {:<8} {:<10} {:<9} {:<6}",
                style("REGION").bold(),
                style("LABOR").bold(),
                style("TOOLING").bold(),
                style("PER TYPE").bold(),
                style("SHIP/LB").bold(),
                style("SHIP BASE").bold(),
                style("LEAD").bold(),
                style("MOQ").bold()
            );
            println!("{}", "-".repeat(88));
            for rule in &rules {
                println!(
                    "{:<22} {:<8} {:<9} {:<9} {:<8} {:<10} {:<9} {:<6}",
                    style(rule.region.label()).cyan(),
                    format_money(rule.labor_rate_per_unit),
                    format_money(rule.tooling_base),
                    format_money(rule.tooling_per_hardware_type),
                    format_money(rule.shipping_rate_per_lb),
                    format_money(rule.shipping_base),
                    lead_cell(rule),
                    rule.moq
                );
            }
            if !global.quiet {
                println!();
                println!(
                    "{} pricing rule(s). Use {} for volume breaks.",
                    style(rules.len()).cyan(),
                    style("sqt rules show REGION").yellow()
                );
            }
        }
    }

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = CatalogContext::load(global)?;
    let rule = ctx
        .catalog
        .pricing_rules
        .iter()
        .find(|r| r.region == args.region)
        .ok_or_else(|| miette::miette!("No pricing rule for region '{}'", args.region))?;

    match ctx.format(global, OutputFormat::Yaml) {
        OutputFormat::Json => print_json(rule)?,
        OutputFormat::Id => println!("{}", rule.region),
        OutputFormat::Md => println!(
            "{}",
            markdown_table(
                &["Quantity", "Discount"],
                rule.qty_breaks
                    .iter()
                    .map(|b| vec![break_range(b), format!("{:.0}%", b.discount * 100.0)]),
            )
        ),
        OutputFormat::Tsv => {
            println!("{}", style(rule.region.label()).bold());
            println!("  Labor:     {} per strap", format_money(rule.labor_rate_per_unit));
            println!(
                "  Tooling:   {} + {} per hardware type",
                format_money(rule.tooling_base),
                format_money(rule.tooling_per_hardware_type)
            );
            println!(
                "  Shipping:  {} + {} per lb",
                format_money(rule.shipping_base),
                format_money(rule.shipping_rate_per_lb)
            );
            println!("  Lead time: {}", lead_cell(rule));
            println!("  MOQ:       {}", rule.moq);
            if !rule.qty_breaks.is_empty() {
                println!("  Breaks:    {}", breaks_cell(rule));
            }
        }
        _ => print_yaml(rule)?,
    }

    Ok(())
}
