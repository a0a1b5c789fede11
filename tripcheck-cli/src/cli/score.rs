//! Score command - summary statistics for recorded answers

use super::load_inputs;
use crate::scoring::{ChecklistScorer, GroupPassRate, SummaryStatistics};
use anyhow::Result;
use console::style;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ScoreOutput<'a> {
    summary: &'a SummaryStatistics,
    group_pass_rates: &'a [GroupPassRate],
}

pub fn run(checklist: &Path, answers: &Path, format: &str, explain: bool) -> Result<()> {
    let (checklist, answers) = load_inputs(checklist, answers)?;
    let scorer = ChecklistScorer::new(&checklist, &answers);
    let stats = scorer.calculate();
    let rates = scorer.group_pass_rates();

    if format == "json" {
        let out = ScoreOutput {
            summary: &stats,
            group_pass_rates: &rates,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if explain {
        println!("{}", scorer.explain(&stats));
        return Ok(());
    }

    println!(
        "\n{} {}/{} items passed\n",
        style("Inspection score:").bold(),
        style(stats.passed_count).green().bold(),
        stats.total_items
    );
    println!(
        "  {} passed  ({:.0}%)",
        style(format!("{:>3}", stats.passed_count)).green(),
        stats.passed_percentage.round()
    );
    println!(
        "  {} failed  ({:.0}%)",
        style(format!("{:>3}", stats.failed_count)).red(),
        stats.failed_percentage.round()
    );
    println!(
        "  {} skipped ({:.0}%)\n",
        style(format!("{:>3}", stats.skipped_count)).yellow(),
        stats.skipped_percentage.round()
    );

    println!("{}", style("Groups").bold());
    for rate in &rates {
        println!(
            "  {:<40} {:>4}  ({}/{})",
            rate.group_name, rate.pass_rate, rate.passed, rate.total
        );
    }

    if !stats.items_requiring_attention.is_empty() {
        println!("\n{}", style("Needs attention").bold());
        for item in &stats.items_requiring_attention {
            println!("  {} {} [{}]", style("•").red(), item.name, item.status);
        }
    }

    Ok(())
}
