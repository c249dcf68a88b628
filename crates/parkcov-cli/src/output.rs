//! Output formatting module

use std::collections::BTreeMap;

use parkcov_app::export::excel::column_header;
use parkcov_domain::model::FleetModel;
use parkcov_domain::service::{Dimension1Coverage, Pivot, PolicyFinding, Stats};
use parkcov_types::{Annotation, OutputFormat, Result};
use serde_json::json;

fn or_dash<T: std::fmt::Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}

pub fn output_stats(output_format: OutputFormat, stats: &Stats) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }

    print_stats_table(stats);
    Ok(())
}

fn print_stats_table(stats: &Stats) {
    println!("\nCoverage Statistics");
    println!("===================");
    println!("Total models:    {}", stats.total_models);
    println!("Covered:         {}", stats.covered_models);
    println!("Uncovered:       {}", stats.uncovered_models);
    println!("Coverage:        {}%", stats.coverage_percentage);
    println!("Products:        {}", stats.total_products);
    println!();
    println!("{:<6} {:>8} {:>8} {:>8}", "Tier", "Total", "Covered", "%");
    println!("{}", "-".repeat(33));
    for tier in &stats.by_tier {
        println!(
            "{:<6} {:>8} {:>8} {:>8}",
            tier.tier, tier.total, tier.covered, tier.percentage
        );
    }
}

pub fn output_coverage(
    output_format: OutputFormat,
    pivot: &Pivot,
    stats: &Stats,
    annotations: &BTreeMap<String, Annotation>,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = json!({
            "stats": stats,
            "pivot": pivot,
            "annotations": annotations,
        });
        println!("{}", serde_json::to_string_pretty(&content)?);
        return Ok(());
    }

    println!("\nCoverage by Model");
    println!("=================");

    if pivot.model_count() == 0 {
        println!("No covered models match the filters.");
        print_stats_table(stats);
        return Ok(());
    }

    let headers: Vec<String> = pivot.columns.iter().map(|c| column_header(c)).collect();
    let widths: Vec<usize> = headers.iter().map(|h| h.chars().count().max(4)).collect();

    let mut line = format!("{:<12} {:<24}", "Brand", "Model");
    for (header, width) in headers.iter().zip(&widths) {
        line.push_str(&format!(" {:>w$}", header, w = *width));
    }
    line.push_str(&format!(" {:>6}  {}", "Total", "Comment"));
    println!("{}", line);
    println!("{}", "-".repeat(line.chars().count()));

    for (brand, model) in pivot.rows() {
        let mut line = format!(
            "{:<12} {:<24}",
            truncate(brand, 12),
            truncate(&model.model_name, 24)
        );
        for (position, width) in widths.iter().enumerate() {
            line.push_str(&format!(" {:>w$}", model.count_at(position), w = *width));
        }
        let comment = annotations
            .get(&model.model_name)
            .map(Annotation::to_cell)
            .unwrap_or_default();
        line.push_str(&format!(" {:>6}  {}", model.total, comment));
        println!("{}", line);
    }

    print_stats_table(stats);
    Ok(())
}

pub fn output_uncovered(output_format: OutputFormat, uncovered: &[&FleetModel]) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(uncovered)?);
        return Ok(());
    }

    println!("\nUncovered Models ({})", uncovered.len());
    println!("================");

    if uncovered.is_empty() {
        println!("Every fleet model has at least one product.");
        return Ok(());
    }

    println!(
        "{:<10} {:<12} {:<24} {:>6} {:>6} {:<5} {:>8}",
        "ID", "Brand", "Model", "From", "To", "Cat.", "Fleet"
    );
    println!("{}", "-".repeat(79));
    for model in uncovered {
        println!(
            "{:<10} {:<12} {:<24} {:>6} {:>6} {:<5} {:>8}",
            truncate(model.model_id.as_str(), 10),
            truncate(&model.brand, 12),
            truncate(&model.model_name, 24),
            or_dash(model.year_from),
            or_dash(model.year_to),
            model.priority_category,
            or_dash(model.fleet_size),
        );
    }
    Ok(())
}

pub fn output_findings(output_format: OutputFormat, findings: &[&PolicyFinding]) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(findings)?);
        return Ok(());
    }

    println!("\nPolicy Analysis ({} models)", findings.len());
    println!("===============");

    if findings.is_empty() {
        println!("No models in the target category.");
        return Ok(());
    }

    println!(
        "{:<12} {:<24} {:>5} {:<8} {:<9} {:>4} {:>4} {:>4}  {}",
        "Brand", "Model", "To", "Segment", "Status", "ORI", "PRE", "STD", "Actions"
    );
    println!("{}", "-".repeat(100));
    for finding in findings {
        let actions: Vec<String> = finding.actions.iter().map(|a| a.summary()).collect();
        println!(
            "{:<12} {:<24} {:>5} {:<8} {:<9} {:>4} {:>4} {:>4}  {}",
            truncate(&finding.brand, 12),
            truncate(&finding.model_name, 24),
            or_dash(finding.year_to),
            finding.segment.label(),
            finding.status.label(),
            finding.mix.original,
            finding.mix.premium,
            finding.mix.standard,
            actions.join(" | "),
        );
    }
    Ok(())
}

pub fn output_dashboard(output_format: OutputFormat, rows: &[Dimension1Coverage]) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }

    println!("\nGlobal Coverage by Rubro");
    println!("========================");

    if rows.is_empty() {
        println!("No products stored. Use import-products first.");
        return Ok(());
    }

    println!(
        "{:<20} {:>7} {:>8} {:>10} {:>5}  {}",
        "Rubro", "Models", "Covered", "Uncovered", "%", "By tier"
    );
    println!("{}", "-".repeat(80));
    for row in rows {
        let tiers: Vec<String> = row
            .by_tier
            .iter()
            .map(|t| format!("{} {}%", t.tier, t.percentage))
            .collect();
        println!(
            "{:<20} {:>7} {:>8} {:>10} {:>5}  {}",
            truncate(&row.dimension1, 20),
            row.total_models,
            row.covered_models,
            row.uncovered_models,
            row.percentage,
            tiers.join("  "),
        );
    }
    Ok(())
}

pub fn output_notes(
    output_format: OutputFormat,
    annotations: &BTreeMap<String, Annotation>,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(annotations)?);
        return Ok(());
    }

    println!("\nModel Notes ({})", annotations.len());
    println!("===========");

    if annotations.is_empty() {
        println!("No notes saved.");
        return Ok(());
    }

    for (model, note) in annotations {
        println!("{:<24} {}", truncate(model, 24), note.to_cell());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("PALIO", 12), "PALIO");
        assert_eq!(truncate("PALIO WEEKEND ADVENTURE", 12), "PALIO WEE...");
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(Some(1995)), "1995");
        assert_eq!(or_dash::<i32>(None), "-");
    }
}
