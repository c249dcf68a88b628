//! Command handlers

use std::path::{Path, PathBuf};

use crate::cli::{Cli, Commands, DashboardOrder, NoteCommand, SnapshotArgs};
use crate::output::{
    output_coverage, output_dashboard, output_findings, output_notes, output_stats,
    output_uncovered,
};
use parkcov_app::app::{self, AnalysisOptions, Snapshot};
use parkcov_app::config::Config;
use parkcov_app::export::{export_annotations, export_coverage, export_policy, export_uncovered};
use parkcov_app::repository::{open_annotation_store, open_catalog_repo};
use parkcov_domain::repository::CatalogRepository;
use parkcov_domain::service::{filter_by_segment, AgeSegment, PolicyFinding};
use parkcov_infra::csv_loader;
use parkcov_types::{Error, OutputFormat, Result};
use tracing::info;

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref store) = cli.store {
        config.store_dir = Some(store.clone());
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Coverage {
            snapshot,
            category,
            brand,
            hide_dim1,
            hide_dim2,
            export,
        } => {
            let options = analysis_options(&config, &snapshot)
                .with_category(category)
                .with_brand(brand)
                .with_layout(
                    config.show_dimension1 && !hide_dim1,
                    config.show_dimension2 && !hide_dim2,
                );
            cmd_coverage(&config, &snapshot, &options, export.as_deref(), output_format)
        }

        Commands::Uncovered { snapshot, export } => {
            cmd_uncovered(&config, &snapshot, export.as_deref(), output_format)
        }

        Commands::Stats { snapshot } => cmd_stats(&config, &snapshot, output_format),

        Commands::Policy {
            snapshot,
            segment,
            category,
            export,
        } => {
            let mut options = analysis_options(&config, &snapshot);
            if let Some(category) = category {
                options = options.with_policy_category(category);
            }
            cmd_policy(&config, &snapshot, &options, segment, export.as_deref(), output_format)
        }

        Commands::Dashboard { sort } => cmd_dashboard(&config, sort, output_format),

        Commands::ImportFleet { file } => cmd_import_fleet(&config, &file),

        Commands::ImportProducts { file } => cmd_import_products(&config, &file),

        Commands::Rubros => cmd_rubros(&config, output_format),

        Commands::Note { action } => cmd_note(&config, action, output_format),

        Commands::Config {
            show,
            set_store_dir,
            set_output,
            set_show_dim1,
            set_show_dim2,
            set_excluded_suppliers,
            set_policy_category,
            set_teams,
            reset,
        } => cmd_config(
            show,
            ConfigChanges {
                store_dir: set_store_dir,
                output_format: set_output,
                show_dimension1: set_show_dim1,
                show_dimension2: set_show_dim2,
                excluded_suppliers: set_excluded_suppliers,
                policy_category: set_policy_category,
                teams: set_teams,
            },
            reset,
        ),
    }
}

/// Options from config, with per-run supplier exclusions added
fn analysis_options(config: &Config, snapshot: &SnapshotArgs) -> AnalysisOptions {
    let mut excluded = config.excluded_suppliers.clone();
    for code in &snapshot.exclude_supplier {
        if !excluded.contains(code) {
            excluded.push(code.clone());
        }
    }
    AnalysisOptions::from_config(config).with_excluded_suppliers(excluded)
}

/// Load the snapshot named on the command line
fn load_snapshot(config: &Config, args: &SnapshotArgs) -> Result<Snapshot> {
    match (&args.products, &args.fleet, &args.rubro) {
        (Some(products), Some(fleet), None) => Snapshot::from_csv(products, fleet),
        (None, None, Some(rubro)) => {
            let repo = open_catalog_repo(config)?;
            Snapshot::from_repository(&repo, rubro)
        }
        _ => Err(Error::InvalidInput(
            "pass --products and --fleet, or --rubro".to_string(),
        )),
    }
}

fn cmd_coverage(
    config: &Config,
    snapshot_args: &SnapshotArgs,
    options: &AnalysisOptions,
    export: Option<&Path>,
    output_format: OutputFormat,
) -> Result<()> {
    let snapshot = load_snapshot(config, snapshot_args)?;
    let report = app::analyze(&snapshot, options);
    let store = open_annotation_store(config)?;

    if let Some(path) = export {
        export_coverage(&report.pivot, store.all(), path)?;
        eprintln!("Coverage exported to: {}", path.display());
    }

    output_coverage(output_format, &report.pivot, &report.stats, store.all())
}

fn cmd_uncovered(
    config: &Config,
    snapshot_args: &SnapshotArgs,
    export: Option<&Path>,
    output_format: OutputFormat,
) -> Result<()> {
    let snapshot = load_snapshot(config, snapshot_args)?;
    let report = app::analyze(&snapshot, &analysis_options(config, snapshot_args));

    if let Some(path) = export {
        export_uncovered(&report.partition.uncovered, path)?;
        eprintln!("Uncovered models exported to: {}", path.display());
    }

    output_uncovered(output_format, &report.partition.uncovered)
}

fn cmd_stats(config: &Config, snapshot_args: &SnapshotArgs, output_format: OutputFormat) -> Result<()> {
    let snapshot = load_snapshot(config, snapshot_args)?;
    let report = app::analyze(&snapshot, &analysis_options(config, snapshot_args));

    if report.unjoinable_products > 0 {
        info!(
            count = report.unjoinable_products,
            "products with a non-numeric model key were not joined"
        );
    }

    output_stats(output_format, &report.stats)
}

fn cmd_policy(
    config: &Config,
    snapshot_args: &SnapshotArgs,
    options: &AnalysisOptions,
    segment: Option<AgeSegment>,
    export: Option<&Path>,
    output_format: OutputFormat,
) -> Result<()> {
    let snapshot = load_snapshot(config, snapshot_args)?;
    let report = app::analyze(&snapshot, options);

    let findings: Vec<&PolicyFinding> = match segment {
        Some(segment) => filter_by_segment(&report.findings, segment),
        None => report.findings.iter().collect(),
    };

    if let Some(path) = export {
        export_policy(findings.iter().copied(), path)?;
        eprintln!("Policy analysis exported to: {}", path.display());
    }

    output_findings(output_format, &findings)
}

fn cmd_dashboard(config: &Config, sort: DashboardOrder, output_format: OutputFormat) -> Result<()> {
    let repo = open_catalog_repo(config)?;
    let rows = app::dashboard(&repo, sort.into())?;
    output_dashboard(output_format, &rows)
}

fn cmd_import_fleet(config: &Config, file: &Path) -> Result<()> {
    if !file.exists() {
        return Err(Error::FileNotFound(file.display().to_string()));
    }
    let fleet = csv_loader::load_fleet(file)?;
    let repo = open_catalog_repo(config)?;
    let stored = repo.upsert_fleet(&fleet)?;

    println!("Fleet import complete");
    println!("  Rows read:  {}", fleet.len());
    println!("  Stored:     {}", stored);
    if stored < fleet.len() {
        println!("  Skipped:    {} (model id is not numeric)", fleet.len() - stored);
    }
    println!("  Total:      {}", repo.fleet_count());
    Ok(())
}

fn cmd_import_products(config: &Config, file: &Path) -> Result<()> {
    if !file.exists() {
        return Err(Error::FileNotFound(file.display().to_string()));
    }
    let products = csv_loader::load_products(file)?;
    let repo = open_catalog_repo(config)?;
    let stored = repo.replace_products(&products)?;

    let mut rubros: Vec<&str> = products
        .iter()
        .map(|p| p.dimension1.as_str())
        .filter(|d| !d.is_empty())
        .collect();
    rubros.sort_unstable();
    rubros.dedup();

    println!("Product import complete");
    println!("  Stored:     {}", stored);
    println!("  Replaced:   {}", rubros.join(", "));
    println!("  Total:      {}", repo.product_count());
    Ok(())
}

fn cmd_rubros(config: &Config, output_format: OutputFormat) -> Result<()> {
    let repo = open_catalog_repo(config)?;
    let values = repo.fetch_dimension1_values()?;

    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    if values.is_empty() {
        println!("No products stored. Use import-products first.");
        return Ok(());
    }
    for value in values {
        println!("{}", value);
    }
    Ok(())
}

fn cmd_note(config: &Config, action: NoteCommand, output_format: OutputFormat) -> Result<()> {
    let mut store = open_annotation_store(config)?;

    match action {
        NoteCommand::Set { model, text, team } => {
            if !config.is_known_team(&team) {
                return Err(Error::InvalidInput(format!(
                    "unknown team '{}' (configured: {})",
                    team,
                    config.teams.join(", ")
                )));
            }
            match store.set(&model, &text, &team)? {
                Some(note) => println!("Saved: {} {}", model, note.to_cell()),
                None => println!("Removed note for {}", model),
            }
        }
        NoteCommand::Remove { model } => {
            if store.remove(&model)? {
                println!("Removed note for {}", model);
            } else {
                println!("No note for {}", model);
            }
        }
        NoteCommand::List => output_notes(output_format, store.all())?,
        NoteCommand::Export { output } => {
            export_annotations(store.all(), &output)?;
            println!("Tasks exported to: {}", output.display());
        }
    }
    Ok(())
}

/// Requested config edits; `None` leaves a field alone
#[derive(Debug, Default)]
struct ConfigChanges {
    store_dir: Option<PathBuf>,
    output_format: Option<OutputFormat>,
    show_dimension1: Option<bool>,
    show_dimension2: Option<bool>,
    excluded_suppliers: Option<Vec<String>>,
    policy_category: Option<String>,
    teams: Option<Vec<String>>,
}

impl ConfigChanges {
    /// Apply to a config; returns whether anything changed
    fn apply(self, config: &mut Config) -> bool {
        let mut modified = false;

        if let Some(dir) = self.store_dir {
            config.store_dir = Some(dir);
            modified = true;
        }
        if let Some(output_format) = self.output_format {
            config.output_format = output_format;
            modified = true;
        }
        if let Some(show) = self.show_dimension1 {
            config.show_dimension1 = show;
            modified = true;
        }
        if let Some(show) = self.show_dimension2 {
            config.show_dimension2 = show;
            modified = true;
        }
        if let Some(codes) = self.excluded_suppliers {
            config.excluded_suppliers = non_empty(codes);
            modified = true;
        }
        if let Some(category) = self.policy_category {
            config.policy_category = category;
            modified = true;
        }
        if let Some(teams) = self.teams {
            config.teams = non_empty(teams);
            modified = true;
        }

        modified
    }
}

fn non_empty(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn cmd_config(show: bool, changes: ConfigChanges, reset: bool) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let modified = changes.apply(&mut config);

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_options_merge_exclusions() {
        let config = Config {
            excluded_suppliers: vec!["3".to_string()],
            ..Default::default()
        };
        let args = SnapshotArgs {
            exclude_supplier: vec!["3".to_string(), "4".to_string()],
            ..Default::default()
        };
        let options = analysis_options(&config, &args);
        assert_eq!(options.excluded_suppliers, vec!["3", "4"]);
    }

    #[test]
    fn test_load_snapshot_requires_source() {
        let result = load_snapshot(&Config::default(), &SnapshotArgs::default());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_config_changes_apply() {
        let mut config = Config::default();
        assert!(!ConfigChanges::default().apply(&mut config));

        let changes = ConfigChanges {
            excluded_suppliers: Some(vec!["".to_string()]),
            policy_category: Some("A".to_string()),
            teams: Some(vec!["Sales".to_string(), " Ops ".to_string()]),
            ..Default::default()
        };
        assert!(changes.apply(&mut config));
        assert!(config.excluded_suppliers.is_empty());
        assert_eq!(config.policy_category, "A");
        assert_eq!(config.teams, vec!["Sales", "Ops"]);
    }
}
