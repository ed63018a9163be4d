use crate::config::{AppConfig, PlacementSettings};
use crate::error::AppError;
use crate::export;
use crate::ingest::EmployeeImporter;
use crate::placement::{AssignmentEngine, PlacementReport, Roster};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct AssignArgs {
    /// Employee CSV (name, pref1, pref2, age, fte, role). Overrides ROSTER_INPUT.
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Directory for the assignment CSV. Overrides ROSTER_OUTPUT_DIR.
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
    /// Legacy key-value settings file. Overrides ROSTER_SETTINGS.
    #[arg(long)]
    pub(crate) settings: Option<PathBuf>,
    /// Shuffle employees before seeding, with a random seed unless one is given
    #[arg(long)]
    pub(crate) shuffle: bool,
    /// Shuffle employees with this seed before seeding. Overrides ROSTER_SHUFFLE_SEED.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Skip writing the assignment CSV
    #[arg(long)]
    pub(crate) dry_run: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct InspectArgs {
    /// Employee CSV. Overrides ROSTER_INPUT.
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
}

/// Full pipeline. Returns the written file, if any.
pub(crate) fn run_assign(config: &AppConfig, args: AssignArgs) -> Result<Option<PathBuf>, AppError> {
    let AssignArgs {
        input,
        output_dir,
        settings,
        shuffle,
        seed,
        json,
        dry_run,
    } = args;

    if let Some(path) = settings.as_ref().or(config.settings.as_ref()) {
        let settings = PlacementSettings::from_path(path)?;
        info!(%settings, "loaded placement settings");
    }

    let input = input.unwrap_or_else(|| config.input.clone());
    let imported = EmployeeImporter::from_path(&input)?;
    let rejected_rows = imported.row_errors.len();

    let mut roster = Roster::discover(imported.employees);
    let seed = seed
        .or(config.shuffle_seed)
        .or_else(|| shuffle.then(rand::random::<u64>));
    if let Some(seed) = seed {
        info!(seed, "shuffling employees before seeding");
        roster.shuffle(seed);
    }
    roster.seed_round_robin();

    let outcome = AssignmentEngine::new().optimize(&mut roster);
    let report = PlacementReport::build(&roster, Some(&outcome));

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&report, rejected_rows);
    }

    if dry_run {
        return Ok(None);
    }
    let output_dir = output_dir.unwrap_or_else(|| config.output_dir.clone());
    let path = export::write_assignments_to_dir(output_dir, &roster)?;
    if !json {
        println!("\nAssignments written to {}", path.display());
    }
    Ok(Some(path))
}

pub(crate) fn run_inspect(config: &AppConfig, args: InspectArgs) -> Result<(), AppError> {
    let input = args.input.unwrap_or_else(|| config.input.clone());
    let imported = EmployeeImporter::from_path(&input)?;
    let roster = Roster::discover(imported.employees);

    println!("Employee file: {}", input.display());
    println!(
        "{} employees, {} rows rejected",
        roster.employees().len(),
        imported.row_errors.len()
    );

    println!("\nRoles");
    for role in roster.roles() {
        println!("- {}: {} employees", role, roster.count_in_role(role));
    }

    println!("\nLocations");
    for (index, location) in roster.locations().iter().enumerate() {
        let first = roster
            .employees()
            .iter()
            .filter(|employee| employee.is_first_preference(location.name()))
            .count();
        let second = roster
            .employees()
            .iter()
            .filter(|employee| employee.is_second_preference(location.name()))
            .count();
        println!(
            "- {} {}: first choice of {}, second choice of {}",
            index + 1,
            location.name(),
            first,
            second
        );
    }

    for err in &imported.row_errors {
        println!("! {err}");
    }

    Ok(())
}

fn render_report(report: &PlacementReport, rejected_rows: usize) {
    println!("Placement summary");
    println!(
        "{} employees across {} roles and {} locations ({} rows rejected)",
        report.employees,
        report.roles.len(),
        report.locations.len(),
        rejected_rows
    );

    if let Some(passes) = &report.passes {
        println!("\nOptimization passes");
        println!("- FTE balancing: {} swaps", passes.balance_swaps);
        for role in &passes.balance_by_role {
            println!("  - {}: {} swaps, {}", role.role, role.swaps, role.halt.label());
        }
        println!(
            "- Location mismatches: {} swaps, {} unresolved",
            passes.mismatch_swaps, passes.unresolved_mismatches
        );
        println!("- Preferences: {} swaps", passes.preference_swaps);
    }

    println!("\nFTE means");
    println!("- Global: {}", format_mean(report.global_fte_mean));
    for location in &report.locations {
        let roles = location
            .role_headcounts
            .iter()
            .map(|(role, count)| format!("{role} {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "- {} {}: {} ({} employees: {})",
            location.ordinal,
            location.name,
            format_mean(location.fte_mean),
            location.headcount,
            roles
        );
    }

    println!("\nPreferences");
    println!("- At first preference: {}", report.first_preference);
    println!("- At second preference: {}", report.second_preference);
    println!(
        "- At first or second preference: {:.1}%",
        report.satisfied_pct
    );
}

fn format_mean(mean: Option<f64>) -> String {
    match mean {
        Some(value) => format!("{value:.1}"),
        None => "n/a".to_string(),
    }
}
