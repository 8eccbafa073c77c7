use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use spinphase::config::SweepConfig;
use spinphase::io::{self, FileLoader, PathManager, PathResolver};
use spinphase::model::Color;
use spinphase::physics::{Phase, PhaseClassifier, PhaseSweep, RuleTable};
use spinphase::utils::{logger, report};
use spinphase::{PhaseError, Result};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;

use cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = logger::level_from_flags(cli.verbose, cli.quiet);
    if let Err(e) = logger::init(level, cli.verbose > 1) {
        eprintln!("Could not install logger: {}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Sweep { rules, output } => {
            let config = load_config(cli.config.as_deref())?;
            sweep(config, rules, output)
        }
        Commands::Classify { structure, spins, rules } => classify(structure, spins, rules),
        Commands::Resolve { var1, var2 } => {
            let config = load_config(cli.config.as_deref())?;
            let paths = PathManager::new(config.paths)?;
            println!("{}", paths.spin_path(var1, var2).display());
            Ok(())
        }
        Commands::InitConfig { force } => {
            let target = cli.config.unwrap_or_else(SweepConfig::get_path);
            if target.exists() && !force {
                return Err(PhaseError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    target.display()
                )));
            }
            let written = SweepConfig::default().save(Some(&target))?;
            log::info!("Config saved to {:?}", written);
            Ok(())
        }
    }
}

/// An explicit path must load; the default location falls back to defaults.
fn load_config(path: Option<&std::path::Path>) -> Result<SweepConfig> {
    match path {
        Some(p) => {
            let cfg = SweepConfig::from_file(p)?;
            log::info!("Config loaded from {:?}", p);
            Ok(cfg)
        }
        None => {
            let (cfg, msg) = SweepConfig::load();
            log::info!("{}", msg);
            Ok(cfg)
        }
    }
}

fn sweep(config: SweepConfig, rules: Option<RuleTable>, output: Option<PathBuf>) -> Result<()> {
    let table = rules.unwrap_or(config.rules);
    let output = output.unwrap_or_else(|| config.output.clone());
    let grid = config.grid()?;
    let paths = PathManager::new(config.paths)?;

    log::info!(
        "Sweeping {} x {} grid with {}",
        grid.first.len(),
        grid.second.len(),
        table.name()
    );

    let progress = ProgressBar::new(grid.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
    {
        progress.set_style(style.progress_chars("#>-"));
    }

    let diagram = PhaseSweep::new(&paths, FileLoader)
        .with_progress(progress)
        .build_with_rules(&grid, table)?;

    io::save_diagram(&output, &diagram)?;
    log::info!("Phase diagram written to {:?}", output);

    // Histogram by phase; within one table each colour belongs to one phase
    let counts = diagram.color_counts();
    for phase in table.rules().iter().map(|r| r.phase).chain([Phase::Unclassified]) {
        if let Some(n) = counts.get(&phase.color().to_hex()) {
            log::info!("  {:<32} {}", phase.name(), n);
        }
    }
    if let Some(n) = counts.get(&Color::ERROR.to_hex()) {
        log::info!("  {:<32} {}", "failed", n);
    }
    log::info!("{} boundary cells", diagram.boundaries().len());

    Ok(())
}

fn classify(structure: PathBuf, spins: PathBuf, table: RuleTable) -> Result<()> {
    let lattice = io::load_lattice(&structure, &spins)?;
    let classifier = PhaseClassifier::from_lattice(&lattice)?;
    classifier.check_spins(&lattice.spins)?;

    print!(
        "{}",
        report::lattice_summary(&lattice, classifier.sublattice(), &spins.display().to_string())
    );
    print!("{}", report::classification_report(&classifier, &lattice.spins, table));
    Ok(())
}
