use clap::{Parser, Subcommand};
use planner_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "garmin-planner")]
#[command(about = "Compile workout notation into Garmin Connect workouts and schedule them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the workout JSON for a plan without contacting the service
    Compile {
        /// Training plan YAML file
        plan: PathBuf,

        /// Only compile this workout
        #[arg(long)]
        workout: Option<String>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Upload every workout in a plan
    Import {
        /// Training plan YAML file
        plan: PathBuf,

        /// Delete service workouts with the same name first
        #[arg(long)]
        delete_same_name: bool,
    },

    /// Put the plan's scheduled workouts on the calendar
    Schedule {
        /// Training plan YAML file
        plan: PathBuf,
    },

    /// Import, then schedule if the plan has a schedulePlan
    Run {
        /// Training plan YAML file
        plan: PathBuf,
    },

    /// Write a default config file
    InitConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.verbose {
        0 => planner_core::logging::init(),
        verbose => planner_core::logging::init_with_level(
            planner_core::logging::level_for_verbosity(verbose),
        ),
    }
    tracing::debug!("Running garmin-planner {}", env!("CARGO_PKG_VERSION"));

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(Config::default_config_path);

    match cli.command {
        Commands::Compile {
            plan,
            workout,
            pretty,
        } => cmd_compile(&plan, workout.as_deref(), pretty),
        Commands::Import {
            plan,
            delete_same_name,
        } => {
            let config = Config::load_or_default(&config_path)?;
            cmd_import(&plan, delete_same_name, &config)
        }
        Commands::Schedule { plan } => {
            let config = Config::load_or_default(&config_path)?;
            cmd_schedule(&plan, &config)
        }
        Commands::Run { plan } => {
            let config = Config::load_or_default(&config_path)?;
            cmd_run(&plan, &config)
        }
        Commands::InitConfig => cmd_init_config(&config_path),
    }
}

fn load_plan(path: &Path) -> Result<TrainingPlan> {
    if !path.exists() {
        return Err(Error::Other(format!(
            "plan file '{}' does not exist",
            path.display()
        )));
    }
    TrainingPlan::load(path)
}

fn cmd_compile(path: &Path, workout: Option<&str>, pretty: bool) -> Result<()> {
    let plan = load_plan(path)?;

    let selected: Vec<&PlannedWorkout> = match workout {
        Some(name) => vec![plan
            .find_workout(name)
            .ok_or_else(|| Error::Other(format!("no workout named '{}' in plan", name)))?],
        None => plan.workouts.iter().collect(),
    };

    for planned in selected {
        let model = planned.compile()?;
        let json = if pretty {
            model.to_json_pretty()?
        } else {
            model.to_json()?
        };
        println!("{}", json);
    }

    Ok(())
}

fn cmd_import(path: &Path, delete_same_name: bool, config: &Config) -> Result<()> {
    let plan = load_plan(path)?;
    import_plan(&plan, delete_same_name, config)
}

fn import_plan(plan: &TrainingPlan, delete_same_name: bool, config: &Config) -> Result<()> {
    let delete_previous = delete_same_name
        || plan
            .settings
            .delete_same_name_workout
            .unwrap_or(config.import.delete_same_name);

    let mut client = ConnectClient::new(&config.connect)?;
    let imported = import_workouts(plan, delete_previous, &mut client)?;

    for (name, id) in &imported {
        println!("✓ Imported '{}' (id {})", name, id);
    }
    Ok(())
}

fn cmd_schedule(path: &Path, config: &Config) -> Result<()> {
    let plan = load_plan(path)?;
    schedule_plan(&plan, config)
}

fn schedule_plan(plan: &TrainingPlan, config: &Config) -> Result<()> {
    let Some(schedule) = &plan.schedule else {
        println!("No schedulePlan in plan - nothing to schedule.");
        return Ok(());
    };

    let mut client = ConnectClient::new(&config.connect)?;
    let report = schedule_workouts(schedule, &mut client)?;

    println!(
        "✓ Scheduled {} workouts starting {}",
        report.scheduled, schedule.start_from
    );
    if !report.missing.is_empty() {
        println!("  Not found on service: {}", report.missing.join(", "));
    }
    if report.failed > 0 {
        println!("  Failed: {}", report.failed);
    }
    Ok(())
}

fn cmd_run(path: &Path, config: &Config) -> Result<()> {
    let plan = load_plan(path)?;
    import_plan(&plan, false, config)?;
    schedule_plan(&plan, config)?;
    tracing::info!("Finished processing {:?}", path);
    Ok(())
}

fn cmd_init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }

    Config::default().save_to(path)?;
    println!("✓ Wrote default config to {}", path.display());
    println!("  Set connect.access_token before importing.");
    Ok(())
}
