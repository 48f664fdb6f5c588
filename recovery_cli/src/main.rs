use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use recovery_core::config::ProfileConfig;
use recovery_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quitmeter")]
#[command(about = "Nicotine recovery progress tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reference time (RFC 3339), defaults to the current time
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    #[command(flatten)]
    profile: ProfileArgs,
}

/// Profile fields that override the config file
#[derive(Args)]
struct ProfileArgs {
    /// Product category (cigarettes, vape, pouches, chewing)
    #[arg(long, global = true)]
    category: Option<ProductCategory>,

    /// Consumption before quitting (per day; tins per week for chewing)
    #[arg(long, global = true)]
    units: Option<f64>,

    /// Money spent per day
    #[arg(long, global = true)]
    daily_cost: Option<f64>,

    /// Harm level from 1 to 10
    #[arg(long, global = true)]
    harm_level: Option<f64>,

    /// Quit date (RFC 3339)
    #[arg(long, global = true)]
    quit_date: Option<DateTime<Utc>>,
}

impl From<ProfileArgs> for ProfileConfig {
    fn from(args: ProfileArgs) -> Self {
        ProfileConfig {
            category: args.category,
            units: args.units,
            daily_cost: args.daily_cost,
            harm_level: args.harm_level,
            quit_date: args.quit_date,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show recovery progress (default)
    Status {
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show each tracked metric with its trend and next milestone
    Metrics {
        /// Print the breakdown as JSON
        #[arg(long)]
        json: bool,
    },

    /// Describe the current recovery phase
    Phase {
        /// Describe the phase for this day instead of the current one
        #[arg(long)]
        day: Option<u32>,
    },

    /// Export the expected recovery curve as CSV
    Timeline {
        #[arg(long, default_value_t = 0)]
        from: u32,

        #[arg(long, default_value_t = 365)]
        to: u32,

        #[arg(long, default_value_t = 7)]
        step: u32,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Convert a unit count into packages where applicable
    Convert {
        /// Number of native units (e.g. cigarettes)
        count: f64,
    },

    /// Save the profile flags to the config file
    Init,
}

/// Everything a command needs after config and flags are resolved
struct Session {
    config: Config,
    config_path: PathBuf,
    profile: ProfileConfig,
    now: DateTime<Utc>,
}

impl Session {
    fn aggregator(&self) -> RecoveryAggregator<'static> {
        RecoveryAggregator::new(get_default_registry(), self.config.model.steepness)
    }

    fn money(&self, amount: f64) -> String {
        format!("{}{:.2}", self.config.display.currency_symbol, amount)
    }
}

fn main() -> Result<()> {
    // Initialize logging
    recovery_core::logging::init();

    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_config_path()?,
    };
    let config = if config_path.exists() {
        Config::load_from(&config_path)?
    } else {
        tracing::info!("No config file at {:?}, using defaults", config_path);
        Config::default()
    };

    let registry_errors = get_default_registry().validate();
    if !registry_errors.is_empty() {
        for error in &registry_errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::RegistryValidation("Invalid metric registry".into()));
    }

    let mut profile = config.profile.clone().unwrap_or_default();
    profile.merge(cli.profile.into());

    let session = Session {
        config,
        config_path,
        profile,
        now: cli.now.unwrap_or_else(Utc::now),
    };

    match cli.command.unwrap_or(Commands::Status { json: false }) {
        Commands::Status { json } => cmd_status(&session, json),
        Commands::Metrics { json } => cmd_metrics(&session, json),
        Commands::Phase { day } => cmd_phase(&session, day),
        Commands::Timeline {
            from,
            to,
            step,
            output,
        } => cmd_timeline(&session, from, to, step, output),
        Commands::Convert { count } => cmd_convert(&session, count),
        Commands::Init => cmd_init(session),
    }
}

fn compute(session: &Session) -> Result<(UsageProfile, RecoveryResult)> {
    let profile = session.profile.to_profile()?;
    let quit_at = session.profile.quit_date()?;
    let result = ProgressStatsCalculator::new(session.aggregator()).compute_recovery(
        session.now,
        quit_at,
        &profile,
    )?;
    Ok((profile, result))
}

fn cmd_status(session: &Session, json: bool) -> Result<()> {
    let (profile, result) = compute(session)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let stats = &result.stats;
    let time = stats.clean_time();
    let avoided = display_units(stats.units_avoided, profile.category);

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  RECOVERY STATUS");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  {} days, {} hours, {} minutes clean",
        time.days, time.hours, time.minutes
    );
    println!("  Phase: {}", result.phase.name);
    println!("  {}", result.message);
    println!();
    println!("  Health score:   {:.1}%", stats.health_score);
    println!("  Money saved:    {}", session.money(stats.money_saved));
    println!("  Avoided:        {} {}", avoided.value, avoided.unit_label);
    println!(
        "  Life regained:  {:.1} hours ({} days)",
        stats.life_regained_hours,
        stats.life_regained_days()
    );
    println!();

    let p = &result.breakdown.projections;
    println!(
        "  Projected score: 30d {:.1}% | 90d {:.1}% | 180d {:.1}% | 1y {:.1}%",
        p.days30, p.days90, p.days180, p.days365
    );
    println!(
        "  Saving {} a week, {} a year",
        session.money(result.savings.week.money),
        session.money(result.savings.year.money)
    );
    println!();

    Ok(())
}

fn cmd_metrics(session: &Session, json: bool) -> Result<()> {
    let (_, result) = compute(session)?;
    let breakdown = &result.breakdown;

    if json {
        println!("{}", serde_json::to_string_pretty(breakdown)?);
        return Ok(());
    }

    println!();
    println!(
        "  Overall {:.1}%  |  Neurological {:.1}%  |  Physical {:.1}%",
        breakdown.overall, breakdown.neurological, breakdown.physical
    );
    println!();

    for metric in &get_default_registry().metrics {
        let Some(status) = breakdown.metrics.get(&metric.id) else {
            continue;
        };
        let milestone = match status.days_to_next_milestone {
            Some(days) => format!("+5 in {} days", days),
            None => "no further milestone".to_string(),
        };
        println!(
            "  {:<28} {:>5.1}%  {:<10} {}",
            metric.name,
            status.value,
            format!("{:?}", status.trend).to_lowercase(),
            milestone
        );
    }
    println!();

    Ok(())
}

fn cmd_phase(session: &Session, day: Option<u32>) -> Result<()> {
    let day = match day {
        Some(day) => day,
        None => days_clean(session.now, session.profile.quit_date()?)?,
    };
    let progress = phase_progress(day);
    let phase = progress.phase;

    println!();
    match phase.end_day {
        Some(end) => println!("  {} (days {}-{})", phase.name, phase.start_day, end - 1),
        None => println!("  {} (day {} onwards)", phase.name, phase.start_day),
    }
    match (progress.days_remaining, progress.next_phase) {
        (Some(remaining), Some(next)) => println!(
            "  Day {} of phase, {:.1}% complete, {} in {} days",
            progress.days_into_phase + 1,
            progress.percent_complete,
            next.name,
            remaining
        ),
        _ => println!("  Day {} of the final phase", progress.days_into_phase + 1),
    }

    print_list("What is happening", phase.key_processes);
    print_list("What you may feel", phase.expected_symptoms);
    print_list("What gets better", phase.expected_improvements);
    println!();

    Ok(())
}

fn print_list(title: &str, items: &[&str]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("  {}:", title);
    for item in items {
        println!("    → {}", item);
    }
}

fn cmd_timeline(
    session: &Session,
    from: u32,
    to: u32,
    step: u32,
    output: Option<PathBuf>,
) -> Result<()> {
    let profile = session.profile.to_profile()?;
    let points =
        recovery_core::timeline::timeline_with(&session.aggregator(), &profile, from, to, step)?;

    match output {
        Some(path) => {
            let count = export_timeline_csv(&points, &path)?;
            println!("✓ Wrote {} rows to {}", count, path.display());
        }
        None => {
            write_timeline_csv(&points, std::io::stdout().lock())?;
        }
    }

    Ok(())
}

fn cmd_convert(session: &Session, count: f64) -> Result<()> {
    let category = session
        .profile
        .category
        .ok_or_else(|| Error::InvalidProfile("missing required field 'category'".into()))?;
    let quantity = display_units(count, category);
    println!("{} {}", quantity.value, quantity.unit_label);
    Ok(())
}

fn cmd_init(session: Session) -> Result<()> {
    // Both calls fail with the name of the first missing field.
    session.profile.to_profile()?;
    session.profile.quit_date()?;

    let mut config = session.config;
    config.profile = Some(session.profile);
    config.save_to(&session.config_path)?;

    println!("✓ Saved profile to {}", session.config_path.display());
    Ok(())
}
