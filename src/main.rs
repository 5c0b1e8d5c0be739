use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use space_garden::{
    config::{ConfigLoader, GardenConfig},
    driver::days_crossed,
    journal::{BatchProgress, GrowthJournal, MicrogreenBatch},
    progress::{LoginOutcome, UserProgress},
    reminders::{CareAction, ReminderDraft, ReminderSchedule},
    session::{Intent, Session},
    shop::ShopItem,
    species::Species,
    upgrades::Upgrade,
    TickDriver,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Space greenhouse simulation and growth journal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a headless session as fast as possible
    Run(SessionArgs),
    /// Host a session on the real-time tick driver until Ctrl+C or --ticks
    Watch(SessionArgs),
    /// Print statistics for a batch from a JSON growth log file
    Journal(JournalArgs),
    /// List care reminders, optionally adding one
    Remind(RemindArgs),
    /// Record today's login and print streak, points and badges
    Progress(ProgressArgs),
}

#[derive(Debug, Args)]
struct SessionArgs {
    /// Path to the session YAML file (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 120)]
    ticks: u64,

    /// Advance the day every N ticks (0 never advances)
    #[arg(long, default_value_t = 15)]
    day_every: u64,

    /// Species to plant at the start; repeat for more plants
    #[arg(long = "plant")]
    plants: Vec<Species>,

    /// Supplies to buy at the start; repeat for more
    #[arg(long = "restock")]
    restock: Vec<ShopItem>,

    /// Upgrades to research as soon as they are affordable, in order
    #[arg(long = "research")]
    research: Vec<Upgrade>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override snapshot interval in ticks
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct JournalArgs {
    /// JSON file holding a list of growth logs
    #[arg(long)]
    logs: PathBuf,

    #[arg(long, default_value = "batch")]
    name: String,

    /// Sowing date, YYYY-MM-DD
    #[arg(long)]
    sown: NaiveDate,

    #[arg(long)]
    harvest_days: u32,

    /// Reference date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    today: Option<NaiveDate>,
}

#[derive(Debug, Args)]
struct RemindArgs {
    /// JSON file holding the reminder list; created on first add
    #[arg(long)]
    file: PathBuf,

    /// Plant to add a reminder for
    #[arg(long, requires_all = ["action", "date"])]
    plant: Option<String>,

    #[arg(long)]
    action: Option<CareAction>,

    /// Day of the reminder, YYYY-MM-DD
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Time of day, HH:MM
    #[arg(long, value_parser = parse_clock_time, default_value = "09:00")]
    time: NaiveTime,

    #[arg(long, default_value = "")]
    note: String,

    /// Store the reminder without asking for a notification
    #[arg(long)]
    silent: bool,
}

#[derive(Debug, Args)]
struct ProgressArgs {
    /// JSON file holding the gardener's progress; created when missing
    #[arg(long)]
    file: PathBuf,

    /// Login date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Extra points to award
    #[arg(long, default_value_t = 0)]
    points: u32,
}

fn parse_clock_time(value: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(value, "%H:%M")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => {
            let config = load_config(&args)?;
            init_logging(&config.logging.level);
            run_headless(config, &args)
        }
        Command::Watch(args) => {
            let config = load_config(&args)?;
            init_logging(&config.logging.level);
            run_watch(config, &args).await
        }
        Command::Journal(args) => {
            init_logging("info");
            print_journal(&args)
        }
        Command::Remind(args) => {
            init_logging("info");
            manage_reminders(&args)
        }
        Command::Progress(args) => {
            init_logging("info");
            record_progress(&args)
        }
    }
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(args: &SessionArgs) -> Result<GardenConfig> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::new(".").load(path)?,
        None => GardenConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(interval) = args.snapshot_interval {
        config.snapshot.interval_ticks = interval;
    }
    if let Some(dir) = &args.snapshot_dir {
        config.snapshot.output_dir = dir.clone();
    }
    Ok(config)
}

fn plan_intents(args: &SessionArgs) -> Vec<Intent> {
    let plants = args
        .plants
        .iter()
        .map(|species| Intent::BuyPlant { species: *species });
    let supplies = args.restock.iter().map(|item| Intent::Restock { item: *item });
    plants.chain(supplies).collect()
}

fn end_of_day_intents(args: &SessionArgs) -> Vec<Intent> {
    let mut intents = vec![Intent::CollectHarvest];
    intents.extend(
        args.research
            .iter()
            .map(|upgrade| Intent::Research { upgrade: *upgrade }),
    );
    intents.push(Intent::AdvanceDay);
    intents
}

fn run_headless(config: GardenConfig, args: &SessionArgs) -> Result<()> {
    let mut session = Session::new(config)?;
    for intent in plan_intents(args) {
        session.apply(intent);
    }

    for _ in 0..args.ticks {
        let summary = session.tick()?;
        if summary.game_over {
            break;
        }
        if args.day_every > 0 && summary.tick % args.day_every == 0 {
            for intent in end_of_day_intents(args) {
                session.apply(intent);
            }
        }
    }

    print_summary(&session);
    Ok(())
}

async fn run_watch(config: GardenConfig, args: &SessionArgs) -> Result<()> {
    let handle = TickDriver::spawn(Session::new(config)?);
    for intent in plan_intents(args) {
        handle.send(intent).await?;
    }
    handle.start();

    let mut ticks = handle.ticks();
    let mut handled_tick = 0;
    loop {
        tokio::select! {
            changed = ticks.changed() => {
                if changed.is_err() {
                    break;
                }
                let tick = *ticks.borrow_and_update();
                for _ in 0..days_crossed(handled_tick, tick, args.day_every) {
                    for intent in end_of_day_intents(args) {
                        handle.send(intent).await?;
                    }
                }
                handled_tick = tick;
                let snapshot = handle.snapshot().await?;
                if snapshot.game_over || tick >= args.ticks {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("Stopping greenhouse...");
                break;
            }
        }
    }

    handle.stop();
    let session = handle.shutdown().await?;
    print_summary(&session);
    Ok(())
}

fn print_summary(session: &Session) {
    let state = session.state();
    println!(
        "Session '{}' ran {} ticks to day {}.",
        session.config().name,
        session.current_tick(),
        state.day()
    );
    println!(
        "  water {:.1} | nutrients {:.1} | energy {:.1} | oxygen {} | credits {} | research {}",
        state.water(),
        state.nutrients(),
        state.energy(),
        state.oxygen(),
        state.credits(),
        state.research_points()
    );
    for (slot, plant) in state.plants().iter().enumerate() {
        println!(
            "  [{}] {:<14} growth {:>5.1}% health {:>5.1}%",
            slot + 1,
            plant.species.to_string(),
            plant.growth,
            plant.health
        );
    }
    let upgrades: Vec<String> = state.upgrades().unlocked().map(|u| u.to_string()).collect();
    if !upgrades.is_empty() {
        println!("  upgrades: {}", upgrades.join(", "));
    }
    if let Some(event) = session.last_event() {
        println!("  last event: {}", event.message());
    }
    if state.is_game_over() {
        println!("  GAME OVER: oxygen depleted");
    } else if state.oxygen_warning() {
        println!("  warning: oxygen low");
    }
}

fn print_journal(args: &JournalArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.logs)
        .with_context(|| format!("Failed to read growth logs {}", args.logs.display()))?;
    let journal = GrowthJournal::from_json(&text)
        .with_context(|| format!("Failed to parse {}", args.logs.display()))?;
    let batch = MicrogreenBatch {
        id: 1,
        name: args.name.clone(),
        sowing_date: args.sown,
        substrate: String::new(),
        harvest_days: args.harvest_days,
    };
    let today = args
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let progress = BatchProgress::compute(&batch, today);

    println!(
        "{}: day {} of {} ({:.0}%), {}",
        batch.name,
        progress.days_since_sowing,
        batch.harvest_days,
        progress.progress * 100.0,
        if progress.ready_to_harvest {
            "ready to harvest".to_string()
        } else {
            format!("{} days to harvest", progress.days_until_harvest)
        }
    );
    for (date, height) in journal.height_series() {
        println!("  {date}  {height:>5.1} cm");
    }
    if let Some(rate) = journal.average_daily_growth() {
        println!("  average growth {rate:.2} cm/day over {} logs", journal.len());
    }
    Ok(())
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Some(text))
}

fn manage_reminders(args: &RemindArgs) -> Result<()> {
    let mut schedule = match read_optional(&args.file)? {
        Some(text) => ReminderSchedule::from_json(&text)
            .with_context(|| format!("Failed to parse {}", args.file.display()))?,
        None => ReminderSchedule::new(),
    };

    if let (Some(plant), Some(action), Some(date)) = (&args.plant, args.action, args.date) {
        let id = schedule.add(ReminderDraft {
            date,
            time: args.time,
            action,
            plant_name: plant.clone(),
            description: args.note.clone(),
            notify: !args.silent,
        });
        fs::write(&args.file, schedule.to_json()?)
            .with_context(|| format!("Failed to write {}", args.file.display()))?;
        info!(id, plant = %plant, %action, "reminder saved");
    }

    let now = chrono::Local::now().naive_local();
    let pending = schedule.pending_notifications(now);
    for reminder in schedule.iter() {
        let marker = if pending.iter().any(|p| p.id == reminder.id) {
            " [notify]"
        } else {
            ""
        };
        println!(
            "  {}  {}{}",
            reminder.at.format("%Y-%m-%d %H:%M"),
            reminder.title(),
            marker
        );
        println!("      {}", reminder.body());
    }
    println!(
        "{} reminders, {} notifications pending",
        schedule.len(),
        pending.len()
    );
    Ok(())
}

fn record_progress(args: &ProgressArgs) -> Result<()> {
    let today = args
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let mut progress = match read_optional(&args.file)? {
        Some(text) => UserProgress::from_json(&text)
            .with_context(|| format!("Failed to parse {}", args.file.display()))?,
        None => UserProgress::new(today),
    };

    let outcome = progress.check_daily_login(today);
    let awarded = if args.points > 0 {
        progress.add_points(args.points)
    } else {
        Vec::new()
    };
    fs::write(&args.file, progress.to_json()?)
        .with_context(|| format!("Failed to write {}", args.file.display()))?;

    match outcome {
        LoginOutcome::SameDay => println!("Already checked in today."),
        LoginOutcome::StreakContinued => println!("Streak continued!"),
        LoginOutcome::StreakReset => println!("New streak started."),
    }
    println!(
        "  streak {} days | {} points",
        progress.streak_days(),
        progress.points()
    );
    for badge in awarded {
        println!("  new badge: {badge} ({})", badge.description());
    }
    let badges: Vec<String> = progress.badges().iter().map(|b| b.to_string()).collect();
    println!("  badges: {}", badges.join(", "));
    Ok(())
}
