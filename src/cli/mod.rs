pub mod calendar;

use std::{env, path::Path, sync::Arc};

use ansi_term::Colour;
use anyhow::{bail, Result};
use chrono::{DateTime, Local};
use chrono_english::{parse_date_string, Dialect};
use clap::{CommandFactory, Parser, Subcommand};
use now::DateTimeNow;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::level_filters::LevelFilter;

use crate::{
    auth,
    catalog::{catalog, MealCategory, Recipe},
    engine::{
        diet::SelectionMode,
        goal::{walking_percent, yoga_percent, WALKING_GOAL_MINUTES},
        rollover::{DayRolloverWatcher, DAY_CHECK_INTERVAL},
        store::DayKey,
        TrackerEngine,
    },
    remote::{http::HttpDocumentStore, local::LocalDocumentStore, ProgressStorage},
    utils::{
        clock::{Clock, DefaultClock},
        dir::create_application_default_path,
        logging::enable_logging,
        percentage::Percentage,
        time::next_day_start,
    },
};

#[derive(Parser, Debug)]
#[command(name = "Welltrack", version, long_about = None)]
#[command(about = "Personal wellness tracker for daily yoga, diet and walking goals")]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        help = "Remote progress endpoint. Falls back to $WELLTRACK_REMOTE_URL, then to a local document store"
    )]
    remote_url: Option<String>,
    #[arg(
        long,
        help = "Derive the day's meal plan from the date so every session agrees on it"
    )]
    seeded_plan: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Log in with the email used at purchase")]
    Login { email: String },
    #[command(about = "Log out from the current account")]
    Logout,
    #[command(about = "Show the daily goal ring and per-activity progress")]
    Status {
        #[arg(
            long,
            help = "Day to show. Examples are \"yesterday\", \"15/03/2025\""
        )]
        day: Option<String>,
    },
    #[command(about = "List the day's yoga classes and their completion")]
    Classes,
    #[command(about = "Toggle completion of a yoga class")]
    Toggle { class_id: u32 },
    #[command(about = "Add walked minutes to today's total")]
    Walk { minutes: u32 },
    #[command(about = "Mark today's diet as completed")]
    Diet,
    #[command(about = "Show today's meal plan")]
    Plan {
        #[arg(long, value_enum, help = "Draw a different recipe for one category")]
        reroll: Option<MealCategory>,
    },
    #[command(about = "Show a month of activity markers")]
    Calendar {
        #[arg(
            long,
            help = "Month to show. Examples are \"march\", \"15/03/2025\". Defaults to the current one"
        )]
        month: Option<String>,
    },
    #[command(about = "Keep the session open and report day rollovers")]
    Watch,
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let application_dir = create_application_default_path()?;
    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(&application_dir, logging_level, args.log)?;

    let remote_url = args
        .remote_url
        .or_else(|| env::var("WELLTRACK_REMOTE_URL").ok());
    let selection_mode = if args.seeded_plan {
        SelectionMode::SeededByDay
    } else {
        SelectionMode::PerSession
    };

    match args.commands {
        Commands::Login { email } => login(&application_dir, &email),
        Commands::Logout => {
            auth::clear_session(&application_dir)?;
            println!("Logged out.");
            Ok(())
        }
        command => {
            let mut engine =
                open_session(&application_dir, remote_url, selection_mode).await?;
            let result = match command {
                Commands::Status { day } => show_status(&engine, day),
                Commands::Classes => {
                    show_classes(&engine);
                    Ok(())
                }
                Commands::Toggle { class_id } => {
                    toggle_class(&mut engine, class_id);
                    Ok(())
                }
                Commands::Walk { minutes } => {
                    log_walk(&mut engine, minutes);
                    Ok(())
                }
                Commands::Diet => {
                    complete_diet(&mut engine);
                    Ok(())
                }
                Commands::Plan { reroll } => {
                    show_plan(&mut engine, reroll);
                    Ok(())
                }
                Commands::Calendar { month } => show_calendar(&engine, month),
                Commands::Watch => watch(&mut engine).await,
                Commands::Login { .. } | Commands::Logout => unreachable!(),
            };
            // Mutations run detached saves, give them a chance to land
            // before the process exits.
            engine.flush().await;
            result
        }
    }
}

fn login(application_dir: &Path, email: &str) -> Result<()> {
    let Some(user) = auth::authorize(email) else {
        bail!("Email not authorized. Check the email or contact support.");
    };
    auth::save_session(application_dir, &user)?;
    println!("Welcome back, {user}!");
    Ok(())
}

async fn open_session(
    application_dir: &Path,
    remote_url: Option<String>,
    selection_mode: SelectionMode,
) -> Result<TrackerEngine> {
    let Some(user) = auth::load_session(application_dir)? else {
        bail!("Not logged in. Run `welltrack login <email>` first.");
    };
    let storage = create_storage(remote_url, application_dir)?;
    let key = DayKey::new(DefaultClock.time().date_naive());
    Ok(TrackerEngine::start(user, storage, catalog(), key, selection_mode).await)
}

fn create_storage(
    remote_url: Option<String>,
    application_dir: &Path,
) -> Result<Arc<dyn ProgressStorage>> {
    Ok(match remote_url {
        Some(url) => Arc::new(HttpDocumentStore::new(url)),
        None => Arc::new(LocalDocumentStore::new(application_dir.join("progress"))?),
    })
}

fn parse_local_date(value: &str, what: &str) -> Result<DateTime<Local>> {
    match parse_date_string(value, Local::now(), Dialect::Uk) {
        Ok(v) => Ok(v.with_timezone(&Local)),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to parse {what} {e}"),
            )
            .into()),
    }
}

fn show_status(engine: &TrackerEngine, day: Option<String>) -> Result<()> {
    let key = match day {
        Some(value) => DayKey::new(parse_local_date(&value, "day")?.date_naive()),
        None => engine.current_key(),
    };
    print_status(engine, &key);
    Ok(())
}

fn print_status(engine: &TrackerEngine, key: &DayKey) {
    let record = engine.record_for(key);
    let total_classes = engine.catalog().total_classes();
    let goal = engine.daily_goal(key);

    println!(
        "{} {} {goal}",
        Colour::Green.bold().paint(format!("Daily goal for {key}:")),
        render_bar(goal),
    );
    println!(
        "  yoga     {} {}/{} classes{}",
        render_bar(yoga_percent(&record, total_classes)),
        record.completed_yoga_classes.len(),
        total_classes,
        if record.yoga { " (completed!)" } else { "" },
    );
    println!(
        "  diet     {}",
        if record.diet {
            Colour::Green.paint("completed").to_string()
        } else {
            "not completed yet".to_string()
        },
    );
    println!(
        "  walking  {} {}/{} min",
        render_bar(walking_percent(&record, WALKING_GOAL_MINUTES)),
        record.walking_minutes,
        WALKING_GOAL_MINUTES,
    );
}

fn render_bar(value: Percentage) -> String {
    const SEGMENTS: usize = 20;
    let filled = ((*value / 100. * SEGMENTS as f64).round() as usize).min(SEGMENTS);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(SEGMENTS - filled))
}

fn show_classes(engine: &TrackerEngine) {
    let key = engine.current_key();
    let record = engine.record_for(&key);
    if record.yoga {
        println!(
            "{}",
            Colour::Green
                .bold()
                .paint("Congratulations! Today's yoga is completed.")
        );
    }
    for class in engine.catalog().classes() {
        let done = record.completed_yoga_classes.contains(&class.id);
        let mark = if done {
            Colour::Green.paint("✔").to_string()
        } else {
            "○".to_string()
        };
        println!("  {mark} [{}] {}", class.id, class.title);
    }
}

fn toggle_class(engine: &mut TrackerEngine, class_id: u32) {
    let key = engine.current_key();
    match engine.toggle_yoga_class(&key, class_id) {
        Ok(()) => show_classes(engine),
        Err(e) => println!("{}", Colour::Red.paint(e.to_string())),
    }
}

fn log_walk(engine: &mut TrackerEngine, minutes: u32) {
    let key = engine.current_key();
    match engine.add_walking_minutes(&key, minutes) {
        Ok(()) => print_status(engine, &key),
        Err(e) => println!("{}", Colour::Red.paint(e.to_string())),
    }
}

fn complete_diet(engine: &mut TrackerEngine) {
    let key = engine.current_key();
    engine.set_diet_completed(&key);
    println!("Today's diet is completed.");
    print_status(engine, &key);
}

fn show_plan(engine: &mut TrackerEngine, reroll: Option<MealCategory>) {
    if let Some(category) = reroll {
        engine.reroll_recipe(category);
    }
    for recipe in engine.diet_selection().recipes() {
        print_recipe(recipe);
    }
    println!("The plan is not persisted, rerolls last only for this session.");
}

fn print_recipe(recipe: &Recipe) {
    println!(
        "{}: {}",
        Colour::Green.bold().paint(recipe.category.to_string()),
        recipe.name
    );
    for ingredient in &recipe.ingredients {
        println!("  - {ingredient}");
    }
    println!("  {}", recipe.instructions);
    let nutrition = &recipe.nutrition;
    println!(
        "  {} {}, protein {}, carbs {}, fat {}\n",
        Colour::Cyan.paint("nutrition:"),
        nutrition.calories,
        nutrition.protein,
        nutrition.carbs,
        nutrition.fat,
    );
}

fn show_calendar(engine: &TrackerEngine, month: Option<String>) -> Result<()> {
    let month_start = match month {
        Some(value) => parse_local_date(&value, "month")?,
        None => Local::now(),
    }
    .beginning_of_month()
    .date_naive();
    print!(
        "{}",
        calendar::render_month(engine.store(), month_start, Local::now().date_naive())
    );
    Ok(())
}

async fn watch(engine: &mut TrackerEngine) -> Result<()> {
    let (sender, mut receiver) = mpsc::channel(4);
    let shutdown = CancellationToken::new();
    let watcher = DayRolloverWatcher::new(
        sender,
        shutdown.clone(),
        DAY_CHECK_INTERVAL,
        Box::new(DefaultClock),
    );
    let watcher_handle = tokio::spawn(watcher.run());

    println!(
        "Watching for rollover, press ctrl-c to stop. The next day starts at {}.",
        next_day_start(Local::now()).format("%Y-%m-%d %H:%M")
    );
    let key = engine.current_key();
    print_status(engine, &key);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                shutdown.cancel();
                break;
            }
            key = receiver.recv() => match key {
                Some(key) => {
                    engine.apply_rollover(key);
                    println!("\n{}", Colour::Green.bold().paint(format!("A new day begins: {key}")));
                    print_status(engine, &key);
                }
                None => break,
            }
        }
    }

    watcher_handle.await??;
    Ok(())
}
