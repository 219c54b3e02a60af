//! `wlog` - CLI for weightlog
//!
//! This binary provides the command-line interface for logging meals, weights
//! and habits and for viewing summaries of the logs.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use serde::Serialize;
use tracing::warn;

use weightlog::cli::output::{
    format_number, render_journal, render_points, render_rows, render_table, render_trend, tail,
};
use weightlog::cli::{
    Cli, Command, ConfigCommand, DashboardCommand, HabitAddArgs, HabitCommand, JournalCommand,
    MealAddArgs, MealCommand, OutputFormat, ShowCommand, SummaryCommand, TrendCommand,
    WeightAddArgs, WeightCommand, WindowArg,
};
use weightlog::dashboard::{
    days_with_logs, nutrient_balance, photo_journal, ConsistencyHeatmap, WeightTrend,
};
use weightlog::logbook::log_meal;
use weightlog::photos::{host_from_config, PhotoUpload};
use weightlog::{
    init_logging, Config, Grouping, HabitRecord, MealRecord, Metric, PhotoRecord, Record,
    RecordKind, RecordStore, WeightRecord,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Config commands work on the file itself, even an invalid one
    if let Command::Config(config_cmd) = cli.command {
        return handle_config(cli.config, config_cmd);
    }

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;
    let store = RecordStore::open(config.data_dir()).context("opening data directory")?;

    match cli.command {
        Command::Meal(MealCommand::Add(args)) => handle_meal_add(&config, &store, args).await,
        Command::Weight(WeightCommand::Add(args)) => handle_weight_add(&store, &args),
        Command::Habit(HabitCommand::Add(args)) => handle_habit_add(&store, args),
        Command::Show(cmd) => handle_show(&store, &cmd),
        Command::Summary(cmd) => handle_summary(&store, &cmd),
        Command::Trend(cmd) => handle_trend(&config, &store, &cmd),
        Command::Dashboard(cmd) => handle_dashboard(&config, &store, &cmd),
        Command::Journal(cmd) => handle_journal(&store, &cmd),
        Command::Status(status_cmd) => handle_status(&config, &store, status_cmd.json),
        Command::Config(_) => Ok(()),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Print an unsaved record so the user can retry, then return the error.
fn report_unsaved<R: Serialize>(record: &R, err: weightlog::Error) -> anyhow::Error {
    if let Ok(json) = serde_json::to_string_pretty(record) {
        eprintln!("Entry was not saved:\n{json}");
    }
    anyhow::Error::new(err).context("saving entry")
}

fn save<R: Record>(store: &RecordStore, record: &R) -> anyhow::Result<()> {
    store
        .append(record)
        .map_err(|e| report_unsaved(record, e))
}

async fn handle_meal_add(
    config: &Config,
    store: &RecordStore,
    args: MealAddArgs,
) -> anyhow::Result<()> {
    let meal = MealRecord::new(args.date.unwrap_or_else(today), args.meal, args.calories)?
        .with_portion(args.portion.into())
        .with_quality(args.quality.into())
        .with_nutrients(args.protein, args.fiber)
        .with_mood(args.mood_before, args.mood_after)
        .with_hunger(args.hunger_before, args.hunger_after);
    meal.validate()?;

    let photo = match args.photo {
        Some(path) if config.photos.enabled => {
            Some(PhotoUpload::from_path(&path, config.photos.max_bytes)?)
        }
        Some(path) => {
            warn!("Photos are disabled; ignoring {}", path.display());
            None
        }
        None => None,
    };
    let host = host_from_config(config)?;

    let logged = log_meal(store, host.as_deref(), &meal, photo.as_ref())
        .await
        .map_err(|e| report_unsaved(&meal, e))?;

    println!(
        "Logged {} ({} kcal) on {}",
        logged.meal.meal, logged.meal.calories, logged.meal.date
    );
    if let Some(record) = logged.photo {
        match record.url {
            Some(url) => println!("Photo: {url}"),
            None => println!("Photo saved without a location (upload failed)"),
        }
    }
    Ok(())
}

fn handle_weight_add(store: &RecordStore, args: &WeightAddArgs) -> anyhow::Result<()> {
    let mut record = WeightRecord::new(
        args.date.unwrap_or_else(today),
        args.weight,
        args.unit.into(),
    )?;
    if let Some(waist) = args.waist {
        record = record.with_waist(waist);
    }
    save(store, &record)?;

    println!(
        "Logged {} {} on {}",
        format_number(record.weight),
        record.unit,
        record.date
    );
    Ok(())
}

fn handle_habit_add(store: &RecordStore, args: HabitAddArgs) -> anyhow::Result<()> {
    let record = HabitRecord {
        date: args.date.unwrap_or_else(today),
        walk: args.walk,
        water: args.water,
        fruit: args.fruit,
        custom_habit: args.custom.unwrap_or_default(),
        reflection: args.reflection.unwrap_or_default(),
    };
    save(store, &record)?;

    let done = [record.walk, record.water, record.fruit]
        .iter()
        .filter(|d| **d)
        .count();
    println!("Logged habits for {} ({done}/3 done)", record.date);
    Ok(())
}

fn handle_show(store: &RecordStore, cmd: &ShowCommand) -> anyhow::Result<()> {
    let table = store.load(cmd.kind.into())?;
    println!("{}", render_rows(&table, cmd.last, cmd.format)?);
    Ok(())
}

fn handle_summary(store: &RecordStore, cmd: &SummaryCommand) -> anyhow::Result<()> {
    let metric = Metric::new(cmd.column.clone(), cmd.reduce.into());
    let points = store.aggregate(cmd.kind.into(), cmd.by.into(), &metric)?;
    if points.is_empty() && cmd.format != OutputFormat::Json {
        println!("No {} values to summarize.", cmd.column);
        return Ok(());
    }
    println!("{}", render_points(&points, &cmd.column, cmd.format)?);
    Ok(())
}

fn handle_trend(config: &Config, store: &RecordStore, cmd: &TrendCommand) -> anyhow::Result<()> {
    let window = match cmd.window {
        WindowArg::Short => config.dashboard.short_window,
        WindowArg::Long => config.dashboard.long_window,
    };
    let unit = cmd.unit.map_or(config.dashboard.unit, Into::into);
    let weights = store.load_records::<WeightRecord>()?;

    match WeightTrend::from_records(&weights, unit, window, config.dashboard.moving_average) {
        Some(trend) => println!("{}", render_trend(&trend, cmd.format)?),
        None => println!("No weight entries yet."),
    }
    Ok(())
}

fn handle_dashboard(
    config: &Config,
    store: &RecordStore,
    cmd: &DashboardCommand,
) -> anyhow::Result<()> {
    let meals = store.load_records::<MealRecord>()?;
    let weights = store.load_records::<WeightRecord>()?;
    let today = today();

    let calories = store.aggregate(RecordKind::Meal, Grouping::Day, &Metric::sum("calories"))?;
    let calories_today = calories
        .iter()
        .find(|p| p.date == today)
        .map_or(0.0, |p| p.value);
    let trend = WeightTrend::from_records(
        &weights,
        config.dashboard.unit,
        config.dashboard.short_window,
        config.dashboard.moving_average,
    );
    let heatmap = ConsistencyHeatmap::from_meals(&meals);
    let nutrients = nutrient_balance(&meals);

    if cmd.format == OutputFormat::Json {
        let dashboard = serde_json::json!({
            "days_with_logs": days_with_logs(&meals),
            "calories_today": calories_today,
            "daily_calories": calories,
            "weight_trend": trend,
            "heatmap": heatmap,
            "nutrients": nutrients,
        });
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    println!("Dashboard");
    println!("=========");
    println!();
    println!("Days with logs:   {}", days_with_logs(&meals));
    println!("Calories today:   {}", format_number(calories_today));
    match &trend {
        Some(trend) => {
            println!(
                "Last weight:      {} {}",
                format_number(trend.current),
                trend.unit
            );
            println!(
                "Change:           {:+.1} {} over {} entries",
                trend.total_change,
                trend.unit,
                trend.points.len()
            );
        }
        None => println!("Last weight:      -"),
    }

    if !heatmap.is_empty() {
        println!();
        println!("[Consistency]");
        print!("{}", heatmap.render());
    }

    if !nutrients.is_empty() {
        println!();
        println!("[Nutrients, last 7 days]");
        let rows: Vec<Vec<String>> = tail(&nutrients, Some(7))
            .iter()
            .map(|n| {
                vec![
                    n.date.to_string(),
                    format_number(n.protein_g),
                    format_number(n.fiber_g),
                ]
            })
            .collect();
        print!("{}", render_table(&["date", "protein_g", "fiber_g"], &rows));
    }
    Ok(())
}

fn handle_journal(store: &RecordStore, cmd: &JournalCommand) -> anyhow::Result<()> {
    let meals = store.load_records::<MealRecord>()?;
    let photos = store.load_records::<PhotoRecord>()?;

    let mut entries = photo_journal(&meals, &photos);
    if let Some(n) = cmd.last {
        entries.truncate(n);
    }
    if entries.is_empty() && cmd.format != OutputFormat::Json {
        println!("No meals logged yet.");
        return Ok(());
    }
    println!("{}", render_journal(&entries, cmd.format)?);
    Ok(())
}

fn handle_status(config: &Config, store: &RecordStore, json: bool) -> anyhow::Result<()> {
    let stats = store.stats()?;

    if json {
        let status = serde_json::json!({
            "data_dir": store.data_dir(),
            "images_dir": config.images_dir(),
            "cloudinary": config.cloudinary.is_configured(),
            "logs": stats,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("wlog status");
    println!("-----------");
    println!("Data directory: {}", store.data_dir().display());
    println!(
        "Photos:         {}",
        if !config.photos.enabled {
            "disabled".to_string()
        } else if config.cloudinary.is_configured() {
            "cloudinary".to_string()
        } else {
            config.images_dir().display().to_string()
        }
    );
    println!();

    let rows: Vec<Vec<String>> = stats
        .iter()
        .map(|s| {
            vec![
                s.kind.to_string(),
                s.rows.to_string(),
                s.first_date.map(|d| d.to_string()).unwrap_or_default(),
                s.last_date.map(|d| d.to_string()).unwrap_or_default(),
                s.size_bytes.to_string(),
            ]
        })
        .collect();
    print!(
        "{}",
        render_table(&["log", "rows", "first", "last", "bytes"], &rows)
    );
    Ok(())
}

fn handle_config(config_path: Option<std::path::PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path).context("loading configuration")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Data directory:     {}", config.data_dir().display());
                println!();
                println!("[Photos]");
                println!("  Enabled:            {}", config.photos.enabled);
                println!("  Max bytes:          {}", config.photos.max_bytes);
                println!("  Images directory:   {}", config.images_dir().display());
                println!();
                println!("[Cloudinary]");
                println!(
                    "  Cloud name:         {}",
                    config.cloudinary.cloud_name.as_deref().unwrap_or("-")
                );
                println!(
                    "  Upload preset:      {}",
                    config.cloudinary.upload_preset.as_deref().unwrap_or("-")
                );
                println!(
                    "  Folder:             {}",
                    config.cloudinary.folder.as_deref().unwrap_or("-")
                );
                println!("  Timeout (secs):     {}", config.cloudinary.timeout_secs);
                println!();
                println!("[Dashboard]");
                println!("  Short window:       {}", config.dashboard.short_window);
                println!("  Long window:        {}", config.dashboard.long_window);
                println!("  Moving average:     {}", config.dashboard.moving_average);
                println!("  Unit:               {}", config.dashboard.unit);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
