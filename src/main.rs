use std::collections::HashMap;
use std::fs;
use std::process::ExitCode;

use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;

use orbit_sentry::assessment::{assess, propagate_batch};
use orbit_sentry::compliance::DesignMetadata;
use orbit_sentry::conjunction::{screen_catalog, ScreeningWindow};
use orbit_sentry::propagation::{sample_track, StateVector};
use orbit_sentry::tle::{Catalog, TrackedObject};

#[derive(Parser)]
#[command(name = "orbit-sentry")]
#[command(about = "Satellite conjunction screening and debris-mitigation compliance")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a TLE file
    Validate { file: String },
    /// Propagate every object in a TLE file to one instant
    Positions {
        file: String,
        /// RFC 3339 timestamp; defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Sample one object's ground track at a fixed step
    Track {
        file: String,
        #[arg(long)]
        catalog: u32,
        #[arg(long, default_value = "90m")]
        span: String,
        #[arg(long, default_value = "60s")]
        step: String,
        /// RFC 3339 start; defaults to now
        #[arg(long)]
        from: Option<DateTime<Utc>>,
    },
    /// Screen one object against the rest of the file for close approaches
    Screen {
        file: String,
        #[arg(long)]
        primary: u32,
        #[arg(long, default_value = "48h")]
        horizon: String,
        #[arg(long, default_value = "60s")]
        step: String,
        #[arg(long)]
        from: Option<DateTime<Utc>>,
    },
    /// Full risk assessment: conjunction screening plus compliance
    Assess {
        file: String,
        #[arg(long)]
        primary: u32,
        /// YAML file mapping catalog numbers to design metadata
        #[arg(long)]
        metadata: Option<String>,
        #[arg(long, default_value = "48h")]
        horizon: String,
        #[arg(long)]
        from: Option<DateTime<Utc>>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { file } => validate(&file),
        Commands::Positions { file, at } => positions(&file, at.unwrap_or_else(Utc::now)),
        Commands::Track {
            file,
            catalog,
            span,
            step,
            from,
        } => track(&file, catalog, &span, &step, from.unwrap_or_else(Utc::now)),
        Commands::Screen {
            file,
            primary,
            horizon,
            step,
            from,
        } => screen(&file, primary, &horizon, &step, from.unwrap_or_else(Utc::now)),
        Commands::Assess {
            file,
            primary,
            metadata,
            horizon,
            from,
        } => run_assess(
            &file,
            primary,
            metadata.as_deref(),
            &horizon,
            from.unwrap_or_else(Utc::now),
        ),
    }
}

fn validate(path: &str) -> ExitCode {
    let (catalog, rejected) = match load_catalog(path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error reading file: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut objects: Vec<_> = catalog.objects().collect();
    objects.sort_by_key(|o| o.catalog_number());

    println!("{} objects parsed", objects.len());
    for o in objects {
        println!(
            "  {:>5}: {} ({:?}, epoch {})",
            o.catalog_number(),
            o.name,
            o.class,
            o.elements.epoch
        );
    }

    if rejected.is_empty() {
        ExitCode::SUCCESS
    } else {
        for r in &rejected {
            eprintln!(
                "rejected {}: {}",
                r.name.as_deref().unwrap_or("unnamed record"),
                r.error
            );
        }
        ExitCode::FAILURE
    }
}

#[derive(Serialize)]
struct PositionRow {
    catalog_number: u32,
    name: String,
    state: StateVector,
}

fn positions(path: &str, at: DateTime<Utc>) -> ExitCode {
    let (catalog, _) = match load_catalog(path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error reading file: {e}");
            return ExitCode::FAILURE;
        }
    };

    let objects: Vec<TrackedObject> = catalog.objects().cloned().collect();
    let outcome = propagate_batch(&objects, at);

    let names: HashMap<u32, &str> = objects
        .iter()
        .map(|o| (o.catalog_number(), o.name.as_str()))
        .collect();
    let rows: Vec<PositionRow> = outcome
        .states
        .iter()
        .map(|(catalog_number, state)| PositionRow {
            catalog_number: *catalog_number,
            name: names.get(catalog_number).unwrap_or(&"").to_string(),
            state: *state,
        })
        .collect();
    let failures: Vec<String> = outcome
        .failures
        .iter()
        .map(|f| format!("object {}: {}", f.catalog_number, f.error))
        .collect();

    print_json(&serde_json::json!({
        "at": at,
        "positions": rows,
        "failures": failures,
    }))
}

fn track(path: &str, catalog_number: u32, span: &str, step: &str, from: DateTime<Utc>) -> ExitCode {
    let (catalog, _) = match load_catalog(path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error reading file: {e}");
            return ExitCode::FAILURE;
        }
    };
    let object = match catalog.get(catalog_number) {
        Some(o) => o,
        None => {
            eprintln!("object {catalog_number} not found in {path}");
            return ExitCode::FAILURE;
        }
    };
    let (span, step) = match (parse_duration_arg(span), parse_duration_arg(step)) {
        (Ok(span), Ok(step)) if step > Duration::zero() => (span, step),
        (Ok(_), Ok(_)) => {
            eprintln!("Invalid duration: step must be positive");
            return ExitCode::FAILURE;
        }
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Invalid duration: {e}");
            return ExitCode::FAILURE;
        }
    };

    match sample_track(&object.elements, from, from + span, step) {
        Ok(states) => print_json(&serde_json::json!({
            "catalog_number": catalog_number,
            "name": object.name,
            "track": states,
        })),
        Err(e) => {
            eprintln!("Propagation failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn screen(path: &str, primary: u32, horizon: &str, step: &str, from: DateTime<Utc>) -> ExitCode {
    let (catalog, _) = match load_catalog(path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error reading file: {e}");
            return ExitCode::FAILURE;
        }
    };
    let primary_object = match catalog.get(primary) {
        Some(o) => o.clone(),
        None => {
            eprintln!("object {primary} not found in {path}");
            return ExitCode::FAILURE;
        }
    };
    let window = match build_window(from, horizon, Some(step)) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Invalid duration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let others: Vec<TrackedObject> = catalog.objects().cloned().collect();
    let outcome = screen_catalog(&primary_object, &others, &window);
    let failures: Vec<String> = outcome
        .failures
        .iter()
        .map(|f| format!("object {}: {}", f.catalog_number, f.error))
        .collect();

    print_json(&serde_json::json!({
        "primary": primary,
        "window_start": window.start,
        "events": outcome.events,
        "failures": failures,
    }))
}

fn run_assess(
    path: &str,
    primary: u32,
    metadata_path: Option<&str>,
    horizon: &str,
    from: DateTime<Utc>,
) -> ExitCode {
    let (catalog, _) = match load_catalog(path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error reading file: {e}");
            return ExitCode::FAILURE;
        }
    };
    let primary_object = match catalog.get(primary) {
        Some(o) => o.clone(),
        None => {
            eprintln!("object {primary} not found in {path}");
            return ExitCode::FAILURE;
        }
    };
    let window = match build_window(from, horizon, None) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Invalid duration: {e}");
            return ExitCode::FAILURE;
        }
    };
    let metadata = match metadata_path.map(load_metadata).transpose() {
        Ok(map) => map
            .and_then(|m| m.get(&primary).copied())
            .unwrap_or_default(),
        Err(e) => {
            eprintln!("Error reading metadata: {e}");
            return ExitCode::FAILURE;
        }
    };

    let others: Vec<TrackedObject> = catalog.objects().cloned().collect();
    match assess(&primary_object, &others, &window, &metadata) {
        Ok(assessment) => print_json(&assessment),
        Err(e) => {
            eprintln!("Assessment failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_catalog(
    path: &str,
) -> Result<(Catalog, Vec<orbit_sentry::tle::RejectedTle>), std::io::Error> {
    let content = fs::read_to_string(path)?;
    let mut catalog = Catalog::new();
    let outcome = catalog.ingest_text(&content);
    log::info!(
        "loaded {} objects from {path} ({} rejected)",
        outcome.loaded.len(),
        outcome.rejected.len()
    );
    Ok((catalog, outcome.rejected))
}

fn load_metadata(path: &str) -> Result<HashMap<u32, DesignMetadata>, String> {
    let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_yaml::from_str(&content).map_err(|e| e.to_string())
}

fn build_window(
    start: DateTime<Utc>,
    horizon: &str,
    step: Option<&str>,
) -> Result<ScreeningWindow, String> {
    let mut window = ScreeningWindow::starting(start);
    window.horizon = parse_duration_arg(horizon)?;
    if let Some(step) = step {
        let step = parse_duration_arg(step)?;
        if step <= Duration::zero() {
            return Err("step must be positive".to_string());
        }
        window.step = step;
    }
    Ok(window)
}

fn parse_duration_arg(s: &str) -> Result<Duration, String> {
    let std_duration = humantime::parse_duration(s.trim()).map_err(|e| e.to_string())?;
    Duration::from_std(std_duration).map_err(|e| e.to_string())
}

fn print_json(value: &impl Serialize) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Serialization error: {e}");
            ExitCode::FAILURE
        }
    }
}
