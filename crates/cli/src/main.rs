//! `tunelaunch-cli` -- fine-tuning form-state checker.
//!
//! Loads a catalog snapshot and a raw form-state JSON, runs one validation
//! pass, and prints the resolution as JSON on stdout.
//!
//! # Environment variables
//!
//! | Variable          | Required | Default | Description                       |
//! |-------------------|----------|---------|-----------------------------------|
//! | `CATALOG_PATH`    | yes*     | --      | Path to the catalog snapshot JSON |
//! | `FORM_STATE_PATH` | yes*     | --      | Path to the raw form-state JSON   |
//!
//! *Both may instead be passed as the two positional arguments:
//! `tunelaunch-cli <catalog.json> <form-state.json>`.
//!
//! Exit codes: `0` valid configuration, `1` invalid configuration,
//! `2` usage, I/O, or catalog error.

use std::path::PathBuf;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tunelaunch_cli::harness;

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tunelaunch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (catalog_path, form_state_path) = match args.as_slice() {
        [catalog, form_state] => (PathBuf::from(catalog), PathBuf::from(form_state)),
        [] => {
            let catalog = std::env::var("CATALOG_PATH").unwrap_or_else(|_| {
                tracing::error!("CATALOG_PATH environment variable is required");
                std::process::exit(2);
            });
            let form_state = std::env::var("FORM_STATE_PATH").unwrap_or_else(|_| {
                tracing::error!("FORM_STATE_PATH environment variable is required");
                std::process::exit(2);
            });
            (PathBuf::from(catalog), PathBuf::from(form_state))
        }
        _ => {
            tracing::error!("usage: tunelaunch-cli <catalog.json> <form-state.json>");
            std::process::exit(2);
        }
    };

    let resolution = match harness::run(&catalog_path, &form_state_path) {
        Ok(resolution) => resolution,
        Err(err) => {
            tracing::error!("resolution pass failed: {err:#}");
            std::process::exit(2);
        }
    };

    match serde_json::to_string_pretty(&resolution) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            tracing::error!("failed to serialize resolution: {err}");
            std::process::exit(2);
        }
    }

    std::process::exit(if resolution.is_valid() { 0 } else { 1 });
}
