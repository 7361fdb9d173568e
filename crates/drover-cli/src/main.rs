use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use serde_json::json;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use drover_cli::{Command, Config};
use drover_client::Session;
use drover_core::{AppError, JsonMap, Outcome};
use drover_store::S3Store;

fn main() {
    // Load environment variables from .env file
    dotenv().ok();

    // Setup logging (stderr to keep stdout clean for outcome JSON)
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = Config::parse();
    if let Err(e) = run(config) {
        eprintln!("Error: {:#}", e);
        let user_error = e
            .downcast_ref::<AppError>()
            .map(AppError::is_user_error)
            .unwrap_or(false);
        std::process::exit(if user_error { 2 } else { 1 });
    }
}

fn run(config: Config) -> anyhow::Result<()> {
    let session = Session::new(&config.url, &config.api_key)?;
    let editor = session.editor()?;

    let outcome = match config.command {
        Command::SiteRead => editor.site_read(),
        Command::Show { name } => editor.show_dataset(&name),
        Command::Query { query } => editor.query_datasets(&query),
        Command::PutDataset {
            name,
            notes,
            owner_org,
            identifier,
            update,
        } => {
            let record = dataset_record(&name, &notes, &owner_org, &identifier);
            editor.put_dataset(&record, !update)?
        }
        Command::DeleteDataset { name } => editor.delete_dataset(&name),
        Command::PutResource {
            dataset,
            name,
            description,
            s3_path,
            update,
        } => {
            let store = S3Store::from_env().context("S3 credentials unavailable")?;
            let record = resource_record(&dataset, &name, &description);
            editor.put_resource_from_s3(&record, &store, &s3_path, !update)?
        }
    };

    report(&outcome)
}

fn dataset_record(name: &str, notes: &str, owner_org: &str, identifier: &str) -> JsonMap {
    json!({
        "name": name,
        "notes": notes,
        "owner_org": owner_org,
        "extra:identifier": identifier,
    })
    .as_object()
    .cloned()
    .unwrap_or_default()
}

fn resource_record(dataset: &str, name: &str, description: &str) -> JsonMap {
    json!({
        "name": dataset,
        "resource:name": name,
        "resource:description": description,
    })
    .as_object()
    .cloned()
    .unwrap_or_default()
}

/// Prints the outcome payload and maps a failed portal call to a non-zero
/// exit. The no-response terminal outcome (delete sequences, storage
/// misses) signals completion, not failure; per-step results are in the
/// logs on stderr.
fn report(outcome: &Outcome) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(outcome.result())?);
    match outcome.status_code() {
        Some(code) if !outcome.ok() => anyhow::bail!("portal call failed with status {}", code),
        _ => Ok(()),
    }
}
