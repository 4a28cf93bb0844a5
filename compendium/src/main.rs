//! Compendium CLI - command line access to the record store.
//!
//! Every subcommand maps onto one repository operation and prints its result
//! as pretty JSON on stdout. Missing records and floor violations are reported
//! on stderr with a non-zero exit status.
//!
//! The data directory comes from `--data-dir`, else from
//! [`compendium_store::config::get_data_dir`].

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use compendium_store::{config, CollectionKind, CollectionStore, EntityRepository};

mod commands;
mod logging;

use commands::CliError;

/// Top-level CLI arguments.
#[derive(Parser)]
#[command(name = "compendium", about = "Read and edit compendium collections")]
struct Cli {
    /// Directory holding one `<collection>.json` file per entity kind.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log every store operation to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every record of a collection.
    List { kind: CollectionKind },
    /// Print one record.
    Get { kind: CollectionKind, id: i64 },
    /// Add a record from a JSON object; the id is assigned automatically.
    Create { kind: CollectionKind, json: String },
    /// Merge a JSON object into an existing record. `null` fields are ignored.
    Update {
        kind: CollectionKind,
        id: i64,
        json: String,
    },
    /// Remove a record, honouring the collection's minimum population.
    Delete { kind: CollectionKind, id: i64 },
    /// Print the sessions of a campaign.
    Sessions { campaign_id: i64 },
    /// Append a session (JSON object) to a campaign.
    AddSession { campaign_id: i64, json: String },
    /// Print all campaign sessions grouped by date.
    Calendar {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },
    /// Fill collections that do not exist yet with starter records.
    Seed {
        /// Directory of `<collection>.json` files to copy from.
        #[arg(long)]
        defaults: Option<PathBuf>,
    },
}

async fn run(cli: Cli) -> Result<serde_json::Value, CliError> {
    let data_dir = cli.data_dir.unwrap_or_else(config::get_data_dir);
    tracing::debug!("Using data directory: {}", data_dir.display());
    let repo = EntityRepository::new(CollectionStore::new(data_dir));

    match cli.command {
        Commands::List { kind } => commands::list(&repo, kind).await,
        Commands::Get { kind, id } => commands::get(&repo, kind, id).await,
        Commands::Create { kind, json } => commands::create(&repo, kind, &json).await,
        Commands::Update { kind, id, json } => commands::update(&repo, kind, id, &json).await,
        Commands::Delete { kind, id } => commands::delete(&repo, kind, id).await,
        Commands::Sessions { campaign_id } => commands::list_sessions(&repo, campaign_id),
        Commands::AddSession { campaign_id, json } => {
            commands::add_session(&repo, campaign_id, &json)
        }
        Commands::Calendar { year, month } => commands::calendar(&repo, year, month),
        Commands::Seed { defaults } => {
            let defaults = defaults.unwrap_or_else(config::get_defaults_dir);
            commands::seed(&repo, &defaults)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = logging::init(cli.verbose);

    match run(cli).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e @ CliError::NotFound { .. }) => {
            eprintln!("error: {e}");
            Ok(ExitCode::from(2))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_kind_and_filters() {
        let cli = Cli::parse_from(["compendium", "calendar", "--year", "2024", "--month", "5"]);
        assert!(matches!(
            cli.command,
            Commands::Calendar {
                year: Some(2024),
                month: Some(5)
            }
        ));

        let cli = Cli::parse_from(["compendium", "delete", "dnd_classes", "3"]);
        assert!(matches!(
            cli.command,
            Commands::Delete {
                kind: CollectionKind::DndClasses,
                id: 3
            }
        ));
    }

    #[test]
    fn test_rejects_unknown_kind_and_bad_month() {
        assert!(Cli::try_parse_from(["compendium", "list", "dragons"]).is_err());
        assert!(Cli::try_parse_from(["compendium", "calendar", "--month", "13"]).is_err());
    }

    #[tokio::test]
    async fn test_run_uses_data_dir_flag() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_str().unwrap();

        let cli = Cli::parse_from([
            "compendium",
            "--data-dir",
            data_dir,
            "create",
            "maps",
            r#"{"name": "Ashen Vale"}"#,
        ]);
        run(cli).await.unwrap();

        assert!(dir.path().join("maps.json").exists());
    }
}
