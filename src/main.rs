use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

mod api;
mod export;
mod models;
mod notify;
mod sync;
mod view;

#[derive(Parser)]
#[command(name = "cohort-activity-admin")]
#[command(about = "Admin console for cohort social activity", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List cohort users with their aggregated post metrics
    List {
        #[arg(long)]
        cohort: String,
    },
    /// Trigger LinkedIn post fetches, one user at a time
    Sync {
        #[arg(long)]
        cohort: String,
        /// Sync a single user instead of the whole cohort
        #[arg(long)]
        user: Option<String>,
        /// LinkedIn session cookie; falls back to LINKEDIN_SESSION_COOKIE
        #[arg(long)]
        cookie: Option<String>,
    },
    /// Export the cohort table as a CSV file
    Export {
        #[arg(long)]
        cohort: String,
        #[arg(long, default_value = "admin_users_data.csv")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let base_url = std::env::var("COHORT_API_URL")
        .context("COHORT_API_URL must be set to the backend API base URL")?;
    let api = api::ApiClient::new(base_url);
    let notifier = notify::ConsoleNotifier;

    match cli.command {
        Commands::List { cohort } => {
            let mut view = view::CohortView::new();
            view.load(&api, &cohort).await;
            print!("{}", view.render());
        }
        Commands::Sync {
            cohort,
            user,
            cookie,
        } => {
            let cookie = match cookie {
                Some(value) => value,
                None => std::env::var("LINKEDIN_SESSION_COOKIE")
                    .context("pass --cookie or set LINKEDIN_SESSION_COOKIE")?,
            };

            let mut view = view::CohortView::new();
            view.load(&api, &cohort).await;
            if let models::LoadState::Errored(message) = view.state() {
                anyhow::bail!("{message}");
            }

            let runner = sync::SyncRunner::new();
            match user {
                Some(user_id) => {
                    let row = view
                        .rows()
                        .iter()
                        .find(|row| row.id == user_id)
                        .with_context(|| format!("no user {user_id} in cohort {cohort}"))?;
                    runner.run_one(&api, row, &cookie, &notifier).await;
                }
                None => {
                    println!("Starting batch fetch for {} users.", view.rows().len());
                    if let Some(summary) =
                        runner.run_all(&api, view.rows(), &cookie, &notifier).await
                    {
                        tracing::debug!(
                            attempted = summary.attempted,
                            completed = summary.completed,
                            "batch run finished"
                        );
                    }
                }
            }
        }
        Commands::Export { cohort, out } => {
            let mut view = view::CohortView::new();
            view.load(&api, &cohort).await;
            if let models::LoadState::Errored(message) = view.state() {
                anyhow::bail!("{message}");
            }
            export::export(view.rows(), &out, &notifier)?;
        }
    }

    Ok(())
}
