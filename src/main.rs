mod builder;
mod cli;
mod config;
mod export;
mod model;
mod providers;
mod scheduler;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use providers::github::GitHubTracker;
use providers::Tracker;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = cli::parse_args(&raw)?;
    if args.help {
        cli::print_help();
        return Ok(());
    }

    let config = config::resolve(args)?;

    let export = export::load(&config.trello_file)?;
    let cards = builder::build_cards(&export);
    info!(cards = cards.len(), "built card model from export");

    let tracker: Arc<dyn Tracker> = Arc::new(GitHubTracker::new(
        config.owner.clone(),
        config.repository.clone(),
        config.username.clone(),
        config.password.clone(),
    ));

    let schedule = scheduler::plan(cards, config.delay, config.resume);
    info!(
        cards = schedule.len(),
        delay_ms = config.delay.as_millis() as u64,
        resume = ?config.resume,
        "starting upload"
    );

    let report = scheduler::run(schedule, tracker).await?;

    println!(
        "Migrated {} issues and {} comments ({} comment failures)",
        report.issues_created,
        report.comments_created,
        report.comment_failures.len()
    );
    for failure in &report.comment_failures {
        println!(
            "  card #{}: comment by {} ({}) failed: {}",
            failure.card_ordinal, failure.author_name, failure.date, failure.error
        );
    }

    Ok(())
}
