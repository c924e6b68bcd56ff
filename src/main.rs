use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blogmill::config::Config;
use blogmill::generator::TemplateContentCreator;
use blogmill::ops::OpsServer;
use blogmill::rotation::{JobTrigger, RotationScheduler, DEFAULT_RECENT_LIMIT};
use blogmill::storage::SqlitePostStore;

#[derive(Parser)]
#[command(
    name = "blogmill",
    version,
    about = "Automated blog post rotation scheduler",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (TOML); environment variables are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one rotation run now
    Run,

    /// Show the derived rotation state
    State,

    /// Show automation post statistics
    Stats {
        /// Number of recent posts to list
        #[arg(short, long, default_value_t = DEFAULT_RECENT_LIMIT)]
        limit: usize,
    },

    /// Delete all automation posts
    Clear {
        /// Confirm the irreversible delete
        #[arg(long)]
        yes: bool,
    },

    /// Start the daily trigger loop
    Schedule,

    /// Start the operational HTTP server
    Serve {
        /// Also start the daily trigger loop
        #[arg(long)]
        with_schedule: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(&cli.log_format, cli.verbose)?;

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    tracing::info!("blogmill starting");

    match cli.command {
        Commands::Run => run(&config).await?,
        Commands::State => state(&config).await?,
        Commands::Stats { limit } => stats(&config, limit).await?,
        Commands::Clear { yes } => clear(&config, yes).await?,
        Commands::Schedule => schedule(&config).await?,
        Commands::Serve { with_schedule } => serve(&config, with_schedule).await?,
    }

    Ok(())
}

/// Build the scheduler stack from configuration
fn build_scheduler(config: &Config) -> Result<Arc<RotationScheduler>> {
    let store = Arc::new(SqlitePostStore::new(&config.storage.sqlite_path)?);
    let creator =
        Arc::new(TemplateContentCreator::new(store.clone()).with_publish(config.rotation.publish));
    Ok(Arc::new(RotationScheduler::new(store, creator)))
}

async fn run(config: &Config) -> Result<()> {
    let scheduler = build_scheduler(config)?;
    let result = scheduler.run_once().await?;

    println!("Created post {} in category '{}'", result.post_id, result.category);
    Ok(())
}

async fn state(config: &Config) -> Result<()> {
    let scheduler = build_scheduler(config)?;
    let state = scheduler.current_state().await?;

    println!("Rotation State");
    println!("{:-<40}", "");
    println!(
        "Last Category: {}",
        state
            .last_category
            .map(|c| c.as_str().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!(
        "Last Run: {}",
        state
            .last_run_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "(never)".to_string())
    );
    println!("Current Index: {}", state.current_index);
    println!("Next Category: {}", state.next_category);
    Ok(())
}

async fn stats(config: &Config, limit: usize) -> Result<()> {
    let scheduler = build_scheduler(config)?;
    let stats = scheduler.stats(limit).await?;

    println!("Automation Posts: {}", stats.total_automation_posts);
    for entry in &stats.posts_by_status {
        println!("  {}: {}", entry.status, entry.count);
    }

    if !stats.recent_posts.is_empty() {
        println!("\nRecent:");
        for post in &stats.recent_posts {
            println!(
                "  {} [{}] {} ({})",
                post.created_at.format("%Y-%m-%d %H:%M"),
                post.status,
                post.title,
                post.id
            );
        }
    }
    Ok(())
}

async fn clear(config: &Config, yes: bool) -> Result<()> {
    if !yes {
        anyhow::bail!("clear deletes every automation post; re-run with --yes to confirm");
    }

    let scheduler = build_scheduler(config)?;
    let deleted = scheduler.clear_all().await?;

    println!("Deleted {deleted} automation posts");
    Ok(())
}

async fn schedule(config: &Config) -> Result<()> {
    let scheduler = build_scheduler(config)?;
    let trigger = Arc::new(JobTrigger::new(config.trigger_config(), scheduler)?);

    let status = trigger.status().await;
    println!("{}", status.display());

    let loop_handle = {
        let trigger = trigger.clone();
        tokio::spawn(async move { trigger.start().await })
    };

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received, stopping trigger");
    trigger.stop().await;
    loop_handle.await??;

    Ok(())
}

async fn serve(config: &Config, with_schedule: bool) -> Result<()> {
    let scheduler = build_scheduler(config)?;

    let trigger_handle = if with_schedule {
        let trigger = Arc::new(JobTrigger::new(config.trigger_config(), scheduler.clone())?);
        let handle = {
            let trigger = trigger.clone();
            tokio::spawn(async move { trigger.start().await })
        };
        Some((trigger, handle))
    } else {
        None
    };

    let server = OpsServer::new(config.server.clone(), scheduler);
    server
        .start_with_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    if let Some((trigger, handle)) = trigger_handle {
        trigger.stop().await;
        handle.await??;
    }

    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("blogmill=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("blogmill=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
