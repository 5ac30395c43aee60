//! CLI for the sp-orders-mcp server and migration assistant.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sp_orders_mcp::migration::require_knowledge;
use sp_orders_mcp::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sp-orders-mcp")]
#[command(author, version, about = "MCP server for the Selling Partner Orders API", long_about = None)]
struct Cli {
    /// Log filter directive, e.g. "debug" or "sp_orders_mcp=trace".
    /// Overrides SP_ORDERS_MCP_LOG.
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP requests on stdin/stdout (default)
    Serve,

    /// Migrate a source file from one Orders API version to another
    Migrate {
        /// File to migrate
        path: PathBuf,

        /// Current API version
        #[arg(long, default_value = ORDERS_V0)]
        source_version: String,

        /// Target API version
        #[arg(long, default_value = ORDERS_2026_01_01)]
        target_version: String,

        /// Only report findings, without refactored code
        #[arg(long)]
        analysis_only: bool,

        /// Language of the file, used to label code blocks
        #[arg(short, long)]
        language: Option<String>,

        /// Print a unified diff of the rewrite instead of the report
        #[arg(long, conflicts_with = "analysis_only")]
        diff: bool,
    },

    /// Print the general migration guide
    Guide,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(log) = cli.log {
        config.log_filter = log;
    }

    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .init();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => cmd_serve(&config).await,
        Commands::Migrate {
            path,
            source_version,
            target_version,
            analysis_only,
            language,
            diff,
        } => cmd_migrate(
            path,
            source_version,
            target_version,
            analysis_only,
            language,
            diff,
        ),
        Commands::Guide => cmd_guide(),
    }
}

async fn cmd_serve(config: &Config) -> Result<()> {
    McpServer::new(config)
        .run()
        .await
        .context("MCP server failed")
}

fn cmd_migrate(
    path: PathBuf,
    source_version: String,
    target_version: String,
    analysis_only: bool,
    language: Option<String>,
    diff: bool,
) -> Result<()> {
    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if diff {
        let data =
            require_knowledge(&source_version, &target_version).context("Migration failed")?;
        let analysis = analyze(&source, data);
        let migrated =
            generate(&source, &analysis, &target_version).context("Code generation failed")?;
        print!(
            "{}",
            unified_diff(&source, &migrated, &path.display().to_string())
        );
        println!("\n{}", ChangeSummary::between(&source, &migrated));
        return Ok(());
    }

    let mut request = MigrationRequest::new(source_version, target_version)
        .with_source(source)
        .analysis_only(analysis_only);
    if let Some(language) = language {
        request = request.with_language(language);
    }

    let report = MigrationAssistant::new()
        .run(&request)
        .context("Migration failed")?;
    println!("{report}");
    Ok(())
}

fn cmd_guide() -> Result<()> {
    let request = MigrationRequest::new(ORDERS_V0, ORDERS_2026_01_01);
    let guide = MigrationAssistant::new()
        .run(&request)
        .context("Failed to render guide")?;
    println!("{guide}");
    Ok(())
}
