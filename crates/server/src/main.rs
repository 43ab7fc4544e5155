//! e2e-mcp
//!
//! MCP stdio server that drives Playwright: scaffold a project, run the
//! suite and summarize its JSON report, open the HTML report. The same
//! operations are available as one-shot subcommands.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use e2e_mcp_runner::{RunOptions, TestRunner};

mod config;
mod prompts;
mod protocol;
mod server;
mod tools;

use config::McpConfig;
use server::{McpServer, ServerInfo};

#[derive(Parser)]
#[command(name = "e2e-mcp")]
#[command(about = "Playwright test runner exposed as an MCP server")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "E2E_MCP_CONFIG")]
    config: Option<PathBuf>,

    /// Working directory for test lookup (defaults to the process cwd)
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Launcher for the playwright CLI
    #[arg(long, env = "E2E_MCP_PROGRAM")]
    program: Option<String>,

    /// Extra test directory search path (repeatable)
    #[arg(long = "search-path")]
    search_paths: Vec<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP over stdin/stdout (default)
    Serve,

    /// Scaffold a Playwright project under PROJECT_DIR/e2e
    Init {
        project_dir: PathBuf,

        /// Base URL of the application under test
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Run the suite once and print the summary
    Run {
        /// Test directory (located automatically when omitted)
        #[arg(long)]
        test_dir: Option<PathBuf>,

        /// Single test file to run
        #[arg(long)]
        test_file: Option<String>,

        /// Only run tests whose title matches
        #[arg(long)]
        grep: Option<String>,

        /// Project from the Playwright config
        #[arg(long)]
        project: Option<String>,

        /// Show the browser window
        #[arg(long)]
        headed: bool,
    },

    /// Open the HTML report of the last run
    Report {
        #[arg(long)]
        test_dir: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries the protocol; logs go to stderr
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = match &cli.config {
        Some(path) => McpConfig::load(path)?,
        None => McpConfig::default(),
    };
    if let Some(program) = cli.program {
        config.runner.program = program;
    }
    config.runner.search_paths.extend(cli.search_paths);

    let cwd = match cli.cwd {
        Some(cwd) => cwd,
        None => std::env::current_dir()?,
    };
    let runner = Arc::new(TestRunner::with_config(config.runner_config(cwd)));

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            info!("e2e-mcp v{} serving on stdio", env!("CARGO_PKG_VERSION"));
            info!("Test lookup starts at {}", runner.cwd().display());

            let server = McpServer::new(ServerInfo::default())
                .with_tools(tools::default_tools(Arc::clone(&runner)))
                .with_prompts(prompts::builtin_prompts());

            Arc::new(server)
                .serve(tokio::io::stdin(), tokio::io::stdout())
                .await?;
            info!("Server stopped");
        }
        Commands::Init {
            project_dir,
            base_url,
        } => match runner.init_project(&project_dir, base_url.as_deref()) {
            Ok(scaffold) => println!("{}", scaffold.render()),
            Err(e) => {
                eprintln!("{}", e.to_report());
                std::process::exit(2);
            }
        },
        Commands::Run {
            test_dir,
            test_file,
            grep,
            project,
            headed,
        } => {
            let options = RunOptions {
                test_file,
                grep,
                project,
                headed,
            };
            match runner.run(test_dir.as_deref(), &options).await {
                Ok(report) => {
                    println!("{}", report.render());
                    if !report.outcome.success {
                        std::process::exit(1);
                    }
                }
                Err(e) => {
                    eprintln!("{}", e.to_report());
                    std::process::exit(2);
                }
            }
        }
        Commands::Report { test_dir } => match runner.open_report(test_dir.as_deref()) {
            Ok(launch) => println!("{}", launch.render()),
            Err(e) => {
                eprintln!("{}", e.to_report());
                std::process::exit(2);
            }
        },
        Commands::Config => print!("{}", config.to_toml()?),
    }

    Ok(())
}
