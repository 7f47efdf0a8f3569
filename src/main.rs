use clap::{Parser, Subcommand};
use payroll_report::config::{load_config, ServiceConfig};
use payroll_report::domain::ReportPeriod;
use payroll_report::error::AppResult;
use payroll_report::server::ReportServer;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, trace};

/// Monthly payroll reports with per-department failure isolation
#[derive(Parser)]
#[command(name = "payroll-report", version)]
#[command(about = "Generate monthly payroll reports", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the report HTTP API
    Serve {
        /// Address to listen on (overrides configuration)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Generate one report and write it to disk
    Generate {
        /// Report year (1900-2100)
        #[arg(long)]
        year: i32,

        /// Report month (1-12)
        #[arg(long)]
        month: i32,

        /// Directory to write the report into (default: current directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8, config: &ServiceConfig) {
    let log_level = match (verbose, config.log_level.as_deref()) {
        (0, Some(level)) => level.to_lowercase(),
        (0, None) => "info".to_string(),
        (1, _) => "debug".to_string(),
        (2, _) => "trace".to_string(),
        _ => "trace,hyper=debug,tower=debug".to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(verbose >= 2)
        .with_thread_ids(verbose >= 3)
        .with_line_number(verbose >= 3)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(2);
        }
    };

    init_tracing(cli.verbose, &config);
    debug!("payroll-report started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    let result = match cli.command {
        Commands::Serve { bind } => run_serve(config, bind).await,
        Commands::Generate {
            year,
            month,
            output_dir,
        } => run_generate(config, year, month, output_dir).await,
    };

    if let Err(e) = result {
        error!("Fatal error: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_serve(mut config: ServiceConfig, bind: Option<String>) -> AppResult<()> {
    if let Some(bind) = bind {
        config.server.bind_addr = bind;
    }
    let addr = config.bind_addr()?;
    let engine = payroll_report::app::build_engine(&config)?;

    ReportServer::new(Arc::new(engine), addr).start().await
}

async fn run_generate(
    config: ServiceConfig,
    year: i32,
    month: i32,
    output_dir: Option<PathBuf>,
) -> AppResult<()> {
    let period = ReportPeriod::new(year, month)?;
    let engine = payroll_report::app::build_engine(&config)?;

    let file = engine.generate(period).await;
    let dir = output_dir.unwrap_or_else(|| PathBuf::from("."));
    tokio::fs::create_dir_all(&dir).await?;

    let path = dir.join(&file.file_name);
    tokio::fs::write(&path, file.content.as_bytes()).await?;

    if file.is_error {
        eprintln!("Report generation failed; wrote error report instead");
    }
    println!("{}", path.display());
    Ok(())
}
