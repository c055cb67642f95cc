use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use migrate_cli::config::{DEFAULT_DIGITS, DEFAULT_PATH};
use migrate_cli::{
    confirm, create_migration, num_down_migrations_from_args, CreateOptions, Dispatcher,
    FileEngine, MigrateConfig, Zone,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// migrate - create migration files and step a migration engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing the migration files
    #[arg(long, global = true, env = "MIGRATE_PATH", default_value = DEFAULT_PATH)]
    path: PathBuf,

    /// File recording the current version.
    /// Defaults to .migrate-state.json inside --path.
    #[arg(long, global = true, env = "MIGRATE_STATE")]
    state: Option<PathBuf>,

    /// Print debug logs (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a set of timestamped or sequential up/down migrations titled NAME
    Create {
        /// File extension, e.g. ".sql"
        #[arg(long)]
        ext: String,

        /// Directory to place the files in (defaults to --path)
        #[arg(long)]
        dir: Option<String>,

        /// Use sequential numbers instead of timestamps
        #[arg(long)]
        seq: bool,

        /// Width of the sequential number
        #[arg(long, default_value_t = DEFAULT_DIGITS)]
        digits: usize,

        /// Timestamp format: unix, unixNano or a strftime pattern
        #[arg(long)]
        format: Option<String>,

        /// Time zone used by timestamp formats
        #[arg(long, value_enum, default_value_t = Zone::Utc)]
        tz: Zone,

        name: String,
    },

    /// Apply all or N up migrations
    Up { limit: Option<u32> },

    /// Apply all or N down migrations
    Down {
        /// Apply all down migrations without asking
        #[arg(long)]
        all: bool,

        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Migrate to version V
    Goto { version: u64 },

    /// Drop everything inside the database
    Drop {
        /// Bypass the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Set version V but don't run the migration; -1 clears the version
    Force {
        #[arg(allow_hyphen_values = true)]
        version: i64,
    },

    /// Print the current migration version
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let args = Args::parse();
    let config = MigrateConfig::new(args.path, args.state, args.verbose);

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    match run(args.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: &MigrateConfig) -> anyhow::Result<()> {
    match command {
        Command::Create {
            ext,
            dir,
            seq,
            digits,
            format,
            tz,
            name,
        } => {
            let dir = dir.unwrap_or_else(|| config.path.to_string_lossy().to_string());
            let options = CreateOptions {
                dir,
                name,
                ext,
                seq,
                seq_digits: digits,
                format,
                zone: tz,
            };
            create_migration(&options, Utc::now()).await?;
        }
        Command::Up { limit } => {
            let mut dispatcher = open(config).await?;
            dispatcher.up(limit.map(i64::from).unwrap_or(-1)).await?;
        }
        Command::Down { all, args } => {
            let (limit, needs_confirmation) = num_down_migrations_from_args(all, &args)?;
            if needs_confirmation
                && !ask("Are you sure you want to apply all down migrations?")?
            {
                info!("Not applying all down migrations");
                return Ok(());
            }
            let mut dispatcher = open(config).await?;
            dispatcher.down(limit).await?;
        }
        Command::Goto { version } => {
            let mut dispatcher = open(config).await?;
            dispatcher.goto(version).await?;
        }
        Command::Drop { force } => {
            if !force && !ask("Are you sure you want to drop the entire database schema?")? {
                info!("Aborted dropping the entire database schema");
                return Ok(());
            }
            let mut dispatcher = open(config).await?;
            dispatcher.drop_all().await?;
            info!("Successfully dropped the database schema");
        }
        Command::Force { version } => {
            let mut dispatcher = open(config).await?;
            dispatcher.force(version).await?;
        }
        Command::Version => {
            let dispatcher = open(config).await?;
            let report = dispatcher.version().await?;
            println!("{}", report);
        }
    }

    Ok(())
}

async fn open(config: &MigrateConfig) -> anyhow::Result<Dispatcher<FileEngine>> {
    let engine = FileEngine::open(&config.path, &config.state_file)
        .await
        .with_context(|| format!("Failed to open migrations in {}", config.path.display()))?;
    Ok(Dispatcher::new(engine))
}

fn ask(prompt: &str) -> anyhow::Result<bool> {
    let stdin = io::stdin();
    let answer = confirm(prompt, &mut stdin.lock(), &mut io::stdout())?;
    Ok(answer)
}
