//! # Routier CLI
//!
//! Command-line interface for the Routier service.
//!
//! ## Usage
//!
//! ```bash
//! routier serve    # Start the API server (runs migrations automatically)
//! routier migrate  # Run database migrations
//! routier --help   # Show help
//! ```

use clap::{Args, CommandFactory as _, Parser, Subcommand};
use error::{AppError, Result};
use migration::MigratorTrait;

mod server;

/// Routier - road-infrastructure issue tracking
#[derive(Parser, Debug)]
#[command(name = "routier")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (debug, info, warn, error)
    #[arg(short = 'L', long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    /// Output format (json, pretty, compact)
    #[arg(short, long, env = "ROUTIER_LOG_FORMAT", default_value = "pretty")]
    log_format: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the API server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Verify configuration
    Validate(ServeArgs),
}

#[derive(Args, Debug, Clone)]
struct ServeArgs {
    /// Server host to bind to
    #[arg(long, env = "ROUTIER_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Server port to bind to
    #[arg(short, long, env = "ROUTIER_PORT", default_value = "8080")]
    port: u16,

    /// Primary-store connection URL
    #[arg(long, env = "ROUTIER_DATABASE_URL")]
    database_url: String,

    /// Directory holding the secondary-store collection files
    #[arg(long, env = "ROUTIER_DOCUMENTS_DIR", default_value = "./documents")]
    documents_dir: String,

    /// Session-token signing secret
    #[arg(long, env = "ROUTIER_JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Session-token issuer
    #[arg(long, env = "ROUTIER_JWT_ISSUER", default_value = "routier")]
    jwt_issuer: String,
}

#[derive(Args, Debug)]
struct MigrateArgs {
    /// Primary-store connection URL
    #[arg(long, env = "ROUTIER_DATABASE_URL")]
    database_url: String,
}

#[derive(Args, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: clap_complete::Shell,
}

fn validate_args(args: &ServeArgs) -> Result<()> {
    if args.database_url.trim().is_empty() {
        return Err(AppError::config("database URL must not be empty"));
    }
    if args.jwt_secret.len() < 32 {
        return Err(AppError::config(
            "JWT secret must be at least 32 bytes long",
        ));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level, &cli.log_format, None)
        .map_err(|e| AppError::config(format!("Failed to initialize logging: {}", e)))?;

    match cli.command {
        Commands::Serve(args) => {
            validate_args(&args)?;
            server::run(args).await
        },
        Commands::Migrate(args) => {
            let db = sea_orm::Database::connect(&args.database_url).await?;
            migration::Migrator::up(&db, None).await?;
            tracing::info!("Migrations applied");
            Ok(())
        },
        Commands::Completions(args) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(args.shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        },
        Commands::Validate(args) => {
            validate_args(&args)?;
            println!("Configuration OK");
            Ok(())
        },
    }
}
