use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use data_loader::{MalformedLinePolicy, SourceKind};
use db_loader::{DatabaseLoader, LoadError, LoaderConfig};
use sql_script::{GenerateError, GeneratorConfig, ScriptGenerator, SourcePaths};
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

/// movies-etl - build the movies_rating database from flat source files
#[derive(Parser)]
#[command(name = "movies-etl")]
#[command(about = "Generate a SQL init script from movie-rating sources and load it into SQLite", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the SQL init script from users.txt, movies.csv, ratings.csv and tags.csv
    Generate(GenerateArgs),

    /// Replay a SQL init script into a fresh database file
    Load {
        /// SQL script to replay
        #[arg(long, default_value = db_loader::DEFAULT_SCRIPT)]
        script: PathBuf,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Generate the script, then load it
    Build {
        #[command(flatten)]
        generate: GenerateArgs,

        #[command(flatten)]
        target: TargetArgs,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Directory containing the four source files
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Where to write the generated script
    #[arg(short, long, default_value = sql_script::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Fail on a malformed users.txt line instead of skipping it
    #[arg(long)]
    strict: bool,
}

#[derive(Args)]
struct TargetArgs {
    /// Database file to (re)create
    #[arg(long, default_value = db_loader::DEFAULT_DATABASE)]
    database: PathBuf,

    /// Enforce foreign keys while loading
    #[arg(long)]
    foreign_keys: bool,
}

impl GenerateArgs {
    fn config(&self) -> GeneratorConfig {
        GeneratorConfig {
            sources: SourcePaths::in_dir(&self.data_dir),
            output: self.output.clone(),
            policy: if self.strict {
                MalformedLinePolicy::Strict
            } else {
                MalformedLinePolicy::Lenient
            },
        }
    }
}

impl TargetArgs {
    fn config(&self, script: PathBuf) -> LoaderConfig {
        LoaderConfig {
            script,
            database: self.database.clone(),
            enforce_foreign_keys: self.foreign_keys,
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => handle_generate(args.config())?,
        Commands::Load { script, target } => handle_load(target.config(script))?,
        Commands::Build { generate, target } => {
            let config = generate.config();
            let script = config.output.clone();
            handle_generate(config)?;
            println!();
            handle_load(target.config(script))?;
        }
    }

    Ok(())
}

/// Handle the 'generate' command
fn handle_generate(config: GeneratorConfig) -> Result<()> {
    println!("{}", "ETL: building the movies_rating.db init script".bold().blue());
    println!("{}", "=".repeat(50));
    debug!(?config, "generator configuration");

    let start = Instant::now();
    let report = match ScriptGenerator::new(config).write() {
        Ok(report) => report,
        Err(GenerateError::MissingInputs { files }) => {
            println!("{} Missing source files: {}", "✗".red(), files.join(", "));
            anyhow::bail!("{} required source file(s) missing", files.len());
        }
        Err(err) => return Err(err).context("Failed to generate SQL script"),
    };

    for kind in SourceKind::ALL {
        println!(
            "{}{}: {} statements",
            "• ".green(),
            kind,
            report.counts.get(kind)
        );
    }
    if report.skipped_users > 0 {
        println!(
            "{}Skipped {} malformed user line(s)",
            "• ".yellow(),
            report.skipped_users
        );
    }

    println!(
        "{} SQL script created: {} in {:?}",
        "✓".green(),
        report.output.display(),
        start.elapsed()
    );
    println!("File size: {} bytes", report.size_bytes);
    Ok(())
}

/// Handle the 'load' command
fn handle_load(config: LoaderConfig) -> Result<()> {
    println!("{}", "Creating database from SQL script...".bold().blue());
    println!("SQL file: {}", config.script.display());
    println!("Database file: {}", config.database.display());

    let start = Instant::now();
    let mut loader = DatabaseLoader::new(config);
    let report = match loader.run() {
        Ok(report) => report,
        Err(err @ LoadError::ScriptNotFound { .. }) => {
            println!("{} {}", "✗".red(), err);
            println!("Please run `movies-etl generate` first.");
            return Err(err.into());
        }
        Err(err) => {
            if let Some(failure) = loader.failure() {
                println!(
                    "{} Failed after stage '{}'",
                    "✗".red(),
                    failure.last_completed
                );
            }
            return Err(err).context("Failed to create database");
        }
    };

    println!();
    println!("{} Database created in {:?}", "✓".green(), start.elapsed());
    println!("Records in tables:");
    for (table, count) in report.counts.iter() {
        println!("  {}: {} records", table, count);
    }
    println!();
    println!("Database '{}' created successfully!", report.database.display());
    println!("File size: {} bytes", report.size_bytes);
    Ok(())
}
