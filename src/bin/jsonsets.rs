//! jsonsets CLI
//!
//! Local maintenance tool for a jsonsets install root.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use jsonsets::{Config, Database, Result};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

/// jsonsets CLI
#[derive(Parser, Debug)]
#[command(name = "jsonsets")]
#[command(about = "Inspect and edit a jsonsets document store")]
#[command(version)]
struct Args {
    /// Install root (holds config.txt, .sets and .prod)
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Database name, overrides prodname in config.txt
    #[arg(short, long)]
    name: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the value at a path
    Get {
        /// Dotted path, `.` for the whole document
        #[arg(default_value = ".")]
        path: String,
    },

    /// Set a value and save
    Set {
        path: String,

        /// JSON value
        value: String,
    },

    /// Delete a value and save
    Del { path: String },

    /// Append to an array and save (an array value is concatenated)
    Push {
        path: String,

        /// JSON value
        value: String,
    },

    /// Splice an array and save
    Splice {
        path: String,
        index: usize,
        count: usize,

        /// JSON value
        value: String,
    },

    /// List the sets on disk
    Sets,

    /// Recompile after editing set files by hand
    Manu,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,jsonsets=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::from_root(&args.root, args.name.as_deref())?;
    tracing::debug!(root = %config.root_dir.display(), name = %config.name, pointer = %config.pointer_mode, "opening");
    let db = Database::open(config)?;

    match args.command {
        Commands::Get { path } => print_json(&db.get(&path)?.unwrap_or(Value::Null)),
        Commands::Set { path, value } => {
            db.set(&path, parse_value(&value)?)?;
            print_json(&db.save()?)
        }
        Commands::Del { path } => {
            db.del(&path)?;
            print_json(&db.save()?)
        }
        Commands::Push { path, value } => {
            db.push(&path, parse_value(&value)?)?;
            print_json(&db.save()?)
        }
        Commands::Splice { path, index, count, value } => {
            let removed = db.splice(&path, index, count, parse_value(&value)?)?;
            db.save()?;
            print_json(&removed)
        }
        Commands::Sets => print_json(&db.list_sets()?.names),
        Commands::Manu => {
            db.manu();
            print_json(&db.working())
        }
    }
}

fn parse_value(raw: &str) -> Result<Value> {
    Ok(serde_json::from_str(raw)?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let bytes = jsonsets::codec::encode_pretty(value)?;
    println!("{}", String::from_utf8_lossy(&bytes));
    Ok(())
}
