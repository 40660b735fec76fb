use clap::{Parser, Subcommand};
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::path::PathBuf;

use habitstore::Store;

/// Inspect a habit store on disk
#[derive(Parser, Debug)]
#[command(name = "habitstore")]
#[command(author, version, about = "Inspect a local habit store", long_about = None)]
struct Cli {
    /// Store directory
    #[arg(short, long)]
    path: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List collections and their sizes
    Collections,

    /// Print every entry of a collection
    Dump {
        /// Collection name (habits, logs, meta)
        #[arg(required = true)]
        collection: String,
    },

    /// Print a single entry
    Get {
        /// Collection name
        #[arg(required = true)]
        collection: String,

        /// Entry key
        #[arg(required = true)]
        key: String,
    },
}

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let store = Store::open(&cli.path).context("Failed to open store")?;

    info!("habitstore opened {}", cli.path.display());

    match cli.command {
        Command::Collections => {
            let collections = store.collections()?;
            if collections.is_empty() {
                println!("Store is empty");
            }
            for name in collections {
                let count = store.count(&name)?;
                println!("{} {}", name.cyan(), count.to_string().dimmed());
            }
        }
        Command::Dump { collection } => {
            for key in store.keys(&collection)? {
                if let Some(value) = store.get_value(&collection, &key)? {
                    println!("{} {}", key.yellow(), value);
                }
            }
        }
        Command::Get { collection, key } => match store.get_value(&collection, &key)? {
            Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
            None => println!("{} {}/{} not found", "✗".red(), collection, key),
        },
    }

    Ok(())
}
