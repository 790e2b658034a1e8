use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Fetch the location feed and print the normalized records")]
    Fetch {
        #[arg(short, long)]
        url: String,
        #[arg(short, long, help = "Only show locations in this category id")]
        category: Option<String>,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    #[command(about = "Show the category registry")]
    Categories {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    #[command(about = "Report feed records whose category does not resolve")]
    Audit {
        #[arg(short, long)]
        url: String,
    },
    #[command(about = "Manage a user's saved favorites")]
    Favorites {
        #[arg(short, long, default_value = "tourmap.sqlite")]
        database: PathBuf,
        #[arg(short, long, help = "The OAuth subject of the user")]
        sub: String,
        #[command(subcommand)]
        command: FavoriteCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum FavoriteCommands {
    #[command(about = "List all saved favorites")]
    List,
    #[command(about = "Save a pin as a favorite")]
    Add { pin_id: String },
    #[command(about = "Remove a saved favorite")]
    Remove { pin_id: String },
}
