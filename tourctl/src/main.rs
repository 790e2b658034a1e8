//! A command-line tool to inspect the location feed and manage user data via [libtour]
use crate::{
    cli::{Cli, Commands, FavoriteCommands},
    output::rows::{AuditRow, CategoryRow, FavoriteRow, LocationRow},
};
use anyhow::{Result, anyhow};
use clap::Parser;
use libtour::{
    Database,
    category::Category,
    favorite::Favorite,
    feed::FeedClient,
    user::User,
};
use strum::IntoEnumIterator;
use tracing::debug;

mod cli;
mod output;
mod table;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Cli::parse();

    match args.command {
        Commands::Fetch {
            url,
            category,
            format,
        } => {
            let category = category
                .as_deref()
                .map(|id| {
                    Category::from_id(id).ok_or_else(|| anyhow!("Unknown category id '{id}'"))
                })
                .transpose()?;
            let feed = FeedClient::new(reqwest::Client::new());
            let locations = feed.fetch(&url).await?;
            debug!("fetched {} locations", locations.len());
            let rows = locations
                .into_iter()
                .filter(|loc| category.is_none_or(|c| loc.category_kind() == c))
                .map(LocationRow::from);
            println!("{}", output::format_seq(rows, format)?);
        }
        Commands::Categories { format } => {
            let rows = Category::iter().map(CategoryRow::from);
            println!("{}", output::format_seq(rows, format)?);
        }
        Commands::Audit { url } => {
            let feed = FeedClient::new(reqwest::Client::new());
            let collection = feed.fetch_collection(&url).await?;
            let total = collection.features.len();
            let rows = collection
                .features
                .iter()
                .filter(|f| f.properties.explicit_category().is_none())
                .map(AuditRow::new)
                .collect::<Vec<_>>();
            if rows.is_empty() {
                println!("All {total} records resolve to a known category");
            } else {
                println!(
                    "{}",
                    output::format_seq(rows, output::OutputFormat::Table)?
                );
            }
        }
        Commands::Favorites {
            database,
            sub,
            command,
        } => {
            let db = Database::open(&database).await?;
            let user = User::load_by_sub(&sub, &db)
                .await?
                .ok_or_else(|| anyhow!("No user with subject '{sub}'"))?;
            match command {
                FavoriteCommands::List => {
                    let rows = Favorite::fetch_all_user(user.id, &db)
                        .await?
                        .into_iter()
                        .map(FavoriteRow::from);
                    println!("{}", output::format_seq(rows, output::OutputFormat::Table)?);
                }
                FavoriteCommands::Add { pin_id } => {
                    Favorite::insert(user.id, &pin_id, &db).await?;
                    println!("Saved '{pin_id}' for user {}", user.sub);
                }
                FavoriteCommands::Remove { pin_id } => {
                    Favorite::delete(user.id, &pin_id, &db).await?;
                    println!("Removed '{pin_id}' for user {}", user.sub);
                }
            }
        }
    }
    Ok(())
}
