use clap::{Parser, Subcommand};

mod bakery;
mod db;
mod product;
mod user;

#[derive(Debug, Parser)]
#[command(name = "bakehouse-app", about = "Bakehouse operator CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    User(user::UserCommand),
    Bakery(bakery::BakeryCommand),
    Product(product::ProductCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::User(command) => user::run(command).await,
            Commands::Bakery(command) => bakery::run(command).await,
            Commands::Product(command) => product::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

/// Connect and wrap the pool the way services expect it.
pub(crate) async fn connect(database_url: &str) -> Result<bakehouse_app::database::Db, String> {
    let pool = bakehouse_app::database::connect(database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    Ok(bakehouse_app::database::Db::new(pool))
}
