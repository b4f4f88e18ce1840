use clap::{Args, Subcommand};

mod create;

#[derive(Debug, Args)]
pub(crate) struct BakeryCommand {
    #[command(subcommand)]
    command: BakerySubcommand,
}

#[derive(Debug, Subcommand)]
enum BakerySubcommand {
    Create(create::CreateBakeryArgs),
}

pub(crate) async fn run(command: BakeryCommand) -> Result<(), String> {
    match command.command {
        BakerySubcommand::Create(args) => create::run(args).await,
    }
}
