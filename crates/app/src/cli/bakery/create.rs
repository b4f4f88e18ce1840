use bakehouse_app::domain::{
    bakeries::{
        BakeriesService, PgBakeriesService,
        data::NewBakery,
        records::BakeryUuid,
    },
    users::records::UserUuid,
};
use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct CreateBakeryArgs {
    /// UUID of the baker who runs the bakery
    #[arg(long)]
    owner: UserUuid,

    /// Bakery display name
    #[arg(long)]
    name: String,

    #[arg(long)]
    city: String,

    #[arg(long)]
    address: String,

    #[arg(long)]
    description: Option<String>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateBakeryArgs) -> Result<(), String> {
    let db = crate::cli::connect(&args.database_url).await?;
    let service = PgBakeriesService::new(db);

    let bakery = service
        .create_bakery(NewBakery {
            uuid: BakeryUuid::new(),
            owner_uuid: args.owner,
            bakery_name: args.name,
            city: args.city,
            address: args.address,
            description: args.description,
        })
        .await
        .map_err(|error| format!("failed to create bakery: {error}"))?;

    println!("bakery_uuid: {}", bakery.uuid);
    println!("bakery_name: {}", bakery.bakery_name);
    println!("approved: {}", bakery.is_approved);

    Ok(())
}
